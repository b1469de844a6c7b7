//! Embedded full-text search for Arbor.
//!
//! This crate searches a tree of [`ContentNode`]s without any persistent
//! index. It provides:
//! - [`ContentNode`]: the contract a page type implements to be searchable
//! - [`NodeIndex`] / [`IndexCell`]: lazily built per-node word weights,
//!   invalidated by the node's freshness stamp
//! - [`SearchEngine`]: cycle-safe depth-first traversal with strict AND
//!   matching and log-normalized scoring
//!
//! # Quick Start
//!
//! ```ignore
//! use std::sync::Arc;
//! use arbor_search::{ContentNode, SearchConfig, SearchEngine};
//!
//! let engine = SearchEngine::new(SearchConfig::default());
//! let root: Arc<dyn ContentNode> = site.root();
//!
//! let outcome = engine.search("install guide", &root)?;
//! for result in &outcome.results {
//!     println!("{:.3} {}", result.probability, result.url);
//! }
//! ```
//!
//! # Index lifecycle
//!
//! ```text
//! search ──► freshness_stamp() ──┬─ -1 ──────────► render + throwaway index
//!                                │
//!                                ├─ == stored ───► stored index
//!                                │
//!                                └─ != stored ───► rebuild lock ─► recheck ─► render ─► swap
//! ```

mod cell;
mod engine;
mod error;
mod index;
mod node;
mod query;
mod result;
mod score;
#[cfg(test)]
mod test_support;

pub use cell::IndexCell;
pub use engine::{IdentityMode, SearchConfig, SearchEngine};
pub use error::{NodeError, SearchError};
pub use index::{
    AUTHOR_WEIGHT, BODY_WEIGHT, DESCRIPTION_WEIGHT, KEYWORDS_WEIGHT, NodeFields, NodeIndex,
    TITLE_WEIGHT, strip_markup,
};
pub use node::{ContentNode, CustomSearch, NodeId, SearchBehavior, UNCACHEABLE};
pub use query::Query;
pub use result::{SearchOutcome, SearchResult};
pub use score::{match_weight, probability, total_matches};
