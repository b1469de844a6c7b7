//! Content node contract.
//!
//! The search engine knows nothing about markdown, files, or HTTP. Anything
//! that can describe itself through [`ContentNode`] can be searched: the
//! site's page tree implements it, as do the generated nodes attached to it.

use std::fmt;
use std::sync::Arc;

use crate::engine::SearchEngine;
use crate::error::{NodeError, SearchError};
use crate::query::Query;
use crate::result::SearchResult;

/// Freshness stamp reported by nodes whose index must never be cached.
pub const UNCACHEABLE: i64 = -1;

/// Stable identity of one content node.
///
/// Used as the index cache key and, in [`IdentityMode::Instance`](crate::IdentityMode),
/// as the visited-set key.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(String);

impl NodeId {
    /// Create an identity from any string-like value.
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Borrow the identity as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for NodeId {
    fn from(id: &str) -> Self {
        Self(id.to_owned())
    }
}

impl From<String> for NodeId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

/// Custom search logic substituted for the standard algorithm.
///
/// The node is still recursed into after `evaluate` returns.
pub trait CustomSearch: Send + Sync {
    /// Score `node` against `query`.
    ///
    /// Returning `Ok(None)` excludes the node from results.
    ///
    /// # Errors
    ///
    /// Errors abort the whole search.
    fn evaluate(
        &self,
        node: &dyn ContentNode,
        query: &Query,
        engine: &SearchEngine,
    ) -> Result<Option<SearchResult>, SearchError>;
}

/// How a node participates in search.
#[derive(Clone, Default)]
pub enum SearchBehavior {
    /// Index, match, and score with the standard algorithm.
    #[default]
    Default,
    /// Contribute no result. Children are still visited.
    Excluded,
    /// Replace the standard algorithm with custom logic.
    Custom(Arc<dyn CustomSearch>),
}

impl fmt::Debug for SearchBehavior {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Default => f.write_str("Default"),
            Self::Excluded => f.write_str("Excluded"),
            Self::Custom(_) => f.write_str("Custom(..)"),
        }
    }
}

/// One addressable unit of the content tree.
///
/// All metadata accessors are optional: a missing field contributes no
/// weight to the index and is never an error.
pub trait ContentNode: Send + Sync {
    /// Per-instance identity.
    fn id(&self) -> NodeId;

    /// Name of the concrete node type.
    ///
    /// Used as the visited-set key in [`IdentityMode::Type`](crate::IdentityMode).
    fn type_name(&self) -> &'static str;

    /// URL the node is served at.
    fn url(&self) -> String;

    /// Render the node body for indexing.
    ///
    /// Must be deterministic and independent of any request.
    ///
    /// # Errors
    ///
    /// Returns an error if the body cannot be produced.
    fn render_body(&self) -> Result<String, NodeError>;

    /// Page title.
    fn title(&self) -> Option<String> {
        None
    }

    /// Short description.
    fn description(&self) -> Option<String> {
        None
    }

    /// Space-separated keywords.
    fn keywords(&self) -> Option<String> {
        None
    }

    /// Author display name.
    fn author(&self) -> Option<String> {
        None
    }

    /// Link to the author.
    fn author_url(&self) -> Option<String> {
        None
    }

    /// Marker deciding index validity; [`UNCACHEABLE`] disables caching.
    fn freshness_stamp(&self) -> i64;

    /// Child nodes in display order.
    fn children(&self) -> Vec<Arc<dyn ContentNode>>;

    /// Participation in search.
    fn search_behavior(&self) -> SearchBehavior {
        SearchBehavior::Default
    }
}
