//! Application state.
//!
//! Shared state for all request handlers.

use std::sync::Arc;

use arbor_search::SearchEngine;
use arbor_site::Site;

/// Application state shared across all handlers.
pub(crate) struct AppState {
    /// Page tree.
    pub(crate) site: Arc<Site>,
    /// Search engine holding the per-page indexes.
    pub(crate) engine: Arc<SearchEngine>,
    /// Cap on results per search.
    pub(crate) max_results: Option<usize>,
    /// Application version for cache invalidation.
    pub(crate) version: String,
}
