//! Site errors.

use arbor_search::{NodeError, SearchError};

/// Error returned by [`Site`](crate::Site) operations.
#[derive(Debug, thiserror::Error)]
pub enum SiteError {
    /// No page at the given URL path.
    #[error("Page not found: {0}")]
    PageNotFound(String),
    /// Page content could not be rendered.
    #[error("Failed to render page: {0}")]
    Render(#[from] NodeError),
    /// Search failed.
    #[error(transparent)]
    Search(#[from] SearchError),
}
