//! Error types for node rendering and search.

use std::time::Duration;

use crate::node::NodeId;

/// Error produced by a [`ContentNode`](crate::ContentNode) while rendering.
#[derive(Debug, thiserror::Error)]
pub enum NodeError {
    /// Backing source no longer exists.
    #[error("Source not found: {0}")]
    NotFound(String),
    /// I/O error reading the source.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    /// Metadata could not be parsed.
    #[error("Invalid metadata: {0}")]
    Metadata(String),
}

/// Error returned when a search cannot complete.
///
/// A search never returns partial results: the first error aborts it.
#[derive(Debug, thiserror::Error)]
pub enum SearchError {
    /// Rendering a node for indexing failed.
    #[error("Failed to index {node}: {source}")]
    Render {
        /// Node that failed.
        node: NodeId,
        /// Underlying render error.
        #[source]
        source: NodeError,
    },
    /// Another request held the node's rebuild lock for too long.
    #[error("Timed out after {}ms waiting for index rebuild of {node}", .waited.as_millis())]
    RebuildTimeout {
        /// Node whose index was being rebuilt.
        node: NodeId,
        /// How long the request waited.
        waited: Duration,
    },
}
