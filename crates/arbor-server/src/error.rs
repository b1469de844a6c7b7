//! Error types for the HTTP server.

use arbor_search::SearchError;
use arbor_site::SiteError;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;

use crate::handlers::to_url_path;

/// Server error type.
#[derive(Debug, thiserror::Error)]
pub enum ServerError {
    /// Malformed request parameters.
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// Site or search error.
    #[error(transparent)]
    Site(#[from] SiteError),

    /// Response body could not be serialized.
    #[error("Serialization error: {0}")]
    Serialize(#[from] serde_json::Error),

    /// Blocking task panicked or was cancelled.
    #[error("Task failed: {0}")]
    Task(#[from] tokio::task::JoinError),
}

impl ServerError {
    fn status(&self) -> StatusCode {
        match self {
            Self::Site(SiteError::PageNotFound(_)) => StatusCode::NOT_FOUND,
            Self::BadRequest(_) => StatusCode::BAD_REQUEST,
            Self::Site(SiteError::Search(SearchError::RebuildTimeout { .. })) => {
                StatusCode::SERVICE_UNAVAILABLE
            }
            Self::Site(_) | Self::Serialize(_) | Self::Task(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ServerError {
    fn into_response(self) -> Response {
        let status = self.status();
        let body = match &self {
            Self::Site(SiteError::PageNotFound(path)) => {
                json!({"error": "Page not found", "path": to_url_path(path.trim_matches('/'))})
            }
            _ => json!({"error": self.to_string()}),
        };

        if status.is_server_error() {
            tracing::error!(error = %self, "Request failed");
        }

        (status, axum::Json(body)).into_response()
    }
}
