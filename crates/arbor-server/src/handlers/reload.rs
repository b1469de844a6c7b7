//! Reload API endpoint.

use std::sync::Arc;

use axum::extract::State;
use axum::http::StatusCode;

use crate::state::AppState;

/// Handle POST /api/reload.
///
/// Marks the page tree stale; the next request rescans the source directory.
/// Search indexes are kept: a page edited since the previous load gets a new
/// freshness stamp and is reindexed on its next search.
pub(crate) async fn post_reload(State(state): State<Arc<AppState>>) -> StatusCode {
    state.site.invalidate();
    tracing::info!("Site invalidated");
    StatusCode::NO_CONTENT
}
