//! Search API endpoint.

use std::sync::Arc;

use arbor_search::SearchOutcome;
use arbor_site::SearchScope;
use axum::Json;
use axum::extract::{Query, State};
use serde::{Deserialize, Serialize};

use crate::error::ServerError;
use crate::state::AppState;

/// Query string for GET /api/search.
#[derive(Debug, Deserialize)]
pub(crate) struct SearchParams {
    /// Raw query text.
    #[serde(default)]
    q: String,
    /// `site` (default) or `area`.
    scope: Option<String>,
    /// Area root for `scope=area`; empty means the site root.
    path: Option<String>,
}

impl SearchParams {
    fn scope(&self) -> Result<SearchScope, ServerError> {
        match (self.scope.as_deref(), &self.path) {
            (None | Some("site"), _) => Ok(SearchScope::EntireSite),
            (Some("area"), Some(path)) => Ok(SearchScope::ThisArea(path.clone())),
            (Some("area"), None) => Err(ServerError::BadRequest(
                "scope=area requires a path".to_string(),
            )),
            (Some(other), _) => Err(ServerError::BadRequest(format!(
                "Unknown search scope: {other}"
            ))),
        }
    }
}

/// Response for GET /api/search.
#[derive(Serialize)]
pub(crate) struct SearchResponse {
    /// Query as received.
    query: String,
    #[serde(flatten)]
    outcome: SearchOutcome,
}

/// Handle GET /api/search.
pub(crate) async fn get_search(
    State(state): State<Arc<AppState>>,
    Query(params): Query<SearchParams>,
) -> Result<Json<SearchResponse>, ServerError> {
    let scope = params.scope()?;

    // Indexing renders pages and may wait on another request's rebuild
    let site = Arc::clone(&state.site);
    let engine = Arc::clone(&state.engine);
    let query = params.q.clone();
    let mut outcome =
        tokio::task::spawn_blocking(move || site.search(&engine, &query, &scope)).await??;

    if let Some(max) = state.max_results {
        outcome.truncate(max);
    }

    Ok(Json(SearchResponse {
        query: params.q,
        outcome,
    }))
}
