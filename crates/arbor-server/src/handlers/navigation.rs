//! Navigation API endpoint.
//!
//! Returns the navigation tree for the site.

use std::sync::Arc;

use arbor_site::NavItem;
use axum::Json;
use axum::extract::State;
use serde::Serialize;

use crate::handlers::to_url_path;
use crate::state::AppState;

/// Response for GET /api/navigation.
#[derive(Serialize)]
pub(crate) struct NavigationResponse {
    /// Navigation tree items.
    items: Vec<NavItem>,
}

/// Handle GET /api/navigation.
pub(crate) async fn get_navigation(State(state): State<Arc<AppState>>) -> Json<NavigationResponse> {
    let items = state
        .site
        .navigation()
        .into_iter()
        .map(with_url_paths)
        .collect();
    Json(NavigationResponse { items })
}

fn with_url_paths(item: NavItem) -> NavItem {
    NavItem {
        title: item.title,
        path: to_url_path(&item.path),
        children: item.children.into_iter().map(with_url_paths).collect(),
    }
}
