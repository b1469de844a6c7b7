//! Pages API endpoint.
//!
//! Renders a page and returns its metadata, breadcrumbs and HTML content.

use std::sync::Arc;

use arbor_site::{BreadcrumbItem, RenderedPage};
use axum::extract::{Path, State};
use axum::http::{HeaderMap, StatusCode, header};
use axum::response::IntoResponse;
use md5::{Digest, Md5};
use serde::Serialize;

use crate::error::ServerError;
use crate::handlers::to_url_path;
use crate::state::AppState;

/// Response for GET /api/pages/{path}.
#[derive(Serialize)]
struct PageResponse {
    /// Page metadata.
    meta: PageMeta,
    /// Breadcrumb navigation items.
    breadcrumbs: Vec<BreadcrumbResponse>,
    /// Rendered HTML content.
    content: String,
}

/// Page metadata.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct PageMeta {
    /// Page title (from metadata, H1 heading or file name).
    title: Option<String>,
    /// URL path.
    path: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    keywords: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    author: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    author_url: Option<String>,
}

/// Breadcrumb item for serialization.
#[derive(Serialize)]
struct BreadcrumbResponse {
    /// Display title.
    title: String,
    /// Link target path.
    path: String,
}

impl From<BreadcrumbItem> for BreadcrumbResponse {
    fn from(item: BreadcrumbItem) -> Self {
        Self {
            title: item.title,
            path: to_url_path(&item.path),
        }
    }
}

impl From<RenderedPage> for PageResponse {
    fn from(page: RenderedPage) -> Self {
        Self {
            meta: PageMeta {
                title: page.title,
                path: to_url_path(&page.path),
                description: page.description,
                keywords: page.keywords,
                author: page.author,
                author_url: page.author_url,
            },
            breadcrumbs: page
                .breadcrumbs
                .into_iter()
                .map(BreadcrumbResponse::from)
                .collect(),
            content: page.html,
        }
    }
}

/// Handle GET /api/pages/ (root page).
pub(crate) async fn get_root_page(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
) -> Result<impl IntoResponse, ServerError> {
    get_page_impl(String::new(), state, headers).await
}

/// Handle GET /api/pages/{path}.
pub(crate) async fn get_page(
    Path(path): Path<String>,
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
) -> Result<impl IntoResponse, ServerError> {
    get_page_impl(path, state, headers).await
}

/// Shared implementation for page rendering.
async fn get_page_impl(
    path: String,
    state: Arc<AppState>,
    headers: HeaderMap,
) -> Result<impl IntoResponse, ServerError> {
    // Rendering reads the source file and may rescan the site
    let site = Arc::clone(&state.site);
    let page = tokio::task::spawn_blocking(move || site.render(&path)).await??;

    // Hash the full body so metadata and breadcrumb changes also invalidate
    let body = serde_json::to_vec(&PageResponse::from(page))?;
    let etag = compute_etag(&state.version, &body);

    if let Some(if_none_match) = headers.get(header::IF_NONE_MATCH)
        && if_none_match.as_bytes() == etag.as_bytes()
    {
        return Ok(StatusCode::NOT_MODIFIED.into_response());
    }

    Ok((
        [
            (header::CONTENT_TYPE, "application/json".to_string()),
            (header::ETAG, etag),
            (header::CACHE_CONTROL, "private, max-age=60".to_string()),
        ],
        body,
    )
        .into_response())
}

/// Compute `ETag` from version and response body.
///
/// MD5 truncated to 64 bits (16 hex chars).
fn compute_etag(version: &str, body: &[u8]) -> String {
    let mut hasher = Md5::new();
    hasher.update(version.as_bytes());
    hasher.update(b":");
    hasher.update(body);
    format!("\"{}\"", &hex::encode(hasher.finalize())[..16])
}
