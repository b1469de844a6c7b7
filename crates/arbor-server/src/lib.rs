//! HTTP server for the Arbor page tree.
//!
//! This crate provides an axum server exposing:
//! - Navigation and page rendering endpoints
//! - Full-text search over the whole site or one area of it
//! - A reload endpoint that rescans the source directory
//!
//! # Quick Start
//!
//! ```ignore
//! use std::path::PathBuf;
//! use arbor_server::{ServerConfig, run_server};
//!
//! #[tokio::main]
//! async fn main() {
//!     let config = ServerConfig {
//!         source_dir: PathBuf::from("docs"),
//!         version: "1.0.0".to_string(),
//!         ..ServerConfig::default()
//!     };
//!
//!     run_server(config).await.unwrap();
//! }
//! ```
//!
//! # Architecture
//!
//! ```text
//! Client ──HTTP──► axum router (arbor-server)
//!                        │
//!                        ├─► /api/navigation, /api/pages ──► Site
//!                        │
//!                        └─► /api/search ──► spawn_blocking ──► Site + SearchEngine
//! ```

mod app;
mod error;
mod handlers;
mod middleware;
mod state;

use std::net::SocketAddr;
use std::path::PathBuf;
use std::str::FromStr;
use std::sync::Arc;

use arbor_config::SearchIdentity;
use arbor_search::{IdentityMode, SearchConfig, SearchEngine};
use arbor_site::{Site, SiteConfig};
use state::AppState;

pub use error::ServerError;

/// Server configuration.
#[derive(Clone, Debug)]
pub struct ServerConfig {
    /// Host address to bind to.
    pub host: String,
    /// Port to listen on.
    pub port: u16,
    /// Markdown source directory.
    pub source_dir: PathBuf,
    /// Metadata file name (default: "meta.yaml").
    pub meta_filename: String,
    /// Search engine settings.
    pub search: SearchConfig,
    /// Cap on results per search (`None` returns all).
    pub max_results: Option<usize>,
    /// Enable verbose output.
    pub verbose: bool,
    /// Application version (for `ETag`s).
    pub version: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 7979,
            source_dir: PathBuf::from("docs"),
            meta_filename: "meta.yaml".to_string(),
            search: SearchConfig::default(),
            max_results: None,
            verbose: false,
            version: String::new(),
        }
    }
}

/// Run the server until Ctrl-C.
///
/// # Errors
///
/// Returns an error if the address is invalid or the server fails to start.
pub async fn run_server(config: ServerConfig) -> Result<(), Box<dyn std::error::Error>> {
    let site = Arc::new(Site::new(SiteConfig {
        source_dir: config.source_dir.clone(),
        meta_filename: config.meta_filename.clone(),
    }));
    let engine = Arc::new(SearchEngine::new(config.search.clone()));

    let state = Arc::new(AppState {
        site,
        engine,
        max_results: config.max_results,
        version: config.version.clone(),
    });

    let app = app::create_router(state);

    let addr = SocketAddr::from_str(&format!("{}:{}", config.host, config.port))?;
    tracing::info!(
        address = %addr,
        source_dir = %config.source_dir.display(),
        "Starting server"
    );

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

/// Wait for shutdown signal (Ctrl-C).
async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for Ctrl+C");
        return;
    }
    tracing::info!("Shutdown signal received, stopping server...");
}

/// Create server configuration from an Arbor config.
#[must_use]
pub fn server_config_from_config(
    config: &arbor_config::Config,
    version: String,
    verbose: bool,
) -> ServerConfig {
    ServerConfig {
        host: config.server.host.clone(),
        port: config.server.port,
        source_dir: config.docs_resolved.source_dir.clone(),
        meta_filename: config.metadata.name.clone(),
        search: search_config_from_settings(&config.search),
        max_results: config.search.max_results,
        verbose,
        version,
    }
}

/// Map `[search]` settings onto the engine configuration.
#[must_use]
pub fn search_config_from_settings(settings: &arbor_config::SearchSettings) -> SearchConfig {
    SearchConfig {
        rebuild_timeout: settings.rebuild_timeout(),
        identity: match settings.identity {
            SearchIdentity::Instance => IdentityMode::Instance,
            SearchIdentity::Type => IdentityMode::Type,
        },
        normalize_query: settings.normalize_query,
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use arbor_config::Config;
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn test_server_config_from_config() {
        let mut config = Config::default();
        config.server.port = 9000;
        config.search.identity = SearchIdentity::Type;
        config.search.rebuild_timeout_ms = 500;
        config.search.max_results = Some(10);

        let server = server_config_from_config(&config, "1.2.3".to_string(), true);

        assert_eq!(server.port, 9000);
        assert_eq!(server.meta_filename, "meta.yaml");
        assert_eq!(server.max_results, Some(10));
        assert_eq!(server.version, "1.2.3");
        assert!(server.verbose);
        assert_eq!(server.search.identity, IdentityMode::Type);
        assert_eq!(server.search.rebuild_timeout, Duration::from_millis(500));
        assert!(server.search.normalize_query);
    }
}
