//! `arbor search` command implementation.

use std::path::PathBuf;
use std::time::Instant;

use arbor_config::{CliSettings, Config};
use arbor_search::SearchEngine;
use arbor_server::search_config_from_settings;
use arbor_site::{SearchScope, Site, SiteConfig};
use clap::Args;

use crate::error::CliError;
use crate::output::Output;

/// Arguments for the search command.
#[derive(Args)]
pub(crate) struct SearchArgs {
    /// Query text; every word must match.
    query: String,

    /// Limit the search to this page and everything below it.
    #[arg(long)]
    path: Option<String>,

    /// Maximum number of results (overrides config).
    #[arg(short = 'n', long)]
    limit: Option<usize>,

    /// Path to configuration file (default: auto-discover arbor.toml).
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Markdown source directory (overrides config).
    #[arg(short, long)]
    source_dir: Option<PathBuf>,
}

impl SearchArgs {
    /// Execute the search command.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration fails, the area is unknown, or a
    /// page cannot be indexed.
    pub(crate) fn execute(self, output: &Output) -> Result<(), CliError> {
        if self.limit == Some(0) {
            return Err(CliError::Validation(
                "--limit must be greater than 0".to_string(),
            ));
        }

        let cli_settings = CliSettings {
            source_dir: self.source_dir,
            ..CliSettings::default()
        };
        let config = Config::load(self.config.as_deref(), Some(&cli_settings))?;

        let site = Site::new(SiteConfig {
            source_dir: config.docs_resolved.source_dir.clone(),
            meta_filename: config.metadata.name.clone(),
        });
        let engine = SearchEngine::new(search_config_from_settings(&config.search));
        let scope = self.path.map_or(SearchScope::EntireSite, SearchScope::ThisArea);

        let start = Instant::now();
        let mut outcome = site.search(&engine, &self.query, &scope)?;
        if let Some(max) = self.limit.or(config.search.max_results) {
            outcome.truncate(max);
        }
        tracing::debug!(
            results = outcome.results.len(),
            elapsed_ms = start.elapsed().as_secs_f64() * 1000.0,
            "Search finished"
        );

        if outcome.terms.is_empty() {
            output.warning("Empty query, nothing to search for");
            return Ok(());
        }
        if outcome.no_matches {
            output.warning(&format!("No pages match {:?}", outcome.terms.join(" ")));
            return Ok(());
        }

        for result in &outcome.results {
            let title = result.title.as_deref().unwrap_or(&result.url);
            output.result(result.probability, title, &result.url);
        }
        Ok(())
    }
}
