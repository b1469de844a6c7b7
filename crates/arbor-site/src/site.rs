//! Site loading, rendering and search.
//!
//! # Thread Safety
//!
//! `Site` is designed for concurrent access:
//! - `reload_if_needed()` returns `Arc<SiteState>` and uses double-checked
//!   locking to rebuild an invalidated snapshot once
//! - `invalidate()` is lock-free (atomic flag)
//! - nodes handed out hold their own snapshot, so a reload never disturbs a
//!   search in progress

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Instant;

use parking_lot::{Mutex, RwLock};

use arbor_search::{ContentNode, SearchEngine, SearchOutcome};

use crate::error::SiteError;
use crate::loader::load_state;
use crate::metadata::PageMetadata;
use crate::node::{PageNode, SITEMAP_PATH, SitemapNode};
use crate::page::Page;
use crate::site_state::{BreadcrumbItem, NavItem, SiteState, SiteStateBuilder};

/// Where a search starts.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SearchScope {
    /// The page at this URL path and everything below it.
    ThisArea(String),
    /// The whole site, from the root page.
    EntireSite,
}

/// Configuration for [`Site`].
#[derive(Clone, Debug)]
pub struct SiteConfig {
    /// Root directory containing markdown sources.
    pub source_dir: PathBuf,
    /// Sidecar metadata filename.
    pub meta_filename: String,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            source_dir: PathBuf::from("docs"),
            meta_filename: "meta.yaml".to_owned(),
        }
    }
}

/// Rendered page with its metadata.
#[derive(Clone, Debug)]
pub struct RenderedPage {
    /// URL path without leading slash.
    pub path: String,
    /// Page title.
    pub title: Option<String>,
    /// Page description.
    pub description: Option<String>,
    /// Page keywords.
    pub keywords: Option<String>,
    /// Author display name.
    pub author: Option<String>,
    /// Link to the author.
    pub author_url: Option<String>,
    /// Rendered HTML.
    pub html: String,
    /// Freshness stamp at render time.
    pub stamp: i64,
    /// Breadcrumb navigation items.
    pub breadcrumbs: Vec<BreadcrumbItem>,
}

/// Page tree of a source directory.
pub struct Site {
    config: SiteConfig,
    /// Serializes reloads.
    reload_lock: Mutex<()>,
    /// Current snapshot (atomically swappable).
    current_state: RwLock<Arc<SiteState>>,
    /// Snapshot validity flag.
    cache_valid: AtomicBool,
}

impl Site {
    /// Create a site. Nothing is read until first use.
    #[must_use]
    pub fn new(config: SiteConfig) -> Self {
        let mut builder = SiteStateBuilder::new();
        let root = builder.add_page(
            Page {
                title: String::new(),
                path: String::new(),
                content_path: None,
                meta_path: None,
                metadata: PageMetadata::default(),
                is_landing: true,
                loaded_stamp: 0,
            },
            None,
        );

        Self {
            config,
            reload_lock: Mutex::new(()),
            current_state: RwLock::new(Arc::new(builder.build(root, 0))),
            cache_valid: AtomicBool::new(false),
        }
    }

    /// Source directory.
    #[must_use]
    pub fn source_dir(&self) -> &Path {
        &self.config.source_dir
    }

    fn state(&self) -> Arc<SiteState> {
        Arc::clone(&self.current_state.read())
    }

    /// Reload the page tree if it was invalidated.
    ///
    /// Uses double-checked locking:
    /// 1. Fast path: return the current snapshot if valid
    /// 2. Slow path: acquire `reload_lock`, recheck, then rescan
    pub fn reload_if_needed(&self) -> Arc<SiteState> {
        if self.cache_valid.load(Ordering::Acquire) {
            return self.state();
        }

        let _guard = self.reload_lock.lock();

        if self.cache_valid.load(Ordering::Acquire) {
            return self.state();
        }

        let start = Instant::now();
        let state = Arc::new(load_state(
            &self.config.source_dir,
            &self.config.meta_filename,
        ));
        *self.current_state.write() = Arc::clone(&state);
        self.cache_valid.store(true, Ordering::Release);

        tracing::info!(
            page_count = state.pages().len(),
            elapsed_ms = start.elapsed().as_secs_f64() * 1000.0,
            "Site reloaded"
        );

        state
    }

    /// Mark the page tree stale. The next access rescans the source directory.
    ///
    /// Readers keep using the snapshot they already hold.
    pub fn invalidate(&self) {
        self.cache_valid.store(false, Ordering::Release);
    }

    /// Root page.
    #[must_use]
    pub fn root(&self) -> Arc<dyn ContentNode> {
        let state = self.reload_if_needed();
        let root = state.root_index();
        Arc::new(PageNode::new(state, root))
    }

    /// Node at a URL path (leading and trailing slashes ignored).
    ///
    /// Resolves the generated sitemap as well as pages.
    #[must_use]
    pub fn node(&self, path: &str) -> Option<Arc<dyn ContentNode>> {
        let path = path.trim_matches('/');
        let state = self.reload_if_needed();
        if path == SITEMAP_PATH {
            return Some(Arc::new(SitemapNode::new(state)));
        }
        let index = state.index_of(path)?;
        Some(Arc::new(PageNode::new(state, index)))
    }

    /// Navigation tree.
    #[must_use]
    pub fn navigation(&self) -> Vec<NavItem> {
        self.reload_if_needed().navigation()
    }

    /// Breadcrumbs for a URL path.
    #[must_use]
    pub fn breadcrumbs(&self, path: &str) -> Vec<BreadcrumbItem> {
        self.reload_if_needed().breadcrumbs(path.trim_matches('/'))
    }

    /// Render the page at a URL path.
    ///
    /// # Errors
    ///
    /// Returns `SiteError::PageNotFound` for an unknown path, or
    /// `SiteError::Render` if the source cannot be read.
    pub fn render(&self, path: &str) -> Result<RenderedPage, SiteError> {
        let path = path.trim_matches('/');
        let node = self
            .node(path)
            .ok_or_else(|| SiteError::PageNotFound(path.to_owned()))?;

        let stamp = node.freshness_stamp();
        let html = node.render_body()?;

        Ok(RenderedPage {
            path: path.to_owned(),
            title: node.title(),
            description: node.description(),
            keywords: node.keywords(),
            author: node.author(),
            author_url: node.author_url(),
            html,
            stamp,
            breadcrumbs: self.breadcrumbs(path),
        })
    }

    /// Run a search over part or all of the site.
    ///
    /// # Errors
    ///
    /// Returns `SiteError::PageNotFound` if a [`SearchScope::ThisArea`] path
    /// is unknown, or `SiteError::Search` if indexing fails.
    pub fn search(
        &self,
        engine: &SearchEngine,
        query: &str,
        scope: &SearchScope,
    ) -> Result<SearchOutcome, SiteError> {
        let start = match scope {
            SearchScope::EntireSite => self.root(),
            SearchScope::ThisArea(path) => self
                .node(path)
                .ok_or_else(|| SiteError::PageNotFound(path.clone()))?,
        };
        Ok(engine.search(query, &start)?)
    }
}

#[cfg(test)]
mod tests {
    static_assertions::assert_impl_all!(super::Site: Send, Sync);

    use std::fs;
    use std::thread;
    use std::time::{Duration, SystemTime};

    use arbor_search::{SearchConfig, SearchError, UNCACHEABLE};
    use pretty_assertions::assert_eq;

    use super::*;

    fn write(root: &Path, rel: &str, content: &str) {
        let path = root.join(rel);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).unwrap();
        }
        fs::write(path, content).unwrap();
    }

    fn touch(root: &Path, rel: &str, secs_after_epoch: u64) {
        let file = fs::File::options().write(true).open(root.join(rel)).unwrap();
        file.set_modified(SystemTime::UNIX_EPOCH + Duration::from_secs(secs_after_epoch))
            .unwrap();
    }

    fn site(root: &Path) -> Site {
        Site::new(SiteConfig {
            source_dir: root.to_path_buf(),
            meta_filename: "meta.yaml".to_owned(),
        })
    }

    fn engine() -> SearchEngine {
        SearchEngine::new(SearchConfig::default())
    }

    fn urls(outcome: &SearchOutcome) -> Vec<&str> {
        let mut urls: Vec<_> = outcome.results.iter().map(|r| r.url.as_str()).collect();
        urls.sort_unstable();
        urls
    }

    /// Home ─┬─ Guide ─┬─ Setup
    ///       │         └─ Deploy
    ///       └─ About
    fn sample_docs() -> tempfile::TempDir {
        let temp = tempfile::tempdir().unwrap();
        let root = temp.path();
        write(root, "index.md", "# Home\n\nWelcome to the docs.\n");
        write(root, "about.md", "# About\n\nWho maintains the docs.\n");
        write(root, "guide/index.md", "# Guide\n\nStart here to deploy.\n");
        write(root, "guide/setup.md", "# Setup\n\nInstall the server.\n");
        write(root, "guide/deploy.md", "# Deploy\n\nDeploy the server.\n");
        temp
    }

    #[test]
    fn test_render_page() {
        let docs = sample_docs();
        let site = site(docs.path());

        let page = site.render("/guide/setup").unwrap();

        assert_eq!(page.path, "guide/setup");
        assert_eq!(page.title.as_deref(), Some("Setup"));
        assert!(page.html.contains("<p>Install the server.</p>"));
        assert!(page.stamp > 0);
        assert_eq!(page.breadcrumbs.len(), 2);
        assert_eq!(page.breadcrumbs[1].path, "guide");
    }

    #[test]
    fn test_render_unknown_page() {
        let docs = sample_docs();
        let result = site(docs.path()).render("missing");
        assert!(matches!(result, Err(SiteError::PageNotFound(p)) if p == "missing"));
    }

    #[test]
    fn test_render_deleted_source_fails() {
        let docs = sample_docs();
        let site = site(docs.path());
        site.reload_if_needed();
        fs::remove_file(docs.path().join("about.md")).unwrap();

        let result = site.render("about");

        assert!(matches!(result, Err(SiteError::Render(_))));
    }

    #[test]
    fn test_render_sitemap() {
        let docs = sample_docs();
        let page = site(docs.path()).render("_sitemap").unwrap();

        assert!(page.html.contains("<a href=\"/guide/setup\">Setup</a>"));
        assert_eq!(page.title.as_deref(), Some("Sitemap"));
    }

    #[test]
    fn test_navigation() {
        let docs = sample_docs();
        let nav = site(docs.path()).navigation();

        let titles: Vec<_> = nav.iter().map(|n| n.title.as_str()).collect();
        assert_eq!(titles, vec!["Guide", "About"]);
        let guide_children: Vec<_> = nav[0].children.iter().map(|n| n.title.as_str()).collect();
        assert_eq!(guide_children, vec!["Deploy", "Setup"]);
    }

    #[test]
    fn test_root_children_end_with_sitemap() {
        let docs = sample_docs();
        let children = site(docs.path()).root().children();

        let ids: Vec<_> = children.iter().map(|c| c.url()).collect();
        assert_eq!(ids, vec!["/guide", "/about", "/_sitemap"]);
    }

    #[test]
    fn test_search_entire_site() {
        let docs = sample_docs();
        let site = site(docs.path());

        let outcome = site
            .search(&engine(), "server", &SearchScope::EntireSite)
            .unwrap();

        assert_eq!(urls(&outcome), vec!["/guide/deploy", "/guide/setup"]);
    }

    #[test]
    fn test_search_this_area() {
        let docs = sample_docs();
        let site = site(docs.path());

        let all = site
            .search(&engine(), "docs", &SearchScope::EntireSite)
            .unwrap();
        let area = site
            .search(&engine(), "docs", &SearchScope::ThisArea("/about".to_owned()))
            .unwrap();

        assert_eq!(urls(&all), vec!["/", "/about"]);
        assert_eq!(urls(&area), vec!["/about"]);
    }

    #[test]
    fn test_search_unknown_area() {
        let docs = sample_docs();
        let result = site(docs.path()).search(
            &engine(),
            "x",
            &SearchScope::ThisArea("nope".to_owned()),
        );
        assert!(matches!(result, Err(SiteError::PageNotFound(_))));
    }

    #[test]
    fn test_search_never_returns_sitemap() {
        let docs = sample_docs();
        let outcome = site(docs.path())
            .search(&engine(), "sitemap", &SearchScope::EntireSite)
            .unwrap();
        assert!(outcome.results.is_empty());
        assert!(outcome.no_matches);
    }

    #[test]
    fn test_search_excluded_page_children_still_found() {
        let temp = tempfile::tempdir().unwrap();
        let root = temp.path();
        write(root, "index.md", "# Home");
        write(root, "private/meta.yaml", "search: exclude\n");
        write(root, "private/index.md", "# Private\n\nneedle\n");
        write(root, "private/child.md", "# Child\n\nneedle\n");

        let outcome = site(root)
            .search(&engine(), "needle", &SearchScope::EntireSite)
            .unwrap();

        assert_eq!(urls(&outcome), vec!["/private/child"]);
    }

    #[test]
    fn test_search_title_only_ignores_body() {
        let temp = tempfile::tempdir().unwrap();
        let root = temp.path();
        write(root, "index.md", "# Home");
        write(
            root,
            "notes.md",
            "---\nsearch: title-only\nkeywords: changelog\n---\n# Release Notes\n\nbody-only-word\n",
        );

        let site = site(root);
        let by_title = site
            .search(&engine(), "release", &SearchScope::EntireSite)
            .unwrap();
        let by_keyword = site
            .search(&engine(), "changelog", &SearchScope::EntireSite)
            .unwrap();
        let by_body = site
            .search(&engine(), "body-only-word", &SearchScope::EntireSite)
            .unwrap();

        assert_eq!(urls(&by_title), vec!["/notes"]);
        assert_eq!(urls(&by_keyword), vec!["/notes"]);
        assert!(by_body.results.is_empty());
    }

    #[test]
    fn test_search_cyclic_includes_terminate() {
        let temp = tempfile::tempdir().unwrap();
        let root = temp.path();
        write(root, "index.md", "# Home");
        write(root, "a.md", "---\ninclude: [b]\n---\n# A\n\nshared term\n");
        write(root, "b.md", "---\ninclude: [a]\n---\n# B\n\nshared term\n");

        let outcome = site(root)
            .search(&engine(), "shared", &SearchScope::EntireSite)
            .unwrap();

        assert_eq!(urls(&outcome), vec!["/a", "/b"]);
    }

    #[test]
    fn test_search_include_reaches_outside_area() {
        let temp = tempfile::tempdir().unwrap();
        let root = temp.path();
        write(root, "index.md", "# Home");
        write(root, "guide/index.md", "---\ninclude: [faq]\n---\n# Guide\n");
        write(root, "faq.md", "# FAQ\n\nfrequently asked\n");

        let outcome = site(root)
            .search(
                &engine(),
                "frequently",
                &SearchScope::ThisArea("guide".to_owned()),
            )
            .unwrap();

        assert_eq!(urls(&outcome), vec!["/faq"]);
    }

    #[test]
    fn test_search_cached_until_mtime_changes() {
        let docs = sample_docs();
        let site = site(docs.path());
        let engine = engine();
        touch(docs.path(), "about.md", 1_000);

        site.search(&engine, "docs", &SearchScope::EntireSite)
            .unwrap();
        write(docs.path(), "about.md", "# About\n\nfresh words\n");
        touch(docs.path(), "about.md", 1_000);

        let stale = site
            .search(&engine, "fresh", &SearchScope::EntireSite)
            .unwrap();
        assert!(stale.results.is_empty());

        // Changed since load: indexed on the fly, not cached
        touch(docs.path(), "about.md", 2_000);
        let fresh = site
            .search(&engine, "fresh", &SearchScope::EntireSite)
            .unwrap();
        assert_eq!(urls(&fresh), vec!["/about"]);
        assert_eq!(engine.rebuild_count(&"/about".into()), 1);

        site.invalidate();
        let reloaded = site
            .search(&engine, "fresh", &SearchScope::EntireSite)
            .unwrap();
        assert_eq!(urls(&reloaded), vec!["/about"]);
        assert_eq!(engine.rebuild_count(&"/about".into()), 2);
    }

    #[test]
    fn test_front_matter_change_reindexed_after_reload() {
        let docs = sample_docs();
        let site = site(docs.path());
        let engine = engine();
        write(docs.path(), "about.md", "---\nkeywords: alpha\n---\n# About\n");
        touch(docs.path(), "about.md", 1_000);

        let before = site
            .search(&engine, "alpha", &SearchScope::EntireSite)
            .unwrap();
        assert_eq!(urls(&before), vec!["/about"]);

        write(docs.path(), "about.md", "---\nkeywords: omega\n---\n# About\n");
        touch(docs.path(), "about.md", 2_000);
        site.search(&engine, "omega", &SearchScope::EntireSite)
            .unwrap();

        site.invalidate();
        let omega = site
            .search(&engine, "omega", &SearchScope::EntireSite)
            .unwrap();
        let alpha = site
            .search(&engine, "alpha", &SearchScope::EntireSite)
            .unwrap();

        assert_eq!(
            site.node("about").unwrap().keywords().as_deref(),
            Some("omega")
        );
        assert_eq!(urls(&omega), vec!["/about"]);
        assert!(alpha.results.is_empty());
    }

    #[test]
    fn test_sidecar_change_reindexed_after_reload() {
        let temp = tempfile::tempdir().unwrap();
        let root = temp.path();
        write(root, "index.md", "# Home");
        write(root, "team/index.md", "# Team\n");
        write(root, "team/meta.yaml", "description: alpha\n");
        touch(root, "team/index.md", 1_000);
        touch(root, "team/meta.yaml", 1_000);
        let site = site(root);
        let engine = engine();

        let before = site
            .search(&engine, "alpha", &SearchScope::EntireSite)
            .unwrap();
        assert_eq!(urls(&before), vec!["/team"]);

        write(root, "team/meta.yaml", "description: omega\n");
        touch(root, "team/meta.yaml", 2_000);
        site.search(&engine, "omega", &SearchScope::EntireSite)
            .unwrap();

        site.invalidate();
        let omega = site
            .search(&engine, "omega", &SearchScope::EntireSite)
            .unwrap();
        let alpha = site
            .search(&engine, "alpha", &SearchScope::EntireSite)
            .unwrap();

        assert_eq!(urls(&omega), vec!["/team"]);
        assert!(alpha.results.is_empty());
        assert_eq!(engine.rebuild_count(&"/team".into()), 2);
    }

    #[test]
    fn test_uncacheable_page_not_cached() {
        let temp = tempfile::tempdir().unwrap();
        let root = temp.path();
        write(root, "index.md", "# Home");
        write(root, "live.md", "---\ncache: false\n---\n# Live\n\nticker\n");
        let site = site(root);
        let engine = engine();

        let live = site.node("live").unwrap();
        assert_eq!(live.freshness_stamp(), UNCACHEABLE);

        site.search(&engine, "ticker", &SearchScope::EntireSite)
            .unwrap();
        write(root, "live.md", "---\ncache: false\n---\n# Live\n\nchanged\n");
        let outcome = site
            .search(&engine, "changed", &SearchScope::EntireSite)
            .unwrap();

        assert_eq!(urls(&outcome), vec!["/live"]);
        assert_eq!(engine.rebuild_count(&"/live".into()), 0);
    }

    #[test]
    fn test_search_render_error_propagates() {
        let docs = sample_docs();
        let site = site(docs.path());
        site.reload_if_needed();
        fs::remove_file(docs.path().join("guide/setup.md")).unwrap();

        let result = site.search(&engine(), "server", &SearchScope::EntireSite);

        assert!(matches!(
            result,
            Err(SiteError::Search(SearchError::Render { .. }))
        ));
    }

    #[test]
    fn test_invalidate_picks_up_new_pages() {
        let docs = sample_docs();
        let site = site(docs.path());
        assert!(site.node("new").is_none());

        write(docs.path(), "new.md", "# New");
        assert!(site.node("new").is_none());

        site.invalidate();
        assert_eq!(site.node("new").unwrap().title().as_deref(), Some("New"));
    }

    #[test]
    fn test_concurrent_reload_loads_once() {
        let docs = sample_docs();
        let site = Arc::new(site(docs.path()));

        let handles: Vec<_> = (0..8)
            .map(|_| {
                let site = Arc::clone(&site);
                thread::spawn(move || site.reload_if_needed())
            })
            .collect();
        let states: Vec<_> = handles.into_iter().map(|h| h.join().unwrap()).collect();

        for state in &states[1..] {
            assert!(Arc::ptr_eq(&states[0], state));
        }
        assert_eq!(states[0].pages().len(), 5);
    }
}
