//! Markdown page tree for Arbor.
//!
//! This crate turns a directory of markdown files into a searchable page
//! tree:
//! - [`Site`]: lazily loaded page hierarchy with navigation, breadcrumbs,
//!   rendering and search
//! - [`PageNode`] / [`SitemapNode`]: [`ContentNode`](arbor_search::ContentNode)
//!   views consumed by the search engine
//! - [`PageMetadata`]: YAML front matter and sidecar metadata
//!
//! # Page conventions
//!
//! - `index.md` is its directory's landing page; other `.md` files are pages
//! - directories without `index.md` become virtual pages
//! - entries starting with `.` or `_` are skipped
//!
//! # Example
//!
//! ```ignore
//! use arbor_search::{SearchConfig, SearchEngine};
//! use arbor_site::{SearchScope, Site, SiteConfig};
//!
//! let site = Site::new(SiteConfig::default());
//! let engine = SearchEngine::new(SearchConfig::default());
//!
//! let outcome = site.search(&engine, "install", &SearchScope::EntireSite)?;
//! ```

mod error;
mod loader;
mod markdown;
mod metadata;
mod node;
mod page;
mod scanner;
mod site;
mod site_state;

pub use error::SiteError;
pub use markdown::{escape_html, render_markdown};
pub use metadata::{PageMetadata, SearchMode};
pub use node::{PageNode, SITEMAP_PATH, SitemapNode, TitleOnlySearch};
pub use page::Page;
pub use site::{RenderedPage, SearchScope, Site, SiteConfig};
pub use site_state::{BreadcrumbItem, NavItem, SiteState};
