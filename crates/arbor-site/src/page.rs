//! Page data and on-disk content access.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::time::UNIX_EPOCH;

use arbor_search::{NodeError, UNCACHEABLE};

use crate::markdown::{escape_html, render_markdown};
use crate::metadata::{PageMetadata, split_front_matter};

/// One page of the site.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Page {
    /// Display title (metadata, first H1, or slug).
    pub title: String,
    /// URL path without leading slash (`""` for the root).
    pub path: String,
    /// Markdown source file. `None` for virtual pages.
    pub content_path: Option<PathBuf>,
    /// Sidecar metadata file, if any.
    pub meta_path: Option<PathBuf>,
    /// Merged page metadata.
    pub metadata: PageMetadata,
    /// True for directory landing pages.
    pub is_landing: bool,
    /// Source modification stamp taken when the page was loaded.
    ///
    /// Title and metadata were parsed from the sources at this stamp.
    pub loaded_stamp: i64,
}

impl Page {
    /// URL with leading slash.
    #[must_use]
    pub fn url(&self) -> String {
        format!("/{}", self.path)
    }

    /// True if the page has a markdown source.
    #[must_use]
    pub fn has_content(&self) -> bool {
        self.content_path.is_some()
    }

    /// Render the page body to HTML.
    ///
    /// Virtual pages render as a heading with their title.
    ///
    /// # Errors
    ///
    /// Returns [`NodeError::NotFound`] if the source file is gone, or
    /// [`NodeError::Io`] if it cannot be read.
    pub fn render_html(&self) -> Result<String, NodeError> {
        let Some(content_path) = &self.content_path else {
            return Ok(format!("<h1>{}</h1>\n", escape_html(&self.title)));
        };

        let content = read_source(content_path)?;
        let (_, body) = split_front_matter(&content);
        Ok(render_markdown(body))
    }

    /// Freshness stamp: latest source modification time in milliseconds.
    ///
    /// Pages with `cache: false`, pages whose sources cannot be inspected,
    /// and pages whose sources changed since they were loaded are
    /// [`UNCACHEABLE`]. The last case keeps an index built from stale
    /// metadata out of the cache until the site is reloaded.
    #[must_use]
    pub fn freshness_stamp(&self) -> i64 {
        if !self.metadata.cacheable() {
            return UNCACHEABLE;
        }

        let stamp = source_stamp(self.content_path.as_deref(), self.meta_path.as_deref());
        if stamp != self.loaded_stamp {
            return UNCACHEABLE;
        }
        stamp
    }
}

/// Latest modification time of a page's sources in milliseconds.
///
/// `0` when there are no sources, [`UNCACHEABLE`] if one cannot be inspected.
pub(crate) fn source_stamp(content_path: Option<&Path>, meta_path: Option<&Path>) -> i64 {
    let mut stamp = 0;
    for path in [content_path, meta_path].into_iter().flatten() {
        match mtime_ms(path) {
            Some(mtime) => stamp = stamp.max(mtime),
            None => return UNCACHEABLE,
        }
    }
    stamp
}

/// Read a markdown source file.
fn read_source(path: &Path) -> Result<String, NodeError> {
    fs::read_to_string(path).map_err(|e| match e.kind() {
        io::ErrorKind::NotFound => NodeError::NotFound(path.display().to_string()),
        _ => NodeError::Io(e),
    })
}

/// Modification time in milliseconds since the Unix epoch.
fn mtime_ms(path: &Path) -> Option<i64> {
    let modified = fs::metadata(path).ok()?.modified().ok()?;
    let millis = modified.duration_since(UNIX_EPOCH).ok()?.as_millis();
    i64::try_from(millis).ok()
}
