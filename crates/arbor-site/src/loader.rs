//! Building [`SiteState`] from a source directory.

use std::fs;
use std::path::Path;
use std::time::{SystemTime, UNIX_EPOCH};

use crate::markdown::{extract_h1_title, titlecase_from_slug};
use crate::metadata::{PageMetadata, parse_metadata, split_front_matter};
use crate::page::{Page, source_stamp};
use crate::scanner::{Scanner, SourceRef};
use crate::site_state::{SiteState, SiteStateBuilder};

/// Title of a root page that has no title of its own.
const HOME_TITLE: &str = "Home";

/// Scan `source_dir` and build the page hierarchy.
///
/// Unreadable files and malformed metadata are logged and skipped; loading
/// itself never fails. A missing source directory yields a site with only a
/// virtual root.
pub(crate) fn load_state(source_dir: &Path, meta_filename: &str) -> SiteState {
    let mut refs = Scanner::new(source_dir.to_path_buf(), meta_filename.to_owned()).scan();

    // Parents before children
    refs.sort_by(|a, b| {
        depth(&a.url_path)
            .cmp(&depth(&b.url_path))
            .then_with(|| a.url_path.cmp(&b.url_path))
    });

    let mut builder = SiteStateBuilder::new();
    for source in refs {
        let parent = if source.url_path.is_empty() {
            None
        } else {
            Some(find_parent(&builder, &source.url_path))
        };
        let page = build_page(source);
        builder.add_page(page, parent);
    }

    let root = match builder.index_of("") {
        Some(root) => root,
        None => builder.add_page(virtual_root(), None),
    };

    builder.build(root, now_ms())
}

/// Nearest existing ancestor of `url_path`, falling back to the root.
fn find_parent(builder: &SiteStateBuilder, url_path: &str) -> usize {
    let mut current = url_path;
    while let Some((parent, _)) = current.rsplit_once('/') {
        if let Some(index) = builder.index_of(parent) {
            return index;
        }
        current = parent;
    }
    // Root is always scanned first when the source dir exists
    builder.index_of("").unwrap_or(0)
}

fn build_page(source: SourceRef) -> Page {
    // Stat before reading so a concurrent edit leaves the stamp behind the content
    let loaded_stamp = source_stamp(source.content_path.as_deref(), source.meta_path.as_deref());

    let sidecar = source
        .meta_path
        .as_deref()
        .map(|path| read_metadata(path, &source.url_path))
        .unwrap_or_default();

    let content = source.content_path.as_deref().and_then(|path| {
        fs::read_to_string(path)
            .inspect_err(|e| {
                tracing::warn!(path = %path.display(), error = %e, "Failed to read page, skipping metadata");
            })
            .ok()
    });

    let (front, body) = match content.as_deref() {
        Some(content) => {
            let (yaml, body) = split_front_matter(content);
            let front = yaml
                .map(|yaml| parse_or_warn(yaml, &source.url_path))
                .unwrap_or_default();
            (front, Some(body))
        }
        None => (PageMetadata::default(), None),
    };

    let metadata = sidecar.merged(front);
    let title = metadata
        .title
        .clone()
        .or_else(|| body.and_then(extract_h1_title))
        .unwrap_or_else(|| slug_title(&source.url_path));

    Page {
        title,
        path: source.url_path,
        content_path: source.content_path,
        meta_path: source.meta_path,
        metadata,
        is_landing: source.is_landing,
        loaded_stamp,
    }
}

fn read_metadata(path: &Path, url_path: &str) -> PageMetadata {
    match fs::read_to_string(path) {
        Ok(content) => parse_or_warn(&content, url_path),
        Err(e) => {
            tracing::warn!(path = %url_path, error = %e, "Failed to read metadata file, skipping");
            PageMetadata::default()
        }
    }
}

fn parse_or_warn(yaml: &str, url_path: &str) -> PageMetadata {
    parse_metadata(yaml)
        .inspect_err(|e| {
            tracing::warn!(path = %url_path, error = %e, "Failed to parse metadata, skipping");
        })
        .unwrap_or_default()
}

fn slug_title(url_path: &str) -> String {
    match url_path.rsplit('/').next() {
        Some(slug) if !slug.is_empty() => titlecase_from_slug(slug),
        _ => HOME_TITLE.to_owned(),
    }
}

fn virtual_root() -> Page {
    Page {
        title: HOME_TITLE.to_owned(),
        path: String::new(),
        content_path: None,
        meta_path: None,
        metadata: PageMetadata::default(),
        is_landing: true,
        loaded_stamp: 0,
    }
}

fn depth(url_path: &str) -> usize {
    if url_path.is_empty() {
        0
    } else {
        url_path.matches('/').count() + 1
    }
}

fn now_ms() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .ok()
        .and_then(|d| i64::try_from(d.as_millis()).ok())
        .unwrap_or(0)
}
