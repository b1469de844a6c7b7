//! Page discovery by filesystem walking.
//!
//! The scanner only locates files. Reading content and metadata happens in
//! the loader.

use std::fs;
use std::path::{Path, PathBuf};

/// Source files of one page.
#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) struct SourceRef {
    /// URL path without leading slash (`""` for the root).
    pub url_path: String,
    /// Markdown file, absent for virtual pages.
    pub content_path: Option<PathBuf>,
    /// Sidecar metadata file, if present.
    pub meta_path: Option<PathBuf>,
    /// True for directory landing pages.
    pub is_landing: bool,
}

/// Walks a source directory and collects [`SourceRef`]s.
pub(crate) struct Scanner {
    source_dir: PathBuf,
    meta_filename: String,
}

impl Scanner {
    pub(crate) fn new(source_dir: PathBuf, meta_filename: String) -> Self {
        Self {
            source_dir,
            meta_filename,
        }
    }

    /// Scan the source directory.
    ///
    /// Returns an empty list if the directory doesn't exist.
    pub(crate) fn scan(&self) -> Vec<SourceRef> {
        let mut refs = Vec::new();
        if self.source_dir.is_dir() {
            self.scan_directory(&self.source_dir, "", &mut refs);
        }
        refs
    }

    /// Collect refs below `dir_path`. Returns true if any page was found.
    ///
    /// A directory becomes a landing page when it has an `index.md`, a
    /// sidecar file, or any page below it.
    fn scan_directory(&self, dir_path: &Path, url_prefix: &str, refs: &mut Vec<SourceRef>) -> bool {
        let Ok(entries) = fs::read_dir(dir_path) else {
            return false;
        };

        let mut entries: Vec<_> = entries
            .filter_map(Result::ok)
            .map(|e| {
                let is_dir = e.file_type().is_ok_and(|t| t.is_dir());
                let name = e.file_name().to_string_lossy().into_owned();
                (e.path(), is_dir, name)
            })
            .collect();
        entries.sort_by(|a, b| a.2.cmp(&b.2));

        let mut index_md_path = None;
        let mut meta_path = None;
        let mut found_children = false;

        for (path, is_dir, name) in entries {
            if name.starts_with('.') || name.starts_with('_') {
                continue;
            }

            if is_dir {
                let child_url = join_url(url_prefix, &name);
                found_children |= self.scan_directory(&path, &child_url, refs);
            } else if path.extension().is_some_and(|e| e == "md") {
                if name.eq_ignore_ascii_case("index.md") {
                    index_md_path = Some(path);
                } else {
                    refs.push(SourceRef {
                        url_path: file_path_to_url(Path::new(&name), url_prefix),
                        content_path: Some(path),
                        meta_path: None,
                        is_landing: false,
                    });
                    found_children = true;
                }
            } else if name == self.meta_filename {
                meta_path = Some(path);
            }
        }

        let is_root = url_prefix.is_empty();
        if is_root || index_md_path.is_some() || meta_path.is_some() || found_children {
            refs.push(SourceRef {
                url_path: url_prefix.to_owned(),
                content_path: index_md_path,
                meta_path,
                is_landing: true,
            });
            return true;
        }

        false
    }
}

fn join_url(base: &str, segment: &str) -> String {
    if base.is_empty() {
        segment.to_owned()
    } else {
        format!("{base}/{segment}")
    }
}

/// Convert a markdown file path to a URL path below `base`.
///
/// - `index.md` -> `base`
/// - `guide.md` -> `base/guide`
pub(crate) fn file_path_to_url(rel_path: &Path, base: &str) -> String {
    let path_str = rel_path.to_string_lossy();
    let without_ext = path_str.strip_suffix(".md").unwrap_or(&path_str);

    let path_part = if without_ext == "index" {
        ""
    } else if let Some(without_index) = without_ext.strip_suffix("/index") {
        without_index
    } else {
        without_ext
    };

    match (base.is_empty(), path_part.is_empty()) {
        (true, _) => path_part.to_owned(),
        (false, true) => base.to_owned(),
        (false, false) => format!("{base}/{path_part}"),
    }
}
