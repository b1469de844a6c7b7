//! Page metadata from YAML front matter and sidecar files.
//!
//! Front matter sits at the top of a markdown file between `---` lines:
//!
//! ```markdown
//! ---
//! title: Install Guide
//! keywords: setup install
//! search: title-only
//! ---
//!
//! # Install
//! ```
//!
//! A sidecar file (`meta.yaml` by default) in a directory carries the same
//! fields for that directory's landing page. Front matter wins field by field.

use serde::{Deserialize, Deserializer};

use arbor_search::NodeError;

/// How a page takes part in search.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SearchMode {
    /// Full-text indexed.
    #[default]
    Default,
    /// Never returned; children are still searched.
    Exclude,
    /// Matched against title, description and keywords only.
    TitleOnly,
}

/// Metadata of one page.
///
/// All fields are optional. `None` means the field was not set.
#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct PageMetadata {
    /// Custom page title (overrides H1 extraction).
    pub title: Option<String>,
    /// Short description.
    pub description: Option<String>,
    /// Keywords, either a string or a list joined with spaces.
    #[serde(deserialize_with = "deserialize_keywords")]
    pub keywords: Option<String>,
    /// Author display name.
    pub author: Option<String>,
    /// Link to the author.
    pub author_url: Option<String>,
    /// Search participation.
    pub search: Option<SearchMode>,
    /// Whether the page's search index may be cached.
    pub cache: Option<bool>,
    /// URL paths of pages attached as extra children.
    pub include: Vec<String>,
}

impl PageMetadata {
    /// Overlay `other` on top of `self`, field by field.
    #[must_use]
    pub fn merged(self, other: Self) -> Self {
        Self {
            title: other.title.or(self.title),
            description: other.description.or(self.description),
            keywords: other.keywords.or(self.keywords),
            author: other.author.or(self.author),
            author_url: other.author_url.or(self.author_url),
            search: other.search.or(self.search),
            cache: other.cache.or(self.cache),
            include: if other.include.is_empty() {
                self.include
            } else {
                other.include
            },
        }
    }

    /// Effective search mode.
    #[must_use]
    pub fn search_mode(&self) -> SearchMode {
        self.search.unwrap_or_default()
    }

    /// Whether index caching is allowed (default `true`).
    #[must_use]
    pub fn cacheable(&self) -> bool {
        self.cache.unwrap_or(true)
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum KeywordsRaw {
    Text(String),
    List(Vec<String>),
}

fn deserialize_keywords<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(
        Option::<KeywordsRaw>::deserialize(deserializer)?.map(|raw| match raw {
            KeywordsRaw::Text(text) => text,
            KeywordsRaw::List(list) => list.join(" "),
        }),
    )
}

/// Parse metadata from YAML content.
///
/// Empty content yields default metadata.
///
/// # Errors
///
/// Returns [`NodeError::Metadata`] if the YAML is malformed.
pub fn parse_metadata(content: &str) -> Result<PageMetadata, NodeError> {
    let trimmed = content.trim();
    if trimmed.is_empty() {
        return Ok(PageMetadata::default());
    }
    serde_yaml::from_str(trimmed).map_err(|e| NodeError::Metadata(format!("Invalid YAML: {e}")))
}

/// Split markdown into its front matter block and the remaining body.
///
/// Returns `(None, content)` when the content does not start with a `---`
/// line or the block is never closed.
#[must_use]
pub fn split_front_matter(content: &str) -> (Option<&str>, &str) {
    let content = content.trim_start_matches('\u{feff}');
    let Some(after_opening) = content
        .strip_prefix("---\n")
        .or_else(|| content.strip_prefix("---\r\n"))
    else {
        return (None, content);
    };

    let mut pos = 0;
    for line in after_opening.split_inclusive('\n') {
        if line.trim_end_matches(['\r', '\n']) == "---" {
            let yaml = &after_opening[..pos];
            let body = &after_opening[pos + line.len()..];
            return (Some(yaml), body);
        }
        pos += line.len();
    }

    (None, content)
}
