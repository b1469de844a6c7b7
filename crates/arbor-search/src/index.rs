//! Per-node word index.
//!
//! A [`NodeIndex`] maps each lower-cased token found in a node to its
//! accumulated weight. Every field contributes its tokens at a fixed weight
//! and repeated tokens add up:
//!
//! | Field       | Weight |
//! |-------------|--------|
//! | keywords    | 10     |
//! | description | 5      |
//! | title       | 5      |
//! | body        | 1      |
//! | author      | 1      |
//!
//! Tokenization splits on the space character only. Tabs and newlines stay
//! inside tokens, which matters because matching is substring-based.

use std::collections::HashMap;
use std::sync::LazyLock;

use regex::Regex;

use crate::error::NodeError;
use crate::node::ContentNode;

/// Weight of a keyword token.
pub const KEYWORDS_WEIGHT: u64 = 10;
/// Weight of a description token.
pub const DESCRIPTION_WEIGHT: u64 = 5;
/// Weight of a title token.
pub const TITLE_WEIGHT: u64 = 5;
/// Weight of a body token.
pub const BODY_WEIGHT: u64 = 1;
/// Weight of an author token.
pub const AUTHOR_WEIGHT: u64 = 1;

/// Anything between angle brackets.
static MARKUP_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"<[^>]*>").unwrap());

/// Remove markup tags from rendered text.
///
/// Tags are removed, not replaced, so `<p>a</p><p>b</p>` becomes `ab`.
#[must_use]
pub fn strip_markup(html: &str) -> String {
    MARKUP_RE.replace_all(html, "").into_owned()
}

/// Metadata fields of a node, captured once per index build.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct NodeFields {
    /// Keywords.
    pub keywords: Option<String>,
    /// Description.
    pub description: Option<String>,
    /// Title.
    pub title: Option<String>,
    /// Author.
    pub author: Option<String>,
}

impl NodeFields {
    /// Read the indexed metadata fields from a node.
    #[must_use]
    pub fn of(node: &dyn ContentNode) -> Self {
        Self {
            keywords: node.keywords(),
            description: node.description(),
            title: node.title(),
            author: node.author(),
        }
    }

    /// Combined character length of all present fields.
    fn char_len(&self) -> usize {
        [&self.keywords, &self.description, &self.title, &self.author]
            .into_iter()
            .flatten()
            .map(|field| field.chars().count())
            .sum()
    }
}

/// Word weights of one node at one freshness stamp.
///
/// Immutable once built. A stale index is replaced, never patched.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NodeIndex {
    stamp: i64,
    weights: HashMap<String, u64>,
    size: usize,
}

impl NodeIndex {
    /// Render `node` and index it.
    ///
    /// # Errors
    ///
    /// Returns the node's render error unchanged.
    pub fn build(node: &dyn ContentNode, stamp: i64) -> Result<Self, NodeError> {
        let body = node.render_body()?;
        Ok(Self::from_parts(stamp, &NodeFields::of(node), &body))
    }

    /// Index already rendered content.
    ///
    /// `body` is the rendered markup; tags are stripped before tokenizing,
    /// while `size` counts the markup as rendered.
    #[must_use]
    pub fn from_parts(stamp: i64, fields: &NodeFields, body: &str) -> Self {
        let mut weights = HashMap::new();

        let weighted = [
            (fields.keywords.as_deref(), KEYWORDS_WEIGHT),
            (fields.description.as_deref(), DESCRIPTION_WEIGHT),
            (fields.title.as_deref(), TITLE_WEIGHT),
            (fields.author.as_deref(), AUTHOR_WEIGHT),
        ];
        for (text, weight) in weighted {
            if let Some(text) = text {
                add_tokens(&mut weights, text, weight);
            }
        }
        add_tokens(&mut weights, &strip_markup(body), BODY_WEIGHT);

        Self {
            stamp,
            weights,
            size: body.chars().count() + fields.char_len(),
        }
    }

    /// Freshness stamp this index was built from.
    #[must_use]
    pub fn stamp(&self) -> i64 {
        self.stamp
    }

    /// Token weights.
    #[must_use]
    pub fn weights(&self) -> &HashMap<String, u64> {
        &self.weights
    }

    /// Accumulated weight of one exact token (0 if absent).
    #[must_use]
    pub fn weight(&self, token: &str) -> u64 {
        self.weights.get(token).copied().unwrap_or(0)
    }

    /// Aggregate content length used for score normalization.
    #[must_use]
    pub fn size(&self) -> usize {
        self.size
    }
}

/// Split `text` on spaces and add each lower-cased token at `weight`.
fn add_tokens(weights: &mut HashMap<String, u64>, text: &str, weight: u64) {
    for token in text.split(' ').filter(|t| !t.is_empty()) {
        *weights.entry(token.to_lowercase()).or_insert(0) += weight;
    }
}
