//! Search results and aggregation.

use serde::{Serialize, Serializer};

use crate::node::ContentNode;
use crate::query::Query;

/// One ranked hit.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchResult {
    /// URL of the matching node.
    pub url: String,
    /// Relevance score; higher is better.
    ///
    /// Infinite for a one-character node (`ln(1) = 0`). Serialized as
    /// `f64::MAX` since JSON has no infinity.
    #[serde(serialize_with = "serialize_finite")]
    pub probability: f64,
    /// Node title.
    pub title: Option<String>,
    /// Node description.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Author display name.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub author: Option<String>,
    /// Link to the author.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub author_url: Option<String>,
}

/// Write a score as a finite number, clamping infinity to `f64::MAX`.
#[allow(clippy::trivially_copy_pass_by_ref)]
fn serialize_finite<S: Serializer>(value: &f64, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_f64(value.min(f64::MAX))
}

impl SearchResult {
    /// Build a result from a node's metadata.
    #[must_use]
    pub fn for_node(node: &dyn ContentNode, probability: f64) -> Self {
        Self {
            url: node.url(),
            probability,
            title: node.title(),
            description: node.description(),
            author: node.author(),
            author_url: node.author_url(),
        }
    }
}

/// Outcome of one top-level search.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchOutcome {
    /// Terms the raw query was split into.
    pub terms: Vec<String>,
    /// Results, best first.
    pub results: Vec<SearchResult>,
    /// True when terms were supplied but nothing matched.
    pub no_matches: bool,
}

impl SearchOutcome {
    /// Rank collected results and build the outcome.
    ///
    /// Sorting is stable: equal scores keep discovery order.
    #[must_use]
    pub fn ranked(query: Query, mut results: Vec<SearchResult>) -> Self {
        results.sort_by(|a, b| b.probability.total_cmp(&a.probability));
        let terms = query.into_terms();
        let no_matches = !terms.is_empty() && results.is_empty();
        Self {
            terms,
            results,
            no_matches,
        }
    }

    /// Keep at most `max` results.
    pub fn truncate(&mut self, max: usize) {
        self.results.truncate(max);
    }
}
