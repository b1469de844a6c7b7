//! Query matching and relevance scoring.
//!
//! Matching is a strict AND: a node matches only if every term occurs in at
//! least one indexed token. Occurrence is substring containment, so the term
//! `cat` matches the token `category`.

use std::collections::HashMap;

use crate::query::Query;

/// Weighted occurrence count of `term` across all indexed tokens.
///
/// Each token contributes the number of non-overlapping occurrences of
/// `term` inside it, times the token's weight.
#[must_use]
pub fn match_weight(weights: &HashMap<String, u64>, term: &str) -> u64 {
    if term.is_empty() {
        return 0;
    }
    weights
        .iter()
        .map(|(token, weight)| token.matches(term).count() as u64 * weight)
        .sum()
}

/// Sum of [`match_weight`] over all terms, or 0 if any term is missing.
#[must_use]
pub fn total_matches(weights: &HashMap<String, u64>, query: &Query) -> u64 {
    let mut total = 0;
    for term in query.terms() {
        let weight = match_weight(weights, term);
        if weight == 0 {
            return 0;
        }
        total += weight;
    }
    total
}

/// Normalize a match total by the natural log of the content size.
///
/// The divisor is exactly `1.0` for an empty node rather than `ln(1) = 0`.
/// A node of size 1 still divides by `ln(1)` and scores infinity.
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn probability(total_matches: u64, size: usize) -> f64 {
    let divisor = if size == 0 { 1.0 } else { (size as f64).ln() };
    total_matches as f64 / divisor
}

#[cfg(test)]
mod tests {
    use super::*;

    fn weights(entries: &[(&str, u64)]) -> HashMap<String, u64> {
        entries.iter().map(|&(t, w)| (t.to_owned(), w)).collect()
    }

    #[test]
    fn test_match_weight_exact_token() {
        let w = weights(&[("alpha", 7), ("page", 5), ("beta", 1)]);
        assert_eq!(match_weight(&w, "alpha"), 7);
    }

    #[test]
    fn test_match_weight_substring() {
        let w = weights(&[("category", 2), ("cat", 1), ("dog", 9)]);
        assert_eq!(match_weight(&w, "cat"), 3);
    }

    #[test]
    fn test_match_weight_counts_occurrences_within_token() {
        let w = weights(&[("abab", 5)]);
        assert_eq!(match_weight(&w, "ab"), 10);
    }

    #[test]
    fn test_match_weight_non_overlapping() {
        let w = weights(&[("aaa", 1)]);
        assert_eq!(match_weight(&w, "aa"), 1);
    }

    #[test]
    fn test_match_weight_missing_term() {
        let w = weights(&[("alpha", 7)]);
        assert_eq!(match_weight(&w, "zzz"), 0);
    }

    #[test]
    fn test_match_weight_empty_term() {
        let w = weights(&[("alpha", 7)]);
        assert_eq!(match_weight(&w, ""), 0);
    }

    #[test]
    fn test_total_matches_sums_terms() {
        let w = weights(&[("alpha", 7), ("page", 5), ("beta", 1)]);
        let query = Query::from_terms(["alpha", "beta"]);
        assert_eq!(total_matches(&w, &query), 8);
    }

    #[test]
    fn test_total_matches_is_strict_and() {
        let w = weights(&[("alpha", 7), ("page", 5)]);
        let query = Query::from_terms(["alpha", "page", "zzz"]);
        assert_eq!(total_matches(&w, &query), 0);
    }

    #[test]
    fn test_total_matches_repeated_term_counts_twice() {
        let w = weights(&[("alpha", 7)]);
        let query = Query::from_terms(["alpha", "alpha"]);
        assert_eq!(total_matches(&w, &query), 14);
    }

    #[test]
    fn test_total_matches_empty_query() {
        let w = weights(&[("alpha", 7)]);
        assert_eq!(total_matches(&w, &Query::default()), 0);
    }

    #[test]
    fn test_probability_log_normalized() {
        let p = probability(7, 26);
        assert!((p - 7.0 / 26f64.ln()).abs() < 1e-12);
    }

    #[test]
    #[allow(clippy::float_cmp)]
    fn test_probability_empty_size_divides_by_one() {
        assert_eq!(probability(3, 0), 3.0);
    }

    #[test]
    fn test_probability_larger_node_scores_lower() {
        assert!(probability(5, 100) > probability(5, 10_000));
    }
}
