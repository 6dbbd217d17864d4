//! "Did you mean" suggestions for queries without matches.

use crate::entry::fold_case;
use rapidfuzz::distance::jaro_winkler;

use super::index::SymbolIndex;

/// Minimum Jaro-Winkler similarity for a key to be suggested.
const MIN_SIMILARITY: f64 = 0.8;

/// A key close to the query, with its similarity in `0.0..=1.0`.
#[derive(Debug, Clone, PartialEq)]
pub struct Suggestion<'a> {
    pub key: &'a str,
    pub score: f64,
}

/// Keys most similar to `fragment`, best first. Ties keep index key order.
pub fn suggest<'a>(index: &'a SymbolIndex, fragment: &str, limit: usize) -> Vec<Suggestion<'a>> {
    let fragment = fold_case(fragment);
    if fragment.is_empty() || limit == 0 {
        return vec![];
    }

    let mut suggestions: Vec<_> = index
        .keys()
        .map(|key| Suggestion {
            key,
            score: jaro_winkler::similarity(fragment.chars(), key.chars()),
        })
        .filter(|s| s.score >= MIN_SIMILARITY)
        .collect();

    // sort_by is stable, so equal scores stay in key order
    suggestions.sort_by(|a, b| b.score.total_cmp(&a.score));
    suggestions.truncate(limit);
    suggestions
}
