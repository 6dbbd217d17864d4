//! Match classification and relevance.
//!
//! Every key that contains a query fragment falls into exactly one tier:
//! exact match, prefix match, or plain substring match. Tiers order results.

use serde::Serialize;
use std::fmt;

/// How a key matched a query fragment, ordered best first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum MatchKind {
    Exact,
    Prefix,
    Substring,
}

impl MatchKind {
    /// The tier after this one, in ranking order.
    pub(crate) const fn next(self) -> Option<Self> {
        match self {
            Self::Exact => Some(Self::Prefix),
            Self::Prefix => Some(Self::Substring),
            Self::Substring => None,
        }
    }

    /// Relevance reported next to each search result:
    /// - 100: Exact match
    /// - 50: Key starts with the fragment
    /// - 10: Key contains the fragment
    pub const fn relevance(self) -> u32 {
        match self {
            Self::Exact => 100,
            Self::Prefix => 50,
            Self::Substring => 10,
        }
    }
}

impl fmt::Display for MatchKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Exact => "exact",
            Self::Prefix => "prefix",
            Self::Substring => "substring",
        })
    }
}

/// Classify how `key` matches `fragment`. Both must already be normalized.
///
/// Returns `None` when the key does not contain the fragment, or when the
/// fragment is empty.
pub fn classify(key: &str, fragment: &str) -> Option<MatchKind> {
    if fragment.is_empty() {
        None
    } else if key == fragment {
        Some(MatchKind::Exact)
    } else if key.starts_with(fragment) {
        Some(MatchKind::Prefix)
    } else if key.contains(fragment) {
        Some(MatchKind::Substring)
    } else {
        None
    }
}
