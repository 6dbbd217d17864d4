//! Immutable symbol index with ranked prefix and substring queries.

use crate::entry::{Entry, fold_case, normalize_key};
use crate::error::IndexError;
use ahash::AHashMap;
use serde::ser::{Serialize, SerializeStruct, Serializer};

use super::scoring::{MatchKind, classify};

/// All entries that share one normalized key, in insertion order.
#[derive(Debug, Clone)]
struct KeyGroup {
    key: String,
    entries: Vec<Entry>,
}

/// A read-only index from normalized keys to their entries.
///
/// Groups are kept sorted by key length and then key, which is the tie-break
/// order inside every match tier. Overloads sharing a key stay together in the
/// order they were first inserted.
#[derive(Debug, Clone, Default)]
pub struct SymbolIndex {
    /// Key groups sorted by `(key.len(), key)`
    groups: Vec<KeyGroup>,
    /// Normalized key to position in `groups`
    by_key: AHashMap<String, usize>,
    /// Total number of entries across all groups
    entry_count: usize,
}

impl SymbolIndex {
    /// Build an index from entries in input order.
    ///
    /// Keys are normalized (trimmed, lowercased). The first entry for a given
    /// `(key, target)` pair wins; later duplicates are dropped. Fails on the
    /// first entry whose key is empty or malformed.
    pub fn build(entries: impl IntoIterator<Item = Entry>) -> Result<Self, IndexError> {
        let start = std::time::Instant::now();
        let mut groups: Vec<KeyGroup> = Vec::new();
        let mut by_key: AHashMap<String, usize> = AHashMap::new();
        let mut entry_count = 0;
        let mut duplicates = 0;

        for (position, mut entry) in entries.into_iter().enumerate() {
            let key = normalize_key(&entry.key)
                .map_err(|reason| IndexError::InvalidEntry {
                    position,
                    key: entry.key.clone(),
                    reason,
                })?
                .into_owned();

            let slot = *by_key.entry(key.clone()).or_insert_with(|| {
                groups.push(KeyGroup {
                    key: key.clone(),
                    entries: Vec::new(),
                });
                groups.len() - 1
            });

            let group = &mut groups[slot];
            if group.entries.iter().any(|e| e.target == entry.target) {
                duplicates += 1;
                continue;
            }

            entry.key = key;
            group.entries.push(entry);
            entry_count += 1;
        }

        // Stable ordering by (length, key); keys are unique so there are no ties.
        groups.sort_by(|a, b| {
            a.key
                .len()
                .cmp(&b.key.len())
                .then_with(|| a.key.cmp(&b.key))
        });
        for (slot, group) in groups.iter().enumerate() {
            if let Some(position) = by_key.get_mut(&group.key) {
                *position = slot;
            }
        }

        tracing::debug!(
            "Built symbol index: {} entries, {} keys, {} duplicates dropped in {:?}",
            entry_count,
            groups.len(),
            duplicates,
            start.elapsed()
        );

        Ok(Self {
            groups,
            by_key,
            entry_count,
        })
    }

    /// Entries whose key contains `fragment`, case-insensitively, best first.
    ///
    /// Exact matches come first, then prefix matches, then other substring
    /// matches. Within a tier, shorter keys come first, then keys in lexical
    /// order, then entries in insertion order. The fragment is matched as
    /// given, whitespace included; an empty fragment matches nothing. The
    /// returned iterator is lazy and can be cloned to restart.
    pub fn query(&self, fragment: &str) -> Matches<'_> {
        let fragment = fold_case(fragment).into_owned();
        let stage = (!fragment.is_empty()).then_some(MatchKind::Exact);
        Matches {
            index: self,
            fragment,
            stage,
            cursor: 0,
            pending: Default::default(),
            pending_kind: MatchKind::Exact,
        }
    }

    /// Entries whose key equals `key` case-insensitively, in insertion order.
    /// `key` is not trimmed.
    pub fn lookup(&self, key: &str) -> &[Entry] {
        self.by_key
            .get(fold_case(key).as_ref())
            .map_or(&[], |&slot| self.groups[slot].entries.as_slice())
    }

    /// Number of entries in the index.
    pub const fn len(&self) -> usize {
        self.entry_count
    }

    pub const fn is_empty(&self) -> bool {
        self.entry_count == 0
    }

    /// Number of distinct keys.
    pub fn key_count(&self) -> usize {
        self.groups.len()
    }

    /// Distinct keys, shortest first, then lexical.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.groups.iter().map(|group| group.key.as_str())
    }

    /// Every entry, grouped by key in [`keys`](Self::keys) order.
    ///
    /// Rebuilding an index from this sequence yields identical query results.
    pub fn entries(&self) -> impl Iterator<Item = &Entry> {
        self.groups.iter().flat_map(|group| group.entries.iter())
    }
}

/// One query result: the matching entry and the tier it matched in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SymbolMatch<'a> {
    pub entry: &'a Entry,
    pub kind: MatchKind,
}

impl SymbolMatch<'_> {
    /// Relevance of the match tier, see [`MatchKind::relevance`].
    pub const fn relevance(&self) -> u32 {
        self.kind.relevance()
    }
}

/// Flattened as the entry's fields plus `kind` and `relevance`.
impl Serialize for SymbolMatch<'_> {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut state = serializer.serialize_struct("SymbolMatch", 6)?;
        state.serialize_field("key", &self.entry.key)?;
        state.serialize_field("label", &self.entry.label)?;
        state.serialize_field("target", &self.entry.target)?;
        state.serialize_field("scope", &self.entry.scope)?;
        state.serialize_field("kind", &self.kind)?;
        state.serialize_field("relevance", &self.relevance())?;
        state.end()
    }
}

/// Lazy, ranked query results. See [`SymbolIndex::query`].
#[derive(Debug, Clone)]
pub struct Matches<'a> {
    index: &'a SymbolIndex,
    /// Case-folded query fragment
    fragment: String,
    /// Tier currently being scanned, `None` once exhausted
    stage: Option<MatchKind>,
    /// Next group to inspect within the current tier
    cursor: usize,
    /// Entries of the last matching group not yet yielded
    pending: std::slice::Iter<'a, Entry>,
    pending_kind: MatchKind,
}

impl Matches<'_> {
    /// Advance to the next group matching the current tier, or the next tier.
    fn advance(&mut self) -> bool {
        while let Some(kind) = self.stage {
            if kind == MatchKind::Exact {
                self.stage = kind.next();
                self.cursor = 0;
                if let Some(&slot) = self.index.by_key.get(&self.fragment) {
                    self.pending = self.index.groups[slot].entries.iter();
                    self.pending_kind = kind;
                    return true;
                }
                continue;
            }

            let Some(group) = self.index.groups.get(self.cursor) else {
                self.stage = kind.next();
                self.cursor = 0;
                continue;
            };
            self.cursor += 1;

            if classify(&group.key, &self.fragment) == Some(kind) {
                self.pending = group.entries.iter();
                self.pending_kind = kind;
                return true;
            }
        }
        false
    }
}

impl<'a> Iterator for Matches<'a> {
    type Item = SymbolMatch<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if let Some(entry) = self.pending.next() {
                return Some(SymbolMatch {
                    entry,
                    kind: self.pending_kind,
                });
            }
            if !self.advance() {
                return None;
            }
        }
    }
}

impl std::iter::FusedIterator for Matches<'_> {}

#[cfg(test)]
mod tests {
    use super::*;
    use assert2::{check, let_assert};
    use rstest::{fixture, rstest};

    fn targets<'a>(matches: impl Iterator<Item = SymbolMatch<'a>>) -> Vec<&'a str> {
        matches.map(|m| m.entry.target.as_str()).collect()
    }

    #[fixture]
    fn sample() -> SymbolIndex {
        SymbolIndex::build([
            Entry::new("insert", "insert", "#a"),
            Entry::new("insertpath", "InsertPath", "#b"),
            Entry::new("pop", "pop", "#c"),
        ])
        .unwrap()
    }

    #[rstest]
    fn test_exact_before_prefix(sample: SymbolIndex) {
        let results: Vec<_> = sample.query("insert").collect();
        check!(targets(results.iter().copied()) == vec!["#a", "#b"]);
        check!(results[0].kind == MatchKind::Exact);
        check!(results[1].kind == MatchKind::Prefix);
    }

    #[rstest]
    #[case("xyz")]
    #[case("")]
    #[case("   ")]
    fn test_query_without_matches(sample: SymbolIndex, #[case] fragment: &str) {
        check!(sample.query(fragment).next().is_none());
    }

    #[rstest]
    fn test_lookup_exact_only(sample: SymbolIndex) {
        let found = sample.lookup("pop");
        check!(found.len() == 1);
        check!(found[0].target == "#c");
        check!(sample.lookup("po").is_empty());
        check!(sample.lookup("POP").len() == 1);
    }

    #[test]
    fn test_tie_breaks_length_then_lexical_then_insertion() {
        let index = SymbolIndex::build([
            Entry::new("pathname", "pathname", "#1"),
            Entry::new("pathb", "pathb", "#2"),
            Entry::new("patha", "patha", "#3"),
            Entry::new("patha", "patha", "#4"),
            Entry::new("mypath", "mypath", "#5"),
            Entry::new("path", "path", "#6"),
        ])
        .unwrap();

        check!(targets(index.query("path")) == vec!["#6", "#3", "#4", "#2", "#1", "#5"]);
    }

    #[test]
    fn test_substring_tier_after_prefix_even_when_shorter() {
        let index = SymbolIndex::build([
            Entry::new("xlock", "xlock", "#sub"),
            Entry::new("lockerguard", "LockerGuard", "#prefix"),
        ])
        .unwrap();

        let results: Vec<_> = index.query("lock").collect();
        check!(targets(results.iter().copied()) == vec!["#prefix", "#sub"]);
        check!(results[1].kind == MatchKind::Substring);
    }

    #[test]
    fn test_keys_normalized_and_case_insensitive() {
        let index = SymbolIndex::build([Entry::new("  ParentProcess ", "ParentProcess", "#p")])
            .unwrap();

        check!(index.keys().collect::<Vec<_>>() == vec!["parentprocess"]);
        check!(targets(index.query("PARENT")) == vec!["#p"]);
        check!(index.lookup("parentPROCESS")[0].key == "parentprocess");
    }

    #[test]
    fn test_duplicate_key_target_collapsed() {
        let index = SymbolIndex::build([
            Entry::new("wait", "Wait", "#barrier").with_scope("CppCommon::Barrier::Wait()"),
            Entry::new("wait", "Wait", "#latch"),
            Entry::new("Wait", "Wait", "#barrier"),
        ])
        .unwrap();

        check!(index.len() == 2);
        check!(index.key_count() == 1);
        let_assert!([first, second] = index.lookup("wait"));
        check!(first.scope.as_deref() == Some("CppCommon::Barrier::Wait()"));
        check!(second.target == "#latch");
    }

    #[rstest]
    #[case(vec![Entry::new("", "empty", "#e")], 0)]
    #[case(vec![Entry::new("ok", "ok", "#1"), Entry::new("  ", "blank", "#2")], 1)]
    fn test_build_rejects_empty_keys(#[case] entries: Vec<Entry>, #[case] expected: usize) {
        let_assert!(Err(IndexError::InvalidEntry { position, .. }) = SymbolIndex::build(entries));
        check!(position == expected);
    }

    #[rstest]
    fn test_query_restartable(sample: SymbolIndex) {
        let mut matches = sample.query("i");
        let restart = matches.clone();
        check!(matches.next().map(|m| m.entry.target.as_str()) == Some("#a"));
        drop(matches);

        check!(targets(restart) == targets(sample.query("i")));
    }

    #[test]
    fn test_fragment_whitespace_is_significant() {
        let index = SymbolIndex::build([
            Entry::new("new", "new", "#new"),
            Entry::new("operator new", "operator new", "#opnew"),
            Entry::new("pop", "pop", "#pop"),
        ])
        .unwrap();

        let results: Vec<_> = index.query(" New").collect();
        check!(targets(results.iter().copied()) == vec!["#opnew"]);
        check!(results[0].kind == MatchKind::Substring);

        check!(targets(index.query("new")) == vec!["#new", "#opnew"]);
        check!(index.lookup(" pop ").is_empty());
        check!(index.lookup("Operator New").len() == 1);
    }

    #[rstest]
    fn test_match_serializes_relevance(sample: SymbolIndex) {
        let_assert!(Some(first) = sample.query("insert").next());
        let json = serde_json::to_value(first).unwrap();
        check!(json["key"] == "insert");
        check!(json["kind"] == "exact");
        check!(json["relevance"] == 100);
        check!(json["scope"].is_null());
    }

    #[test]
    fn test_empty_index() {
        let index = SymbolIndex::build(Vec::new()).unwrap();
        check!(index.is_empty());
        check!(index.query("anything").next().is_none());
        check!(index.lookup("anything").is_empty());
    }
}
