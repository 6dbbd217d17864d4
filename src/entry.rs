//! Symbol entries and key normalization.
//!
//! An [`Entry`] is one searchable record: a normalized key, the name shown to
//! the user, an opaque target reference, and an optional owning scope.

use serde::{Deserialize, Serialize};
use std::borrow::Cow;

/// One searchable symbol record.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Entry {
    /// Search key. Normalized (trimmed, lowercase) once the entry is inside an index.
    pub key: String,
    /// Human-readable display name
    pub label: String,
    /// Opaque reference, usually a URL fragment into the generated docs
    pub target: String,
    /// Owning namespace or class, when the generator recorded one
    pub scope: Option<String>,
}

impl Entry {
    pub fn new(
        key: impl Into<String>,
        label: impl Into<String>,
        target: impl Into<String>,
    ) -> Self {
        Self {
            key: key.into(),
            label: label.into(),
            target: target.into(),
            scope: None,
        }
    }

    /// Attach an owning scope. Empty scopes are stored as `None`.
    #[must_use]
    pub fn with_scope(mut self, scope: impl Into<String>) -> Self {
        let scope = scope.into();
        self.scope = (!scope.is_empty()).then_some(scope);
        self
    }
}

/// Why a key was rejected during normalization.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyDefect {
    /// Empty, or only whitespace
    Empty,
    /// Contains a control character
    ControlCharacter,
}

impl std::fmt::Display for KeyDefect {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Empty => f.write_str("key is empty"),
            Self::ControlCharacter => f.write_str("key contains a control character"),
        }
    }
}

/// Normalize an entry key: surrounding whitespace is trimmed and the result
/// lowercased. Returns `Cow::Borrowed` when the input is already normalized.
pub fn normalize(text: &str) -> Cow<'_, str> {
    fold_case(text.trim())
}

/// Lowercase a query fragment or lookup key for matching against normalized
/// keys. Whitespace is significant: keys such as `operator new` contain it.
pub fn fold_case(text: &str) -> Cow<'_, str> {
    if text.chars().any(char::is_uppercase) {
        Cow::Owned(text.to_lowercase())
    } else {
        Cow::Borrowed(text)
    }
}

/// Normalize an entry key, rejecting keys that can never be matched.
pub fn normalize_key(key: &str) -> Result<Cow<'_, str>, KeyDefect> {
    let normalized = normalize(key);
    if normalized.is_empty() {
        return Err(KeyDefect::Empty);
    }
    if normalized.chars().any(char::is_control) {
        return Err(KeyDefect::ControlCharacter);
    }
    Ok(normalized)
}

/// Decode the documentation generator's key escapes.
///
/// Non-alphanumeric characters in generated keys are written as `_` plus two
/// lowercase hex digits: `wait_5fqueue_2eh` is `wait_queue.h`. A `_` that is
/// not followed by two hex digits is kept as is.
pub fn decode_generated_key(raw: &str) -> Cow<'_, str> {
    if !raw.contains('_') {
        return Cow::Borrowed(raw);
    }

    let bytes = raw.as_bytes();
    let mut decoded = Vec::with_capacity(bytes.len());
    let mut i = 0;
    while i < bytes.len() {
        if bytes[i] == b'_'
            && let Some(byte) = bytes
                .get(i + 1..i + 3)
                .filter(|hex| hex.iter().all(u8::is_ascii_hexdigit))
                .and_then(|hex| std::str::from_utf8(hex).ok())
                .and_then(|hex| u8::from_str_radix(hex, 16).ok())
        {
            decoded.push(byte);
            i += 3;
            continue;
        }
        decoded.push(bytes[i]);
        i += 1;
    }

    // Escapes encode single bytes of UTF-8 sequences; fall back to the raw key
    // if the generator produced something we cannot reassemble.
    match String::from_utf8(decoded) {
        Ok(text) => Cow::Owned(text),
        Err(_) => Cow::Borrowed(raw),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert2::{check, let_assert};
    use rstest::rstest;

    #[rstest]
    #[case("insert", "insert")]
    #[case("  Insert ", "insert")]
    #[case("ParentProcessId", "parentprocessid")]
    #[case("CppCommon::Path", "cppcommon::path")]
    fn test_normalize(#[case] input: &str, #[case] expected: &str) {
        check!(normalize(input) == expected);
    }

    #[test]
    fn test_normalize_borrows_when_clean() {
        check!(matches!(normalize("already_clean"), Cow::Borrowed(_)));
        check!(matches!(fold_case(" operator new"), Cow::Borrowed(_)));
    }

    #[rstest]
    #[case(" New", " new")]
    #[case("Operator New ", "operator new ")]
    #[case("   ", "   ")]
    fn test_fold_case_keeps_whitespace(#[case] input: &str, #[case] expected: &str) {
        check!(fold_case(input) == expected);
    }

    #[rstest]
    #[case("", KeyDefect::Empty)]
    #[case("   ", KeyDefect::Empty)]
    #[case("bad\u{0007}key", KeyDefect::ControlCharacter)]
    #[case("tab\tkey", KeyDefect::ControlCharacter)]
    fn test_normalize_key_rejects(#[case] input: &str, #[case] defect: KeyDefect) {
        let_assert!(Err(err) = normalize_key(input));
        check!(err == defect);
    }

    #[rstest]
    #[case("wait_5fqueue_2eh", "wait_queue.h")]
    #[case("operator_3d_3d", "operator==")]
    #[case("_7ethread", "~thread")]
    #[case("parent", "parent")]
    #[case("trailing_", "trailing_")]
    #[case("not_zzhex", "not_zzhex")]
    fn test_decode_generated_key(#[case] raw: &str, #[case] expected: &str) {
        check!(decode_generated_key(raw) == expected);
    }

    #[test]
    fn test_with_scope_drops_empty() {
        let entry = Entry::new("file", "File", "../file_8h.html").with_scope("");
        check!(entry.scope.is_none());

        let entry = Entry::new("path", "Path", "#a").with_scope("CppCommon");
        check!(entry.scope.as_deref() == Some("CppCommon"));
    }
}
