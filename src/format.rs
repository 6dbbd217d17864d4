//! Plain-text rendering of query results.

use crate::entry::Entry;
use crate::search::{Suggestion, SymbolMatch};
use std::fmt::Write as _;

/// Resolve a generator target against the documentation base URL.
///
/// Targets are written relative to the `search/` directory, so leading `../`
/// segments are dropped before joining. With an empty base the stripped
/// target is returned.
pub fn resolve_target(base_url: &str, target: &str) -> String {
    let mut relative = target;
    while let Some(rest) = relative.strip_prefix("../") {
        relative = rest;
    }

    if base_url.is_empty() {
        return relative.to_string();
    }
    format!(
        "{}/{}",
        base_url.trim_end_matches('/'),
        relative.trim_start_matches('/')
    )
}

fn write_entry(output: &mut String, position: usize, entry: &Entry) {
    let _ = write!(output, "{}. `{}`", position, entry.label);
    if let Some(scope) = &entry.scope {
        let _ = write!(output, " ({})", scope);
    }
}

/// Render ranked matches, one numbered item per entry.
pub fn format_matches(matches: &[SymbolMatch<'_>], query: &str, base_url: &str) -> String {
    let mut output = format!("Symbols matching '{}':\n\n", query);

    for (idx, m) in matches.iter().enumerate() {
        write_entry(&mut output, idx + 1, m.entry);
        let _ = writeln!(output, " - {} match (relevance {})", m.kind, m.relevance());
        let _ = writeln!(output, "   {}", resolve_target(base_url, &m.entry.target));
    }

    output
}

/// Render the entries of an exact key lookup.
pub fn format_lookup(entries: &[Entry], key: &str, base_url: &str) -> String {
    let mut output = format!(
        "{} {} for '{}':\n\n",
        entries.len(),
        if entries.len() == 1 { "entry" } else { "entries" },
        key
    );

    for (idx, entry) in entries.iter().enumerate() {
        write_entry(&mut output, idx + 1, entry);
        output.push('\n');
        let _ = writeln!(output, "   {}", resolve_target(base_url, &entry.target));
    }

    output
}

/// Message for a query without matches, with suggestions when available.
pub fn format_no_results(query: &str, suggestions: &[Suggestion<'_>]) -> String {
    let mut msg = format!("No symbols found matching '{}'.\n", query);

    if suggestions.is_empty() {
        msg.push_str("\nSearch tips:\n");
        msg.push_str("• Try a shorter fragment of the name\n");
        msg.push_str("• Matching is case-insensitive substring matching on symbol names\n");
        if query.contains("::") {
            msg.push_str("• Note: Search by member or class name, not qualified paths\n");
        }
    } else {
        msg.push_str("\nDid you mean:\n");
        for suggestion in suggestions {
            let _ = writeln!(msg, "• `{}`", suggestion.key);
        }
    }

    msg
}
