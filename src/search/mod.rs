//! Symbol search: the immutable index, match ranking, and suggestions.
//!
//! The index is built once from a sequence of entries and answers
//! case-insensitive substring queries ranked exact > prefix > substring.

pub(crate) mod index;
pub(crate) mod scoring;
pub(crate) mod suggest;

pub use index::{Matches, SymbolIndex, SymbolMatch};
pub use scoring::{MatchKind, classify};
pub use suggest::{Suggestion, suggest};
