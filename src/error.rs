//! Error handling types and utilities.

use crate::entry::KeyDefect;
use std::path::PathBuf;

/// A specialized Result type for doxsearch operations.
///
/// This is an alias for `anyhow::Result` with context added via `.context()` and
/// `.with_context()` methods throughout the codebase.
pub type Result<T> = anyhow::Result<T>;

/// Error returned when building a symbol index fails.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum IndexError {
    /// An entry's key is empty or malformed. `position` is the entry's offset in the input.
    #[error("invalid entry at position {position} (key {key:?}): {reason}")]
    InvalidEntry {
        position: usize,
        key: String,
        reason: KeyDefect,
    },
}

/// Error returned when reading generator searchData files fails.
#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    /// The file could not be read.
    #[error("failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    /// The file content is not a searchData table we understand.
    #[error("{origin}:{line}:{column}: {message}")]
    Syntax {
        origin: String,
        line: usize,
        column: usize,
        message: String,
    },
}
