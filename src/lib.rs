//! Symbol search over the client-side search tables of generated API references.
//!
//! Entries come from the documentation generator's `searchData` shards (or any
//! other source), are built once into an immutable [`SymbolIndex`], and are
//! queried with ranked, case-insensitive substring matching.

pub mod cache;
pub mod cli;
pub mod config;
pub mod entry;
pub mod error;
pub mod format;
pub mod search;
pub mod searchdata;
pub mod server;
pub mod state;
pub mod tools;
pub mod tracing;

pub use config::Config;
pub use entry::Entry;
pub use error::{IndexError, LoadError};
pub use search::{MatchKind, Matches, SymbolIndex, SymbolMatch};
pub use server::SymbolServer;
pub use state::{IndexState, LoadedIndex};
