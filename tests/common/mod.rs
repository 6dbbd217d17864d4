//! Shared test fixtures and utilities for integration tests.
//!
//! # Test Isolation Strategy
//!
//! Tests that touch the filesystem get their own temporary documentation tree:
//! - A fresh temp directory with copied `search/*.js` fixture shards
//! - Its own snapshot cache directory (cold cache state)
//! - Its own `IndexState`, so nothing is shared between tests
//!
//! # Available Fixtures
//!
//! - `docs_tree`: temp docs root populated with the fixture shards
//! - `isolated_state`: an `IndexState` reading from a fresh `docs_tree`
//!
//! The fixture shards are excerpts of real generator output for a C++ library:
//! `all_9.js`, `all_14.js` and `functions_8.js` (overlapping `all_9.js`).

use doxsearch::{Config, IndexState};
use rstest::fixture;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tempfile::TempDir;

/// Entries in the fixture shards once duplicates are collapsed.
#[allow(dead_code)]
pub const FIXTURE_ENTRIES: usize = 57;

/// Distinct keys in the fixture shards.
#[allow(dead_code)]
pub const FIXTURE_KEYS: usize = 15;

/// Returns the project root directory (where Cargo.toml lives).
pub fn project_root() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
}

/// Directory holding the fixture `searchData` shards.
pub fn fixture_search_dir() -> PathBuf {
    project_root().join("tests/fixtures/search")
}

/// A temporary documentation tree (`<root>/search/*.js`).
///
/// Automatically cleaned up when dropped.
#[allow(dead_code)] // Methods used across different integration test crates
pub struct DocsTree {
    _temp: TempDir,
    root: PathBuf,
}

#[allow(dead_code)] // Methods used across different integration test crates
impl DocsTree {
    /// Creates an empty tree with no shards.
    pub fn empty() -> Self {
        let temp = TempDir::new().expect("Failed to create temp directory");
        let root = temp.path().join("html");
        std::fs::create_dir_all(root.join("search")).expect("Failed to create search dir");
        Self { _temp: temp, root }
    }

    /// Creates a tree with all fixture shards copied in.
    pub fn with_fixtures() -> Self {
        let tree = Self::empty();
        for entry in std::fs::read_dir(fixture_search_dir()).expect("Failed to read fixtures") {
            let path = entry.expect("Failed to read fixture entry").path();
            let name = path.file_name().unwrap().to_string_lossy().into_owned();
            tree.copy_shard(&path, &name);
        }
        tree
    }

    /// Documentation root (parent of `search/`).
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// The `search/` directory.
    pub fn search_dir(&self) -> PathBuf {
        self.root.join("search")
    }

    /// Directory for snapshots, outside the docs root.
    pub fn cache_dir(&self) -> PathBuf {
        self.root.parent().unwrap().join("cache")
    }

    /// Writes a shard (or any file) into `search/`.
    pub fn write_shard(&self, name: &str, content: &str) {
        std::fs::write(self.search_dir().join(name), content)
            .unwrap_or_else(|e| panic!("Failed to write shard '{}': {}", name, e));
    }

    /// Copies a file from the real filesystem into `search/`.
    pub fn copy_shard(&self, source: &Path, name: &str) {
        std::fs::copy(source, self.search_dir().join(name)).unwrap_or_else(|e| {
            panic!("Failed to copy '{}' to '{}': {}", source.display(), name, e)
        });
    }

    /// Config pointing at this tree, with its own cache directory.
    pub fn config(&self) -> Config {
        Config {
            docs_dir: self.root.clone(),
            cache_dir: Some(self.cache_dir()),
            ..Config::default()
        }
    }
}

/// Temp docs root populated with the fixture shards.
#[fixture]
pub fn docs_tree() -> DocsTree {
    doxsearch::tracing::init();
    DocsTree::with_fixtures()
}

/// An isolated index state over a fresh fixture tree.
///
/// The tree is returned alongside the state so it outlives the test.
#[allow(dead_code)]
#[fixture]
pub fn isolated_state(docs_tree: DocsTree) -> (DocsTree, Arc<IndexState>) {
    let state = Arc::new(IndexState::new(docs_tree.config()));
    (docs_tree, state)
}
