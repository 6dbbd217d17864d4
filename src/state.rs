//! Shared, lazily built index state for the CLI and the MCP server.
//!
//! The index is built at most once per process, on first use, and then
//! handed out as `Arc<LoadedIndex>` to any number of concurrent readers.

use crate::cache::{load_or_build, snapshot_path};
use crate::config::Config;
use crate::error::Result;
use crate::search::SymbolIndex;
use crate::searchdata::discover_shards;
use anyhow::{Context, bail};
use std::path::PathBuf;
use std::sync::Arc;
use tokio::sync::OnceCell;

/// A built index together with where it came from.
#[derive(Debug)]
pub struct LoadedIndex {
    pub index: SymbolIndex,
    /// Documentation root the shards were read from
    pub root: PathBuf,
    /// Number of shard files parsed (or fingerprinted, when cached)
    pub shard_count: usize,
}

/// Process-wide index state.
#[derive(Debug)]
pub struct IndexState {
    config: Config,
    index: OnceCell<Arc<LoadedIndex>>,
}

impl IndexState {
    /// State that builds its index from `config` on first use.
    pub fn new(config: Config) -> Self {
        Self {
            config,
            index: OnceCell::new(),
        }
    }

    /// State around an index that is already built.
    pub fn with_index(config: Config, loaded: LoadedIndex) -> Self {
        Self {
            config,
            index: OnceCell::new_with(Some(Arc::new(loaded))),
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// The index, building it on the first call.
    ///
    /// Concurrent first callers wait for the same build. A failed build is
    /// not cached, so the next call retries.
    pub async fn index(&self) -> Result<Arc<LoadedIndex>> {
        self.index
            .get_or_try_init(|| async {
                let config = self.config.clone();
                let loaded = tokio::task::spawn_blocking(move || load_index(&config))
                    .await
                    .context("Index loading task panicked")??;
                Ok::<_, anyhow::Error>(Arc::new(loaded))
            })
            .await
            .cloned()
    }
}

/// Discover shards under the configured docs root and build the index,
/// going through the snapshot cache when enabled.
pub fn load_index(config: &Config) -> Result<LoadedIndex> {
    let root = config.docs_root();
    let shards = discover_shards(&root, &config.categories)
        .with_context(|| format!("Failed to scan {}", root.display()))?;

    if shards.is_empty() {
        bail!(
            "No searchData files found under {} (expected search/<category>_<n>.js)",
            root.display()
        );
    }

    let cache_path = config
        .snapshot_dir()
        .map(|dir| snapshot_path(&dir, &root));
    let index = load_or_build(&root, &shards, cache_path.as_deref())?;

    Ok(LoadedIndex {
        index,
        root,
        shard_count: shards.len(),
    })
}
