//! On-disk index snapshots with fingerprint-based invalidation.
//!
//! Parsing a large documentation tree takes noticeably longer than reading a
//! postcard snapshot of the built index. A snapshot records an xxh3
//! fingerprint of the shard files it was built from and is discarded as soon
//! as the shards change.

use crate::entry::Entry;
use crate::error::Result;
use crate::search::SymbolIndex;
use crate::searchdata::load_shards;
use anyhow::Context;
use postcard::to_io;
use serde::{Deserialize, Serialize};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use xxhash_rust::xxh3::{Xxh3, xxh3_64};

/// Bumped whenever the snapshot layout changes.
const SNAPSHOT_VERSION: u32 = 1;

#[derive(Debug, Deserialize)]
struct Snapshot {
    version: u32,
    fingerprint: u64,
    entries: Vec<Entry>,
}

#[derive(Debug, Serialize)]
struct SnapshotRef<'a> {
    version: u32,
    fingerprint: u64,
    entries: Vec<&'a Entry>,
}

/// Fingerprint a set of shard files by their paths relative to `root` and
/// their contents, in the given order.
pub fn fingerprint(root: &Path, shards: &[PathBuf]) -> Result<u64> {
    let mut hasher = Xxh3::new();
    for path in shards {
        // Relative paths keep the fingerprint stable when the tree moves
        let rel_path = path.strip_prefix(root).unwrap_or(path);
        hasher.update(rel_path.to_string_lossy().as_bytes());
        hasher.update(&[0]);

        let content = std::fs::read(path)
            .with_context(|| format!("Failed to read shard {}", path.display()))?;
        hasher.update(&(content.len() as u64).to_le_bytes());
        hasher.update(&content);
    }
    Ok(hasher.digest())
}

/// Snapshot file for a documentation root inside `cache_dir`.
///
/// Distinct roots get distinct files so several doc trees can share one cache.
pub fn snapshot_path(cache_dir: &Path, root: &Path) -> PathBuf {
    let root = root.canonicalize().unwrap_or_else(|_| root.to_path_buf());
    let key = xxh3_64(root.to_string_lossy().as_bytes());
    cache_dir.join(format!("index-{:016x}.bin", key))
}

/// Load the index from the snapshot at `cache_path` if it matches the shards,
/// otherwise parse the shards, build, and write a fresh snapshot.
///
/// Without a `cache_path` the shards are always parsed. Cache failures are
/// logged and never fail the build.
pub fn load_or_build(
    root: &Path,
    shards: &[PathBuf],
    cache_path: Option<&Path>,
) -> Result<SymbolIndex> {
    let Some(cache_path) = cache_path else {
        return build_from_shards(shards);
    };

    let fingerprint = fingerprint(root, shards)?;
    if let Some(entries) = load(cache_path, fingerprint) {
        let index = SymbolIndex::build(entries)
            .with_context(|| format!("Invalid snapshot at {}", cache_path.display()))?;
        tracing::debug!(
            "Loaded cached symbol index ({} entries, {} keys) from {}",
            index.len(),
            index.key_count(),
            cache_path.display()
        );
        return Ok(index);
    }

    let index = build_from_shards(shards)?;
    store(&index, fingerprint, cache_path);
    Ok(index)
}

fn build_from_shards(shards: &[PathBuf]) -> Result<SymbolIndex> {
    let start = std::time::Instant::now();
    tracing::info!("Building symbol index from {} shards", shards.len());

    let entries = load_shards(shards).context("Failed to load searchData")?;
    let index = SymbolIndex::build(entries).context("Failed to build symbol index")?;

    tracing::info!(
        "Built symbol index: {} entries, {} keys in {:?}",
        index.len(),
        index.key_count(),
        start.elapsed()
    );
    Ok(index)
}

/// Read a snapshot, returning its entries only if it is current.
fn load(path: &Path, fingerprint: u64) -> Option<Vec<Entry>> {
    let bytes = std::fs::read(path).ok()?;

    match postcard::from_bytes::<Snapshot>(&bytes) {
        Ok(snapshot)
            if snapshot.version == SNAPSHOT_VERSION && snapshot.fingerprint == fingerprint =>
        {
            tracing::debug!("Using cached index (fingerprint {:016x})", fingerprint);
            Some(snapshot.entries)
        }
        Ok(_) => {
            tracing::info!(
                "Cache stale, will rebuild index (file: {})",
                path.display()
            );
            let _ = std::fs::remove_file(path);
            None
        }
        Err(e) => {
            tracing::warn!("Failed to deserialize cached index at {}: {}", path.display(), e);
            let _ = std::fs::remove_file(path);
            None
        }
    }
}

/// Write a snapshot next to its final location, then move it into place.
fn store(index: &SymbolIndex, fingerprint: u64, path: &Path) {
    let snapshot = SnapshotRef {
        version: SNAPSHOT_VERSION,
        fingerprint,
        entries: index.entries().collect(),
    };

    if let Some(parent) = path.parent()
        && let Err(e) = std::fs::create_dir_all(parent)
    {
        tracing::warn!("Failed to create cache directory {}: {}", parent.display(), e);
        return;
    }

    let tmp = path.with_extension("tmp");
    let written = std::fs::File::create(&tmp)
        .map_err(|e| e.to_string())
        .and_then(|file| to_io(&snapshot, BufWriter::new(file)).map_err(|e| e.to_string()))
        .and_then(|mut writer| writer.flush().map_err(|e| e.to_string()))
        .and_then(|()| std::fs::rename(&tmp, path).map_err(|e| e.to_string()));

    match written {
        Ok(()) => tracing::debug!("Cached symbol index to {}", path.display()),
        Err(e) => {
            tracing::warn!("Failed to write symbol index to {}: {}", path.display(), e);
            let _ = std::fs::remove_file(&tmp);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert2::check;
    use tempfile::TempDir;

    #[test]
    fn test_snapshot_path_differs_per_root() {
        let cache = Path::new("/tmp/cache");
        let a = snapshot_path(cache, Path::new("/docs/a"));
        let b = snapshot_path(cache, Path::new("/docs/b"));
        check!(a != b);
        check!(a.starts_with(cache));
    }

    #[test]
    fn test_fingerprint_tracks_content() {
        let dir = TempDir::new().unwrap();
        let shard = dir.path().join("all_0.js");
        std::fs::write(&shard, "var searchData=[];").unwrap();
        let before = fingerprint(dir.path(), std::slice::from_ref(&shard)).unwrap();
        check!(before == fingerprint(dir.path(), std::slice::from_ref(&shard)).unwrap());

        std::fs::write(&shard, "var searchData=[['a',['A',['#a',1,'']]]];").unwrap();
        check!(before != fingerprint(dir.path(), std::slice::from_ref(&shard)).unwrap());
    }

    #[test]
    fn test_corrupt_snapshot_discarded() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("index.bin");
        std::fs::write(&path, b"\xff\xff\xff\xff not postcard").unwrap();

        check!(load(&path, 42).is_none());
        check!(!path.exists());
    }

    #[test]
    fn test_store_then_load() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nested/index.bin");
        let index = SymbolIndex::build([
            Entry::new("wait", "Wait", "#w1").with_scope("CppCommon::Barrier"),
            Entry::new("wait", "Wait", "#w2"),
        ])
        .unwrap();

        store(&index, 7, &path);
        check!(load(&path, 7).map(|e| e.len()) == Some(2));
        // Stale fingerprint removes the snapshot
        check!(load(&path, 8).is_none());
        check!(!path.exists());
    }

    #[test]
    fn test_large_snapshot_written_completely() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("index.bin");
        let index = SymbolIndex::build((0..5000).map(|i| {
            Entry::new(format!("symbol{i}"), format!("Symbol{i}"), format!("../file_{i}.html#a{i:032x}"))
                .with_scope(format!("CppCommon::Scope{}", i % 17))
        }))
        .unwrap();

        store(&index, 11, &path);
        check!(!path.with_extension("tmp").exists());

        let entries = load(&path, 11).unwrap();
        check!(entries.len() == 5000);
        check!(entries == index.entries().cloned().collect::<Vec<_>>());
    }
}
