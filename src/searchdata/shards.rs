//! Discovery and loading of `searchData` shard files.
//!
//! The generator splits its tables across many files named
//! `<category>_<hex>.js` (`all_9.js`, `functions_e.js`) in a `search/`
//! directory next to the HTML pages.

use crate::entry::Entry;
use crate::error::LoadError;
use ignore::WalkBuilder;
use std::path::{Path, PathBuf};

use super::parse::{KeyFormat, parse_search_data};

/// Name of the directory the generator writes its tables into.
pub const SEARCH_DIR: &str = "search";

/// A shard file name split into its category and bucket.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShardName<'a> {
    /// `all`, `functions`, `classes`, ...
    pub category: &'a str,
    /// Hex bucket suffix, e.g. `14` or `e`
    pub bucket: &'a str,
}

impl<'a> ShardName<'a> {
    /// Parse `all_14.js` style file names. Returns `None` for anything else.
    pub fn parse(file_name: &'a str) -> Option<Self> {
        let stem = file_name.strip_suffix(".js")?;
        let (category, bucket) = stem.rsplit_once('_')?;
        let valid = !category.is_empty()
            && category.chars().all(|c| c.is_ascii_alphanumeric() || c == '_')
            && !bucket.is_empty()
            && bucket.chars().all(|c| c.is_ascii_hexdigit());
        valid.then_some(Self { category, bucket })
    }
}

/// Find shard files under `root`, sorted by path.
///
/// `root` may be the generated HTML directory (containing `search/`) or the
/// `search/` directory itself. When `categories` is non-empty only shards of
/// those categories are returned.
pub fn discover_shards(root: &Path, categories: &[String]) -> Result<Vec<PathBuf>, LoadError> {
    let nested = root.join(SEARCH_DIR);
    let dir = if nested.is_dir() { nested } else { root.to_path_buf() };

    if !dir.is_dir() {
        return Err(LoadError::Io {
            path: dir,
            source: std::io::Error::new(std::io::ErrorKind::NotFound, "not a directory"),
        });
    }

    // Generated trees are usually excluded from version control, so ignore
    // files must not hide them.
    let mut shards: Vec<PathBuf> = WalkBuilder::new(&dir)
        .standard_filters(false)
        .max_depth(Some(1))
        .build()
        .filter_map(|e| e.ok())
        .filter(|e| e.file_type().is_some_and(|t| t.is_file()))
        .map(|e| e.into_path())
        .filter(|path| {
            path.file_name()
                .and_then(|name| name.to_str())
                .and_then(ShardName::parse)
                .is_some_and(|shard| {
                    categories.is_empty() || categories.iter().any(|c| c == shard.category)
                })
        })
        .collect();

    shards.sort();

    tracing::debug!("Found {} searchData shards in {}", shards.len(), dir.display());
    Ok(shards)
}

/// Parse every shard in order and concatenate their entries.
///
/// The key format of each file follows from its category; files whose names
/// are not shard names are read as plain tables.
pub fn load_shards(paths: &[PathBuf]) -> Result<Vec<Entry>, LoadError> {
    let mut entries = Vec::new();
    for path in paths {
        let source = std::fs::read_to_string(path).map_err(|source| LoadError::Io {
            path: path.clone(),
            source,
        })?;
        let origin = path.file_name().map_or_else(
            || path.display().to_string(),
            |name| name.to_string_lossy().into_owned(),
        );
        let keys = ShardName::parse(&origin)
            .map(|shard| KeyFormat::for_category(shard.category))
            .unwrap_or_default();
        let parsed = parse_search_data(&source, &origin, keys)?;
        tracing::trace!("{}: {} entries", origin, parsed.len());
        entries.extend(parsed);
    }
    Ok(entries)
}
