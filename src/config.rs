//! Configuration loaded from `doxsearch.toml`.

use crate::error::Result;
use anyhow::Context;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Config file looked up in the working directory when no path is given.
pub const CONFIG_FILE: &str = "doxsearch.toml";

/// Default number of results returned by a search.
pub const DEFAULT_LIMIT: usize = 25;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// Generated documentation root (the directory containing `search/`)
    #[serde(default = "default_docs_dir")]
    pub docs_dir: PathBuf,

    /// Prefix joined to targets when presenting results
    #[serde(default)]
    pub base_url: String,

    /// Shard categories to load (`all`, `functions`, ...). Empty loads all.
    #[serde(default)]
    pub categories: Vec<String>,

    /// Default maximum number of search results
    #[serde(default = "default_limit")]
    pub limit: usize,

    /// Keep a snapshot of the built index between runs
    #[serde(default = "default_cache")]
    pub cache: bool,

    /// Where snapshots are written. `~` is expanded.
    #[serde(default)]
    pub cache_dir: Option<PathBuf>,
}

fn default_docs_dir() -> PathBuf {
    PathBuf::from("docs/html")
}

const fn default_limit() -> usize {
    DEFAULT_LIMIT
}

const fn default_cache() -> bool {
    true
}

impl Default for Config {
    fn default() -> Self {
        Self {
            docs_dir: default_docs_dir(),
            base_url: String::new(),
            categories: Vec::new(),
            limit: default_limit(),
            cache: default_cache(),
            cache_dir: None,
        }
    }
}

impl Config {
    /// Load configuration.
    ///
    /// An explicit `path` must exist. Without one, `doxsearch.toml` in the
    /// current directory is used if present, otherwise defaults.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let path = match path {
            Some(path) => path.to_path_buf(),
            None => {
                let candidate = PathBuf::from(CONFIG_FILE);
                if !candidate.is_file() {
                    tracing::debug!("No {} found, using defaults", CONFIG_FILE);
                    return Ok(Self::default());
                }
                candidate
            }
        };

        let content = std::fs::read_to_string(&path)
            .with_context(|| format!("Failed to read config {}", path.display()))?;
        let config = Self::parse(&content)
            .with_context(|| format!("Failed to parse config {}", path.display()))?;
        tracing::debug!("Loaded config from {}", path.display());
        Ok(config)
    }

    pub fn parse(content: &str) -> Result<Self> {
        Ok(toml::from_str(content)?)
    }

    /// Directory for index snapshots, or `None` when caching is disabled or
    /// no cache directory can be determined.
    pub fn snapshot_dir(&self) -> Option<PathBuf> {
        if !self.cache {
            return None;
        }
        match &self.cache_dir {
            Some(dir) => Some(expand_tilde(dir)),
            None => dirs::cache_dir().map(|dir| dir.join("doxsearch")),
        }
    }

    /// Documentation root with `~` expanded.
    pub fn docs_root(&self) -> PathBuf {
        expand_tilde(&self.docs_dir)
    }
}

/// Replace a leading `~` component with the home directory.
///
/// Only `~` on its own or followed by a separator is expanded (`~user` is
/// not). Paths are returned unchanged when no home directory is known.
pub fn expand_tilde(path: &Path) -> PathBuf {
    match (path.strip_prefix("~"), dirs::home_dir()) {
        (Ok(rest), Some(home)) if rest.as_os_str().is_empty() => home,
        (Ok(rest), Some(home)) => home.join(rest),
        _ => path.to_path_buf(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert2::{check, let_assert};
    use rstest::rstest;

    #[test]
    fn test_empty_config_uses_defaults() {
        let_assert!(Ok(config) = Config::parse(""));
        check!(config == Config::default());
        check!(config.limit == DEFAULT_LIMIT);
        check!(config.cache);
    }

    #[test]
    fn test_full_config() {
        let content = r#"
            docs_dir = "build/html"
            base_url = "https://docs.example.org/cppcommon"
            categories = ["functions", "classes"]
            limit = 10
            cache = false
            cache_dir = "/var/cache/doxsearch"
        "#;
        let_assert!(Ok(config) = Config::parse(content));
        check!(config.docs_dir == PathBuf::from("build/html"));
        check!(config.base_url == "https://docs.example.org/cppcommon");
        check!(config.categories == vec!["functions".to_string(), "classes".to_string()]);
        check!(config.limit == 10);
        check!(config.snapshot_dir().is_none());
    }

    #[rstest]
    #[case("limit = \"ten\"")]
    #[case("unknown_key = 1")]
    fn test_invalid_config(#[case] content: &str) {
        check!(Config::parse(content).is_err());
    }

    #[test]
    fn test_explicit_cache_dir() {
        let config = Config {
            cache_dir: Some(PathBuf::from("/var/cache/doxsearch")),
            ..Config::default()
        };
        check!(config.snapshot_dir() == Some(PathBuf::from("/var/cache/doxsearch")));
    }

    #[rstest]
    #[case("/abs/path")]
    #[case("rel/~/path")]
    #[case("~user/docs")]
    fn test_expand_tilde_passthrough(#[case] path: &str) {
        check!(expand_tilde(Path::new(path)) == PathBuf::from(path));
    }

    #[test]
    fn test_expand_tilde_home() {
        let_assert!(Some(home) = dirs::home_dir());
        check!(expand_tilde(Path::new("~")) == home);
        check!(expand_tilde(Path::new("~/docs/html")) == home.join("docs/html"));
    }
}
