//! Lookup table cache configuration.

use std::path::{Path, PathBuf};

use crate::lut::LUT_EXTENSION;

/// Tables kept in memory before the cache is flushed.
pub const DEFAULT_MAX_ENTRIES: usize = 1000;

/// Where lookup tables are persisted and how many stay in memory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LutConfig {
    /// Directory for `.rlut` files; `None` keeps tables in memory only.
    pub cache_dir: Option<PathBuf>,
    pub max_entries: usize,
}

impl Default for LutConfig {
    fn default() -> Self {
        Self::from_env()
    }
}

impl LutConfig {
    /// Read `DERM_LUT_DIR` and `DERM_LUT_MAX_ENTRIES`.
    pub fn from_env() -> Self {
        let cache_dir = std::env::var("DERM_LUT_DIR")
            .ok()
            .filter(|dir| !dir.trim().is_empty())
            .map(PathBuf::from);

        let max_entries = std::env::var("DERM_LUT_MAX_ENTRIES")
            .ok()
            .and_then(|n| n.trim().parse().ok())
            .unwrap_or(DEFAULT_MAX_ENTRIES);

        Self {
            cache_dir,
            max_entries,
        }
    }

    /// Memory-only configuration with the default bound.
    pub fn in_memory() -> Self {
        Self {
            cache_dir: None,
            max_entries: DEFAULT_MAX_ENTRIES,
        }
    }

    pub fn with_cache_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.cache_dir = Some(dir.into());
        self
    }

    pub fn with_max_entries(mut self, max_entries: usize) -> Self {
        self.max_entries = max_entries;
        self
    }

    /// File holding the table for `key`, when persistence is on.
    pub fn lut_path(&self, key: &str) -> Option<PathBuf> {
        self.cache_dir.as_deref().map(|dir| lut_file(dir, key))
    }
}

fn lut_file(dir: &Path, key: &str) -> PathBuf {
    dir.join(format!("{key}.{LUT_EXTENSION}"))
}
