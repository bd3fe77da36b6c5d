//! Shared lookup tables keyed by rhombus shape.

use std::collections::HashMap;
use std::fs;
use std::io::ErrorKind;
use std::path::Path;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use crate::config::LutConfig;
use crate::error::Result;
use crate::lut::{fingerprint, Lut};
use crate::rhombus::Rhombus;

/// In-memory table cache backed by an optional directory of `.rlut` files.
///
/// The map lock is held only for lookups and inserts, never while a table
/// is loaded or generated. Two callers racing on the same shape may both
/// build it; the first insert wins.
#[derive(Debug)]
pub struct LutCache {
    config: LutConfig,
    entries: Mutex<HashMap<String, Arc<Lut>>>,
}

impl LutCache {
    pub fn new(config: LutConfig) -> Self {
        Self {
            config,
            entries: Mutex::new(HashMap::new()),
        }
    }

    pub fn from_env() -> Self {
        Self::new(LutConfig::from_env())
    }

    pub fn config(&self) -> &LutConfig {
        &self.config
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    /// Drop every in-memory table. Files on disk are kept.
    pub fn clear(&self) {
        self.lock().clear();
    }

    /// The table for `rhombus` walked at `depth`, from memory, disk, or
    /// freshly generated.
    pub fn get(&self, rhombus: &Rhombus, depth: i32) -> Result<Arc<Lut>> {
        let key = fingerprint(rhombus, depth);
        if let Some(lut) = self.lock().get(&key) {
            return Ok(Arc::clone(lut));
        }

        let lut = Arc::new(self.load_or_generate(&key, rhombus, depth)?);

        let mut entries = self.lock();
        if entries.len() >= self.config.max_entries {
            tracing::info!(evicted = entries.len(), "lookup table cache full, clearing");
            entries.clear();
        }
        Ok(Arc::clone(entries.entry(key).or_insert(lut)))
    }

    fn lock(&self) -> MutexGuard<'_, HashMap<String, Arc<Lut>>> {
        self.entries.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn load_or_generate(&self, key: &str, rhombus: &Rhombus, depth: i32) -> Result<Lut> {
        let path = self.config.lut_path(key);

        if let Some(path) = &path {
            match load(path, key, depth) {
                Ok(Some(lut)) => {
                    tracing::debug!(path = %path.display(), "loaded lookup table");
                    return Ok(lut);
                }
                Ok(None) => {}
                Err(e) => {
                    tracing::warn!(
                        path = %path.display(),
                        error = %e,
                        "unreadable lookup table, regenerating"
                    );
                }
            }
        }

        let lut = Lut::generate(rhombus, depth)?;

        if let Some(path) = &path {
            match save(path, &lut) {
                Ok(()) => tracing::debug!(path = %path.display(), "saved lookup table"),
                Err(e) => {
                    tracing::error!(
                        path = %path.display(),
                        error = %e,
                        "failed to save lookup table"
                    )
                }
            }
        }
        Ok(lut)
    }
}

impl Default for LutCache {
    fn default() -> Self {
        Self::new(LutConfig::default())
    }
}

/// Read a table file; `Ok(None)` when there is no file.
fn load(path: &Path, key: &str, depth: i32) -> Result<Option<Lut>> {
    let bytes = match fs::read(path) {
        Ok(bytes) => bytes,
        Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
        Err(e) => return Err(e.into()),
    };
    Lut::decode(key, depth, &bytes).map(Some)
}

/// Write through a temporary file so readers never see half a table.
fn save(path: &Path, lut: &Lut) -> Result<()> {
    if let Some(dir) = path.parent() {
        fs::create_dir_all(dir)?;
    }
    let tmp = path.with_extension("rlut.tmp");
    fs::write(&tmp, lut.encode()?)?;
    fs::rename(&tmp, path)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use derm_topology::{GlobalIndex, HexDirection};

    fn rhombus(s: &str, dir: HexDirection) -> Rhombus {
        Rhombus::new(s.parse::<GlobalIndex>().unwrap(), dir)
    }

    #[test]
    fn memory_cache_hands_out_shared_tables() {
        let cache = LutCache::new(LutConfig::in_memory());
        let r = rhombus("3-205", HexDirection::Four);
        let a = cache.get(&r, 2).unwrap();
        let b = cache.get(&r, 2).unwrap();
        assert!(Arc::ptr_eq(&a, &b));
        assert_eq!(cache.len(), 1);

        cache.get(&r, 3).unwrap();
        assert_eq!(cache.len(), 2);
        cache.clear();
        assert!(cache.is_empty());
    }

    #[test]
    fn tables_are_persisted_and_reloaded() {
        let dir = tempfile::tempdir().unwrap();
        let config = LutConfig::in_memory().with_cache_dir(dir.path());
        let r = rhombus("A-040", HexDirection::Four);

        let first = LutCache::new(config.clone()).get(&r, 2).unwrap();
        let path = config.lut_path(first.key()).unwrap();
        assert!(path.exists());

        let second = LutCache::new(config).get(&r, 2).unwrap();
        assert_eq!(*first, *second);
    }

    #[test]
    fn corrupt_files_are_regenerated_and_overwritten() {
        let dir = tempfile::tempdir().unwrap();
        let config = LutConfig::in_memory().with_cache_dir(dir.path());
        let r = rhombus("1-000", HexDirection::Two);
        let key = fingerprint(&r, 2);
        let path = config.lut_path(&key).unwrap();
        fs::write(&path, b"not a table").unwrap();

        let lut = LutCache::new(config).get(&r, 2).unwrap();
        assert_eq!(*lut, Lut::generate(&r, 2).unwrap());

        let bytes = fs::read(&path).unwrap();
        assert_eq!(Lut::decode(key, 2, &bytes).unwrap(), *lut);
    }

    #[test]
    fn full_cache_is_flushed() {
        let cache = LutCache::new(LutConfig::in_memory().with_max_entries(1));
        cache.get(&rhombus("3-205", HexDirection::Four), 2).unwrap();
        cache.get(&rhombus("12-0", HexDirection::One), 2).unwrap();
        assert_eq!(cache.len(), 1);
    }
}
