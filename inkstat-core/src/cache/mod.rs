//! Persistent fact cache
//!
//! Stable host facts (model, OS, CPU model, architecture, total memory) are
//! stored in a single pretty-printed JSON object at
//! `<cache_dir>/<name>.json`, keyed by `"<host>-<fact>"`. Every write is
//! persisted before returning so facts survive restarts.
//!
//! A missing or corrupt store is treated as empty; write failures are
//! surfaced as [`CacheError`].

use std::collections::BTreeMap;
use std::fmt;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{CacheError, CacheResult};
use crate::tracing::span_names;

/// Stable facts cached per host
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FactKey {
    /// Hardware model
    Model,
    /// Operating system pretty name
    Os,
    /// CPU model name
    CpuModel,
    /// Machine architecture
    Architecture,
    /// Total memory in MB
    MemoryTotal,
}

impl FactKey {
    /// All stable facts, in probe order
    pub const ALL: [Self; 5] = [
        Self::Model,
        Self::Os,
        Self::CpuModel,
        Self::Architecture,
        Self::MemoryTotal,
    ];

    /// Name used in cache keys
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Model => "model",
            Self::Os => "os",
            Self::CpuModel => "cpu_model",
            Self::Architecture => "architecture",
            Self::MemoryTotal => "memory_total",
        }
    }

    /// Cache key for this fact on `host`
    #[must_use]
    pub fn cache_key(self, host: &str) -> String {
        format!("{host}-{}", self.as_str())
    }
}

impl fmt::Display for FactKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Flat key/value store persisted as JSON
#[derive(Debug)]
pub struct FactCache {
    path: PathBuf,
    entries: BTreeMap<String, Value>,
}

impl FactCache {
    /// Opens the cache at `<dir>/<name>.json`
    ///
    /// The directory is not created until the first write.
    #[must_use]
    pub fn open(dir: impl AsRef<Path>, name: &str) -> Self {
        let path = dir.as_ref().join(format!("{name}.json"));
        let entries = load_entries(&path);
        Self { path, entries }
    }

    /// Path of the backing file
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Number of stored entries
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns whether the cache holds no entries
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Returns the cached value of `key` for `host`
    #[must_use]
    pub fn get(&self, host: &str, key: FactKey) -> Option<String> {
        self.get_value(&key.cache_key(host))
    }

    /// Stores `value` for `key` on `host`, overwriting any previous value
    ///
    /// # Errors
    ///
    /// Returns [`CacheError`] if the store cannot be persisted. The
    /// in-memory entry is rolled back in that case.
    pub fn put(&mut self, host: &str, key: FactKey, value: &str) -> CacheResult<()> {
        self.set_value(&key.cache_key(host), value)
    }

    /// Returns the raw value stored under `key` as text
    ///
    /// Strings are returned verbatim; other JSON values use their JSON text.
    #[must_use]
    pub fn get_value(&self, key: &str) -> Option<String> {
        let value = self.entries.get(key)?;
        tracing::debug!(key, value = %value, "Retrieving cache entry");
        Some(match value {
            Value::String(s) => s.clone(),
            other => other.to_string(),
        })
    }

    /// Stores a raw value under `key` and persists the store
    ///
    /// Values that cannot be represented as JSON are stored as their
    /// `Display` text, so the file always round-trips.
    ///
    /// # Errors
    ///
    /// Returns [`CacheError`] if the store cannot be persisted.
    pub fn set_value<V>(&mut self, key: &str, value: V) -> CacheResult<()>
    where
        V: Serialize + fmt::Display,
    {
        let json = serde_json::to_value(&value).unwrap_or_else(|_| Value::String(value.to_string()));
        tracing::info!(key, value = %json, "Saving cache entry");

        let previous = self.entries.insert(key.to_string(), json);
        if let Err(e) = self.save() {
            match previous {
                Some(old) => self.entries.insert(key.to_string(), old),
                None => self.entries.remove(key),
            };
            return Err(e);
        }
        Ok(())
    }

    /// Re-reads the store from disk, discarding in-memory state
    pub fn reload(&mut self) {
        self.entries = load_entries(&self.path);
    }

    fn save(&self) -> CacheResult<()> {
        let _span = tracing::debug_span!(span_names::CACHE_SAVE, path = %self.path.display()).entered();

        if let Some(dir) = self.path.parent()
            && !dir.as_os_str().is_empty()
            && !dir.is_dir()
        {
            tracing::info!(path = %dir.display(), "Creating cache folder");
            std::fs::create_dir_all(dir).map_err(|source| CacheError::CreateDir {
                path: dir.to_path_buf(),
                source,
            })?;
        }

        let json = serde_json::to_string_pretty(&self.entries)?;
        let tmp = self.path.with_extension("json.tmp");
        std::fs::write(&tmp, json).map_err(|source| CacheError::Write {
            path: tmp.clone(),
            source,
        })?;
        std::fs::rename(&tmp, &self.path).map_err(|source| CacheError::Write {
            path: self.path.clone(),
            source,
        })
    }
}

fn load_entries(path: &Path) -> BTreeMap<String, Value> {
    let content = match std::fs::read_to_string(path) {
        Ok(content) => content,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return BTreeMap::new(),
        Err(e) => {
            tracing::warn!(path = %path.display(), error = %e, "Cache unreadable, starting empty");
            return BTreeMap::new();
        }
    };

    match serde_json::from_str(&content) {
        Ok(entries) => entries,
        Err(e) => {
            tracing::warn!(path = %path.display(), error = %e, "Cache corrupt, starting empty");
            BTreeMap::new()
        }
    }
}
