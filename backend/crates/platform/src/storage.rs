//! Persistent Key-Value Storage
//!
//! Client-side persistent storage for small string values. Multi-key
//! writes and removals are applied as one batch: either every key
//! changes or none does.

use std::collections::{BTreeMap, HashMap};
use std::path::{Path, PathBuf};
use std::sync::Mutex;

pub type StorageResult<T> = Result<T, StorageError>;

#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("storage I/O failed: {0}")]
    Io(#[from] std::io::Error),

    #[error("storage file is corrupt: {0}")]
    Corrupt(#[from] serde_json::Error),

    #[error("storage lock poisoned")]
    Poisoned,
}

/// String key-value storage shared across request handlers.
pub trait KeyValueStorage: Send + Sync {
    fn get(&self, key: &str) -> StorageResult<Option<String>>;

    /// Write every entry, or none of them.
    fn set_all(&self, entries: &[(&str, &str)]) -> StorageResult<()>;

    /// Remove every key, or none of them. Missing keys are not an error.
    fn remove_all(&self, keys: &[&str]) -> StorageResult<()>;
}

impl<T: KeyValueStorage + ?Sized> KeyValueStorage for std::sync::Arc<T> {
    fn get(&self, key: &str) -> StorageResult<Option<String>> {
        (**self).get(key)
    }

    fn set_all(&self, entries: &[(&str, &str)]) -> StorageResult<()> {
        (**self).set_all(entries)
    }

    fn remove_all(&self, keys: &[&str]) -> StorageResult<()> {
        (**self).remove_all(keys)
    }
}

// ============================================================================
// In-memory backend
// ============================================================================

/// Process-lifetime storage. Used when no storage file is configured.
#[derive(Debug, Default)]
pub struct MemoryStorage {
    entries: Mutex<HashMap<String, String>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pre-populated storage, e.g. to simulate a previous run.
    pub fn with_entries<I, K, V>(entries: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            entries: Mutex::new(
                entries
                    .into_iter()
                    .map(|(k, v)| (k.into(), v.into()))
                    .collect(),
            ),
        }
    }
}

impl KeyValueStorage for MemoryStorage {
    fn get(&self, key: &str) -> StorageResult<Option<String>> {
        let entries = self.entries.lock().map_err(|_| StorageError::Poisoned)?;
        Ok(entries.get(key).cloned())
    }

    fn set_all(&self, entries: &[(&str, &str)]) -> StorageResult<()> {
        let mut map = self.entries.lock().map_err(|_| StorageError::Poisoned)?;
        for (key, value) in entries {
            map.insert((*key).to_string(), (*value).to_string());
        }
        Ok(())
    }

    fn remove_all(&self, keys: &[&str]) -> StorageResult<()> {
        let mut map = self.entries.lock().map_err(|_| StorageError::Poisoned)?;
        for key in keys {
            map.remove(*key);
        }
        Ok(())
    }
}

// ============================================================================
// JSON file backend
// ============================================================================

/// Storage persisted as a flat JSON object on disk.
///
/// Every batch rewrites the whole file through a temporary sibling and a
/// rename, so a crash mid-write leaves the previous contents intact.
#[derive(Debug)]
pub struct FileStorage {
    path: PathBuf,
    cache: Mutex<BTreeMap<String, String>>,
}

impl FileStorage {
    /// Open (or lazily create) the storage file at `path`.
    pub fn open(path: impl AsRef<Path>) -> StorageResult<Self> {
        let path = path.as_ref().to_path_buf();

        let cache = match std::fs::read(&path) {
            Ok(bytes) if bytes.iter().all(u8::is_ascii_whitespace) => BTreeMap::new(),
            Ok(bytes) => serde_json::from_slice(&bytes)?,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => BTreeMap::new(),
            Err(e) => return Err(e.into()),
        };

        tracing::debug!(path = %path.display(), keys = cache.len(), "Opened storage file");

        Ok(Self {
            path,
            cache: Mutex::new(cache),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn persist(&self, map: &BTreeMap<String, String>) -> StorageResult<()> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }

        let tmp = self.path.with_extension("tmp");
        std::fs::write(&tmp, serde_json::to_vec_pretty(map)?)?;
        std::fs::rename(&tmp, &self.path)?;
        Ok(())
    }
}

impl KeyValueStorage for FileStorage {
    fn get(&self, key: &str) -> StorageResult<Option<String>> {
        let cache = self.cache.lock().map_err(|_| StorageError::Poisoned)?;
        Ok(cache.get(key).cloned())
    }

    fn set_all(&self, entries: &[(&str, &str)]) -> StorageResult<()> {
        let mut cache = self.cache.lock().map_err(|_| StorageError::Poisoned)?;

        let mut next = cache.clone();
        for (key, value) in entries {
            next.insert((*key).to_string(), (*value).to_string());
        }

        self.persist(&next)?;
        *cache = next;
        Ok(())
    }

    fn remove_all(&self, keys: &[&str]) -> StorageResult<()> {
        let mut cache = self.cache.lock().map_err(|_| StorageError::Poisoned)?;

        if !keys.iter().any(|key| cache.contains_key(*key)) {
            return Ok(());
        }

        let mut next = cache.clone();
        for key in keys {
            next.remove(*key);
        }

        self.persist(&next)?;
        *cache = next;
        Ok(())
    }
}

// ============================================================================
// Namespaced view
// ============================================================================

/// View of another storage with every key placed under `<namespace>.`.
///
/// Lets many independent owners share one backing store without their
/// keys colliding.
#[derive(Debug, Clone)]
pub struct Namespaced<S> {
    inner: S,
    prefix: String,
}

impl<S> Namespaced<S>
where
    S: KeyValueStorage,
{
    pub fn new(inner: S, namespace: &str) -> Self {
        Self {
            inner,
            prefix: format!("{namespace}."),
        }
    }

    fn key(&self, key: &str) -> String {
        format!("{}{}", self.prefix, key)
    }
}

impl<S> KeyValueStorage for Namespaced<S>
where
    S: KeyValueStorage,
{
    fn get(&self, key: &str) -> StorageResult<Option<String>> {
        self.inner.get(&self.key(key))
    }

    fn set_all(&self, entries: &[(&str, &str)]) -> StorageResult<()> {
        let keys: Vec<String> = entries.iter().map(|(key, _)| self.key(key)).collect();
        let scoped: Vec<(&str, &str)> = keys
            .iter()
            .zip(entries)
            .map(|(key, (_, value))| (key.as_str(), *value))
            .collect();
        self.inner.set_all(&scoped)
    }

    fn remove_all(&self, keys: &[&str]) -> StorageResult<()> {
        let keys: Vec<String> = keys.iter().map(|key| self.key(key)).collect();
        let scoped: Vec<&str> = keys.iter().map(String::as_str).collect();
        self.inner.remove_all(&scoped)
    }
}
