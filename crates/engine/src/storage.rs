//! Key-value storage capability.
//!
//! Every persisted piece of state goes through [`KeyValueStore`], so the
//! engine never knows whether it talks to a file on disk or to a map in
//! memory. Implementations are shared handles: methods take `&self` and the
//! same store is handed to the session and to the scoped data store.

use std::{
    collections::BTreeMap,
    fs,
    path::{Path, PathBuf},
    sync::{Arc, Mutex, MutexGuard},
};

use crate::{EngineError, ResultEngine};

/// Minimal string key-value store.
pub trait KeyValueStore: Send + Sync {
    /// Read the value stored under `key`, `None` when absent.
    fn get(&self, key: &str) -> ResultEngine<Option<String>>;

    /// Store `value` under `key`, overwriting any previous value.
    fn set(&self, key: &str, value: &str) -> ResultEngine<()>;

    /// Remove `key`. Removing a missing key is not an error.
    fn remove(&self, key: &str) -> ResultEngine<()>;

    /// Every key currently stored, sorted.
    fn keys(&self) -> ResultEngine<Vec<String>>;
}

/// Shared handle to a store.
pub type SharedStore = Arc<dyn KeyValueStore>;

fn lock(
    entries: &Mutex<BTreeMap<String, String>>,
) -> ResultEngine<MutexGuard<'_, BTreeMap<String, String>>> {
    entries
        .lock()
        .map_err(|_| EngineError::Storage("store lock poisoned".to_string()))
}

/// In-memory store. Cloning yields another handle to the same map.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    entries: Arc<Mutex<BTreeMap<String, String>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Wrap the store in a [`SharedStore`] while keeping this handle usable.
    pub fn shared(&self) -> SharedStore {
        Arc::new(self.clone())
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> ResultEngine<Option<String>> {
        Ok(lock(&self.entries)?.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> ResultEngine<()> {
        lock(&self.entries)?.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> ResultEngine<()> {
        lock(&self.entries)?.remove(key);
        Ok(())
    }

    fn keys(&self) -> ResultEngine<Vec<String>> {
        Ok(lock(&self.entries)?.keys().cloned().collect())
    }
}

/// Store backed by a single JSON object file.
///
/// The whole map is loaded on [`FileStore::open`] and the file is rewritten
/// after every `set`/`remove`.
#[derive(Debug)]
pub struct FileStore {
    path: PathBuf,
    entries: Mutex<BTreeMap<String, String>>,
}

impl FileStore {
    /// Open the store at `path`. A missing file opens as an empty store.
    pub fn open(path: impl AsRef<Path>) -> ResultEngine<Self> {
        let path = path.as_ref().to_path_buf();
        let entries = match fs::read_to_string(&path) {
            Ok(content) if content.trim().is_empty() => BTreeMap::new(),
            Ok(content) => serde_json::from_str(&content)?,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => BTreeMap::new(),
            Err(err) => return Err(err.into()),
        };
        tracing::debug!("opened store {} ({} keys)", path.display(), entries.len());
        Ok(Self {
            path,
            entries: Mutex::new(entries),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn flush(&self, entries: &BTreeMap<String, String>) -> ResultEngine<()> {
        if let Some(parent) = self.path.parent()
            && !parent.as_os_str().is_empty()
        {
            fs::create_dir_all(parent)?;
        }
        let payload = serde_json::to_string_pretty(entries)?;
        fs::write(&self.path, payload)?;
        Ok(())
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> ResultEngine<Option<String>> {
        Ok(lock(&self.entries)?.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> ResultEngine<()> {
        let mut entries = lock(&self.entries)?;
        entries.insert(key.to_string(), value.to_string());
        self.flush(&entries)
    }

    fn remove(&self, key: &str) -> ResultEngine<()> {
        let mut entries = lock(&self.entries)?;
        if entries.remove(key).is_some() {
            self.flush(&entries)?;
        }
        Ok(())
    }

    fn keys(&self) -> ResultEngine<Vec<String>> {
        Ok(lock(&self.entries)?.keys().cloned().collect())
    }
}
