use std::{
    collections::HashMap,
    io::ErrorKind,
    path::{Path, PathBuf},
    sync::RwLock,
};

use async_trait::async_trait;

use crate::{config, error::CacheError, provider::CacheStore};

/// Process-local store. Values are replaced whole under the write lock, so a
/// reader sees either the old or the new entry.
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: RwLock<HashMap<String, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.read().map(|e| e.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[async_trait]
impl CacheStore for MemoryStore {
    async fn get(&self, key: &str) -> Result<Option<String>, CacheError> {
        let entries = self.entries.read().map_err(|_| CacheError::Poisoned)?;
        Ok(entries.get(key).cloned())
    }

    async fn set(&self, key: &str, value: String) -> Result<(), CacheError> {
        let mut entries = self.entries.write().map_err(|_| CacheError::Poisoned)?;
        entries.insert(key.to_string(), value);
        Ok(())
    }

    async fn remove(&self, key: &str) -> Result<(), CacheError> {
        let mut entries = self.entries.write().map_err(|_| CacheError::Poisoned)?;
        entries.remove(key);
        Ok(())
    }

    async fn clear(&self) -> Result<(), CacheError> {
        let mut entries = self.entries.write().map_err(|_| CacheError::Poisoned)?;
        entries.clear();
        Ok(())
    }
}

/// One JSON file per key below a cache directory.
///
/// Writes go to a temporary file that is renamed over the target, so a
/// concurrent reader never sees a half-written entry. Keys must be file name
/// safe; the caches only hand out hashed keys.
///
/// [`CacheStore::clear`] removes the entry files and leftover temporaries
/// only. The directory and anything else in it are left alone.
#[derive(Debug, Clone)]
pub struct FileStore {
    dir: PathBuf,
}

impl FileStore {
    pub fn new(dir: PathBuf) -> Self {
        Self { dir }
    }

    /// Store under `<data_local_dir>/albumix/cache` unless `ALBUMIX_CACHE_DIR`
    /// points elsewhere.
    pub fn default_location() -> Self {
        Self::new(config::cache_dir())
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn entry_path(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{key}.json"))
    }
}

fn is_entry_file(name: &str) -> bool {
    name.ends_with(".json") || name.ends_with(".json.tmp")
}

#[async_trait]
impl CacheStore for FileStore {
    async fn get(&self, key: &str) -> Result<Option<String>, CacheError> {
        match async_fs::read_to_string(self.entry_path(key)).await {
            Ok(content) => Ok(Some(content)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(CacheError::Io(e)),
        }
    }

    async fn set(&self, key: &str, value: String) -> Result<(), CacheError> {
        async_fs::create_dir_all(&self.dir).await?;

        let path = self.entry_path(key);
        let tmp = self.dir.join(format!("{key}.json.tmp"));
        async_fs::write(&tmp, value).await?;
        async_fs::rename(&tmp, &path).await?;
        Ok(())
    }

    async fn remove(&self, key: &str) -> Result<(), CacheError> {
        match async_fs::remove_file(self.entry_path(key)).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(CacheError::Io(e)),
        }
    }

    async fn clear(&self) -> Result<(), CacheError> {
        let mut entries = match tokio::fs::read_dir(&self.dir).await {
            Ok(entries) => entries,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(()),
            Err(e) => return Err(CacheError::Io(e)),
        };

        while let Some(entry) = entries.next_entry().await? {
            let path = entry.path();
            let is_entry = path
                .file_name()
                .and_then(|name| name.to_str())
                .is_some_and(is_entry_file);
            if !is_entry || !entry.file_type().await?.is_file() {
                continue;
            }

            match async_fs::remove_file(&path).await {
                Ok(()) => log::debug!("Removed cache entry {}", path.display()),
                Err(e) if e.kind() == ErrorKind::NotFound => {}
                Err(e) => return Err(CacheError::Io(e)),
            }
        }

        Ok(())
    }
}
