// src/cache/storage.rs

use anyhow::{bail, Context, Result};
use std::{
    collections::HashMap,
    fs, io,
    path::{Path, PathBuf},
    sync::Mutex,
};
use tempfile::TempDir;

/// String key/value store scoped to one session.
pub trait SessionStorage {
    fn get_item(&self, key: &str) -> Result<Option<String>>;
    fn set_item(&self, key: &str, value: &str) -> Result<()>;
    fn remove_item(&self, key: &str) -> Result<()>;
}

/// In-process storage; gone when the value is dropped.
#[derive(Debug, Default)]
pub struct MemoryStorage {
    items: Mutex<HashMap<String, String>>,
    /// Total bytes (keys + values) the store accepts, if limited.
    quota: Option<usize>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_quota(quota: usize) -> Self {
        Self {
            items: Mutex::new(HashMap::new()),
            quota: Some(quota),
        }
    }
}

impl SessionStorage for MemoryStorage {
    fn get_item(&self, key: &str) -> Result<Option<String>> {
        let items = self.items.lock().unwrap();
        Ok(items.get(key).cloned())
    }

    fn set_item(&self, key: &str, value: &str) -> Result<()> {
        let mut items = self.items.lock().unwrap();
        if let Some(quota) = self.quota {
            let others: usize = items
                .iter()
                .filter(|(k, _)| k.as_str() != key)
                .map(|(k, v)| k.len() + v.len())
                .sum();
            let needed = others + key.len() + value.len();
            if needed > quota {
                bail!("session storage quota exceeded ({} > {} bytes)", needed, quota);
            }
        }
        items.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove_item(&self, key: &str) -> Result<()> {
        self.items.lock().unwrap().remove(key);
        Ok(())
    }
}

/// One file per key inside a private temporary directory. The directory
/// is deleted when the storage is dropped, so nothing outlives the session
/// and two sessions never see each other's entries.
#[derive(Debug)]
pub struct DirStorage {
    dir: TempDir,
}

impl DirStorage {
    pub fn new() -> Result<Self> {
        let dir = tempfile::Builder::new()
            .prefix("jobboard-session-")
            .tempdir()
            .context("creating session storage directory")?;
        Ok(Self { dir })
    }

    /// Create the session directory under `parent` instead of the system temp dir.
    pub fn new_in(parent: impl AsRef<Path>) -> Result<Self> {
        let parent = parent.as_ref();
        fs::create_dir_all(parent)
            .with_context(|| format!("creating {}", parent.display()))?;
        let dir = tempfile::Builder::new()
            .prefix("jobboard-session-")
            .tempdir_in(parent)
            .with_context(|| format!("creating session storage under {}", parent.display()))?;
        Ok(Self { dir })
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    fn item_path(&self, key: &str) -> PathBuf {
        let name: String = key
            .chars()
            .map(|c| if c.is_ascii_alphanumeric() || c == '_' || c == '-' { c } else { '_' })
            .collect();
        self.dir.path().join(name)
    }
}

impl SessionStorage for DirStorage {
    fn get_item(&self, key: &str) -> Result<Option<String>> {
        let path = self.item_path(key);
        match fs::read_to_string(&path) {
            Ok(s) => Ok(Some(s)),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e).with_context(|| format!("reading {}", path.display())),
        }
    }

    fn set_item(&self, key: &str, value: &str) -> Result<()> {
        let path = self.item_path(key);
        let tmp = path.with_extension("tmp");
        fs::write(&tmp, value).with_context(|| format!("writing {}", tmp.display()))?;
        fs::rename(&tmp, &path).with_context(|| format!("renaming into {}", path.display()))?;
        Ok(())
    }

    fn remove_item(&self, key: &str) -> Result<()> {
        let path = self.item_path(key);
        match fs::remove_file(&path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e).with_context(|| format!("removing {}", path.display())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn exercise(storage: &dyn SessionStorage) -> Result<()> {
        assert_eq!(storage.get_item("k")?, None);
        storage.set_item("k", "v1")?;
        storage.set_item("k", "v2")?;
        assert_eq!(storage.get_item("k")?.as_deref(), Some("v2"));
        storage.remove_item("k")?;
        assert_eq!(storage.get_item("k")?, None);
        storage.remove_item("k")?;
        Ok(())
    }

    #[test]
    fn test_memory_storage() -> Result<()> {
        exercise(&MemoryStorage::new())
    }

    #[test]
    fn test_dir_storage() -> Result<()> {
        exercise(&DirStorage::new()?)
    }

    #[test]
    fn test_memory_quota() -> Result<()> {
        let storage = MemoryStorage::with_quota(8);
        storage.set_item("a", "1234")?;
        assert!(storage.set_item("b", "123456789").is_err());
        // overwriting an existing key only counts the new value
        storage.set_item("a", "1234567")?;
        Ok(())
    }

    #[test]
    fn test_dir_storage_removed_on_drop() -> Result<()> {
        let parent = tempfile::tempdir()?;
        let path = {
            let storage = DirStorage::new_in(parent.path())?;
            storage.set_item("codeyou_job_data", "{}")?;
            assert!(storage.path().exists());
            storage.path().to_path_buf()
        };
        assert!(!path.exists());
        Ok(())
    }

    #[test]
    fn test_dir_sessions_are_isolated() -> Result<()> {
        let a = DirStorage::new()?;
        let b = DirStorage::new()?;
        a.set_item("key", "from a")?;
        assert_eq!(b.get_item("key")?, None);
        Ok(())
    }
}
