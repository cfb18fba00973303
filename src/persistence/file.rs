//! Filesystem storage backend
//!
//! Each key becomes `<data_dir>/<key>.json`.

use std::path::{Path, PathBuf};

use super::{Storage, StorageError};

#[derive(Debug, Clone)]
pub struct FileStorage {
    data_dir: PathBuf,
}

impl FileStorage {
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
        }
    }

    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    fn resolve(&self, key: &str) -> PathBuf {
        self.data_dir.join(format!("{key}.json"))
    }
}

impl Storage for FileStorage {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        match std::fs::read_to_string(self.resolve(key)) {
            Ok(data) => Ok(Some(data)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        std::fs::create_dir_all(&self.data_dir)?;

        // Write-then-rename so a crash never leaves half a document behind
        let path = self.resolve(key);
        let tmp = path.with_extension("json.tmp");
        std::fs::write(&tmp, value)?;
        std::fs::rename(&tmp, &path)?;
        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<(), StorageError> {
        match std::fs::remove_file(self.resolve(key)) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn setup() -> (TempDir, FileStorage) {
        let dir = TempDir::new().unwrap();
        let storage = FileStorage::new(dir.path().join("data"));
        (dir, storage)
    }

    #[test]
    fn test_missing_key_reads_as_none() {
        let (_dir, storage) = setup();
        assert_eq!(storage.get("leaderboard").unwrap(), None);
    }

    #[test]
    fn test_write_creates_dir_and_reads_back() {
        let (_dir, mut storage) = setup();
        storage.set("leaderboard", "[]").unwrap();
        assert!(storage.data_dir().join("leaderboard.json").exists());
        assert_eq!(storage.get("leaderboard").unwrap().as_deref(), Some("[]"));
    }

    #[test]
    fn test_remove_is_idempotent() {
        let (_dir, mut storage) = setup();
        storage.set("flags", "true").unwrap();
        storage.remove("flags").unwrap();
        storage.remove("flags").unwrap();
        assert_eq!(storage.get("flags").unwrap(), None);
    }
}
