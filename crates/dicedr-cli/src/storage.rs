//! File-backed key-value storage: one `<key>.json` file per key.

use std::fs;
use std::io::{self, ErrorKind};
use std::path::{Path, PathBuf};

use dicedr_core::error::StorageError;
use dicedr_core::storage::KeyValueStorage;

/// Stores each key as a file under a data directory.
#[derive(Debug, Clone)]
pub struct FileStorage {
    dir: PathBuf,
}

impl FileStorage {
    /// Opens (creating if needed) the data directory.
    ///
    /// # Errors
    ///
    /// Returns the I/O error if the directory cannot be created.
    pub fn open(dir: impl Into<PathBuf>) -> io::Result<Self> {
        let dir = dir.into();
        fs::create_dir_all(&dir)?;
        Ok(Self { dir })
    }

    /// The data directory.
    #[must_use]
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{key}.json"))
    }
}

fn unavailable(key: &str, e: &io::Error) -> StorageError {
    StorageError::Unavailable(format!("{key}: {e}"))
}

impl KeyValueStorage for FileStorage {
    fn get_item(&self, key: &str) -> Result<Option<String>, StorageError> {
        match fs::read_to_string(self.path(key)) {
            Ok(raw) => Ok(Some(raw)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(unavailable(key, &e)),
        }
    }

    fn set_item(&self, key: &str, value: &str) -> Result<(), StorageError> {
        fs::write(self.path(key), value).map_err(|e| match e.kind() {
            ErrorKind::StorageFull | ErrorKind::QuotaExceeded => StorageError::QuotaExceeded {
                key: key.to_owned(),
            },
            _ => unavailable(key, &e),
        })
    }

    fn remove_item(&self, key: &str) -> Result<(), StorageError> {
        match fs::remove_file(self.path(key)) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(unavailable(key, &e)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct ScratchDir(PathBuf);

    impl ScratchDir {
        fn new() -> Self {
            Self(std::env::temp_dir().join(format!("dicedr-test-{}", uuid::Uuid::new_v4())))
        }
    }

    impl Drop for ScratchDir {
        fn drop(&mut self) {
            let _ = fs::remove_dir_all(&self.0);
        }
    }

    #[test]
    fn test_set_get_remove() {
        let scratch = ScratchDir::new();
        let storage = FileStorage::open(&scratch.0).unwrap();

        assert_eq!(storage.get_item("dicedr_state").unwrap(), None);
        storage.set_item("dicedr_state", r#"{"methodId":"dice"}"#).unwrap();
        assert_eq!(
            storage.get_item("dicedr_state").unwrap().as_deref(),
            Some(r#"{"methodId":"dice"}"#)
        );
        assert!(scratch.0.join("dicedr_state.json").is_file());

        storage.remove_item("dicedr_state").unwrap();
        storage.remove_item("dicedr_state").unwrap();
        assert_eq!(storage.get_item("dicedr_state").unwrap(), None);
    }

    #[test]
    fn test_open_creates_nested_directory() {
        let scratch = ScratchDir::new();
        let nested = scratch.0.join("a").join("b");

        let storage = FileStorage::open(&nested).unwrap();

        assert!(storage.dir().is_dir());
    }

    #[test]
    fn test_unreadable_key_is_unavailable() {
        let scratch = ScratchDir::new();
        let storage = FileStorage::open(&scratch.0).unwrap();
        fs::create_dir(scratch.0.join("dicedr_history.json")).unwrap();

        assert!(matches!(
            storage.get_item("dicedr_history"),
            Err(StorageError::Unavailable(_))
        ));
    }
}
