//! Test storage: a `KeyValueStorage` that refuses every operation.

use dicedr_core::error::StorageError;
use dicedr_core::storage::KeyValueStorage;

/// Fails every read with `Unavailable` and every write with `QuotaExceeded`.
/// Useful for exercising the "persistence is never user-fatal" paths.
#[derive(Debug, Default)]
pub struct FailingStorage;

impl KeyValueStorage for FailingStorage {
    fn get_item(&self, _key: &str) -> Result<Option<String>, StorageError> {
        Err(StorageError::Unavailable("storage disabled".into()))
    }

    fn set_item(&self, key: &str, _value: &str) -> Result<(), StorageError> {
        Err(StorageError::QuotaExceeded { key: key.to_owned() })
    }

    fn remove_item(&self, _key: &str) -> Result<(), StorageError> {
        Err(StorageError::Unavailable("storage disabled".into()))
    }
}
