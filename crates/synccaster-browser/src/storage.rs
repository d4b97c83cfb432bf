//! Handoff record persistence in `localStorage`.

use gloo_storage::errors::StorageError;
use gloo_storage::{LocalStorage, Storage};
use synccaster_core::{HANDOFF_STORAGE_KEY, HandoffError, HandoffRecord, HandoffStore};

#[derive(Debug, Clone, Copy, Default)]
pub struct LocalStorageHandoff;

impl HandoffStore for LocalStorageHandoff {
    fn load(&self) -> Result<Option<HandoffRecord>, HandoffError> {
        match LocalStorage::get::<HandoffRecord>(HANDOFF_STORAGE_KEY) {
            Ok(record) => Ok(Some(record)),
            Err(StorageError::KeyNotFound(_)) => Ok(None),
            Err(StorageError::SerdeError(e)) => Err(HandoffError::Malformed(e)),
            Err(e) => Err(HandoffError::Storage(format!("LocalStorage error: {}", e))),
        }
    }

    fn save(&self, record: &HandoffRecord) -> Result<(), HandoffError> {
        LocalStorage::set(HANDOFF_STORAGE_KEY, record)
            .map_err(|e| HandoffError::Storage(format!("LocalStorage error: {}", e)))
    }
}
