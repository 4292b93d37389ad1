use serde::de::DeserializeOwned;
use serde::Serialize;

use super::backend::{KvBackend, MemoryBackend};
use super::database::Database;
use super::write_behind::WriteBehind;
use crate::error::StorageError;

/// Typed JSON view over a [`KvBackend`].
///
/// `load` and `save` never fail: a missing, unreadable, or undecodable value
/// loads as `None`, and a failed write is logged and dropped. The caller's
/// in-memory copy stays authoritative either way.
pub struct PersistentStore {
    backend: Box<dyn KvBackend>,
}

impl PersistentStore {
    pub fn new(backend: impl KvBackend + 'static) -> Self {
        Self {
            backend: Box::new(backend),
        }
    }

    /// Nothing persists past the process.
    pub fn in_memory() -> Self {
        Self::new(MemoryBackend::new())
    }

    /// SQLite in the data directory behind a write-behind worker.
    ///
    /// # Errors
    /// Returns an error if the database cannot be opened.
    pub fn open_default() -> Result<Self, StorageError> {
        let db = Database::open()?;
        Ok(Self::new(WriteBehind::spawn(db)?))
    }

    pub fn load<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        let raw = match self.backend.read(key) {
            Ok(Some(raw)) => raw,
            Ok(None) => return None,
            Err(e) => {
                tracing::warn!(key, error = %e, "could not load state");
                return None;
            }
        };
        match serde_json::from_str(&raw) {
            Ok(value) => Some(value),
            Err(e) => {
                tracing::warn!(key, error = %e, "stored state is not valid, ignoring it");
                None
            }
        }
    }

    pub fn save<T: Serialize + ?Sized>(&self, key: &str, value: &T) {
        let raw = match serde_json::to_string(value) {
            Ok(raw) => raw,
            Err(e) => {
                tracing::warn!(key, error = %e, "could not serialize state");
                return;
            }
        };
        if let Err(e) = self.backend.write(key, &raw) {
            tracing::warn!(key, error = %e, "could not save state");
        }
    }

    /// Wait for queued writes. Failures are logged, like every other store
    /// error.
    pub fn flush(&self) {
        if let Err(e) = self.backend.flush() {
            tracing::warn!(error = %e, "could not flush state");
        }
    }
}

impl std::fmt::Debug for PersistentStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PersistentStore").finish_non_exhaustive()
    }
}
