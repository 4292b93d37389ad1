use std::collections::HashMap;
use std::sync::Mutex;

use crate::error::StorageError;

/// Raw string storage under string keys.
pub trait KvBackend: Send {
    fn read(&self, key: &str) -> Result<Option<String>, StorageError>;

    fn write(&self, key: &str, value: &str) -> Result<(), StorageError>;

    /// Block until every accepted write is durable.
    fn flush(&self) -> Result<(), StorageError> {
        Ok(())
    }
}

impl<B: KvBackend + ?Sized> KvBackend for Box<B> {
    fn read(&self, key: &str) -> Result<Option<String>, StorageError> {
        (**self).read(key)
    }

    fn write(&self, key: &str, value: &str) -> Result<(), StorageError> {
        (**self).write(key, value)
    }

    fn flush(&self) -> Result<(), StorageError> {
        (**self).flush()
    }
}

/// Process-local map. Nothing survives a restart.
#[derive(Debug, Default)]
pub struct MemoryBackend {
    entries: Mutex<HashMap<String, String>>,
}

impl MemoryBackend {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KvBackend for MemoryBackend {
    fn read(&self, key: &str) -> Result<Option<String>, StorageError> {
        let entries = self
            .entries
            .lock()
            .map_err(|_| StorageError::QueryFailed("memory backend poisoned".into()))?;
        Ok(entries.get(key).cloned())
    }

    fn write(&self, key: &str, value: &str) -> Result<(), StorageError> {
        let mut entries = self
            .entries
            .lock()
            .map_err(|_| StorageError::QueryFailed("memory backend poisoned".into()))?;
        entries.insert(key.to_string(), value.to_string());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn memory_backend_overwrites() {
        let backend = MemoryBackend::new();
        assert!(backend.read("k").unwrap().is_none());
        backend.write("k", "1").unwrap();
        backend.write("k", "2").unwrap();
        assert_eq!(backend.read("k").unwrap().as_deref(), Some("2"));
    }
}
