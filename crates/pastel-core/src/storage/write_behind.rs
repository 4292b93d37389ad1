//! Fire-and-forget writes on a dedicated thread.
//!
//! The backend lives on one worker thread fed by a single channel, so
//! requests are applied strictly in the order they were submitted: a later
//! write to a key always lands after an earlier one, and a read observes
//! every write queued before it.

use std::sync::mpsc::{self, Receiver, Sender};
use std::thread::JoinHandle;

use super::backend::KvBackend;
use crate::error::StorageError;

enum Request {
    Write {
        key: String,
        value: String,
    },
    Read {
        key: String,
        reply: Sender<Result<Option<String>, StorageError>>,
    },
    Flush {
        reply: Sender<Result<(), StorageError>>,
    },
}

pub struct WriteBehind {
    tx: Option<Sender<Request>>,
    worker: Option<JoinHandle<()>>,
}

impl WriteBehind {
    /// Move `backend` onto a new worker thread.
    ///
    /// # Errors
    /// Returns an error if the thread cannot be spawned.
    pub fn spawn<B: KvBackend + 'static>(backend: B) -> Result<Self, StorageError> {
        let (tx, rx) = mpsc::channel();
        let worker = std::thread::Builder::new()
            .name("pastel-store".into())
            .spawn(move || run(backend, rx))
            .map_err(|e| StorageError::QueryFailed(format!("spawn storage writer: {e}")))?;
        Ok(Self {
            tx: Some(tx),
            worker: Some(worker),
        })
    }

    fn send(&self, request: Request) -> Result<(), StorageError> {
        self.tx
            .as_ref()
            .ok_or(StorageError::WriterClosed)?
            .send(request)
            .map_err(|_| StorageError::WriterClosed)
    }
}

fn run<B: KvBackend>(backend: B, rx: Receiver<Request>) {
    for request in rx {
        match request {
            Request::Write { key, value } => {
                if let Err(e) = backend.write(&key, &value) {
                    tracing::warn!(key = %key, error = %e, "deferred write failed");
                }
            }
            Request::Read { key, reply } => {
                let _ = reply.send(backend.read(&key));
            }
            Request::Flush { reply } => {
                let _ = reply.send(backend.flush());
            }
        }
    }
    tracing::trace!("storage writer drained");
}

impl KvBackend for WriteBehind {
    fn read(&self, key: &str) -> Result<Option<String>, StorageError> {
        let (reply, rx) = mpsc::channel();
        self.send(Request::Read {
            key: key.to_string(),
            reply,
        })?;
        rx.recv().map_err(|_| StorageError::WriterClosed)?
    }

    /// Queue the write and return immediately.
    fn write(&self, key: &str, value: &str) -> Result<(), StorageError> {
        self.send(Request::Write {
            key: key.to_string(),
            value: value.to_string(),
        })
    }

    fn flush(&self) -> Result<(), StorageError> {
        let (reply, rx) = mpsc::channel();
        self.send(Request::Flush { reply })?;
        rx.recv().map_err(|_| StorageError::WriterClosed)?
    }
}

impl Drop for WriteBehind {
    fn drop(&mut self) {
        // Closing the channel lets the worker finish the queue and exit.
        self.tx.take();
        if let Some(worker) = self.worker.take() {
            if worker.join().is_err() {
                tracing::warn!("storage writer panicked");
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::{Database, MemoryBackend};
    use std::sync::Arc;

    /// Shares one map between the worker and the test.
    struct Shared(Arc<MemoryBackend>);

    impl KvBackend for Shared {
        fn read(&self, key: &str) -> Result<Option<String>, StorageError> {
            self.0.read(key)
        }
        fn write(&self, key: &str, value: &str) -> Result<(), StorageError> {
            self.0.write(key, value)
        }
    }

    #[test]
    fn later_write_wins() {
        let store = WriteBehind::spawn(MemoryBackend::new()).unwrap();
        for i in 0..100 {
            store.write("counter", &i.to_string()).unwrap();
        }
        assert_eq!(store.read("counter").unwrap().as_deref(), Some("99"));
    }

    #[test]
    fn keys_are_independent() {
        let store = WriteBehind::spawn(MemoryBackend::new()).unwrap();
        store.write("a", "1").unwrap();
        store.write("b", "2").unwrap();
        store.write("a", "3").unwrap();
        assert_eq!(store.read("a").unwrap().as_deref(), Some("3"));
        assert_eq!(store.read("b").unwrap().as_deref(), Some("2"));
    }

    #[test]
    fn drop_drains_pending_writes() {
        let shared = Arc::new(MemoryBackend::new());
        {
            let store = WriteBehind::spawn(Shared(Arc::clone(&shared))).unwrap();
            store.write("pastel-notes", "[]").unwrap();
        }
        assert_eq!(shared.read("pastel-notes").unwrap().as_deref(), Some("[]"));
    }

    #[test]
    fn flush_reaches_sqlite() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("pastel.db");
        let store = WriteBehind::spawn(Database::open_at(&path).unwrap()).unwrap();
        store.write("pastel-monthly-budget", "1000").unwrap();
        store.flush().unwrap();

        let direct = Database::open_at(&path).unwrap();
        assert_eq!(
            direct.read("pastel-monthly-budget").unwrap().as_deref(),
            Some("1000")
        );
    }
}
