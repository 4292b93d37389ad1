//! Key-value persistence.
//!
//! Every logical domain (transactions, notes, timer settings, ...) is one JSON
//! document under one key. [`PersistentStore`] is the typed facade the app
//! state talks to; it swallows and logs every failure so a broken disk never
//! takes the in-memory state down with it.

mod backend;
mod config;
pub mod database;
pub mod keys;
mod store;
mod write_behind;

pub use backend::{KvBackend, MemoryBackend};
pub use config::{Config, DefaultsConfig, DisplayConfig, LoggingConfig};
pub use database::Database;
pub use store::PersistentStore;
pub use write_behind::WriteBehind;

use std::path::PathBuf;

use crate::error::StorageError;

/// Where the data directory lives, without touching the filesystem.
///
/// `PASTEL_HOME` wins outright. Otherwise `~/.config/pastel/`, or
/// `~/.config/pastel-dev/` when `PASTEL_ENV=dev`.
pub fn data_dir_path() -> PathBuf {
    match std::env::var_os("PASTEL_HOME") {
        Some(home) if !home.is_empty() => PathBuf::from(home),
        _ => {
            let base_dir = dirs::home_dir()
                .unwrap_or_else(|| PathBuf::from("."))
                .join(".config");
            let env = std::env::var("PASTEL_ENV").unwrap_or_else(|_| "production".to_string());
            if env == "dev" {
                base_dir.join("pastel-dev")
            } else {
                base_dir.join("pastel")
            }
        }
    }
}

/// Returns the data directory, creating it if needed.
///
/// # Errors
/// Returns an error if creating the directory fails.
pub fn data_dir() -> Result<PathBuf, StorageError> {
    let dir = data_dir_path();
    std::fs::create_dir_all(&dir)
        .map_err(|e| StorageError::DataDir(format!("{}: {e}", dir.display())))?;
    Ok(dir)
}
