//! # Pastel Core Library
//!
//! Business logic for the Pastel planner: a pomodoro focus timer, an expense
//! ledger with budget alerts, a day planner, and a notes list. Front ends
//! (the `pastel` CLI) are thin layers that call into [`AppState`] and render
//! what it exposes.
//!
//! ## Architecture
//!
//! - **Ledger**: append-only transactions sorted newest first, all-time
//!   budget evaluation on every expense
//! - **Timer**: a focus/break countdown driven by an external one-second tick
//! - **Storage**: one JSON document per key in SQLite, written behind the
//!   caller on a worker thread; TOML configuration
//! - **Notify**: fire-and-forget sink for alerts and confirmations
//!
//! ## Key Components
//!
//! - [`AppState`]: the single write path over every tracker
//! - [`Ledger`]: transactions, aggregates, budget alerts
//! - [`SessionTimer`]: two-phase countdown state machine
//! - [`PersistentStore`]: typed, failure-tolerant key-value access
//! - [`Config`]: application configuration management

pub mod app;
pub mod board;
pub mod error;
pub mod events;
pub mod ledger;
pub mod notes;
pub mod notify;
pub mod storage;
pub mod timer;

pub use app::{run_countdown, AppState, CountdownOutcome, Overview};
pub use board::{Task, TaskBoard};
pub use error::{ConfigError, CoreError, StorageError, ValidationError};
pub use events::Event;
pub use ledger::{AlertLevel, BudgetAlert, Ledger, LedgerSummary, Transaction, TransactionKind};
pub use notes::{Note, NoteDraft, NotesCollection, TagColor};
pub use notify::{Notification, Notifier, RecordingNotifier, Severity};
pub use storage::{Config, Database, PersistentStore};
pub use timer::{Durations, Phase, SessionTimer, Ticker};
