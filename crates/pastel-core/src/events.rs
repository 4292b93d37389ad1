use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::ledger::{AlertLevel, TransactionKind};
use crate::timer::Phase;

/// Every state change in the core produces an Event.
/// Front ends print or render them; alerts are forwarded to the notifier.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Event {
    TimerStarted {
        phase: Phase,
        remaining_secs: u64,
        at: DateTime<Utc>,
    },
    TimerPaused {
        phase: Phase,
        remaining_secs: u64,
        at: DateTime<Utc>,
    },
    TimerReset {
        at: DateTime<Utc>,
    },
    /// A phase ran down to zero. The timer is stopped on `next_phase`.
    PhaseCompleted {
        phase: Phase,
        next_phase: Phase,
        sessions_completed: u64,
        at: DateTime<Utc>,
    },
    DurationsChanged {
        focus_minutes: u32,
        break_minutes: u32,
        at: DateTime<Utc>,
    },
    TransactionAdded {
        id: i64,
        kind: TransactionKind,
        #[serde(with = "rust_decimal::serde::float")]
        amount: Decimal,
        at: DateTime<Utc>,
    },
    BudgetAlert {
        level: AlertLevel,
        #[serde(with = "rust_decimal::serde::float")]
        ratio: Decimal,
        #[serde(with = "rust_decimal::serde::float")]
        total_expenses: Decimal,
        #[serde(with = "rust_decimal::serde::float")]
        budget: Decimal,
        at: DateTime<Utc>,
    },
    StateSnapshot {
        phase: Phase,
        remaining_secs: u64,
        total_secs: u64,
        running: bool,
        progress_pct: f64,
        sessions_completed: u64,
        at: DateTime<Utc>,
    },
}
