//! Expense ledger with an all-time budget threshold.
//!
//! The collection is append-only and kept sorted newest first. Every expense
//! insertion re-evaluates spending against the budget and may raise a
//! [`BudgetAlert`].

mod engine;
mod transaction;

pub use engine::{evaluate_ratio, AlertLevel, BudgetAlert, CategoryTotal, Ledger, LedgerSummary};
pub use transaction::{
    check_amount, format_amount, Transaction, TransactionDraft, TransactionKind,
    EXPENSE_CATEGORIES, INCOME_CATEGORIES, MAX_AMOUNT,
};
