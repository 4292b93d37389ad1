use std::collections::BTreeMap;

use chrono::{NaiveDate, TimeZone, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::transaction::{Transaction, TransactionKind, MAX_AMOUNT};
use crate::events::Event;
use crate::notify::{Notification, Severity};

/// Spending at or above this share of the budget raises a warning.
const WARNING_RATIO: Decimal = Decimal::from_parts(9, 0, 0, false, 1);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AlertLevel {
    /// Spending is within [90%, 100%] of the budget.
    Warning,
    /// Spending is over the budget.
    Exceeded,
}

impl AlertLevel {
    pub fn severity(&self) -> Severity {
        match self {
            AlertLevel::Warning => Severity::Warning,
            AlertLevel::Exceeded => Severity::Critical,
        }
    }
}

/// Raised by [`Ledger::add_transaction`] when an expense pushes spending
/// into the alert band.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BudgetAlert {
    pub level: AlertLevel,
    pub ratio: Decimal,
    pub total_expenses: Decimal,
    pub budget: Decimal,
}

impl BudgetAlert {
    pub fn notification(&self) -> Notification {
        let description = match self.level {
            AlertLevel::Exceeded => "You have exceeded your monthly budget.",
            AlertLevel::Warning => "You have spent 90% of your budget.",
        };
        Notification::new("Budget Alert", description, self.level.severity())
    }

    pub fn event(&self) -> Event {
        Event::BudgetAlert {
            level: self.level,
            ratio: self.ratio,
            total_expenses: self.total_expenses,
            budget: self.budget,
            at: Utc::now(),
        }
    }
}

/// Classify a spending ratio. `0.9 <= ratio <= 1.0` warns, anything above
/// 1.0 is exceeded.
pub fn evaluate_ratio(ratio: Decimal) -> Option<AlertLevel> {
    if ratio > Decimal::ONE {
        Some(AlertLevel::Exceeded)
    } else if ratio >= WARNING_RATIO {
        Some(AlertLevel::Warning)
    } else {
        None
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryTotal {
    pub category: String,
    #[serde(with = "rust_decimal::serde::float")]
    pub amount: Decimal,
}

/// Aggregates over the whole collection. Never filtered by month.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LedgerSummary {
    #[serde(with = "rust_decimal::serde::float")]
    pub total_income: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    pub total_expenses: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    pub budget: Decimal,
    /// `budget - total_expenses`; negative once the budget is blown.
    #[serde(with = "rust_decimal::serde::float")]
    pub remaining_budget: Decimal,
    /// 0 when there is no budget.
    #[serde(with = "rust_decimal::serde::float")]
    pub spending_percentage: Decimal,
    /// Expense totals keyed by category, ordered by category name.
    pub category_totals: Vec<CategoryTotal>,
}

/// Transaction collection plus the budget threshold.
#[derive(Debug, Clone, Default)]
pub struct Ledger {
    transactions: Vec<Transaction>,
    budget: Decimal,
}

impl Ledger {
    pub fn new(budget: Decimal) -> Self {
        Self {
            transactions: Vec::new(),
            budget: clamp_budget(budget),
        }
    }

    /// Rebuild a ledger from persisted parts. The stored list is re-sorted
    /// since nothing guarantees it was written by this code.
    pub fn from_parts(mut transactions: Vec<Transaction>, budget: Decimal) -> Self {
        sort_newest_first(&mut transactions);
        Self {
            transactions,
            budget: clamp_budget(budget),
        }
    }

    // ── Queries ──────────────────────────────────────────────────────

    /// Newest first.
    pub fn transactions(&self) -> &[Transaction] {
        &self.transactions
    }

    pub fn budget(&self) -> Decimal {
        self.budget
    }

    pub fn len(&self) -> usize {
        self.transactions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.transactions.is_empty()
    }

    pub fn total_expenses(&self) -> Decimal {
        self.sum_of(TransactionKind::Expense)
    }

    pub fn total_income(&self) -> Decimal {
        self.sum_of(TransactionKind::Income)
    }

    /// `total_expenses / budget`, or `None` without a budget.
    pub fn spending_ratio(&self) -> Option<Decimal> {
        if self.budget <= Decimal::ZERO {
            return None;
        }
        Some(
            self.total_expenses()
                .checked_div(self.budget)
                .unwrap_or(Decimal::MAX),
        )
    }

    pub fn summary(&self) -> LedgerSummary {
        let total_expenses = self.total_expenses();
        let spending_percentage = match self.spending_ratio() {
            Some(ratio) => ratio
                .checked_mul(Decimal::ONE_HUNDRED)
                .unwrap_or(Decimal::MAX),
            None => Decimal::ZERO,
        };

        let mut by_category: BTreeMap<&str, Decimal> = BTreeMap::new();
        for tx in self.transactions.iter().filter(|t| t.is_expense()) {
            let total = by_category.entry(tx.category.as_str()).or_default();
            *total = saturating_add(*total, tx.amount);
        }

        LedgerSummary {
            total_income: self.total_income(),
            total_expenses,
            budget: self.budget,
            remaining_budget: self
                .budget
                .checked_sub(total_expenses)
                .unwrap_or(Decimal::MIN),
            spending_percentage,
            category_totals: by_category
                .into_iter()
                .map(|(category, amount)| CategoryTotal {
                    category: category.to_string(),
                    amount,
                })
                .collect(),
        }
    }

    /// Expenses dated on `day` in the given time zone.
    pub fn expenses_on<Tz: TimeZone>(&self, day: NaiveDate, tz: &Tz) -> Decimal {
        self.transactions
            .iter()
            .filter(|t| t.is_expense() && t.date.with_timezone(tz).date_naive() == day)
            .fold(Decimal::ZERO, |acc, t| saturating_add(acc, t.amount))
    }

    /// An id no existing transaction uses, preferring the millisecond clock.
    pub fn next_id(&self, now_ms: i64) -> i64 {
        let max = self.transactions.iter().map(|t| t.id).max();
        match max {
            Some(max) if max >= now_ms => max + 1,
            _ => now_ms,
        }
    }

    // ── Commands ─────────────────────────────────────────────────────

    /// Insert a transaction and evaluate the budget.
    ///
    /// Only expenses are evaluated, and only against a positive budget.
    pub fn add_transaction(&mut self, tx: Transaction) -> Option<BudgetAlert> {
        let kind = tx.kind;
        tracing::debug!(id = tx.id, kind = ?kind, amount = %tx.amount, "adding transaction");

        self.transactions.insert(0, tx);
        sort_newest_first(&mut self.transactions);

        if kind != TransactionKind::Expense {
            return None;
        }
        let ratio = self.spending_ratio()?;
        let level = evaluate_ratio(ratio)?;
        let alert = BudgetAlert {
            level,
            ratio,
            total_expenses: self.total_expenses(),
            budget: self.budget,
        };
        tracing::info!(level = ?alert.level, ratio = %alert.ratio, "budget alert");
        Some(alert)
    }

    /// Replace the budget, kept within `0..=MAX_AMOUNT`. Never alerts on
    /// its own; the next expense re-evaluates.
    pub fn set_budget(&mut self, budget: Decimal) {
        self.budget = clamp_budget(budget);
        tracing::debug!(budget = %self.budget, "budget updated");
    }

    fn sum_of(&self, kind: TransactionKind) -> Decimal {
        self.transactions
            .iter()
            .filter(|t| t.kind == kind)
            .fold(Decimal::ZERO, |acc, t| saturating_add(acc, t.amount))
    }
}

fn clamp_budget(budget: Decimal) -> Decimal {
    budget.clamp(Decimal::ZERO, MAX_AMOUNT)
}

/// Totals stick at `Decimal::MAX` instead of overflowing.
fn saturating_add(a: Decimal, b: Decimal) -> Decimal {
    a.checked_add(b).unwrap_or(Decimal::MAX)
}

/// Stable, so among equal dates the entry nearer the front stays first.
fn sort_newest_first(transactions: &mut [Transaction]) {
    transactions.sort_by(|a, b| b.date.cmp(&a.date));
}
