use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::ValidationError;
use crate::events::Event;

pub const EXPENSE_CATEGORIES: [&str; 6] =
    ["Food", "Transport", "Study", "Entertainment", "Bills", "Other"];
pub const INCOME_CATEGORIES: [&str; 4] = ["Salary", "Gift", "Investment", "Other"];

const MIN_ITEM_LEN: usize = 2;

/// Largest amount (and budget) the ledger accepts. Kept well inside the
/// range a stored JSON float can carry back without loss.
pub const MAX_AMOUNT: Decimal = Decimal::from_parts(1_316_134_912, 2_328, 0, false, 0);

/// Amounts are whole cents.
const MAX_AMOUNT_SCALE: u32 = 2;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransactionKind {
    Expense,
    Income,
}

impl TransactionKind {
    /// Suggested categories for this kind of transaction.
    pub fn categories(&self) -> &'static [&'static str] {
        match self {
            TransactionKind::Expense => &EXPENSE_CATEGORIES,
            TransactionKind::Income => &INCOME_CATEGORIES,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            TransactionKind::Expense => "Expense",
            TransactionKind::Income => "Income",
        }
    }
}

impl std::str::FromStr for TransactionKind {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "expense" => Ok(TransactionKind::Expense),
            "income" => Ok(TransactionKind::Income),
            other => Err(ValidationError::InvalidValue {
                field: "type".into(),
                message: format!("expected 'expense' or 'income', got '{other}'"),
            }),
        }
    }
}

/// A single ledger entry. Never edited after creation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    pub id: i64,
    pub item: String,
    pub category: String,
    #[serde(with = "rust_decimal::serde::float")]
    pub amount: Decimal,
    pub date: DateTime<Utc>,
    #[serde(rename = "type")]
    pub kind: TransactionKind,
}

impl Transaction {
    pub fn is_expense(&self) -> bool {
        self.kind == TransactionKind::Expense
    }

    pub fn is_income(&self) -> bool {
        self.kind == TransactionKind::Income
    }

    pub fn added_event(&self) -> Event {
        Event::TransactionAdded {
            id: self.id,
            kind: self.kind,
            amount: self.amount,
            at: self.date,
        }
    }
}

/// User input for a transaction before it has an id and a timestamp.
///
/// The ledger assumes well-formed input, so front ends call
/// [`TransactionDraft::validate`] before handing the result to the ledger.
#[derive(Debug, Clone, PartialEq)]
pub struct TransactionDraft {
    pub kind: TransactionKind,
    pub item: String,
    pub category: String,
    pub amount: Decimal,
}

impl TransactionDraft {
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.item.trim().chars().count() < MIN_ITEM_LEN {
            return Err(ValidationError::TooShort {
                field: "item".into(),
                min: MIN_ITEM_LEN,
            });
        }
        if self.amount <= Decimal::ZERO {
            return Err(ValidationError::NonPositiveAmount(self.amount.to_string()));
        }
        check_amount("amount", self.amount)?;
        if self.category.trim().is_empty() {
            return Err(ValidationError::TooShort {
                field: "category".into(),
                min: 1,
            });
        }
        Ok(())
    }

    /// Validate and stamp the draft with an id and a creation time.
    pub fn into_transaction(
        self,
        id: i64,
        date: DateTime<Utc>,
    ) -> Result<Transaction, ValidationError> {
        self.validate()?;
        Ok(Transaction {
            id,
            item: self.item.trim().to_string(),
            category: self.category.trim().to_string(),
            amount: self.amount,
            date,
            kind: self.kind,
        })
    }
}

/// Reject money values beyond [`MAX_AMOUNT`] or finer than a cent.
pub fn check_amount(field: &str, amount: Decimal) -> Result<(), ValidationError> {
    if amount.abs() > MAX_AMOUNT {
        return Err(ValidationError::InvalidValue {
            field: field.into(),
            message: format!("{amount} is larger than {MAX_AMOUNT}"),
        });
    }
    if amount.normalize().scale() > MAX_AMOUNT_SCALE {
        return Err(ValidationError::InvalidValue {
            field: field.into(),
            message: format!("{amount} has more than {MAX_AMOUNT_SCALE} decimal places"),
        });
    }
    Ok(())
}

/// Two-decimal display with a currency symbol, e.g. `₹1,250.50`.
pub fn format_amount(symbol: &str, amount: Decimal) -> String {
    let rounded = amount.round_dp(2);
    let negative = rounded.is_sign_negative() && !rounded.is_zero();
    let abs = rounded.abs();
    let text = format!("{abs:.2}");
    let (whole, frac) = text.split_once('.').unwrap_or((text.as_str(), "00"));

    let mut grouped = String::with_capacity(whole.len() + whole.len() / 3);
    for (i, ch) in whole.chars().enumerate() {
        if i > 0 && (whole.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }

    let sign = if negative { "-" } else { "" };
    format!("{sign}{symbol}{grouped}.{frac}")
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    fn draft(item: &str, amount: &str, category: &str) -> TransactionDraft {
        TransactionDraft {
            kind: TransactionKind::Expense,
            item: item.into(),
            category: category.into(),
            amount: Decimal::from_str(amount).unwrap(),
        }
    }

    #[test]
    fn validate_accepts_well_formed_draft() {
        assert!(draft("Lunch", "12.50", "Food").validate().is_ok());
    }

    #[test]
    fn validate_rejects_short_item() {
        assert_eq!(
            draft("L", "12", "Food").validate(),
            Err(ValidationError::TooShort {
                field: "item".into(),
                min: 2
            })
        );
    }

    #[test]
    fn validate_rejects_zero_and_negative_amounts() {
        assert!(matches!(
            draft("Lunch", "0", "Food").validate(),
            Err(ValidationError::NonPositiveAmount(_))
        ));
        assert!(matches!(
            draft("Lunch", "-3", "Food").validate(),
            Err(ValidationError::NonPositiveAmount(_))
        ));
    }

    #[test]
    fn validate_rejects_blank_category() {
        assert!(draft("Lunch", "5", "  ").validate().is_err());
    }

    #[test]
    fn transaction_json_matches_stored_layout() {
        let raw = r#"{"id":1700000000000,"item":"Bus","category":"Transport","amount":42.5,"date":"2024-03-01T08:30:00.000Z","type":"expense"}"#;
        let tx: Transaction = serde_json::from_str(raw).unwrap();
        assert_eq!(tx.kind, TransactionKind::Expense);
        assert_eq!(tx.amount, Decimal::from_str("42.5").unwrap());

        let back = serde_json::to_value(&tx).unwrap();
        assert_eq!(back["type"], "expense");
        assert!(back["amount"].is_number());

        let event = serde_json::to_value(tx.added_event()).unwrap();
        assert_eq!(event["type"], "transaction_added");
        assert_eq!(event["kind"], "expense");
        assert_eq!(event["amount"], 42.5);
    }

    #[test]
    fn max_amount_is_ten_trillion() {
        assert_eq!(MAX_AMOUNT, Decimal::from(10_000_000_000_000i64));
    }

    #[test]
    fn validate_rejects_amounts_past_the_cap() {
        assert!(draft("Rent", "10000000000000", "Bills").validate().is_ok());
        assert!(matches!(
            draft("Rent", "10000000000000.01", "Bills").validate(),
            Err(ValidationError::InvalidValue { .. })
        ));
        let mut huge = draft("Huge", "1", "Other");
        huge.amount = Decimal::MAX;
        assert!(huge.validate().is_err());
    }

    #[test]
    fn validate_rejects_fractions_of_a_cent() {
        assert!(draft("Tea", "2.50", "Food").validate().is_ok());
        assert!(draft("Tea", "2.505", "Food").validate().is_err());
    }

    #[test]
    fn largest_accepted_amount_reloads_from_stored_json() {
        let date = chrono::TimeZone::with_ymd_and_hms(&Utc, 2024, 3, 1, 8, 0, 0).unwrap();
        for amount in ["10000000000000", "9999999999999.99", "0.01"] {
            let tx = draft("Boundary", amount, "Other").into_transaction(1, date).unwrap();
            let raw = serde_json::to_string(&vec![tx.clone()]).unwrap();
            let back: Vec<Transaction> = serde_json::from_str(&raw).unwrap();
            assert_eq!(back[0].amount, tx.amount, "{amount} did not survive {raw}");
        }
    }

    #[test]
    fn kind_parses_case_insensitively() {
        assert_eq!(TransactionKind::from_str("Income").unwrap(), TransactionKind::Income);
        assert!(TransactionKind::from_str("refund").is_err());
    }

    #[test]
    fn format_amount_groups_thousands() {
        assert_eq!(format_amount("₹", Decimal::from_str("1250.5").unwrap()), "₹1,250.50");
        assert_eq!(format_amount("$", Decimal::from_str("-42").unwrap()), "-$42.00");
        assert_eq!(format_amount("$", Decimal::ZERO), "$0.00");
        assert_eq!(format_amount("", Decimal::from_str("1000000").unwrap()), "1,000,000.00");
    }
}
