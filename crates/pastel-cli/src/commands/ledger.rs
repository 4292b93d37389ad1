use chrono::Utc;
use clap::Subcommand;
use pastel_core::ledger::{check_amount, format_amount, TransactionDraft, TransactionKind};
use pastel_core::ValidationError;
use rust_decimal::Decimal;

use super::{print_json, CliResult, Session};

#[derive(Subcommand)]
pub enum LedgerAction {
    /// Record an expense or income
    Add {
        /// `expense` or `income`
        kind: TransactionKind,
        /// What it was for (at least 2 characters)
        item: String,
        /// Positive amount, e.g. 12.50
        #[arg(allow_hyphen_values = true)]
        amount: Decimal,
        /// Category (defaults to "Other")
        #[arg(default_value = "Other")]
        category: String,
    },
    /// List transactions, newest first
    List {
        /// Print as JSON
        #[arg(long)]
        json: bool,
    },
    /// Totals, remaining budget and per-category spending as JSON
    Summary,
    /// Show or set the monthly budget
    Budget {
        #[arg(allow_hyphen_values = true)]
        value: Option<Decimal>,
    },
    /// Suggested categories for a transaction type
    Categories { kind: TransactionKind },
}

pub fn run(action: LedgerAction) -> CliResult {
    let mut session = Session::open()?;

    match action {
        LedgerAction::Add {
            kind,
            item,
            amount,
            category,
        } => {
            let draft = TransactionDraft {
                kind,
                item,
                category,
                amount,
            };
            let now = Utc::now();
            let tx = draft.into_transaction(session.app.next_transaction_id(now), now)?;
            let mut events = vec![tx.added_event()];
            if let Some(alert) = session.app.add_transaction(tx) {
                events.push(alert.event());
            }
            print_json(&events)?;
        }
        LedgerAction::List { json } => {
            let transactions = session.app.ledger().transactions();
            if json {
                print_json(transactions)?;
            } else {
                let symbol = session.app.currency_symbol();
                for tx in transactions {
                    let sign = if tx.is_income() { "+" } else { "-" };
                    println!(
                        "{}  {:<8} {:<24} {:<14} {sign}{}",
                        tx.date.format("%Y-%m-%d"),
                        tx.kind.label(),
                        tx.item,
                        tx.category,
                        format_amount(symbol, tx.amount),
                    );
                }
            }
        }
        LedgerAction::Summary => {
            print_json(&session.app.ledger().summary())?;
        }
        LedgerAction::Budget { value: None } => {
            let budget = session.app.ledger().budget();
            println!("{}", format_amount(session.app.currency_symbol(), budget));
        }
        LedgerAction::Budget { value: Some(value) } => {
            if value < Decimal::ZERO {
                return Err(ValidationError::NegativeBudget(value.to_string()).into());
            }
            check_amount("budget", value)?;
            session.app.set_budget(value);
            println!("{}", format_amount(session.app.currency_symbol(), value));
        }
        LedgerAction::Categories { kind } => {
            for category in kind.categories() {
                println!("{category}");
            }
        }
    }

    session.finish();
    Ok(())
}
