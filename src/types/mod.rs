//! Shared Types Module
//!
//! Data types shared across the expense ledger.

pub mod expense;
pub mod money;
pub mod patch;
pub mod stats;

// Re-exports for convenience
pub use expense::{
    Expense, ExpenseChanges, ExpenseDraft, ExpensePatch, ExpenseRead, NewExpense, Upload,
    DATE_FORMAT,
};
pub use money::{amount_to_cents, cents_to_amount, parse_amount, parse_cents, MoneyError};
pub use patch::Patch;
pub use stats::{ExpenseStats, EMPTY_DATE_RANGE};
