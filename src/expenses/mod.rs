//! Expense Service Module
//!
//! Business rules between the API layer and storage: monetary conversion,
//! validation, partial-update merge, search and statistics.

pub mod service;

pub use service::{ExpenseError, ExpenseService, SharedExpenseService};
