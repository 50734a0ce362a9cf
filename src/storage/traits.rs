//! Storage Trait Definitions
//!
//! Defines the abstract storage interface for expenses.
//! Implementations can use SQLite (production) or in-memory (testing).

use async_trait::async_trait;
use thiserror::Error;

use crate::types::expense::{Expense, ExpensePatch, NewExpense};

/// Storage errors
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Expense not found: {0}")]
    NotFound(i64),

    #[error("Database error: {0}")]
    Database(String),

    #[error("Invalid data: {0}")]
    InvalidData(String),

    #[error("Connection error: {0}")]
    Connection(String),
}

/// Result type for storage operations
pub type StorageResult<T> = Result<T, StorageError>;

/// Expense storage interface
///
/// The store owns identity assignment: ids are strictly increasing and
/// never reused. Every mutation is durable before the call returns.
///
/// Implementations:
/// - `SqliteExpenseStore` - Production storage with SQLite
/// - `MemoryExpenseStore` - In-memory storage for testing
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ExpenseStore: Send + Sync {
    /// Insert a new expense and return it with its assigned id
    async fn create(&self, expense: NewExpense) -> StorageResult<Expense>;

    /// Get an expense by id
    async fn get(&self, id: i64) -> StorageResult<Option<Expense>>;

    /// All expenses, newest date first, ties broken by id descending
    async fn list_all(&self) -> StorageResult<Vec<Expense>>;

    /// Apply the present fields of `patch`; `NotFound` if the id is unknown
    async fn update(&self, id: i64, patch: ExpensePatch) -> StorageResult<Expense>;
}

/// Order expenses the way `list_all` returns them
pub fn sort_newest_first(expenses: &mut [Expense]) {
    expenses.sort_by(|a, b| b.date.cmp(&a.date).then(b.id.cmp(&a.id)));
}
