//! Storage Layer Module
//!
//! Provides persistence for expense records.
//!
//! This module contains:
//! - Storage trait definitions for abstraction
//! - SQLite implementation for production
//! - In-memory implementation for testing

pub mod memory;
pub mod sqlite;
pub mod traits;

// Re-exports for convenience
pub use memory::MemoryExpenseStore;
pub use sqlite::SqliteExpenseStore;
pub use traits::{ExpenseStore, StorageError, StorageResult};

#[cfg(test)]
pub use traits::MockExpenseStore;
