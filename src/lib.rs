//! Expense Ledger - Construction Project Expense Tracking
//!
//! Records dated expenses against a project, optionally with an uploaded
//! proof-of-payment file, and serves them over a REST API.
//!
//! ## Components
//!
//! 1. **Expense Store** - Durable records (SQLite, or in-memory for tests)
//! 2. **Attachment Manager** - Validated proof-of-payment file storage
//! 3. **Expense Service** - Validation, search and statistics
//! 4. **API** - Axum routes over the service

pub mod api;
pub mod attachments;
pub mod common;
pub mod expenses;
pub mod storage;
pub mod types;

// Re-exports: API
pub use api::{create_router, start_server, ApiError, AppState, SharedAppState};

// Re-exports: Attachments
pub use attachments::{AttachmentError, AttachmentManager, ALLOWED_CONTENT_TYPES};

// Re-exports: Common
pub use common::{LedgerConfig, LedgerError};

// Re-exports: Expense service
pub use expenses::{ExpenseError, ExpenseService, SharedExpenseService};

// Re-exports: Storage
pub use storage::{
    ExpenseStore, MemoryExpenseStore, SqliteExpenseStore, StorageError, StorageResult,
};

// Re-exports: Types
pub use types::{
    Expense, ExpenseChanges, ExpenseDraft, ExpensePatch, ExpenseRead, ExpenseStats, NewExpense,
    Patch, Upload,
};
