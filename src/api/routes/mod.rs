//! API Routes Module
//!
//! Route handlers organized by domain:
//! - health: Liveness endpoint
//! - expenses: Expense CRUD, search and statistics

pub mod expenses;
pub mod health;
