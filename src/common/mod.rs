//! Common Infrastructure Module
//!
//! Shared utilities and configuration for the expense ledger.
//!
//! This module contains:
//! - Configuration loading from environment variables
//! - Structured logging setup
//! - Common error types

pub mod config;
pub mod error;
pub mod logging;

// Re-exports for convenience
pub use config::{ConfigError, LedgerConfig, UPLOADS_MOUNT};
pub use error::{LedgerError, Result};
pub use logging::{
    generate_correlation_id, init_from_config, init_logging, log_api_request, log_api_response,
    log_attachment_event, log_expense_event, log_system_event, EventCategory, LogEvent, LogLevel,
    LoggingError,
};
