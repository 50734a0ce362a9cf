//! Common Error Types for the Expense Ledger
//!
//! Root error used on startup paths (configuration, logging, storage setup).

use thiserror::Error;

use crate::attachments::AttachmentError;
use crate::storage::StorageError;

/// Root error type for the expense ledger
#[derive(Debug, Error)]
pub enum LedgerError {
    /// Configuration errors
    #[error("configuration error: {0}")]
    Config(#[from] super::config::ConfigError),

    /// Logging errors
    #[error("logging error: {0}")]
    Logging(#[from] super::logging::LoggingError),

    /// Storage errors
    #[error("storage error: {0}")]
    Storage(#[from] StorageError),

    /// Attachment directory errors
    #[error("attachment error: {0}")]
    Attachment(#[from] AttachmentError),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl LedgerError {
    /// Get error code for logs
    pub fn error_code(&self) -> &'static str {
        match self {
            LedgerError::Config(_) => "CONFIG_ERROR",
            LedgerError::Logging(_) => "LOGGING_ERROR",
            LedgerError::Storage(_) => "STORAGE_ERROR",
            LedgerError::Attachment(_) => "ATTACHMENT_ERROR",
            LedgerError::Io(_) => "IO_ERROR",
        }
    }
}

/// Result type alias using LedgerError
pub type Result<T> = std::result::Result<T, LedgerError>;
