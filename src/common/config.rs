//! Environment-based Configuration for the Expense Ledger
//!
//! All settings have development defaults; a `.env` file is loaded by the
//! binary before `LedgerConfig::from_env` runs.
//!
//! # Environment Variables
//!
//! - `LEDGER_DB_PATH` - SQLite database file (default: `./data/expenses.db`)
//! - `LEDGER_UPLOAD_DIR` - Attachment directory (default: `./data/uploads`)
//! - `LEDGER_BIND` - Bind address (default: `0.0.0.0`)
//! - `LEDGER_PORT` - HTTP port (default: `8000`)
//! - `LEDGER_CORS_ORIGINS` - Comma-separated allowed origins
//! - `LEDGER_MAX_UPLOAD_BYTES` - Request body limit (default: 10 MiB)
//! - `LEDGER_LOG_LEVEL` - Logging level (debug, info, warn, error)
//! - `LEDGER_LOG_JSON` - Set to "1" or "true" for JSON logs

use std::env;
use std::net::{IpAddr, SocketAddr};
use std::path::PathBuf;
use std::str::FromStr;
use thiserror::Error;

/// Public mount point of the attachment directory
pub const UPLOADS_MOUNT: &str = "/uploads";

pub const DEFAULT_PORT: u16 = 8000;
pub const DEFAULT_MAX_UPLOAD_BYTES: usize = 10 * 1024 * 1024;

/// Vite dev server origins
pub const DEFAULT_CORS_ORIGINS: [&str; 2] = ["http://localhost:5173", "http://127.0.0.1:5173"];

/// Configuration errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid value for {0}: {1}")]
    InvalidValue(String, String),
}

/// Main configuration struct
#[derive(Debug, Clone)]
pub struct LedgerConfig {
    /// SQLite database file
    pub db_path: PathBuf,

    /// Directory holding uploaded attachments
    pub upload_dir: PathBuf,

    pub bind: IpAddr,

    pub port: u16,

    /// Origins allowed by CORS
    pub cors_origins: Vec<String>,

    /// Maximum request body size in bytes
    pub max_upload_bytes: usize,

    pub log_level: String,

    /// Emit JSON logs instead of pretty output
    pub log_json: bool,
}

impl Default for LedgerConfig {
    fn default() -> Self {
        Self {
            db_path: PathBuf::from("./data/expenses.db"),
            upload_dir: PathBuf::from("./data/uploads"),
            bind: IpAddr::from([0, 0, 0, 0]),
            port: DEFAULT_PORT,
            cors_origins: DEFAULT_CORS_ORIGINS.iter().map(|o| o.to_string()).collect(),
            max_upload_bytes: DEFAULT_MAX_UPLOAD_BYTES,
            log_level: "info".to_string(),
            log_json: false,
        }
    }
}

impl LedgerConfig {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Load configuration from an arbitrary variable source
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();

        let db_path = lookup("LEDGER_DB_PATH")
            .map(PathBuf::from)
            .unwrap_or(defaults.db_path);

        let upload_dir = lookup("LEDGER_UPLOAD_DIR")
            .map(PathBuf::from)
            .unwrap_or(defaults.upload_dir);

        let bind = parse_var(&lookup, "LEDGER_BIND")?.unwrap_or(defaults.bind);
        let port = parse_var(&lookup, "LEDGER_PORT")?.unwrap_or(defaults.port);

        let cors_origins = match lookup("LEDGER_CORS_ORIGINS") {
            Some(raw) => parse_origins(&raw),
            None => defaults.cors_origins,
        };

        let max_upload_bytes = parse_var(&lookup, "LEDGER_MAX_UPLOAD_BYTES")?
            .unwrap_or(defaults.max_upload_bytes);
        if max_upload_bytes == 0 {
            return Err(ConfigError::InvalidValue(
                "LEDGER_MAX_UPLOAD_BYTES".to_string(),
                "must be greater than 0".to_string(),
            ));
        }

        let log_level = lookup("LEDGER_LOG_LEVEL").unwrap_or(defaults.log_level);
        let log_json = lookup("LEDGER_LOG_JSON")
            .map(|v| matches!(v.trim().to_lowercase().as_str(), "1" | "true" | "yes"))
            .unwrap_or(defaults.log_json);

        Ok(Self {
            db_path,
            upload_dir,
            bind,
            port,
            cors_origins,
            max_upload_bytes,
            log_level,
            log_json,
        })
    }

    /// Socket address to listen on
    pub fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.bind, self.port)
    }

    /// Print configuration summary
    pub fn print_summary(&self) {
        println!("=== Expense Ledger Configuration ===");
        println!("Database: {}", self.db_path.display());
        println!("Uploads: {} (served at {})", self.upload_dir.display(), UPLOADS_MOUNT);
        println!("Listen: {}", self.socket_addr());
        println!("CORS Origins: {}", self.cors_origins.join(", "));
        println!("Max Upload: {} bytes", self.max_upload_bytes);
        println!("Log Level: {} (json: {})", self.log_level, self.log_json);
        println!("====================================");
    }
}

fn parse_var<T, F>(lookup: &F, name: &str) -> Result<Option<T>, ConfigError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
    F: Fn(&str) -> Option<String>,
{
    match lookup(name) {
        Some(raw) => raw
            .trim()
            .parse()
            .map(Some)
            .map_err(|e: T::Err| ConfigError::InvalidValue(name.to_string(), e.to_string())),
        None => Ok(None),
    }
}

fn parse_origins(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(|o| o.trim().trim_end_matches('/'))
        .filter(|o| !o.is_empty())
        .map(|o| o.to_string())
        .collect()
}
