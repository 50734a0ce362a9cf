//! Expense Ledger API Server CLI
//!
//! Run modes:
//!   expense-api                  - Start the REST API (same as `serve`)
//!   expense-api serve [--port]   - Start the REST API
//!   expense-api check-config     - Print the resolved configuration and exit

use clap::{Parser, Subcommand};
use expense_ledger::common::{init_from_config, log_system_event, LedgerConfig};
use expense_ledger::start_server;
use std::net::IpAddr;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "expense-api")]
#[command(about = "Construction project expense ledger API", version)]
struct Cli {
    /// Environment file loaded before reading LEDGER_* variables
    #[arg(long, global = true, env = "LEDGER_ENV_FILE")]
    env_file: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the API server
    Serve {
        /// Port (overrides LEDGER_PORT)
        #[arg(short, long)]
        port: Option<u16>,

        /// Bind address (overrides LEDGER_BIND)
        #[arg(short, long)]
        bind: Option<IpAddr>,
    },

    /// Validate and print configuration
    CheckConfig,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    // A missing .env is fine; an explicit file must load
    match &cli.env_file {
        Some(path) => {
            dotenv::from_path(path)?;
        }
        None => {
            dotenv::dotenv().ok();
        }
    }

    let mut config = LedgerConfig::from_env()?;

    match cli.command.unwrap_or(Commands::Serve {
        port: None,
        bind: None,
    }) {
        Commands::Serve { port, bind } => {
            if let Some(port) = port {
                config.port = port;
            }
            if let Some(bind) = bind {
                config.bind = bind;
            }

            init_from_config(&config)?;
            log_system_event(
                "starting",
                serde_json::json!({
                    "version": env!("CARGO_PKG_VERSION"),
                    "addr": config.socket_addr().to_string(),
                }),
            );

            if let Err(e) = start_server(config).await {
                tracing::error!(
                    target: "ledger::system",
                    code = e.error_code(),
                    "server failed: {}",
                    e
                );
                return Err(e.into());
            }
        }
        Commands::CheckConfig => {
            config.print_summary();
        }
    }

    Ok(())
}
