//! API Server Module
//!
//! Provides the Axum application builder and server startup logic.
//! Consolidates application state and router configuration.

use axum::{
    extract::DefaultBodyLimit,
    http::{HeaderValue, Method},
    middleware, Router,
};
use std::sync::Arc;
use tower_http::{
    cors::{AllowOrigin, Any, CorsLayer},
    services::ServeDir,
    trace::TraceLayer,
};

use super::middleware::{request_logging_middleware, security_headers_middleware};
use super::routes;
use crate::attachments::AttachmentManager;
use crate::common::config::{LedgerConfig, UPLOADS_MOUNT};
use crate::common::error::Result;
use crate::common::logging::log_system_event;
use crate::expenses::{ExpenseService, SharedExpenseService};
use crate::storage::SqliteExpenseStore;

/// Combined application state for all API endpoints
pub struct AppState {
    pub expenses: SharedExpenseService,
}

/// Shared application state type
pub type SharedAppState = Arc<AppState>;

impl AppState {
    pub fn new(expenses: ExpenseService) -> SharedAppState {
        Arc::new(Self {
            expenses: Arc::new(expenses),
        })
    }

    /// Open the SQLite store and attachment directory named by `config`
    pub fn from_config(config: &LedgerConfig) -> Result<SharedAppState> {
        let store = SqliteExpenseStore::new(&config.db_path)?;
        let attachments = AttachmentManager::new(&config.upload_dir, UPLOADS_MOUNT)?;

        Ok(Self::new(ExpenseService::new(Arc::new(store), attachments)))
    }
}

fn cors_layer(origins: &[String]) -> CorsLayer {
    let allow_origin = if origins.iter().any(|o| o == "*") {
        AllowOrigin::any()
    } else {
        AllowOrigin::list(
            origins
                .iter()
                .filter_map(|o| HeaderValue::from_str(o).ok())
                .collect::<Vec<_>>(),
        )
    };

    CorsLayer::new()
        .allow_origin(allow_origin)
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::OPTIONS])
        .allow_headers(Any)
}

/// Build the full application router
pub fn create_router(state: SharedAppState, config: &LedgerConfig) -> Router {
    let uploads = ServeDir::new(state.expenses.attachments().upload_dir());

    Router::new()
        .merge(routes::health::router())
        .merge(routes::expenses::router())
        .nest_service(UPLOADS_MOUNT, uploads)
        .layer(DefaultBodyLimit::max(config.max_upload_bytes))
        .layer(middleware::from_fn(security_headers_middleware))
        .layer(middleware::from_fn(request_logging_middleware))
        .layer(TraceLayer::new_for_http())
        .layer(cors_layer(&config.cors_origins))
        .with_state(state)
}

/// Start the expense API server
pub async fn start_server(config: LedgerConfig) -> Result<()> {
    let state = AppState::from_config(&config)?;
    let app = create_router(state, &config);
    let addr = config.socket_addr();

    println!("=== Expense Ledger API ===");
    println!("Listening on http://{}", addr);
    println!();
    println!("Endpoints:");
    println!("  GET  /api/health              - Health check");
    println!("  GET  /api/expenses?q=         - List / search expenses");
    println!("  POST /api/expenses            - Create expense (JSON)");
    println!("  POST /api/expenses/upload     - Create expense with proof file");
    println!("  GET  /api/expenses/stats      - Aggregate statistics");
    println!("  GET  /api/expenses/:id        - Get expense");
    println!("  PUT  /api/expenses/:id        - Update expense");
    println!("  GET  {}/<file>           - Uploaded proofs", UPLOADS_MOUNT);
    println!();

    log_system_event(
        "server_started",
        serde_json::json!({
            "addr": addr.to_string(),
            "db_path": config.db_path.display().to_string(),
            "upload_dir": config.upload_dir.display().to_string(),
        }),
    );

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
