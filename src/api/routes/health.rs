//! Health Endpoint
//!
//! - GET /api/health - Liveness with service name and version

use axum::{routing::get, Json, Router};
use serde::Serialize;

use crate::api::server::SharedAppState;

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub service: &'static str,
    pub version: &'static str,
}

pub fn router() -> Router<SharedAppState> {
    Router::new().route("/api/health", get(health))
}

/// GET /api/health
async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        service: env!("CARGO_PKG_NAME"),
        version: env!("CARGO_PKG_VERSION"),
    })
}
