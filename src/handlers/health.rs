//! Health check handlers
//!
//! Provides application health status check endpoints

use crate::handlers::AppState;
use axum::{extract::State, http::StatusCode, response::Json};
use serde::{Deserialize, Serialize};
use std::sync::{Arc, OnceLock};
use std::time::Instant;
use tracing::debug;

const SERVICE_NAME: &str = "coinforge";

static START_TIME: OnceLock<Instant> = OnceLock::new();

/// Health check response
#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    /// Service status
    pub status: String,
    /// Service name
    pub service: String,
    /// Version information
    pub version: String,
    /// Timestamp
    pub timestamp: String,
    /// Details (optional)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<HealthDetails>,
}

/// Check result
#[derive(Debug, Serialize, Deserialize)]
pub struct HealthDetails {
    /// Effective completion providers in priority order
    pub providers: Vec<String>,
    /// Coin store backend
    pub store: String,
    /// Network name
    pub network: String,
    /// Human readable chain name
    pub chain: String,
    /// Chain id of the network
    pub chain_id: u64,
    /// Uptime in seconds
    pub uptime_seconds: u64,
}

/// Record the process start for uptime reporting
pub(crate) fn mark_started() {
    START_TIME.get_or_init(Instant::now);
}

/// Get service uptime in seconds
fn get_uptime_seconds() -> u64 {
    START_TIME.get_or_init(Instant::now).elapsed().as_secs()
}

fn build_response(state: &AppState, status: &str) -> HealthResponse {
    HealthResponse {
        status: status.to_string(),
        service: SERVICE_NAME.to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        timestamp: chrono::Utc::now().to_rfc3339(),
        details: Some(HealthDetails {
            providers: state
                .completions
                .provider_names()
                .into_iter()
                .map(str::to_string)
                .collect(),
            store: state.store.backend().to_string(),
            network: state.settings.network.to_string(),
            chain: state.settings.network.chain_name().to_string(),
            chain_id: state.settings.network.chain_id(),
            uptime_seconds: get_uptime_seconds(),
        }),
    }
}

/// Basic health check
///
/// GET /health
pub async fn health_check(State(state): State<Arc<AppState>>) -> Json<HealthResponse> {
    debug!("Executing health check");
    Json(build_response(&state, "healthy"))
}

/// Readiness check
///
/// GET /health/ready
/// Not ready (503) while no completion provider has a credential
pub async fn readiness_check(State(state): State<Arc<AppState>>) -> (StatusCode, Json<HealthResponse>) {
    debug!("Executing readiness check");

    if state.completions.provider_count() > 0 {
        (StatusCode::OK, Json(build_response(&state, "ready")))
    } else {
        (StatusCode::SERVICE_UNAVAILABLE, Json(build_response(&state, "not_ready")))
    }
}

/// Liveness check
///
/// GET /health/live
/// Only confirms the process is serving requests
pub async fn liveness_check() -> Json<HealthResponse> {
    debug!("Executing liveness check");

    Json(HealthResponse {
        status: "alive".to_string(),
        service: SERVICE_NAME.to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        timestamp: chrono::Utc::now().to_rfc3339(),
        details: None,
    })
}
