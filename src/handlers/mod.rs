//! HTTP handlers module
//!
//! Contains all HTTP endpoint handling logic

pub mod ai;
pub mod coins;
pub mod health;
pub mod metadata;

use crate::config::{AppConfig, Settings};
use crate::middleware::logging::request_logging_middleware;
use crate::services::store::build_store;
use crate::services::{CoinFeed, CoinStore, CompletionRouter, MetadataPublisher};
use anyhow::Result;
use axum::{extract::DefaultBodyLimit, http::HeaderValue, middleware, routing::get, routing::post, Router};
use std::sync::Arc;
use std::time::Duration;
use tower::ServiceBuilder;
use tower_http::{
    cors::{AllowOrigin, Any, CorsLayer},
    trace::TraceLayer,
};
use tracing::warn;

/// Application state
pub struct AppState {
    pub settings: Settings,
    pub completions: Arc<CompletionRouter>,
    pub store: Arc<dyn CoinStore>,
    pub feed: Arc<CoinFeed>,
    pub metadata: Arc<MetadataPublisher>,
}

impl AppState {
    /// Wire services from settings and provider configuration
    pub fn from_config(settings: Settings, app_config: &AppConfig) -> Result<Self> {
        let completions = CompletionRouter::from_config(app_config, Duration::from_secs(settings.request.timeout))?;
        let store = build_store(&settings)?;
        let metadata = MetadataPublisher::from_settings(&settings)?;

        Ok(Self::new(settings, completions, store, metadata))
    }

    /// Assemble state from already-built services
    pub fn new(
        settings: Settings,
        completions: CompletionRouter,
        store: Arc<dyn CoinStore>,
        metadata: MetadataPublisher,
    ) -> Self {
        Self {
            settings,
            completions: Arc::new(completions),
            feed: Arc::new(CoinFeed::new(store.clone())),
            store,
            metadata: Arc::new(metadata),
        }
    }
}

/// Create application router
pub async fn create_router(settings: Settings, app_config: AppConfig) -> Result<Router> {
    let state = AppState::from_config(settings, &app_config)?;
    Ok(router_with_state(Arc::new(state)))
}

/// Build the route table around an existing state
pub fn router_with_state(state: Arc<AppState>) -> Router {
    health::mark_started();

    let middleware_stack = ServiceBuilder::new()
        .layer(TraceLayer::new_for_http())
        .layer(middleware::from_fn(request_logging_middleware))
        .layer(DefaultBodyLimit::max(state.settings.request.max_request_size));

    let router = Router::new()
        .route("/api/ai", post(ai::handle_generate))
        .route("/api/coins", get(coins::list_feed))
        .route("/api/db/coins", get(coins::list_coins).post(coins::sync_coin))
        .route("/api/metadata", post(metadata::handle_publish))
        .route("/health", get(health::health_check))
        .route("/health/live", get(health::liveness_check))
        .route("/health/ready", get(health::readiness_check));

    let router = if state.settings.security.cors_enabled {
        router.layer(cors_layer(&state.settings.security.allowed_origins))
    } else {
        router
    };

    router.with_state(state).layer(middleware_stack)
}

fn cors_layer(allowed_origins: &[String]) -> CorsLayer {
    let layer = CorsLayer::new().allow_methods(Any).allow_headers(Any);

    if allowed_origins.is_empty() || allowed_origins.iter().any(|o| o == "*") {
        return layer.allow_origin(Any);
    }

    let origins: Vec<HeaderValue> = allowed_origins
        .iter()
        .filter_map(|origin| match origin.parse::<HeaderValue>() {
            Ok(value) => Some(value),
            Err(_) => {
                warn!("Ignoring invalid CORS origin: {}", origin);
                None
            }
        })
        .collect();

    layer.allow_origin(AllowOrigin::list(origins))
}
