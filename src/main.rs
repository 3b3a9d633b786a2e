//! coinforge server
//!
//! Serves the AI generation, coin registry and metadata routes

use anyhow::{Context, Result};
use coinforge::utils::logging::init_logging;
use coinforge::{create_router, version_info, AppConfig, Settings};
use tracing::info;

#[tokio::main]
async fn main() -> Result<()> {
    // Settings first: they carry the logging configuration
    let settings = Settings::new().context("Failed to load server settings")?;
    init_logging(&settings.logging)?;

    info!("Starting {}", version_info());

    let app_config = AppConfig::load_default().context("Failed to load provider configuration")?;
    info!(
        "📁 Provider configuration loaded: {} of {} providers have credentials",
        app_config.effective_providers().count(),
        app_config.providers.len()
    );

    let addr = format!("{}:{}", settings.server.host, settings.server.port);

    let app = create_router(settings, app_config).await?;

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;

    info!("🚀 coinforge server started on http://{}", addr);
    info!("📝 Health check: http://{}/health", addr);
    info!("✨ Generation endpoint: http://{}/api/ai", addr);

    axum::serve(listener, app)
        .await
        .map_err(|e| anyhow::anyhow!("Failed to start server: {}", e))?;

    Ok(())
}
