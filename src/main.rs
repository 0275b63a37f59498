//! Council Core HTTP server.

use tokio::net::TcpListener;

use council_core::api::build_router;
use council_core::config::Config;
use council_core::{logging, AppState};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables from .env file (if present)
    // This is optional and won't fail if .env doesn't exist
    if let Err(e) = dotenvy::dotenv() {
        // Logging is not up yet; a missing .env is expected in production
        eprintln!("Note: No .env file loaded ({e})");
    }

    // Initialize logging
    logging::init();

    tracing::info!("Starting Council Core v{}", env!("CARGO_PKG_VERSION"));

    // Load configuration
    let config = Config::load().map_err(|e| {
        tracing::error!(error = %e, "Failed to load configuration");
        anyhow::anyhow!("Configuration error: {}", e)
    })?;

    tracing::info!(
        host = %config.server.host,
        port = %config.server.port,
        profile_dir = %config.profiles.data_dir.display(),
        auth = ?config.auth,
        "Configuration loaded"
    );

    if !config.auth.jwt_configured() {
        tracing::warn!("JWT secret is not set - every authenticated request will be rejected");
    }
    if !config.auth.admin_configured() {
        tracing::warn!("Admin API key is not set - admin endpoints will answer 500");
    }

    let state = AppState::from_config(&config);

    // Build router
    let app = build_router(state);

    // Start server
    let addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = TcpListener::bind(&addr).await?;

    tracing::info!(address = %addr, "Server listening");
    tracing::info!("Swagger UI available at http://{}/swagger-ui/", addr);

    axum::serve(listener, app).await?;

    Ok(())
}
