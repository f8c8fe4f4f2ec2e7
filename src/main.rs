use std::net::SocketAddr;
use std::sync::Arc;

use scaffold_service::config::Settings;
use scaffold_service::service::{build_router, AppState};
use scaffold_service::utils::{init_logging, ScaffoldError, ScaffoldResult};

#[tokio::main]
async fn main() -> ScaffoldResult<()> {
    // Initialize logging
    init_logging();
    tracing::info!("Starting scaffold service...");

    // Load configuration
    let settings = Settings::load().map_err(ScaffoldError::Config)?;
    tracing::info!("Configuration loaded successfully");

    tracing::info!(
        environment = %settings.app.environment,
        host = %settings.server.host,
        port = %settings.server.port,
        "Server configuration loaded"
    );

    let addr: SocketAddr = format!("{}:{}", settings.server.host, settings.server.port)
        .parse()
        .map_err(|e| ScaffoldError::Internal(format!("Invalid bind address: {e}")))?;

    let state = Arc::new(AppState::new(settings));
    let app = build_router(state);

    tracing::info!(%addr, "Scaffold service listening");
    axum::Server::bind(&addr)
        .serve(app.into_make_service_with_connect_info::<SocketAddr>())
        .await
        .map_err(|e| ScaffoldError::Internal(e.to_string()))?;

    Ok(())
}
