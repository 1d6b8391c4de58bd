use anyhow::Context;
use hostel::api::{self, app_state::AppState};
use hostel::config::ConfigLoader;
use hostel::observability::{
    AppMetrics, ObservabilityState, create_observability_router, init_tracing,
};
use hostel::storage::StorageFactory;
use std::sync::Arc;
use tracing::info;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = ConfigLoader::load().context("failed to load configuration")?;
    ConfigLoader::validate(&config).context("invalid configuration")?;

    let _log_guard = init_tracing(&config.logging);
    info!(
        "Starting {} ({} environment)...",
        config.app_name, config.environment
    );
    if !hostel::config::loader::config_exists() {
        info!("No config.yaml found, using defaults and environment overrides");
    }

    let stores = StorageFactory::create(&config.storage)
        .await
        .context("failed to initialize storage")?;
    info!("Stores initialized");

    let metrics = Arc::new(AppMetrics::default());
    let app_state = AppState::from_config(&config, stores.clone(), metrics.clone());
    info!("Application state created");

    let observability_state = Arc::new(ObservabilityState::new(
        env!("CARGO_PKG_VERSION").to_string(),
        metrics,
        stores,
    ));
    let router = create_observability_router(observability_state).merge(api::create_router(app_state));
    info!("API router created with observability endpoints");

    let addr = config.server.socket_addr();
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("failed to bind {}", addr))?;
    info!("Server listening on {}", addr);

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::warn!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received");
}
