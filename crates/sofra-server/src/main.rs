//! Sofra food recognition server
//!
//! Loads the pretrained classifier once, then serves predictions over HTTP.

use anyhow::Result;
use clap::Parser;
use sofra_classifiers::ClassifierHandle;
use sofra_server::{routes, startup, telemetry, AppState, Cli, ServiceConfig};
use std::sync::Arc;
use tokio::signal;
use tracing::{info, warn};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize tracing
    telemetry::init_tracing(cli.verbose, cli.json_logs);

    info!("Starting Sofra food recognition service");

    // Load configuration
    let config = ServiceConfig::load(&cli.config, &cli)?;
    info!("Configuration loaded successfully");
    info!("Model: {}", config.model.describe());
    info!("Device: {:?}", config.model.device);

    let metrics_handle = telemetry::init_metrics()?;

    // A failed load leaves the handle Failed; the server still starts
    let handle = Arc::new(ClassifierHandle::new());
    let status = startup::load_model(Arc::clone(&handle), &config.model).await;
    if status.is_ready() {
        info!("Model is ready");
    } else {
        warn!("Serving in degraded mode: model status is {}", status);
    }

    let state = AppState::new(&config, handle).with_metrics(metrics_handle);
    let app = routes::create_router(state);

    let addr = config.listen_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!("Listening on http://{}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server shutdown complete");
    Ok(())
}

/// Listen for shutdown signals (SIGTERM, SIGINT)
async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("Failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    warn!("Shutdown signal received, stopping server...");
}
