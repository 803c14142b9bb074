//! Shortest-path and ETA HTTP microservice.
//!
//! # Configuration
//!
//! - `NAVIGATOR_NETWORK_PATH` - Path to the road network JSON (default: /data/road_network.json)
//! - `SERVICE_PORT` - HTTP port (default: 8080)
//! - `REQUEST_TIMEOUT_SECS` - Per-request deadline (default: 30)
//! - `RUST_LOG` - Log level (default: info)
//! - `LOG_FORMAT` - Log format: json (default) or text
//! - `METRICS_ENABLED`, `METRICS_PATH` - Prometheus endpoint toggles

use std::net::SocketAddr;

use anyhow::Context;
use tracing::info;

use navigator_service_route::build_router;
use navigator_service_shared::{
    init_logging, init_metrics, AppState, LoggingConfig, MetricsConfig, ServiceConfig,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let logging_config = LoggingConfig::from_env().with_service("shortest-path");
    init_logging(&logging_config);

    let metrics_config = MetricsConfig::from_env();
    if let Err(e) = init_metrics(&metrics_config) {
        tracing::warn!(error = %e, "failed to initialize metrics, continuing without metrics");
    }

    let config = ServiceConfig::from_env();
    info!(
        network_path = %config.network_path.display(),
        port = config.port,
        timeout_secs = config.request_timeout_secs,
        "starting shortest path service"
    );

    let state = AppState::load(&config.network_path, config.navigator_options())
        .with_context(|| {
            format!(
                "failed to load road network from {}",
                config.network_path.display()
            )
        })?;

    let app = build_router(state, &config, &metrics_config);

    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind {addr}"))?;
    info!(addr = %addr, "listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server error")?;

    info!("shut down");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
}
