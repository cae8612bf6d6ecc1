//! Dockboard - container engine dashboard
//!
//! Serves the REST facade, health checks and metrics for the local Docker
//! engine.

use anyhow::{Context, Result};
use dashboard_lib::{
    health::{components, HealthRegistry},
    DashboardMetrics, DockerConnector, DockerRuntime, ReleaseChecker, StatsCollector,
    StructuredLogger, UsagePredictor,
};
use dockboard::{api, config::DashboardConfig};
use std::sync::Arc;
use tracing::info;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

const DASHBOARD_VERSION: &str = env!("CARGO_PKG_VERSION");

/// JSON logs to stdout, plus a daily-rolling file when `log_dir` is set.
/// The returned guard must live until exit so buffered lines are flushed.
fn init_tracing(config: &DashboardConfig) -> Option<WorkerGuard> {
    let (file_layer, guard) = match &config.log_dir {
        Some(dir) => {
            let appender = tracing_appender::rolling::daily(dir, "dockboard.log");
            let (writer, guard) = tracing_appender::non_blocking(appender);
            (
                Some(fmt::layer().json().with_ansi(false).with_writer(writer)),
                Some(guard),
            )
        }
        None => (None, None),
    };

    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with(fmt::layer().json())
        .with(file_layer)
        .init();

    guard
}

async fn shutdown_signal(logger: StructuredLogger) {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for shutdown signal");
    }
    logger.log_shutdown("SIGINT received");
}

#[tokio::main]
async fn main() -> Result<()> {
    let config = DashboardConfig::load()?;
    let _log_guard = init_tracing(&config);

    info!("Starting dockboard");

    let engine = DockerRuntime::connect().context("Docker is not running or cannot be reached")?;

    // Initialize health registry
    let health_registry = HealthRegistry::new();
    health_registry.register(components::RUNTIME).await;
    health_registry.register(components::PREDICTOR).await;
    health_registry.register(components::RELEASE_FEED).await;

    let metrics = DashboardMetrics::new();
    let logger = StructuredLogger::new("dockboard");

    let collector = StatsCollector::new(Arc::new(DockerConnector));
    if !collector.is_connected() {
        health_registry
            .set_degraded(components::RUNTIME, "Runtime not reachable at startup")
            .await;
    }
    let predictor = UsagePredictor::new(collector);
    let releases = ReleaseChecker::new(&config.release_url, config.release_timeout())?;

    let app_state = Arc::new(api::AppState::new(
        health_registry.clone(),
        metrics,
        logger.clone(),
        Arc::new(engine),
        predictor,
        releases,
        config.collect_timeout(),
    ));

    health_registry.set_ready(true).await;

    let bind_addr = config.bind_addr();
    logger.log_startup(DASHBOARD_VERSION, &bind_addr);

    api::serve(&bind_addr, app_state, shutdown_signal(logger)).await?;
    info!("Shutting down");

    Ok(())
}
