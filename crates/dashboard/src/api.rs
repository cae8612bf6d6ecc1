//! REST facade over the container engine, plus health and metrics

use crate::error::ApiError;
use crate::middleware::log_requests;
use dashboard_lib::{
    health::{components, ComponentStatus, HealthRegistry},
    ActionResponse, CollectError, DashboardMetrics, DockerContainer, DockerImage, EngineApi,
    PredictionResult, ReleaseChecker, StructuredLogger, UsagePredictor, VersionReport,
};
use axum::{
    extract::{Path, State},
    http::StatusCode,
    middleware,
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use prometheus::{Encoder, TextEncoder};
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::Mutex;
use tracing::{error, info};

/// Shared application state
pub struct AppState {
    pub health_registry: HealthRegistry,
    pub metrics: DashboardMetrics,
    pub logger: StructuredLogger,
    pub engine: Arc<dyn EngineApi>,
    pub predictor: Mutex<UsagePredictor>,
    pub releases: ReleaseChecker,
    pub collect_timeout: Duration,
}

impl AppState {
    pub fn new(
        health_registry: HealthRegistry,
        metrics: DashboardMetrics,
        logger: StructuredLogger,
        engine: Arc<dyn EngineApi>,
        predictor: UsagePredictor,
        releases: ReleaseChecker,
        collect_timeout: Duration,
    ) -> Self {
        Self {
            health_registry,
            metrics,
            logger,
            engine,
            predictor: Mutex::new(predictor),
            releases,
            collect_timeout,
        }
    }
}

async fn list_images(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<DockerImage>>, ApiError> {
    Ok(Json(state.engine.list_images().await?))
}

async fn list_containers(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<DockerContainer>>, ApiError> {
    Ok(Json(state.engine.list_containers().await?))
}

async fn start_container(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<(StatusCode, Json<ActionResponse>), ApiError> {
    let outcome = state.engine.start_container(&id).await;
    container_action(&state, "start", &id, outcome)?;

    Ok((
        StatusCode::CREATED,
        Json(ActionResponse {
            message: format!("Container '{}' started successfully.", id),
        }),
    ))
}

async fn stop_container(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<(StatusCode, Json<ActionResponse>), ApiError> {
    let outcome = state.engine.stop_container(&id).await;
    container_action(&state, "stop", &id, outcome)?;

    Ok((
        StatusCode::CREATED,
        Json(ActionResponse {
            message: format!("Container '{}' stopped successfully.", id),
        }),
    ))
}

/// Record a start/stop outcome and convert its error
fn container_action(
    state: &AppState,
    action: &str,
    id: &str,
    outcome: Result<(), dashboard_lib::RuntimeError>,
) -> Result<(), ApiError> {
    state.metrics.record_container_action(action, outcome.is_ok());
    match outcome {
        Ok(()) => {
            state.logger.log_container_action(action, id, None);
            Ok(())
        }
        Err(e) => {
            state
                .logger
                .log_container_action(action, id, Some(&e.to_string()));
            Err(e.into())
        }
    }
}

async fn engine_version(
    State(state): State<Arc<AppState>>,
) -> Result<Json<VersionReport>, ApiError> {
    let local = state.engine.engine_version().await?;
    let report = state.releases.report(local).await;

    state
        .health_registry
        .record_release_lookup(report.latest.is_some())
        .await;
    state.logger.log_version_check(&report);

    Ok(Json(report))
}

async fn predict(State(state): State<Arc<AppState>>) -> Result<Json<PredictionResult>, ApiError> {
    run_prediction(&state, false).await.map(Json)
}

async fn refresh_prediction(
    State(state): State<Arc<AppState>>,
) -> Result<Json<PredictionResult>, ApiError> {
    run_prediction(&state, true).await.map(Json)
}

/// Forecast from the held dataset, collecting first when forced or when none
/// is held. The predictor lock is held for the whole call so concurrent
/// requests never collect twice.
async fn run_prediction(state: &AppState, force: bool) -> Result<PredictionResult, ApiError> {
    let mut predictor = state.predictor.lock().await;
    let collects = force || predictor.dataset().is_none();

    let start = Instant::now();
    let pending = async {
        if force {
            if let Err(e) = predictor.refresh().await {
                return Err(e);
            }
        }
        predictor.predict().await
    };

    let outcome: Result<PredictionResult, CollectError> =
        match tokio::time::timeout(state.collect_timeout, pending).await {
            Ok(outcome) => outcome,
            Err(_) => {
                state.metrics.inc_collection_errors();
                state
                    .health_registry
                    .set_degraded(components::RUNTIME, "Stats collection timed out")
                    .await;
                return Err(ApiError::Timeout(format!(
                    "Stats collection did not finish within {}s",
                    state.collect_timeout.as_secs()
                )));
            }
        };

    if collects {
        state.health_registry.record_collection(&outcome).await;
    }

    match outcome {
        Ok(result) => {
            if collects {
                state.metrics.record_collection(
                    result.data.len(),
                    predictor.skipped().len(),
                    start.elapsed(),
                );
            }
            state.metrics.record_prediction(&result);
            state.health_registry.record_prediction(&result).await;
            state.logger.log_prediction(&result, collects);
            Ok(result)
        }
        Err(e) => {
            error!(error = %e, "Prediction failed");
            state.metrics.inc_collection_errors();
            Err(e.into())
        }
    }
}

/// Health check response - returns 200 if healthy, 503 if unhealthy
async fn healthz(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let health = state.health_registry.health().await;

    let status_code = match health.status {
        ComponentStatus::Healthy | ComponentStatus::Degraded => StatusCode::OK,
        ComponentStatus::Unhealthy => StatusCode::SERVICE_UNAVAILABLE,
    };

    (status_code, Json(health))
}

/// Readiness check response - returns 200 if ready, 503 if not ready
async fn readyz(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let readiness = state.health_registry.readiness().await;

    let status_code = if readiness.ready {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    (status_code, Json(readiness))
}

/// Prometheus metrics endpoint
async fn metrics() -> Result<impl IntoResponse, ApiError> {
    let encoder = TextEncoder::new();
    let metric_families = prometheus::gather();
    let mut buffer = Vec::new();

    encoder
        .encode(&metric_families, &mut buffer)
        .map_err(|e| ApiError::Internal(format!("Failed to encode metrics: {}", e)))?;

    Ok((
        StatusCode::OK,
        [("content-type", "text/plain; charset=utf-8")],
        buffer,
    ))
}

/// Create the API router
pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/api/images", get(list_images))
        .route("/api/containers", get(list_containers))
        .route("/api/containers/:id/start", post(start_container))
        .route("/api/containers/:id/stop", post(stop_container))
        .route("/api/version", get(engine_version))
        .route("/api/predict", get(predict))
        .route("/api/predict/refresh", post(refresh_prediction))
        .route("/healthz", get(healthz))
        .route("/readyz", get(readyz))
        .route("/metrics", get(metrics))
        .layer(middleware::from_fn_with_state(state.clone(), log_requests))
        .with_state(state)
}

/// Start the API server and run until `shutdown` resolves
pub async fn serve<F>(bind_addr: &str, state: Arc<AppState>, shutdown: F) -> anyhow::Result<()>
where
    F: std::future::Future<Output = ()> + Send + 'static,
{
    let app = create_router(state);

    info!(addr = %bind_addr, "Starting API server");

    let listener = tokio::net::TcpListener::bind(bind_addr).await?;
    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .with_graceful_shutdown(shutdown)
    .await?;

    Ok(())
}
