//! Health tracking for the dashboard
//!
//! Components report their state here; the server exposes the aggregate on
//! `/healthz` and `/readyz`.

use crate::collector::CollectError;
use crate::models::PredictionResult;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

/// Health status of a component
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ComponentStatus {
    Healthy,
    /// Still serving, with reduced functionality
    Degraded,
    Unhealthy,
}

impl ComponentStatus {
    pub fn is_operational(&self) -> bool {
        matches!(self, ComponentStatus::Healthy | ComponentStatus::Degraded)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComponentHealth {
    pub status: ComponentStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    pub last_check_timestamp: i64,
}

impl ComponentHealth {
    fn with_status(status: ComponentStatus, message: Option<String>) -> Self {
        Self {
            status,
            message,
            last_check_timestamp: chrono::Utc::now().timestamp(),
        }
    }

    pub fn healthy() -> Self {
        Self::with_status(ComponentStatus::Healthy, None)
    }

    pub fn degraded(message: impl Into<String>) -> Self {
        Self::with_status(ComponentStatus::Degraded, Some(message.into()))
    }

    pub fn unhealthy(message: impl Into<String>) -> Self {
        Self::with_status(ComponentStatus::Unhealthy, Some(message.into()))
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: ComponentStatus,
    pub components: HashMap<String, ComponentHealth>,
}

impl HealthResponse {
    /// Worst component status wins
    pub fn compute_status(components: &HashMap<String, ComponentHealth>) -> ComponentStatus {
        let mut overall = ComponentStatus::Healthy;
        for health in components.values() {
            match health.status {
                ComponentStatus::Unhealthy => return ComponentStatus::Unhealthy,
                ComponentStatus::Degraded => overall = ComponentStatus::Degraded,
                ComponentStatus::Healthy => {}
            }
        }
        overall
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReadinessResponse {
    pub ready: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
}

/// Component names for health tracking
pub mod components {
    pub const RUNTIME: &str = "runtime";
    pub const PREDICTOR: &str = "predictor";
    pub const RELEASE_FEED: &str = "release_feed";
}

/// Shared registry of component health
#[derive(Debug, Clone, Default)]
pub struct HealthRegistry {
    components: Arc<RwLock<HashMap<String, ComponentHealth>>>,
    ready: Arc<RwLock<bool>>,
}

impl HealthRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a component as healthy
    pub async fn register(&self, name: &str) {
        self.update(name, ComponentHealth::healthy()).await;
    }

    pub async fn update(&self, name: &str, health: ComponentHealth) {
        self.components
            .write()
            .await
            .insert(name.to_string(), health);
    }

    pub async fn set_healthy(&self, name: &str) {
        self.update(name, ComponentHealth::healthy()).await;
    }

    pub async fn set_degraded(&self, name: &str, message: impl Into<String>) {
        self.update(name, ComponentHealth::degraded(message)).await;
    }

    pub async fn set_unhealthy(&self, name: &str, message: impl Into<String>) {
        self.update(name, ComponentHealth::unhealthy(message)).await;
    }

    /// Reflect a collection outcome on the runtime component
    pub async fn record_collection<T>(&self, outcome: &Result<T, CollectError>) {
        match outcome {
            Ok(_) => self.set_healthy(components::RUNTIME).await,
            Err(e) => self.set_unhealthy(components::RUNTIME, e.to_string()).await,
        }
    }

    /// Reflect a served forecast on the predictor component
    pub async fn record_prediction(&self, result: &PredictionResult) {
        if result.no_data {
            self.set_degraded(components::PREDICTOR, "No container samples to forecast from")
                .await;
        } else {
            self.set_healthy(components::PREDICTOR).await;
        }
    }

    /// Reflect a release lookup on the release feed component
    pub async fn record_release_lookup(&self, latest_known: bool) {
        if latest_known {
            self.set_healthy(components::RELEASE_FEED).await;
        } else {
            self.set_degraded(components::RELEASE_FEED, "Latest release could not be fetched")
                .await;
        }
    }

    pub async fn set_ready(&self, ready: bool) {
        *self.ready.write().await = ready;
    }

    pub async fn health(&self) -> HealthResponse {
        let components = self.components.read().await.clone();
        let status = HealthResponse::compute_status(&components);
        HealthResponse { status, components }
    }

    pub async fn readiness(&self) -> ReadinessResponse {
        let ready = *self.ready.read().await;
        let health = self.health().await;

        let reason = if !ready {
            Some("Dashboard not yet initialized")
        } else if health.status == ComponentStatus::Unhealthy {
            Some("Critical component unhealthy")
        } else {
            None
        };

        ReadinessResponse {
            ready: reason.is_none(),
            reason: reason.map(str::to_string),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_empty_registry_is_healthy() {
        let registry = HealthRegistry::new();
        let health = registry.health().await;

        assert_eq!(health.status, ComponentStatus::Healthy);
        assert!(health.components.is_empty());
    }

    #[tokio::test]
    async fn test_degraded_release_feed_degrades_overall() {
        let registry = HealthRegistry::new();
        registry.register(components::RUNTIME).await;
        registry.register(components::RELEASE_FEED).await;

        registry.record_release_lookup(false).await;

        let health = registry.health().await;
        assert_eq!(health.status, ComponentStatus::Degraded);
        assert!(health.status.is_operational());
    }

    #[tokio::test]
    async fn test_failed_collection_marks_runtime_unhealthy() {
        let registry = HealthRegistry::new();
        registry.register(components::RUNTIME).await;

        let outcome: Result<(), CollectError> =
            Err(CollectError::RuntimeUnavailable("socket missing".to_string()));
        registry.record_collection(&outcome).await;

        let health = registry.health().await;
        assert_eq!(health.status, ComponentStatus::Unhealthy);
        let runtime = &health.components[components::RUNTIME];
        assert!(runtime.message.as_deref().unwrap().contains("socket missing"));

        registry.record_collection(&Ok::<(), CollectError>(())).await;
        assert_eq!(registry.health().await.status, ComponentStatus::Healthy);
    }

    #[tokio::test]
    async fn test_empty_forecast_degrades_predictor() {
        let registry = HealthRegistry::new();
        registry.register(components::PREDICTOR).await;

        let mut result = PredictionResult {
            data: Vec::new(),
            predicted_next: 0.0,
            summary: String::new(),
            no_data: true,
        };
        registry.record_prediction(&result).await;

        let health = registry.health().await;
        assert_eq!(
            health.components[components::PREDICTOR].status,
            ComponentStatus::Degraded
        );

        result.no_data = false;
        registry.record_prediction(&result).await;
        assert_eq!(registry.health().await.status, ComponentStatus::Healthy);
    }

    #[tokio::test]
    async fn test_readiness_states() {
        let registry = HealthRegistry::new();
        registry.register(components::RUNTIME).await;
        assert!(!registry.readiness().await.ready);

        registry.set_ready(true).await;
        assert!(registry.readiness().await.ready);

        registry.set_unhealthy(components::RUNTIME, "down").await;
        let readiness = registry.readiness().await;
        assert!(!readiness.ready);
        assert_eq!(readiness.reason.as_deref(), Some("Critical component unhealthy"));
    }
}
