//! Dashboard library for a container engine
//!
//! This crate provides the core functionality for:
//! - Runtime access through the Docker Engine API
//! - Per-container memory sampling
//! - Memory usage forecasting and summaries
//! - Engine release checks
//! - Health checks and observability

pub mod collector;
pub mod health;
pub mod models;
pub mod observability;
pub mod predictor;
pub mod release;
pub mod runtime;

pub use collector::{CollectError, CollectionBatch, SampleSkipped, StatsCollector};
pub use health::{
    ComponentHealth, ComponentStatus, HealthRegistry, HealthResponse, ReadinessResponse,
};
pub use models::*;
pub use observability::{DashboardMetrics, StructuredLogger};
pub use predictor::UsagePredictor;
pub use release::ReleaseChecker;
pub use runtime::{DockerConnector, DockerRuntime, EngineApi, RuntimeClient, RuntimeConnector, RuntimeError};
