//! Container runtime access
//!
//! Two seams sit over the engine: [`RuntimeClient`] is the narrow capability
//! the stats pipeline needs, [`EngineApi`] covers the management calls the
//! REST facade passes through. [`DockerRuntime`] implements both on top of
//! bollard.

mod docker;

pub use docker::{DockerConnector, DockerRuntime};

use crate::models::{ContainerRef, DockerContainer, DockerImage, InstantStats};
use async_trait::async_trait;
use std::sync::Arc;
use thiserror::Error;

/// Errors reported by the container runtime
#[derive(Debug, Error)]
pub enum RuntimeError {
    /// The engine could not be reached
    #[error("runtime connection failed: {0}")]
    Connection(String),

    /// The referenced container or image does not exist
    #[error("{kind} not found: {id}")]
    NotFound { kind: &'static str, id: String },

    /// The engine answered with an error
    #[error("engine error ({status}): {message}")]
    Engine { status: u16, message: String },
}

/// Capability consumed by the stats collector
#[async_trait]
pub trait RuntimeClient: Send + Sync {
    /// Liveness check of the underlying connection
    async fn is_alive(&self) -> bool;

    /// Containers that are currently running, in engine order
    async fn list_running_containers(&self) -> Result<Vec<ContainerRef>, RuntimeError>;

    /// Single non-streaming resource sample for one container
    async fn instant_stats(&self, container_id: &str) -> Result<InstantStats, RuntimeError>;
}

/// Creates runtime client handles on demand
pub trait RuntimeConnector: Send + Sync {
    fn connect(&self) -> Result<Arc<dyn RuntimeClient>, RuntimeError>;
}

/// Management calls exposed through the REST facade
#[async_trait]
pub trait EngineApi: Send + Sync {
    async fn list_images(&self) -> Result<Vec<DockerImage>, RuntimeError>;

    /// All containers, including stopped ones
    async fn list_containers(&self) -> Result<Vec<DockerContainer>, RuntimeError>;

    async fn start_container(&self, container: &str) -> Result<(), RuntimeError>;

    async fn stop_container(&self, container: &str) -> Result<(), RuntimeError>;

    /// Version string of the local engine, "Unknown" when not reported
    async fn engine_version(&self) -> Result<String, RuntimeError>;
}
