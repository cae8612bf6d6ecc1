//! Docker Engine implementation of the runtime seams

use super::{EngineApi, RuntimeClient, RuntimeConnector, RuntimeError};
use crate::models::{ContainerRef, DockerContainer, DockerImage, InstantStats};
use async_trait::async_trait;
use bollard::container::{
    ListContainersOptions, StartContainerOptions, StatsOptions, StopContainerOptions,
};
use bollard::image::ListImagesOptions;
use bollard::models::ContainerSummary;
use bollard::Docker;
use std::sync::Arc;
use tokio_stream::StreamExt;
use tracing::debug;

/// Image name reported when an image carries no repository tag
const UNTAGGED: &str = "untagged";

/// Docker Engine client
#[derive(Debug, Clone)]
pub struct DockerRuntime {
    docker: Docker,
}

impl DockerRuntime {
    /// Connect using the local defaults (unix socket, or `DOCKER_HOST`)
    pub fn connect() -> Result<Self, RuntimeError> {
        let docker = Docker::connect_with_local_defaults()
            .map_err(|e| RuntimeError::Connection(e.to_string()))?;
        Ok(Self { docker })
    }
}

/// Map a bollard error onto the runtime taxonomy
fn map_error(kind: &'static str, id: &str, err: bollard::errors::Error) -> RuntimeError {
    match err {
        bollard::errors::Error::DockerResponseServerError {
            status_code: 404, ..
        } => RuntimeError::NotFound {
            kind,
            id: id.to_string(),
        },
        bollard::errors::Error::DockerResponseServerError {
            status_code,
            message,
        } => RuntimeError::Engine {
            status: status_code,
            message,
        },
        other => RuntimeError::Connection(other.to_string()),
    }
}

/// Engine reports 304 when a container is already in the requested state
fn is_not_modified(err: &bollard::errors::Error) -> bool {
    matches!(
        err,
        bollard::errors::Error::DockerResponseServerError {
            status_code: 304,
            ..
        }
    )
}

/// First engine name without the leading slash, falling back to the id
fn container_name(summary: &ContainerSummary, id: &str) -> String {
    summary
        .names
        .as_ref()
        .and_then(|names| names.first())
        .map(|name| name.trim_start_matches('/').to_string())
        .unwrap_or_else(|| id.to_string())
}

#[async_trait]
impl RuntimeClient for DockerRuntime {
    async fn is_alive(&self) -> bool {
        match self.docker.ping().await {
            Ok(_) => true,
            Err(e) => {
                debug!(error = %e, "Docker ping failed");
                false
            }
        }
    }

    async fn list_running_containers(&self) -> Result<Vec<ContainerRef>, RuntimeError> {
        let options = ListContainersOptions::<String> {
            all: false,
            ..Default::default()
        };
        let summaries = self
            .docker
            .list_containers(Some(options))
            .await
            .map_err(|e| map_error("container", "*", e))?;

        Ok(summaries
            .iter()
            .filter_map(|summary| {
                let id = summary.id.clone()?;
                let name = container_name(summary, &id);
                Some(ContainerRef { id, name })
            })
            .collect())
    }

    async fn instant_stats(&self, container_id: &str) -> Result<InstantStats, RuntimeError> {
        let options = StatsOptions {
            stream: false,
            one_shot: true,
        };
        let mut stream = Box::pin(self.docker.stats(container_id, Some(options)));

        match stream.next().await {
            Some(Ok(stats)) => Ok(InstantStats {
                memory_bytes_used: stats.memory_stats.usage,
            }),
            Some(Err(e)) => Err(map_error("container", container_id, e)),
            None => Err(RuntimeError::Engine {
                status: 0,
                message: format!("no stats sample returned for {}", container_id),
            }),
        }
    }
}

#[async_trait]
impl EngineApi for DockerRuntime {
    async fn list_images(&self) -> Result<Vec<DockerImage>, RuntimeError> {
        let options = ListImagesOptions::<String> {
            all: false,
            ..Default::default()
        };
        let images = self
            .docker
            .list_images(Some(options))
            .await
            .map_err(|e| map_error("image", "*", e))?;

        Ok(images
            .into_iter()
            .map(|image| DockerImage {
                name: image
                    .repo_tags
                    .first()
                    .cloned()
                    .unwrap_or_else(|| UNTAGGED.to_string()),
                id: image.id,
            })
            .collect())
    }

    async fn list_containers(&self) -> Result<Vec<DockerContainer>, RuntimeError> {
        let options = ListContainersOptions::<String> {
            all: true,
            ..Default::default()
        };
        let summaries = self
            .docker
            .list_containers(Some(options))
            .await
            .map_err(|e| map_error("container", "*", e))?;

        Ok(summaries
            .iter()
            .filter_map(|summary| {
                let id = summary.id.clone()?;
                let name = container_name(summary, &id);
                Some(DockerContainer { id, name })
            })
            .collect())
    }

    async fn start_container(&self, container: &str) -> Result<(), RuntimeError> {
        match self
            .docker
            .start_container(container, None::<StartContainerOptions<String>>)
            .await
        {
            Ok(()) => Ok(()),
            Err(e) if is_not_modified(&e) => {
                debug!(container = %container, "Container already running");
                Ok(())
            }
            Err(e) => Err(map_error("container", container, e)),
        }
    }

    async fn stop_container(&self, container: &str) -> Result<(), RuntimeError> {
        match self
            .docker
            .stop_container(container, None::<StopContainerOptions>)
            .await
        {
            Ok(()) => Ok(()),
            Err(e) if is_not_modified(&e) => {
                debug!(container = %container, "Container already stopped");
                Ok(())
            }
            Err(e) => Err(map_error("container", container, e)),
        }
    }

    async fn engine_version(&self) -> Result<String, RuntimeError> {
        let version = self
            .docker
            .version()
            .await
            .map_err(|e| map_error("engine", "version", e))?;
        Ok(version.version.unwrap_or_else(|| "Unknown".to_string()))
    }
}

/// Connector producing fresh [`DockerRuntime`] handles
#[derive(Debug, Clone, Default)]
pub struct DockerConnector;

impl DockerConnector {
    pub fn new() -> Self {
        Self
    }
}

impl RuntimeConnector for DockerConnector {
    fn connect(&self) -> Result<Arc<dyn RuntimeClient>, RuntimeError> {
        Ok(Arc::new(DockerRuntime::connect()?))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_found_maps_to_not_found() {
        let err = bollard::errors::Error::DockerResponseServerError {
            status_code: 404,
            message: "No such container: web".to_string(),
        };
        let mapped = map_error("container", "web", err);

        assert!(matches!(mapped, RuntimeError::NotFound { kind: "container", .. }));
        assert_eq!(mapped.to_string(), "container not found: web");
    }

    #[test]
    fn test_server_error_keeps_status() {
        let err = bollard::errors::Error::DockerResponseServerError {
            status_code: 500,
            message: "boom".to_string(),
        };

        match map_error("container", "web", err) {
            RuntimeError::Engine { status, message } => {
                assert_eq!(status, 500);
                assert_eq!(message, "boom");
            }
            other => panic!("unexpected mapping: {other:?}"),
        }
    }

    #[test]
    fn test_not_modified_detection() {
        let err = bollard::errors::Error::DockerResponseServerError {
            status_code: 304,
            message: String::new(),
        };
        assert!(is_not_modified(&err));
    }

    #[test]
    fn test_container_name_strips_slash() {
        let summary = ContainerSummary {
            id: Some("abc123".to_string()),
            names: Some(vec!["/web".to_string()]),
            ..Default::default()
        };
        assert_eq!(container_name(&summary, "abc123"), "web");
    }

    #[test]
    fn test_container_name_falls_back_to_id() {
        let summary = ContainerSummary {
            id: Some("abc123".to_string()),
            names: None,
            ..Default::default()
        };
        assert_eq!(container_name(&summary, "abc123"), "abc123");
    }
}
