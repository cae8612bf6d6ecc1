//! Memory usage collection from the container runtime
//!
//! The collector samples every running container once, converts resident
//! memory to megabytes and returns the rows in enumeration order. A
//! container whose sample fails is skipped with a warning; only failures of
//! the runtime connection itself abort the batch.


use crate::models::{ContainerRef, ContainerStats, InstantStats, UsageDataset, BYTES_PER_MB};
use crate::runtime::{RuntimeClient, RuntimeConnector};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Instant;
use thiserror::Error;
use tracing::{debug, info, warn};

/// Fatal collection errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CollectError {
    /// The runtime could not be reached or failed its liveness check
    #[error("container runtime unavailable: {0}")]
    RuntimeUnavailable(String),
}

/// Container left out of a batch because its sample failed
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SampleSkipped {
    pub container: String,
    pub reason: String,
}

/// Outcome of one collection cycle
#[derive(Debug, Clone, Default)]
pub struct CollectionBatch {
    pub dataset: UsageDataset,
    pub skipped: Vec<SampleSkipped>,
}

/// Convert a byte count to megabytes (1 MB = 1024² bytes)
pub fn bytes_to_megabytes(bytes: u64) -> f64 {
    bytes as f64 / BYTES_PER_MB
}

/// Samples per-container memory usage through a runtime client
pub struct StatsCollector {
    connector: Arc<dyn RuntimeConnector>,
    client: Option<Arc<dyn RuntimeClient>>,
}

impl StatsCollector {
    /// Create a collector, attempting one eager connection.
    ///
    /// A failed connection is not an error here; the handle stays absent and
    /// the next [`collect`](Self::collect) retries once.
    pub fn new(connector: Arc<dyn RuntimeConnector>) -> Self {
        let client = match connector.connect() {
            Ok(client) => Some(client),
            Err(e) => {
                warn!(error = %e, "Container runtime not available at startup");
                None
            }
        };
        Self { connector, client }
    }

    /// Create a collector around an existing client handle
    pub fn with_client(connector: Arc<dyn RuntimeConnector>, client: Arc<dyn RuntimeClient>) -> Self {
        Self {
            connector,
            client: Some(client),
        }
    }

    /// Whether a client handle is currently held
    pub fn is_connected(&self) -> bool {
        self.client.is_some()
    }

    fn connect(&self) -> Result<Arc<dyn RuntimeClient>, CollectError> {
        self.connector.connect().map_err(|e| {
            CollectError::RuntimeUnavailable(format!("cannot connect to the runtime: {}", e))
        })
    }

    /// Return a handle that passed its liveness check.
    ///
    /// At most one (re)connection is attempted per call.
    async fn live_client(&mut self) -> Result<Arc<dyn RuntimeClient>, CollectError> {
        let (client, fresh) = match self.client.clone() {
            Some(client) => (client, false),
            None => {
                debug!("No runtime handle held, connecting");
                (self.connect()?, true)
            }
        };

        if client.is_alive().await {
            self.client = Some(client.clone());
            return Ok(client);
        }

        if fresh {
            return Err(CollectError::RuntimeUnavailable(
                "runtime is not running or not accessible".to_string(),
            ));
        }

        self.client = None;
        warn!("Runtime liveness check failed, reconnecting");
        let client = self.connect()?;
        if client.is_alive().await {
            info!("Reconnected to container runtime");
            self.client = Some(client.clone());
            Ok(client)
        } else {
            Err(CollectError::RuntimeUnavailable(
                "runtime is not running or not accessible".to_string(),
            ))
        }
    }

    /// Sample every running container once
    pub async fn collect(&mut self) -> Result<CollectionBatch, CollectError> {
        let start = Instant::now();
        let client = self.live_client().await?;

        let containers = client.list_running_containers().await.map_err(|e| {
            CollectError::RuntimeUnavailable(format!("failed to enumerate containers: {}", e))
        })?;

        let mut rows = Vec::with_capacity(containers.len());
        let mut skipped = Vec::new();

        for container in containers {
            match sample(client.as_ref(), &container).await {
                Ok(stats) => rows.push(stats),
                Err(skip) => {
                    warn!(
                        event = "sample_skipped",
                        container = %skip.container,
                        reason = %skip.reason,
                        "Could not fetch stats for container"
                    );
                    skipped.push(skip);
                }
            }
        }

        debug!(
            containers = rows.len(),
            skipped = skipped.len(),
            elapsed_ms = start.elapsed().as_millis(),
            "Collection cycle complete"
        );

        Ok(CollectionBatch {
            dataset: UsageDataset::new(rows),
            skipped,
        })
    }
}

/// Fetch and normalize one container's sample
async fn sample(
    client: &dyn RuntimeClient,
    container: &ContainerRef,
) -> Result<ContainerStats, SampleSkipped> {
    let skip = |reason: String| SampleSkipped {
        container: container.name.clone(),
        reason,
    };

    match client.instant_stats(&container.id).await {
        Ok(InstantStats {
            memory_bytes_used: Some(bytes),
        }) => Ok(ContainerStats::new(
            container.name.clone(),
            bytes_to_megabytes(bytes),
        )),
        Ok(InstantStats {
            memory_bytes_used: None,
        }) => Err(skip("sample carries no memory usage".to_string())),
        Err(e) => Err(skip(e.to_string())),
    }
}
