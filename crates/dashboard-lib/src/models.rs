//! Core data models for the dashboard

use serde::{Deserialize, Serialize};

/// Bytes per megabyte used for memory normalization (1024²)
pub const BYTES_PER_MB: f64 = 1024.0 * 1024.0;

/// Memory usage of one container at collection time
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContainerStats {
    pub name: String,
    /// Resident memory usage in megabytes
    pub memory_usage: f64,
}

impl ContainerStats {
    pub fn new(name: impl Into<String>, memory_usage: f64) -> Self {
        Self {
            name: name.into(),
            memory_usage,
        }
    }
}

/// Rows produced by one collection cycle, in the runtime's enumeration order
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UsageDataset {
    pub rows: Vec<ContainerStats>,
    /// Unix timestamp of the collection. Informational only.
    pub collected_at: i64,
}

impl UsageDataset {
    pub fn new(rows: Vec<ContainerStats>) -> Self {
        Self {
            rows,
            collected_at: chrono::Utc::now().timestamp(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, ContainerStats> {
        self.rows.iter()
    }
}

impl FromIterator<ContainerStats> for UsageDataset {
    fn from_iter<I: IntoIterator<Item = ContainerStats>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

/// Forecast handed to the presentation layer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PredictionResult {
    pub data: Vec<ContainerStats>,
    /// Predicted next memory reading in megabytes, never negative
    pub predicted_next: f64,
    pub summary: String,
    /// Set when the dataset had no rows and the forecast defaulted to zero
    #[serde(default)]
    pub no_data: bool,
}

/// Running container as enumerated by the runtime
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContainerRef {
    pub id: String,
    pub name: String,
}

/// One non-streaming resource sample for a container
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct InstantStats {
    pub memory_bytes_used: Option<u64>,
}

/// Image known to the engine
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DockerImage {
    pub id: String,
    /// First repository tag, or "untagged"
    pub name: String,
}

/// Container known to the engine, running or not
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DockerContainer {
    pub id: String,
    pub name: String,
}

/// Installed engine version compared to the latest release
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VersionReport {
    pub local: String,
    pub latest: Option<String>,
    pub is_latest: bool,
}

/// Message returned by container start/stop
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActionResponse {
    pub message: String,
}
