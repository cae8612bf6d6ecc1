//! Dashboard configuration

use anyhow::{Context, Result};
use dashboard_lib::release::DEFAULT_RELEASE_URL;
use serde::Deserialize;
use std::time::Duration;

/// Dashboard configuration
#[derive(Debug, Clone, Deserialize)]
pub struct DashboardConfig {
    /// Port of the REST facade
    #[serde(default = "default_api_port")]
    pub api_port: u16,

    #[serde(default = "default_bind_address")]
    pub bind_address: String,

    /// Latest-release document of the engine
    #[serde(default = "default_release_url")]
    pub release_url: String,

    #[serde(default = "default_release_timeout")]
    pub release_timeout_secs: u64,

    /// Upper bound on one stats collection, in seconds
    #[serde(default = "default_collect_timeout")]
    pub collect_timeout_secs: u64,

    /// Directory for a daily-rolling log file; stdout only when unset
    #[serde(default)]
    pub log_dir: Option<String>,
}

fn default_api_port() -> u16 {
    8000
}

fn default_bind_address() -> String {
    "0.0.0.0".to_string()
}

fn default_release_url() -> String {
    DEFAULT_RELEASE_URL.to_string()
}

fn default_release_timeout() -> u64 {
    5
}

fn default_collect_timeout() -> u64 {
    30
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            api_port: default_api_port(),
            bind_address: default_bind_address(),
            release_url: default_release_url(),
            release_timeout_secs: default_release_timeout(),
            collect_timeout_secs: default_collect_timeout(),
            log_dir: None,
        }
    }
}

impl DashboardConfig {
    /// Load configuration from `DOCKBOARD_*` environment variables
    pub fn load() -> Result<Self> {
        Self::from_source(config::Environment::with_prefix("DOCKBOARD").try_parsing(true))
    }

    fn from_source<S>(source: S) -> Result<Self>
    where
        S: config::Source + Send + Sync + 'static,
    {
        let config = config::Config::builder()
            .add_source(source)
            .build()
            .context("Failed to read configuration")?;

        config
            .try_deserialize()
            .context("Invalid dashboard configuration")
    }

    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.bind_address, self.api_port)
    }

    pub fn release_timeout(&self) -> Duration {
        Duration::from_secs(self.release_timeout_secs)
    }

    pub fn collect_timeout(&self) -> Duration {
        Duration::from_secs(self.collect_timeout_secs)
    }
}
