//! Engine release check
//!
//! Compares the locally installed engine version with the latest release
//! published on GitHub.

use crate::models::VersionReport;
use anyhow::{Context, Result};
use reqwest::Client;
use serde::Deserialize;
use std::time::Duration;
use tracing::warn;
use url::Url;

/// GitHub "latest release" document for the Docker engine
pub const DEFAULT_RELEASE_URL: &str =
    "https://api.github.com/repos/docker/docker-ce/releases/latest";

/// Timeout for the release lookup
pub const DEFAULT_RELEASE_TIMEOUT: Duration = Duration::from_secs(5);

#[derive(Debug, Deserialize)]
struct LatestRelease {
    tag_name: Option<String>,
}

/// Fetches the latest released engine version
#[derive(Debug, Clone)]
pub struct ReleaseChecker {
    client: Client,
    release_url: Url,
}

impl ReleaseChecker {
    pub fn new(release_url: &str, timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(concat!("dockboard/", env!("CARGO_PKG_VERSION")))
            .build()
            .context("Failed to create HTTP client")?;

        let release_url = Url::parse(release_url).context("Invalid release URL")?;

        Ok(Self {
            client,
            release_url,
        })
    }

    /// Tag of the latest release, e.g. `v25.0.2`
    pub async fn fetch_latest(&self) -> Result<Option<String>> {
        let response = self
            .client
            .get(self.release_url.clone())
            .send()
            .await
            .context("Failed to send release request")?
            .error_for_status()
            .context("Release feed returned an error")?;

        let release: LatestRelease = response
            .json()
            .await
            .context("Failed to parse release document")?;

        Ok(release.tag_name)
    }

    /// Latest tag, or `None` when the feed cannot be read
    pub async fn latest_version(&self) -> Option<String> {
        match self.fetch_latest().await {
            Ok(tag) => tag,
            Err(e) => {
                warn!(error = %e, "Failed to get latest engine version");
                None
            }
        }
    }

    /// Compare an installed version with the latest release
    pub async fn report(&self, local: String) -> VersionReport {
        let latest = self.latest_version().await;
        build_report(local, latest)
    }
}

/// Versions match when equal after dropping a leading `v`
pub fn versions_match(installed: &str, latest: &str) -> bool {
    let normalize = |v: &str| v.trim().trim_start_matches('v').to_string();
    normalize(installed) == normalize(latest)
}

/// An unknown latest release never counts as up to date
pub fn build_report(local: String, latest: Option<String>) -> VersionReport {
    let is_latest = latest
        .as_deref()
        .map(|latest| versions_match(&local, latest))
        .unwrap_or(false);

    VersionReport {
        local,
        latest,
        is_latest,
    }
}
