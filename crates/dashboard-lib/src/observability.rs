//! Observability infrastructure for the dashboard
//!
//! Provides:
//! - Prometheus metrics (collection latency, sampled containers, forecasts, requests)
//! - Structured JSON logging with tracing

use crate::models::{PredictionResult, VersionReport};
use prometheus::{
    register_gauge, register_histogram, register_int_counter, register_int_counter_vec,
    register_int_gauge, Gauge, Histogram, IntCounter, IntCounterVec, IntGauge,
};
use std::sync::OnceLock;
use std::time::Duration;
use tracing::{info, warn};

/// Histogram buckets for collection latency (in seconds). Sampling is one
/// engine round-trip per container, so the range reaches well past a second.
const LATENCY_BUCKETS: &[f64] = &[0.005, 0.01, 0.025, 0.05, 0.1, 0.25, 0.5, 1.0, 2.5, 5.0, 10.0];

/// Global metrics instance (registered once)
static GLOBAL_METRICS: OnceLock<DashboardMetricsInner> = OnceLock::new();

struct DashboardMetricsInner {
    collection_latency_seconds: Histogram,
    containers_sampled: IntGauge,
    samples_skipped: IntCounter,
    collection_errors: IntCounter,
    predictions_generated: IntCounter,
    predicted_memory_megabytes: Gauge,
    container_actions: IntCounterVec,
    http_requests: IntCounterVec,
}

impl DashboardMetricsInner {
    fn new() -> Self {
        Self {
            collection_latency_seconds: register_histogram!(
                "dockboard_collection_latency_seconds",
                "Time spent sampling container stats from the runtime",
                LATENCY_BUCKETS.to_vec()
            )
            .expect("Failed to register collection_latency_seconds"),

            containers_sampled: register_int_gauge!(
                "dockboard_containers_sampled",
                "Containers present in the most recent dataset"
            )
            .expect("Failed to register containers_sampled"),

            samples_skipped: register_int_counter!(
                "dockboard_samples_skipped_total",
                "Containers left out of a dataset because their stats could not be fetched"
            )
            .expect("Failed to register samples_skipped"),

            collection_errors: register_int_counter!(
                "dockboard_collection_errors_total",
                "Collections aborted because the runtime was unavailable"
            )
            .expect("Failed to register collection_errors"),

            predictions_generated: register_int_counter!(
                "dockboard_predictions_generated_total",
                "Total number of memory forecasts served"
            )
            .expect("Failed to register predictions_generated"),

            predicted_memory_megabytes: register_gauge!(
                "dockboard_predicted_memory_megabytes",
                "Most recent memory forecast in megabytes"
            )
            .expect("Failed to register predicted_memory_megabytes"),

            container_actions: register_int_counter_vec!(
                "dockboard_container_actions_total",
                "Container start/stop requests by outcome",
                &["action", "outcome"]
            )
            .expect("Failed to register container_actions"),

            http_requests: register_int_counter_vec!(
                "dockboard_http_requests_total",
                "HTTP requests served by method and status class",
                &["method", "status_class"]
            )
            .expect("Failed to register http_requests"),
        }
    }
}

/// Dashboard metrics for Prometheus exposition
///
/// Lightweight handle to the global metrics instance; clones share the same
/// underlying metrics.
#[derive(Clone)]
pub struct DashboardMetrics {
    _private: (),
}

impl Default for DashboardMetrics {
    fn default() -> Self {
        Self::new()
    }
}

impl DashboardMetrics {
    pub fn new() -> Self {
        GLOBAL_METRICS.get_or_init(DashboardMetricsInner::new);
        Self { _private: () }
    }

    fn inner(&self) -> &DashboardMetricsInner {
        GLOBAL_METRICS.get_or_init(DashboardMetricsInner::new)
    }

    pub fn observe_collection_latency(&self, elapsed: Duration) {
        self.inner()
            .collection_latency_seconds
            .observe(elapsed.as_secs_f64());
    }

    /// Record a successful collection
    pub fn record_collection(&self, sampled: usize, skipped: usize, elapsed: Duration) {
        self.observe_collection_latency(elapsed);
        self.inner().containers_sampled.set(sampled as i64);
        self.inner().samples_skipped.inc_by(skipped as u64);
    }

    pub fn inc_collection_errors(&self) {
        self.inner().collection_errors.inc();
    }

    pub fn record_prediction(&self, result: &PredictionResult) {
        self.inner().predictions_generated.inc();
        self.inner()
            .predicted_memory_megabytes
            .set(result.predicted_next);
    }

    pub fn record_container_action(&self, action: &str, success: bool) {
        let outcome = if success { "success" } else { "failure" };
        self.inner()
            .container_actions
            .with_label_values(&[action, outcome])
            .inc();
    }

    pub fn record_http_request(&self, method: &str, status: u16) {
        let class = match status {
            100..=199 => "1xx",
            200..=299 => "2xx",
            300..=399 => "3xx",
            400..=499 => "4xx",
            _ => "5xx",
        };
        self.inner()
            .http_requests
            .with_label_values(&[method, class])
            .inc();
    }
}

/// Structured logger for dashboard events
#[derive(Clone)]
pub struct StructuredLogger {
    instance: String,
}

impl StructuredLogger {
    pub fn new(instance: impl Into<String>) -> Self {
        Self {
            instance: instance.into(),
        }
    }

    pub fn log_startup(&self, version: &str, bind_addr: &str) {
        info!(
            event = "dashboard_started",
            instance = %self.instance,
            version = %version,
            bind_addr = %bind_addr,
            "Dockboard started"
        );
    }

    pub fn log_shutdown(&self, reason: &str) {
        info!(
            event = "dashboard_shutdown",
            instance = %self.instance,
            reason = %reason,
            "Dockboard shutting down"
        );
    }

    pub fn log_prediction(&self, result: &PredictionResult, refreshed: bool) {
        info!(
            event = "prediction_generated",
            instance = %self.instance,
            containers = result.data.len(),
            predicted_next_mb = result.predicted_next,
            no_data = result.no_data,
            refreshed = refreshed,
            "Generated memory forecast"
        );
    }

    pub fn log_container_action(&self, action: &str, container: &str, error: Option<&str>) {
        match error {
            None => info!(
                event = "container_action",
                instance = %self.instance,
                action = %action,
                container = %container,
                success = true,
                "Container action completed"
            ),
            Some(error) => warn!(
                event = "container_action",
                instance = %self.instance,
                action = %action,
                container = %container,
                success = false,
                error = %error,
                "Container action failed"
            ),
        }
    }

    pub fn log_version_check(&self, report: &VersionReport) {
        info!(
            event = "engine_version_checked",
            instance = %self.instance,
            local = %report.local,
            latest = ?report.latest,
            is_latest = report.is_latest,
            "Checked engine version"
        );
    }

    /// One line per HTTP request, emitted by the request logging middleware
    pub fn log_request(
        &self,
        method: &str,
        uri: &str,
        status_code: u16,
        duration_ms: f64,
        client_ip: &str,
    ) {
        info!(
            event = "http_request",
            instance = %self.instance,
            method = %method,
            url = %uri,
            status_code = status_code,
            duration_ms = (duration_ms * 100.0).round() / 100.0,
            client_ip = %client_ip,
            "Request handled"
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_metrics_accept_observations() {
        let metrics = DashboardMetrics::new();
        metrics.record_collection(3, 1, Duration::from_millis(12));
        metrics.inc_collection_errors();
        metrics.record_container_action("start", true);
        metrics.record_http_request("GET", 200);
        metrics.record_http_request("POST", 404);

        let families = prometheus::gather();
        assert!(families
            .iter()
            .any(|f| f.get_name() == "dockboard_containers_sampled"));
    }

    #[test]
    fn test_structured_logger_creation() {
        let logger = StructuredLogger::new("dockboard-test");
        assert_eq!(logger.instance, "dockboard-test");
    }
}
