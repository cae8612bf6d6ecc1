//! Memory usage prediction
//!
//! [`UsagePredictor`] owns the most recent dataset and turns it into a
//! [`PredictionResult`]. The dataset is collected lazily on the first
//! prediction and then reused as-is until [`UsagePredictor::refresh`] or
//! [`UsagePredictor::clear`] is called; there is no staleness check.

mod forecast;
mod output;

pub use forecast::{mean_forecast, Forecast};
pub use output::{SummaryFormatter, NO_DATA_LINE};

use crate::collector::{CollectError, SampleSkipped, StatsCollector};
use crate::models::{PredictionResult, UsageDataset};
use tracing::debug;

/// Forecasts the next memory reading from sampled container usage
pub struct UsagePredictor {
    collector: StatsCollector,
    dataset: Option<UsageDataset>,
    skipped: Vec<SampleSkipped>,
    formatter: SummaryFormatter,
}

impl UsagePredictor {
    pub fn new(collector: StatsCollector) -> Self {
        Self {
            collector,
            dataset: None,
            skipped: Vec::new(),
            formatter: SummaryFormatter::new(),
        }
    }

    /// Currently held dataset, if one was collected or installed
    pub fn dataset(&self) -> Option<&UsageDataset> {
        self.dataset.as_ref()
    }

    /// Containers skipped by the last successful collection
    pub fn skipped(&self) -> &[SampleSkipped] {
        &self.skipped
    }

    /// Install a dataset directly, replacing any held one
    pub fn set_dataset(&mut self, dataset: UsageDataset) {
        self.dataset = Some(dataset);
        self.skipped.clear();
    }

    /// Drop the held dataset so the next prediction re-collects
    pub fn clear(&mut self) {
        self.dataset = None;
        self.skipped.clear();
    }

    /// Collect a fresh dataset.
    ///
    /// On failure the previously held dataset is left untouched.
    pub async fn refresh(&mut self) -> Result<&UsageDataset, CollectError> {
        let batch = self.collector.collect().await?;
        debug!(
            rows = batch.dataset.len(),
            skipped = batch.skipped.len(),
            "Replacing held dataset"
        );
        self.skipped = batch.skipped;
        Ok(self.dataset.insert(batch.dataset))
    }

    /// Forecast from the held dataset, collecting one first if none is held
    pub async fn predict(&mut self) -> Result<PredictionResult, CollectError> {
        if self.dataset.is_none() {
            self.refresh().await?;
        }

        let empty = UsageDataset::default();
        let dataset = self.dataset.as_ref().unwrap_or(&empty);
        Ok(self.forecast(dataset))
    }

    /// Build a result for an arbitrary dataset without touching held state
    pub fn forecast(&self, dataset: &UsageDataset) -> PredictionResult {
        let forecast = mean_forecast(dataset);
        PredictionResult {
            data: dataset.rows.clone(),
            predicted_next: forecast.value,
            summary: self.formatter.render(dataset, &forecast),
            no_data: forecast.no_data,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::collector::tests::{MockConnector, MockRuntime};
    use crate::models::ContainerStats;
    use std::sync::atomic::Ordering;
    use std::sync::Arc;

    fn predictor_for(runtime: Arc<MockRuntime>) -> (UsagePredictor, Arc<MockConnector>) {
        let connector = Arc::new(MockConnector::new(runtime));
        let collector = StatsCollector::new(connector.clone());
        (UsagePredictor::new(collector), connector)
    }

    #[tokio::test]
    async fn test_predict_uses_installed_dataset() {
        let runtime = Arc::new(MockRuntime::new());
        let (mut predictor, _) = predictor_for(runtime.clone());
        predictor.set_dataset(UsageDataset::new(vec![
            ContainerStats::new("container1", 100.0),
            ContainerStats::new("container2", 200.0),
        ]));

        let result = predictor.predict().await.unwrap();

        assert_eq!(result.predicted_next, 150.0);
        assert_eq!(result.data.len(), 2);
        assert!(!result.no_data);
        let first = result.summary.find("container1").unwrap();
        let second = result.summary.find("container2").unwrap();
        assert!(first < second);
        assert!(result.summary.contains("150.00"));
        assert!(result.summary.contains("🔮 Predicted memory usage"));
        // Held dataset means no sampling happened
        assert_eq!(runtime.stats_calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_predict_collects_lazily_once() {
        let runtime = Arc::new(
            MockRuntime::new()
                .with_container("web", 104_857_600)
                .with_container("db", 314_572_800),
        );
        let (mut predictor, _) = predictor_for(runtime.clone());
        assert!(predictor.dataset().is_none());

        let first = predictor.predict().await.unwrap();
        let second = predictor.predict().await.unwrap();

        assert_eq!(first.predicted_next, 200.0);
        assert_eq!(first, second);
        assert_eq!(runtime.stats_calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_refresh_replaces_dataset() {
        let runtime = Arc::new(MockRuntime::new().with_container("web", 104_857_600));
        let (mut predictor, _) = predictor_for(runtime);
        predictor.set_dataset(UsageDataset::new(vec![ContainerStats::new("old", 1.0)]));

        predictor.refresh().await.unwrap();

        let dataset = predictor.dataset().unwrap();
        assert_eq!(dataset.len(), 1);
        assert_eq!(dataset.rows[0].name, "web");
        assert_eq!(dataset.rows[0].memory_usage, 100.0);
    }

    #[tokio::test]
    async fn test_failed_refresh_keeps_previous_dataset() {
        let runtime = Arc::new(MockRuntime::new().with_container("web", 104_857_600));
        let (mut predictor, _) = predictor_for(runtime.clone());
        let previous = UsageDataset::new(vec![ContainerStats::new("old", 1.0)]);
        predictor.set_dataset(previous.clone());

        runtime.set_alive(false);
        let err = predictor.refresh().await.unwrap_err();

        assert!(matches!(err, CollectError::RuntimeUnavailable(_)));
        assert_eq!(predictor.dataset(), Some(&previous));
    }

    #[tokio::test]
    async fn test_predict_without_runtime_reports_unavailable() {
        let runtime = Arc::new(MockRuntime::new().with_container("web", 1));
        let connector = Arc::new(MockConnector::unavailable(runtime));
        let mut predictor = UsagePredictor::new(StatsCollector::new(connector));

        let err = predictor.predict().await.unwrap_err();

        assert!(matches!(err, CollectError::RuntimeUnavailable(_)));
        assert!(predictor.dataset().is_none());
    }

    #[tokio::test]
    async fn test_predict_on_empty_runtime() {
        let (mut predictor, _) = predictor_for(Arc::new(MockRuntime::new()));

        let result = predictor.predict().await.unwrap();

        assert_eq!(result.predicted_next, 0.0);
        assert!(result.no_data);
        assert!(result.data.is_empty());
        assert!(result.summary.starts_with(NO_DATA_LINE));
        assert!(predictor.dataset().is_some());
    }

    #[tokio::test]
    async fn test_clear_forces_recollection() {
        let runtime = Arc::new(MockRuntime::new().with_container("web", 104_857_600));
        let (mut predictor, _) = predictor_for(runtime.clone());

        predictor.predict().await.unwrap();
        predictor.clear();
        predictor.predict().await.unwrap();

        assert_eq!(runtime.stats_calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_skipped_containers_are_reported() {
        let runtime = Arc::new(
            MockRuntime::new()
                .with_container("web", 104_857_600)
                .with_failing_container("gone"),
        );
        let (mut predictor, _) = predictor_for(runtime);

        let result = predictor.predict().await.unwrap();

        assert_eq!(result.data.len(), 1);
        assert!(!result.summary.contains("gone"));
        assert_eq!(predictor.skipped().len(), 1);
        assert_eq!(predictor.skipped()[0].container, "gone");
    }

    #[test]
    fn test_negative_rows_never_forecast_below_zero() {
        let (predictor, _) = predictor_for(Arc::new(MockRuntime::new()));
        let dataset = UsageDataset::new(vec![
            ContainerStats::new("a", -10.0),
            ContainerStats::new("b", -20.0),
        ]);

        let result = predictor.forecast(&dataset);

        assert_eq!(result.predicted_next, 0.0);
        assert!(!result.no_data);
    }
}
