//! Summary text rendering
//!
//! Turns a dataset and its forecast into the markdown-flavoured summary
//! shown by the dashboard, one line per container followed by the forecast.

use super::forecast::Forecast;
use crate::models::UsageDataset;

/// Line shown instead of per-container rows when nothing was sampled
pub const NO_DATA_LINE: &str =
    "No running containers were sampled; no memory forecast is available.";

/// Renders prediction summaries
#[derive(Debug, Clone, Default)]
pub struct SummaryFormatter;

impl SummaryFormatter {
    pub fn new() -> Self {
        Self
    }

    /// Line describing one container's current usage
    pub fn container_line(&self, name: &str, memory_usage: f64) -> String {
        format!(
            "- Container **{}** is currently using {:.2} MB of memory.",
            name, memory_usage
        )
    }

    /// Forecast line with the value at two decimals
    pub fn forecast_line(&self, predicted: f64) -> String {
        format!(
            "\n🔮 Predicted memory usage for the next container or time step: **{:.2} MB**.",
            predicted
        )
    }

    /// Closing restatement with the value at one decimal
    pub fn closing_line(&self, predicted: f64) -> String {
        format!(
            "\n📢 Summary: Based on current average usage, next memory reading is estimated around {:.1} MB.",
            predicted
        )
    }

    /// Render the full summary in dataset order
    pub fn render(&self, dataset: &UsageDataset, forecast: &Forecast) -> String {
        let mut lines: Vec<String> = if forecast.no_data {
            vec![NO_DATA_LINE.to_string()]
        } else {
            dataset
                .iter()
                .map(|row| self.container_line(&row.name, row.memory_usage))
                .collect()
        };

        lines.push(self.forecast_line(forecast.value));
        if !forecast.no_data {
            lines.push(self.closing_line(forecast.value));
        }

        lines.join("\n")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ContainerStats;
    use crate::predictor::forecast::mean_forecast;

    fn render(rows: Vec<ContainerStats>) -> String {
        let dataset = UsageDataset::new(rows);
        let forecast = mean_forecast(&dataset);
        SummaryFormatter::new().render(&dataset, &forecast)
    }

    #[test]
    fn test_container_line_rounds_to_two_decimals() {
        let line = SummaryFormatter::new().container_line("web", 12.3456);
        assert_eq!(line, "- Container **web** is currently using 12.35 MB of memory.");
    }

    #[test]
    fn test_summary_layout() {
        let summary = render(vec![
            ContainerStats::new("container1", 100.0),
            ContainerStats::new("container2", 200.0),
        ]);

        let lines: Vec<&str> = summary.lines().collect();
        assert_eq!(lines[0], "- Container **container1** is currently using 100.00 MB of memory.");
        assert_eq!(lines[1], "- Container **container2** is currently using 200.00 MB of memory.");
        assert_eq!(lines[2], "");
        assert!(lines[3].contains("**150.00 MB**"));
        assert_eq!(lines[4], "");
        assert!(lines[5].ends_with("estimated around 150.0 MB."));
    }

    #[test]
    fn test_summary_preserves_dataset_order() {
        let summary = render(vec![
            ContainerStats::new("zeta", 1.0),
            ContainerStats::new("alpha", 2.0),
            ContainerStats::new("mid", 3.0),
        ]);

        let zeta = summary.find("zeta").unwrap();
        let alpha = summary.find("alpha").unwrap();
        let mid = summary.find("mid").unwrap();
        assert!(zeta < alpha && alpha < mid);
    }

    #[test]
    fn test_empty_summary_states_no_data() {
        let summary = render(vec![]);

        assert!(summary.starts_with(NO_DATA_LINE));
        assert!(summary.contains("**0.00 MB**"));
        assert!(!summary.contains("Container **"));
    }
}
