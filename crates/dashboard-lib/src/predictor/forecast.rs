//! Scalar memory forecast

use crate::models::UsageDataset;

/// Forecast value for one dataset
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Forecast {
    /// Predicted next memory reading in megabytes
    pub value: f64,
    /// The dataset had no rows, so `value` is the zero default
    pub no_data: bool,
}

/// Arithmetic mean of the observed memory usage, floored at zero.
///
/// An empty dataset forecasts 0.0 with `no_data` set. A NaN mean also floors
/// to zero since `f64::max` ignores a NaN operand.
pub fn mean_forecast(dataset: &UsageDataset) -> Forecast {
    if dataset.is_empty() {
        return Forecast {
            value: 0.0,
            no_data: true,
        };
    }

    let total: f64 = dataset.iter().map(|row| row.memory_usage).sum();
    let mean = total / dataset.len() as f64;

    Forecast {
        value: mean.max(0.0),
        no_data: false,
    }
}
