// In crates/strategies/src/regression.rs

use crate::Strategy;
use crate::types::{LinearRegressionSettings, SignalOptions};
use analytics::features::{column_index, min_history, prepare_features};
use analytics::LinearModel;
use core_types::{Direction, Error, PredictionDetail, PriceSeries, Result, Signal};
use num_traits::ToPrimitive;

/// Signals from a regression model's forecast of the next close.
///
/// The predicted percentage change is compared with `threshold`; beyond it the
/// signal points in the predicted direction, inside it the signal is neutral.
#[derive(Debug, Clone)]
pub struct RegressionSignal {
    model: LinearModel,
    /// Positions of the model's feature columns in an engineered feature row.
    columns: Vec<usize>,
    window_size: usize,
    threshold: f64,
}

impl RegressionSignal {
    pub fn new(settings: LinearRegressionSettings, options: SignalOptions) -> Result<Self> {
        if !options.threshold.is_finite() || options.threshold <= 0.0 {
            return Err(Error::InvalidParameters(format!(
                "Invalid signal threshold: {} (must be positive)",
                options.threshold
            )));
        }
        let window_size = options.window_size.unwrap_or(settings.window_size);
        if window_size < 2 {
            return Err(Error::InvalidParameters(format!(
                "Invalid window size: {window_size} (must be at least 2)"
            )));
        }
        if settings.coefficients.len() != settings.feature_columns.len() {
            return Err(Error::InvalidModel(format!(
                "{} coefficients for {} feature columns",
                settings.coefficients.len(),
                settings.feature_columns.len()
            )));
        }
        let columns = settings
            .feature_columns
            .iter()
            .map(|name| {
                column_index(name)
                    .ok_or_else(|| Error::InvalidModel(format!("unknown feature column '{name}'")))
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(Self {
            model: LinearModel {
                intercept: settings.intercept,
                coefficients: settings.coefficients,
            },
            columns,
            window_size,
            threshold: options.threshold,
        })
    }

    /// Maps a predicted percentage change to a direction and confidence.
    pub fn classify(&self, percent_change: f64) -> (Direction, f64) {
        let threshold = self.threshold;
        if percent_change > threshold {
            (Direction::Buy, (percent_change / (threshold * 2.0)).min(1.0))
        } else if percent_change < -threshold {
            (Direction::Sell, (percent_change.abs() / (threshold * 2.0)).min(1.0))
        } else {
            (Direction::Neutral, 1.0 - percent_change.abs() / threshold)
        }
    }
}

impl Strategy for RegressionSignal {
    fn name(&self) -> &'static str {
        "LinearRegressionForecast"
    }

    fn assess(&self, series: &PriceSeries) -> Result<Signal> {
        let required = min_history(self.window_size);
        if series.len() < required {
            return Err(Error::InsufficientData {
                required,
                actual: series.len(),
            });
        }

        let closes = series
            .closes()?
            .iter()
            .map(|c| c.to_f64().unwrap_or(f64::NAN))
            .collect::<Vec<_>>();
        let rows = prepare_features(&closes, self.window_size, false)
            .map_err(|e| Error::InvalidParameters(e.to_string()))?;
        let row = rows.last().ok_or(Error::InsufficientData {
            required,
            actual: series.len(),
        })?;

        let features: Vec<f64> = self.columns.iter().map(|&i| row.values[i]).collect();
        let predicted_price = self
            .model
            .predict_row(&features)
            .map_err(|e| Error::InvalidModel(e.to_string()))?;
        let current_price = row.close();
        let percent_change = (predicted_price - current_price) / current_price;
        let (direction, confidence) = self.classify(percent_change);

        tracing::debug!(
            current_price,
            predicted_price,
            percent_change,
            %direction,
            confidence,
            "Assessed regression forecast."
        );

        let bar = &series.bars()[row.index];
        Ok(Signal::new(bar, direction, confidence).with_prediction(PredictionDetail {
            current_price,
            predicted_price,
            percent_change,
            threshold_used: self.threshold,
        }))
    }
}
