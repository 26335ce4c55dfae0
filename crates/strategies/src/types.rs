// In crates/strategies/src/types.rs

use core_types::{Error, Result};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Confidence attached to a buy or sell crossover unless the model overrides it.
pub const DEFAULT_SIGNAL_CONFIDENCE: f64 = 0.8;
/// Confidence attached to a neutral outcome unless the model overrides it.
pub const DEFAULT_NEUTRAL_CONFIDENCE: f64 = 0.5;
/// Percentage move a regression prediction must exceed to count as a signal.
pub const DEFAULT_THRESHOLD: f64 = 0.01;
/// Look-back of the volatility feature.
pub const DEFAULT_WINDOW_SIZE: usize = 14;

/// Parameters of a moving-average crossover model.
///
/// Window sizes are signed so that nonsensical stored values (zero, negative)
/// surface as `InvalidParameters` instead of a decoding failure.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct MACrossoverSettings {
    pub short_window: i64,
    pub long_window: i64,

    // The confidence scores to assign to signals from this strategy
    #[serde(default = "default_signal_confidence")]
    pub signal_confidence: f64,
    #[serde(default = "default_neutral_confidence")]
    pub neutral_confidence: f64,
}

impl MACrossoverSettings {
    pub fn new(short_window: i64, long_window: i64) -> Self {
        Self {
            short_window,
            long_window,
            signal_confidence: DEFAULT_SIGNAL_CONFIDENCE,
            neutral_confidence: DEFAULT_NEUTRAL_CONFIDENCE,
        }
    }

    /// Decodes the settings from a model's parameter table.
    ///
    /// Window sizes must be JSON integers; anything else is reported with the
    /// offending raw values.
    pub fn from_params(params: &Value) -> Result<Self> {
        let short = params.get("short_window");
        let long = params.get("long_window");

        let (Some(short_window), Some(long_window)) =
            (short.and_then(Value::as_i64), long.and_then(Value::as_i64))
        else {
            return Err(Error::InvalidParameters(format!(
                "Invalid MA window sizes: short={}, long={}",
                describe(short),
                describe(long)
            )));
        };

        let settings = Self {
            short_window,
            long_window,
            signal_confidence: confidence_param(params, "signal_confidence", DEFAULT_SIGNAL_CONFIDENCE)?,
            neutral_confidence: confidence_param(params, "neutral_confidence", DEFAULT_NEUTRAL_CONFIDENCE)?,
        };
        settings.validate()?;
        Ok(settings)
    }

    /// Checks the window invariant (`0 < short < long`) and the confidence
    /// range, returning the windows as lengths.
    pub fn validate(&self) -> Result<(usize, usize)> {
        if self.short_window <= 0 || self.long_window <= 0 || self.short_window >= self.long_window {
            return Err(Error::InvalidParameters(format!(
                "Invalid MA window sizes: short={}, long={}",
                self.short_window, self.long_window
            )));
        }
        for (name, value) in [
            ("signal_confidence", self.signal_confidence),
            ("neutral_confidence", self.neutral_confidence),
        ] {
            if !(0.0..=1.0).contains(&value) {
                return Err(Error::InvalidParameters(format!(
                    "Invalid {name}: {value} is outside [0, 1]"
                )));
            }
        }
        Ok((self.short_window as usize, self.long_window as usize))
    }
}

/// Parameters of a fitted linear-regression model.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct LinearRegressionSettings {
    pub intercept: f64,
    pub coefficients: Vec<f64>,
    pub feature_columns: Vec<String>,
    #[serde(default = "default_window_size")]
    pub window_size: usize,
}

/// Request-time knobs that are not part of a stored model.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SignalOptions {
    pub threshold: f64,
    /// Overrides the volatility window stored with a regression model.
    pub window_size: Option<usize>,
}

impl Default for SignalOptions {
    fn default() -> Self {
        Self {
            threshold: DEFAULT_THRESHOLD,
            window_size: None,
        }
    }
}

fn default_signal_confidence() -> f64 {
    DEFAULT_SIGNAL_CONFIDENCE
}

fn default_neutral_confidence() -> f64 {
    DEFAULT_NEUTRAL_CONFIDENCE
}

fn default_window_size() -> usize {
    DEFAULT_WINDOW_SIZE
}

fn describe(value: Option<&Value>) -> String {
    value.map_or_else(|| "missing".to_string(), Value::to_string)
}

fn confidence_param(params: &Value, key: &str, default: f64) -> Result<f64> {
    match params.get(key) {
        None | Some(Value::Null) => Ok(default),
        Some(raw) => raw.as_f64().ok_or_else(|| {
            Error::InvalidParameters(format!("Invalid {key}: {raw} is not a number"))
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn decodes_windows_and_defaults_confidences() {
        let settings = MACrossoverSettings::from_params(&json!({"short_window": 5, "long_window": 20})).unwrap();
        assert_eq!(settings, MACrossoverSettings::new(5, 20));
    }

    #[test]
    fn rejects_non_integer_windows_with_raw_values() {
        let err = MACrossoverSettings::from_params(&json!({"short_window": 2.5, "long_window": 20})).unwrap_err();
        assert_eq!(
            err,
            Error::InvalidParameters("Invalid MA window sizes: short=2.5, long=20".into())
        );

        let err = MACrossoverSettings::from_params(&json!({"long_window": 20})).unwrap_err();
        assert!(err.to_string().contains("short=missing"));
    }

    #[test]
    fn rejects_out_of_order_and_non_positive_windows() {
        for (short, long) in [(0, 5), (-3, 5), (5, 0), (5, 5), (8, 5)] {
            let result = MACrossoverSettings::new(short, long).validate();
            assert!(matches!(result, Err(Error::InvalidParameters(_))), "{short}/{long}");
        }
        assert_eq!(MACrossoverSettings::new(2, 4).validate(), Ok((2, 4)));
    }

    #[test]
    fn rejects_confidence_outside_unit_interval() {
        let params = json!({"short_window": 2, "long_window": 4, "signal_confidence": 1.5});
        assert!(matches!(
            MACrossoverSettings::from_params(&params),
            Err(Error::InvalidParameters(_))
        ));
    }

    #[test]
    fn regression_settings_default_window() {
        let settings: LinearRegressionSettings = serde_json::from_value(json!({
            "intercept": 1.0,
            "coefficients": [0.5],
            "feature_columns": ["close"],
        }))
        .unwrap();
        assert_eq!(settings.window_size, DEFAULT_WINDOW_SIZE);
    }
}
