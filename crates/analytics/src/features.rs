// In crates/analytics/src/features.rs

use crate::error::{Error, Result};
use ta::Next;
use ta::indicators::{SimpleMovingAverage as Sma, StandardDeviation};

/// Names of the engineered features, in the order they are stored in a `FeatureRow`.
pub const FEATURE_COLUMNS: [&str; 10] = [
    "close",
    "return",
    "log_return",
    "ma5",
    "ma10",
    "ma20",
    "close_ma5_diff",
    "close_ma10_diff",
    "close_ma20_diff",
    "volatility",
];

/// The longest rolling mean among the features.
pub const LONGEST_MA: usize = 20;

/// One fully-defined row of engineered features.
#[derive(Debug, Clone, PartialEq)]
pub struct FeatureRow {
    /// Position of the source bar in the input series.
    pub index: usize,
    pub values: [f64; FEATURE_COLUMNS.len()],
    /// The next bar's close. Only set when features are prepared for training.
    pub target: Option<f64>,
}

impl FeatureRow {
    pub fn close(&self) -> f64 {
        self.values[0]
    }
}

/// Position of a named feature in `FEATURE_COLUMNS`.
pub fn column_index(column: &str) -> Option<usize> {
    FEATURE_COLUMNS.iter().position(|c| *c == column)
}

/// The number of bars needed before the first row is fully defined.
pub fn min_history(window_size: usize) -> usize {
    LONGEST_MA.max(window_size + 1)
}

/// Builds feature rows from a chronological series of closes.
///
/// Rows with any undefined value (warm-up of a rolling window, a zero previous
/// close) are dropped. With `with_target`, the last bar has no next close and
/// is dropped as well.
pub fn prepare_features(closes: &[f64], window_size: usize, with_target: bool) -> Result<Vec<FeatureRow>> {
    if window_size < 2 {
        return Err(Error::InvalidWindow(window_size));
    }
    tracing::debug!(bars = closes.len(), window_size, "Preparing features");

    let mut ma5 = Sma::new(5).map_err(|_| Error::InvalidWindow(5))?;
    let mut ma10 = Sma::new(10).map_err(|_| Error::InvalidWindow(10))?;
    let mut ma20 = Sma::new(LONGEST_MA).map_err(|_| Error::InvalidWindow(LONGEST_MA))?;
    let mut deviation = StandardDeviation::new(window_size).map_err(|_| Error::InvalidWindow(window_size))?;
    // StandardDeviation is the population figure; rescale to the sample (ddof = 1) one.
    let sample_correction = (window_size as f64 / (window_size as f64 - 1.0)).sqrt();

    let mut rows = Vec::new();
    let mut returns_seen = 0usize;

    for (index, &close) in closes.iter().enumerate() {
        let seen = index + 1;
        let m5 = warmed_up(ma5.next(close), seen, 5);
        let m10 = warmed_up(ma10.next(close), seen, 10);
        let m20 = warmed_up(ma20.next(close), seen, LONGEST_MA);

        let (ret, log_ret, volatility) = match index.checked_sub(1).map(|i| closes[i]) {
            None => (f64::NAN, f64::NAN, f64::NAN),
            Some(previous) => {
                let ratio = close / previous;
                let ret = ratio - 1.0;
                returns_seen += 1;
                let sd = deviation.next(ret) * sample_correction;
                (ret, ratio.ln(), warmed_up(sd, returns_seen, window_size))
            }
        };

        let target = closes.get(index + 1).copied();
        if with_target && target.is_none() {
            continue;
        }

        let values = [
            close,
            ret,
            log_ret,
            m5,
            m10,
            m20,
            close - m5,
            close - m10,
            close - m20,
            volatility,
        ];
        if values.iter().all(|v| v.is_finite()) {
            rows.push(FeatureRow {
                index,
                values,
                target: if with_target { target } else { None },
            });
        }
    }

    Ok(rows)
}

fn warmed_up(value: f64, seen: usize, period: usize) -> f64 {
    if seen >= period { value } else { f64::NAN }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ramp(n: usize) -> Vec<f64> {
        (0..n).map(|i| 100.0 + i as f64).collect()
    }

    #[test]
    fn first_row_waits_for_the_longest_window() {
        let closes = ramp(30);
        let rows = prepare_features(&closes, 14, false).unwrap();

        assert_eq!(rows.first().unwrap().index, LONGEST_MA - 1);
        assert_eq!(rows.last().unwrap().index, 29);
        assert_eq!(rows.len(), 30 - (LONGEST_MA - 1));
    }

    #[test]
    fn volatility_window_can_dominate_warm_up() {
        let closes = ramp(40);
        let rows = prepare_features(&closes, 25, false).unwrap();
        assert_eq!(rows.first().unwrap().index, 25);
        assert_eq!(min_history(25), 26);
        assert_eq!(min_history(14), 20);
    }

    #[test]
    fn training_rows_carry_the_next_close() {
        let closes = ramp(25);
        let rows = prepare_features(&closes, 5, true).unwrap();

        let last = rows.last().unwrap();
        assert_eq!(last.index, 23);
        assert_eq!(last.target, Some(124.0));
        assert!(rows.iter().all(|r| r.target == Some(closes[r.index + 1])));
    }

    #[test]
    fn moving_average_columns_match_trailing_means() {
        let closes = ramp(20);
        let rows = prepare_features(&closes, 5, false).unwrap();
        let row = rows.last().unwrap();
        let get = |column: &str| row.values[column_index(column).unwrap()];

        // Closes 100..=119: trailing means are the midpoints of each window.
        assert!((get("ma5") - 117.0).abs() < 1e-9);
        assert!((get("ma10") - 114.5).abs() < 1e-9);
        assert!((get("ma20") - 109.5).abs() < 1e-9);
        assert!((get("close_ma5_diff") - 2.0).abs() < 1e-9);
    }

    #[test]
    fn constant_prices_have_zero_volatility() {
        let closes = vec![50.0; 30];
        let rows = prepare_features(&closes, 10, false).unwrap();
        let row = rows.last().unwrap();
        assert!(row.values[column_index("volatility").unwrap()].abs() < 1e-12);
        assert_eq!(row.values[column_index("return").unwrap()], 0.0);
    }

    #[test]
    fn rejects_degenerate_volatility_window() {
        assert_eq!(prepare_features(&ramp(30), 1, false), Err(Error::InvalidWindow(1)));
    }

    #[test]
    fn short_series_yields_no_rows() {
        assert!(prepare_features(&ramp(10), 5, false).unwrap().is_empty());
    }
}
