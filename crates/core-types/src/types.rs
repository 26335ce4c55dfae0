// In crates/core-types/src/types.rs

use chrono::{SecondsFormat, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;
use std::str::FromStr;

use crate::error::{Error, Result};

/// A ticker symbol as understood by the price provider (e.g., "AAPL").
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Symbol(pub String);

impl Symbol {
    /// Normalises the symbol to the upper-case form the provider expects.
    pub fn new(symbol: impl AsRef<str>) -> Self {
        Self(symbol.as_ref().trim().to_uppercase())
    }
}

impl fmt::Display for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A single observation in a price series.
///
/// A close that is present but cannot be read as a `Decimal` (text, or a
/// number outside its range such as `1e-30`) does not fail the whole document;
/// it is kept in `unreadable_close` and reported by `PriceSeries::closes`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(from = "RawPriceBar")]
pub struct PriceBar {
    /// The observation date as delivered by the provider (e.g., "2024-01-05").
    pub date: Option<String>,
    /// The closing price. Absent when the upstream record is incomplete.
    pub close: Option<Decimal>,
    #[serde(skip)]
    pub unreadable_close: Option<String>,
}

impl PriceBar {
    pub fn new(date: impl Into<String>, close: Decimal) -> Self {
        Self {
            date: Some(date.into()),
            close: Some(close),
            unreadable_close: None,
        }
    }
}

#[derive(Deserialize)]
struct RawPriceBar {
    #[serde(default)]
    date: Option<String>,
    #[serde(default)]
    close: Value,
}

impl From<RawPriceBar> for PriceBar {
    fn from(raw: RawPriceBar) -> Self {
        let (close, unreadable_close) = match parse_close(&raw.close) {
            Ok(close) => (close, None),
            Err(text) => (None, Some(text)),
        };
        Self {
            date: raw.date,
            close,
            unreadable_close,
        }
    }
}

/// Accepts JSON numbers and numeric strings, plain or in scientific notation.
fn parse_close(raw: &Value) -> std::result::Result<Option<Decimal>, String> {
    let text = match raw {
        Value::Null => return Ok(None),
        Value::Number(n) => n.to_string(),
        Value::String(s) => s.trim().to_string(),
        other => return Err(other.to_string()),
    };
    Decimal::from_str(&text)
        .or_else(|_| Decimal::from_scientific(&text))
        .map(Some)
        .map_err(|_| text)
}

/// An ordered (oldest to newest) sequence of price observations.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PriceSeries(pub Vec<PriceBar>);

impl PriceSeries {
    pub fn new(bars: Vec<PriceBar>) -> Self {
        Self(bars)
    }

    /// Builds an undated series from raw closes. Mostly useful in tests.
    pub fn from_closes(closes: impl IntoIterator<Item = Decimal>) -> Self {
        Self(
            closes
                .into_iter()
                .map(|close| PriceBar {
                    close: Some(close),
                    ..PriceBar::default()
                })
                .collect(),
        )
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn bars(&self) -> &[PriceBar] {
        &self.0
    }

    pub fn last(&self) -> Option<&PriceBar> {
        self.0.last()
    }

    /// Extracts the closing prices, failing on the first bar without a usable one.
    pub fn closes(&self) -> Result<Vec<Decimal>> {
        self.0
            .iter()
            .enumerate()
            .map(|(index, bar)| match (&bar.close, &bar.unreadable_close) {
                (Some(close), _) => Ok(*close),
                (None, Some(value)) => Err(Error::UnreadableField {
                    field: "close",
                    index,
                    date: bar.date.clone(),
                    value: value.clone(),
                }),
                (None, None) => Err(Error::MissingField {
                    field: "close",
                    index,
                    date: bar.date.clone(),
                }),
            })
            .collect()
    }

    /// Sorts the bars chronologically by their date string and keeps the newest `keep`.
    ///
    /// Provider dates are ISO-8601 (`YYYY-MM-DD[ HH:MM:SS]`), so lexical order is
    /// chronological order. Undated bars sort first.
    pub fn into_chronological(mut self, keep: usize) -> Self {
        self.0.sort_by(|a, b| a.date.cmp(&b.date));
        if self.0.len() > keep {
            let excess = self.0.len() - keep;
            self.0.drain(..excess);
        }
        self
    }
}

/// The direction of a trading signal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Buy,
    Sell,
    Neutral,
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Direction::Buy => "buy",
            Direction::Sell => "sell",
            Direction::Neutral => "neutral",
        };
        f.write_str(label)
    }
}

/// The four moving averages behind a crossover decision.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CrossoverSnapshot {
    #[serde(with = "rust_decimal::serde::float_option")]
    pub short_ma: Option<Decimal>,
    #[serde(with = "rust_decimal::serde::float_option")]
    pub long_ma: Option<Decimal>,
    #[serde(with = "rust_decimal::serde::float_option")]
    pub prev_short_ma: Option<Decimal>,
    #[serde(with = "rust_decimal::serde::float_option")]
    pub prev_long_ma: Option<Decimal>,
}

/// What a regression model predicted for the next close.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PredictionDetail {
    pub current_price: f64,
    pub predicted_price: f64,
    pub percent_change: f64,
    pub threshold_used: f64,
}

/// The record emitted for every signal request.
///
/// A signal is built once and never mutated. Failed requests still produce a
/// record: a neutral, zero-confidence signal carrying the error description.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Signal {
    /// ISO-8601 timestamp of the observation the signal refers to.
    pub timestamp: String,
    /// The reference price (newest close). `null` on failure.
    #[serde(with = "rust_decimal::serde::float_option")]
    pub value: Option<Decimal>,
    pub direction: Direction,
    /// Heuristic score in `[0, 1]`.
    pub confidence: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub debug_info: Option<CrossoverSnapshot>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub prediction: Option<PredictionDetail>,
}

impl Signal {
    /// Creates a signal for `bar`, falling back to the current time when the bar is undated.
    pub fn new(bar: &PriceBar, direction: Direction, confidence: f64) -> Self {
        Self {
            timestamp: bar.date.clone().unwrap_or_else(now_iso8601),
            value: bar.close,
            direction,
            confidence,
            error: None,
            debug_info: None,
            prediction: None,
        }
    }

    /// The record handed to callers when a request could not be served.
    pub fn failed(reason: impl fmt::Display) -> Self {
        Self {
            timestamp: now_iso8601(),
            value: None,
            direction: Direction::Neutral,
            confidence: 0.0,
            error: Some(reason.to_string()),
            debug_info: None,
            prediction: None,
        }
    }

    pub fn with_debug_info(mut self, snapshot: CrossoverSnapshot) -> Self {
        self.debug_info = Some(snapshot);
        self
    }

    pub fn with_prediction(mut self, prediction: PredictionDetail) -> Self {
        self.prediction = Some(prediction);
        self
    }

    pub fn is_failure(&self) -> bool {
        self.error.is_some()
    }
}

fn now_iso8601() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn closes_reports_the_offending_bar() {
        let series = PriceSeries::new(vec![
            PriceBar::new("2024-01-01", dec!(10)),
            PriceBar {
                date: Some("2024-01-02".into()),
                ..PriceBar::default()
            },
        ]);

        let err = series.closes().unwrap_err();
        assert_eq!(
            err,
            Error::MissingField {
                field: "close",
                index: 1,
                date: Some("2024-01-02".into()),
            }
        );
        assert!(err.to_string().contains("2024-01-02"));
    }

    #[test]
    fn chronological_sort_keeps_newest_bars() {
        let series = PriceSeries::new(vec![
            PriceBar::new("2024-01-03", dec!(3)),
            PriceBar::new("2024-01-01", dec!(1)),
            PriceBar::new("2024-01-02", dec!(2)),
        ])
        .into_chronological(2);

        let closes = series.closes().unwrap();
        assert_eq!(closes, vec![dec!(2), dec!(3)]);
    }

    #[test]
    fn signal_serializes_to_the_wire_shape() {
        let bar = PriceBar::new("2024-01-05", dec!(181.18));
        let signal = Signal::new(&bar, Direction::Buy, 0.8);

        let json = serde_json::to_value(&signal).unwrap();
        assert_eq!(json["timestamp"], "2024-01-05");
        assert_eq!(json["value"], 181.18);
        assert_eq!(json["direction"], "buy");
        assert_eq!(json["confidence"], 0.8);
        assert!(json.get("error").is_none());
        assert!(json.get("debug_info").is_none());
    }

    #[test]
    fn failed_signal_is_neutral_with_null_value() {
        let signal = Signal::failed("boom");
        let json = serde_json::to_value(&signal).unwrap();

        assert!(signal.is_failure());
        assert_eq!(json["direction"], "neutral");
        assert_eq!(json["confidence"], 0.0);
        assert!(json["value"].is_null());
        assert_eq!(json["error"], "boom");
    }

    #[test]
    fn undated_bar_gets_a_wall_clock_timestamp() {
        let bar = PriceBar {
            close: Some(dec!(1)),
            ..PriceBar::default()
        };
        let signal = Signal::new(&bar, Direction::Neutral, 0.5);
        assert!(chrono::DateTime::parse_from_rfc3339(&signal.timestamp).is_ok());
    }

    #[test]
    fn price_bar_accepts_numeric_and_missing_closes() {
        let bars: Vec<PriceBar> =
            serde_json::from_str(r#"[{"date":"2024-01-01","close":10.5},{"date":"2024-01-02"}]"#)
                .unwrap();
        assert_eq!(bars[0].close, Some(dec!(10.5)));
        assert_eq!(bars[1].close, None);
    }

    #[test]
    fn price_bar_accepts_numeric_strings_and_scientific_notation() {
        let bars: Vec<PriceBar> = serde_json::from_str(
            r#"[{"close":"101.25"},{"close":5e28},{"close":"1.5E2"},{"close":null}]"#,
        )
        .unwrap();
        assert_eq!(bars[0].close, Some(dec!(101.25)));
        assert_eq!(bars[1].close, Some(dec!(50000000000000000000000000000)));
        assert_eq!(bars[2].close, Some(dec!(150)));
        assert_eq!(bars[3], PriceBar::default());
    }

    #[test]
    fn unreadable_close_is_reported_for_its_bar() {
        let series: PriceSeries = serde_json::from_str(
            r#"[{"date":"2024-01-01","close":10},{"date":"2024-01-02","close":1e-30},{"date":"2024-01-03","close":"abc"}]"#,
        )
        .unwrap();

        let err = series.closes().unwrap_err();
        assert_eq!(
            err,
            Error::UnreadableField {
                field: "close",
                index: 1,
                date: Some("2024-01-02".into()),
                value: "1e-30".into(),
            }
        );
        assert!(err.to_string().contains("2024-01-02"));
        assert_eq!(series.bars()[2].unreadable_close.as_deref(), Some("abc"));
    }
}
