//! Regression-forecast signals built from stored coefficients.

use core_types::{Direction, Error, PriceBar, PriceSeries};
use rust_decimal::Decimal;
use strategies::types::{LinearRegressionSettings, SignalOptions};
use strategies::{RegressionSignal, Strategy};

fn trending_series(count: usize) -> PriceSeries {
    PriceSeries::new(
        (0..count)
            .map(|i| {
                let close = Decimal::new(10_000 + (i as i64 * 37) % 250, 2);
                PriceBar::new(format!("2024-03-{:02}", i + 1), close)
            })
            .collect(),
    )
}

fn scaled_close_model(scale: f64) -> RegressionSignal {
    RegressionSignal::new(
        LinearRegressionSettings {
            intercept: 0.0,
            coefficients: vec![scale],
            feature_columns: vec!["close".into()],
            window_size: 14,
        },
        SignalOptions::default(),
    )
    .unwrap()
}

#[test]
fn predicted_rise_beyond_threshold_is_a_buy() {
    let series = trending_series(25);
    let signal = scaled_close_model(1.03).assess(&series).unwrap();

    let prediction = signal.prediction.unwrap();
    assert_eq!(signal.direction, Direction::Buy);
    assert_eq!(signal.confidence, 1.0);
    assert!((prediction.percent_change - 0.03).abs() < 1e-9);
    assert_eq!(prediction.threshold_used, 0.01);
    assert_eq!(signal.timestamp, "2024-03-25");
    assert_eq!(signal.value, series.last().unwrap().close);
}

#[test]
fn predicted_fall_beyond_threshold_is_a_sell() {
    let signal = scaled_close_model(0.985).assess(&trending_series(25)).unwrap();
    assert_eq!(signal.direction, Direction::Sell);
    assert!((signal.confidence - 0.75).abs() < 1e-9);
}

#[test]
fn flat_prediction_is_a_confident_neutral() {
    let signal = scaled_close_model(1.0).assess(&trending_series(25)).unwrap();
    assert_eq!(signal.direction, Direction::Neutral);
    assert!((signal.confidence - 1.0).abs() < 1e-9);
}

#[test]
fn needs_enough_history_for_every_feature() {
    let err = scaled_close_model(1.0).assess(&trending_series(19)).unwrap_err();
    assert_eq!(err, Error::InsufficientData { required: 20, actual: 19 });

    let wide = RegressionSignal::new(
        LinearRegressionSettings {
            intercept: 0.0,
            coefficients: vec![1.0],
            feature_columns: vec!["volatility".into()],
            window_size: 14,
        },
        SignalOptions {
            window_size: Some(30),
            ..SignalOptions::default()
        },
    )
    .unwrap();
    let err = wide.assess(&trending_series(25)).unwrap_err();
    assert_eq!(err, Error::InsufficientData { required: 31, actual: 25 });
}
