// In app/src/train.rs

use crate::output;
use analytics::{FEATURE_COLUMNS, FeatureRow, LinearModel, chronological_split, mean_squared_error, prepare_features, r2_score};
use anyhow::{Context, Result};
use api_client::PriceProvider;
use app_config::Settings;
use clap::ValueEnum;
use core_types::{ModelArtifact, PriceSeries, Symbol, TrainingMetrics};
use ndarray::{Array1, Array2};
use num_traits::ToPrimitive;
use serde::Serialize;
use strategies::factory::{LINEAR_REGRESSION, MA_CROSSOVER};
use strategies::types::{LinearRegressionSettings, MACrossoverSettings};

/// Share of the newest feature rows held out for evaluation.
const TEST_FRACTION: f64 = 0.2;
/// Fewer usable rows than this cannot give a meaningful fit and hold-out.
const MIN_TRAINING_ROWS: usize = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ModelKind {
    LinearRegression,
    MaCrossover,
}

#[derive(Debug, Clone)]
pub struct TrainArgs {
    pub model_id: String,
    pub symbol: String,
    pub kind: ModelKind,
    pub short_window: Option<i64>,
    pub long_window: Option<i64>,
    pub window_size: Option<usize>,
    pub days: Option<usize>,
}

#[derive(Debug, Serialize)]
struct TrainReport<'a> {
    status: &'static str,
    model_id: &'a str,
    symbol: &'a str,
    model_file: String,
    metrics: Option<TrainingMetrics>,
}

/// Handles the logic for the `train` subcommand.
pub async fn handle_train(settings: &Settings, args: TrainArgs) -> Result<()> {
    let store = artifact_store::open(&settings.artifacts);
    // Reject a bad id before doing any network work.
    store.path_for(&args.model_id)?;
    let symbol = Symbol::new(&args.symbol);

    let artifact = match args.kind {
        ModelKind::MaCrossover => {
            let (Some(short), Some(long)) = (args.short_window, args.long_window) else {
                anyhow::bail!("--short-window and --long-window are required for an ma-crossover model");
            };
            let params = MACrossoverSettings::new(short, long);
            params.validate()?;
            ModelArtifact::new(&args.model_id, MA_CROSSOVER, serde_json::to_value(&params)?)
        }
        ModelKind::LinearRegression => {
            let client = api_client::new(&settings.price_provider)?;
            let days = args.days.unwrap_or(settings.signals.training_days);
            let window_size = args.window_size.unwrap_or(settings.signals.window_size);
            let series = client
                .historical_prices(&symbol, days)
                .await
                .with_context(|| format!("Failed to fetch training data for {symbol}"))?;

            let (params, metrics) = fit_regression(&series, window_size)?;
            ModelArtifact::new(&args.model_id, LINEAR_REGRESSION, serde_json::to_value(&params)?)
                .with_metrics(metrics)
        }
    }
    .with_symbol(symbol.0.clone());

    let model_file = store.save(&artifact)?;
    output::emit(&TrainReport {
        status: "success",
        model_id: &artifact.model_id,
        symbol: &symbol.0,
        model_file: model_file.display().to_string(),
        metrics: artifact.metrics,
    })?;
    Ok(())
}

/// Fits a next-close regression on the engineered features of `series`.
///
/// The newest 20% of rows are held out; the returned metrics describe the fit
/// on those rows only.
pub fn fit_regression(
    series: &PriceSeries,
    window_size: usize,
) -> Result<(LinearRegressionSettings, TrainingMetrics)> {
    let closes = series
        .closes()?
        .iter()
        .map(|c| c.to_f64().unwrap_or(f64::NAN))
        .collect::<Vec<_>>();
    let rows = prepare_features(&closes, window_size, true)?;
    if rows.len() < MIN_TRAINING_ROWS {
        anyhow::bail!(
            "Not enough data to train: {} usable rows from {} prices (need at least {MIN_TRAINING_ROWS})",
            rows.len(),
            series.len()
        );
    }

    let (train, test) = chronological_split(&rows, TEST_FRACTION);
    tracing::info!(train = train.len(), test = test.len(), "Fitting regression model.");

    let (x_train, y_train) = design_matrix(train)?;
    let model = LinearModel::fit(&x_train, &y_train)?;

    let (x_test, y_test) = design_matrix(test)?;
    let predicted = model.predict(&x_test)?;
    let metrics = TrainingMetrics {
        mse: mean_squared_error(&y_test.to_vec(), &predicted.to_vec()),
        r2: r2_score(&y_test.to_vec(), &predicted.to_vec()),
        training_data_points: rows.len(),
    };
    tracing::info!(mse = metrics.mse, r2 = metrics.r2, "Model evaluation.");

    let params = LinearRegressionSettings {
        intercept: model.intercept,
        coefficients: model.coefficients,
        feature_columns: FEATURE_COLUMNS.iter().map(|c| c.to_string()).collect(),
        window_size,
    };
    Ok((params, metrics))
}

fn design_matrix(rows: &[FeatureRow]) -> Result<(Array2<f64>, Array1<f64>)> {
    let values: Vec<f64> = rows.iter().flat_map(|r| r.values).collect();
    let x = Array2::from_shape_vec((rows.len(), FEATURE_COLUMNS.len()), values)?;
    let y = rows
        .iter()
        .map(|r| r.target.context("feature row has no target"))
        .collect::<Result<Array1<f64>>>()?;
    Ok((x, y))
}
