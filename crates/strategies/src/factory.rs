// In crates/strategies/src/factory.rs

use anyhow::Result;
use crate::{ma_crossover::MACrossover, regression::RegressionSignal, Strategy};
use crate::types::{LinearRegressionSettings, MACrossoverSettings, SignalOptions};
use core_types::ModelArtifact;

pub const MA_CROSSOVER: &str = "ma_crossover";
pub const LINEAR_REGRESSION: &str = "linear_regression";

/// Builds the strategy a stored model drives.
pub fn create_strategy(
    artifact: &ModelArtifact,
    options: SignalOptions,
) -> Result<Box<dyn Strategy + Send + Sync>> {
    let strategy: Box<dyn Strategy + Send + Sync> = match artifact.kind.as_str() {
        MA_CROSSOVER => {
            let settings = MACrossoverSettings::from_params(&artifact.params)?;
            Box::new(MACrossover::new(settings)?)
        }
        LINEAR_REGRESSION => {
            let settings: LinearRegressionSettings = serde_json::from_value(artifact.params.clone())?;
            Box::new(RegressionSignal::new(settings, options)?)
        }
        unknown => anyhow::bail!(
            "Model '{}' has unknown kind: {}",
            artifact.model_id,
            unknown
        ),
    };

    tracing::debug!(model_id = %artifact.model_id, strategy = strategy.name(), "Created strategy.");
    Ok(strategy)
}
