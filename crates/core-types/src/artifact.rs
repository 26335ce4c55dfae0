// In crates/core-types/src/artifact.rs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A stored model: which strategy it drives and the parameters it was trained with.
///
/// `params` holds the strategy-specific table (window sizes for a moving-average
/// crossover, coefficients and feature columns for a regression). The strategy
/// factory decodes it according to `kind`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelArtifact {
    pub model_id: String,
    pub kind: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub symbol: Option<String>,
    pub params: Value,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metrics: Option<TrainingMetrics>,
    pub created_at: DateTime<Utc>,
}

impl ModelArtifact {
    pub fn new(model_id: impl Into<String>, kind: impl Into<String>, params: Value) -> Self {
        Self {
            model_id: model_id.into(),
            kind: kind.into(),
            symbol: None,
            params,
            metrics: None,
            created_at: Utc::now(),
        }
    }

    pub fn with_symbol(mut self, symbol: impl Into<String>) -> Self {
        self.symbol = Some(symbol.into());
        self
    }

    pub fn with_metrics(mut self, metrics: TrainingMetrics) -> Self {
        self.metrics = Some(metrics);
        self
    }
}

/// Hold-out evaluation of a fitted model.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TrainingMetrics {
    pub mse: f64,
    pub r2: f64,
    pub training_data_points: usize,
}
