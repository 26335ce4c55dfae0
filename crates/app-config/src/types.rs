// In crates/app-config/src/types.rs

use serde::Deserialize;
use std::path::PathBuf;

#[derive(Deserialize, Debug, Clone)]
pub struct Settings {
    /// The application's general settings.
    pub app: AppSettings,
    /// Settings for the historical price provider.
    pub price_provider: PriceProviderSettings,
    /// Where trained model artifacts are kept.
    pub artifacts: ArtifactSettings,
    /// Defaults for signal generation and training requests.
    pub signals: SignalSettings,
}

#[derive(Deserialize, Debug, Clone)]
pub struct AppSettings {
    /// The environment the application is running in (e.g., "development", "production").
    pub environment: String,
    /// The log level for the application.
    pub log_level: String,
}

#[derive(Deserialize, Debug, Clone)]
pub struct PriceProviderSettings {
    /// The API key for the price provider.
    pub api_key: String,
    /// The REST API base URL of the price provider.
    pub base_url: String,
    /// Per-request timeout.
    pub timeout_secs: u64,
}

#[derive(Deserialize, Debug, Clone)]
pub struct ArtifactSettings {
    /// Directory holding one `model_{id}.json` file per model.
    pub dir: PathBuf,
}

#[derive(Deserialize, Debug, Clone)]
pub struct SignalSettings {
    /// Minimum predicted percentage move for a regression signal.
    pub threshold: f64,
    /// Look-back of the volatility feature.
    pub window_size: usize,
    /// Bars fetched when generating a signal.
    pub lookback_days: usize,
    /// Bars fetched when training a model.
    pub training_days: usize,
}
