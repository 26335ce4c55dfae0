// In crates/api-client/src/lib.rs

use app_config::types::PriceProviderSettings;
use async_trait::async_trait;
use core_types::{PriceSeries, Symbol};
use serde_json::Value;
use std::time::Duration;

pub mod error;
pub mod types;

// Re-export public types
pub use error::{Error, Result};
pub use types::*;

/// A source of chronological closing prices.
#[async_trait]
pub trait PriceProvider: Send + Sync {
    /// Returns at most `days` of the most recent bars for `symbol`, oldest first.
    async fn historical_prices(&self, symbol: &Symbol, days: usize) -> Result<PriceSeries>;
}

impl PriceClient {
    /// Constructs a new PriceClient from PriceProviderSettings.
    pub fn new(settings: &PriceProviderSettings) -> Result<Self> {
        let http_client = reqwest::Client::builder()
            .timeout(Duration::from_secs(settings.timeout_secs))
            .build()
            .map_err(|e| Error::ClientBuildError(e.to_string()))?;

        Ok(PriceClient {
            http_client,
            api_key: settings.api_key.clone(),
            base_url: settings.base_url.trim_end_matches('/').to_string(),
        })
    }

    /// Fetches the daily close history for a symbol.
    ///
    /// This corresponds to the `GET /api/v3/historical-price-full/{symbol}` endpoint
    /// in `serietype=line` mode. The provider lists bars newest first; the result
    /// is sorted oldest first and trimmed to the newest `days` bars.
    pub async fn get_historical_prices(&self, symbol: &Symbol, days: usize) -> Result<PriceSeries> {
        let url = format!("{}/api/v3/historical-price-full/{}", self.base_url, symbol.0);
        tracing::info!(symbol = %symbol, days, "Fetching historical prices.");

        let response_body = self
            .http_client
            .get(&url)
            .query(&[("apikey", self.api_key.as_str()), ("serietype", "line")])
            .send()
            .await?
            .error_for_status()?
            .text()
            .await?;

        let value: Value = serde_json::from_str(&response_body)?;

        // The provider reports failures as an object with an "Error Message" key.
        if let Some(msg) = value.get("Error Message").and_then(Value::as_str) {
            return Err(Error::ApiError { msg: msg.to_string() });
        }

        let response: HistoricalPriceResponse = serde_json::from_value(value)?;
        let bars = response
            .historical
            .ok_or_else(|| Error::NoHistoricalData(symbol.0.clone()))?;

        let series = PriceSeries::new(bars).into_chronological(days);
        tracing::info!(symbol = %symbol, count = series.len(), "Received historical prices.");
        Ok(series)
    }
}

#[async_trait]
impl PriceProvider for PriceClient {
    async fn historical_prices(&self, symbol: &Symbol, days: usize) -> Result<PriceSeries> {
        self.get_historical_prices(symbol, days).await
    }
}

/// Creates a new PriceClient.
pub fn new(settings: &PriceProviderSettings) -> Result<PriceClient> {
    PriceClient::new(settings)
}
