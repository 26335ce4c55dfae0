// In crates/api-client/src/types.rs

use core_types::PriceBar;
use reqwest::Client;
use serde::Deserialize;

/// The client for the historical price provider.
#[derive(Debug, Clone)]
pub struct PriceClient {
    /// The persistent HTTP client.
    pub http_client: Client,
    /// The provider API key, sent as the `apikey` query parameter.
    pub api_key: String,
    /// The base URL of the provider (no trailing slash).
    pub base_url: String,
}

/// Response of the `historical-price-full` endpoint in `line` series mode.
///
/// `historical` is absent when the provider knows nothing about the symbol.
#[derive(Debug, Deserialize, Clone)]
pub struct HistoricalPriceResponse {
    #[serde(default)]
    pub historical: Option<Vec<PriceBar>>,
}
