// In app/src/generate.rs

use crate::output::{self, SignalEnvelope};
use anyhow::{Context, Result};
use api_client::PriceProvider;
use app_config::Settings;
use core_types::{Signal, Symbol};
use futures::future::join_all;
use strategies::types::SignalOptions;
use strategies::{Strategy, create_strategy};

#[derive(Debug, Clone)]
pub struct GenerateArgs {
    pub model_id: String,
    pub symbols: Vec<String>,
    pub threshold: Option<f64>,
    pub window_size: Option<usize>,
    pub days: Option<usize>,
}

/// Handles the logic for the `generate` subcommand.
pub async fn handle_generate(settings: &Settings, args: GenerateArgs) -> Result<bool> {
    // --- 1. Load the model and build its strategy ---
    let store = artifact_store::open(&settings.artifacts);
    let artifact = store
        .load(&args.model_id)
        .with_context(|| format!("Failed to load model '{}'", args.model_id))?;

    let options = SignalOptions {
        threshold: args.threshold.unwrap_or(settings.signals.threshold),
        window_size: args.window_size,
    };
    let strategy = create_strategy(&artifact, options)?;

    // --- 2. Fetch and assess every symbol concurrently ---
    let client = api_client::new(&settings.price_provider)?;
    let symbols: Vec<Symbol> = args.symbols.iter().map(Symbol::new).collect();
    let days = args.days.unwrap_or(settings.signals.lookback_days);
    tracing::info!(
        model_id = %artifact.model_id,
        strategy = strategy.name(),
        symbols = symbols.len(),
        days,
        "Generating signals."
    );

    let results = assess_symbols(&client, strategy.as_ref(), &symbols, days).await;

    // --- 3. Report ---
    let mut all_succeeded = true;
    for (symbol, signal) in &results {
        all_succeeded &= !signal.is_failure();
        output::emit(&SignalEnvelope::new(&args.model_id, &symbol.0, signal))?;
    }
    Ok(all_succeeded)
}

/// Fetches each symbol's history and assesses it, preserving the input order.
///
/// A symbol that cannot be fetched or assessed yields a failure record rather
/// than aborting the others.
pub async fn assess_symbols<P>(
    provider: &P,
    strategy: &(dyn Strategy + Send + Sync),
    symbols: &[Symbol],
    days: usize,
) -> Vec<(Symbol, Signal)>
where
    P: PriceProvider + ?Sized,
{
    let tasks = symbols.iter().map(|symbol| async move {
        let signal = match provider.historical_prices(symbol, days).await {
            Ok(series) => strategy.assess_record(&series),
            Err(e) => {
                tracing::error!(symbol = %symbol, error = %e, "Failed to fetch prices.");
                Signal::failed(e)
            }
        };
        tracing::info!(symbol = %symbol, direction = %signal.direction, confidence = signal.confidence, "Signal ready.");
        (symbol.clone(), signal)
    });
    join_all(tasks).await
}
