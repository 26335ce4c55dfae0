// In app/src/signal.rs

use anyhow::{Context, Result};
use core_types::{PriceBar, PriceSeries, Signal};
use serde::Deserialize;
use serde_json::Value;
use std::io::{Read, Write};
use std::path::Path;
use strategies::generate_signal;
use strategies::types::MACrossoverSettings;

const MISSING_INPUT: &str = "Missing model artifacts or price data in input";

/// The document read by the `signal` command.
#[derive(Debug, Default, Deserialize)]
pub struct SignalRequest {
    #[serde(default)]
    pub model: Option<ModelSection>,
    #[serde(default)]
    pub data: Vec<PriceBar>,
}

#[derive(Debug, Default, Deserialize)]
pub struct ModelSection {
    #[serde(default)]
    pub artifacts: Option<Value>,
}

/// Serves one request and writes exactly one record to `out`.
///
/// Returns whether the request succeeded; the caller turns `false` into a
/// nonzero exit status.
pub fn handle_signal<W: Write>(input: Option<&Path>, out: &mut W) -> bool {
    let record = match read_input(input).and_then(|raw| evaluate_str(&raw)) {
        Ok(signal) => signal,
        Err(e) => {
            tracing::error!(error = %format!("{e:#}"), "Signal request failed.");
            Signal::failed(format!("{e:#}"))
        }
    };

    let succeeded = !record.is_failure();
    if let Err(e) = crate::output::emit_to(out, &record) {
        tracing::error!(error = %e, "Failed to write the signal record.");
        return false;
    }
    succeeded
}

fn read_input(input: Option<&Path>) -> Result<String> {
    match input {
        Some(path) => std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read input file {}", path.display())),
        None => {
            let mut raw = String::new();
            std::io::stdin()
                .read_to_string(&mut raw)
                .context("Failed to read stdin")?;
            Ok(raw)
        }
    }
}

/// Parses and evaluates a raw request document.
pub fn evaluate_str(raw: &str) -> Result<Signal> {
    let request: SignalRequest =
        serde_json::from_str(raw).context("Malformed signal request")?;
    evaluate(request)
}

pub fn evaluate(request: SignalRequest) -> Result<Signal> {
    let artifacts = request
        .model
        .and_then(|m| m.artifacts)
        .filter(|a| a.as_object().is_some_and(|o| !o.is_empty()));
    let Some(artifacts) = artifacts else {
        anyhow::bail!(MISSING_INPUT);
    };
    if request.data.is_empty() {
        anyhow::bail!(MISSING_INPUT);
    }

    let settings = MACrossoverSettings::from_params(&artifacts)?;
    let series = PriceSeries::new(request.data);
    tracing::debug!(
        short_window = settings.short_window,
        long_window = settings.long_window,
        points = series.len(),
        "Evaluating signal request."
    );
    Ok(generate_signal(&settings, &series)?)
}
