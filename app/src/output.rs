// In app/src/output.rs

use anyhow::Result;
use core_types::Signal;
use serde::Serialize;
use std::io::Write;

/// The line written for each symbol by `generate`.
#[derive(Debug, Serialize)]
pub struct SignalEnvelope<'a> {
    pub status: &'static str,
    pub model_id: &'a str,
    pub symbol: &'a str,
    pub signal: &'a Signal,
}

impl<'a> SignalEnvelope<'a> {
    pub fn new(model_id: &'a str, symbol: &'a str, signal: &'a Signal) -> Self {
        let status = if signal.is_failure() { "error" } else { "success" };
        Self {
            status,
            model_id,
            symbol,
            signal,
        }
    }
}

/// Writes one JSON document as a single stdout line.
pub fn emit<T: Serialize>(record: &T) -> Result<()> {
    emit_to(&mut std::io::stdout().lock(), record)
}

/// Writes one JSON document as a single line to `out`.
pub fn emit_to<W: Write, T: Serialize>(out: &mut W, record: &T) -> Result<()> {
    let line = serde_json::to_string(record)?;
    writeln!(out, "{line}")?;
    out.flush()?;
    Ok(())
}

/// Writes the `{status, error}` envelope for a command that could not run at all.
pub fn emit_error(error: &anyhow::Error) {
    let envelope = serde_json::json!({
        "status": "error",
        "error": format!("{error:#}"),
    });
    if let Err(e) = emit(&envelope) {
        tracing::error!(error = %e, "Failed to write the error envelope.");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use core_types::{Direction, PriceBar};
    use rust_decimal_macros::dec;

    #[test]
    fn envelope_status_follows_the_signal() {
        let ok = Signal::new(&PriceBar::new("2024-03-01", dec!(101.5)), Direction::Buy, 0.8);
        let line = serde_json::to_value(SignalEnvelope::new("m1", "AAPL", &ok)).unwrap();
        assert_eq!(line["status"], "success");
        assert_eq!(line["symbol"], "AAPL");
        assert_eq!(line["signal"]["value"], 101.5);
        assert_eq!(line["signal"]["direction"], "buy");

        let failed = Signal::failed("no data");
        let line = serde_json::to_value(SignalEnvelope::new("m1", "MSFT", &failed)).unwrap();
        assert_eq!(line["status"], "error");
        assert_eq!(line["signal"]["error"], "no data");
        assert!(line["signal"]["value"].is_null());
    }
}
