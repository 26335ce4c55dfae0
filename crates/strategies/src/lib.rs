// In crates/strategies/src/lib.rs

use core_types::{PriceSeries, Result, Signal};
pub mod factory;
pub mod ma_crossover;
pub mod regression;
pub mod types;

pub use factory::create_strategy;
pub use ma_crossover::{MACrossover, derive_direction, generate_signal, moving_average};
pub use regression::RegressionSignal;

/// The universal interface for a signal strategy.
///
/// A strategy turns a chronological price series into exactly one `Signal`.
/// Strategies hold only their (validated) parameters, so an instance can be
/// shared across threads and assessed for many symbols at once.
pub trait Strategy {
    /// The name of the strategy.
    fn name(&self) -> &'static str;

    fn assess(&self, series: &PriceSeries) -> Result<Signal>;

    /// Like `assess`, but folds any failure into a neutral, zero-confidence
    /// record carrying the error, so callers always get something to emit.
    fn assess_record(&self, series: &PriceSeries) -> Signal {
        match self.assess(series) {
            Ok(signal) => signal,
            Err(e) => {
                tracing::warn!(strategy = self.name(), error = %e, "Signal assessment failed.");
                Signal::failed(e)
            }
        }
    }
}
