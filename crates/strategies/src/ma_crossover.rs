// In crates/strategies/src/ma_crossover.rs

use crate::Strategy;
use crate::types::MACrossoverSettings;
use core_types::{CrossoverSnapshot, Direction, Error, PriceSeries, Result, Signal};
use rust_decimal::Decimal;

/// Arithmetic mean of the trailing `window` closes, or `None` when there are fewer.
///
/// Closes near the top of the `Decimal` range can overflow the running sum;
/// that is reported as `Error::Overflow` rather than a panic.
pub fn moving_average(closes: &[Decimal], window: usize) -> Result<Option<Decimal>> {
    if window == 0 || closes.len() < window {
        return Ok(None);
    }
    let overflow = || Error::Overflow(format!("a {window}-point moving average"));
    let sum = closes[closes.len() - window..]
        .iter()
        .try_fold(Decimal::ZERO, |acc, close| acc.checked_add(*close))
        .ok_or_else(overflow)?;
    sum.checked_div(Decimal::from(window)).map(Some).ok_or_else(overflow)
}

/// Classifies the step from the previous to the current short/long relationship.
///
/// Equality at the previous point counts as "not yet crossed", so the first
/// step on which the averages diverge is reported as the crossover.
pub fn derive_direction(
    current_short: Option<Decimal>,
    current_long: Option<Decimal>,
    previous_short: Option<Decimal>,
    previous_long: Option<Decimal>,
) -> Direction {
    let (Some(short), Some(long), Some(prev_short), Some(prev_long)) =
        (current_short, current_long, previous_short, previous_long)
    else {
        return Direction::Neutral;
    };

    if prev_short <= prev_long && short > long {
        // Bullish crossover: short average rises through the long one.
        Direction::Buy
    } else if prev_short >= prev_long && short < long {
        // Bearish crossover: short average drops through the long one.
        Direction::Sell
    } else {
        Direction::Neutral
    }
}

/// The stateless moving-average crossover strategy.
#[derive(Debug, Clone)]
pub struct MACrossover {
    /// The configuration for this strategy instance.
    settings: MACrossoverSettings,
    short_window: usize,
    long_window: usize,
}

impl MACrossover {
    /// Creates a new `MACrossover` strategy instance from validated settings.
    pub fn new(settings: MACrossoverSettings) -> Result<Self> {
        let (short_window, long_window) = settings.validate()?;
        Ok(Self {
            settings,
            short_window,
            long_window,
        })
    }

    /// One point beyond the long window is needed for the "previous" averages.
    pub fn required_points(&self) -> usize {
        self.long_window + 1
    }

    /// Averages over the whole series and over the series without its newest point.
    pub fn snapshot(&self, closes: &[Decimal]) -> Result<CrossoverSnapshot> {
        let previous = &closes[..closes.len().saturating_sub(1)];
        Ok(CrossoverSnapshot {
            short_ma: moving_average(closes, self.short_window)?,
            long_ma: moving_average(closes, self.long_window)?,
            prev_short_ma: moving_average(previous, self.short_window)?,
            prev_long_ma: moving_average(previous, self.long_window)?,
        })
    }
}

impl Strategy for MACrossover {
    fn name(&self) -> &'static str {
        "MovingAverageCrossover"
    }

    fn assess(&self, series: &PriceSeries) -> Result<Signal> {
        // 1. Ensure we have enough data to compare two consecutive steps.
        let required = self.required_points();
        let latest = match series.last() {
            Some(bar) if series.len() >= required => bar,
            _ => {
                return Err(Error::InsufficientData {
                    required,
                    actual: series.len(),
                });
            }
        };

        // 2. The crossover logic on current vs previous averages.
        let closes = series.closes()?;
        let snapshot = self.snapshot(&closes)?;
        let direction = derive_direction(
            snapshot.short_ma,
            snapshot.long_ma,
            snapshot.prev_short_ma,
            snapshot.prev_long_ma,
        );

        let confidence = match direction {
            Direction::Neutral => self.settings.neutral_confidence,
            Direction::Buy | Direction::Sell => self.settings.signal_confidence,
        };

        tracing::debug!(
            short_window = self.short_window,
            long_window = self.long_window,
            points = closes.len(),
            %direction,
            ?snapshot,
            "Assessed moving-average crossover."
        );

        Ok(Signal::new(latest, direction, confidence).with_debug_info(snapshot))
    }
}

/// Validates `settings` and assesses `series` in one call.
pub fn generate_signal(settings: &MACrossoverSettings, series: &PriceSeries) -> Result<Signal> {
    MACrossover::new(settings.clone())?.assess(series)
}
