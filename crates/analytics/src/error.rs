// In crates/analytics/src/error.rs

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum Error {
    #[error("Invalid window size {0}: volatility needs at least 2 returns")]
    InvalidWindow(usize),

    #[error("Dimension mismatch: expected {expected}, got {got}")]
    DimensionMismatch { expected: usize, got: usize },

    #[error("Cannot fit a model on an empty data set")]
    EmptyInput,
}

pub type Result<T> = std::result::Result<T, Error>;
