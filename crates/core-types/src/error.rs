// In crates/core-types/src/error.rs

use thiserror::Error;

/// Failures raised while turning a price series into a signal.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum Error {
    #[error("{0}")]
    InvalidParameters(String),

    #[error("Insufficient price data. Need at least {required} points, got {actual}")]
    InsufficientData { required: usize, actual: usize },

    #[error("Price observation {index} ({when}) is missing required field '{field}'", when = .date.as_deref().unwrap_or("no date"))]
    MissingField {
        field: &'static str,
        index: usize,
        date: Option<String>,
    },

    #[error("Price observation {index} ({when}) has an unreadable '{field}': {value}", when = .date.as_deref().unwrap_or("no date"))]
    UnreadableField {
        field: &'static str,
        index: usize,
        date: Option<String>,
        value: String,
    },

    #[error("Arithmetic overflow while computing {0}")]
    Overflow(String),

    #[error("Invalid model: {0}")]
    InvalidModel(String),
}

pub type Result<T> = std::result::Result<T, Error>;
