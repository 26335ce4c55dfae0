// In crates/core-types/src/lib.rs

pub mod artifact;
pub mod error;
pub mod types;

// Re-export the most important types for easy access from other crates.
pub use artifact::{ModelArtifact, TrainingMetrics};
pub use error::{Error, Result};
pub use types::{
    CrossoverSnapshot, Direction, PredictionDetail, PriceBar, PriceSeries, Signal, Symbol,
};
