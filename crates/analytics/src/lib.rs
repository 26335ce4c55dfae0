// In crates/analytics/src/lib.rs

pub mod error;
pub mod features;
pub mod regression;

pub use error::{Error, Result};
pub use features::{FEATURE_COLUMNS, FeatureRow, prepare_features};
pub use regression::{LinearModel, chronological_split, mean_squared_error, r2_score};
