// In crates/artifact-store/src/error.rs

use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Model not found: {0}")]
    NotFound(String),
    #[error("Invalid model id '{0}': only letters, digits, '-' and '_' are allowed")]
    InvalidModelId(String),
    #[error("Artifact I/O failed: {0}")]
    Io(#[from] std::io::Error),
    #[error("Artifact is not valid JSON: {0}")]
    Serialization(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
