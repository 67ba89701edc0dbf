//! Error types for dataset loading.

use thiserror::Error;

/// Errors that can occur while loading the course dataset.
#[derive(Debug, Error)]
pub enum ModelError {
    /// JSON parsing failed
    #[error("JSON parse error: {0}")]
    JsonParse(#[from] serde_json::Error),

    /// Dataset file could not be read
    #[error("Failed to read dataset {path}: {source}")]
    DatasetRead {
        path: String,
        source: std::io::Error,
    },
}
