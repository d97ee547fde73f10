//! Core error types

use thiserror::Error;

/// Errors raised while reading analysis data
#[derive(Error, Debug)]
pub enum CoreError {
    /// The document payload was not valid JSON for the expected shape
    #[error("Invalid analysis document: {0}")]
    Json(#[from] serde_json::Error),

    /// A coordinate pair was outside the valid latitude/longitude range
    #[error("Invalid coordinates: lat {lat}, lon {lon}")]
    InvalidCoordinates { lat: f64, lon: f64 },
}

/// Result type for core operations
pub type Result<T> = std::result::Result<T, CoreError>;
