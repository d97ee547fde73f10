//! Playback error types

use thiserror::Error;

/// Errors reported synchronously by playback operations.
///
/// Playback state is left unchanged whenever one of these is returned.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum PlaybackError {
    /// Speed multiplier was zero, negative or not finite
    #[error("Invalid playback speed {0}: multiplier must be positive and finite")]
    InvalidSpeed(f64),

    /// Seek target past the end of the timeline
    #[error("Event index {index} out of range for timeline of {len} events")]
    OutOfRange { index: usize, len: usize },
}

/// Result type for playback operations
pub type Result<T> = std::result::Result<T, PlaybackError>;
