//! Session error types

use footprint_core::CoreError;
use footprint_timeline::PlaybackError;
use thiserror::Error;

/// Session-level errors
#[derive(Error, Debug)]
pub enum SessionError {
    /// Target is not an absolute http(s) URL
    #[error("Invalid target URL {url:?}: {reason}")]
    InvalidTargetUrl { url: String, reason: String },

    /// The orchestrator refused or failed the submission
    #[error("Analysis submission failed: {0}")]
    Submission(String),

    /// Journey playback requested outside journey mode
    #[error("No journey playback is loaded")]
    NoPlayback,

    #[error(transparent)]
    Playback(#[from] PlaybackError),

    #[error(transparent)]
    Core(#[from] CoreError),
}

/// Result type for session operations
pub type Result<T> = std::result::Result<T, SessionError>;
