//! Footprint Session
//!
//! Host-side state for one dashboard: the current analysis snapshot, the
//! active view mode and, in journey mode, the playback driver. Replaces
//! ambient globals with an explicit context the host owns.
//!
//! This crate provides:
//! - `AnalysisSession` - Dataset, view mode and playback in one owner
//! - `DocumentFeed` - Snapshot subscriptions with explicit cancellation
//! - `JourneyTracker` - Event sink holding the journey's visual state
//! - `Orchestrator` - Boundary to the remote analysis service

pub mod error;
pub mod feed;
pub mod journey;
pub mod session;
pub mod submit;
pub mod view;

pub use error::{Result, SessionError};
pub use feed::{DocumentFeed, SubscriptionId};
pub use journey::{ActiveRoute, JourneyTracker};
pub use session::{AnalysisSession, SnapshotUpdate};
pub use submit::{
    submit_analysis, validate_target_url, AnalysisRequest, AnalysisResponse, Orchestrator,
};
pub use view::ViewMode;
