//! Event builder
//!
//! Turns a snapshot's asset list into the request/response timeline.

use std::cmp::Ordering;
use std::sync::Arc;

use footprint_core::Asset;

use crate::event::{EventKind, GroupId, Timeline, TimelineEvent};

/// Minimum visible gap between a request and its response.
pub const MIN_GAP_MS: f64 = 10.0;

/// Assumed load duration when an asset has neither end time nor duration.
pub const DEFAULT_DURATION_MS: f64 = 100.0;

/// Build the timeline for a full asset snapshot.
///
/// Assets without valid coordinates or without a start time are skipped. Every
/// remaining asset yields one request at its start and one response at
/// `max(end, start + MIN_GAP_MS)`.
pub fn build_timeline(assets: &[Asset]) -> Timeline {
    let mut events = Vec::with_capacity(assets.len() * 2);
    let mut excluded = 0;

    for (asset_index, asset) in assets.iter().enumerate() {
        let (Some(coords), Some(start)) = (asset.coords(), asset.start_time()) else {
            excluded += 1;
            continue;
        };

        let end = asset.end_time().unwrap_or(start + DEFAULT_DURATION_MS);
        let response_time = end.max(start + MIN_GAP_MS);

        let shared = Arc::new(asset.clone());
        let group_id = GroupId::for_asset(asset);

        events.push(TimelineEvent {
            time: start,
            kind: EventKind::Request,
            asset: Arc::clone(&shared),
            asset_index,
            coords,
            group_id: group_id.clone(),
        });
        events.push(TimelineEvent {
            time: response_time,
            kind: EventKind::Response,
            asset: shared,
            asset_index,
            coords,
            group_id,
        });
    }

    // Stable: equal times keep input order, including -0.0 against 0.0.
    events.sort_by(|a, b| a.time.partial_cmp(&b.time).unwrap_or(Ordering::Equal));

    tracing::debug!(
        events = events.len(),
        excluded,
        "built timeline from {} assets",
        assets.len()
    );

    Timeline::from_sorted(events, excluded)
}
