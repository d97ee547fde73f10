//! Loading-journey visual state
//!
//! `JourneyTracker` consumes dispatched timeline events and keeps what the
//! journey view draws: a route line per server with requests in flight,
//! plus running totals. Playback rewinds it on every loop and before a
//! scrub replays the events ahead of the scrub point.

use footprint_core::GeoPoint;
use footprint_timeline::{EventKind, EventSink, GroupId, TimelineEvent};
use rustc_hash::FxHashMap;

/// A server with at least one request awaiting its response.
#[derive(Clone, Debug, PartialEq)]
pub struct ActiveRoute {
    pub coords: GeoPoint,
    /// Time of the request that opened the route. Not moved forward when
    /// a response closes one of several pending requests.
    pub since: f64,
    /// Requests still waiting for a response.
    pub pending: usize,
}

/// Event sink maintaining the journey view's state.
#[derive(Clone, Debug, Default)]
pub struct JourneyTracker {
    active: FxHashMap<GroupId, ActiveRoute>,
    requests: usize,
    responses: usize,
    unmatched_responses: usize,
    last_time: Option<f64>,
}

impl JourneyTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Clear all state before a re-render.
    pub fn reset(&mut self) {
        self.active.clear();
        self.requests = 0;
        self.responses = 0;
        self.unmatched_responses = 0;
        self.last_time = None;
    }

    pub fn active_routes(&self) -> impl Iterator<Item = (&GroupId, &ActiveRoute)> {
        self.active.iter()
    }

    pub fn route(&self, group: &GroupId) -> Option<&ActiveRoute> {
        self.active.get(group)
    }

    /// Requests sent so far.
    pub fn requests(&self) -> usize {
        self.requests
    }

    /// Responses received so far.
    pub fn responses(&self) -> usize {
        self.responses
    }

    /// Responses with no outstanding request in their group.
    pub fn unmatched_responses(&self) -> usize {
        self.unmatched_responses
    }

    pub fn in_flight(&self) -> usize {
        self.active.values().map(|r| r.pending).sum()
    }

    pub fn last_time(&self) -> Option<f64> {
        self.last_time
    }

    /// No requests are outstanding.
    pub fn is_idle(&self) -> bool {
        self.active.is_empty()
    }
}

impl EventSink for JourneyTracker {
    fn on_rewind(&mut self) {
        self.reset();
    }

    fn on_event(&mut self, event: &TimelineEvent) {
        self.last_time = Some(event.time);
        match event.kind {
            EventKind::Request => {
                self.requests += 1;
                self.active
                    .entry(event.group_id.clone())
                    .and_modify(|route| route.pending += 1)
                    .or_insert(ActiveRoute {
                        coords: event.coords,
                        since: event.time,
                        pending: 1,
                    });
            }
            EventKind::Response => {
                self.responses += 1;
                let remaining = self.active.get_mut(&event.group_id).map(|route| {
                    route.pending -= 1;
                    route.pending
                });
                match remaining {
                    Some(0) => {
                        self.active.remove(&event.group_id);
                    }
                    Some(_) => {}
                    None => {
                        self.unmatched_responses += 1;
                        tracing::trace!(group = %event.group_id, "response without request");
                    }
                }
            }
        }
    }
}
