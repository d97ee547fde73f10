//! Timeline events and the ordered timeline.

use std::fmt;
use std::sync::Arc;

use footprint_core::{Asset, GeoPoint};
use uuid::Uuid;

/// Whether an event marks the start or the end of an asset load.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum EventKind {
    Request,
    Response,
}

/// Correlates a request with its response.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum GroupId {
    /// Network address, host name or URL of the asset.
    Key(String),
    /// Random token for assets with no identifying field. Never shared.
    Token(Uuid),
}

impl GroupId {
    pub fn for_asset(asset: &Asset) -> Self {
        match asset.correlation_key() {
            Some(key) => Self::Key(key.to_string()),
            None => Self::Token(Uuid::new_v4()),
        }
    }

    pub fn is_token(&self) -> bool {
        matches!(self, Self::Token(_))
    }
}

impl fmt::Display for GroupId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Key(key) => f.write_str(key),
            Self::Token(token) => write!(f, "token:{token}"),
        }
    }
}

/// A single request or response on the timeline.
#[derive(Clone, Debug, PartialEq)]
pub struct TimelineEvent {
    /// Offset in milliseconds on the timeline's own clock.
    pub time: f64,
    pub kind: EventKind,
    /// The originating asset, shared by its request and response.
    pub asset: Arc<Asset>,
    /// Position of the asset in the dataset the timeline was built from.
    pub asset_index: usize,
    pub coords: GeoPoint,
    pub group_id: GroupId,
}

impl TimelineEvent {
    pub fn is_request(&self) -> bool {
        self.kind == EventKind::Request
    }

    pub fn is_response(&self) -> bool {
        self.kind == EventKind::Response
    }
}

/// Events of one dataset sorted by time, ties in input order.
#[derive(Clone, Debug, Default)]
pub struct Timeline {
    events: Vec<TimelineEvent>,
    excluded_assets: usize,
}

impl Timeline {
    /// Wrap events that are already sorted.
    pub(crate) fn from_sorted(events: Vec<TimelineEvent>, excluded_assets: usize) -> Self {
        debug_assert!(events.windows(2).all(|w| w[0].time <= w[1].time));
        Self {
            events,
            excluded_assets,
        }
    }

    /// An empty timeline.
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&TimelineEvent> {
        self.events.get(index)
    }

    pub fn events(&self) -> &[TimelineEvent] {
        &self.events
    }

    pub fn iter(&self) -> impl Iterator<Item = &TimelineEvent> {
        self.events.iter()
    }

    /// Time of the first event.
    pub fn start_time(&self) -> Option<f64> {
        self.events.first().map(|e| e.time)
    }

    /// Time of the last event.
    pub fn end_time(&self) -> Option<f64> {
        self.events.last().map(|e| e.time)
    }

    /// Span between the first and last event.
    pub fn duration_ms(&self) -> f64 {
        match (self.start_time(), self.end_time()) {
            (Some(start), Some(end)) => end - start,
            _ => 0.0,
        }
    }

    /// Assets skipped for missing coordinates or start time.
    pub fn excluded_assets(&self) -> usize {
        self.excluded_assets
    }

    /// Assets represented on the timeline.
    pub fn included_assets(&self) -> usize {
        self.events.iter().filter(|e| e.is_request()).count()
    }
}

impl<'a> IntoIterator for &'a Timeline {
    type Item = &'a TimelineEvent;
    type IntoIter = std::slice::Iter<'a, TimelineEvent>;

    fn into_iter(self) -> Self::IntoIter {
        self.events.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_group_id_prefers_address() {
        let asset = Asset {
            ip: Some("10.1.1.1".into()),
            domain: Some("a.com".into()),
            ..Default::default()
        };
        assert_eq!(GroupId::for_asset(&asset), GroupId::Key("10.1.1.1".into()));
    }

    #[test]
    fn test_group_id_token_fallback() {
        let a = GroupId::for_asset(&Asset::default());
        let b = GroupId::for_asset(&Asset::default());
        assert!(a.is_token());
        assert_ne!(a, b);
        assert!(a.to_string().starts_with("token:"));
    }

    #[test]
    fn test_empty_timeline() {
        let timeline = Timeline::empty();
        assert!(timeline.is_empty());
        assert_eq!(timeline.start_time(), None);
        assert_eq!(timeline.duration_ms(), 0.0);
    }
}
