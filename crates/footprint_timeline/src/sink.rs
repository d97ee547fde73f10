//! Event sink boundary.

use crate::event::{EventKind, TimelineEvent};

/// Consumer of dispatched timeline events.
///
/// Events arrive in nondecreasing time order. Several events may arrive in
/// one tick when the speed is high or ticks are sparse.
pub trait EventSink {
    fn on_event(&mut self, event: &TimelineEvent);

    /// Playback is about to deliver events from the start of the timeline
    /// again, after a loop or before a scrub replay. State derived from
    /// earlier deliveries is stale from here on.
    fn on_rewind(&mut self) {}
}

impl<F> EventSink for F
where
    F: FnMut(&TimelineEvent),
{
    fn on_event(&mut self, event: &TimelineEvent) {
        self(event)
    }
}

/// Sink that records every event it receives.
#[derive(Clone, Debug, Default)]
pub struct EventLog {
    events: Vec<TimelineEvent>,
}

impl EventLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> &[TimelineEvent] {
        &self.events
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    pub fn clear(&mut self) {
        self.events.clear();
    }

    /// `(asset_index, kind)` pairs in delivery order.
    pub fn sequence(&self) -> Vec<(usize, EventKind)> {
        self.events.iter().map(|e| (e.asset_index, e.kind)).collect()
    }
}

impl EventSink for EventLog {
    fn on_event(&mut self, event: &TimelineEvent) {
        self.events.push(event.clone());
    }
}
