//! Snapshot subscriptions
//!
//! The document store pushes full snapshots of an analysis. Subscribers
//! register a callback and receive every snapshot until they unsubscribe.
//! Nothing is assumed about delivery cadence.

use footprint_core::AnalysisDocument;
use slotmap::{new_key_type, SlotMap};

use crate::error::Result;

new_key_type! {
    /// Handle returned by `DocumentFeed::subscribe`
    pub struct SubscriptionId;
}

/// Callback invoked with each full snapshot
pub type SnapshotCallback = Box<dyn FnMut(&AnalysisDocument)>;

/// Fan-out of analysis snapshots to registered callbacks.
pub struct DocumentFeed {
    analysis_id: String,
    subscribers: SlotMap<SubscriptionId, SnapshotCallback>,
    latest: Option<AnalysisDocument>,
}

impl DocumentFeed {
    pub fn new(analysis_id: impl Into<String>) -> Self {
        Self {
            analysis_id: analysis_id.into(),
            subscribers: SlotMap::with_key(),
            latest: None,
        }
    }

    pub fn analysis_id(&self) -> &str {
        &self.analysis_id
    }

    /// Register a callback. It is invoked immediately with the latest
    /// snapshot, if one has been published.
    pub fn subscribe<F>(&mut self, mut callback: F) -> SubscriptionId
    where
        F: FnMut(&AnalysisDocument) + 'static,
    {
        if let Some(latest) = &self.latest {
            callback(latest);
        }
        let id = self.subscribers.insert(Box::new(callback));
        tracing::debug!(analysis_id = %self.analysis_id, ?id, "subscribed");
        id
    }

    /// Stop delivering snapshots to `id`. Returns false if it was not registered.
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let removed = self.subscribers.remove(id).is_some();
        if removed {
            tracing::debug!(analysis_id = %self.analysis_id, ?id, "unsubscribed");
        }
        removed
    }

    /// Deliver a snapshot to every subscriber.
    pub fn publish(&mut self, snapshot: AnalysisDocument) {
        tracing::trace!(
            analysis_id = %self.analysis_id,
            assets = snapshot.assets.len(),
            subscribers = self.subscribers.len(),
            "publishing snapshot"
        );
        for (_, callback) in self.subscribers.iter_mut() {
            callback(&snapshot);
        }
        self.latest = Some(snapshot);
    }

    /// Parse and deliver a JSON snapshot.
    pub fn publish_json(&mut self, json: &str) -> Result<()> {
        let snapshot = AnalysisDocument::from_json(json)?;
        self.publish(snapshot);
        Ok(())
    }

    pub fn latest(&self) -> Option<&AnalysisDocument> {
        self.latest.as_ref()
    }

    pub fn subscriber_count(&self) -> usize {
        self.subscribers.len()
    }
}
