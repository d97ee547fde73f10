//! Real-time journey replay
//!
//! Drives the session's playback from a tokio interval on a single thread
//! and logs each dispatched event.

use anyhow::Result;
use footprint_core::{AnalysisDocument, IspProvider};
use footprint_session::{AnalysisSession, JourneyTracker, ViewMode};
use footprint_timeline::{EventKind, EventSink, PlaybackStatus, SystemClock, TimelineEvent};
use std::time::Duration;
use tokio::time::MissedTickBehavior;

use crate::config::FootprintConfig;

pub async fn run(
    document: AnalysisDocument,
    config: &FootprintConfig,
    from: Option<usize>,
) -> Result<()> {
    let mut session = AnalysisSession::new(SystemClock::new(), config.playback_config())?
        .with_view_mode(ViewMode::Journey)?;
    session.set_origin(Some(config.origin_point()?));

    let update = session.apply_snapshot(document)?;
    tracing::info!(
        assets = update.assets,
        located = update.located_assets,
        servers = update.servers,
        "{}",
        session.status_line()
    );

    let mut tracker = JourneyTracker::new();
    let start_time = {
        let driver = session.playback_mut()?;
        if driver.timeline().is_empty() {
            tracing::warn!("No timed assets with coordinates; nothing to replay");
            return Ok(());
        }
        if let Some(index) = from {
            let replayed = driver.scrub_to(index, &mut tracker)?;
            tracing::info!(replayed, in_flight = tracker.in_flight(), "scrubbed");
        }
        tracing::info!(
            events = driver.timeline().len(),
            duration_ms = driver.timeline().duration_ms(),
            speed = driver.speed(),
            "Replaying loading journey"
        );
        driver.start();
        driver.timeline().start_time().unwrap_or(0.0)
    };

    let mut interval = tokio::time::interval(Duration::from_millis(config.playback.tick_interval_ms));
    interval.set_missed_tick_behavior(MissedTickBehavior::Skip);
    let ctrl_c = tokio::signal::ctrl_c();
    tokio::pin!(ctrl_c);

    loop {
        tokio::select! {
            _ = interval.tick() => {}
            _ = &mut ctrl_c => {
                session.playback_mut()?.pause();
                tracing::info!("Interrupted");
                break;
            }
        }

        session.tick(&mut ReplayLog {
            tracker: &mut tracker,
            start_time,
        });

        if session.playback_status() == PlaybackStatus::Finished {
            break;
        }
    }

    tracing::info!(
        requests = tracker.requests(),
        responses = tracker.responses(),
        in_flight = tracker.in_flight(),
        unmatched = tracker.unmatched_responses(),
        "Journey complete"
    );
    Ok(())
}

/// Feeds the journey tracker and logs each event as it is dispatched.
struct ReplayLog<'a> {
    tracker: &'a mut JourneyTracker,
    start_time: f64,
}

impl EventSink for ReplayLog<'_> {
    fn on_event(&mut self, event: &TimelineEvent) {
        self.tracker.on_event(event);
        log_event(event, self.start_time);
    }

    fn on_rewind(&mut self) {
        self.tracker.on_rewind();
        tracing::info!("Loop complete, restarting journey");
    }
}

fn log_event(event: &TimelineEvent, start_time: f64) {
    let asset = &event.asset;
    let host = asset
        .domain
        .as_deref()
        .or(asset.url.as_deref())
        .unwrap_or("unknown");
    let provider = IspProvider::classify(asset.isp.as_deref()).label();
    let offset = format!("+{:.0}ms", event.time - start_time);

    match event.kind {
        EventKind::Request => tracing::info!(
            %offset,
            %host,
            provider,
            lat = event.coords.lat,
            lon = event.coords.lon,
            "request"
        ),
        EventKind::Response => tracing::info!(%offset, %host, provider, "response"),
    }
}
