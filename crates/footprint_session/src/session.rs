//! Analysis session
//!
//! One `AnalysisSession` owns everything a dashboard shows for the current
//! analysis. Every snapshot replaces the dataset; in journey mode the
//! timeline and its playback state are rebuilt in the same step, so an old
//! timeline never outlives the data it was built from.

use footprint_core::{
    rank_resolvers, AnalysisDocument, DnsLatencyResult, GeoBounds, GeoPoint, LocationSummary,
    ServerLocation,
};
use footprint_timeline::{
    build_timeline, validate_speed, EventSink, PlaybackConfig, PlaybackDriver, PlaybackStatus,
    SystemClock, WallClock,
};

use crate::error::{Result, SessionError};
use crate::view::ViewMode;

/// What changed after a snapshot was applied.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SnapshotUpdate {
    pub assets: usize,
    pub located_assets: usize,
    pub servers: usize,
    /// Events on the rebuilt timeline, in journey mode.
    pub timeline_events: Option<usize>,
    /// Every analysis task has completed or failed.
    pub finished: bool,
}

/// Dataset, view mode and playback for one analysis.
pub struct AnalysisSession<C: WallClock + Clone = SystemClock> {
    wall: C,
    playback_config: PlaybackConfig,
    analysis_id: Option<String>,
    document: AnalysisDocument,
    locations: Vec<ServerLocation>,
    view_mode: ViewMode,
    playback: Option<PlaybackDriver<C>>,
    origin: Option<GeoPoint>,
}

impl<C: WallClock + Clone> AnalysisSession<C> {
    pub fn new(wall: C, playback_config: PlaybackConfig) -> Result<Self> {
        validate_speed(playback_config.initial_speed)?;
        Ok(Self {
            wall,
            playback_config,
            analysis_id: None,
            document: AnalysisDocument::default(),
            locations: Vec::new(),
            view_mode: ViewMode::default(),
            playback: None,
            origin: None,
        })
    }

    pub fn with_view_mode(mut self, mode: ViewMode) -> Result<Self> {
        self.set_view_mode(mode)?;
        Ok(self)
    }

    pub fn analysis_id(&self) -> Option<&str> {
        self.analysis_id.as_deref()
    }

    pub fn document(&self) -> &AnalysisDocument {
        &self.document
    }

    pub fn view_mode(&self) -> ViewMode {
        self.view_mode
    }

    pub fn origin(&self) -> Option<GeoPoint> {
        self.origin
    }

    /// Set the viewer's own position, used for route lines and bounds.
    pub fn set_origin(&mut self, origin: Option<GeoPoint>) {
        self.origin = origin;
    }

    /// Start tracking a new analysis, dropping the previous dataset.
    pub fn begin_analysis(&mut self, analysis_id: impl Into<String>) -> Result<()> {
        let analysis_id = analysis_id.into();
        tracing::info!(%analysis_id, "tracking analysis");
        self.analysis_id = Some(analysis_id);
        self.document = AnalysisDocument::default();
        self.locations.clear();
        self.rebuild_playback()
    }

    /// Replace the dataset with a full snapshot.
    pub fn apply_snapshot(&mut self, snapshot: AnalysisDocument) -> Result<SnapshotUpdate> {
        self.locations = footprint_core::group_by_server(&snapshot.assets);
        self.document = snapshot;
        self.rebuild_playback()?;

        let update = SnapshotUpdate {
            assets: self.document.assets.len(),
            located_assets: self.document.located_asset_count(),
            servers: self.locations.len(),
            timeline_events: self.playback.as_ref().map(|p| p.timeline().len()),
            finished: self.document.is_finished(),
        };

        if update.located_assets < update.assets {
            tracing::debug!(
                dropped = update.assets - update.located_assets,
                "snapshot contains assets without coordinates"
            );
        }
        tracing::debug!(?update, "snapshot applied");
        Ok(update)
    }

    /// Switch views. Playback state is discarded on every change.
    pub fn set_view_mode(&mut self, mode: ViewMode) -> Result<()> {
        if mode == self.view_mode {
            return Ok(());
        }
        tracing::debug!(from = %self.view_mode, to = %mode, "view mode changed");
        self.view_mode = mode;
        self.rebuild_playback()
    }

    fn rebuild_playback(&mut self) -> Result<()> {
        self.playback = None;
        if self.view_mode.has_playback() {
            let timeline = build_timeline(&self.document.assets);
            let driver =
                PlaybackDriver::with_config(timeline, self.wall.clone(), self.playback_config.clone())?;
            self.playback = Some(driver);
        }
        Ok(())
    }

    pub fn playback(&self) -> Option<&PlaybackDriver<C>> {
        self.playback.as_ref()
    }

    pub fn playback_mut(&mut self) -> Result<&mut PlaybackDriver<C>> {
        self.playback.as_mut().ok_or(SessionError::NoPlayback)
    }

    /// `Idle` when no timeline is loaded.
    pub fn playback_status(&self) -> PlaybackStatus {
        self.playback
            .as_ref()
            .map_or(PlaybackStatus::Idle, |driver| driver.status())
    }

    /// Change the speed for current and future timelines.
    pub fn set_speed(&mut self, speed: f64) -> Result<()> {
        if let Some(driver) = self.playback.as_mut() {
            driver.set_speed(speed)?;
        } else {
            validate_speed(speed)?;
        }
        self.playback_config.initial_speed = speed;
        Ok(())
    }

    /// Advance journey playback. Returns the number of dispatched events.
    pub fn tick<S>(&mut self, sink: &mut S) -> usize
    where
        S: EventSink + ?Sized,
    {
        self.playback.as_mut().map_or(0, |driver| driver.tick(sink))
    }

    pub fn locations(&self) -> &[ServerLocation] {
        &self.locations
    }

    pub fn summary(&self) -> LocationSummary {
        LocationSummary::from_locations(&self.locations)
    }

    /// Viewport covering every located server and the viewer.
    pub fn bounds(&self) -> Option<GeoBounds> {
        GeoBounds::for_locations(&self.locations, self.origin)
    }

    pub fn ranked_resolvers(&self) -> Vec<&DnsLatencyResult> {
        rank_resolvers(&self.document.dns_latency_results)
    }

    /// Progress line for the status bar.
    pub fn status_line(&self) -> String {
        match &self.document.status {
            Some(status) => status.to_string(),
            None if self.analysis_id.is_some() => "Waiting for analysis data...".to_string(),
            None => "Preparing analysis...".to_string(),
        }
    }
}
