//! Playback driver.
//!
//! The driver owns a timeline and its playback state. The host calls
//! `tick` once per refresh; every event whose time has been crossed since
//! the previous tick is dispatched exactly once, in timeline order.

use crate::clock::{validate_speed, PlaybackClock, SystemClock, WallClock};
use crate::error::{PlaybackError, Result};
use crate::event::{Timeline, TimelineEvent};
use crate::sink::EventSink;

/// Configuration for the playback driver.
#[derive(Clone, Debug)]
pub struct PlaybackConfig {
    /// Initial playback speed (1.0 = real time).
    pub initial_speed: f64,
    /// Restart from the first event when the end is reached.
    pub loop_playback: bool,
}

impl Default for PlaybackConfig {
    fn default() -> Self {
        Self {
            initial_speed: 1.0,
            loop_playback: false,
        }
    }
}

impl PlaybackConfig {
    /// Set the initial playback speed.
    pub fn with_speed(mut self, speed: f64) -> Self {
        self.initial_speed = speed;
        self
    }

    /// Enable or disable looping.
    pub fn with_loop(mut self, loop_playback: bool) -> Self {
        self.loop_playback = loop_playback;
        self
    }
}

/// Lifecycle of a loaded timeline.
///
/// `Idle` is reported by hosts that hold no timeline at all.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PlaybackStatus {
    Idle,
    Stopped,
    Running,
    Finished,
}

/// Snapshot of the playback state.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PlaybackState {
    /// Index of the next event to dispatch.
    pub cursor: usize,
    pub virtual_time: f64,
    pub speed: f64,
    pub running: bool,
    pub anchor_wall_time: Option<f64>,
}

/// Replays a timeline against a virtual clock.
pub struct PlaybackDriver<C: WallClock = SystemClock> {
    timeline: Timeline,
    clock: PlaybackClock<C>,
    config: PlaybackConfig,
    cursor: usize,
}

impl<C: WallClock> PlaybackDriver<C> {
    /// Load a timeline, stopped at its first event.
    pub fn new(timeline: Timeline, wall: C) -> Self {
        let start = timeline.start_time().unwrap_or(0.0);
        Self {
            timeline,
            clock: PlaybackClock::new(wall, start),
            config: PlaybackConfig::default(),
            cursor: 0,
        }
    }

    /// Load a timeline with a validated configuration.
    pub fn with_config(timeline: Timeline, wall: C, config: PlaybackConfig) -> Result<Self> {
        validate_speed(config.initial_speed)?;
        let mut driver = Self::new(timeline, wall);
        driver.clock.set_speed(config.initial_speed)?;
        driver.config = config;
        Ok(driver)
    }

    /// Get the loaded timeline.
    pub fn timeline(&self) -> &Timeline {
        &self.timeline
    }

    /// Get the playback configuration.
    pub fn config(&self) -> &PlaybackConfig {
        &self.config
    }

    /// Get the index of the next event to dispatch.
    pub fn cursor(&self) -> usize {
        self.cursor
    }

    /// Get the current playback speed.
    pub fn speed(&self) -> f64 {
        self.clock.speed()
    }

    /// Check if playback is running.
    pub fn is_running(&self) -> bool {
        self.clock.is_running()
    }

    /// Get the current virtual time in milliseconds.
    pub fn current_virtual_time(&self) -> f64 {
        self.clock.current_virtual_time()
    }

    /// Get the lifecycle status. Never `Idle`.
    pub fn status(&self) -> PlaybackStatus {
        if self.clock.is_running() {
            PlaybackStatus::Running
        } else if !self.timeline.is_empty() && self.cursor >= self.timeline.len() {
            PlaybackStatus::Finished
        } else {
            PlaybackStatus::Stopped
        }
    }

    /// Get a snapshot of the playback state.
    pub fn state(&self) -> PlaybackState {
        PlaybackState {
            cursor: self.cursor,
            virtual_time: self.clock.current_virtual_time(),
            speed: self.clock.speed(),
            running: self.clock.is_running(),
            anchor_wall_time: self.clock.anchor(),
        }
    }

    /// Fraction of events already dispatched (0.0 to 1.0).
    pub fn progress(&self) -> f32 {
        if self.timeline.is_empty() {
            return 0.0;
        }
        self.cursor as f32 / self.timeline.len() as f32
    }

    /// Start or resume playback.
    ///
    /// No-op when already running, when the timeline is empty, or when
    /// playback has finished (use `reset` first).
    pub fn start(&mut self) {
        match self.status() {
            PlaybackStatus::Stopped if !self.timeline.is_empty() => {
                self.clock.start();
                tracing::debug!(
                    cursor = self.cursor,
                    virtual_time = self.clock.current_virtual_time(),
                    "playback started"
                );
            }
            status => {
                tracing::debug!(?status, events = self.timeline.len(), "start ignored");
            }
        }
    }

    /// Freeze playback at the current virtual time.
    pub fn pause(&mut self) {
        if self.clock.is_running() {
            self.clock.pause();
            tracing::debug!(
                cursor = self.cursor,
                virtual_time = self.clock.current_virtual_time(),
                "playback paused"
            );
        }
    }

    /// Toggle between running and stopped.
    pub fn toggle(&mut self) {
        if self.clock.is_running() {
            self.pause();
        } else {
            self.start();
        }
    }

    /// Change the speed multiplier. Rejects non-positive values.
    pub fn set_speed(&mut self, speed: f64) -> Result<()> {
        if let Err(err) = self.clock.set_speed(speed) {
            tracing::warn!(%err, "speed change rejected");
            return Err(err);
        }
        tracing::debug!(speed, "playback speed changed");
        Ok(())
    }

    /// Move the cursor to `index` and stop at that event's time.
    pub fn seek_to(&mut self, index: usize) -> Result<()> {
        let Some(event) = self.timeline.get(index) else {
            let err = PlaybackError::OutOfRange {
                index,
                len: self.timeline.len(),
            };
            tracing::warn!(%err, "seek rejected");
            return Err(err);
        };
        self.clock.stop_at(event.time);
        self.cursor = index;
        tracing::debug!(cursor = index, virtual_time = event.time, "seeked");
        Ok(())
    }

    /// Seek to `index`, then replay events before it so a sink can rebuild
    /// the visual state at that point. The sink is rewound first.
    ///
    /// Returns the number of replayed events.
    pub fn scrub_to<S>(&mut self, index: usize, sink: &mut S) -> Result<usize>
    where
        S: EventSink + ?Sized,
    {
        self.seek_to(index)?;
        sink.on_rewind();
        for event in &self.timeline.events()[..index] {
            sink.on_event(event);
        }
        Ok(index)
    }

    /// Rewind to the first event and stop.
    pub fn reset(&mut self) {
        self.cursor = 0;
        self.clock.stop_at(self.timeline.start_time().unwrap_or(0.0));
        tracing::debug!("playback reset");
    }

    /// Dispatch every event crossed since the last tick.
    ///
    /// Returns the number of dispatched events. Does nothing unless running.
    pub fn tick<S>(&mut self, sink: &mut S) -> usize
    where
        S: EventSink + ?Sized,
    {
        if !self.clock.is_running() {
            return 0;
        }

        let now = self.clock.current_virtual_time();
        let mut dispatched = 0;
        while let Some(event) = self.timeline.get(self.cursor) {
            if event.time > now {
                break;
            }
            tracing::trace!(
                index = self.cursor,
                time = event.time,
                kind = ?event.kind,
                group = %event.group_id,
                "dispatch"
            );
            sink.on_event(event);
            self.cursor += 1;
            dispatched += 1;
        }

        if self.cursor >= self.timeline.len() {
            self.clock.pause();
            tracing::debug!(events = self.timeline.len(), "playback finished");
            if self.config.loop_playback {
                self.reset();
                sink.on_rewind();
                self.start();
            }
        }

        dispatched
    }

    /// Events not yet dispatched.
    pub fn remaining(&self) -> &[TimelineEvent] {
        &self.timeline.events()[self.cursor.min(self.timeline.len())..]
    }
}
