//! Virtual playback clock.
//!
//! Virtual time advances with wall-clock time scaled by a speed multiplier,
//! and only while running. Wall-clock time is read through `WallClock` so
//! hosts and tests can drive it deterministically.

use std::cell::Cell;
use std::rc::Rc;
use std::time::Instant;

use crate::error::{PlaybackError, Result};

/// Source of wall-clock time in milliseconds.
pub trait WallClock {
    /// Get the current wall time in milliseconds.
    fn now_ms(&self) -> f64;
}

/// Monotonic wall clock backed by `Instant`.
#[derive(Clone, Copy, Debug)]
pub struct SystemClock {
    origin: Instant,
}

impl SystemClock {
    /// Create a clock whose zero is now.
    pub fn new() -> Self {
        Self {
            origin: Instant::now(),
        }
    }
}

impl Default for SystemClock {
    fn default() -> Self {
        Self::new()
    }
}

impl WallClock for SystemClock {
    fn now_ms(&self) -> f64 {
        self.origin.elapsed().as_secs_f64() * 1000.0
    }
}

/// Manually advanced wall clock. Clones share the same time.
#[derive(Clone, Debug, Default)]
pub struct ManualClock {
    now: Rc<Cell<f64>>,
}

impl ManualClock {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a clock reading `ms`.
    pub fn starting_at(ms: f64) -> Self {
        Self {
            now: Rc::new(Cell::new(ms)),
        }
    }

    /// Move time forward by `ms`.
    pub fn advance(&self, ms: f64) {
        self.now.set(self.now.get() + ms);
    }

    /// Jump to an absolute time.
    pub fn set(&self, ms: f64) {
        self.now.set(ms);
    }
}

impl WallClock for ManualClock {
    fn now_ms(&self) -> f64 {
        self.now.get()
    }
}

/// Reject zero, negative and non-finite speed multipliers.
pub fn validate_speed(speed: f64) -> Result<f64> {
    if speed.is_finite() && speed > 0.0 {
        Ok(speed)
    } else {
        Err(PlaybackError::InvalidSpeed(speed))
    }
}

/// Virtual time position driven by a wall clock.
#[derive(Debug)]
pub struct PlaybackClock<C: WallClock> {
    wall: C,
    /// Virtual time as of the last sync.
    virtual_time: f64,
    /// Playback speed multiplier (1.0 = real time).
    speed: f64,
    running: bool,
    /// Wall time at which `virtual_time` was last synced. Set only while running.
    anchor: Option<f64>,
}

impl<C: WallClock> PlaybackClock<C> {
    /// A stopped clock at `virtual_time`.
    pub fn new(wall: C, virtual_time: f64) -> Self {
        Self {
            wall,
            virtual_time,
            speed: 1.0,
            running: false,
            anchor: None,
        }
    }

    /// Check if the clock is running.
    pub fn is_running(&self) -> bool {
        self.running
    }

    /// Get the current playback speed.
    pub fn speed(&self) -> f64 {
        self.speed
    }

    /// Wall time of the last sync, if running.
    pub fn anchor(&self) -> Option<f64> {
        self.anchor
    }

    /// Current virtual time.
    pub fn current_virtual_time(&self) -> f64 {
        match (self.running, self.anchor) {
            (true, Some(anchor)) => {
                let elapsed = (self.wall.now_ms() - anchor).max(0.0);
                self.virtual_time + elapsed * self.speed
            }
            _ => self.virtual_time,
        }
    }

    /// Start or resume.
    pub fn start(&mut self) {
        if !self.running {
            self.running = true;
            self.anchor = Some(self.wall.now_ms());
        }
    }

    /// Freeze the current virtual time and stop.
    pub fn pause(&mut self) {
        if self.running {
            self.virtual_time = self.current_virtual_time();
            self.running = false;
            self.anchor = None;
        }
    }

    /// Change the multiplier without a jump in virtual time.
    pub fn set_speed(&mut self, speed: f64) -> Result<()> {
        let speed = validate_speed(speed)?;
        if self.running {
            self.virtual_time = self.current_virtual_time();
            self.anchor = Some(self.wall.now_ms());
        }
        self.speed = speed;
        Ok(())
    }

    /// Stop at an explicit virtual time.
    pub fn stop_at(&mut self, virtual_time: f64) {
        self.virtual_time = virtual_time;
        self.running = false;
        self.anchor = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clock_creation() {
        let clock = PlaybackClock::new(ManualClock::new(), 250.0);
        assert!(!clock.is_running());
        assert_eq!(clock.current_virtual_time(), 250.0);
        assert_eq!(clock.speed(), 1.0);
        assert_eq!(clock.anchor(), None);
    }

    #[test]
    fn test_advances_only_while_running() {
        let wall = ManualClock::new();
        let mut clock = PlaybackClock::new(wall.clone(), 0.0);

        wall.advance(100.0);
        assert_eq!(clock.current_virtual_time(), 0.0);

        clock.start();
        wall.advance(40.0);
        assert_eq!(clock.current_virtual_time(), 40.0);

        clock.pause();
        wall.advance(1000.0);
        assert_eq!(clock.current_virtual_time(), 40.0);
    }

    #[test]
    fn test_pause_is_idempotent() {
        let wall = ManualClock::new();
        let mut clock = PlaybackClock::new(wall.clone(), 0.0);
        clock.start();
        wall.advance(30.0);

        clock.pause();
        let frozen = clock.current_virtual_time();
        wall.advance(30.0);
        clock.pause();
        assert_eq!(clock.current_virtual_time(), frozen);
    }

    #[test]
    fn test_set_speed_resyncs_anchor() {
        let wall = ManualClock::new();
        let mut clock = PlaybackClock::new(wall.clone(), 0.0);
        clock.start();
        wall.advance(500.0);

        clock.set_speed(2.0).unwrap();
        assert_eq!(clock.current_virtual_time(), 500.0);
        assert_eq!(clock.anchor(), Some(500.0));

        wall.advance(100.0);
        assert_eq!(clock.current_virtual_time(), 700.0);
    }

    #[test]
    fn test_invalid_speed_rejected() {
        let mut clock = PlaybackClock::new(ManualClock::new(), 0.0);
        clock.set_speed(4.0).unwrap();

        for bad in [0.0, -1.0, f64::NAN, f64::INFINITY] {
            assert!(matches!(
                clock.set_speed(bad),
                Err(PlaybackError::InvalidSpeed(_))
            ));
        }
        assert_eq!(clock.speed(), 4.0);
    }

    #[test]
    fn test_start_twice_keeps_anchor() {
        let wall = ManualClock::starting_at(10.0);
        let mut clock = PlaybackClock::new(wall.clone(), 0.0);
        clock.start();
        wall.advance(5.0);
        clock.start();
        assert_eq!(clock.anchor(), Some(10.0));
        assert_eq!(clock.current_virtual_time(), 5.0);
    }

    #[test]
    fn test_system_clock_monotonic() {
        let wall = SystemClock::new();
        let a = wall.now_ms();
        let b = wall.now_ms();
        assert!(b >= a);
    }
}
