//! Footprint Timeline Engine
//!
//! Reconstructs the "loading journey" of an analysed page from asset load
//! timings and replays it on a virtual clock.
//!
//! This crate provides:
//! - `build_timeline` - Derive ordered request/response events from assets
//! - `PlaybackClock` - Virtual time with speed, pause/resume and seeking
//! - `PlaybackDriver` - Dispatch crossed events to an `EventSink` each tick
//!
//! # Example
//!
//! ```ignore
//! use footprint_timeline::{build_timeline, EventLog, PlaybackDriver, SystemClock};
//!
//! let timeline = build_timeline(&document.assets);
//! let mut driver = PlaybackDriver::new(timeline, SystemClock::new());
//!
//! driver.set_speed(2.0)?;
//! driver.start();
//!
//! // Once per display refresh
//! let mut log = EventLog::new();
//! driver.tick(&mut log);
//! ```

mod builder;
mod clock;
mod driver;
mod error;
mod event;
mod sink;

pub use builder::{build_timeline, DEFAULT_DURATION_MS, MIN_GAP_MS};
pub use clock::{validate_speed, ManualClock, PlaybackClock, SystemClock, WallClock};
pub use driver::{PlaybackConfig, PlaybackDriver, PlaybackState, PlaybackStatus};
pub use error::{PlaybackError, Result};
pub use event::{EventKind, GroupId, Timeline, TimelineEvent};
pub use sink::{EventLog, EventSink};
