//! Integration tests for timeline construction and playback
//!
//! These tests verify that:
//! - Timelines are ordered, paired and deterministic
//! - Each event is dispatched exactly once per linear run
//! - Speed changes never skip or repeat events
//! - Degenerate timelines are handled without errors

use footprint_core::{AnalysisDocument, Asset};
use footprint_timeline::{
    build_timeline, EventKind, EventLog, ManualClock, PlaybackDriver, PlaybackError,
    PlaybackStatus, Timeline, MIN_GAP_MS,
};
use serde_json::json;
use std::collections::HashMap;

/// A page load with overlapping, clamped and untimed assets.
fn sample_assets() -> Vec<Asset> {
    (0..40)
        .map(|i| {
            let start = ((i * 37) % 500) as f64;
            let end = match i % 4 {
                0 => Some(start + ((i * 13) % 90) as f64),
                1 => Some(start - 5.0),
                2 => None,
                _ => Some(start + 3.0),
            };
            Asset {
                ip: Some(format!("10.0.0.{}", i % 7)),
                domain: Some(format!("host{i}.example.com")),
                lat: Some(10.0 + i as f64),
                lon: Some(20.0 - i as f64),
                load_start_time: if i % 9 == 8 { None } else { Some(start) },
                load_end_time: end,
                ..Default::default()
            }
        })
        .collect()
}

fn loaded_driver(assets: &[Asset]) -> (PlaybackDriver<ManualClock>, ManualClock) {
    let wall = ManualClock::new();
    (PlaybackDriver::new(build_timeline(assets), wall.clone()), wall)
}

/// Run playback to the end with fixed wall-clock steps.
fn play_to_end(driver: &mut PlaybackDriver<ManualClock>, wall: &ManualClock, step_ms: f64) -> EventLog {
    let mut log = EventLog::new();
    driver.start();
    driver.tick(&mut log);
    for _ in 0..100_000 {
        if driver.status() == PlaybackStatus::Finished {
            break;
        }
        wall.advance(step_ms);
        driver.tick(&mut log);
    }
    log
}

#[test]
fn test_timeline_is_ordered() {
    let timeline = build_timeline(&sample_assets());
    assert!(!timeline.is_empty());
    for pair in timeline.events().windows(2) {
        assert!(pair[0].time <= pair[1].time);
    }
}

#[test]
fn test_responses_respect_minimum_gap() {
    let timeline = build_timeline(&sample_assets());
    let requests: HashMap<usize, f64> = timeline
        .iter()
        .filter(|e| e.kind == EventKind::Request)
        .map(|e| (e.asset_index, e.time))
        .collect();

    let mut responses = 0;
    for event in timeline.iter().filter(|e| e.kind == EventKind::Response) {
        let request_time = requests[&event.asset_index];
        assert!(event.time >= request_time + MIN_GAP_MS);
        responses += 1;
    }
    assert_eq!(responses, requests.len());
}

#[test]
fn test_build_is_deterministic() {
    let assets = sample_assets();
    let first = build_timeline(&assets);
    let second = build_timeline(&assets);
    assert_eq!(first.events(), second.events());
}

#[test]
fn test_untimed_assets_are_excluded() {
    let assets = sample_assets();
    let untimed = assets.iter().filter(|a| a.load_start_time.is_none()).count();
    let timeline = build_timeline(&assets);
    assert_eq!(timeline.excluded_assets(), untimed);
    assert_eq!(timeline.len(), (assets.len() - untimed) * 2);
}

#[test]
fn test_single_dispatch_with_irregular_ticks() {
    let (mut driver, wall) = loaded_driver(&sample_assets());
    let mut log = EventLog::new();

    driver.start();
    let steps = [0.0, 1.0, 0.0, 17.0, 3.0, 250.0, 0.5, 90.0, 1000.0];
    for step in steps {
        wall.advance(step);
        driver.tick(&mut log);
        driver.tick(&mut log);
    }

    assert_eq!(driver.status(), PlaybackStatus::Finished);
    let expected: Vec<_> = driver
        .timeline()
        .iter()
        .map(|e| (e.asset_index, e.kind))
        .collect();
    assert_eq!(log.sequence(), expected);
}

#[test]
fn test_pause_resume_does_not_redeliver() {
    let (mut driver, wall) = loaded_driver(&sample_assets());
    let mut log = EventLog::new();

    driver.start();
    wall.advance(120.0);
    driver.tick(&mut log);
    driver.pause();
    let delivered = log.len();

    wall.advance(5000.0);
    assert_eq!(driver.tick(&mut log), 0);

    driver.start();
    wall.advance(10_000.0);
    driver.tick(&mut log);

    assert!(delivered > 0);
    assert_eq!(log.len(), driver.timeline().len());
}

#[test]
fn test_speed_neutrality() {
    let assets = sample_assets();

    let (mut normal, normal_wall) = loaded_driver(&assets);
    let normal_log = play_to_end(&mut normal, &normal_wall, 20.0);

    // Twice the speed and twice the ticks, each a quarter as long:
    // the virtual distance per tick halves.
    let (mut fast, fast_wall) = loaded_driver(&assets);
    fast.set_speed(2.0).unwrap();
    let fast_log = play_to_end(&mut fast, &fast_wall, 5.0);

    assert_eq!(normal_log.sequence(), fast_log.sequence());
}

#[test]
fn test_speed_change_mid_playback() {
    let assets = vec![Asset {
        ip: Some("A".into()),
        lat: Some(1.0),
        lon: Some(1.0),
        load_start_time: Some(0.0),
        load_end_time: Some(2000.0),
        ..Default::default()
    }];
    let (mut driver, wall) = loaded_driver(&assets);
    let mut log = EventLog::new();

    driver.start();
    wall.advance(500.0);
    driver.tick(&mut log);
    assert_eq!(driver.current_virtual_time(), 500.0);

    driver.set_speed(2.0).unwrap();
    wall.advance(100.0);
    driver.tick(&mut log);
    assert_eq!(driver.current_virtual_time(), 700.0);
}

#[test]
fn test_pause_twice_is_idempotent() {
    let (mut driver, wall) = loaded_driver(&sample_assets());
    driver.start();
    wall.advance(42.0);
    driver.pause();
    let frozen = driver.current_virtual_time();
    wall.advance(42.0);
    driver.pause();
    assert_eq!(driver.current_virtual_time(), frozen);
}

#[test]
fn test_empty_timeline_start_is_noop() {
    let wall = ManualClock::new();
    let mut driver = PlaybackDriver::new(Timeline::empty(), wall.clone());
    let mut log = EventLog::new();

    driver.start();
    wall.advance(100.0);
    assert_eq!(driver.tick(&mut log), 0);
    assert_eq!(driver.status(), PlaybackStatus::Stopped);
    assert!(log.is_empty());
    assert_eq!(
        driver.seek_to(0),
        Err(PlaybackError::OutOfRange { index: 0, len: 0 })
    );
}

#[test]
fn test_reset_allows_second_run() {
    let (mut driver, wall) = loaded_driver(&sample_assets());
    let first = play_to_end(&mut driver, &wall, 50.0);

    driver.reset();
    assert_eq!(driver.status(), PlaybackStatus::Stopped);
    let second = play_to_end(&mut driver, &wall, 50.0);

    assert_eq!(first.sequence(), second.sequence());
}

#[test]
fn test_scrub_then_resume_delivers_suffix() {
    let (mut driver, wall) = loaded_driver(&sample_assets());
    let total = driver.timeline().len();
    let mut scrubbed = EventLog::new();

    let index = total / 2;
    driver.scrub_to(index, &mut scrubbed).unwrap();
    assert_eq!(scrubbed.len(), index);

    let rest = play_to_end(&mut driver, &wall, 25.0);
    assert_eq!(rest.len(), total - index);
    assert_eq!(rest.events()[0].time, driver.timeline().events()[index].time);
}

#[test]
fn test_timeline_from_snapshot_document() {
    let raw = json!({
        "status": "completed",
        "assets": [
            {"url": "https://example.com/", "ip": "93.184.216.34", "lat": 42.1, "lon": -70.8,
             "load_start_time": 1_717_000_000_100.0, "load_end_time": 1_717_000_000_350.0},
            {"url": "https://cdn.example.com/app.js", "ip": "151.101.1.1", "lat": 37.7, "lon": -122.4,
             "load_start_time": 1_717_000_000_200.0},
            {"url": "https://fonts.example.com/", "lat": 51.5}
        ]
    });
    let doc = AnalysisDocument::from_json(&raw.to_string()).unwrap();
    let timeline = build_timeline(&doc.assets);

    assert_eq!(timeline.len(), 4);
    assert_eq!(timeline.excluded_assets(), 1);
    assert_eq!(timeline.start_time(), Some(1_717_000_000_100.0));
    assert_eq!(timeline.duration_ms(), 250.0);

    // Playback starts at the first event, not at zero.
    let wall = ManualClock::new();
    let mut driver = PlaybackDriver::new(timeline, wall.clone());
    let mut log = EventLog::new();
    driver.start();
    assert_eq!(driver.tick(&mut log), 1);
}
