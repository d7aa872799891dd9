use std::path::PathBuf;

use lodestone_common::clock::FrameRate;
use lodestone_model::event::{parse_events, EventKind, TimedEvent};
use lodestone_model::{MagneticConfig, OffsetVector, Region, SpringParams};
use lodestone_motion::{ScrollDriver, ScrollProgress, ScrollSection, Scene, Simulation};

fn load_fixture_events() -> Vec<TimedEvent> {
    let path = PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("..")
        .join("..")
        .join("fixtures")
        .join("magnetic-button.jsonl");

    let content = std::fs::read_to_string(path).expect("fixture events should be readable");
    parse_events(&content).expect("fixture events should parse")
}

fn fixture_scene() -> Scene {
    let section = ScrollSection {
        page_top: 1_000.0,
        height: 400.0,
        viewport_height: 800.0,
    };
    let scroll = ScrollDriver::new(ScrollProgress::default(), SpringParams::scroll(), 300.0);
    Scene::new(
        Region::EMPTY,
        MagneticConfig::default(),
        SpringParams::magnetic(),
    )
    .with_scroll(section, scroll)
}

#[test]
fn fixture_parses_in_timestamp_order() {
    let events = load_fixture_events();
    assert_eq!(events.len(), 36);
    assert!(matches!(events[0].kind, EventKind::Layout { .. }));
    assert!(events
        .windows(2)
        .all(|pair| pair[0].timestamp_ns <= pair[1].timestamp_ns));
}

#[test]
fn hover_sweep_reaches_corner_then_rests() {
    let events = load_fixture_events();
    let mut sim = Simulation::new(fixture_scene(), FrameRate::new(60));
    let report = sim.run(&events);

    assert_eq!(report.events_applied, events.len());
    assert!(report
        .frames
        .iter()
        .any(|frame| frame.raw == OffsetVector::new(20.0, 20.0)));

    for frame in &report.frames {
        assert!(frame.raw.is_finite() && frame.offset.is_finite());
        assert!(frame.raw.x.abs() <= 20.0 && frame.raw.y.abs() <= 20.0);
    }

    let last = report.last().expect("at least one frame");
    assert!(last.settled);
    assert_eq!(last.raw, OffsetVector::ZERO);
    assert_eq!(last.offset, OffsetVector::ZERO);
    assert_eq!(last.parallax, Some(150.0));
    assert!(report.settled_at_ns.is_some());
}

#[test]
fn moving_off_the_button_rests_before_the_leave_event() {
    let events = load_fixture_events();
    let mut sim = Simulation::new(fixture_scene(), FrameRate::new(60));
    let report = sim.run(&events);

    // The pointer crosses the corner at 226ms and the leave arrives at 518ms.
    let off_button: Vec<_> = report
        .frames
        .iter()
        .filter(|frame| frame.t_ns >= 240_000_000 && frame.t_ns < 518_000_000)
        .collect();
    assert!(!off_button.is_empty());
    for frame in off_button {
        assert_eq!(frame.raw, OffsetVector::ZERO, "frame {}", frame.frame);
    }
}

#[test]
fn smoothed_offset_lags_raw_offset() {
    let events = load_fixture_events();
    let mut sim = Simulation::new(fixture_scene(), FrameRate::new(60));
    let report = sim.run(&events);

    let first_active = report
        .frames
        .iter()
        .find(|frame| frame.raw != OffsetVector::ZERO)
        .expect("pointer moves should produce an offset");
    assert!(first_active.offset.length() < first_active.raw.length());

    for pair in report.frames.windows(2) {
        let step = (pair[1].offset - pair[0].offset).length();
        assert!(step < 20.0, "offset jumped by {step} in one frame");
    }
}

#[test]
fn frame_rate_does_not_change_the_resting_state() {
    let events = load_fixture_events();
    let slow = Simulation::new(fixture_scene(), FrameRate::new(30)).run(&events);
    let fast = Simulation::new(fixture_scene(), FrameRate::new(144)).run(&events);

    assert!(fast.frames.len() > slow.frames.len());
    assert_eq!(slow.last().unwrap().offset, fast.last().unwrap().offset);
    assert_eq!(slow.last().unwrap().parallax, fast.last().unwrap().parallax);
}
