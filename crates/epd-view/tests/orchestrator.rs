//! Orchestrator behaviour over whole sessions, driven from telemetry JSON.
// Integration test file: unwrap/panic are intentional test mechanisms.
#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic, clippy::indexing_slicing)]

use epd_view::window::ALIGNMENT;
use epd_view::{EpdView, FullReason, RefreshMode, ViewConfig, ViewState, ZoneId};
use model::{DisplayModel, ModelBuilder, NodeRecord, Telemetry};
use platform::mocks::{FixedWidthText, RecordingSurface};
use platform::EpdSurface;

type View = EpdView<RecordingSurface, FixedWidthText>;

fn view() -> View {
    EpdView::new(RecordingSurface::new(800, 480), FixedWidthText, ViewConfig::default())
}

fn telemetry(local: &str, temperature: &str) -> Telemetry {
    Telemetry::from_json(&format!(
        r#"{{
            "timestamp_utc": "2025-11-03T19:00:00",
            "timestamp_local": "2025-11-03T{local}:00",
            "nodes": {{
                "garden-01": {{
                    "display_name": "Garden",
                    "timestamp_utc": "2025-11-03T18:59:00",
                    "measurements_v2": {{
                        "battery": {{"battery_percentage": "87"}},
                        "bme680": {{"temperature": "{temperature}"}}
                    }}
                }}
            }}
        }}"#
    ))
}

fn with_nodes(time: &str, count: usize) -> DisplayModel {
    let mut m = DisplayModel {
        time_text: time.into(),
        ..DisplayModel::default()
    };
    for i in 0..count {
        m.nodes.insert(format!("n{i}"), NodeRecord::default());
    }
    m
}

#[test]
fn second_identical_render_draws_no_partial_window() {
    let builder = ModelBuilder::default();
    let mut v = view();

    let first = builder.build(&telemetry("20:00", "22.53"));
    assert_eq!(first.nodes["garden-01"].battery_level.unwrap().get(), 7);
    let out = v.render(&first, true);
    assert!(out.updated);
    assert!(v.surface().drawn_texts().contains(&"22.5°C"));

    v.surface_mut().clear_events();
    let second = builder.build(&telemetry("20:00", "22.56"));
    let out = v.render(&second, true);
    assert!(!out.updated);
    assert_eq!(out.full_reason, Some(FullReason::NothingDirty));
    assert!(v.surface().partial_windows().is_empty());
}

#[test]
fn two_to_three_nodes_forces_full_render() {
    let mut v = view();
    v.render(&with_nodes("20:00", 2), true);
    v.render(&with_nodes("20:01", 2), true);
    assert_eq!(v.state(), ViewState::PartialActive);

    v.surface_mut().clear_events();
    let out = v.render(&with_nodes("20:01", 3), true);
    assert_eq!(out.refresh, Some(RefreshMode::Full));
    assert_eq!(out.full_reason, Some(FullReason::LayoutChanged));
    assert_eq!(v.surface().full_window_count(), 1);
    assert!(v.surface().partial_windows().is_empty());
    assert_eq!(v.partial_update_count(), 0);
}

#[test]
fn eleventh_clock_tick_is_full_and_resets_counter() {
    let mut v = view();
    v.render(&with_nodes("20:00", 1), true);

    for minute in 1..=10 {
        let out = v.render(&with_nodes(&format!("20:{minute:02}"), 1), true);
        assert_eq!(out.refresh, Some(RefreshMode::Partial), "tick {minute}");
        assert_eq!(out.zones, [ZoneId::Clock]);
    }
    assert_eq!(v.partial_update_count(), 10);

    let out = v.render(&with_nodes("20:11", 1), true);
    assert_eq!(out.refresh, Some(RefreshMode::Full));
    assert_eq!(out.full_reason, Some(FullReason::GhostingCeiling));
    assert_eq!(v.partial_update_count(), 0);

    let out = v.render(&with_nodes("20:12", 1), true);
    assert_eq!(out.refresh, Some(RefreshMode::Partial));
}

#[test]
fn custom_ceiling() {
    let config = ViewConfig {
        max_partial_updates: 2,
        ..ViewConfig::default()
    };
    let mut v = EpdView::new(RecordingSurface::new(800, 480), FixedWidthText, config);
    v.render(&with_nodes("20:00", 1), true);
    v.render(&with_nodes("20:01", 1), true);
    v.render(&with_nodes("20:02", 1), true);
    let out = v.render(&with_nodes("20:03", 1), true);
    assert_eq!(out.full_reason, Some(FullReason::GhostingCeiling));
}

#[test]
fn partial_windows_are_byte_aligned_and_on_surface() {
    let builder = ModelBuilder::default();
    let mut v = view();
    v.render(&builder.build(&telemetry("20:00", "22.5")), true);
    v.surface_mut().clear_events();

    let out = v.render(&builder.build(&telemetry("21:00", "23.9")), true);
    assert_eq!(out.zones, [ZoneId::Clock, ZoneId::Nodes]);

    let bounds = v.surface().bounds();
    let windows = v.surface().partial_windows();
    assert_eq!(windows.len(), 2);
    for w in windows {
        assert_eq!(w.top_left.x.rem_euclid(i32::try_from(ALIGNMENT).unwrap()), 0);
        assert_eq!(w.size.width % ALIGNMENT, 0);
        assert_eq!(bounds.intersection(&w), w);
    }
}

#[test]
fn date_change_redraws_date_zone_only() {
    let mut v = view();
    let mut a = with_nodes("23:59", 1);
    a.date_text = "Monday 3rd November 2025".into();
    let mut b = with_nodes("23:59", 1);
    b.date_text = "Tuesday 4th November 2025".into();

    v.render(&a, true);
    let out = v.render(&b, true);
    assert_eq!(out.zones, [ZoneId::Date]);
    let w = v.surface().partial_windows()[0];
    // Right-aligned: the window ends at the surface edge.
    assert_eq!(w.top_left.x + i32::try_from(w.size.width).unwrap(), 800);
    assert_eq!(w.top_left.y + i32::try_from(w.size.height).unwrap(), 470);
}

#[test]
fn invalid_telemetry_draws_fallback_and_requests_deep_sleep() {
    let t = Telemetry::from_json(r#"{"timestamp_utc": "2025-11-03T19:00:00"}"#);
    assert!(!t.is_valid());
    let model = ModelBuilder::default().build(&t);

    let mut v = view();
    let out = v.render(&model, t.is_valid());
    assert_eq!(out.full_reason, Some(FullReason::InvalidTelemetry));
    assert!(out.deep_sleep_needed);
    assert_eq!(
        v.surface().drawn_texts(),
        ["Failed to get data - local sensor only", "Local sensor (BME680) setup failed"]
    );
}

#[test]
fn page_flush_failure_is_reported_once_and_session_continues() {
    let mut v = view();
    v.render(&with_nodes("20:00", 1), true);
    v.surface_mut().fail_next_flushes(1);
    let out = v.render(&with_nodes("20:01", 1), true);
    assert!(out.panel_fault);

    let out = v.render(&with_nodes("20:02", 1), true);
    assert!(!out.panel_fault);
    assert_eq!(out.refresh, Some(RefreshMode::Partial));
    assert_eq!(v.partial_update_count(), 2);
}

#[test]
fn teardown_hibernates_once() {
    let mut v = view();
    v.render(&with_nodes("20:00", 1), true);
    assert!(v.teardown());
    assert!(!v.teardown());
    assert!(v.into_surface().is_hibernated());
}

#[test]
fn phase_name_change_redraws_sun_moon_zone() {
    let mut v = view();
    let mut first = with_nodes("20:00", 1);
    first.moon.phase_letter = Some('B');
    first.moon.phase_name = "New Moon".into();
    v.render(&first, true);

    let mut second = first.clone();
    second.time_text = "20:01".into();
    second.moon.phase_name = "Waxing Crescent".into();
    v.surface_mut().clear_events();
    let out = v.render(&second, true);
    assert_eq!(out.refresh, Some(RefreshMode::Partial));
    assert_eq!(out.zones, [ZoneId::Clock, ZoneId::SunMoon]);
    assert!(v.surface().drawn_texts().contains(&"Waxing Crescent"));
}
