//! Integration tests for the AquariumService control loop.
//!
//! These run on the host (x86_64) against [`MockHardware`], whose clock
//! only advances when the service blocks, so every timing assertion is
//! deterministic.

use aquactl::app::events::AppEvent;
use aquactl::app::presenter::StatusMode;
use aquactl::app::service::AquariumService;
use aquactl::config::ControllerConfig;
use aquactl::control::fan::FanState;
use aquactl::control::feeding::{FeedEvent, FeedSource, ValvePosition};
use aquactl::error::{ClockError, Error};
use aquactl::events::ManualFeedLatch;
use aquactl::sensors::temperature::TemperatureReading;
use embedded_hal::delay::DelayNs;

use crate::mock_hw::{HwCall, LogSink, MockHardware};

fn latch() -> ManualFeedLatch {
    ManualFeedLatch::new(ControllerConfig::DEFAULT.debounce_ms)
}

fn start<'a>(latch: &'a ManualFeedLatch) -> (AquariumService<'a>, MockHardware<'a>, LogSink) {
    let mut app = AquariumService::new(ControllerConfig::DEFAULT, latch);
    let mut hw = MockHardware::with_button(latch);
    let mut sink = LogSink::new();
    app.start(&mut hw, &mut sink).expect("clock present");
    (app, hw, sink)
}

/// One loop pass including the trailing loop delay, as `main` runs it.
fn iterate(app: &mut AquariumService<'_>, hw: &mut MockHardware<'_>, sink: &mut LogSink) {
    app.tick(hw, sink);
    let d = app.loop_delay_ms();
    hw.delay_ms(d);
}

fn last_status(sink: &LogSink) -> aquactl::app::events::StatusReport {
    sink.events
        .iter()
        .rev()
        .find_map(|e| match e {
            AppEvent::Status(r) => Some(*r),
            _ => None,
        })
        .expect("a status line")
}

// ── Startup ───────────────────────────────────────────────────

#[test]
fn startup_puts_outputs_in_rest_state() {
    let l = latch();
    let (app, hw, sink) = start(&l);

    assert_eq!(
        hw.calls,
        vec![
            HwCall::Fan(FanState::Off),
            HwCall::PhLed(false),
            HwCall::Valve(ValvePosition::Closed),
        ]
    );
    assert_eq!(sink.events, vec![AppEvent::Started]);
    assert_eq!(hw.row(0), "pH:             ");
    assert_eq!(hw.row(1), "Temp:     READY ");
    assert_eq!(app.mode(), StatusMode::Ready);
}

#[test]
fn missing_clock_is_fatal_and_shown() {
    let l = latch();
    let mut app = AquariumService::new(ControllerConfig::DEFAULT, &l);
    let mut hw = MockHardware::with_button(&l);
    hw.clock_present = false;
    let mut sink = LogSink::new();

    let result = app.start(&mut hw, &mut sink);

    assert_eq!(result, Err(Error::Clock(ClockError::NotResponding)));
    assert!(hw.row(0).starts_with("RTC Error!"));
    assert_eq!(sink.events, vec![AppEvent::ClockFault(ClockError::NotResponding)]);
    assert!(hw.calls.is_empty(), "nothing is driven after a clock failure");
}

#[test]
fn clock_read_failure_mid_run_is_not_fatal() {
    let l = latch();
    let (mut app, mut hw, mut sink) = start(&l);
    hw.wall_time = Err(ClockError::InvalidTime);

    iterate(&mut app, &mut hw, &mut sink);

    assert_eq!(&hw.row(0)[11..16], "--:--");
    assert_eq!(
        sink.count(|e| matches!(e, AppEvent::ClockUnavailable(ClockError::InvalidTime))),
        1
    );
    assert!(matches!(sink.events.last(), Some(AppEvent::Status(_))));
}

// ── Status presentation ───────────────────────────────────────

#[test]
fn normal_iteration_renders_screen_and_status_line() {
    let l = latch();
    let (mut app, mut hw, mut sink) = start(&l);

    iterate(&mut app, &mut hw, &mut sink);

    assert_eq!(hw.row(0), "pH:14.64   14:05");
    assert_eq!(hw.row(1), "Temp:25.0CREADY ");

    let status = last_status(&sink);
    assert!((status.ph - 14.64).abs() < 0.01, "got {}", status.ph);
    assert_eq!(status.temperature, TemperatureReading::Celsius(25.0));
    assert_eq!(status.fan, FanState::Off);
    assert!(!status.ph_alert);
}

#[test]
fn ph_is_sampled_ten_times_ten_ms_apart() {
    let l = latch();
    let (mut app, mut hw, mut sink) = start(&l);
    hw.clear_calls();

    app.tick(&mut hw, &mut sink);

    let delays: Vec<u32> = hw
        .calls
        .iter()
        .filter_map(|c| match c {
            HwCall::Delay(ms) => Some(*ms),
            _ => None,
        })
        .collect();
    assert_eq!(delays, vec![10; 10]);
}

// ── Manual feeding ────────────────────────────────────────────

#[test]
fn manual_feed_runs_full_sequence_in_order() {
    let l = latch();
    let (mut app, mut hw, mut sink) = start(&l);
    hw.clear_calls();
    hw.press_now();

    app.tick(&mut hw, &mut sink);

    let open = hw
        .calls
        .iter()
        .position(|c| *c == HwCall::Valve(ValvePosition::Open))
        .expect("valve opened");
    assert_eq!(
        &hw.calls[open..open + 4],
        &[
            HwCall::Valve(ValvePosition::Open),
            HwCall::Delay(1_000),
            HwCall::Valve(ValvePosition::Closed),
            HwCall::Delay(1_000),
        ]
    );

    let event = FeedEvent { source: FeedSource::Manual, at_ms: 0 };
    assert_eq!(
        &sink.events[1..5],
        &[
            AppEvent::FeedRequested(event),
            AppEvent::ValveMoved(ValvePosition::Open),
            AppEvent::ValveMoved(ValvePosition::Closed),
            AppEvent::FeedCompleted(event),
        ]
    );

    assert_eq!(hw.row0_at_open.as_deref(), Some("FEEDING...      "));
    assert!(hw.row(0).starts_with("pH:14.64"));
    assert_eq!(app.mode(), StatusMode::Ready);
    assert_eq!(app.feeds(), 1);
    assert!(!l.is_pending());
}

#[test]
fn mode_slot_shows_feed_source_while_dispensing() {
    let l = latch();
    let (mut app, mut hw, mut sink) = start(&l);
    hw.press_now();

    app.tick(&mut hw, &mut sink);

    assert_eq!(hw.row0_at_open.as_deref(), Some("FEEDING...      "));
    assert_eq!(hw.row1_at_open.as_deref().map(|r| &r[10..16]), Some("MANUAL"));
    assert_eq!(&hw.row(1)[10..16], "READY ");
    assert_eq!(sink.count(|e| matches!(e, AppEvent::FeedCompleted(_))), 1);
}

#[test]
fn press_during_feed_is_served_next_iteration() {
    let l = latch();
    let (mut app, mut hw, mut sink) = start(&l);
    hw.press_now();
    // Lands while the valve is held open.
    hw.press_at(600);

    app.tick(&mut hw, &mut sink);
    assert_eq!(app.feeds(), 1);
    assert!(l.is_pending(), "second press waits for the next iteration");

    app.tick(&mut hw, &mut sink);
    assert_eq!(app.feeds(), 2);
    let sources: Vec<FeedSource> = sink.feeds_requested().iter().map(|f| f.0).collect();
    assert_eq!(sources, vec![FeedSource::Manual, FeedSource::Manual]);
}

#[test]
fn button_bounce_yields_one_feed() {
    let l = latch();
    let (mut app, mut hw, mut sink) = start(&l);
    hw.press_now();
    for t in [50, 100, 200, 300, 450] {
        hw.press_at(t);
    }

    iterate(&mut app, &mut hw, &mut sink);
    iterate(&mut app, &mut hw, &mut sink);

    assert_eq!(hw.accepted_presses, 1);
    assert_eq!(app.feeds(), 1);
}

#[test]
fn pending_manual_request_keeps_mode_slot_on_fan_change() {
    let l = latch();
    let (mut app, mut hw, mut sink) = start(&l);
    hw.push_temperatures(&[TemperatureReading::Celsius(31.0)]);
    // Fires during pH sampling, after this iteration's arbitration.
    hw.press_at(50);

    app.tick(&mut hw, &mut sink);

    assert_eq!(app.fan_state(), FanState::On);
    assert_eq!(app.mode(), StatusMode::Ready);
    assert!(l.is_pending());

    app.tick(&mut hw, &mut sink);
    assert_eq!(app.feeds(), 1);
}

// ── Automatic feeding ─────────────────────────────────────────

#[test]
fn auto_feed_fires_once_interval_elapses() {
    let l = latch();
    let (mut app, mut hw, mut sink) = start(&l);

    for _ in 0..200 {
        iterate(&mut app, &mut hw, &mut sink);
        if !sink.feeds_requested().is_empty() {
            break;
        }
        assert!(hw.now_ms < 60_000 + 2_000, "auto feed overdue");
    }

    let feeds = sink.feeds_requested();
    assert_eq!(feeds.len(), 1);
    assert_eq!(feeds[0].0, FeedSource::Auto);
    assert!(feeds[0].1 >= 60_000);
}

#[test]
fn manual_feed_postpones_auto_by_full_interval() {
    let l = latch();
    let (mut app, mut hw, mut sink) = start(&l);
    hw.press_at(10_000);

    for _ in 0..200 {
        iterate(&mut app, &mut hw, &mut sink);
        if sink.feeds_requested().len() >= 2 {
            break;
        }
    }

    let feeds = sink.feeds_requested();
    assert_eq!(feeds.len(), 2);
    let (manual_src, manual_at) = feeds[0];
    let (auto_src, auto_at) = feeds[1];
    assert_eq!(manual_src, FeedSource::Manual);
    assert!(manual_at >= 10_000);
    assert_eq!(auto_src, FeedSource::Auto);
    assert!(auto_at >= 70_000, "auto fired at {auto_at}");
    // Timer restarts when the feed completes, after the 1 s hold.
    assert!(auto_at >= manual_at + 1_000 + 60_000);
}

#[test]
fn valve_is_closed_before_and_after_feeding() {
    let l = latch();
    let (mut app, mut hw, mut sink) = start(&l);
    assert_eq!(hw.valve(), Some(ValvePosition::Closed));
    assert_eq!(app.valve_position(), ValvePosition::Closed);

    hw.press_now();
    app.tick(&mut hw, &mut sink);

    assert_eq!(hw.valve(), Some(ValvePosition::Closed));
    assert_eq!(app.valve_position(), ValvePosition::Closed);
    assert_eq!(
        hw.valve_calls(),
        vec![ValvePosition::Closed, ValvePosition::Open, ValvePosition::Closed]
    );
}

// ── Fan and temperature ───────────────────────────────────────

#[test]
fn fan_follows_hysteresis() {
    let l = latch();
    let (mut app, mut hw, mut sink) = start(&l);
    hw.push_temperatures(&[
        TemperatureReading::Celsius(30.1),
        TemperatureReading::Celsius(29.0),
        TemperatureReading::Celsius(28.0),
    ]);

    iterate(&mut app, &mut hw, &mut sink);
    assert_eq!(app.fan_state(), FanState::On);
    assert_eq!(hw.row(1), "Temp:30.1CFAN:ON");

    iterate(&mut app, &mut hw, &mut sink);
    assert_eq!(app.fan_state(), FanState::On, "dead band holds state");

    iterate(&mut app, &mut hw, &mut sink);
    assert_eq!(app.fan_state(), FanState::Off);
    assert_eq!(hw.row(1), "Temp:28.0CREADY ");

    assert_eq!(hw.fan_calls(), vec![FanState::Off, FanState::On, FanState::Off]);
    assert_eq!(
        sink.count(|e| matches!(e, AppEvent::FanChanged(_))),
        2
    );
}

#[test]
fn disconnected_probe_shows_error_and_holds_fan() {
    let l = latch();
    let (mut app, mut hw, mut sink) = start(&l);
    hw.push_temperatures(&[
        TemperatureReading::Celsius(31.0),
        TemperatureReading::Disconnected,
    ]);

    iterate(&mut app, &mut hw, &mut sink);
    assert_eq!(app.fan_state(), FanState::On);

    iterate(&mut app, &mut hw, &mut sink);
    assert_eq!(&hw.row(1)[5..10], "ERROR");
    assert_eq!(app.fan_state(), FanState::On);
    assert_eq!(hw.fan_calls(), vec![FanState::Off, FanState::On]);
    assert_eq!(sink.count(|e| *e == AppEvent::TemperatureFault), 1);
    assert_eq!(last_status(&sink).temperature, TemperatureReading::Disconnected);
}
