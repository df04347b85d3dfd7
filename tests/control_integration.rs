//! Integration tests: DeskService → drivers → actuators.
//!
//! Each scenario drives the whole service through its public tick API
//! with a scripted button line and a recording mock of the actuator
//! port, then asserts on the emitted events and hardware call trace.

use desklift::app::commands::DeskCommand;
use desklift::app::events::AppEvent;
use desklift::app::ports::{ActuatorPort, EventSink, InputPort};
use desklift::app::service::DeskService;
use desklift::config::SystemConfig;
use desklift::control::motion::Direction;

// ── Mock implementations ──────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ActCall {
    SetMotor { duty: u8, up: bool },
    StopMotor,
    Indicators { up: bool, down: bool },
}

struct MockHw {
    raw_pressed: bool,
    calls: Vec<ActCall>,
    buzzer_levels: Vec<u8>,
    led_levels: Vec<u8>,
}

impl MockHw {
    fn new() -> Self {
        Self {
            raw_pressed: false,
            calls: Vec::new(),
            buzzer_levels: Vec::new(),
            led_levels: Vec::new(),
        }
    }

    fn motor_calls(&self) -> Vec<(u8, bool)> {
        self.calls
            .iter()
            .filter_map(|c| match c {
                ActCall::SetMotor { duty, up } => Some((*duty, *up)),
                _ => None,
            })
            .collect()
    }
}

impl InputPort for MockHw {
    fn button_pressed(&mut self) -> bool {
        self.raw_pressed
    }
}

impl ActuatorPort for MockHw {
    fn set_motor(&mut self, duty: u8, dir: Direction) {
        self.calls.push(ActCall::SetMotor {
            duty,
            up: dir == Direction::Up,
        });
    }
    fn stop_motor(&mut self) {
        self.calls.push(ActCall::StopMotor);
    }
    fn set_move_indicators(&mut self, up: bool, down: bool) {
        self.calls.push(ActCall::Indicators { up, down });
    }
    fn set_buzzer(&mut self, level: u8) {
        self.buzzer_levels.push(level);
    }
    fn set_led(&mut self, level: u8) {
        self.led_levels.push(level);
    }
    fn all_off(&mut self) {}
}

struct RecordingSink(Vec<AppEvent>);

impl EventSink for RecordingSink {
    fn emit(&mut self, event: &AppEvent) {
        self.0.push(*event);
    }
}

// ── Harness ───────────────────────────────────────────────────

const TICK_MS: u32 = 10;

/// Tick the service over `[start, end)` with the button held at `raw`.
fn run(
    svc: &mut DeskService,
    hw: &mut MockHw,
    sink: &mut RecordingSink,
    start: u32,
    end: u32,
    raw: bool,
) {
    hw.raw_pressed = raw;
    let mut t = start;
    while t < end {
        svc.tick(t, hw, sink);
        t += TICK_MS;
    }
}

fn has_event(sink: &RecordingSink, pred: impl Fn(&AppEvent) -> bool) -> bool {
    sink.0.iter().any(pred)
}

// ── Scenarios ─────────────────────────────────────────────────

#[test]
fn single_click_drives_desk_to_top() {
    let mut svc = DeskService::new(SystemConfig::default());
    let mut hw = MockHw::new();
    let mut sink = RecordingSink(Vec::new());

    // Press for 100 ms, release, then let the desk travel.
    run(&mut svc, &mut hw, &mut sink, 0, 100, true);
    run(&mut svc, &mut hw, &mut sink, 100, 20_000, false);

    assert_eq!(svc.position(), 100);
    assert!(!svc.is_moving());
    assert!(has_event(&sink, |e| matches!(
        e,
        AppEvent::TargetChanged { from: 0, to: 100 }
    )));
    assert!(has_event(&sink, |e| *e == AppEvent::TargetReached(100)));

    // Ramp: the first motor steps climb by ramp_step, all upward.
    let motor = hw.motor_calls();
    assert_eq!(&motor[..3], &[(15, true), (30, true), (45, true)]);
    // Arrival zeroes the drive within the same step.
    assert!(hw.calls.contains(&ActCall::StopMotor));
}

#[test]
fn click_while_moving_stops_the_desk() {
    let mut svc = DeskService::new(SystemConfig::default());
    let mut hw = MockHw::new();
    let mut sink = RecordingSink(Vec::new());

    // First click starts the move toward the top.
    run(&mut svc, &mut hw, &mut sink, 0, 100, true);
    run(&mut svc, &mut hw, &mut sink, 100, 2_000, false);
    assert!(svc.is_moving());
    let pos_before = svc.position();

    // Second click lands mid-travel.
    run(&mut svc, &mut hw, &mut sink, 2_000, 2_100, true);
    run(&mut svc, &mut hw, &mut sink, 2_100, 3_000, false);

    assert!(!svc.is_moving());
    // Position freezes where the click was classified (± one step).
    assert!((svc.position() - pos_before).abs() <= 7);
    assert!(has_event(&sink, |e| matches!(e, AppEvent::MoveStopped { .. })));
    // No arrival: the desk never reached the top.
    assert!(!has_event(&sink, |e| *e == AppEvent::TargetReached(100)));
}

#[test]
fn double_click_from_top_returns_to_bottom() {
    let config = SystemConfig {
        start_height: 100,
        ..Default::default()
    };
    let mut svc = DeskService::new(config);
    let mut hw = MockHw::new();
    let mut sink = RecordingSink(Vec::new());

    // Two presses within the window.
    run(&mut svc, &mut hw, &mut sink, 0, 70, true);
    run(&mut svc, &mut hw, &mut sink, 70, 140, false);
    run(&mut svc, &mut hw, &mut sink, 140, 280, true);
    run(&mut svc, &mut hw, &mut sink, 280, 20_000, false);

    assert_eq!(svc.position(), 0);
    assert!(has_event(&sink, |e| *e == AppEvent::TargetReached(0)));
    // All the travel was downward.
    assert!(hw.motor_calls().iter().all(|&(_, up)| !up));
}

#[test]
fn click_at_limit_plays_fault_cue_and_stays_put() {
    // Desk already at the bottom; a double click has nowhere to go.
    let mut svc = DeskService::new(SystemConfig::default());
    let mut hw = MockHw::new();
    let mut sink = RecordingSink(Vec::new());

    run(&mut svc, &mut hw, &mut sink, 0, 70, true);
    run(&mut svc, &mut hw, &mut sink, 70, 140, false);
    run(&mut svc, &mut hw, &mut sink, 140, 280, true);
    run(&mut svc, &mut hw, &mut sink, 280, 1_500, false);

    assert_eq!(svc.position(), 0);
    assert!(hw.motor_calls().is_empty(), "motor must not be touched");
    assert!(has_event(&sink, |e| *e == AppEvent::AtLimit(0)));
    // The fault cue drove the buzzer at full level at least once.
    assert!(hw.buzzer_levels.iter().any(|&l| l == 255));
}

#[test]
fn widened_bounds_apply_at_next_boot_not_to_clicks() {
    // Desk parked at the top; a runtime config update widens the travel
    // range, but the motion controller keeps its boot-time bounds, so a
    // single click still reports at-limit instead of a phantom move.
    let config = SystemConfig {
        start_height: 100,
        ..SystemConfig::default()
    };
    let mut svc = DeskService::new(config.clone());
    let mut hw = MockHw::new();
    let mut sink = RecordingSink(Vec::new());

    let widened = SystemConfig {
        max_height: 120,
        ..config
    };
    svc.handle_command(0, DeskCommand::UpdateConfig(widened), &mut hw, &mut sink);

    run(&mut svc, &mut hw, &mut sink, 0, 110, true);
    run(&mut svc, &mut hw, &mut sink, 110, 1_500, false);

    assert_eq!(svc.position(), 100);
    assert!(hw.motor_calls().is_empty(), "motor must not be touched");
    assert!(has_event(&sink, |e| *e == AppEvent::AtLimit(100)));
    assert!(
        !has_event(&sink, |e| matches!(e, AppEvent::TargetChanged { .. })),
        "no target change may be announced at the limit"
    );
    // Fault cue, not the move-start cue.
    assert!(hw.buzzer_levels.iter().any(|&l| l == 255));
}

#[test]
fn mute_suppresses_all_cues() {
    let mut svc = DeskService::new(SystemConfig::default());
    let mut hw = MockHw::new();
    let mut sink = RecordingSink(Vec::new());

    svc.handle_command(0, DeskCommand::SetMuted(true), &mut hw, &mut sink);

    // At-limit double click would normally play the fault cue.
    run(&mut svc, &mut hw, &mut sink, 0, 70, true);
    run(&mut svc, &mut hw, &mut sink, 70, 140, false);
    run(&mut svc, &mut hw, &mut sink, 140, 280, true);
    run(&mut svc, &mut hw, &mut sink, 280, 1_500, false);

    assert!(hw.buzzer_levels.iter().all(|&l| l == 0));
    assert!(has_event(&sink, |e| *e == AppEvent::MuteChanged(true)));
}

#[test]
fn remote_target_moves_desk_without_button() {
    let mut svc = DeskService::new(SystemConfig::default());
    let mut hw = MockHw::new();
    let mut sink = RecordingSink(Vec::new());

    svc.handle_command(0, DeskCommand::SetTarget(5), &mut hw, &mut sink);
    run(&mut svc, &mut hw, &mut sink, 0, 2_000, false);

    assert_eq!(svc.position(), 5);
    assert!(!svc.is_moving());
    assert!(has_event(&sink, |e| matches!(
        e,
        AppEvent::TargetChanged { from: 0, to: 5 }
    )));
    assert!(has_event(&sink, |e| *e == AppEvent::TargetReached(5)));
}

#[test]
fn remote_stop_freezes_motion() {
    let mut svc = DeskService::new(SystemConfig::default());
    let mut hw = MockHw::new();
    let mut sink = RecordingSink(Vec::new());

    svc.handle_command(0, DeskCommand::SetTarget(100), &mut hw, &mut sink);
    run(&mut svc, &mut hw, &mut sink, 0, 1_000, false);
    assert!(svc.is_moving());

    svc.handle_command(1_000, DeskCommand::Stop, &mut hw, &mut sink);
    assert!(!svc.is_moving());
    assert_eq!(svc.target(), svc.position());

    // Further ticks must not restart the motor.
    let motor_calls_before = hw.motor_calls().len();
    run(&mut svc, &mut hw, &mut sink, 1_000, 3_000, false);
    assert_eq!(hw.motor_calls().len(), motor_calls_before);
}

#[test]
fn instant_button_state_has_no_debounce_lag() {
    let mut svc = DeskService::new(SystemConfig::default());
    let mut hw = MockHw::new();
    let mut sink = RecordingSink(Vec::new());

    hw.raw_pressed = true;
    svc.tick(0, &mut hw, &mut sink);
    assert!(svc.is_button_pressed(), "raw view must not wait for debounce");

    hw.raw_pressed = false;
    svc.tick(10, &mut hw, &mut sink);
    assert!(!svc.is_button_pressed());
}

#[test]
fn led_breathes_when_idle_and_flashes_on_trigger() {
    let mut svc = DeskService::new(SystemConfig::default());
    let mut hw = MockHw::new();
    let mut sink = RecordingSink(Vec::new());

    // Idle long enough to cover a full breathing period.
    run(&mut svc, &mut hw, &mut sink, 0, 4_000, false);
    let idle_max = *hw.led_levels.iter().max().unwrap();
    let idle_min = *hw.led_levels.iter().min().unwrap();
    assert!(idle_max > 30, "breathing must rise above the baseline");
    assert!(idle_min < 20, "breathing must dip below the baseline");
    assert!(idle_max < 100, "idle glow must stay dim");

    // A remote move flashes the LED well above the idle glow.
    hw.led_levels.clear();
    svc.handle_command(4_000, DeskCommand::SetTarget(3), &mut hw, &mut sink);
    run(&mut svc, &mut hw, &mut sink, 4_000, 6_000, false);
    assert!(hw.led_levels.iter().any(|&l| l > 120));
}
