//! Desk control service — the composition core.
//!
//! [`DeskService`] owns the click classifier, the motion controller and
//! both feedback sequencers, and runs them to completion within a
//! single polling pass: input → actuator → feedback, one `now_ms` per
//! tick, nothing blocking anywhere.  All I/O flows through port traits
//! injected at call sites, making the entire service testable with mock
//! adapters.
//!
//! ```text
//!   InputPort ──▶ ┌─────────────────────────────┐ ──▶ EventSink
//!                 │         DeskService          │
//! ActuatorPort ◀──│ Classifier · Motion · Cues   │
//!                 └─────────────────────────────┘
//! ```

use log::info;

use crate::config::SystemConfig;
use crate::control::motion::MotionController;
use crate::drivers::button::ClickClassifier;
use crate::drivers::buzzer::{BuzzerCue, BuzzerSequencer};
use crate::drivers::led_effects::LedEffects;

use super::commands::DeskCommand;
use super::events::AppEvent;
use super::ports::{ActuatorPort, EventSink, InputPort};

// ───────────────────────────────────────────────────────────────
// DeskService
// ───────────────────────────────────────────────────────────────

/// Orchestrates the entire control loop tick.
pub struct DeskService {
    classifier: ClickClassifier,
    motion: MotionController,
    buzzer: BuzzerSequencer,
    led: LedEffects,
    config: SystemConfig,
    /// Seconds per control tick (derived from config).
    tick_secs: f32,
    tick_count: u64,
    config_dirty: bool,
    dirty_since_tick: u64,
    /// Set by an explicit save request; bypasses the 5 s debounce.
    save_requested: bool,
}

impl DeskService {
    /// Construct the service from configuration.
    pub fn new(config: SystemConfig) -> Self {
        let tick_secs = config.control_loop_interval_ms as f32 / 1000.0;
        let classifier = ClickClassifier::new(config.debounce_ms, config.click_window_ms);
        let motion = MotionController::new(&config);
        let buzzer = BuzzerSequencer::new(config.buzzer_muted);
        let led = LedEffects::new(
            config.led_baseline,
            config.breath_period_ms,
            config.breath_amplitude,
        );

        Self {
            classifier,
            motion,
            buzzer,
            led,
            config,
            tick_secs,
            tick_count: 0,
            config_dirty: false,
            dirty_since_tick: 0,
            save_requested: false,
        }
    }

    // ── Lifecycle ─────────────────────────────────────────────

    pub fn start(&mut self, sink: &mut impl EventSink) {
        sink.emit(&AppEvent::Started(self.motion.position()));
        info!("DeskService started at position {}", self.motion.position());
    }

    // ── Per-tick orchestration ────────────────────────────────

    /// Run one full control cycle: sample input → classify → motion →
    /// feedback.  The `hw` parameter satisfies **both** [`InputPort`]
    /// and [`ActuatorPort`] — this avoids a double mutable borrow while
    /// keeping the port boundary explicit.
    pub fn tick(
        &mut self,
        now_ms: u32,
        hw: &mut (impl InputPort + ActuatorPort),
        sink: &mut impl EventSink,
    ) {
        self.tick_count += 1;

        // 1. Input: one raw sample per tick, fed to the classifier.
        let raw = hw.button_pressed();
        let clicks = self.classifier.poll(now_ms, raw);
        if clicks > 0 {
            self.handle_clicks(now_ms, clicks, hw, sink);
        }

        // 2. Actuator: at most one discrete step per step interval.
        if self.motion.poll(now_ms, hw) {
            self.buzzer.trigger(now_ms, BuzzerCue::TargetReached);
            self.led.trigger(now_ms);
            sink.emit(&AppEvent::TargetReached(self.motion.position()));
        }

        // 3. Feedback: sequencers decide, the port applies.
        hw.set_buzzer(self.buzzer.poll(now_ms));
        hw.set_led(self.led.poll(now_ms));
    }

    /// Click → action mapping: any click while moving stops the desk;
    /// at rest, a single click targets the top bound and a double click
    /// the bottom one. A click toward a bound the desk already sits at
    /// plays the fault cue instead.
    fn handle_clicks(
        &mut self,
        now_ms: u32,
        clicks: u8,
        hw: &mut impl ActuatorPort,
        sink: &mut impl EventSink,
    ) {
        if self.motion.is_moving() {
            self.motion.stop(hw);
            self.buzzer.trigger(now_ms, BuzzerCue::MoveStart);
            sink.emit(&AppEvent::MoveStopped {
                position: self.motion.position(),
            });
            info!("click: motion stopped at {}", self.motion.position());
            return;
        }

        // Bounds come from the motion controller, not the live config:
        // a runtime config update widens them only at the next boot.
        let goal = if clicks >= 2 {
            self.motion.min_height()
        } else {
            self.motion.max_height()
        };

        let from = self.motion.target();
        let before = self.motion.target_changes();
        self.motion.set_target(goal);
        if self.motion.target_changes() == before {
            self.buzzer.trigger(now_ms, BuzzerCue::Fault);
            sink.emit(&AppEvent::AtLimit(self.motion.position()));
            return;
        }
        self.buzzer.trigger(now_ms, BuzzerCue::MoveStart);
        self.led.trigger(now_ms);
        sink.emit(&AppEvent::TargetChanged {
            from,
            to: self.motion.target(),
        });
    }

    // ── Command handling ──────────────────────────────────────

    /// Process an external command (from the cloud link or serial).
    pub fn handle_command(
        &mut self,
        now_ms: u32,
        cmd: DeskCommand,
        hw: &mut impl ActuatorPort,
        sink: &mut impl EventSink,
    ) {
        match cmd {
            DeskCommand::SetTarget(t) => {
                let from = self.motion.target();
                let before = self.motion.target_changes();
                self.motion.set_target(t);
                if self.motion.target_changes() != before {
                    self.buzzer.trigger(now_ms, BuzzerCue::CloudBlip);
                    self.led.trigger(now_ms);
                    sink.emit(&AppEvent::TargetChanged {
                        from,
                        to: self.motion.target(),
                    });
                }
            }
            DeskCommand::Stop => {
                self.motion.stop(hw);
                sink.emit(&AppEvent::MoveStopped {
                    position: self.motion.position(),
                });
            }
            DeskCommand::SetMuted(muted) => {
                self.buzzer.set_muted(muted);
                if self.config.buzzer_muted != muted {
                    self.config.buzzer_muted = muted;
                    self.mark_config_dirty();
                }
                sink.emit(&AppEvent::MuteChanged(muted));
            }
            DeskCommand::UpdateConfig(new_config) => {
                // Mute applies live; timing/bounds take effect on the
                // next boot so a half-applied move cannot strand the
                // position outside the new bounds.
                self.buzzer.set_muted(new_config.buzzer_muted);
                self.config = new_config;
                self.mark_config_dirty();
                sink.emit(&AppEvent::ConfigUpdated);
                info!("Configuration updated at runtime");
            }
            DeskCommand::SaveConfig => {
                self.mark_config_dirty();
                self.save_requested = true;
                info!("Explicit config save requested");
            }
        }
    }

    // ── Queries ───────────────────────────────────────────────

    /// Current position, for the cloud reporter. Read-only — the
    /// motion controller owns the value.
    pub fn position(&self) -> i32 {
        self.motion.position()
    }

    pub fn target(&self) -> i32 {
        self.motion.target()
    }

    pub fn is_moving(&self) -> bool {
        self.motion.is_moving()
    }

    /// Instant (undebounced) button state — zero-latency accessor.
    pub fn is_button_pressed(&self) -> bool {
        self.classifier.is_pressed_now()
    }

    /// Total control ticks executed since startup.
    pub fn tick_count(&self) -> u64 {
        self.tick_count
    }

    /// Clone of the live configuration (for read-back or delta updates).
    pub fn current_config(&self) -> SystemConfig {
        self.config.clone()
    }

    // ── Config dirty-flag management ──────────────────────────

    /// Mark the config as modified.
    pub fn mark_config_dirty(&mut self) {
        if !self.config_dirty {
            self.config_dirty = true;
            self.dirty_since_tick = self.tick_count;
        }
    }

    /// Check if auto-save should trigger (5 seconds after last change).
    /// Returns `true` if the config was saved.
    pub fn auto_save_if_needed(&mut self, storage: &impl super::ports::ConfigPort) -> bool {
        if !self.config_dirty {
            return false;
        }
        if !self.save_requested {
            let ticks_since_dirty = self.tick_count.saturating_sub(self.dirty_since_tick);
            let secs_since_dirty = ticks_since_dirty as f32 * self.tick_secs;
            if secs_since_dirty < 5.0 {
                return false;
            }
        }
        match storage.save(&self.config) {
            Ok(()) => {
                self.config_dirty = false;
                self.save_requested = false;
                log::info!("Config auto-saved to NVS");
                true
            }
            Err(e) => {
                log::warn!("Config auto-save failed: {}", e);
                false
            }
        }
    }

    /// Force-save if dirty (call before shutdown).
    pub fn force_save_if_dirty(&mut self, storage: &impl super::ports::ConfigPort) {
        if !self.config_dirty {
            return;
        }
        match storage.save(&self.config) {
            Ok(()) => {
                self.config_dirty = false;
                self.save_requested = false;
                log::info!("Config force-saved before shutdown");
            }
            Err(e) => {
                log::warn!("Config force-save failed: {}", e);
            }
        }
    }

    /// Whether the config has unsaved changes.
    pub fn is_config_dirty(&self) -> bool {
        self.config_dirty
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::control::motion::Direction;

    struct NullHw;
    impl ActuatorPort for NullHw {
        fn set_motor(&mut self, _duty: u8, _dir: Direction) {}
        fn stop_motor(&mut self) {}
        fn set_move_indicators(&mut self, _up: bool, _down: bool) {}
        fn set_buzzer(&mut self, _level: u8) {}
        fn set_led(&mut self, _level: u8) {}
        fn all_off(&mut self) {}
    }

    struct VecSink(Vec<AppEvent>);
    impl EventSink for VecSink {
        fn emit(&mut self, event: &AppEvent) {
            self.0.push(*event);
        }
    }

    #[test]
    fn mute_command_updates_config_and_marks_dirty() {
        let mut svc = DeskService::new(SystemConfig::default());
        let mut sink = VecSink(Vec::new());
        svc.handle_command(0, DeskCommand::SetMuted(true), &mut NullHw, &mut sink);
        assert!(svc.current_config().buzzer_muted);
        assert!(svc.is_config_dirty());
        assert_eq!(sink.0, vec![AppEvent::MuteChanged(true)]);
    }

    #[test]
    fn explicit_save_bypasses_debounce() {
        use crate::app::ports::{ConfigError, ConfigPort};
        use std::cell::Cell;

        struct CountingStore(Cell<u32>);
        impl ConfigPort for CountingStore {
            fn load(&self) -> Result<SystemConfig, ConfigError> {
                Ok(SystemConfig::default())
            }
            fn save(&self, _config: &SystemConfig) -> Result<(), ConfigError> {
                self.0.set(self.0.get() + 1);
                Ok(())
            }
        }

        let mut svc = DeskService::new(SystemConfig::default());
        let mut sink = VecSink(Vec::new());
        let store = CountingStore(Cell::new(0));

        // A plain mute change waits out the 5 s debounce.
        svc.handle_command(0, DeskCommand::SetMuted(true), &mut NullHw, &mut sink);
        assert!(!svc.auto_save_if_needed(&store));
        assert_eq!(store.0.get(), 0);

        // An explicit save request flushes on the very next check.
        svc.handle_command(10, DeskCommand::SaveConfig, &mut NullHw, &mut sink);
        assert!(svc.auto_save_if_needed(&store));
        assert_eq!(store.0.get(), 1);
        assert!(!svc.is_config_dirty());
    }

    #[test]
    fn redundant_remote_target_emits_nothing() {
        let mut svc = DeskService::new(SystemConfig::default());
        let mut sink = VecSink(Vec::new());
        svc.handle_command(0, DeskCommand::SetTarget(40), &mut NullHw, &mut sink);
        svc.handle_command(10, DeskCommand::SetTarget(40), &mut NullHw, &mut sink);
        let changes = sink
            .0
            .iter()
            .filter(|e| matches!(e, AppEvent::TargetChanged { .. }))
            .count();
        assert_eq!(changes, 1);
    }
}
