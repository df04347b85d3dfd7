//! Position controller for the lift motor (L298N H-bridge).
//!
//! Owns the desk position exclusively: one discrete step per step
//! interval toward the clamped target, with the drive duty ramping up
//! linearly from zero at motion start and dropping to zero on the step
//! where the target is reached. The ramp does not reset between steps
//! of a single move, so multi-step travel accelerates smoothly instead
//! of jerking per step.
//!
//! ## Safety contract
//!
//! The two H-bridge channels must never be driven simultaneously
//! (shoot-through). The controller only ever commands the bridge through
//! [`ActuatorPort::set_motor`], which drives one channel and zeroes the
//! opposite one in the same call.

use log::info;

use crate::app::ports::ActuatorPort;
use crate::config::SystemConfig;

const MAX_DRIVE: u8 = 255;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Up,
    Down,
}

pub struct MotionController {
    current: i32,
    target: i32,
    min_height: i32,
    max_height: i32,
    step_interval_ms: u32,
    ramp_step: u8,
    /// Duty currently commanded on the active bridge channel.
    drive: u8,
    last_step_ms: u32,
    /// Accepted (deduplicated) target changes since boot.
    target_changes: u32,
}

impl MotionController {
    pub fn new(config: &SystemConfig) -> Self {
        let start = config
            .start_height
            .clamp(config.min_height, config.max_height);
        Self {
            current: start,
            target: start,
            min_height: config.min_height,
            max_height: config.max_height,
            step_interval_ms: config.step_interval_ms,
            ramp_step: config.ramp_step,
            drive: 0,
            last_step_ms: 0,
            target_changes: 0,
        }
    }

    /// Request a new target position. The value is clamped into the
    /// configured bounds at assignment time; a request that clamps to
    /// the current target is silently ignored.
    pub fn set_target(&mut self, target: i32) {
        let clamped = target.clamp(self.min_height, self.max_height);
        if clamped != self.target {
            self.target = clamped;
            self.target_changes += 1;
            info!(
                "motion: new target -> {} (current: {})",
                self.target, self.current
            );
        }
    }

    /// Immediately kill the drive, both bridge channels and both
    /// indicators, and cancel any pending motion. Idempotent.
    pub fn stop(&mut self, hw: &mut impl ActuatorPort) {
        self.drive = 0;
        hw.stop_motor();
        hw.set_move_indicators(false, false);
        self.target = self.current;
    }

    /// Advance the motion loop. Runs at most one step per step
    /// interval; off-interval calls return immediately.
    ///
    /// Returns `true` on the poll where the target is reached.
    pub fn poll(&mut self, now_ms: u32, hw: &mut impl ActuatorPort) -> bool {
        if self.current == self.target {
            return false;
        }
        if now_ms.wrapping_sub(self.last_step_ms) < self.step_interval_ms {
            return false;
        }
        self.last_step_ms = now_ms;

        if self.current < self.target {
            self.drive = self.drive.saturating_add(self.ramp_step).min(MAX_DRIVE);
            hw.set_motor(self.drive, Direction::Up);
            hw.set_move_indicators(true, false);
            self.current += 1;
        } else {
            self.drive = self.drive.saturating_add(self.ramp_step).min(MAX_DRIVE);
            hw.set_motor(self.drive, Direction::Down);
            hw.set_move_indicators(false, true);
            self.current -= 1;
        }

        // Decelerate to a full stop exactly on arrival.
        if self.current == self.target {
            self.stop(hw);
            info!("motion: target {} reached", self.current);
            return true;
        }
        false
    }

    pub fn is_moving(&self) -> bool {
        self.current != self.target
    }

    /// Read accessor for the position — the coordination layer reports
    /// through this rather than aliasing the value.
    pub fn position(&self) -> i32 {
        self.current
    }

    pub fn target(&self) -> i32 {
        self.target
    }

    /// Lower travel bound the controller actually enforces.
    pub fn min_height(&self) -> i32 {
        self.min_height
    }

    /// Upper travel bound the controller actually enforces.
    pub fn max_height(&self) -> i32 {
        self.max_height
    }

    pub fn drive_level(&self) -> u8 {
        self.drive
    }

    /// Accepted target changes since boot (no-op requests excluded).
    pub fn target_changes(&self) -> u32 {
        self.target_changes
    }
}
