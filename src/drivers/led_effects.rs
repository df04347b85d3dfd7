//! Status LED effects engine (flash, fade, breathing).
//!
//! The LED rests at a dim baseline and "breathes" — a slow sinusoidal
//! pulse around the baseline — whenever nothing else is going on. A
//! trigger plays a bright flash envelope; afterwards the level slews
//! smoothly back down. Slew rates are asymmetric: decreases run at
//! triple the rate of increases, so flashes die away crisply while
//! brightening stays gentle.
//!
//! `poll()` is pure: it returns the PWM level the channel should carry
//! and the hardware adapter applies it. All cross-call timing state
//! (slew mark, breathing angle) lives in named per-instance fields, so
//! two engines never share phase.

use super::sequencer::{Envelope, Phase, phase};

/// Slew evaluation interval.
const SLEW_INTERVAL_MS: u32 = 30;
/// PWM units added per slew step while brightening.
const RISE_STEP: u8 = 5;
/// PWM units removed per slew step while dimming.
const FALL_STEP: u8 = 15;

/// Bright flash: full brightness held for one second, then the target
/// falls back to the baseline and the slew fades it out.
static FLASH: [Phase; 1] = [phase(1000, 255)];

pub struct LedEffects {
    envelope: Envelope,
    /// Slewed level, chasing `target` one step per interval.
    current: u8,
    target: u8,
    baseline: u8,
    breath_period_ms: u32,
    breath_amplitude: u8,
    /// Breathing oscillation phase, radians in `[0, TAU)`.
    breath_angle: f32,
    last_step_ms: u32,
    /// Level last commanded on the channel.
    output: u8,
}

impl LedEffects {
    pub fn new(baseline: u8, breath_period_ms: u32, breath_amplitude: u8) -> Self {
        Self {
            envelope: Envelope::idle(),
            current: baseline,
            target: baseline,
            baseline,
            breath_period_ms: breath_period_ms.max(SLEW_INTERVAL_MS),
            breath_amplitude,
            breath_angle: 0.0,
            last_step_ms: 0,
            output: baseline,
        }
    }

    /// Flash to full brightness, overriding any effect in progress.
    pub fn trigger(&mut self, now_ms: u32) {
        self.envelope.trigger(now_ms, &FLASH);
    }

    /// Whether the level has settled on the resting baseline
    /// (i.e. the engine is idle apart from breathing).
    pub fn is_settled(&self) -> bool {
        !self.envelope.is_running() && self.current == self.baseline
    }

    /// Level the LED channel should carry right now.
    pub fn poll(&mut self, now_ms: u32) -> u8 {
        self.target = self.envelope.level_at(now_ms).unwrap_or(self.baseline);

        if now_ms.wrapping_sub(self.last_step_ms) < SLEW_INTERVAL_MS {
            return self.output;
        }
        self.last_step_ms = now_ms;

        if self.current != self.target {
            if self.current > self.target {
                self.current = self.current.saturating_sub(FALL_STEP).max(self.target);
            } else {
                self.current = self.current.saturating_add(RISE_STEP).min(self.target);
            }
            self.output = self.current;
        } else if self.target == self.baseline {
            // Settled at rest: drive the breathing pulse.
            let step = core::f32::consts::TAU
                * (SLEW_INTERVAL_MS as f32 / self.breath_period_ms as f32);
            self.breath_angle += step;
            if self.breath_angle >= core::f32::consts::TAU {
                self.breath_angle -= core::f32::consts::TAU;
            }
            let level = f32::from(self.baseline)
                + self.breath_angle.sin() * f32::from(self.breath_amplitude);
            self.output = level.clamp(0.0, 255.0) as u8;
        } else {
            self.output = self.current;
        }

        self.output
    }
}
