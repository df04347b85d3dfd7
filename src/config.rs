//! System configuration parameters
//!
//! All tunable parameters for the DeskLift controller.
//! Values can be overridden via NVS (non-volatile storage) or the cloud link.

use serde::{Deserialize, Serialize};

/// Core system configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SystemConfig {
    // --- Button ---
    /// Debounce interval: a raw reading must stay stable this long (ms)
    pub debounce_ms: u32,
    /// Click classification window after a press edge (ms)
    pub click_window_ms: u32,

    // --- Motion ---
    /// Interval between discrete position steps (ms)
    pub step_interval_ms: u32,
    /// Drive duty added per step while ramping (0-255 scale)
    pub ramp_step: u8,
    /// Lowest reachable position (steps)
    pub min_height: i32,
    /// Highest reachable position (steps)
    pub max_height: i32,
    /// Position assumed at boot (steps)
    pub start_height: i32,

    // --- Feedback ---
    /// Suppress all buzzer output
    pub buzzer_muted: bool,
    /// LED resting PWM level the breathing pulse oscillates around
    pub led_baseline: u8,
    /// Full breathing oscillation period (ms)
    pub breath_period_ms: u32,
    /// Peak deviation of the breathing pulse from the baseline (PWM units)
    pub breath_amplitude: u8,

    // --- Timing ---
    /// Control loop interval (milliseconds)
    pub control_loop_interval_ms: u32,
    /// Position report interval for the cloud link (seconds)
    pub report_interval_secs: u32,
}

impl Default for SystemConfig {
    fn default() -> Self {
        Self {
            // Button
            debounce_ms: 50,
            click_window_ms: 250,

            // Motion
            step_interval_ms: 100,
            ramp_step: 15,
            min_height: 0,
            max_height: 100,
            start_height: 0,

            // Feedback
            buzzer_muted: false,
            led_baseline: 25,
            breath_period_ms: 3800,
            breath_amplitude: 20,

            // Timing
            control_loop_interval_ms: 10, // 100 Hz
            report_interval_secs: 30,
        }
    }
}
