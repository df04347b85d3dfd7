//! Hardware adapter — bridges real peripherals to domain port traits.
//!
//! Implements [`InputPort`] and [`ActuatorPort`] on top of the raw
//! `hw_init` GPIO/LEDC helpers.  This is the only module in the system
//! that touches actual hardware.  On non-espidf targets the helpers are
//! cfg-gated simulation stubs, so the adapter runs unchanged in tests.

use crate::app::ports::{ActuatorPort, InputPort};
use crate::control::motion::Direction;
use crate::drivers::hw_init::{
    gpio_read, gpio_write, ledc_set, LEDC_CH_BUZZER, LEDC_CH_LED, LEDC_CH_MOTOR_DOWN,
    LEDC_CH_MOTOR_UP,
};
use crate::pins;

/// Concrete adapter that combines all hardware behind port traits.
pub struct HardwareAdapter;

impl HardwareAdapter {
    pub fn new() -> Self {
        Self
    }
}

impl Default for HardwareAdapter {
    fn default() -> Self {
        Self::new()
    }
}

// ── InputPort implementation ──────────────────────────────────

impl InputPort for HardwareAdapter {
    fn button_pressed(&mut self) -> bool {
        // Active-low: pull-up idles high, a press pulls the line to GND.
        !gpio_read(pins::BUTTON_GPIO)
    }
}

// ── ActuatorPort implementation ───────────────────────────────

impl ActuatorPort for HardwareAdapter {
    fn set_motor(&mut self, duty: u8, dir: Direction) {
        // The opposite bridge half is zeroed before the driven half is
        // raised, so both PWM channels are never high together even for
        // one register write.
        let (drive, idle) = match dir {
            Direction::Up => (LEDC_CH_MOTOR_UP, LEDC_CH_MOTOR_DOWN),
            Direction::Down => (LEDC_CH_MOTOR_DOWN, LEDC_CH_MOTOR_UP),
        };
        ledc_set(idle, 0);
        ledc_set(drive, duty);
    }

    fn stop_motor(&mut self) {
        ledc_set(LEDC_CH_MOTOR_UP, 0);
        ledc_set(LEDC_CH_MOTOR_DOWN, 0);
    }

    fn set_move_indicators(&mut self, up: bool, down: bool) {
        gpio_write(pins::INDICATOR_UP_GPIO, up);
        gpio_write(pins::INDICATOR_DOWN_GPIO, down);
    }

    fn set_buzzer(&mut self, level: u8) {
        ledc_set(LEDC_CH_BUZZER, level);
    }

    fn set_led(&mut self, level: u8) {
        ledc_set(LEDC_CH_LED, level);
    }

    fn all_off(&mut self) {
        self.stop_motor();
        self.set_move_indicators(false, false);
        ledc_set(LEDC_CH_BUZZER, 0);
        ledc_set(LEDC_CH_LED, 0);
    }
}
