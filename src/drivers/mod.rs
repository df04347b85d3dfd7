//! Device-level drivers: pure decision logic for the button, buzzer
//! and LED, plus the hardware bring-up helpers used on target.

pub mod button;
pub mod buzzer;
pub mod hw_init;
pub mod hw_timer;
pub mod led_effects;
pub mod sequencer;
pub mod watchdog;
