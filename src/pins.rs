//! GPIO / peripheral pin assignments for the DeskLift main board.
//!
//! Single source of truth — every driver references this module rather than
//! hard-coding pin numbers.  Change a pin here and it propagates everywhere.

// ---------------------------------------------------------------------------
// Lift motor driver (L298N H-bridge)
// ---------------------------------------------------------------------------

/// LEDC PWM channel driving IN1 — raises the desk when non-zero.
pub const MOTOR_UP_GPIO: i32 = 1;
/// LEDC PWM channel driving IN2 — lowers the desk when non-zero.
/// Never driven simultaneously with IN1 (shoot-through hazard).
pub const MOTOR_DOWN_GPIO: i32 = 2;

// ---------------------------------------------------------------------------
// Direction indicator LEDs (digital, active HIGH)
// ---------------------------------------------------------------------------

/// Lit while the desk is moving up.
pub const INDICATOR_UP_GPIO: i32 = 7;
/// Lit while the desk is moving down.
pub const INDICATOR_DOWN_GPIO: i32 = 8;

// ---------------------------------------------------------------------------
// Feedback outputs
// ---------------------------------------------------------------------------

/// Active buzzer — LEDC PWM so soft "blip" levels work alongside full on/off.
pub const BUZZER_GPIO: i32 = 4;
/// Status LED — full PWM range for the breathing/fade effects.
pub const LED_GPIO: i32 = 5;

// ---------------------------------------------------------------------------
// User button (active-low with internal pull-up)
// ---------------------------------------------------------------------------

/// Momentary push-button, level-polled each control tick.
pub const BUTTON_GPIO: i32 = 16;

// ---------------------------------------------------------------------------
// PWM configuration
// ---------------------------------------------------------------------------

/// LEDC base frequency for the lift motor (25 kHz — inaudible).
pub const MOTOR_PWM_FREQ_HZ: u32 = 25_000;
/// LEDC base frequency for buzzer and status LED (1 kHz).
pub const FEEDBACK_PWM_FREQ_HZ: u32 = 1_000;
