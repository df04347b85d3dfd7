//! Port traits — the hexagonal boundary between the control core and
//! the outside world.
//!
//! ```text
//!   Adapter ──▶ Port trait ──▶ DeskService (domain)
//! ```
//!
//! The hardware adapter implements the input/actuator ports; the
//! [`DeskService`](super::service::DeskService) consumes them via
//! generics, so the timing core never touches a register and the whole
//! control loop runs under host tests with mock adapters.

use crate::config::SystemConfig;
use crate::control::motion::Direction;

// ───────────────────────────────────────────────────────────────
// Input port (driven adapter: hardware → domain)
// ───────────────────────────────────────────────────────────────

/// Read-side port: the domain samples the physical input each tick.
pub trait InputPort {
    /// Raw button level, `true` = pressed (the adapter resolves the
    /// active-low wiring). Must return immediately — no debounce here.
    fn button_pressed(&mut self) -> bool;
}

// ───────────────────────────────────────────────────────────────
// Actuator port (driven adapter: domain → hardware)
// ───────────────────────────────────────────────────────────────

/// Write-side port: the domain commands output channels through this.
///
/// # Safety contract
///
/// Implementations of [`set_motor`](ActuatorPort::set_motor) MUST zero
/// the opposite H-bridge channel in the same call — driving both sides
/// of the bridge simultaneously is a short-circuit, not a logic bug.
pub trait ActuatorPort {
    /// Drive the bridge at `duty` in the given direction; the opposite
    /// channel is forced to 0.
    fn set_motor(&mut self, duty: u8, dir: Direction);

    /// Zero both bridge channels.
    fn stop_motor(&mut self);

    /// Direction indicator LEDs (up, down).
    fn set_move_indicators(&mut self, up: bool, down: bool);

    /// Buzzer PWM level (0 = silent, 255 = full, low values = soft).
    fn set_buzzer(&mut self, level: u8);

    /// Status LED PWM level.
    fn set_led(&mut self, level: u8);

    /// Kill every output — safe shutdown.
    fn all_off(&mut self);
}

// ───────────────────────────────────────────────────────────────
// Event sink port (driven adapter: domain → logging / telemetry)
// ───────────────────────────────────────────────────────────────

/// The domain emits structured [`AppEvent`](super::events::AppEvent)s
/// through this port.  Adapters decide where they go (serial log,
/// cloud link, etc.).
pub trait EventSink {
    fn emit(&mut self, event: &super::events::AppEvent);
}

/// Duplicates every event to two sinks, so the main loop can feed the
/// serial log and the cloud link from a single emit.
pub struct FanoutSink<A: EventSink, B: EventSink>(pub A, pub B);

impl<A: EventSink, B: EventSink> EventSink for FanoutSink<A, B> {
    fn emit(&mut self, event: &super::events::AppEvent) {
        self.0.emit(event);
        self.1.emit(event);
    }
}

// ───────────────────────────────────────────────────────────────
// Configuration port (driven adapter: domain ↔ persistent config)
// ───────────────────────────────────────────────────────────────

/// Loads and persists system configuration.
///
/// Implementations MUST validate config values before persisting.
/// Invalid ranges are rejected with [`ConfigError::ValidationFailed`],
/// not silently clamped — a compromised remote channel must not be able
/// to inject dangerous operating parameters (e.g. position bounds that
/// overdrive the lift columns).
pub trait ConfigPort {
    /// Load configuration from persistent storage.
    /// Returns [`SystemConfig::default()`] if no stored config exists.
    fn load(&self) -> Result<SystemConfig, ConfigError>;

    /// Validate and persist configuration.
    fn save(&self, config: &SystemConfig) -> Result<(), ConfigError>;
}

// ───────────────────────────────────────────────────────────────
// Error types
// ───────────────────────────────────────────────────────────────

/// Errors from [`ConfigPort`] operations.
#[derive(Debug)]
pub enum ConfigError {
    /// No config found in storage (first boot).
    NotFound,
    /// Stored config failed integrity / deserialization check.
    Corrupted,
    /// A config field failed range validation.
    /// The `&'static str` describes which field and why.
    ValidationFailed(&'static str),
    /// Generic I/O error from the storage backend.
    IoError,
}

impl core::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::NotFound => write!(f, "config not found"),
            Self::Corrupted => write!(f, "config corrupted"),
            Self::ValidationFailed(msg) => write!(f, "validation failed: {}", msg),
            Self::IoError => write!(f, "I/O error"),
        }
    }
}
