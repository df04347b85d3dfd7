//! Outbound application events.
//!
//! The [`DeskService`](super::service::DeskService) emits these through
//! the [`EventSink`](super::ports::EventSink) port.  Adapters on the
//! other side decide what to do with them — log to serial, publish over
//! the cloud link, etc.

/// Structured events emitted by the control core.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppEvent {
    /// The service has started (carries the boot position).
    Started(i32),

    /// The target position changed (after clamping).
    TargetChanged { from: i32, to: i32 },

    /// Motion was cancelled before reaching the target.
    MoveStopped { position: i32 },

    /// The desk arrived at its target.
    TargetReached(i32),

    /// A click tried to move past a bound the desk already sits at.
    AtLimit(i32),

    /// Periodic position report (for the cloud link).
    PositionReport(i32),

    /// Buzzer mute state changed.
    MuteChanged(bool),

    /// Configuration was hot-reloaded.
    ConfigUpdated,
}
