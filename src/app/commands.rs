//! Inbound commands to the application service.
//!
//! These represent actions requested by the outside world (cloud link,
//! serial console) that the [`DeskService`](super::service::DeskService)
//! interprets and acts upon. Local button input takes the faster path
//! through the classifier inside `tick()` and never becomes a command.

use crate::config::SystemConfig;

/// Commands that external adapters can send into the control core.
#[derive(Debug, Clone)]
pub enum DeskCommand {
    /// Move to an absolute position (clamped into the configured bounds).
    SetTarget(i32),

    /// Cancel any motion in progress immediately.
    Stop,

    /// Mute or unmute the buzzer.
    SetMuted(bool),

    /// Hot-reload configuration (e.g. from the cloud link or NVS).
    UpdateConfig(SystemConfig),

    /// Explicitly persist the current config to NVS.
    SaveConfig,
}
