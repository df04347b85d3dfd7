//! Log-based event sink adapter.
//!
//! Implements [`EventSink`] by writing structured application events to
//! the ESP-IDF logger (which goes to UART / USB-CDC in production).
//! The cloud reporter implements the same trait for the remote side.

use log::info;

use crate::app::events::AppEvent;
use crate::app::ports::EventSink;

/// Adapter that logs every [`AppEvent`] to the serial console.
pub struct LogEventSink;

impl LogEventSink {
    pub fn new() -> Self {
        Self
    }
}

impl Default for LogEventSink {
    fn default() -> Self {
        Self::new()
    }
}

impl EventSink for LogEventSink {
    fn emit(&mut self, event: &AppEvent) {
        match event {
            AppEvent::Started(position) => {
                info!("START | position={}", position);
            }
            AppEvent::TargetChanged { from, to } => {
                info!("TARGET | {} -> {}", from, to);
            }
            AppEvent::MoveStopped { position } => {
                info!("STOP | position={}", position);
            }
            AppEvent::TargetReached(position) => {
                info!("ARRIVED | position={}", position);
            }
            AppEvent::AtLimit(position) => {
                info!("LIMIT | already at {}", position);
            }
            AppEvent::PositionReport(position) => {
                info!("REPORT | position={}", position);
            }
            AppEvent::MuteChanged(muted) => {
                info!("MUTE | {}", if *muted { "on" } else { "off" });
            }
            AppEvent::ConfigUpdated => {
                info!("CONFIG | updated");
            }
        }
    }
}
