//! Cloud link adapter.
//!
//! Publishes position reports upstream and stages remote target
//! commands for the control loop. The transport is a trait so the
//! firmware runs identically with a real backend, the serial console,
//! or nothing connected at all.
//!
//! Remote commands arrive on the transport's own task. The callback
//! never touches the service directly: it stages the value in a pair
//! of atomics and pushes [`Event::CloudCommand`], and the main loop
//! collects it with [`take_pending_target`] on its next iteration.

use core::fmt::Write;
use core::sync::atomic::{AtomicBool, AtomicI32, Ordering};

use log::{info, warn};
use serde::Serialize;

use crate::app::events::AppEvent;
use crate::app::ports::EventSink;
use crate::error::CloudError;
use crate::events::{push_event, Event};

// ── Remote command staging ────────────────────────────────────

static PENDING_TARGET: AtomicI32 = AtomicI32::new(0);
static HAS_PENDING: AtomicBool = AtomicBool::new(false);

/// Stage a remote target height. Callable from any task context.
pub fn remote_target_callback(height: i32) {
    PENDING_TARGET.store(height, Ordering::Relaxed);
    HAS_PENDING.store(true, Ordering::Release);
    push_event(Event::CloudCommand);
}

/// Collect the staged remote target, if any. Main loop only.
pub fn take_pending_target() -> Option<i32> {
    if HAS_PENDING.swap(false, Ordering::Acquire) {
        Some(PENDING_TARGET.load(Ordering::Relaxed))
    } else {
        None
    }
}

// ── Transport abstraction ─────────────────────────────────────

/// Upstream channel for position reports.
pub trait CloudTransport {
    /// Send one serialized report. Non-blocking; a transport that is
    /// not yet connected returns [`CloudError::NotReady`].
    fn publish(&mut self, payload: &str) -> Result<(), CloudError>;

    /// Whether the transport currently has an upstream connection.
    fn is_connected(&self) -> bool;
}

/// A null transport that discards all reports.
/// Useful as a default when no cloud backend is configured.
pub struct NullTransport;

impl CloudTransport for NullTransport {
    fn publish(&mut self, _payload: &str) -> Result<(), CloudError> {
        Ok(())
    }

    fn is_connected(&self) -> bool {
        false
    }
}

// ── Report payload ────────────────────────────────────────────

#[derive(Debug, Serialize)]
struct PositionReport {
    position: i32,
    target: i32,
    moving: bool,
    uptime_secs: u64,
}

// ── Cloud link ────────────────────────────────────────────────

/// Owns the transport and renders [`AppEvent`]s into wire payloads.
pub struct CloudLink<T: CloudTransport> {
    transport: T,
    reports_sent: u32,
    reports_dropped: u32,
}

impl<T: CloudTransport> CloudLink<T> {
    pub fn new(transport: T) -> Self {
        Self {
            transport,
            reports_sent: 0,
            reports_dropped: 0,
        }
    }

    /// Publish a full position report.
    pub fn report(
        &mut self,
        position: i32,
        target: i32,
        moving: bool,
        uptime_secs: u64,
    ) -> Result<(), CloudError> {
        if !self.transport.is_connected() {
            self.reports_dropped += 1;
            return Err(CloudError::NotReady);
        }
        let payload = PositionReport {
            position,
            target,
            moving,
            uptime_secs,
        };
        let json = serde_json::to_string(&payload).map_err(|_| CloudError::PublishFailed)?;
        match self.transport.publish(&json) {
            Ok(()) => {
                self.reports_sent += 1;
                Ok(())
            }
            Err(e) => {
                self.reports_dropped += 1;
                warn!("CloudLink: publish failed: {}", e);
                Err(e)
            }
        }
    }

    pub fn reports_sent(&self) -> u32 {
        self.reports_sent
    }

    pub fn reports_dropped(&self) -> u32 {
        self.reports_dropped
    }
}

/// [`EventSink`] half of the cloud link: forwards position updates as
/// lightweight JSON notifications, quietly dropping them when offline.
impl<T: CloudTransport> EventSink for CloudLink<T> {
    fn emit(&mut self, event: &AppEvent) {
        if !self.transport.is_connected() {
            return;
        }
        // Fixed-capacity buffer: notifications are tiny and this path
        // must not allocate.
        let mut payload: heapless::String<96> = heapless::String::new();
        let rendered = match event {
            AppEvent::TargetReached(pos) => {
                write!(payload, "{{\"event\":\"arrived\",\"position\":{}}}", pos)
            }
            AppEvent::MoveStopped { position } => {
                write!(payload, "{{\"event\":\"stopped\",\"position\":{}}}", position)
            }
            _ => return,
        };
        if rendered.is_err() {
            return;
        }
        match self.transport.publish(&payload) {
            Err(e) => warn!("CloudLink: event publish failed: {}", e),
            Ok(()) => info!("CloudLink: event forwarded"),
        }
    }
}
