//! Unified error types for the DeskLift firmware.
//!
//! The control core itself has no fallible operations — out-of-range
//! targets clamp, redundant commands are no-ops, extra clicks saturate.
//! What remains fallible is the boot path (peripheral init, config load)
//! and the cloud link, and those funnel into this single enum so the
//! top-level error handling stays uniform.  All variants are `Copy`.

use core::fmt;

/// Every fallible operation in the firmware funnels into this type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Error {
    /// Peripheral initialisation failed.
    Init(&'static str),
    /// Configuration is invalid or could not be loaded.
    Config(&'static str),
    /// The cloud link failed.
    Cloud(CloudError),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Init(msg) => write!(f, "init: {msg}"),
            Self::Config(msg) => write!(f, "config: {msg}"),
            Self::Cloud(e) => write!(f, "cloud: {e}"),
        }
    }
}

// ---------------------------------------------------------------------------
// Cloud link errors
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CloudError {
    /// The transport has not established its session/stream yet.
    NotReady,
    /// A publish was attempted and the transport rejected it.
    PublishFailed,
    /// The change-stream subscription could not be established.
    StreamFailed,
}

impl fmt::Display for CloudError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotReady => write!(f, "link not ready"),
            Self::PublishFailed => write!(f, "publish failed"),
            Self::StreamFailed => write!(f, "stream subscription failed"),
        }
    }
}

impl From<CloudError> for Error {
    fn from(e: CloudError) -> Self {
        Self::Cloud(e)
    }
}

// ---------------------------------------------------------------------------
// Convenience Result alias
// ---------------------------------------------------------------------------

/// Firmware-wide `Result` alias.
pub type Result<T> = core::result::Result<T, Error>;
