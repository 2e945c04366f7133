//! Unified error type for the LaserLift controller.
//!
//! Almost nothing in the run-time path can fail: unknown events are ignored
//! and out-of-range values are clamped where they are used.  What remains is
//! start-up (a service that cannot receive its first event) and configuration
//! (a tunable set that would break a component invariant).  All variants are
//! `Copy` so they can be handed to the event sink without allocation.

use core::fmt;

use crate::framework::ServiceId;

// ---------------------------------------------------------------------------
// Top-level controller error
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Error {
    /// A service could not be brought up.
    Init(&'static str),
    /// A service queue rejected an event.
    QueueFull(ServiceId),
    /// Configuration is invalid or could not be parsed.
    Config(&'static str),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Init(msg) => write!(f, "init: {msg}"),
            Self::QueueFull(svc) => write!(f, "queue full: {svc:?}"),
            Self::Config(msg) => write!(f, "config: {msg}"),
        }
    }
}

impl core::error::Error for Error {}

/// Controller-wide `Result` alias.
pub type Result<T> = core::result::Result<T, Error>;
