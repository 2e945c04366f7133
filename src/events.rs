//! Event vocabulary shared by every service.
//!
//! Events are produced by:
//! - the checker bank (beam break, laser hits, slider, test keys)
//! - the timer bank (one-shot expirations)
//! - services themselves (display continuations, crash reports, commands)
//!
//! and consumed one at a time by the service they are posted to.
//!
//! ```text
//! ┌──────────────┐     ┌──────────────┐     ┌──────────────────┐
//! │ Checker bank │────▶│              │────▶│ Display (prio 2) │
//! │ Timer bank   │────▶│ Per-service  │────▶│ Motion  (prio 1) │
//! │ Services     │────▶│ FIFO queues  │────▶│ Game    (prio 0) │
//! └──────────────┘     └──────────────┘     └──────────────────┘
//! ```

use crate::framework::timers::TimerId;

// ── Target axes ──────────────────────────────────────────────

/// One of the three motorised targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum AxisId {
    One = 0,
    Two = 1,
    Three = 2,
}

impl AxisId {
    pub const COUNT: usize = 3;
    pub const ALL: [AxisId; Self::COUNT] = [Self::One, Self::Two, Self::Three];

    pub const fn index(self) -> usize {
        self as usize
    }

    pub fn from_index(idx: usize) -> Option<Self> {
        Self::ALL.get(idx).copied()
    }
}

// ── Event kinds ──────────────────────────────────────────────

/// Closed set of event kinds.  The meaning of [`Event::param`] depends on
/// the kind:
///
/// | Kind                    | `param`                     |
/// |-------------------------|-----------------------------|
/// | `Timeout`               | [`TimerId`] discriminant    |
/// | `NewInput`              | ASCII key code              |
/// | `DifficultyChanged`     | percentage                  |
/// | `DisplayShowMessage`    | message id                  |
/// | `DisplayShowScore`      | score                       |
/// | `DisplayShowCountdown`  | seconds remaining           |
/// | `DisplayShowDifficulty` | percentage                  |
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventKind {
    NoEvent,
    Error,
    Init,
    Timeout,
    ShortTimeout,
    NewInput,
    WaveDetected,
    DifficultyChanged,
    Hit(AxisId),
    NoHit(AxisId),
    Crashed,
    DisplayShowMessage,
    DisplayShowScore,
    DisplayShowCountdown,
    DisplayShowDifficulty,
    DisplayPushStep,
}

/// A tagged value copied through the queues.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Event {
    pub kind: EventKind,
    pub param: u16,
}

impl Event {
    /// Returned by a handler that has nothing to report.
    pub const NONE: Self = Self::bare(EventKind::NoEvent);

    pub const fn new(kind: EventKind, param: u16) -> Self {
        Self { kind, param }
    }

    pub const fn bare(kind: EventKind) -> Self {
        Self { kind, param: 0 }
    }

    pub const fn timeout(id: TimerId) -> Self {
        Self::new(EventKind::Timeout, id as u16)
    }

    /// The expired timer, if this is a timeout event.
    pub fn timer(&self) -> Option<TimerId> {
        match self.kind {
            EventKind::Timeout => TimerId::from_param(self.param),
            _ => None,
        }
    }

    /// `true` if this is the expiry of `id`.
    pub fn is_timeout(&self, id: TimerId) -> bool {
        self.timer() == Some(id)
    }
}
