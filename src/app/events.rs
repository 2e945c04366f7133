//! Outbound application events.
//!
//! The [`GameService`](super::service::GameService) emits these through the
//! [`EventSink`](super::ports::EventSink) port.  Adapters on the other
//! side decide what to do with them (serial log, scoreboard, test capture).

use crate::events::AxisId;
use crate::fsm::GameMode;
use crate::pins::ADC_SLOTS;

/// How a round ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RoundOutcome {
    /// Session timer ran out with every target still up.
    Completed,
    /// A target reached the floor.
    Crashed,
    /// No hit within the inactivity window.
    Abandoned,
}

/// Structured events emitted by the application core.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AppEvent {
    /// The service has started (carries the initial mode).
    Started(GameMode),

    /// The game FSM changed mode.
    ModeChanged { from: GameMode, to: GameMode },

    /// The crash latch tripped.
    Crashed,

    /// A round finished.
    RoundOver { score: u16, outcome: RoundOutcome },

    /// Target sensor baselines were (re)captured.
    Calibrated([u16; AxisId::COUNT]),

    /// Bench report requested from test mode.
    SensorReport {
        baselines: [u16; AxisId::COUNT],
        raw: [u16; ADC_SLOTS],
    },

    /// An `UpdateConfig` command failed validation and was ignored.
    ConfigRejected(&'static str),
}
