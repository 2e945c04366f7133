//! Shared mutable context threaded through every FSM handler.
//!
//! `GameContext` is the blackboard the mode handlers read from and write
//! to.  Handlers never touch hardware or other services directly: posts and
//! timer requests go into [`Effects`], and requests for the motion
//! controller or the checker bank go into `actions`.  The game service
//! applies both once the handler returns.

use heapless::Vec;
use log::warn;

use crate::config::GameConfig;
use crate::display::MessageId;
use crate::events::{Event, EventKind};
use crate::framework::{Effects, ServiceId};
use crate::motion::MotionCommand;

const MAX_ACTIONS: usize = 8;

/// Work a handler asks the game service to carry out on its behalf.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameAction {
    Motion(MotionCommand),
    /// Re-average the target sensors' resting levels.
    CaptureBaselines,
    /// Log the current baselines and raw sensor readings.
    ReportSensors,
}

pub struct GameContext {
    pub config: GameConfig,

    // --- Round state ---
    pub seconds_left: u16,
    pub score: u16,
    /// Axes above the danger line, refreshed by the service before dispatch.
    pub elevated_axes: u8,
    /// Last clamped slider percentage.
    pub difficulty_pct: u8,

    // --- Outputs ---
    pub effects: Effects,
    pub actions: Vec<GameAction, MAX_ACTIONS>,
}

impl GameContext {
    pub fn new(config: GameConfig) -> Self {
        let difficulty_pct = config.default_difficulty_pct;
        Self {
            config,
            seconds_left: 0,
            score: 0,
            elevated_axes: 0,
            difficulty_pct,
            effects: Effects::new(),
            actions: Vec::new(),
        }
    }

    /// Queue a motion command for this dispatch.
    pub fn command(&mut self, cmd: MotionCommand) {
        self.request(GameAction::Motion(cmd));
    }

    pub fn request(&mut self, action: GameAction) {
        if self.actions.push(action).is_err() {
            warn!("game action list full, dropping {:?}", action);
        }
    }

    /// Post a render request to the display.
    pub fn show(&mut self, kind: EventKind, param: u16) {
        self.effects.post(ServiceId::Display, Event::new(kind, param));
    }

    pub fn show_message(&mut self, msg: MessageId) {
        self.show(EventKind::DisplayShowMessage, msg as u16);
    }

    /// Drop pending effects and actions without applying them.
    pub fn clear_outbox(&mut self) {
        self.effects = Effects::new();
        self.actions.clear();
    }
}
