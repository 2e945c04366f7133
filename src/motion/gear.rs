//! Gear dispenser: a servo swept rest -> active -> rest, one dwell per leg.
//!
//! ```text
//!  IDLE ──[trigger]──▶ MOVING_TO_ACTIVE ──[dwell]──▶ MOVING_TO_REST ──[dwell]──▶ IDLE
//! ```
//!
//! A trigger outside `Idle` is ignored so sweeps never overlap.

use log::{debug, info};

use crate::app::ports::ActuatorPort;
use crate::framework::Effects;
use crate::framework::timers::TimerId;
use crate::pins;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GearState {
    Idle,
    MovingToActive,
    MovingToRest,
}

pub struct GearSequencer {
    state: GearState,
    rest_ticks: i32,
    active_ticks: i32,
    dwell_ms: u32,
    dispensed: u32,
}

impl GearSequencer {
    pub fn new(rest_ticks: i32, active_ticks: i32, dwell_ms: u32) -> Self {
        Self {
            state: GearState::Idle,
            rest_ticks,
            active_ticks,
            dwell_ms,
            dispensed: 0,
        }
    }

    /// Start a sweep.  Returns `false` if one is already running.
    pub fn trigger(&mut self, out: &mut impl ActuatorPort, fx: &mut Effects) -> bool {
        if self.state != GearState::Idle {
            debug!("gear busy ({:?}), trigger ignored", self.state);
            return false;
        }
        out.set_actuator_position(pins::GEAR_SERVO_CHANNEL, self.active_ticks);
        fx.start_timer(TimerId::GearDwell, self.dwell_ms);
        self.state = GearState::MovingToActive;
        self.dispensed = self.dispensed.saturating_add(1);
        info!("gear: dispensing (#{})", self.dispensed);
        true
    }

    /// Dwell timer expiry.
    pub fn on_dwell(&mut self, out: &mut impl ActuatorPort, fx: &mut Effects) {
        match self.state {
            GearState::MovingToActive => {
                out.set_actuator_position(pins::GEAR_SERVO_CHANNEL, self.rest_ticks);
                fx.start_timer(TimerId::GearDwell, self.dwell_ms);
                self.state = GearState::MovingToRest;
            }
            GearState::MovingToRest => {
                self.state = GearState::Idle;
                debug!("gear: back at rest");
            }
            GearState::Idle => {}
        }
    }

    pub fn retune(&mut self, rest_ticks: i32, active_ticks: i32, dwell_ms: u32) {
        self.rest_ticks = rest_ticks;
        self.active_ticks = active_ticks;
        self.dwell_ms = dwell_ms;
    }

    pub fn state(&self) -> GearState {
        self.state
    }

    /// Completed triggers since start-up.
    pub fn dispensed(&self) -> u32 {
        self.dispensed
    }
}
