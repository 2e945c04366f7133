//! Target motion controller.
//!
//! Owns the three target axes, the shared crash latch and the gear
//! sequencer.  A periodic `MotionUpdate` timeout slews every axis one step
//! toward its target, but only while a round is being played:
//!
//! ```text
//! for each axis:
//!     delta    = clamp(target - position, -max_step, +max_step)
//!     position = clamp(position + delta, floor, ceiling)
//!     drive servo
//!     if position == floor and latch clear: set latch, report crash
//! ```
//!
//! The latch is shared by all axes and only cleared by [`MotionController::raise_all`],
//! so a round produces at most one crash report.

pub mod axis;
pub mod gear;

use log::{debug, info};

use crate::app::ports::ActuatorPort;
use crate::config::GameConfig;
use crate::events::{AxisId, Event, EventKind};
use crate::framework::timers::TimerId;
use crate::framework::{Effects, ServiceId};
use crate::fsm::GameMode;
use crate::pins;
use axis::Axis;
use gear::GearSequencer;
pub use gear::GearState;

// ---------------------------------------------------------------------------
// Commands from the game state machine
// ---------------------------------------------------------------------------

/// Where a test-mode jog sends an axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JogTarget {
    Ceiling,
    Floor,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MotionCommand {
    Rise(AxisId),
    Fall(AxisId),
    /// Park every axis at its ceiling and clear the crash latch.
    RaiseAll,
    FallAll,
    SetDifficulty(u8),
    Jog(AxisId, JogTarget),
    TriggerGear,
}

/// Linear map of a difficulty percentage onto a slew step.
/// `pct` is clamped to 1..=100 first.
pub fn map_difficulty(pct: u8, min_step: i32, max_step: i32) -> i32 {
    let p = i64::from(pct.clamp(1, 100));
    let (lo, hi) = (i64::from(min_step), i64::from(max_step));
    let step = lo + (p - 1) * (hi - lo) / 99;
    step.clamp(i64::from(i32::MIN), i64::from(i32::MAX)) as i32
}

// ---------------------------------------------------------------------------
// Controller
// ---------------------------------------------------------------------------

pub struct MotionController {
    axes: [Axis; AxisId::COUNT],
    crash_latched: bool,
    gear: GearSequencer,
    period_ms: u32,
    min_step: i32,
    max_step: i32,
    danger_divisor: i32,
    difficulty_pct: u8,
}

impl MotionController {
    pub fn new(config: &GameConfig) -> Self {
        let step = map_difficulty(config.default_difficulty_pct, config.min_step, config.max_step);
        let axis = Axis::new(config.floor_ticks, config.ceiling_ticks, step);
        Self {
            axes: [axis; AxisId::COUNT],
            crash_latched: false,
            gear: GearSequencer::new(
                config.gear_rest_ticks,
                config.gear_active_ticks,
                config.gear_dwell_ms,
            ),
            period_ms: config.motion_period_ms,
            min_step: config.min_step,
            max_step: config.max_step,
            danger_divisor: config.danger_line_divisor,
            difficulty_pct: config.default_difficulty_pct.clamp(1, 100),
        }
    }

    /// Service entry point: one event per call.
    pub fn run(
        &mut self,
        event: Event,
        mode: GameMode,
        out: &mut impl ActuatorPort,
        fx: &mut Effects,
    ) {
        match event.kind {
            EventKind::Init => {
                fx.start_timer(TimerId::MotionUpdate, self.period_ms);
                info!("motion: slewing every {} ms", self.period_ms);
            }
            EventKind::Timeout => match event.timer() {
                Some(TimerId::MotionUpdate) => {
                    if mode == GameMode::Gameplay {
                        self.tick(out, fx);
                    }
                    fx.start_timer(TimerId::MotionUpdate, self.period_ms);
                }
                Some(TimerId::GearDwell) => self.gear.on_dwell(out, fx),
                _ => {}
            },
            _ => {}
        }
    }

    /// One slew update of every axis.  Returns `true` if this tick latched
    /// a crash.
    pub fn tick(&mut self, out: &mut impl ActuatorPort, fx: &mut Effects) -> bool {
        let mut crashed = false;
        for id in AxisId::ALL {
            let axis = &mut self.axes[id.index()];
            let position = axis.step();
            out.set_actuator_position(pins::axis_channel(id), position);
            if axis.is_at_floor() && !self.crash_latched {
                self.crash_latched = true;
                crashed = true;
                info!("motion: target {:?} hit the floor", id);
                fx.post(ServiceId::Game, Event::bare(EventKind::Crashed));
            }
        }
        crashed
    }

    pub fn apply(&mut self, cmd: MotionCommand, out: &mut impl ActuatorPort, fx: &mut Effects) {
        debug!("motion: {:?}", cmd);
        match cmd {
            MotionCommand::Rise(id) => self.axes[id.index()].command_rise(),
            MotionCommand::Fall(id) => self.axes[id.index()].command_fall(),
            MotionCommand::RaiseAll => self.raise_all(out),
            MotionCommand::FallAll => self.axes.iter_mut().for_each(Axis::command_fall),
            MotionCommand::SetDifficulty(pct) => self.set_difficulty(pct),
            MotionCommand::Jog(id, to) => {
                let axis = &mut self.axes[id.index()];
                match to {
                    JogTarget::Ceiling => axis.jog_to(axis.ceiling()),
                    JogTarget::Floor => axis.jog_to(axis.floor()),
                }
                out.set_actuator_position(pins::axis_channel(id), axis.position());
            }
            MotionCommand::TriggerGear => {
                self.gear.trigger(out, fx);
            }
        }
    }

    /// Park every axis at its ceiling, drive the servos there and clear the
    /// crash latch, all in one step.
    pub fn raise_all(&mut self, out: &mut impl ActuatorPort) {
        for id in AxisId::ALL {
            let axis = &mut self.axes[id.index()];
            axis.park_at_ceiling();
            out.set_actuator_position(pins::axis_channel(id), axis.position());
        }
        self.crash_latched = false;
    }

    /// Apply a difficulty percentage (clamped to 1..=100) to all axes.
    pub fn set_difficulty(&mut self, pct: u8) {
        self.difficulty_pct = pct.clamp(1, 100);
        let step = map_difficulty(self.difficulty_pct, self.min_step, self.max_step);
        for axis in &mut self.axes {
            axis.set_max_step(step);
        }
        debug!("motion: difficulty {}% -> {} ticks/step", self.difficulty_pct, step);
    }

    /// Axes at or above the danger line.
    pub fn elevated_count(&self) -> u8 {
        self.axes
            .iter()
            .filter(|a| a.is_elevated(self.danger_divisor))
            .count() as u8
    }

    /// Pick up new limits, speeds and gear timing.  Positions are pulled
    /// inside the new travel; the crash latch is left alone.
    pub fn reconfigure(&mut self, config: &GameConfig) {
        self.period_ms = config.motion_period_ms;
        self.min_step = config.min_step;
        self.max_step = config.max_step;
        self.danger_divisor = config.danger_line_divisor;
        for axis in &mut self.axes {
            axis.set_limits(config.floor_ticks, config.ceiling_ticks);
        }
        self.set_difficulty(self.difficulty_pct);
        self.gear.retune(
            config.gear_rest_ticks,
            config.gear_active_ticks,
            config.gear_dwell_ms,
        );
    }

    pub fn axis(&self, id: AxisId) -> &Axis {
        &self.axes[id.index()]
    }

    pub fn crash_latched(&self) -> bool {
        self.crash_latched
    }

    pub fn gear_state(&self) -> GearState {
        self.gear.state()
    }

    pub fn gears_dispensed(&self) -> u32 {
        self.gear.dispensed()
    }

    pub fn difficulty_pct(&self) -> u8 {
        self.difficulty_pct
    }
}
