//! Application service — the hexagonal core.
//!
//! [`GameService`] owns the dispatcher (queues and timers), the game FSM,
//! the motion controller, the render pipeline and the event checker bank.
//! It exposes a clean, hardware-agnostic API.  All I/O flows through port
//! traits injected at call sites, making the entire service testable with
//! mock adapters.
//!
//! ```text
//!  SensorPort ──▶ ┌──────────────────────────────┐ ──▶ EventSink
//!                 │         GameService          │
//! ActuatorPort ◀──│  Game FSM · Motion · Display │
//!  DisplayPort ◀──│  queues · timers · checkers  │
//!    StripPort ◀──└──────────────────────────────┘
//! ```
//!
//! ## Dispatch pass
//!
//! 1. Advance the timer bank and post every expiry to its owner.
//! 2. Poll the checker bank; its events go to the game queue.
//! 3. Take at most one event from the head of each queue, in priority
//!    order (display, motion, game), then hand each to its service.
//!
//! Everything a handler posts lands at the back of a queue and is seen no
//! earlier than the next pass.

use heapless::Vec;
use log::{debug, info, warn};

use crate::config::GameConfig;
use crate::display::RenderPipeline;
use crate::error::{Error, Result};
use crate::events::{Event, EventKind};
use crate::framework::queue::EventQueues;
use crate::framework::timers::TimerBank;
use crate::framework::{Effects, ServiceId};
use crate::fsm::context::{GameAction, GameContext};
use crate::fsm::states::{INTERCEPTORS, build_mode_table};
use crate::fsm::{Fsm, GameMode};
use crate::motion::MotionController;
use crate::sensors::EventCheckers;

use super::commands::AppCommand;
use super::events::{AppEvent, RoundOutcome};
use super::ports::{EventSink, Hardware};

// ───────────────────────────────────────────────────────────────
// GameService
// ───────────────────────────────────────────────────────────────

pub struct GameService {
    fsm: Fsm,
    ctx: GameContext,
    motion: MotionController,
    display: RenderPipeline,
    checkers: EventCheckers,
    queues: EventQueues,
    timers: TimerBank,
    started: bool,
    passes: u64,
    dispatched: u64,
}

impl GameService {
    /// Construct the service from configuration.
    ///
    /// Does **not** start anything — call [`start`](Self::start) next.
    pub fn new(config: GameConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            fsm: Fsm::new(build_mode_table(), INTERCEPTORS, GameMode::Init),
            motion: MotionController::new(&config),
            display: RenderPipeline::new(&config),
            checkers: EventCheckers::new(&config),
            ctx: GameContext::new(config),
            queues: EventQueues::new(),
            timers: TimerBank::new(),
            started: false,
            passes: 0,
            dispatched: 0,
        })
    }

    // ── Lifecycle ─────────────────────────────────────────────

    /// Enter the initial mode and queue the init event for every service.
    /// A rejected initial post aborts start-up.
    pub fn start(&mut self, sink: &mut impl EventSink) -> Result<()> {
        if self.started {
            return Err(Error::Init("already started"));
        }
        self.fsm.start(&mut self.ctx);
        for svc in ServiceId::BY_PRIORITY {
            if !self.queues.post(svc, Event::bare(EventKind::Init)) {
                return Err(Error::Init(svc.name()));
            }
        }
        self.started = true;
        sink.emit(&AppEvent::Started(self.fsm.current_mode()));
        info!("GameService started in {:?}", self.fsm.current_mode());
        Ok(())
    }

    // ── Posting ───────────────────────────────────────────────

    /// Post to the game service.  `false` means the queue was full.
    pub fn post(&mut self, event: Event) -> bool {
        self.queues.post(ServiceId::Game, event)
    }

    pub fn try_post(&mut self, to: ServiceId, event: Event) -> Result<()> {
        if self.queues.post(to, event) {
            Ok(())
        } else {
            Err(Error::QueueFull(to))
        }
    }

    // ── Per-pass orchestration ────────────────────────────────

    /// Run one dispatch pass after `elapsed_ms` of wall time.
    /// Returns how many events were delivered.
    pub fn run_pass(
        &mut self,
        hw: &mut impl Hardware,
        elapsed_ms: u32,
        sink: &mut impl EventSink,
    ) -> usize {
        self.passes = self.passes.wrapping_add(1);

        for id in self.timers.advance(elapsed_ms) {
            self.queues.post(id.owner(), Event::timeout(id));
        }

        let mut fx = Effects::new();
        if self.checkers.poll(hw, &mut fx) > 0 {
            self.flush(&mut fx);
        }

        let mut batch: Vec<(ServiceId, Event), { ServiceId::COUNT }> = Vec::new();
        for svc in ServiceId::BY_PRIORITY {
            if let Some(event) = self.queues.pop(svc) {
                // One slot per service; cannot overflow.
                let _ = batch.push((svc, event));
            }
        }

        for &(svc, event) in batch.iter() {
            self.dispatch(svc, event, hw, sink);
        }
        batch.len()
    }

    /// Game service handler: deliver `event` to the game FSM now.
    /// Always returns the no-op event.
    pub fn run(
        &mut self,
        event: Event,
        hw: &mut impl Hardware,
        sink: &mut impl EventSink,
    ) -> Event {
        let from = self.fsm.current_mode();
        self.ctx.elevated_axes = self.motion.elevated_count();
        self.fsm.dispatch(&mut self.ctx, event);
        self.apply_game_outbox(hw, sink);
        self.note_mode_change(from, sink);
        Event::NONE
    }

    // ── Command handling ──────────────────────────────────────

    pub fn handle_command(
        &mut self,
        cmd: AppCommand,
        hw: &mut impl Hardware,
        sink: &mut impl EventSink,
    ) {
        match cmd {
            AppCommand::Recalibrate => {
                let baselines = self.checkers.capture_baselines(hw);
                sink.emit(&AppEvent::Calibrated(baselines));
            }
            AppCommand::UpdateConfig(config) => match config.validate() {
                Ok(()) => {
                    self.motion.reconfigure(&config);
                    self.display.reconfigure(&config);
                    self.checkers.reconfigure(&config);
                    self.ctx.config = config;
                    info!("Configuration updated at runtime");
                }
                Err(e) => {
                    warn!("rejected config update: {}", e);
                    let reason = match e {
                        Error::Config(msg) => msg,
                        _ => "invalid config",
                    };
                    sink.emit(&AppEvent::ConfigRejected(reason));
                }
            },
            AppCommand::ForceMode(target) => {
                let from = self.fsm.current_mode();
                self.fsm.force_transition(target, &mut self.ctx);
                self.apply_game_outbox(hw, sink);
                self.note_mode_change(from, sink);
            }
        }
    }

    // ── Queries ───────────────────────────────────────────────

    /// Current game mode.
    pub fn query_mode(&self) -> GameMode {
        self.fsm.current_mode()
    }

    pub fn score(&self) -> u16 {
        self.ctx.score
    }

    pub fn seconds_left(&self) -> u16 {
        self.ctx.seconds_left
    }

    pub fn difficulty_pct(&self) -> u8 {
        self.ctx.difficulty_pct
    }

    pub fn config(&self) -> &GameConfig {
        &self.ctx.config
    }

    pub fn motion(&self) -> &MotionController {
        &self.motion
    }

    pub fn display(&self) -> &RenderPipeline {
        &self.display
    }

    pub fn checkers(&self) -> &EventCheckers {
        &self.checkers
    }

    pub fn timers(&self) -> &TimerBank {
        &self.timers
    }

    /// `true` when every queue is empty.
    pub fn is_idle(&self) -> bool {
        self.queues.is_idle()
    }

    pub fn pending(&self, svc: ServiceId) -> usize {
        self.queues.len(svc)
    }

    pub fn dropped_events(&self) -> u32 {
        self.queues.dropped()
    }

    /// Dispatch passes run since construction.
    pub fn passes(&self) -> u64 {
        self.passes
    }

    /// Events delivered to a service since construction.
    pub fn dispatched(&self) -> u64 {
        self.dispatched
    }

    // ── Internal ──────────────────────────────────────────────

    fn dispatch(
        &mut self,
        svc: ServiceId,
        event: Event,
        hw: &mut impl Hardware,
        sink: &mut impl EventSink,
    ) {
        self.dispatched = self.dispatched.wrapping_add(1);
        debug!("{} <- {:?}({})", svc.name(), event.kind, event.param);
        match svc {
            ServiceId::Game => {
                self.run(event, hw, sink);
            }
            ServiceId::Motion => {
                let was_latched = self.motion.crash_latched();
                let mut fx = Effects::new();
                self.motion
                    .run(event, self.fsm.current_mode(), hw, &mut fx);
                self.flush(&mut fx);
                if !was_latched && self.motion.crash_latched() {
                    sink.emit(&AppEvent::Crashed);
                }
            }
            ServiceId::Display => {
                let mut fx = Effects::new();
                self.display.run(event, hw, &mut fx);
                if self.flush(&mut fx) > 0 {
                    self.display.continuation_lost();
                }
            }
        }
    }

    /// Carry out what the last FSM call asked for, then apply its effects.
    fn apply_game_outbox(&mut self, hw: &mut impl Hardware, sink: &mut impl EventSink) {
        let actions = core::mem::take(&mut self.ctx.actions);
        for action in actions {
            match action {
                GameAction::Motion(cmd) => self.motion.apply(cmd, hw, &mut self.ctx.effects),
                GameAction::CaptureBaselines => {
                    let baselines = self.checkers.capture_baselines(hw);
                    sink.emit(&AppEvent::Calibrated(baselines));
                }
                GameAction::ReportSensors => {
                    let raw = hw.read_analog_multi();
                    let baselines = self.checkers.baselines();
                    info!("sensors: baselines {:?} raw {:?}", baselines, raw);
                    sink.emit(&AppEvent::SensorReport { baselines, raw });
                }
            }
        }
        let rejected = self.ctx.effects.apply(&mut self.queues, &mut self.timers);
        if rejected > 0 {
            warn!("game: {} post(s) dropped", rejected);
        }
    }

    /// Returns how many posts a full queue rejected.
    fn flush(&mut self, fx: &mut Effects) -> usize {
        let rejected = fx.apply(&mut self.queues, &mut self.timers);
        if rejected > 0 {
            warn!("{} post(s) dropped", rejected);
        }
        rejected
    }

    fn note_mode_change(&mut self, from: GameMode, sink: &mut impl EventSink) {
        let to = self.fsm.current_mode();
        if to == from {
            return;
        }
        sink.emit(&AppEvent::ModeChanged { from, to });
        let outcome = match to {
            GameMode::Completing => RoundOutcome::Completed,
            GameMode::Losing => RoundOutcome::Crashed,
            GameMode::NoInput => RoundOutcome::Abandoned,
            _ => return,
        };
        sink.emit(&AppEvent::RoundOver {
            score: self.ctx.score,
            outcome,
        });
    }
}
