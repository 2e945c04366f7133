//! Function-pointer finite state machine engine for the game mode.
//!
//! Classic embedded FSM pattern, event-driven:
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │  Interceptors (checked first, regardless of mode)            │
//! │    push-step ─▶ display      gear dwell ─▶ motion            │
//! ├──────────────────────────────────────────────────────────────┤
//! │  ModeTable                                                   │
//! │  ┌────────────┬──────────┬─────────┬──────────────────────┐  │
//! │  │ GameMode   │ on_enter │ on_exit │ on_event             │  │
//! │  ├────────────┼──────────┼─────────┼──────────────────────┤  │
//! │  │ Init       │    -     │    -    │ fn(ctx,ev)->Option<> │  │
//! │  │ Waiting    │ fn(ctx)  │    -    │ fn(ctx,ev)->Option<> │  │
//! │  │ Gameplay   │ fn(ctx)  │ fn(ctx) │ fn(ctx,ev)->Option<> │  │
//! │  │ ...        │          │         │                      │  │
//! │  └────────────┴──────────┴─────────┴──────────────────────┘  │
//! └──────────────────────────────────────────────────────────────┘
//! ```
//!
//! Each dispatched event first runs through the interceptor chain; the
//! first interceptor that claims it ends the dispatch.  Otherwise the
//! current mode's `on_event` runs, and if it returns `Some(next)` the
//! engine runs `on_exit` for the current mode, then `on_enter` for the
//! next.  All functions receive `&mut GameContext`.  Events a mode does
//! not recognise are ignored.

pub mod context;
pub mod states;

use context::GameContext;
use log::info;

use crate::events::Event;

// ---------------------------------------------------------------------------
// Mode identity
// ---------------------------------------------------------------------------

/// Every mode of the game.
/// Must stay in sync with the table built in [`states::build_mode_table`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum GameMode {
    Init = 0,
    Waiting = 1,
    Gameplay = 2,
    Completing = 3,
    Losing = 4,
    NoInput = 5,
    Test = 6,
}

impl GameMode {
    pub const COUNT: usize = 7;

    /// Convert an index back to `GameMode`.  Out-of-range indices trip a
    /// debug assertion and map to `Waiting` in release builds.
    pub fn from_index(idx: usize) -> Self {
        match idx {
            0 => Self::Init,
            1 => Self::Waiting,
            2 => Self::Gameplay,
            3 => Self::Completing,
            4 => Self::Losing,
            5 => Self::NoInput,
            6 => Self::Test,
            _ => {
                debug_assert!(false, "invalid mode index: {idx}");
                Self::Waiting
            }
        }
    }

    /// Modes that end a round and return to the lobby after the settle time.
    pub fn is_round_end(self) -> bool {
        matches!(self, Self::Completing | Self::Losing | Self::NoInput)
    }
}

// ---------------------------------------------------------------------------
// Function-pointer type aliases
// ---------------------------------------------------------------------------

/// Signature for `on_enter` and `on_exit` actions.
pub type ModeActionFn = fn(&mut GameContext);

/// Per-event handler.  Returns `Some(next)` to trigger a transition.
pub type ModeEventFn = fn(&mut GameContext, Event) -> Option<GameMode>;

/// Global pre-filter.  Returns `true` if it consumed the event.
pub type InterceptorFn = fn(&mut GameContext, Event) -> bool;

// ---------------------------------------------------------------------------
// Mode descriptor (one row in the table)
// ---------------------------------------------------------------------------

pub struct ModeDescriptor {
    pub id: GameMode,
    pub name: &'static str,
    pub on_enter: Option<ModeActionFn>,
    pub on_exit: Option<ModeActionFn>,
    pub on_event: ModeEventFn,
}

// ---------------------------------------------------------------------------
// FSM engine
// ---------------------------------------------------------------------------

pub struct Fsm {
    /// Fixed-size table indexed by `GameMode as usize`.
    table: [ModeDescriptor; GameMode::COUNT],
    interceptors: &'static [InterceptorFn],
    current: usize,
    /// Events dispatched since start (wraps at u64::MAX).
    dispatched: u64,
    /// Value of `dispatched` when the current mode was entered.
    mode_entry: u64,
}

impl Fsm {
    pub fn new(
        table: [ModeDescriptor; GameMode::COUNT],
        interceptors: &'static [InterceptorFn],
        initial: GameMode,
    ) -> Self {
        Self {
            table,
            interceptors,
            current: initial as usize,
            dispatched: 0,
            mode_entry: 0,
        }
    }

    /// Run the initial `on_enter` for the starting mode.
    /// Call once after construction, before the first `dispatch()`.
    pub fn start(&mut self, ctx: &mut GameContext) {
        info!("game FSM starting in mode: {}", self.table[self.current].name);
        if let Some(enter) = self.table[self.current].on_enter {
            enter(ctx);
        }
    }

    /// Deliver one event: interceptors first, then the mode table.
    pub fn dispatch(&mut self, ctx: &mut GameContext, event: Event) {
        self.dispatched = self.dispatched.wrapping_add(1);

        if self.interceptors.iter().any(|intercept| intercept(ctx, event)) {
            return;
        }

        if let Some(next) = (self.table[self.current].on_event)(ctx, event) {
            self.transition(next, ctx);
        }
    }

    /// Jump straight to `next` (external override).  No-op if already there.
    pub fn force_transition(&mut self, next: GameMode, ctx: &mut GameContext) {
        if next as usize != self.current {
            self.transition(next, ctx);
        }
    }

    pub fn current_mode(&self) -> GameMode {
        GameMode::from_index(self.current)
    }

    pub fn current_name(&self) -> &'static str {
        self.table[self.current].name
    }

    /// Events dispatched since the current mode was entered.
    pub fn events_in_current_mode(&self) -> u64 {
        self.dispatched.wrapping_sub(self.mode_entry)
    }

    // -----------------------------------------------------------------------
    // Internal
    // -----------------------------------------------------------------------

    fn transition(&mut self, next: GameMode, ctx: &mut GameContext) {
        let next_idx = next as usize;

        info!(
            "game FSM transition: {} -> {}",
            self.table[self.current].name, self.table[next_idx].name
        );

        if let Some(exit) = self.table[self.current].on_exit {
            exit(ctx);
        }

        self.current = next_idx;
        self.mode_entry = self.dispatched;

        if let Some(enter) = self.table[self.current].on_enter {
            enter(ctx);
        }
    }
}
