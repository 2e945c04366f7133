//! Minimal cooperative dispatcher: per-service queues, one-shot timers and
//! the outbox that handlers write to.
//!
//! Handlers never touch a queue directly.  They record what they want posted
//! (and which timers to arm or stop) in an [`Effects`] outbox, and the
//! [`GameService`](crate::app::service::GameService) applies the outbox once
//! the handler has returned.  Delivery is therefore always deferred to a later
//! dispatch pass, however the handler is written.

pub mod queue;
pub mod timers;

use heapless::Vec;
use log::warn;

use crate::events::Event;
use queue::EventQueues;
use timers::{TimerBank, TimerId};

// ---------------------------------------------------------------------------
// Service identity
// ---------------------------------------------------------------------------

/// The three reactive services.  Higher priority is dispatched first in
/// every pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum ServiceId {
    Game = 0,
    Motion = 1,
    Display = 2,
}

impl ServiceId {
    pub const COUNT: usize = 3;

    /// Dispatch order within a pass.
    pub const BY_PRIORITY: [ServiceId; Self::COUNT] = [Self::Display, Self::Motion, Self::Game];

    pub const fn index(self) -> usize {
        self as usize
    }

    /// Larger is more urgent.
    pub const fn priority(self) -> u8 {
        self as u8
    }

    pub const fn name(self) -> &'static str {
        match self {
            Self::Game => "game",
            Self::Motion => "motion",
            Self::Display => "display",
        }
    }
}

// ---------------------------------------------------------------------------
// Stepped operations
// ---------------------------------------------------------------------------

/// Outcome of one bounded step of a multi-step hardware operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepResult {
    /// More steps remain; the driver must be invoked again on a later pass.
    InProgress,
    /// The operation finished on this step.
    Done,
}

impl StepResult {
    pub fn is_done(self) -> bool {
        matches!(self, Self::Done)
    }
}

// ---------------------------------------------------------------------------
// Outbox
// ---------------------------------------------------------------------------

/// Timer request recorded by a handler.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimerOp {
    Start(TimerId, u32),
    Stop(TimerId),
}

const OUTBOX_POSTS: usize = 8;
const OUTBOX_TIMERS: usize = 8;

/// Posts and timer operations produced by one handler invocation.
#[derive(Debug, Default)]
pub struct Effects {
    posts: Vec<(ServiceId, Event), OUTBOX_POSTS>,
    timers: Vec<TimerOp, OUTBOX_TIMERS>,
}

impl Effects {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue `event` for `to`.  Delivered no earlier than the next pass.
    /// Returns `false` if the outbox was full and the event was dropped.
    pub fn post(&mut self, to: ServiceId, event: Event) -> bool {
        if self.posts.push((to, event)).is_err() {
            warn!("outbox full, dropping {:?} for {}", event.kind, to.name());
            return false;
        }
        true
    }

    /// Arm (or re-arm) a one-shot timer.
    pub fn start_timer(&mut self, id: TimerId, duration_ms: u32) {
        self.push_timer(TimerOp::Start(id, duration_ms));
    }

    pub fn stop_timer(&mut self, id: TimerId) {
        self.push_timer(TimerOp::Stop(id));
    }

    pub fn posts(&self) -> &[(ServiceId, Event)] {
        &self.posts
    }

    pub fn timer_ops(&self) -> &[TimerOp] {
        &self.timers
    }

    pub fn is_empty(&self) -> bool {
        self.posts.is_empty() && self.timers.is_empty()
    }

    /// Apply timer operations, then posts, in the order they were recorded.
    /// Returns how many posts were rejected by a full queue.
    pub fn apply(&mut self, queues: &mut EventQueues, timers: &mut TimerBank) -> usize {
        for op in self.timers.iter() {
            match *op {
                TimerOp::Start(id, ms) => timers.start(id, ms),
                TimerOp::Stop(id) => timers.stop(id),
            }
        }
        let mut rejected = 0;
        for &(to, event) in self.posts.iter() {
            if !queues.post(to, event) {
                rejected += 1;
            }
        }
        self.timers.clear();
        self.posts.clear();
        rejected
    }

    fn push_timer(&mut self, op: TimerOp) {
        if self.timers.push(op).is_err() {
            warn!("outbox full, dropping timer op {:?}", op);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::EventKind;

    #[test]
    fn priority_order_is_display_motion_game() {
        let prios: std::vec::Vec<u8> = ServiceId::BY_PRIORITY
            .iter()
            .map(|s| s.priority())
            .collect();
        assert!(prios.windows(2).all(|w| w[0] > w[1]));
    }

    #[test]
    fn apply_moves_posts_into_queues() {
        let mut fx = Effects::new();
        let mut queues = EventQueues::new();
        let mut timers = TimerBank::new();

        fx.post(ServiceId::Display, Event::bare(EventKind::DisplayPushStep));
        fx.start_timer(TimerId::Settle, 3_000);
        assert_eq!(fx.apply(&mut queues, &mut timers), 0);

        assert!(fx.is_empty());
        assert_eq!(queues.len(ServiceId::Display), 1);
        assert_eq!(timers.remaining(TimerId::Settle), Some(3_000));
    }

    #[test]
    fn full_outbox_reports_dropped_post() {
        let mut fx = Effects::new();
        for _ in 0..OUTBOX_POSTS {
            assert!(fx.post(ServiceId::Game, Event::bare(EventKind::NoEvent)));
        }
        assert!(!fx.post(ServiceId::Display, Event::bare(EventKind::DisplayPushStep)));
        assert_eq!(fx.posts().len(), OUTBOX_POSTS);
    }

    #[test]
    fn stop_after_start_leaves_timer_idle() {
        let mut fx = Effects::new();
        let mut queues = EventQueues::new();
        let mut timers = TimerBank::new();

        fx.start_timer(TimerId::Inactivity, 20_000);
        fx.stop_timer(TimerId::Inactivity);
        fx.apply(&mut queues, &mut timers);
        assert!(!timers.is_running(TimerId::Inactivity));
    }

    #[test]
    fn overflowing_outbox_drops_instead_of_panicking() {
        let mut fx = Effects::new();
        for _ in 0..OUTBOX_POSTS + 3 {
            fx.post(ServiceId::Game, Event::bare(EventKind::Crashed));
        }
        assert_eq!(fx.posts().len(), OUTBOX_POSTS);
    }
}
