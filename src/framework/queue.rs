//! Fixed-capacity FIFO queue per service.

use heapless::Deque;
use log::warn;

use super::ServiceId;
use crate::events::Event;

/// Pending events per service.
pub const QUEUE_DEPTH: usize = 16;

pub struct EventQueues {
    queues: [Deque<Event, QUEUE_DEPTH>; ServiceId::COUNT],
    dropped: u32,
}

impl EventQueues {
    pub fn new() -> Self {
        Self {
            queues: [Deque::new(), Deque::new(), Deque::new()],
            dropped: 0,
        }
    }

    /// Append `event` to the back of `to`'s queue.
    /// Returns `false` if the queue is full (event dropped).
    pub fn post(&mut self, to: ServiceId, event: Event) -> bool {
        match self.queues[to.index()].push_back(event) {
            Ok(()) => true,
            Err(ev) => {
                self.dropped = self.dropped.saturating_add(1);
                warn!("{} queue full, dropped {:?}", to.name(), ev.kind);
                false
            }
        }
    }

    /// Take the oldest event for `svc`.
    pub fn pop(&mut self, svc: ServiceId) -> Option<Event> {
        self.queues[svc.index()].pop_front()
    }

    pub fn len(&self, svc: ServiceId) -> usize {
        self.queues[svc.index()].len()
    }

    /// `true` when no service has anything pending.
    pub fn is_idle(&self) -> bool {
        self.queues.iter().all(Deque::is_empty)
    }

    /// Events rejected since start-up.
    pub fn dropped(&self) -> u32 {
        self.dropped
    }
}

impl Default for EventQueues {
    fn default() -> Self {
        Self::new()
    }
}
