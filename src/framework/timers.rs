//! One-shot millisecond timers.
//!
//! Each timer is owned by exactly one service: when it expires, a
//! `Timeout(id)` event is posted to that owner.  Nothing re-arms
//! automatically; a periodic behaviour is a handler that re-arms its own
//! timer on every expiry.

use heapless::Vec;

use super::ServiceId;

/// Every timer in the system.  The discriminant travels in the event param.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum TimerId {
    /// Length of a round.
    SessionCountdown = 0,
    /// Round abandoned without hits.
    Inactivity = 1,
    /// 1 Hz countdown and scoring tick.
    SecondTick = 2,
    /// Result display hold before returning to the lobby.
    Settle = 3,
    /// Target slew period.
    MotionUpdate = 4,
    /// Gear dispenser hold time.
    GearDwell = 5,
}

impl TimerId {
    pub const COUNT: usize = 6;

    pub const ALL: [TimerId; Self::COUNT] = [
        Self::SessionCountdown,
        Self::Inactivity,
        Self::SecondTick,
        Self::Settle,
        Self::MotionUpdate,
        Self::GearDwell,
    ];

    pub fn from_param(param: u16) -> Option<Self> {
        Self::ALL.get(param as usize).copied()
    }

    /// Service that receives the expiry.  The gear dwell goes through the
    /// game service, whose interceptor hands it to motion.
    pub const fn owner(self) -> ServiceId {
        match self {
            Self::MotionUpdate => ServiceId::Motion,
            Self::SessionCountdown
            | Self::Inactivity
            | Self::SecondTick
            | Self::Settle
            | Self::GearDwell => ServiceId::Game,
        }
    }
}

pub struct TimerBank {
    remaining: [Option<u32>; TimerId::COUNT],
}

impl TimerBank {
    pub fn new() -> Self {
        Self {
            remaining: [None; TimerId::COUNT],
        }
    }

    /// Arm `id`, replacing any running countdown.
    pub fn start(&mut self, id: TimerId, duration_ms: u32) {
        self.remaining[id as usize] = Some(duration_ms);
    }

    pub fn stop(&mut self, id: TimerId) {
        self.remaining[id as usize] = None;
    }

    pub fn is_running(&self, id: TimerId) -> bool {
        self.remaining[id as usize].is_some()
    }

    pub fn remaining(&self, id: TimerId) -> Option<u32> {
        self.remaining[id as usize]
    }

    /// Let `elapsed_ms` pass.  Expired timers are disarmed and returned in
    /// id order.
    pub fn advance(&mut self, elapsed_ms: u32) -> Vec<TimerId, { TimerId::COUNT }> {
        let mut expired = Vec::new();
        for id in TimerId::ALL {
            let slot = &mut self.remaining[id as usize];
            if let Some(left) = *slot {
                if left <= elapsed_ms {
                    *slot = None;
                    // Capacity equals the number of timers.
                    let _ = expired.push(id);
                } else {
                    *slot = Some(left - elapsed_ms);
                }
            }
        }
        expired
    }
}

impl Default for TimerBank {
    fn default() -> Self {
        Self::new()
    }
}
