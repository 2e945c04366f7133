//! Laser hit detector for one target photo-sensor.
//!
//! Two-state latch with asymmetric hysteresis:
//!
//! ```text
//!  CLEAR ──[sample > baseline + hit_delta]──▶ HIT
//!    ▲                                         │
//!    └──[sample < baseline + release_delta]────┘
//! ```
//!
//! `release_delta` is far below `hit_delta`, so a reading hovering near
//! either threshold cannot make the latch chatter.

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HitState {
    Clear,
    Hit,
}

#[derive(Debug, Clone, Copy)]
pub struct HitDetector {
    baseline: u16,
    hit_delta: u16,
    release_delta: u16,
    state: HitState,
}

impl HitDetector {
    pub fn new(baseline: u16, hit_delta: u16, release_delta: u16) -> Self {
        Self {
            baseline,
            hit_delta,
            release_delta,
            state: HitState::Clear,
        }
    }

    /// Feed one sample.  Returns the new state if the latch flipped.
    pub fn check(&mut self, sample: u16) -> Option<HitState> {
        let sample = u32::from(sample);
        let base = u32::from(self.baseline);
        match self.state {
            HitState::Clear if sample > base + u32::from(self.hit_delta) => {
                self.state = HitState::Hit;
                Some(HitState::Hit)
            }
            HitState::Hit if sample < base + u32::from(self.release_delta) => {
                self.state = HitState::Clear;
                Some(HitState::Clear)
            }
            _ => None,
        }
    }

    /// Replace the resting level.  The latch is cleared.
    pub fn set_baseline(&mut self, baseline: u16) {
        self.baseline = baseline;
        self.state = HitState::Clear;
    }

    pub fn set_thresholds(&mut self, hit_delta: u16, release_delta: u16) {
        self.hit_delta = hit_delta;
        self.release_delta = release_delta;
    }

    pub fn baseline(&self) -> u16 {
        self.baseline
    }

    pub fn state(&self) -> HitState {
        self.state
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const BASE: u16 = 200;
    const HIT: u16 = 300;
    const REL: u16 = 20;

    #[test]
    fn threshold_is_exclusive() {
        let mut d = HitDetector::new(BASE, HIT, REL);
        assert_eq!(d.check(BASE + HIT), None);
        assert_eq!(d.check(BASE + HIT + 1), Some(HitState::Hit));
    }

    #[test]
    fn no_chatter_while_hovering_at_release_level() {
        let mut d = HitDetector::new(BASE, HIT, REL);
        let mut events = std::vec::Vec::new();
        events.extend(d.check(BASE + HIT + 1));
        for i in 0..50 {
            let s = if i % 2 == 0 { BASE + REL } else { BASE + REL + 1 };
            events.extend(d.check(s));
        }
        assert_eq!(events, vec![HitState::Hit]);

        assert_eq!(d.check(BASE + REL - 1), Some(HitState::Clear));
    }

    #[test]
    fn rebaseline_clears_latch() {
        let mut d = HitDetector::new(BASE, HIT, REL);
        d.check(1_000);
        d.set_baseline(600);
        assert_eq!(d.state(), HitState::Clear);
        assert_eq!(d.check(800), None);
    }
}
