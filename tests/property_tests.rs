//! Property tests for the controller's core invariants.
//!
//! Runs on host (x86_64) only; proptest is not available for bare-metal
//! targets.  On those targets these tests are compiled out.

#![cfg(not(target_os = "none"))]

use laserlift::app::ports::{ActuatorPort, DisplayPort};
use laserlift::config::GameConfig;
use laserlift::display::frame::{FrameBuffer, ROWS};
use laserlift::display::steps::RowPush;
use laserlift::events::{AxisId, EventKind};
use laserlift::framework::timers::{TimerBank, TimerId};
use laserlift::framework::{Effects, StepResult};
use laserlift::motion::axis::Axis;
use laserlift::motion::{MotionCommand, MotionController, map_difficulty};
use laserlift::sensors::hit::{HitDetector, HitState};
use proptest::prelude::*;

struct NullServos;

impl ActuatorPort for NullServos {
    fn set_actuator_position(&mut self, _channel: u8, _ticks: i32) {}
}

#[derive(Default)]
struct RowLog(Vec<u8>);

impl DisplayPort for RowLog {
    fn send_command(&mut self, _word: u16) {}
    fn transfer_row(&mut self, row: u8, _bitmap: u32) {
        self.0.push(row);
    }
}

// ── Axis slew ─────────────────────────────────────────────────

proptest! {
    /// Ticking reaches the target within ceil(|distance| / max_step) ticks
    /// and never leaves [floor, ceiling].
    #[test]
    fn slew_converges_within_bound(
        floor in 0i32..500,
        travel in 1i32..1_500,
        max_step in 1i32..50,
        start_frac in 0.0f64..=1.0,
        target_frac in 0.0f64..=1.0,
    ) {
        let ceiling = floor + travel;
        let mut axis = Axis::new(floor, ceiling, max_step);
        let start = floor + (f64::from(travel) * start_frac) as i32;
        let target = floor + (f64::from(travel) * target_frac) as i32;
        axis.jog_to(start);
        axis.set_target(target);

        let bound = (start - target).unsigned_abs().div_ceil(max_step as u32);
        prop_assert_eq!(axis.ticks_to_target(), bound);

        for _ in 0..bound {
            let p = axis.step();
            prop_assert!((floor..=ceiling).contains(&p));
        }
        prop_assert_eq!(axis.position(), target);

        // Further ticks hold position.
        prop_assert_eq!(axis.step(), target);
    }

    /// Out-of-range targets are clamped, so the position stays in travel.
    #[test]
    fn wild_targets_stay_in_travel(target in any::<i32>(), steps in 1usize..400) {
        let mut axis = Axis::new(100, 1_000, 20);
        axis.set_target(target);
        for _ in 0..steps {
            let p = axis.step();
            prop_assert!((100..=1_000).contains(&p));
        }
    }
}

// ── Crash latch ───────────────────────────────────────────────

#[derive(Debug, Clone)]
enum Op {
    Tick,
    Rise(usize),
    Fall(usize),
    FallAll,
}

fn arb_op() -> impl Strategy<Value = Op> {
    prop_oneof![
        4 => Just(Op::Tick),
        1 => (0usize..3).prop_map(Op::Rise),
        1 => (0usize..3).prop_map(Op::Fall),
        1 => Just(Op::FallAll),
    ]
}

proptest! {
    /// Whatever happens during an episode, at most one crash is reported,
    /// and after raise-all the latch is clear again.
    #[test]
    fn at_most_one_crash_per_episode(
        episodes in proptest::collection::vec(
            proptest::collection::vec(arb_op(), 0..300), 1..4),
        pct in 1u8..=100,
    ) {
        let mut motion = MotionController::new(&GameConfig::default());
        let mut out = NullServos;
        motion.set_difficulty(pct);

        for ops in episodes {
            motion.raise_all(&mut out);
            prop_assert!(!motion.crash_latched());

            let mut fx = Effects::new();
            let mut crashes = 0;
            for op in ops {
                match op {
                    Op::Tick => {
                        if motion.tick(&mut out, &mut fx) {
                            crashes += 1;
                        }
                    }
                    Op::Rise(i) => motion.apply(MotionCommand::Rise(AxisId::ALL[i]), &mut out, &mut fx),
                    Op::Fall(i) => motion.apply(MotionCommand::Fall(AxisId::ALL[i]), &mut out, &mut fx),
                    Op::FallAll => motion.apply(MotionCommand::FallAll, &mut out, &mut fx),
                }
            }
            prop_assert!(crashes <= 1);
            let reported = fx
                .posts()
                .iter()
                .filter(|(_, e)| e.kind == EventKind::Crashed)
                .count();
            prop_assert_eq!(reported, crashes);
            prop_assert_eq!(motion.crash_latched(), crashes == 1);
        }
    }
}

// ── Hit hysteresis ────────────────────────────────────────────

proptest! {
    /// Rising past the hit threshold and then hovering at or just above the
    /// release level yields exactly one hit and no release.
    #[test]
    fn hovering_above_release_never_chatters(
        baseline in 0u16..2_000,
        hit_delta in 50u16..1_000,
        release_delta in 0u16..50,
        hover in proptest::collection::vec(0u16..=1, 1..200),
    ) {
        let mut d = HitDetector::new(baseline, hit_delta, release_delta);
        let mut changes = Vec::new();
        changes.extend(d.check(baseline + hit_delta + 1));
        for bump in hover {
            changes.extend(d.check(baseline + release_delta + bump));
        }
        prop_assert_eq!(changes, vec![HitState::Hit]);

        if baseline + release_delta > 0 {
            prop_assert_eq!(d.check(baseline + release_delta - 1), Some(HitState::Clear));
        }
    }
}

// ── Difficulty map ────────────────────────────────────────────

proptest! {
    #[test]
    fn difficulty_map_is_monotonic(a in 0u8..=255, b in 0u8..=255, min in 0i32..10, span in 0i32..40) {
        let max = min + span;
        let (lo, hi) = if a <= b { (a, b) } else { (b, a) };
        prop_assert!(map_difficulty(lo, min, max) <= map_difficulty(hi, min, max));
        prop_assert_eq!(map_difficulty(1, min, max), min);
        prop_assert_eq!(map_difficulty(100, min, max), max);
        prop_assert!((min..=max).contains(&map_difficulty(a, min, max)));
    }
}

// ── Row push ──────────────────────────────────────────────────

proptest! {
    /// N calls finish the push, rows go out top to bottom, and the cursor
    /// is back at zero for the next push.
    #[test]
    fn row_push_takes_exactly_n_calls(text in "[0-9]{0,5}", repeats in 1usize..4) {
        let mut frame = FrameBuffer::new();
        frame.compose(&text, 6);
        let mut push = RowPush::new();
        let mut log = RowLog::default();
        for _ in 0..repeats {
            for i in 0..ROWS {
                let r = push.step(&frame, &mut log);
                let expect = if i + 1 == ROWS { StepResult::Done } else { StepResult::InProgress };
                prop_assert_eq!(r, expect);
            }
            prop_assert_eq!(push.cursor(), 0);
        }
        let expected: Vec<u8> = (0..repeats).flat_map(|_| 0..ROWS as u8).collect();
        prop_assert_eq!(log.0, expected);
    }
}

// ── Timers ────────────────────────────────────────────────────

proptest! {
    /// A timer expires exactly once, on the advance that reaches its
    /// duration, however the elapsed time is sliced.
    #[test]
    fn timer_fires_once_at_deadline(
        duration in 1u32..5_000,
        slices in proptest::collection::vec(1u32..200, 1..200),
    ) {
        let mut bank = TimerBank::new();
        bank.start(TimerId::Settle, duration);
        let mut elapsed = 0u32;
        let mut fired_at = Vec::new();
        for s in slices {
            elapsed += s;
            if bank.advance(s).contains(&TimerId::Settle) {
                fired_at.push(elapsed);
            }
        }
        if elapsed >= duration {
            prop_assert_eq!(fired_at.len(), 1);
            prop_assert!(fired_at[0] >= duration && fired_at[0] - duration < 200);
        } else {
            prop_assert!(fired_at.is_empty());
            prop_assert!(bank.is_running(TimerId::Settle));
        }
    }
}
