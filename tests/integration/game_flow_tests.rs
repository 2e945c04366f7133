//! Integration tests for whole rounds: boot → lobby → gameplay → round end
//! → lobby, driven through `GameService::run_pass` against the mock cabinet.

use laserlift::app::events::{AppEvent, RoundOutcome};
use laserlift::config::GameConfig;
use laserlift::display::frame::FrameBuffer;
use laserlift::events::{AxisId, Event, EventKind};
use laserlift::framework::timers::TimerId;
use laserlift::fsm::GameMode;
use laserlift::motion::GearState;

use crate::mock_hw::Cabinet;

/// Targets never move, so a round can only end on a timer.
fn frozen_targets() -> GameConfig {
    GameConfig {
        min_step: 0,
        max_step: 0,
        ..GameConfig::default()
    }
}

fn composed(text: &str) -> FrameBuffer {
    let mut f = FrameBuffer::new();
    f.compose(text, GameConfig::default().glyph_scroll_cols);
    f
}

fn crashes(cab: &Cabinet) -> usize {
    cab.sink.count(|e| matches!(e, AppEvent::Crashed))
}

// ── Boot ─────────────────────────────────────────────────────

#[test]
fn boot_brings_up_display_and_parks_targets() {
    let cab = Cabinet::boot(GameConfig::default());

    assert_eq!(cab.mode(), GameMode::Waiting);
    assert_eq!(
        cab.hw.commands(),
        vec![0x0C00, 0x0900, 0x0B07, 0x0A00, 0x0C01],
        "bring-up command order"
    );
    assert_eq!(cab.hw.rows_sent(), 8, "one full buffer push during bring-up");
    assert!(cab.svc.display().is_ready());
    assert!(!cab.svc.display().push_pending());

    for ch in 0..3 {
        assert_eq!(cab.hw.servo(ch), Some(1_000), "axis channel {ch} parked");
    }
    assert_eq!(cab.hw.servo(3), None, "gear untouched");
    assert!(cab.sink.events.contains(&AppEvent::Calibrated([200, 200, 200])));
}

// ── Round start ──────────────────────────────────────────────

#[test]
fn wave_starts_round_and_targets_fall() {
    let mut cab = Cabinet::boot(GameConfig::default());
    cab.wave();

    assert_eq!(cab.mode(), GameMode::Gameplay);
    assert_eq!(cab.svc.seconds_left(), 60);
    assert_eq!(cab.svc.score(), 0);
    for axis in AxisId::ALL {
        assert_eq!(cab.svc.motion().axis(axis).target(), 100);
    }

    cab.run_ms(200);
    for ch in 0..3 {
        let pos = cab.hw.servo(ch).unwrap_or(0);
        assert!(pos < 1_000 && pos > 100, "channel {ch} mid-fall at {pos}");
    }
}

#[test]
fn countdown_is_rendered_each_second() {
    let mut cab = Cabinet::boot(GameConfig::default());
    cab.wave();
    cab.run_ms(1_100);

    assert_eq!(cab.mode(), GameMode::Gameplay);
    assert_eq!(cab.svc.seconds_left(), 59);
    assert_eq!(cab.svc.display().frame(), &composed("59"));
    assert!(!cab.svc.display().push_pending());
}

// ── Round end ────────────────────────────────────────────────

#[test]
fn unattended_targets_crash_once_and_lose() {
    let mut cab = Cabinet::boot(GameConfig::default());
    cab.wave();

    assert!(cab.run_until(5_000, |c| c.mode() == GameMode::Losing));
    // All three hit the floor on the same tick.
    cab.run_ms(200);
    assert_eq!(crashes(&cab), 1);
    assert!(cab.svc.motion().crash_latched());

    let score = cab.svc.score();
    assert!(cab.sink.events.contains(&AppEvent::RoundOver {
        score,
        outcome: RoundOutcome::Crashed,
    }));
    assert_eq!(cab.svc.display().frame(), &composed(&format!("SC:{score}")));

    // Gameplay timers are gone; only the settle timer runs.
    assert!(!cab.svc.timers().is_running(TimerId::SessionCountdown));
    assert!(!cab.svc.timers().is_running(TimerId::Inactivity));
    assert!(!cab.svc.timers().is_running(TimerId::SecondTick));
    assert!(cab.svc.timers().is_running(TimerId::Settle));
}

#[test]
fn crash_latch_rearms_for_the_next_round() {
    let mut cab = Cabinet::boot(GameConfig::default());
    cab.wave();
    assert!(cab.run_until(5_000, |c| c.mode() == GameMode::Losing));

    assert!(cab.run_until(4_000, |c| c.mode() == GameMode::Waiting));
    assert!(!cab.svc.motion().crash_latched());
    for ch in 0..3 {
        assert_eq!(cab.hw.servo(ch), Some(1_000));
    }
    assert_eq!(cab.svc.motion().gears_dispensed(), 0, "no prize for a crash");

    cab.wave();
    assert!(cab.run_until(5_000, |c| c.mode() == GameMode::Losing));
    cab.run_ms(100);
    assert_eq!(crashes(&cab), 2);
}

#[test]
fn kept_up_targets_complete_the_session_and_dispense() {
    let mut cab = Cabinet::boot(frozen_targets());
    cab.wave();
    let started = cab.now_ms;

    // A hit every 10 s keeps the inactivity timer from firing.
    let mut next_shot = cab.now_ms + 10_000;
    while cab.mode() == GameMode::Gameplay && cab.now_ms < started + 70_000 {
        if cab.now_ms >= next_shot {
            cab.hw.shine(AxisId::One, true);
            cab.run_ms(50);
            cab.hw.shine(AxisId::One, false);
            next_shot += 10_000;
        }
        cab.pass();
    }

    assert_eq!(cab.mode(), GameMode::Completing);
    let elapsed = cab.now_ms - started;
    assert!((59_900..=60_200).contains(&elapsed), "session ended at {elapsed} ms");

    // Every target sat above the danger line for every tick.
    let ticks = 60 - cab.svc.seconds_left();
    assert_eq!(cab.svc.score(), 3 * ticks);
    assert!(cab.sink.events.contains(&AppEvent::RoundOver {
        score: cab.svc.score(),
        outcome: RoundOutcome::Completed,
    }));

    assert!(cab.run_until(4_000, |c| c.mode() == GameMode::Waiting));
    assert_eq!(cab.hw.servo(3), Some(1_000), "gear swung to dispense");
    assert_eq!(cab.svc.motion().gears_dispensed(), 1);

    cab.run_ms(1_200);
    assert_eq!(cab.hw.servo(3), Some(0), "gear back at rest");
    assert_eq!(cab.svc.motion().gear_state(), GearState::Idle);
}

#[test]
fn no_hits_abandons_the_round() {
    let mut cab = Cabinet::boot(frozen_targets());
    cab.wave();
    let started = cab.now_ms;

    assert!(cab.run_until(25_000, |c| c.mode() == GameMode::NoInput));
    let elapsed = cab.now_ms - started;
    assert!((19_900..=20_200).contains(&elapsed), "abandoned at {elapsed} ms");
    assert!(cab.sink.events.iter().any(|e| matches!(
        e,
        AppEvent::RoundOver {
            outcome: RoundOutcome::Abandoned,
            ..
        }
    )));

    assert!(cab.run_until(4_000, |c| c.mode() == GameMode::Waiting));
    assert_eq!(cab.svc.motion().gears_dispensed(), 0);
    assert_eq!(cab.hw.servo(3), None);
}

// ── Difficulty and status light ──────────────────────────────

#[test]
fn slider_sets_speed_with_clamping() {
    let mut cab = Cabinet::boot(GameConfig::default());
    assert_eq!(cab.svc.difficulty_pct(), 50);

    cab.hw.set_slider(0);
    cab.run_ms(50);
    assert_eq!(cab.svc.difficulty_pct(), 1);
    assert_eq!(cab.svc.motion().difficulty_pct(), 1);
    assert_eq!(cab.svc.motion().axis(AxisId::Two).max_step(), 2);
    assert_eq!(cab.svc.display().frame(), &composed("1"));

    assert!(cab.svc.post(Event::new(EventKind::DifficultyChanged, 150)));
    cab.run_ms(100);
    assert_eq!(cab.svc.difficulty_pct(), 100);
    assert_eq!(cab.svc.motion().axis(AxisId::Two).max_step(), 20);
    assert_eq!(cab.svc.display().frame(), &composed("100"));
}

#[test]
fn status_strip_repaints_only_on_bucket_change() {
    let mut cab = Cabinet::boot(GameConfig::default());
    assert_eq!(cab.hw.strip_shows(), 1);
    assert_eq!(cab.hw.pixels_written, 122);

    // 50 % -> 60 %: bucket 3 -> 4
    cab.hw.set_slider(620);
    cab.run_ms(50);
    assert_eq!(cab.hw.strip_shows(), 2);

    // 60 % -> 72 %: still bucket 4
    cab.hw.set_slider(740);
    cab.run_ms(50);
    assert_eq!(cab.svc.difficulty_pct(), 72);
    assert_eq!(cab.hw.strip_shows(), 2);
}

#[test]
fn difficulty_is_ignored_during_gameplay() {
    let mut cab = Cabinet::boot(frozen_targets());
    cab.wave();
    cab.hw.set_slider(1_000);
    cab.run_ms(100);
    assert_eq!(cab.mode(), GameMode::Gameplay);
    assert_eq!(cab.svc.difficulty_pct(), 50);
}
