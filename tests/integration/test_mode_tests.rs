//! Integration tests for the bench test mode and the inbound command path.

use laserlift::app::commands::AppCommand;
use laserlift::app::events::AppEvent;
use laserlift::config::GameConfig;
use laserlift::events::AxisId;
use laserlift::fsm::GameMode;
use laserlift::motion::GearState;

use crate::mock_hw::Cabinet;

fn bench() -> Cabinet {
    Cabinet::boot(GameConfig {
        start_in_test_mode: true,
        ..GameConfig::default()
    })
}

#[test]
fn test_build_boots_into_test_mode() {
    let cab = bench();
    assert_eq!(cab.mode(), GameMode::Test);
    assert!(cab.sink.events.contains(&AppEvent::ModeChanged {
        from: GameMode::Init,
        to: GameMode::Test,
    }));
    for ch in 0..3 {
        assert_eq!(cab.hw.servo(ch), Some(1_000));
    }
}

#[test]
fn number_keys_jog_axes() {
    let mut cab = bench();
    cab.press(b'4');
    assert_eq!(cab.hw.servo(0), Some(100));
    cab.press(b'6');
    assert_eq!(cab.hw.servo(2), Some(100));
    cab.press(b'1');
    assert_eq!(cab.hw.servo(0), Some(1_000));

    // Jogging to the floor outside gameplay never counts as a crash.
    cab.run_ms(500);
    assert!(!cab.svc.motion().crash_latched());
    assert_eq!(cab.hw.servo(2), Some(100));
}

#[test]
fn gear_key_sweeps_once_even_if_repeated() {
    let mut cab = bench();
    cab.press(b'g');
    assert_eq!(cab.hw.servo(3), Some(1_000));
    assert_eq!(cab.svc.motion().gear_state(), GearState::MovingToActive);

    cab.press(b'g');
    assert_eq!(cab.svc.motion().gears_dispensed(), 1);

    cab.run_ms(600);
    assert_eq!(cab.hw.servo(3), Some(0));
    assert_eq!(cab.svc.motion().gear_state(), GearState::MovingToRest);

    cab.run_ms(600);
    assert_eq!(cab.svc.motion().gear_state(), GearState::Idle);
}

#[test]
fn report_and_recalibrate_keys() {
    let mut cab = bench();
    cab.press(b's');
    let raw = cab.hw.scan;
    assert!(cab.sink.events.contains(&AppEvent::SensorReport {
        baselines: [200, 200, 200],
        raw,
    }));

    cab.hw.scan[3] = 300;
    cab.hw.scan[1] = 310;
    cab.hw.scan[0] = 320;
    cab.press(b'c');
    assert_eq!(cab.svc.checkers().baselines(), [300, 310, 320]);
    assert!(cab.sink.events.contains(&AppEvent::Calibrated([300, 310, 320])));
}

#[test]
fn hits_mirror_onto_axes() {
    let mut cab = bench();
    cab.hw.shine(AxisId::Two, true);
    cab.run_ms(20);
    assert_eq!(cab.hw.servo(1), Some(1_000));
    cab.hw.shine(AxisId::Two, false);
    cab.run_ms(20);
    assert_eq!(cab.hw.servo(1), Some(100));
}

#[test]
fn exit_key_returns_to_lobby() {
    let mut cab = bench();
    cab.press(b'5');
    cab.press(b'x');
    assert_eq!(cab.mode(), GameMode::Waiting);
    assert_eq!(cab.hw.servo(1), Some(1_000), "lobby raises every target");

    // Keys mean nothing outside test mode.
    cab.press(b'4');
    assert_eq!(cab.hw.servo(0), Some(1_000));
}

// ── Inbound commands ─────────────────────────────────────────

#[test]
fn force_mode_command_switches_and_reports() {
    let mut cab = Cabinet::boot(GameConfig::default());
    cab.svc
        .handle_command(AppCommand::ForceMode(GameMode::Test), &mut cab.hw, &mut cab.sink);
    assert_eq!(cab.mode(), GameMode::Test);
    assert_eq!(
        cab.sink.events.last(),
        Some(&AppEvent::ModeChanged {
            from: GameMode::Waiting,
            to: GameMode::Test,
        })
    );
}

#[test]
fn recalibrate_command_recaptures_baselines() {
    let mut cab = Cabinet::boot(GameConfig::default());
    cab.hw.scan = [250, 250, 512, 250];
    cab.svc
        .handle_command(AppCommand::Recalibrate, &mut cab.hw, &mut cab.sink);
    assert_eq!(
        cab.sink.events.last(),
        Some(&AppEvent::Calibrated([250, 250, 250]))
    );
}

#[test]
fn config_update_shortens_the_next_round() {
    let mut cab = Cabinet::boot(GameConfig::default());
    let short = GameConfig {
        session_secs: 30,
        session_ms: 30_000,
        ..GameConfig::default()
    };
    cab.svc
        .handle_command(AppCommand::UpdateConfig(short), &mut cab.hw, &mut cab.sink);
    cab.wave();
    assert_eq!(cab.mode(), GameMode::Gameplay);
    assert_eq!(cab.svc.seconds_left(), 30);
}

#[test]
fn invalid_config_update_is_rejected() {
    let mut cab = Cabinet::boot(GameConfig::default());
    let bad = GameConfig {
        release_delta: 500,
        ..GameConfig::default()
    };
    cab.svc
        .handle_command(AppCommand::UpdateConfig(bad), &mut cab.hw, &mut cab.sink);
    assert!(matches!(
        cab.sink.events.last(),
        Some(AppEvent::ConfigRejected(_))
    ));
    assert_eq!(cab.svc.config().release_delta, 20);
}
