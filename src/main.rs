//! LaserLift host simulator.
//!
//! Runs the real controller against [`SimHardware`] with a scripted player
//! and draws the dot-matrix panel as ASCII.
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │  SimHardware (all ports)        LogEventSink (EventSink)     │
//! │  ──────────────── Port Trait Boundary ──────────────────     │
//! │  ┌────────────────────────────────────────────────────────┐  │
//! │  │ GameService: Game FSM · Motion · Display · Checkers     │  │
//! │  └────────────────────────────────────────────────────────┘  │
//! └──────────────────────────────────────────────────────────────┘
//! ```
//!
//! Usage: `laserlift-sim [config.json]`

use anyhow::{Context, Result};
use log::info;

use laserlift::adapters::log_sink::LogEventSink;
use laserlift::adapters::sim::SimHardware;
use laserlift::app::service::GameService;
use laserlift::config::GameConfig;
use laserlift::events::AxisId;
use laserlift::fsm::GameMode;
use laserlift::pins;

/// Simulated wall time per dispatch pass.
const PASS_MS: u32 = 5;
/// How often the scripted player fires at the lowest target.
const SHOT_EVERY_MS: u32 = 400;
/// Upper bound on simulated time, in case a round never ends.
const MAX_SIM_MS: u32 = 10 * 60 * 1_000;

fn main() -> Result<()> {
    tracing_subscriber::fmt().compact().with_target(false).init();

    let config = match std::env::args().nth(1) {
        Some(path) => {
            let text = std::fs::read_to_string(&path)
                .with_context(|| format!("reading config {path}"))?;
            GameConfig::from_json(&text).with_context(|| format!("parsing config {path}"))?
        }
        None => GameConfig::default(),
    };

    let mut hw = SimHardware::new(config.strip_len);
    let mut sink = LogEventSink::new();
    let mut svc = GameService::new(config).context("building game service")?;
    svc.start(&mut sink).context("starting game service")?;

    // Boot until the lobby is up and the panel is idle.
    let mut now_ms = 0u32;
    while now_ms < MAX_SIM_MS && !(svc.query_mode() == GameMode::Waiting && svc.is_idle()) {
        svc.run_pass(&mut hw, PASS_MS, &mut sink);
        now_ms += PASS_MS;
    }
    info!("lobby ready after {} ms\n{}", now_ms, hw.render_ascii());

    // Player turns the slider up, then waves.
    hw.set_slider(800);
    run_for(&mut svc, &mut hw, &mut sink, 100, &mut now_ms);
    hw.wave();
    run_for(&mut svc, &mut hw, &mut sink, 50, &mut now_ms);
    hw.set_hand(false);

    let mut last_seconds = u16::MAX;
    let mut next_shot = now_ms;
    let mut lit: Option<AxisId> = None;
    while svc.query_mode() == GameMode::Gameplay && now_ms < MAX_SIM_MS {
        if now_ms >= next_shot {
            if let Some(axis) = lit.take() {
                hw.shine(axis, false);
            } else {
                let axis = lowest_target(&hw);
                hw.shine(axis, true);
                lit = Some(axis);
            }
            next_shot = now_ms + SHOT_EVERY_MS / 2;
        }

        svc.run_pass(&mut hw, PASS_MS, &mut sink);
        now_ms += PASS_MS;

        if svc.seconds_left() != last_seconds {
            last_seconds = svc.seconds_left();
            info!(
                "t-{:>2}s score {:>3} | {}",
                last_seconds,
                svc.score(),
                hw.gauge()
            );
        }
    }
    if let Some(axis) = lit {
        hw.shine(axis, false);
    }

    // Let the result settle and the lobby come back.
    while svc.query_mode() != GameMode::Waiting && now_ms < MAX_SIM_MS {
        svc.run_pass(&mut hw, PASS_MS, &mut sink);
        now_ms += PASS_MS;
    }
    run_for(&mut svc, &mut hw, &mut sink, 1_000, &mut now_ms);

    info!(
        "simulation finished at {} ms: rounds={} best={} gears={}\n{}",
        now_ms,
        sink.rounds(),
        sink.best_score(),
        svc.motion().gears_dispensed(),
        hw.render_ascii()
    );
    Ok(())
}

fn run_for(
    svc: &mut GameService,
    hw: &mut SimHardware,
    sink: &mut LogEventSink,
    duration_ms: u32,
    now_ms: &mut u32,
) {
    let end = *now_ms + duration_ms;
    while *now_ms < end {
        svc.run_pass(hw, PASS_MS, sink);
        *now_ms += PASS_MS;
    }
}

fn lowest_target(hw: &SimHardware) -> AxisId {
    AxisId::ALL
        .into_iter()
        .min_by_key(|a| hw.servo(pins::axis_channel(*a)).unwrap_or(i32::MAX))
        .unwrap_or(AxisId::One)
}
