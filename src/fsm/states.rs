//! Concrete mode handler functions, interceptors and table builder.
//!
//! Each mode is defined by plain `fn` pointers: no closures, no dynamic
//! dispatch, no heap.
//!
//! ```text
//!  INIT ──[init]──▶ WAITING ──[wave]──▶ GAMEPLAY
//!    │                 ▲  ▲                │ │ │
//!    │                 │  │   [session]────┘ │ └───[crashed]
//!    │                 │  │       ▼          │          ▼
//!    │                 │  └── COMPLETING  [inactivity] LOSING
//!    │                 │     (gear)  │        ▼          │
//!    │                 │             │     NO_INPUT      │
//!    │                 └──[settle]───┴────────┴──────────┘
//!    │
//!    └──[init, test build]──▶ TEST ──[key 'x']──▶ WAITING
//! ```

use log::{debug, info};

use super::context::{GameAction, GameContext};
use super::{GameMode, InterceptorFn, ModeDescriptor};
use crate::display::MessageId;
use crate::events::{AxisId, Event, EventKind};
use crate::framework::ServiceId;
use crate::framework::timers::TimerId;
use crate::motion::{JogTarget, MotionCommand};

// ═══════════════════════════════════════════════════════════════════════════
//  Table builder
// ═══════════════════════════════════════════════════════════════════════════

/// Build the static mode table.  Called once at startup.
pub fn build_mode_table() -> [ModeDescriptor; GameMode::COUNT] {
    [
        // Index 0 — Init
        ModeDescriptor {
            id: GameMode::Init,
            name: "Init",
            on_enter: None,
            on_exit: None,
            on_event: init_event,
        },
        // Index 1 — Waiting
        ModeDescriptor {
            id: GameMode::Waiting,
            name: "Waiting",
            on_enter: Some(waiting_enter),
            on_exit: None,
            on_event: waiting_event,
        },
        // Index 2 — Gameplay
        ModeDescriptor {
            id: GameMode::Gameplay,
            name: "Gameplay",
            on_enter: Some(gameplay_enter),
            on_exit: Some(gameplay_exit),
            on_event: gameplay_event,
        },
        // Index 3 — Completing
        ModeDescriptor {
            id: GameMode::Completing,
            name: "Completing",
            on_enter: Some(show_score_and_settle),
            on_exit: None,
            on_event: completing_event,
        },
        // Index 4 — Losing
        ModeDescriptor {
            id: GameMode::Losing,
            name: "Losing",
            on_enter: Some(show_score_and_settle),
            on_exit: None,
            on_event: round_end_event,
        },
        // Index 5 — NoInput
        ModeDescriptor {
            id: GameMode::NoInput,
            name: "NoInput",
            on_enter: Some(no_input_enter),
            on_exit: None,
            on_event: round_end_event,
        },
        // Index 6 — Test
        ModeDescriptor {
            id: GameMode::Test,
            name: "Test",
            on_enter: Some(test_enter),
            on_exit: None,
            on_event: test_event,
        },
    ]
}

// ═══════════════════════════════════════════════════════════════════════════
//  Interceptors (run before the mode table, in this order)
// ═══════════════════════════════════════════════════════════════════════════

pub static INTERCEPTORS: &[InterceptorFn] = &[forward_push_step, forward_gear_dwell];

/// Row-push continuation belongs to the display whatever the mode.
fn forward_push_step(ctx: &mut GameContext, event: Event) -> bool {
    if event.kind != EventKind::DisplayPushStep {
        return false;
    }
    ctx.effects.post(ServiceId::Display, event);
    true
}

/// The gear dispenser keeps sequencing after the round has ended.
fn forward_gear_dwell(ctx: &mut GameContext, event: Event) -> bool {
    if !event.is_timeout(TimerId::GearDwell) {
        return false;
    }
    ctx.effects.post(ServiceId::Motion, event);
    true
}

// ═══════════════════════════════════════════════════════════════════════════
//  Shared helpers
// ═══════════════════════════════════════════════════════════════════════════

/// Clamp, render and forward a slider reading.
fn apply_difficulty(ctx: &mut GameContext, raw_pct: u16) {
    let pct = raw_pct.clamp(1, 100) as u8;
    ctx.difficulty_pct = pct;
    ctx.show(EventKind::DisplayShowDifficulty, u16::from(pct));
    ctx.effects.post(
        ServiceId::Display,
        Event::new(EventKind::DifficultyChanged, u16::from(pct)),
    );
    ctx.command(MotionCommand::SetDifficulty(pct));
    debug!("difficulty set to {pct}%");
}

fn show_score_and_settle(ctx: &mut GameContext) {
    ctx.show(EventKind::DisplayShowScore, ctx.score);
    ctx.effects.start_timer(TimerId::Settle, ctx.config.settle_ms);
    info!("round over, score {}", ctx.score);
}

// ═══════════════════════════════════════════════════════════════════════════
//  INIT mode
// ═══════════════════════════════════════════════════════════════════════════

fn init_event(ctx: &mut GameContext, event: Event) -> Option<GameMode> {
    if event.kind != EventKind::Init {
        return None;
    }
    ctx.request(GameAction::CaptureBaselines);
    if ctx.config.start_in_test_mode {
        Some(GameMode::Test)
    } else {
        Some(GameMode::Waiting)
    }
}

// ═══════════════════════════════════════════════════════════════════════════
//  WAITING mode — lobby, targets up, slider live
// ═══════════════════════════════════════════════════════════════════════════

fn waiting_enter(ctx: &mut GameContext) {
    ctx.command(MotionCommand::RaiseAll);
    ctx.show_message(MessageId::Welcome);
}

fn waiting_event(ctx: &mut GameContext, event: Event) -> Option<GameMode> {
    match event.kind {
        EventKind::DifficultyChanged => {
            apply_difficulty(ctx, event.param);
            None
        }
        EventKind::WaveDetected => Some(GameMode::Gameplay),
        _ => None,
    }
}

// ═══════════════════════════════════════════════════════════════════════════
//  GAMEPLAY mode — targets falling, hits push them back up
// ═══════════════════════════════════════════════════════════════════════════

fn gameplay_enter(ctx: &mut GameContext) {
    ctx.score = 0;
    ctx.seconds_left = ctx.config.session_secs;
    ctx.show(EventKind::DisplayShowCountdown, ctx.seconds_left);

    let cfg = &ctx.config;
    let (session, inactivity, tick) = (cfg.session_ms, cfg.inactivity_ms, cfg.second_tick_ms);
    ctx.effects.start_timer(TimerId::SessionCountdown, session);
    ctx.effects.start_timer(TimerId::Inactivity, inactivity);
    ctx.effects.start_timer(TimerId::SecondTick, tick);

    ctx.command(MotionCommand::FallAll);
    info!(
        "round started: {}s at {}% difficulty",
        ctx.seconds_left, ctx.difficulty_pct
    );
}

fn gameplay_exit(ctx: &mut GameContext) {
    ctx.effects.stop_timer(TimerId::SessionCountdown);
    ctx.effects.stop_timer(TimerId::Inactivity);
    ctx.effects.stop_timer(TimerId::SecondTick);
}

fn gameplay_event(ctx: &mut GameContext, event: Event) -> Option<GameMode> {
    match event.kind {
        EventKind::Hit(axis) => {
            ctx.command(MotionCommand::Rise(axis));
            ctx.effects
                .start_timer(TimerId::Inactivity, ctx.config.inactivity_ms);
            None
        }
        EventKind::NoHit(axis) => {
            ctx.command(MotionCommand::Fall(axis));
            None
        }
        EventKind::Crashed => Some(GameMode::Losing),
        EventKind::Timeout => match event.timer()? {
            TimerId::SecondTick => {
                ctx.seconds_left = ctx.seconds_left.saturating_sub(1);
                ctx.show(EventKind::DisplayShowCountdown, ctx.seconds_left);
                ctx.score = ctx.score.saturating_add(u16::from(ctx.elevated_axes));
                ctx.effects
                    .start_timer(TimerId::SecondTick, ctx.config.second_tick_ms);
                None
            }
            TimerId::SessionCountdown => Some(GameMode::Completing),
            TimerId::Inactivity => Some(GameMode::NoInput),
            _ => None,
        },
        _ => None,
    }
}

// ═══════════════════════════════════════════════════════════════════════════
//  Round end — COMPLETING / LOSING / NO_INPUT
// ═══════════════════════════════════════════════════════════════════════════

fn no_input_enter(ctx: &mut GameContext) {
    ctx.effects.start_timer(TimerId::Settle, ctx.config.settle_ms);
    info!("round abandoned, no hits for {} ms", ctx.config.inactivity_ms);
}

fn completing_event(ctx: &mut GameContext, event: Event) -> Option<GameMode> {
    let next = round_end_event(ctx, event);
    if next.is_some() {
        ctx.command(MotionCommand::TriggerGear);
    }
    next
}

fn round_end_event(_ctx: &mut GameContext, event: Event) -> Option<GameMode> {
    event
        .is_timeout(TimerId::Settle)
        .then_some(GameMode::Waiting)
}

// ═══════════════════════════════════════════════════════════════════════════
//  TEST mode — bench exercise of axes, gear and sensors
// ═══════════════════════════════════════════════════════════════════════════

fn test_enter(ctx: &mut GameContext) {
    ctx.show_message(MessageId::Test);
    ctx.command(MotionCommand::RaiseAll);
    info!("TEST: keys 1-3 raise, 4-6 drop, g gear, s report, c calibrate, x exit");
}

fn test_event(ctx: &mut GameContext, event: Event) -> Option<GameMode> {
    match event.kind {
        EventKind::NewInput => test_key(ctx, event.param),
        EventKind::Hit(axis) => {
            ctx.command(MotionCommand::Jog(axis, JogTarget::Ceiling));
            None
        }
        EventKind::NoHit(axis) => {
            ctx.command(MotionCommand::Jog(axis, JogTarget::Floor));
            None
        }
        EventKind::DifficultyChanged => {
            apply_difficulty(ctx, event.param);
            None
        }
        _ => None,
    }
}

fn test_key(ctx: &mut GameContext, key: u16) -> Option<GameMode> {
    let key = u8::try_from(key).ok()?;
    match key {
        b'1'..=b'3' => {
            let axis = AxisId::from_index(usize::from(key - b'1'))?;
            ctx.command(MotionCommand::Jog(axis, JogTarget::Ceiling));
        }
        b'4'..=b'6' => {
            let axis = AxisId::from_index(usize::from(key - b'4'))?;
            ctx.command(MotionCommand::Jog(axis, JogTarget::Floor));
        }
        b'g' => ctx.command(MotionCommand::TriggerGear),
        b's' => ctx.request(GameAction::ReportSensors),
        b'c' => ctx.request(GameAction::CaptureBaselines),
        b'x' => return Some(GameMode::Waiting),
        _ => debug!("TEST: unmapped key {key:#04x}"),
    }
    None
}
