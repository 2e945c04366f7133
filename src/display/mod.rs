//! Render pipeline: message composition and non-blocking display transfer.
//!
//! ```text
//!  SHOW_* ──▶ compose into FrameBuffer ──▶ PUSH_STEP ──▶ one row ──┐
//!                                              ▲                    │
//!                                              └──── not done ──────┘
//! ```
//!
//! The first `Init` event walks the device bring-up sequence the same way,
//! one step per pass.  Push steps that arrive before bring-up has finished
//! are ignored; bring-up completion re-posts one if a message is waiting.
//! A push step that never makes it into the queue ends the chain, and the
//! next compose starts a new one.
//! The service also owns the status light strip, which is repainted on
//! `DifficultyChanged`.

pub mod font;
pub mod frame;
pub mod steps;

use core::fmt::Write as _;

use heapless::String;
use log::{debug, warn};

use crate::app::ports::{DisplayPort, StripPort};
use crate::config::GameConfig;
use crate::events::{Event, EventKind};
use crate::framework::{Effects, ServiceId, StepResult};
use crate::status_light::StatusLightController;
use frame::FrameBuffer;
use steps::{BringUp, RowPush};

/// Fixed messages the display can show.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u16)]
pub enum MessageId {
    Welcome = 0,
    Test = 1,
}

impl MessageId {
    /// Unknown ids fall back to the welcome banner.
    pub fn from_param(param: u16) -> Self {
        match param {
            1 => Self::Test,
            _ => Self::Welcome,
        }
    }

    pub const fn text(self) -> &'static str {
        match self {
            Self::Welcome => "WELCOME",
            Self::Test => "TEST",
        }
    }
}

pub struct RenderPipeline {
    frame: FrameBuffer,
    push: RowPush,
    bring_up: BringUp,
    push_pending: bool,
    /// A `DisplayPushStep` for the current push is queued.
    chain_live: bool,
    scroll_cols: u8,
    status: StatusLightController,
}

impl RenderPipeline {
    pub fn new(config: &GameConfig) -> Self {
        Self {
            frame: FrameBuffer::new(),
            push: RowPush::new(),
            bring_up: BringUp::new(),
            push_pending: false,
            chain_live: false,
            scroll_cols: config.glyph_scroll_cols,
            status: StatusLightController::new(config.strip_len, config.strip_brightness),
        }
    }

    /// Service entry point: one event per call.
    pub fn run(
        &mut self,
        event: Event,
        out: &mut (impl DisplayPort + StripPort),
        fx: &mut Effects,
    ) {
        match event.kind {
            EventKind::Init => self.bring_up_step(out, fx),
            EventKind::DisplayShowMessage => {
                self.compose(MessageId::from_param(event.param).text(), fx);
            }
            EventKind::DisplayShowScore => self.show_number(Some("SC:"), event.param, fx),
            EventKind::DisplayShowCountdown => self.show_number(None, event.param, fx),
            EventKind::DisplayShowDifficulty => {
                self.show_number(None, event.param.clamp(1, 100), fx);
            }
            EventKind::DisplayPushStep => self.push_step(out, fx),
            EventKind::DifficultyChanged => {
                let pct = event.param.min(u16::from(u8::MAX)) as u8;
                self.status.update(pct, out);
            }
            _ => {}
        }
    }

    fn bring_up_step(&mut self, out: &mut impl DisplayPort, fx: &mut Effects) {
        if self.bring_up.is_complete() {
            return;
        }
        let keep = self.push_pending;
        let was_pushing = self.bring_up.current() == steps::BringUpStep::PushBuffer;
        match self.bring_up.step(&mut self.frame, &mut self.push, keep, out) {
            StepResult::InProgress => {
                // The bring-up push sends whatever is in the buffer.
                if was_pushing && self.bring_up.current() == steps::BringUpStep::ExitLowPower {
                    self.push_pending = false;
                }
                fx.post(ServiceId::Display, Event::bare(EventKind::Init));
            }
            StepResult::Done => {
                if self.push_pending {
                    self.push.restart();
                    self.chain_live =
                        fx.post(ServiceId::Display, Event::bare(EventKind::DisplayPushStep));
                }
            }
        }
    }

    fn show_number(&mut self, prefix: Option<&str>, value: u16, fx: &mut Effects) {
        let mut text: String<12> = String::new();
        if write!(text, "{}{}", prefix.unwrap_or(""), value).is_err() {
            warn!("display text overflow for {}", value);
        }
        self.compose(&text, fx);
    }

    /// Rebuild the buffer and start (or restart) the row push.
    fn compose(&mut self, text: &str, fx: &mut Effects) {
        debug!("display: \"{}\"", text);
        self.frame.compose(text, self.scroll_cols);
        self.push.restart();
        self.push_pending = true;
        if self.bring_up.is_complete() && !self.chain_live {
            self.chain_live =
                fx.post(ServiceId::Display, Event::bare(EventKind::DisplayPushStep));
        }
    }

    fn push_step(&mut self, out: &mut impl DisplayPort, fx: &mut Effects) {
        if !self.push_pending || !self.bring_up.is_complete() {
            return;
        }
        match self.push.step(&self.frame, out) {
            StepResult::InProgress => {
                self.chain_live =
                    fx.post(ServiceId::Display, Event::bare(EventKind::DisplayPushStep));
            }
            StepResult::Done => {
                self.push_pending = false;
                self.chain_live = false;
            }
        }
    }

    /// A push step posted by the last call was rejected by a full queue.
    pub fn continuation_lost(&mut self) {
        self.chain_live = false;
    }

    pub fn reconfigure(&mut self, config: &GameConfig) {
        self.scroll_cols = config.glyph_scroll_cols;
        self.status.retune(config.strip_len, config.strip_brightness);
    }

    pub fn frame(&self) -> &FrameBuffer {
        &self.frame
    }

    pub fn is_ready(&self) -> bool {
        self.bring_up.is_complete()
    }

    pub fn push_pending(&self) -> bool {
        self.push_pending
    }

    pub fn status_light(&self) -> &StatusLightController {
        &self.status
    }
}
