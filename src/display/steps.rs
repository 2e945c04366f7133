//! Bounded-work step machines for the dot-matrix display.
//!
//! Neither machine ever does more than one bus transaction per call.  A
//! caller that gets [`StepResult::InProgress`] re-posts its driving event and
//! calls again on a later pass.

use log::{debug, info};

use super::frame::{FrameBuffer, ROWS};
use crate::app::ports::DisplayPort;
use crate::framework::StepResult;

/// MAX7219 register words used during bring-up.
pub mod command {
    pub const SHUTDOWN: u16 = 0x0C00;
    pub const NORMAL_OPERATION: u16 = 0x0C01;
    pub const DECODE_NONE: u16 = 0x0900;
    pub const SCAN_ALL_DIGITS: u16 = 0x0B07;
    pub const INTENSITY_MIN: u16 = 0x0A00;
}

// ───────────────────────────────────────────────────────────────
// Row push
// ───────────────────────────────────────────────────────────────

/// Cursor over the frame buffer rows, top to bottom.
#[derive(Debug, Default)]
pub struct RowPush {
    cursor: usize,
}

impl RowPush {
    pub fn new() -> Self {
        Self::default()
    }

    /// Transmit the row under the cursor.  `Done` after the last row, with
    /// the cursor back at 0.
    pub fn step(&mut self, frame: &FrameBuffer, out: &mut impl DisplayPort) -> StepResult {
        out.transfer_row(self.cursor as u8, frame.row(self.cursor));
        self.cursor += 1;
        if self.cursor >= ROWS {
            self.cursor = 0;
            StepResult::Done
        } else {
            StepResult::InProgress
        }
    }

    /// Start the next push from the top row.
    pub fn restart(&mut self) {
        self.cursor = 0;
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }
}

// ───────────────────────────────────────────────────────────────
// Device bring-up
// ───────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BringUpStep {
    EnterLowPower,
    ClearBuffer,
    DisableDecode,
    EnableAllDigits,
    SetMinBrightness,
    PushBuffer,
    ExitLowPower,
}

#[derive(Debug)]
pub struct BringUp {
    step: BringUpStep,
    complete: bool,
}

impl BringUp {
    pub fn new() -> Self {
        Self {
            step: BringUpStep::EnterLowPower,
            complete: false,
        }
    }

    /// Advance one step.  The buffer is only cleared when `keep_frame` is
    /// false, so a message composed while the device is still coming up
    /// survives and is the first thing pushed.
    pub fn step(
        &mut self,
        frame: &mut FrameBuffer,
        push: &mut RowPush,
        keep_frame: bool,
        out: &mut impl DisplayPort,
    ) -> StepResult {
        debug!("display bring-up: {:?}", self.step);
        match self.step {
            BringUpStep::EnterLowPower => {
                out.send_command(command::SHUTDOWN);
                self.step = BringUpStep::ClearBuffer;
            }
            BringUpStep::ClearBuffer => {
                if !keep_frame {
                    frame.clear();
                }
                self.step = BringUpStep::DisableDecode;
            }
            BringUpStep::DisableDecode => {
                out.send_command(command::DECODE_NONE);
                self.step = BringUpStep::EnableAllDigits;
            }
            BringUpStep::EnableAllDigits => {
                out.send_command(command::SCAN_ALL_DIGITS);
                self.step = BringUpStep::SetMinBrightness;
            }
            BringUpStep::SetMinBrightness => {
                out.send_command(command::INTENSITY_MIN);
                push.restart();
                self.step = BringUpStep::PushBuffer;
            }
            BringUpStep::PushBuffer => {
                if push.step(frame, out).is_done() {
                    self.step = BringUpStep::ExitLowPower;
                }
            }
            BringUpStep::ExitLowPower => {
                out.send_command(command::NORMAL_OPERATION);
                self.step = BringUpStep::EnterLowPower;
                self.complete = true;
                info!("display ready");
                return StepResult::Done;
            }
        }
        StepResult::InProgress
    }

    pub fn current(&self) -> BringUpStep {
        self.step
    }

    pub fn is_complete(&self) -> bool {
        self.complete
    }
}

impl Default for BringUp {
    fn default() -> Self {
        Self::new()
    }
}
