//! Log-based event sink adapter.
//!
//! Implements [`EventSink`] by writing structured application events to
//! the `log` facade (serial console on the board, `tracing-subscriber`
//! output in the simulator).  A scoreboard adapter would implement the
//! same trait.

use log::{info, warn};

use crate::app::events::AppEvent;
use crate::app::ports::EventSink;

/// Adapter that logs every [`AppEvent`].
#[derive(Debug, Default)]
pub struct LogEventSink {
    rounds: u32,
    best_score: u16,
}

impl LogEventSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Rounds finished since start-up.
    pub fn rounds(&self) -> u32 {
        self.rounds
    }

    pub fn best_score(&self) -> u16 {
        self.best_score
    }
}

impl EventSink for LogEventSink {
    fn emit(&mut self, event: &AppEvent) {
        match event {
            AppEvent::Started(mode) => {
                info!("START | initial_mode={:?}", mode);
            }
            AppEvent::ModeChanged { from, to } => {
                info!("MODE  | {:?} -> {:?}", from, to);
            }
            AppEvent::Crashed => {
                warn!("CRASH | a target reached the floor");
            }
            AppEvent::RoundOver { score, outcome } => {
                self.rounds = self.rounds.saturating_add(1);
                self.best_score = self.best_score.max(*score);
                info!(
                    "ROUND | #{} {:?} score={} best={}",
                    self.rounds, outcome, score, self.best_score
                );
            }
            AppEvent::Calibrated(baselines) => {
                info!("CAL   | baselines={:?}", baselines);
            }
            AppEvent::SensorReport { baselines, raw } => {
                info!("SENS  | baselines={:?} raw={:?}", baselines, raw);
            }
            AppEvent::ConfigRejected(reason) => {
                warn!("CONF  | rejected: {}", reason);
            }
        }
    }
}
