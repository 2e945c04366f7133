//! Inbound commands to the application service.
//!
//! These represent actions requested by the outside world (bench console,
//! simulator script, operator panel) that the
//! [`GameService`](super::service::GameService) interprets and acts upon.

use crate::config::GameConfig;
use crate::fsm::GameMode;

/// Commands that external adapters can send into the application core.
#[derive(Debug, Clone)]
pub enum AppCommand {
    /// Recapture the target sensor baselines.
    Recalibrate,

    /// Hot-reload tunables.  Rejected unless the config validates.
    UpdateConfig(GameConfig),

    /// Force the game FSM into a specific mode (bench / testing only).
    ForceMode(GameMode),
}
