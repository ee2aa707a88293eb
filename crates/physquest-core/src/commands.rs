//! Player commands sent from the front end to a simulation.
//!
//! Commands are queued and processed at the next tick boundary.

use serde::{Deserialize, Serialize};

/// All run-control actions available on a quest.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum QuestCommand {
    /// Start a fresh run. Ignored while a run is in progress.
    Start,
    /// Halt the current run, keeping its state.
    Stop,
    /// Halt and restore the initial state.
    Reset,
}
