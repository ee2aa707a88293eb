//! Fundamental simulation types.

use serde::{Deserialize, Serialize};

/// Simulation time tracking.
///
/// Elapsed time is derived from the tick count so long runs never
/// accumulate floating-point drift.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct SimTime {
    /// Current tick number (increments by 1 each step).
    pub tick: u64,
    /// Elapsed simulation time in seconds.
    pub elapsed_secs: f64,
}

impl SimTime {
    /// Time after `tick` steps of `dt` seconds.
    pub fn at(tick: u64, dt: f64) -> Self {
        Self {
            tick,
            elapsed_secs: tick as f64 * dt,
        }
    }

    /// Advance by one step of `dt` seconds.
    pub fn advance(&mut self, dt: f64) {
        self.tick += 1;
        self.elapsed_secs = self.tick as f64 * dt;
    }
}

/// Number of whole steps of `dt` needed to cover `duration_secs`.
pub fn steps_for(duration_secs: f64, dt: f64) -> u64 {
    (duration_secs / dt).round() as u64
}

/// Outcome of a finished quest attempt, with the message shown to the player.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Verdict {
    pub success: bool,
    pub message: String,
}

impl Verdict {
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            success: true,
            message: message.into(),
        }
    }

    pub fn failure(message: impl Into<String>) -> Self {
        Self {
            success: false,
            message: message.into(),
        }
    }
}
