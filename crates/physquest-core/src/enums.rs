//! Enumeration types used throughout the simulations.

use serde::{Deserialize, Serialize};

/// The fixed set of quests, in journey order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum QuestId {
    /// Hypotenuse of a right triangle.
    Hypotenuse,
    /// Angles of a right triangle.
    TriangleAngles,
    /// Launch angle to hit a target.
    Projectile,
    /// PID control of a water tank level.
    WaterTank,
    /// Bring a mass-spring-damper to rest at a target.
    MassSpringDamper,
    /// Balance an inverted pendulum on a cart.
    InvertedPendulum,
    /// Train a digit classifier.
    DigitClassifier,
}

impl QuestId {
    pub const ALL: [QuestId; 7] = [
        QuestId::Hypotenuse,
        QuestId::TriangleAngles,
        QuestId::Projectile,
        QuestId::WaterTank,
        QuestId::MassSpringDamper,
        QuestId::InvertedPendulum,
        QuestId::DigitClassifier,
    ];

    /// Numeric quest identifier (1-based).
    pub fn number(self) -> u32 {
        match self {
            QuestId::Hypotenuse => 1,
            QuestId::TriangleAngles => 2,
            QuestId::Projectile => 3,
            QuestId::WaterTank => 4,
            QuestId::MassSpringDamper => 5,
            QuestId::InvertedPendulum => 6,
            QuestId::DigitClassifier => 7,
        }
    }

    pub fn from_number(number: u32) -> Option<Self> {
        Self::ALL.into_iter().find(|q| q.number() == number)
    }
}

/// Lifecycle of a simulation run inside the engine.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum RunPhase {
    /// Not started, or reset.
    #[default]
    Idle,
    /// Stepping each tick.
    Running,
    /// Halted by the player before the run ended.
    Stopped,
    /// Run ended and the verdict is available.
    Finished,
}

/// Result of advancing a simulation by one step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum StepOutcome {
    /// More steps remain.
    Continue,
    /// The run is over; evaluate the verdict.
    Finished,
}

/// Equations of motion used for the cart-pendulum.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PendulumModel {
    /// Small-angle dynamics.
    #[default]
    Linearized,
    /// Full cart-pole dynamics.
    Nonlinear,
}
