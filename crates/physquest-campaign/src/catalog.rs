//! The fixed set of quests offered to the player.

use serde::Serialize;

use physquest_core::constants::POINTS_PER_DIFFICULTY;
use physquest_core::enums::QuestId;

/// Static description of one quest.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct QuestDef {
    pub id: QuestId,
    pub description: &'static str,
    /// Scoring weight; equal to the quest number.
    pub difficulty: u32,
}

impl QuestDef {
    pub fn new(id: QuestId) -> Self {
        Self {
            id,
            description: describe(id),
            difficulty: id.number(),
        }
    }

    /// Points awarded for the first completion.
    pub fn reward(&self) -> u32 {
        self.difficulty * POINTS_PER_DIFFICULTY
    }
}

fn describe(id: QuestId) -> &'static str {
    match id {
        QuestId::Hypotenuse => "Calculate the hypotenuse of a right-angled triangle.",
        QuestId::TriangleAngles => "Calculate the angles of a right-angled triangle.",
        QuestId::Projectile => "Calculate the correct launch angle to hit the target.",
        QuestId::WaterTank => "Tune the controller to maintain the water level.",
        QuestId::MassSpringDamper => "Adjust parameters so the mass stops at the target position.",
        QuestId::InvertedPendulum => "Balance the inverted pendulum by tuning the controller.",
        QuestId::DigitClassifier => "Train a neural network to recognize handwritten digits.",
    }
}

/// All quests in journey order.
pub fn catalog() -> Vec<QuestDef> {
    QuestId::ALL.into_iter().map(QuestDef::new).collect()
}
