//! The player's score and completion record.

use serde::{Deserialize, Serialize};

use physquest_core::enums::QuestId;

use crate::catalog::QuestDef;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Player {
    pub name: String,
    pub points: u32,
    pub completed_quests: Vec<QuestId>,
}

impl Player {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            points: 0,
            completed_quests: Vec::new(),
        }
    }

    pub fn add_points(&mut self, points: u32) {
        self.points = self.points.saturating_add(points);
    }

    pub fn complete_quest(&mut self, quest: QuestId) {
        if !self.has_completed_quest(quest) {
            self.completed_quests.push(quest);
        }
    }

    pub fn has_completed_quest(&self, quest: QuestId) -> bool {
        self.completed_quests.contains(&quest)
    }

    /// Clear score and history for a new journey.
    pub fn reset(&mut self) {
        self.points = 0;
        self.completed_quests.clear();
    }

    /// Mark `quest` complete and award its reward the first time.
    ///
    /// Returns the points awarded (zero on a repeat).
    pub fn record_completion(&mut self, quest: &QuestDef) -> u32 {
        if self.has_completed_quest(quest.id) {
            tracing::debug!(player = %self.name, quest = ?quest.id, "quest already completed");
            return 0;
        }
        let reward = quest.reward();
        self.complete_quest(quest.id);
        self.add_points(reward);
        tracing::info!(
            player = %self.name,
            quest = quest.id.number(),
            reward,
            total = self.points,
            "quest completed"
        );
        reward
    }
}
