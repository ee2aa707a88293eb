#[cfg(test)]
mod tests {
    use physquest_core::enums::QuestId;

    use crate::catalog::{catalog, QuestDef};
    use crate::player::Player;

    #[test]
    fn test_catalog_covers_every_quest_in_order() {
        let quests = catalog();
        assert_eq!(quests.len(), 7);
        for (i, quest) in quests.iter().enumerate() {
            assert_eq!(quest.id.number() as usize, i + 1);
            assert_eq!(quest.difficulty, quest.id.number());
            assert!(!quest.description.is_empty());
        }
    }

    #[test]
    fn test_reward_scales_with_difficulty() {
        assert_eq!(QuestDef::new(QuestId::Hypotenuse).reward(), 10);
        assert_eq!(QuestDef::new(QuestId::DigitClassifier).reward(), 70);
    }

    #[test]
    fn test_new_player_is_empty() {
        let player = Player::new("Ada");
        assert_eq!(player.name, "Ada");
        assert_eq!(player.points, 0);
        assert!(player.completed_quests.is_empty());
    }

    #[test]
    fn test_completion_awarded_once() {
        let mut player = Player::new("Ada");
        let tank = QuestDef::new(QuestId::WaterTank);
        assert_eq!(player.record_completion(&tank), 40);
        assert_eq!(player.record_completion(&tank), 0);
        assert_eq!(player.points, 40);
        assert_eq!(player.completed_quests, vec![QuestId::WaterTank]);
        assert!(player.has_completed_quest(QuestId::WaterTank));
        assert!(!player.has_completed_quest(QuestId::Projectile));
    }

    #[test]
    fn test_full_journey_total() {
        let mut player = Player::new("Ada");
        for quest in catalog() {
            player.record_completion(&quest);
        }
        // 10 * (1 + 2 + ... + 7)
        assert_eq!(player.points, 280);
        assert_eq!(player.completed_quests.len(), 7);
    }

    #[test]
    fn test_reset_clears_progress() {
        let mut player = Player::new("Ada");
        player.add_points(15);
        player.complete_quest(QuestId::Hypotenuse);
        player.reset();
        assert_eq!(player.points, 0);
        assert!(player.completed_quests.is_empty());
        assert_eq!(player.name, "Ada");
    }

    #[test]
    fn test_player_serializes() {
        let mut player = Player::new("Ada");
        player.record_completion(&QuestDef::new(QuestId::Projectile));
        let json = serde_json::to_value(&player).unwrap();
        assert_eq!(json["points"], 30);
        assert_eq!(json["completed_quests"][0], "Projectile");
    }
}
