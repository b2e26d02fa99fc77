//! Gameplay event fan-in.
//!
//! The host reports coarse gameplay events; [`apply_event`] expands each one
//! into the objective-kind credits it implies and feeds them through the
//! engine. A single capture can move several objectives at once (any-catch,
//! the creature's type, rarity, temperament), which is why the expansion
//! lives here rather than in the host.

use uuid::Uuid;

use super::engine::QuestEngine;
use super::types::ObjectiveType;

/// Attributes of a creature relevant to quest objectives.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CreatureAttributes {
    pub species: String,
    /// A creature can carry one or two elemental types.
    pub elemental_types: Vec<String>,
    pub temperament: Option<String>,
    pub rare: bool,
    pub legendary: bool,
}

/// Gameplay events the quest engine understands.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GameEvent {
    /// A player captured a creature.
    Captured {
        player: Uuid,
        creature: CreatureAttributes,
    },
    /// A player won a battle; `defeated_wild` lists wild creatures knocked
    /// out along the way (empty for trainer battles).
    BattleVictory {
        player: Uuid,
        defeated_wild: Vec<CreatureAttributes>,
    },
    /// One of the player's creatures gained levels.
    LevelUp { player: Uuid, levels_gained: u32 },
    /// One of the player's creatures gained experience.
    ExperienceGained { player: Uuid, amount: u32 },
    /// One of the player's creatures evolved.
    Evolved { player: Uuid },
    /// A player hatched an egg.
    Hatched { player: Uuid },
}

/// Feed one event into the engine. Returns true when the event completed at
/// least one objective, so the host can cue the player.
pub fn apply_event(engine: &mut QuestEngine, event: &GameEvent) -> bool {
    match event {
        GameEvent::Captured { player, creature } => {
            let mut changed = engine.add_progress(*player, ObjectiveType::CatchAny, 1, None);
            for elemental in &creature.elemental_types {
                changed |=
                    engine.add_progress(*player, ObjectiveType::CatchType, 1, Some(elemental));
            }
            if creature.rare {
                changed |= engine.add_progress(*player, ObjectiveType::CatchRare, 1, None);
            }
            if creature.legendary {
                changed |= engine.add_progress(*player, ObjectiveType::CatchLegendary, 1, None);
            }
            if let Some(temperament) = &creature.temperament {
                changed |= engine.add_progress(
                    *player,
                    ObjectiveType::CatchTemperament,
                    1,
                    Some(temperament),
                );
            }
            changed
        }
        GameEvent::BattleVictory {
            player,
            defeated_wild,
        } => {
            let mut changed = engine.add_progress(*player, ObjectiveType::WinBattle, 1, None);
            for creature in defeated_wild {
                changed |= engine.add_progress(*player, ObjectiveType::DefeatWild, 1, None);
                for elemental in &creature.elemental_types {
                    changed |=
                        engine.add_progress(*player, ObjectiveType::DefeatType, 1, Some(elemental));
                }
            }
            changed
        }
        GameEvent::LevelUp {
            player,
            levels_gained,
        } => engine.add_progress(*player, ObjectiveType::LevelUp, *levels_gained, None),
        GameEvent::ExperienceGained { player, amount } => {
            engine.add_progress(*player, ObjectiveType::GainXp, *amount, None)
        }
        GameEvent::Evolved { player } => {
            engine.add_progress(*player, ObjectiveType::Evolve, 1, None)
        }
        GameEvent::Hatched { player } => {
            engine.add_progress(*player, ObjectiveType::HatchEgg, 1, None)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::host::Clock;
    use crate::quest::period::Period;
    use crate::quest::pools::{ObjectiveTemplate, PeriodPool, QuestPools};
    use crate::quest::storage::QuestStoreBuilder;
    use chrono::{DateTime, TimeZone, Utc};
    use std::sync::Arc;
    use tempfile::TempDir;

    struct FixedClock(DateTime<Utc>);

    impl Clock for FixedClock {
        fn now_utc(&self) -> DateTime<Utc> {
            self.0
        }
    }

    /// Pools where the daily quest is a known catch_type objective so event
    /// expansion can be asserted precisely.
    fn typed_pools() -> QuestPools {
        let mut pools = QuestPools::default();
        pools.daily = PeriodPool {
            objective_count: 1,
            pool: vec![ObjectiveTemplate::new("catch_type", 10, 1, 1)
                .with_elemental_types(&["storm"])],
        };
        pools.weekly = PeriodPool {
            objective_count: 1,
            pool: vec![ObjectiveTemplate::new("catch_any", 10, 10, 10)],
        };
        pools.monthly = PeriodPool {
            objective_count: 1,
            pool: vec![ObjectiveTemplate::new("win_battle", 10, 1, 1)],
        };
        pools
    }

    fn engine(dir: &TempDir, pools: QuestPools) -> QuestEngine {
        let store = QuestStoreBuilder::new(dir.path().join("db"))
            .open()
            .expect("store");
        let clock = Arc::new(FixedClock(
            Utc.with_ymd_and_hms(2024, 4, 9, 12, 0, 0).unwrap(),
        ));
        QuestEngine::new(pools, store, clock)
    }

    #[test]
    fn capture_feeds_every_matching_objective() {
        let dir = TempDir::new().unwrap();
        let mut engine = engine(&dir, typed_pools());
        let player = Uuid::new_v4();

        let event = GameEvent::Captured {
            player,
            creature: CreatureAttributes {
                species: "stormfin".to_string(),
                elemental_types: vec!["storm".to_string()],
                temperament: Some("bold".to_string()),
                rare: false,
                legendary: false,
            },
        };
        assert!(apply_event(&mut engine, &event));

        // Daily catch_type(storm) and weekly catch_any both moved.
        let (_, daily) = engine.quest_view(player, Period::Daily);
        assert_eq!(daily.counters, vec![1]);
        let (_, weekly) = engine.quest_view(player, Period::Weekly);
        assert_eq!(weekly.counters, vec![1]);
    }

    #[test]
    fn type_mismatch_does_not_count() {
        let dir = TempDir::new().unwrap();
        let mut engine = engine(&dir, typed_pools());
        let player = Uuid::new_v4();

        let event = GameEvent::Captured {
            player,
            creature: CreatureAttributes {
                species: "embercub".to_string(),
                elemental_types: vec!["fire".to_string()],
                ..CreatureAttributes::default()
            },
        };
        apply_event(&mut engine, &event);

        let (_, daily) = engine.quest_view(player, Period::Daily);
        assert_eq!(daily.counters, vec![0]);
    }

    #[test]
    fn parameter_match_is_case_insensitive() {
        let dir = TempDir::new().unwrap();
        let mut engine = engine(&dir, typed_pools());
        let player = Uuid::new_v4();

        let event = GameEvent::Captured {
            player,
            creature: CreatureAttributes {
                species: "stormfin".to_string(),
                elemental_types: vec!["Storm".to_string()],
                ..CreatureAttributes::default()
            },
        };
        apply_event(&mut engine, &event);

        let (_, daily) = engine.quest_view(player, Period::Daily);
        assert_eq!(daily.counters, vec![1]);
    }

    #[test]
    fn battle_victory_credits_wins_and_defeats() {
        let dir = TempDir::new().unwrap();
        let mut engine = engine(&dir, typed_pools());
        let player = Uuid::new_v4();

        let event = GameEvent::BattleVictory {
            player,
            defeated_wild: vec![CreatureAttributes::default(), CreatureAttributes::default()],
        };
        assert!(apply_event(&mut engine, &event));

        let (_, monthly) = engine.quest_view(player, Period::Monthly);
        assert_eq!(monthly.counters, vec![1]);
    }

    #[test]
    fn xp_events_carry_their_amount() {
        let dir = TempDir::new().unwrap();
        let mut pools = typed_pools();
        pools.monthly = PeriodPool {
            objective_count: 1,
            pool: vec![ObjectiveTemplate::new("gain_xp", 10, 1000, 1000)],
        };
        let mut engine = engine(&dir, pools);
        let player = Uuid::new_v4();

        apply_event(
            &mut engine,
            &GameEvent::ExperienceGained {
                player,
                amount: 400,
            },
        );
        let (_, monthly) = engine.quest_view(player, Period::Monthly);
        assert_eq!(monthly.counters, vec![400]);
    }
}
