//! Procedural periodic quest system.
//!
//! Daily, weekly and monthly quests are generated deterministically from
//! calendar-aligned seed strings, so every player on a server sees the same
//! objectives and nothing about a quest instance needs to be stored. What
//! does persist is per-player progress, which self-invalidates when its seed
//! goes stale.

pub mod engine;
pub mod errors;
pub mod events;
pub mod generator;
pub mod period;
pub mod pools;
pub mod scheduler;
pub mod seed;
pub mod storage;
pub mod types;

pub use engine::QuestEngine;
pub use errors::QuestError;
pub use events::{apply_event, CreatureAttributes, GameEvent};
pub use generator::generate;
pub use period::{Period, PeriodSpec};
pub use pools::{BonusReward, ObjectiveTemplate, PeriodPool, QuestPools};
pub use scheduler::{RolloverWatch, DEFAULT_CHECK_INTERVAL_TICKS};
pub use seed::{base_seed, previous_seed, strip_suffix, with_suffix, INVALIDATED_SEED};
pub use storage::{QuestStore, QuestStoreBuilder};
pub use types::{
    BonusGrant, GeneratedObjective, GeneratedQuest, LoginNotice, ObjectiveType, PlayerQuestRecord,
    QuestProgress, StreakData, TurnInSummary, PLAYER_QUEST_SCHEMA_VERSION,
};
