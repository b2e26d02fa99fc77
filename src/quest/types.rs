//! Core data model for generated quests, per-player progress and streaks.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use super::period::Period;

pub const PLAYER_QUEST_SCHEMA_VERSION: u8 = 1;

/// Countable objective kinds a generated quest can ask for. Serialized ids
/// (snake_case) are what template pool files reference.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum ObjectiveType {
    /// Capture any creature.
    CatchAny,
    /// Capture creatures of a specific elemental type.
    CatchType,
    /// Capture creatures with the rare-variant flag.
    CatchRare,
    /// Capture legendary creatures.
    CatchLegendary,
    /// Capture creatures with a specific temperament.
    CatchTemperament,
    /// Defeat wild creatures in battle.
    DefeatWild,
    /// Defeat wild creatures of a specific elemental type.
    DefeatType,
    /// Win battles (wild or trainer).
    WinBattle,
    /// Accumulate creature experience points.
    GainXp,
    /// Level up owned creatures.
    LevelUp,
    /// Evolve owned creatures.
    Evolve,
    /// Hatch eggs. No host event feeds this yet; pools may still include it
    /// for hosts that deliver hatch notifications through a custom adapter.
    HatchEgg,
}

impl ObjectiveType {
    pub fn id(self) -> &'static str {
        match self {
            ObjectiveType::CatchAny => "catch_any",
            ObjectiveType::CatchType => "catch_type",
            ObjectiveType::CatchRare => "catch_rare",
            ObjectiveType::CatchLegendary => "catch_legendary",
            ObjectiveType::CatchTemperament => "catch_temperament",
            ObjectiveType::DefeatWild => "defeat_wild",
            ObjectiveType::DefeatType => "defeat_type",
            ObjectiveType::WinBattle => "win_battle",
            ObjectiveType::GainXp => "gain_xp",
            ObjectiveType::LevelUp => "level_up",
            ObjectiveType::Evolve => "evolve",
            ObjectiveType::HatchEgg => "hatch_egg",
        }
    }

    pub fn from_id(id: &str) -> Option<ObjectiveType> {
        const ALL: [ObjectiveType; 12] = [
            ObjectiveType::CatchAny,
            ObjectiveType::CatchType,
            ObjectiveType::CatchRare,
            ObjectiveType::CatchLegendary,
            ObjectiveType::CatchTemperament,
            ObjectiveType::DefeatWild,
            ObjectiveType::DefeatType,
            ObjectiveType::WinBattle,
            ObjectiveType::GainXp,
            ObjectiveType::LevelUp,
            ObjectiveType::Evolve,
            ObjectiveType::HatchEgg,
        ];
        ALL.into_iter().find(|kind| kind.id() == id)
    }

    /// True when this kind needs an elemental-type parameter resolved from
    /// the template's domain.
    pub fn requires_elemental_type(self) -> bool {
        matches!(self, ObjectiveType::CatchType | ObjectiveType::DefeatType)
    }

    /// True when this kind needs a temperament parameter.
    pub fn requires_temperament(self) -> bool {
        matches!(self, ObjectiveType::CatchTemperament)
    }

    pub fn requires_parameter(self) -> bool {
        self.requires_elemental_type() || self.requires_temperament()
    }

    /// Player-facing description with amount and parameter interpolated.
    pub fn describe(self, amount: u32, parameter: Option<&str>) -> String {
        match self {
            ObjectiveType::CatchAny => format!("Catch {} creatures", amount),
            ObjectiveType::CatchType => match parameter {
                Some(kind) => format!("Catch {} {}-type creatures", amount, capitalize(kind)),
                None => format!("Catch {} creatures", amount),
            },
            ObjectiveType::CatchRare => format!("Catch {} rare creatures", amount),
            ObjectiveType::CatchLegendary => format!("Catch {} legendary creatures", amount),
            ObjectiveType::CatchTemperament => match parameter {
                Some(temperament) => format!(
                    "Catch {} creatures with {} temperament",
                    amount,
                    capitalize(temperament)
                ),
                None => format!("Catch {} creatures", amount),
            },
            ObjectiveType::DefeatWild => format!("Defeat {} wild creatures", amount),
            ObjectiveType::DefeatType => match parameter {
                Some(kind) => format!("Defeat {} {}-type creatures", amount, capitalize(kind)),
                None => format!("Defeat {} creatures", amount),
            },
            ObjectiveType::WinBattle => format!("Win {} battles", amount),
            ObjectiveType::GainXp => format!("Gain {} creature XP", amount),
            ObjectiveType::LevelUp => format!("Level up creatures {} times", amount),
            ObjectiveType::Evolve => format!("Evolve {} creatures", amount),
            ObjectiveType::HatchEgg => format!("Hatch {} eggs", amount),
        }
    }
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
        None => String::new(),
    }
}

/// One concrete objective inside a generated quest. Immutable once produced
/// by the generator.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct GeneratedObjective {
    pub kind: ObjectiveType,
    /// Target count the player must reach.
    pub amount: u32,
    /// Resolved elemental type or temperament, when the kind requires one.
    pub parameter: Option<String>,
}

impl GeneratedObjective {
    pub fn description(&self) -> String {
        self.kind.describe(self.amount, self.parameter.as_deref())
    }
}

/// A fully resolved quest instance, identified by `(period, seed)`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct GeneratedQuest {
    pub period: Period,
    pub seed: String,
    pub objectives: Vec<GeneratedObjective>,
}

/// Per-player, per-period mutable progress. Valid only while `seed` equals
/// the period's current seed; stale records are replaced wholesale, never
/// migrated.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct QuestProgress {
    pub seed: String,
    /// Counter per objective, parallel to the generated quest's objective
    /// list. Clamped to each objective's amount.
    pub counters: Vec<u32>,
    /// Set once the quest has been turned in; guards against double claims.
    pub completed: bool,
}

impl QuestProgress {
    pub fn new(seed: &str, objective_count: usize) -> Self {
        Self {
            seed: seed.to_string(),
            counters: vec![0; objective_count],
            completed: false,
        }
    }
}

/// Per-player, per-period streak continuity state.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct StreakData {
    pub current_streak: u32,
    /// Seed of the last successfully claimed instance. `None` after a break.
    pub last_completion_seed: Option<String>,
}

/// Durable snapshot for one player, written after every state-changing
/// operation and read back lazily on first access after a restart.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct PlayerQuestRecord {
    pub schema_version: u8,
    pub progress: HashMap<Period, QuestProgress>,
    pub streaks: HashMap<Period, StreakData>,
}

impl Default for PlayerQuestRecord {
    fn default() -> Self {
        Self {
            schema_version: PLAYER_QUEST_SCHEMA_VERSION,
            progress: HashMap::new(),
            streaks: HashMap::new(),
        }
    }
}

/// Login-time notice for a single period.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoginNotice {
    /// The player has not touched the current instance yet.
    QuestAvailable,
    /// All objectives are met but the quest has not been turned in.
    ReadyToTurnIn,
}

/// Item grant produced by a successful bonus roll during turn-in.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BonusGrant {
    pub item: String,
    pub amount: u32,
}

/// Everything the host needs to render a turn-in confirmation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TurnInSummary {
    pub period: Period,
    pub currency: &'static str,
    /// Total currency granted (base + streak bonus).
    pub amount: u32,
    pub base_amount: u32,
    pub streak_bonus: u32,
    /// Streak value after this completion; zero for streakless periods.
    pub streak_day: u32,
    pub at_max_bonus: bool,
    pub bonus_grants: Vec<BonusGrant>,
}
