//! Template pool configuration: the weighted objective templates each period
//! draws from, plus the chance-based bonus reward pool.
//!
//! Pools live in a JSON data file. Missing file: defaults are written out.
//! Unparseable file: defaults are used and a warning logged. Individual
//! templates with unknown objective kinds are skipped at generation time, so
//! a partially bad pool still yields a playable quest.

use std::fs;
use std::path::Path;

use log::{debug, info, warn};
use serde::{Deserialize, Serialize};

use super::period::Period;

fn default_weight() -> u32 {
    10
}

fn default_bonus_amount() -> u32 {
    1
}

fn default_bonus_chance() -> f64 {
    0.5
}

fn all_period_ids() -> Vec<String> {
    Period::ALL.iter().map(|p| p.id().to_string()).collect()
}

/// One weighted objective template. `kind` is the serialized id of an
/// [`ObjectiveType`](super::types::ObjectiveType); unknown ids are tolerated
/// and skipped during generation.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ObjectiveTemplate {
    pub kind: String,
    /// Selection weight; higher is more likely.
    #[serde(default = "default_weight")]
    pub weight: u32,
    pub amount_min: u32,
    pub amount_max: u32,
    /// Elemental-type domain for kinds that need one (catch_type, defeat_type).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub elemental_types: Option<Vec<String>>,
    /// Temperament domain for kinds that need one (catch_temperament).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub temperaments: Option<Vec<String>>,
}

impl ObjectiveTemplate {
    pub fn new(kind: &str, weight: u32, amount_min: u32, amount_max: u32) -> Self {
        Self {
            kind: kind.to_string(),
            weight,
            amount_min,
            amount_max,
            elemental_types: None,
            temperaments: None,
        }
    }

    pub fn with_elemental_types(mut self, types: &[&str]) -> Self {
        self.elemental_types = Some(types.iter().map(|t| t.to_string()).collect());
        self
    }

    pub fn with_temperaments(mut self, temperaments: &[&str]) -> Self {
        self.temperaments = Some(temperaments.iter().map(|t| t.to_string()).collect());
        self
    }
}

/// Objective pool for one period.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PeriodPool {
    /// How many objectives a generated quest should carry. The generator
    /// emits fewer when the pool is too small; that is not an error.
    pub objective_count: usize,
    pub pool: Vec<ObjectiveTemplate>,
}

/// Chance-based extra reward rolled independently on every turn-in.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct BonusReward {
    pub item: String,
    #[serde(default = "default_bonus_amount")]
    pub amount: u32,
    /// Bernoulli success probability in `[0, 1]`.
    #[serde(default = "default_bonus_chance")]
    pub chance: f64,
    /// Period ids this bonus applies to.
    #[serde(default = "all_period_ids")]
    pub periods: Vec<String>,
}

/// The full template-pool configuration, one pool per period.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct QuestPools {
    pub daily: PeriodPool,
    pub weekly: PeriodPool,
    pub monthly: PeriodPool,
    #[serde(default)]
    pub bonus_rewards: Vec<BonusReward>,
}

const ELEMENTAL_TYPES: [&str; 12] = [
    "fire", "water", "earth", "air", "storm", "frost", "nature", "shadow", "light", "metal",
    "venom", "spirit",
];

const TEMPERAMENTS: [&str; 12] = [
    "bold", "brave", "calm", "careful", "gentle", "hasty", "jolly", "modest", "naive", "quiet",
    "sassy", "timid",
];

impl Default for QuestPools {
    fn default() -> Self {
        let daily = PeriodPool {
            objective_count: Period::Daily.spec().objective_count,
            pool: vec![
                ObjectiveTemplate::new("catch_any", 10, 15, 25),
                ObjectiveTemplate::new("catch_type", 8, 8, 15).with_elemental_types(&ELEMENTAL_TYPES),
                ObjectiveTemplate::new("defeat_wild", 10, 10, 20),
                ObjectiveTemplate::new("defeat_type", 7, 5, 12).with_elemental_types(&ELEMENTAL_TYPES),
                ObjectiveTemplate::new("gain_xp", 8, 5000, 15000),
                ObjectiveTemplate::new("level_up", 6, 3, 8),
                ObjectiveTemplate::new("win_battle", 8, 5, 15),
            ],
        };

        let weekly = PeriodPool {
            objective_count: Period::Weekly.spec().objective_count,
            pool: vec![
                ObjectiveTemplate::new("catch_any", 6, 75, 150),
                ObjectiveTemplate::new("catch_type", 10, 30, 60).with_elemental_types(&ELEMENTAL_TYPES),
                ObjectiveTemplate::new("catch_temperament", 5, 5, 12).with_temperaments(&TEMPERAMENTS),
                ObjectiveTemplate::new("catch_rare", 2, 1, 1),
                ObjectiveTemplate::new("defeat_wild", 6, 50, 100),
                ObjectiveTemplate::new("defeat_type", 8, 20, 40).with_elemental_types(&ELEMENTAL_TYPES),
                ObjectiveTemplate::new("evolve", 7, 5, 12),
                ObjectiveTemplate::new("gain_xp", 6, 30000, 75000),
                ObjectiveTemplate::new("level_up", 5, 15, 30),
                ObjectiveTemplate::new("win_battle", 6, 20, 40),
            ],
        };

        let monthly = PeriodPool {
            objective_count: Period::Monthly.spec().objective_count,
            pool: vec![
                ObjectiveTemplate::new("catch_type", 8, 100, 200).with_elemental_types(&ELEMENTAL_TYPES),
                ObjectiveTemplate::new("catch_rare", 6, 2, 4),
                ObjectiveTemplate::new("catch_legendary", 3, 1, 2),
                ObjectiveTemplate::new("catch_temperament", 6, 20, 40).with_temperaments(&TEMPERAMENTS),
                ObjectiveTemplate::new("evolve", 8, 15, 35),
                ObjectiveTemplate::new("level_up", 5, 30, 60),
                ObjectiveTemplate::new("gain_xp", 5, 100000, 250000),
                ObjectiveTemplate::new("defeat_type", 7, 75, 150).with_elemental_types(&ELEMENTAL_TYPES),
                ObjectiveTemplate::new("win_battle", 6, 50, 100),
            ],
        };

        let bonus_rewards = vec![
            BonusReward {
                item: "capture_orb".to_string(),
                amount: 10,
                chance: 0.5,
                periods: all_period_ids(),
            },
            BonusReward {
                item: "greater_capture_orb".to_string(),
                amount: 5,
                chance: 0.3,
                periods: all_period_ids(),
            },
            BonusReward {
                item: "prime_capture_orb".to_string(),
                amount: 3,
                chance: 0.15,
                periods: vec!["weekly".to_string(), "monthly".to_string()],
            },
            BonusReward {
                item: "growth_candy".to_string(),
                amount: 1,
                chance: 0.2,
                periods: all_period_ids(),
            },
        ];

        QuestPools {
            daily,
            weekly,
            monthly,
            bonus_rewards,
        }
    }
}

impl QuestPools {
    pub fn for_period(&self, period: Period) -> &PeriodPool {
        match period {
            Period::Daily => &self.daily,
            Period::Weekly => &self.weekly,
            Period::Monthly => &self.monthly,
        }
    }

    /// Load pools from `path`, writing defaults when the file does not exist
    /// and falling back to defaults when it cannot be parsed. Never fails:
    /// a broken pool file must not take the quest system down.
    pub fn load_or_create(path: &Path) -> QuestPools {
        if path.exists() {
            match fs::read_to_string(path) {
                Ok(content) => match serde_json::from_str::<QuestPools>(&content) {
                    Ok(pools) => {
                        info!(
                            "loaded quest pools ({} daily, {} weekly, {} monthly templates)",
                            pools.daily.pool.len(),
                            pools.weekly.pool.len(),
                            pools.monthly.pool.len()
                        );
                        return pools;
                    }
                    Err(err) => {
                        warn!("failed to parse {}: {}; using defaults", path.display(), err);
                        return QuestPools::default();
                    }
                },
                Err(err) => {
                    warn!("failed to read {}: {}; using defaults", path.display(), err);
                    return QuestPools::default();
                }
            }
        }

        let pools = QuestPools::default();
        if let Err(err) = pools.save(path) {
            warn!("failed to write default pools to {}: {}", path.display(), err);
        }
        pools
    }

    /// Write the pools to `path`, creating parent directories as needed.
    pub fn save(&self, path: &Path) -> std::io::Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        let json = serde_json::to_string_pretty(self)
            .map_err(|err| std::io::Error::new(std::io::ErrorKind::InvalidData, err))?;
        fs::write(path, json)?;
        debug!("saved quest pools to {}", path.display());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn defaults_cover_all_periods() {
        let pools = QuestPools::default();
        for period in Period::ALL {
            let pool = pools.for_period(period);
            assert!(pool.objective_count > 0);
            assert!(pool.pool.len() >= pool.objective_count);
        }
        assert!(!pools.bonus_rewards.is_empty());
    }

    #[test]
    fn parameterized_defaults_carry_domains() {
        let pools = QuestPools::default();
        for pool in [&pools.daily, &pools.weekly, &pools.monthly] {
            for template in &pool.pool {
                match template.kind.as_str() {
                    "catch_type" | "defeat_type" => {
                        assert!(template.elemental_types.as_ref().is_some_and(|d| !d.is_empty()))
                    }
                    "catch_temperament" => {
                        assert!(template.temperaments.as_ref().is_some_and(|d| !d.is_empty()))
                    }
                    _ => {}
                }
            }
        }
    }

    #[test]
    fn load_or_create_writes_defaults_once() {
        let dir = TempDir::new().expect("tempdir");
        let path = dir.path().join("pools.json");

        let first = QuestPools::load_or_create(&path);
        assert!(path.exists());
        let second = QuestPools::load_or_create(&path);
        assert_eq!(first, second);
    }

    #[test]
    fn malformed_file_falls_back_to_defaults() {
        let dir = TempDir::new().expect("tempdir");
        let path = dir.path().join("pools.json");
        std::fs::write(&path, "{ not json").expect("write");

        let pools = QuestPools::load_or_create(&path);
        assert_eq!(pools, QuestPools::default());
    }

    #[test]
    fn round_trips_through_json() {
        let pools = QuestPools::default();
        let json = serde_json::to_string(&pools).expect("serialize");
        let back: QuestPools = serde_json::from_str(&json).expect("deserialize");
        assert_eq!(pools, back);
    }
}
