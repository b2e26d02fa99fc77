//! Deterministic quest generation.
//!
//! `generate` is a pure function of `(period, seed, pools)`: the PRNG is
//! seeded from a stable hash of the seed string, so the same inputs always
//! produce the same quest across calls and process restarts. This is what
//! makes regeneration after a restart (and admin "what did seed X generate"
//! debugging) possible without persisting quests.

use std::collections::HashSet;

use crc::{Crc, CRC_64_ECMA_182};
use log::warn;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

use super::period::Period;
use super::pools::QuestPools;
use super::types::{GeneratedObjective, GeneratedQuest, ObjectiveType};

const SEED_HASH: Crc<u64> = Crc::<u64>::new(&CRC_64_ECMA_182);

/// Stable string-to-u64 hash for PRNG seeding. `DefaultHasher` is not
/// guaranteed stable across releases, so a fixed CRC polynomial is used.
fn seed_hash(seed: &str) -> u64 {
    SEED_HASH.checksum(seed.as_bytes())
}

/// Generate the quest for `(period, seed)` by weighted sampling without
/// replacement over the period's template pool.
///
/// Each template type appears at most once per quest. Templates with an
/// unknown kind, or a missing parameter domain where one is required, are
/// dropped from the candidate pool without consuming a slot. A pool too
/// small to fill `objective_count` slots yields a shorter quest, not an
/// error.
pub fn generate(period: Period, seed: &str, pools: &QuestPools) -> GeneratedQuest {
    let pool_config = pools.for_period(period);
    let mut rng = ChaCha8Rng::seed_from_u64(seed_hash(seed));

    let mut candidates = pool_config.pool.clone();
    let mut used: HashSet<ObjectiveType> = HashSet::new();
    let mut objectives = Vec::new();

    while objectives.len() < pool_config.objective_count && !candidates.is_empty() {
        let total_weight: u32 = candidates.iter().map(|t| t.weight).sum();
        if total_weight == 0 {
            break;
        }

        let roll = rng.gen_range(0..total_weight);
        let mut cumulative = 0u32;
        let mut selected = 0usize;
        for (index, template) in candidates.iter().enumerate() {
            cumulative += template.weight;
            if roll < cumulative {
                selected = index;
                break;
            }
        }
        let template = candidates.remove(selected);

        let Some(kind) = ObjectiveType::from_id(&template.kind) else {
            warn!(
                "skipping unknown objective kind '{}' in {} pool",
                template.kind,
                period.id()
            );
            continue;
        };
        if used.contains(&kind) {
            // Same type already chosen for this quest; retry the slot.
            continue;
        }

        let span = template.amount_max.saturating_sub(template.amount_min);
        let amount = template.amount_min + rng.gen_range(0..=span);

        let parameter = if kind.requires_elemental_type() {
            match template.elemental_types.as_deref() {
                Some(domain) if !domain.is_empty() => {
                    Some(domain[rng.gen_range(0..domain.len())].clone())
                }
                _ => {
                    warn!(
                        "skipping '{}' template in {} pool: no elemental-type domain",
                        template.kind,
                        period.id()
                    );
                    continue;
                }
            }
        } else if kind.requires_temperament() {
            match template.temperaments.as_deref() {
                Some(domain) if !domain.is_empty() => {
                    Some(domain[rng.gen_range(0..domain.len())].clone())
                }
                _ => {
                    warn!(
                        "skipping '{}' template in {} pool: no temperament domain",
                        template.kind,
                        period.id()
                    );
                    continue;
                }
            }
        } else {
            None
        };

        used.insert(kind);
        objectives.push(GeneratedObjective {
            kind,
            amount,
            parameter,
        });
    }

    GeneratedQuest {
        period,
        seed: seed.to_string(),
        objectives,
    }
}
