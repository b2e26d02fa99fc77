//! The quest engine proper: current-seed resolution, quest caching, progress
//! accounting, turn-in rewards, streaks and the admin surface.
//!
//! All state-changing player paths persist the affected snapshot before
//! returning. Persistence failures are logged and swallowed; quest state in
//! memory stays authoritative for the session and a reward is never rolled
//! back because the store hiccuped.

use std::collections::hash_map::Entry;
use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use log::{info, warn};
use rand::Rng;
use uuid::Uuid;

use crate::host::{Clock, QuestHost};

use super::errors::QuestError;
use super::generator::generate;
use super::period::Period;
use super::pools::QuestPools;
use super::seed;
use super::storage::QuestStore;
use super::types::{
    BonusGrant, GeneratedQuest, LoginNotice, ObjectiveType, PlayerQuestRecord, QuestProgress,
    TurnInSummary,
};

pub struct QuestEngine {
    pools: QuestPools,
    store: QuestStore,
    clock: Arc<dyn Clock>,
    /// Generated quests keyed by `"{period}:{seed}"`. Regeneration is cheap
    /// and deterministic, so this is purely a hot-path shortcut; it is purged
    /// on rollover, reroll and pool reload.
    quest_cache: HashMap<String, GeneratedQuest>,
    /// Loaded player snapshots. Populated lazily from the store.
    players: HashMap<Uuid, PlayerQuestRecord>,
    /// Admin reroll counters per period. Deliberately not persisted: a
    /// restart returns to the natural calendar seed, and stale per-player
    /// progress self-invalidates against it.
    reroll_suffix: HashMap<Period, u32>,
}

impl QuestEngine {
    pub fn new(pools: QuestPools, store: QuestStore, clock: Arc<dyn Clock>) -> Self {
        Self {
            pools,
            store,
            clock,
            quest_cache: HashMap::new(),
            players: HashMap::new(),
            reroll_suffix: HashMap::new(),
        }
    }

    pub fn pools(&self) -> &QuestPools {
        &self.pools
    }

    /// The seed identifying the active instance of `period` right now,
    /// including any admin reroll suffix.
    pub fn current_seed(&self, period: Period) -> String {
        let base = seed::base_seed(period, self.clock.now_utc());
        let suffix = self.reroll_suffix.get(&period).copied().unwrap_or(0);
        seed::with_suffix(&base, suffix)
    }

    /// The active quest for `period`, generated on demand and cached.
    pub fn quest(&mut self, period: Period) -> GeneratedQuest {
        let current = self.current_seed(period);
        let key = format!("{}:{}", period.id(), current);
        if let Some(quest) = self.quest_cache.get(&key) {
            return quest.clone();
        }
        let quest = generate(period, &current, &self.pools);
        self.quest_cache.insert(key, quest.clone());
        quest
    }

    /// Active quest plus the player's (stale-checked) progress against it.
    pub fn quest_view(&mut self, player: Uuid, period: Period) -> (GeneratedQuest, QuestProgress) {
        let quest = self.quest(period);
        let record = self.record_mut(player);
        let progress = Self::progress_for(record, &quest).clone();
        (quest, progress)
    }

    fn record_mut(&mut self, player: Uuid) -> &mut PlayerQuestRecord {
        match self.players.entry(player) {
            Entry::Occupied(entry) => entry.into_mut(),
            Entry::Vacant(entry) => {
                let record = match self.store.get_player_record(&player) {
                    Ok(record) => record,
                    Err(QuestError::NotFound(_)) => PlayerQuestRecord::default(),
                    Err(err) => {
                        warn!(
                            "failed to load quest record for {}: {}; starting fresh",
                            player, err
                        );
                        PlayerQuestRecord::default()
                    }
                };
                entry.insert(record)
            }
        }
    }

    /// Progress entry for the quest, replacing it wholesale when the stored
    /// seed no longer matches. This lazy check is the only rollover handling
    /// a player record ever needs.
    fn progress_for<'a>(
        record: &'a mut PlayerQuestRecord,
        quest: &GeneratedQuest,
    ) -> &'a mut QuestProgress {
        let entry = record
            .progress
            .entry(quest.period)
            .or_insert_with(|| QuestProgress::new(&quest.seed, quest.objectives.len()));
        if entry.seed != quest.seed || entry.counters.len() != quest.objectives.len() {
            *entry = QuestProgress::new(&quest.seed, quest.objectives.len());
        }
        entry
    }

    fn persist(&mut self, player: Uuid) {
        if let Some(record) = self.players.get(&player) {
            if let Err(err) = self.store.put_player_record(&player, record) {
                warn!("failed to persist quest record for {}: {}", player, err);
            }
        }
    }

    /// Credit `amount` toward every matching, not-yet-turned-in objective
    /// across all periods. Returns true when any objective crossed from
    /// below its target to at-or-above it, so the host knows when a
    /// "objective complete" cue is warranted.
    ///
    /// Parameterized objectives only count events carrying the same parameter
    /// (case-insensitive); unparameterized objectives count every event of
    /// their kind.
    pub fn add_progress(
        &mut self,
        player: Uuid,
        kind: ObjectiveType,
        amount: u32,
        parameter: Option<&str>,
    ) -> bool {
        if amount == 0 {
            return false;
        }
        let mut any_completed = false;
        for period in Period::ALL {
            let quest = self.quest(period);
            let mut changed = false;
            let mut completed_one = false;
            {
                let record = self.record_mut(player);
                let progress = Self::progress_for(record, &quest);
                if progress.completed {
                    continue;
                }
                for (index, objective) in quest.objectives.iter().enumerate() {
                    if objective.kind != kind {
                        continue;
                    }
                    match (objective.parameter.as_deref(), parameter) {
                        (None, _) => {}
                        (Some(want), Some(got)) if want.eq_ignore_ascii_case(got) => {}
                        _ => continue,
                    }
                    let counter = &mut progress.counters[index];
                    let updated = counter.saturating_add(amount).min(objective.amount);
                    if updated != *counter {
                        if *counter < objective.amount && updated >= objective.amount {
                            completed_one = true;
                        }
                        *counter = updated;
                        changed = true;
                    }
                }
            }
            if changed {
                self.persist(player);
            }
            any_completed |= completed_one;
        }
        any_completed
    }

    /// Whether every objective of the active quest is met. An empty quest
    /// (exhausted pool) is never considered complete.
    pub fn is_complete(&mut self, player: Uuid, period: Period) -> bool {
        let quest = self.quest(period);
        if quest.objectives.is_empty() {
            return false;
        }
        let record = self.record_mut(player);
        let progress = Self::progress_for(record, &quest);
        progress
            .counters
            .iter()
            .zip(&quest.objectives)
            .all(|(counter, objective)| *counter >= objective.amount)
    }

    /// Current streak value after a continuity check. A streak whose last
    /// completion is neither the current nor the immediately previous window
    /// has lapsed and is reset (and persisted) here. Reroll suffixes are
    /// stripped before comparing, so an admin reroll does not break streaks.
    pub fn streak(&mut self, player: Uuid, period: Period) -> u32 {
        if !period.has_streak() {
            return 0;
        }
        let now = self.clock.now_utc();
        let current_base = seed::base_seed(period, now);
        let previous_base = seed::previous_seed(period, now);

        let mut reset = false;
        let value;
        {
            let record = self.record_mut(player);
            let Some(streak) = record.streaks.get_mut(&period) else {
                return 0;
            };
            let lapsed = match &streak.last_completion_seed {
                Some(last) => {
                    let last_base = seed::strip_suffix(last);
                    last_base != current_base && last_base != previous_base
                }
                None => streak.current_streak != 0,
            };
            if lapsed && (streak.current_streak != 0 || streak.last_completion_seed.is_some()) {
                streak.current_streak = 0;
                streak.last_completion_seed = None;
                reset = true;
            }
            value = streak.current_streak;
        }
        if reset {
            self.persist(player);
        }
        value
    }

    /// Claim the active quest's rewards. Returns `None` when the quest is
    /// incomplete, empty, or already turned in; the operation is idempotent
    /// per `(player, period, seed)`.
    pub fn turn_in(
        &mut self,
        player: Uuid,
        period: Period,
        host: &mut dyn QuestHost,
    ) -> Option<TurnInSummary> {
        let quest = self.quest(period);
        if quest.objectives.is_empty() {
            return None;
        }
        {
            let record = self.record_mut(player);
            let progress = Self::progress_for(record, &quest);
            if progress.completed {
                return None;
            }
            let done = progress
                .counters
                .iter()
                .zip(&quest.objectives)
                .all(|(counter, objective)| *counter >= objective.amount);
            if !done {
                return None;
            }
            progress.completed = true;
        }

        let spec = period.spec();
        let (streak_bonus, streak_day) = if spec.max_streak > 0 {
            // Bonus is the pre-increment streak, capped; a 5-day cap means the
            // sixth consecutive day pays the same as the fifth.
            let bonus = self.streak(player, period).min(spec.max_streak);
            let record = self.record_mut(player);
            let streak = record.streaks.entry(period).or_default();
            streak.current_streak += 1;
            streak.last_completion_seed = Some(quest.seed.clone());
            (bonus, streak.current_streak)
        } else {
            (0, 0)
        };

        let amount = spec.base_amount + streak_bonus;
        if !host.grant_currency(player, spec.currency, amount) {
            warn!(
                "host rejected currency grant of {} {} for {}",
                amount, spec.currency, player
            );
        }

        let mut bonus_grants = Vec::new();
        {
            let mut rng = rand::thread_rng();
            for bonus in self.pools.bonus_rewards.clone() {
                if !bonus.periods.iter().any(|id| id == period.id()) {
                    continue;
                }
                if !rng.gen_bool(bonus.chance.clamp(0.0, 1.0)) {
                    continue;
                }
                if host.grant_item(player, &bonus.item, bonus.amount) {
                    bonus_grants.push(BonusGrant {
                        item: bonus.item,
                        amount: bonus.amount,
                    });
                } else {
                    warn!("host rejected bonus item '{}' for {}", bonus.item, player);
                }
            }
        }

        self.persist(player);
        info!(
            "{} turned in {} quest '{}' for {} {}",
            player,
            period.id(),
            quest.seed,
            amount,
            spec.currency
        );

        Some(TurnInSummary {
            period,
            currency: spec.currency,
            amount,
            base_amount: spec.base_amount,
            streak_bonus,
            streak_day,
            at_max_bonus: spec.max_streak > 0 && streak_bonus >= spec.max_streak,
            bonus_grants,
        })
    }

    /// Login notices for every period: a fresh or untouched quest, or one
    /// that is finished but unclaimed.
    pub fn login_status(&mut self, player: Uuid) -> Vec<(Period, LoginNotice)> {
        let mut notices = Vec::new();
        for period in Period::ALL {
            let quest = self.quest(period);
            if quest.objectives.is_empty() {
                continue;
            }
            let record = self.record_mut(player);
            match record.progress.get(&period) {
                Some(progress) if progress.seed == quest.seed => {
                    if progress.completed {
                        continue;
                    }
                    let done = progress
                        .counters
                        .iter()
                        .zip(&quest.objectives)
                        .all(|(counter, objective)| *counter >= objective.amount);
                    if done {
                        notices.push((period, LoginNotice::ReadyToTurnIn));
                    } else if progress.counters.iter().all(|counter| *counter == 0) {
                        notices.push((period, LoginNotice::QuestAvailable));
                    }
                }
                _ => notices.push((period, LoginNotice::QuestAvailable)),
            }
        }
        notices
    }

    /// Drop cached quests for `period`. Called by the rollover watcher when
    /// the seed changes and by the admin surface after rerolls.
    pub fn purge_cache(&mut self, period: Period) {
        let prefix = format!("{}:", period.id());
        self.quest_cache.retain(|key, _| !key.starts_with(&prefix));
    }

    // ----- admin surface -----

    /// Bump the reroll suffix for `period`, discarding the current instance
    /// for everyone. Progress for the period is cleared for every known
    /// player; streaks are left alone. Returns the new seed.
    pub fn force_global_reroll(&mut self, period: Period) -> String {
        *self.reroll_suffix.entry(period).or_insert(0) += 1;
        self.purge_cache(period);

        let mut ids: HashSet<Uuid> = self.players.keys().copied().collect();
        match self.store.list_player_ids() {
            Ok(stored) => ids.extend(stored),
            Err(err) => warn!("failed to list stored players during reroll: {}", err),
        }
        for player in ids {
            let removed = self.record_mut(player).progress.remove(&period).is_some();
            if removed {
                self.persist(player);
            }
        }

        let new_seed = self.current_seed(period);
        info!("forced {} reroll; active seed is now {}", period.id(), new_seed);
        new_seed
    }

    /// Reroll every period at once.
    pub fn force_global_reroll_all(&mut self) -> Vec<(Period, String)> {
        Period::ALL
            .into_iter()
            .map(|period| (period, self.force_global_reroll(period)))
            .collect()
    }

    /// Wipe one player's progress for one period. Their next interaction
    /// starts the active quest from scratch.
    pub fn reset_player_quest(&mut self, player: Uuid, period: Period) {
        let removed = self.record_mut(player).progress.remove(&period).is_some();
        if removed {
            self.persist(player);
        }
        info!("reset {} quest progress for {}", period.id(), player);
    }

    /// Wipe one player's progress for every period. Streak history survives.
    pub fn reset_player_all(&mut self, player: Uuid) {
        let record = self.record_mut(player);
        let had_any = !record.progress.is_empty();
        record.progress.clear();
        if had_any {
            self.persist(player);
        }
        info!("reset all quest progress for {}", player);
    }

    /// Max out every objective and immediately turn the quest in. Returns
    /// `None` when the quest is empty or already claimed.
    pub fn force_complete(
        &mut self,
        player: Uuid,
        period: Period,
        host: &mut dyn QuestHost,
    ) -> Option<TurnInSummary> {
        let quest = self.quest(period);
        if quest.objectives.is_empty() {
            return None;
        }
        {
            let record = self.record_mut(player);
            let progress = Self::progress_for(record, &quest);
            if progress.completed {
                return None;
            }
            for (counter, objective) in progress.counters.iter_mut().zip(&quest.objectives) {
                *counter = objective.amount;
            }
        }
        self.turn_in(player, period, host)
    }

    /// Pin one objective counter to `amount` (clamped to the objective's
    /// target). The completed flag is untouched.
    pub fn set_objective_progress(
        &mut self,
        player: Uuid,
        period: Period,
        index: usize,
        amount: u32,
    ) -> Result<(), QuestError> {
        let quest = self.quest(period);
        let Some(objective) = quest.objectives.get(index) else {
            return Err(QuestError::ObjectiveIndexOutOfRange {
                period: period.id(),
                index,
            });
        };
        let target = amount.min(objective.amount);
        {
            let record = self.record_mut(player);
            let progress = Self::progress_for(record, &quest);
            progress.counters[index] = target;
        }
        self.persist(player);
        Ok(())
    }

    /// Swap in a fresh pool configuration. Cached quests are discarded, but
    /// already-generated progress stays valid until the next rollover since
    /// the active seeds have not changed.
    pub fn reload_pools(&mut self, pools: QuestPools) {
        self.pools = pools;
        self.quest_cache.clear();
        info!("reloaded quest pools");
    }
}
