//! Rollover detection.
//!
//! Nothing about a rollover is event-driven: the watcher simply compares the
//! engine's current seed against the last seed it saw, once per check
//! interval. Player records are not touched here; stale progress
//! self-invalidates lazily on next access. The watcher only purges the quest
//! cache and fans out notifications.

use std::collections::HashMap;

use log::{debug, info};

use crate::host::QuestHost;

use super::engine::QuestEngine;
use super::period::Period;
use super::seed::INVALIDATED_SEED;

pub const DEFAULT_CHECK_INTERVAL_TICKS: u64 = 20;

pub struct RolloverWatch {
    /// Seed observed at the last poll, per period. Primed at construction so
    /// startup does not report a spurious rollover; a missed boundary while
    /// the process was down is covered by lazy stale-progress replacement.
    last_seen: HashMap<Period, String>,
    tick_counter: u64,
    check_interval: u64,
}

impl RolloverWatch {
    pub fn new(engine: &QuestEngine, check_interval: u64) -> Self {
        let last_seen = Period::ALL
            .into_iter()
            .map(|period| (period, engine.current_seed(period)))
            .collect();
        Self {
            last_seen,
            tick_counter: 0,
            check_interval: check_interval.max(1),
        }
    }

    /// Server-tick entry point. Counts ticks, and on every `check_interval`th
    /// tick polls for rollovers, skipping the work entirely while nobody is
    /// online.
    pub fn on_tick(&mut self, engine: &mut QuestEngine, host: &mut dyn QuestHost) -> Vec<Period> {
        self.tick_counter += 1;
        if self.tick_counter % self.check_interval != 0 {
            return Vec::new();
        }
        if host.online_players().is_empty() {
            return Vec::new();
        }
        self.poll(engine, host)
    }

    /// Compare current seeds against the last observed ones. For each period
    /// that changed: remember the new seed, purge the engine's quest cache,
    /// and notify every online player who has notices enabled.
    pub fn poll(&mut self, engine: &mut QuestEngine, host: &mut dyn QuestHost) -> Vec<Period> {
        let mut rolled = Vec::new();
        for period in Period::ALL {
            let current = engine.current_seed(period);
            let changed = self
                .last_seen
                .get(&period)
                .map(|seen| *seen != current)
                .unwrap_or(true);
            if !changed {
                continue;
            }
            info!("{} quest rolled over to seed {}", period.id(), current);
            self.last_seen.insert(period, current);
            engine.purge_cache(period);
            for player in host.online_players() {
                if host.notifications_enabled(player) {
                    host.notify_rollover(player, period);
                }
            }
            rolled.push(period);
        }
        if rolled.is_empty() {
            debug!("rollover poll: no change");
        }
        rolled
    }

    /// Force the next poll to treat `period` as rolled over, regardless of
    /// the calendar. Used after admin rerolls.
    pub fn invalidate(&mut self, period: Period) {
        self.last_seen.insert(period, INVALIDATED_SEED.to_string());
    }

    pub fn invalidate_all(&mut self) {
        for period in Period::ALL {
            self.invalidate(period);
        }
    }
}
