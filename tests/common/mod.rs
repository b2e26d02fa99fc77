//! Shared fixtures for the integration tests: a settable clock, a host that
//! records everything the engine asks of it, and engine constructors over
//! throwaway sled stores.
#![allow(dead_code)]

use std::sync::{Arc, Mutex};

use chrono::{DateTime, TimeZone, Utc};
use tempfile::TempDir;
use uuid::Uuid;

use questcycle::host::{Clock, QuestHost};
use questcycle::quest::{Period, QuestEngine, QuestPools, QuestStoreBuilder};

pub struct TestClock(Mutex<DateTime<Utc>>);

impl TestClock {
    pub fn at(year: i32, month: u32, day: u32) -> Arc<Self> {
        Arc::new(Self(Mutex::new(
            Utc.with_ymd_and_hms(year, month, day, 12, 0, 0).unwrap(),
        )))
    }

    pub fn set(&self, year: i32, month: u32, day: u32) {
        *self.0.lock().unwrap() = Utc.with_ymd_and_hms(year, month, day, 12, 0, 0).unwrap();
    }
}

impl Clock for TestClock {
    fn now_utc(&self) -> DateTime<Utc> {
        *self.0.lock().unwrap()
    }
}

/// Host double that records grants and notifications.
pub struct RecordingHost {
    pub online: Vec<Uuid>,
    pub notices: Vec<(Uuid, Period)>,
    pub currency: Vec<(Uuid, String, u32)>,
    pub items: Vec<(Uuid, String, u32)>,
    /// When false, every grant is refused.
    pub accept_grants: bool,
}

impl RecordingHost {
    pub fn new() -> Self {
        Self::with_players(Vec::new())
    }

    pub fn with_players(online: Vec<Uuid>) -> Self {
        Self {
            online,
            notices: Vec::new(),
            currency: Vec::new(),
            items: Vec::new(),
            accept_grants: true,
        }
    }

    pub fn currency_total(&self, player: Uuid, currency: &str) -> u32 {
        self.currency
            .iter()
            .filter(|(who, what, _)| *who == player && what == currency)
            .map(|(_, _, amount)| amount)
            .sum()
    }
}

impl QuestHost for RecordingHost {
    fn online_players(&self) -> Vec<Uuid> {
        self.online.clone()
    }

    fn notify_rollover(&mut self, player: Uuid, period: Period) {
        self.notices.push((player, period));
    }

    fn grant_currency(&mut self, player: Uuid, currency: &str, amount: u32) -> bool {
        if !self.accept_grants {
            return false;
        }
        self.currency.push((player, currency.to_string(), amount));
        true
    }

    fn grant_item(&mut self, player: Uuid, item: &str, amount: u32) -> bool {
        if !self.accept_grants {
            return false;
        }
        self.items.push((player, item.to_string(), amount));
        true
    }
}

/// Engine over a sled store inside `dir`, so a second call with the same dir
/// simulates a process restart.
pub fn engine_in(dir: &TempDir, pools: QuestPools, clock: Arc<TestClock>) -> QuestEngine {
    let store = QuestStoreBuilder::new(dir.path().join("db"))
        .open()
        .expect("open store");
    QuestEngine::new(pools, store, clock)
}

pub fn engine_at(dir: &TempDir, clock: Arc<TestClock>) -> QuestEngine {
    engine_in(dir, QuestPools::default(), clock)
}

/// Max out every objective of the player's active quest for `period`.
pub fn complete_quest(engine: &mut QuestEngine, player: Uuid, period: Period) {
    let quest = engine.quest(period);
    for index in 0..quest.objectives.len() {
        engine
            .set_objective_progress(player, period, index, u32::MAX)
            .expect("set objective progress");
    }
}
