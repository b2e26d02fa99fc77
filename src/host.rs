//! Integration seams between the quest engine and the game server hosting it.
//!
//! The engine never talks to the world directly. Time comes in through
//! [`Clock`] so tests can pin the calendar, and everything outbound (currency,
//! items, notifications, presence) goes through [`QuestHost`].

use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::quest::period::Period;

/// Source of the current instant. Production uses [`SystemClock`]; tests
/// substitute a fixed or manually advanced clock.
pub trait Clock: Send + Sync {
    fn now_utc(&self) -> DateTime<Utc>;
}

/// Wall-clock UTC time.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now_utc(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// Everything the engine needs from the surrounding game server.
///
/// Grant methods return whether the grant landed; a `false` is logged by the
/// engine and otherwise ignored, since a reward delivery problem must never
/// roll back quest state.
pub trait QuestHost {
    /// Players currently connected. Rollover notification fan-out and the
    /// scheduler's idle gate both read this.
    fn online_players(&self) -> Vec<Uuid>;

    /// Per-player opt-out for rollover notices. Defaults to enabled.
    fn notifications_enabled(&self, _player: Uuid) -> bool {
        true
    }

    /// Tell a player the named period rolled over to a fresh quest.
    fn notify_rollover(&mut self, player: Uuid, period: Period);

    /// Credit `amount` of `currency` to the player. Returns false when the
    /// host could not apply the credit.
    fn grant_currency(&mut self, player: Uuid, currency: &str, amount: u32) -> bool;

    /// Give the player `amount` of `item`. Returns false when the host could
    /// not deliver it.
    fn grant_item(&mut self, player: Uuid, item: &str, amount: u32) -> bool;
}
