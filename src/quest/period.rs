//! Recurring quest cadences and their per-period behavior records.
//!
//! Reward amounts, streak caps and currency identifiers differ per period.
//! Rather than scattering `match` arms across the engine, each variant maps
//! to a single [`PeriodSpec`] record that callers query uniformly.

use serde::{Deserialize, Serialize};

/// The recurring cadences a generated quest can belong to. Exactly one quest
/// instance per period is active at a time; the active instance is identified
/// by its calendar-aligned seed.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(rename_all = "snake_case")]
pub enum Period {
    Daily,
    Weekly,
    Monthly,
}

/// Static behavior record for one period.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PeriodSpec {
    pub id: &'static str,
    pub display_name: &'static str,
    /// Default number of objectives when the pool file does not override it.
    pub objective_count: usize,
    /// Base currency payout for a turn-in, before any streak bonus.
    pub base_amount: u32,
    /// Maximum streak bonus. Zero means the period does not track streaks.
    pub max_streak: u32,
    /// Currency identifier handed to the host inventory on turn-in.
    pub currency: &'static str,
    /// Human-readable currency name for display strings.
    pub currency_name: &'static str,
}

const DAILY_SPEC: PeriodSpec = PeriodSpec {
    id: "daily",
    display_name: "Daily",
    objective_count: 2,
    base_amount: 5,
    max_streak: 5,
    currency: "coin_bronze",
    currency_name: "Bronze Coin",
};

const WEEKLY_SPEC: PeriodSpec = PeriodSpec {
    id: "weekly",
    display_name: "Weekly",
    objective_count: 3,
    base_amount: 3,
    max_streak: 0,
    currency: "coin_silver",
    currency_name: "Silver Coin",
};

const MONTHLY_SPEC: PeriodSpec = PeriodSpec {
    id: "monthly",
    display_name: "Monthly",
    objective_count: 4,
    base_amount: 1,
    max_streak: 0,
    currency: "coin_gold",
    currency_name: "Gold Coin",
};

impl Period {
    /// All periods, in cadence order. Iteration order matters for progress
    /// fan-out and scheduler polling, so keep this stable.
    pub const ALL: [Period; 3] = [Period::Daily, Period::Weekly, Period::Monthly];

    pub fn spec(self) -> &'static PeriodSpec {
        match self {
            Period::Daily => &DAILY_SPEC,
            Period::Weekly => &WEEKLY_SPEC,
            Period::Monthly => &MONTHLY_SPEC,
        }
    }

    pub fn id(self) -> &'static str {
        self.spec().id
    }

    pub fn display_name(self) -> &'static str {
        self.spec().display_name
    }

    /// Whether completing consecutive instances of this period accrues a
    /// streak bonus.
    pub fn has_streak(self) -> bool {
        self.spec().max_streak > 0
    }

    /// Parse a period from its lowercase identifier (case-insensitive).
    pub fn from_id(id: &str) -> Option<Period> {
        Period::ALL
            .into_iter()
            .find(|period| period.id().eq_ignore_ascii_case(id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_id_round_trips() {
        for period in Period::ALL {
            assert_eq!(Period::from_id(period.id()), Some(period));
        }
        assert_eq!(Period::from_id("DAILY"), Some(Period::Daily));
        assert_eq!(Period::from_id("yearly"), None);
    }

    #[test]
    fn only_daily_tracks_streaks() {
        assert!(Period::Daily.has_streak());
        assert!(!Period::Weekly.has_streak());
        assert!(!Period::Monthly.has_streak());
    }

    #[test]
    fn specs_are_distinct() {
        assert_ne!(Period::Daily.spec().currency, Period::Weekly.spec().currency);
        assert_ne!(Period::Weekly.spec().currency, Period::Monthly.spec().currency);
    }
}
