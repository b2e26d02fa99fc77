//! Calendar-aligned seed strings.
//!
//! A seed names "which instance of this period we are in". Two instants map
//! to the same seed exactly when they fall inside the same UTC
//! calendar-aligned window and share the same reroll suffix. All functions
//! here are pure; the engine supplies the clock.

use chrono::{DateTime, Datelike, Duration, Months, Utc};

use super::period::Period;

/// Sentinel cached by the scheduler after an admin invalidation. Never a
/// valid calendar seed, so the next poll always detects a change.
pub const INVALIDATED_SEED: &str = "@invalidated";

/// Base seed for the window containing `now`, without any reroll suffix.
///
/// - Daily: `{year}-{dayOfYear:03}`
/// - Weekly: `{isoWeekYear}-W{isoWeek:02}` (ISO weeks start on Monday)
/// - Monthly: `{year}-{month:02}`
pub fn base_seed(period: Period, now: DateTime<Utc>) -> String {
    match period {
        Period::Daily => format!("{}-{:03}", now.year(), now.ordinal()),
        Period::Weekly => {
            let week = now.iso_week();
            format!("{}-W{:02}", week.year(), week.week())
        }
        Period::Monthly => format!("{}-{:02}", now.year(), now.month()),
    }
}

/// Base seed for the window immediately preceding the one containing `now`.
/// Used by the streak tracker to decide whether continuity was broken.
pub fn previous_seed(period: Period, now: DateTime<Utc>) -> String {
    match period {
        Period::Daily => base_seed(period, now - Duration::days(1)),
        Period::Weekly => base_seed(period, now - Duration::weeks(1)),
        Period::Monthly => {
            // Subtracting a month can clamp the day (e.g. Mar 31 -> Feb 28),
            // which is fine since only year and month feed the seed.
            let back = now.checked_sub_months(Months::new(1)).unwrap_or(now);
            base_seed(period, back)
        }
    }
}

/// Append the admin reroll suffix. Suffix 0 is the natural seed; any other
/// value opens a distinct namespace without waiting for a calendar boundary.
pub fn with_suffix(base: &str, suffix: u32) -> String {
    if suffix == 0 {
        base.to_string()
    } else {
        format!("{}-R{}", base, suffix)
    }
}

/// Strip a trailing `-R{n}` reroll suffix, if present. Streak continuity is
/// judged on base seeds so an admin reroll inside the same window does not
/// break a streak.
pub fn strip_suffix(seed: &str) -> &str {
    if let Some(idx) = seed.rfind("-R") {
        let tail = &seed[idx + 2..];
        if !tail.is_empty() && tail.chars().all(|c| c.is_ascii_digit()) {
            return &seed[..idx];
        }
    }
    seed
}
