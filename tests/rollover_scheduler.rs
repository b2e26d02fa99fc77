//! The rollover watcher against a moving clock: boundary detection,
//! notification fan-out, cache purging and interaction with admin rerolls.

mod common;

use std::sync::Arc;

use common::{engine_at, RecordingHost, TestClock};
use questcycle::quest::{Period, RolloverWatch};
use tempfile::TempDir;
use uuid::Uuid;

#[test]
fn startup_is_quiet() {
    let dir = TempDir::new().unwrap();
    let clock = TestClock::at(2024, 4, 9);
    let mut engine = engine_at(&dir, clock);
    let mut watch = RolloverWatch::new(&engine, 1);
    let mut host = RecordingHost::with_players(vec![Uuid::new_v4()]);

    for _ in 0..5 {
        assert!(watch.on_tick(&mut engine, &mut host).is_empty());
    }
    assert!(host.notices.is_empty());
}

#[test]
fn midnight_rolls_the_daily_quest_and_notifies() {
    let dir = TempDir::new().unwrap();
    let clock = TestClock::at(2024, 4, 9);
    let mut engine = engine_at(&dir, Arc::clone(&clock));
    let mut watch = RolloverWatch::new(&engine, 1);
    let alice = Uuid::new_v4();
    let bob = Uuid::new_v4();
    let mut host = RecordingHost::with_players(vec![alice, bob]);

    let before = engine.quest(Period::Daily);
    clock.set(2024, 4, 10);
    assert_eq!(watch.poll(&mut engine, &mut host), vec![Period::Daily]);
    assert_eq!(
        host.notices,
        vec![(alice, Period::Daily), (bob, Period::Daily)]
    );

    let after = engine.quest(Period::Daily);
    assert_ne!(before.seed, after.seed);
}

#[test]
fn week_boundary_rolls_daily_and_weekly() {
    let dir = TempDir::new().unwrap();
    // Sunday 2024-04-14; Monday starts ISO week 16.
    let clock = TestClock::at(2024, 4, 14);
    let mut engine = engine_at(&dir, Arc::clone(&clock));
    let mut watch = RolloverWatch::new(&engine, 1);
    let mut host = RecordingHost::with_players(vec![Uuid::new_v4()]);

    clock.set(2024, 4, 15);
    assert_eq!(
        watch.poll(&mut engine, &mut host),
        vec![Period::Daily, Period::Weekly]
    );
}

#[test]
fn downtime_across_a_boundary_is_caught_on_the_first_poll() {
    let dir = TempDir::new().unwrap();
    let clock = TestClock::at(2024, 4, 9);
    let player = Uuid::new_v4();

    {
        let mut engine = engine_at(&dir, Arc::clone(&clock));
        engine
            .set_objective_progress(player, Period::Daily, 0, 1)
            .unwrap();
    }

    // Process comes back three days later. The watcher primes to the current
    // seed (no spurious report) and stale progress is simply replaced.
    clock.set(2024, 4, 12);
    let mut engine = engine_at(&dir, Arc::clone(&clock));
    let mut watch = RolloverWatch::new(&engine, 1);
    let mut host = RecordingHost::with_players(vec![player]);
    assert!(watch.poll(&mut engine, &mut host).is_empty());

    let (quest, progress) = engine.quest_view(player, Period::Daily);
    assert_eq!(quest.seed, "2024-103");
    assert!(progress.counters.iter().all(|c| *c == 0));
}

#[test]
fn reroll_plus_invalidate_is_reported_once() {
    let dir = TempDir::new().unwrap();
    let clock = TestClock::at(2024, 4, 9);
    let mut engine = engine_at(&dir, clock);
    let mut watch = RolloverWatch::new(&engine, 1);
    let mut host = RecordingHost::with_players(vec![Uuid::new_v4()]);

    engine.force_global_reroll(Period::Daily);
    watch.invalidate(Period::Daily);

    assert_eq!(watch.poll(&mut engine, &mut host), vec![Period::Daily]);
    assert!(watch.poll(&mut engine, &mut host).is_empty());
    assert_eq!(host.notices.len(), 1);
}

#[test]
fn interval_gating_counts_ticks_not_time() {
    let dir = TempDir::new().unwrap();
    let clock = TestClock::at(2024, 4, 9);
    let mut engine = engine_at(&dir, Arc::clone(&clock));
    let mut watch = RolloverWatch::new(&engine, 4);
    let mut host = RecordingHost::with_players(vec![Uuid::new_v4()]);

    clock.set(2024, 4, 10);
    let mut reports = Vec::new();
    for _ in 0..8 {
        reports.push(watch.on_tick(&mut engine, &mut host).len());
    }
    // Only the 4th tick of each interval does work, and only the first of
    // those finds a change.
    assert_eq!(reports, vec![0, 0, 0, 1, 0, 0, 0, 0]);
}
