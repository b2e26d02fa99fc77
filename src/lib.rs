//! # QuestCycle - Procedural Periodic Quests for Creature-Collection Servers
//!
//! QuestCycle generates daily, weekly and monthly quests deterministically
//! from calendar-aligned seed strings, tracks per-player progress against
//! them, and pays out currency with daily streak bonuses and chance-based
//! bonus items on turn-in.
//!
//! ## Design
//!
//! - **Deterministic generation**: the active quest is a pure function of
//!   `(period, seed, pools)`. Nothing about a quest instance is stored;
//!   every server regenerates identical objectives from the same seed.
//! - **Lazy invalidation**: per-player progress carries the seed it was
//!   earned under and is replaced wholesale the moment the seed goes stale.
//!   Rollover needs no per-player bookkeeping.
//! - **Host-agnostic**: time, presence, notifications and reward delivery
//!   all flow through the [`host::Clock`] and [`host::QuestHost`] traits, so
//!   the engine embeds into any game server loop.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use questcycle::host::SystemClock;
//! use questcycle::quest::{QuestEngine, QuestPools, QuestStoreBuilder, RolloverWatch};
//!
//! fn main() -> anyhow::Result<()> {
//!     let pools = QuestPools::load_or_create(std::path::Path::new("data/quest_pools.json"));
//!     let store = QuestStoreBuilder::new("data/questcycle").open()?;
//!     let mut engine = QuestEngine::new(pools, store, Arc::new(SystemClock));
//!     let _watch = RolloverWatch::new(&engine, 20);
//!
//!     let daily = engine.quest(questcycle::quest::Period::Daily);
//!     for objective in &daily.objectives {
//!         println!("- {}", objective.description());
//!     }
//!     Ok(())
//! }
//! ```
//!
//! ## Module Organization
//!
//! - [`quest`] - Engine, generator, seeds, pools, scheduler and persistence
//! - [`host`] - Integration traits the embedding game server implements
//! - [`commands`] - `QUEST ...` command parsing and display rendering
//! - [`config`] - TOML configuration management

pub mod commands;
pub mod config;
pub mod host;
pub mod quest;
