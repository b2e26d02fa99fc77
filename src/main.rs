//! Binary entrypoint for the QuestCycle CLI.
//!
//! Commands:
//! - `init` - create a starter `questcycle.toml` and default quest pools
//! - `preview <period> [--seed <seed>]` - print the quest a seed generates
//! - `status` - show the active seeds and quests for every period
//! - `watch` - run the standalone rollover watcher loop
//!
//! See the library crate docs for module-level details: `questcycle::`.
use std::path::Path;
use std::sync::Arc;

use anyhow::Result;
use clap::{Parser, Subcommand};
use log::info;
use uuid::Uuid;

use questcycle::config::Config;
use questcycle::host::{QuestHost, SystemClock};
use questcycle::quest::{
    generate, Period, QuestEngine, QuestPools, QuestStoreBuilder, RolloverWatch,
};

#[derive(Parser)]
#[command(name = "questcycle")]
#[command(about = "Procedural periodic quest engine for creature-collection servers")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Configuration file path
    #[arg(short, long, default_value = "questcycle.toml", global = true)]
    config: String,

    /// Verbose logging (-v, -vv for more)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,
}

#[derive(Subcommand)]
enum Commands {
    /// Create a default configuration file and quest pool file
    Init,
    /// Print the quest generated for a period and seed
    Preview {
        /// Period to preview: daily, weekly or monthly
        period: String,
        /// Seed to generate from; defaults to the current calendar seed
        #[arg(short, long)]
        seed: Option<String>,
    },
    /// Show active seeds and quests for every period
    Status,
    /// Run the rollover watcher loop, logging each boundary crossing
    Watch,
}

/// Headless host for CLI runs: no players, no deliveries.
struct NullHost;

impl QuestHost for NullHost {
    fn online_players(&self) -> Vec<Uuid> {
        Vec::new()
    }
    fn notify_rollover(&mut self, _player: Uuid, _period: Period) {}
    fn grant_currency(&mut self, _player: Uuid, _currency: &str, _amount: u32) -> bool {
        false
    }
    fn grant_item(&mut self, _player: Uuid, _item: &str, _amount: u32) -> bool {
        false
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let pre_config = match cli.command {
        Commands::Init => None,
        _ => Config::load(&cli.config).await.ok(),
    };
    init_logging(&pre_config, cli.verbose);

    match cli.command {
        Commands::Init => {
            Config::create_default(&cli.config).await?;
            let config = Config::load(&cli.config).await?;
            QuestPools::load_or_create(Path::new(&config.quests.pools_path));
            println!("Wrote {} and {}", cli.config, config.quests.pools_path);
        }
        Commands::Preview { period, seed } => {
            let Some(period) = Period::from_id(&period) else {
                anyhow::bail!("unknown period '{}'; expected daily, weekly or monthly", period);
            };
            let config = pre_config.unwrap_or_default();
            let pools = QuestPools::load_or_create(Path::new(&config.quests.pools_path));
            let seed = seed.unwrap_or_else(|| {
                questcycle::quest::base_seed(period, chrono::Utc::now())
            });
            let quest = generate(period, &seed, &pools);
            println!("{} quest for seed {}:", period.display_name(), quest.seed);
            for objective in &quest.objectives {
                println!("  - {}", objective.description());
            }
        }
        Commands::Status => {
            let config = pre_config.unwrap_or_default();
            let mut engine = open_engine(&config)?;
            for period in Period::ALL {
                let quest = engine.quest(period);
                println!("{}: seed {}", period.display_name(), quest.seed);
                for objective in &quest.objectives {
                    println!("  - {}", objective.description());
                }
            }
        }
        Commands::Watch => {
            let config = pre_config.unwrap_or_default();
            let mut engine = open_engine(&config)?;
            let mut watch = RolloverWatch::new(&engine, config.quests.check_interval_ticks);
            let mut host = NullHost;
            info!(
                "watching for rollovers every {}s",
                config.quests.watch_poll_seconds
            );
            let mut interval = tokio::time::interval(std::time::Duration::from_secs(
                config.quests.watch_poll_seconds,
            ));
            loop {
                interval.tick().await;
                // Poll directly: the headless host has no players, so the
                // tick-level idle gate would suppress detection forever.
                watch.poll(&mut engine, &mut host);
            }
        }
    }

    Ok(())
}

fn open_engine(config: &Config) -> Result<QuestEngine> {
    let pools = QuestPools::load_or_create(Path::new(&config.quests.pools_path));
    let store = QuestStoreBuilder::new(Path::new(&config.server.data_dir).join("questcycle"))
        .open()?;
    Ok(QuestEngine::new(pools, store, Arc::new(SystemClock)))
}

fn init_logging(config: &Option<Config>, verbosity: u8) {
    let mut builder = env_logger::Builder::new();
    let base_level = match verbosity {
        0 => config
            .as_ref()
            .and_then(|cfg| cfg.logging.level.parse().ok())
            .unwrap_or(log::LevelFilter::Info),
        1 => log::LevelFilter::Debug,
        _ => log::LevelFilter::Trace,
    };
    builder.filter_level(base_level);
    builder.init();
}
