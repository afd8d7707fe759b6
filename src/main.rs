use anyhow::{Context, Result};
use clap::Parser;
use grid_snake::game::{GameConfig, GameEngine};
use grid_snake::modes::PlayMode;
use grid_snake::storage::{JsonFileStore, KeyValueStore, MemoryStore};
use std::fs::File;
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(name = "grid_snake")]
#[command(version, about = "Classic snake on a 20x20 grid")]
struct Cli {
    /// Milliseconds between snake moves
    #[arg(long, default_value = "150")]
    tick_ms: u64,

    /// File the high score is kept in
    #[arg(long, default_value = "snake_scores.json")]
    store: PathBuf,

    /// Keep the high score in memory only
    #[arg(long, conflicts_with = "store")]
    memory: bool,

    /// Write logs to this file (the terminal is taken by the game)
    #[arg(long)]
    log_file: Option<PathBuf>,

    /// Seed for food placement
    #[arg(long)]
    seed: Option<u64>,
}

fn init_logging(log_file: Option<&Path>) -> Result<()> {
    match log_file {
        Some(path) => {
            let file = File::create(path)
                .with_context(|| format!("Failed to create log file {:?}", path))?;
            env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
                .target(env_logger::Target::Pipe(Box::new(file)))
                .init();
        }
        // Only log to the terminal when explicitly asked for
        None => {
            env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("off"))
                .init();
        }
    }
    Ok(())
}

fn open_store(cli: &Cli) -> Box<dyn KeyValueStore> {
    if cli.memory {
        return Box::new(MemoryStore::new());
    }

    match JsonFileStore::open(&cli.store) {
        Ok(store) => {
            log::info!("high scores kept in {:?}", store.path());
            Box::new(store)
        }
        Err(err) => {
            log::warn!("starting without saved scores: {:#}", err);
            Box::new(MemoryStore::new())
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.log_file.as_deref())?;

    let config = GameConfig::with_tick_interval(cli.tick_ms.max(1));
    let store = open_store(&cli);

    let engine = match cli.seed {
        Some(seed) => GameEngine::with_seed(config, store, seed),
        None => GameEngine::new(config, store),
    };
    log::info!("high score on record: {}", engine.high_score());

    let mut play_mode = PlayMode::new(engine);
    play_mode.run().await?;

    Ok(())
}
