use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use tracing::{Level, info};
use turn_snake::collection::{RunRecorder, SeedPool};
use turn_snake::game::{Direction, GameConfig};
use turn_snake::modes::{GreedyPolicy, Policy, RandomPolicy, RolloutConfig, RolloutMode};

#[derive(Parser)]
#[command(name = "turn_snake")]
#[command(version, about = "Snake environment with relative actions for RL agents")]
struct Cli {
    /// JSON game configuration; flags below override its values
    #[arg(long)]
    config: Option<PathBuf>,

    /// Grid width
    #[arg(long)]
    width: Option<usize>,

    /// Grid height
    #[arg(long)]
    height: Option<usize>,

    /// Starting head row
    #[arg(long)]
    start_row: Option<usize>,

    /// Starting head column
    #[arg(long)]
    start_col: Option<usize>,

    /// Starting direction (0=right, 1=up, 2=left, 3=down)
    #[arg(long)]
    direction: Option<usize>,

    /// Number of episodes to run
    #[arg(long, default_value = "10")]
    episodes: usize,

    /// Step cap per episode
    #[arg(long, default_value = "1000")]
    max_steps: usize,

    /// Seed of the first episode
    #[arg(long)]
    seed: Option<u64>,

    /// Draw episode seeds from this file (one per line) before falling back to --seed
    #[arg(long)]
    seed_file: Option<PathBuf>,

    /// Record every episode as JSON lines to this file
    #[arg(long)]
    record: Option<PathBuf>,

    /// Policy driving the snake
    #[arg(long, default_value = "greedy")]
    policy: PolicyKind,

    /// Increase log verbosity (-v debug, -vv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

#[derive(Clone, ValueEnum)]
enum PolicyKind {
    /// Uniformly random relative actions
    Random,
    /// Head for the food, avoiding flagged obstacles
    Greedy,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let level = match cli.verbose {
        0 => Level::INFO,
        1 => Level::DEBUG,
        _ => Level::TRACE,
    };
    tracing_subscriber::fmt().with_max_level(level).init();

    let game_config = build_game_config(&cli)?;
    game_config
        .validate()
        .context("Invalid game configuration")?;

    info!(
        height = game_config.grid_height,
        width = game_config.grid_width,
        start_row = game_config.start_row,
        start_col = game_config.start_col,
        direction = ?game_config.starting_direction,
        "starting rollout"
    );

    let mut config = RolloutConfig::new(cli.episodes, game_config);
    config.max_steps = cli.max_steps;
    config.seed = cli.seed;

    let base_seed = cli.seed.unwrap_or_else(rand::random);
    match cli.policy {
        PolicyKind::Random => run(&cli, config, base_seed, RandomPolicy::new(base_seed)),
        PolicyKind::Greedy => run(&cli, config, base_seed, GreedyPolicy),
    }
}

fn run<P: Policy>(cli: &Cli, config: RolloutConfig, base_seed: u64, policy: P) -> Result<()> {
    let mut mode = RolloutMode::new(config, policy)?;

    if let Some(path) = &cli.seed_file {
        let pool = SeedPool::load(path, base_seed)?;
        info!(seeds = pool.len(), path = ?path, "loaded seed pool");
        mode = mode.with_seed_pool(pool);
    }
    if let Some(path) = &cli.record {
        mode = mode.with_recorder(RunRecorder::create(path)?);
        info!(path = ?path, "recording episodes");
    }

    let stats = mode.run()?;
    println!("{}", stats.format_summary());
    Ok(())
}

fn build_game_config(cli: &Cli) -> Result<GameConfig> {
    let mut config = match &cli.config {
        Some(path) => GameConfig::load(path)?,
        None => GameConfig::default(),
    };

    if let Some(height) = cli.height {
        config.grid_height = height;
        config.start_row = height / 2;
    }
    if let Some(width) = cli.width {
        config.grid_width = width;
        config.start_col = width / 2;
    }
    if let Some(row) = cli.start_row {
        config.start_row = row;
    }
    if let Some(col) = cli.start_col {
        config.start_col = col;
    }
    if let Some(direction) = cli.direction {
        config.starting_direction = Direction::try_from(direction)?;
    }

    Ok(config)
}
