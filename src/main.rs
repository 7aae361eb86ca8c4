//! # Warren Demo Binary
//!
//! Generates a level, places the entities a game would place, and prints
//! the result as ASCII. Stands in for the external renderer and entity
//! spawner the library is designed to feed.

use clap::Parser;
use log::{info, LevelFilter};
use std::fs;
use std::path::PathBuf;
use warren::{DungeonContext, GenerationConfig, Grid, Position, WarrenResult};

/// Command line arguments for the warren demo.
#[derive(Parser, Debug)]
#[command(name = "warren")]
#[command(about = "Deterministic maze-and-rooms dungeon generation")]
#[command(version)]
struct Args {
    /// Random seed for level generation; omitted means wall-clock seeded
    #[arg(short, long)]
    seed: Option<u64>,

    /// Map width in tiles, odd (overrides the config file)
    #[arg(long)]
    width: Option<u32>,

    /// Map height in tiles, odd (overrides the config file)
    #[arg(long)]
    height: Option<u32>,

    /// JSON generation config file
    #[arg(long)]
    config: Option<PathBuf>,

    /// Overlay the player-to-exit path on the map
    #[arg(long)]
    show_path: bool,

    /// Log level (error, warn, info, debug, trace)
    #[arg(long, default_value = "info")]
    log_level: String,
}

fn main() -> WarrenResult<()> {
    let args = Args::parse();
    init_logging(&args.log_level);
    info!("warren v{}", warren::VERSION);

    let config = load_config(&args)?;
    let mut context = DungeonContext::generate(&config, args.seed)?;

    let player = context.spawn_player();
    let enemy_count = context.rng().next_int(5, 10);
    let enemies: Vec<Position> = (0..enemy_count).map(|_| context.spawn_enemy()).collect();
    let pickup_count = context.rng().next_int(2, 5);
    let pickups: Vec<Position> = (0..pickup_count).map(|_| context.spawn_pickup()).collect();
    let exit = context.spawn_exit(player);

    let path = if args.show_path {
        context.pathfinder().path(player, exit)
    } else {
        Vec::new()
    };

    render(context.grid(), player, exit, &enemies, &pickups, &path);
    println!("seed: {}", context.seed());
    Ok(())
}

/// Initializes the logging system based on the specified log level.
fn init_logging(log_level: &str) {
    let level = match log_level.to_lowercase().as_str() {
        "error" => LevelFilter::Error,
        "warn" => LevelFilter::Warn,
        "info" => LevelFilter::Info,
        "debug" => LevelFilter::Debug,
        "trace" => LevelFilter::Trace,
        _ => LevelFilter::Info,
    };
    env_logger::Builder::new().filter_level(level).init();
}

/// Builds the generation config from file, defaults, and overrides.
fn load_config(args: &Args) -> WarrenResult<GenerationConfig> {
    let mut config = match &args.config {
        Some(path) => serde_json::from_str(&fs::read_to_string(path)?)?,
        None => GenerationConfig::new(),
    };
    if let Some(width) = args.width {
        config.width = width;
    }
    if let Some(height) = args.height {
        config.height = height;
    }
    Ok(config)
}

/// Prints the level, entities, and optional path as ASCII.
fn render(
    grid: &Grid,
    player: Position,
    exit: Position,
    enemies: &[Position],
    pickups: &[Position],
    path: &[Position],
) {
    for y in 0..=grid.height() {
        let mut row = String::with_capacity(grid.width() as usize + 1);
        for x in 0..=grid.width() {
            let pos = Position::new(x, y);
            let glyph = if pos == player {
                'P'
            } else if pos == exit {
                'E'
            } else if enemies.contains(&pos) {
                'e'
            } else if pickups.contains(&pos) {
                '$'
            } else if path.contains(&pos) {
                '*'
            } else if grid.is_wall(pos) {
                '#'
            } else {
                '.'
            };
            row.push(glyph);
        }
        println!("{}", row);
    }
}
