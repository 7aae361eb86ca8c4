//! # Warren
//!
//! Deterministic maze-and-rooms dungeon generation with A* pathfinding.
//!
//! ## Architecture Overview
//!
//! Warren builds rogue-like levels on a 2D grid and answers pathfinding
//! queries over the result. The core pieces, leaf to root:
//!
//! - **Level RNG**: a seeded random source every downstream component draws
//!   from, so a whole level is reproducible from one integer
//! - **Map**: the tile arena, with a disjoint-set region arena stored
//!   alongside it to track connectivity during generation
//! - **Generation System**: room placement, maze carving, connector
//!   opening, and dead-end pruning, followed by spawn placement
//! - **Pathfinder**: A* over the finished grid, meant to be queried
//!   repeatedly by chase AI
//!
//! Rendering, input, audio, and persistence are external collaborators:
//! they consume the finished [`Grid`] and the positions handed out by the
//! spawn layer. The bundled binary renders a plain ASCII dump in their
//! place.
//!
//! ## Reproducibility
//!
//! All randomness routes through [`LevelRng`]. Generating twice with the
//! same seed and configuration produces bit-identical grids and identical
//! spawn streams; the seed of an auto-seeded level is retrievable for bug
//! reports.

pub mod context;
pub mod generation;
pub mod map;
pub mod pathfinding;
pub mod rng;

pub use context::DungeonContext;
pub use generation::{Dungeon, DungeonGenerator, GenerationConfig, Room, Spawner};
pub use map::{Direction, DisjointSet, Grid, Position, Tile, TileKind};
pub use pathfinding::Pathfinder;
pub use rng::LevelRng;

/// Core error type for the Warren crate.
#[derive(thiserror::Error, Debug)]
pub enum WarrenError {
    /// I/O operation failed
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization/deserialization error
    #[error("Serialization error: {0}")]
    Serde(#[from] serde_json::Error),

    /// Configuration rejected before generation started
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// Generation produced an unusable level
    #[error("Generation failed: {0}")]
    GenerationFailed(String),
}

/// Result type used throughout the Warren codebase.
pub type WarrenResult<T> = Result<T, WarrenError>;

/// Version information for the crate.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Default generation constants.
pub mod defaults {
    /// Default map width in tiles (must be odd)
    pub const MAP_WIDTH: u32 = 33;

    /// Default map height in tiles (must be odd)
    pub const MAP_HEIGHT: u32 = 33;

    /// Smallest room edge, inclusive
    pub const ROOM_SIZE_MIN: u32 = 5;

    /// Largest room edge, exclusive bound handed to the odd sampler
    pub const ROOM_SIZE_MAX: u32 = 15;

    /// Consecutive placement failures before room placement gives up
    pub const FAIL_MAX: u32 = 25;

    /// Probability of reopening a qualifying wall in the final pass
    pub const CONNECTOR_RATIO: f64 = 0.05;

    /// Minimum distance between two spawned entities before decay
    pub const SPAWN_MIN_DISTANCE: f64 = 3.0;
}
