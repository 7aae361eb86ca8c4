//! # Generation Module
//!
//! Procedural level generation: configuration, room placement records, the
//! dungeon generator itself, and spawn placement over the finished grid.

pub mod dungeon;
pub mod spawn;

pub use dungeon::*;
pub use spawn::*;

use crate::map::Position;
use crate::{defaults, WarrenError, WarrenResult};
use serde::{Deserialize, Serialize};

/// Configuration for level generation.
///
/// Controls grid dimensions, room sizing, retry budgets, and spawn
/// spacing. Validated before any generation work starts; the legacy
/// implementation silently tolerated impossible settings and produced
/// degenerate maps, which the fail-fast [`GenerationConfig::validate`]
/// replaces.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerationConfig {
    /// Nominal map width; must be odd so rooms and corridors align
    pub width: u32,
    /// Nominal map height; must be odd
    pub height: u32,
    /// Smallest room edge, inclusive
    pub room_size_min: u32,
    /// Largest room edge, exclusive bound handed to the odd sampler
    pub room_size_max: u32,
    /// Consecutive placement failures before room placement stops
    pub fail_max: u32,
    /// Probability of reopening a qualifying wall in the final pass
    pub connector_ratio: f64,
    /// Minimum distance between spawned entities before decay
    pub spawn_min_distance: f64,
}

impl GenerationConfig {
    /// Creates the standard configuration.
    ///
    /// # Examples
    ///
    /// ```
    /// use warren::GenerationConfig;
    ///
    /// let config = GenerationConfig::new();
    /// assert!(config.validate().is_ok());
    /// ```
    pub fn new() -> Self {
        Self {
            width: defaults::MAP_WIDTH,
            height: defaults::MAP_HEIGHT,
            room_size_min: defaults::ROOM_SIZE_MIN,
            room_size_max: defaults::ROOM_SIZE_MAX,
            fail_max: defaults::FAIL_MAX,
            connector_ratio: defaults::CONNECTOR_RATIO,
            spawn_min_distance: defaults::SPAWN_MIN_DISTANCE,
        }
    }

    /// Creates a configuration for testing with a smaller, simpler map.
    pub fn for_testing() -> Self {
        Self {
            width: 17,
            height: 17,
            room_size_min: 3,
            room_size_max: 7,
            fail_max: 10,
            connector_ratio: 0.05,
            spawn_min_distance: 2.0,
        }
    }

    /// Rejects configurations generation cannot honour.
    ///
    /// Checked once at generation start so impossible settings fail with a
    /// descriptive error instead of an infinite placement loop or a grid
    /// that breaks the odd-alignment invariant.
    pub fn validate(&self) -> WarrenResult<()> {
        if self.width % 2 == 0 || self.height % 2 == 0 {
            return Err(WarrenError::InvalidConfig(format!(
                "map dimensions must be odd, got {}x{}",
                self.width, self.height
            )));
        }
        if self.width < 5 || self.height < 5 {
            return Err(WarrenError::InvalidConfig(format!(
                "map dimensions must be at least 5x5, got {}x{}",
                self.width, self.height
            )));
        }
        if self.room_size_min < 3 {
            return Err(WarrenError::InvalidConfig(format!(
                "room_size_min must be at least 3, got {}",
                self.room_size_min
            )));
        }
        if self.room_size_max < self.room_size_min {
            return Err(WarrenError::InvalidConfig(format!(
                "room size range [{}, {}) is reversed",
                self.room_size_min, self.room_size_max
            )));
        }
        if !self.room_size_range_has_odd() {
            return Err(WarrenError::InvalidConfig(format!(
                "room size range [{}, {}) contains no odd value",
                self.room_size_min, self.room_size_max
            )));
        }
        if self.room_size_min + 2 > self.width || self.room_size_min + 2 > self.height {
            return Err(WarrenError::InvalidConfig(format!(
                "smallest room ({}) plus margin does not fit a {}x{} map",
                self.room_size_min, self.width, self.height
            )));
        }
        if self.fail_max == 0 {
            return Err(WarrenError::InvalidConfig(
                "fail_max must be at least 1".to_string(),
            ));
        }
        if !(0.0..=1.0).contains(&self.connector_ratio) {
            return Err(WarrenError::InvalidConfig(format!(
                "connector_ratio must lie in [0, 1], got {}",
                self.connector_ratio
            )));
        }
        if !self.spawn_min_distance.is_finite() || self.spawn_min_distance < 0.0 {
            return Err(WarrenError::InvalidConfig(format!(
                "spawn_min_distance must be finite and non-negative, got {}",
                self.spawn_min_distance
            )));
        }
        Ok(())
    }

    /// Whether the odd sampler can produce a room edge from this range.
    ///
    /// An equal-bounds range degenerates to its single value, which the
    /// sampler returns even when it is even; that case is only valid when
    /// the value is odd.
    fn room_size_range_has_odd(&self) -> bool {
        if self.room_size_min == self.room_size_max {
            return self.room_size_min % 2 == 1;
        }
        // A half-open range of length one around an even value has no odd
        // member; anything longer always does.
        !(self.room_size_min % 2 == 0 && self.room_size_max == self.room_size_min + 1)
    }
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self::new()
    }
}

/// A placed room's bounding rectangle.
///
/// Semantically a room is the block of room-flagged cells sharing one
/// region representative; the generator additionally records these
/// rectangles so callers and tests can inspect the layout.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Room {
    /// Top-left cell of the room; always odd coordinates
    pub top_left: Position,
    /// Width in cells; always odd
    pub width: u32,
    /// Height in cells; always odd
    pub height: u32,
}

impl Room {
    /// Creates a new room record.
    pub fn new(top_left: Position, width: u32, height: u32) -> Self {
        Self {
            top_left,
            width,
            height,
        }
    }

    /// Gets the center cell of the room.
    pub fn center(&self) -> Position {
        Position::new(
            self.top_left.x + self.width as i32 / 2,
            self.top_left.y + self.height as i32 / 2,
        )
    }

    /// Checks if a position is inside this room.
    pub fn contains(&self, pos: Position) -> bool {
        pos.x >= self.top_left.x
            && pos.y >= self.top_left.y
            && pos.x < self.top_left.x + self.width as i32
            && pos.y < self.top_left.y + self.height as i32
    }

    /// Checks if this room overlaps another.
    pub fn overlaps(&self, other: &Room) -> bool {
        !(self.top_left.x >= other.top_left.x + other.width as i32
            || other.top_left.x >= self.top_left.x + self.width as i32
            || self.top_left.y >= other.top_left.y + other.height as i32
            || other.top_left.y >= self.top_left.y + self.height as i32)
    }

    /// Returns this room grown by `margin` cells on every side.
    pub fn expanded(&self, margin: u32) -> Room {
        Room {
            top_left: Position::new(
                self.top_left.x - margin as i32,
                self.top_left.y - margin as i32,
            ),
            width: self.width + 2 * margin,
            height: self.height + 2 * margin,
        }
    }
}
