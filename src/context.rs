//! # Dungeon Context
//!
//! One loaded level and everything that operates on it.
//!
//! The context owns the generated dungeon, the RNG that built it, and the
//! spawn records, and hands out pathfinders over the grid. It is passed
//! explicitly to whoever needs it; there is no ambient level state
//! anywhere in the crate.

use crate::generation::{Dungeon, DungeonGenerator, GenerationConfig, Room, Spawner};
use crate::map::{Grid, Position};
use crate::pathfinding::Pathfinder;
use crate::rng::LevelRng;
use crate::WarrenResult;
use log::info;

/// A fully generated level plus its RNG and spawn bookkeeping.
///
/// # Examples
///
/// ```
/// use warren::{DungeonContext, GenerationConfig};
///
/// let mut context =
///     DungeonContext::generate(&GenerationConfig::for_testing(), Some(42)).unwrap();
/// let player = context.spawn_player();
/// let exit = context.spawn_exit(player);
/// assert_ne!(player, exit);
/// assert!(!context.pathfinder().path(player, exit).is_empty());
/// ```
#[derive(Debug, Clone)]
pub struct DungeonContext {
    dungeon: Dungeon,
    rng: LevelRng,
    spawner: Spawner,
}

impl DungeonContext {
    /// Generates a new level.
    ///
    /// With `seed` given the level is reproducible; without it a
    /// wall-clock seed is drawn and logged, and [`DungeonContext::seed`]
    /// reports it so a bug report can name it.
    pub fn generate(config: &GenerationConfig, seed: Option<u64>) -> WarrenResult<Self> {
        let mut rng = match seed {
            Some(seed) => LevelRng::new(seed),
            None => LevelRng::from_entropy(),
        };
        info!("loading level with seed {}", rng.seed());

        let generator = DungeonGenerator::new(config.clone())?;
        let dungeon = generator.generate(&mut rng)?;
        let spawner = Spawner::new(config.spawn_min_distance);
        Ok(Self {
            dungeon,
            rng,
            spawner,
        })
    }

    /// Seed the level was generated from.
    pub fn seed(&self) -> u64 {
        self.dungeon.seed
    }

    /// The generated grid, for rendering and pathfinding.
    pub fn grid(&self) -> &Grid {
        &self.dungeon.grid
    }

    /// Bounding rectangles of the placed rooms.
    pub fn rooms(&self) -> &[Room] {
        &self.dungeon.rooms
    }

    /// Places the player.
    pub fn spawn_player(&mut self) -> Position {
        self.spawner.spawn(&self.dungeon.grid, &mut self.rng)
    }

    /// Places one enemy.
    pub fn spawn_enemy(&mut self) -> Position {
        self.spawner.spawn(&self.dungeon.grid, &mut self.rng)
    }

    /// Places one pickup.
    pub fn spawn_pickup(&mut self) -> Position {
        self.spawner.spawn(&self.dungeon.grid, &mut self.rng)
    }

    /// Places the level exit away from the player.
    pub fn spawn_exit(&mut self, player: Position) -> Position {
        self.spawner
            .spawn_exit(&self.dungeon.grid, &mut self.rng, player)
    }

    /// Every position handed out so far, in placement order.
    pub fn spawned(&self) -> &[Position] {
        self.spawner.placed()
    }

    /// Draws from the level RNG, for callers that need further
    /// level-scoped randomness such as enemy counts.
    pub fn rng(&mut self) -> &mut LevelRng {
        &mut self.rng
    }

    /// A pathfinder over this level's grid.
    pub fn pathfinder(&self) -> Pathfinder<'_> {
        Pathfinder::new(&self.dungeon.grid)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generate_with_seed_is_reproducible() {
        let config = GenerationConfig::for_testing();
        let mut a = DungeonContext::generate(&config, Some(99)).unwrap();
        let mut b = DungeonContext::generate(&config, Some(99)).unwrap();

        assert_eq!(a.seed(), 99);
        assert_eq!(a.rooms(), b.rooms());
        assert_eq!(a.spawn_player(), b.spawn_player());
        assert_eq!(a.spawn_enemy(), b.spawn_enemy());
    }

    #[test]
    fn test_spawns_are_recorded_in_order() {
        let config = GenerationConfig::for_testing();
        let mut context = DungeonContext::generate(&config, Some(5)).unwrap();

        let player = context.spawn_player();
        let enemy = context.spawn_enemy();
        let exit = context.spawn_exit(player);
        assert_eq!(context.spawned(), &[player, enemy, exit]);
    }

    #[test]
    fn test_pathfinder_connects_player_and_exit() {
        let config = GenerationConfig::for_testing();
        let mut context = DungeonContext::generate(&config, Some(1234)).unwrap();

        let player = context.spawn_player();
        let exit = context.spawn_exit(player);
        let path = context.pathfinder().path(player, exit);

        assert_eq!(path.first(), Some(&player));
        assert_eq!(path.last(), Some(&exit));
    }

    #[test]
    fn test_entropy_seed_is_reported() {
        let config = GenerationConfig::for_testing();
        let context = DungeonContext::generate(&config, None).unwrap();
        // Whatever was drawn must be observable for bug reports.
        let _ = context.seed();
    }
}
