//! # Dungeon Generation
//!
//! Maze-and-rooms level generation over one grid.
//!
//! The generator runs a fixed sequence of passes: place rooms, carve a
//! maze through the remaining wall mass, open connectors between the
//! resulting regions, prune corridor dead ends, then reopen a few extra
//! walls for loops. Region membership is tracked in the grid's
//! disjoint-set arena the whole way, which is what guarantees the finished
//! floor forms a single connected component.

use crate::map::{Direction, Grid, Position};
use crate::rng::LevelRng;
use crate::{GenerationConfig, Room, WarrenError, WarrenResult};
use log::{debug, info, warn};

/// A finished level: the grid, the room rectangles that were placed, and
/// the seed that produced it all.
#[derive(Debug, Clone)]
pub struct Dungeon {
    /// The generated tile arena
    pub grid: Grid,
    /// Bounding rectangles of the rooms that were successfully placed
    pub rooms: Vec<Room>,
    /// Seed of the RNG that drove generation, for replay and bug reports
    pub seed: u64,
}

/// Maze-and-rooms dungeon generator.
///
/// Holds a validated configuration; [`DungeonGenerator::generate`] may be
/// called any number of times with different RNGs to produce different
/// levels from the same settings.
///
/// # Examples
///
/// ```
/// use warren::{DungeonGenerator, GenerationConfig, LevelRng};
///
/// let generator = DungeonGenerator::new(GenerationConfig::for_testing()).unwrap();
/// let dungeon = generator.generate(&mut LevelRng::new(42)).unwrap();
/// assert!(!dungeon.rooms.is_empty());
/// ```
#[derive(Debug, Clone)]
pub struct DungeonGenerator {
    config: GenerationConfig,
}

impl DungeonGenerator {
    /// Creates a generator, rejecting configurations generation cannot
    /// honour.
    pub fn new(config: GenerationConfig) -> WarrenResult<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    /// The configuration this generator was built with.
    pub fn config(&self) -> &GenerationConfig {
        &self.config
    }

    /// Builds a complete level.
    ///
    /// Runs every pass to completion before returning; no partial state is
    /// ever observable. All randomness is drawn from `rng`, so a fixed
    /// seed reproduces the level bit for bit.
    pub fn generate(&self, rng: &mut LevelRng) -> WarrenResult<Dungeon> {
        let mut grid = Grid::new(self.config.width, self.config.height);

        let rooms = self.place_rooms(&mut grid, rng);
        self.carve_maze(&mut grid, rng);

        let mut connectors = find_connectors(&mut grid);
        rng.shuffle(&mut connectors);
        open_connectors(&mut grid, &connectors);

        uncarve_dead_ends(&mut grid);
        self.open_random_connectors(&mut grid, rng);

        info!("map generated with seed {}", rng.seed());

        let dungeon = Dungeon {
            grid,
            rooms,
            seed: rng.seed(),
        };
        validate(&dungeon)?;
        Ok(dungeon)
    }

    /// Places non-overlapping rooms at odd coordinates.
    ///
    /// Rooms are drawn with odd dimensions and tried at odd positions
    /// until one fits; `fail_max` consecutive failures for the room
    /// currently being placed ends the whole phase. The budget is global
    /// to the current room, so a dungeon may legitimately end up with few
    /// rooms on a crowded map. The first placement on an empty grid
    /// always succeeds, so there is always at least one.
    fn place_rooms(&self, grid: &mut Grid, rng: &mut LevelRng) -> Vec<Room> {
        let mut rooms = Vec::new();
        let mut fail = 0;
        while fail < self.config.fail_max {
            fail = 0;
            let room_w = rng.next_odd(
                self.config.room_size_min as i32,
                self.config.room_size_max as i32,
            );
            let room_h = rng.next_odd(
                self.config.room_size_min as i32,
                self.config.room_size_max as i32,
            );
            let mut success = false;
            while !success && fail < self.config.fail_max {
                let x = rng.next_odd(1, grid.width() - room_w);
                let y = rng.next_odd(1, grid.height() - room_h);
                // The candidate plus a one-cell margin must still be solid
                // wall, which is what keeps rooms from touching.
                if area_is_wall(grid, x - 1, y - 1, room_w + 1, room_h + 1) {
                    let room = Room::new(Position::new(x, y), room_w as u32, room_h as u32);
                    carve_room(grid, &room);
                    rooms.push(room);
                    success = true;
                } else {
                    fail += 1;
                }
            }
        }
        debug!("placed {} rooms", rooms.len());
        rooms
    }

    /// Carves a maze into every wall region left between the rooms.
    ///
    /// Eligible seeds are odd-coordinate wall cells outside rooms; each
    /// seed that is still uncarved when the scan reaches it starts a
    /// randomized depth-first walk, producing a perfect maze per enclosed
    /// region.
    fn carve_maze(&self, grid: &mut Grid, rng: &mut LevelRng) {
        for x in (1..grid.width()).step_by(2) {
            for y in (1..grid.height()).step_by(2) {
                let pos = Position::new(x, y);
                if grid.is_wall(pos) && !grid.is_room(pos) {
                    grid.set_floor(pos);
                    carve_passages_from(grid, rng, pos);
                }
            }
        }
    }

    /// Reopens a sprinkling of qualifying walls to add loops.
    ///
    /// Scans even-coordinate interior walls sitting between two floor
    /// cells and opens each with probability `connector_ratio`. Region
    /// bookkeeping is deliberately skipped: everything is already
    /// connected, these only add cycles.
    fn open_random_connectors(&self, grid: &mut Grid, rng: &mut LevelRng) {
        let mut opened = 0;
        for x in (2..grid.width() - 1).step_by(2) {
            for y in (2..grid.height() - 1).step_by(2) {
                let pos = Position::new(x, y);
                if !grid.is_wall(pos) {
                    continue;
                }
                let open_ew = grid.is_floor(pos.step(Direction::East))
                    && grid.is_floor(pos.step(Direction::West));
                let open_ns = grid.is_floor(pos.step(Direction::North))
                    && grid.is_floor(pos.step(Direction::South));
                // The roll comes last so the RNG is only consumed for
                // qualifying walls, keeping the draw sequence stable.
                if (open_ew || open_ns) && rng.next_double() < self.config.connector_ratio {
                    grid.set_floor(pos);
                    opened += 1;
                }
            }
        }
        debug!("opened {} extra connectors", opened);
    }
}

/// Tests whether a rectangle spanning `(x, y)` to `(x + w, y + h)`
/// inclusive is entirely wall.
///
/// A rectangle reaching outside the arena is rejected with a warning; the
/// placement loop treats it as an ordinary failed candidate.
fn area_is_wall(grid: &Grid, x: i32, y: i32, w: i32, h: i32) -> bool {
    if x < 0 || y < 0 || x + w > grid.width() || y + h > grid.height() {
        warn!("room candidate at ({}, {}) extends outside the map", x, y);
        return false;
    }
    for i in x..=x + w {
        for j in y..=y + h {
            if !grid.is_wall(Position::new(i, j)) {
                return false;
            }
        }
    }
    true
}

/// Floors every cell of the room, flags it, and unions it to the
/// top-left anchor so the whole room is one region.
fn carve_room(grid: &mut Grid, room: &Room) {
    let anchor = room.top_left;
    for i in room.top_left.x..room.top_left.x + room.width as i32 {
        for j in room.top_left.y..room.top_left.y + room.height as i32 {
            let pos = Position::new(i, j);
            grid.set_floor(pos);
            grid.set_room(pos);
            grid.union(pos, anchor);
        }
    }
}

/// Randomized depth-first maze walk from an already-floored seed.
///
/// Implemented with an explicit stack of (cell, shuffled directions,
/// next direction index) frames; the recursive formulation overflows the
/// call stack on large grids.
fn carve_passages_from(grid: &mut Grid, rng: &mut LevelRng, start: Position) {
    let mut dirs = Direction::all();
    rng.shuffle(&mut dirs);
    let mut stack: Vec<(Position, [Direction; 4], usize)> = vec![(start, dirs, 0)];

    while !stack.is_empty() {
        let top = stack.len() - 1;
        if stack[top].2 >= stack[top].1.len() {
            stack.pop();
            continue;
        }
        let origin = stack[top].0;
        let dir = stack[top].1[stack[top].2];
        stack[top].2 += 1;

        let wall = origin.step(dir);
        let target = wall.step(dir);
        if can_carve(grid, origin, wall, target) {
            grid.set_floor(wall);
            grid.set_floor(target);
            grid.union(origin, wall);
            grid.union(wall, target);

            let mut dirs = Direction::all();
            rng.shuffle(&mut dirs);
            stack.push((target, dirs, 0));
        }
    }
}

/// Whether the walk may open `wall` and claim `target` from `origin`.
///
/// The wall cell must be interior, still wall, and not part of a room;
/// the target two steps out must be an uncarved non-room cell in a
/// different region from the origin.
fn can_carve(grid: &mut Grid, origin: Position, wall: Position, target: Position) -> bool {
    if wall.x <= 0 || wall.x >= grid.width() - 1 || wall.y <= 0 || wall.y >= grid.height() - 1 {
        return false;
    }
    grid.is_wall(wall)
        && !grid.is_room(wall)
        && grid.is_wall(target)
        && !grid.is_room(target)
        && !grid.same_region(origin, target)
}

/// Scans the interior for candidate doorways.
///
/// A connector is a wall cell whose two opposing floor neighbours, on
/// either axis, currently belong to different regions.
fn find_connectors(grid: &mut Grid) -> Vec<Position> {
    let mut connectors = Vec::new();
    for x in 1..grid.width() - 1 {
        for y in 1..grid.height() - 1 {
            let pos = Position::new(x, y);
            if is_connector(grid, pos) {
                connectors.push(pos);
            }
        }
    }
    debug!("found {} connectors", connectors.len());
    connectors
}

fn is_connector(grid: &mut Grid, pos: Position) -> bool {
    if !grid.is_wall(pos) {
        return false;
    }
    let east = pos.step(Direction::East);
    let west = pos.step(Direction::West);
    if grid.is_floor(east) && grid.is_floor(west) && !grid.same_region(east, west) {
        return true;
    }
    let north = pos.step(Direction::North);
    let south = pos.step(Direction::South);
    grid.is_floor(north) && grid.is_floor(south) && !grid.same_region(north, south)
}

/// Opens doorways until every region hangs together.
///
/// The list is walked in its (shuffled) order and each connector is
/// reopened only if its two sides are still in different regions. Later
/// connectors whose sides were already merged by an earlier one are
/// skipped on purpose: that is what keeps the connection graph close to a
/// spanning tree, and it makes the topology sensitive to the shuffle.
/// The shuffle, not any sorting, is where the variety comes from.
fn open_connectors(grid: &mut Grid, connectors: &[Position]) {
    let mut opened = 0;
    for &pos in connectors {
        if try_open_connector(grid, pos) {
            opened += 1;
        }
    }
    debug!("opened {} of {} connectors", opened, connectors.len());
}

fn try_open_connector(grid: &mut Grid, pos: Position) -> bool {
    let east = pos.step(Direction::East);
    let west = pos.step(Direction::West);
    if grid.is_floor(east) && grid.is_floor(west) && !grid.same_region(east, west) {
        grid.set_floor(pos);
        grid.union(pos, east);
        grid.union(pos, west);
        return true;
    }
    let north = pos.step(Direction::North);
    let south = pos.step(Direction::South);
    if grid.is_floor(north) && grid.is_floor(south) && !grid.same_region(north, south) {
        grid.set_floor(pos);
        grid.union(pos, north);
        grid.union(pos, south);
        return true;
    }
    false
}

/// Fills corridor dead ends back in.
///
/// A dead end is a non-room floor cell with three or more orthogonal
/// walls. Filling one can expose its single corridor predecessor as a new
/// dead end, so each fill chains backwards until the corridor joins a
/// junction or a room.
fn uncarve_dead_ends(grid: &mut Grid) {
    for x in 1..grid.width() - 1 {
        for y in 1..grid.height() - 1 {
            let pos = Position::new(x, y);
            if is_dead_end(grid, pos) {
                uncarve_from(grid, pos);
            }
        }
    }
}

fn is_dead_end(grid: &Grid, pos: Position) -> bool {
    grid.is_floor(pos) && !grid.is_room(pos) && grid.orthogonal_wall_count(pos) >= 3
}

fn uncarve_from(grid: &mut Grid, start: Position) {
    let mut pos = start;
    loop {
        grid.set_wall(pos);
        // Corridors are one cell wide, so at most one neighbour can have
        // become a dead end in turn.
        let next = Direction::all()
            .iter()
            .map(|&dir| pos.step(dir))
            .find(|&p| is_dead_end(grid, p));
        match next {
            Some(p) => pos = p,
            None => break,
        }
    }
}

/// Rejects a level no caller could use.
fn validate(dungeon: &Dungeon) -> WarrenResult<()> {
    if dungeon.grid.floor_count() == 0 {
        return Err(WarrenError::GenerationFailed(
            "level has no floor cells".to_string(),
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn single_room_config() -> GenerationConfig {
        GenerationConfig {
            width: 7,
            height: 7,
            room_size_min: 5,
            room_size_max: 5,
            fail_max: 10,
            connector_ratio: 0.05,
            spawn_min_distance: 1.0,
        }
    }

    #[test]
    fn test_invalid_config_rejected_up_front() {
        let mut config = GenerationConfig::new();
        config.width = 32;
        assert!(DungeonGenerator::new(config).is_err());
    }

    #[test]
    fn test_degenerate_map_terminates_with_single_room() {
        // A 7x7 map only has space for one 5x5 room and no maze at all;
        // the fail budget must end room placement instead of spinning.
        let generator = DungeonGenerator::new(single_room_config()).unwrap();
        let dungeon = generator.generate(&mut LevelRng::new(1)).unwrap();

        assert_eq!(dungeon.rooms.len(), 1);
        assert_eq!(dungeon.rooms[0].top_left, Position::new(1, 1));
        assert_eq!(dungeon.grid.floor_count(), 25);
    }

    #[test]
    fn test_first_room_always_lands() {
        for seed in 0..20 {
            let generator = DungeonGenerator::new(GenerationConfig::for_testing()).unwrap();
            let dungeon = generator.generate(&mut LevelRng::new(seed)).unwrap();
            assert!(!dungeon.rooms.is_empty(), "seed {} placed no rooms", seed);
        }
    }

    #[test]
    fn test_rooms_are_odd_aligned() {
        let generator = DungeonGenerator::new(GenerationConfig::new()).unwrap();
        let dungeon = generator.generate(&mut LevelRng::new(42)).unwrap();
        for room in &dungeon.rooms {
            assert_eq!(room.top_left.x % 2, 1);
            assert_eq!(room.top_left.y % 2, 1);
            assert_eq!(room.width % 2, 1);
            assert_eq!(room.height % 2, 1);
        }
    }

    #[test]
    fn test_room_cells_are_flagged_and_unioned() {
        let generator = DungeonGenerator::new(single_room_config()).unwrap();
        let mut dungeon = generator.generate(&mut LevelRng::new(7)).unwrap();
        let room = dungeon.rooms[0];
        let anchor = room.top_left;
        for x in room.top_left.x..room.top_left.x + room.width as i32 {
            for y in room.top_left.y..room.top_left.y + room.height as i32 {
                let pos = Position::new(x, y);
                assert!(dungeon.grid.is_floor(pos));
                assert!(dungeon.grid.is_room(pos));
                assert!(dungeon.grid.same_region(pos, anchor));
            }
        }
    }

    #[test]
    fn test_area_is_wall_rejects_out_of_range() {
        let grid = Grid::new(9, 9);
        assert!(area_is_wall(&grid, 0, 0, 9, 9));
        assert!(!area_is_wall(&grid, 0, 0, 10, 9));
        assert!(!area_is_wall(&grid, -1, 0, 5, 5));
    }

    #[test]
    fn test_dead_end_detection() {
        let mut grid = Grid::new(9, 9);
        // A two-cell corridor stub: (1,1)-(2,1).
        grid.set_floor(Position::new(1, 1));
        grid.set_floor(Position::new(2, 1));
        assert!(is_dead_end(&grid, Position::new(1, 1)));
        assert!(is_dead_end(&grid, Position::new(2, 1)));

        // Room cells are exempt no matter their surroundings.
        grid.set_room(Position::new(1, 1));
        assert!(!is_dead_end(&grid, Position::new(1, 1)));
    }

    #[test]
    fn test_uncarve_chains_along_corridor() {
        let mut grid = Grid::new(9, 9);
        // Room seed at (5,1) keeps the corridor anchored to something
        // that must survive pruning.
        let room_cell = Position::new(5, 1);
        grid.set_floor(room_cell);
        grid.set_room(room_cell);
        for x in 1..5 {
            grid.set_floor(Position::new(x, 1));
        }

        uncarve_dead_ends(&mut grid);

        for x in 1..5 {
            assert!(grid.is_wall(Position::new(x, 1)), "corridor cell {} kept", x);
        }
        assert!(grid.is_floor(room_cell));
    }

    #[test]
    fn test_connector_between_two_regions() {
        let mut grid = Grid::new(9, 9);
        let left = Position::new(2, 3);
        let right = Position::new(4, 3);
        grid.set_floor(left);
        grid.set_floor(right);

        let wall = Position::new(3, 3);
        assert!(is_connector(&mut grid, wall));

        grid.union(left, right);
        assert!(!is_connector(&mut grid, wall));
    }

    #[test]
    fn test_open_connector_merges_regions() {
        let mut grid = Grid::new(9, 9);
        let left = Position::new(2, 3);
        let right = Position::new(4, 3);
        grid.set_floor(left);
        grid.set_floor(right);
        let wall = Position::new(3, 3);

        assert!(try_open_connector(&mut grid, wall));
        assert!(grid.is_floor(wall));
        assert!(grid.same_region(left, right));

        // A second pass over the same doorway is a stale skip.
        assert!(!try_open_connector(&mut grid, Position::new(3, 3)));
    }
}
