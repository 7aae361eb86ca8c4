//! # Pathfinding
//!
//! A* shortest paths over a finished grid, for chase AI.
//!
//! Queries borrow the grid immutably and keep all working state on the
//! stack of the call, so any number of callers can path over the same
//! level at once. Results are recomputed on every call; callers that path
//! many enemies every frame may want to cache, which is a known
//! optimization opportunity rather than something this module does.

use crate::map::{Grid, Position};
use std::cmp::Reverse;
use std::collections::{BinaryHeap, HashMap};

/// A* pathfinder bound to one grid.
///
/// # Examples
///
/// ```
/// use warren::{DungeonGenerator, GenerationConfig, LevelRng, Pathfinder};
///
/// let generator = DungeonGenerator::new(GenerationConfig::for_testing()).unwrap();
/// let dungeon = generator.generate(&mut LevelRng::new(42)).unwrap();
///
/// let pathfinder = Pathfinder::new(&dungeon.grid);
/// let start = dungeon.rooms[0].center();
/// assert_eq!(pathfinder.path(start, start), vec![start]);
/// ```
#[derive(Debug, Clone, Copy)]
pub struct Pathfinder<'a> {
    grid: &'a Grid,
}

impl<'a> Pathfinder<'a> {
    /// Binds a pathfinder to a grid.
    pub fn new(grid: &'a Grid) -> Self {
        Self { grid }
    }

    /// Computes the cheapest walkable path from `start` to `goal`.
    ///
    /// Returns the cells from `start` to `goal` inclusive; a query from a
    /// cell to itself yields that single cell, and an unreachable goal
    /// yields an empty vector, an expected outcome the caller handles
    /// rather than an error.
    ///
    /// Movement is 4-directional plus diagonals that are only admitted
    /// when both flanking orthogonal cells are open. A step costs its
    /// squared Euclidean distance (1 orthogonal, 2 diagonal), so cutting
    /// a corner is never cheaper than walking it; the Manhattan heuristic
    /// stays admissible under those costs.
    pub fn path(&self, start: Position, goal: Position) -> Vec<Position> {
        let mut came_from: HashMap<Position, Position> = HashMap::new();
        let mut cost_so_far: HashMap<Position, u32> = HashMap::new();
        let mut frontier: BinaryHeap<Reverse<(u32, Position)>> = BinaryHeap::new();

        came_from.insert(start, start);
        cost_so_far.insert(start, 0);
        frontier.push(Reverse((0, start)));

        while let Some(Reverse((priority, current))) = frontier.pop() {
            if current == goal {
                return reconstruct(&came_from, start, goal);
            }
            // A node can sit in the frontier several times; only its best
            // entry is worth expanding.
            if priority > cost_so_far[&current] + heuristic(current, goal) {
                continue;
            }
            for next in self.neighbors(current) {
                let new_cost = cost_so_far[&current] + step_cost(current, next);
                if cost_so_far.get(&next).map_or(true, |&c| new_cost < c) {
                    cost_so_far.insert(next, new_cost);
                    came_from.insert(next, current);
                    frontier.push(Reverse((new_cost + heuristic(next, goal), next)));
                }
            }
        }

        Vec::new()
    }

    /// Walkable neighbours of a cell.
    ///
    /// The four orthogonal floor cells, plus each diagonal floor cell
    /// whose two flanking orthogonal neighbours are open as well.
    fn neighbors(&self, t: Position) -> Vec<Position> {
        let mut res = Vec::with_capacity(8);
        let east = Position::new(t.x + 1, t.y);
        let west = Position::new(t.x - 1, t.y);
        let north = Position::new(t.x, t.y - 1);
        let south = Position::new(t.x, t.y + 1);
        for p in [east, west, north, south] {
            if self.grid.is_floor(p) {
                res.push(p);
            }
        }

        let diagonals = [
            (Position::new(t.x + 1, t.y - 1), east, north),
            (Position::new(t.x + 1, t.y + 1), east, south),
            (Position::new(t.x - 1, t.y - 1), west, north),
            (Position::new(t.x - 1, t.y + 1), west, south),
        ];
        for (diag, side_a, side_b) in diagonals {
            if self.grid.is_floor(diag) && res.contains(&side_a) && res.contains(&side_b) {
                res.push(diag);
            }
        }
        res
    }
}

/// Squared Euclidean distance between two adjacent cells.
fn step_cost(a: Position, b: Position) -> u32 {
    let dx = a.x - b.x;
    let dy = a.y - b.y;
    (dx * dx + dy * dy) as u32
}

/// Manhattan distance, admissible for this movement model.
fn heuristic(a: Position, b: Position) -> u32 {
    a.manhattan_distance(b)
}

fn reconstruct(
    came_from: &HashMap<Position, Position>,
    start: Position,
    goal: Position,
) -> Vec<Position> {
    let mut path = vec![goal];
    let mut current = goal;
    while current != start {
        current = came_from[&current];
        path.push(current);
    }
    path.reverse();
    path
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_walkable(path: &[Position]) {
        for pair in path.windows(2) {
            let dx = (pair[0].x - pair[1].x).abs();
            let dy = (pair[0].y - pair[1].y).abs();
            assert!(dx <= 1 && dy <= 1 && dx + dy >= 1, "jump in path: {:?}", pair);
        }
    }

    /// 9x9 grid with an L-shaped corridor from (1,1) to (5,5).
    fn l_corridor() -> Grid {
        let mut grid = Grid::new(9, 9);
        for x in 1..=5 {
            grid.set_floor(Position::new(x, 1));
        }
        for y in 1..=5 {
            grid.set_floor(Position::new(5, y));
        }
        grid
    }

    #[test]
    fn test_path_follows_corridor_optimally() {
        let grid = l_corridor();
        let pathfinder = Pathfinder::new(&grid);
        let start = Position::new(1, 1);
        let goal = Position::new(5, 5);

        let path = pathfinder.path(start, goal);
        // Manhattan length 8, no shortcut available: 9 cells.
        assert_eq!(path.len(), 9);
        assert_eq!(path[0], start);
        assert_eq!(path[8], goal);
        assert_walkable(&path);
    }

    #[test]
    fn test_path_to_self_is_single_cell() {
        let grid = l_corridor();
        let pathfinder = Pathfinder::new(&grid);
        let cell = Position::new(3, 1);
        assert_eq!(pathfinder.path(cell, cell), vec![cell]);
    }

    #[test]
    fn test_unreachable_goal_yields_empty_path() {
        let mut grid = l_corridor();
        grid.set_floor(Position::new(7, 7)); // isolated cell
        let pathfinder = Pathfinder::new(&grid);

        let path = pathfinder.path(Position::new(1, 1), Position::new(7, 7));
        assert!(path.is_empty());
    }

    #[test]
    fn test_diagonal_needs_both_flanks_open() {
        let mut grid = Grid::new(9, 9);
        grid.set_floor(Position::new(1, 1));
        grid.set_floor(Position::new(2, 1));
        grid.set_floor(Position::new(2, 2));
        let pathfinder = Pathfinder::new(&grid);

        // (1,2) is wall, so the corner cannot be cut: the path must take
        // all three cells.
        let path = pathfinder.path(Position::new(1, 1), Position::new(2, 2));
        assert_eq!(
            path,
            vec![
                Position::new(1, 1),
                Position::new(2, 1),
                Position::new(2, 2)
            ]
        );
    }

    #[test]
    fn test_diagonal_step_is_taken_when_legal() {
        let mut grid = Grid::new(9, 9);
        for pos in [
            Position::new(1, 1),
            Position::new(2, 1),
            Position::new(1, 2),
            Position::new(2, 2),
        ] {
            grid.set_floor(pos);
        }
        let pathfinder = Pathfinder::new(&grid);

        let path = pathfinder.path(Position::new(1, 1), Position::new(2, 2));
        // Costs tie between the corner walk and the diagonal, so only
        // shape-independent facts are pinned.
        assert_eq!(path.first(), Some(&Position::new(1, 1)));
        assert_eq!(path.last(), Some(&Position::new(2, 2)));
        assert!(path.len() <= 3);
        assert_walkable(&path);
    }

    #[test]
    fn test_costs_bias_against_corner_cutting() {
        // A 3-wide open strip: going straight east must win over any
        // zig-zag of equal cell count.
        let mut grid = Grid::new(9, 9);
        for x in 1..=7 {
            for y in 1..=3 {
                grid.set_floor(Position::new(x, y));
            }
        }
        let pathfinder = Pathfinder::new(&grid);
        let path = pathfinder.path(Position::new(1, 2), Position::new(7, 2));
        assert_eq!(path.len(), 7);
        assert!(path.iter().all(|p| p.y == 2), "path wandered: {:?}", path);
    }
}
