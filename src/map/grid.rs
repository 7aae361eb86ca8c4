//! # Grid
//!
//! The tile arena a level is generated into and rendered from.
//!
//! Cells are allocated once, all Wall, and mutated in place while the
//! generator runs. The disjoint-set region arena lives alongside the tile
//! arena so connectivity bookkeeping stays flat and index-based.

use super::{DisjointSet, Position};

/// What occupies a cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TileKind {
    Wall,
    Floor,
}

/// One cell of the level grid.
///
/// Identity is positional: a tile never moves once allocated, and the
/// whole grid is discarded when a new level loads.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Tile {
    /// Wall or floor
    pub kind: TileKind,
    /// Whether the cell belongs to a placed room rather than a corridor
    pub room: bool,
}

impl Tile {
    /// Checks if the tile is a wall.
    pub fn is_wall(self) -> bool {
        self.kind == TileKind::Wall
    }

    /// Checks if the tile is a floor.
    pub fn is_floor(self) -> bool {
        self.kind == TileKind::Floor
    }
}

/// Rectangular arena of tiles with a region arena stored alongside.
///
/// A grid built for nominal dimensions `width × height` allocates
/// `(width + 1) × (height + 1)` cells; the nominal dimensions must be odd
/// so rooms and corridors align to odd coordinates with walls between
/// them. Cells on the outer border are walls for the life of the grid.
///
/// # Examples
///
/// ```
/// use warren::{Grid, Position};
///
/// let grid = Grid::new(9, 9);
/// assert!(grid.is_wall(Position::new(0, 4)));
/// assert_eq!(grid.floor_count(), 0);
/// ```
#[derive(Debug, Clone)]
pub struct Grid {
    width: i32,
    height: i32,
    tiles: Vec<Tile>,
    regions: DisjointSet,
}

impl Grid {
    /// Allocates an all-Wall grid for the given nominal dimensions.
    pub fn new(width: u32, height: u32) -> Self {
        debug_assert!(width % 2 == 1 && height % 2 == 1, "dimensions must be odd");
        let width = width as i32;
        let height = height as i32;
        let len = ((width + 1) * (height + 1)) as usize;
        Self {
            width,
            height,
            tiles: vec![
                Tile {
                    kind: TileKind::Wall,
                    room: false,
                };
                len
            ],
            regions: DisjointSet::new(len),
        }
    }

    /// Nominal width; cells span `0..=width`.
    pub fn width(&self) -> i32 {
        self.width
    }

    /// Nominal height; cells span `0..=height`.
    pub fn height(&self) -> i32 {
        self.height
    }

    /// Checks whether a position lands on an allocated cell.
    pub fn in_bounds(&self, pos: Position) -> bool {
        pos.x >= 0 && pos.x <= self.width && pos.y >= 0 && pos.y <= self.height
    }

    fn index(&self, pos: Position) -> usize {
        debug_assert!(self.in_bounds(pos), "position {:?} out of bounds", pos);
        (pos.y * (self.width + 1) + pos.x) as usize
    }

    /// Read accessor for one cell; panics on out-of-bounds coordinates.
    pub fn cell_at(&self, x: i32, y: i32) -> &Tile {
        &self.tiles[self.index(Position::new(x, y))]
    }

    /// Read accessor for one cell by position.
    pub fn tile(&self, pos: Position) -> &Tile {
        &self.tiles[self.index(pos)]
    }

    /// Checks if the cell at `pos` is a floor. Out-of-bounds is not floor.
    pub fn is_floor(&self, pos: Position) -> bool {
        self.in_bounds(pos) && self.tiles[self.index(pos)].is_floor()
    }

    /// Checks if the cell at `pos` is a wall. Out-of-bounds counts as wall.
    pub fn is_wall(&self, pos: Position) -> bool {
        !self.is_floor(pos)
    }

    /// Checks if the cell at `pos` belongs to a room.
    pub fn is_room(&self, pos: Position) -> bool {
        self.in_bounds(pos) && self.tiles[self.index(pos)].room
    }

    /// Flips the cell at `pos` to floor.
    pub fn set_floor(&mut self, pos: Position) {
        let index = self.index(pos);
        self.tiles[index].kind = TileKind::Floor;
    }

    /// Flips the cell at `pos` back to wall.
    pub fn set_wall(&mut self, pos: Position) {
        let index = self.index(pos);
        self.tiles[index].kind = TileKind::Wall;
    }

    /// Marks the cell at `pos` as part of a room.
    pub fn set_room(&mut self, pos: Position) {
        let index = self.index(pos);
        self.tiles[index].room = true;
    }

    /// Returns the region representative for the cell at `pos`.
    pub fn find(&mut self, pos: Position) -> usize {
        let index = self.index(pos);
        self.regions.find(index)
    }

    /// Merges the regions containing `a` and `b`.
    pub fn union(&mut self, a: Position, b: Position) {
        let ia = self.index(a);
        let ib = self.index(b);
        self.regions.union(ia, ib);
    }

    /// Checks whether two cells currently share a region.
    pub fn same_region(&mut self, a: Position, b: Position) -> bool {
        let ia = self.index(a);
        let ib = self.index(b);
        self.regions.same_set(ia, ib)
    }

    /// Counts floor cells over the whole arena.
    pub fn floor_count(&self) -> usize {
        self.tiles.iter().filter(|t| t.is_floor()).count()
    }

    /// Iterates over every allocated cell position, row by row.
    pub fn positions(&self) -> impl Iterator<Item = Position> + '_ {
        let width = self.width;
        let height = self.height;
        (0..=height).flat_map(move |y| (0..=width).map(move |x| Position::new(x, y)))
    }

    /// Packs the 8-neighbourhood of `pos` into a wall bitmask.
    ///
    /// Bits run clockwise from north: N=0x01, NE=0x02, E=0x04, SE=0x08,
    /// S=0x10, SW=0x20, W=0x40, NW=0x80, set when the neighbour is a wall
    /// or lies outside the grid. External renderers key their auto-tiling
    /// sprite tables off this code, so the bit order is part of the
    /// contract.
    pub fn wall_adjacency_code(&self, pos: Position) -> u8 {
        const NEIGHBOURS: [(i32, i32); 8] = [
            (0, -1),  // N
            (1, -1),  // NE
            (1, 0),   // E
            (1, 1),   // SE
            (0, 1),   // S
            (-1, 1),  // SW
            (-1, 0),  // W
            (-1, -1), // NW
        ];
        let mut code = 0u8;
        for (bit, (dx, dy)) in NEIGHBOURS.iter().enumerate() {
            if self.is_wall(Position::new(pos.x + dx, pos.y + dy)) {
                code |= 1 << bit;
            }
        }
        code
    }

    /// Counts wall cells among the 4 orthogonal neighbours of `pos`.
    pub fn orthogonal_wall_count(&self, pos: Position) -> usize {
        pos.cardinal_adjacent_positions()
            .iter()
            .filter(|&&p| self.is_wall(p))
            .count()
    }
}
