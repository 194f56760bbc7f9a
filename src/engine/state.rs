use std::fmt;

use rand::Rng;
use thiserror::Error;

use super::ops;

/// Rows and columns per side of the grid.
pub const GRID_SIZE: usize = 4;

/// A tile value. Always a positive power of two, at least 2.
pub type Tile = u32;

pub(crate) type Cells = [[Option<Tile>; GRID_SIZE]; GRID_SIZE];

#[inline]
pub(crate) fn tile_is_valid(value: Tile) -> bool {
    value >= 2 && value.is_power_of_two()
}

/// A direction to slide/merge tiles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Move {
    Up,
    Down,
    Left,
    Right,
}

impl Move {
    /// All four directions, in the order used for loss checks.
    pub const ALL: [Move; 4] = [Move::Up, Move::Down, Move::Left, Move::Right];

    /// The four lines perpendicular to this direction, each given as cell
    /// coordinates in settle order: the destination edge first, so tiles are
    /// visited in the order they come to rest.
    pub(crate) fn lines(self) -> [[(usize, usize); GRID_SIZE]; GRID_SIZE] {
        let mut lines = [[(0, 0); GRID_SIZE]; GRID_SIZE];
        for (line_idx, line) in lines.iter_mut().enumerate() {
            for (slot, cell) in line.iter_mut().enumerate() {
                *cell = match self {
                    Move::Left => (line_idx, slot),
                    Move::Right => (line_idx, GRID_SIZE - 1 - slot),
                    Move::Up => (slot, line_idx),
                    Move::Down => (GRID_SIZE - 1 - slot, line_idx),
                };
            }
        }
        lines
    }
}

/// How a move resolved.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MoveOutcome {
    /// At least one tile moved or merged. The caller should spawn a tile
    /// (or use [`Grid::make_move`], which does so itself).
    Moved,
    /// Nothing moved or merged; the move is a no-op and no tile is spawned.
    Rejected,
    /// The grid is full and no direction would change it.
    Lost,
}

impl MoveOutcome {
    /// True if the move changed the grid.
    #[inline]
    pub fn changed(self) -> bool {
        matches!(self, MoveOutcome::Moved)
    }

    /// True if the game is over.
    #[inline]
    pub fn is_lost(self) -> bool {
        matches!(self, MoveOutcome::Lost)
    }
}

/// Rejected grid input at the construction boundary.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum GridError {
    #[error("invalid tile {value} at ({row}, {col}); tiles are powers of two >= 2")]
    InvalidTile { row: usize, col: usize, value: u32 },
}

/// A 4x4 grid of optional tiles, indexed by `(row, col)`, both in `0..4`.
///
/// The grid is plain value state and the only state the engine knows about:
/// operations take a grid and hand back a new one wholesale. Cells hold
/// `Some(tile)` for an occupied cell and `None` for an empty one.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Grid(pub(crate) Cells);

impl Grid {
    /// A constant empty grid.
    pub const EMPTY: Grid = Grid([[None; GRID_SIZE]; GRID_SIZE]);

    /// Construct a `Grid` from plain cell values, `0` meaning empty.
    ///
    /// This is the checked entry point for untrusted input: any value that
    /// is not zero or a power of two >= 2 is rejected.
    ///
    /// ```
    /// use core_2048::engine::Grid;
    /// let grid = Grid::from_values([[2, 0, 4, 0], [0; 4], [0; 4], [0; 4]]).unwrap();
    /// assert_eq!(grid.get(0, 2), Some(4));
    /// assert!(Grid::from_values([[3, 0, 0, 0], [0; 4], [0; 4], [0; 4]]).is_err());
    /// ```
    pub fn from_values(values: [[u32; GRID_SIZE]; GRID_SIZE]) -> Result<Self, GridError> {
        let mut cells = [[None; GRID_SIZE]; GRID_SIZE];
        for (row, row_values) in values.iter().enumerate() {
            for (col, &value) in row_values.iter().enumerate() {
                cells[row][col] = match value {
                    0 => None,
                    v if tile_is_valid(v) => Some(v),
                    v => return Err(GridError::InvalidTile { row, col, value: v }),
                };
            }
        }
        Ok(Grid(cells))
    }

    /// Construct a `Grid` directly from cells. Tile validity is the caller's
    /// contract here (debug-asserted); prefer [`Grid::from_values`] for
    /// untrusted input.
    #[inline]
    pub fn from_cells(cells: [[Option<Tile>; GRID_SIZE]; GRID_SIZE]) -> Self {
        debug_assert!(
            cells.iter().flatten().flatten().all(|&t| tile_is_valid(t)),
            "tiles are powers of two >= 2"
        );
        Grid(cells)
    }

    /// Consume this `Grid`, returning the raw cell array.
    #[inline]
    pub fn into_cells(self) -> [[Option<Tile>; GRID_SIZE]; GRID_SIZE] {
        self.0
    }

    /// Borrow the raw cell array for this `Grid`.
    #[inline]
    pub fn cells(&self) -> &[[Option<Tile>; GRID_SIZE]; GRID_SIZE] {
        &self.0
    }

    /// The tile at `(row, col)`, or `None` for an empty cell.
    ///
    /// Panics if `row` or `col` is out of `0..4`.
    #[inline]
    pub fn get(self, row: usize, col: usize) -> Option<Tile> {
        self.0[row][col]
    }

    /// Collect cells back into plain values, `0` meaning empty.
    #[inline]
    pub fn to_values(self) -> [[u32; GRID_SIZE]; GRID_SIZE] {
        let mut values = [[0; GRID_SIZE]; GRID_SIZE];
        for (row, row_cells) in self.0.iter().enumerate() {
            for (col, cell) in row_cells.iter().enumerate() {
                values[row][col] = cell.unwrap_or(0);
            }
        }
        values
    }

    /// Count the number of empty cells.
    #[inline]
    pub fn count_empty(self) -> usize {
        self.tiles().filter(Option::is_none).count()
    }

    /// True if no cell is empty.
    #[inline]
    pub fn is_full(self) -> bool {
        self.count_empty() == 0
    }

    /// The highest tile value on the grid, or `None` if the grid is empty.
    #[inline]
    pub fn highest_tile(self) -> Option<Tile> {
        self.tiles().flatten().max()
    }

    /// Iterate over cells in row-major order.
    #[inline]
    pub fn tiles(self) -> TilesIter {
        TilesIter { cells: self.0, idx: 0 }
    }

    /// Slide and merge all tiles in `direction`. Pure; no randomness and no
    /// spawn. See [`ops::resolve`](super::resolve) for the free-function
    /// mirror.
    ///
    /// ```
    /// use core_2048::engine::{Grid, Move};
    /// let grid = Grid::from_values([[2, 2, 2, 0], [0; 4], [0; 4], [0; 4]]).unwrap();
    /// let resolution = grid.resolve(Move::Left);
    /// // the farthest pair merges; the trailing tile only slides
    /// assert_eq!(resolution.grid.to_values()[0], [4, 2, 0, 0]);
    /// assert_eq!(resolution.merges.len(), 1);
    /// ```
    #[inline]
    pub fn resolve(self, direction: Move) -> ops::Resolution {
        ops::resolve(self, direction)
    }

    /// True if the grid is full and no direction would change it.
    #[inline]
    pub fn is_lost(self) -> bool {
        ops::is_lost(self)
    }

    /// Insert a random 2 (80%) or 4 (20%) tile into a uniformly random empty
    /// cell, using the provided RNG.
    ///
    /// Panics if the grid has no empty cell; callers must not spawn after a
    /// rejected or lost move.
    ///
    /// Deterministic example using a seeded RNG:
    /// ```
    /// use core_2048::engine::Grid;
    /// use rand::{SeedableRng, rngs::StdRng};
    /// let mut rng = StdRng::seed_from_u64(123);
    /// let grid = Grid::EMPTY.with_random_tile(&mut rng).with_random_tile(&mut rng);
    /// assert_eq!(grid.count_empty(), 14);
    /// ```
    #[inline]
    pub fn with_random_tile<R: Rng + ?Sized>(self, rng: &mut R) -> Self {
        ops::spawn_random_tile(self, rng)
    }

    /// Convenience: like `with_random_tile` but uses thread-local RNG.
    #[inline]
    pub fn with_random_tile_thread(self) -> Self {
        let mut rng = rand::thread_rng();
        self.with_random_tile(&mut rng)
    }

    /// A fresh game grid: two spawns into the empty grid.
    ///
    /// ```
    /// use core_2048::engine::Grid;
    /// use rand::{SeedableRng, rngs::StdRng};
    /// let mut rng = StdRng::seed_from_u64(7);
    /// let grid = Grid::with_start_tiles(&mut rng);
    /// assert_eq!(grid.count_empty(), 14);
    /// assert_eq!(Grid::with_start_tiles(&mut StdRng::seed_from_u64(7)), grid);
    /// ```
    #[inline]
    pub fn with_start_tiles<R: Rng + ?Sized>(rng: &mut R) -> Self {
        Grid::EMPTY.with_random_tile(rng).with_random_tile(rng)
    }

    /// Resolve a move, then spawn a tile if the move changed the grid, using
    /// the provided RNG. The returned resolution's grid includes the spawned
    /// tile when the outcome is [`MoveOutcome::Moved`].
    ///
    /// ```
    /// use core_2048::engine::{Grid, Move};
    /// use rand::{SeedableRng, rngs::StdRng};
    /// let mut rng = StdRng::seed_from_u64(1);
    /// let grid = Grid::from_values([[2, 2, 0, 0], [0; 4], [0; 4], [0; 4]]).unwrap();
    /// let resolution = grid.make_move(Move::Left, &mut rng);
    /// assert!(resolution.changed());
    /// assert_eq!(resolution.grid.get(0, 0), Some(4));
    /// assert_eq!(resolution.grid.count_empty(), 14);
    /// ```
    #[inline]
    pub fn make_move<R: Rng + ?Sized>(self, direction: Move, rng: &mut R) -> ops::Resolution {
        let mut resolution = ops::resolve(self, direction);
        if resolution.outcome.changed() {
            resolution.grid = resolution.grid.with_random_tile(rng);
        }
        resolution
    }
}

impl fmt::Debug for Grid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Grid({:?})", self.to_values())
    }
}

impl fmt::Display for Grid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f)?;
        for (row_idx, row) in self.0.iter().enumerate() {
            if row_idx > 0 {
                writeln!(f, "-------------------------------")?;
            }
            let rendered: Vec<String> = row
                .iter()
                .map(|cell| match cell {
                    Some(value) => format!("{:^7}", value),
                    None => " ".repeat(7),
                })
                .collect();
            writeln!(f, "{}", rendered.join("|"))?;
        }
        Ok(())
    }
}

/// Iterator over grid cells in row-major order.
pub struct TilesIter {
    cells: Cells,
    idx: usize,
}

impl Iterator for TilesIter {
    type Item = Option<Tile>;

    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        if self.idx >= GRID_SIZE * GRID_SIZE {
            return None;
        }
        let cell = self.cells[self.idx / GRID_SIZE][self.idx % GRID_SIZE];
        self.idx += 1;
        Some(cell)
    }
}

impl IntoIterator for Grid {
    type Item = Option<Tile>;
    type IntoIter = TilesIter;

    #[inline]
    fn into_iter(self) -> Self::IntoIter {
        self.tiles()
    }
}

impl IntoIterator for &Grid {
    type Item = Option<Tile>;
    type IntoIter = TilesIter;

    #[inline]
    fn into_iter(self) -> Self::IntoIter {
        self.tiles()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn it_builds_from_values() {
        let grid = Grid::from_values([[2, 0, 4, 0], [0; 4], [0; 4], [8, 0, 0, 1024]]).unwrap();
        assert_eq!(grid.get(0, 0), Some(2));
        assert_eq!(grid.get(0, 1), None);
        assert_eq!(grid.get(3, 3), Some(1024));
        assert_eq!(grid.count_empty(), 12);
    }

    #[test]
    fn it_rejects_invalid_tiles() {
        let err = Grid::from_values([[0; 4], [0, 0, 3, 0], [0; 4], [0; 4]]).unwrap_err();
        assert_eq!(err, GridError::InvalidTile { row: 1, col: 2, value: 3 });
        assert!(Grid::from_values([[1, 0, 0, 0], [0; 4], [0; 4], [0; 4]]).is_err());
        assert!(Grid::from_values([[6, 0, 0, 0], [0; 4], [0; 4], [0; 4]]).is_err());
    }

    #[test]
    fn it_round_trips_values() {
        let values = [[2, 0, 0, 4], [0, 16, 0, 0], [0; 4], [0, 0, 2048, 0]];
        let grid = Grid::from_values(values).unwrap();
        assert_eq!(grid.to_values(), values);
    }

    #[test]
    fn it_queries_occupancy() {
        assert_eq!(Grid::EMPTY.count_empty(), 16);
        assert!(!Grid::EMPTY.is_full());
        assert_eq!(Grid::EMPTY.highest_tile(), None);

        let full = Grid::from_values([
            [2, 4, 2, 4],
            [4, 2, 4, 2],
            [2, 4, 2, 4],
            [4, 2, 4, 256],
        ])
        .unwrap();
        assert_eq!(full.count_empty(), 0);
        assert!(full.is_full());
        assert_eq!(full.highest_tile(), Some(256));
    }

    #[test]
    fn it_iterates_row_major() {
        let grid = Grid::from_values([[2, 0, 0, 0], [0, 4, 0, 0], [0; 4], [0, 0, 0, 8]]).unwrap();
        let cells: Vec<Option<Tile>> = grid.tiles().collect();
        assert_eq!(cells.len(), 16);
        assert_eq!(cells[0], Some(2));
        assert_eq!(cells[5], Some(4));
        assert_eq!(cells[15], Some(8));
        assert_eq!(cells.iter().flatten().count(), 3);
    }

    #[test]
    fn it_orders_lines_by_settle_priority() {
        let left = Move::Left.lines();
        assert_eq!(left[0], [(0, 0), (0, 1), (0, 2), (0, 3)]);
        let right = Move::Right.lines();
        assert_eq!(right[0], [(0, 3), (0, 2), (0, 1), (0, 0)]);
        let up = Move::Up.lines();
        assert_eq!(up[2], [(0, 2), (1, 2), (2, 2), (3, 2)]);
        let down = Move::Down.lines();
        assert_eq!(down[2], [(3, 2), (2, 2), (1, 2), (0, 2)]);
    }

    #[test]
    fn it_formats_grids() {
        let grid = Grid::from_values([[2, 0, 0, 0], [0; 4], [0; 4], [0, 0, 0, 16]]).unwrap();
        let shown = format!("{}", grid);
        assert!(shown.contains("   2   "));
        assert!(shown.contains("  16   "));
        assert!(shown.contains('|'));
        assert_eq!(format!("{:?}", Grid::EMPTY), format!("Grid({:?})", [[0u32; 4]; 4]));
    }

    #[test]
    fn it_reports_outcome_flags() {
        assert!(MoveOutcome::Moved.changed());
        assert!(!MoveOutcome::Moved.is_lost());
        assert!(!MoveOutcome::Rejected.changed());
        assert!(MoveOutcome::Lost.is_lost());
        assert!(!MoveOutcome::Lost.changed());
    }
}
