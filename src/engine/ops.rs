use rand::Rng;

use super::state::{tile_is_valid, Grid, Move, MoveOutcome, Tile, GRID_SIZE};

/// A single merge produced by a move: the doubled value and the cell where
/// the merged tile came to rest.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Merge {
    pub value: Tile,
    pub row: usize,
    pub col: usize,
}

/// The result of resolving one move.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resolution {
    /// The grid after the move. Equal to the input grid when the outcome is
    /// [`MoveOutcome::Rejected`] or [`MoveOutcome::Lost`].
    pub grid: Grid,
    pub outcome: MoveOutcome,
    /// Merges performed by this move, in settle order per line.
    pub merges: Vec<Merge>,
}

impl Resolution {
    /// True if the move changed the grid.
    #[inline]
    pub fn changed(&self) -> bool {
        self.outcome.changed()
    }

    /// True if the game is over.
    #[inline]
    pub fn is_lost(&self) -> bool {
        self.outcome.is_lost()
    }
}

/// Collapse one line in settle order. `line` lists cell coordinates starting
/// from the destination edge; the returned slots are in the same order.
///
/// Each slot merges at most once per move: a freshly merged slot is a
/// barrier, so three equal tiles merge the pair nearest the destination and
/// a merge result never chains into a second merge.
fn collapse_line(
    grid: &Grid,
    line: &[(usize, usize); GRID_SIZE],
    merges: &mut Vec<Merge>,
) -> [Option<Tile>; GRID_SIZE] {
    let mut slots = [None; GRID_SIZE];
    let mut merged = [false; GRID_SIZE];
    let mut len = 0;
    for &(row, col) in line {
        let tile = match grid.0[row][col] {
            Some(tile) => tile,
            None => continue,
        };
        debug_assert!(tile_is_valid(tile), "tiles are powers of two >= 2");
        if len > 0 && !merged[len - 1] && slots[len - 1] == Some(tile) {
            let value = tile * 2;
            slots[len - 1] = Some(value);
            merged[len - 1] = true;
            let (dest_row, dest_col) = line[len - 1];
            merges.push(Merge { value, row: dest_row, col: dest_col });
        } else {
            slots[len] = Some(tile);
            len += 1;
        }
    }
    slots
}

/// Collapse every line of the grid toward `direction`.
fn collapse_all(grid: Grid, direction: Move) -> (Grid, Vec<Merge>) {
    let mut cells = [[None; GRID_SIZE]; GRID_SIZE];
    let mut merges = Vec::new();
    for line in direction.lines().iter() {
        let slots = collapse_line(&grid, line, &mut merges);
        for (slot, &(row, col)) in line.iter().enumerate() {
            cells[row][col] = slots[slot];
        }
    }
    (Grid(cells), merges)
}

/// Slide and merge all tiles toward `direction`. Pure: same grid and
/// direction always produce the same resolution, and no tile is spawned.
///
/// The outcome distinguishes a move that changed the grid
/// ([`MoveOutcome::Moved`]) from a no-op on a still-playable grid
/// ([`MoveOutcome::Rejected`]) and a no-op on a dead one
/// ([`MoveOutcome::Lost`]).
///
/// ```
/// use core_2048::engine::{resolve, Grid, Move, MoveOutcome};
/// let grid = Grid::from_values([[2, 2, 2, 0], [0; 4], [0; 4], [0; 4]]).unwrap();
/// let resolution = resolve(grid, Move::Left);
/// assert_eq!(resolution.outcome, MoveOutcome::Moved);
/// assert_eq!(resolution.grid.to_values()[0], [4, 2, 0, 0]);
/// ```
pub fn resolve(grid: Grid, direction: Move) -> Resolution {
    let (next, merges) = collapse_all(grid, direction);
    let outcome = if next != grid {
        MoveOutcome::Moved
    } else if is_lost(grid) {
        MoveOutcome::Lost
    } else {
        MoveOutcome::Rejected
    };
    Resolution { grid: next, outcome, merges }
}

/// True if the game is over: the grid is full and no direction would change
/// it. A grid with any empty cell is never lost, and neither is the empty
/// grid.
///
/// ```
/// use core_2048::engine::{is_lost, Grid};
/// let stuck = Grid::from_values([
///     [2, 4, 2, 4],
///     [4, 2, 4, 2],
///     [2, 4, 2, 4],
///     [4, 2, 4, 2],
/// ])
/// .unwrap();
/// assert!(is_lost(stuck));
/// assert!(!is_lost(Grid::EMPTY));
/// ```
pub fn is_lost(grid: Grid) -> bool {
    grid.is_full()
        && Move::ALL
            .iter()
            .all(|&direction| collapse_all(grid, direction).0 == grid)
}

/// Insert a random tile into a uniformly chosen empty cell: 2 with
/// probability 8/10, 4 with probability 2/10.
///
/// Panics if the grid has no empty cell.
pub(crate) fn spawn_random_tile<R: Rng + ?Sized>(grid: Grid, rng: &mut R) -> Grid {
    let empty = grid.count_empty();
    assert!(empty > 0, "with_random_tile requires at least one empty cell");
    let target = rng.gen_range(0..empty);
    let value = random_tile_value(rng);
    let mut cells = grid.0;
    let mut seen = 0;
    'scan: for row in cells.iter_mut() {
        for cell in row.iter_mut() {
            if cell.is_none() {
                if seen == target {
                    *cell = Some(value);
                    break 'scan;
                }
                seen += 1;
            }
        }
    }
    Grid(cells)
}

fn random_tile_value<R: Rng + ?Sized>(rng: &mut R) -> Tile {
    if rng.gen_range(0..10) < 8 {
        2
    } else {
        4
    }
}

/// Convenience: resolve a move and spawn after it using the thread-local
/// RNG. See [`Grid::make_move`] for the seedable version.
#[inline]
pub fn make_move(grid: Grid, direction: Move) -> Resolution {
    let mut rng = rand::thread_rng();
    grid.make_move(direction, &mut rng)
}

/// Convenience: insert a random tile using the thread-local RNG.
#[inline]
pub fn insert_random_tile(grid: Grid) -> Grid {
    grid.with_random_tile_thread()
}
