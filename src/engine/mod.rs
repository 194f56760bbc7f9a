//! Engine module: the 4x4 merge grid, move resolution, and tile spawning.
//!
//! - `Grid` is the sole piece of game state: a 4x4 array of optional tiles,
//!   indexed by `(row, col)`. It is `Copy`; every operation consumes a grid
//!   and returns a new one, so callers never observe partial mutation.
//! - `resolve` slides and merges along a direction and reports the outcome
//!   and the merges of the move. It is a pure function with no randomness.
//! - `with_random_tile` is the spawner: one empty cell chosen uniformly,
//!   value 2 with probability 0.8, else 4. Deterministic under a seeded RNG.
//! - Free functions mirror the methods when convenient (e.g. `resolve`);
//!   the ones involving randomness use the thread-local RNG.
//!
//! Both operations are O(16), run to completion without blocking, and hold
//! no state between calls.

mod ops;
pub mod state;

pub use state::{Grid, GridError, Move, MoveOutcome, Tile, GRID_SIZE};

pub use ops::{insert_random_tile, is_lost, make_move, resolve, Merge, Resolution};
