//! core-2048: the move-resolution core of a 4x4 sliding-tile merge game
//!
//! This crate provides:
//! - A `Grid` of optional tiles with ergonomic queries (`count_empty`, `is_full`, ...)
//! - A move resolver: `resolve` slides and merges tiles along a direction and
//!   classifies the outcome (`Moved` / `Rejected` / `Lost`)
//! - A tile spawner: `with_random_tile` writes a 2 (80%) or 4 (20%) into a
//!   uniformly random empty cell, driven by a caller-supplied RNG
//!
//! Quick start:
//! ```
//! use core_2048::engine::{Grid, Move, MoveOutcome};
//! use rand::{rngs::StdRng, SeedableRng};
//!
//! // Deterministic setup with a seeded RNG
//! let mut rng = StdRng::seed_from_u64(42);
//! let grid = Grid::with_start_tiles(&mut rng);
//! assert_eq!(grid.count_empty(), 14);
//!
//! let resolution = grid.make_move(Move::Left, &mut rng);
//! assert!(matches!(resolution.outcome, MoveOutcome::Moved | MoveOutcome::Rejected));
//! ```
//!
//! Note: For convenience, there are also free functions mirroring the `Grid`
//! methods (e.g. `engine::resolve`, `engine::make_move`) that use thread-local
//! RNG where randomness is involved. Prefer the methods when you need
//! determinism.
//!
pub mod engine;
