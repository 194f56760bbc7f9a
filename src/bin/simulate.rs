use std::time::{Duration, Instant};

use anyhow::Result;
use clap::Parser;
use core_2048::engine::{Grid, Move, Resolution};
use indicatif::{ProgressBar, ProgressStyle};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use rayon::prelude::*;

#[derive(Debug, Parser)]
#[command(name = "simulate", about = "Play random-policy 2048 games in parallel and report engine statistics")]
struct Args {
    /// Number of games to play
    #[arg(long, default_value_t = 100)]
    games: u64,

    /// Base RNG seed; game i plays with seed + i
    #[arg(long, default_value_t = 42)]
    seed: u64,

    /// Per-game: stop after this many moves
    #[arg(long)]
    steps: Option<u64>,

    /// Suppress the progress bar
    #[arg(long)]
    quiet: bool,
}

#[derive(Debug, Default, Clone, Copy)]
struct GameStats {
    moves: u64,
    merges: u64,
    highest_tile: u32,
    lost: bool,
    spawned_twos: u64,
    spawned_fours: u64,
}

fn total_value(grid: Grid) -> u64 {
    grid.tiles().flatten().map(u64::from).sum()
}

fn count_tiles_of(grid: Grid, value: u32) -> u64 {
    grid.tiles().flatten().filter(|&t| t == value).count() as u64
}

/// Play one seeded game to the end (or the step cap), picking a random legal
/// direction each turn.
fn play_game(seed: u64, steps: Option<u64>) -> GameStats {
    let mut rng = StdRng::seed_from_u64(seed);
    let mut grid = Grid::with_start_tiles(&mut rng);
    let mut stats = GameStats {
        spawned_twos: count_tiles_of(grid, 2),
        spawned_fours: count_tiles_of(grid, 4),
        ..GameStats::default()
    };
    loop {
        if let Some(limit) = steps {
            if stats.moves >= limit {
                break;
            }
        }
        let mut directions = Move::ALL;
        directions.shuffle(&mut rng);
        let resolution = match directions
            .into_iter()
            .map(|direction| grid.resolve(direction))
            .find(Resolution::changed)
        {
            Some(resolution) => resolution,
            None => {
                stats.lost = grid.is_lost();
                break;
            }
        };
        stats.moves += 1;
        stats.merges += resolution.merges.len() as u64;
        // Spawn separately from the move so the spawned value is observable.
        let before = total_value(resolution.grid);
        grid = resolution.grid.with_random_tile(&mut rng);
        if total_value(grid) - before == 2 {
            stats.spawned_twos += 1;
        } else {
            stats.spawned_fours += 1;
        }
    }
    stats.highest_tile = grid.highest_tile().unwrap_or(0);
    stats
}

fn main() -> Result<()> {
    let args = Args::parse();
    let start = Instant::now();

    let pb = if !args.quiet {
        let pb = ProgressBar::new(args.games);
        pb.set_style(
            ProgressStyle::with_template("{spinner} {elapsed_precise} | Games: {pos}/{len}")?
                .tick_chars("⠁⠃⠇⠧⠷⠿⠻⠟⠯⠷⠧⠇⠃"),
        );
        pb.enable_steady_tick(Duration::from_millis(120));
        Some(pb)
    } else {
        None
    };

    let stats: Vec<GameStats> = (0..args.games)
        .into_par_iter()
        .map(|i| {
            let game = play_game(args.seed.wrapping_add(i), args.steps);
            if let Some(pb) = &pb {
                pb.inc(1);
            }
            game
        })
        .collect();

    if let Some(pb) = pb {
        pb.finish_and_clear();
    }

    let elapsed = start.elapsed().as_secs_f64().max(1e-6);
    let total_moves: u64 = stats.iter().map(|s| s.moves).sum();
    let total_merges: u64 = stats.iter().map(|s| s.merges).sum();
    let lost = stats.iter().filter(|s| s.lost).count();
    let best = stats.iter().map(|s| s.highest_tile).max().unwrap_or(0);
    let twos: u64 = stats.iter().map(|s| s.spawned_twos).sum();
    let fours: u64 = stats.iter().map(|s| s.spawned_fours).sum();
    let spawns = twos + fours;
    let twos_pct = if spawns > 0 {
        100.0 * (twos as f64) / (spawns as f64)
    } else {
        0.0
    };

    println!(
        "Games: {} | Lost: {} | Moves: {} | moves/sec: {:.1}",
        args.games,
        lost,
        total_moves,
        (total_moves as f64) / elapsed
    );
    println!(
        "Merges: {} | Highest tile: {} | Spawns: {} ({:.1}% twos)",
        total_merges, best, spawns, twos_pct
    );
    Ok(())
}
