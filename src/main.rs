use core_2048::engine::{Grid, Move, Resolution};
use rand::seq::SliceRandom;
use rand::Rng;

/// Play one random legal move, or `None` when the game is over.
fn random_policy_step<R: Rng + ?Sized>(grid: Grid, rng: &mut R) -> Option<Resolution> {
    let mut directions = Move::ALL;
    directions.shuffle(rng);
    for direction in directions {
        let resolution = grid.make_move(direction, rng);
        if resolution.changed() {
            return Some(resolution);
        }
    }
    None
}

fn main() {
    let mut rng = rand::thread_rng();
    let mut grid = Grid::with_start_tiles(&mut rng);
    println!("{}", grid);
    let mut move_count = 0;
    while let Some(resolution) = random_policy_step(grid, &mut rng) {
        move_count += 1;
        grid = resolution.grid;
        println!("{}", grid);
    }
    println!(
        "Moves made: {}, Highest tile: {}",
        move_count,
        grid.highest_tile().unwrap_or(0)
    );
}
