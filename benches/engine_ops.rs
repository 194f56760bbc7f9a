use core_2048::engine::{Grid, Move};
use criterion::{criterion_group, criterion_main, BatchSize, Criterion};
use rand::{rngs::StdRng, SeedableRng};
use std::hint::black_box;

fn corpus() -> Vec<Grid> {
    let mut rng = StdRng::seed_from_u64(42);
    let mut grids = Vec::new();
    // Empty and two-tile starts
    grids.push(Grid::EMPTY);
    let mut g = Grid::with_start_tiles(&mut rng);
    grids.push(g);
    // Derive a variety of densities deterministically
    let seq = [Move::Left, Move::Up, Move::Right, Move::Down];
    for i in 0..20 {
        let dir = seq[i % seq.len()];
        let resolution = g.resolve(dir);
        if resolution.changed() {
            g = resolution.grid.with_random_tile(&mut rng);
        }
        grids.push(g);
    }
    grids
}

fn bench_resolve(c: &mut Criterion) {
    c.bench_function("resolve/left", |bch| {
        let grids = corpus();
        bch.iter(|| {
            let mut acc = 0u64;
            for &g in &grids {
                acc = acc.wrapping_add(g.resolve(Move::Left).grid.count_empty() as u64);
            }
            black_box(acc)
        })
    });
    c.bench_function("resolve/right", |bch| {
        let grids = corpus();
        bch.iter(|| {
            let mut acc = 0u64;
            for &g in &grids {
                acc = acc.wrapping_add(g.resolve(Move::Right).grid.count_empty() as u64);
            }
            black_box(acc)
        })
    });
    c.bench_function("resolve/up", |bch| {
        let grids = corpus();
        bch.iter(|| {
            let mut acc = 0u64;
            for &g in &grids {
                acc = acc.wrapping_add(g.resolve(Move::Up).grid.count_empty() as u64);
            }
            black_box(acc)
        })
    });
    c.bench_function("resolve/down", |bch| {
        let grids = corpus();
        bch.iter(|| {
            let mut acc = 0u64;
            for &g in &grids {
                acc = acc.wrapping_add(g.resolve(Move::Down).grid.count_empty() as u64);
            }
            black_box(acc)
        })
    });
}

fn bench_spawn_and_moves(c: &mut Criterion) {
    c.bench_function("grid/with_random_tile", |bch| {
        bch.iter_batched(
            || (Grid::EMPTY, StdRng::seed_from_u64(7)),
            |(mut g, mut rng)| {
                for _ in 0..16 {
                    g = g.with_random_tile(&mut rng);
                }
                black_box(g)
            },
            BatchSize::SmallInput,
        )
    });
    c.bench_function("grid/make_move_left", |bch| {
        bch.iter_batched(
            || {
                let mut rng = StdRng::seed_from_u64(9);
                (Grid::with_start_tiles(&mut rng), rng)
            },
            |(mut g, mut rng)| {
                for _ in 0..64 {
                    g = g.make_move(Move::Left, &mut rng).grid;
                }
                black_box(g)
            },
            BatchSize::SmallInput,
        )
    });
}

fn bench_queries(c: &mut Criterion) {
    c.bench_function("query/is_lost", |bch| {
        let grids = corpus();
        bch.iter(|| {
            let mut acc = 0u64;
            for &g in &grids {
                acc ^= u64::from(g.is_lost());
            }
            black_box(acc)
        })
    });
    c.bench_function("query/count_empty", |bch| {
        let grids = corpus();
        bch.iter(|| {
            let mut acc = 0u64;
            for &g in &grids {
                acc ^= g.count_empty() as u64;
            }
            black_box(acc)
        })
    });
    c.bench_function("query/highest_tile", |bch| {
        let grids = corpus();
        bch.iter(|| {
            let mut acc = 0u64;
            for &g in &grids {
                acc ^= u64::from(g.highest_tile().unwrap_or(0));
            }
            black_box(acc)
        })
    });
}

criterion_group!(engine_ops, bench_resolve, bench_spawn_and_moves, bench_queries);
criterion_main!(engine_ops);
