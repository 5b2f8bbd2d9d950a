//! Criterion micro-benchmarks for the dispersion engine.

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use strew_core::Vec3;
use strew_engine::Simulation;
use strew_maps::BUILTIN;
use strew_world::Grid;

/// Benchmark: full dispersion run on the 4x4x4 open cube, seeded.
fn bench_open_cube_run(c: &mut Criterion) {
    c.bench_function("open_cube_run", |b| {
        b.iter(|| {
            let mut sim = Simulation::new();
            sim.seed_rng(42);
            sim.set_active_probability(100);
            sim.load_map(4);
            let mut guard = 0;
            while !sim.is_complete() {
                sim.simulate_step();
                guard += 1;
                if guard > 10_000 {
                    break;
                }
            }
            black_box(sim.metrics().makespan);
        });
    });
}

/// Benchmark: one tick with a saturated arena (everyone settled but one).
fn bench_single_tick(c: &mut Criterion) {
    let mut sim = Simulation::new();
    sim.seed_rng(7);
    sim.set_active_probability(100);
    sim.load_map(3);
    for _ in 0..8 {
        sim.simulate_step();
    }
    c.bench_function("single_tick_chamber", |b| {
        b.iter(|| {
            sim.simulate_step();
            black_box(sim.metrics().simulation_steps);
        });
    });
}

/// Benchmark: BFS rebuild over the largest legal volume.
fn bench_distance_field(c: &mut Criterion) {
    let mut grid = Grid::new(20, 20, 20);
    for x in 0..20 {
        for y in 0..20 {
            for z in 0..20 {
                grid.set_walkable(Vec3::new(x, y, z), true);
            }
        }
    }
    grid.set_door(Vec3::ZERO);
    c.bench_function("distance_field_8000_cells", |b| {
        b.iter(|| {
            grid.recompute_distances();
            black_box(grid.distance_at(Vec3::new(19, 19, 19)));
        });
    });
}

/// Benchmark: decoding every built-in map's bit stream.
fn bench_map_decode(c: &mut Criterion) {
    c.bench_function("decode_builtin_catalog", |b| {
        b.iter(|| {
            for map in BUILTIN {
                let mut walkable = 0u32;
                map.for_each_cell(|_, _, _, w| {
                    if w {
                        walkable += 1;
                    }
                });
                black_box(walkable);
            }
        });
    });
}

criterion_group!(
    benches,
    bench_open_cube_run,
    bench_single_tick,
    bench_distance_field,
    bench_map_decode
);
criterion_main!(benches);
