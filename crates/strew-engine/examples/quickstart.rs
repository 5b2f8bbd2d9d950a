//! Strew quickstart — run one dispersion to completion and print metrics.
//!
//! Demonstrates:
//!   1. Creating an engine and seeding its random source
//!   2. Loading a catalog map and setting the activation probability
//!   3. Stepping until the run reports complete
//!   4. Reading the metric block and a text rendering of the volume
//!
//! Run with:
//!   cargo run --example quickstart

use strew_core::{CellKind, Vec3};
use strew_engine::Simulation;

const MAP_INDEX: i32 = 3; // Chamber
const ACTIVE_PROBABILITY: i32 = 75;
const SEED: u64 = 42;

fn glyph(kind: CellKind) -> char {
    match kind {
        CellKind::Empty => '.',
        CellKind::Wall => '#',
        CellKind::ActiveRobot => 'r',
        CellKind::SettledRobot => 'R',
        CellKind::Door => 'D',
        CellKind::SleepingRobot => 'z',
    }
}

fn main() {
    println!("=== Strew Quickstart ===\n");

    let mut sim = Simulation::new();
    sim.seed_rng(SEED);
    sim.set_active_probability(ACTIVE_PROBABILITY);
    sim.load_map(MAP_INDEX);

    let map = &sim.catalog()[MAP_INDEX as usize];
    println!(
        "Map: {} ({}x{}x{}), {} walkable cells, door {:?}",
        map.name, map.size_x, map.size_y, map.size_z,
        sim.grid().available_cells(),
        map.door,
    );
    println!("Activation probability: {}%\n", sim.active_probability());

    while !sim.is_complete() {
        sim.simulate_step();
    }

    let m = sim.metrics();
    println!("Run complete after {} ticks.", m.simulation_steps);
    println!("  Available cells: {}", sim.grid().available_cells());
    println!("  Robots:          {}", sim.robot_count());
    println!("  Makespan:        {}", m.makespan);
    println!("  T total / max:   {} / {}", m.t_total, m.t_max);
    println!("  E total / max:   {} / {}", m.e_total, m.e_max);

    println!("\nFinal volume, one slice per y layer (bottom to top):");
    for y in 0..sim.grid().size_y() {
        println!("  y = {y}:");
        for z in (0..sim.grid().size_z()).rev() {
            let row: String = (0..sim.grid().size_x())
                .map(|x| glyph(sim.cell_view(Vec3::new(x, y, z))))
                .collect();
            println!("    {row}");
        }
    }
}
