//! Strew: a step-driven engine for the 3D uniform dispersion problem.
//!
//! Autonomous finite-state robots enter a bounded 3D grid through a single
//! door cell and spread through the walkable volume, each eventually
//! settling in place until the settled positions densely fill the region.
//! External layers (renderers, batch runners, comparison dashboards) drive
//! the engine one tick at a time and poll cells, per-robot events, and
//! metrics between ticks.
//!
//! This is the top-level facade crate re-exporting the public API of the
//! strew sub-crates. For most users, adding `strew` as a single dependency
//! is sufficient.
//!
//! # Quick start
//!
//! ```rust
//! use strew::prelude::*;
//!
//! let mut sim = Simulation::new();
//! sim.seed_rng(7);
//! sim.set_active_probability(100);
//! sim.load_map(1); // the 1x1x5 corridor
//!
//! while !sim.is_complete() {
//!     sim.simulate_step();
//! }
//!
//! assert_eq!(sim.grid().available_cells(), 5);
//! assert_eq!(sim.robot_count(), 5);
//! assert!(sim.robots().iter().all(|r| !r.active));
//! ```
//!
//! # Modules
//!
//! | Module | Sub-crate | Contents |
//! |--------|-----------|----------|
//! | [`types`] | `strew-core` | vectors, directions, cell codes, host seams |
//! | [`maps`] | `strew-maps` | the baked bit-packed map catalog |
//! | [`world`] | `strew-world` | grid, BFS distance field, neighborhoods |
//! | [`engine`] | `strew-engine` | the simulation handle, events, metrics |

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

/// Core vocabulary types (`strew-core`).
pub use strew_core as types;

/// Baked map catalog (`strew-maps`).
pub use strew_maps as maps;

/// Grid and neighborhood model (`strew-world`).
pub use strew_world as world;

/// The simulation engine (`strew-engine`).
pub use strew_engine as engine;

/// The names most hosts need.
pub mod prelude {
    pub use strew_core::{
        CellKind, CellState, ChaChaSource, Diagnostic, DiagnosticSink, Direction, RandomSource,
        RobotId, Vec3,
    };
    pub use strew_engine::{Metrics, Robot, Simulation};
    pub use strew_maps::MapData;
    pub use strew_world::{Grid, Neighborhood};
}
