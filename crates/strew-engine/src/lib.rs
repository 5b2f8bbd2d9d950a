//! Simulation engine for the strew dispersion problem.
//!
//! [`Simulation`] is the opaque engine handle external hosts drive: it owns
//! the grid, the robot arena, the event tables, and the metrics, and
//! advances them one discrete tick at a time. Everything a consumer can
//! observe flows through its read-only accessors between ticks.
//!
//! # Tick anatomy
//!
//! 1. Decision phase — robots are visited in strictly ascending id;
//!    each active robot samples activation, observes its 3×3×3
//!    neighborhood of *last tick's* world, and either picks a move target
//!    or settles.
//! 2. Door respawn — a robot is appended at the door when the occupancy
//!    index shows it empty.
//! 3. Commit — pending targets become positions; counters advance.
//! 4. Occupancy rebuild — earliest id wins each cell.
//!
//! The engine is single-threaded and cooperative; a tick is atomic from
//! the caller's viewpoint. Multiple instances coexist freely.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod events;
pub mod metrics;
pub mod robot;
pub mod sim;

pub use events::{EventLog, EventTag, Lifecycle, DIRECTION_UNKNOWN};
pub use metrics::Metrics;
pub use robot::{Robot, AGED_AFTER};
pub use sim::{Simulation, DEFAULT_ACTIVE_PROBABILITY};
