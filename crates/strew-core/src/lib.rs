//! Core types for the strew dispersion engine.
//!
//! This is the leaf crate with zero internal strew dependencies. It defines
//! the fundamental vocabulary used throughout the workspace: integer 3D
//! vectors, the six axis-aligned unit directions with their cyclic
//! successor, cell classification codes, robot identifiers, and the two
//! host-injection seams (randomness and diagnostics).

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod cell;
pub mod diag;
pub mod direction;
pub mod id;
pub mod rng;
pub mod vec3;

// Re-export core types at crate root for convenience.
pub use cell::{CellKind, CellState};
pub use diag::{Diagnostic, DiagnosticSink, MemorySink, NullSink};
pub use direction::Direction;
pub use id::RobotId;
pub use rng::{ChaChaSource, RandomSource};
pub use vec3::Vec3;
