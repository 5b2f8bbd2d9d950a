//! Baked map catalog for the strew dispersion engine.
//!
//! Maps are immutable, bit-packed walkability volumes with a name, their
//! dimensions, and the door cell. The packing contract is fixed: cells are
//! iterated z-outermost / y / x-innermost, bit `i` lives in byte `i / 8`
//! under mask `1 << (i % 8)`, and bit 1 means walkable.
//!
//! The built-in catalog covers the shapes the engine's test scenarios and
//! demo hosts need; embedding hosts can supply their own [`MapData`] slices
//! instead.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod catalog;
pub mod error;

pub use catalog::{MapData, BUILTIN};
pub use error::MapError;
