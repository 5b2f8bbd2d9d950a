//! Benchmark support crate for strew.
//!
//! Holds no library code of its own; the criterion benchmarks live under
//! `benches/` and depend on the workspace crates directly.

#![forbid(unsafe_code)]
#![deny(rustdoc::broken_intra_doc_links)]
