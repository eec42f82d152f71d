//! Reusable shard fixtures for shoal tests and benchmarks.
//!
//! Three standard shard types covering the engine's headline workloads:
//!
//! - [`CounterShard`] — signed sum accumulator (counters).
//! - [`MaxShard`] — running maximum (watermarks).
//! - [`DistinctSet`] — set union over `u64` keys (approximate sets).

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod fixtures;

pub use fixtures::{CounterShard, DistinctSet, MaxShard};
