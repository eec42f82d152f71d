//! Core types and traits for the shoal sharded-value engine.
//!
//! This is the leaf crate with zero internal dependencies. It defines
//! the fundamental abstractions used throughout the shoal workspace:
//! pool and slot identifiers, the lazy pool-identity allocator, and
//! the [`Shard`] merge trait.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod id;
pub mod merge;

pub use id::{LazyPoolId, PoolId, SlotId};
pub use merge::Shard;
