//! Shoal: scalable sharded mergeable values for write-heavy aggregation.
//!
//! This is the top-level facade crate that re-exports the public API from
//! the shoal sub-crates. For most users, adding `shoal` as a single
//! dependency is sufficient.
//!
//! A [`ShardedValue`](engine::ShardedValue) splits one logical value into
//! per-slot shards that threads update without global synchronization;
//! reads merge every shard under a brief global pause. It fits workloads
//! where writes vastly outnumber reads: counters, accumulators,
//! approximate sets.
//!
//! # Quick start
//!
//! ```rust
//! use shoal::prelude::*;
//!
//! // A shard type: merge must be associative and order-insensitive,
//! // with the freshly-constructed shard as identity element.
//! #[derive(Clone, Copy, Default)]
//! struct Sum(i64);
//! impl Shard for Sum {
//!     fn merge(self, other: Self) -> Self {
//!         Sum(self.0 + other.0)
//!     }
//! }
//!
//! let total = ShardedValue::new(Sum::default);
//!
//! // Hot path: touches only the calling thread's slot.
//! total.update(|s| Sum(s.0 + 1));
//!
//! // Cold path: merges every slot under a global pause.
//! assert_eq!(total.value().0, 1);
//! assert_eq!(total.drain().0, 1);
//! assert_eq!(total.value().0, 0);
//! ```
//!
//! # Modules
//!
//! Each module corresponds to a sub-crate:
//!
//! | Module | Sub-crate | Contents |
//! |--------|-----------|----------|
//! | [`types`] | `shoal-core` | `PoolId`, `SlotId`, `LazyPoolId`, the `Shard` trait |
//! | [`engine`] | `shoal-engine` | `ShardedValue`, `SlotTable`, pause protocol, metrics |

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

/// Core types and the merge trait (`shoal-core`).
///
/// Contains the identifier types and [`types::Shard`], the single
/// extension point for user-defined merge semantics.
pub use shoal_core as types;

/// The sharding/merge engine (`shoal-engine`).
///
/// [`engine::ShardedValue`] is the main entry point;
/// [`engine::SlotTable`] and [`engine::TableConfig`] are for tests and
/// benches that want a private slot layout.
pub use shoal_engine as engine;

/// Commonly used types, for glob import:
///
/// ```rust
/// use shoal::prelude::*;
/// ```
pub mod prelude {
    // Core types and the merge trait
    pub use shoal_core::{PoolId, Shard, SlotId};

    // Engine surface
    pub use shoal_engine::{ShardedValue, SlotTable, TableConfig, TableMetrics};
}

#[cfg(test)]
mod tests {
    use super::prelude::*;
    use shoal_test_utils::CounterShard;

    #[test]
    fn facade_reexports_compose() {
        let v = ShardedValue::new(CounterShard::default);
        v.update(|c| c.add(2));
        assert_eq!(v.value().count(), 2);
        assert!(SlotTable::global().slot_count() >= 1);
    }
}
