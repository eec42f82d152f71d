//! The sharding/merge engine behind shoal's sharded values.
//!
//! Provides the [`SlotTable`] (per-slot shard storage plus the global
//! pause protocol) and [`ShardedValue`], the user-facing handle that
//! routes updates to the calling thread's slot and merges all slots
//! under a pause for `value()`/`drain()`.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod config;
pub mod metrics;
pub mod pause;
mod slot;
pub mod table;
pub mod value;

pub use config::{ConfigError, TableConfig};
pub use metrics::TableMetrics;
pub use pause::WorldPause;
pub use table::SlotTable;
pub use value::ShardedValue;
