//! Shared helpers for the shoal benchmarks.

use shoal_engine::{SlotTable, TableConfig};

/// Build a private table with an explicit slot count and leak it.
///
/// Benchmarks need `&'static` tables to construct
/// [`ShardedValue`](shoal_engine::ShardedValue)s with isolated slot
/// layouts; leaking is fine for a benchmark process.
pub fn leaked_table(slot_count: usize) -> &'static SlotTable {
    let table = SlotTable::new(TableConfig::with_slots(slot_count))
        .expect("benchmark slot count is nonzero");
    Box::leak(Box::new(table))
}
