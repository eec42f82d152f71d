//! Cumulative performance metrics for a slot table.
//!
//! [`TableMetrics`] is a point-in-time copy of the table's internal
//! atomic counters, enabling telemetry and tests to observe update
//! volume, pause cost, and reclamation activity without extra
//! synchronization on the hot path.

use std::sync::atomic::{AtomicU64, Ordering};

/// Point-in-time copy of a table's cumulative counters.
///
/// All durations are in nanoseconds. Counters only ever increase;
/// reading them is `Relaxed` and may trail concurrent activity by a
/// few operations.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct TableMetrics {
    /// Cumulative number of `update()` calls applied.
    pub updates: u64,
    /// Cumulative number of fresh shards constructed on the update path.
    pub shards_created: u64,
    /// Cumulative number of global pauses performed.
    pub pauses: u64,
    /// Cumulative number of shard entries folded by snapshots and drains.
    pub entries_merged: u64,
    /// Cumulative number of entries removed by the retirement sweep.
    pub entries_reclaimed: u64,
    /// Cumulative number of pool identities retired by dropped values.
    pub pools_retired: u64,
    /// Duration of the most recent pause, in nanoseconds.
    pub last_pause_ns: u64,
    /// Duration of the longest pause observed, in nanoseconds.
    pub max_pause_ns: u64,
}

/// The table's live atomic counters, updated by the hot and cold paths.
#[derive(Default)]
pub(crate) struct TableCounters {
    pub(crate) updates: AtomicU64,
    pub(crate) shards_created: AtomicU64,
    pub(crate) pauses: AtomicU64,
    pub(crate) entries_merged: AtomicU64,
    pub(crate) entries_reclaimed: AtomicU64,
    pub(crate) pools_retired: AtomicU64,
    pub(crate) last_pause_ns: AtomicU64,
    pub(crate) max_pause_ns: AtomicU64,
}

impl TableCounters {
    /// Copy the counters into a [`TableMetrics`] snapshot.
    pub(crate) fn snapshot(&self) -> TableMetrics {
        TableMetrics {
            updates: self.updates.load(Ordering::Relaxed),
            shards_created: self.shards_created.load(Ordering::Relaxed),
            pauses: self.pauses.load(Ordering::Relaxed),
            entries_merged: self.entries_merged.load(Ordering::Relaxed),
            entries_reclaimed: self.entries_reclaimed.load(Ordering::Relaxed),
            pools_retired: self.pools_retired.load(Ordering::Relaxed),
            last_pause_ns: self.last_pause_ns.load(Ordering::Relaxed),
            max_pause_ns: self.max_pause_ns.load(Ordering::Relaxed),
        }
    }

    /// Record a completed pause of the given duration.
    pub(crate) fn record_pause(&self, duration_ns: u64) {
        self.pauses.fetch_add(1, Ordering::Relaxed);
        self.last_pause_ns.store(duration_ns, Ordering::Relaxed);
        self.max_pause_ns.fetch_max(duration_ns, Ordering::Relaxed);
    }
}
