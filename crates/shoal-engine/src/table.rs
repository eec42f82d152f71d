//! The slot table: per-slot shard storage plus the global pause entry point.
//!
//! A [`SlotTable`] owns a fixed, enumerable set of slots. Each updating
//! thread is bound to one slot by a stable hash of its thread ID, cached
//! thread-locally, so an update locks exactly one slot and never contends
//! with the rest of the table. [`pause()`](SlotTable::pause) locks every
//! slot in ascending order, producing the quiescent state the snapshot
//! protocol folds under.
//!
//! # Ownership model
//!
//! The table is `Sync`: many threads update it concurrently through
//! `&self`. Most users never touch it directly — [`SlotTable::global()`]
//! backs every [`ShardedValue`](crate::ShardedValue) built with
//! `new()`/`default()`, while tests and benches construct private tables.

use std::cell::Cell;
use std::hash::{DefaultHasher, Hash, Hasher};
use std::sync::atomic::Ordering;
use std::sync::{Mutex, OnceLock};

use shoal_core::{PoolId, Shard, SlotId};

use crate::config::{ConfigError, TableConfig};
use crate::metrics::{TableCounters, TableMetrics};
use crate::pause::WorldPause;
use crate::slot::{Slot, SlotEntry};

/// Fixed table of processor slots hosting shard entries.
///
/// Slot count is set at construction and never changes; the pause
/// protocol relies on the enumeration order being stable.
pub struct SlotTable {
    slots: Box<[Slot]>,
    /// Pool identities retired by dropped sharded values, awaiting the
    /// sweep at the next pause. Orphan shards are bounded garbage: they
    /// survive only until then.
    retired: Mutex<Vec<PoolId>>,
    counters: TableCounters,
}

// Compile-time assertion: SlotTable must be Send + Sync.
const _: fn() = || {
    fn assert<T: Send + Sync>() {}
    assert::<SlotTable>();
};

impl SlotTable {
    /// Build a table from a validated [`TableConfig`].
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if the config fails validation.
    pub fn new(config: TableConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        let slots = (0..config.slot_count)
            .map(|i| Slot::new(SlotId(i as u32)))
            .collect();
        Ok(Self {
            slots,
            retired: Mutex::new(Vec::new()),
            counters: TableCounters::default(),
        })
    }

    /// The process-wide table, sized from [`TableConfig::default()`].
    ///
    /// Built on first use. All sharded values constructed without an
    /// explicit table share it; their pool identities keep their entries
    /// apart.
    pub fn global() -> &'static SlotTable {
        static GLOBAL: OnceLock<SlotTable> = OnceLock::new();
        GLOBAL.get_or_init(|| {
            SlotTable::new(TableConfig::default()).expect("default config is valid")
        })
    }

    /// Number of slots in this table.
    pub fn slot_count(&self) -> usize {
        self.slots.len()
    }

    /// Apply `f` to the calling thread's shard for `pool`, constructing
    /// one via `new_shard` if the slot has none.
    ///
    /// Locks only the calling thread's slot: the scan-and-mutate sequence
    /// runs entirely under that one lock, so the shard cannot migrate or
    /// be observed half-applied. The entry list grows by at most one and
    /// is never shrunk here.
    ///
    /// `f` is called exactly once. Keep it short and non-blocking: a slow
    /// transform delays every thread multiplexed onto the same slot and
    /// any pause waiting on it.
    pub fn update<T, N, F>(&self, pool: PoolId, new_shard: N, f: F)
    where
        T: Shard,
        N: Fn() -> T,
        F: FnOnce(T) -> T,
    {
        let slot = self.slot_for_current_thread();
        let mut entries = slot.entries.lock().unwrap();
        match entries.iter_mut().find(|e| e.pool == pool) {
            Some(entry) => {
                let current = match entry.take_shard::<T>() {
                    Some(shard) => shard,
                    // Entry was cleared by a snapshot, drain, or a
                    // panicking transform; start from the identity.
                    None => {
                        self.counters.shards_created.fetch_add(1, Ordering::Relaxed);
                        new_shard()
                    }
                };
                entry.shard = Some(Box::new(f(current)));
            }
            None => {
                self.counters.shards_created.fetch_add(1, Ordering::Relaxed);
                entries.push(SlotEntry {
                    pool,
                    shard: Some(Box::new(f(new_shard()))),
                });
            }
        }
        drop(entries);
        self.counters.updates.fetch_add(1, Ordering::Relaxed);
    }

    /// Pause the world: lock every slot in ascending order and return the
    /// quiescence guard.
    ///
    /// While the guard lives, no update can run anywhere in this table.
    /// Deadlock-free by lock ordering: updates hold one slot lock and
    /// never acquire a second; concurrent pauses both acquire ascending.
    /// Entry to the pause also sweeps entries of retired pools.
    ///
    /// Safe but not cheap — O(slot count) lock acquisitions. Intended for
    /// reads that are infrequent relative to updates.
    pub fn pause(&self) -> WorldPause<'_> {
        WorldPause::enter(self)
    }

    /// Mark a pool identity as dead. Its entries are reclaimed at the
    /// next pause; until then they are bounded garbage.
    pub(crate) fn retire(&self, pool: PoolId) {
        self.retired.lock().unwrap().push(pool);
        self.counters.pools_retired.fetch_add(1, Ordering::Relaxed);
    }

    /// Drain the retired-pool list (called by the pause sweep).
    pub(crate) fn take_retired(&self) -> Vec<PoolId> {
        std::mem::take(&mut *self.retired.lock().unwrap())
    }

    /// Copy the table's cumulative counters.
    pub fn metrics(&self) -> TableMetrics {
        self.counters.snapshot()
    }

    pub(crate) fn slots(&self) -> &[Slot] {
        &self.slots
    }

    pub(crate) fn counters(&self) -> &TableCounters {
        &self.counters
    }

    /// The slot the calling thread is bound to.
    ///
    /// Binding is a stable hash of the thread ID modulo the slot count:
    /// it never changes for the life of the thread, which is what lets
    /// the update path scan-and-mutate without the shard moving under it.
    /// Threads beyond the slot count share slots; the slot mutex
    /// serializes them.
    fn slot_for_current_thread(&self) -> &Slot {
        let idx = (current_thread_key() % self.slots.len() as u64) as usize;
        &self.slots[idx]
    }

    /// Test-only entry point that targets an explicit slot, bypassing the
    /// thread binding. Lets single-threaded tests exercise arbitrary
    /// shard distributions across slots.
    #[cfg(test)]
    pub(crate) fn update_in_slot<T, N, F>(&self, slot: usize, pool: PoolId, new_shard: N, f: F)
    where
        T: Shard,
        N: Fn() -> T,
        F: FnOnce(T) -> T,
    {
        let mut entries = self.slots[slot].entries.lock().unwrap();
        match entries.iter_mut().find(|e| e.pool == pool) {
            Some(entry) => {
                let current = entry.take_shard::<T>().unwrap_or_else(&new_shard);
                entry.shard = Some(Box::new(f(current)));
            }
            None => entries.push(SlotEntry {
                pool,
                shard: Some(Box::new(f(new_shard()))),
            }),
        }
    }
}

/// Stable per-thread key, computed once per thread.
///
/// `ThreadId` has no public integer accessor, so the key is its
/// `DefaultHasher` digest — cheap, stable for the thread's lifetime, and
/// uniformly spread across slots.
fn current_thread_key() -> u64 {
    thread_local! {
        static KEY: Cell<Option<u64>> = const { Cell::new(None) };
    }
    KEY.with(|key| match key.get() {
        Some(k) => k,
        None => {
            let mut hasher = DefaultHasher::new();
            std::thread::current().id().hash(&mut hasher);
            let k = hasher.finish();
            key.set(Some(k));
            k
        }
    })
}
