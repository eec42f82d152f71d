//! The global pause and the freeze/collect/merge/redistribute protocol.
//!
//! [`WorldPause`] models "stop every task, resume later" with a sharded
//! lock barrier: entering the pause acquires every slot's mutex in
//! ascending slot order, so no update can be in flight anywhere while the
//! guard lives, and no update can straddle the pause — it either finished
//! before the pause took effect or starts after resume. Dropping the
//! guard resumes the world and records pause timing.

use std::sync::atomic::Ordering;
use std::sync::{MutexGuard, OnceLock};
use std::time::Instant;

use shoal_core::{PoolId, Shard};

use crate::slot::EntryList;
use crate::table::SlotTable;

/// Quiescence guard over every slot of a [`SlotTable`].
///
/// Holds one mutex guard per slot, acquired in enumeration order. The
/// fold operations walk the guards in that same fixed order, so the
/// merged result is exactly the fold of the shards present at the
/// instant the pause took effect.
pub struct WorldPause<'t> {
    table: &'t SlotTable,
    guards: Vec<MutexGuard<'t, EntryList>>,
    entered_ns: u64,
}

impl<'t> WorldPause<'t> {
    /// Acquire every slot lock in ascending order, then sweep retired
    /// pools while the table is quiescent.
    pub(crate) fn enter(table: &'t SlotTable) -> Self {
        let guards = table
            .slots()
            .iter()
            .map(|slot| slot.entries.lock().unwrap())
            .collect();
        let mut pause = Self {
            table,
            guards,
            entered_ns: monotonic_nanos(),
        };
        pause.sweep_retired();
        pause
    }

    /// Remove every entry belonging to a retired pool.
    ///
    /// Runs once per pause, on entry. This is the only place entries are
    /// removed from a slot's list; the update path appends and the fold
    /// operations clear in place.
    fn sweep_retired(&mut self) {
        let retired = self.table.take_retired();
        if retired.is_empty() {
            return;
        }
        let mut reclaimed = 0u64;
        for guard in &mut self.guards {
            let before = guard.len();
            guard.retain(|entry| !retired.contains(&entry.pool));
            reclaimed += (before - guard.len()) as u64;
        }
        self.table
            .counters()
            .entries_reclaimed
            .fetch_add(reclaimed, Ordering::Relaxed);
    }

    /// Fold every slot's shard for `pool` into `seed` and clear the
    /// entries, writing nothing back. The next update starts fresh.
    pub(crate) fn drain_pool<T: Shard>(&mut self, pool: PoolId, seed: T) -> T {
        let mut acc = seed;
        let mut merged = 0u64;
        for guard in &mut self.guards {
            if let Some(entry) = guard.iter_mut().find(|e| e.pool == pool) {
                if let Some(shard) = entry.take_shard::<T>() {
                    acc = acc.merge(shard);
                    merged += 1;
                }
            }
        }
        self.table
            .counters()
            .entries_merged
            .fetch_add(merged, Ordering::Relaxed);
        acc
    }

    /// Fold every slot's shard for `pool` into `seed`, clear the entries,
    /// and write the merged result back as the sole shard for the pool.
    ///
    /// The write-back target is the first slot (in enumeration order)
    /// that held a shard — an implementation-defined placement choice,
    /// not a correctness requirement. Subsequent snapshots then amortize
    /// toward folding a single shard until new ones accumulate. If no
    /// slot held a shard, nothing is written back and `seed` is returned
    /// unchanged.
    pub(crate) fn snapshot_pool<T: Shard + Clone>(&mut self, pool: PoolId, seed: T) -> T {
        let mut acc = seed;
        let mut merged = 0u64;
        let mut first_found = None;
        for (i, guard) in self.guards.iter_mut().enumerate() {
            if let Some(entry) = guard.iter_mut().find(|e| e.pool == pool) {
                if let Some(shard) = entry.take_shard::<T>() {
                    acc = acc.merge(shard);
                    merged += 1;
                    if first_found.is_none() {
                        first_found = Some(i);
                    }
                }
            }
        }
        if let Some(i) = first_found {
            let entry = self.guards[i]
                .iter_mut()
                .find(|e| e.pool == pool)
                .expect("entry present at redistribution slot");
            entry.shard = Some(Box::new(acc.clone()));
        }
        self.table
            .counters()
            .entries_merged
            .fetch_add(merged, Ordering::Relaxed);
        acc
    }
}

impl Drop for WorldPause<'_> {
    /// Resume the world (guards release as the struct drops) and record
    /// how long it stood still.
    fn drop(&mut self) {
        let duration_ns = monotonic_nanos().saturating_sub(self.entered_ns);
        self.table.counters().record_pause(duration_ns);
    }
}

/// Returns monotonic nanoseconds since an arbitrary process-local epoch.
///
/// Uses `OnceLock<Instant>` to lazily initialise a baseline. NOT
/// wall-clock time — only for relative duration comparisons (pause
/// timing in metrics).
pub(crate) fn monotonic_nanos() -> u64 {
    static BASELINE: OnceLock<Instant> = OnceLock::new();
    let baseline = BASELINE.get_or_init(Instant::now);
    Instant::now().duration_since(*baseline).as_nanos() as u64
}
