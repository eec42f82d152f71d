//! Per-slot shard storage.
//!
//! A [`Slot`] owns an ordered list of `(pool identity, shard)` entries
//! behind a mutex. The update path locks exactly one slot; the pause
//! protocol locks all of them in [`SlotId`] order. Entries are found by
//! linear scan — few sharded values are live per process, so a short
//! `SmallVec` scan beats a hash lookup.

use std::any::Any;
use std::sync::Mutex;

use shoal_core::{PoolId, Shard, SlotId};
use smallvec::SmallVec;

/// Inline capacity for a slot's entry list. Most processes host only a
/// handful of sharded values, so four entries avoid heap growth entirely.
pub(crate) type EntryList = SmallVec<[SlotEntry; 4]>;

/// One `(pool identity, shard)` pair in a slot's entry list.
///
/// `shard: None` marks an entry cleared by a snapshot or drain; the
/// entry keeps its list position and is repopulated by the next update.
/// Entries are only removed outright by the retirement sweep, under a
/// pause.
pub(crate) struct SlotEntry {
    pub(crate) pool: PoolId,
    pub(crate) shard: Option<Box<dyn Any + Send>>,
}

impl SlotEntry {
    /// Take the stored shard, downcasting it back to its concrete type.
    ///
    /// Panics if the entry holds a shard of a different type: pool
    /// identities are unique per sharded value, so a type mismatch means
    /// a corrupted table and is fatal.
    pub(crate) fn take_shard<T: Shard>(&mut self) -> Option<T> {
        let boxed = self.shard.take()?;
        match boxed.downcast::<T>() {
            Ok(shard) => Some(*shard),
            Err(_) => panic!("shard for pool {} stored under a different type", self.pool),
        }
    }
}

/// One processor slot: the unit of sharding locality.
///
/// 128-byte alignment covers both 64-byte (x86) and 128-byte (Apple
/// M-series) cache line sizes, so neighboring slots' lock traffic never
/// shares a line.
#[repr(align(128))]
pub(crate) struct Slot {
    /// Slot index (for diagnostics in panic messages).
    #[allow(dead_code)]
    pub(crate) id: SlotId,
    pub(crate) entries: Mutex<EntryList>,
}

// Compile-time assertion: Slot must be Send + Sync (the table shares
// slots across every updating thread).
const _: fn() = || {
    fn assert<T: Send + Sync>() {}
    assert::<Slot>();
};

impl Slot {
    pub(crate) fn new(id: SlotId) -> Self {
        Self {
            id,
            entries: Mutex::new(SmallVec::new()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use shoal_core::LazyPoolId;

    #[derive(Clone, Copy, PartialEq, Debug)]
    struct Sum(i64);

    impl Shard for Sum {
        fn merge(self, other: Self) -> Self {
            Sum(self.0 + other.0)
        }
    }

    #[test]
    fn slot_alignment_covers_cache_lines() {
        assert!(
            std::mem::align_of::<Slot>() >= 128,
            "Slot must be cache-line aligned (>= 128 bytes)"
        );
    }

    #[test]
    fn take_shard_round_trips() {
        let pool = LazyPoolId::new().get_or_assign();
        let mut entry = SlotEntry {
            pool,
            shard: Some(Box::new(Sum(42))),
        };
        assert_eq!(entry.take_shard::<Sum>(), Some(Sum(42)));
        // Second take sees the cleared entry.
        assert_eq!(entry.take_shard::<Sum>(), None);
    }

    #[test]
    #[should_panic(expected = "stored under a different type")]
    fn take_shard_panics_on_type_mismatch() {
        #[derive(Clone, Copy)]
        struct Other;
        impl Shard for Other {
            fn merge(self, _other: Self) -> Self {
                self
            }
        }

        let pool = LazyPoolId::new().get_or_assign();
        let mut entry = SlotEntry {
            pool,
            shard: Some(Box::new(Other)),
        };
        let _ = entry.take_shard::<Sum>();
    }
}
