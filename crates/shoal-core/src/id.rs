//! Strongly-typed identifiers and the lazy pool-identity allocator.

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

/// Identifies a slot within a slot table.
///
/// Slots are created at table construction and assigned sequential IDs.
/// `SlotId(n)` corresponds to the n-th slot in enumeration order, which
/// is also the order the global pause acquires them in.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SlotId(pub u32);

impl fmt::Display for SlotId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u32> for SlotId {
    fn from(v: u32) -> Self {
        Self(v)
    }
}

/// Unique identity correlating a sharded value with its shards.
///
/// Pool identities are nonzero by construction: zero is the internal
/// "unassigned" sentinel inside [`LazyPoolId`] and never escapes as a
/// `PoolId`. Two distinct sharded values always have different pool
/// identities, even when their first use races across many threads.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PoolId(u64);

impl PoolId {
    /// The raw nonzero identity value.
    pub fn get(self) -> u64 {
        self.0
    }
}

impl fmt::Display for PoolId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Counter for unique [`PoolId`] allocation. Starts at 1; 0 is reserved
/// as the unassigned sentinel.
static POOL_ID_COUNTER: AtomicU64 = AtomicU64::new(1);

/// A lazily-assigned, race-free pool identity cell.
///
/// Starts unassigned (internal value 0). The first call to
/// [`get_or_assign()`](LazyPoolId::get_or_assign) draws a fresh value from
/// a process-wide monotonic counter and installs it with a compare-and-swap;
/// every concurrent loser of that race adopts the winner's value. Once
/// nonzero, the identity never changes for the life of the cell.
#[derive(Debug, Default)]
pub struct LazyPoolId {
    id: AtomicU64,
}

// Compile-time assertion: LazyPoolId must be Send + Sync.
const _: fn() = || {
    fn assert<T: Send + Sync>() {}
    assert::<LazyPoolId>();
};

impl LazyPoolId {
    /// Create a new, unassigned identity cell.
    pub fn new() -> Self {
        Self {
            id: AtomicU64::new(0),
        }
    }

    /// The identity, if one has been assigned.
    pub fn get(&self) -> Option<PoolId> {
        match self.id.load(Ordering::Acquire) {
            0 => None,
            v => Some(PoolId(v)),
        }
    }

    /// Return the identity, assigning one on first use.
    ///
    /// Lock-free: a single atomic increment draws the candidate and a
    /// single CAS installs it. Losing the CAS means another thread
    /// assigned first; the loser returns the observed winner. The drawn
    /// candidate of a losing thread is simply discarded (identities are
    /// unique, not dense).
    pub fn get_or_assign(&self) -> PoolId {
        let id = self.id.load(Ordering::Acquire);
        if id != 0 {
            return PoolId(id);
        }
        let candidate = POOL_ID_COUNTER.fetch_add(1, Ordering::Relaxed);
        match self
            .id
            .compare_exchange(0, candidate, Ordering::AcqRel, Ordering::Acquire)
        {
            Ok(_) => PoolId(candidate),
            Err(winner) => PoolId(winner),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    #[test]
    fn unassigned_until_first_use() {
        let id = LazyPoolId::new();
        assert_eq!(id.get(), None);
        let assigned = id.get_or_assign();
        assert_eq!(id.get(), Some(assigned));
    }

    #[test]
    fn identity_is_stable() {
        let id = LazyPoolId::new();
        let first = id.get_or_assign();
        for _ in 0..100 {
            assert_eq!(id.get_or_assign(), first);
        }
    }

    #[test]
    fn distinct_cells_get_distinct_identities() {
        let a = LazyPoolId::new();
        let b = LazyPoolId::new();
        assert_ne!(a.get_or_assign(), b.get_or_assign());
    }

    #[test]
    fn concurrent_first_use_assigns_exactly_once() {
        let id = Arc::new(LazyPoolId::new());
        let handles: Vec<_> = (0..16)
            .map(|_| {
                let id = Arc::clone(&id);
                std::thread::spawn(move || id.get_or_assign())
            })
            .collect();
        let seen: Vec<PoolId> = handles.into_iter().map(|h| h.join().unwrap()).collect();
        let first = seen[0];
        assert!(seen.iter().all(|&p| p == first), "CAS race produced more than one identity");
        assert_eq!(id.get(), Some(first));
    }

    #[test]
    fn concurrent_cells_never_collide() {
        let cells: Vec<Arc<LazyPoolId>> =
            (0..8).map(|_| Arc::new(LazyPoolId::new())).collect();
        let handles: Vec<_> = cells
            .iter()
            .map(|cell| {
                let cell = Arc::clone(cell);
                std::thread::spawn(move || cell.get_or_assign())
            })
            .collect();
        let mut seen: Vec<u64> = handles
            .into_iter()
            .map(|h| h.join().unwrap().get())
            .collect();
        seen.sort_unstable();
        seen.dedup();
        assert_eq!(seen.len(), 8, "two sharded values shared a pool identity");
    }
}
