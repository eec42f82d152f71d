//! [`ShardedValue`]: the user-facing handle over the sharding engine.
//!
//! A `ShardedValue<T>` represents one logical aggregate split into
//! per-slot shards of type `T`. Updates touch only the calling thread's
//! slot; `value()` and `drain()` merge every slot under a global pause.
//!
//! # Ownership model
//!
//! `ShardedValue` is `Sync`: all operations take `&self`, so one
//! instance is shared across every updating thread (typically behind an
//! `Arc` or a `static`). Dropping it retires its pool identity; the
//! shards it scattered are reclaimed at the next pause.

use std::sync::OnceLock;

use shoal_core::{LazyPoolId, PoolId, Shard};

use crate::table::SlotTable;

/// Constructor producing the pool's identity-element shard.
type ShardCtor<T> = Box<dyn Fn() -> T + Send + Sync>;

/// A single logical value maintained as one shard per slot.
///
/// The zero value is ready for use once a shard constructor is supplied:
/// build via [`new()`](ShardedValue::new), or via `default()` followed by
/// [`set_new_shard()`](ShardedValue::set_new_shard). Operating on a value
/// with no constructor is a usage error and panics — the value is
/// unusable without one.
///
/// # Example
///
/// ```rust
/// use shoal_core::Shard;
/// use shoal_engine::ShardedValue;
///
/// #[derive(Clone, Copy, Default)]
/// struct Sum(i64);
/// impl Shard for Sum {
///     fn merge(self, other: Self) -> Self {
///         Sum(self.0 + other.0)
///     }
/// }
///
/// let total = ShardedValue::new(Sum::default);
/// total.update(|s| Sum(s.0 + 1));
/// assert_eq!(total.value().0, 1);
/// assert_eq!(total.drain().0, 1);
/// assert_eq!(total.value().0, 0);
/// ```
pub struct ShardedValue<T: Shard> {
    new_shard: OnceLock<ShardCtor<T>>,
    id: LazyPoolId,
    table: &'static SlotTable,
}

// Compile-time assertion: ShardedValue must be Send + Sync (it is the
// handle shared across updating threads).
const _: fn() = || {
    fn assert<T: Send + Sync>() {}
    assert::<ShardedValue<i64>>();
};

impl<T: Shard> Default for ShardedValue<T> {
    /// An unconfigured value on the global table. Supply a constructor
    /// with [`set_new_shard()`](ShardedValue::set_new_shard) before first
    /// use.
    fn default() -> Self {
        Self {
            new_shard: OnceLock::new(),
            id: LazyPoolId::new(),
            table: SlotTable::global(),
        }
    }
}

impl<T: Shard> ShardedValue<T> {
    /// Create a sharded value on the global table with the given shard
    /// constructor.
    ///
    /// The constructor must produce the merge identity element: merging
    /// a freshly constructed shard with any value yields that value
    /// unchanged.
    pub fn new(new_shard: impl Fn() -> T + Send + Sync + 'static) -> Self {
        Self::with_table(SlotTable::global(), new_shard)
    }

    /// Create a sharded value on an explicit table.
    ///
    /// Used by tests and benches that want an isolated slot layout; the
    /// table must outlive the value (`Box::leak` a private one if
    /// needed).
    pub fn with_table(
        table: &'static SlotTable,
        new_shard: impl Fn() -> T + Send + Sync + 'static,
    ) -> Self {
        let ctor: OnceLock<ShardCtor<T>> = OnceLock::new();
        let _ = ctor.set(Box::new(new_shard));
        Self {
            new_shard: ctor,
            id: LazyPoolId::new(),
            table,
        }
    }

    /// Supply the shard constructor for a `default()`-built value.
    ///
    /// Panics if a constructor is already set: the constructor defines
    /// the pool's identity element and must not change once shards
    /// exist.
    pub fn set_new_shard(&self, new_shard: impl Fn() -> T + Send + Sync + 'static) {
        if self.new_shard.set(Box::new(new_shard)).is_err() {
            panic!("shard constructor already set");
        }
    }

    /// The pool identity, assigned on first use.
    pub fn identity(&self) -> PoolId {
        self.id.get_or_assign()
    }

    /// Apply `f` to the calling thread's shard, constructing one if
    /// absent, and store the result back in place.
    ///
    /// Never blocks on anything but the calling thread's own slot and
    /// never fails. `f` is called exactly once; callers are encouraged
    /// to keep it short and are discouraged from blocking within it —
    /// a long transform delays the thread's own progress and increases
    /// skew at snapshot time.
    pub fn update(&self, f: impl FnOnce(T) -> T) {
        let pool = self.identity();
        self.table.update(pool, self.ctor(), f);
    }

    /// Snapshot all shards and return their merged value.
    ///
    /// Pauses the world, folds every slot's shard for this pool in slot
    /// order, writes the merged result back as the sole shard, and
    /// resumes. The result is a consistent point-in-time aggregate: no
    /// update can interleave with the traversal. Safe but not cheap —
    /// intended for reads that are infrequent relative to updates.
    pub fn value(&self) -> T
    where
        T: Clone,
    {
        let pool = self.identity();
        let seed = (self.ctor())();
        self.table.pause().snapshot_pool(pool, seed)
    }

    /// Merge and remove all shards, returning the merged value.
    ///
    /// Like [`value()`](ShardedValue::value) but writes nothing back:
    /// the pool restarts from the identity element on its next update.
    pub fn drain(&self) -> T {
        let pool = self.identity();
        let seed = (self.ctor())();
        self.table.pause().drain_pool(pool, seed)
    }

    fn ctor(&self) -> &ShardCtor<T> {
        self.new_shard
            .get()
            .expect("shard constructor not set before first use")
    }
}

impl<T: Shard> Drop for ShardedValue<T> {
    /// Retire the pool identity so the next pause reclaims any shards
    /// still scattered across slots. A value that never assigned an
    /// identity has nothing to reclaim.
    fn drop(&mut self) {
        if let Some(pool) = self.id.get() {
            self.table.retire(pool);
        }
    }
}
