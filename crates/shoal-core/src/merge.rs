//! The [`Shard`] trait: user-supplied merge semantics for sharded values.

/// A partial value of a logical aggregate, mergeable with its peers.
///
/// The engine scatters one shard per slot and combines them with
/// [`merge()`](Shard::merge) when a snapshot or drain is requested.
/// For the combined result to be well-defined the implementation must
/// satisfy three laws:
///
/// - **Associative:** `a.merge(b).merge(c) == a.merge(b.merge(c))`.
/// - **Order-insensitive:** the order shards are folded across slots is
///   unspecified, so `a.merge(b) == b.merge(a)` must hold for the result
///   to be deterministic (effectively commutativity).
/// - **Identity:** merging a freshly constructed shard (as produced by the
///   pool's shard constructor) with any value yields that value unchanged.
///
/// The `Send + 'static` bounds exist because shards are stored in slots
/// that outlive the calling thread and are visited by the pause protocol.
///
/// # Example
///
/// ```rust
/// use shoal_core::Shard;
///
/// #[derive(Clone, Copy, Default, PartialEq, Debug)]
/// struct Sum(i64);
///
/// impl Shard for Sum {
///     fn merge(self, other: Self) -> Self {
///         Sum(self.0 + other.0)
///     }
/// }
///
/// assert_eq!(Sum(2).merge(Sum(3)), Sum(5));
/// assert_eq!(Sum::default().merge(Sum(7)), Sum(7));
/// ```
pub trait Shard: Sized + Send + 'static {
    /// Combine two shards into one.
    ///
    /// Must be associative and order-insensitive, with the pool's freshly
    /// constructed shard as identity element.
    fn merge(self, other: Self) -> Self;
}

/// Sum merge for the most common workload: plain integer counters.
///
/// Wrapping addition keeps the merge associative and order-insensitive
/// even at the overflow boundary. The identity element is `0`
/// (`i64::default`).
impl Shard for i64 {
    fn merge(self, other: Self) -> Self {
        self.wrapping_add(other)
    }
}

/// Sum merge for unsigned counters. Identity element is `0`.
impl Shard for u64 {
    fn merge(self, other: Self) -> Self {
        self.wrapping_add(other)
    }
}
