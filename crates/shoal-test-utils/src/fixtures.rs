//! Standard shard fixtures.
//!
//! Each fixture implements [`Shard`] with its `Default` value as the
//! merge identity element, so `Fixture::default` is always a valid shard
//! constructor.

use indexmap::IndexSet;
use shoal_core::Shard;

/// Signed sum accumulator. Identity element: `0`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct CounterShard {
    count: i64,
}

impl CounterShard {
    /// Add `amount` to the counter, returning the new shard.
    pub fn add(self, amount: i64) -> Self {
        Self {
            count: self.count.wrapping_add(amount),
        }
    }

    /// The accumulated count.
    pub fn count(&self) -> i64 {
        self.count
    }
}

impl Shard for CounterShard {
    fn merge(self, other: Self) -> Self {
        Self {
            count: self.count.wrapping_add(other.count),
        }
    }
}

/// Running maximum over `u64` observations. Identity element: no
/// observation (`None`), which merges with anything unchanged.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct MaxShard {
    max: Option<u64>,
}

impl MaxShard {
    /// Fold one observation into the maximum, returning the new shard.
    pub fn observe(self, sample: u64) -> Self {
        Self {
            max: Some(self.max.map_or(sample, |m| m.max(sample))),
        }
    }

    /// The largest observation, if any.
    pub fn max(&self) -> Option<u64> {
        self.max
    }
}

impl Shard for MaxShard {
    fn merge(self, other: Self) -> Self {
        Self {
            max: match (self.max, other.max) {
                (Some(a), Some(b)) => Some(a.max(b)),
                (a, b) => a.or(b),
            },
        }
    }
}

/// Set union over `u64` keys. Identity element: the empty set.
///
/// Backed by an [`IndexSet`] so iteration order is deterministic within
/// one shard, though the merged set's order still depends on merge
/// order — compare contents, not order.
#[derive(Clone, Debug, Default)]
pub struct DistinctSet {
    keys: IndexSet<u64>,
}

impl DistinctSet {
    /// Insert a key, returning the new shard.
    pub fn insert(mut self, key: u64) -> Self {
        self.keys.insert(key);
        self
    }

    /// Number of distinct keys seen.
    pub fn len(&self) -> usize {
        self.keys.len()
    }

    /// Whether no keys have been seen.
    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    /// Whether `key` has been seen.
    pub fn contains(&self, key: u64) -> bool {
        self.keys.contains(&key)
    }
}

impl Shard for DistinctSet {
    fn merge(mut self, other: Self) -> Self {
        self.keys.extend(other.keys);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        #[test]
        fn counter_merge_laws(a in any::<i64>(), b in any::<i64>(), c in any::<i64>()) {
            let (a, b, c) = (
                CounterShard::default().add(a),
                CounterShard::default().add(b),
                CounterShard::default().add(c),
            );
            // Commutative.
            prop_assert_eq!(a.merge(b), b.merge(a));
            // Associative.
            prop_assert_eq!(a.merge(b).merge(c), a.merge(b.merge(c)));
            // Fresh shard is the identity.
            prop_assert_eq!(CounterShard::default().merge(a), a);
        }

        #[test]
        fn max_merge_laws(a in any::<u64>(), b in any::<u64>(), c in any::<u64>()) {
            let (a, b, c) = (
                MaxShard::default().observe(a),
                MaxShard::default().observe(b),
                MaxShard::default().observe(c),
            );
            prop_assert_eq!(a.merge(b), b.merge(a));
            prop_assert_eq!(a.merge(b).merge(c), a.merge(b.merge(c)));
            prop_assert_eq!(MaxShard::default().merge(a), a);
        }

        #[test]
        fn distinct_set_union(
            xs in prop::collection::vec(any::<u64>(), 0..32),
            ys in prop::collection::vec(any::<u64>(), 0..32),
        ) {
            let mut a = DistinctSet::default();
            for &x in &xs {
                a = a.insert(x);
            }
            let mut b = DistinctSet::default();
            for &y in &ys {
                b = b.insert(y);
            }
            let merged = a.clone().merge(b.clone());
            for &x in xs.iter().chain(ys.iter()) {
                prop_assert!(merged.contains(x));
            }
            // Union is order-insensitive in content.
            let flipped = b.merge(a);
            prop_assert_eq!(merged.len(), flipped.len());
        }
    }

    #[test]
    fn max_identity_has_no_observation() {
        assert_eq!(MaxShard::default().max(), None);
        assert_eq!(MaxShard::default().observe(3).max(), Some(3));
    }

    #[test]
    fn empty_set_is_identity() {
        let s = DistinctSet::default().insert(9);
        assert!(DistinctSet::default().is_empty());
        assert_eq!(DistinctSet::default().merge(s.clone()).len(), s.len());
    }
}
