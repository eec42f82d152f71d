//! Non-counter workloads end to end: set union and running maximum
//! across concurrent updaters.

use std::sync::Arc;

use shoal_engine::ShardedValue;
use shoal_test_utils::{DistinctSet, MaxShard};

#[test]
fn distinct_set_union_across_threads() {
    let seen = Arc::new(ShardedValue::new(DistinctSet::default));
    let threads = 8u64;
    let keys_per_thread = 100u64;

    let handles: Vec<_> = (0..threads)
        .map(|t| {
            let seen = Arc::clone(&seen);
            std::thread::spawn(move || {
                for k in 0..keys_per_thread {
                    let key = t * keys_per_thread + k;
                    seen.update(move |s| s.insert(key));
                }
            })
        })
        .collect();
    for handle in handles {
        handle.join().unwrap();
    }

    let merged = seen.drain();
    assert_eq!(merged.len(), (threads * keys_per_thread) as usize);
    for key in 0..threads * keys_per_thread {
        assert!(merged.contains(key), "missing key {key}");
    }
    assert!(seen.value().is_empty());
}

#[test]
fn running_maximum_across_threads() {
    let watermark = Arc::new(ShardedValue::new(MaxShard::default));

    let handles: Vec<_> = (0..4u64)
        .map(|t| {
            let watermark = Arc::clone(&watermark);
            std::thread::spawn(move || {
                for sample in 0..1000u64 {
                    watermark.update(move |m| m.observe(t * 1000 + sample));
                }
            })
        })
        .collect();
    for handle in handles {
        handle.join().unwrap();
    }

    assert_eq!(watermark.value().max(), Some(3999));
    // The snapshot redistributed the maximum; it survives a drain.
    assert_eq!(watermark.drain().max(), Some(3999));
    assert_eq!(watermark.value().max(), None);
}
