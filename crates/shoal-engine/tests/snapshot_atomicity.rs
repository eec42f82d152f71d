//! Snapshot atomicity: a snapshot includes an update's full effect or
//! none of it, never a partial application.
//!
//! Each transform adds 2 in a single application, so every consistent
//! snapshot must observe an even total. A torn read of a half-applied
//! transform would show up as an odd count.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use shoal_engine::ShardedValue;
use shoal_test_utils::CounterShard;

#[test]
fn snapshots_never_observe_half_applied_transforms() {
    let counter = Arc::new(ShardedValue::new(CounterShard::default));
    let stop = Arc::new(AtomicBool::new(false));

    let updaters: Vec<_> = (0..4)
        .map(|_| {
            let counter = Arc::clone(&counter);
            let stop = Arc::clone(&stop);
            std::thread::spawn(move || {
                while !stop.load(Ordering::Relaxed) {
                    counter.update(|c| c.add(2));
                }
            })
        })
        .collect();

    for _ in 0..200 {
        let seen = counter.value().count();
        assert_eq!(seen % 2, 0, "snapshot observed a partially-applied update: {seen}");
    }

    stop.store(true, Ordering::Relaxed);
    for handle in updaters {
        handle.join().unwrap();
    }
    assert_eq!(counter.drain().count() % 2, 0);
}
