//! Concurrent Cache Correctness Tests
//!
//! These tests validate that `ConcurrentCostCache` keeps the cost-ordered
//! eviction semantics while being accessed from multiple threads.
//!
//! ## Test Strategy
//!
//! Unlike stress tests that focus on throughput and lack of panics, these tests:
//! - Use small limits for predictable behavior
//! - Set up state from one thread, then contend
//! - Verify that limits, cost accounting and notifications hold afterwards
//!
//! ## Sections
//!
//! 1. **Eviction Correctness**: the single-threaded policy through the shared API
//! 2. **Thread Safety Invariants**: cache state consistency under concurrency

#![cfg(feature = "concurrent")]

use cost_cache::config::CostCacheConfig;
use cost_cache::metrics::CacheMetrics;
use cost_cache::{ConcurrentCostCache, EvictionListener};
use std::sync::atomic::{AtomicI64, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::thread;

fn make_cache<V>(cost_limit: i64, count_limit: i64) -> Arc<ConcurrentCostCache<i64, V>> {
    let config = CostCacheConfig::default()
        .with_total_cost_limit(cost_limit)
        .with_count_limit(count_limit);
    Arc::new(ConcurrentCostCache::init(config, None))
}

/// Listener that remembers every evicted value
#[derive(Default)]
struct Recorder {
    evicted: Mutex<Vec<i64>>,
}

impl EvictionListener<i64> for Recorder {
    fn will_evict(&self, _cache_name: &str, value: &i64) {
        self.evicted.lock().unwrap().push(*value);
    }
}

/// Listener that sums the costs of evicted entries (value == cost in these tests)
#[derive(Default)]
struct CostSummer {
    evicted_cost: AtomicI64,
    evictions: AtomicUsize,
}

impl EvictionListener<i64> for CostSummer {
    fn will_evict(&self, _cache_name: &str, value: &i64) {
        self.evicted_cost.fetch_add(*value, Ordering::Relaxed);
        self.evictions.fetch_add(1, Ordering::Relaxed);
    }
}

// ============================================================================
// SECTION 1: EVICTION CORRECTNESS
// ============================================================================

#[test]
fn test_concurrent_cost_basic_eviction() {
    let cache = make_cache::<i64>(10, 0);
    let recorder = Arc::new(Recorder::default());
    cache.set_eviction_listener(&recorder);

    cache.put_with_cost(1, 100, 5);
    cache.put_with_cost(2, 200, 1);
    cache.put_with_cost(3, 300, 4);
    assert!(recorder.evicted.lock().unwrap().is_empty());

    // 12 > 10: key 2 (cost 1) goes first, then the new key 4 (cost 2)
    cache.put_with_cost(4, 400, 2);
    assert_eq!(*recorder.evicted.lock().unwrap(), vec![200, 400]);
    assert_eq!(cache.get(&1), Some(100));
    assert_eq!(cache.get(&3), Some(300));
    assert_eq!(cache.total_cost(), 9);
}

#[test]
fn test_concurrent_cost_count_scenario() {
    let cache = make_cache::<&'static str>(0, 2);
    cache.put(1, "a");
    cache.put(2, "b");
    cache.put(3, "c");

    assert_eq!(cache.len(), 2);
    assert_eq!(cache.get(&3), None);
    assert_eq!(cache.get(&1), Some("a"));
    assert_eq!(cache.get(&2), Some("b"));
}

#[test]
fn test_concurrent_clear_no_notifications() {
    let cache = make_cache::<i64>(1_000, 0);
    let recorder = Arc::new(Recorder::default());
    cache.set_eviction_listener(&recorder);

    for i in 0..10 {
        cache.put_with_cost(i, i, i);
    }
    cache.clear();

    assert!(recorder.evicted.lock().unwrap().is_empty());
    assert!(cache.is_empty());
    assert_eq!(cache.total_cost(), 0);
}

#[test]
fn test_limit_change_between_threads() {
    let cache = make_cache::<i64>(0, 0);
    let writer = {
        let cache = Arc::clone(&cache);
        thread::spawn(move || {
            for i in 0..100 {
                cache.put_with_cost(i, i, 10);
            }
        })
    };
    writer.join().expect("Thread panicked");
    assert_eq!(cache.total_cost(), 1_000);

    cache.set_total_cost_limit(300);
    assert_eq!(cache.total_cost(), 1_000, "Limits apply on the next store");

    cache.put_with_cost(1_000, 1_000, 10);
    assert!(cache.total_cost() <= 300);
}

// ============================================================================
// SECTION 2: THREAD SAFETY INVARIANTS
// ============================================================================

#[test]
fn test_cost_limit_never_exceeded() {
    let cache = make_cache::<i64>(1_000, 0);
    let violations = Arc::new(AtomicUsize::new(0));
    let mut handles = vec![];

    for t in 0..8i64 {
        let c = Arc::clone(&cache);
        let v = Arc::clone(&violations);
        handles.push(thread::spawn(move || {
            for i in 0..500i64 {
                c.put_with_cost(t * 1_000 + i, i, (t + i) % 60);
                if c.total_cost() > 1_000 {
                    v.fetch_add(1, Ordering::Relaxed);
                }
            }
        }));
    }

    for handle in handles {
        handle.join().expect("Thread panicked");
    }

    assert_eq!(violations.load(Ordering::Relaxed), 0);
    assert!(cache.total_cost() <= 1_000);
}

#[test]
fn test_count_limit_never_exceeded() {
    let cache = make_cache::<i64>(0, 32);
    let mut handles = vec![];

    for t in 0..8i64 {
        let c = Arc::clone(&cache);
        handles.push(thread::spawn(move || {
            for i in 0..500i64 {
                c.put_with_cost(t * 1_000 + i, i, i % 5);
                assert!(c.len() <= 32);
            }
        }));
    }

    for handle in handles {
        handle.join().expect("Thread panicked");
    }

    assert_eq!(cache.len(), 32);
}

#[test]
fn test_cost_conservation_with_listener() {
    // Every stored cost either stays in the cache or is reported as evicted
    let cache = make_cache::<i64>(500, 0);
    let summer = Arc::new(CostSummer::default());
    cache.set_eviction_listener(&summer);

    let stored_cost = Arc::new(AtomicI64::new(0));
    let mut handles = vec![];
    for t in 0..4i64 {
        let c = Arc::clone(&cache);
        let stored = Arc::clone(&stored_cost);
        handles.push(thread::spawn(move || {
            for i in 0..1_000i64 {
                let cost = (i * 7 + t) % 50;
                // Unique keys and value == cost
                c.put_with_cost(t * 10_000 + i, cost, cost);
                stored.fetch_add(cost, Ordering::Relaxed);
            }
        }));
    }

    for handle in handles {
        handle.join().expect("Thread panicked");
    }

    assert_eq!(
        stored_cost.load(Ordering::Relaxed),
        cache.total_cost() + summer.evicted_cost.load(Ordering::Relaxed)
    );
    assert_eq!(
        4_000,
        cache.len() + summer.evictions.load(Ordering::Relaxed)
    );
}

#[test]
fn test_get_returns_correct_value() {
    let cache = make_cache::<i64>(0, 0);
    for i in 0..100 {
        cache.put_with_cost(i, i * 10, i);
    }

    let errors = Arc::new(AtomicUsize::new(0));
    let mut handles = vec![];
    for _ in 0..4 {
        let c = Arc::clone(&cache);
        let e = Arc::clone(&errors);
        handles.push(thread::spawn(move || {
            for i in 0..100 {
                if c.get(&i) != Some(i * 10) {
                    e.fetch_add(1, Ordering::Relaxed);
                }
                if c.get_with(&i, |v| *v / 10) != Some(i) {
                    e.fetch_add(1, Ordering::Relaxed);
                }
            }
        }));
    }

    for handle in handles {
        handle.join().expect("Thread panicked");
    }

    assert_eq!(errors.load(Ordering::Relaxed), 0, "Values were corrupted");
}

#[test]
fn test_update_is_atomic() {
    let cache = make_cache::<i64>(0, 0);
    cache.put_with_cost(1, 0, 0);

    let mut handles = vec![];
    for t in 0..4i64 {
        let c = Arc::clone(&cache);
        handles.push(thread::spawn(move || {
            for i in 0..100 {
                c.put_with_cost(1, t, i % 10);
            }
        }));
    }

    for handle in handles {
        handle.join().expect("Thread panicked");
    }

    let value = cache.get(&1).unwrap();
    assert!((0..=3).contains(&value), "Value should be a valid thread ID");
    assert_eq!(cache.len(), 1);
    // Every thread's last store used cost 9
    assert_eq!(cache.total_cost(), 9);
}

#[test]
fn test_remove_consistency() {
    let cache = make_cache::<i64>(0, 0);
    for i in 0..50 {
        cache.put_with_cost(i, i, i);
    }

    let successful_removes = Arc::new(AtomicUsize::new(0));
    let mut handles = vec![];
    for _ in 0..4 {
        let c = Arc::clone(&cache);
        let sr = Arc::clone(&successful_removes);
        handles.push(thread::spawn(move || {
            for i in 0..50 {
                if c.remove(&i).is_some() {
                    sr.fetch_add(1, Ordering::Relaxed);
                }
            }
        }));
    }

    for handle in handles {
        handle.join().expect("Thread panicked");
    }

    assert_eq!(
        successful_removes.load(Ordering::Relaxed),
        50,
        "Each key should be removed exactly once"
    );
    assert!(cache.is_empty());
    assert_eq!(cache.total_cost(), 0);
}

#[test]
fn test_clear_during_operations() {
    let cache = make_cache::<i64>(2_000, 100);
    let stop_flag = Arc::new(AtomicUsize::new(0));
    let mut handles = vec![];

    for t in 0..4i64 {
        let c = Arc::clone(&cache);
        let sf = Arc::clone(&stop_flag);
        handles.push(thread::spawn(move || {
            let mut i = 0i64;
            while sf.load(Ordering::Relaxed) == 0 {
                c.put_with_cost(t * 1_000_000 + i, i, i % 40);
                i += 1;
            }
        }));
    }

    let cache_clear = Arc::clone(&cache);
    let stop_flag_clear = Arc::clone(&stop_flag);
    handles.push(thread::spawn(move || {
        for _ in 0..10 {
            thread::sleep(std::time::Duration::from_millis(5));
            cache_clear.clear();
        }
        stop_flag_clear.store(1, Ordering::Relaxed);
    }));

    for handle in handles {
        handle.join().expect("Thread panicked");
    }

    assert!(cache.len() <= 100);
    assert!(cache.total_cost() <= 2_000);
}

#[test]
fn test_metrics_consistency() {
    let cache = make_cache::<i64>(0, 10);
    let mut handles = vec![];
    for t in 0..4i64 {
        let c = Arc::clone(&cache);
        handles.push(thread::spawn(move || {
            for i in 0..100i64 {
                c.put_with_cost(t * 1_000 + i, i, 1);
                let _ = c.get(&(t * 1_000 + i));
            }
        }));
    }

    for handle in handles {
        handle.join().expect("Thread panicked");
    }

    let metrics = cache.metrics();
    assert_eq!(metrics.get("insertions"), Some(&400.0));
    assert_eq!(metrics.get("requests"), Some(&400.0));
    assert_eq!(metrics.get("evictions"), Some(&390.0));
    assert_eq!(metrics.get("total_cost"), Some(&10.0));
    assert_eq!(cache.algorithm_name(), "ConcurrentCost");
}
