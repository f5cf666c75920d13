//! Eviction Listener Example
//!
//! A thumbnail cache bounded by decoded byte size, shared by several worker
//! threads, with a listener that reports every eviction.
//!
//! Run with: cargo run --example eviction_listener

extern crate cost_cache;

use cost_cache::config::CostCacheConfig;
use cost_cache::metrics::CacheMetrics;
use cost_cache::{ConcurrentCostCache, EvictionListener};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::thread;

/// A decoded image; its byte length is its cost.
#[derive(Clone)]
struct Thumbnail {
    path: String,
    pixels: Vec<u8>,
}

/// Counts evictions and the bytes they released.
#[derive(Default)]
struct EvictionReport {
    evictions: AtomicUsize,
    released_bytes: AtomicUsize,
}

impl EvictionListener<Thumbnail> for EvictionReport {
    fn will_evict(&self, cache_name: &str, value: &Thumbnail) {
        let n = self.evictions.fetch_add(1, Ordering::Relaxed);
        self.released_bytes
            .fetch_add(value.pixels.len(), Ordering::Relaxed);
        if n < 5 {
            println!(
                "  [{}] evicting {} ({} bytes)",
                cache_name,
                value.path,
                value.pixels.len()
            );
        }
    }
}

fn main() {
    println!("Cost Cache Eviction Listener");
    println!("============================");
    println!("Budget: 64 KiB of decoded thumbnails, at most 40 of them.\n");

    let config = CostCacheConfig::default()
        .with_name("thumbnails")
        .with_total_cost_limit(64 * 1024)
        .with_count_limit(40);
    let cache: Arc<ConcurrentCostCache<String, Thumbnail>> =
        Arc::new(ConcurrentCostCache::init(config, None));

    // The cache only holds a weak reference; keep the listener alive here
    let report = Arc::new(EvictionReport::default());
    cache.set_eviction_listener(&report);

    let handles: Vec<_> = (0..4)
        .map(|worker| {
            let cache = Arc::clone(&cache);
            thread::spawn(move || {
                for i in 0..50usize {
                    let path = format!("img/{}/{}.png", worker, i);
                    let size = 256 + (i * 97 + worker * 31) % 4096;
                    let thumbnail = Thumbnail {
                        path: path.clone(),
                        pixels: vec![0u8; size],
                    };
                    cache.put_with_cost(path, thumbnail, size as i64);
                }
            })
        })
        .collect();

    for handle in handles {
        handle.join().unwrap();
    }

    println!();
    println!("Entries kept:    {}", cache.len());
    println!("Bytes kept:      {}", cache.total_cost());
    println!("Evictions:       {}", report.evictions.load(Ordering::Relaxed));
    println!(
        "Bytes released:  {}",
        report.released_bytes.load(Ordering::Relaxed)
    );

    // Explicit removal and clear are not evictions
    let before = report.evictions.load(Ordering::Relaxed);
    cache.clear();
    assert_eq!(report.evictions.load(Ordering::Relaxed), before);
    println!("\nCleared without notifications.");

    println!("\nMetrics ({}):", cache.algorithm_name());
    for (name, value) in cache.metrics() {
        println!("  {:<22} {:.2}", name, value);
    }
}
