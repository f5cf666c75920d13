use cost_cache::config::CostCacheConfig;
use cost_cache::CostCache;
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};

// Helper functions to create caches with the init pattern
fn make_unbounded<K: std::hash::Hash + Eq + Clone, V>() -> CostCache<K, V> {
    CostCache::init(CostCacheConfig::default(), None)
}

fn make_cost_limited<K: std::hash::Hash + Eq + Clone, V>(limit: i64) -> CostCache<K, V> {
    CostCache::init(CostCacheConfig::default().with_total_cost_limit(limit), None)
}

fn make_count_limited<K: std::hash::Hash + Eq + Clone, V>(limit: i64) -> CostCache<K, V> {
    CostCache::init(CostCacheConfig::default().with_count_limit(limit), None)
}

pub fn criterion_benchmark(c: &mut Criterion) {
    const CACHE_SIZE: usize = 1000;
    let mut group = c.benchmark_group("Cache Operations");

    // Lookups
    {
        let mut cache = make_unbounded();
        for i in 0..CACHE_SIZE {
            cache.put_with_cost(i, i, (i % 10) as i64);
        }

        group.bench_function("get hit", |b| {
            b.iter(|| {
                for i in 0..100 {
                    black_box(cache.get(&(i % CACHE_SIZE)));
                }
            });
        });

        group.bench_function("get miss", |b| {
            b.iter(|| {
                for i in 0..100 {
                    black_box(cache.get(&(i + CACHE_SIZE)));
                }
            });
        });

        group.bench_function("put existing same cost", |b| {
            b.iter(|| {
                for i in 0..100 {
                    black_box(cache.put_with_cost(i % CACHE_SIZE, i, (i % 10) as i64));
                }
            });
        });
    }

    // Stores that evict on every call
    {
        let mut cache = make_count_limited(CACHE_SIZE as i64);
        for i in 0..CACHE_SIZE {
            cache.put(i, i);
        }
        let mut next = CACHE_SIZE;

        group.bench_function("put evicting (count limit, zero cost)", |b| {
            b.iter(|| {
                for _ in 0..100 {
                    black_box(cache.put(next, next));
                    next += 1;
                }
            });
        });
    }

    {
        let mut cache = make_cost_limited(10 * CACHE_SIZE as i64);
        let mut next = 0usize;

        group.bench_function("put evicting (cost limit, mixed costs)", |b| {
            b.iter(|| {
                for _ in 0..100 {
                    black_box(cache.put_with_cost(next, next, (next % 20) as i64));
                    next += 1;
                }
            });
        });
    }

    group.finish();

    // The sorted insert scans from the head, so its cost depends on where
    // the new entry lands relative to the existing entries
    let mut group = c.benchmark_group("Sorted Insert");
    for size in [100usize, 1_000, 10_000] {
        let mut cache = make_unbounded();
        for i in 0..size {
            cache.put_with_cost(i, i, i as i64);
        }

        group.bench_with_input(BenchmarkId::new("at head", size), &size, |b, _| {
            b.iter(|| {
                cache.put_with_cost(usize::MAX, 0, 0);
                black_box(cache.remove(&usize::MAX));
            });
        });

        group.bench_with_input(BenchmarkId::new("at tail", size), &size, |b, &size| {
            b.iter(|| {
                cache.put_with_cost(usize::MAX, 0, size as i64);
                black_box(cache.remove(&usize::MAX));
            });
        });
    }
    group.finish();
}

criterion_group!(benches, criterion_benchmark);
criterion_main!(benches);
