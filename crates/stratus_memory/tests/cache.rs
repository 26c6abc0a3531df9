// Copyright (c) The Stratus Project Authors.
// Licensed under the MIT License.

//! Integration tests for `MemoryCache`.
//!
//! Time-dependent behavior is driven by a controlled clock, so TTL and
//! eviction assertions are exact rather than sleep-based.

use std::time::Duration;

use stratus_memory::MemoryCache;
use stratus_tier::{CacheEntry, CacheTier};
use tick::ClockControl;

fn block_on<F: std::future::Future>(f: F) -> F::Output {
    futures::executor::block_on(f)
}

#[test]
fn new_cache_is_empty_with_defaults() {
    let control = ClockControl::new();
    let cache = MemoryCache::<String, i32>::new(control.to_clock());

    assert_eq!(cache.len(), Some(0));
    assert_eq!(cache.is_empty(), Some(true));
    assert_eq!(cache.ttl(), stratus_memory::DEFAULT_TTL);
    assert_eq!(cache.max_entries(), stratus_memory::DEFAULT_MAX_ENTRIES);
}

#[test]
fn get_returns_none_for_missing_key() {
    block_on(async {
        let control = ClockControl::new();
        let cache = MemoryCache::<String, i32>::new(control.to_clock());

        let result = cache.get(&"missing".to_string()).await.expect("get failed");
        assert!(result.is_none());
    });
}

#[test]
fn insert_stamps_creation_and_expiration() {
    block_on(async {
        let control = ClockControl::new();
        let clock = control.to_clock();
        let cache = MemoryCache::<String, i32>::builder()
            .ttl(Duration::from_secs(60))
            .build(clock.clone());

        let inserted_at = clock.system_time();
        cache.insert(&"key".to_string(), CacheEntry::new(42)).await.expect("insert failed");

        let entry = cache
            .get(&"key".to_string())
            .await
            .expect("get failed")
            .expect("missing entry");
        assert_eq!(entry.cached_at(), Some(inserted_at));
        assert_eq!(entry.expires_at(), Some(inserted_at + Duration::from_secs(60)));
    });
}

#[test]
fn entry_lives_strictly_before_its_expiration() {
    block_on(async {
        let control = ClockControl::new();
        let cache = MemoryCache::<String, i32>::builder()
            .ttl(Duration::from_secs(60))
            .build(control.to_clock());

        cache.insert(&"key".to_string(), CacheEntry::new(42)).await.expect("insert failed");

        control.advance(Duration::from_secs(59));
        let live = cache.get(&"key".to_string()).await.expect("get failed");
        assert_eq!(live.map(CacheEntry::into_value), Some(42));

        // The read at exactly the TTL boundary misses and evicts.
        control.advance(Duration::from_secs(1));
        let expired = cache.get(&"key".to_string()).await.expect("get failed");
        assert!(expired.is_none());
        assert_eq!(cache.len(), Some(0));
    });
}

#[test]
fn per_entry_ttl_overrides_tier_ttl() {
    block_on(async {
        let control = ClockControl::new();
        let cache = MemoryCache::<String, i32>::builder()
            .ttl(Duration::from_secs(600))
            .build(control.to_clock());

        cache
            .insert(&"short".to_string(), CacheEntry::with_ttl(1, Duration::from_secs(10)))
            .await
            .expect("insert failed");
        cache.insert(&"long".to_string(), CacheEntry::new(2)).await.expect("insert failed");

        control.advance(Duration::from_secs(10));

        assert!(cache.get(&"short".to_string()).await.expect("get failed").is_none());
        assert!(cache.get(&"long".to_string()).await.expect("get failed").is_some());
    });
}

#[test]
fn is_expired_probes_without_evicting() {
    block_on(async {
        let control = ClockControl::new();
        let cache = MemoryCache::<String, i32>::builder()
            .ttl(Duration::from_secs(30))
            .build(control.to_clock());

        cache.insert(&"key".to_string(), CacheEntry::new(42)).await.expect("insert failed");

        assert!(!cache.is_expired(&"key".to_string()).await.expect("probe failed"));
        assert!(!cache.is_expired(&"absent".to_string()).await.expect("probe failed"));

        control.advance(Duration::from_secs(30));
        assert!(cache.is_expired(&"key".to_string()).await.expect("probe failed"));
        // The probe left the entry in place; the next get evicts it.
        assert_eq!(cache.len(), Some(1));
        assert!(cache.get(&"key".to_string()).await.expect("get failed").is_none());
        assert_eq!(cache.len(), Some(0));
    });
}

#[test]
fn capacity_eviction_removes_exactly_the_oldest() {
    block_on(async {
        let control = ClockControl::new();
        let cache = MemoryCache::<String, i32>::builder()
            .max_entries(3)
            .build(control.to_clock());

        cache.insert(&"a".to_string(), CacheEntry::new(1)).await.expect("insert failed");
        control.advance(Duration::from_secs(1));
        cache.insert(&"b".to_string(), CacheEntry::new(2)).await.expect("insert failed");
        control.advance(Duration::from_secs(1));
        cache.insert(&"c".to_string(), CacheEntry::new(3)).await.expect("insert failed");
        control.advance(Duration::from_secs(1));
        cache.insert(&"d".to_string(), CacheEntry::new(4)).await.expect("insert failed");

        assert_eq!(cache.len(), Some(3));
        assert!(cache.get(&"a".to_string()).await.expect("get failed").is_none());
        for key in ["b", "c", "d"] {
            assert!(
                cache.get(&key.to_string()).await.expect("get failed").is_some(),
                "expected {key} to survive eviction"
            );
        }
    });
}

#[test]
fn capacity_eviction_ties_break_by_key_order() {
    block_on(async {
        let control = ClockControl::new();
        let cache = MemoryCache::<String, i32>::builder()
            .max_entries(3)
            .build(control.to_clock());

        // All three share one creation timestamp under the frozen clock.
        for (key, value) in [("b", 2), ("a", 1), ("c", 3)] {
            cache.insert(&key.to_string(), CacheEntry::new(value)).await.expect("insert failed");
        }

        cache.insert(&"d".to_string(), CacheEntry::new(4)).await.expect("insert failed");

        assert!(cache.get(&"a".to_string()).await.expect("get failed").is_none());
        assert!(cache.get(&"b".to_string()).await.expect("get failed").is_some());
    });
}

#[test]
fn eviction_is_by_creation_time_not_recency_of_use() {
    block_on(async {
        let control = ClockControl::new();
        let cache = MemoryCache::<String, i32>::builder()
            .max_entries(3)
            .build(control.to_clock());

        cache.insert(&"a".to_string(), CacheEntry::new(1)).await.expect("insert failed");
        control.advance(Duration::from_secs(1));
        cache.insert(&"b".to_string(), CacheEntry::new(2)).await.expect("insert failed");
        cache.insert(&"c".to_string(), CacheEntry::new(3)).await.expect("insert failed");

        // Touching "a" does not protect it: it is still the oldest creation.
        let touched = cache.get(&"a".to_string()).await.expect("get failed");
        assert!(touched.is_some());

        cache.insert(&"d".to_string(), CacheEntry::new(4)).await.expect("insert failed");
        assert!(cache.get(&"a".to_string()).await.expect("get failed").is_none());
    });
}

#[test]
fn overwrite_refreshes_creation_and_never_evicts() {
    block_on(async {
        let control = ClockControl::new();
        let cache = MemoryCache::<String, i32>::builder()
            .max_entries(2)
            .build(control.to_clock());

        cache.insert(&"a".to_string(), CacheEntry::new(1)).await.expect("insert failed");
        cache.insert(&"b".to_string(), CacheEntry::new(2)).await.expect("insert failed");

        control.advance(Duration::from_secs(5));
        cache.insert(&"a".to_string(), CacheEntry::new(10)).await.expect("insert failed");
        assert_eq!(cache.len(), Some(2));

        // "b" now holds the oldest creation timestamp and is the victim.
        cache.insert(&"c".to_string(), CacheEntry::new(3)).await.expect("insert failed");
        assert!(cache.get(&"b".to_string()).await.expect("get failed").is_none());
        let kept = cache.get(&"a".to_string()).await.expect("get failed");
        assert_eq!(kept.map(CacheEntry::into_value), Some(10));
    });
}

#[test]
fn clear_is_idempotent() {
    block_on(async {
        let control = ClockControl::new();
        let cache = MemoryCache::<String, i32>::new(control.to_clock());

        cache.insert(&"key".to_string(), CacheEntry::new(42)).await.expect("insert failed");
        cache.clear().await.expect("clear failed");
        assert_eq!(cache.len(), Some(0));

        // A second clear is a no-op.
        cache.clear().await.expect("clear failed");
        assert_eq!(cache.len(), Some(0));
    });
}

#[test]
fn invalidate_removes_only_the_target() {
    block_on(async {
        let control = ClockControl::new();
        let cache = MemoryCache::<String, i32>::new(control.to_clock());

        cache.insert(&"keep".to_string(), CacheEntry::new(1)).await.expect("insert failed");
        cache.insert(&"drop".to_string(), CacheEntry::new(2)).await.expect("insert failed");

        cache.invalidate(&"drop".to_string()).await.expect("invalidate failed");

        assert!(cache.get(&"drop".to_string()).await.expect("get failed").is_none());
        assert!(cache.get(&"keep".to_string()).await.expect("get failed").is_some());
    });
}

#[test]
fn concurrent_writers_never_observe_torn_state() {
    let control = ClockControl::new();
    let cache = MemoryCache::<String, u32>::builder()
        .max_entries(10_000)
        .build(control.to_clock());

    let handles: Vec<_> = (0..4u32)
        .map(|worker| {
            let cache = cache.clone();
            std::thread::spawn(move || {
                block_on(async {
                    for i in 0..100u32 {
                        let key = format!("{worker}-{i}");
                        cache.insert(&key, CacheEntry::new(i)).await.expect("insert failed");
                        let read = cache.get(&key).await.expect("get failed");
                        assert_eq!(read.map(CacheEntry::into_value), Some(i));
                    }
                });
            })
        })
        .collect();

    for handle in handles {
        handle.join().expect("worker panicked");
    }

    assert_eq!(cache.len(), Some(400));
}
