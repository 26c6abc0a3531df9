// Copyright (c) The Stratus Project Authors.
// Licensed under the MIT License.

//! The mutex-guarded cache map and its eviction policy.

use std::collections::HashMap;
use std::hash::Hash;
use std::sync::Arc;
use std::time::Duration;

use parking_lot::Mutex;
use tick::Clock;

use stratus_tier::{CacheEntry, CacheTier, Result};

use crate::builder::MemoryCacheBuilder;

/// TTL applied when the builder does not override it.
pub const DEFAULT_TTL: Duration = Duration::from_secs(600);

/// Entry bound applied when the builder does not override it.
pub const DEFAULT_MAX_ENTRIES: usize = 256;

/// A capacity- and time-bounded in-memory cache tier.
///
/// All operations take a single lock acquisition, so they are atomic and
/// linearizable with respect to each other; no caller observes a
/// half-written entry. Expired entries are evicted by the `get` that
/// observes them; capacity pressure evicts the entry with the oldest
/// creation timestamp, ties broken by key order so eviction is
/// deterministic.
///
/// Cloning is cheap and clones share the same underlying map.
///
/// # Examples
///
/// ```
/// use stratus_memory::MemoryCache;
/// use stratus_tier::{CacheEntry, CacheTier};
/// use tick::Clock;
/// # futures::executor::block_on(async {
///
/// let clock = Clock::new_frozen();
/// let cache = MemoryCache::<String, i32>::new(clock);
///
/// cache.insert(&"key".to_string(), CacheEntry::new(42)).await?;
/// let value = cache.get(&"key".to_string()).await?;
/// assert_eq!(*value.unwrap().value(), 42);
/// # Ok::<(), stratus_tier::Error>(())
/// # });
/// ```
#[derive(Debug)]
pub struct MemoryCache<K, V> {
    entries: Arc<Mutex<HashMap<K, CacheEntry<V>>>>,
    clock: Clock,
    ttl: Duration,
    max_entries: usize,
}

impl<K, V> Clone for MemoryCache<K, V> {
    fn clone(&self) -> Self {
        Self {
            entries: Arc::clone(&self.entries),
            clock: self.clock.clone(),
            ttl: self.ttl,
            max_entries: self.max_entries,
        }
    }
}

impl<K, V> MemoryCache<K, V> {
    /// Creates a cache with the default TTL and capacity.
    #[must_use]
    pub fn new(clock: Clock) -> Self {
        Self::builder().build(clock)
    }

    /// Creates a new builder for configuring the cache.
    #[must_use]
    pub fn builder() -> MemoryCacheBuilder<K, V> {
        MemoryCacheBuilder::new()
    }

    pub(crate) fn from_builder(builder: &MemoryCacheBuilder<K, V>, clock: Clock) -> Self {
        Self {
            entries: Arc::new(Mutex::new(HashMap::new())),
            clock,
            ttl: builder.ttl,
            max_entries: builder.max_entries,
        }
    }

    /// Returns the TTL applied to entries without a per-entry override.
    #[must_use]
    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Returns the maximum number of entries the cache may hold.
    #[must_use]
    pub fn max_entries(&self) -> usize {
        self.max_entries
    }
}

/// Removes the entry with the oldest creation timestamp, ties broken by the
/// smallest key. Returns `false` when the map is empty.
fn evict_oldest<K, V>(entries: &mut HashMap<K, CacheEntry<V>>) -> bool
where
    K: Clone + Eq + Hash + Ord,
{
    let victim = entries
        .iter()
        .min_by(|(key_a, entry_a), (key_b, entry_b)| {
            entry_a
                .cached_at()
                .cmp(&entry_b.cached_at())
                .then_with(|| key_a.cmp(key_b))
        })
        .map(|(key, _)| key.clone());

    match victim {
        Some(key) => {
            entries.remove(&key);
            true
        }
        None => false,
    }
}

impl<K, V> CacheTier<K, V> for MemoryCache<K, V>
where
    K: Clone + Eq + Hash + Ord + Send + Sync,
    V: Clone + Send + Sync,
{
    async fn get(&self, key: &K) -> Result<Option<CacheEntry<V>>> {
        let now = self.clock.system_time();
        let mut entries = self.entries.lock();
        match entries.get(key) {
            Some(entry) if entry.is_expired(now) => {}
            Some(entry) => return Ok(Some(entry.clone())),
            None => return Ok(None),
        }
        // Expiration is eviction: the entry leaves before the miss reports.
        entries.remove(key);
        Ok(None)
    }

    async fn insert(&self, key: &K, mut entry: CacheEntry<V>) -> Result<()> {
        entry.stamp(self.clock.system_time(), self.ttl);
        let mut entries = self.entries.lock();
        if !entries.contains_key(key) {
            while entries.len() >= self.max_entries {
                if !evict_oldest(&mut entries) {
                    break;
                }
            }
        }
        entries.insert(key.clone(), entry);
        Ok(())
    }

    async fn invalidate(&self, key: &K) -> Result<()> {
        self.entries.lock().remove(key);
        Ok(())
    }

    async fn clear(&self) -> Result<()> {
        self.entries.lock().clear();
        Ok(())
    }

    async fn is_expired(&self, key: &K) -> Result<bool> {
        let now = self.clock.system_time();
        Ok(self
            .entries
            .lock()
            .get(key)
            .is_some_and(|entry| entry.is_expired(now)))
    }

    fn len(&self) -> Option<u64> {
        Some(self.entries.lock().len() as u64)
    }
}
