// Copyright (c) The Stratus Project Authors.
// Licensed under the MIT License.

//! Builder for configuring the in-memory cache tier.

use std::marker::PhantomData;
use std::time::Duration;

use tick::Clock;

use crate::tier::{DEFAULT_MAX_ENTRIES, DEFAULT_TTL, MemoryCache};

/// Builder for configuring a [`MemoryCache`].
///
/// # Examples
///
/// ```
/// use std::time::Duration;
///
/// use stratus_memory::MemoryCache;
/// use tick::Clock;
///
/// let clock = Clock::new_frozen();
/// let cache = MemoryCache::<String, i32>::builder()
///     .max_entries(100)
///     .ttl(Duration::from_secs(300))
///     .build(clock);
/// ```
#[derive(Debug)]
pub struct MemoryCacheBuilder<K, V> {
    pub(crate) ttl: Duration,
    pub(crate) max_entries: usize,
    _phantom: PhantomData<(K, V)>,
}

impl<K, V> Default for MemoryCacheBuilder<K, V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K, V> MemoryCacheBuilder<K, V> {
    /// Creates a new builder with the default TTL and capacity.
    #[must_use]
    pub fn new() -> Self {
        Self {
            ttl: DEFAULT_TTL,
            max_entries: DEFAULT_MAX_ENTRIES,
            _phantom: PhantomData,
        }
    }

    /// Sets the time-to-live applied to every entry without a per-entry
    /// override.
    ///
    /// An entry inserted at time `t` expires at `t + ttl` and is evicted on
    /// the first access at or after that instant.
    #[must_use]
    pub fn ttl(mut self, ttl: Duration) -> Self {
        self.ttl = ttl;
        self
    }

    /// Sets the maximum number of entries the cache may hold.
    ///
    /// Inserting a new key at capacity evicts the entry with the oldest
    /// creation timestamp first; ties break by key order.
    #[must_use]
    pub fn max_entries(mut self, max_entries: usize) -> Self {
        self.max_entries = max_entries;
        self
    }

    /// Builds the configured [`MemoryCache`] around the given clock.
    #[must_use]
    pub fn build(self, clock: Clock) -> MemoryCache<K, V> {
        MemoryCache::from_builder(&self, clock)
    }
}
