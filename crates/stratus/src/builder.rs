// Copyright (c) The Stratus Project Authors.
// Licensed under the MIT License.

//! Builder for constructing repositories.

use std::hash::Hash;
use std::marker::PhantomData;

use tick::Clock;

use stratus_tier::{CacheTier, Keyed, PersistenceTier, RemoteTier};

use crate::health::HealthMonitor;
use crate::repository::{NoRemote, Repository};
use crate::strategy::FetchStrategy;

#[cfg(feature = "memory")]
use stratus_memory::MemoryCache;

/// Builder for a [`Repository`].
///
/// Created by [`Repository::builder`]. The cache and persistence tiers are
/// required; the remote tier is optional and the strategy defaults to
/// [`FetchStrategy::CacheFirst`].
///
/// # Examples
///
/// ```
/// use stratus::{DurableStore, FetchStrategy, MemoryBackend, Repository};
/// use tick::Clock;
///
/// let clock = Clock::new_frozen();
/// let repository = Repository::builder::<String, String>(clock)
///     .strategy(FetchStrategy::PersistenceFirst)
///     .memory_cache()
///     .persistence(DurableStore::new(MemoryBackend::new()))
///     .build();
///
/// assert_eq!(repository.strategy(), FetchStrategy::PersistenceFirst);
/// ```
#[derive(Debug)]
pub struct RepositoryBuilder<K, V, C = (), P = (), R = NoRemote> {
    strategy: FetchStrategy,
    cache: C,
    persistence: P,
    remote: Option<R>,
    clock: Clock,
    _phantom: PhantomData<(K, V)>,
}

impl<K, V> RepositoryBuilder<K, V> {
    pub(crate) fn new(clock: Clock) -> Self {
        Self {
            strategy: FetchStrategy::default(),
            cache: (),
            persistence: (),
            remote: None,
            clock,
            _phantom: PhantomData,
        }
    }
}

impl<K, V, C, P, R> RepositoryBuilder<K, V, C, P, R> {
    /// Selects the fetch strategy.
    #[must_use]
    pub fn strategy(mut self, strategy: FetchStrategy) -> Self {
        self.strategy = strategy;
        self
    }

    /// Sets the cache tier.
    pub fn cache<C2>(self, cache: C2) -> RepositoryBuilder<K, V, C2, P, R>
    where
        C2: CacheTier<K, V>,
    {
        RepositoryBuilder {
            strategy: self.strategy,
            cache,
            persistence: self.persistence,
            remote: self.remote,
            clock: self.clock,
            _phantom: PhantomData,
        }
    }

    /// Sets the cache tier to a [`MemoryCache`] with default TTL and
    /// capacity, sharing the builder's clock.
    #[cfg(feature = "memory")]
    #[must_use]
    pub fn memory_cache(self) -> RepositoryBuilder<K, V, MemoryCache<K, V>, P, R>
    where
        K: Clone + Eq + Hash + Ord + Send + Sync,
        V: Clone + Send + Sync,
    {
        let clock = self.clock.clone();
        self.cache(MemoryCache::new(clock))
    }

    /// Sets the persistence tier.
    pub fn persistence<P2>(self, persistence: P2) -> RepositoryBuilder<K, V, C, P2, R>
    where
        P2: PersistenceTier<K, V>,
    {
        RepositoryBuilder {
            strategy: self.strategy,
            cache: self.cache,
            persistence,
            remote: self.remote,
            clock: self.clock,
            _phantom: PhantomData,
        }
    }

    /// Sets the remote tier.
    pub fn remote<R2>(self, remote: R2) -> RepositoryBuilder<K, V, C, P, R2>
    where
        R2: RemoteTier<K, V>,
    {
        RepositoryBuilder {
            strategy: self.strategy,
            cache: self.cache,
            persistence: self.persistence,
            remote: Some(remote),
            clock: self.clock,
            _phantom: PhantomData,
        }
    }
}

impl<K, V, C, P, R> RepositoryBuilder<K, V, C, P, R>
where
    K: Clone + Eq + Hash + Send + Sync + 'static,
    V: Clone + Keyed<K> + Send + Sync + 'static,
    C: CacheTier<K, V>,
    P: PersistenceTier<K, V>,
    R: RemoteTier<K, V>,
{
    /// Builds the repository with the configured tiers and strategy.
    pub fn build(self) -> Repository<K, V, C, P, R> {
        Repository {
            strategy: self.strategy,
            cache: self.cache,
            persistence: self.persistence,
            remote: self.remote,
            monitor: HealthMonitor::new(self.clock.clone()),
            clock: self.clock,
            _phantom: PhantomData,
        }
    }
}
