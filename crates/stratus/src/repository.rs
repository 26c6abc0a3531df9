// Copyright (c) The Stratus Project Authors.
// Licensed under the MIT License.

//! The repository facade over the three tiers.

use std::hash::Hash;
use std::marker::PhantomData;

use tick::Clock;

use stratus_tier::{CacheEntry, CacheTier, Error, Keyed, PersistenceTier, RemoteTier, Result};

use crate::builder::RepositoryBuilder;
use crate::health::{HealthMonitor, OverallHealth, TierKind};
use crate::strategy::{self, FetchStrategy};

/// The remote slot of a repository built without a remote tier.
///
/// Never actually consulted: strategies treat an unset remote as absent, and
/// [`Repository::refresh`] fails with [`Error::NotConfigured`] before
/// reaching it.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoRemote;

impl<K, V> RemoteTier<K, V> for NoRemote
where
    K: Send + Sync,
    V: Send + Sync,
{
    async fn fetch(&self, _key: &K) -> Result<V> {
        Err(Error::NotConfigured)
    }

    async fn is_available(&self) -> bool {
        false
    }
}

/// The single public entry point over the three tiers.
///
/// A repository owns one cache tier, one persistence tier, an optional
/// remote tier, and a [`FetchStrategy`] fixed at construction. Reads go
/// through the strategy; writes go persistence-first so the cache never
/// holds a value the durable tier lacks. No state is shared across
/// repository instances.
///
/// Concurrent callers may invoke any operation from multiple tasks; each
/// tier operation is individually atomic, and a cancelled fetch leaves at
/// worst a persisted-but-uncached value behind, which the next fetch
/// repairs.
///
/// # Examples
///
/// ```
/// use stratus::{FetchStrategy, MemoryBackend, DurableStore, MemoryCache, Repository};
/// use tick::Clock;
/// # futures::executor::block_on(async {
///
/// let clock = Clock::new_frozen();
/// let repository = Repository::builder::<String, String>(clock.clone())
///     .strategy(FetchStrategy::CacheFirst)
///     .cache(MemoryCache::new(clock))
///     .persistence(DurableStore::new(MemoryBackend::new()))
///     .build();
///
/// repository.save(&"london".to_string()).await?;
/// assert_eq!(repository.fetch(&"london".to_string()).await?, "london");
/// # Ok::<(), stratus::Error>(())
/// # });
/// ```
#[derive(Debug)]
pub struct Repository<K, V, C, P, R = NoRemote> {
    pub(crate) strategy: FetchStrategy,
    pub(crate) cache: C,
    pub(crate) persistence: P,
    pub(crate) remote: Option<R>,
    pub(crate) monitor: HealthMonitor,
    pub(crate) clock: Clock,
    pub(crate) _phantom: PhantomData<(K, V)>,
}

impl Repository<(), (), (), ()> {
    /// Creates a new repository builder.
    #[must_use]
    pub fn builder<K, V>(clock: Clock) -> RepositoryBuilder<K, V> {
        RepositoryBuilder::new(clock)
    }
}

impl<K, V, C, P, R> Repository<K, V, C, P, R>
where
    K: Clone + Eq + Hash + Send + Sync + 'static,
    V: Clone + Keyed<K> + Send + Sync + 'static,
    C: CacheTier<K, V>,
    P: PersistenceTier<K, V>,
    R: RemoteTier<K, V>,
{
    /// Fetches the model for the key through the configured strategy.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotFound`] when every consulted tier misses, or the
    /// specific failure of the last tier attempted.
    pub async fn fetch(&self, key: &K) -> Result<V> {
        strategy::execute(
            self.strategy,
            key,
            &self.cache,
            &self.persistence,
            self.remote.as_ref(),
            &self.monitor,
        )
        .await
    }

    /// Reads the cache tier only: no fallback, no write-back.
    ///
    /// # Errors
    ///
    /// Returns an error if the cache tier itself fails.
    pub async fn get_cached(&self, key: &K) -> Result<Option<V>> {
        Ok(self.cache.get(key).await?.map(CacheEntry::into_value))
    }

    /// Saves the model to persistence, then the cache.
    ///
    /// The key is derived from the model itself, so both tiers stay keyed
    /// consistently.
    ///
    /// # Errors
    ///
    /// Returns the tier failure; a persistence failure skips the cache
    /// write entirely.
    pub async fn save(&self, value: &V) -> Result<()> {
        if let Err(error) = self.persistence.save(value).await {
            self.monitor.record(TierKind::Persistence, &error);
            return Err(error);
        }
        let key = value.key();
        if let Err(error) = self.cache.insert(&key, CacheEntry::new(value.clone())).await {
            self.monitor.record(TierKind::Cache, &error);
            return Err(error);
        }
        Ok(())
    }

    /// Deletes the model from persistence, then the cache.
    ///
    /// # Errors
    ///
    /// Returns the tier failure; deleting an absent key is a no-op.
    pub async fn delete(&self, key: &K) -> Result<()> {
        if let Err(error) = self.persistence.delete(key).await {
            self.monitor.record(TierKind::Persistence, &error);
            return Err(error);
        }
        if let Err(error) = self.cache.invalidate(key).await {
            self.monitor.record(TierKind::Cache, &error);
            return Err(error);
        }
        Ok(())
    }

    /// Lists the identifiers of everything the durable tier has committed.
    ///
    /// Cache and remote are not consulted.
    ///
    /// # Errors
    ///
    /// Returns an error if the persistence tier fails.
    pub async fn identifiers(&self) -> Result<Vec<K>> {
        match self.persistence.identifiers().await {
            Ok(keys) => Ok(keys),
            Err(error) => {
                self.monitor.record(TierKind::Persistence, &error);
                Err(error)
            }
        }
    }

    /// Removes every entry from the cache tier. Persistence is untouched,
    /// and clearing an empty cache is a no-op.
    ///
    /// # Errors
    ///
    /// Returns an error if the cache tier fails.
    pub async fn clear_cache(&self) -> Result<()> {
        self.cache.clear().await
    }

    /// Forces a remote fetch, bypassing cache and persistence reads.
    ///
    /// On success the value is written back persistence-first like any
    /// remote hit.
    ///
    /// # Errors
    ///
    /// Fails immediately with [`Error::NotConfigured`] when no remote tier
    /// was configured, with [`Error::NetworkUnavailable`] when the
    /// pre-flight refuses (the fetch is never attempted), or with the
    /// remote's classified failure.
    pub async fn refresh(&self, key: &K) -> Result<V> {
        let Some(remote) = self.remote.as_ref() else {
            return Err(Error::NotConfigured);
        };

        if !remote.is_available().await {
            let error = Error::network_unavailable();
            self.monitor.record(TierKind::Remote, &error);
            return Err(error);
        }

        match remote.fetch(key).await {
            Ok(value) => {
                strategy::write_back(key, &value, &self.cache, &self.persistence, &self.monitor)
                    .await;
                Ok(value)
            }
            Err(error) => {
                self.monitor.record(TierKind::Remote, &error);
                Err(error)
            }
        }
    }

    /// Probes every tier and returns the weighted health report.
    pub async fn health(&self) -> OverallHealth {
        self.monitor
            .check(&self.cache, &self.persistence, self.remote.as_ref())
            .await
    }

    /// Returns the recent recorded errors for a tier, oldest first.
    ///
    /// Diagnostic-only; strategy execution never consults this.
    #[must_use]
    pub fn recent_errors(&self, tier: TierKind) -> Vec<String> {
        self.monitor.recent_errors(tier)
    }

    /// Returns the strategy this repository was built with.
    #[must_use]
    pub fn strategy(&self) -> FetchStrategy {
        self.strategy
    }

    /// Returns a reference to the repository's clock.
    #[must_use]
    pub fn clock(&self) -> &Clock {
        &self.clock
    }

    /// Returns a reference to the cache tier.
    #[must_use]
    pub fn cache(&self) -> &C {
        &self.cache
    }

    /// Returns a reference to the persistence tier.
    #[must_use]
    pub fn persistence(&self) -> &P {
        &self.persistence
    }

    /// Returns a reference to the remote tier, when one is configured.
    #[must_use]
    pub fn remote(&self) -> Option<&R> {
        self.remote.as_ref()
    }
}
