// Copyright (c) The Stratus Project Authors.
// Licensed under the MIT License.

//! Strategy selection and execution across the three tiers.
//!
//! A strategy is a fixed consultation order plus a write-back policy. Within
//! a strategy the tiers are always consulted in the same order, with no
//! dynamic reordering. Write-back after a lower-tier hit always proceeds
//! upward: a persistence hit populates the cache, a remote hit
//! populates persistence and then the cache.
//!
//! Tier failures are treated as misses for fallback purposes; only the last
//! tier actually attempted may surface its specific failure to the caller
//! (a clean miss there surfaces [`Error::NotFound`]). Every tier failure is
//! recorded in the health monitor regardless of whether the strategy
//! recovers.

use tracing::{debug, warn};

use stratus_tier::{CacheEntry, CacheTier, Error, PersistenceTier, RemoteTier, Result};

use crate::health::{HealthMonitor, TierKind};

/// The consultation order and write-back policy of a repository.
///
/// Fixed at repository construction; not meant to change per call.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum FetchStrategy {
    /// Cache, then persistence, then remote. The common read path.
    #[default]
    CacheFirst,
    /// Persistence, then cache, then remote. Durable state wins over
    /// whatever the cache holds.
    PersistenceFirst,
    /// Remote first, falling back to plain cache and persistence reads when
    /// the network fails. Freshest data wins when the network cooperates.
    NetworkFirst,
}

/// Runs the configured strategy for one key.
pub(crate) async fn execute<K, V, C, P, R>(
    strategy: FetchStrategy,
    key: &K,
    cache: &C,
    persistence: &P,
    remote: Option<&R>,
    monitor: &HealthMonitor,
) -> Result<V>
where
    K: Send + Sync,
    V: Clone + Send + Sync,
    C: CacheTier<K, V>,
    P: PersistenceTier<K, V>,
    R: RemoteTier<K, V>,
{
    match strategy {
        FetchStrategy::CacheFirst => cache_first(key, cache, persistence, remote, monitor).await,
        FetchStrategy::PersistenceFirst => {
            persistence_first(key, cache, persistence, remote, monitor).await
        }
        FetchStrategy::NetworkFirst => {
            network_first(key, cache, persistence, remote, monitor).await
        }
    }
}

async fn cache_first<K, V, C, P, R>(
    key: &K,
    cache: &C,
    persistence: &P,
    remote: Option<&R>,
    monitor: &HealthMonitor,
) -> Result<V>
where
    K: Send + Sync,
    V: Clone + Send + Sync,
    C: CacheTier<K, V>,
    P: PersistenceTier<K, V>,
    R: RemoteTier<K, V>,
{
    if let Ok(Some(value)) = read_cache(key, cache, monitor).await {
        return Ok(value);
    }

    let prior = match read_persistence(key, persistence, monitor).await {
        Ok(Some(value)) => {
            populate_cache(key, value.clone(), cache, monitor).await;
            return Ok(value);
        }
        Ok(None) => None,
        Err(error) => Some(error),
    };

    remote_or_exhausted(key, cache, persistence, remote, monitor, prior).await
}

async fn persistence_first<K, V, C, P, R>(
    key: &K,
    cache: &C,
    persistence: &P,
    remote: Option<&R>,
    monitor: &HealthMonitor,
) -> Result<V>
where
    K: Send + Sync,
    V: Clone + Send + Sync,
    C: CacheTier<K, V>,
    P: PersistenceTier<K, V>,
    R: RemoteTier<K, V>,
{
    if let Ok(Some(value)) = read_persistence(key, persistence, monitor).await {
        // Durable state wins: overwrite whatever the cache held.
        populate_cache(key, value.clone(), cache, monitor).await;
        return Ok(value);
    }

    let prior = match read_cache(key, cache, monitor).await {
        // Already cached; no write-back needed.
        Ok(Some(value)) => return Ok(value),
        Ok(None) => None,
        Err(error) => Some(error),
    };

    remote_or_exhausted(key, cache, persistence, remote, monitor, prior).await
}

async fn network_first<K, V, C, P, R>(
    key: &K,
    cache: &C,
    persistence: &P,
    remote: Option<&R>,
    monitor: &HealthMonitor,
) -> Result<V>
where
    K: Send + Sync,
    V: Clone + Send + Sync,
    C: CacheTier<K, V>,
    P: PersistenceTier<K, V>,
    R: RemoteTier<K, V>,
{
    if let Some(remote) = remote {
        if remote.is_available().await {
            match remote.fetch(key).await {
                Ok(value) => {
                    write_back(key, &value, cache, persistence, monitor).await;
                    return Ok(value);
                }
                Err(error) => {
                    warn!(error = %error, "remote fetch failed, falling back to local tiers");
                    monitor.record(TierKind::Remote, &error);
                }
            }
        } else {
            debug!("remote tier refused pre-flight, reading local tiers");
        }
    }

    // Fallback path: plain reads, no write-back.
    if let Ok(Some(value)) = read_cache(key, cache, monitor).await {
        return Ok(value);
    }

    match read_persistence(key, persistence, monitor).await {
        Ok(Some(value)) => Ok(value),
        Ok(None) => Err(Error::NotFound),
        // Persistence was the last tier consulted; its failure surfaces.
        Err(error) => Err(error),
    }
}

/// Final step shared by `CacheFirst` and `PersistenceFirst`: consult the
/// remote tier if it is present and willing.
///
/// `prior` carries the failure of the tier consulted immediately before, so
/// it can surface when the remote never enters the picture. Once the remote
/// is consulted, even if only its pre-flight, earlier failures are
/// fallback-internal and the chain resolves to the remote's own outcome, or
/// to `NotFound` when the pre-flight refused.
async fn remote_or_exhausted<K, V, C, P, R>(
    key: &K,
    cache: &C,
    persistence: &P,
    remote: Option<&R>,
    monitor: &HealthMonitor,
    prior: Option<Error>,
) -> Result<V>
where
    K: Send + Sync,
    V: Clone + Send + Sync,
    C: CacheTier<K, V>,
    P: PersistenceTier<K, V>,
    R: RemoteTier<K, V>,
{
    let Some(remote) = remote else {
        return Err(prior.unwrap_or(Error::NotFound));
    };

    if !remote.is_available().await {
        debug!("remote tier refused pre-flight, fallback chain exhausted");
        return Err(Error::NotFound);
    }

    match remote.fetch(key).await {
        Ok(value) => {
            write_back(key, &value, cache, persistence, monitor).await;
            Ok(value)
        }
        Err(error) => {
            monitor.record(TierKind::Remote, &error);
            Err(error)
        }
    }
}

/// Writes a remote-sourced value back into persistence, then the cache.
///
/// Persistence goes first so the cache never holds a value the durable tier
/// lacks: if the save fails the cache population is skipped entirely.
/// Write-back failures are recorded but never fail a fetch that already has
/// a value.
pub(crate) async fn write_back<K, V, C, P>(
    key: &K,
    value: &V,
    cache: &C,
    persistence: &P,
    monitor: &HealthMonitor,
) where
    K: Send + Sync,
    V: Clone + Send + Sync,
    C: CacheTier<K, V>,
    P: PersistenceTier<K, V>,
{
    if let Err(error) = persistence.save(value).await {
        warn!(error = %error, "persistence write-back failed, skipping cache population");
        monitor.record(TierKind::Persistence, &error);
        return;
    }
    populate_cache(key, value.clone(), cache, monitor).await;
}

async fn populate_cache<K, V, C>(key: &K, value: V, cache: &C, monitor: &HealthMonitor)
where
    K: Send + Sync,
    V: Clone + Send + Sync,
    C: CacheTier<K, V>,
{
    if let Err(error) = cache.insert(key, CacheEntry::new(value)).await {
        warn!(error = %error, "cache write-back failed");
        monitor.record(TierKind::Cache, &error);
    }
}

async fn read_cache<K, V, C>(key: &K, cache: &C, monitor: &HealthMonitor) -> Result<Option<V>>
where
    K: Send + Sync,
    V: Clone + Send + Sync,
    C: CacheTier<K, V>,
{
    match cache.get(key).await {
        Ok(found) => Ok(found.map(CacheEntry::into_value)),
        Err(error) => {
            warn!(error = %error, "cache read failed, treating as miss");
            monitor.record(TierKind::Cache, &error);
            Err(error)
        }
    }
}

async fn read_persistence<K, V, P>(
    key: &K,
    persistence: &P,
    monitor: &HealthMonitor,
) -> Result<Option<V>>
where
    K: Send + Sync,
    V: Clone + Send + Sync,
    P: PersistenceTier<K, V>,
{
    match persistence.fetch(key).await {
        Ok(found) => Ok(found),
        Err(error) => {
            warn!(error = %error, "persistence read failed, treating as miss");
            monitor.record(TierKind::Persistence, &error);
            Err(error)
        }
    }
}

/// Unit tests for propagation details that are awkward to reach through the
/// repository facade. The strategy matrix itself is covered by the
/// integration tests.
#[cfg(test)]
mod tests {
    use stratus_tier::testing::{MockCache, MockPersistence, MockRemote, PersistOp};
    use tick::Clock;

    use super::*;

    fn block_on<F: std::future::Future>(f: F) -> F::Output {
        futures::executor::block_on(f)
    }

    fn monitor() -> HealthMonitor {
        HealthMonitor::new(Clock::new_frozen())
    }

    #[test]
    fn persistence_error_surfaces_when_it_is_the_last_tier() {
        block_on(async {
            let cache = MockCache::<String, String>::new();
            let persistence = MockPersistence::<String, String>::new();
            persistence.fail_when(|op| matches!(op, PersistOp::Fetch(_)));
            let monitor = monitor();

            let outcome = execute(
                FetchStrategy::CacheFirst,
                &"london".to_string(),
                &cache,
                &persistence,
                None::<&MockRemote<String, String>>,
                &monitor,
            )
            .await;

            assert!(matches!(outcome, Err(Error::Storage(_))));
        });
    }

    #[test]
    fn persistence_error_is_absorbed_once_the_remote_is_consulted() {
        block_on(async {
            let cache = MockCache::<String, String>::new();
            let persistence = MockPersistence::<String, String>::new();
            persistence.fail_when(|op| matches!(op, PersistOp::Fetch(_)));
            let remote = MockRemote::<String, String>::new();
            remote.set_available(false);
            let monitor = monitor();

            let outcome = execute(
                FetchStrategy::CacheFirst,
                &"london".to_string(),
                &cache,
                &persistence,
                Some(&remote),
                &monitor,
            )
            .await;

            // The remote's pre-flight was the end of the chain, so the
            // earlier storage failure stays fallback-internal.
            assert!(matches!(outcome, Err(Error::NotFound)));
            assert_eq!(remote.fetch_count(), 0);
            assert!(!monitor.recent_errors(TierKind::Persistence).is_empty());
        });
    }

    #[test]
    fn failed_persistence_write_back_skips_cache_population() {
        block_on(async {
            let cache = MockCache::<String, String>::new();
            let persistence = MockPersistence::<String, String>::new();
            persistence.fail_when(|op| matches!(op, PersistOp::Save(_)));
            let remote = MockRemote::<String, String>::new();
            remote.respond_with("london".to_string(), "cloudy".to_string());
            let monitor = monitor();

            let outcome = execute(
                FetchStrategy::CacheFirst,
                &"london".to_string(),
                &cache,
                &persistence,
                Some(&remote),
                &monitor,
            )
            .await;

            // The fetched value is still returned, but neither tier holds it.
            assert_eq!(outcome.expect("fetch failed"), "cloudy");
            assert_eq!(cache.entry_count(), 0);
            assert!(!persistence.contains_key(&"london".to_string()));
        });
    }

    #[test]
    fn cache_error_surfaces_under_persistence_first_with_no_remote() {
        block_on(async {
            let cache = MockCache::<String, String>::new();
            cache.fail_when(|op| matches!(op, stratus_tier::testing::CacheOp::Get(_)));
            let persistence = MockPersistence::<String, String>::new();
            let monitor = monitor();

            let outcome = execute(
                FetchStrategy::PersistenceFirst,
                &"london".to_string(),
                &cache,
                &persistence,
                None::<&MockRemote<String, String>>,
                &monitor,
            )
            .await;

            assert!(matches!(outcome, Err(Error::Storage(_))));
        });
    }
}
