// Copyright (c) The Stratus Project Authors.
// Licensed under the MIT License.

//! The core traits implemented by the three backing tiers.
//!
//! Each trait is deliberately narrow: the orchestration layer composes them
//! and owns consultation order, write-back, and failure propagation, so a
//! tier only has to answer for its own storage.

use crate::{CacheEntry, error::Result};

/// A capacity- and time-bounded key/value store held in memory.
///
/// Implementations must be safe under concurrent invocation: every operation
/// is atomic with respect to the others, and no caller may observe a
/// half-written entry.
pub trait CacheTier<K, V>: Send + Sync {
    /// Gets a value, returning `Ok(None)` both when the key is absent and
    /// when the stored entry has expired. An expired entry is evicted as a
    /// side effect before the miss is reported.
    fn get(&self, key: &K) -> impl Future<Output = Result<Option<CacheEntry<V>>>> + Send;

    /// Inserts a value, overwriting any existing entry for the key and
    /// stamping a fresh expiration.
    fn insert(&self, key: &K, entry: CacheEntry<V>) -> impl Future<Output = Result<()>> + Send;

    /// Removes the entry for the key, if present.
    fn invalidate(&self, key: &K) -> impl Future<Output = Result<()>> + Send;

    /// Removes all entries.
    fn clear(&self) -> impl Future<Output = Result<()>> + Send;

    /// Reports whether a stored entry for the key has passed its expiration.
    ///
    /// This is a side-effect-free probe: absent keys report `false` and no
    /// eviction takes place.
    fn is_expired(&self, key: &K) -> impl Future<Output = Result<bool>> + Send;

    /// Returns the number of entries, if supported.
    ///
    /// Returns `None` for implementations that don't track size.
    fn len(&self) -> Option<u64> {
        None
    }

    /// Returns `true` if the cache contains no entries.
    ///
    /// Returns `None` for implementations that don't track size.
    fn is_empty(&self) -> Option<bool> {
        self.len().map(|len| len == 0)
    }
}

/// A durable store keyed by the model's own identifier.
///
/// The persistence tier is the source of truth for "what do we have
/// stored"; [`PersistenceTier::identifiers`] must reflect committed state
/// only.
pub trait PersistenceTier<K, V>: Send + Sync {
    /// Fetches the stored model for the key.
    ///
    /// Absence is `Ok(None)`, never an error.
    fn fetch(&self, key: &K) -> impl Future<Output = Result<Option<V>>> + Send;

    /// Upserts the model, keyed by the model's own identifying field.
    ///
    /// Any prior record with the same derived key is overwritten rather
    /// than duplicated.
    fn save(&self, value: &V) -> impl Future<Output = Result<()>> + Send;

    /// Deletes the stored model for the key, if present.
    fn delete(&self, key: &K) -> impl Future<Output = Result<()>> + Send;

    /// Lists the identifiers of all committed records.
    fn identifiers(&self) -> impl Future<Output = Result<Vec<K>>> + Send;

    /// Counts the committed records. Cheap; used by health probes.
    fn count(&self) -> impl Future<Output = Result<u64>> + Send;
}

/// A tier that fetches a fresh model from a network endpoint.
pub trait RemoteTier<K, V>: Send + Sync {
    /// Fetches the model for the key from the remote endpoint.
    ///
    /// Unlike the other tiers there is no "clean miss": a missing record is
    /// a classified failure.
    fn fetch(&self, key: &K) -> impl Future<Output = Result<V>> + Send;

    /// A cheap, side-effect-free pre-flight check.
    ///
    /// Callers consult this before [`RemoteTier::fetch`] and must not
    /// attempt the network call at all when it reports `false`.
    fn is_available(&self) -> impl Future<Output = bool> + Send;
}

/// A model that carries its own identifier.
///
/// The persistence tier derives the storage key from the model itself, and
/// write-backs derive the cache key the same way, so both stay consistent
/// with whatever field the model considers identifying.
///
/// # Examples
///
/// ```
/// use stratus_tier::Keyed;
///
/// #[derive(Clone)]
/// struct Forecast {
///     place: String,
///     temperature_c: f64,
/// }
///
/// impl Keyed<String> for Forecast {
///     fn key(&self) -> String {
///         self.place.clone()
///     }
/// }
/// ```
pub trait Keyed<K> {
    /// Returns the identifying key of this model.
    fn key(&self) -> K;
}

/// Every clonable value can act as its own key.
impl<K: Clone> Keyed<K> for K {
    fn key(&self) -> K {
        self.clone()
    }
}
