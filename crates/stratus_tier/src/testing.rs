// Copyright (c) The Stratus Project Authors.
// Licensed under the MIT License.

//! Mock tier implementations for testing.
//!
//! Each mock stores its state in memory, records every operation for later
//! verification, and supports failure injection for exercising error paths.

use std::{collections::HashMap, hash::Hash, sync::Arc};

use parking_lot::Mutex;

use crate::{CacheEntry, CacheTier, Error, Keyed, PersistenceTier, RemoteTier};

/// Recorded cache operation with full context.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CacheOp<K, V> {
    /// A get operation was performed with the given key.
    Get(K),
    /// An insert operation was performed with the given key and entry.
    Insert {
        /// The key that was inserted.
        key: K,
        /// The cache entry that was inserted.
        entry: CacheEntry<V>,
    },
    /// An invalidate operation was performed with the given key.
    Invalidate(K),
    /// A clear operation was performed.
    Clear,
}

type CacheFailPredicate<K, V> = Box<dyn Fn(&CacheOp<K, V>) -> bool + Send + Sync>;

/// A configurable mock cache tier.
///
/// Entries never expire in the mock; expiration behavior belongs to the
/// real tier implementations.
///
/// # Examples
///
/// ```no_run
/// use stratus_tier::testing::{CacheOp, MockCache};
/// use stratus_tier::{CacheEntry, CacheTier};
///
/// # async fn example() {
/// let cache = MockCache::<String, i32>::new();
///
/// cache.insert(&"key".to_string(), CacheEntry::new(42)).await.unwrap();
/// let value = cache.get(&"key".to_string()).await.unwrap();
/// assert_eq!(*value.unwrap().value(), 42);
///
/// // Fail only specific keys
/// cache.fail_when(|op| matches!(op, CacheOp::Get(k) if k == "forbidden"));
/// assert!(cache.get(&"forbidden".to_string()).await.is_err());
/// # }
/// ```
pub struct MockCache<K, V> {
    data: Arc<Mutex<HashMap<K, CacheEntry<V>>>>,
    operations: Arc<Mutex<Vec<CacheOp<K, V>>>>,
    fail_when: Arc<Mutex<Option<CacheFailPredicate<K, V>>>>,
}

impl<K, V> std::fmt::Debug for MockCache<K, V> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MockCache")
            .field("fail_when", &self.fail_when.lock().is_some())
            .finish_non_exhaustive()
    }
}

impl<K, V> Clone for MockCache<K, V> {
    fn clone(&self) -> Self {
        Self {
            data: Arc::clone(&self.data),
            operations: Arc::clone(&self.operations),
            fail_when: Arc::clone(&self.fail_when),
        }
    }
}

impl<K, V> Default for MockCache<K, V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K, V> MockCache<K, V> {
    /// Creates a new empty mock cache.
    #[must_use]
    pub fn new() -> Self {
        Self {
            data: Arc::new(Mutex::new(HashMap::new())),
            operations: Arc::new(Mutex::new(Vec::new())),
            fail_when: Arc::new(Mutex::new(None)),
        }
    }
}

impl<K, V> MockCache<K, V>
where
    K: Eq + Hash,
{
    /// Returns the number of entries in the cache.
    #[must_use]
    pub fn entry_count(&self) -> usize {
        self.data.lock().len()
    }

    /// Returns true if the cache contains the given key.
    #[must_use]
    pub fn contains_key(&self, key: &K) -> bool {
        self.data.lock().contains_key(key)
    }
}

impl<K, V> MockCache<K, V>
where
    K: Clone,
    V: Clone,
{
    /// Sets a predicate that determines when operations should fail.
    pub fn fail_when<F>(&self, predicate: F)
    where
        F: Fn(&CacheOp<K, V>) -> bool + Send + Sync + 'static,
    {
        *self.fail_when.lock() = Some(Box::new(predicate));
    }

    /// Clears the failure predicate, allowing all operations to succeed.
    pub fn clear_failures(&self) {
        *self.fail_when.lock() = None;
    }

    /// Returns a clone of all recorded operations.
    #[must_use]
    pub fn operations(&self) -> Vec<CacheOp<K, V>> {
        self.operations.lock().clone()
    }

    /// Clears all recorded operations.
    pub fn clear_operations(&self) {
        self.operations.lock().clear();
    }

    fn record(&self, op: CacheOp<K, V>) {
        self.operations.lock().push(op);
    }

    fn should_fail(&self, op: &CacheOp<K, V>) -> bool {
        self.fail_when.lock().as_ref().is_some_and(|predicate| predicate(op))
    }
}

impl<K, V> CacheTier<K, V> for MockCache<K, V>
where
    K: Clone + Eq + Hash + Send + Sync,
    V: Clone + Send + Sync,
{
    async fn get(&self, key: &K) -> Result<Option<CacheEntry<V>>, Error> {
        let op = CacheOp::Get(key.clone());
        let failed = self.should_fail(&op);
        self.record(op);
        if failed {
            return Err(Error::storage("mock: cache get failed"));
        }
        Ok(self.data.lock().get(key).cloned())
    }

    async fn insert(&self, key: &K, entry: CacheEntry<V>) -> Result<(), Error> {
        let op = CacheOp::Insert {
            key: key.clone(),
            entry: entry.clone(),
        };
        let failed = self.should_fail(&op);
        self.record(op);
        if failed {
            return Err(Error::storage("mock: cache insert failed"));
        }
        self.data.lock().insert(key.clone(), entry);
        Ok(())
    }

    async fn invalidate(&self, key: &K) -> Result<(), Error> {
        let op = CacheOp::Invalidate(key.clone());
        let failed = self.should_fail(&op);
        self.record(op);
        if failed {
            return Err(Error::storage("mock: cache invalidate failed"));
        }
        self.data.lock().remove(key);
        Ok(())
    }

    async fn clear(&self) -> Result<(), Error> {
        let op = CacheOp::Clear;
        let failed = self.should_fail(&op);
        self.record(op);
        if failed {
            return Err(Error::storage("mock: cache clear failed"));
        }
        self.data.lock().clear();
        Ok(())
    }

    async fn is_expired(&self, _key: &K) -> Result<bool, Error> {
        Ok(false)
    }

    fn len(&self) -> Option<u64> {
        Some(self.data.lock().len() as u64)
    }
}

/// Recorded persistence operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PersistOp<K> {
    /// A fetch was performed with the given key.
    Fetch(K),
    /// A save was performed; the key was derived from the model.
    Save(K),
    /// A delete was performed with the given key.
    Delete(K),
    /// The identifier listing was requested.
    Identifiers,
    /// The record count was requested.
    Count,
}

type PersistFailPredicate<K> = Box<dyn Fn(&PersistOp<K>) -> bool + Send + Sync>;

/// A configurable mock persistence tier.
///
/// Saves upsert by the model's own key. Injected failures surface as
/// [`Error::Storage`].
pub struct MockPersistence<K, V> {
    data: Arc<Mutex<HashMap<K, V>>>,
    operations: Arc<Mutex<Vec<PersistOp<K>>>>,
    fail_when: Arc<Mutex<Option<PersistFailPredicate<K>>>>,
}

impl<K, V> std::fmt::Debug for MockPersistence<K, V> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MockPersistence")
            .field("fail_when", &self.fail_when.lock().is_some())
            .finish_non_exhaustive()
    }
}

impl<K, V> Clone for MockPersistence<K, V> {
    fn clone(&self) -> Self {
        Self {
            data: Arc::clone(&self.data),
            operations: Arc::clone(&self.operations),
            fail_when: Arc::clone(&self.fail_when),
        }
    }
}

impl<K, V> Default for MockPersistence<K, V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K, V> MockPersistence<K, V> {
    /// Creates a new empty mock persistence tier.
    #[must_use]
    pub fn new() -> Self {
        Self {
            data: Arc::new(Mutex::new(HashMap::new())),
            operations: Arc::new(Mutex::new(Vec::new())),
            fail_when: Arc::new(Mutex::new(None)),
        }
    }
}

impl<K, V> MockPersistence<K, V>
where
    K: Eq + Hash,
{
    /// Creates a mock persistence tier with pre-populated records.
    #[must_use]
    pub fn with_data(data: HashMap<K, V>) -> Self {
        Self {
            data: Arc::new(Mutex::new(data)),
            operations: Arc::new(Mutex::new(Vec::new())),
            fail_when: Arc::new(Mutex::new(None)),
        }
    }

    /// Returns the number of stored records.
    #[must_use]
    pub fn record_count(&self) -> usize {
        self.data.lock().len()
    }

    /// Returns true if a record exists for the given key.
    #[must_use]
    pub fn contains_key(&self, key: &K) -> bool {
        self.data.lock().contains_key(key)
    }
}

impl<K, V> MockPersistence<K, V>
where
    K: Clone,
{
    /// Sets a predicate that determines when operations should fail.
    pub fn fail_when<F>(&self, predicate: F)
    where
        F: Fn(&PersistOp<K>) -> bool + Send + Sync + 'static,
    {
        *self.fail_when.lock() = Some(Box::new(predicate));
    }

    /// Clears the failure predicate, allowing all operations to succeed.
    pub fn clear_failures(&self) {
        *self.fail_when.lock() = None;
    }

    /// Returns a clone of all recorded operations.
    #[must_use]
    pub fn operations(&self) -> Vec<PersistOp<K>> {
        self.operations.lock().clone()
    }

    fn record(&self, op: PersistOp<K>) {
        self.operations.lock().push(op);
    }

    fn should_fail(&self, op: &PersistOp<K>) -> bool {
        self.fail_when.lock().as_ref().is_some_and(|predicate| predicate(op))
    }
}

impl<K, V> PersistenceTier<K, V> for MockPersistence<K, V>
where
    K: Clone + Eq + Hash + Ord + Send + Sync,
    V: Clone + Keyed<K> + Send + Sync,
{
    async fn fetch(&self, key: &K) -> Result<Option<V>, Error> {
        let op = PersistOp::Fetch(key.clone());
        let failed = self.should_fail(&op);
        self.record(op);
        if failed {
            return Err(Error::storage("mock: persistence fetch failed"));
        }
        Ok(self.data.lock().get(key).cloned())
    }

    async fn save(&self, value: &V) -> Result<(), Error> {
        let key = value.key();
        let op = PersistOp::Save(key.clone());
        let failed = self.should_fail(&op);
        self.record(op);
        if failed {
            return Err(Error::storage("mock: persistence save failed"));
        }
        self.data.lock().insert(key, value.clone());
        Ok(())
    }

    async fn delete(&self, key: &K) -> Result<(), Error> {
        let op = PersistOp::Delete(key.clone());
        let failed = self.should_fail(&op);
        self.record(op);
        if failed {
            return Err(Error::storage("mock: persistence delete failed"));
        }
        self.data.lock().remove(key);
        Ok(())
    }

    async fn identifiers(&self) -> Result<Vec<K>, Error> {
        let op = PersistOp::Identifiers;
        let failed = self.should_fail(&op);
        self.record(op);
        if failed {
            return Err(Error::storage("mock: persistence identifiers failed"));
        }
        let mut keys: Vec<K> = self.data.lock().keys().cloned().collect();
        keys.sort();
        Ok(keys)
    }

    async fn count(&self) -> Result<u64, Error> {
        let op = PersistOp::Count;
        let failed = self.should_fail(&op);
        self.record(op);
        if failed {
            return Err(Error::storage("mock: persistence count failed"));
        }
        Ok(self.data.lock().len() as u64)
    }
}

/// Recorded remote operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RemoteOp<K> {
    /// A fetch was performed with the given key.
    Fetch(K),
    /// The availability pre-flight was consulted.
    Availability,
}

type ErrorFactory = Box<dyn Fn() -> Error + Send + Sync>;

/// A configurable mock remote tier.
///
/// Responses are served from an in-memory map; missing keys fail with
/// [`Error::NotFound`]. Availability and failure injection are settable per
/// test, and fetch invocations are counted so tests can assert that an
/// unavailable remote is never actually called.
pub struct MockRemote<K, V> {
    responses: Arc<Mutex<HashMap<K, V>>>,
    available: Arc<Mutex<bool>>,
    fail_with: Arc<Mutex<Option<ErrorFactory>>>,
    operations: Arc<Mutex<Vec<RemoteOp<K>>>>,
}

impl<K, V> std::fmt::Debug for MockRemote<K, V> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MockRemote")
            .field("available", &*self.available.lock())
            .field("fail_with", &self.fail_with.lock().is_some())
            .finish_non_exhaustive()
    }
}

impl<K, V> Clone for MockRemote<K, V> {
    fn clone(&self) -> Self {
        Self {
            responses: Arc::clone(&self.responses),
            available: Arc::clone(&self.available),
            fail_with: Arc::clone(&self.fail_with),
            operations: Arc::clone(&self.operations),
        }
    }
}

impl<K, V> Default for MockRemote<K, V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K, V> MockRemote<K, V> {
    /// Creates a new mock remote tier that reports as available.
    #[must_use]
    pub fn new() -> Self {
        Self {
            responses: Arc::new(Mutex::new(HashMap::new())),
            available: Arc::new(Mutex::new(true)),
            fail_with: Arc::new(Mutex::new(None)),
            operations: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Sets what the availability pre-flight reports.
    pub fn set_available(&self, available: bool) {
        *self.available.lock() = available;
    }

    /// Makes every subsequent fetch fail with the produced error.
    pub fn fail_with<F>(&self, factory: F)
    where
        F: Fn() -> Error + Send + Sync + 'static,
    {
        *self.fail_with.lock() = Some(Box::new(factory));
    }

    /// Clears the injected failure, allowing fetches to succeed again.
    pub fn clear_failures(&self) {
        *self.fail_with.lock() = None;
    }
}

impl<K, V> MockRemote<K, V>
where
    K: Eq + Hash,
{
    /// Registers the response served for the given key.
    pub fn respond_with(&self, key: K, value: V) {
        self.responses.lock().insert(key, value);
    }
}

impl<K, V> MockRemote<K, V>
where
    K: Clone,
{
    /// Returns a clone of all recorded operations.
    #[must_use]
    pub fn operations(&self) -> Vec<RemoteOp<K>> {
        self.operations.lock().clone()
    }

    /// Returns how many times a fetch was actually attempted.
    #[must_use]
    pub fn fetch_count(&self) -> usize {
        self.operations
            .lock()
            .iter()
            .filter(|op| matches!(op, RemoteOp::Fetch(_)))
            .count()
    }
}

impl<K, V> RemoteTier<K, V> for MockRemote<K, V>
where
    K: Clone + Eq + Hash + Send + Sync,
    V: Clone + Send + Sync,
{
    async fn fetch(&self, key: &K) -> Result<V, Error> {
        self.operations.lock().push(RemoteOp::Fetch(key.clone()));
        if let Some(factory) = self.fail_with.lock().as_ref() {
            return Err(factory());
        }
        self.responses.lock().get(key).cloned().ok_or(Error::NotFound)
    }

    async fn is_available(&self) -> bool {
        self.operations.lock().push(RemoteOp::Availability);
        *self.available.lock()
    }
}
