// Copyright (c) The Stratus Project Authors.
// Licensed under the MIT License.

//! The storage-backend collaborator contract and an in-memory
//! implementation.

use std::collections::HashMap;
use std::hash::Hash;
use std::io;
use std::sync::Arc;

use parking_lot::Mutex;

/// The contract a durable storage engine must satisfy.
///
/// Backends speak in terms of explicit keys and plain I/O errors; the
/// [`DurableStore`](crate::DurableStore) adapter owns key derivation and
/// error classification. Operations may block or suspend on I/O and must
/// only expose committed state through [`StorageBackend::list_keys`] and
/// [`StorageBackend::count`].
pub trait StorageBackend<K, V>: Send + Sync {
    /// Reads the record stored under the key, if any.
    fn read(&self, key: &K) -> impl Future<Output = io::Result<Option<V>>> + Send;

    /// Writes the record under the key, overwriting any previous record.
    fn write(&self, key: &K, value: &V) -> impl Future<Output = io::Result<()>> + Send;

    /// Removes the record stored under the key, if any.
    fn remove(&self, key: &K) -> impl Future<Output = io::Result<()>> + Send;

    /// Lists the keys of all committed records.
    fn list_keys(&self) -> impl Future<Output = io::Result<Vec<K>>> + Send;

    /// Counts the committed records.
    fn count(&self) -> impl Future<Output = io::Result<u64>> + Send;
}

/// An in-memory storage backend.
///
/// Useful for tests and demos; clones share the same underlying records.
/// Key listings are sorted so enumeration is deterministic.
#[derive(Debug)]
pub struct MemoryBackend<K, V> {
    records: Arc<Mutex<HashMap<K, V>>>,
}

impl<K, V> Clone for MemoryBackend<K, V> {
    fn clone(&self) -> Self {
        Self {
            records: Arc::clone(&self.records),
        }
    }
}

impl<K, V> Default for MemoryBackend<K, V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K, V> MemoryBackend<K, V> {
    /// Creates a new empty backend.
    #[must_use]
    pub fn new() -> Self {
        Self {
            records: Arc::new(Mutex::new(HashMap::new())),
        }
    }
}

impl<K, V> MemoryBackend<K, V>
where
    K: Eq + Hash,
{
    /// Returns the number of stored records.
    #[must_use]
    pub fn record_count(&self) -> usize {
        self.records.lock().len()
    }

    /// Returns true if a record exists for the given key.
    #[must_use]
    pub fn contains_key(&self, key: &K) -> bool {
        self.records.lock().contains_key(key)
    }
}

impl<K, V> StorageBackend<K, V> for MemoryBackend<K, V>
where
    K: Clone + Eq + Hash + Ord + Send + Sync,
    V: Clone + Send + Sync,
{
    async fn read(&self, key: &K) -> io::Result<Option<V>> {
        Ok(self.records.lock().get(key).cloned())
    }

    async fn write(&self, key: &K, value: &V) -> io::Result<()> {
        self.records.lock().insert(key.clone(), value.clone());
        Ok(())
    }

    async fn remove(&self, key: &K) -> io::Result<()> {
        self.records.lock().remove(key);
        Ok(())
    }

    async fn list_keys(&self) -> io::Result<Vec<K>> {
        let mut keys: Vec<K> = self.records.lock().keys().cloned().collect();
        keys.sort();
        Ok(keys)
    }

    async fn count(&self) -> io::Result<u64> {
        Ok(self.records.lock().len() as u64)
    }
}
