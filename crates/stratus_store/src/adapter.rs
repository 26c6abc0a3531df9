// Copyright (c) The Stratus Project Authors.
// Licensed under the MIT License.

//! Adapts a storage backend into the persistence tier contract.

use stratus_tier::{Keyed, PersistenceTier, Result};

use crate::backend::StorageBackend;

/// A persistence tier backed by a [`StorageBackend`] collaborator.
///
/// The adapter owns the two concerns the backend does not: the storage key
/// for a save is derived from the model's own identifier (so saves are
/// upserts, never duplicates), and every backend I/O failure surfaces as
/// [`stratus_tier::Error::Storage`].
///
/// # Examples
///
/// ```
/// use stratus_store::{DurableStore, MemoryBackend};
/// use stratus_tier::PersistenceTier;
/// # futures::executor::block_on(async {
///
/// let store = DurableStore::new(MemoryBackend::<String, String>::new());
///
/// // String models act as their own key.
/// store.save(&"london".to_string()).await?;
/// assert_eq!(store.count().await?, 1);
/// # Ok::<(), stratus_tier::Error>(())
/// # });
/// ```
#[derive(Clone, Debug)]
pub struct DurableStore<B> {
    backend: B,
}

impl<B> DurableStore<B> {
    /// Creates a persistence tier over the given backend.
    pub fn new(backend: B) -> Self {
        Self { backend }
    }

    /// Returns a reference to the underlying backend.
    #[must_use]
    pub fn backend(&self) -> &B {
        &self.backend
    }

    /// Consumes the adapter and returns the underlying backend.
    #[must_use]
    pub fn into_inner(self) -> B {
        self.backend
    }
}

impl<K, V, B> PersistenceTier<K, V> for DurableStore<B>
where
    K: Send + Sync,
    V: Keyed<K> + Send + Sync,
    B: StorageBackend<K, V>,
{
    async fn fetch(&self, key: &K) -> Result<Option<V>> {
        Ok(self.backend.read(key).await?)
    }

    async fn save(&self, value: &V) -> Result<()> {
        let key = value.key();
        Ok(self.backend.write(&key, value).await?)
    }

    async fn delete(&self, key: &K) -> Result<()> {
        Ok(self.backend.remove(key).await?)
    }

    async fn identifiers(&self) -> Result<Vec<K>> {
        Ok(self.backend.list_keys().await?)
    }

    async fn count(&self) -> Result<u64> {
        Ok(self.backend.count().await?)
    }
}
