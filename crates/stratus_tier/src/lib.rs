// Copyright (c) The Stratus Project Authors.
// Licensed under the MIT License.

//! Core tier contracts for building multi-tier repositories.
//!
//! This crate defines the three tier traits a repository orchestrates
//! ([`CacheTier`], [`PersistenceTier`], and [`RemoteTier`]) along with
//! [`CacheEntry`] for cached values with expiration metadata, [`Keyed`] for
//! models that carry their own identifier, and the closed [`Error`] taxonomy
//! shared by every tier.
//!
//! # Overview
//!
//! The tier abstraction separates storage concerns from orchestration.
//! Implement a tier trait for your backend, then let `stratus` layer
//! strategy selection, write-back, and health reporting on top.
//!
//! # Implementing a Cache Tier
//!
//! ```
//! use std::collections::HashMap;
//! use std::sync::RwLock;
//!
//! use stratus_tier::{CacheEntry, CacheTier, Error};
//!
//! struct SimpleCache<K, V>(RwLock<HashMap<K, CacheEntry<V>>>);
//!
//! impl<K, V> CacheTier<K, V> for SimpleCache<K, V>
//! where
//!     K: Clone + Eq + std::hash::Hash + Send + Sync,
//!     V: Clone + Send + Sync,
//! {
//!     async fn get(&self, key: &K) -> Result<Option<CacheEntry<V>>, Error> {
//!         Ok(self.0.read().expect("poisoned").get(key).cloned())
//!     }
//!
//!     async fn insert(&self, key: &K, entry: CacheEntry<V>) -> Result<(), Error> {
//!         self.0.write().expect("poisoned").insert(key.clone(), entry);
//!         Ok(())
//!     }
//!
//!     async fn invalidate(&self, key: &K) -> Result<(), Error> {
//!         self.0.write().expect("poisoned").remove(key);
//!         Ok(())
//!     }
//!
//!     async fn clear(&self) -> Result<(), Error> {
//!         self.0.write().expect("poisoned").clear();
//!         Ok(())
//!     }
//!
//!     async fn is_expired(&self, _key: &K) -> Result<bool, Error> {
//!         Ok(false)
//!     }
//! }
//! ```

mod entry;
pub mod error;
#[cfg(any(feature = "test-util", test))]
pub mod testing;
pub(crate) mod tier;

#[doc(inline)]
pub use entry::CacheEntry;
#[doc(inline)]
pub use error::{Error, Result};
#[doc(inline)]
pub use tier::{CacheTier, Keyed, PersistenceTier, RemoteTier};
