// Copyright (c) The Stratus Project Authors.
// Licensed under the MIT License.

//! A multi-tier repository with strategy-driven fetch, write-back, and
//! health reporting.
//!
//! A [`Repository`] orchestrates three backing tiers (an in-memory cache,
//! a durable persistence tier, and an optional remote tier) behind one
//! entry point. A [`FetchStrategy`] fixed at construction decides the order
//! tiers are consulted and which tiers are populated on a hit from a lower
//! tier; a [`HealthMonitor`] reduces per-tier probes into one weighted
//! report for diagnostics.
//!
//! # Examples
//!
//! ## A two-tier repository
//!
//! ```
//! use stratus::{DurableStore, MemoryBackend, MemoryCache, Repository};
//! use tick::Clock;
//! # futures::executor::block_on(async {
//!
//! let clock = Clock::new_frozen();
//! let repository = Repository::builder::<String, String>(clock.clone())
//!     .cache(MemoryCache::new(clock))
//!     .persistence(DurableStore::new(MemoryBackend::new()))
//!     .build();
//!
//! repository.save(&"london".to_string()).await?;
//! assert_eq!(repository.fetch(&"london".to_string()).await?, "london");
//! # Ok::<(), stratus::Error>(())
//! # });
//! ```
//!
//! ## Choosing a strategy
//!
//! ```
//! use stratus::{DurableStore, FetchStrategy, MemoryBackend, Repository};
//! use tick::Clock;
//!
//! let clock = Clock::new_frozen();
//! let repository = Repository::builder::<String, String>(clock)
//!     .strategy(FetchStrategy::NetworkFirst)
//!     .memory_cache()
//!     .persistence(DurableStore::new(MemoryBackend::new()))
//!     .build();
//! ```

mod builder;
mod health;
mod repository;
mod strategy;

#[doc(inline)]
pub use builder::RepositoryBuilder;
#[doc(inline)]
pub use health::{
    HealthIssue, HealthMonitor, HealthStatus, OverallHealth, Severity, TierHealth, TierKind,
};
#[doc(inline)]
pub use repository::{NoRemote, Repository};
#[doc(inline)]
pub use strategy::FetchStrategy;

#[doc(inline)]
pub use stratus_tier::{
    CacheEntry, CacheTier, Error, Keyed, PersistenceTier, RemoteTier, Result,
};

#[cfg(feature = "memory")]
#[doc(inline)]
pub use stratus_memory::MemoryCache;
#[cfg(feature = "remote")]
#[doc(inline)]
pub use stratus_remote::{RemoteStore, Transport, TransportError};
#[cfg(feature = "store")]
#[doc(inline)]
pub use stratus_store::{DurableStore, MemoryBackend, StorageBackend};

#[cfg(feature = "test-util")]
#[doc(inline)]
pub use stratus_tier::testing::{
    CacheOp, MockCache, MockPersistence, MockRemote, PersistOp, RemoteOp,
};
