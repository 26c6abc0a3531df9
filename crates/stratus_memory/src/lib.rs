// Copyright (c) The Stratus Project Authors.
// Licensed under the MIT License.

//! Bounded in-memory cache tier.
//!
//! This crate provides [`MemoryCache`], an implementation of
//! [`stratus_tier::CacheTier`] backed by a mutex-guarded map with:
//!
//! - TTL expiration, checked on access; expired entries are evicted before
//!   the miss is reported
//! - a maximum entry count; inserting beyond it evicts the entry with the
//!   oldest creation timestamp, ties broken deterministically by key order
//! - atomic, linearizable operations under concurrent callers
//!
//! The clock is injected so expiration behavior is fully controllable in
//! tests.

mod builder;
mod tier;

#[doc(inline)]
pub use builder::MemoryCacheBuilder;
#[doc(inline)]
pub use tier::{DEFAULT_MAX_ENTRIES, DEFAULT_TTL, MemoryCache};
