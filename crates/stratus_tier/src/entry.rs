// Copyright (c) The Stratus Project Authors.
// Licensed under the MIT License.

use std::{
    ops::Deref,
    time::{Duration, SystemTime},
};

/// A cached value with expiration metadata.
///
/// `CacheEntry` wraps a value with a creation timestamp and an absolute
/// expiration timestamp. Both are unset on construction; the cache tier
/// stamps them when the entry is inserted, deriving the expiration from its
/// configured TTL (or from a per-entry override set via
/// [`CacheEntry::with_ttl`]).
///
/// # Examples
///
/// ```
/// use std::time::Duration;
///
/// use stratus_tier::CacheEntry;
///
/// // Simple entry with just a value
/// let entry = CacheEntry::new(42);
/// assert_eq!(*entry.value(), 42);
///
/// // Entry with a per-entry TTL that overrides the tier's TTL
/// let entry = CacheEntry::with_ttl("data".to_string(), Duration::from_secs(60));
/// assert_eq!(entry.ttl(), Some(Duration::from_secs(60)));
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CacheEntry<V> {
    value: V,
    cached_at: Option<SystemTime>,
    expires_at: Option<SystemTime>,
    /// Per-entry TTL override. If set, takes precedence over the tier TTL.
    ttl: Option<Duration>,
}

impl<V> CacheEntry<V> {
    /// Creates a new cache entry with the given value.
    ///
    /// The timestamps will be set by the cache tier when the entry is
    /// inserted.
    pub fn new(value: V) -> Self {
        Self {
            value,
            cached_at: None,
            expires_at: None,
            ttl: None,
        }
    }

    /// Creates a new cache entry with a per-entry TTL.
    ///
    /// The per-entry TTL takes precedence over any tier-level TTL.
    ///
    /// # Examples
    ///
    /// ```
    /// use std::time::Duration;
    ///
    /// use stratus_tier::CacheEntry;
    ///
    /// let entry = CacheEntry::with_ttl(42, Duration::from_secs(300));
    /// assert_eq!(entry.ttl(), Some(Duration::from_secs(300)));
    /// ```
    pub fn with_ttl(value: V, ttl: Duration) -> Self {
        Self {
            value,
            cached_at: None,
            expires_at: None,
            ttl: Some(ttl),
        }
    }

    /// Returns the timestamp at which this entry was cached.
    ///
    /// Returns `None` until the entry has been stamped by a cache tier.
    #[must_use]
    pub fn cached_at(&self) -> Option<SystemTime> {
        self.cached_at
    }

    /// Returns the absolute expiration timestamp.
    ///
    /// Returns `None` until the entry has been stamped by a cache tier.
    #[must_use]
    pub fn expires_at(&self) -> Option<SystemTime> {
        self.expires_at
    }

    /// Returns the per-entry TTL, if set.
    #[must_use]
    pub fn ttl(&self) -> Option<Duration> {
        self.ttl
    }

    /// Stamps the entry with its creation time and absolute expiration.
    ///
    /// Called by the cache tier on insertion. The expiration is
    /// `now + ttl`, where a per-entry TTL set at construction wins over the
    /// tier-level TTL passed in here.
    ///
    /// # Examples
    ///
    /// ```
    /// use std::time::{Duration, SystemTime};
    ///
    /// use stratus_tier::CacheEntry;
    ///
    /// let now = SystemTime::UNIX_EPOCH + Duration::from_secs(1_000);
    /// let mut entry = CacheEntry::new(42);
    /// entry.stamp(now, Duration::from_secs(60));
    ///
    /// assert_eq!(entry.cached_at(), Some(now));
    /// assert_eq!(entry.expires_at(), Some(now + Duration::from_secs(60)));
    /// ```
    pub fn stamp(&mut self, now: SystemTime, tier_ttl: Duration) {
        self.cached_at = Some(now);
        self.expires_at = Some(now + self.ttl.unwrap_or(tier_ttl));
    }

    /// Returns `true` if the entry's expiration has passed.
    ///
    /// An entry is live strictly before its expiration timestamp: a read at
    /// exactly the expiration instant observes an expired entry. Unstamped
    /// entries never report as expired.
    ///
    /// # Examples
    ///
    /// ```
    /// use std::time::{Duration, SystemTime};
    ///
    /// use stratus_tier::CacheEntry;
    ///
    /// let now = SystemTime::UNIX_EPOCH + Duration::from_secs(1_000);
    /// let mut entry = CacheEntry::new(42);
    /// entry.stamp(now, Duration::from_secs(60));
    ///
    /// assert!(!entry.is_expired(now + Duration::from_secs(59)));
    /// assert!(entry.is_expired(now + Duration::from_secs(60)));
    /// ```
    #[must_use]
    pub fn is_expired(&self, now: SystemTime) -> bool {
        self.expires_at.is_some_and(|expires_at| now >= expires_at)
    }

    /// Consumes the entry and returns the inner value.
    #[must_use]
    pub fn into_value(self) -> V {
        self.value
    }

    /// Returns a reference to the cached value.
    #[must_use]
    pub fn value(&self) -> &V {
        &self.value
    }
}

impl<V> Deref for CacheEntry<V> {
    type Target = V;

    fn deref(&self) -> &Self::Target {
        &self.value
    }
}

impl<V> From<V> for CacheEntry<V> {
    fn from(value: V) -> Self {
        Self::new(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn at(secs: u64) -> SystemTime {
        SystemTime::UNIX_EPOCH + Duration::from_secs(secs)
    }

    #[test]
    fn new_entry_is_unstamped() {
        let entry = CacheEntry::new(7);
        assert!(entry.cached_at().is_none());
        assert!(entry.expires_at().is_none());
        assert!(!entry.is_expired(at(u32::MAX.into())));
    }

    #[test]
    fn stamp_uses_tier_ttl_when_no_override() {
        let mut entry = CacheEntry::new(7);
        entry.stamp(at(100), Duration::from_secs(30));

        assert_eq!(entry.cached_at(), Some(at(100)));
        assert_eq!(entry.expires_at(), Some(at(130)));
    }

    #[test]
    fn stamp_prefers_per_entry_ttl() {
        let mut entry = CacheEntry::with_ttl(7, Duration::from_secs(120));
        entry.stamp(at(100), Duration::from_secs(30));

        assert_eq!(entry.expires_at(), Some(at(220)));
    }

    #[test]
    fn expiry_boundary_is_strict() {
        let mut entry = CacheEntry::new(7);
        entry.stamp(at(100), Duration::from_secs(30));

        assert!(!entry.is_expired(at(129)));
        assert!(entry.is_expired(at(130)));
        assert!(entry.is_expired(at(131)));
    }

    #[test]
    fn deref_and_from_wrap_the_value() {
        let entry: CacheEntry<String> = "forecast".to_string().into();
        assert_eq!(entry.len(), 8);
        assert_eq!(entry.into_value(), "forecast");
    }
}
