// Copyright (c) The Stratus Project Authors.
// Licensed under the MIT License.

//! Tier health probes and the weighted overall report.
//!
//! The monitor probes each tier with a cheap, side-effect-free check and
//! reduces the results into one weighted score. The weighting is a policy
//! choice and lives entirely in this module, so it can be tuned without
//! touching strategy execution. The monitor also keeps a bounded ring of
//! recent tier errors per tier; that ring is diagnostic-only and never
//! influences strategy execution.

use std::collections::HashMap;
use std::collections::VecDeque;
use std::time::{Duration, SystemTime};

use parking_lot::Mutex;
use tick::Clock;

use stratus_tier::{CacheTier, Error, PersistenceTier, RemoteTier};

/// Relative weight of the cache tier in the overall score.
const CACHE_WEIGHT: f64 = 0.3;
/// Relative weight of the persistence tier in the overall score.
const PERSISTENCE_WEIGHT: f64 = 0.5;
/// Relative weight of the remote tier in the overall score.
const REMOTE_WEIGHT: f64 = 0.2;

/// How many recent errors are retained per tier.
const RECENT_ERRORS: usize = 16;

/// Identifies one of the three backing tiers.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum TierKind {
    /// The in-memory cache tier.
    Cache,
    /// The durable persistence tier.
    Persistence,
    /// The remote network tier.
    Remote,
}

/// The outcome of probing a single tier.
///
/// Produced fresh on every probe; never persisted.
#[derive(Clone, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TierHealth {
    /// Whether the probe succeeded.
    pub healthy: bool,
    /// Wall-clock latency of the probe.
    pub latency: Option<Duration>,
    /// Number of entries the tier reports holding, when it tracks size.
    pub entries: Option<u64>,
    /// The most recently recorded error for this tier, if any.
    pub last_error: Option<String>,
    /// When the probe ran.
    pub checked_at: SystemTime,
}

/// Severity of a reported health issue.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Severity {
    /// Degraded but survivable through fallback.
    Warning,
    /// The repository cannot do its job reliably.
    Critical,
}

/// One categorized finding from a health check.
#[derive(Clone, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct HealthIssue {
    /// The tier the issue concerns.
    pub tier: TierKind,
    /// How serious the issue is.
    pub severity: Severity,
    /// Human-readable description.
    pub message: String,
}

/// Overall classification of a health check.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum HealthStatus {
    /// Every probe succeeded and nothing is degraded.
    Healthy,
    /// Non-critical issues exist; fallback keeps the repository usable.
    Warning,
    /// The weighted score dropped below half.
    Degraded,
    /// A critical issue exists.
    Critical,
}

/// The weighted reduction of the three tier probes.
///
/// Derived on every check, never stored. Exposed read-only to diagnostics
/// consumers; the repository itself never acts on it.
#[derive(Clone, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct OverallHealth {
    /// Overall classification.
    pub status: HealthStatus,
    /// Weighted health score in `0.0..=1.0`.
    pub score: f64,
    /// Probe outcome of the cache tier.
    pub cache: TierHealth,
    /// Probe outcome of the persistence tier.
    pub persistence: TierHealth,
    /// Probe outcome of the remote tier; `None` when no remote is
    /// configured.
    pub remote: Option<TierHealth>,
    /// Categorized findings, empty when healthy.
    pub issues: Vec<HealthIssue>,
}

/// Probes the tiers and aggregates per-tier health into one report.
///
/// # Examples
///
/// ```
/// use stratus::HealthMonitor;
/// use tick::Clock;
///
/// let monitor = HealthMonitor::new(Clock::new_frozen());
/// assert!(monitor.recent_errors(stratus::TierKind::Cache).is_empty());
/// ```
#[derive(Debug)]
pub struct HealthMonitor {
    clock: Clock,
    recent: Mutex<HashMap<TierKind, VecDeque<String>>>,
}

impl HealthMonitor {
    /// Creates a monitor that timestamps probes with the given clock.
    #[must_use]
    pub fn new(clock: Clock) -> Self {
        Self {
            clock,
            recent: Mutex::new(HashMap::new()),
        }
    }

    /// Records a tier error for diagnostics.
    ///
    /// The ring is bounded: once a tier holds [`RECENT_ERRORS`] entries the
    /// oldest is dropped.
    pub(crate) fn record(&self, tier: TierKind, error: &Error) {
        let mut recent = self.recent.lock();
        let ring = recent.entry(tier).or_default();
        if ring.len() == RECENT_ERRORS {
            ring.pop_front();
        }
        ring.push_back(error.to_string());
    }

    /// Returns the recorded recent errors for a tier, oldest first.
    #[must_use]
    pub fn recent_errors(&self, tier: TierKind) -> Vec<String> {
        self.recent
            .lock()
            .get(&tier)
            .map(|ring| ring.iter().cloned().collect())
            .unwrap_or_default()
    }

    fn last_error(&self, tier: TierKind) -> Option<String> {
        self.recent.lock().get(&tier).and_then(|ring| ring.back().cloned())
    }

    /// Probes all tiers and reduces the results into one report.
    pub async fn check<K, V, C, P, R>(
        &self,
        cache: &C,
        persistence: &P,
        remote: Option<&R>,
    ) -> OverallHealth
    where
        K: Send + Sync,
        V: Send + Sync,
        C: CacheTier<K, V>,
        P: PersistenceTier<K, V>,
        R: RemoteTier<K, V>,
    {
        let cache_health = self.probe_cache::<K, V, C>(cache);
        let persistence_health = self.probe_persistence::<K, V, P>(persistence).await;
        let remote_health = match remote {
            Some(remote) => Some(self.probe_remote::<K, V, R>(remote).await),
            None => None,
        };

        self.reduce(cache_health, persistence_health, remote_health)
    }

    /// The cache probe is a statistics snapshot; it cannot fail.
    fn probe_cache<K, V, C>(&self, cache: &C) -> TierHealth
    where
        K: Send + Sync,
        V: Send + Sync,
        C: CacheTier<K, V>,
    {
        let stopwatch = self.clock.stopwatch();
        let entries = cache.len();
        TierHealth {
            healthy: true,
            latency: Some(stopwatch.elapsed()),
            entries,
            last_error: self.last_error(TierKind::Cache),
            checked_at: self.clock.system_time(),
        }
    }

    async fn probe_persistence<K, V, P>(&self, persistence: &P) -> TierHealth
    where
        K: Send + Sync,
        V: Send + Sync,
        P: PersistenceTier<K, V>,
    {
        let stopwatch = self.clock.stopwatch();
        let counted = persistence.count().await;
        let latency = stopwatch.elapsed();

        match counted {
            Ok(entries) => TierHealth {
                healthy: true,
                latency: Some(latency),
                entries: Some(entries),
                last_error: self.last_error(TierKind::Persistence),
                checked_at: self.clock.system_time(),
            },
            Err(error) => {
                self.record(TierKind::Persistence, &error);
                TierHealth {
                    healthy: false,
                    latency: Some(latency),
                    entries: None,
                    last_error: self.last_error(TierKind::Persistence),
                    checked_at: self.clock.system_time(),
                }
            }
        }
    }

    async fn probe_remote<K, V, R>(&self, remote: &R) -> TierHealth
    where
        K: Send + Sync,
        V: Send + Sync,
        R: RemoteTier<K, V>,
    {
        let stopwatch = self.clock.stopwatch();
        let available = remote.is_available().await;
        TierHealth {
            healthy: available,
            latency: Some(stopwatch.elapsed()),
            entries: None,
            last_error: self.last_error(TierKind::Remote),
            checked_at: self.clock.system_time(),
        }
    }

    fn reduce(
        &self,
        cache: TierHealth,
        persistence: TierHealth,
        remote: Option<TierHealth>,
    ) -> OverallHealth {
        let mut issues = Vec::new();
        if !cache.healthy {
            issues.push(HealthIssue {
                tier: TierKind::Cache,
                severity: Severity::Warning,
                message: "cache tier probe failed".to_string(),
            });
        }
        if !persistence.healthy {
            issues.push(HealthIssue {
                tier: TierKind::Persistence,
                severity: Severity::Critical,
                message: "persistence tier probe failed".to_string(),
            });
        }
        if let Some(remote) = &remote {
            if !remote.healthy {
                issues.push(HealthIssue {
                    tier: TierKind::Remote,
                    severity: Severity::Warning,
                    message: "remote endpoint is unreachable".to_string(),
                });
            }
        }

        // Score over the weights of the tiers actually present, so a
        // two-tier repository without a remote can still reach 1.0.
        let mut earned = 0.0;
        let mut possible = 0.0;
        for (healthy, weight) in [
            (Some(cache.healthy), CACHE_WEIGHT),
            (Some(persistence.healthy), PERSISTENCE_WEIGHT),
            (remote.as_ref().map(|tier| tier.healthy), REMOTE_WEIGHT),
        ] {
            if let Some(healthy) = healthy {
                possible += weight;
                if healthy {
                    earned += weight;
                }
            }
        }
        let score = if possible > 0.0 { earned / possible } else { 0.0 };

        let has_critical = issues.iter().any(|issue| issue.severity == Severity::Critical);
        let status = if has_critical {
            HealthStatus::Critical
        } else if score < 0.5 {
            HealthStatus::Degraded
        } else if issues.is_empty() {
            HealthStatus::Healthy
        } else {
            HealthStatus::Warning
        };

        OverallHealth {
            status,
            score,
            cache,
            persistence,
            remote,
            issues,
        }
    }
}
