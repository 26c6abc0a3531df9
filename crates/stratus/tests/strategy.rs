// Copyright (c) The Stratus Project Authors.
// Licensed under the MIT License.

//! Integration tests for the strategy matrix: consultation order, fallback,
//! and write-back behavior, observed through the mock tiers' operation
//! records.

use stratus::{Error, FetchStrategy, Keyed, Repository};
use stratus_tier::testing::{CacheOp, MockCache, MockPersistence, MockRemote, PersistOp};
use stratus_tier::{CacheEntry, CacheTier, PersistenceTier};
use tick::Clock;

fn block_on<F: std::future::Future>(f: F) -> F::Output {
    futures::executor::block_on(f)
}

#[derive(Clone, Debug, PartialEq)]
struct Forecast {
    place: String,
    temperature_c: i32,
}

impl Keyed<String> for Forecast {
    fn key(&self) -> String {
        self.place.clone()
    }
}

fn forecast(place: &str, temperature_c: i32) -> Forecast {
    Forecast {
        place: place.to_string(),
        temperature_c,
    }
}

struct Fixture {
    cache: MockCache<String, Forecast>,
    persistence: MockPersistence<String, Forecast>,
    remote: MockRemote<String, Forecast>,
}

impl Fixture {
    fn new() -> Self {
        Self {
            cache: MockCache::new(),
            persistence: MockPersistence::new(),
            remote: MockRemote::new(),
        }
    }

    fn repository(
        &self,
        strategy: FetchStrategy,
    ) -> Repository<
        String,
        Forecast,
        MockCache<String, Forecast>,
        MockPersistence<String, Forecast>,
        MockRemote<String, Forecast>,
    > {
        Repository::builder::<String, Forecast>(Clock::new_frozen())
            .strategy(strategy)
            .cache(self.cache.clone())
            .persistence(self.persistence.clone())
            .remote(self.remote.clone())
            .build()
    }
}

#[test]
fn cache_first_live_hit_touches_nothing_else() {
    block_on(async {
        let fixture = Fixture::new();
        fixture
            .cache
            .insert(&"london".to_string(), CacheEntry::new(forecast("london", 14)))
            .await
            .expect("insert failed");
        let repository = fixture.repository(FetchStrategy::CacheFirst);

        let fetched = repository.fetch(&"london".to_string()).await.expect("fetch failed");
        assert_eq!(fetched, forecast("london", 14));

        assert!(fixture.persistence.operations().is_empty());
        assert!(fixture.remote.operations().is_empty());
    });
}

#[test]
fn cache_first_persistence_hit_writes_back_into_the_cache() {
    block_on(async {
        let fixture = Fixture::new();
        fixture
            .persistence
            .save(&forecast("london", 14))
            .await
            .expect("save failed");
        let repository = fixture.repository(FetchStrategy::CacheFirst);

        let fetched = repository.fetch(&"london".to_string()).await.expect("fetch failed");
        assert_eq!(fetched, forecast("london", 14));

        // Upward write-back only: the cache gained the entry, the remote
        // was never involved.
        assert!(fixture.cache.contains_key(&"london".to_string()));
        assert_eq!(fixture.remote.fetch_count(), 0);
    });
}

#[test]
fn every_strategy_reports_not_found_and_writes_nothing_on_total_miss() {
    for strategy in [
        FetchStrategy::CacheFirst,
        FetchStrategy::PersistenceFirst,
        FetchStrategy::NetworkFirst,
    ] {
        block_on(async {
            let fixture = Fixture::new();
            fixture.remote.fail_with(|| Error::NotFound);
            let repository = fixture.repository(strategy);

            let outcome = repository.fetch(&"atlantis".to_string()).await;
            assert!(
                matches!(outcome, Err(Error::NotFound)),
                "{strategy:?} should report NotFound"
            );

            // No tier was left partially written.
            assert_eq!(fixture.cache.entry_count(), 0, "{strategy:?} wrote the cache");
            assert_eq!(
                fixture.persistence.record_count(),
                0,
                "{strategy:?} wrote persistence"
            );
        });
    }
}

#[test]
fn cache_first_remote_unavailable_is_not_found_without_a_fetch() {
    block_on(async {
        let fixture = Fixture::new();
        fixture.remote.set_available(false);
        let repository = fixture.repository(FetchStrategy::CacheFirst);

        let outcome = repository.fetch(&"tokyo".to_string()).await;
        assert!(matches!(outcome, Err(Error::NotFound)));
        assert_eq!(fixture.remote.fetch_count(), 0);
    });
}

#[test]
fn persistence_first_cache_hit_needs_no_write_back() {
    block_on(async {
        let fixture = Fixture::new();
        fixture
            .cache
            .insert(&"paris".to_string(), CacheEntry::new(forecast("paris", 25)))
            .await
            .expect("insert failed");
        let repository = fixture.repository(FetchStrategy::PersistenceFirst);
        fixture.cache.clear_operations();

        let fetched = repository.fetch(&"paris".to_string()).await.expect("fetch failed");
        assert_eq!(fetched, forecast("paris", 25));

        // Persistence was consulted first and missed; the cache answered
        // and nothing was written anywhere.
        assert_eq!(
            fixture.persistence.operations(),
            vec![PersistOp::Fetch("paris".to_string())]
        );
        assert_eq!(
            fixture.cache.operations(),
            vec![CacheOp::Get("paris".to_string())]
        );
    });
}

#[test]
fn network_first_success_writes_back_to_both_tiers() {
    block_on(async {
        let fixture = Fixture::new();
        fixture
            .remote
            .respond_with("london".to_string(), forecast("london", 14));
        let repository = fixture.repository(FetchStrategy::NetworkFirst);

        let fetched = repository.fetch(&"london".to_string()).await.expect("fetch failed");
        assert_eq!(fetched, forecast("london", 14));

        assert!(fixture.persistence.contains_key(&"london".to_string()));
        assert!(fixture.cache.contains_key(&"london".to_string()));
    });
}

#[test]
fn network_first_fetch_error_falls_back_to_the_cache() {
    block_on(async {
        let fixture = Fixture::new();
        fixture
            .cache
            .insert(&"london".to_string(), CacheEntry::new(forecast("london", 14)))
            .await
            .expect("insert failed");
        fixture.remote.fail_with(|| Error::service_unavailable(500));
        let repository = fixture.repository(FetchStrategy::NetworkFirst);

        let fetched = repository.fetch(&"london".to_string()).await.expect("fetch failed");
        assert_eq!(fetched, forecast("london", 14));

        // The fallback read is plain: nothing was written to persistence.
        assert_eq!(fixture.persistence.record_count(), 0);
        assert_eq!(fixture.remote.fetch_count(), 1);
    });
}

#[test]
fn network_first_fetch_error_falls_back_to_persistence_without_write_back() {
    block_on(async {
        let fixture = Fixture::new();
        fixture
            .persistence
            .save(&forecast("london", 14))
            .await
            .expect("save failed");
        fixture.remote.fail_with(|| Error::service_unavailable(500));
        let repository = fixture.repository(FetchStrategy::NetworkFirst);

        let fetched = repository.fetch(&"london".to_string()).await.expect("fetch failed");
        assert_eq!(fetched, forecast("london", 14));

        // Unlike the primary path, the fallback read does not repopulate
        // the cache.
        assert_eq!(fixture.cache.entry_count(), 0);
    });
}

#[test]
fn network_first_surfaces_not_found_when_fallbacks_cleanly_miss() {
    block_on(async {
        let fixture = Fixture::new();
        fixture.remote.fail_with(|| Error::service_unavailable(500));
        let repository = fixture.repository(FetchStrategy::NetworkFirst);

        // The remote error fed the fallback decision, but the chain ended
        // on persistence's clean miss.
        let outcome = repository.fetch(&"london".to_string()).await;
        assert!(matches!(outcome, Err(Error::NotFound)));
    });
}

#[test]
fn remote_fetch_error_surfaces_when_remote_is_last() {
    block_on(async {
        let fixture = Fixture::new();
        fixture.remote.fail_with(|| Error::service_unavailable(503));
        let repository = fixture.repository(FetchStrategy::CacheFirst);

        let outcome = repository.fetch(&"london".to_string()).await;
        assert!(matches!(
            outcome,
            Err(Error::ServiceUnavailable { status: Some(503) })
        ));
    });
}

#[test]
fn consultation_order_matches_the_strategy() {
    block_on(async {
        let fixture = Fixture::new();
        fixture
            .remote
            .respond_with("london".to_string(), forecast("london", 14));
        let repository = fixture.repository(FetchStrategy::CacheFirst);

        repository.fetch(&"london".to_string()).await.expect("fetch failed");

        // Cache read, persistence read, then the write-backs from the
        // remote hit: persistence save before cache insert.
        assert_eq!(
            fixture.cache.operations(),
            vec![
                CacheOp::Get("london".to_string()),
                CacheOp::Insert {
                    key: "london".to_string(),
                    entry: CacheEntry::new(forecast("london", 14)),
                },
            ]
        );
        assert_eq!(
            fixture.persistence.operations(),
            vec![
                PersistOp::Fetch("london".to_string()),
                PersistOp::Save("london".to_string()),
            ]
        );
    });
}
