// Copyright (c) The Stratus Project Authors.
// Licensed under the MIT License.

//! Health Reporting Example
//!
//! Runs a repository whose remote endpoint is down, lets the strategy
//! recover through the local tiers, and prints the weighted health report a
//! diagnostics dashboard would consume.

use stratus::{
    DurableStore, FetchStrategy, Keyed, MemoryBackend, MemoryCache, RemoteStore, Repository,
    TierKind, Transport, TransportError,
};
use tick::Clock;

#[derive(Clone, Debug)]
struct Forecast {
    place: String,
    temperature_c: i32,
}

impl Keyed<String> for Forecast {
    fn key(&self) -> String {
        self.place.clone()
    }
}

impl TryFrom<String> for Forecast {
    type Error = std::num::ParseIntError;

    fn try_from(raw: String) -> Result<Self, Self::Error> {
        let (place, temperature) = raw.split_once(',').unwrap_or((raw.as_str(), "0"));
        Ok(Self {
            place: place.to_string(),
            temperature_c: temperature.parse()?,
        })
    }
}

/// An endpoint that is currently offline.
struct OfflineWeatherApi;

impl Transport<String> for OfflineWeatherApi {
    type Record = String;

    async fn fetch(&self, _key: &String) -> Result<String, TransportError> {
        Err(TransportError::connect(std::io::Error::other("no route to host")))
    }

    async fn is_reachable(&self) -> bool {
        false
    }
}

#[tokio::main]
async fn main() -> Result<(), stratus::Error> {
    let clock = Clock::new_tokio();

    let repository = Repository::builder::<String, Forecast>(clock.clone())
        .strategy(FetchStrategy::NetworkFirst)
        .cache(MemoryCache::new(clock.clone()))
        .persistence(DurableStore::new(MemoryBackend::new()))
        .remote(RemoteStore::new(OfflineWeatherApi, clock.clone()))
        .build();

    // Durable data survives the outage.
    repository
        .save(&Forecast {
            place: "london".to_string(),
            temperature_c: 14,
        })
        .await?;

    // networkFirst finds the remote unreachable and falls back locally.
    let fetched = repository.fetch(&"london".to_string()).await?;
    println!("served during outage: {} at {}C", fetched.place, fetched.temperature_c);

    // A forced refresh cannot fall back, so its failure lands in the ring.
    if let Err(error) = repository.refresh(&"london".to_string()).await {
        println!("refresh failed as expected: {error}");
    }

    let report = repository.health().await;
    println!("status: {:?}, score: {:.2}", report.status, report.score);
    for issue in &report.issues {
        println!("issue [{:?}/{:?}]: {}", issue.tier, issue.severity, issue.message);
    }
    for error in repository.recent_errors(TierKind::Remote) {
        println!("recent remote error: {error}");
    }

    Ok(())
}
