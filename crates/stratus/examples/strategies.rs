// Copyright (c) The Stratus Project Authors.
// Licensed under the MIT License.

//! Strategy Comparison Example
//!
//! Builds three repositories over the same tiers, one per strategy, and
//! shows how each answers the same fetch: where the value comes from, and
//! which tiers get populated on the way back.

use std::fmt;

use stratus::{
    DurableStore, FetchStrategy, Keyed, MemoryBackend, MemoryCache, RemoteStore, Repository,
    Transport, TransportError,
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

/// The transfer record is "place,temperature"; decoding failures classify
/// as invalid data.
#[derive(Debug)]
struct MalformedRecord;

impl fmt::Display for MalformedRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "record is not place,temperature")
    }
}

impl std::error::Error for MalformedRecord {}

impl TryFrom<String> for Forecast {
    type Error = MalformedRecord;

    fn try_from(raw: String) -> Result<Self, Self::Error> {
        let (place, temperature) = raw.split_once(',').ok_or(MalformedRecord)?;
        Ok(Self {
            place: place.to_string(),
            temperature_c: temperature.parse().map_err(|_| MalformedRecord)?,
        })
    }
}

/// A canned weather endpoint.
struct StaticWeatherApi;

impl Transport<String> for StaticWeatherApi {
    type Record = String;

    async fn fetch(&self, key: &String) -> Result<String, TransportError> {
        match key.as_str() {
            "london" => Ok("london,14".to_string()),
            "tokyo" => Ok("tokyo,19".to_string()),
            _ => Err(TransportError::Status { status: 404 }),
        }
    }

    async fn is_reachable(&self) -> bool {
        true
    }
}

#[tokio::main]
async fn main() -> Result<(), stratus::Error> {
    let clock = Clock::new_tokio();

    for strategy in [
        FetchStrategy::CacheFirst,
        FetchStrategy::PersistenceFirst,
        FetchStrategy::NetworkFirst,
    ] {
        let repository = Repository::builder::<String, Forecast>(clock.clone())
            .strategy(strategy)
            .cache(MemoryCache::new(clock.clone()))
            .persistence(DurableStore::new(MemoryBackend::new()))
            .remote(RemoteStore::new(StaticWeatherApi, clock.clone()))
            .build();

        // Nothing is local yet, so every strategy ends at the remote and
        // writes the answer back through persistence into the cache.
        let fetched = repository.fetch(&"london".to_string()).await?;
        println!(
            "{strategy:?}: fetched {} at {}C, cached: {}, persisted: {:?}",
            fetched.place,
            fetched.temperature_c,
            repository.get_cached(&"london".to_string()).await?.is_some(),
            repository.identifiers().await?,
        );

        // A forced refresh bypasses both local tiers.
        let refreshed = repository.refresh(&"tokyo".to_string()).await?;
        println!("{strategy:?}: refreshed {} at {}C", refreshed.place, refreshed.temperature_c);
    }

    Ok(())
}
