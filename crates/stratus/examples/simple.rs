// Copyright (c) The Stratus Project Authors.
// Licensed under the MIT License.

//! Simple Repository Example
//!
//! Demonstrates the basic facade operations against a two-tier repository:
//! save, fetch, cache-only reads, enumeration, and cache clearing.

use stratus::{DurableStore, Keyed, MemoryBackend, MemoryCache, Repository};
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

#[tokio::main]
async fn main() -> Result<(), stratus::Error> {
    let clock = Clock::new_tokio();

    let repository = Repository::builder::<String, Forecast>(clock.clone())
        .cache(MemoryCache::new(clock))
        .persistence(DurableStore::new(MemoryBackend::new()))
        .build();

    // Save writes the durable tier first, then the cache.
    repository
        .save(&Forecast {
            place: "london".to_string(),
            temperature_c: 14,
        })
        .await?;

    // A fetch is answered by the cache without touching persistence.
    let fetched = repository.fetch(&"london".to_string()).await?;
    println!("fetched: {} at {}C", fetched.place, fetched.temperature_c);

    // The durable tier is the source of truth for enumeration.
    println!("stored places: {:?}", repository.identifiers().await?);

    // Clearing the cache leaves persistence untouched; the next fetch
    // falls back to it and repopulates the cache.
    repository.clear_cache().await?;
    let after_clear = repository.fetch(&"london".to_string()).await?;
    println!("after clear: {} at {}C", after_clear.place, after_clear.temperature_c);

    let cached = repository.get_cached(&"london".to_string()).await?;
    println!("cache repopulated: {}", cached.is_some());

    Ok(())
}
