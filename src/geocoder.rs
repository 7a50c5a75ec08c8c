//! Cache-first postal-code resolution.
//!
//! Lookups hit the persisted coordinate cache before any provider call;
//! successful provider results are written back so the next request for the
//! same postcode is a cache hit.

use std::collections::HashMap;
use std::sync::Mutex;

use crate::model::{CachedPostcode, Coordinates};
use crate::traits::{CoordinateCache, GeocodeProvider, Unconfigured};

/// Strip whitespace and uppercase, the canonical cache key form.
pub fn normalize_postcode(raw: &str) -> String {
    raw.chars()
        .filter(|c| !c.is_whitespace())
        .collect::<String>()
        .to_uppercase()
}

/// Resolves postal codes to coordinates, cache first.
#[derive(Debug, Clone)]
pub struct Geocoder<C, G> {
    cache: C,
    provider: Option<G>,
}

impl<C: CoordinateCache> Geocoder<C, Unconfigured> {
    /// Cache-only geocoder for deployments without a provider credential.
    pub fn cache_only(cache: C) -> Self {
        Self {
            cache,
            provider: None,
        }
    }
}

impl<C: CoordinateCache, G: GeocodeProvider> Geocoder<C, G> {
    pub fn new(cache: C, provider: Option<G>) -> Self {
        Self { cache, provider }
    }

    /// Resolve a postal code to coordinates.
    ///
    /// `None` means the location is not serviceable by any method; provider
    /// faults are folded into that same answer rather than propagated.
    pub fn resolve(&self, postcode: &str) -> Option<Coordinates> {
        let key = normalize_postcode(postcode);

        if let Some(coordinates) = self.cache.lookup(&key) {
            tracing::debug!(postcode = %key, "postcode cache hit");
            return Some(coordinates);
        }

        let provider = self.provider.as_ref()?;
        let place = provider.geocode(&key)?;

        self.cache.store(CachedPostcode {
            postcode: key.clone(),
            latitude: place.coordinates.latitude,
            longitude: place.coordinates.longitude,
            district: district_of(&place.place_name),
            country: "UK".to_string(),
        });
        tracing::debug!(postcode = %key, "geocoded and cached postcode");

        Some(place.coordinates)
    }
}

/// District is the second comma-separated segment of the place description.
fn district_of(place_name: &str) -> String {
    place_name
        .split(',')
        .nth(1)
        .map(|segment| segment.trim().to_string())
        .unwrap_or_default()
}

/// In-memory coordinate cache. Upserts are last-write-wins.
#[derive(Debug, Default)]
pub struct InMemoryCache {
    entries: Mutex<HashMap<String, CachedPostcode>>,
}

impl InMemoryCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed an entry, keyed by the normalized form of `postcode`.
    pub fn seed(&self, postcode: &str, latitude: f64, longitude: f64) {
        self.store(CachedPostcode {
            postcode: normalize_postcode(postcode),
            latitude,
            longitude,
            district: String::new(),
            country: "UK".to_string(),
        });
    }

    pub fn get(&self, postcode: &str) -> Option<CachedPostcode> {
        let entries = self.entries.lock().unwrap_or_else(|e| e.into_inner());
        entries.get(&normalize_postcode(postcode)).cloned()
    }

    pub fn len(&self) -> usize {
        let entries = self.entries.lock().unwrap_or_else(|e| e.into_inner());
        entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl CoordinateCache for InMemoryCache {
    fn lookup(&self, postcode: &str) -> Option<Coordinates> {
        let entries = self.entries.lock().unwrap_or_else(|e| e.into_inner());
        entries.get(postcode).map(|entry| Coordinates {
            latitude: entry.latitude,
            longitude: entry.longitude,
        })
    }

    fn store(&self, entry: CachedPostcode) {
        let mut entries = self.entries.lock().unwrap_or_else(|e| e.into_inner());
        entries.insert(entry.postcode.clone(), entry);
    }
}
