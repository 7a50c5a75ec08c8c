//! Seam traits for the dispatch engine.
//!
//! External collaborators (geocoding, distance matrix, coordinate cache,
//! candidate pool) sit behind narrow interfaces so the pipeline can run
//! against mock implementations without network or database access.

use crate::model::{CachedPostcode, Candidate, Coordinates, ServiceType, TravelEstimate};

/// A successfully geocoded place.
#[derive(Debug, Clone, PartialEq)]
pub struct GeocodedPlace {
    pub coordinates: Coordinates,
    /// Full place description, e.g. "SW1A 1AA, Westminster, London, UK".
    pub place_name: String,
}

/// Resolves a normalized postal code to coordinates via an external service.
///
/// Implementations swallow transport and decode errors into `None`; the
/// caller treats `None` as "use the degraded path", never as a fault.
pub trait GeocodeProvider {
    fn geocode(&self, postcode: &str) -> Option<GeocodedPlace>;
}

/// Batched travel estimation from one origin to many destinations.
///
/// `None` signals total provider failure (the whole batch falls back).
/// A `Some` result has one entry per destination, in order; a `None` entry
/// marks a destination the provider could not route to.
pub trait DistanceProvider {
    fn travel_matrix(
        &self,
        origin: Coordinates,
        destinations: &[Coordinates],
    ) -> Option<Vec<Option<TravelEstimate>>>;
}

/// Persisted coordinate cache keyed by normalized postal code.
///
/// `store` takes `&self`: concurrent upserts of the same key are idempotent
/// last-write-wins, so implementations use interior mutability.
pub trait CoordinateCache {
    fn lookup(&self, postcode: &str) -> Option<Coordinates>;
    fn store(&self, entry: CachedPostcode);
}

/// Candidate pool store: workers nominally available for the requested date
/// and service, each narrowed to that day's window and active jobs.
pub trait CandidateSource {
    fn candidates_for(&self, date: i64, service_type: ServiceType) -> Vec<Candidate>;
}

/// The "no credential configured" provider: every lookup misses, forcing the
/// documented degraded path (cache-only geocoding, great-circle distances).
#[derive(Debug, Clone, Copy, Default)]
pub struct Unconfigured;

impl GeocodeProvider for Unconfigured {
    fn geocode(&self, _postcode: &str) -> Option<GeocodedPlace> {
        None
    }
}

impl DistanceProvider for Unconfigured {
    fn travel_matrix(
        &self,
        _origin: Coordinates,
        _destinations: &[Coordinates],
    ) -> Option<Vec<Option<TravelEstimate>>> {
        None
    }
}

impl<T: GeocodeProvider + ?Sized> GeocodeProvider for &T {
    fn geocode(&self, postcode: &str) -> Option<GeocodedPlace> {
        (**self).geocode(postcode)
    }
}

impl<T: DistanceProvider + ?Sized> DistanceProvider for &T {
    fn travel_matrix(
        &self,
        origin: Coordinates,
        destinations: &[Coordinates],
    ) -> Option<Vec<Option<TravelEstimate>>> {
        (**self).travel_matrix(origin, destinations)
    }
}

impl<T: CoordinateCache + ?Sized> CoordinateCache for &T {
    fn lookup(&self, postcode: &str) -> Option<Coordinates> {
        (**self).lookup(postcode)
    }

    fn store(&self, entry: CachedPostcode) {
        (**self).store(entry)
    }
}

impl<T: CandidateSource + ?Sized> CandidateSource for &T {
    fn candidates_for(&self, date: i64, service_type: ServiceType) -> Vec<Candidate> {
        (**self).candidates_for(date, service_type)
    }
}
