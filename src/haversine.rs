//! Great-circle travel estimation (fallback when no matrix provider is
//! configured or the provider call fails).
//!
//! Ignores the road network, so durations are a flat minutes-per-mile
//! heuristic rather than real driving times.

use rayon::prelude::*;

use crate::model::{Coordinates, TravelEstimate};
use crate::traits::DistanceProvider;

/// Earth radius in miles.
const EARTH_RADIUS_MILES: f64 = 3959.0;

/// Flat driving-time heuristic applied to great-circle distances.
const DEFAULT_MINUTES_PER_MILE: f64 = 3.0;

/// Meters per statute mile, used to derive a raw linear distance comparable
/// to provider-sourced driving distances.
pub const METERS_PER_MILE: f64 = 1609.34;

/// Great-circle travel estimator.
#[derive(Debug, Clone)]
pub struct HaversineEstimator {
    /// Assumed travel pace in minutes per mile.
    pub minutes_per_mile: f64,
}

impl Default for HaversineEstimator {
    fn default() -> Self {
        Self {
            minutes_per_mile: DEFAULT_MINUTES_PER_MILE,
        }
    }
}

impl HaversineEstimator {
    pub fn new(minutes_per_mile: f64) -> Self {
        Self { minutes_per_mile }
    }

    /// Haversine distance between two points in miles.
    pub fn distance_miles(from: Coordinates, to: Coordinates) -> f64 {
        let lat1_rad = from.latitude.to_radians();
        let lat2_rad = to.latitude.to_radians();
        let delta_lat = (to.latitude - from.latitude).to_radians();
        let delta_lon = (to.longitude - from.longitude).to_radians();

        let a = (delta_lat / 2.0).sin().powi(2)
            + lat1_rad.cos() * lat2_rad.cos() * (delta_lon / 2.0).sin().powi(2);
        let c = 2.0 * a.sqrt().atan2((1.0 - a).sqrt());

        EARTH_RADIUS_MILES * c
    }

    /// Estimate travel to a single destination.
    pub fn estimate(&self, origin: Coordinates, destination: Coordinates) -> TravelEstimate {
        let miles = Self::distance_miles(origin, destination);
        TravelEstimate {
            distance_miles: miles,
            duration_minutes: (miles * self.minutes_per_mile).round() as i32,
            raw_meters: miles * METERS_PER_MILE,
            routed: false,
        }
    }

    /// Estimate travel to every destination, in order.
    pub fn estimate_batch(
        &self,
        origin: Coordinates,
        destinations: &[Coordinates],
    ) -> Vec<TravelEstimate> {
        destinations
            .par_iter()
            .map(|destination| self.estimate(origin, *destination))
            .collect()
    }
}

impl DistanceProvider for HaversineEstimator {
    fn travel_matrix(
        &self,
        origin: Coordinates,
        destinations: &[Coordinates],
    ) -> Option<Vec<Option<TravelEstimate>>> {
        Some(
            self.estimate_batch(origin, destinations)
                .into_iter()
                .map(Some)
                .collect(),
        )
    }
}
