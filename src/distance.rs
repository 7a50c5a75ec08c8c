//! Distance Estimator: one batched matrix call with a total fallback.
//!
//! Either every estimate in a batch is provider-sourced or every estimate is
//! great-circle; a failed provider call never produces a mixed batch.

use crate::haversine::HaversineEstimator;
use crate::model::{Coordinates, TravelEstimate};
use crate::traits::{DistanceProvider, Unconfigured};

/// Batched travel estimation with a great-circle degraded path.
#[derive(Debug, Clone)]
pub struct DistanceEstimator<D> {
    provider: Option<D>,
    fallback: HaversineEstimator,
}

impl DistanceEstimator<Unconfigured> {
    /// Estimator for deployments without a matrix-provider credential.
    pub fn haversine_only() -> Self {
        Self {
            provider: None,
            fallback: HaversineEstimator::default(),
        }
    }
}

impl<D: DistanceProvider> DistanceEstimator<D> {
    pub fn new(provider: D) -> Self {
        Self {
            provider: Some(provider),
            fallback: HaversineEstimator::default(),
        }
    }

    pub fn with_fallback(provider: Option<D>, fallback: HaversineEstimator) -> Self {
        Self { provider, fallback }
    }

    /// Estimate travel from `origin` to every destination, in order.
    ///
    /// The result always has the same length as `destinations`. Destinations
    /// a successful matrix could not route to get the unreachable sentinel.
    pub fn estimate(
        &self,
        origin: Coordinates,
        destinations: &[Coordinates],
    ) -> Vec<TravelEstimate> {
        if destinations.is_empty() {
            return Vec::new();
        }

        if let Some(provider) = &self.provider {
            match provider.travel_matrix(origin, destinations) {
                Some(rows) if rows.len() == destinations.len() => {
                    return rows
                        .into_iter()
                        .map(|entry| entry.unwrap_or(TravelEstimate::UNREACHABLE))
                        .collect();
                }
                Some(rows) => {
                    tracing::warn!(
                        expected = destinations.len(),
                        got = rows.len(),
                        "matrix result length mismatch, using great-circle estimates"
                    );
                }
                None => {
                    tracing::warn!("distance provider degraded, using great-circle estimates");
                }
            }
        }

        self.fallback.estimate_batch(origin, destinations)
    }
}
