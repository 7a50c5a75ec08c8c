//! Selector: the dispatch pipeline.
//!
//! geocode → candidates → travel estimates → radius filter → score → rank.
//! Each stage short-circuits into one of four consumer-visible failures;
//! provider degradation never surfaces here.

use std::cmp::Ordering;
use std::fmt;

use serde::Serialize;

use crate::distance::DistanceEstimator;
use crate::geocoder::Geocoder;
use crate::model::{
    Availability, Candidate, Coordinates, Preferences, ServiceType, TravelEstimate,
};
use crate::scoring::{ScoreBreakdown, score_candidate};
use crate::traits::{CandidateSource, CoordinateCache, DistanceProvider, GeocodeProvider};

/// Parameters of one selection call.
#[derive(Debug, Clone)]
pub struct SelectionRequest {
    pub postcode: String,
    /// Service date (unix timestamp, date only).
    pub date: i64,
    /// Requested time of day, "HH:MM".
    pub time: String,
    pub service_type: ServiceType,
    pub preferences: Preferences,
}

impl SelectionRequest {
    pub fn new(
        postcode: impl Into<String>,
        date: i64,
        time: impl Into<String>,
        service_type: ServiceType,
    ) -> Self {
        Self {
            postcode: postcode.into(),
            date,
            time: time.into(),
            service_type,
            preferences: Preferences::default(),
        }
    }

    pub fn with_preferences(mut self, preferences: Preferences) -> Self {
        self.preferences = preferences;
        self
    }
}

/// A candidate together with its score breakdown.
#[derive(Debug, Clone, Serialize)]
pub struct RankedCandidate {
    pub candidate: Candidate,
    pub breakdown: ScoreBreakdown,
}

/// Successful selection: the winner plus up to two runners-up.
#[derive(Debug, Clone, Serialize)]
pub struct Selection {
    pub winner: RankedCandidate,
    pub alternatives: Vec<RankedCandidate>,
}

/// The only failures a consumer sees. A failed selection leaves the booking
/// unassigned; it never aborts booking creation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelectionError {
    /// Postal code could not be geocoded by any method.
    LocationNotServiceable,
    /// No worker is nominally available for the day and service.
    NoCandidates,
    /// Every located candidate is outside its own working radius.
    NoneInRange,
    /// Every in-range candidate failed the time check or was excluded.
    NoneAvailable,
}

impl fmt::Display for SelectionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let message = match self {
            SelectionError::LocationNotServiceable => "Location not serviceable",
            SelectionError::NoCandidates => "No cleaners available",
            SelectionError::NoneInRange => "No cleaners available in your area",
            SelectionError::NoneAvailable => "No available cleaners found",
        };
        f.write_str(message)
    }
}

impl std::error::Error for SelectionError {}

/// Select the best worker for a booking request.
///
/// Read-only apart from the geocoder's cache write-back. Persisting the
/// assignment is the caller's job, guarded by [`crate::assignment`].
pub fn select_best_cleaner<C, G, D, S>(
    geocoder: &Geocoder<C, G>,
    estimator: &DistanceEstimator<D>,
    pool: &S,
    request: &SelectionRequest,
) -> Result<Selection, SelectionError>
where
    C: CoordinateCache,
    G: GeocodeProvider,
    D: DistanceProvider,
    S: CandidateSource,
{
    let origin = geocoder
        .resolve(&request.postcode)
        .ok_or(SelectionError::LocationNotServiceable)?;
    tracing::debug!(
        latitude = origin.latitude,
        longitude = origin.longitude,
        "resolved booking location"
    );

    let candidates = pool.candidates_for(request.date, request.service_type);
    tracing::debug!(count = candidates.len(), "fetched candidate pool");
    if candidates.is_empty() {
        return Err(SelectionError::NoCandidates);
    }

    let located: Vec<(Candidate, Coordinates)> = candidates
        .into_iter()
        .filter_map(|candidate| {
            let coordinates = candidate.coordinates?;
            Some((candidate, coordinates))
        })
        .collect();
    if located.is_empty() {
        return Err(SelectionError::NoneInRange);
    }

    let destinations: Vec<Coordinates> = located.iter().map(|(_, c)| *c).collect();
    let estimates = estimator.estimate(origin, &destinations);

    let in_range: Vec<(Candidate, TravelEstimate)> = located
        .into_iter()
        .zip(estimates)
        .filter_map(|((candidate, _), estimate)| {
            if estimate.distance_miles <= candidate.working_radius_miles {
                Some((candidate, estimate))
            } else {
                tracing::debug!(
                    worker = %candidate.id,
                    distance = estimate.distance_miles,
                    radius = candidate.working_radius_miles,
                    "outside working radius"
                );
                None
            }
        })
        .collect();
    if in_range.is_empty() {
        return Err(SelectionError::NoneInRange);
    }

    let mut ranked: Vec<RankedCandidate> = in_range
        .into_iter()
        .map(|(candidate, estimate)| {
            let breakdown = score_candidate(
                &candidate,
                estimate,
                &request.time,
                request.service_type,
                &request.preferences,
            );
            tracing::debug!(
                worker = %candidate.id,
                score = breakdown.total,
                availability = ?breakdown.availability,
                "scored candidate"
            );
            RankedCandidate {
                candidate,
                breakdown,
            }
        })
        .filter(|ranked| ranked.breakdown.availability == Availability::Available)
        .collect();
    if ranked.is_empty() {
        return Err(SelectionError::NoneAvailable);
    }

    // Highest score wins; ties break on distance, then worker id, so the
    // outcome never depends on pool ordering.
    ranked.sort_by(|a, b| {
        b.breakdown
            .total
            .cmp(&a.breakdown.total)
            .then_with(|| {
                a.breakdown
                    .distance_miles
                    .partial_cmp(&b.breakdown.distance_miles)
                    .unwrap_or(Ordering::Equal)
            })
            .then_with(|| a.candidate.id.cmp(&b.candidate.id))
    });

    let winner = ranked.remove(0);
    ranked.truncate(2);
    tracing::info!(
        worker = %winner.candidate.id,
        score = winner.breakdown.total,
        distance = winner.breakdown.distance_miles,
        alternatives = ranked.len(),
        "selected cleaner"
    );

    Ok(Selection {
        winner,
        alternatives: ranked,
    })
}
