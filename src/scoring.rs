//! Scorer: additive desirability score with an explainable reason trail.
//!
//! Components are clamped individually, never the total. Disqualifiers
//! (excluded worker, not available at the requested time) force the total to
//! zero regardless of other merits.

use serde::Serialize;

use crate::availability::check_time_availability;
use crate::model::{Availability, Candidate, Preferences, ServiceType, TravelEstimate};

/// Upper bound of the distance component.
pub const MAX_DISTANCE_SCORE: f64 = 40.0;

/// Fixed baseline standing in for a real rating signal.
pub const EXPERIENCE_SCORE: f64 = 10.0;

/// Bonus for the customer's most recent prior worker.
pub const PREVIOUS_WORKER_BONUS: f64 = 5.0;

/// Bonus for deep-cleaning specialists.
pub const SERVICE_FIT_BONUS: f64 = 5.0;

/// Hourly rate (pence) from which a worker is treated as a deep-cleaning
/// specialist.
pub const DEEP_SPECIALIST_RATE_PENCE: i64 = 2200;

/// Linear decay with distance: 40 points at the doorstep, zero from 20 miles.
pub fn distance_score(miles: f64) -> f64 {
    (MAX_DISTANCE_SCORE - miles * 2.0).max(0.0)
}

/// Strictly decreasing reward for idle candidates.
pub fn workload_score(active_jobs: usize) -> f64 {
    match active_jobs {
        0 => 20.0,
        1 => 15.0,
        2 => 10.0,
        3 => 5.0,
        _ => 0.0,
    }
}

/// Rewards short drive times independently of raw distance.
pub fn quick_arrival_score(duration_minutes: i32) -> f64 {
    (10.0 - duration_minutes as f64 / 5.0).max(0.0)
}

/// Per-candidate score with every component named, plus the reason trail.
///
/// Derived fresh per selection call; never persisted.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScoreBreakdown {
    /// Sum of the components, rounded to the nearest integer. Zero whenever
    /// `availability` is not `Available`.
    pub total: i32,
    pub availability: Availability,
    pub distance_miles: f64,
    pub duration_minutes: Option<i32>,
    /// Same-day active-job count at scoring time.
    pub workload: usize,
    pub distance_score: f64,
    pub availability_score: f64,
    pub workload_score: f64,
    pub experience_score: f64,
    pub preference_score: f64,
    pub service_fit_score: f64,
    pub quick_arrival_score: f64,
    pub reasons: Vec<String>,
}

impl ScoreBreakdown {
    /// Zero-scored breakdown for a candidate knocked out before or during
    /// scoring.
    pub fn disqualified(
        availability: Availability,
        estimate: TravelEstimate,
        workload: usize,
        reasons: Vec<String>,
    ) -> Self {
        Self {
            total: 0,
            availability,
            distance_miles: estimate.distance_miles,
            duration_minutes: Some(estimate.duration_minutes),
            workload,
            distance_score: 0.0,
            availability_score: 0.0,
            workload_score: 0.0,
            experience_score: 0.0,
            preference_score: 0.0,
            service_fit_score: 0.0,
            quick_arrival_score: 0.0,
            reasons,
        }
    }
}

/// Score one in-radius candidate against the request.
///
/// The working-radius filter runs before this function; a candidate that
/// reaches the scorer is already within its own radius.
pub fn score_candidate(
    candidate: &Candidate,
    estimate: TravelEstimate,
    requested_time: &str,
    service_type: ServiceType,
    preferences: &Preferences,
) -> ScoreBreakdown {
    // Exclusion overrides every other merit.
    if preferences.is_excluded(&candidate.id) {
        return ScoreBreakdown::disqualified(
            Availability::Unavailable,
            estimate,
            candidate.active_job_count,
            vec!["Excluded by customer".to_string()],
        );
    }

    let mut reasons = Vec::new();

    let distance_points = distance_score(estimate.distance_miles);
    reasons.push(format!(
        "Distance: {:.1}mi in {}min (+{:.0} pts)",
        estimate.distance_miles, estimate.duration_minutes, distance_points
    ));

    let time_check = check_time_availability(candidate, requested_time);
    reasons.push(time_check.reason.clone());
    if time_check.availability != Availability::Available {
        return ScoreBreakdown::disqualified(
            time_check.availability,
            estimate,
            candidate.active_job_count,
            reasons,
        );
    }

    let workload_points = workload_score(candidate.active_job_count);
    reasons.push(format!(
        "Workload: {} bookings (+{:.0} pts)",
        candidate.active_job_count, workload_points
    ));

    reasons.push(format!("Experience (+{:.0} pts)", EXPERIENCE_SCORE));

    let mut preference_points = 0.0;
    if preferences.is_previous(&candidate.id) {
        preference_points += PREVIOUS_WORKER_BONUS;
        reasons.push(format!("Previous cleaner (+{:.0} pts)", PREVIOUS_WORKER_BONUS));
    }

    let mut service_fit_points = 0.0;
    if service_type == ServiceType::Deep
        && candidate.hourly_rate_pence >= DEEP_SPECIALIST_RATE_PENCE
    {
        service_fit_points = SERVICE_FIT_BONUS;
        reasons.push(format!(
            "Deep cleaning specialist (+{:.0} pts)",
            SERVICE_FIT_BONUS
        ));
    }

    // Only real driving durations earn the arrival bonus; the great-circle
    // duration is a flat heuristic.
    let arrival_points = if estimate.routed {
        quick_arrival_score(estimate.duration_minutes)
    } else {
        0.0
    };
    if arrival_points > 0.0 {
        reasons.push(format!("Quick arrival (+{:.0} pts)", arrival_points));
    }

    let total = distance_points
        + time_check.score
        + workload_points
        + EXPERIENCE_SCORE
        + preference_points
        + service_fit_points
        + arrival_points;

    ScoreBreakdown {
        total: total.round() as i32,
        availability: Availability::Available,
        distance_miles: estimate.distance_miles,
        duration_minutes: Some(estimate.duration_minutes),
        workload: candidate.active_job_count,
        distance_score: distance_points,
        availability_score: time_check.score,
        workload_score: workload_points,
        experience_score: EXPERIENCE_SCORE,
        preference_score: preference_points,
        service_fit_score: service_fit_points,
        quick_arrival_score: arrival_points,
        reasons,
    }
}
