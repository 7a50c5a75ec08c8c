//! Availability Checker: working-hours window and conflict checks.
//!
//! Times are compared at hour granularity only; the minute components of the
//! window, the request, and existing jobs are ignored. Kept from the original
//! selection rules, and covered by boundary tests.

use crate::model::{Availability, Candidate, hour_of};

/// Assumed length of a job whose duration is unknown.
pub const DEFAULT_JOB_DURATION_MINUTES: i32 = 120;

/// Points granted when the candidate's window covers the request and no
/// existing job conflicts.
pub const AVAILABILITY_SCORE: f64 = 30.0;

/// Outcome of the time-window check for one candidate.
#[derive(Debug, Clone, PartialEq)]
pub struct TimeAvailability {
    pub availability: Availability,
    pub score: f64,
    pub reason: String,
}

impl TimeAvailability {
    fn unavailable(reason: impl Into<String>) -> Self {
        Self {
            availability: Availability::Unavailable,
            score: 0.0,
            reason: reason.into(),
        }
    }
}

/// Classify a candidate against the requested time of day.
///
/// The pool filter should guarantee a day window exists; its absence is
/// still answered with `Unavailable` rather than a panic.
pub fn check_time_availability(candidate: &Candidate, requested_time: &str) -> TimeAvailability {
    let Some(window) = &candidate.day_window else {
        return TimeAvailability::unavailable("Not working this day");
    };

    let (Some(requested_hour), Some(start_hour), Some(end_hour)) = (
        hour_of(requested_time),
        hour_of(&window.start_time),
        hour_of(&window.end_time),
    ) else {
        return TimeAvailability::unavailable("Unparseable working hours or requested time");
    };

    if requested_hour < start_hour || requested_hour >= end_hour {
        return TimeAvailability::unavailable(format!(
            "Outside working hours ({}-{})",
            window.start_time, window.end_time
        ));
    }

    let conflict = candidate.same_day_jobs.iter().any(|job| {
        let Some(job_hour) = hour_of(&job.time) else {
            return false;
        };
        let duration = job.duration_minutes.unwrap_or(DEFAULT_JOB_DURATION_MINUTES);
        let job_end = job_hour as f64 + duration as f64 / 60.0;
        requested_hour >= job_hour && (requested_hour as f64) < job_end
    });

    if conflict {
        return TimeAvailability {
            availability: Availability::Busy,
            score: 0.0,
            reason: "Time slot already booked".to_string(),
        };
    }

    TimeAvailability {
        availability: Availability::Available,
        score: AVAILABILITY_SCORE,
        reason: format!(
            "Available {}-{} (+{:.0} pts)",
            window.start_time, window.end_time, AVAILABILITY_SCORE
        ),
    }
}
