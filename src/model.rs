//! Domain data for the dispatch engine.
//!
//! Candidates arrive from the pool store already narrowed to the requested
//! day; scores are derived per selection call and never persisted.

use serde::{Deserialize, Serialize};

/// Geographic position in decimal degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub latitude: f64,
    pub longitude: f64,
}

/// Booking service category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ServiceType {
    Regular,
    Deep,
    Tenancy,
    Office,
}

/// Lifecycle status of a job already assigned to a worker.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum JobStatus {
    Pending,
    Confirmed,
    Assigned,
    InProgress,
    Completed,
    Cancelled,
}

impl JobStatus {
    /// Terminal jobs never count toward workload or conflict checks.
    pub fn counts_toward_workload(self) -> bool {
        matches!(
            self,
            JobStatus::Pending | JobStatus::Confirmed | JobStatus::Assigned | JobStatus::InProgress
        )
    }
}

/// A job already on a worker's book for some date.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScheduledJob {
    /// Start time of day, "HH:MM".
    pub time: String,
    /// Estimated duration in minutes. Defaults to 120 when unknown.
    pub duration_minutes: Option<i32>,
    pub status: JobStatus,
}

/// One day-of-week entry of a worker's weekly schedule.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DayWindow {
    /// 0 = Sunday .. 6 = Saturday.
    pub day_of_week: u8,
    /// Window start, "HH:MM".
    pub start_time: String,
    /// Window end, "HH:MM".
    pub end_time: String,
    pub available: bool,
}

/// Full worker record as held by the pool store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkerProfile {
    pub id: String,
    pub name: String,
    /// Home coordinates. Workers without a resolved location are dropped
    /// before distance computation.
    pub coordinates: Option<Coordinates>,
    /// Maximum travel the worker accepts, in miles.
    pub working_radius_miles: f64,
    /// Hourly rate in pence.
    pub hourly_rate_pence: i64,
    pub active: bool,
    pub available: bool,
    pub weekly_schedule: Vec<DayWindow>,
    /// Assigned jobs keyed by service date (unix timestamp, date only).
    pub jobs: Vec<(i64, ScheduledJob)>,
}

/// A worker narrowed to one request: only the requested day's window and
/// that day's still-active jobs are attached.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Candidate {
    pub id: String,
    pub name: String,
    pub coordinates: Option<Coordinates>,
    pub working_radius_miles: f64,
    pub hourly_rate_pence: i64,
    /// The requested day's schedule entry. The pool filter guarantees one
    /// exists; the availability checker still handles its absence.
    pub day_window: Option<DayWindow>,
    pub same_day_jobs: Vec<ScheduledJob>,
    pub active_job_count: usize,
}

/// Customer preference signals attached to a selection request.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Preferences {
    /// Most recent worker previously assigned to this customer.
    pub previous_worker: Option<String>,
    /// Workers the customer refuses; always score 0 / unavailable.
    pub excluded: Vec<String>,
}

impl Preferences {
    /// Preferences for a returning customer keeping continuity with their
    /// most recent worker.
    pub fn returning_customer(previous_worker: impl Into<String>) -> Self {
        Self {
            previous_worker: Some(previous_worker.into()),
            excluded: Vec::new(),
        }
    }

    pub fn is_excluded(&self, worker_id: &str) -> bool {
        self.excluded.iter().any(|id| id == worker_id)
    }

    pub fn is_previous(&self, worker_id: &str) -> bool {
        self.previous_worker.as_deref() == Some(worker_id)
    }
}

/// Availability classification for one (request, candidate) pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Availability {
    Available,
    Busy,
    Unavailable,
}

/// Travel estimate from the booking location to one candidate.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TravelEstimate {
    /// Distance in miles, rounded to 1 decimal on provider paths.
    pub distance_miles: f64,
    /// Driving duration in whole minutes.
    pub duration_minutes: i32,
    /// Linear driving distance in meters.
    pub raw_meters: f64,
    /// True when the estimate came from a real routing provider; false for
    /// the great-circle heuristic. Only routed durations earn the
    /// quick-arrival bonus.
    pub routed: bool,
}

impl TravelEstimate {
    /// Sentinel for destinations the matrix provider could not reach.
    pub const UNREACHABLE: TravelEstimate = TravelEstimate {
        distance_miles: 999.0,
        duration_minutes: 999,
        raw_meters: 999_999.0,
        routed: true,
    };

    /// Convert provider units (meters, seconds) to miles and minutes.
    pub fn from_provider(meters: f64, seconds: f64) -> Self {
        let miles = meters * 0.000_621_371;
        Self {
            distance_miles: (miles * 10.0).round() / 10.0,
            duration_minutes: (seconds / 60.0).round() as i32,
            raw_meters: meters,
            routed: true,
        }
    }
}

/// Cached geocoding result keyed by normalized postal code.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CachedPostcode {
    pub postcode: String,
    pub latitude: f64,
    pub longitude: f64,
    pub district: String,
    pub country: String,
}

/// Parse the hour component of an "HH:MM" time-of-day string.
///
/// Availability is compared at hour granularity only; minutes are ignored.
pub fn hour_of(time: &str) -> Option<u32> {
    let hour = time.split(':').next()?.trim().parse::<u32>().ok()?;
    if hour < 24 { Some(hour) } else { None }
}

/// Day of week (0 = Sunday) for a unix timestamp.
pub fn day_of_week(date: i64) -> u8 {
    let days = date.div_euclid(86_400);
    // 1970-01-01 was a Thursday.
    (days + 4).rem_euclid(7) as u8
}
