//! Selection pipeline tests
//!
//! Covers the failure taxonomy, radius and availability filtering, scoring
//! composition, ranking, and the degraded provider paths.

use cleaner_dispatch::distance::DistanceEstimator;
use cleaner_dispatch::geocoder::{Geocoder, InMemoryCache};
use cleaner_dispatch::model::{
    Coordinates, DayWindow, JobStatus, Preferences, ScheduledJob, ServiceType, TravelEstimate,
    WorkerProfile,
};
use cleaner_dispatch::pool::InMemoryPool;
use cleaner_dispatch::selector::{SelectionError, SelectionRequest, select_best_cleaner};
use cleaner_dispatch::traits::DistanceProvider;

// ============================================================================
// Test Fixtures
// ============================================================================

/// Monday 2025-06-02, matching the default Monday schedule below.
const MONDAY: i64 = 1_748_822_400;

/// Buckingham Palace, pre-cached in every test.
const TARGET: Coordinates = Coordinates {
    latitude: 51.5014,
    longitude: -0.1419,
};

/// One degree of latitude is ~69.1 miles; this offset is just under 2 miles.
const TWO_MILES_LAT: f64 = 0.0289;

/// Builder for worker profiles with sensible defaults.
#[derive(Clone, Debug)]
struct TestWorker {
    profile: WorkerProfile,
}

impl TestWorker {
    fn new(id: &str) -> Self {
        Self {
            profile: WorkerProfile {
                id: id.to_string(),
                name: id.to_string(),
                coordinates: Some(TARGET),
                working_radius_miles: 10.0,
                hourly_rate_pence: 1800,
                active: true,
                available: true,
                weekly_schedule: vec![DayWindow {
                    day_of_week: 1,
                    start_time: "09:00".to_string(),
                    end_time: "17:00".to_string(),
                    available: true,
                }],
                jobs: Vec::new(),
            },
        }
    }

    fn miles_north(mut self, miles: f64) -> Self {
        self.profile.coordinates = Some(Coordinates {
            latitude: TARGET.latitude + TWO_MILES_LAT * miles / 2.0,
            longitude: TARGET.longitude,
        });
        self
    }

    fn no_location(mut self) -> Self {
        self.profile.coordinates = None;
        self
    }

    fn radius(mut self, miles: f64) -> Self {
        self.profile.working_radius_miles = miles;
        self
    }

    fn rate_pence(mut self, pence: i64) -> Self {
        self.profile.hourly_rate_pence = pence;
        self
    }

    fn window(mut self, start: &str, end: &str) -> Self {
        self.profile.weekly_schedule = vec![DayWindow {
            day_of_week: 1,
            start_time: start.to_string(),
            end_time: end.to_string(),
            available: true,
        }];
        self
    }

    fn job_at(mut self, time: &str) -> Self {
        self.profile.jobs.push((
            MONDAY,
            ScheduledJob {
                time: time.to_string(),
                duration_minutes: Some(120),
                status: JobStatus::Confirmed,
            },
        ));
        self
    }

    fn build(self) -> WorkerProfile {
        self.profile
    }
}

fn cached_geocoder() -> Geocoder<InMemoryCache, cleaner_dispatch::traits::Unconfigured> {
    let cache = InMemoryCache::new();
    cache.seed("SW1A 1AA", TARGET.latitude, TARGET.longitude);
    Geocoder::cache_only(cache)
}

fn request_at(time: &str) -> SelectionRequest {
    SelectionRequest::new("SW1A 1AA", MONDAY, time, ServiceType::Regular)
}

fn select(
    pool: &InMemoryPool,
    request: &SelectionRequest,
) -> Result<cleaner_dispatch::selector::Selection, SelectionError> {
    let geocoder = cached_geocoder();
    let estimator = DistanceEstimator::haversine_only();
    select_best_cleaner(&geocoder, &estimator, pool, request)
}

// ============================================================================
// Failure Taxonomy
// ============================================================================

#[test]
fn unknown_postcode_is_not_serviceable() {
    let pool = InMemoryPool::new(vec![TestWorker::new("w1").build()]);
    let geocoder = Geocoder::cache_only(InMemoryCache::new());
    let estimator = DistanceEstimator::haversine_only();

    let result = select_best_cleaner(&geocoder, &estimator, &pool, &request_at("10:00"));
    assert_eq!(result.unwrap_err(), SelectionError::LocationNotServiceable);
}

#[test]
fn empty_pool_reports_no_cleaners() {
    let pool = InMemoryPool::new(Vec::new());
    let err = select(&pool, &request_at("10:00")).unwrap_err();
    assert_eq!(err, SelectionError::NoCandidates);
    assert_eq!(err.to_string(), "No cleaners available");
}

#[test]
fn all_outside_radius_reports_none_in_range() {
    let pool = InMemoryPool::new(vec![
        TestWorker::new("far").miles_north(30.0).radius(5.0).build(),
    ]);
    let err = select(&pool, &request_at("10:00")).unwrap_err();
    assert_eq!(err, SelectionError::NoneInRange);
    assert_eq!(err.to_string(), "No cleaners available in your area");
}

#[test]
fn workers_without_location_are_dropped() {
    let pool = InMemoryPool::new(vec![TestWorker::new("nowhere").no_location().build()]);
    let err = select(&pool, &request_at("10:00")).unwrap_err();
    assert_eq!(err, SelectionError::NoneInRange);
}

#[test]
fn all_busy_or_off_hours_reports_none_available() {
    let pool = InMemoryPool::new(vec![
        TestWorker::new("late-shift").window("13:00", "21:00").build(),
        TestWorker::new("booked").job_at("10:00").build(),
    ]);
    let err = select(&pool, &request_at("10:00")).unwrap_err();
    assert_eq!(err, SelectionError::NoneAvailable);
    assert_eq!(err.to_string(), "No available cleaners found");
}

#[test]
fn excluded_sole_candidate_reports_none_available() {
    let pool = InMemoryPool::new(vec![TestWorker::new("w1").build()]);
    let request = request_at("10:00").with_preferences(Preferences {
        previous_worker: None,
        excluded: vec!["w1".to_string()],
    });
    assert_eq!(
        select(&pool, &request).unwrap_err(),
        SelectionError::NoneAvailable
    );
}

// ============================================================================
// End-to-End Selection
// ============================================================================

#[test]
fn picks_the_available_in_range_candidate() {
    let pool = InMemoryPool::new(vec![
        TestWorker::new("too-far").miles_north(30.0).radius(5.0).build(),
        TestWorker::new("busy").miles_north(1.0).job_at("10:00").build(),
        TestWorker::new("idle").miles_north(2.0).build(),
    ]);

    let selection = select(&pool, &request_at("11:00")).unwrap();
    let winner = &selection.winner;

    assert_eq!(winner.candidate.id, "idle");
    assert_eq!(winner.breakdown.total, 96);
    assert!((winner.breakdown.distance_score - 36.0).abs() < 0.1);
    assert_eq!(winner.breakdown.availability_score, 30.0);
    assert_eq!(winner.breakdown.workload_score, 20.0);
    assert_eq!(winner.breakdown.experience_score, 10.0);
    assert_eq!(winner.breakdown.workload, 0);

    // The busy and out-of-range workers never make the ranking.
    assert!(selection.alternatives.is_empty());
}

#[test]
fn busy_window_frees_up_after_job_ends() {
    // Job at 10:00 for 120 minutes blocks [10, 12) but not 12:00.
    let pool = InMemoryPool::new(vec![TestWorker::new("booked").job_at("10:00").build()]);

    assert_eq!(
        select(&pool, &request_at("11:00")).unwrap_err(),
        SelectionError::NoneAvailable
    );
    let selection = select(&pool, &request_at("12:00")).unwrap();
    assert_eq!(selection.winner.candidate.id, "booked");
}

#[test]
fn request_before_window_start_is_unavailable() {
    let pool = InMemoryPool::new(vec![TestWorker::new("nine-to-five").build()]);
    assert_eq!(
        select(&pool, &request_at("08:00")).unwrap_err(),
        SelectionError::NoneAvailable
    );
}

#[test]
fn returns_at_most_two_alternatives() {
    let pool = InMemoryPool::new(vec![
        TestWorker::new("a").miles_north(1.0).build(),
        TestWorker::new("b").miles_north(2.0).build(),
        TestWorker::new("c").miles_north(3.0).build(),
        TestWorker::new("d").miles_north(4.0).build(),
    ]);

    let selection = select(&pool, &request_at("10:00")).unwrap();
    assert_eq!(selection.winner.candidate.id, "a");
    assert_eq!(selection.alternatives.len(), 2);
    assert_eq!(selection.alternatives[0].candidate.id, "b");
    assert_eq!(selection.alternatives[1].candidate.id, "c");
    // Each alternate carries its own breakdown.
    assert!(selection.alternatives[0].breakdown.total >= selection.alternatives[1].breakdown.total);
    assert!(!selection.alternatives[0].breakdown.reasons.is_empty());
}

#[test]
fn workload_separates_equally_placed_workers() {
    let pool = InMemoryPool::new(vec![
        TestWorker::new("loaded").miles_north(2.0).job_at("14:00").build(),
        TestWorker::new("idle").miles_north(2.0).build(),
    ]);

    let selection = select(&pool, &request_at("10:00")).unwrap();
    assert_eq!(selection.winner.candidate.id, "idle");
    assert_eq!(selection.winner.breakdown.workload_score, 20.0);
    assert_eq!(selection.alternatives[0].breakdown.workload_score, 15.0);
}

// ============================================================================
// Preferences
// ============================================================================

#[test]
fn previous_worker_outranks_an_equal_peer() {
    let pool = InMemoryPool::new(vec![
        TestWorker::new("new-face").miles_north(2.0).build(),
        TestWorker::new("old-friend").miles_north(2.0).build(),
    ]);
    let request =
        request_at("10:00").with_preferences(Preferences::returning_customer("old-friend"));

    let selection = select(&pool, &request).unwrap();
    assert_eq!(selection.winner.candidate.id, "old-friend");
    assert_eq!(selection.winner.breakdown.preference_score, 5.0);
}

#[test]
fn excluded_worker_loses_despite_higher_score() {
    let pool = InMemoryPool::new(vec![
        TestWorker::new("close-but-excluded").miles_north(1.0).build(),
        TestWorker::new("farther").miles_north(5.0).build(),
    ]);
    let request = request_at("10:00").with_preferences(Preferences {
        previous_worker: None,
        excluded: vec!["close-but-excluded".to_string()],
    });

    let selection = select(&pool, &request).unwrap();
    assert_eq!(selection.winner.candidate.id, "farther");
    assert!(selection.alternatives.is_empty());
}

#[test]
fn deep_cleaning_specialist_bonus_counts() {
    let pool = InMemoryPool::new(vec![
        TestWorker::new("premium").miles_north(2.0).rate_pence(2400).build(),
        TestWorker::new("budget").miles_north(2.0).rate_pence(1500).build(),
    ]);
    let request = SelectionRequest::new("SW1A 1AA", MONDAY, "10:00", ServiceType::Deep);

    let selection = select(&pool, &request).unwrap();
    assert_eq!(selection.winner.candidate.id, "premium");
    assert_eq!(selection.winner.breakdown.service_fit_score, 5.0);
    assert_eq!(selection.alternatives[0].breakdown.service_fit_score, 0.0);
}

// ============================================================================
// Deterministic Tie-Breaking
// ============================================================================

#[test]
fn equal_scores_break_on_distance() {
    // Rounding makes both totals 96; the closer worker must win.
    let pool = InMemoryPool::new(vec![
        TestWorker::new("slightly-farther").miles_north(2.04).build(),
        TestWorker::new("closer").miles_north(2.0).build(),
    ]);

    let selection = select(&pool, &request_at("10:00")).unwrap();
    assert_eq!(
        selection.winner.breakdown.total,
        selection.alternatives[0].breakdown.total
    );
    assert_eq!(selection.winner.candidate.id, "closer");
}

#[test]
fn identical_candidates_break_on_id() {
    let pool = InMemoryPool::new(vec![
        TestWorker::new("zeta").miles_north(2.0).build(),
        TestWorker::new("alpha").miles_north(2.0).build(),
    ]);

    let selection = select(&pool, &request_at("10:00")).unwrap();
    assert_eq!(selection.winner.candidate.id, "alpha");
}

// ============================================================================
// Provider Paths
// ============================================================================

struct BrokenMatrix;

impl DistanceProvider for BrokenMatrix {
    fn travel_matrix(
        &self,
        _origin: Coordinates,
        _destinations: &[Coordinates],
    ) -> Option<Vec<Option<TravelEstimate>>> {
        None
    }
}

/// Provider with fixed 2.0mi / 10min answers for every destination.
struct FlatMatrix;

impl DistanceProvider for FlatMatrix {
    fn travel_matrix(
        &self,
        _origin: Coordinates,
        destinations: &[Coordinates],
    ) -> Option<Vec<Option<TravelEstimate>>> {
        Some(
            destinations
                .iter()
                .map(|_| Some(TravelEstimate::from_provider(3218.7, 600.0)))
                .collect(),
        )
    }
}

#[test]
fn broken_matrix_provider_degrades_silently() {
    let pool = InMemoryPool::new(vec![TestWorker::new("idle").miles_north(2.0).build()]);
    let geocoder = cached_geocoder();
    let estimator = DistanceEstimator::new(BrokenMatrix);

    let selection = select_best_cleaner(&geocoder, &estimator, &pool, &request_at("11:00"))
        .expect("selection should fall back to great-circle distances");
    // Same outcome as the Haversine path: no arrival bonus, total 96.
    assert_eq!(selection.winner.breakdown.total, 96);
    assert_eq!(selection.winner.breakdown.quick_arrival_score, 0.0);
}

#[test]
fn routed_durations_earn_the_arrival_bonus() {
    let pool = InMemoryPool::new(vec![TestWorker::new("idle").build()]);
    let geocoder = cached_geocoder();
    let estimator = DistanceEstimator::new(FlatMatrix);

    let selection =
        select_best_cleaner(&geocoder, &estimator, &pool, &request_at("11:00")).unwrap();
    let breakdown = &selection.winner.breakdown;

    // 36 distance + 30 availability + 20 workload + 10 experience + 8 arrival.
    assert_eq!(breakdown.distance_miles, 2.0);
    assert_eq!(breakdown.duration_minutes, Some(10));
    assert_eq!(breakdown.quick_arrival_score, 8.0);
    assert_eq!(breakdown.total, 104);
}
