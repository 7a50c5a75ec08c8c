//! Candidate Finder: in-memory candidate pool.
//!
//! Reference implementation of [`CandidateSource`] over a set of worker
//! profiles. Production deployments implement the trait against their own
//! store with the same narrowing rules.

use crate::model::{Candidate, ServiceType, WorkerProfile, day_of_week};
use crate::traits::CandidateSource;

/// In-memory worker pool.
#[derive(Debug, Clone, Default)]
pub struct InMemoryPool {
    workers: Vec<WorkerProfile>,
}

impl InMemoryPool {
    pub fn new(workers: Vec<WorkerProfile>) -> Self {
        Self { workers }
    }

    pub fn push(&mut self, worker: WorkerProfile) {
        self.workers.push(worker);
    }
}

impl CandidateSource for InMemoryPool {
    /// Workers that are active, available, and scheduled for the date's
    /// day-of-week, each narrowed to that day's window and the same-day jobs
    /// still in an active status.
    fn candidates_for(&self, date: i64, _service_type: ServiceType) -> Vec<Candidate> {
        let dow = day_of_week(date);

        self.workers
            .iter()
            .filter(|worker| worker.active && worker.available)
            .filter_map(|worker| {
                let window = worker
                    .weekly_schedule
                    .iter()
                    .find(|entry| entry.day_of_week == dow && entry.available)?;

                let same_day_jobs: Vec<_> = worker
                    .jobs
                    .iter()
                    .filter(|(job_date, job)| {
                        *job_date == date && job.status.counts_toward_workload()
                    })
                    .map(|(_, job)| job.clone())
                    .collect();

                Some(Candidate {
                    id: worker.id.clone(),
                    name: worker.name.clone(),
                    coordinates: worker.coordinates,
                    working_radius_miles: worker.working_radius_miles,
                    hourly_rate_pence: worker.hourly_rate_pence,
                    day_window: Some(window.clone()),
                    active_job_count: same_day_jobs.len(),
                    same_day_jobs,
                })
            })
            .collect()
    }
}
