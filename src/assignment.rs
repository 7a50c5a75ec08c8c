//! Assignment guard.
//!
//! Selection holds no reservation, so two concurrent bookings for the same
//! slot can both pick the same worker. The write that persists an assignment
//! must therefore be conditional: claim the (worker, date, hour) slot only if
//! it is still unclaimed. [`SlotLedger`] is the in-memory form of that
//! conditional update; database-backed consumers need the equivalent
//! transactional check.

use std::collections::HashSet;
use std::sync::Mutex;

use crate::model::hour_of;

/// Tracks claimed (worker, date, hour) slots. Claims are atomic
/// check-and-insert, so at most one caller wins a given slot.
#[derive(Debug, Default)]
pub struct SlotLedger {
    claims: Mutex<HashSet<(String, i64, u32)>>,
}

impl SlotLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Claim the slot for a worker. Returns false if the slot is already
    /// claimed or the time cannot be parsed.
    pub fn try_claim(&self, worker_id: &str, date: i64, time: &str) -> bool {
        let Some(hour) = hour_of(time) else {
            return false;
        };
        let mut claims = self.claims.lock().unwrap_or_else(|e| e.into_inner());
        claims.insert((worker_id.to_string(), date, hour))
    }

    /// Release a previously claimed slot, e.g. on booking cancellation.
    /// Returns true if the slot was held.
    pub fn release(&self, worker_id: &str, date: i64, time: &str) -> bool {
        let Some(hour) = hour_of(time) else {
            return false;
        };
        let mut claims = self.claims.lock().unwrap_or_else(|e| e.into_inner());
        claims.remove(&(worker_id.to_string(), date, hour))
    }

    pub fn is_claimed(&self, worker_id: &str, date: i64, time: &str) -> bool {
        let Some(hour) = hour_of(time) else {
            return false;
        };
        let claims = self.claims.lock().unwrap_or_else(|e| e.into_inner());
        claims.contains(&(worker_id.to_string(), date, hour))
    }
}
