//! cleaner-dispatch core
//!
//! Scoring-based assignment of cleaning bookings to service workers:
//! geocode the booking location, gather the day's candidate pool, estimate
//! travel, filter by working radius and time-window availability, then rank
//! by an additive, explainable score.

pub mod assignment;
pub mod availability;
pub mod distance;
pub mod geocoder;
pub mod haversine;
pub mod mapbox;
pub mod model;
pub mod pool;
pub mod scoring;
pub mod selector;
pub mod traits;
