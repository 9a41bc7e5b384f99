//! Prometheus Metrics
//!
//! Counters registered against the default registry and exposed by the
//! `/metrics` endpoint. Registration happens on first touch; a duplicate
//! registration is a programmer error, hence the `expect`s.

use once_cell::sync::Lazy;
use prometheus::{
    register_int_counter, register_int_counter_vec, IntCounter, IntCounterVec,
};

/// Times the local fallback store served an operation the remote store
/// failed, labeled by operation (`load` / `save`).
pub static FALLBACK_ENGAGED: Lazy<IntCounterVec> = Lazy::new(|| {
    register_int_counter_vec!(
        "roomboard_fallback_engaged_total",
        "Operations served by the local fallback store after a remote failure",
        &["operation"]
    )
    .expect("register roomboard_fallback_engaged_total")
});

/// Individual room upserts the remote store rejected inside an otherwise
/// successful batch.
pub static REMOTE_ROW_FAILURES: Lazy<IntCounter> = Lazy::new(|| {
    register_int_counter!(
        "roomboard_remote_row_failures_total",
        "Room upserts rejected by the remote store within a batch save"
    )
    .expect("register roomboard_remote_row_failures_total")
});

/// Floor snapshots that could not be persisted to any tier.
pub static FLOOR_SAVE_FAILURES: Lazy<IntCounter> = Lazy::new(|| {
    register_int_counter!(
        "roomboard_floor_save_failures_total",
        "Floor snapshots that failed to persist to both tiers"
    )
    .expect("register roomboard_floor_save_failures_total")
});

/// Rooms captured as occupied or rented.
pub static ROOM_CAPTURES: Lazy<IntCounter> = Lazy::new(|| {
    register_int_counter!(
        "roomboard_room_captures_total",
        "Rooms captured as occupied or rented"
    )
    .expect("register roomboard_room_captures_total")
});

/// Rooms released back to available.
pub static ROOM_RELEASES: Lazy<IntCounter> = Lazy::new(|| {
    register_int_counter!(
        "roomboard_room_releases_total",
        "Rooms released back to available"
    )
    .expect("register roomboard_room_releases_total")
});
