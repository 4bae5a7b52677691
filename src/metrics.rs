//! Prometheus metrics
//!
//! Registered on the default registry, exported by `GET /metrics`.

use lazy_static::lazy_static;
use prometheus::{register_int_counter_vec, register_int_gauge_vec, IntCounterVec, IntGaugeVec};

use crate::models::LibraryStats;

lazy_static! {
    /// JSON-RPC calls by method and outcome (ok, network, http, rpc, parse, empty)
    pub static ref RPC_REQUESTS_TOTAL: IntCounterVec = register_int_counter_vec!(
        "kodi_rpc_requests_total",
        "Total Kodi JSON-RPC requests",
        &["method", "outcome"]
    )
    .expect("Failed to create kodi_rpc_requests_total metric");

    /// Artwork resolutions by outcome (passthrough, cached, downloaded, missing)
    pub static ref ARTWORK_RESOLUTIONS_TOTAL: IntCounterVec = register_int_counter_vec!(
        "kodi_artwork_resolutions_total",
        "Total artwork references resolved",
        &["outcome"]
    )
    .expect("Failed to create kodi_artwork_resolutions_total metric");

    /// Query groups that fell back to defaults
    pub static ref QUERY_GROUP_DEGRADED_TOTAL: IntCounterVec = register_int_counter_vec!(
        "kodi_query_group_degraded_total",
        "Total query groups degraded to default values",
        &["group"]
    )
    .expect("Failed to create kodi_query_group_degraded_total metric");

    /// Last collected library sizes
    pub static ref LIBRARY_ITEMS: IntGaugeVec = register_int_gauge_vec!(
        "kodi_library_items",
        "Library item counts from the last collection",
        &["kind"]
    )
    .expect("Failed to create kodi_library_items metric");
}

pub fn record_rpc(method: &str, outcome: &str) {
    RPC_REQUESTS_TOTAL.with_label_values(&[method, outcome]).inc();
}

pub fn record_artwork(outcome: &str) {
    ARTWORK_RESOLUTIONS_TOTAL.with_label_values(&[outcome]).inc();
}

pub fn record_degraded(group: &str) {
    QUERY_GROUP_DEGRADED_TOTAL.with_label_values(&[group]).inc();
}

/// Publish the counts of a finished collection
pub fn record_library(stats: &LibraryStats) {
    let gauges = [
        ("movies", stats.total_movies),
        ("movies_watched", stats.watched_movies),
        ("tv_shows", stats.total_tv_shows),
        ("episodes", stats.total_episodes),
        ("episodes_watched", stats.watched_episodes),
        ("artists", stats.total_artists),
        ("albums", stats.total_albums),
        ("songs", stats.total_songs),
    ];

    for (kind, value) in gauges {
        LIBRARY_ITEMS
            .with_label_values(&[kind])
            .set(i64::try_from(value).unwrap_or(i64::MAX));
    }
}
