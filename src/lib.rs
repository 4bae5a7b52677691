//! Kodi library statistics server
//!
//! Collects library counts and recently added items from a Kodi instance over
//! JSON-RPC, mirrors artwork locally and renders a refreshable status page.

pub mod config;
pub mod metrics;
pub mod models;
pub mod routes;
pub mod services;

use axum::{routing::get, routing::post, Router};
use std::sync::Arc;
use std::time::Instant;
use tower_http::{
    compression::CompressionLayer,
    cors::{Any, CorsLayer},
    services::ServeDir,
    trace::TraceLayer,
};

use crate::config::Config;
use crate::services::artwork::{ArtworkCache, ARTWORK_ROUTE};
use crate::services::kodi::{KodiClient, KodiError, LibraryStatsCollector};

/// Application state shared across handlers
pub struct AppState {
    pub config: Config,
    pub collector: LibraryStatsCollector,
    pub artwork: ArtworkCache,
    pub start_time: Instant,
}

impl AppState {
    /// Build the Kodi client and artwork cache described by `config`
    pub fn new(config: Config) -> Result<Self, KodiError> {
        let client = KodiClient::new(config.connection(), config.timeouts())?;
        let artwork = ArtworkCache::new(&config.artwork_dir);

        Ok(Self {
            config,
            collector: LibraryStatsCollector::new(client),
            artwork,
            start_time: Instant::now(),
        })
    }
}

/// HTTP surface: status page, JSON API, library actions, artwork and static
/// files
pub fn build_router(state: Arc<AppState>) -> Router {
    let artwork_dir = state.artwork.dir().to_path_buf();
    let static_dir = state.config.static_dir.clone();

    Router::new()
        // Status
        .route("/", get(routes::stats::stats_page))
        .route("/api/stats", get(routes::stats::stats_json))
        // Library actions
        .route(
            "/update-video-library",
            post(routes::library::update_video_library),
        )
        .route(
            "/update-audio-library",
            post(routes::library::update_audio_library),
        )
        .route(
            "/clean-video-library",
            post(routes::library::clean_video_library),
        )
        .route(
            "/clean-audio-library",
            post(routes::library::clean_audio_library),
        )
        // Health endpoints
        .route("/health", get(routes::health::health_check))
        .route("/live", get(routes::health::live))
        .route("/metrics", get(routes::health::metrics))
        // Mirrored artwork and static assets
        .nest_service(ARTWORK_ROUTE, ServeDir::new(artwork_dir))
        .fallback_service(ServeDir::new(static_dir))
        // Middleware
        .layer(TraceLayer::new_for_http())
        .layer(CompressionLayer::new())
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .with_state(state)
}
