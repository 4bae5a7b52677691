//! Status page and JSON statistics

use axum::{
    extract::State,
    http::StatusCode,
    response::{Html, IntoResponse},
    Json,
};
use std::sync::Arc;

use crate::models::StatsSummary;
use crate::services::artwork::ArtworkResolver;
use crate::services::gallery::Gallery;
use crate::services::render::{render_error_page, render_page};
use crate::AppState;

/// GET / - collect statistics and render the status page
pub async fn stats_page(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let client = state.collector.client();
    let label = client.connection().label();

    if !state.collector.connect().await {
        tracing::error!("Cannot render status page, Kodi unreachable at {}", label);
        return (
            StatusCode::INTERNAL_SERVER_ERROR,
            Html(render_error_page(&label)),
        );
    }

    let stats = state.collector.collect().await;
    let resolver = ArtworkResolver::new(client, &state.artwork);
    let gallery = Gallery::build(&stats.recently_added, Some(&resolver)).await;
    let last_updated = chrono::Local::now().format("%Y-%m-%d %H:%M:%S").to_string();

    (
        StatusCode::OK,
        Html(render_page(
            &stats,
            &gallery,
            &label,
            &last_updated,
            state.config.refresh_interval_secs,
        )),
    )
}

/// GET /api/stats - statistics summary as JSON
pub async fn stats_json(
    State(state): State<Arc<AppState>>,
) -> Result<Json<StatsSummary>, (StatusCode, Json<serde_json::Value>)> {
    if !state.collector.connect().await {
        return Err((
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(serde_json::json!({ "error": "Failed to connect to Kodi" })),
        ));
    }

    let stats = state.collector.collect().await;
    Ok(Json(stats.summary()))
}
