//! Library scan/clean triggers
//!
//! Each handler fires one Kodi library action and reports the outcome as
//! `{success, message}`. Kodi runs the scan itself; the response only says
//! whether it was accepted.

use axum::{extract::State, Json};
use std::sync::Arc;

use crate::services::kodi::{LibraryAction, LibraryActionResult};
use crate::AppState;

async fn run(state: &AppState, action: LibraryAction) -> Json<LibraryActionResult> {
    Json(state.collector.client().trigger(action).await)
}

/// POST /update-video-library
pub async fn update_video_library(
    State(state): State<Arc<AppState>>,
) -> Json<LibraryActionResult> {
    run(&state, LibraryAction::ScanVideo).await
}

/// POST /update-audio-library
pub async fn update_audio_library(
    State(state): State<Arc<AppState>>,
) -> Json<LibraryActionResult> {
    run(&state, LibraryAction::ScanAudio).await
}

/// POST /clean-video-library
pub async fn clean_video_library(
    State(state): State<Arc<AppState>>,
) -> Json<LibraryActionResult> {
    run(&state, LibraryAction::CleanVideo).await
}

/// POST /clean-audio-library
pub async fn clean_audio_library(
    State(state): State<Arc<AppState>>,
) -> Json<LibraryActionResult> {
    run(&state, LibraryAction::CleanAudio).await
}
