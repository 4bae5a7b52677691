//! Library maintenance triggers (scan/clean)
//!
//! One-shot calls on the same RPC client used for statistics. Kodi starts the
//! job in the background and answers `"OK"` immediately.

use serde::Serialize;
use tracing::{info, warn};

use super::client::{KodiClient, KodiError};
use super::types::NoParams;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LibraryAction {
    ScanVideo,
    ScanAudio,
    CleanVideo,
    CleanAudio,
}

impl LibraryAction {
    pub fn method(&self) -> &'static str {
        match self {
            LibraryAction::ScanVideo => "VideoLibrary.Scan",
            LibraryAction::ScanAudio => "AudioLibrary.Scan",
            LibraryAction::CleanVideo => "VideoLibrary.Clean",
            LibraryAction::CleanAudio => "AudioLibrary.Clean",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            LibraryAction::ScanVideo => "Video library update",
            LibraryAction::ScanAudio => "Audio library update",
            LibraryAction::CleanVideo => "Video library clean",
            LibraryAction::CleanAudio => "Audio library clean",
        }
    }
}

/// Outcome of a library action, shaped for the JSON routes
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct LibraryActionResult {
    pub success: bool,
    pub message: String,
}

impl KodiClient {
    /// Run a scan/clean and require Kodi to acknowledge it with `"OK"`
    pub async fn run_action(&self, action: LibraryAction) -> Result<(), KodiError> {
        let result: String = self
            .call(action.method(), NoParams::default(), self.timeouts().action)
            .await?;

        if result == "OK" {
            Ok(())
        } else {
            Err(KodiError::UnexpectedResult(result))
        }
    }

    /// Run a scan/clean and fold the outcome into a displayable result
    pub async fn trigger(&self, action: LibraryAction) -> LibraryActionResult {
        match self.run_action(action).await {
            Ok(()) => {
                info!("{} started on {}", action.description(), self.connection().label());
                LibraryActionResult {
                    success: true,
                    message: format!("{} started successfully", action.description()),
                }
            }
            Err(e) => {
                warn!("{} failed: {}", action.description(), e);
                LibraryActionResult {
                    success: false,
                    message: format!("Error: {}", e),
                }
            }
        }
    }
}
