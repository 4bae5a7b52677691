//! Kodi JSON-RPC Types
//!
//! Request envelope plus the response shapes of the methods used for library
//! statistics. Fields Kodi may omit are `#[serde(default)]`; a response that
//! lacks a required field is treated as malformed.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Page size used when a query wants "everything"
pub const UNBOUNDED_PAGE: u32 = 100_000;

/// Maximum number of recently added items kept per kind
pub const RECENTLY_ADDED_LIMIT: usize = 10;

// ============================================================================
// Envelope
// ============================================================================

/// JSON-RPC 2.0 request
#[derive(Debug, Serialize)]
pub struct RpcRequest<'a, P: Serialize> {
    pub jsonrpc: &'static str,
    pub method: &'a str,
    pub params: P,
    pub id: u32,
}

impl<'a, P: Serialize> RpcRequest<'a, P> {
    pub fn new(method: &'a str, params: P) -> Self {
        Self {
            jsonrpc: "2.0",
            method,
            params,
            id: 1,
        }
    }
}

/// JSON-RPC 2.0 response; exactly one of `result`/`error` is expected
#[derive(Debug, Deserialize)]
pub struct RpcResponse<T> {
    pub result: Option<T>,
    pub error: Option<RpcErrorBody>,
}

#[derive(Debug, Deserialize)]
pub struct RpcErrorBody {
    pub code: i64,
    pub message: String,
}

/// Parameterless call
#[derive(Debug, Serialize, Default)]
pub struct NoParams {}

// ============================================================================
// Request parameters
// ============================================================================

/// Paging request (`end` is exclusive)
#[derive(Debug, Serialize, Clone, Copy)]
pub struct Limits {
    pub start: u32,
    pub end: u32,
}

impl Limits {
    pub fn first(count: u32) -> Self {
        Self { start: 0, end: count }
    }

    pub fn unbounded() -> Self {
        Self::first(UNBOUNDED_PAGE)
    }
}

/// Parameters shared by the list methods
#[derive(Debug, Serialize)]
pub struct ListParams {
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub properties: Vec<&'static str>,
    pub limits: Limits,
}

impl ListParams {
    pub fn new(properties: &[&'static str], limits: Limits) -> Self {
        Self {
            properties: properties.to_vec(),
            limits,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct PropertiesParams {
    pub properties: Vec<&'static str>,
}

#[derive(Debug, Serialize)]
pub struct PrepareDownloadParams<'a> {
    pub path: &'a str,
}

// ============================================================================
// Application
// ============================================================================

#[derive(Debug, Deserialize, Clone)]
pub struct ApplicationProperties {
    pub version: ApplicationVersion,
}

#[derive(Debug, Deserialize, Clone, PartialEq, Eq)]
pub struct ApplicationVersion {
    pub major: u32,
    pub minor: u32,
    #[serde(default)]
    pub tag: Option<String>,
}

// ============================================================================
// Paging envelope
// ============================================================================

/// Server-side paging info; `total` is the library size, independent of how
/// many entries were returned
#[derive(Debug, Deserialize, Clone, Copy, Default)]
pub struct LimitsReturned {
    #[serde(default)]
    pub start: u64,
    #[serde(default)]
    pub end: u64,
    #[serde(default)]
    pub total: u64,
}

/// Any list response where only the envelope matters
#[derive(Debug, Deserialize, Clone, Copy, Default)]
pub struct PagedTotal {
    #[serde(default)]
    pub limits: LimitsReturned,
}

/// An entry carrying only a play count
#[derive(Debug, Deserialize, Clone, Copy, Default)]
pub struct PlayCountEntry {
    #[serde(default)]
    pub playcount: u64,
}

impl PlayCountEntry {
    pub fn is_watched(&self) -> bool {
        self.playcount > 0
    }
}

#[derive(Debug, Deserialize, Clone, Default)]
pub struct MoviesPage {
    #[serde(default)]
    pub movies: Vec<PlayCountEntry>,
    #[serde(default)]
    pub limits: LimitsReturned,
}

#[derive(Debug, Deserialize, Clone, Default)]
pub struct EpisodesPage {
    #[serde(default)]
    pub episodes: Vec<PlayCountEntry>,
    #[serde(default)]
    pub limits: LimitsReturned,
}

// ============================================================================
// Aggregate statistics
// ============================================================================

/// `VideoLibrary.GetStatistics` result. `statistics.episode` is required;
/// without it the response is malformed and callers fall back to enumeration.
#[derive(Debug, Deserialize, Clone)]
pub struct VideoStatistics {
    pub statistics: StatisticsCounts,
}

#[derive(Debug, Deserialize, Clone)]
pub struct StatisticsCounts {
    pub episode: u64,
    #[serde(default, rename = "episode.watched")]
    pub episode_watched: u64,
}

// ============================================================================
// Recently added
// ============================================================================

/// Artwork map (`poster`, `thumb`, `fanart`, ...)
pub type ArtMap = HashMap<String, String>;

#[derive(Debug, Deserialize, Serialize, Clone, Default)]
pub struct RecentEpisode {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub showtitle: Option<String>,
    #[serde(default)]
    pub season: Option<i64>,
    #[serde(default)]
    pub episode: Option<i64>,
    #[serde(default)]
    pub dateadded: Option<String>,
    #[serde(default)]
    pub art: ArtMap,
}

impl RecentEpisode {
    pub fn artwork(&self) -> Option<&str> {
        non_empty(self.art.get("thumb"))
    }
}

#[derive(Debug, Deserialize, Serialize, Clone, Default)]
pub struct RecentMovie {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub year: Option<i64>,
    #[serde(default)]
    pub dateadded: Option<String>,
    #[serde(default)]
    pub art: ArtMap,
    #[serde(default)]
    pub rating: Option<f64>,
}

impl RecentMovie {
    pub fn artwork(&self) -> Option<&str> {
        non_empty(self.art.get("poster"))
    }
}

#[derive(Debug, Deserialize, Serialize, Clone, Default)]
pub struct RecentAlbum {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub artist: Vec<String>,
    #[serde(default)]
    pub year: Option<i64>,
    #[serde(default)]
    pub dateadded: Option<String>,
    #[serde(default)]
    pub art: ArtMap,
}

impl RecentAlbum {
    pub fn artwork(&self) -> Option<&str> {
        non_empty(self.art.get("thumb"))
    }
}

fn non_empty(value: Option<&String>) -> Option<&str> {
    value.map(String::as_str).filter(|s| !s.is_empty())
}

#[derive(Debug, Deserialize, Clone, Default)]
pub struct RecentEpisodesPage {
    #[serde(default)]
    pub episodes: Vec<RecentEpisode>,
}

#[derive(Debug, Deserialize, Clone, Default)]
pub struct RecentMoviesPage {
    #[serde(default)]
    pub movies: Vec<RecentMovie>,
}

#[derive(Debug, Deserialize, Clone, Default)]
pub struct RecentAlbumsPage {
    #[serde(default)]
    pub albums: Vec<RecentAlbum>,
}

// ============================================================================
// Files
// ============================================================================

#[derive(Debug, Deserialize, Clone)]
pub struct PrepareDownload {
    #[serde(default)]
    pub details: Option<DownloadDetails>,
    #[serde(default)]
    pub protocol: Option<String>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct DownloadDetails {
    #[serde(default)]
    pub path: Option<String>,
}

impl PrepareDownload {
    /// Relative download path, if the server staged one
    pub fn path(&self) -> Option<&str> {
        self.details
            .as_ref()?
            .path
            .as_deref()
            .filter(|p| !p.is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_request_envelope() {
        let request = RpcRequest::new(
            "VideoLibrary.GetMovies",
            ListParams::new(&["playcount"], Limits::unbounded()),
        );
        let value = serde_json::to_value(&request).unwrap();
        assert_eq!(
            value,
            json!({
                "jsonrpc": "2.0",
                "method": "VideoLibrary.GetMovies",
                "params": {
                    "properties": ["playcount"],
                    "limits": {"start": 0, "end": 100000}
                },
                "id": 1
            })
        );
    }

    #[test]
    fn test_response_envelope_for_non_default_result() {
        // ApplicationProperties has no Default; missing fields still decode as None
        let ok: RpcResponse<ApplicationProperties> = serde_json::from_value(json!({
            "jsonrpc": "2.0",
            "id": 1,
            "result": {"version": {"major": 21, "minor": 1}}
        }))
        .unwrap();
        assert_eq!(ok.result.unwrap().version.major, 21);
        assert!(ok.error.is_none());

        let failed: RpcResponse<ApplicationProperties> = serde_json::from_value(json!({
            "jsonrpc": "2.0",
            "id": 1,
            "error": {"code": -32601, "message": "Method not found."}
        }))
        .unwrap();
        assert!(failed.result.is_none());
        assert_eq!(failed.error.unwrap().code, -32601);
    }

    #[test]
    fn test_list_params_without_properties() {
        let value = serde_json::to_value(ListParams::new(&[], Limits::unbounded())).unwrap();
        assert_eq!(value, json!({"limits": {"start": 0, "end": 100000}}));
    }

    #[test]
    fn test_statistics_requires_episode_count() {
        let ok: VideoStatistics = serde_json::from_value(json!({
            "statistics": {"episode": 300, "episode.watched": 120}
        }))
        .unwrap();
        assert_eq!(ok.statistics.episode, 300);
        assert_eq!(ok.statistics.episode_watched, 120);

        let malformed = serde_json::from_value::<VideoStatistics>(json!({"statistics": {}}));
        assert!(malformed.is_err());
    }

    #[test]
    fn test_artwork_selection_per_kind() {
        let movie: RecentMovie = serde_json::from_value(json!({
            "title": "Heat",
            "art": {"poster": "image://poster/", "thumb": "image://thumb/"}
        }))
        .unwrap();
        assert_eq!(movie.artwork(), Some("image://poster/"));

        let album: RecentAlbum = serde_json::from_value(json!({
            "title": "Kind of Blue",
            "art": {"thumb": ""}
        }))
        .unwrap();
        assert_eq!(album.artwork(), None);
    }

    #[test]
    fn test_prepare_download_path() {
        let staged: PrepareDownload = serde_json::from_value(json!({
            "details": {"path": "vfs/image%3A%2F%2Fposter.jpg%2F"},
            "mode": "redirect",
            "protocol": "http"
        }))
        .unwrap();
        assert_eq!(staged.path(), Some("vfs/image%3A%2F%2Fposter.jpg%2F"));

        let empty: PrepareDownload = serde_json::from_value(json!({"details": {}})).unwrap();
        assert_eq!(empty.path(), None);
    }
}
