//! Kodi JSON-RPC Client
//!
//! HTTP client for the Kodi JSON-RPC 2.0 endpoint (`/jsonrpc`).

use super::connection::ConnectionConfig;
use super::types::*;
use crate::metrics;
use reqwest::{header::CONTENT_TYPE, Client, RequestBuilder, Response, StatusCode};
use serde::{de::DeserializeOwned, Serialize};
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, error, info, warn};

/// Properties requested for recently added episodes
const RECENT_EPISODE_PROPERTIES: &[&str] =
    &["title", "showtitle", "season", "episode", "dateadded", "art"];

/// Properties requested for recently added movies
const RECENT_MOVIE_PROPERTIES: &[&str] = &["title", "year", "dateadded", "art", "rating"];

/// Properties requested for recently added albums
const RECENT_ALBUM_PROPERTIES: &[&str] = &["title", "artist", "year", "dateadded", "art"];

/// Per-call timeouts
#[derive(Debug, Clone, Copy)]
pub struct RpcTimeouts {
    /// Regular calls and the connectivity probe
    pub request: Duration,
    /// `VideoLibrary.GetStatistics`
    pub statistics: Duration,
    /// Full episode enumeration fallback
    pub enumeration: Duration,
    /// Library scan/clean triggers
    pub action: Duration,
    /// Artwork downloads
    pub download: Duration,
}

impl Default for RpcTimeouts {
    fn default() -> Self {
        Self {
            request: Duration::from_secs(10),
            statistics: Duration::from_secs(30),
            enumeration: Duration::from_secs(120),
            action: Duration::from_secs(30),
            download: Duration::from_secs(10),
        }
    }
}

/// Kodi JSON-RPC client
///
/// Holds no library state: every method performs one remote call.
pub struct KodiClient {
    http: Client,
    connection: ConnectionConfig,
    rpc_url: String,
    timeouts: RpcTimeouts,
}

impl KodiClient {
    /// Create a new client for the given connection
    pub fn new(connection: ConnectionConfig, timeouts: RpcTimeouts) -> Result<Self, KodiError> {
        let http = Client::builder()
            .danger_accept_invalid_certs(true) // Kodi's https mode uses self-signed certs
            .build()?;

        let rpc_url = connection.rpc_url();

        Ok(Self {
            http,
            connection,
            rpc_url,
            timeouts,
        })
    }

    pub fn connection(&self) -> &ConnectionConfig {
        &self.connection
    }

    pub fn timeouts(&self) -> &RpcTimeouts {
        &self.timeouts
    }

    fn authorize(&self, request: RequestBuilder) -> RequestBuilder {
        match &self.connection.credentials {
            Some(creds) => request.basic_auth(&creds.username, Some(&creds.password)),
            None => request,
        }
    }

    /// Make a JSON-RPC call and decode `result` into `T`
    pub(crate) async fn call<P, T>(
        &self,
        method: &str,
        params: P,
        timeout: Duration,
    ) -> Result<T, KodiError>
    where
        P: Serialize,
        T: DeserializeOwned,
    {
        let result = self.send_rpc(method, params, timeout).await;
        let outcome = match &result {
            Ok(_) => "ok",
            Err(e) => e.kind(),
        };
        metrics::record_rpc(method, outcome);
        result
    }

    async fn send_rpc<P, T>(&self, method: &str, params: P, timeout: Duration) -> Result<T, KodiError>
    where
        P: Serialize,
        T: DeserializeOwned,
    {
        let body = serde_json::to_vec(&RpcRequest::new(method, params))
            .map_err(|e| KodiError::Parse(e.to_string()))?;

        debug!("Kodi RPC request: {}", method);

        let request = self
            .http
            .post(&self.rpc_url)
            .header(CONTENT_TYPE, "application/json")
            .timeout(timeout)
            .body(body);

        let response = self.authorize(request).send().await?;

        let status = response.status();
        if !status.is_success() {
            return Err(KodiError::Http(status.as_u16()));
        }

        let text = response.text().await?;

        let envelope: RpcResponse<T> = serde_json::from_str(&text).map_err(|e| {
            error!("Failed to parse Kodi response for '{}': {}", method, e);
            debug!("Response text: {}", text.chars().take(500).collect::<String>());
            KodiError::Parse(e.to_string())
        })?;

        if let Some(err) = envelope.error {
            return Err(KodiError::Rpc {
                code: err.code,
                message: err.message,
            });
        }

        envelope.result.ok_or(KodiError::EmptyResponse)
    }

    // ========================================================================
    // Application
    // ========================================================================

    /// `Application.GetProperties` for the version
    pub async fn application_version(&self) -> Result<ApplicationVersion, KodiError> {
        let props: ApplicationProperties = self
            .call(
                "Application.GetProperties",
                PropertiesParams {
                    properties: vec!["version"],
                },
                self.timeouts.request,
            )
            .await?;
        Ok(props.version)
    }

    /// Connectivity probe: true only when Kodi answers with a version
    pub async fn connect(&self) -> bool {
        match self.application_version().await {
            Ok(version) => {
                info!(
                    "Connected to Kodi {}.{} at {}",
                    version.major,
                    version.minor,
                    self.connection.label()
                );
                true
            }
            Err(e) => {
                warn!("Failed to connect to Kodi at {}: {}", self.connection.label(), e);
                false
            }
        }
    }

    // ========================================================================
    // Video library
    // ========================================================================

    /// All movies with their play counts
    pub async fn get_movies(&self) -> Result<MoviesPage, KodiError> {
        self.call(
            "VideoLibrary.GetMovies",
            ListParams::new(&["playcount"], Limits::unbounded()),
            self.timeouts.request,
        )
        .await
    }

    /// TV show listing, only the paging envelope is kept
    pub async fn get_tv_shows_total(&self) -> Result<PagedTotal, KodiError> {
        self.call(
            "VideoLibrary.GetTVShows",
            ListParams::new(&[], Limits::unbounded()),
            self.timeouts.request,
        )
        .await
    }

    /// Aggregate library statistics
    pub async fn get_video_statistics(&self) -> Result<VideoStatistics, KodiError> {
        self.call(
            "VideoLibrary.GetStatistics",
            NoParams::default(),
            self.timeouts.statistics,
        )
        .await
    }

    /// All episodes with their play counts (slow on large libraries)
    pub async fn get_episodes(&self) -> Result<EpisodesPage, KodiError> {
        self.call(
            "VideoLibrary.GetEpisodes",
            ListParams::new(&["playcount"], Limits::unbounded()),
            self.timeouts.enumeration,
        )
        .await
    }

    pub async fn get_recently_added_episodes(&self) -> Result<Vec<RecentEpisode>, KodiError> {
        let page: RecentEpisodesPage = self
            .call(
                "VideoLibrary.GetRecentlyAddedEpisodes",
                ListParams::new(RECENT_EPISODE_PROPERTIES, recent_limits()),
                self.timeouts.request,
            )
            .await?;
        Ok(page.episodes)
    }

    pub async fn get_recently_added_movies(&self) -> Result<Vec<RecentMovie>, KodiError> {
        let page: RecentMoviesPage = self
            .call(
                "VideoLibrary.GetRecentlyAddedMovies",
                ListParams::new(RECENT_MOVIE_PROPERTIES, recent_limits()),
                self.timeouts.request,
            )
            .await?;
        Ok(page.movies)
    }

    // ========================================================================
    // Audio library
    // ========================================================================

    pub async fn get_artists_total(&self) -> Result<PagedTotal, KodiError> {
        self.paged_total("AudioLibrary.GetArtists").await
    }

    pub async fn get_albums_total(&self) -> Result<PagedTotal, KodiError> {
        self.paged_total("AudioLibrary.GetAlbums").await
    }

    pub async fn get_songs_total(&self) -> Result<PagedTotal, KodiError> {
        self.paged_total("AudioLibrary.GetSongs").await
    }

    async fn paged_total(&self, method: &str) -> Result<PagedTotal, KodiError> {
        self.call(
            method,
            ListParams::new(&[], Limits::unbounded()),
            self.timeouts.request,
        )
        .await
    }

    pub async fn get_recently_added_albums(&self) -> Result<Vec<RecentAlbum>, KodiError> {
        let page: RecentAlbumsPage = self
            .call(
                "AudioLibrary.GetRecentlyAddedAlbums",
                ListParams::new(RECENT_ALBUM_PROPERTIES, recent_limits()),
                self.timeouts.request,
            )
            .await?;
        Ok(page.albums)
    }

    // ========================================================================
    // Files
    // ========================================================================

    /// Ask Kodi to stage an internal resource (e.g. `image://...`) for download
    pub async fn prepare_download(&self, path: &str) -> Result<PrepareDownload, KodiError> {
        self.call(
            "Files.PrepareDownload",
            PrepareDownloadParams { path },
            self.timeouts.request,
        )
        .await
    }

    /// GET an absolute URL with the connection's credentials.
    ///
    /// Only a `200 OK` counts as success.
    pub async fn fetch(&self, url: &str) -> Result<Response, KodiError> {
        let request = self.http.get(url).timeout(self.timeouts.download);
        let response = self.authorize(request).send().await?;

        let status = response.status();
        if status != StatusCode::OK {
            return Err(KodiError::Http(status.as_u16()));
        }

        Ok(response)
    }
}

fn recent_limits() -> Limits {
    Limits::first(RECENTLY_ADDED_LIMIT as u32)
}

/// Kodi client error types
#[derive(Debug, Error)]
pub enum KodiError {
    /// Network/connection error, including timeouts
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),
    /// HTTP error (non-2xx status, or non-200 for downloads)
    #[error("HTTP error: {0}")]
    Http(u16),
    /// JSON-RPC error object
    #[error("RPC error {code}: {message}")]
    Rpc { code: i64, message: String },
    /// Malformed or unexpected JSON
    #[error("Parse error: {0}")]
    Parse(String),
    /// Response without a `result`
    #[error("Empty response")]
    EmptyResponse,
    /// Well-formed result with an unexpected value
    #[error("Unexpected result: {0}")]
    UnexpectedResult(String),
    /// Local filesystem error (artwork cache)
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl KodiError {
    /// Short label used for metrics
    pub fn kind(&self) -> &'static str {
        match self {
            KodiError::Network(_) => "network",
            KodiError::Http(_) => "http",
            KodiError::Rpc { .. } => "rpc",
            KodiError::Parse(_) => "parse",
            KodiError::EmptyResponse => "empty",
            KodiError::UnexpectedResult(_) => "unexpected",
            KodiError::Io(_) => "io",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_rpc_url() {
        let conn = ConnectionConfig::from_host("http://kodi.local:8080/", None, "", "");
        let client = KodiClient::new(conn, RpcTimeouts::default()).unwrap();
        assert_eq!(client.rpc_url, "http://kodi.local:8080/jsonrpc");
    }

    #[test]
    fn test_default_timeouts() {
        let timeouts = RpcTimeouts::default();
        assert_eq!(timeouts.request, Duration::from_secs(10));
        assert_eq!(timeouts.statistics, Duration::from_secs(30));
        assert_eq!(timeouts.enumeration, Duration::from_secs(120));
    }

    #[test]
    fn test_error_kinds() {
        assert_eq!(KodiError::Http(401).kind(), "http");
        assert_eq!(KodiError::EmptyResponse.kind(), "empty");
        assert_eq!(
            KodiError::Rpc {
                code: -32601,
                message: "Method not found.".to_string()
            }
            .to_string(),
            "RPC error -32601: Method not found."
        );
    }
}
