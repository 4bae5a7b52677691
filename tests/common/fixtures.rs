//! Canned Kodi responses and client helpers

use kodi_stats_server::services::kodi::{
    ConnectionConfig, KodiClient, LibraryStatsCollector, RpcTimeouts,
};
use serde_json::{json, Value};
use std::time::Duration;

use super::mock_kodi::{MockKodi, MockKodiBuilder};

pub const VERSION: &str = "Application.GetProperties";
pub const MOVIES: &str = "VideoLibrary.GetMovies";
pub const TV_SHOWS: &str = "VideoLibrary.GetTVShows";
pub const STATISTICS: &str = "VideoLibrary.GetStatistics";
pub const EPISODES: &str = "VideoLibrary.GetEpisodes";
pub const RECENT_EPISODES: &str = "VideoLibrary.GetRecentlyAddedEpisodes";
pub const RECENT_MOVIES: &str = "VideoLibrary.GetRecentlyAddedMovies";
pub const RECENT_ALBUMS: &str = "AudioLibrary.GetRecentlyAddedAlbums";
pub const ARTISTS: &str = "AudioLibrary.GetArtists";
pub const ALBUMS: &str = "AudioLibrary.GetAlbums";
pub const SONGS: &str = "AudioLibrary.GetSongs";
pub const PREPARE_DOWNLOAD: &str = "Files.PrepareDownload";

/// `{"limits": {...}, <key>: [...]}` list result
pub fn paged(key: &str, items: Vec<Value>, total: u64) -> Value {
    let mut result = json!({
        "limits": {"start": 0, "end": items.len(), "total": total}
    });
    result[key] = Value::Array(items);
    result
}

/// `count` entries with play counts, the first `watched` of them watched
pub fn playcounts(count: usize, watched: usize) -> Vec<Value> {
    (0..count)
        .map(|i| json!({"playcount": if i < watched { 1 } else { 0 }}))
        .collect()
}

pub fn total_only(total: u64) -> Value {
    json!({"limits": {"start": 0, "end": 0, "total": total}})
}

/// A healthy small library: 10 movies (4 watched), 3 shows, 30 episodes
/// (12 watched), 5 artists, 8 albums, 96 songs, and nothing recently added
pub fn healthy_library() -> MockKodiBuilder {
    MockKodi::builder()
        .result(VERSION, json!({"version": {"major": 21, "minor": 1}}))
        .result(MOVIES, paged("movies", playcounts(10, 4), 10))
        .result(TV_SHOWS, total_only(3))
        .result(
            STATISTICS,
            json!({"statistics": {"episode": 30, "episode.watched": 12}}),
        )
        .result(ARTISTS, total_only(5))
        .result(ALBUMS, total_only(8))
        .result(SONGS, total_only(96))
        .result(RECENT_EPISODES, paged("episodes", Vec::new(), 0))
        .result(RECENT_MOVIES, paged("movies", Vec::new(), 0))
        .result(RECENT_ALBUMS, paged("albums", Vec::new(), 0))
}

/// Short timeouts so failure paths stay fast
pub fn test_timeouts() -> RpcTimeouts {
    RpcTimeouts {
        request: Duration::from_secs(2),
        statistics: Duration::from_secs(2),
        enumeration: Duration::from_secs(2),
        action: Duration::from_secs(2),
        download: Duration::from_secs(2),
    }
}

pub fn client_for(mock: &MockKodi) -> KodiClient {
    client_with_auth(mock, "", "")
}

pub fn client_with_auth(mock: &MockKodi, username: &str, password: &str) -> KodiClient {
    let connection = ConnectionConfig::from_host(&mock.base_url, None, username, password);
    KodiClient::new(connection, test_timeouts()).expect("Failed to build Kodi client")
}

pub fn collector_for(mock: &MockKodi) -> LibraryStatsCollector {
    LibraryStatsCollector::new(client_for(mock))
}

/// A port nothing is listening on
pub async fn unused_port() -> u16 {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind to random port");
    listener
        .local_addr()
        .expect("Failed to get local address")
        .port()
}

pub async fn unreachable_client() -> KodiClient {
    let connection = ConnectionConfig::from_host("127.0.0.1", Some(unused_port().await), "", "");
    KodiClient::new(connection, test_timeouts()).expect("Failed to build Kodi client")
}
