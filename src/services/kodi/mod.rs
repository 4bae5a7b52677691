//! Kodi Integration
//!
//! Talks to a Kodi media center over its JSON-RPC 2.0 web interface.
//!
//! # Overview
//!
//! - **Connection**: turn a host string (`192.168.1.10` or
//!   `http://192.168.1.10:555`) into a scheme/host/port/credentials descriptor
//! - **Client**: typed wrappers for the read-only library queries, file staging
//!   and the scan/clean triggers
//! - **Collector**: reduce the query results into [`LibraryStats`], degrading
//!   each query group to defaults independently on failure
//!
//! # Endpoint
//!
//! ```text
//! POST {scheme}://{host}:{port}/jsonrpc
//! {"jsonrpc": "2.0", "method": "VideoLibrary.GetMovies", "params": {...}, "id": 1}
//! ```
//!
//! # Usage
//!
//! ```rust,ignore
//! use crate::services::kodi::{ConnectionConfig, KodiClient, LibraryStatsCollector, RpcTimeouts};
//!
//! let connection = ConnectionConfig::from_host("http://192.168.1.10:555", None, "kodi", "secret");
//! let collector = LibraryStatsCollector::new(KodiClient::new(connection, RpcTimeouts::default())?);
//! if collector.connect().await {
//!     let stats = collector.collect().await;
//! }
//! ```
//!
//! [`LibraryStats`]: crate::models::LibraryStats

pub mod actions;
pub mod client;
pub mod collector;
pub mod connection;
pub mod types;

// Re-exports for convenience
pub use actions::{LibraryAction, LibraryActionResult};
pub use client::{KodiClient, KodiError, RpcTimeouts};
pub use collector::{
    EpisodeSource, LibraryStatsCollector, MovieCounts, MusicCounts, QueryOutcome, TvCounts,
};
pub use connection::{ConnectionConfig, Credentials, Scheme};
pub use types::{RecentAlbum, RecentEpisode, RecentMovie};
