//! Library statistics collection
//!
//! Runs four independent query groups one after another (movies, TV, music,
//! recently added). A failing group degrades to its default value and never
//! stops the others.

use tracing::{debug, info, warn};

use super::client::{KodiClient, KodiError};
use super::types::{EpisodesPage, MoviesPage, RECENTLY_ADDED_LIMIT};
use crate::metrics;
use crate::models::{LibraryStats, QueryGroup, RecentlyAdded};

/// Result of one query group: either fully fetched, or degraded to a default
/// (possibly keeping the sub-results that did succeed)
#[derive(Debug)]
pub enum QueryOutcome<T> {
    Fetched(T),
    Degraded { value: T, reason: String },
}

impl<T> QueryOutcome<T> {
    pub fn value(&self) -> &T {
        match self {
            QueryOutcome::Fetched(value) => value,
            QueryOutcome::Degraded { value, .. } => value,
        }
    }

    pub fn into_value(self) -> T {
        match self {
            QueryOutcome::Fetched(value) => value,
            QueryOutcome::Degraded { value, .. } => value,
        }
    }

    pub fn is_degraded(&self) -> bool {
        matches!(self, QueryOutcome::Degraded { .. })
    }
}

/// Tracks sub-call failures inside a group
struct GroupErrors {
    reasons: Vec<String>,
}

impl GroupErrors {
    fn new() -> Self {
        Self {
            reasons: Vec::new(),
        }
    }

    /// Unwrap a sub-call result, falling back to `T::default()` on error
    fn take<T: Default>(&mut self, what: &str, result: Result<T, KodiError>) -> T {
        match result {
            Ok(value) => value,
            Err(e) => {
                self.record(what, e);
                T::default()
            }
        }
    }

    fn record(&mut self, what: &str, error: KodiError) {
        self.reasons.push(format!("{}: {}", what, error));
    }

    fn finish<T>(self, value: T) -> QueryOutcome<T> {
        if self.reasons.is_empty() {
            QueryOutcome::Fetched(value)
        } else {
            QueryOutcome::Degraded {
                value,
                reason: self.reasons.join("; "),
            }
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MovieCounts {
    pub total: u64,
    pub watched: u64,
}

/// Where the episode totals came from
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum EpisodeSource {
    Statistics,
    Enumeration,
    #[default]
    Unavailable,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TvCounts {
    pub shows: u64,
    pub episodes: u64,
    pub watched_episodes: u64,
    pub episode_source: EpisodeSource,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MusicCounts {
    pub artists: u64,
    pub albums: u64,
    pub songs: u64,
}

/// Collects library statistics from a Kodi instance
pub struct LibraryStatsCollector {
    client: KodiClient,
}

impl LibraryStatsCollector {
    pub fn new(client: KodiClient) -> Self {
        Self { client }
    }

    pub fn client(&self) -> &KodiClient {
        &self.client
    }

    /// Advisory connectivity probe, see [`KodiClient::connect`]
    pub async fn connect(&self) -> bool {
        self.client.connect().await
    }

    /// Movie totals: `total` from the paging envelope, `watched` from the
    /// returned entries. A server that caps the array undercounts `watched`.
    pub async fn movie_statistics(&self) -> QueryOutcome<MovieCounts> {
        debug!("Fetching movie statistics");
        let mut errors = GroupErrors::new();
        let page: MoviesPage = errors.take("movies", self.client.get_movies().await);

        errors.finish(MovieCounts {
            total: page.limits.total,
            watched: page.movies.iter().filter(|m| m.is_watched()).count() as u64,
        })
    }

    /// TV show and episode totals.
    ///
    /// Episode totals come from `VideoLibrary.GetStatistics` when it answers
    /// with a well-formed payload; any failure there falls back to a full
    /// episode enumeration.
    pub async fn tv_statistics(&self) -> QueryOutcome<TvCounts> {
        debug!("Fetching TV show statistics");
        let mut errors = GroupErrors::new();

        let shows = errors
            .take("tv shows", self.client.get_tv_shows_total().await)
            .limits
            .total;

        let mut counts = TvCounts {
            shows,
            ..Default::default()
        };

        match self.client.get_video_statistics().await {
            Ok(stats) => {
                debug!(
                    "Using GetStatistics: {} episodes, {} watched",
                    stats.statistics.episode, stats.statistics.episode_watched
                );
                counts.episodes = stats.statistics.episode;
                counts.watched_episodes = stats.statistics.episode_watched;
                counts.episode_source = EpisodeSource::Statistics;
            }
            Err(e) => {
                info!("GetStatistics unavailable ({}), enumerating episodes", e);
                match self.client.get_episodes().await {
                    Ok(page) => {
                        let (total, watched) = episode_counts(&page);
                        counts.episodes = total;
                        counts.watched_episodes = watched;
                        counts.episode_source = EpisodeSource::Enumeration;
                    }
                    Err(e) => errors.record("episodes", e),
                }
            }
        }

        errors.finish(counts)
    }

    /// Artist, album and song totals, each looked up independently
    pub async fn music_statistics(&self) -> QueryOutcome<MusicCounts> {
        debug!("Fetching music statistics");
        let mut errors = GroupErrors::new();

        let artists = errors.take("artists", self.client.get_artists_total().await);
        let albums = errors.take("albums", self.client.get_albums_total().await);
        let songs = errors.take("songs", self.client.get_songs_total().await);

        errors.finish(MusicCounts {
            artists: artists.limits.total,
            albums: albums.limits.total,
            songs: songs.limits.total,
        })
    }

    /// Newest episodes, movies and albums, each list capped locally
    pub async fn recently_added(&self) -> QueryOutcome<RecentlyAdded> {
        debug!("Fetching recently added content");
        let mut errors = GroupErrors::new();

        let mut episodes = errors.take(
            "recent episodes",
            self.client.get_recently_added_episodes().await,
        );
        let mut movies = errors.take(
            "recent movies",
            self.client.get_recently_added_movies().await,
        );
        let mut albums = errors.take(
            "recent albums",
            self.client.get_recently_added_albums().await,
        );

        episodes.truncate(RECENTLY_ADDED_LIMIT);
        movies.truncate(RECENTLY_ADDED_LIMIT);
        albums.truncate(RECENTLY_ADDED_LIMIT);

        errors.finish(RecentlyAdded {
            episodes,
            movies,
            albums,
        })
    }

    /// Run every query group and reduce them into [`LibraryStats`]
    pub async fn collect(&self) -> LibraryStats {
        let mut stats = LibraryStats::default();

        let movies = self.movie_statistics().await;
        note_degraded(&mut stats, QueryGroup::Movies, &movies);
        let movies = movies.into_value();
        stats.total_movies = movies.total;
        stats.watched_movies = movies.watched;

        let tv = self.tv_statistics().await;
        note_degraded(&mut stats, QueryGroup::Tv, &tv);
        let tv = tv.into_value();
        stats.total_tv_shows = tv.shows;
        stats.total_episodes = tv.episodes;
        stats.watched_episodes = tv.watched_episodes;

        let music = self.music_statistics().await;
        note_degraded(&mut stats, QueryGroup::Music, &music);
        let music = music.into_value();
        stats.total_artists = music.artists;
        stats.total_albums = music.albums;
        stats.total_songs = music.songs;

        let recent = self.recently_added().await;
        note_degraded(&mut stats, QueryGroup::RecentlyAdded, &recent);
        stats.recently_added = recent.into_value();

        metrics::record_library(&stats);
        info!(
            movies = stats.total_movies,
            episodes = stats.total_episodes,
            songs = stats.total_songs,
            degraded = stats.degraded.len(),
            "Library statistics collected"
        );

        stats
    }
}

fn episode_counts(page: &EpisodesPage) -> (u64, u64) {
    let watched = page.episodes.iter().filter(|e| e.is_watched()).count() as u64;
    (page.limits.total, watched)
}

fn note_degraded<T>(stats: &mut LibraryStats, group: QueryGroup, outcome: &QueryOutcome<T>) {
    if let QueryOutcome::Degraded { reason, .. } = outcome {
        warn!("Query group '{}' degraded to defaults: {}", group.as_str(), reason);
        metrics::record_degraded(group.as_str());
        stats.degraded.push(group);
    }
}
