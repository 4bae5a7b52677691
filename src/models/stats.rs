use serde::{Deserialize, Serialize};

use crate::services::kodi::types::{RecentAlbum, RecentEpisode, RecentMovie};

/// Independent query groups of a statistics collection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum QueryGroup {
    Movies,
    Tv,
    Music,
    RecentlyAdded,
}

impl QueryGroup {
    pub fn as_str(&self) -> &'static str {
        match self {
            QueryGroup::Movies => "movies",
            QueryGroup::Tv => "tv",
            QueryGroup::Music => "music",
            QueryGroup::RecentlyAdded => "recently_added",
        }
    }
}

/// Recently added items, at most 10 per kind, newest first
#[derive(Debug, Clone, Default, Serialize)]
pub struct RecentlyAdded {
    pub episodes: Vec<RecentEpisode>,
    pub movies: Vec<RecentMovie>,
    pub albums: Vec<RecentAlbum>,
}

/// Library statistics from one collection.
///
/// Unwatched counts are always derived from total and watched.
#[derive(Debug, Clone, Default)]
pub struct LibraryStats {
    pub total_movies: u64,
    pub watched_movies: u64,
    pub total_tv_shows: u64,
    pub total_episodes: u64,
    pub watched_episodes: u64,
    pub total_artists: u64,
    pub total_albums: u64,
    pub total_songs: u64,
    pub recently_added: RecentlyAdded,
    /// Groups that fell back to defaults during collection
    pub degraded: Vec<QueryGroup>,
}

impl LibraryStats {
    pub fn unwatched_movies(&self) -> u64 {
        self.total_movies.saturating_sub(self.watched_movies)
    }

    pub fn unwatched_episodes(&self) -> u64 {
        self.total_episodes.saturating_sub(self.watched_episodes)
    }

    pub fn movie_watch_percentage(&self) -> f64 {
        watch_percentage(self.watched_movies, self.total_movies)
    }

    pub fn episode_watch_percentage(&self) -> f64 {
        watch_percentage(self.watched_episodes, self.total_episodes)
    }

    pub fn is_complete(&self) -> bool {
        self.degraded.is_empty()
    }

    /// Machine-readable counterpart of the status page
    pub fn summary(&self) -> StatsSummary {
        StatsSummary {
            movies: MovieSummary {
                total: self.total_movies,
                watched: self.watched_movies,
                unwatched: self.unwatched_movies(),
            },
            tv_shows: TvSummary {
                total_shows: self.total_tv_shows,
                total_episodes: self.total_episodes,
                watched_episodes: self.watched_episodes,
                unwatched_episodes: self.unwatched_episodes(),
            },
            music: MusicSummary {
                total_artists: self.total_artists,
                total_albums: self.total_albums,
                total_songs: self.total_songs,
            },
        }
    }
}

/// `watched / total * 100`, or 0 for an empty library
pub fn watch_percentage(watched: u64, total: u64) -> f64 {
    if total == 0 {
        0.0
    } else {
        watched as f64 / total as f64 * 100.0
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatsSummary {
    pub movies: MovieSummary,
    pub tv_shows: TvSummary,
    pub music: MusicSummary,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MovieSummary {
    pub total: u64,
    pub watched: u64,
    pub unwatched: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TvSummary {
    pub total_shows: u64,
    pub total_episodes: u64,
    pub watched_episodes: u64,
    pub unwatched_episodes: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MusicSummary {
    pub total_artists: u64,
    pub total_albums: u64,
    pub total_songs: u64,
}
