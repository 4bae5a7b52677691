pub mod stats;

pub use stats::{
    watch_percentage, LibraryStats, MovieSummary, MusicSummary, QueryGroup, RecentlyAdded,
    StatsSummary, TvSummary,
};
