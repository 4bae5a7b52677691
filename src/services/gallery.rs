//! Recently added gallery
//!
//! Turns the heterogeneous recently added records into uniform cards.

use serde::Serialize;

use crate::models::RecentlyAdded;
use crate::services::artwork::ArtworkResolver;
use crate::services::kodi::{RecentAlbum, RecentEpisode, RecentMovie};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum CardKind {
    Movie,
    Episode,
    Album,
}

impl CardKind {
    pub fn icon(&self) -> &'static str {
        match self {
            CardKind::Movie => "🎬",
            CardKind::Episode => "📺",
            CardKind::Album => "🎵",
        }
    }

    /// CSS class of the image element
    pub fn image_class(&self) -> &'static str {
        match self {
            CardKind::Movie => "movie-poster",
            CardKind::Episode => "episode-thumb",
            CardKind::Album => "album-cover",
        }
    }
}

/// One gallery entry
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RecentCard {
    pub kind: CardKind,
    pub title: String,
    pub subtitle: String,
    pub date: String,
    pub image: Option<String>,
    pub icon: &'static str,
}

impl RecentCard {
    pub fn movie(movie: &RecentMovie, image: Option<String>) -> Self {
        Self {
            kind: CardKind::Movie,
            title: title_or(movie.title.as_deref(), "Unknown Movie"),
            subtitle: movie
                .year
                .filter(|y| *y > 0)
                .map(|y| y.to_string())
                .unwrap_or_default(),
            date: date_part(movie.dateadded.as_deref()),
            image,
            icon: CardKind::Movie.icon(),
        }
    }

    pub fn episode(episode: &RecentEpisode, image: Option<String>) -> Self {
        let show = title_or(episode.showtitle.as_deref(), "Unknown Show");
        Self {
            kind: CardKind::Episode,
            title: title_or(episode.title.as_deref(), "Unknown Episode"),
            subtitle: format!(
                "{} S{:02}E{:02}",
                show,
                episode.season.unwrap_or(0),
                episode.episode.unwrap_or(0)
            ),
            date: date_part(episode.dateadded.as_deref()),
            image,
            icon: CardKind::Episode.icon(),
        }
    }

    pub fn album(album: &RecentAlbum, image: Option<String>) -> Self {
        Self {
            kind: CardKind::Album,
            title: title_or(album.title.as_deref(), "Unknown Album"),
            subtitle: album
                .artist
                .first()
                .filter(|a| !a.is_empty())
                .cloned()
                .unwrap_or_else(|| "Unknown Artist".to_string()),
            date: date_part(album.dateadded.as_deref()),
            image,
            icon: CardKind::Album.icon(),
        }
    }
}

fn title_or(value: Option<&str>, fallback: &str) -> String {
    match value {
        Some(v) if !v.is_empty() => v.to_string(),
        _ => fallback.to_string(),
    }
}

/// `2024-03-01 21:14:05` -> `2024-03-01`
fn date_part(dateadded: Option<&str>) -> String {
    dateadded
        .map(|d| d.chars().take(10).collect())
        .unwrap_or_default()
}

/// Cards for the three recently added columns
#[derive(Debug, Clone, Default, Serialize)]
pub struct Gallery {
    pub movies: Vec<RecentCard>,
    pub episodes: Vec<RecentCard>,
    pub albums: Vec<RecentCard>,
}

impl Gallery {
    /// Build cards, resolving artwork one item at a time.
    ///
    /// Without a resolver, only artwork that is already an absolute URL is
    /// kept (file dumps cannot reference the artwork route).
    pub async fn build(recent: &RecentlyAdded, resolver: Option<&ArtworkResolver<'_>>) -> Self {
        let mut gallery = Gallery::default();

        for movie in &recent.movies {
            let image = resolve(resolver, movie.artwork()).await;
            gallery.movies.push(RecentCard::movie(movie, image));
        }
        for episode in &recent.episodes {
            let image = resolve(resolver, episode.artwork()).await;
            gallery.episodes.push(RecentCard::episode(episode, image));
        }
        for album in &recent.albums {
            let image = resolve(resolver, album.artwork()).await;
            gallery.albums.push(RecentCard::album(album, image));
        }

        gallery
    }
}

async fn resolve(resolver: Option<&ArtworkResolver<'_>>, reference: Option<&str>) -> Option<String> {
    let reference = reference?;
    match resolver {
        Some(resolver) => resolver.resolve(reference).await,
        None if reference.starts_with("http://") || reference.starts_with("https://") => {
            Some(reference.to_string())
        }
        None => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_movie_card() {
        let movie: RecentMovie = serde_json::from_value(json!({
            "title": "Heat",
            "year": 1995,
            "dateadded": "2024-03-01 21:14:05",
            "rating": 8.3
        }))
        .unwrap();

        let card = RecentCard::movie(&movie, None);
        assert_eq!(card.title, "Heat");
        assert_eq!(card.subtitle, "1995");
        assert_eq!(card.date, "2024-03-01");
        assert_eq!(card.icon, "🎬");
        assert_eq!(card.image, None);
    }

    #[test]
    fn test_episode_card_subtitle() {
        let episode: RecentEpisode = serde_json::from_value(json!({
            "title": "Pilot",
            "showtitle": "Twin Peaks",
            "season": 1,
            "episode": 2
        }))
        .unwrap();

        let card = RecentCard::episode(&episode, Some("/artwork/x.jpg".to_string()));
        assert_eq!(card.subtitle, "Twin Peaks S01E02");
        assert_eq!(card.date, "");
        assert_eq!(card.image.as_deref(), Some("/artwork/x.jpg"));
    }

    #[test]
    fn test_defaults_for_missing_fields() {
        let card = RecentCard::episode(&RecentEpisode::default(), None);
        assert_eq!(card.title, "Unknown Episode");
        assert_eq!(card.subtitle, "Unknown Show S00E00");

        let card = RecentCard::movie(&RecentMovie::default(), None);
        assert_eq!(card.title, "Unknown Movie");
        assert_eq!(card.subtitle, "");

        let card = RecentCard::album(&RecentAlbum::default(), None);
        assert_eq!(card.title, "Unknown Album");
        assert_eq!(card.subtitle, "Unknown Artist");
    }

    #[test]
    fn test_zero_year_has_no_subtitle() {
        let movie: RecentMovie =
            serde_json::from_value(json!({"title": "Untitled", "year": 0})).unwrap();
        assert_eq!(RecentCard::movie(&movie, None).subtitle, "");
    }

    #[test]
    fn test_album_uses_first_artist() {
        let album: RecentAlbum = serde_json::from_value(json!({
            "title": "Blue Train",
            "artist": ["John Coltrane", "Lee Morgan"]
        }))
        .unwrap();
        assert_eq!(RecentCard::album(&album, None).subtitle, "John Coltrane");
    }

    #[tokio::test]
    async fn test_build_without_resolver_keeps_absolute_urls_only() {
        let recent = RecentlyAdded {
            movies: vec![
                serde_json::from_value(json!({
                    "title": "A",
                    "art": {"poster": "https://img.example.com/a.jpg"}
                }))
                .unwrap(),
                serde_json::from_value(json!({
                    "title": "B",
                    "art": {"poster": "image://video@b/"}
                }))
                .unwrap(),
            ],
            ..Default::default()
        };

        let gallery = Gallery::build(&recent, None).await;
        assert_eq!(gallery.movies.len(), 2);
        assert_eq!(
            gallery.movies[0].image.as_deref(),
            Some("https://img.example.com/a.jpg")
        );
        assert_eq!(gallery.movies[1].image, None);
    }
}
