//! Playback source URLs for the embedded third-party player.

use crate::models::{MediaKind, MediaRef};

/// Default embed endpoint; ids are appended as `movie-{id}` or `tv-{id}`.
pub const DEFAULT_EMBED_BASE: &str = "https://watchondemand.buzz/media/tmdb-";

/// Upstream ids of the season and episode being played.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct EpisodeIds {
    pub season_id: Option<u64>,
    pub episode_id: Option<u64>,
}

/// A URL the embedded player can load.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlaybackSource(String);

impl PlaybackSource {
    pub fn build(embed_base: &str, media: MediaRef, episode: EpisodeIds) -> Self {
        let mut url = String::from(embed_base);
        match media.kind {
            MediaKind::Movie => {
                url.push_str(&format!("movie-{}", media.id));
            }
            MediaKind::Tv => {
                url.push_str(&format!("tv-{}", media.id));
                // The provider only resolves a specific episode when both ids are present.
                if let (Some(season_id), Some(episode_id)) = (episode.season_id, episode.episode_id)
                {
                    url.push_str(&format!("/{season_id}/{episode_id}"));
                }
            }
        }
        Self(url)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for PlaybackSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_movie_source() {
        let src = PlaybackSource::build(
            DEFAULT_EMBED_BASE,
            MediaRef::movie(550),
            EpisodeIds::default(),
        );
        assert_eq!(src.as_str(), "https://watchondemand.buzz/media/tmdb-movie-550");
    }

    #[test]
    fn test_movie_ignores_episode_ids() {
        let ids = EpisodeIds {
            season_id: Some(1),
            episode_id: Some(2),
        };
        let src = PlaybackSource::build(DEFAULT_EMBED_BASE, MediaRef::movie(550), ids);
        assert_eq!(src.as_str(), "https://watchondemand.buzz/media/tmdb-movie-550");
    }

    #[test]
    fn test_tv_source_with_episode() {
        let ids = EpisodeIds {
            season_id: Some(3624),
            episode_id: Some(63056),
        };
        let src = PlaybackSource::build(DEFAULT_EMBED_BASE, MediaRef::tv(1399), ids);
        assert_eq!(
            src.to_string(),
            "https://watchondemand.buzz/media/tmdb-tv-1399/3624/63056"
        );
    }

    #[test]
    fn test_tv_source_needs_both_ids() {
        let ids = EpisodeIds {
            season_id: Some(3624),
            episode_id: None,
        };
        let src = PlaybackSource::build(DEFAULT_EMBED_BASE, MediaRef::tv(1399), ids);
        assert_eq!(src.as_str(), "https://watchondemand.buzz/media/tmdb-tv-1399");
    }

    #[test]
    fn test_custom_base() {
        let src = PlaybackSource::build(
            "http://localhost:9000/e/",
            MediaRef::tv(7),
            EpisodeIds::default(),
        );
        assert_eq!(src.as_str(), "http://localhost:9000/e/tv-7");
    }
}
