use serde::Deserialize;

use marquee_core::models::{MediaKind, MediaRef};

use crate::traits::{EpisodeInfo, MediaDetails, SeasonDetails, SeasonSummary, TrendingItem};

// ── Trending ────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct TmdbPage<T> {
    #[serde(default)]
    pub page: u32,
    pub results: Vec<T>,
    #[serde(default)]
    pub total_pages: u32,
}

#[derive(Debug, Deserialize)]
pub struct TmdbTrendingResult {
    pub id: u64,
    pub media_type: Option<String>,
    pub title: Option<String>,
    pub name: Option<String>,
    pub overview: Option<String>,
    pub backdrop_path: Option<String>,
    pub poster_path: Option<String>,
    pub vote_average: Option<f32>,
    pub release_date: Option<String>,
    pub first_air_date: Option<String>,
}

impl TmdbTrendingResult {
    /// `None` for entries that are neither movies nor shows (people).
    pub fn into_trending_item(self) -> Option<TrendingItem> {
        let kind = MediaKind::from_db_str(self.media_type.as_deref()?)?;
        Some(TrendingItem {
            media: MediaRef::new(kind, self.id),
            title: self.title,
            name: self.name,
            overview: self.overview,
            backdrop_path: self.backdrop_path,
            poster_path: self.poster_path,
            vote_average: self.vote_average,
            release_date: self.release_date.or(self.first_air_date),
        })
    }
}

// ── Title details ───────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct TmdbGenre {
    pub id: u64,
    pub name: String,
}

#[derive(Debug, Deserialize)]
pub struct TmdbMovieDetails {
    pub id: u64,
    pub title: Option<String>,
    pub original_title: Option<String>,
    pub tagline: Option<String>,
    pub overview: Option<String>,
    #[serde(default)]
    pub genres: Vec<TmdbGenre>,
    pub release_date: Option<String>,
    pub runtime: Option<u32>,
    pub vote_average: Option<f32>,
    pub poster_path: Option<String>,
    pub backdrop_path: Option<String>,
}

impl TmdbMovieDetails {
    pub fn into_details(self) -> MediaDetails {
        MediaDetails {
            media: MediaRef::movie(self.id),
            title: self
                .title
                .or(self.original_title)
                .unwrap_or_else(|| "Untitled".to_string()),
            tagline: self.tagline.filter(|t| !t.is_empty()),
            overview: self.overview,
            genres: self.genres.into_iter().map(|g| g.name).collect(),
            release_date: self.release_date,
            runtime: self.runtime,
            vote_average: self.vote_average,
            poster_path: self.poster_path,
            backdrop_path: self.backdrop_path,
            number_of_seasons: None,
            seasons: Vec::new(),
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct TmdbSeasonSummary {
    pub id: u64,
    pub season_number: u32,
    pub name: Option<String>,
    pub episode_count: Option<u32>,
}

#[derive(Debug, Deserialize)]
pub struct TmdbTvDetails {
    pub id: u64,
    pub name: Option<String>,
    pub original_name: Option<String>,
    pub tagline: Option<String>,
    pub overview: Option<String>,
    #[serde(default)]
    pub genres: Vec<TmdbGenre>,
    pub first_air_date: Option<String>,
    #[serde(default)]
    pub episode_run_time: Vec<u32>,
    pub vote_average: Option<f32>,
    pub poster_path: Option<String>,
    pub backdrop_path: Option<String>,
    pub number_of_seasons: Option<u32>,
    #[serde(default)]
    pub seasons: Vec<TmdbSeasonSummary>,
}

impl TmdbTvDetails {
    pub fn into_details(self) -> MediaDetails {
        MediaDetails {
            media: MediaRef::tv(self.id),
            title: self
                .name
                .or(self.original_name)
                .unwrap_or_else(|| "Untitled".to_string()),
            tagline: self.tagline.filter(|t| !t.is_empty()),
            overview: self.overview,
            genres: self.genres.into_iter().map(|g| g.name).collect(),
            release_date: self.first_air_date,
            runtime: self.episode_run_time.first().copied(),
            vote_average: self.vote_average,
            poster_path: self.poster_path,
            backdrop_path: self.backdrop_path,
            number_of_seasons: self.number_of_seasons,
            seasons: self
                .seasons
                .into_iter()
                .map(|s| SeasonSummary {
                    id: s.id,
                    season_number: s.season_number,
                    name: s.name,
                    episode_count: s.episode_count,
                })
                .collect(),
        }
    }
}

// ── Seasons ─────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct TmdbEpisode {
    pub id: u64,
    pub episode_number: u32,
    pub name: Option<String>,
    pub overview: Option<String>,
    pub air_date: Option<String>,
    pub runtime: Option<u32>,
}

#[derive(Debug, Deserialize)]
pub struct TmdbSeasonDetails {
    pub id: u64,
    pub season_number: u32,
    pub name: Option<String>,
    #[serde(default)]
    pub episodes: Vec<TmdbEpisode>,
}

impl TmdbSeasonDetails {
    pub fn into_season(self) -> SeasonDetails {
        SeasonDetails {
            id: self.id,
            season_number: self.season_number,
            name: self.name,
            episodes: self
                .episodes
                .into_iter()
                .map(|e| EpisodeInfo {
                    id: e.id,
                    episode_number: e.episode_number,
                    name: e.name,
                    overview: e.overview,
                    air_date: e.air_date,
                    runtime: e.runtime,
                })
                .collect(),
        }
    }
}

/// Error body TMDB returns alongside non-2xx statuses.
#[derive(Debug, Deserialize)]
pub struct TmdbStatus {
    pub status_code: Option<i32>,
    pub status_message: Option<String>,
}
