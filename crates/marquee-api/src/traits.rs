//! Trait definitions for content catalogs.
//!
//! The runtime only talks to `CatalogService`, so the TMDB client can be
//! swapped for a proxy or a test double.

use std::future::Future;

use marquee_core::models::MediaRef;

/// A read-only movie/show catalog.
pub trait CatalogService: Send + Sync {
    type Error: std::error::Error + Send + Sync + 'static;

    /// Currently trending movies and shows, in upstream rank order.
    fn trending(&self) -> impl Future<Output = Result<Vec<TrendingItem>, Self::Error>> + Send;

    /// Full metadata for one title.
    fn details(
        &self,
        media: MediaRef,
    ) -> impl Future<Output = Result<MediaDetails, Self::Error>> + Send;

    /// Episode list of one season of a show.
    fn season(
        &self,
        show_id: u64,
        season_number: u32,
    ) -> impl Future<Output = Result<SeasonDetails, Self::Error>> + Send;
}

/// A trending list entry.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct TrendingItem {
    pub media: MediaRef,
    pub title: Option<String>,
    pub name: Option<String>,
    pub overview: Option<String>,
    pub backdrop_path: Option<String>,
    pub poster_path: Option<String>,
    pub vote_average: Option<f32>,
    pub release_date: Option<String>,
}

/// Title metadata shared by movies and shows.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct MediaDetails {
    pub media: MediaRef,
    pub title: String,
    pub tagline: Option<String>,
    pub overview: Option<String>,
    pub genres: Vec<String>,
    pub release_date: Option<String>,
    pub runtime: Option<u32>,
    pub vote_average: Option<f32>,
    pub poster_path: Option<String>,
    pub backdrop_path: Option<String>,
    /// Shows only.
    pub number_of_seasons: Option<u32>,
    /// Shows only.
    pub seasons: Vec<SeasonSummary>,
}

impl MediaDetails {
    /// Upstream id of a season, looked up by its number.
    pub fn season_id(&self, season_number: u32) -> Option<u64> {
        self.seasons
            .iter()
            .find(|s| s.season_number == season_number)
            .map(|s| s.id)
    }
}

#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct SeasonSummary {
    pub id: u64,
    pub season_number: u32,
    pub name: Option<String>,
    pub episode_count: Option<u32>,
}

#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct SeasonDetails {
    pub id: u64,
    pub season_number: u32,
    pub name: Option<String>,
    pub episodes: Vec<EpisodeInfo>,
}

impl SeasonDetails {
    /// Episode numbers in upstream order.
    pub fn episode_numbers(&self) -> Vec<u32> {
        self.episodes.iter().map(|e| e.episode_number).collect()
    }

    pub fn episode(&self, episode_number: u32) -> Option<&EpisodeInfo> {
        self.episodes
            .iter()
            .find(|e| e.episode_number == episode_number)
    }

    pub fn first_episode_number(&self) -> Option<u32> {
        self.episodes.first().map(|e| e.episode_number)
    }
}

#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct EpisodeInfo {
    pub id: u64,
    pub episode_number: u32,
    pub name: Option<String>,
    pub overview: Option<String>,
    pub air_date: Option<String>,
    pub runtime: Option<u32>,
}
