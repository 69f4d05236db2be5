mod db;

use futures::future::join_all;

use marquee_api::tmdb::TmdbClient;
use marquee_api::traits::{CatalogService, EpisodeInfo, MediaDetails};
use marquee_core::config::AppConfig;
use marquee_core::error::MarqueeError;
use marquee_core::hero::{HeroCarousel, HeroSlide};
use marquee_core::links::{SharePayload, WatchRequest};
use marquee_core::models::{ListKind, MediaKind, MediaRef};
use marquee_core::navigation::{Direction, EpisodeBounds, EpisodeNavigator};
use marquee_core::playback::{EpisodeIds, PlaybackSource};

pub use db::DbHandle;

/// Profile used for continue-watching when nobody is signed in.
pub const ANONYMOUS_PROFILE: &str = "anonymous";

#[derive(Debug, thiserror::Error)]
pub enum RuntimeError {
    #[error("config error: {0}")]
    Config(String),
    #[error("database error: {0}")]
    Database(String),
    #[error("api error: {0}")]
    Api(String),
    #[error("sign in to use the watchlist (set profile.user_id)")]
    NotSignedIn,
    #[error("not found: {0}")]
    NotFound(String),
    #[error(transparent)]
    Core(#[from] MarqueeError),
}

fn db_error(e: impl std::fmt::Display) -> RuntimeError {
    RuntimeError::Database(e.to_string())
}

fn api_error(e: impl std::fmt::Display) -> RuntimeError {
    RuntimeError::Api(e.to_string())
}

/// Everything the watch screen needs for one title or episode.
#[derive(Debug, Clone)]
pub struct WatchSession {
    pub request: WatchRequest,
    pub details: MediaDetails,
    /// Shows only.
    pub navigator: Option<EpisodeNavigator>,
    /// The episode being played, when the season listing contained it.
    pub episode: Option<EpisodeInfo>,
    pub source: PlaybackSource,
}

impl WatchSession {
    /// "Title" for movies, "Title S2E5" for shows.
    pub fn heading(&self) -> String {
        match self.request.position() {
            Some((season, episode)) => format!("{} S{season}E{episode}", self.details.title),
            None => self.details.title.clone(),
        }
    }
}

pub struct Runtime<C> {
    catalog: C,
    db: DbHandle,
    config: AppConfig,
}

impl Runtime<TmdbClient> {
    /// Runtime backed by TMDB and the on-disk database.
    pub fn open(config: AppConfig) -> Result<Self, RuntimeError> {
        let catalog =
            TmdbClient::new(&config.tmdb).map_err(|e| RuntimeError::Config(e.to_string()))?;
        let db_path =
            AppConfig::ensure_db_path().map_err(|e| RuntimeError::Config(e.to_string()))?;
        let db = DbHandle::open(&db_path).map_err(db_error)?;
        Ok(Self::new(config, catalog, db))
    }
}

impl<C: CatalogService> Runtime<C> {
    pub fn new(config: AppConfig, catalog: C, db: DbHandle) -> Self {
        Self {
            catalog,
            db,
            config,
        }
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    pub fn db_handle(&self) -> DbHandle {
        self.db.clone()
    }

    fn user(&self) -> Option<&str> {
        self.config.profile.user()
    }

    fn signed_in_user(&self) -> Result<&str, RuntimeError> {
        self.user().ok_or(RuntimeError::NotSignedIn)
    }

    fn history_profile(&self) -> &str {
        self.user().unwrap_or(ANONYMOUS_PROFILE)
    }

    // ── Home ────────────────────────────────────────────────────

    /// Hero carousel over the trending list. Fetch failures yield the fallback carousel.
    pub async fn home_hero(&self) -> HeroCarousel {
        let slides = match self.catalog.trending().await {
            Ok(items) => items
                .into_iter()
                .map(|item| HeroSlide {
                    media: item.media,
                    title: item.title,
                    name: item.name,
                    backdrop_path: item.backdrop_path,
                    overview: item.overview,
                })
                .collect(),
            Err(e) => {
                tracing::warn!(error = %e, "failed to fetch trending list");
                Vec::new()
            }
        };
        tracing::debug!(count = slides.len(), "trending slides loaded");
        HeroCarousel::new(
            slides,
            &self.config.tmdb.image_base_url,
            &self.config.site.fallback_image,
        )
    }

    // ── Watchlist ───────────────────────────────────────────────

    /// Always `false` when nobody is signed in.
    pub async fn is_bookmarked(&self, media: MediaRef) -> Result<bool, RuntimeError> {
        match self.user() {
            Some(user) => self.db.is_bookmarked(user, media).await.map_err(db_error),
            None => Ok(false),
        }
    }

    pub async fn add_bookmark(&self, media: MediaRef) -> Result<(), RuntimeError> {
        let user = self.signed_in_user()?;
        self.db.add_bookmark(user, media).await.map_err(db_error)?;
        tracing::info!(%media, "added to watchlist");
        Ok(())
    }

    pub async fn remove_bookmark(&self, media: MediaRef) -> Result<bool, RuntimeError> {
        let user = self.signed_in_user()?;
        let removed = self.db.remove_bookmark(user, media).await.map_err(db_error)?;
        if removed {
            tracing::info!(%media, "removed from watchlist");
        }
        Ok(removed)
    }

    /// Flip the bookmark and return the new state.
    pub async fn toggle_bookmark(&self, media: MediaRef) -> Result<bool, RuntimeError> {
        if self.is_bookmarked(media).await? {
            self.remove_bookmark(media).await?;
            Ok(false)
        } else {
            self.add_bookmark(media).await?;
            Ok(true)
        }
    }

    // ── Watch ───────────────────────────────────────────────────

    /// Load a title for playback and remember it under continue watching.
    pub async fn open_watch(&self, request: WatchRequest) -> Result<WatchSession, RuntimeError> {
        let media = request.media;
        let position = request.position();

        if let Err(e) = self
            .db
            .touch_continue_watching(
                self.history_profile(),
                media,
                position.map(|(s, _)| s),
                position.map(|(_, e)| e),
                self.config.library.continue_watching_limit,
            )
            .await
        {
            tracing::warn!(error = %e, %media, "failed to record continue watching");
        }

        let details = self.catalog.details(media).await.map_err(api_error)?;

        let Some((season, episode)) = position else {
            let source = PlaybackSource::build(
                &self.config.playback.embed_base,
                media,
                EpisodeIds::default(),
            );
            return Ok(WatchSession {
                request,
                details,
                navigator: None,
                episode: None,
                source,
            });
        };

        let season_data = match self.catalog.season(media.id, season).await {
            Ok(data) => Some(data),
            Err(e) => {
                tracing::warn!(error = %e, %media, season, "failed to fetch season");
                None
            }
        };

        let numbers = season_data
            .as_ref()
            .map(|s| s.episode_numbers())
            .unwrap_or_default();
        let mut bounds = EpisodeBounds::from_season(&numbers, details.number_of_seasons);

        let mut ids = EpisodeIds::default();
        let mut current_episode = None;
        if let Some(data) = season_data.as_ref().filter(|s| !s.episodes.is_empty()) {
            ids.season_id = details.season_id(season);
            current_episode = data.episode(episode).cloned();
            ids.episode_id = current_episode.as_ref().map(|e| e.id);
        }

        if EpisodeNavigator::new(season, episode, bounds).needs_next_season_prefetch() {
            match self.catalog.season(media.id, season + 1).await {
                Ok(next) => {
                    if let Some(first) = next.first_episode_number() {
                        bounds = bounds.with_next_season_first_episode(first);
                    }
                }
                Err(e) => {
                    tracing::warn!(error = %e, %media, season = season + 1, "failed to prefetch next season");
                }
            }
        }

        let navigator = EpisodeNavigator::new(season, episode, bounds);
        let source = PlaybackSource::build(&self.config.playback.embed_base, media, ids);
        tracing::debug!(%media, season, episode, source = %source, "watch session ready");

        Ok(WatchSession {
            request,
            details,
            navigator: Some(navigator),
            episode: current_episode,
            source,
        })
    }

    /// Move to the previous/next episode. `None` at either end of the show.
    pub async fn step(
        &self,
        session: &WatchSession,
        direction: Direction,
    ) -> Result<Option<WatchSession>, RuntimeError> {
        let Some(target) = session.navigator.and_then(|nav| nav.step(direction)) else {
            return Ok(None);
        };
        let request =
            WatchRequest::episode(session.request.media.id, target.season, target.episode);
        self.open_watch(request).await.map(Some)
    }

    /// Where to pick a title back up: the last opened episode, or the beginning.
    pub async fn resume_request(&self, media: MediaRef) -> Result<WatchRequest, RuntimeError> {
        let entry = self
            .db
            .continue_entry(self.history_profile(), media)
            .await
            .map_err(db_error)?;
        Ok(match (media.kind, entry) {
            (MediaKind::Tv, Some(entry)) => WatchRequest::episode(
                media.id,
                entry.season.unwrap_or(1),
                entry.episode.unwrap_or(1),
            ),
            _ => WatchRequest::start(media),
        })
    }

    // ── Library ─────────────────────────────────────────────────

    /// Stored ids of one list, most recent first.
    pub async fn library_ids(
        &self,
        list: ListKind,
        kind: MediaKind,
    ) -> Result<Vec<MediaRef>, RuntimeError> {
        match list {
            ListKind::Watchlist => {
                let user = self.signed_in_user()?;
                let rows = self.db.bookmarks(user, kind).await.map_err(db_error)?;
                Ok(rows.into_iter().map(|b| b.media).collect())
            }
            ListKind::ContinueWatching => {
                let rows = self
                    .db
                    .continue_watching(self.history_profile(), kind)
                    .await
                    .map_err(db_error)?;
                Ok(rows.into_iter().map(|e| e.media).collect())
            }
        }
    }

    /// Details for every title in a list, fetched concurrently, in list order.
    /// Titles the catalog cannot resolve are skipped.
    pub async fn library(
        &self,
        list: ListKind,
        kind: MediaKind,
    ) -> Result<Vec<MediaDetails>, RuntimeError> {
        let ids = self.library_ids(list, kind).await?;
        let results = join_all(ids.iter().map(|media| self.catalog.details(*media))).await;

        let mut items = Vec::with_capacity(results.len());
        for (media, result) in ids.into_iter().zip(results) {
            match result {
                Ok(details) => items.push(details),
                Err(e) => tracing::warn!(error = %e, %media, "skipping library entry"),
            }
        }
        Ok(items)
    }

    pub async fn remove_from_library(
        &self,
        list: ListKind,
        media: MediaRef,
    ) -> Result<bool, RuntimeError> {
        match list {
            ListKind::Watchlist => self.remove_bookmark(media).await,
            ListKind::ContinueWatching => self
                .db
                .remove_continue_watching(self.history_profile(), media)
                .await
                .map_err(db_error),
        }
    }

    // ── Share ───────────────────────────────────────────────────

    pub async fn share(&self, media: MediaRef) -> Result<SharePayload, RuntimeError> {
        let details = self.catalog.details(media).await.map_err(api_error)?;
        Ok(SharePayload::new(
            &self.config.site.base_url,
            media,
            &details.title,
        ))
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use marquee_api::traits::{SeasonDetails, SeasonSummary, TrendingItem};

    use super::*;

    #[derive(Debug, thiserror::Error)]
    #[error("fake catalog: {0}")]
    struct FakeError(String);

    #[derive(Default)]
    struct FakeCatalog {
        trending: Option<Vec<TrendingItem>>,
        details: HashMap<MediaRef, MediaDetails>,
        seasons: HashMap<(u64, u32), SeasonDetails>,
        season_calls: AtomicUsize,
    }

    impl CatalogService for FakeCatalog {
        type Error = FakeError;

        async fn trending(&self) -> Result<Vec<TrendingItem>, FakeError> {
            self.trending
                .clone()
                .ok_or_else(|| FakeError("trending unavailable".into()))
        }

        async fn details(&self, media: MediaRef) -> Result<MediaDetails, FakeError> {
            self.details
                .get(&media)
                .cloned()
                .ok_or_else(|| FakeError(format!("no details for {media}")))
        }

        async fn season(
            &self,
            show_id: u64,
            season_number: u32,
        ) -> Result<SeasonDetails, FakeError> {
            self.season_calls.fetch_add(1, Ordering::SeqCst);
            self.seasons
                .get(&(show_id, season_number))
                .cloned()
                .ok_or_else(|| FakeError(format!("no season {season_number} for {show_id}")))
        }
    }

    fn details(media: MediaRef, title: &str, seasons: &[(u64, u32)]) -> MediaDetails {
        MediaDetails {
            media,
            title: title.into(),
            tagline: None,
            overview: None,
            genres: Vec::new(),
            release_date: None,
            runtime: None,
            vote_average: None,
            poster_path: None,
            backdrop_path: None,
            number_of_seasons: (media.kind == MediaKind::Tv).then_some(seasons.len() as u32),
            seasons: seasons
                .iter()
                .map(|&(id, season_number)| SeasonSummary {
                    id,
                    season_number,
                    name: None,
                    episode_count: None,
                })
                .collect(),
        }
    }

    fn season(id: u64, season_number: u32, episodes: &[(u64, u32)]) -> SeasonDetails {
        SeasonDetails {
            id,
            season_number,
            name: None,
            episodes: episodes
                .iter()
                .map(|&(id, episode_number)| EpisodeInfo {
                    id,
                    episode_number,
                    name: Some(format!("Episode {episode_number}")),
                    overview: None,
                    air_date: None,
                    runtime: None,
                })
                .collect(),
        }
    }

    const SHOW: u64 = 1399;

    /// Two-season show: S1 has episodes 1-3, S2 has episodes 1-2.
    fn catalog() -> FakeCatalog {
        let mut catalog = FakeCatalog::default();
        catalog.details.insert(
            MediaRef::tv(SHOW),
            details(MediaRef::tv(SHOW), "Game of Thrones", &[(3624, 1), (3625, 2)]),
        );
        catalog.details.insert(
            MediaRef::movie(550),
            details(MediaRef::movie(550), "Fight Club", &[]),
        );
        catalog.seasons.insert(
            (SHOW, 1),
            season(3624, 1, &[(63056, 1), (63057, 2), (63058, 3)]),
        );
        catalog
            .seasons
            .insert((SHOW, 2), season(3625, 2, &[(63070, 1), (63071, 2)]));
        catalog
    }

    fn runtime_with(catalog: FakeCatalog, user: &str) -> Runtime<FakeCatalog> {
        let mut config = AppConfig::default();
        config.profile.user_id = user.into();
        Runtime::new(config, catalog, DbHandle::open_memory().unwrap())
    }

    #[tokio::test]
    async fn test_watch_movie() {
        let rt = runtime_with(catalog(), "local");
        let session = rt.open_watch(WatchRequest::movie(550)).await.unwrap();
        assert_eq!(session.heading(), "Fight Club");
        assert!(session.navigator.is_none());
        assert_eq!(
            session.source.as_str(),
            "https://watchondemand.buzz/media/tmdb-movie-550"
        );
    }

    #[tokio::test]
    async fn test_watch_episode_builds_source_and_bounds() {
        let rt = runtime_with(catalog(), "local");
        let session = rt
            .open_watch(WatchRequest::episode(SHOW, 1, 1))
            .await
            .unwrap();

        assert_eq!(session.heading(), "Game of Thrones S1E1");
        assert_eq!(
            session.source.as_str(),
            "https://watchondemand.buzz/media/tmdb-tv-1399/3624/63056"
        );
        let nav = session.navigator.unwrap();
        assert_eq!(nav.bounds.min_episode, 1);
        assert_eq!(nav.bounds.max_episode, 3);
        assert_eq!(nav.bounds.max_season, 2);
        // Episode 1 of 3 is not close enough to the end to look ahead.
        assert_eq!(rt.catalog.season_calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_next_rolls_into_following_season() {
        let rt = runtime_with(catalog(), "local");
        let session = rt
            .open_watch(WatchRequest::episode(SHOW, 1, 3))
            .await
            .unwrap();
        assert_eq!(rt.catalog.season_calls.load(Ordering::SeqCst), 2);

        let next = rt.step(&session, Direction::Next).await.unwrap().unwrap();
        assert_eq!(next.request, WatchRequest::episode(SHOW, 2, 1));
        assert_eq!(next.episode.as_ref().map(|e| e.id), Some(63070));

        let prev = rt.step(&next, Direction::Previous).await.unwrap();
        assert!(prev.is_none());
    }

    #[tokio::test]
    async fn test_end_of_show_has_no_next() {
        let rt = runtime_with(catalog(), "local");
        let session = rt
            .open_watch(WatchRequest::episode(SHOW, 2, 2))
            .await
            .unwrap();
        assert!(rt.step(&session, Direction::Next).await.unwrap().is_none());
        assert_eq!(session.navigator.unwrap().next_hint(), "End of season 2");
    }

    #[tokio::test]
    async fn test_missing_season_falls_back_to_show_source() {
        let rt = runtime_with(catalog(), "local");
        let session = rt
            .open_watch(WatchRequest::episode(SHOW, 5, 1))
            .await
            .unwrap();
        assert_eq!(
            session.source.as_str(),
            "https://watchondemand.buzz/media/tmdb-tv-1399"
        );
        assert!(session.episode.is_none());
    }

    #[tokio::test]
    async fn test_episode_past_season_end_steps_back_inside() {
        let rt = runtime_with(catalog(), "local");
        let session = rt
            .open_watch(WatchRequest::episode(SHOW, 1, 50))
            .await
            .unwrap();
        assert_eq!(session.navigator.unwrap().bounds.max_episode, 3);

        let prev = rt
            .step(&session, Direction::Previous)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(prev.request, WatchRequest::episode(SHOW, 1, 3));
        assert_eq!(prev.episode.as_ref().map(|e| e.id), Some(63058));
    }

    #[tokio::test]
    async fn test_unknown_title_is_api_error() {
        let rt = runtime_with(catalog(), "local");
        let err = rt.open_watch(WatchRequest::movie(1)).await.unwrap_err();
        assert!(matches!(err, RuntimeError::Api(_)));
    }

    #[tokio::test]
    async fn test_watch_records_continue_watching() {
        let rt = runtime_with(catalog(), "local");
        rt.open_watch(WatchRequest::episode(SHOW, 2, 1)).await.unwrap();
        rt.open_watch(WatchRequest::movie(550)).await.unwrap();

        let shows = rt
            .library(ListKind::ContinueWatching, MediaKind::Tv)
            .await
            .unwrap();
        assert_eq!(shows.len(), 1);
        assert_eq!(shows[0].title, "Game of Thrones");

        let resume = rt.resume_request(MediaRef::tv(SHOW)).await.unwrap();
        assert_eq!(resume, WatchRequest::episode(SHOW, 2, 1));

        assert!(rt
            .remove_from_library(ListKind::ContinueWatching, MediaRef::movie(550))
            .await
            .unwrap());
        assert!(rt
            .library(ListKind::ContinueWatching, MediaKind::Movie)
            .await
            .unwrap()
            .is_empty());
    }

    #[tokio::test]
    async fn test_anonymous_history_but_no_watchlist() {
        let rt = runtime_with(catalog(), "");
        rt.open_watch(WatchRequest::movie(550)).await.unwrap();
        assert_eq!(
            rt.library_ids(ListKind::ContinueWatching, MediaKind::Movie)
                .await
                .unwrap(),
            vec![MediaRef::movie(550)]
        );

        assert!(!rt.is_bookmarked(MediaRef::movie(550)).await.unwrap());
        assert!(matches!(
            rt.add_bookmark(MediaRef::movie(550)).await,
            Err(RuntimeError::NotSignedIn)
        ));
        assert!(matches!(
            rt.library(ListKind::Watchlist, MediaKind::Movie).await,
            Err(RuntimeError::NotSignedIn)
        ));
    }

    #[tokio::test]
    async fn test_toggle_bookmark_and_library_skips_unknown() {
        let rt = runtime_with(catalog(), "local");
        assert!(rt.toggle_bookmark(MediaRef::movie(550)).await.unwrap());
        rt.add_bookmark(MediaRef::movie(999)).await.unwrap();

        let movies = rt.library(ListKind::Watchlist, MediaKind::Movie).await.unwrap();
        assert_eq!(movies.len(), 1);
        assert_eq!(movies[0].media, MediaRef::movie(550));

        assert!(!rt.toggle_bookmark(MediaRef::movie(550)).await.unwrap());
        assert!(!rt.is_bookmarked(MediaRef::movie(550)).await.unwrap());
    }

    #[tokio::test]
    async fn test_home_hero() {
        let mut catalog = catalog();
        catalog.trending = Some(vec![TrendingItem {
            media: MediaRef::movie(550),
            title: Some("Fight Club".into()),
            name: None,
            overview: None,
            backdrop_path: Some("/fc.jpg".into()),
            poster_path: None,
            vote_average: None,
            release_date: None,
        }]);
        let rt = runtime_with(catalog, "local");

        let hero = rt.home_hero().await;
        assert_eq!(hero.slides().len(), 1);
        assert_eq!(
            hero.current_image(),
            Some("https://image.tmdb.org/t/p/original/fc.jpg")
        );
    }

    #[tokio::test]
    async fn test_home_hero_falls_back_on_error() {
        let rt = runtime_with(catalog(), "local");
        let hero = rt.home_hero().await;
        assert!(hero.is_empty());
        assert_eq!(hero.current_image(), Some("/images/logo.svg"));
    }

    #[tokio::test]
    async fn test_share() {
        let rt = runtime_with(catalog(), "local");
        let share = rt.share(MediaRef::tv(SHOW)).await.unwrap();
        assert_eq!(share.text, "Game of Thrones");
        assert_eq!(share.url, "https://marquee.local/detail?type=tv&id=1399");
    }

    #[tokio::test]
    async fn test_local_lists_work_without_catalog_credentials() {
        let mut config = AppConfig::default();
        config.profile.user_id = "local".into();
        config.tmdb.base_url = "http://127.0.0.1:1".into();
        let catalog = TmdbClient::new(&config.tmdb).unwrap();
        let rt = Runtime::new(config, catalog, DbHandle::open_memory().unwrap());

        rt.add_bookmark(MediaRef::movie(550)).await.unwrap();
        assert!(rt.is_bookmarked(MediaRef::movie(550)).await.unwrap());
        assert_eq!(
            rt.library_ids(ListKind::Watchlist, MediaKind::Movie)
                .await
                .unwrap(),
            vec![MediaRef::movie(550)]
        );
        assert!(!rt
            .remove_from_library(ListKind::ContinueWatching, MediaRef::movie(550))
            .await
            .unwrap());
        assert!(rt.remove_bookmark(MediaRef::movie(550)).await.unwrap());

        // Catalog calls still fail, and the hero degrades to its fallback.
        assert!(matches!(
            rt.share(MediaRef::movie(550)).await,
            Err(RuntimeError::Api(_))
        ));
        assert!(rt.home_hero().await.is_empty());
    }
}
