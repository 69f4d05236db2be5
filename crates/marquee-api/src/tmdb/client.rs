use std::time::Duration;

use reqwest::{Client, RequestBuilder, StatusCode};
use serde::de::DeserializeOwned;

use marquee_core::config::TmdbConfig;
use marquee_core::models::{MediaKind, MediaRef};

use super::error::TmdbError;
use super::types::{
    TmdbMovieDetails, TmdbPage, TmdbSeasonDetails, TmdbStatus, TmdbTrendingResult, TmdbTvDetails,
};
use crate::traits::{CatalogService, MediaDetails, SeasonDetails, TrendingItem};

/// Time window of the trending list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TrendingWindow {
    Day,
    #[default]
    Week,
}

impl TrendingWindow {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Day => "day",
            Self::Week => "week",
        }
    }

    /// Unknown values fall back to the weekly list.
    pub fn from_config(s: &str) -> Self {
        match s.trim().to_ascii_lowercase().as_str() {
            "day" => Self::Day,
            "week" => Self::Week,
            other => {
                tracing::warn!(window = other, "unknown trending window, using week");
                Self::Week
            }
        }
    }
}

/// How requests are authenticated.
#[derive(Debug, Clone)]
enum Credentials {
    /// v3 key sent as the `api_key` query parameter.
    ApiKey(String),
    /// v4 read access token sent as a bearer header.
    Bearer(String),
}

/// TMDB API v3 client.
///
/// Building one never needs credentials; requests without them fail with
/// [`TmdbError::Auth`].
pub struct TmdbClient {
    http: Client,
    base_url: String,
    credentials: Option<Credentials>,
    language: String,
    window: TrendingWindow,
}

impl TmdbClient {
    /// Build a client from config. The access token wins when both credentials are set.
    pub fn new(config: &TmdbConfig) -> Result<Self, TmdbError> {
        let credentials = if !config.access_token.trim().is_empty() {
            Some(Credentials::Bearer(config.access_token.trim().to_string()))
        } else if !config.api_key.trim().is_empty() {
            Some(Credentials::ApiKey(config.api_key.trim().to_string()))
        } else {
            tracing::debug!("no TMDB credentials configured, catalog requests will fail");
            None
        };

        let http = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs.max(1)))
            .build()?;

        Ok(Self {
            http,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            credentials,
            language: config.language.clone(),
            window: TrendingWindow::from_config(&config.trending_window),
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }

    fn authorize(&self, req: RequestBuilder) -> Result<RequestBuilder, TmdbError> {
        let req = req.query(&[("language", self.language.as_str())]);
        match &self.credentials {
            Some(Credentials::ApiKey(key)) => Ok(req.query(&[("api_key", key.as_str())])),
            Some(Credentials::Bearer(token)) => Ok(req.bearer_auth(token)),
            None => Err(TmdbError::Auth(
                "no TMDB api_key or access_token configured".into(),
            )),
        }
    }

    /// Check the HTTP response for errors.
    async fn check_response(
        resp: reqwest::Response,
        path: &str,
    ) -> Result<reqwest::Response, TmdbError> {
        let status = resp.status();
        if status.is_success() {
            return Ok(resp);
        }

        tracing::warn!(status = status.as_u16(), path, "TMDB API error");
        let body = resp.text().await.unwrap_or_default();
        Err(map_status(status, path, &body))
    }

    async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T, TmdbError> {
        tracing::debug!(path, "TMDB request");
        let req = self.authorize(self.http.get(self.url(path)))?;
        let resp = req.send().await?;
        let resp = Self::check_response(resp, path).await?;
        resp.json()
            .await
            .map_err(|e| TmdbError::Parse(format!("{path}: {e}")))
    }

    /// Trending titles for an explicit window, ignoring the configured one.
    pub async fn trending_in(
        &self,
        window: TrendingWindow,
    ) -> Result<Vec<TrendingItem>, TmdbError> {
        let page: TmdbPage<TmdbTrendingResult> = self
            .get(&format!("/trending/all/{}", window.as_str()))
            .await?;
        Ok(page
            .results
            .into_iter()
            .filter_map(TmdbTrendingResult::into_trending_item)
            .collect())
    }
}

/// Map a non-success status to an error. TMDB's `status_message` becomes the
/// message when the body carries one.
fn map_status(status: StatusCode, path: &str, body: &str) -> TmdbError {
    match status {
        StatusCode::UNAUTHORIZED => TmdbError::Unauthorized,
        StatusCode::NOT_FOUND => TmdbError::NotFound(path.to_string()),
        StatusCode::TOO_MANY_REQUESTS => TmdbError::RateLimited,
        _ => {
            let message = serde_json::from_str::<TmdbStatus>(body)
                .ok()
                .and_then(|s| s.status_message)
                .unwrap_or_else(|| body.to_string());
            TmdbError::Api {
                status: status.as_u16(),
                message,
            }
        }
    }
}

impl CatalogService for TmdbClient {
    type Error = TmdbError;

    async fn trending(&self) -> Result<Vec<TrendingItem>, TmdbError> {
        self.trending_in(self.window).await
    }

    async fn details(&self, media: MediaRef) -> Result<MediaDetails, TmdbError> {
        match media.kind {
            MediaKind::Movie => {
                let movie: TmdbMovieDetails = self.get(&format!("/movie/{}", media.id)).await?;
                Ok(movie.into_details())
            }
            MediaKind::Tv => {
                let show: TmdbTvDetails = self.get(&format!("/tv/{}", media.id)).await?;
                Ok(show.into_details())
            }
        }
    }

    async fn season(&self, show_id: u64, season_number: u32) -> Result<SeasonDetails, TmdbError> {
        let season: TmdbSeasonDetails = self
            .get(&format!("/tv/{show_id}/season/{season_number}"))
            .await?;
        Ok(season.into_season())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> TmdbConfig {
        marquee_core::config::AppConfig::default().tmdb
    }

    #[tokio::test]
    async fn test_requests_without_credentials_fail_before_sending() {
        let mut cfg = config();
        cfg.base_url = "http://127.0.0.1:1".into();
        let client = TmdbClient::new(&cfg).unwrap();
        assert!(client.credentials.is_none());
        let err = client.trending().await.unwrap_err();
        assert!(matches!(err, TmdbError::Auth(_)));
    }

    #[test]
    fn test_access_token_preferred() {
        let mut cfg = config();
        cfg.api_key = "key".into();
        cfg.access_token = "token".into();
        let client = TmdbClient::new(&cfg).unwrap();
        assert!(matches!(
            client.credentials,
            Some(Credentials::Bearer(ref t)) if t == "token"
        ));
    }

    #[test]
    fn test_url_trims_trailing_slash() {
        let mut cfg = config();
        cfg.api_key = "key".into();
        cfg.base_url = "https://proxy.example/3/".into();
        let client = TmdbClient::new(&cfg).unwrap();
        assert_eq!(client.url("/tv/1399"), "https://proxy.example/3/tv/1399");
    }

    #[test]
    fn test_trending_window_from_config() {
        assert_eq!(TrendingWindow::from_config("Day"), TrendingWindow::Day);
        assert_eq!(TrendingWindow::from_config("week"), TrendingWindow::Week);
        assert_eq!(TrendingWindow::from_config("month"), TrendingWindow::Week);
    }

    #[tokio::test]
    async fn test_unreachable_host_is_http_error() {
        let mut cfg = config();
        cfg.api_key = "key".into();
        cfg.base_url = "http://127.0.0.1:1".into();
        cfg.timeout_secs = 2;
        let client = TmdbClient::new(&cfg).unwrap();
        let err = client.trending().await.unwrap_err();
        assert!(matches!(err, TmdbError::Http(_)));
    }

    #[test]
    fn test_status_mapping() {
        assert!(matches!(
            map_status(StatusCode::UNAUTHORIZED, "/movie/550", ""),
            TmdbError::Unauthorized
        ));
        assert!(matches!(
            map_status(StatusCode::NOT_FOUND, "/movie/1", ""),
            TmdbError::NotFound(ref p) if p == "/movie/1"
        ));
        assert!(matches!(
            map_status(StatusCode::TOO_MANY_REQUESTS, "/trending/all/week", ""),
            TmdbError::RateLimited
        ));
    }

    #[test]
    fn test_status_message_from_body() {
        let body = r#"{"status_code":11,"status_message":"Internal error: Something went wrong."}"#;
        match map_status(StatusCode::INTERNAL_SERVER_ERROR, "/tv/1399", body) {
            TmdbError::Api { status, message } => {
                assert_eq!(status, 500);
                assert_eq!(message, "Internal error: Something went wrong.");
            }
            other => panic!("unexpected error: {other:?}"),
        }

        match map_status(StatusCode::BAD_GATEWAY, "/tv/1399", "upstream down") {
            TmdbError::Api { status, message } => {
                assert_eq!(status, 502);
                assert_eq!(message, "upstream down");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }
}
