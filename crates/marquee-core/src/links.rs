//! Watch/detail routes and share payloads.
//!
//! Routes keep the `/watch?type=..&id=..` shape so links copied from the
//! web front end open the same title here.

use serde::{Deserialize, Serialize};
use url::form_urlencoded;

use crate::error::MarqueeError;
use crate::models::{MediaKind, MediaRef};

/// A request to play a title, as carried by a watch route.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct WatchRequest {
    pub media: MediaRef,
    pub season: Option<u32>,
    pub episode: Option<u32>,
}

impl WatchRequest {
    pub fn movie(id: u64) -> Self {
        Self {
            media: MediaRef::movie(id),
            season: None,
            episode: None,
        }
    }

    pub fn episode(id: u64, season: u32, episode: u32) -> Self {
        Self {
            media: MediaRef::tv(id),
            season: Some(season),
            episode: Some(episode),
        }
    }

    /// Entry point for a title: shows start at season 1 episode 1.
    pub fn start(media: MediaRef) -> Self {
        match media.kind {
            MediaKind::Movie => Self::movie(media.id),
            MediaKind::Tv => Self::episode(media.id, 1, 1),
        }
    }

    /// Season and episode, defaulting to 1 for shows.
    pub fn position(&self) -> Option<(u32, u32)> {
        match self.media.kind {
            MediaKind::Movie => None,
            MediaKind::Tv => Some((self.season.unwrap_or(1), self.episode.unwrap_or(1))),
        }
    }

    pub fn to_route(&self) -> String {
        match self.position() {
            None => format!("/watch?type={}&id={}", self.media.kind, self.media.id),
            Some((season, episode)) => format!(
                "/watch?type={}&id={}&season={season}&episode={episode}",
                self.media.kind, self.media.id
            ),
        }
    }

    /// Parse a watch route, an absolute URL, or a bare query string.
    pub fn parse(input: &str) -> Result<Self, MarqueeError> {
        let query = match input.split_once('?') {
            Some((_, q)) => q,
            None => input,
        };

        let mut kind = None;
        let mut id = None;
        let mut season = None;
        let mut episode = None;
        for (key, value) in form_urlencoded::parse(query.as_bytes()) {
            match key.as_ref() {
                "type" => kind = Some(value.parse::<MediaKind>()?),
                "id" => id = Some(parse_number::<u64>("id", &value)?),
                "season" => season = Some(parse_number::<u32>("season", &value)?),
                "episode" => episode = Some(parse_number::<u32>("episode", &value)?),
                _ => {}
            }
        }

        let missing =
            |field: &str| MarqueeError::InvalidRoute(format!("missing {field} in {input:?}"));
        let kind = kind.ok_or_else(|| missing("type"))?;
        let id = id.ok_or_else(|| missing("id"))?;

        Ok(match kind {
            MediaKind::Movie => Self::movie(id),
            MediaKind::Tv => Self::episode(id, season.unwrap_or(1), episode.unwrap_or(1)),
        })
    }
}

impl std::fmt::Display for WatchRequest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.to_route())
    }
}

fn parse_number<T: std::str::FromStr>(field: &str, value: &str) -> Result<T, MarqueeError> {
    value
        .trim()
        .parse()
        .map_err(|_| MarqueeError::InvalidRoute(format!("{field} is not a number: {value:?}")))
}

pub fn detail_route(media: MediaRef) -> String {
    format!("/detail?type={}&id={}", media.kind, media.id)
}

/// Text and link handed to the platform share target.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SharePayload {
    pub text: String,
    pub url: String,
}

impl SharePayload {
    pub fn new(site_base: &str, media: MediaRef, title: &str) -> Self {
        Self {
            text: title.to_string(),
            url: format!("{}{}", site_base.trim_end_matches('/'), detail_route(media)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_routes() {
        assert_eq!(WatchRequest::movie(550).to_route(), "/watch?type=movie&id=550");
        assert_eq!(
            WatchRequest::start(MediaRef::tv(1399)).to_route(),
            "/watch?type=tv&id=1399&season=1&episode=1"
        );
        assert_eq!(detail_route(MediaRef::tv(1399)), "/detail?type=tv&id=1399");
    }

    #[test]
    fn test_parse_route() {
        let req = WatchRequest::parse("/watch?type=tv&id=1399&season=2&episode=5").unwrap();
        assert_eq!(req, WatchRequest::episode(1399, 2, 5));

        let req = WatchRequest::parse("https://example.com/watch?id=550&type=movie").unwrap();
        assert_eq!(req, WatchRequest::movie(550));
    }

    #[test]
    fn test_parse_bare_query_defaults_episode() {
        let req = WatchRequest::parse("type=tv&id=42").unwrap();
        assert_eq!(req.position(), Some((1, 1)));
    }

    #[test]
    fn test_parse_movie_drops_episode() {
        let req = WatchRequest::parse("/watch?type=movie&id=550&season=3").unwrap();
        assert_eq!(req.season, None);
        assert_eq!(req.position(), None);
    }

    #[test]
    fn test_parse_errors() {
        assert!(matches!(
            WatchRequest::parse("/watch?type=tv"),
            Err(MarqueeError::InvalidRoute(_))
        ));
        assert!(matches!(
            WatchRequest::parse("/watch?type=person&id=1"),
            Err(MarqueeError::UnknownMediaType(_))
        ));
        assert!(matches!(
            WatchRequest::parse("/watch?type=tv&id=abc"),
            Err(MarqueeError::InvalidRoute(_))
        ));
    }

    #[test]
    fn test_share_payload() {
        let share = SharePayload::new("https://marquee.local/", MediaRef::movie(550), "Fight Club");
        assert_eq!(share.text, "Fight Club");
        assert_eq!(share.url, "https://marquee.local/detail?type=movie&id=550");
    }
}
