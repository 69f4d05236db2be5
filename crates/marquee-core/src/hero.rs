//! Home screen hero carousel over the trending list.

use serde::{Deserialize, Serialize};

use crate::links::{detail_route, WatchRequest};
use crate::models::MediaRef;

/// One trending title shown in the carousel.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HeroSlide {
    pub media: MediaRef,
    pub title: Option<String>,
    pub name: Option<String>,
    pub backdrop_path: Option<String>,
    pub overview: Option<String>,
}

impl HeroSlide {
    /// Movies carry `title`, shows carry `name`.
    pub fn display_title(&self) -> &str {
        self.title
            .as_deref()
            .filter(|t| !t.is_empty())
            .or(self.name.as_deref().filter(|n| !n.is_empty()))
            .unwrap_or("name")
    }

    pub fn type_label(&self) -> &'static str {
        self.media.kind.label()
    }

    pub fn watch_route(&self) -> String {
        WatchRequest::start(self.media).to_route()
    }

    pub fn detail_route(&self) -> String {
        detail_route(self.media)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HeroCarousel {
    slides: Vec<HeroSlide>,
    images: Vec<String>,
    index: usize,
}

impl HeroCarousel {
    /// Build the carousel. Slides without a backdrop show the fallback image;
    /// an empty carousel still shows the fallback once.
    pub fn new(slides: Vec<HeroSlide>, image_base: &str, fallback_image: &str) -> Self {
        let images = if slides.is_empty() {
            vec![fallback_image.to_string()]
        } else {
            slides
                .iter()
                .map(|s| match s.backdrop_path.as_deref().filter(|p| !p.is_empty()) {
                    Some(path) => format!("{image_base}{path}"),
                    None => fallback_image.to_string(),
                })
                .collect()
        };
        Self {
            slides,
            images,
            index: 0,
        }
    }

    pub fn slides(&self) -> &[HeroSlide] {
        &self.slides
    }

    pub fn images(&self) -> &[String] {
        &self.images
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn is_empty(&self) -> bool {
        self.slides.is_empty()
    }

    pub fn current(&self) -> Option<&HeroSlide> {
        self.slides.get(self.index)
    }

    pub fn current_image(&self) -> Option<&str> {
        self.images.get(self.index).map(String::as_str)
    }

    pub fn advance(&mut self) {
        if !self.slides.is_empty() {
            self.index = (self.index + 1) % self.slides.len();
        }
    }

    pub fn retreat(&mut self) {
        if !self.slides.is_empty() {
            self.index = (self.index + self.slides.len() - 1) % self.slides.len();
        }
    }

    /// Jump to a slide, clamping to the last one.
    pub fn select(&mut self, index: usize) {
        self.index = index.min(self.slides.len().saturating_sub(1));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const BASE: &str = "https://image.tmdb.org/t/p/original";
    const FALLBACK: &str = "/images/logo.svg";

    fn slide(
        media: MediaRef,
        title: Option<&str>,
        name: Option<&str>,
        backdrop: Option<&str>,
    ) -> HeroSlide {
        HeroSlide {
            media,
            title: title.map(Into::into),
            name: name.map(Into::into),
            backdrop_path: backdrop.map(Into::into),
            overview: None,
        }
    }

    fn sample() -> HeroCarousel {
        HeroCarousel::new(
            vec![
                slide(MediaRef::movie(550), Some("Fight Club"), None, Some("/fc.jpg")),
                slide(MediaRef::tv(1399), None, Some("Game of Thrones"), None),
                slide(MediaRef::tv(66732), None, None, Some("/st.jpg")),
            ],
            BASE,
            FALLBACK,
        )
    }

    #[test]
    fn test_images_align_with_slides() {
        let hero = sample();
        assert_eq!(hero.images().len(), 3);
        assert_eq!(hero.images()[0], format!("{BASE}/fc.jpg"));
        assert_eq!(hero.images()[1], FALLBACK);
    }

    #[test]
    fn test_empty_carousel_shows_fallback() {
        let hero = HeroCarousel::new(Vec::new(), BASE, FALLBACK);
        assert!(hero.current().is_none());
        assert_eq!(hero.images(), [FALLBACK.to_string()]);
        assert_eq!(hero.current_image(), Some(FALLBACK));
    }

    #[test]
    fn test_titles_and_labels() {
        let hero = sample();
        assert_eq!(hero.slides()[0].display_title(), "Fight Club");
        assert_eq!(hero.slides()[1].display_title(), "Game of Thrones");
        assert_eq!(hero.slides()[2].display_title(), "name");
        assert_eq!(hero.slides()[0].type_label(), "MOVIE");
        assert_eq!(hero.slides()[1].type_label(), "SHOW");
    }

    #[test]
    fn test_links() {
        let hero = sample();
        assert_eq!(hero.slides()[0].watch_route(), "/watch?type=movie&id=550");
        assert_eq!(
            hero.slides()[1].watch_route(),
            "/watch?type=tv&id=1399&season=1&episode=1"
        );
        assert_eq!(hero.slides()[1].detail_route(), "/detail?type=tv&id=1399");
    }

    #[test]
    fn test_navigation_wraps() {
        let mut hero = sample();
        hero.retreat();
        assert_eq!(hero.index(), 2);
        hero.advance();
        assert_eq!(hero.index(), 0);
        hero.select(10);
        assert_eq!(hero.index(), 2);
    }
}
