//! Plain-text rendering of screens.

use std::fmt::Write;

use marquee_api::traits::MediaDetails;
use marquee_core::hero::{HeroCarousel, HeroSlide};
use marquee_core::navigation::ForwardState;
use marquee_runtime::WatchSession;

use crate::keyboard::Shortcut;

/// One line per slide: index, badge, title.
pub fn trending(hero: &HeroCarousel) -> String {
    if hero.is_empty() {
        return "Nothing is trending right now.\n".to_string();
    }
    let mut out = String::new();
    for (i, slide) in hero.slides().iter().enumerate() {
        let _ = writeln!(
            out,
            "{i:>3}  {:<5}  {:<8} {}",
            slide.type_label(),
            slide.media.id,
            slide.display_title()
        );
    }
    out
}

pub fn slide(slide: &HeroSlide, image: Option<&str>, bookmarked: Option<bool>) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{}", slide.display_title());
    let _ = writeln!(out, "{}", slide.type_label());
    if let Some(overview) = slide.overview.as_deref().filter(|o| !o.is_empty()) {
        let _ = writeln!(out, "\n{overview}\n");
    }
    let _ = writeln!(out, "watch   {}", slide.watch_route());
    let _ = writeln!(out, "detail  {}", slide.detail_route());
    if let Some(image) = image {
        let _ = writeln!(out, "image   {image}");
    }
    match bookmarked {
        Some(true) => {
            let _ = writeln!(out, "in your watchlist");
        }
        Some(false) => {
            let _ = writeln!(out, "not in your watchlist");
        }
        None => {}
    }
    out
}

/// One line per library title.
pub fn library(items: &[MediaDetails]) -> String {
    if items.is_empty() {
        return "Nothing here yet.\n".to_string();
    }
    let mut out = String::new();
    for item in items {
        let year = item
            .release_date
            .as_deref()
            .and_then(|d| d.get(..4))
            .unwrap_or("----");
        let _ = writeln!(
            out,
            "{:<5}  {:<8} {year}  {}",
            item.media.kind.label(),
            item.media.id,
            item.title
        );
    }
    out
}

pub fn details(details: &MediaDetails) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{}", details.title);
    if let Some(tagline) = &details.tagline {
        let _ = writeln!(out, "\"{tagline}\"");
    }
    let mut facts = Vec::new();
    if let Some(date) = &details.release_date {
        facts.push(date.clone());
    }
    if let Some(runtime) = details.runtime {
        facts.push(format!("{runtime} min"));
    }
    if let Some(score) = details.vote_average {
        facts.push(format!("{score:.1}/10"));
    }
    if let Some(seasons) = details.number_of_seasons {
        facts.push(format!("{seasons} season{}", if seasons == 1 { "" } else { "s" }));
    }
    if !details.genres.is_empty() {
        facts.push(details.genres.join(", "));
    }
    if !facts.is_empty() {
        let _ = writeln!(out, "{}", facts.join(" | "));
    }
    if let Some(overview) = details.overview.as_deref().filter(|o| !o.is_empty()) {
        let _ = writeln!(out, "\n{overview}");
    }
    out
}

/// The watch screen: heading, source, and the available controls.
pub fn session(session: &WatchSession, show_details: bool, bookmarked: bool) -> String {
    let mut out = String::new();
    let _ = write!(out, "> {}", session.heading());
    if let Some(name) = session.episode.as_ref().and_then(|e| e.name.as_deref()) {
        let _ = write!(out, "  \"{name}\"");
    }
    let _ = writeln!(out);
    let _ = writeln!(out, "  source: {}", session.source);

    let mut controls = Vec::new();
    if let Some(nav) = &session.navigator {
        let back = if nav.backward_active() { "" } else { " (inactive)" };
        controls.push(format!("[P] {}{back}", nav.previous_hint()));
        let forward = match nav.forward_state() {
            ForwardState::Active => "",
            ForwardState::NextSeason => " (next season)",
            ForwardState::Inactive => " (inactive)",
        };
        controls.push(format!("[N] {}{forward}", nav.next_hint()));
    }
    controls.push(if show_details { "[M] close" } else { "[M] More" }.to_string());
    controls.push(
        if bookmarked {
            "[B] Remove from Watchlist"
        } else {
            "[B] Add to Watchlist"
        }
        .to_string(),
    );
    controls.push("[O] Open".to_string());
    controls.push("[Q] Back".to_string());
    let _ = writeln!(out, "  {}", controls.join("   "));

    if show_details {
        let _ = writeln!(out);
        out.push_str(&details(&session.details));
        if let Some(overview) = session
            .episode
            .as_ref()
            .and_then(|e| e.overview.as_deref())
            .filter(|o| !o.is_empty())
        {
            let _ = writeln!(out, "\nThis episode: {overview}");
        }
    }
    out
}

pub fn help() -> String {
    let mut out = String::new();
    for shortcut in Shortcut::ALL {
        let _ = writeln!(out, "  {}  {}", shortcut.key(), shortcut.description());
    }
    out
}

/// Keys of the carousel browser, which reuses the watch keys.
pub fn hero_help() -> String {
    let keys = [
        (Shortcut::NextEpisode, "next slide"),
        (Shortcut::PreviousEpisode, "previous slide"),
        (Shortcut::ToggleBookmark, "add to / remove from watchlist"),
        (Shortcut::OpenSource, "watch this title"),
        (Shortcut::Help, "show shortcuts"),
        (Shortcut::Quit, "quit"),
    ];
    let mut out = String::new();
    for (shortcut, description) in keys {
        let _ = writeln!(out, "  {}  {description}", shortcut.key());
    }
    out
}
