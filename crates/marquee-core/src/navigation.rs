//! Next/previous episode navigation for the watch screen.
//!
//! Bounds come from the current season's episode list and the show's season
//! count. Until metadata arrives the defaults below apply, so a freshly
//! opened episode 1 can always step forward once.

use serde::{Deserialize, Serialize};

const DEFAULT_MIN_EPISODE: u32 = 1;
const DEFAULT_MAX_EPISODE: u32 = 2;
const DEFAULT_MAX_SEASON: u32 = 1;

/// Episode range of the current season plus what lies beyond it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct EpisodeBounds {
    pub min_episode: u32,
    pub max_episode: u32,
    pub max_season: u32,
    pub next_season_first_episode: u32,
}

impl Default for EpisodeBounds {
    fn default() -> Self {
        Self {
            min_episode: DEFAULT_MIN_EPISODE,
            max_episode: DEFAULT_MAX_EPISODE,
            max_season: DEFAULT_MAX_SEASON,
            next_season_first_episode: 1,
        }
    }
}

impl EpisodeBounds {
    /// Derive bounds from a season's episode numbers, in upstream order.
    ///
    /// The first and last entries are taken as-is; an empty list keeps the
    /// default episode range.
    pub fn from_season(episode_numbers: &[u32], number_of_seasons: Option<u32>) -> Self {
        let mut bounds = Self::default();
        if let Some(seasons) = number_of_seasons {
            bounds.max_season = seasons;
        }
        if let (Some(first), Some(last)) = (episode_numbers.first(), episode_numbers.last()) {
            bounds.min_episode = *first;
            bounds.max_episode = *last;
        }
        bounds
    }

    pub fn with_next_season_first_episode(mut self, episode: u32) -> Self {
        self.next_season_first_episode = episode;
        self
    }
}

/// Where a navigation step lands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct EpisodePosition {
    pub season: u32,
    pub episode: u32,
}

/// Visual state of the forward control.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ForwardState {
    Active,
    /// Last episode of the season, but another season follows.
    NextSeason,
    Inactive,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Previous,
    Next,
}

/// Navigation state for one episode of a show.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EpisodeNavigator {
    pub season: u32,
    pub episode: u32,
    pub bounds: EpisodeBounds,
}

impl EpisodeNavigator {
    pub fn new(season: u32, episode: u32, bounds: EpisodeBounds) -> Self {
        Self {
            season,
            episode,
            bounds,
        }
    }

    pub fn has_previous(&self) -> bool {
        self.episode > self.bounds.min_episode
    }

    fn has_next_in_season(&self) -> bool {
        self.episode < self.bounds.max_episode
    }

    fn has_next_season(&self) -> bool {
        self.season < self.bounds.max_season
    }

    /// Steps from outside the season's range land back on its nearest edge.
    pub fn previous(&self) -> Option<EpisodePosition> {
        self.has_previous().then(|| EpisodePosition {
            season: self.season,
            episode: (self.episode - 1).min(self.bounds.max_episode),
        })
    }

    pub fn next(&self) -> Option<EpisodePosition> {
        if self.has_next_in_season() {
            Some(EpisodePosition {
                season: self.season,
                episode: (self.episode + 1).max(self.bounds.min_episode),
            })
        } else if self.has_next_season() {
            Some(EpisodePosition {
                season: self.season + 1,
                episode: self.bounds.next_season_first_episode,
            })
        } else {
            None
        }
    }

    pub fn step(&self, direction: Direction) -> Option<EpisodePosition> {
        match direction {
            Direction::Previous => self.previous(),
            Direction::Next => self.next(),
        }
    }

    /// Whether the first episode of the following season is worth looking up.
    pub fn needs_next_season_prefetch(&self) -> bool {
        self.episode >= self.bounds.max_episode.saturating_sub(1) && self.has_next_season()
    }

    pub fn previous_hint(&self) -> String {
        if self.has_previous() {
            "Previous episode".to_string()
        } else {
            format!("Start of season {}", self.season)
        }
    }

    pub fn next_hint(&self) -> String {
        if self.has_next_in_season() {
            "Next episode".to_string()
        } else if self.has_next_season() {
            format!("Start season {}", self.season + 1)
        } else {
            format!("End of season {}", self.season)
        }
    }

    pub fn backward_active(&self) -> bool {
        self.has_previous()
    }

    pub fn forward_state(&self) -> ForwardState {
        let at_end = self.episode >= self.bounds.max_episode;
        if at_end && self.season >= self.bounds.max_season {
            ForwardState::Inactive
        } else if at_end {
            ForwardState::NextSeason
        } else {
            ForwardState::Active
        }
    }
}
