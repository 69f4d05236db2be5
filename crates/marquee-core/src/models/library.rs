use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::media::MediaRef;

/// The two user-curated lists shown in the library.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ListKind {
    Watchlist,
    ContinueWatching,
}

impl ListKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Watchlist => "Watchlist",
            Self::ContinueWatching => "Continue Watching",
        }
    }

    pub const ALL: &[ListKind] = &[Self::Watchlist, Self::ContinueWatching];
}

impl std::fmt::Display for ListKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A watchlist entry.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Bookmark {
    pub media: MediaRef,
    pub added_at: DateTime<Utc>,
}

/// A title the user started playing, with the last position for shows.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContinueEntry {
    pub media: MediaRef,
    pub season: Option<u32>,
    pub episode: Option<u32>,
    pub updated_at: DateTime<Utc>,
}
