//! Watch session shortcuts.
//!
//! Maps typed keys to semantic `Shortcut` variants. Upper-case letters are
//! the SHIFT combinations the web player advertises; lower-case works too.

/// Shortcuts available while a title is playing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Shortcut {
    /// N — next episode, or the first episode of the next season.
    NextEpisode,
    /// P — previous episode.
    PreviousEpisode,
    /// M — show or hide the details panel.
    ToggleDetails,
    /// B — add to or remove from the watchlist.
    ToggleBookmark,
    /// O — open the playback source in the browser.
    OpenSource,
    /// H or ? — list shortcuts.
    Help,
    /// Q — leave the session.
    Quit,
}

impl Shortcut {
    pub const ALL: &[Shortcut] = &[
        Self::NextEpisode,
        Self::PreviousEpisode,
        Self::ToggleDetails,
        Self::ToggleBookmark,
        Self::OpenSource,
        Self::Help,
        Self::Quit,
    ];

    pub fn key(&self) -> char {
        match self {
            Self::NextEpisode => 'N',
            Self::PreviousEpisode => 'P',
            Self::ToggleDetails => 'M',
            Self::ToggleBookmark => 'B',
            Self::OpenSource => 'O',
            Self::Help => 'H',
            Self::Quit => 'Q',
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            Self::NextEpisode => "next episode",
            Self::PreviousEpisode => "previous episode",
            Self::ToggleDetails => "more / close details",
            Self::ToggleBookmark => "add to / remove from watchlist",
            Self::OpenSource => "open player in browser",
            Self::Help => "show shortcuts",
            Self::Quit => "go back",
        }
    }
}

/// Map one line of input to a shortcut. Only the first non-blank character counts.
pub fn map_input(line: &str) -> Option<Shortcut> {
    let key = line.trim().chars().next()?;
    match key.to_ascii_uppercase() {
        'N' => Some(Shortcut::NextEpisode),
        'P' => Some(Shortcut::PreviousEpisode),
        'M' => Some(Shortcut::ToggleDetails),
        'B' => Some(Shortcut::ToggleBookmark),
        'O' => Some(Shortcut::OpenSource),
        'H' | '?' => Some(Shortcut::Help),
        'Q' => Some(Shortcut::Quit),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_shift_and_plain_keys() {
        assert_eq!(map_input("N"), Some(Shortcut::NextEpisode));
        assert_eq!(map_input("n\n"), Some(Shortcut::NextEpisode));
        assert_eq!(map_input("  p"), Some(Shortcut::PreviousEpisode));
        assert_eq!(map_input("?"), Some(Shortcut::Help));
    }

    #[test]
    fn test_unknown_and_blank() {
        assert_eq!(map_input(""), None);
        assert_eq!(map_input("   "), None);
        assert_eq!(map_input("x"), None);
    }

    #[test]
    fn test_keys_roundtrip() {
        for shortcut in Shortcut::ALL {
            assert_eq!(map_input(&shortcut.key().to_string()), Some(*shortcut));
        }
    }
}
