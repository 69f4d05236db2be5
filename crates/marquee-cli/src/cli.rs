//! Command-line surface.

use clap::{Args, Parser, Subcommand, ValueEnum};

use marquee_core::error::MarqueeError;
use marquee_core::links::WatchRequest;
use marquee_core::models::{ListKind, MediaKind, MediaRef};

#[derive(Debug, Parser)]
#[command(
    name = "marquee",
    version,
    about = "Browse trending titles and play them through an embedded player"
)]
pub struct Cli {
    /// Log debug output to stderr.
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// List what is trending right now.
    Trending {
        /// Override the configured trending window.
        #[arg(long, value_enum)]
        window: Option<WindowArg>,
    },
    /// Show one trending title with its links.
    Hero {
        /// Position in the trending list, starting at 0.
        #[arg(long, default_value_t = 0)]
        index: usize,
        /// Step through the carousel interactively.
        #[arg(long)]
        browse: bool,
    },
    /// Start an interactive watch session.
    Watch(WatchArgs),
    /// Print the playback source for a title without starting a session.
    Source(WatchArgs),
    /// Manage the watchlist.
    #[command(subcommand)]
    Bookmark(BookmarkCommand),
    /// Show the watchlist or continue-watching list.
    Library(LibraryArgs),
    /// Print a shareable link to a title.
    Share {
        #[command(flatten)]
        target: TargetArgs,
        /// Copy the link to the clipboard.
        #[arg(long)]
        copy: bool,
    },
    /// Inspect or create the config file.
    #[command(subcommand)]
    Config(ConfigCommand),
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum KindArg {
    Movie,
    Tv,
}

impl From<KindArg> for MediaKind {
    fn from(kind: KindArg) -> Self {
        match kind {
            KindArg::Movie => MediaKind::Movie,
            KindArg::Tv => MediaKind::Tv,
        }
    }
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum ListArg {
    Watchlist,
    Continue,
}

impl From<ListArg> for ListKind {
    fn from(list: ListArg) -> Self {
        match list {
            ListArg::Watchlist => ListKind::Watchlist,
            ListArg::Continue => ListKind::ContinueWatching,
        }
    }
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum WindowArg {
    Day,
    Week,
}

impl WindowArg {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Day => "day",
            Self::Week => "week",
        }
    }
}

/// A title given as `<kind> <id>`.
#[derive(Debug, Clone, Args)]
pub struct TargetArgs {
    #[arg(value_enum)]
    pub kind: KindArg,
    pub id: u64,
}

impl TargetArgs {
    pub fn media(&self) -> MediaRef {
        MediaRef::new(self.kind.into(), self.id)
    }
}

#[derive(Debug, Clone, Args)]
pub struct WatchArgs {
    /// A watch route such as `/watch?type=tv&id=1399&season=1&episode=1`.
    #[arg(long, conflicts_with_all = ["kind", "id"])]
    pub route: Option<String>,

    #[arg(value_enum, required_unless_present = "route")]
    pub kind: Option<KindArg>,

    #[arg(required_unless_present = "route")]
    pub id: Option<u64>,

    #[arg(long)]
    pub season: Option<u32>,

    #[arg(long)]
    pub episode: Option<u32>,

    /// Continue from the last opened episode.
    #[arg(long, conflicts_with_all = ["season", "episode", "route"])]
    pub resume: bool,
}

impl WatchArgs {
    /// The requested title and position. `None` kind/id only happens with `--route`.
    pub fn request(&self) -> Result<WatchRequest, MarqueeError> {
        if let Some(route) = &self.route {
            return WatchRequest::parse(route);
        }
        match (self.kind, self.id) {
            (Some(KindArg::Movie), Some(id)) => Ok(WatchRequest::movie(id)),
            (Some(KindArg::Tv), Some(id)) => Ok(WatchRequest::episode(
                id,
                self.season.unwrap_or(1),
                self.episode.unwrap_or(1),
            )),
            _ => Err(MarqueeError::InvalidRoute(
                "expected <kind> <id> or --route".into(),
            )),
        }
    }
}

#[derive(Debug, Subcommand)]
pub enum BookmarkCommand {
    Add(TargetArgs),
    Remove(TargetArgs),
    Check(TargetArgs),
    /// List watchlist titles.
    List {
        #[arg(long, value_enum, default_value = "movie")]
        kind: KindArg,
    },
}

#[derive(Debug, Args)]
pub struct LibraryArgs {
    #[arg(long, value_enum, default_value = "watchlist")]
    pub list: ListArg,

    #[arg(long, value_enum, default_value = "movie")]
    pub kind: KindArg,

    /// Remove this id from the chosen list instead of listing it.
    #[arg(long)]
    pub remove: Option<u64>,
}

#[derive(Debug, Subcommand)]
pub enum ConfigCommand {
    /// Print the effective configuration.
    Show,
    /// Print config, database and log locations.
    Path,
    /// Write the default config file if none exists.
    Init,
}
