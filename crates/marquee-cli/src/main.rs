mod cli;
mod keyboard;
mod logging;
mod render;
mod watch;

use std::process::ExitCode;

use clap::Parser;

use marquee_core::config::AppConfig;
use marquee_core::error::MarqueeError;
use marquee_core::models::{ListKind, MediaRef};
use marquee_runtime::{Runtime, RuntimeError};

use cli::{BookmarkCommand, Cli, Command, ConfigCommand};

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    let _log_guard = logging::init(cli.verbose, &AppConfig::data_dir());

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::debug!(error = ?e, "command failed");
            eprintln!("error: {e}");
            ExitCode::FAILURE
        }
    }
}

fn config_error(e: impl std::fmt::Display) -> RuntimeError {
    RuntimeError::Config(e.to_string())
}

async fn run(cli: Cli) -> Result<(), RuntimeError> {
    let mut config = AppConfig::load()?;

    let command = match cli.command {
        Command::Config(command) => return config_command(&config, command),
        Command::Trending {
            window: Some(window),
        } => {
            config.tmdb.trending_window = window.as_str().to_string();
            Command::Trending { window: None }
        }
        command => command,
    };

    let runtime = Runtime::open(config)?;

    match command {
        Command::Trending { .. } => {
            let hero = runtime.home_hero().await;
            print!("{}", render::trending(&hero));
        }
        Command::Hero { index, browse } => {
            let mut hero = runtime.home_hero().await;
            if hero.is_empty() {
                // Nothing to show but the fallback artwork.
                println!("Nothing is trending right now.");
                if let Some(image) = hero.current_image() {
                    println!("image   {image}");
                }
                return Ok(());
            }
            if index >= hero.slides().len() {
                return Err(RuntimeError::NotFound(format!(
                    "trending slide {index} (have {})",
                    hero.slides().len()
                )));
            }
            hero.select(index);
            if browse {
                watch::browse(&runtime, hero).await?;
            } else if let Some(slide) = hero.current() {
                let bookmarked = match runtime.config().profile.user() {
                    Some(_) => Some(runtime.is_bookmarked(slide.media).await?),
                    None => None,
                };
                print!(
                    "{}",
                    render::slide(slide, hero.current_image(), bookmarked)
                );
            }
        }
        Command::Watch(args) => {
            let request = if args.resume {
                runtime.resume_request(target_of(&args)?).await?
            } else {
                args.request()?
            };
            let session = runtime.open_watch(request).await?;
            watch::run(&runtime, session).await?;
        }
        Command::Source(args) => {
            let request = if args.resume {
                runtime.resume_request(target_of(&args)?).await?
            } else {
                args.request()?
            };
            let session = runtime.open_watch(request).await?;
            println!("{}", session.source);
        }
        Command::Bookmark(command) => match command {
            BookmarkCommand::Add(target) => {
                runtime.add_bookmark(target.media()).await?;
                println!("added {} to your watchlist", target.media());
            }
            BookmarkCommand::Remove(target) => {
                if runtime.remove_bookmark(target.media()).await? {
                    println!("removed {} from your watchlist", target.media());
                } else {
                    println!("{} was not in your watchlist", target.media());
                }
            }
            BookmarkCommand::Check(target) => {
                let state = runtime.is_bookmarked(target.media()).await?;
                println!("{}", if state { "bookmarked" } else { "not bookmarked" });
            }
            BookmarkCommand::List { kind } => {
                let items = runtime.library(ListKind::Watchlist, kind.into()).await?;
                print!("{}", render::library(&items));
            }
        },
        Command::Library(args) => {
            let list = ListKind::from(args.list);
            if let Some(id) = args.remove {
                let media = MediaRef::new(args.kind.into(), id);
                if runtime.remove_from_library(list, media).await? {
                    println!("removed {media} from {list}");
                } else {
                    println!("{media} was not in {list}");
                }
            } else {
                println!("{list}");
                let items = runtime.library(list, args.kind.into()).await?;
                print!("{}", render::library(&items));
            }
        }
        Command::Share { target, copy } => {
            let payload = runtime.share(target.media()).await?;
            println!("{}", payload.text);
            println!("{}", payload.url);
            if copy {
                match arboard::Clipboard::new().and_then(|mut c| c.set_text(payload.url.clone())) {
                    Ok(()) => println!("link copied to clipboard"),
                    Err(e) => tracing::warn!(error = %e, "failed to copy link to clipboard"),
                }
            }
        }
        // Answered before the runtime opens.
        Command::Config(_) => {}
    }
    Ok(())
}

fn target_of(args: &cli::WatchArgs) -> Result<MediaRef, RuntimeError> {
    match (args.kind, args.id) {
        (Some(kind), Some(id)) => Ok(MediaRef::new(kind.into(), id)),
        _ => Err(MarqueeError::InvalidRoute("--resume needs <kind> <id>".into()).into()),
    }
}

fn config_command(config: &AppConfig, command: ConfigCommand) -> Result<(), RuntimeError> {
    match command {
        ConfigCommand::Show => {
            let text = toml::to_string_pretty(config).map_err(config_error)?;
            print!("{text}");
        }
        ConfigCommand::Path => {
            println!("config    {}", AppConfig::config_path().display());
            println!("database  {}", AppConfig::db_path().display());
            println!("logs      {}", AppConfig::data_dir().display());
        }
        ConfigCommand::Init => {
            let path = AppConfig::config_path();
            if path.exists() {
                println!("config already exists at {}", path.display());
            } else {
                AppConfig::default().save_to(&path)?;
                println!("wrote {}", path.display());
            }
        }
    }
    Ok(())
}
