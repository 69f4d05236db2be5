use tokio::io::{AsyncBufReadExt, BufReader, Lines, Stdin};

use marquee_api::traits::CatalogService;
use marquee_core::hero::HeroCarousel;
use marquee_core::links::WatchRequest;
use marquee_core::navigation::Direction;
use marquee_runtime::{Runtime, RuntimeError, WatchSession};

use crate::keyboard::{self, Shortcut};
use crate::render;

/// Screen state of one watch session.
struct WatchScreen {
    session: WatchSession,
    show_details: bool,
    bookmarked: bool,
}

impl WatchScreen {
    fn print(&self) {
        print!(
            "{}",
            render::session(&self.session, self.show_details, self.bookmarked)
        );
    }
}

type Input = Lines<BufReader<Stdin>>;

fn stdin_lines() -> Input {
    BufReader::new(tokio::io::stdin()).lines()
}

/// Next line of input, `None` once stdin closes or fails.
async fn read_line(lines: &mut Input) -> Option<String> {
    match lines.next_line().await {
        Ok(line) => line,
        Err(e) => {
            tracing::warn!(error = %e, "failed to read input");
            None
        }
    }
}

/// Run an interactive session until the user quits or stdin closes.
pub async fn run<C: CatalogService>(
    runtime: &Runtime<C>,
    session: WatchSession,
) -> Result<(), RuntimeError> {
    session_loop(runtime, session, &mut stdin_lines()).await
}

async fn session_loop<C: CatalogService>(
    runtime: &Runtime<C>,
    session: WatchSession,
    lines: &mut Input,
) -> Result<(), RuntimeError> {
    let bookmarked = runtime.is_bookmarked(session.request.media).await?;
    let mut screen = WatchScreen {
        session,
        show_details: false,
        bookmarked,
    };
    screen.print();

    while let Some(line) = read_line(lines).await {
        let Some(shortcut) = keyboard::map_input(&line) else {
            if !line.trim().is_empty() {
                println!("unknown key, press H for help");
            }
            continue;
        };

        match shortcut {
            Shortcut::NextEpisode | Shortcut::PreviousEpisode => {
                let direction = if shortcut == Shortcut::NextEpisode {
                    Direction::Next
                } else {
                    Direction::Previous
                };
                match runtime.step(&screen.session, direction).await {
                    Ok(Some(session)) => {
                        screen.session = session;
                        screen.print();
                    }
                    Ok(None) => println!("no episode in that direction"),
                    Err(e) => eprintln!("error: {e}"),
                }
            }
            Shortcut::ToggleDetails => {
                screen.show_details = !screen.show_details;
                screen.print();
            }
            Shortcut::ToggleBookmark => {
                match runtime.toggle_bookmark(screen.session.request.media).await {
                    Ok(state) => {
                        screen.bookmarked = state;
                        screen.print();
                    }
                    Err(e) => eprintln!("error: {e}"),
                }
            }
            Shortcut::OpenSource => {
                let url = screen.session.source.as_str();
                if let Err(e) = open::that(url) {
                    tracing::warn!(error = %e, url, "failed to open browser");
                    println!("{url}");
                }
            }
            Shortcut::Help => print!("{}", render::help()),
            Shortcut::Quit => break,
        }
    }
    Ok(())
}

/// Step through the trending carousel. `O` starts watching the current slide
/// and returns here when that session ends.
pub async fn browse<C: CatalogService>(
    runtime: &Runtime<C>,
    mut hero: HeroCarousel,
) -> Result<(), RuntimeError> {
    let mut lines = stdin_lines();
    print_slide(runtime, &hero).await?;

    while let Some(line) = read_line(&mut lines).await {
        let Some(shortcut) = keyboard::map_input(&line) else {
            if !line.trim().is_empty() {
                println!("unknown key, press H for help");
            }
            continue;
        };
        let Some(media) = hero.current().map(|slide| slide.media) else {
            break;
        };

        match shortcut {
            Shortcut::NextEpisode => {
                hero.advance();
                print_slide(runtime, &hero).await?;
            }
            Shortcut::PreviousEpisode => {
                hero.retreat();
                print_slide(runtime, &hero).await?;
            }
            Shortcut::ToggleDetails => print_slide(runtime, &hero).await?,
            Shortcut::ToggleBookmark => match runtime.toggle_bookmark(media).await {
                Ok(true) => println!("added {media} to your watchlist"),
                Ok(false) => println!("removed {media} from your watchlist"),
                Err(e) => eprintln!("error: {e}"),
            },
            Shortcut::OpenSource => {
                match runtime.open_watch(WatchRequest::start(media)).await {
                    Ok(session) => {
                        session_loop(runtime, session, &mut lines).await?;
                        print_slide(runtime, &hero).await?;
                    }
                    Err(e) => eprintln!("error: {e}"),
                }
            }
            Shortcut::Help => print!("{}", render::hero_help()),
            Shortcut::Quit => break,
        }
    }
    Ok(())
}

async fn print_slide<C: CatalogService>(
    runtime: &Runtime<C>,
    hero: &HeroCarousel,
) -> Result<(), RuntimeError> {
    let Some(slide) = hero.current() else {
        return Ok(());
    };
    let bookmarked = match runtime.config().profile.user() {
        Some(_) => Some(runtime.is_bookmarked(slide.media).await?),
        None => None,
    };
    println!("[{}/{}]", hero.index() + 1, hero.slides().len());
    print!(
        "{}",
        render::slide(slide, hero.current_image(), bookmarked)
    );
    Ok(())
}
