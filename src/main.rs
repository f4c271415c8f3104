use clap::Parser;
use cli::{Args, Command};
use config::Config;
use error::AppError;
use lastfm_client::{ClientContext, LastFmAuth};
use library::Library;
use tracing::{debug, error};
use watcher::NowPlayingWatcher;

mod cli;
mod config;
mod error;
mod library;
mod render;
mod watcher;

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt::init();

    let args = Args::parse();

    if let Err(e) = run(args).await {
        error!(error = %e, "nowplaying failed");
        eprintln!("error: {}", e);
        std::process::exit(1);
    }
}

async fn run(args: Args) -> Result<(), AppError> {
    let config_path = match &args.config {
        Some(path) => path.clone(),
        None => Config::default_path()?,
    };
    debug!(path = %config_path.display(), "Loading config");
    let config = Config::load(&config_path)?;
    let poll_interval = config.poll_interval();

    let context = ClientContext::new(LastFmAuth::new(config.api_key), config.base_url)
        .with_fallback_username(config.username);
    let library = Library::new(context.get_instance(args.user.as_deref())?);

    match args.command.unwrap_or(Command::Watch) {
        Command::Watch => watch(library, poll_interval).await,
        Command::Profile => println!("{}", render::profile(&library.profile().await?)),
        Command::Recent { limit } => println!("{}", render::recent(&library.recent(limit).await?)),
        Command::TopArtists { period } => {
            println!("{}", render::top_artists(&library.top_artists(period).await?))
        }
        Command::TopAlbums { period } => {
            println!("{}", render::top_albums(&library.top_albums(period).await?))
        }
        Command::Loved => println!("{}", render::loved(&library.loved().await?)),
        Command::Friends => println!("{}", render::friends(&library.friends().await?)),
        Command::Tags => print!("{}", render::tags(&library.tags().await?)),
        Command::Charts => print!("{}", render::charts(&library.charts().await?)),
    }

    Ok(())
}

/// Prints the playing track whenever it changes, until Ctrl-C.
async fn watch(library: Library, poll_interval: std::time::Duration) {
    println!("Watching {}'s scrobbles, Ctrl-C to stop.", library.username());

    let watcher = NowPlayingWatcher::new(library, poll_interval);
    let mut status_rx = watcher.status_rx();

    loop {
        tokio::select! {
            changed = status_rx.changed() => {
                if changed.is_err() {
                    break;
                }
                let status = status_rx.borrow_and_update().clone();
                println!("{}", render::now_playing(status.playing_track.as_ref()));
            }
            _ = tokio::signal::ctrl_c() => break,
        }
    }
}
