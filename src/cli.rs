use std::path::PathBuf;

use clap::{Parser, Subcommand};
use lastfm_client::Period;

#[derive(Parser, Debug)]
#[command(name = "nowplaying", version, about = "Last.fm listening stats and a live now-playing line")]
pub struct Args {
    /// Defaults to `watch`.
    #[command(subcommand)]
    pub command: Option<Command>,

    /// Look up this user instead of the configured one.
    #[arg(long, short, global = true)]
    pub user: Option<String>,

    /// Config file to read instead of `<config dir>/nowplaying/config.toml`.
    #[arg(long, short, global = true)]
    pub config: Option<PathBuf>,
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Show the track playing right now, updating live.
    Watch,
    /// User info and top tracks of the last 7 days.
    Profile,
    /// The most recent scrobbles.
    Recent {
        #[arg(default_value_t = 10)]
        limit: u32,
    },
    /// PERIOD is overall, 7day, 1month, 3month, 6month or 12month.
    TopArtists { period: Option<Period> },
    TopAlbums { period: Option<Period> },
    Loved,
    Friends,
    Tags,
    /// Available weekly charts and the latest weekly track chart.
    Charts,
}

#[cfg(test)]
mod test {
    use super::*;
    use clap::{error::ErrorKind, CommandFactory};

    fn parse(args: &[&str]) -> Result<Args, clap::Error> {
        Args::try_parse_from(std::iter::once("nowplaying").chain(args.iter().copied()))
    }

    #[test]
    fn definition_is_consistent() {
        Args::command().debug_assert();
    }

    #[test]
    fn no_command_means_watch() {
        let args = parse(&[]).unwrap();
        assert_eq!(args.command, None);
        assert_eq!(args.user, None);
        assert_eq!(args.config, None);
    }

    #[test]
    fn options_and_commands_mix() {
        let args = parse(&["--user", "alice", "top-artists", "7day", "-c", "/tmp/c.toml"]).unwrap();
        assert_eq!(args.user.as_deref(), Some("alice"));
        assert_eq!(args.config, Some(PathBuf::from("/tmp/c.toml")));
        assert_eq!(
            args.command,
            Some(Command::TopArtists {
                period: Some(Period::SevenDay)
            })
        );

        assert_eq!(
            parse(&["recent", "3"]).unwrap().command,
            Some(Command::Recent { limit: 3 })
        );
        assert_eq!(
            parse(&["recent"]).unwrap().command,
            Some(Command::Recent { limit: 10 })
        );
        assert_eq!(
            parse(&["top-albums"]).unwrap().command,
            Some(Command::TopAlbums { period: None })
        );
    }

    #[test]
    fn bad_input_is_rejected() {
        let kind = |args: &[&str]| parse(args).map(|_| ()).unwrap_err().kind();

        assert!(parse(&["dance"]).is_err());
        assert!(parse(&["--user"]).is_err());
        assert_eq!(kind(&["--verbose"]), ErrorKind::UnknownArgument);
        assert_eq!(kind(&["recent", "many"]), ErrorKind::ValueValidation);
        assert_eq!(kind(&["loved", "extra"]), ErrorKind::UnknownArgument);
        assert_eq!(kind(&["top-artists", "forever"]), ErrorKind::ValueValidation);
    }
}
