use std::path::PathBuf;

use lastfm_client::ApiError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Can't resolve system config dir")]
    NoConfigDir,

    #[error("Can't read config file at {}", path.display())]
    ReadConfig {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Bad config file format")]
    BadConfig(#[from] toml::de::Error),

    #[error(transparent)]
    Api(#[from] ApiError),
}
