use std::{
    path::{Path, PathBuf},
    time::Duration,
};

use serde::Deserialize;

use crate::error::AppError;

const DEFAULT_POLL_INTERVAL_SECS: u64 = 5;

#[derive(Debug, Deserialize)]
pub struct Config {
    pub api_key: String,
    pub username: String,
    #[serde(default = "default_base_url")]
    pub base_url: String,
    #[serde(default = "default_poll_interval_secs")]
    pub poll_interval_secs: u64,
}

fn default_base_url() -> String {
    lastfm_client::DEFAULT_BASE_URL.to_owned()
}

fn default_poll_interval_secs() -> u64 {
    DEFAULT_POLL_INTERVAL_SECS
}

impl Config {
    pub fn default_path() -> Result<PathBuf, AppError> {
        Ok(dirs::config_dir()
            .ok_or(AppError::NoConfigDir)?
            .join("nowplaying")
            .join("config.toml"))
    }

    pub fn load(path: &Path) -> Result<Config, AppError> {
        let text = std::fs::read_to_string(path).map_err(|source| AppError::ReadConfig {
            path: path.to_owned(),
            source,
        })?;
        Config::parse(&text)
    }

    pub fn parse(text: &str) -> Result<Config, AppError> {
        Ok(toml::from_str(text)?)
    }

    /// Never shorter than a second.
    pub fn poll_interval(&self) -> Duration {
        Duration::from_secs(self.poll_interval_secs.max(1))
    }
}
