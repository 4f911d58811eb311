//! Configuration management for albumix.
//!
//! Two kinds of configuration live here:
//!
//! 1. Environment: Spotify endpoint, access token and user id, loaded from
//!    the process environment and an optional `.env` file in the local data
//!    directory (`<data_local_dir>/albumix/.env`).
//! 2. [`BuildConfig`]: the typed, validated settings of one playlist build.

use std::{env, path::PathBuf};

use crate::{
    error::ConfigError,
    selection::SelectionLimits,
    shuffle::{ShuffleAlgorithm, ShuffleConfig},
    types::{AdmissionMode, Collection, DiscoveryFilters},
};

pub const DEFAULT_SPOTIFY_API_URL: &str = "https://api.spotify.com/v1";
pub const DEFAULT_PLAYLIST_NAME: &str = "Album Shuffle";

fn data_dir() -> PathBuf {
    let mut path = dirs::data_local_dir().unwrap_or_else(|| PathBuf::from("."));
    path.push("albumix");
    path
}

/// Loads environment variables from `<data_local_dir>/albumix/.env`.
///
/// The directory is created when missing. A missing `.env` file is fine:
/// values may come from the process environment alone. A file that exists
/// but cannot be parsed is reported.
pub async fn load_env() -> Result<(), String> {
    let dir = data_dir();
    async_fs::create_dir_all(&dir)
        .await
        .map_err(|e| e.to_string())?;

    let path = dir.join(".env");
    if !path.is_file() {
        return Ok(());
    }

    dotenv::from_path(&path).map_err(|e| format!("Cannot load {}: {}", path.display(), e))
}

/// Base URL of the Spotify Web API (`SPOTIFY_API_URL`), defaulting to the
/// public endpoint.
pub fn spotify_apiurl() -> String {
    env::var("SPOTIFY_API_URL").unwrap_or_else(|_| DEFAULT_SPOTIFY_API_URL.to_string())
}

/// Bearer token for the Spotify Web API (`SPOTIFY_ACCESS_TOKEN`).
///
/// Obtaining and refreshing the token is left to an external OAuth helper.
pub fn spotify_access_token() -> Result<String, ConfigError> {
    required("SPOTIFY_ACCESS_TOKEN")
}

/// Spotify user that owns created playlists (`SPOTIFY_USER_ID`).
pub fn spotify_user() -> Result<String, ConfigError> {
    required("SPOTIFY_USER_ID")
}

/// Cache directory, `ALBUMIX_CACHE_DIR` or `<data_local_dir>/albumix/cache`.
pub fn cache_dir() -> PathBuf {
    match env::var("ALBUMIX_CACHE_DIR") {
        Ok(dir) if !dir.trim().is_empty() => PathBuf::from(dir),
        _ => data_dir().join("cache"),
    }
}

fn required(name: &'static str) -> Result<String, ConfigError> {
    match env::var(name) {
        Ok(value) if !value.trim().is_empty() => Ok(value),
        _ => Err(ConfigError::MissingEnv(name)),
    }
}

/// Everything one playlist build needs to know.
#[derive(Debug, Clone, PartialEq)]
pub struct BuildConfig {
    pub sources: Vec<Collection>,
    pub filters: DiscoveryFilters,
    pub limits: SelectionLimits,
    pub mode: AdmissionMode,
    /// Keep the shuffled order when trimming to the limits instead of
    /// re-sorting by type and date.
    pub preserve_order: bool,
    pub algorithm: ShuffleAlgorithm,
    pub shuffle: ShuffleConfig,
    pub seed: Option<u64>,
    pub playlist_name: String,
    pub public: bool,
    pub use_cache: bool,
}

impl BuildConfig {
    /// Defaults: no album limit, 500 tracks, soft admission, random order
    /// kept through selection, singles and compilations replaced by albums.
    pub fn new(sources: Vec<Collection>) -> Result<Self, ConfigError> {
        let config = Self {
            sources,
            filters: DiscoveryFilters::default(),
            limits: SelectionLimits::new(0, 500)?,
            mode: AdmissionMode::Soft,
            preserve_order: true,
            algorithm: ShuffleAlgorithm::Random,
            shuffle: ShuffleConfig::default(),
            seed: None,
            playlist_name: DEFAULT_PLAYLIST_NAME.to_string(),
            public: false,
            use_cache: true,
        };
        config.validate()?;
        Ok(config)
    }

    pub fn with_limits(mut self, max_albums: i64, max_tracks: i64) -> Result<Self, ConfigError> {
        self.limits = SelectionLimits::new(max_albums, max_tracks)?;
        Ok(self)
    }

    pub fn with_playlist_name(mut self, name: &str) -> Result<Self, ConfigError> {
        if name.trim().is_empty() {
            return Err(ConfigError::Empty("playlist_name"));
        }
        self.playlist_name = name.trim().to_string();
        Ok(self)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.sources.is_empty() {
            return Err(ConfigError::Empty("sources"));
        }
        if self.playlist_name.trim().is_empty() {
            return Err(ConfigError::Empty("playlist_name"));
        }
        Ok(())
    }
}
