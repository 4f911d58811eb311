//! Album Shuffle Library
//!
//! Builds playlists out of whole albums. The tracks of one or more source
//! collections (playlists, liked songs) are turned into a pool of albums,
//! ordered by one of several shuffle algorithms, trimmed to album and track
//! limits and expanded back into a flat track list.
//!
//! # Modules
//!
//! - `cli` - Command-line interface implementations
//! - `config` - Environment and build configuration
//! - `discovery` - Album pool discovery and parent album resolution
//! - `error` - Error types
//! - `library` - Offline JSON collaborator
//! - `management` - Caches and cache stores
//! - `materialize` - Album list to track list expansion
//! - `pipeline` - End-to-end playlist build
//! - `provider` - Collaborator traits
//! - `selection` - Track-limit aware album selection
//! - `shuffle` - Album ordering algorithms
//! - `spotify` - Spotify Web API collaborator
//! - `types` - Data structures and type definitions
//! - `utils` - Utility functions and helpers
//!
//! # Example
//!
//! ```
//! use albumix::{config::BuildConfig, library::LocalLibrary, pipeline::PlaylistBuilder};
//!
//! #[tokio::main]
//! async fn main() -> albumix::Res<()> {
//!     let library = LocalLibrary::load("library.json".as_ref()).await?;
//!     let config = BuildConfig::new(vec![albumix::types::Collection::LikedSongs])?;
//!     let build = PlaylistBuilder::new(&library, &library).build(&config).await?;
//!     println!("{} tracks", build.tracks.len());
//!     Ok(())
//! }
//! ```

pub mod cli;
pub mod config;
pub mod discovery;
pub mod error;
pub mod library;
pub mod management;
pub mod materialize;
pub mod pipeline;
pub mod provider;
pub mod selection;
pub mod shuffle;
pub mod spotify;
pub mod types;
pub mod utils;

/// A convenient Result type alias for the command-line layer.
///
/// Boxes any error while keeping Send + Sync bounds for async contexts. The
/// library modules use the typed [`error::Result`] instead.
pub type Res<T> = std::result::Result<T, Box<dyn std::error::Error + Send + Sync>>;

/// Prints an informational message with a blue bullet point.
///
/// # Example
///
/// ```
/// info!("Fetching {} playlists", count);
/// ```
#[macro_export]
macro_rules! info {
  ($($arg:tt)*) => ({
    use colored::Colorize;
    println!("[{}] {}", "o".blue().bold(), std::format_args!($($arg)*));
  })
}

/// Prints a success message with a green checkmark.
///
/// # Example
///
/// ```
/// success!("Playlist created with {} tracks", count);
/// ```
#[macro_export]
macro_rules! success {
  ($($arg:tt)*) => ({
    use colored::Colorize;
    println!("[{}] {}", "✓".green().bold(), std::format_args!($($arg)*));
  })
}

/// Prints an error message with a red exclamation mark and exits the program.
///
/// Only for unrecoverable errors in the command-line layer; code after the
/// macro does not run.
///
/// # Example
///
/// ```
/// error!("Missing required environment variable: {}", var_name);
/// ```
#[macro_export]
macro_rules! error {
  ($($arg:tt)*) => ({
    use colored::Colorize;
    println!("[{}] {}", "!".red().bold(), std::format_args!($($arg)*));
    std::process::exit(1);
  })
}

/// Prints a warning message with a yellow exclamation mark.
///
/// # Example
///
/// ```
/// warning!("Cannot fetch playlist {}, skipping", id);
/// ```
#[macro_export]
macro_rules! warning {
  ($($arg:tt)*) => ({
    use colored::Colorize;
    println!("[{}] {}", "!".yellow().bold(), std::format_args!($($arg)*));
  })
}
