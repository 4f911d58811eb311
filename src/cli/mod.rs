//! # CLI Module
//!
//! Command implementations behind the `albumix` binary. Each command opens a
//! backend (the Spotify Web API, or an offline JSON library with
//! `--library`), runs the library pipeline and reports through the colored
//! output macros.
//!
//! ## Commands
//!
//! - [`build`] - Discover, shuffle, trim and publish a new playlist
//! - [`albums`] - Show the discovered album pool
//! - [`clear_cache`] - Drop cached album pools and collection tracks
//!
//! ## Usage Patterns
//!
//! ```bash
//! albumix build 37i9dQZF1DXcBWIGoYBM5M --liked --max-tracks 200 --algorithm spiral-dance
//! albumix build --library library.json --liked --mode hard --seed 7
//! albumix albums --liked --include-singles --search radiohead
//! albumix cache clear
//! ```
//!
//! Failures that leave nothing useful to do end the process through the
//! `error!` macro; failed sources or album listings are reported as warnings
//! and the command carries on with what it has.

mod albums;
mod backend;
mod build;
mod cache;

pub use albums::albums;
pub use backend::SourceArgs;
pub use build::PlaylistArgs;
pub use build::build;
pub use cache::clear_cache;
