//! Album discovery.
//!
//! Turns the tracks of one or more source collections into a deduplicated
//! pool of candidate albums. Singles and compilations can be swapped for the
//! full album release that contains the same recording.

mod classifier;
mod engine;

pub use classifier::classify;
pub use classifier::resolve_parent_album;
pub use classifier::track_matches;
pub use engine::DiscoveryOutcome;
pub use engine::discover;
pub use engine::total_estimated_tracks;
