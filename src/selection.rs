//! Track-limit aware album selection.
//!
//! Walks a pool of albums and admits them while an album count and a track
//! budget allow. The two admission modes differ on purpose:
//!
//! - `Hard` never exceeds the budget. An album that does not fit is excluded
//!   and the scan goes on looking for smaller albums further down.
//! - `Soft` always admits the first album, even when it alone is larger than
//!   the budget. The scan stops at the first overflow, whether the
//!   overflowing album was admitted (first album) or rejected.

use std::cmp::Ordering;

use crate::{
    error::ConfigError,
    types::{AdmissionMode, Album, AlbumType, SelectionResult},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SelectionLimits {
    max_albums: Option<usize>,
    max_tracks: u32,
}

impl SelectionLimits {
    /// `max_albums <= 0` means no album limit. A negative track limit is
    /// rejected.
    pub fn new(max_albums: i64, max_tracks: i64) -> Result<Self, ConfigError> {
        if max_tracks < 0 {
            return Err(ConfigError::Negative {
                field: "max_tracks",
                value: max_tracks,
            });
        }
        let max_albums = if max_albums <= 0 {
            None
        } else {
            Some(max_albums as usize)
        };

        Ok(Self {
            max_albums,
            max_tracks: u32::try_from(max_tracks).unwrap_or(u32::MAX),
        })
    }

    pub fn max_albums(&self) -> Option<usize> {
        self.max_albums
    }

    pub fn max_tracks(&self) -> u32 {
        self.max_tracks
    }
}

/// Full albums first, then singles and compilations; newest first within a
/// group. Albums without a readable date sort last in their group.
pub fn sort_for_selection(albums: &mut [Album]) {
    albums.sort_by(|a, b| {
        let rank = |album: &Album| match album.album_type {
            AlbumType::Album => 0,
            AlbumType::Single | AlbumType::Compilation => 1,
        };
        match rank(a).cmp(&rank(b)) {
            Ordering::Equal => b.release_day().cmp(&a.release_day()),
            other => other,
        }
    });
}

/// Picks albums from an ordered pool until the album or track limit is hit.
///
/// In [`AdmissionMode::Soft`] the first album always gets in, and the scan
/// stops at the first album that would overflow the track budget; that album
/// is reported as excluded and later ones are not looked at. In
/// [`AdmissionMode::Hard`] an album that does not fit is excluded and the
/// scan moves on, so the track budget is never exceeded.
///
/// # Arguments
///
/// * `pool` - Candidate albums in playlist order
/// * `limits` - Album and track budget
/// * `mode` - How an album that overflows the track budget is handled
/// * `preserve_order` - When false, full albums are moved ahead of singles
///   and compilations (newest first) before selecting
///
/// # Returns
///
/// A [`SelectionResult`] holding the selected and excluded albums, the
/// selected track total and whether a limit stopped the scan.
///
/// # Example
///
/// ```
/// let limits = SelectionLimits::new(10, 150)?;
/// let result = select(&ordered, &limits, AdmissionMode::Hard, true);
///
/// assert!(result.total_tracks <= 150);
/// ```
pub fn select(
    pool: &[Album],
    limits: &SelectionLimits,
    mode: AdmissionMode,
    preserve_order: bool,
) -> SelectionResult {
    let mut candidates = pool.to_vec();
    if !preserve_order {
        sort_for_selection(&mut candidates);
    }

    let mut result = SelectionResult::default();
    let max_tracks = limits.max_tracks;

    for album in candidates {
        if let Some(max_albums) = limits.max_albums {
            if result.selected_albums.len() >= max_albums {
                result.limit_reached = true;
                result.excluded_albums.push(album);
                continue;
            }
        }

        let next_total = result.total_tracks.saturating_add(album.estimated_track_count);

        match mode {
            AdmissionMode::Hard => {
                if next_total > max_tracks {
                    result.limit_reached = true;
                    result.excluded_albums.push(album);
                    continue;
                }
                result.total_tracks = next_total;
                result.selected_albums.push(album);
            }
            AdmissionMode::Soft => {
                if next_total > max_tracks && !result.selected_albums.is_empty() {
                    result.limit_reached = true;
                    result.excluded_albums.push(album);
                    break;
                }
                result.total_tracks = next_total;
                result.selected_albums.push(album);
                if result.total_tracks > max_tracks {
                    result.limit_reached = true;
                    break;
                }
            }
        }
    }

    log::debug!(
        "Selected {} albums ({} tracks), excluded {}, limit reached: {}",
        result.selected_albums.len(),
        result.total_tracks,
        result.excluded_albums.len(),
        result.limit_reached
    );

    result
}
