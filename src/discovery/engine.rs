use std::collections::{HashMap, HashSet};

use crate::{
    discovery::classifier::{classify, lookup_parent_album},
    provider::ArtistDiscographyProvider,
    types::{Album, AlbumType, DiscoveryFilters, Track},
};

/// Albums discovered from a set of tracks.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct DiscoveryOutcome {
    /// Candidate albums in first-seen order.
    pub albums: Vec<Album>,
    /// At least one parent album search hit a provider error, so a single or
    /// compilation may be missing its album.
    pub degraded: bool,
}

struct PoolEntry {
    album: Album,
    observed: HashSet<String>,
}

/// Builds the candidate album pool from tracks in source order.
///
/// Albums are deduplicated by id; the first record seen is kept and every
/// distinct track id observed for it is tallied into the estimated track
/// count, which is never lower than the album's reported total. Singles and
/// compilations are kept as they are when the matching filter includes them,
/// otherwise they are replaced by their parent album. A single or
/// compilation without a resolvable parent contributes nothing to the pool.
///
/// # Arguments
///
/// * `tracks` - Tracks of all source collections, in source order
/// * `filters` - Which release types are admitted without resolution
/// * `provider` - Discography lookups used to resolve parent albums
///
/// # Returns
///
/// A [`DiscoveryOutcome`] with the pool in first-seen order. Its `degraded`
/// flag is set when any parent lookup failed at the provider, in which case
/// the pool may be incomplete and should not be cached.
///
/// # Example
///
/// ```
/// let outcome = discover(&tracks, DiscoveryFilters::default(), &client).await;
/// if outcome.degraded {
///     log::warn!("Some singles could not be resolved");
/// }
/// println!("{} albums", outcome.albums.len());
/// ```
pub async fn discover<P>(
    tracks: &[Track],
    filters: DiscoveryFilters,
    provider: &P,
) -> DiscoveryOutcome
where
    P: ArtistDiscographyProvider + ?Sized,
{
    let mut order: Vec<String> = Vec::new();
    let mut pool: HashMap<String, PoolEntry> = HashMap::new();
    let mut seen_tracks: HashSet<String> = HashSet::new();
    let mut resolved: HashMap<(String, String), Option<Album>> = HashMap::new();
    let mut degraded = false;

    for track in tracks {
        let Some(album_type) = classify(track) else {
            log::debug!("Skipping '{}': no album information", track.name);
            continue;
        };
        let Some(album) = track.album.as_ref() else {
            continue;
        };
        if album.id.is_empty() || track.id.is_empty() {
            continue;
        }
        if !seen_tracks.insert(track.id.clone()) {
            continue;
        }

        let keep_as_is = match album_type {
            AlbumType::Album => true,
            AlbumType::Single => filters.include_singles,
            AlbumType::Compilation => filters.include_compilations,
        };

        let admitted = if keep_as_is {
            Some(album.clone())
        } else {
            let key = (album.id.clone(), track.name.to_lowercase());
            match resolved.get(&key) {
                Some(parent) => parent.clone(),
                None => {
                    let lookup = lookup_parent_album(track, provider).await;
                    degraded |= lookup.degraded;
                    resolved.insert(key, lookup.album.clone());
                    lookup.album
                }
            }
        };

        let Some(admitted) = admitted else {
            log::debug!(
                "Dropping '{}': no album release found for {} '{}'",
                track.name,
                album_type,
                album.name
            );
            continue;
        };

        let entry = pool.entry(admitted.id.clone()).or_insert_with(|| {
            order.push(admitted.id.clone());
            PoolEntry {
                album: admitted,
                observed: HashSet::new(),
            }
        });
        entry.observed.insert(track.id.clone());
    }

    let albums = order
        .into_iter()
        .filter_map(|id| pool.remove(&id))
        .map(|entry| {
            let mut album = entry.album;
            let observed = entry.observed.len() as u32;
            album.estimated_track_count = observed.max(album.total_tracks.unwrap_or(0));
            album
        })
        .collect();

    DiscoveryOutcome { albums, degraded }
}

/// Sum of estimated track counts over a pool.
pub fn total_estimated_tracks(albums: &[Album]) -> u32 {
    albums.iter().map(|a| a.estimated_track_count).sum()
}
