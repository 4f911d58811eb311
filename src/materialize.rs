use rand::Rng;

use crate::{
    provider::AlbumTrackProvider,
    types::{Album, ShuffledTrack, Track},
};

/// Expands an ordered album list into one flat track list.
///
/// Albums keep the given order and tracks keep the album's own order. When
/// the tracks of an album cannot be fetched, `estimated_track_count`
/// placeholder tracks stand in for it so track totals stay consistent with
/// the selection.
///
/// # Arguments
///
/// * `albums` - Selected albums in playlist order
/// * `provider` - Source of each album's track listing
/// * `rng` - Used for the per-track energy value
///
/// # Returns
///
/// The flat track list. Placeholders have an empty uri and are flagged with
/// `placeholder`.
pub async fn materialize<P, R>(albums: &[Album], provider: &P, rng: &mut R) -> Vec<ShuffledTrack>
where
    P: AlbumTrackProvider + ?Sized,
    R: Rng + ?Sized,
{
    let mut output = Vec::new();

    for album in albums {
        match provider.album_tracks(&album.id).await {
            Ok(tracks) => {
                output.extend(
                    tracks
                        .into_iter()
                        .map(|track| shuffled_track(track, album, rng.random::<f64>())),
                );
            }
            Err(e) => {
                log::warn!(
                    "Cannot fetch tracks of album {} ({}), using {} placeholders: {}",
                    album.name,
                    album.id,
                    album.estimated_track_count,
                    e
                );
                output.extend(placeholders(album));
            }
        }
    }

    output
}

fn shuffled_track(track: Track, album: &Album, energy: f64) -> ShuffledTrack {
    let artists = if track.artists.is_empty() {
        album.artists.clone()
    } else {
        track.artists
    };

    ShuffledTrack {
        id: track.id,
        name: track.name,
        uri: track.uri,
        artists,
        album_id: album.id.clone(),
        album_name: album.name.clone(),
        energy,
        placeholder: false,
    }
}

/// Stand-in tracks for an album whose listing is unavailable.
pub fn placeholders(album: &Album) -> Vec<ShuffledTrack> {
    (1..=album.estimated_track_count)
        .map(|n| ShuffledTrack {
            id: format!("placeholder:{}:{}", album.id, n),
            name: format!("{} (track {} unavailable)", album.name, n),
            uri: String::new(),
            artists: album.artists.clone(),
            album_id: album.id.clone(),
            album_name: album.name.clone(),
            energy: 0.0,
            placeholder: true,
        })
        .collect()
}
