use crate::{
    provider::ArtistDiscographyProvider,
    types::{Album, AlbumType, Track},
};

/// How a track's release should be treated. `None` when the track carries no
/// readable album.
pub fn classify(track: &Track) -> Option<AlbumType> {
    track.album.as_ref().map(|album| album.album_type)
}

/// Whether `candidate` (a track listed on some album) is the same recording
/// as `track`: names equal ignoring case and at least one artist in common.
pub fn track_matches(candidate: &Track, track: &Track) -> bool {
    if candidate.name.to_lowercase() != track.name.to_lowercase() {
        return false;
    }

    track.artists.iter().any(|artist| {
        let name = artist.name.to_lowercase();
        candidate
            .artists
            .iter()
            .any(|other| other.name.to_lowercase() == name)
    })
}

/// Result of a parent album search. `degraded` is set when a provider error
/// cut the search short, so a `None` album may hide a real match.
#[derive(Debug, Clone, Default)]
pub(crate) struct ParentLookup {
    pub album: Option<Album>,
    pub degraded: bool,
}

/// Looks for a full album release of the primary artist that contains the
/// same recording as `track`.
///
/// Only meaningful for tracks released as a single or on a compilation. The
/// first matching album in discography order wins. Provider failures are
/// swallowed: an artist lookup failure ends the search with `None`, a failed
/// track listing for one candidate only skips that candidate.
///
/// # Arguments
///
/// * `track` - A track whose album is a single or a compilation
/// * `provider` - Discography lookups for the track's primary artist
///
/// # Returns
///
/// The parent album, or `None` when the track is already on an album, has no
/// usable artist, or no album of the artist lists the same recording.
pub async fn resolve_parent_album<P>(track: &Track, provider: &P) -> Option<Album>
where
    P: ArtistDiscographyProvider + ?Sized,
{
    lookup_parent_album(track, provider).await.album
}

pub(crate) async fn lookup_parent_album<P>(track: &Track, provider: &P) -> ParentLookup
where
    P: ArtistDiscographyProvider + ?Sized,
{
    let Some(album) = track.album.as_ref() else {
        return ParentLookup::default();
    };
    if album.album_type == AlbumType::Album {
        return ParentLookup::default();
    }

    let Some(artist) = track.artists.first().or_else(|| album.primary_artist()) else {
        return ParentLookup::default();
    };
    if artist.id.is_empty() {
        return ParentLookup::default();
    }

    let candidates = match provider.fetch_artist_albums(&artist.id).await {
        Ok(albums) => albums,
        Err(e) => {
            log::warn!(
                "Cannot fetch albums of artist {} while resolving '{}': {}",
                artist.name,
                track.name,
                e
            );
            return ParentLookup {
                album: None,
                degraded: true,
            };
        }
    };

    let mut degraded = false;
    for candidate in candidates
        .into_iter()
        .filter(|c| c.album_type == AlbumType::Album && c.id != album.id)
    {
        let tracks = match provider.fetch_album_tracks(&candidate.id).await {
            Ok(tracks) => tracks,
            Err(e) => {
                log::debug!("Skipping album {} ({}): {}", candidate.name, candidate.id, e);
                degraded = true;
                continue;
            }
        };

        if tracks.iter().any(|t| track_matches(t, track)) {
            log::debug!(
                "Resolved '{}' from {} '{}' to album '{}'",
                track.name,
                album.album_type,
                album.name,
                candidate.name
            );
            return ParentLookup {
                album: Some(candidate),
                degraded,
            };
        }
    }

    ParentLookup {
        album: None,
        degraded,
    }
}
