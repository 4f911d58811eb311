//! Collaborator interfaces consumed by the playlist core.
//!
//! Nothing in the core performs network or disk I/O directly. Track sources,
//! discographies, playlist sinks and cache stores are injected through the
//! traits below so the Spotify client, the offline library and test fakes
//! are interchangeable.

use async_trait::async_trait;

use crate::{
    error::{CacheError, ProviderError},
    types::{Album, Collection, PlaylistRef, ShuffledTrack, SourceFingerprint, Track},
};

/// Spotify accepts at most this many uris per add-tracks request.
pub const MAX_URIS_PER_REQUEST: usize = 100;

#[async_trait]
pub trait TrackSource: Send + Sync {
    /// All tracks of a collection in collection order.
    async fn fetch_tracks(&self, collection: &Collection) -> Result<Vec<Track>, ProviderError>;

    /// Cheap shape of a collection for cache keys. Sources that cannot
    /// report a shape fall back to the bare id, leaving invalidation to TTL.
    async fn fingerprint(
        &self,
        collection: &Collection,
    ) -> Result<SourceFingerprint, ProviderError> {
        Ok(SourceFingerprint {
            id: collection.id().to_string(),
            snapshot_id: None,
            track_count: None,
        })
    }
}

#[async_trait]
impl<T> TrackSource for &T
where
    T: TrackSource + ?Sized,
{
    async fn fetch_tracks(&self, collection: &Collection) -> Result<Vec<Track>, ProviderError> {
        (**self).fetch_tracks(collection).await
    }

    async fn fingerprint(
        &self,
        collection: &Collection,
    ) -> Result<SourceFingerprint, ProviderError> {
        (**self).fingerprint(collection).await
    }
}

#[async_trait]
pub trait ArtistDiscographyProvider: Send + Sync {
    /// Releases of type `album` for an artist.
    async fn fetch_artist_albums(&self, artist_id: &str) -> Result<Vec<Album>, ProviderError>;

    async fn fetch_album_tracks(&self, album_id: &str) -> Result<Vec<Track>, ProviderError>;
}

#[async_trait]
pub trait AlbumTrackProvider: Send + Sync {
    async fn album_tracks(&self, album_id: &str) -> Result<Vec<Track>, ProviderError>;
}

#[async_trait]
impl<T> AlbumTrackProvider for T
where
    T: ArtistDiscographyProvider + ?Sized,
{
    async fn album_tracks(&self, album_id: &str) -> Result<Vec<Track>, ProviderError> {
        self.fetch_album_tracks(album_id).await
    }
}

#[async_trait]
pub trait PlaylistSink: Send + Sync {
    async fn create_playlist(
        &self,
        name: &str,
        public: bool,
    ) -> Result<PlaylistRef, ProviderError>;

    async fn add_tracks(
        &self,
        playlist: &PlaylistRef,
        uris: &[String],
    ) -> Result<(), ProviderError>;
}

/// Key/value store behind the caches. Values are opaque serialized entries;
/// `set` replaces any previous value for the key as a whole.
#[async_trait]
pub trait CacheStore: Send + Sync {
    async fn get(&self, key: &str) -> Result<Option<String>, CacheError>;
    async fn set(&self, key: &str, value: String) -> Result<(), CacheError>;
    async fn remove(&self, key: &str) -> Result<(), CacheError>;
    async fn clear(&self) -> Result<(), CacheError>;
}

/// Creates a playlist and adds the materialized tracks in batches.
///
/// Placeholder tracks and tracks without a uri are skipped. Uris are sent in
/// batches of [`MAX_URIS_PER_REQUEST`], in track order.
///
/// # Arguments
///
/// * `sink` - Where the playlist is created
/// * `name` - Playlist name
/// * `public` - Whether the playlist is public
/// * `tracks` - Materialized tracks in playlist order
///
/// # Returns
///
/// Returns a `Result` containing:
/// - `Ok((PlaylistRef, usize))` - The new playlist and the number of uris sent
/// - `Err(ProviderError)` - Creating the playlist or adding a batch failed.
///   Batches sent before the failure stay in the playlist.
///
/// # Example
///
/// ```
/// let build = builder.build(&config).await?;
/// let (playlist, sent) = publish(&client, "Album Shuffle", false, &build.tracks).await?;
/// println!("Created {} with {} tracks", playlist.id, sent);
/// ```
pub async fn publish<S>(
    sink: &S,
    name: &str,
    public: bool,
    tracks: &[ShuffledTrack],
) -> Result<(PlaylistRef, usize), ProviderError>
where
    S: PlaylistSink + ?Sized,
{
    let uris: Vec<String> = tracks
        .iter()
        .filter(|t| !t.placeholder && !t.uri.is_empty())
        .map(|t| t.uri.clone())
        .collect();

    let playlist = sink.create_playlist(name, public).await?;
    for chunk in uris.chunks(MAX_URIS_PER_REQUEST) {
        sink.add_tracks(&playlist, chunk).await?;
    }

    Ok((playlist, uris.len()))
}
