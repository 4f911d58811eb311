#![allow(dead_code)]

use std::{
    collections::{HashMap, HashSet},
    sync::{
        Mutex,
        atomic::{AtomicUsize, Ordering},
    },
};

use albumix::{
    error::ProviderError,
    management::Clock,
    provider::{ArtistDiscographyProvider, PlaylistSink, TrackSource},
    types::{
        Album, AlbumArtist, AlbumType, Collection, PlaylistRef, ReleaseDatePrecision,
        SourceFingerprint, Track,
    },
};
use async_trait::async_trait;
use chrono::{DateTime, TimeDelta, TimeZone, Utc};

pub fn artist(id: &str, name: &str) -> AlbumArtist {
    AlbumArtist {
        id: id.to_string(),
        name: name.to_string(),
    }
}

// Helper function to create a test album
pub fn album(id: &str, name: &str, album_type: AlbumType, release_date: &str) -> Album {
    Album {
        id: id.to_string(),
        name: name.to_string(),
        artists: vec![artist("artist-1", "The Band")],
        album_type,
        release_date: release_date.to_string(),
        release_date_precision: ReleaseDatePrecision::Day,
        total_tracks: None,
        estimated_track_count: 0,
    }
}

/// Album with a known track count, ready for selection.
pub fn sized_album(id: &str, tracks: u32) -> Album {
    let mut album = album(id, &format!("Album {id}"), AlbumType::Album, "2000-01-01");
    album.total_tracks = Some(tracks);
    album.estimated_track_count = tracks;
    album
}

pub fn track(id: &str, name: &str, album: &Album) -> Track {
    Track {
        id: id.to_string(),
        name: name.to_string(),
        uri: format!("spotify:track:{id}"),
        album: Some(album.clone()),
        artists: album.artists.clone(),
        source: None,
    }
}

/// Track as listed on an album, without the album object attached.
pub fn listed_track(id: &str, name: &str, artists: Vec<AlbumArtist>) -> Track {
    Track {
        id: id.to_string(),
        name: name.to_string(),
        uri: format!("spotify:track:{id}"),
        album: None,
        artists,
        source: None,
    }
}

pub fn ids<T, F>(items: &[T], f: F) -> Vec<String>
where
    F: Fn(&T) -> &str,
{
    items.iter().map(|i| f(i).to_string()).collect()
}

#[derive(Default)]
pub struct FakeDiscography {
    pub artist_albums: HashMap<String, Vec<Album>>,
    pub album_tracks: HashMap<String, Vec<Track>>,
    pub failing_artists: HashSet<String>,
    pub failing_albums: HashSet<String>,
    pub artist_calls: AtomicUsize,
    pub album_calls: AtomicUsize,
}

impl FakeDiscography {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_artist(mut self, artist_id: &str, albums: Vec<Album>) -> Self {
        self.artist_albums.insert(artist_id.to_string(), albums);
        self
    }

    pub fn with_album_tracks(mut self, album_id: &str, tracks: Vec<Track>) -> Self {
        self.album_tracks.insert(album_id.to_string(), tracks);
        self
    }

    pub fn failing_artist(mut self, artist_id: &str) -> Self {
        self.failing_artists.insert(artist_id.to_string());
        self
    }

    pub fn failing_album(mut self, album_id: &str) -> Self {
        self.failing_albums.insert(album_id.to_string());
        self
    }

    pub fn artist_calls(&self) -> usize {
        self.artist_calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ArtistDiscographyProvider for FakeDiscography {
    async fn fetch_artist_albums(&self, artist_id: &str) -> Result<Vec<Album>, ProviderError> {
        self.artist_calls.fetch_add(1, Ordering::SeqCst);
        if self.failing_artists.contains(artist_id) {
            return Err(ProviderError::RateLimit { retry_after: 300 });
        }
        Ok(self
            .artist_albums
            .get(artist_id)
            .cloned()
            .unwrap_or_default())
    }

    async fn fetch_album_tracks(&self, album_id: &str) -> Result<Vec<Track>, ProviderError> {
        self.album_calls.fetch_add(1, Ordering::SeqCst);
        if self.failing_albums.contains(album_id) {
            return Err(ProviderError::NotFound(format!("album {album_id}")));
        }
        self.album_tracks
            .get(album_id)
            .cloned()
            .ok_or_else(|| ProviderError::NotFound(format!("album {album_id}")))
    }
}

#[derive(Default)]
pub struct FakeSource {
    pub collections: HashMap<Collection, Vec<Track>>,
    pub failing: HashSet<Collection>,
    pub snapshots: HashMap<Collection, String>,
    pub fetch_calls: AtomicUsize,
}

impl FakeSource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_collection(mut self, collection: Collection, tracks: Vec<Track>) -> Self {
        self.collections.insert(collection, tracks);
        self
    }

    pub fn failing(mut self, collection: Collection) -> Self {
        self.failing.insert(collection);
        self
    }

    pub fn set_tracks(&mut self, collection: Collection, tracks: Vec<Track>) {
        self.collections.insert(collection, tracks);
    }

    pub fn set_snapshot(&mut self, collection: Collection, snapshot: &str) {
        self.snapshots.insert(collection, snapshot.to_string());
    }

    pub fn fetch_calls(&self) -> usize {
        self.fetch_calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl TrackSource for FakeSource {
    async fn fetch_tracks(&self, collection: &Collection) -> Result<Vec<Track>, ProviderError> {
        self.fetch_calls.fetch_add(1, Ordering::SeqCst);
        if self.failing.contains(collection) {
            return Err(ProviderError::Parse("unexpected payload".to_string()));
        }
        self.collections
            .get(collection)
            .cloned()
            .ok_or_else(|| ProviderError::NotFound(collection.to_string()))
    }

    async fn fingerprint(
        &self,
        collection: &Collection,
    ) -> Result<SourceFingerprint, ProviderError> {
        Ok(SourceFingerprint {
            id: collection.id().to_string(),
            snapshot_id: self.snapshots.get(collection).cloned(),
            track_count: self.collections.get(collection).map(|t| t.len() as u32),
        })
    }
}

pub struct ManualClock {
    now: Mutex<DateTime<Utc>>,
}

impl ManualClock {
    pub fn new() -> Self {
        Self {
            now: Mutex::new(Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap()),
        }
    }

    pub fn advance(&self, delta: TimeDelta) {
        let mut now = self.now.lock().unwrap();
        *now += delta;
    }
}

impl Clock for ManualClock {
    fn now(&self) -> DateTime<Utc> {
        *self.now.lock().unwrap()
    }
}

#[derive(Default)]
pub struct RecordingSink {
    pub created: Mutex<Vec<(String, bool)>>,
    pub batches: Mutex<Vec<Vec<String>>>,
}

impl RecordingSink {
    pub fn batch_sizes(&self) -> Vec<usize> {
        self.batches.lock().unwrap().iter().map(|b| b.len()).collect()
    }
}

#[async_trait]
impl PlaylistSink for RecordingSink {
    async fn create_playlist(
        &self,
        name: &str,
        public: bool,
    ) -> Result<PlaylistRef, ProviderError> {
        self.created
            .lock()
            .unwrap()
            .push((name.to_string(), public));
        Ok(PlaylistRef {
            id: "new-playlist".to_string(),
            name: name.to_string(),
        })
    }

    async fn add_tracks(
        &self,
        _playlist: &PlaylistRef,
        uris: &[String],
    ) -> Result<(), ProviderError> {
        self.batches.lock().unwrap().push(uris.to_vec());
        Ok(())
    }
}
