//! Offline collaborator backed by a JSON snapshot.
//!
//! ```json
//! {
//!   "collections": { "<playlist id>": [ <track>, ... ] },
//!   "liked_songs": [ <track>, ... ],
//!   "artist_albums": { "<artist id>": [ <album>, ... ] },
//!   "album_tracks": { "<album id>": [ <track>, ... ] }
//! }
//! ```
//!
//! Tracks and albums use the same shape as the Spotify Web API objects.

use std::{collections::HashMap, path::Path};

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::{
    error::ProviderError,
    provider::{ArtistDiscographyProvider, TrackSource},
    types::{Album, AlbumType, Collection, SourceFingerprint, Track},
    utils,
};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LocalLibrary {
    #[serde(default)]
    pub collections: HashMap<String, Vec<Track>>,
    #[serde(default)]
    pub liked_songs: Vec<Track>,
    #[serde(default)]
    pub artist_albums: HashMap<String, Vec<Album>>,
    #[serde(default)]
    pub album_tracks: HashMap<String, Vec<Track>>,
}

impl LocalLibrary {
    pub async fn load(path: &Path) -> Result<Self, ProviderError> {
        let content = async_fs::read_to_string(path).await?;
        Self::from_json(&content)
    }

    pub fn from_json(content: &str) -> Result<Self, ProviderError> {
        serde_json::from_str(content).map_err(|e| ProviderError::Parse(e.to_string()))
    }

    fn tracks_of(&self, collection: &Collection) -> Option<&Vec<Track>> {
        match collection {
            Collection::Playlist(id) => self.collections.get(id),
            Collection::LikedSongs => Some(&self.liked_songs),
        }
    }
}

#[async_trait]
impl TrackSource for LocalLibrary {
    async fn fetch_tracks(&self, collection: &Collection) -> Result<Vec<Track>, ProviderError> {
        self.tracks_of(collection)
            .cloned()
            .ok_or_else(|| ProviderError::NotFound(format!("collection {}", collection)))
    }

    async fn fingerprint(
        &self,
        collection: &Collection,
    ) -> Result<SourceFingerprint, ProviderError> {
        let tracks = self
            .tracks_of(collection)
            .ok_or_else(|| ProviderError::NotFound(format!("collection {}", collection)))?;
        let ids = tracks
            .iter()
            .map(|t| t.id.as_str())
            .collect::<Vec<_>>()
            .join(",");

        Ok(SourceFingerprint {
            id: collection.id().to_string(),
            snapshot_id: Some(utils::digest_key(&ids)),
            track_count: Some(tracks.len() as u32),
        })
    }
}

#[async_trait]
impl ArtistDiscographyProvider for LocalLibrary {
    async fn fetch_artist_albums(&self, artist_id: &str) -> Result<Vec<Album>, ProviderError> {
        let albums = self
            .artist_albums
            .get(artist_id)
            .ok_or_else(|| ProviderError::NotFound(format!("artist {}", artist_id)))?;
        Ok(albums
            .iter()
            .filter(|a| a.album_type == AlbumType::Album)
            .cloned()
            .collect())
    }

    async fn fetch_album_tracks(&self, album_id: &str) -> Result<Vec<Track>, ProviderError> {
        self.album_tracks
            .get(album_id)
            .cloned()
            .ok_or_else(|| ProviderError::NotFound(format!("album {}", album_id)))
    }
}
