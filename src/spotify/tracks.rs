use async_trait::async_trait;

use crate::{
    error::ProviderError,
    provider::TrackSource,
    spotify::SpotifyClient,
    types::{Collection, Paging, PlaylistItem, PlaylistShape, SourceFingerprint, Track},
};

#[async_trait]
impl TrackSource for SpotifyClient {
    /// Tracks of a playlist or of the liked songs, in collection order.
    /// Episodes and local files without an id are left out.
    async fn fetch_tracks(&self, collection: &Collection) -> Result<Vec<Track>, ProviderError> {
        let first_url = match collection {
            Collection::Playlist(id) => self.url(&format!(
                "/playlists/{id}/tracks?limit=100&additional_types=track"
            )),
            Collection::LikedSongs => self.url("/me/tracks?limit=50"),
        };

        let items: Vec<PlaylistItem> = self.get_paged(first_url, None).await?;
        Ok(items
            .into_iter()
            .filter_map(|item| item.track)
            .filter(|track| !track.id.is_empty())
            .map(|mut track| {
                track.source = Some(collection.id().to_string());
                track
            })
            .collect())
    }

    async fn fingerprint(
        &self,
        collection: &Collection,
    ) -> Result<SourceFingerprint, ProviderError> {
        match collection {
            Collection::Playlist(id) => {
                let shape: PlaylistShape = self
                    .get_json(&self.url(&format!(
                        "/playlists/{id}?fields=snapshot_id,tracks.total"
                    )))
                    .await?;
                Ok(SourceFingerprint {
                    id: collection.id().to_string(),
                    snapshot_id: shape.snapshot_id,
                    track_count: shape.tracks.total,
                })
            }
            Collection::LikedSongs => {
                let page: Paging<PlaylistItem> =
                    self.get_json(&self.url("/me/tracks?limit=1")).await?;
                Ok(SourceFingerprint {
                    id: collection.id().to_string(),
                    snapshot_id: None,
                    track_count: page.total,
                })
            }
        }
    }
}
