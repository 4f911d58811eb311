use async_trait::async_trait;

use crate::{
    error::ProviderError,
    provider::{MAX_URIS_PER_REQUEST, PlaylistSink},
    spotify::SpotifyClient,
    types::{
        AddTrackToPlaylistRequest, AddTrackToPlaylistResponse, CreatePlaylistRequest,
        CreatePlaylistResponse, PlaylistRef,
    },
};

#[async_trait]
impl PlaylistSink for SpotifyClient {
    async fn create_playlist(
        &self,
        name: &str,
        public: bool,
    ) -> Result<PlaylistRef, ProviderError> {
        let user_id = self
            .user_id
            .as_deref()
            .ok_or_else(|| ProviderError::NotFound("SPOTIFY_USER_ID is not set".to_string()))?;

        let body = CreatePlaylistRequest {
            name: name.to_string(),
            description: "Shuffled albums created by albumix".to_string(),
            public,
            collaborative: false,
        };
        let url = self.url(&format!("/users/{user_id}/playlists"));

        let response = self.send(|http| http.post(&url).json(&body)).await?;
        let created = response.json::<CreatePlaylistResponse>().await?;

        Ok(PlaylistRef {
            id: created.id,
            name: created.name,
        })
    }

    async fn add_tracks(
        &self,
        playlist: &PlaylistRef,
        uris: &[String],
    ) -> Result<(), ProviderError> {
        let url = self.url(&format!("/playlists/{}/tracks", playlist.id));

        for chunk in uris.chunks(MAX_URIS_PER_REQUEST) {
            let body = AddTrackToPlaylistRequest {
                uris: chunk.to_vec(),
            };
            let response = self.send(|http| http.post(&url).json(&body)).await?;
            let added = response.json::<AddTrackToPlaylistResponse>().await?;
            log::debug!(
                "Added {} tracks to {} (snapshot {})",
                chunk.len(),
                playlist.name,
                added.snapshot_id
            );
        }

        Ok(())
    }
}
