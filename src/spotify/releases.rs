use async_trait::async_trait;

use crate::{
    error::ProviderError,
    provider::ArtistDiscographyProvider,
    spotify::SpotifyClient,
    types::{Album, AlbumType, Track},
};

/// Candidate albums considered per artist when resolving a parent album.
pub const ARTIST_ALBUM_LIMIT: usize = 50;

#[async_trait]
impl ArtistDiscographyProvider for SpotifyClient {
    /// First page (up to 50) of an artist's full album releases.
    ///
    /// Uses `/artists/{id}/albums` with `include_groups=album`, so singles,
    /// compilations and `appears_on` releases are not returned.
    async fn fetch_artist_albums(&self, artist_id: &str) -> Result<Vec<Album>, ProviderError> {
        let url = self.url(&format!(
            "/artists/{artist_id}/albums?include_groups=album&limit={ARTIST_ALBUM_LIMIT}"
        ));
        let albums: Vec<Album> = self.get_paged(url, Some(ARTIST_ALBUM_LIMIT)).await?;

        Ok(albums
            .into_iter()
            .filter(|a| a.album_type == AlbumType::Album)
            .collect())
    }

    /// Complete track listing of an album in disc and track order.
    async fn fetch_album_tracks(&self, album_id: &str) -> Result<Vec<Track>, ProviderError> {
        let url = self.url(&format!("/albums/{album_id}/tracks?limit=50"));
        self.get_paged(url, None).await
    }
}
