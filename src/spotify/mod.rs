//! # Spotify Integration Module
//!
//! HTTP implementation of the collaborator traits on top of the Spotify Web
//! API. [`SpotifyClient`] is a [`TrackSource`](crate::provider::TrackSource),
//! an [`ArtistDiscographyProvider`](crate::provider::ArtistDiscographyProvider)
//! and a [`PlaylistSink`](crate::provider::PlaylistSink).
//!
//! ## API Coverage
//!
//! - `GET /playlists/{id}/tracks` - playlist tracks, paged
//! - `GET /playlists/{id}?fields=snapshot_id,tracks.total` - playlist shape
//! - `GET /me/tracks` - liked songs, paged
//! - `GET /artists/{id}/albums?include_groups=album` - parent album candidates
//! - `GET /albums/{id}/tracks` - album track listings, paged
//! - `POST /users/{user_id}/playlists` - create playlist
//! - `POST /playlists/{playlist_id}/tracks` - add tracks
//!
//! ## Rate Limiting
//!
//! - 429 responses are retried after the `Retry-After` delay when it is at
//!   most 120 seconds; longer delays are returned as
//!   [`ProviderError::RateLimit`].
//! - 502 responses are retried after 10 seconds.
//! - Both retries are bounded by [`MAX_ATTEMPTS`].
//!
//! ## Authentication
//!
//! The client only sends a bearer token. Obtaining and refreshing it is the
//! job of an external OAuth helper; see [`crate::config::spotify_access_token`].

mod playlist;
mod releases;
mod tracks;

use std::time::Duration;

use reqwest::{Client, RequestBuilder, Response, StatusCode};
use serde::de::DeserializeOwned;
use tokio::time::sleep;

use crate::{
    config,
    error::{ConfigError, ProviderError},
    types::Paging,
};

pub const MAX_ATTEMPTS: u32 = 5;
const MAX_RETRY_AFTER_SECS: u64 = 120;
const BAD_GATEWAY_DELAY_SECS: u64 = 10;

pub struct SpotifyClient {
    http: Client,
    api_url: String,
    token: String,
    user_id: Option<String>,
}

impl SpotifyClient {
    /// Creates a client for the Web API at `api_url`.
    ///
    /// # Arguments
    ///
    /// * `api_url` - Base url such as `https://api.spotify.com/v1`; a trailing
    ///   slash is dropped
    /// * `token` - Bearer access token sent with every request
    /// * `user_id` - Owner of created playlists. Reading works without it,
    ///   creating a playlist fails with [`ProviderError::NotFound`]
    pub fn new(api_url: &str, token: &str, user_id: Option<String>) -> Self {
        Self {
            http: Client::new(),
            api_url: api_url.trim_end_matches('/').to_string(),
            token: token.to_string(),
            user_id,
        }
    }

    /// Client configured from `SPOTIFY_API_URL`, `SPOTIFY_ACCESS_TOKEN` and,
    /// when set, `SPOTIFY_USER_ID`.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when no access token is set.
    ///
    /// # Example
    ///
    /// ```
    /// dotenv::dotenv().ok();
    /// let client = SpotifyClient::from_env()?;
    /// let tracks = client.fetch_tracks(&Collection::LikedSongs).await?;
    /// ```
    pub fn from_env() -> Result<Self, ConfigError> {
        let token = config::spotify_access_token()?;
        Ok(Self::new(
            &config::spotify_apiurl(),
            &token,
            config::spotify_user().ok(),
        ))
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.api_url, path)
    }

    /// Sends the request built by `build`, retrying rate limits and bad
    /// gateways.
    ///
    /// # Rate Limiting
    ///
    /// - A 429 response is retried after its `Retry-After` delay
    /// - A delay above 120 seconds, or the fifth failed attempt, ends with
    ///   [`ProviderError::RateLimit`]
    /// - A 502 response is retried after 10 seconds, up to five attempts
    ///
    /// A 404 becomes [`ProviderError::NotFound`]; any other error status is
    /// returned as an HTTP error.
    async fn send<F>(&self, build: F) -> Result<Response, ProviderError>
    where
        F: Fn(&Client) -> RequestBuilder + Send + Sync,
    {
        let mut attempt = 0;
        loop {
            attempt += 1;
            let response = build(&self.http).bearer_auth(&self.token).send().await?;

            match response.status() {
                StatusCode::TOO_MANY_REQUESTS => {
                    let retry_after = retry_after_secs(&response);
                    if retry_after > MAX_RETRY_AFTER_SECS || attempt >= MAX_ATTEMPTS {
                        return Err(ProviderError::RateLimit { retry_after });
                    }
                    log::debug!("Rate limited, retrying in {} seconds", retry_after);
                    sleep(Duration::from_secs(retry_after)).await;
                }
                StatusCode::BAD_GATEWAY if attempt < MAX_ATTEMPTS => {
                    sleep(Duration::from_secs(BAD_GATEWAY_DELAY_SECS)).await;
                }
                StatusCode::NOT_FOUND => {
                    return Err(ProviderError::NotFound(response.url().path().to_string()));
                }
                _ => return Ok(response.error_for_status()?),
            }
        }
    }

    async fn get_json<T>(&self, url: &str) -> Result<T, ProviderError>
    where
        T: DeserializeOwned + Send,
    {
        let response = self.send(|http| http.get(url)).await?;
        Ok(response.json::<T>().await?)
    }

    /// Follows `next` links until the last page or `max_items` items.
    async fn get_paged<T>(
        &self,
        first_url: String,
        max_items: Option<usize>,
    ) -> Result<Vec<T>, ProviderError>
    where
        T: DeserializeOwned + Send,
    {
        let mut items = Vec::new();
        let mut next = Some(first_url);

        while let Some(url) = next {
            let page: Paging<T> = self.get_json(&url).await?;
            items.extend(page.items);
            next = page.next;

            if let Some(max) = max_items {
                if items.len() >= max {
                    items.truncate(max);
                    break;
                }
            }
        }

        Ok(items)
    }
}

fn retry_after_secs(response: &Response) -> u64 {
    response
        .headers()
        .get("retry-after")
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.trim().parse::<u64>().ok())
        .unwrap_or(1)
}
