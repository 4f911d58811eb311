use std::{path::PathBuf, sync::Arc, time::Duration};

use indicatif::{ProgressBar, ProgressStyle};

use crate::{
    Res,
    library::LocalLibrary,
    management::{AlbumPoolCache, Clock, FileStore, SystemClock},
    provider::{ArtistDiscographyProvider, CacheStore, PlaylistSink, TrackSource},
    spotify::SpotifyClient,
    types::{Collection, DiscoveryFilters},
};

/// Where tracks come from for one command.
#[derive(Debug, Clone, Default)]
pub struct SourceArgs {
    pub playlists: Vec<Collection>,
    pub liked: bool,
    pub library: Option<PathBuf>,
    pub filters: DiscoveryFilters,
    pub use_cache: bool,
}

impl SourceArgs {
    pub fn collections(&self) -> Vec<Collection> {
        let mut collections = self.playlists.clone();
        if self.liked && !collections.contains(&Collection::LikedSongs) {
            collections.push(Collection::LikedSongs);
        }
        collections
    }
}

pub enum Backend {
    Local(LocalLibrary),
    Spotify(SpotifyClient),
}

impl Backend {
    pub async fn open(args: &SourceArgs) -> Res<Self> {
        match &args.library {
            Some(path) => Ok(Backend::Local(LocalLibrary::load(path).await?)),
            None => Ok(Backend::Spotify(SpotifyClient::from_env()?)),
        }
    }

    pub fn source(&self) -> &dyn TrackSource {
        match self {
            Backend::Local(library) => library,
            Backend::Spotify(client) => client,
        }
    }

    pub fn discography(&self) -> &dyn ArtistDiscographyProvider {
        match self {
            Backend::Local(library) => library,
            Backend::Spotify(client) => client,
        }
    }

    /// Offline libraries cannot receive playlists.
    pub fn sink(&self) -> Option<&dyn PlaylistSink> {
        match self {
            Backend::Local(_) => None,
            Backend::Spotify(client) => Some(client),
        }
    }
}

pub fn cache_store() -> Arc<dyn CacheStore> {
    Arc::new(FileStore::default_location())
}

pub fn clock() -> Arc<dyn Clock> {
    Arc::new(SystemClock)
}

pub fn album_pool_cache(store: Arc<dyn CacheStore>) -> AlbumPoolCache {
    AlbumPoolCache::new(store, clock())
}

pub fn spinner(message: &str) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    pb.set_message(message.to_string());
    pb.enable_steady_tick(Duration::from_millis(100));
    pb.set_style(
        ProgressStyle::with_template("{spinner:.blue} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner())
            .tick_chars("⠋⠙⠹⠸⠼⠴⠦⠧⠇⠏"),
    );
    pb
}
