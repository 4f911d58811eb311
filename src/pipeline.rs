use crate::{
    config::BuildConfig,
    discovery,
    error::Result,
    management::AlbumPoolCache,
    materialize::materialize,
    provider::{ArtistDiscographyProvider, TrackSource},
    selection, shuffle,
    types::{AlbumPool, Collection, SelectionResult, ShuffledTrack, SourceFingerprint, Track},
    utils,
};

#[derive(Debug, Clone, PartialEq, Default)]
pub struct BuildStats {
    pub source_tracks: usize,
    pub pool_albums: usize,
    pub pool_tracks: u32,
    pub selected_albums: usize,
    pub excluded_albums: usize,
    pub materialized_tracks: usize,
    pub placeholder_tracks: usize,
    pub from_cache: bool,
    pub failed_sources: Vec<String>,
    pub degraded: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PlaylistBuild {
    pub tracks: Vec<ShuffledTrack>,
    pub selection: SelectionResult,
    pub stats: BuildStats,
}

#[derive(Debug, Clone, PartialEq)]
pub struct DiscoveredPool {
    pub pool: AlbumPool,
    pub source_tracks: usize,
    pub from_cache: bool,
    pub failed_sources: Vec<String>,
    /// Some singles or compilations could not be checked for a parent album.
    pub degraded: bool,
}

/// Runs source fetching, discovery, ordering, selection and materialization
/// against injected collaborators.
pub struct PlaylistBuilder<'a> {
    source: &'a dyn TrackSource,
    discography: &'a dyn ArtistDiscographyProvider,
    cache: Option<AlbumPoolCache>,
}

impl<'a> PlaylistBuilder<'a> {
    pub fn new(source: &'a dyn TrackSource, discography: &'a dyn ArtistDiscographyProvider) -> Self {
        Self {
            source,
            discography,
            cache: None,
        }
    }

    pub fn with_cache(mut self, cache: AlbumPoolCache) -> Self {
        self.cache = Some(cache);
        self
    }

    /// Candidate pool for the configured sources, from cache when possible.
    ///
    /// Sources are fetched in order and deduplicated by id. A source that
    /// cannot be fetched is skipped and reported in `failed_sources`. The
    /// pool is written to the album pool cache only when every source was
    /// fetched and no parent album lookup failed.
    ///
    /// # Errors
    ///
    /// Returns an error only when the configuration is invalid.
    pub async fn discover_pool(&self, config: &BuildConfig) -> Result<DiscoveredPool> {
        config.validate()?;
        let sources = unique_sources(&config.sources);

        let fingerprints = match (&self.cache, config.use_cache) {
            (Some(_), true) => self.fingerprints(&sources).await,
            _ => None,
        };

        if let (Some(cache), Some(fingerprints)) = (&self.cache, &fingerprints) {
            if let Some(pool) = cache.get(fingerprints, config.filters).await {
                log::debug!("Album pool cache hit ({} albums)", pool.albums.len());
                return Ok(DiscoveredPool {
                    pool,
                    source_tracks: 0,
                    from_cache: true,
                    failed_sources: Vec::new(),
                    degraded: false,
                });
            }
        }

        let mut tracks: Vec<Track> = Vec::new();
        let mut failed_sources = Vec::new();
        for collection in &sources {
            match self.source.fetch_tracks(collection).await {
                Ok(fetched) => {
                    log::debug!("Fetched {} tracks from {}", fetched.len(), collection);
                    tracks.extend(fetched.into_iter().map(|mut track| {
                        if track.source.is_none() {
                            track.source = Some(collection.id().to_string());
                        }
                        track
                    }));
                }
                Err(e) => {
                    log::warn!("Cannot fetch tracks of {}: {}", collection, e);
                    failed_sources.push(collection.id().to_string());
                }
            }
        }

        let outcome = discovery::discover(&tracks, config.filters, self.discography).await;
        let pool = AlbumPool::new(outcome.albums);

        if let (Some(cache), Some(fingerprints)) = (&self.cache, &fingerprints) {
            if !failed_sources.is_empty() || outcome.degraded {
                log::debug!("Album pool is incomplete, not caching it");
            } else if let Err(e) = cache.set(fingerprints, config.filters, &pool).await {
                log::warn!("Cannot cache album pool: {}", e);
            }
        }

        Ok(DiscoveredPool {
            pool,
            source_tracks: tracks.len(),
            from_cache: false,
            failed_sources,
            degraded: outcome.degraded,
        })
    }

    /// Runs the whole build: discovery, ordering, selection and
    /// materialization.
    ///
    /// # Arguments
    ///
    /// * `config` - Sources, limits, admission mode and ordering settings
    ///
    /// # Returns
    ///
    /// The ordered playlist tracks together with the selection result and
    /// build statistics. Nothing is published; pass the tracks to
    /// [`crate::provider::publish`] for that.
    ///
    /// # Example
    ///
    /// ```
    /// let builder = PlaylistBuilder::new(&library, &library);
    /// let config = BuildConfig::new(vec![Collection::LikedSongs])?.with_limits(10, 120)?;
    ///
    /// let playlist = builder.build(&config).await?;
    /// println!("{} tracks", playlist.tracks.len());
    /// ```
    pub async fn build(&self, config: &BuildConfig) -> Result<PlaylistBuild> {
        let discovered = self.discover_pool(config).await?;
        let mut rng = utils::make_rng(config.seed);

        let ordered = shuffle::order(
            &discovered.pool.albums,
            config.algorithm,
            &config.shuffle,
            &mut rng,
        );
        let selection =
            selection::select(&ordered, &config.limits, config.mode, config.preserve_order);
        let tracks = materialize(&selection.selected_albums, self.discography, &mut rng).await;

        let stats = BuildStats {
            source_tracks: discovered.source_tracks,
            pool_albums: discovered.pool.albums.len(),
            pool_tracks: discovered.pool.total_tracks,
            selected_albums: selection.selected_albums.len(),
            excluded_albums: selection.excluded_albums.len(),
            materialized_tracks: tracks.len(),
            placeholder_tracks: tracks.iter().filter(|t| t.placeholder).count(),
            from_cache: discovered.from_cache,
            failed_sources: discovered.failed_sources,
            degraded: discovered.degraded,
        };

        Ok(PlaylistBuild {
            tracks,
            selection,
            stats,
        })
    }

    async fn fingerprints(&self, sources: &[Collection]) -> Option<Vec<SourceFingerprint>> {
        let mut fingerprints = Vec::with_capacity(sources.len());
        for collection in sources {
            match self.source.fingerprint(collection).await {
                Ok(fingerprint) => fingerprints.push(fingerprint),
                Err(e) => {
                    log::debug!("No fingerprint for {}, bypassing cache: {}", collection, e);
                    return None;
                }
            }
        }
        Some(fingerprints)
    }
}

fn unique_sources(sources: &[Collection]) -> Vec<Collection> {
    let mut unique: Vec<Collection> = Vec::with_capacity(sources.len());
    for source in sources {
        if !unique.contains(source) {
            unique.push(source.clone());
        }
    }
    unique
}
