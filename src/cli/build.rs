use tabled::Table;

use crate::{
    cli::backend::{self, Backend, SourceArgs},
    config::BuildConfig,
    error::ConfigError,
    info,
    management::CachedTrackSource,
    pipeline::{PlaylistBuild, PlaylistBuilder},
    provider,
    shuffle::{ShuffleAlgorithm, ShuffleConfig},
    success,
    types::{AdmissionMode, AlbumTableRow},
    warning,
};

#[derive(Debug, Clone)]
pub struct PlaylistArgs {
    pub name: String,
    pub public: bool,
    pub max_albums: i64,
    pub max_tracks: i64,
    pub mode: AdmissionMode,
    pub algorithm: ShuffleAlgorithm,
    pub sort_by_type: bool,
    pub seed: Option<u64>,
    pub jitter: f64,
    pub flip_probability: f64,
    pub dry_run: bool,
}

impl PlaylistArgs {
    pub fn to_config(&self, sources: &SourceArgs) -> Result<BuildConfig, ConfigError> {
        let mut config = BuildConfig::new(sources.collections())?
            .with_limits(self.max_albums, self.max_tracks)?
            .with_playlist_name(&self.name)?;

        config.filters = sources.filters;
        config.use_cache = sources.use_cache;
        config.mode = self.mode;
        config.algorithm = self.algorithm;
        config.preserve_order = !self.sort_by_type;
        config.seed = self.seed;
        config.public = self.public;
        config.shuffle = ShuffleConfig::new(
            self.jitter,
            self.flip_probability,
            config.shuffle.pivot_year(),
        )?;

        Ok(config)
    }
}

pub async fn build(sources: SourceArgs, args: PlaylistArgs) {
    let config = match args.to_config(&sources) {
        Ok(config) => config,
        Err(e) => crate::error!("Invalid options: {}", e),
    };

    let backend = match Backend::open(&sources).await {
        Ok(backend) => backend,
        Err(e) => crate::error!("Cannot open track source: {}", e),
    };

    let store = backend::cache_store();
    let cached_source = CachedTrackSource::new(backend.source(), store.clone(), backend::clock())
        .enabled(config.use_cache);
    let mut builder = PlaylistBuilder::new(&cached_source, backend.discography());
    if config.use_cache {
        builder = builder.with_cache(backend::album_pool_cache(store));
    }

    info!(
        "Building '{}' from {} source(s) with {} ordering",
        config.playlist_name,
        config.sources.len(),
        config.algorithm
    );

    let pb = backend::spinner("Discovering albums...");
    let result = builder.build(&config).await;
    pb.finish_and_clear();

    let playlist = match result {
        Ok(playlist) => playlist,
        Err(e) => crate::error!("Cannot build playlist: {}", e),
    };

    report(&playlist);

    if args.dry_run {
        info!("Dry run, playlist not created.");
        return;
    }

    let Some(sink) = backend.sink() else {
        info!("Offline library in use, playlist not created.");
        return;
    };

    if playlist.tracks.is_empty() {
        warning!("No tracks selected, playlist not created.");
        return;
    }

    let pb = backend::spinner("Creating playlist...");
    let published =
        provider::publish(sink, &config.playlist_name, config.public, &playlist.tracks).await;
    pb.finish_and_clear();

    match published {
        Ok((playlist_ref, count)) => success!(
            "Playlist '{}' created with {} tracks ({})",
            playlist_ref.name,
            count,
            playlist_ref.id
        ),
        Err(e) => warning!("Failed to create playlist: {}", e),
    }
}

fn report(playlist: &PlaylistBuild) {
    let stats = &playlist.stats;

    for source in &stats.failed_sources {
        warning!("Source {} could not be fetched and was skipped", source);
    }
    if stats.degraded {
        warning!("Some singles or compilations could not be resolved to their albums");
    }

    if stats.from_cache {
        info!("Album pool loaded from cache");
    } else {
        info!("Scanned {} tracks", stats.source_tracks);
    }
    info!(
        "Pool: {} albums, {} tracks",
        stats.pool_albums, stats.pool_tracks
    );

    if !playlist.selection.selected_albums.is_empty() {
        let rows: Vec<AlbumTableRow> = playlist
            .selection
            .selected_albums
            .iter()
            .map(AlbumTableRow::from)
            .collect();
        println!("{}", Table::new(rows));
    }

    success!(
        "Selected {} albums ({} tracks), excluded {}{}",
        stats.selected_albums,
        playlist.selection.total_tracks,
        stats.excluded_albums,
        if playlist.selection.limit_reached {
            ", limit reached"
        } else {
            ""
        }
    );

    if stats.placeholder_tracks > 0 {
        warning!(
            "{} tracks could not be listed and are placeholders",
            stats.placeholder_tracks
        );
    }
}
