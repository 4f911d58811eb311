use tabled::Table;

use crate::{
    cli::backend::{self, Backend, SourceArgs},
    config::BuildConfig,
    info,
    management::CachedTrackSource,
    pipeline::PlaylistBuilder,
    success,
    types::AlbumTableRow,
    warning,
};

/// Lists the album pool discovered from the given sources, in discovery
/// order, optionally narrowed by a case-insensitive search on album or
/// artist name.
pub async fn albums(sources: SourceArgs, search: Option<String>) {
    let mut config = match BuildConfig::new(sources.collections()) {
        Ok(config) => config,
        Err(e) => crate::error!("Invalid options: {}", e),
    };
    config.filters = sources.filters;
    config.use_cache = sources.use_cache;

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

    let pb = backend::spinner("Discovering albums...");
    let result = builder.discover_pool(&config).await;
    pb.finish_and_clear();

    let discovered = match result {
        Ok(discovered) => discovered,
        Err(e) => crate::error!("Cannot discover albums: {}", e),
    };

    for source in &discovered.failed_sources {
        warning!("Source {} could not be fetched and was skipped", source);
    }
    if discovered.degraded {
        warning!("Some singles or compilations could not be resolved to their albums");
    }

    let mut albums = discovered.pool.albums;
    if let Some(term) = search {
        let term = term.to_lowercase();
        albums.retain(|a| {
            a.name.to_lowercase().contains(&term) || a.artist_names().to_lowercase().contains(&term)
        });
    }

    if albums.is_empty() {
        info!("No albums found.");
        return;
    }

    let total: u32 = albums.iter().map(|a| a.estimated_track_count).sum();
    let rows: Vec<AlbumTableRow> = albums.iter().map(AlbumTableRow::from).collect();
    println!("{}", Table::new(rows));
    success!("{} albums, {} tracks", albums.len(), total);
}
