mod common;

use std::{path::PathBuf, sync::Arc};

use albumix::{
    error::CacheError,
    management::{
        ALBUM_POOL_TTL_SECS, AlbumPoolCache, CachedTrackSource, FileStore, MemoryStore,
        TRACK_CACHE_TTL_SECS, TtlCache, album_pool_key, track_cache_key,
    },
    provider::{CacheStore, TrackSource},
    types::{AlbumPool, AlbumType, Collection, DiscoveryFilters, SourceFingerprint},
};
use async_trait::async_trait;
use chrono::TimeDelta;
use common::{FakeSource, ManualClock, album, sized_album, track};

fn fingerprint(id: &str, snapshot: Option<&str>, count: Option<u32>) -> SourceFingerprint {
    SourceFingerprint {
        id: id.to_string(),
        snapshot_id: snapshot.map(str::to_string),
        track_count: count,
    }
}

/// Memory store whose removals always fail.
#[derive(Default)]
struct StickyStore {
    inner: MemoryStore,
}

#[async_trait]
impl CacheStore for StickyStore {
    async fn get(&self, key: &str) -> Result<Option<String>, CacheError> {
        self.inner.get(key).await
    }

    async fn set(&self, key: &str, value: String) -> Result<(), CacheError> {
        self.inner.set(key, value).await
    }

    async fn remove(&self, _key: &str) -> Result<(), CacheError> {
        Err(CacheError::Poisoned)
    }

    async fn clear(&self) -> Result<(), CacheError> {
        self.inner.clear().await
    }
}

fn temp_cache_dir() -> PathBuf {
    std::env::temp_dir().join(format!(
        "albumix-cache-test-{}-{}",
        std::process::id(),
        rand::random::<u64>()
    ))
}

#[tokio::test]
async fn test_ttl_cache_hit_and_expiry() {
    let store = Arc::new(MemoryStore::new());
    let clock = Arc::new(ManualClock::new());
    let cache: TtlCache<Vec<String>> =
        TtlCache::new("test", TimeDelta::minutes(5), store.clone(), clock.clone());

    cache.set("k", &vec!["a".to_string()]).await.unwrap();
    assert_eq!(cache.get("k").await, Some(vec!["a".to_string()]));

    // Exactly at the TTL the entry is still fresh.
    clock.advance(TimeDelta::minutes(5));
    assert!(cache.get("k").await.is_some());

    clock.advance(TimeDelta::seconds(1));
    assert_eq!(cache.get("k").await, None);
    // Expired entries are evicted from the store.
    assert!(store.is_empty());
}

#[tokio::test]
async fn test_ttl_cache_expiry_survives_failed_eviction() {
    let store = Arc::new(StickyStore::default());
    let clock = Arc::new(ManualClock::new());
    let cache: TtlCache<u32> =
        TtlCache::new("test", TimeDelta::minutes(5), store.clone(), clock.clone());

    cache.set("k", &7).await.unwrap();
    clock.advance(TimeDelta::minutes(6));

    assert_eq!(cache.get("k").await, None);
    assert_eq!(store.inner.len(), 1);
}

#[tokio::test]
async fn test_ttl_cache_treats_corrupt_entries_as_miss() {
    let store = Arc::new(MemoryStore::new());
    let cache: TtlCache<u32> = TtlCache::new(
        "test",
        TimeDelta::hours(1),
        store.clone(),
        Arc::new(ManualClock::new()),
    );

    store.set("test-k", "{ not json".to_string()).await.unwrap();
    assert_eq!(cache.get("k").await, None);

    store
        .set(
            "test-k",
            r#"{"key":"k","value":"text","timestamp":"2024-05-01T12:00:00Z"}"#.to_string(),
        )
        .await
        .unwrap();
    assert_eq!(cache.get("k").await, None);
}

#[tokio::test]
async fn test_ttl_cache_rejects_mismatched_key() {
    let store = Arc::new(MemoryStore::new());
    let cache: TtlCache<u32> = TtlCache::new(
        "test",
        TimeDelta::hours(1),
        store.clone(),
        Arc::new(ManualClock::new()),
    );

    store
        .set(
            "test-k",
            r#"{"key":"other","value":7,"timestamp":"2024-05-01T12:00:00Z"}"#.to_string(),
        )
        .await
        .unwrap();
    assert_eq!(cache.get("k").await, None);

    cache.set("k", &7).await.unwrap();
    assert_eq!(cache.get("k").await, Some(7));

    cache.invalidate("k").await.unwrap();
    assert_eq!(cache.get("k").await, None);
}

#[test]
fn test_album_pool_key_ignores_source_order() {
    let a = fingerprint("liked-songs", None, Some(120));
    let b = fingerprint("37i9dQZF1DX", Some("snap-1"), Some(50));
    let filters = DiscoveryFilters::default();

    assert_eq!(
        album_pool_key(&[a.clone(), b.clone()], filters),
        album_pool_key(&[b.clone(), a.clone()], filters)
    );
    assert_eq!(
        album_pool_key(&[a.clone(), b.clone(), a.clone()], filters),
        album_pool_key(&[a.clone(), b.clone()], filters)
    );
}

#[test]
fn test_album_pool_key_tracks_source_shape_and_filters() {
    let base = [fingerprint("pl", Some("snap-1"), Some(50))];
    let filters = DiscoveryFilters::default();
    let key = album_pool_key(&base, filters);

    assert_ne!(
        key,
        album_pool_key(&[fingerprint("pl", Some("snap-2"), Some(50))], filters)
    );
    assert_ne!(
        key,
        album_pool_key(&[fingerprint("pl", Some("snap-1"), Some(51))], filters)
    );
    assert_ne!(
        key,
        album_pool_key(
            &base,
            DiscoveryFilters {
                include_singles: true,
                include_compilations: false,
            }
        )
    );

    // Keys double as file names.
    assert!(
        key.chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
    );
}

#[tokio::test]
async fn test_album_pool_cache_round_trip_and_ttl() {
    let clock = Arc::new(ManualClock::new());
    let cache = AlbumPoolCache::new(Arc::new(MemoryStore::new()), clock.clone());
    let fingerprints = vec![fingerprint("pl", Some("snap"), Some(3))];
    let filters = DiscoveryFilters::default();
    let pool = AlbumPool::new(vec![sized_album("a", 12), sized_album("b", 8)]);

    cache.set(&fingerprints, filters, &pool).await.unwrap();

    let cached = cache.get(&fingerprints, filters).await.unwrap();
    assert_eq!(cached, pool);
    assert_eq!(cached.total_tracks, 20);

    clock.advance(TimeDelta::seconds(ALBUM_POOL_TTL_SECS + 1));
    assert!(cache.get(&fingerprints, filters).await.is_none());
}

#[tokio::test]
async fn test_cached_track_source_reuses_recent_fetches() {
    let full = album("alb", "Full", AlbumType::Album, "2019-01-01");
    let source = FakeSource::new().with_collection(
        Collection::LikedSongs,
        vec![track("t1", "One", &full), track("t2", "Two", &full)],
    );
    let clock = Arc::new(ManualClock::new());
    let cached = CachedTrackSource::new(&source, Arc::new(MemoryStore::new()), clock.clone());

    let first = cached.fetch_tracks(&Collection::LikedSongs).await.unwrap();
    let second = cached.fetch_tracks(&Collection::LikedSongs).await.unwrap();
    assert_eq!(first, second);
    assert_eq!(source.fetch_calls(), 1);

    clock.advance(TimeDelta::seconds(TRACK_CACHE_TTL_SECS + 1));
    cached.fetch_tracks(&Collection::LikedSongs).await.unwrap();
    assert_eq!(source.fetch_calls(), 2);
}

#[tokio::test]
async fn test_cached_track_source_refetches_edited_collection() {
    let first = album("alb-a", "First", AlbumType::Album, "2019-01-01");
    let second = album("alb-b", "Second", AlbumType::Album, "2021-01-01");
    let playlist = Collection::Playlist("mix".to_string());
    let store = Arc::new(MemoryStore::new());
    let clock = Arc::new(ManualClock::new());

    let mut source = FakeSource::new()
        .with_collection(playlist.clone(), vec![track("t1", "One", &first)]);
    source.set_snapshot(playlist.clone(), "snap-1");
    CachedTrackSource::new(&source, store.clone(), clock.clone())
        .fetch_tracks(&playlist)
        .await
        .unwrap();

    source.set_tracks(
        playlist.clone(),
        vec![track("t1", "One", &first), track("t2", "Two", &second)],
    );
    source.set_snapshot(playlist.clone(), "snap-2");
    clock.advance(TimeDelta::seconds(60));

    let tracks = CachedTrackSource::new(&source, store.clone(), clock.clone())
        .fetch_tracks(&playlist)
        .await
        .unwrap();

    assert_eq!(tracks.len(), 2);
    assert_eq!(source.fetch_calls(), 2);
}

#[tokio::test]
async fn test_disabled_track_cache_passes_through() {
    let full = album("alb", "Full", AlbumType::Album, "2019-01-01");
    let source = FakeSource::new()
        .with_collection(Collection::LikedSongs, vec![track("t1", "One", &full)]);
    let store = Arc::new(MemoryStore::new());
    let cached = CachedTrackSource::new(&source, store.clone(), Arc::new(ManualClock::new()))
        .enabled(false);

    cached.fetch_tracks(&Collection::LikedSongs).await.unwrap();
    cached.fetch_tracks(&Collection::LikedSongs).await.unwrap();

    assert!(!cached.is_enabled());
    assert_eq!(source.fetch_calls(), 2);
    assert!(store.is_empty());
}

#[test]
fn test_track_cache_key_follows_collection_shape() {
    let base = track_cache_key(&fingerprint("mix", Some("snap-1"), Some(10)));

    assert_eq!(
        base,
        track_cache_key(&fingerprint("mix", Some("snap-1"), Some(10)))
    );
    assert_ne!(
        base,
        track_cache_key(&fingerprint("mix", Some("snap-2"), Some(10)))
    );
    assert_ne!(
        base,
        track_cache_key(&fingerprint("mix", Some("snap-1"), Some(11)))
    );
    assert_ne!(
        base,
        track_cache_key(&fingerprint("other", Some("snap-1"), Some(10)))
    );
}

#[tokio::test]
async fn test_cached_track_source_does_not_cache_failures() {
    let source = FakeSource::new().failing(Collection::Playlist("broken".to_string()));
    let cached = CachedTrackSource::new(
        &source,
        Arc::new(MemoryStore::new()),
        Arc::new(ManualClock::new()),
    );
    let broken = Collection::Playlist("broken".to_string());

    assert!(cached.fetch_tracks(&broken).await.is_err());
    assert!(cached.fetch_tracks(&broken).await.is_err());
    assert_eq!(source.fetch_calls(), 2);
}

#[tokio::test]
async fn test_file_store_round_trip() {
    let dir = temp_cache_dir();
    let store = FileStore::new(dir.clone());

    assert_eq!(store.get("missing").await.unwrap(), None);

    store.set("entry", "first".to_string()).await.unwrap();
    store.set("entry", "second".to_string()).await.unwrap();
    assert_eq!(store.get("entry").await.unwrap(), Some("second".to_string()));
    assert!(!dir.join("entry.json.tmp").exists());

    store.remove("entry").await.unwrap();
    store.remove("entry").await.unwrap();
    assert_eq!(store.get("entry").await.unwrap(), None);

    store.set("other", "value".to_string()).await.unwrap();
    store.clear().await.unwrap();
    assert_eq!(store.get("other").await.unwrap(), None);
    assert!(dir.exists());

    std::fs::remove_dir_all(&dir).unwrap();
    store.clear().await.unwrap();
}

#[tokio::test]
async fn test_file_store_clear_keeps_unrelated_files() {
    let dir = temp_cache_dir();
    let store = FileStore::new(dir.clone());

    store.set("albums-abc", "pool".to_string()).await.unwrap();
    std::fs::write(dir.join("tracks-def.json.tmp"), "partial").unwrap();
    std::fs::write(dir.join("my-notes.txt"), "keep me").unwrap();
    std::fs::create_dir(dir.join("backup.json")).unwrap();

    store.clear().await.unwrap();

    assert_eq!(store.get("albums-abc").await.unwrap(), None);
    assert!(!dir.join("tracks-def.json.tmp").exists());
    assert_eq!(
        std::fs::read_to_string(dir.join("my-notes.txt")).unwrap(),
        "keep me"
    );
    assert!(dir.join("backup.json").is_dir());

    std::fs::remove_dir_all(&dir).unwrap();
}

#[tokio::test]
async fn test_file_store_backs_ttl_cache() {
    let dir = temp_cache_dir();
    let store: Arc<dyn CacheStore> = Arc::new(FileStore::new(dir.clone()));
    let cache = AlbumPoolCache::new(store.clone(), Arc::new(ManualClock::new()));
    let fingerprints = vec![fingerprint("liked-songs", None, Some(1))];
    let pool = AlbumPool::new(vec![sized_album("a", 9)]);

    cache
        .set(&fingerprints, DiscoveryFilters::default(), &pool)
        .await
        .unwrap();

    let reopened = AlbumPoolCache::new(
        Arc::new(FileStore::new(dir.clone())),
        Arc::new(ManualClock::new()),
    );
    assert_eq!(
        reopened
            .get(&fingerprints, DiscoveryFilters::default())
            .await,
        Some(pool)
    );

    store.clear().await.unwrap();
    std::fs::remove_dir_all(&dir).unwrap();
}
