use std::{marker::PhantomData, sync::Arc};

use async_trait::async_trait;
use chrono::{DateTime, TimeDelta, Utc};
use serde::{Serialize, de::DeserializeOwned};

use crate::{
    error::{CacheError, ProviderError},
    provider::{CacheStore, TrackSource},
    types::{AlbumPool, CacheEntry, Collection, DiscoveryFilters, SourceFingerprint, Track},
    utils,
};

/// How long a discovered album pool stays valid (7 days).
pub const ALBUM_POOL_TTL_SECS: i64 = 7 * 24 * 60 * 60;

/// How long fetched collection tracks stay valid (5 minutes).
pub const TRACK_CACHE_TTL_SECS: i64 = 5 * 60;

pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// Typed, expiring view over a [`CacheStore`].
///
/// Entries older than the TTL, entries that fail to parse and entries whose
/// recorded key does not match are all reported as misses.
pub struct TtlCache<T> {
    namespace: &'static str,
    ttl: TimeDelta,
    store: Arc<dyn CacheStore>,
    clock: Arc<dyn Clock>,
    _value: PhantomData<fn() -> T>,
}

impl<T> TtlCache<T>
where
    T: Serialize + DeserializeOwned + Send + Sync,
{
    pub fn new(
        namespace: &'static str,
        ttl: TimeDelta,
        store: Arc<dyn CacheStore>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            namespace,
            ttl,
            store,
            clock,
            _value: PhantomData,
        }
    }

    fn store_key(&self, key: &str) -> String {
        format!("{}-{}", self.namespace, key)
    }

    pub async fn get(&self, key: &str) -> Option<T> {
        let raw = match self.store.get(&self.store_key(key)).await {
            Ok(Some(raw)) => raw,
            Ok(None) => return None,
            Err(e) => {
                log::warn!("Cannot read {} cache entry {}: {}", self.namespace, key, e);
                return None;
            }
        };

        let entry: CacheEntry<T> = match serde_json::from_str(&raw) {
            Ok(entry) => entry,
            Err(e) => {
                log::debug!("Ignoring unreadable {} cache entry {}: {}", self.namespace, key, e);
                return None;
            }
        };

        if entry.key != key {
            return None;
        }

        if self.clock.now() - entry.timestamp > self.ttl {
            log::debug!("{} cache entry {} expired", self.namespace, key);
            if let Err(e) = self.store.remove(&self.store_key(key)).await {
                log::debug!("Cannot evict {} cache entry {}: {}", self.namespace, key, e);
            }
            return None;
        }

        Some(entry.value)
    }

    pub async fn set(&self, key: &str, value: &T) -> Result<(), CacheError> {
        let entry = CacheEntry {
            key: key.to_string(),
            value,
            timestamp: self.clock.now(),
        };
        let json = serde_json::to_string(&entry)?;
        self.store.set(&self.store_key(key), json).await
    }

    pub async fn invalidate(&self, key: &str) -> Result<(), CacheError> {
        self.store.remove(&self.store_key(key)).await
    }
}

/// Cache key for an album pool: the sorted source fingerprints plus the
/// include filters, hashed.
pub fn album_pool_key(fingerprints: &[SourceFingerprint], filters: DiscoveryFilters) -> String {
    let mut lines: Vec<String> = fingerprints.iter().map(fingerprint_line).collect();
    lines.sort();
    lines.dedup();
    lines.push(format!(
        "singles={};compilations={}",
        filters.include_singles, filters.include_compilations
    ));

    utils::digest_key(&lines.join("\n"))
}

/// Cache key for the tracks of one collection. A new snapshot or a changed
/// track count yields a new key.
pub fn track_cache_key(fingerprint: &SourceFingerprint) -> String {
    utils::digest_key(&fingerprint_line(fingerprint))
}

fn fingerprint_line(f: &SourceFingerprint) -> String {
    format!(
        "{}|{}|{}",
        f.id,
        f.snapshot_id.as_deref().unwrap_or(""),
        f.track_count.map(|c| c.to_string()).unwrap_or_default()
    )
}

/// Discovered album pools keyed by source shape, valid for seven days.
pub struct AlbumPoolCache {
    cache: TtlCache<AlbumPool>,
}

impl AlbumPoolCache {
    pub fn new(store: Arc<dyn CacheStore>, clock: Arc<dyn Clock>) -> Self {
        Self {
            cache: TtlCache::new(
                "albums",
                TimeDelta::seconds(ALBUM_POOL_TTL_SECS),
                store,
                clock,
            ),
        }
    }

    pub async fn get(
        &self,
        fingerprints: &[SourceFingerprint],
        filters: DiscoveryFilters,
    ) -> Option<AlbumPool> {
        self.cache.get(&album_pool_key(fingerprints, filters)).await
    }

    pub async fn set(
        &self,
        fingerprints: &[SourceFingerprint],
        filters: DiscoveryFilters,
        pool: &AlbumPool,
    ) -> Result<(), CacheError> {
        self.cache
            .set(&album_pool_key(fingerprints, filters), pool)
            .await
    }
}

/// [`TrackSource`] decorator keeping fetched collection tracks for five
/// minutes.
///
/// Entries are keyed by the collection fingerprint, so an edited playlist
/// is refetched as soon as its snapshot or size changes. Collections whose
/// fingerprint cannot be read are fetched uncached.
pub struct CachedTrackSource<S> {
    inner: S,
    cache: TtlCache<Vec<Track>>,
    enabled: bool,
}

impl<S> CachedTrackSource<S>
where
    S: TrackSource,
{
    pub fn new(inner: S, store: Arc<dyn CacheStore>, clock: Arc<dyn Clock>) -> Self {
        Self {
            inner,
            cache: TtlCache::new(
                "tracks",
                TimeDelta::seconds(TRACK_CACHE_TTL_SECS),
                store,
                clock,
            ),
            enabled: true,
        }
    }

    /// Turns the decorator into a pass-through when `enabled` is false:
    /// nothing is read from or written to the store.
    pub fn enabled(mut self, enabled: bool) -> Self {
        self.enabled = enabled;
        self
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    pub fn inner(&self) -> &S {
        &self.inner
    }
}

#[async_trait]
impl<S> TrackSource for CachedTrackSource<S>
where
    S: TrackSource,
{
    async fn fetch_tracks(&self, collection: &Collection) -> Result<Vec<Track>, ProviderError> {
        if !self.enabled {
            return self.inner.fetch_tracks(collection).await;
        }

        let key = match self.inner.fingerprint(collection).await {
            Ok(fingerprint) => track_cache_key(&fingerprint),
            Err(e) => {
                log::debug!("No fingerprint for {}, fetching uncached: {}", collection, e);
                return self.inner.fetch_tracks(collection).await;
            }
        };

        if let Some(tracks) = self.cache.get(&key).await {
            log::debug!("Using cached tracks for {}", collection);
            return Ok(tracks);
        }

        let tracks = self.inner.fetch_tracks(collection).await?;
        if let Err(e) = self.cache.set(&key, &tracks).await {
            log::warn!("Cannot cache tracks of {}: {}", collection, e);
        }
        Ok(tracks)
    }

    async fn fingerprint(
        &self,
        collection: &Collection,
    ) -> Result<SourceFingerprint, ProviderError> {
        self.inner.fingerprint(collection).await
    }
}
