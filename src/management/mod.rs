mod cache;
mod store;

pub use cache::ALBUM_POOL_TTL_SECS;
pub use cache::AlbumPoolCache;
pub use cache::CachedTrackSource;
pub use cache::Clock;
pub use cache::SystemClock;
pub use cache::TRACK_CACHE_TTL_SECS;
pub use cache::TtlCache;
pub use cache::album_pool_key;
pub use cache::track_cache_key;
pub use store::FileStore;
pub use store::MemoryStore;
