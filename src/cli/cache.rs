use crate::{cli::backend, success, warning};

pub async fn clear_cache() {
    match backend::cache_store().clear().await {
        Ok(()) => success!("Cache cleared."),
        Err(e) => warning!("Cannot clear cache. Err: {}", e),
    }
}
