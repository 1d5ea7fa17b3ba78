//! Rendered page cache with path based invalidation.
//!
//! The listing fragment is rendered once and served from here until a
//! mutation calls [`PageCache::invalidate`]. Each invalidation bumps an epoch;
//! a render started before the bump is discarded by [`PageCache::store`] so a
//! render that raced an add or delete never gets cached.

use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{debug, trace};

/// Logical path of the product listing page.
pub const LISTING_PATH: &str = "/";

#[derive(Debug, Default)]
struct CacheState {
    epoch: u64,
    pages: HashMap<String, Arc<str>>,
}

/// Cloneable handle to the shared page cache.
#[derive(Debug, Clone, Default)]
pub struct PageCache {
    inner: Arc<RwLock<CacheState>>,
}

impl PageCache {
    /// Creates an empty cache.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Current invalidation epoch. Read it before rendering and pass it to
    /// [`Self::store`].
    pub async fn epoch(&self) -> u64 {
        self.inner.read().await.epoch
    }

    /// Returns the cached render for `path`, if any.
    pub async fn get(&self, path: &str) -> Option<Arc<str>> {
        let hit = self.inner.read().await.pages.get(path).cloned();
        trace!(path, hit = hit.is_some(), "Page cache lookup");
        hit
    }

    /// Caches `html` for `path` unless an invalidation happened after `epoch`
    /// was read. Returns whether the render was kept.
    pub async fn store(&self, path: &str, html: Arc<str>, epoch: u64) -> bool {
        let mut state = self.inner.write().await;
        if state.epoch != epoch {
            debug!(path, "Discarding render that raced an invalidation");
            return false;
        }
        state.pages.insert(path.to_string(), html);
        true
    }

    /// Marks `path` stale; the next read renders it again.
    pub async fn invalidate(&self, path: &str) {
        let mut state = self.inner.write().await;
        state.epoch = state.epoch.wrapping_add(1);
        state.pages.remove(path);
        debug!(path, epoch = state.epoch, "Page cache invalidated");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_store_and_get() {
        let cache = PageCache::new();
        assert!(cache.get(LISTING_PATH).await.is_none());

        let epoch = cache.epoch().await;
        assert!(cache.store(LISTING_PATH, Arc::from("<table/>"), epoch).await);
        assert_eq!(cache.get(LISTING_PATH).await.as_deref(), Some("<table/>"));
    }

    #[tokio::test]
    async fn test_invalidate_drops_only_that_path() {
        let cache = PageCache::new();
        let epoch = cache.epoch().await;
        cache.store(LISTING_PATH, Arc::from("listing"), epoch).await;
        cache.store("/other", Arc::from("other"), epoch).await;

        cache.invalidate(LISTING_PATH).await;

        assert!(cache.get(LISTING_PATH).await.is_none());
        assert_eq!(cache.get("/other").await.as_deref(), Some("other"));
    }

    #[tokio::test]
    async fn test_render_racing_invalidation_is_discarded() {
        let cache = PageCache::new();
        let epoch = cache.epoch().await;

        // A mutation lands while the page is being rendered.
        cache.invalidate(LISTING_PATH).await;

        assert!(!cache.store(LISTING_PATH, Arc::from("stale"), epoch).await);
        assert!(cache.get(LISTING_PATH).await.is_none());
    }

    #[tokio::test]
    async fn test_clones_share_state() {
        let cache = PageCache::new();
        let other = cache.clone();
        let epoch = cache.epoch().await;
        cache.store(LISTING_PATH, Arc::from("shared"), epoch).await;

        assert_eq!(other.get(LISTING_PATH).await.as_deref(), Some("shared"));
        other.invalidate(LISTING_PATH).await;
        assert!(cache.get(LISTING_PATH).await.is_none());
    }
}
