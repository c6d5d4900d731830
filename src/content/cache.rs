//! Two-tier content cache with request coalescing.
//!
//! The cache tier holds documents that finished loading; the in-flight tier
//! holds loads that are still pending. Concurrent requests for the same
//! logical path share one pending load, so each path has at most one
//! underlying fetch running at a time.

use crate::content::metrics::LoadMetrics;
use crate::content::source::ContentSource;
use crate::error::LoadError;
use crate::sync::lock;
use futures::future::{BoxFuture, FutureExt, Shared};
use serde_json::Value;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use tracing::{debug, warn};

type LoadResult = Result<Arc<Value>, Arc<LoadError>>;
type PendingLoad = Shared<BoxFuture<'static, LoadResult>>;

/// Cache of raw JSON documents keyed by logical path.
///
/// Construct one per application instance and share it through an `Arc`.
pub struct ContentCache {
    source: Arc<dyn ContentSource>,
    loaded: Mutex<HashMap<String, Arc<Value>>>,
    in_flight: Mutex<HashMap<String, PendingLoad>>,
    metrics: LoadMetrics,
}

impl ContentCache {
    pub fn new(source: Arc<dyn ContentSource>) -> Self {
        Self {
            source,
            loaded: Mutex::new(HashMap::new()),
            in_flight: Mutex::new(HashMap::new()),
            metrics: LoadMetrics::new(),
        }
    }

    /// Load a document, serving it from cache when possible.
    ///
    /// # Returns
    /// * `Some(document)` on success (cached for later calls)
    /// * `None` if the load failed; the failure is logged and not cached,
    ///   so the next call retries
    pub async fn load_content_file(&self, path: &str) -> Option<Arc<Value>> {
        if let Some(document) = self.get_cached(path) {
            self.metrics.record_cache_hit();
            return Some(document);
        }

        let pending = self.pending_load(path);
        let result = pending.clone().await;

        // Only the load still registered for this path may touch the cache;
        // a load orphaned by `clear` must not repopulate it.
        let registered = {
            let mut in_flight = lock(&self.in_flight);
            let ours = in_flight
                .get(path)
                .map(|current| current.ptr_eq(&pending))
                .unwrap_or(false);
            if ours {
                in_flight.remove(path);
            }
            ours
        };

        match result {
            Ok(document) => {
                if registered {
                    lock(&self.loaded).insert(path.to_string(), Arc::clone(&document));
                }
                Some(document)
            }
            Err(e) => {
                if registered {
                    self.metrics.record_load_failure();
                    warn!("Failed to load content '{}': {}", path, e);
                }
                None
            }
        }
    }

    /// Join the pending load for `path`, starting one if none is running.
    fn pending_load(&self, path: &str) -> PendingLoad {
        let mut in_flight = lock(&self.in_flight);

        if let Some(pending) = in_flight.get(path) {
            debug!("Joining in-flight load for '{}'", path);
            self.metrics.record_coalesced();
            return pending.clone();
        }

        // The previous holder may have finished between our cache check and
        // taking this lock.
        if let Some(document) = self.get_cached(path) {
            self.metrics.record_cache_hit();
            return futures::future::ready(Ok(document)).boxed().shared();
        }

        self.metrics.record_cache_miss();
        let source = Arc::clone(&self.source);
        let owned = path.to_string();
        let pending = async move {
            source
                .fetch(&owned)
                .await
                .map(Arc::new)
                .map_err(Arc::new)
        }
        .boxed()
        .shared();

        in_flight.insert(path.to_string(), pending.clone());
        pending
    }

    /// Return a cached document without loading.
    pub fn get_cached(&self, path: &str) -> Option<Arc<Value>> {
        lock(&self.loaded).get(path).cloned()
    }

    pub fn is_cached(&self, path: &str) -> bool {
        lock(&self.loaded).contains_key(path)
    }

    pub fn is_in_flight(&self, path: &str) -> bool {
        lock(&self.in_flight).contains_key(path)
    }

    pub fn cached_len(&self) -> usize {
        lock(&self.loaded).len()
    }

    /// Drop every cached document whose path starts with `prefix`.
    pub fn evict_prefix(&self, prefix: &str) {
        lock(&self.loaded).retain(|path, _| !path.starts_with(prefix));
        lock(&self.in_flight).retain(|path, _| !path.starts_with(prefix));
    }

    /// Empty both the cache and in-flight tiers.
    pub fn clear(&self) {
        let cached = {
            let mut loaded = lock(&self.loaded);
            let count = loaded.len();
            loaded.clear();
            count
        };
        lock(&self.in_flight).clear();
        debug!("Cleared content cache ({} documents)", cached);
    }

    pub fn metrics(&self) -> &LoadMetrics {
        &self.metrics
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::content::source::StaticSource;
    use futures::future::join_all;
    use serde_json::json;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use tokio::sync::Notify;
    use tokio_test::{assert_pending, assert_ready, task};

    /// Source that counts fetches and can hold them until released.
    struct CountingSource {
        fetches: AtomicUsize,
        gate: Option<Arc<Notify>>,
        fail: bool,
    }

    impl CountingSource {
        fn new() -> Self {
            Self {
                fetches: AtomicUsize::new(0),
                gate: None,
                fail: false,
            }
        }

        fn gated(gate: Arc<Notify>) -> Self {
            Self {
                gate: Some(gate),
                ..Self::new()
            }
        }

        fn failing() -> Self {
            Self {
                fail: true,
                ..Self::new()
            }
        }
    }

    impl ContentSource for CountingSource {
        fn fetch(&self, path: &str) -> BoxFuture<'_, Result<Value, LoadError>> {
            let path = path.to_string();
            async move {
                self.fetches.fetch_add(1, Ordering::SeqCst);
                if let Some(gate) = &self.gate {
                    gate.notified().await;
                }
                if self.fail {
                    return Err(LoadError::NotFound { path });
                }
                Ok(json!({ "path": path }))
            }
            .boxed()
        }
    }

    fn cache_with(source: CountingSource) -> (ContentCache, Arc<CountingSource>) {
        let source = Arc::new(source);
        let cache = ContentCache::new(source.clone());
        (cache, source)
    }

    // ==================== Cache Tier Tests ====================

    #[tokio::test]
    async fn test_second_load_is_served_from_cache() {
        let (cache, source) = cache_with(CountingSource::new());

        let first = cache.load_content_file("global").await.expect("loads");
        let second = cache.load_content_file("global").await.expect("loads");

        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(source.fetches.load(Ordering::SeqCst), 1);
        assert_eq!(cache.metrics().cache_hits(), 1);
        assert_eq!(cache.metrics().cache_misses(), 1);
    }

    #[tokio::test]
    async fn test_failures_are_not_cached() {
        let (cache, source) = cache_with(CountingSource::failing());

        assert!(cache.load_content_file("pages/x").await.is_none());
        assert!(cache.load_content_file("pages/x").await.is_none());

        assert_eq!(source.fetches.load(Ordering::SeqCst), 2);
        assert!(!cache.is_cached("pages/x"));
        assert!(!cache.is_in_flight("pages/x"));
        assert_eq!(cache.metrics().load_failures(), 2);
    }

    #[tokio::test]
    async fn test_static_source_document() {
        let source = StaticSource::new().with("assets", json!({"logo": {"kind": "image"}}));
        let cache = ContentCache::new(Arc::new(source));

        let document = cache.load_content_file("assets").await.expect("loads");
        assert_eq!(document["logo"]["kind"], "image");
        assert_eq!(cache.cached_len(), 1);
    }

    // ==================== In-flight Tier Tests ====================

    #[tokio::test]
    async fn test_concurrent_loads_are_coalesced() {
        let gate = Arc::new(Notify::new());
        let (cache, source) = cache_with(CountingSource::gated(gate.clone()));

        let callers = join_all((0..5).map(|_| cache.load_content_file("pages/home")));
        let mut callers = task::spawn(callers);
        assert_pending!(callers.poll());

        assert_eq!(source.fetches.load(Ordering::SeqCst), 1);
        assert!(cache.is_in_flight("pages/home"));

        gate.notify_one();
        let results = assert_ready!(callers.poll());

        assert_eq!(results.len(), 5);
        assert!(results.iter().all(|r| r.as_ref().unwrap()["path"] == "pages/home"));
        assert_eq!(source.fetches.load(Ordering::SeqCst), 1);
        assert_eq!(cache.metrics().coalesced(), 4);
        assert!(!cache.is_in_flight("pages/home"));
        assert!(cache.is_cached("pages/home"));
    }

    #[tokio::test]
    async fn test_different_paths_load_independently() {
        let (cache, source) = cache_with(CountingSource::new());

        let (a, b) = tokio::join!(
            cache.load_content_file("pages/home"),
            cache.load_content_file("pages/about")
        );

        assert!(a.is_some() && b.is_some());
        assert_eq!(source.fetches.load(Ordering::SeqCst), 2);
    }

    // ==================== Clear Tests ====================

    #[tokio::test]
    async fn test_clear_empties_both_tiers() {
        let (cache, source) = cache_with(CountingSource::new());
        cache.load_content_file("global").await;
        assert!(cache.is_cached("global"));

        cache.clear();
        assert_eq!(cache.cached_len(), 0);

        cache.load_content_file("global").await;
        assert_eq!(source.fetches.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_load_orphaned_by_clear_does_not_repopulate() {
        let gate = Arc::new(Notify::new());
        let (cache, _source) = cache_with(CountingSource::gated(gate.clone()));

        let mut stale = task::spawn(cache.load_content_file("global"));
        assert_pending!(stale.poll());

        cache.clear();
        assert!(!cache.is_in_flight("global"));

        gate.notify_one();
        let document = assert_ready!(stale.poll());

        assert!(document.is_some());
        assert!(!cache.is_cached("global"));
    }

    #[tokio::test]
    async fn test_evict_prefix() {
        let (cache, _source) = cache_with(CountingSource::new());
        cache.load_content_file("translations/en").await;
        cache.load_content_file("pages/home").await;

        cache.evict_prefix("translations/");

        assert!(!cache.is_cached("translations/en"));
        assert!(cache.is_cached("pages/home"));
    }
}
