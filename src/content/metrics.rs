//! Load metrics and observability for a content cache.
//!
//! Counters are owned by each `ContentCache` instance rather than a
//! process-wide singleton, so isolated caches (and tests) never share
//! numbers.

use serde::Serialize;
use std::sync::atomic::{AtomicUsize, Ordering};

/// Counters describing how content requests were served.
#[derive(Debug, Default)]
pub struct LoadMetrics {
    /// Requests answered from the cache tier
    cache_hits: AtomicUsize,

    /// Requests that started a new underlying load
    cache_misses: AtomicUsize,

    /// Requests that joined a load already in flight
    coalesced: AtomicUsize,

    /// Underlying loads that failed
    load_failures: AtomicUsize,
}

impl LoadMetrics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record_cache_hit(&self) {
        self.cache_hits.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_cache_miss(&self) {
        self.cache_misses.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_coalesced(&self) {
        self.coalesced.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_load_failure(&self) {
        self.load_failures.fetch_add(1, Ordering::Relaxed);
    }

    pub fn cache_hits(&self) -> usize {
        self.cache_hits.load(Ordering::Relaxed)
    }

    pub fn cache_misses(&self) -> usize {
        self.cache_misses.load(Ordering::Relaxed)
    }

    pub fn coalesced(&self) -> usize {
        self.coalesced.load(Ordering::Relaxed)
    }

    pub fn load_failures(&self) -> usize {
        self.load_failures.load(Ordering::Relaxed)
    }

    /// Generate a metrics report.
    pub fn report(&self) -> MetricsReport {
        let hits = self.cache_hits();
        let misses = self.cache_misses();
        let coalesced = self.coalesced();
        let total_requests = hits + misses + coalesced;
        let cache_hit_rate = if total_requests > 0 {
            (hits as f64 / total_requests as f64) * 100.0
        } else {
            0.0
        };

        MetricsReport {
            cache_hits: hits,
            cache_misses: misses,
            coalesced,
            load_failures: self.load_failures(),
            cache_hit_rate,
        }
    }

    /// Reset all counters to zero.
    pub fn reset(&self) {
        self.cache_hits.store(0, Ordering::Relaxed);
        self.cache_misses.store(0, Ordering::Relaxed);
        self.coalesced.store(0, Ordering::Relaxed);
        self.load_failures.store(0, Ordering::Relaxed);
    }
}

/// Snapshot of the load counters.
#[derive(Debug, Clone, Serialize)]
pub struct MetricsReport {
    pub cache_hits: usize,
    pub cache_misses: usize,
    pub coalesced: usize,
    pub load_failures: usize,

    /// Cache hit rate as a percentage (0-100) of all requests
    pub cache_hit_rate: f64,
}
