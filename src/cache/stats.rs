//! Region Statistics Module
//!
//! Tracks per-region metrics including hits, misses, puts and evictions.

use serde::Serialize;

// == Region Stats ==
/// Tracks region access metrics.
#[derive(Debug, Clone, Default, Serialize)]
pub struct RegionStats {
    /// Number of gets that found a value
    pub hits: u64,
    /// Number of gets that found nothing
    pub misses: u64,
    /// Number of puts
    pub puts: u64,
    /// Number of entries evicted by an LRU shape
    pub evictions: u64,
    /// Current number of entries in the region
    pub total_entries: usize,
}

impl RegionStats {
    pub fn new() -> Self {
        Self::default()
    }

    // == Hit Rate ==
    /// Returns hits / (hits + misses), or 0.0 if no gets have been made.
    pub fn hit_rate(&self) -> f64 {
        let total = self.hits + self.misses;
        if total == 0 {
            0.0
        } else {
            self.hits as f64 / total as f64
        }
    }

    pub fn record_hit(&mut self) {
        self.hits += 1;
    }

    pub fn record_miss(&mut self) {
        self.misses += 1;
    }

    pub fn record_put(&mut self) {
        self.puts += 1;
    }

    pub fn record_eviction(&mut self) {
        self.evictions += 1;
    }

    /// Folds another set of counters into this one.
    pub fn merge(&mut self, other: &RegionStats) {
        self.hits += other.hits;
        self.misses += other.misses;
        self.puts += other.puts;
        self.evictions += other.evictions;
        self.total_entries += other.total_entries;
    }
}
