//! Region Module
//!
//! Named key-value containers scoped to a single cache. A region's storage
//! layout follows its shape: partitioned shapes spread entries over a fixed
//! set of buckets by key hash, every other shape keeps one bucket.

use std::collections::hash_map::DefaultHasher;
use std::collections::{BTreeMap, HashMap};
use std::hash::{Hash, Hasher};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, RwLock as StdRwLock};

use tokio::sync::{Mutex, RwLock};
use tracing::debug;

use crate::cache::{Key, LruTracker, RegionStats, Shape, DEFAULT_TOTAL_BUCKETS};
use crate::error::{GridError, Result};

// == Bucket ==
/// One partition of a region's entries.
#[derive(Debug, Default)]
struct Bucket {
    entries: HashMap<Key, String>,
    stats: RegionStats,
}

#[derive(Debug)]
struct RegionInner {
    name: String,
    shape: Shape,
    buckets: Vec<RwLock<Bucket>>,
    /// Present only for LRU shapes; always locked before any bucket
    lru: Option<Mutex<LruTracker<Key>>>,
    max_entries: usize,
    len: AtomicUsize,
}

// == Region ==
/// Handle to a region. Clones share the same underlying entries.
#[derive(Debug, Clone)]
pub struct Region {
    inner: Arc<RegionInner>,
}

impl Region {
    // == Constructor ==
    /// Creates an empty region.
    ///
    /// # Arguments
    /// * `name` - Region name, unique within its cache
    /// * `shape` - Fixed storage shape
    /// * `max_entries` - Entry limit, honoured only by LRU shapes
    pub(crate) fn new(name: impl Into<String>, shape: Shape, max_entries: usize) -> Self {
        let bucket_count = if shape.is_partitioned() {
            DEFAULT_TOTAL_BUCKETS
        } else {
            1
        };

        let buckets = (0..bucket_count)
            .map(|_| RwLock::new(Bucket::default()))
            .collect();

        Self {
            inner: Arc::new(RegionInner {
                name: name.into(),
                shape,
                buckets,
                lru: shape.is_lru().then(|| Mutex::new(LruTracker::new())),
                max_entries: max_entries.max(1),
                len: AtomicUsize::new(0),
            }),
        }
    }

    pub fn name(&self) -> &str {
        &self.inner.name
    }

    pub fn shape(&self) -> Shape {
        self.inner.shape
    }

    pub fn bucket_count(&self) -> usize {
        self.inner.buckets.len()
    }

    /// Returns true if both handles refer to the same underlying region.
    pub fn same_region(&self, other: &Region) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }

    // == Partitioning ==
    /// Maps a key to its bucket index. Stable for the life of the process.
    pub fn bucket_for(&self, key: &Key) -> usize {
        let buckets = self.inner.buckets.len();
        if buckets == 1 {
            return 0;
        }
        let mut hasher = DefaultHasher::new();
        key.hash(&mut hasher);
        (hasher.finish() % buckets as u64) as usize
    }

    // == Get ==
    /// Returns the value stored under `key`, if any.
    pub async fn get(&self, key: impl Into<Key>) -> Option<String> {
        let key = key.into();
        let mut lru = self.lock_lru().await;

        let value = {
            // Write lock: hit/miss counters live in the bucket
            let mut bucket = self.inner.buckets[self.bucket_for(&key)].write().await;
            let value = bucket.entries.get(&key).cloned();
            if value.is_some() {
                bucket.stats.record_hit();
            } else {
                bucket.stats.record_miss();
            }
            value
        };

        if let (Some(lru), Some(_)) = (lru.as_mut(), value.as_ref()) {
            lru.touch(&key);
        }
        value
    }

    // == Put ==
    /// Stores `value` under `key` and returns the value it replaced.
    ///
    /// LRU shapes evict their least recently used entries until the region is
    /// back within its entry limit.
    pub async fn put(&self, key: impl Into<Key>, value: impl Into<String>) -> Option<String> {
        let key = key.into();
        let mut lru = self.lock_lru().await;

        let previous = {
            let mut bucket = self.inner.buckets[self.bucket_for(&key)].write().await;
            bucket.stats.record_put();
            let previous = bucket.entries.insert(key.clone(), value.into());
            // Counted under the bucket lock so removes of this key see it
            if previous.is_none() {
                self.inner.len.fetch_add(1, Ordering::SeqCst);
            }
            previous
        };

        if let Some(lru) = lru.as_mut() {
            lru.touch(&key);
            while self.inner.len.load(Ordering::SeqCst) > self.inner.max_entries {
                let Some(oldest) = lru.evict_oldest() else {
                    break;
                };
                let mut bucket = self.inner.buckets[self.bucket_for(&oldest)].write().await;
                if bucket.entries.remove(&oldest).is_some() {
                    bucket.stats.record_eviction();
                    self.inner.len.fetch_sub(1, Ordering::SeqCst);
                    debug!("Region [{}] evicted key [{}]", self.inner.name, oldest);
                }
            }
        }

        previous
    }

    // == Remove ==
    /// Removes `key` and returns the value it held.
    pub async fn remove(&self, key: impl Into<Key>) -> Option<String> {
        let key = key.into();
        let mut lru = self.lock_lru().await;

        let previous = {
            let mut bucket = self.inner.buckets[self.bucket_for(&key)].write().await;
            let previous = bucket.entries.remove(&key);
            if previous.is_some() {
                self.inner.len.fetch_sub(1, Ordering::SeqCst);
            }
            previous
        };
        if let (Some(lru), Some(_)) = (lru.as_mut(), previous.as_ref()) {
            lru.remove(&key);
        }
        previous
    }

    pub async fn contains_key(&self, key: impl Into<Key>) -> bool {
        let key = key.into();
        let bucket = self.inner.buckets[self.bucket_for(&key)].read().await;
        bucket.entries.contains_key(&key)
    }

    pub fn len(&self) -> usize {
        self.inner.len.load(Ordering::SeqCst)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Returns every key in the region, sorted.
    pub async fn keys(&self) -> Vec<Key> {
        let mut keys = Vec::with_capacity(self.len());
        for bucket in &self.inner.buckets {
            keys.extend(bucket.read().await.entries.keys().cloned());
        }
        keys.sort();
        keys
    }

    // == Stats ==
    /// Returns counters aggregated over all buckets.
    pub async fn stats(&self) -> RegionStats {
        let mut stats = RegionStats::new();
        for bucket in &self.inner.buckets {
            let bucket = bucket.read().await;
            stats.merge(&bucket.stats);
            stats.total_entries += bucket.entries.len();
        }
        stats
    }

    async fn lock_lru(&self) -> Option<tokio::sync::MutexGuard<'_, LruTracker<Key>>> {
        match &self.inner.lru {
            Some(lru) => Some(lru.lock().await),
            None => None,
        }
    }
}

// == Region Registry ==
/// Regions of one cache, indexed by name.
#[derive(Debug, Default)]
pub struct RegionRegistry {
    regions: StdRwLock<BTreeMap<String, Region>>,
    max_entries: usize,
}

impl RegionRegistry {
    /// Creates an empty registry whose LRU regions hold at most `max_entries`.
    pub fn new(max_entries: usize) -> Self {
        Self {
            regions: StdRwLock::new(BTreeMap::new()),
            max_entries,
        }
    }

    // == Get Or Create ==
    /// Returns the region called `name`, creating it with `shape` if absent.
    ///
    /// Asking again for an existing region with the same shape returns the
    /// same region; a different shape is an error.
    pub fn get_or_create(&self, name: &str, shape: Shape) -> Result<Region> {
        validate_region_name(name)?;

        let mut regions = self.regions.write().unwrap_or_else(|e| e.into_inner());
        if let Some(existing) = regions.get(name) {
            if existing.shape() != shape {
                return Err(GridError::RegionExists {
                    name: name.to_string(),
                    existing: existing.shape().to_string(),
                    requested: shape.to_string(),
                });
            }
            return Ok(existing.clone());
        }

        let region = Region::new(name, shape, self.max_entries);
        regions.insert(name.to_string(), region.clone());
        debug!("Created region [{}] with shape [{}]", name, shape);
        Ok(region)
    }

    pub fn get(&self, name: &str) -> Option<Region> {
        self.regions
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .get(name)
            .cloned()
    }

    /// Returns all regions ordered by name.
    pub fn list(&self) -> Vec<Region> {
        self.regions
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .values()
            .cloned()
            .collect()
    }
}

fn validate_region_name(name: &str) -> Result<()> {
    if name.trim().is_empty() {
        return Err(GridError::InvalidArguments(
            "Region name must not be empty".to_string(),
        ));
    }
    if name.contains('/') {
        return Err(GridError::InvalidArguments(format!(
            "Region name [{}] must not contain '/'",
            name
        )));
    }
    Ok(())
}
