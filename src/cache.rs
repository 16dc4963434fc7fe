//! Time-bounded memoisation of fetched data.
//!
//! [`TtlCache`] holds one entry per key together with the instant it was fetched.
//! An entry is served while it is younger than the cache's time-to-live and replaced
//! on the first access after that. Entries are never evicted proactively.

use crate::types::date_range::DateRange;
use crate::types::location::LatLon;
use crate::types::observation_table::ObservationTable;
use chrono::NaiveDate;
use log::debug;
use ordered_float::OrderedFloat;
use std::collections::{hash_map::Entry, HashMap};
use std::future::Future;
use std::hash::Hash;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;
use tokio::time::Instant;

/// How long fetched stations and observations stay valid: 24 hours.
pub const DEFAULT_TTL: Duration = Duration::from_secs(24 * 60 * 60);

/// A cached value and the instant it was loaded.
#[derive(Debug, Clone)]
pub struct CacheEntry<V> {
    pub value: V,
    pub fetched_at: Instant,
}

impl<V> CacheEntry<V> {
    fn is_fresh(&self, ttl: Duration, now: Instant) -> bool {
        now.saturating_duration_since(self.fetched_at) < ttl
    }
}

/// Key of a cached observation table: the location and the requested range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ObservationKey {
    pub latitude: OrderedFloat<f64>,
    pub longitude: OrderedFloat<f64>,
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl ObservationKey {
    pub fn new(location: LatLon, range: &DateRange) -> Self {
        Self {
            latitude: OrderedFloat(location.0),
            longitude: OrderedFloat(location.1),
            start: range.start(),
            end: range.end(),
        }
    }
}

/// The cache the dashboard keeps its fetched observation tables in.
pub type ObservationCache = TtlCache<ObservationKey, Arc<ObservationTable>>;

/// A concurrent map from keys to values that expire `ttl` after they were loaded.
///
/// Concurrent callers that miss at the same time may each run their loader; whichever
/// finishes first stores its value and later finishers adopt it, as long as it is
/// still fresh. A value older than `ttl` is never returned.
pub struct TtlCache<K, V> {
    ttl: Duration,
    entries: Mutex<HashMap<K, CacheEntry<V>>>,
}

impl<K, V> TtlCache<K, V>
where
    K: Eq + Hash + Clone,
    V: Clone,
{
    pub fn new(ttl: Duration) -> Self {
        Self {
            ttl,
            entries: Mutex::new(HashMap::new()),
        }
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Returns the cached value for `key`, or runs `loader` and caches its result.
    ///
    /// The loader runs without holding the lock. If it fails, the error is returned
    /// and nothing is stored.
    pub async fn get_or_load<F, Fut, E>(&self, key: K, loader: F) -> Result<V, E>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<V, E>>,
    {
        {
            let entries = self.entries.lock().await;
            if let Some(entry) = entries.get(&key) {
                if entry.is_fresh(self.ttl, Instant::now()) {
                    return Ok(entry.value.clone());
                }
                debug!("Cache entry expired, reloading");
            }
        }

        let loaded = loader().await?;
        let now = Instant::now();

        let mut entries = self.entries.lock().await;
        match entries.entry(key) {
            Entry::Occupied(mut entry) => {
                // Another caller stored a value while we were loading.
                if entry.get().is_fresh(self.ttl, now) {
                    return Ok(entry.get().value.clone());
                }
                entry.insert(CacheEntry {
                    value: loaded.clone(),
                    fetched_at: now,
                });
                Ok(loaded)
            }
            Entry::Vacant(entry) => {
                entry.insert(CacheEntry {
                    value: loaded.clone(),
                    fetched_at: now,
                });
                Ok(loaded)
            }
        }
    }

    /// The cached value for `key` if it is still fresh, without loading.
    pub async fn get(&self, key: &K) -> Option<V> {
        let entries = self.entries.lock().await;
        entries
            .get(key)
            .filter(|e| e.is_fresh(self.ttl, Instant::now()))
            .map(|e| e.value.clone())
    }

    pub async fn invalidate(&self, key: &K) -> Option<V> {
        self.entries.lock().await.remove(key).map(|e| e.value)
    }

    pub async fn clear(&self) {
        self.entries.lock().await.clear();
    }

    /// Number of stored entries, stale ones included.
    pub async fn len(&self) -> usize {
        self.entries.lock().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.entries.lock().await.is_empty()
    }
}
