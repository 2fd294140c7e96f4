//! Time-bounded in-memory caches.
//!
//! Entries expire lazily: nothing sweeps the map, an expired entry is
//! removed by the read that finds it. There is no capacity bound, so keys
//! must come from a bounded universe (stop coordinates and stop pairs).

use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};

use parking_lot::Mutex;

use crate::segment::RouteLeg;
use crate::traffic::{SpeedSample, TrafficEstimate};

#[derive(Debug, Clone)]
struct CacheEntry<T> {
    value: T,
    timestamp: Instant,
}

/// String-keyed cache whose entries live for a fixed TTL after `set`.
///
/// Safe to share between threads; every operation takes the inner lock
/// for the duration of a single map access.
#[derive(Debug)]
pub struct TtlCache<T> {
    entries: Mutex<HashMap<String, CacheEntry<T>>>,
    ttl: Duration,
}

impl<T: Clone> TtlCache<T> {
    pub fn new(ttl: Duration) -> Self {
        Self {
            entries: Mutex::new(HashMap::new()),
            ttl,
        }
    }

    pub fn from_minutes(minutes: u64) -> Self {
        Self::new(Duration::from_secs(minutes * 60))
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Stores `value` under `key`, replacing any previous entry and
    /// restarting its lifetime.
    pub fn set(&self, key: impl Into<String>, value: T) {
        self.entries.lock().insert(
            key.into(),
            CacheEntry {
                value,
                timestamp: Instant::now(),
            },
        );
    }

    /// Returns the value if present and not older than the TTL.
    /// An expired entry is evicted.
    pub fn get(&self, key: &str) -> Option<T> {
        let mut entries = self.entries.lock();
        let expired = match entries.get(key) {
            None => return None,
            Some(entry) => entry.timestamp.elapsed() > self.ttl,
        };

        if expired {
            entries.remove(key);
            return None;
        }

        entries.get(key).map(|entry| entry.value.clone())
    }

    pub fn has(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    pub fn clear(&self) {
        self.entries.lock().clear();
    }

    /// Number of stored entries, expired ones included until they are read.
    pub fn len(&self) -> usize {
        self.entries.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Lifetimes of the three planner caches.
#[derive(Debug, Clone, Copy)]
pub struct CacheTtls {
    pub speed: Duration,
    pub traffic: Duration,
    pub route: Duration,
}

impl Default for CacheTtls {
    fn default() -> Self {
        Self {
            speed: Duration::from_secs(15 * 60),
            traffic: Duration::from_secs(15 * 60),
            // road geometry changes far less often than live traffic
            route: Duration::from_secs(30 * 60),
        }
    }
}

/// The caches shared by every request served by one planner.
#[derive(Debug, Clone)]
pub struct Caches {
    /// Live speed samples keyed by `traffic:<lat>,<lon>`.
    pub speeds: Arc<TtlCache<SpeedSample>>,
    /// Traffic-adjusted times keyed by `trafficTime:<from>:<to>`.
    pub traffic: Arc<TtlCache<TrafficEstimate>>,
    /// Provider legs keyed by `route:<from>:<to>`.
    pub routes: Arc<TtlCache<RouteLeg>>,
}

impl Caches {
    pub fn new(ttls: CacheTtls) -> Self {
        Self {
            speeds: Arc::new(TtlCache::new(ttls.speed)),
            traffic: Arc::new(TtlCache::new(ttls.traffic)),
            routes: Arc::new(TtlCache::new(ttls.route)),
        }
    }
}

impl Default for Caches {
    fn default() -> Self {
        Self::new(CacheTtls::default())
    }
}
