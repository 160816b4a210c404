//! In-memory polar model cache.
//!
//! The upstream RMS endpoint is slow and rate-exposed, so normalized
//! models are kept per boat with an LRU bound and a TTL. The store is
//! a plain map with a recency tick rather than a concurrent map:
//! lookup, LRU reorder, and eviction have to happen as one critical
//! section, which the caller provides by owning the cache behind a
//! lock (see `PolarService`).

use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};

use orc_client::RmsRecord;
use tracing::debug;

use crate::model::PolarModel;

/// A cached boat: the normalized model plus the raw record it came from.
#[derive(Debug, Clone)]
pub struct CacheEntry {
    /// Normalized model; immutable, shared via `Arc`.
    pub model: Arc<PolarModel>,
    /// The raw upstream record, kept for diagnostics.
    pub raw: RmsRecord,
    /// When the record was fetched.
    pub fetched_at: Instant,
}

/// Hit/miss counters for observability.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CacheStats {
    pub hits: u64,
    pub misses: u64,
}

struct Slot {
    entry: CacheEntry,
    last_used: u64,
}

/// Capacity-bounded, time-expiring store keyed by boat identity.
pub struct PolarCache {
    capacity: usize,
    ttl: Duration,
    slots: HashMap<String, Slot>,
    tick: u64,
    stats: CacheStats,
}

impl PolarCache {
    pub fn new(capacity: usize, ttl: Duration) -> Self {
        Self {
            capacity: capacity.max(1),
            ttl,
            slots: HashMap::with_capacity(capacity.max(1)),
            tick: 0,
            stats: CacheStats::default(),
        }
    }

    /// Look up a boat; a hit marks the entry most-recently-used.
    ///
    /// Expired entries are evicted on access and count as misses.
    pub fn get(&mut self, key: &str) -> Option<CacheEntry> {
        let expired = match self.slots.get(key) {
            Some(slot) => slot.entry.fetched_at.elapsed() > self.ttl,
            None => {
                self.stats.misses += 1;
                return None;
            }
        };

        if expired {
            debug!("evicting expired polar cache entry for {key}");
            self.slots.remove(key);
            self.stats.misses += 1;
            return None;
        }

        self.tick += 1;
        if let Some(slot) = self.slots.get_mut(key) {
            slot.last_used = self.tick;
            self.stats.hits += 1;
            return Some(slot.entry.clone());
        }
        self.stats.misses += 1;
        None
    }

    /// Insert or refresh an entry as most-recently-used, evicting the
    /// least-recently-used one when over capacity.
    pub fn set(&mut self, key: String, entry: CacheEntry) {
        self.tick += 1;
        self.slots.insert(
            key,
            Slot {
                entry,
                last_used: self.tick,
            },
        );

        if self.slots.len() > self.capacity {
            if let Some(oldest) = self
                .slots
                .iter()
                .min_by_key(|(_, slot)| slot.last_used)
                .map(|(key, _)| key.clone())
            {
                debug!("polar cache full, evicting {oldest}");
                self.slots.remove(&oldest);
            }
        }
    }

    pub fn stats(&self) -> CacheStats {
        self.stats
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Drop every entry and reset the counters together.
    pub fn clear(&mut self) {
        self.slots.clear();
        self.tick = 0;
        self.stats = CacheStats::default();
    }
}
