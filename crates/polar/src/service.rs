//! Request orchestration: cache, fetch, build, solve.

use std::sync::Arc;
use std::time::Instant;

use common::{Error, OptimalResult, TargetRequest};
use orc_client::OrcClient;
use tokio::sync::Mutex;
use tracing::{debug, info};

use crate::cache::{CacheEntry, CacheStats, PolarCache};
use crate::model::PolarModel;
use crate::solver::compute_targets;

/// The polar target service: an upstream client plus an injected cache.
///
/// One instance is shared per process; the cache lock serialises
/// get/set/eviction so LRU ordering never tears under concurrent
/// requests. The computation itself runs on immutable models and needs
/// no locking.
pub struct PolarService {
    client: OrcClient,
    cache: Mutex<PolarCache>,
}

impl PolarService {
    pub fn new(client: OrcClient, cache: PolarCache) -> Self {
        Self {
            client,
            cache: Mutex::new(cache),
        }
    }

    /// Compute optimal targets for one request.
    ///
    /// A request without a derivable cache key (sail number with no
    /// country, for instance) bypasses the cache entirely and behaves
    /// as an always-miss.
    pub async fn optimal_targets(&self, request: &TargetRequest) -> Result<OptimalResult, Error> {
        request.validate()?;

        let key = request.cache_key();

        if let Some(key) = &key {
            let mut cache = self.cache.lock().await;
            if let Some(cached) = cache.get(key) {
                debug!("polar cache hit for {key}");
                return compute_targets(&cached.model, request.wind_speed);
            }
        }

        info!("polar cache miss, fetching RMS for {}", request.identity_label());
        let record = self.client.fetch_rms(request).await?;
        let model = Arc::new(PolarModel::from_record(&record)?);

        if let Some(key) = key {
            self.cache.lock().await.set(
                key,
                CacheEntry {
                    model: Arc::clone(&model),
                    raw: record,
                    fetched_at: Instant::now(),
                },
            );
        }

        compute_targets(&model, request.wind_speed)
    }

    /// Snapshot of the cache hit/miss counters.
    pub async fn cache_stats(&self) -> CacheStats {
        self.cache.lock().await.stats()
    }

    /// Drop all cached boats and reset the counters.
    pub async fn clear_cache(&self) {
        self.cache.lock().await.clear();
    }
}
