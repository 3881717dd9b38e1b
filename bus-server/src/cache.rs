//! Caching layer for availability lookups.
//!
//! Candidate lists (projected buses before criteria) are cached, and the
//! criteria are applied after retrieval, so a rider toggling filters over
//! the same city pair and date is served from cache instead of re-querying.
//!
//! Time bucketing bounds staleness of the same-day "already departed"
//! exclusion; the ledger's callers invalidate explicitly after a booking or
//! cancellation so seat counts never outlive a successful write.

use std::sync::Arc;
use std::time::Duration;

use chrono::{NaiveDate, NaiveDateTime, Timelike};
use moka::future::Cache as MokaCache;

use crate::availability::{
    AvailabilityEngine, BusAvailability, SearchCriteria, SearchError, apply_criteria,
    validate_travel_date,
};
use crate::domain::RouteId;
use crate::store::Store;

/// Cache key: (routes, travel date, time bucket). The bucket is minutes
/// from midnight divided by the bucket size.
type CandidateKey = (Vec<RouteId>, NaiveDate, u32);

type CandidateEntry = Arc<Vec<BusAvailability>>;

/// Configuration for the availability cache.
#[derive(Debug, Clone)]
pub struct CacheConfig {
    /// TTL for cached entries.
    pub ttl: Duration,

    /// Maximum number of cached entries.
    pub max_capacity: u64,

    /// Time bucket size in minutes.
    pub bucket_mins: u32,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            ttl: Duration::from_secs(30),
            max_capacity: 1000,
            bucket_mins: 5,
        }
    }
}

/// Availability engine with candidate-list caching.
pub struct CachedAvailability<S> {
    engine: AvailabilityEngine<S>,
    cache: MokaCache<CandidateKey, CandidateEntry>,
    bucket_mins: u32,
}

impl<S: Store> CachedAvailability<S> {
    /// Create a cached engine.
    pub fn new(engine: AvailabilityEngine<S>, config: &CacheConfig) -> Self {
        let cache = MokaCache::builder()
            .time_to_live(config.ttl)
            .max_capacity(config.max_capacity)
            .build();

        Self {
            engine,
            cache,
            bucket_mins: config.bucket_mins.max(1),
        }
    }

    /// Search with the same contract as [`AvailabilityEngine::search`],
    /// serving candidates from cache when possible.
    pub async fn search(
        &self,
        route_ids: &[RouteId],
        travel_date: NaiveDate,
        criteria: &SearchCriteria,
        now: NaiveDateTime,
    ) -> Result<Vec<BusAvailability>, SearchError> {
        validate_travel_date(travel_date, now)?;

        let key = self.key(route_ids, travel_date, now);
        let candidates = match self.cache.get(&key).await {
            Some(entry) => entry,
            None => {
                let fresh = self.engine.candidates(route_ids, travel_date, now).await?;
                let entry = Arc::new(fresh);
                self.cache.insert(key, entry.clone()).await;
                entry
            }
        };

        Ok(apply_criteria(candidates.as_ref().clone(), criteria))
    }

    /// Drop every cached candidate list.
    ///
    /// Called after any successful booking or cancellation, since those
    /// change the seat counts embedded in cached entries.
    pub fn invalidate_all(&self) {
        self.cache.invalidate_all();
    }

    /// Number of cached entries (for monitoring).
    ///
    /// Eventually consistent; call [`Self::sync`] first for an exact count.
    pub fn entry_count(&self) -> u64 {
        self.cache.entry_count()
    }

    /// Flush the cache's pending internal maintenance tasks.
    pub async fn sync(&self) {
        self.cache.run_pending_tasks().await;
    }

    fn key(&self, route_ids: &[RouteId], travel_date: NaiveDate, now: NaiveDateTime) -> CandidateKey {
        let mut routes = route_ids.to_vec();
        routes.sort();
        let minutes = now.time().hour() * 60 + now.time().minute();
        (routes, travel_date, minutes / self.bucket_mins)
    }
}
