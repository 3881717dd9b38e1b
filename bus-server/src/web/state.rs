//! Application state for the web layer.

use std::sync::Arc;

use crate::availability::AvailabilityEngine;
use crate::cache::{CacheConfig, CachedAvailability};
use crate::catalog::RouteCatalog;
use crate::ledger::BookingLedger;
use crate::store::MemoryStore;

/// Shared application state.
///
/// Contains all the services needed to handle requests.
#[derive(Clone)]
pub struct AppState {
    /// Backing store, for read-only lookups when rendering responses
    pub store: Arc<MemoryStore>,

    /// City pair → route ids
    pub catalog: Arc<RouteCatalog<MemoryStore>>,

    /// Cached availability search
    pub availability: Arc<CachedAvailability<MemoryStore>>,

    /// Transactional seat booking
    pub ledger: Arc<BookingLedger<MemoryStore>>,
}

impl AppState {
    /// Create a new app state over a store.
    pub fn new(store: MemoryStore, cache_config: &CacheConfig) -> Self {
        let store = Arc::new(store);
        let catalog = Arc::new(RouteCatalog::new(store.clone()));
        let availability = Arc::new(CachedAvailability::new(
            AvailabilityEngine::new(store.clone()),
            cache_config,
        ));
        let ledger = Arc::new(BookingLedger::new(store.clone()));

        Self {
            store,
            catalog,
            availability,
            ledger,
        }
    }
}
