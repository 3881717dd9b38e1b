//! Route lookup by city pair.

use std::sync::Arc;

use crate::domain::{CityName, InvalidCity, RouteId};
use crate::store::{Store, StoreError, with_read_retries};

/// Error from route lookup.
#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    /// A city name failed normalization
    #[error(transparent)]
    InvalidCity(#[from] InvalidCity),

    /// The store failed
    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Read-only resolver from a (source, destination) city pair to route ids.
///
/// City inputs are trimmed and compared case-insensitively; there is no
/// partial matching. "No such route" is an empty result, not an error, so
/// callers can tell it apart from "route exists but no buses matched".
pub struct RouteCatalog<S> {
    store: Arc<S>,
}

impl<S: Store> RouteCatalog<S> {
    /// Create a catalog over a store.
    pub fn new(store: Arc<S>) -> Self {
        Self { store }
    }

    /// Resolve all routes from `source` to `destination`.
    pub async fn find_routes(
        &self,
        source: &str,
        destination: &str,
    ) -> Result<Vec<RouteId>, CatalogError> {
        let source = CityName::parse(source)?;
        let destination = CityName::parse(destination)?;

        let routes =
            with_read_retries(|| self.store.routes_between(&source, &destination)).await?;
        Ok(routes.into_iter().map(|r| r.id).collect())
    }
}
