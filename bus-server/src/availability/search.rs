//! Availability search engine.

use std::collections::HashMap;
use std::sync::Arc;

use chrono::{NaiveDate, NaiveDateTime};
use futures::future::join_all;
use tracing::debug;

use crate::domain::{Bus, Route, RouteId};
use crate::schedule;
use crate::store::{Store, StoreError, with_read_retries};

use super::criteria::SearchCriteria;
use super::filter;

/// Error from availability search.
#[derive(Debug, Clone, thiserror::Error)]
pub enum SearchError {
    /// The query itself is malformed and can be corrected by the caller
    #[error("invalid query: {reason}")]
    InvalidQuery { reason: String },

    /// The store failed
    #[error(transparent)]
    Store(#[from] StoreError),
}

/// One bookable bus in a search result, with concrete times for the
/// requested travel date and the route it serves.
#[derive(Debug, Clone)]
pub struct BusAvailability {
    pub bus: Bus,
    pub route: Route,
    pub departure: NaiveDateTime,
    pub arrival: NaiveDateTime,
}

/// Reject travel dates in the past.
///
/// `now` is passed in rather than read from the clock so results are
/// reproducible in tests; the comparison is on calendar dates, so booking
/// for later today stays valid.
pub(crate) fn validate_travel_date(
    travel_date: NaiveDate,
    now: NaiveDateTime,
) -> Result<(), SearchError> {
    if travel_date < now.date() {
        return Err(SearchError::InvalidQuery {
            reason: "travel date cannot be in the past".to_string(),
        });
    }
    Ok(())
}

/// Read-only search over the bus catalog.
///
/// Safe to call concurrently; nothing here mutates the store.
pub struct AvailabilityEngine<S> {
    store: Arc<S>,
}

impl<S: Store> AvailabilityEngine<S> {
    /// Create an engine over a store.
    pub fn new(store: Arc<S>) -> Self {
        Self { store }
    }

    /// Find buses matching the criteria for a travel date.
    ///
    /// An empty result is success; the caller distinguishes "no route"
    /// from "no matching buses" by whether `route_ids` was empty upstream.
    pub async fn search(
        &self,
        route_ids: &[RouteId],
        travel_date: NaiveDate,
        criteria: &SearchCriteria,
        now: NaiveDateTime,
    ) -> Result<Vec<BusAvailability>, SearchError> {
        validate_travel_date(travel_date, now)?;
        let candidates = self.candidates(route_ids, travel_date, now).await?;
        let matched = filter::apply_criteria(candidates, criteria);
        debug!(
            travel_date = %travel_date,
            matched = matched.len(),
            "availability search complete"
        );
        Ok(matched)
    }

    /// Candidate buses for a travel date, before criteria are applied.
    ///
    /// Projects each bus's schedule template onto the travel date and drops
    /// journeys whose departure has already passed. The caller (or the
    /// cache layer) applies criteria afterwards, so one candidate list can
    /// serve many filter combinations.
    pub async fn candidates(
        &self,
        route_ids: &[RouteId],
        travel_date: NaiveDate,
        now: NaiveDateTime,
    ) -> Result<Vec<BusAvailability>, SearchError> {
        if route_ids.is_empty() {
            return Ok(Vec::new());
        }

        let buses = with_read_retries(|| self.store.buses_on_routes(route_ids)).await?;
        let routes = self.routes_by_id(route_ids).await?;

        let mut candidates = Vec::with_capacity(buses.len());
        let mut departed = 0usize;
        for bus in buses {
            let Some(route) = routes.get(&bus.route_id) else {
                // Route soft-deleted after the bus query; skip the orphan.
                continue;
            };
            let projection = schedule::project(bus.departure, bus.arrival, travel_date);
            if projection.departed_by(now) {
                departed += 1;
                continue;
            }
            candidates.push(BusAvailability {
                bus,
                route: route.clone(),
                departure: projection.departure,
                arrival: projection.arrival,
            });
        }

        debug!(
            travel_date = %travel_date,
            candidates = candidates.len(),
            departed,
            "projected candidate buses"
        );
        Ok(candidates)
    }

    async fn routes_by_id(
        &self,
        route_ids: &[RouteId],
    ) -> Result<HashMap<RouteId, Route>, SearchError> {
        let lookups = route_ids
            .iter()
            .map(|id| with_read_retries(move || self.store.route(id)));

        let mut routes = HashMap::with_capacity(route_ids.len());
        for result in join_all(lookups).await {
            if let Some(route) = result? {
                routes.insert(route.id.clone(), route);
            }
        }
        Ok(routes)
    }
}
