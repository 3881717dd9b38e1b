//! Persistence contract for the booking core.
//!
//! The core does not mandate a storage technology; it needs point lookups by
//! id, equality queries over the catalog, and — for the booking ledger — two
//! commit operations that each apply their reads and writes as a single
//! atomic step. [`MemoryStore`] is the in-process implementation; a database
//! backend would implement the same trait.
//!
//! Soft deletion is handled here: queries and point lookups never return
//! records whose `deleted` flag is set, mirroring how every read path of the
//! catalog behaves.

mod memory;

pub use memory::{MemoryStore, SeedError};

use std::collections::HashSet;
use std::future::Future;

use chrono::NaiveDate;
use tracing::warn;

use crate::domain::{
    Booking, BookingId, Bus, BusId, CityName, Route, RouteId, SeatLabel, UserId,
};

/// Infrastructure failure in the store.
///
/// Never the caller's fault; surfaced to clients as an internal error.
#[derive(Debug, Clone, thiserror::Error)]
pub enum StoreError {
    /// The store could not be reached or timed out.
    #[error("store unavailable: {message}")]
    Unavailable { message: String },

    /// The store answered, but its state violates a core invariant.
    #[error("store state corrupt: {message}")]
    Corrupt { message: String },
}

/// A booking to be committed.
///
/// The store assigns the identifier and the booking timestamp at commit,
/// the way a database would.
#[derive(Debug, Clone)]
pub struct NewBooking {
    pub user_id: UserId,
    pub bus_id: BusId,
    pub route_id: RouteId,
    pub seats: Vec<SeatLabel>,
    pub journey_date: NaiveDate,
    pub total_amount: f64,
}

/// Durable store for routes, buses, and bookings.
///
/// Read methods are idempotent and may be retried; the two commit methods
/// must each be atomic and are never retried by callers.
#[allow(async_fn_in_trait)]
pub trait Store: Send + Sync {
    /// Non-deleted routes with the given endpoints.
    async fn routes_between(
        &self,
        source: &CityName,
        destination: &CityName,
    ) -> Result<Vec<Route>, StoreError>;

    /// Point lookup of a non-deleted route.
    async fn route(&self, id: &RouteId) -> Result<Option<Route>, StoreError>;

    /// Point lookup of a non-deleted bus.
    async fn bus(&self, id: &BusId) -> Result<Option<Bus>, StoreError>;

    /// Non-deleted buses operating any of the given routes.
    async fn buses_on_routes(&self, route_ids: &[RouteId]) -> Result<Vec<Bus>, StoreError>;

    /// Point lookup of a booking.
    async fn booking(&self, id: &BookingId) -> Result<Option<Booking>, StoreError>;

    /// All bookings made by a user, in no particular order.
    async fn bookings_for_user(&self, user: &UserId) -> Result<Vec<Booking>, StoreError>;

    /// Seat labels held by non-cancelled bookings for (bus, journey date).
    async fn booked_seats(
        &self,
        bus: &BusId,
        journey_date: NaiveDate,
    ) -> Result<HashSet<SeatLabel>, StoreError>;

    /// Atomically insert a confirmed booking and decrement the bus's
    /// available-seat counter by the booking's seat count.
    ///
    /// Fails with [`StoreError::Corrupt`] rather than breaking the counter
    /// invariant if the bus is missing or short of seats.
    async fn commit_booking(&self, new: NewBooking) -> Result<Booking, StoreError>;

    /// Atomically mark a booking cancelled and return its seats to the bus
    /// counter. Committing an already-cancelled booking is a no-op that
    /// returns the record unchanged.
    async fn commit_cancellation(&self, id: &BookingId) -> Result<Booking, StoreError>;
}

/// Bounded retry for idempotent reads.
///
/// Booking writes are never routed through this: retrying a commit whose
/// outcome is unknown risks double allocation, so commits fail fast and the
/// caller decides.
pub async fn with_read_retries<T, F, Fut>(mut read: F) -> Result<T, StoreError>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, StoreError>>,
{
    const MAX_ATTEMPTS: u32 = 3;

    let mut attempt = 1;
    loop {
        match read().await {
            Ok(value) => return Ok(value),
            Err(err) if attempt < MAX_ATTEMPTS => {
                warn!(attempt, %err, "store read failed, retrying");
                attempt += 1;
            }
            Err(err) => return Err(err),
        }
    }
}
