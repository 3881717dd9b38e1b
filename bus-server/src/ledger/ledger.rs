//! Booking and cancellation operations.

use std::collections::HashSet;
use std::sync::Arc;

use chrono::NaiveDate;
use tracing::{debug, info};

use crate::domain::{Booking, BookingId, BookingStatus, BusId, SeatLabel, UserId};
use crate::store::{NewBooking, Store, StoreError, with_read_retries};

use super::locks::SlotLocks;

/// Error from a ledger operation.
#[derive(Debug, Clone, thiserror::Error)]
pub enum LedgerError {
    /// The bus does not exist (or is soft-deleted)
    #[error("bus not found")]
    BusNotFound,

    /// The booking does not exist
    #[error("booking not found")]
    BookingNotFound,

    /// Not enough free seats, or a requested seat is already taken
    #[error("seats unavailable: {reason}")]
    SeatsUnavailable { reason: String },

    /// The request itself is malformed
    #[error("invalid booking request: {reason}")]
    InvalidRequest { reason: String },

    /// The store failed
    #[error(transparent)]
    Store(#[from] StoreError),
}

/// A request to book seats on one journey.
#[derive(Debug, Clone)]
pub struct BookingRequest {
    pub bus_id: BusId,
    pub journey_date: NaiveDate,
    pub seats: Vec<SeatLabel>,
    pub user_id: UserId,
    pub total_amount: f64,
}

impl BookingRequest {
    fn validate(&self) -> Result<(), LedgerError> {
        if self.seats.is_empty() {
            return Err(LedgerError::InvalidRequest {
                reason: "at least one seat is required".to_string(),
            });
        }
        let mut seen = HashSet::new();
        for seat in &self.seats {
            if !seen.insert(seat) {
                return Err(LedgerError::InvalidRequest {
                    reason: format!("seat {seat} requested twice"),
                });
            }
        }
        if !self.total_amount.is_finite() || self.total_amount < 0.0 {
            return Err(LedgerError::InvalidRequest {
                reason: "total amount must be non-negative".to_string(),
            });
        }
        Ok(())
    }
}

/// The transactional core: validates seat requests, allocates seats, and
/// releases them on cancellation.
///
/// For a fixed (bus, journey date), operations linearize: concurrent
/// requests take effect as if executed one at a time in some order. When
/// requests contend for the same seat, exactly one wins and the rest
/// observe [`LedgerError::SeatsUnavailable`]. Every failure is all-or-
/// nothing; nothing is written before the single commit step.
pub struct BookingLedger<S> {
    store: Arc<S>,
    locks: SlotLocks,
}

impl<S: Store> BookingLedger<S> {
    /// Create a ledger over a store.
    pub fn new(store: Arc<S>) -> Self {
        Self {
            store,
            locks: SlotLocks::new(),
        }
    }

    /// Book seats on a bus for a journey date.
    ///
    /// The whole request succeeds or fails: if any requested seat is taken,
    /// no seat is allocated.
    pub async fn book(&self, request: BookingRequest) -> Result<Booking, LedgerError> {
        request.validate()?;

        let slot = self
            .locks
            .for_slot(&(request.bus_id.clone(), request.journey_date));
        let _guard = slot.lock().await;

        let bus = with_read_retries(|| self.store.bus(&request.bus_id))
            .await?
            .ok_or(LedgerError::BusNotFound)?;

        let wanted = request.seats.len() as u32;
        if bus.seats_available < wanted {
            debug!(
                bus = %request.bus_id,
                available = bus.seats_available,
                wanted,
                "rejecting booking: not enough seats"
            );
            return Err(LedgerError::SeatsUnavailable {
                reason: format!("only {} seats available", bus.seats_available),
            });
        }

        let taken =
            with_read_retries(|| self.store.booked_seats(&request.bus_id, request.journey_date))
                .await?;
        if let Some(seat) = request.seats.iter().find(|s| taken.contains(*s)) {
            debug!(
                bus = %request.bus_id,
                journey_date = %request.journey_date,
                seat = %seat,
                "rejecting booking: seat already held"
            );
            return Err(LedgerError::SeatsUnavailable {
                reason: format!("seat {seat} is already booked"),
            });
        }

        // The commit is deliberately not retried: a retry after an unknown
        // outcome could allocate the same seats twice.
        let booking = self
            .store
            .commit_booking(NewBooking {
                user_id: request.user_id,
                bus_id: request.bus_id,
                route_id: bus.route_id,
                seats: request.seats,
                journey_date: request.journey_date,
                total_amount: request.total_amount,
            })
            .await?;

        info!(
            booking = %booking.id,
            bus = %booking.bus_id,
            journey_date = %booking.journey_date,
            seats = booking.seat_count(),
            "booking confirmed"
        );
        Ok(booking)
    }

    /// Cancel a booking, releasing its seats.
    ///
    /// Cancelling an already-cancelled booking succeeds without changing
    /// anything, so retries are harmless.
    pub async fn cancel(&self, id: &BookingId) -> Result<Booking, LedgerError> {
        let booking = with_read_retries(|| self.store.booking(id))
            .await?
            .ok_or(LedgerError::BookingNotFound)?;
        if booking.status == BookingStatus::Cancelled {
            return Ok(booking);
        }

        let slot = self
            .locks
            .for_slot(&(booking.bus_id.clone(), booking.journey_date));
        let _guard = slot.lock().await;

        // Re-read under the lock; a concurrent cancel may have won.
        let booking = with_read_retries(|| self.store.booking(id))
            .await?
            .ok_or(LedgerError::BookingNotFound)?;
        if booking.status == BookingStatus::Cancelled {
            return Ok(booking);
        }

        let cancelled = self.store.commit_cancellation(id).await?;
        info!(
            booking = %cancelled.id,
            bus = %cancelled.bus_id,
            seats = cancelled.seat_count(),
            "booking cancelled"
        );
        Ok(cancelled)
    }

    /// All bookings made by a user, most recent journey first.
    pub async fn bookings_for(&self, user: &UserId) -> Result<Vec<Booking>, LedgerError> {
        let mut bookings = with_read_retries(|| self.store.bookings_for_user(user)).await?;
        bookings.sort_by(|a, b| b.journey_date.cmp(&a.journey_date));
        Ok(bookings)
    }
}
