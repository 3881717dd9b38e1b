//! Booking record and status lifecycle.

use std::fmt;

use chrono::{NaiveDate, NaiveDateTime};

use super::id::{BookingId, BusId, RouteId, UserId};
use super::seat::SeatLabel;

/// Lifecycle status of a booking.
///
/// `Pending → Confirmed | Cancelled`; Confirmed and Cancelled are terminal
/// except that a Confirmed booking may still be cancelled. Cancellation is
/// the only transition that returns seats to the bus counter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BookingStatus {
    Pending,
    Confirmed,
    Cancelled,
}

impl BookingStatus {
    /// Wire/storage name.
    pub fn as_str(&self) -> &'static str {
        match self {
            BookingStatus::Pending => "pending",
            BookingStatus::Confirmed => "confirmed",
            BookingStatus::Cancelled => "cancelled",
        }
    }

    /// Whether this booking's seats count against the bus's availability.
    pub fn holds_seats(&self) -> bool {
        !matches!(self, BookingStatus::Cancelled)
    }
}

impl fmt::Display for BookingStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A confirmed (or cancelled) seat allocation for one journey.
///
/// Seat labels are unique within the booking. For a given (bus, journey
/// date), no seat label appears in two different non-cancelled bookings;
/// the booking ledger enforces this.
#[derive(Debug, Clone)]
pub struct Booking {
    pub id: BookingId,
    pub user_id: UserId,
    pub bus_id: BusId,
    pub route_id: RouteId,
    pub seats: Vec<SeatLabel>,
    /// Calendar date of travel; the time of day comes from the bus template.
    pub journey_date: NaiveDate,
    pub booked_at: NaiveDateTime,
    pub status: BookingStatus,
    pub total_amount: f64,
    /// Reference into the external payment collaborator, when present.
    pub payment_ref: Option<String>,
}

impl Booking {
    /// Number of seats this booking holds.
    pub fn seat_count(&self) -> u32 {
        self.seats.len() as u32
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cancelled_does_not_hold_seats() {
        assert!(BookingStatus::Pending.holds_seats());
        assert!(BookingStatus::Confirmed.holds_seats());
        assert!(!BookingStatus::Cancelled.holds_seats());
    }

    #[test]
    fn status_names() {
        assert_eq!(BookingStatus::Pending.as_str(), "pending");
        assert_eq!(BookingStatus::Confirmed.as_str(), "confirmed");
        assert_eq!(BookingStatus::Cancelled.as_str(), "cancelled");
    }
}
