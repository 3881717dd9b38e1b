//! Transactional seat booking.
//!
//! All mutation of seat state funnels through [`BookingLedger`]. Bookings
//! for one (bus, journey date) seat-slot pool are serialized by a
//! partitioned lock table, which makes the check-then-commit sequence
//! indivisible: under any interleaving of concurrent requests, each seat of
//! each journey has at most one non-cancelled owner.

mod ledger;
mod locks;


pub use ledger::{BookingLedger, BookingRequest, LedgerError};
