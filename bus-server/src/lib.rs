//! Bus ticket search and booking server.
//!
//! Turns recurring time-of-day bus schedules into concrete departures for a
//! requested travel date, filters candidate buses against rider criteria, and
//! allocates seats to bookings while guaranteeing that no two concurrent
//! requests can claim the same seat on the same journey.

pub mod availability;
pub mod cache;
pub mod catalog;
pub mod domain;
pub mod ledger;
pub mod schedule;
pub mod store;
pub mod web;
