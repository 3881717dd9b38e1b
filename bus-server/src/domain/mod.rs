//! Domain types for the bus booking core.
//!
//! This module contains the core domain model types representing validated
//! catalog and booking data. All types enforce their invariants at
//! construction time, so code that receives these types can trust their
//! validity.

mod booking;
mod bus;
mod city;
mod id;
mod route;
mod seat;
mod time;

pub use booking::{Booking, BookingStatus};
pub use bus::{Bus, BusType, InvalidBusType};
pub use city::{CityName, InvalidCity};
pub use id::{BookingId, BusId, RouteId, UserId};
pub use route::Route;
pub use seat::{InvalidSeatLabel, SeatLabel};
pub use time::{InvalidTimeOfDay, TimeOfDay};
