//! Availability search.
//!
//! Resolves which buses can be booked for a travel date: candidate buses on
//! the requested routes get concrete times via schedule projection, same-day
//! departures already in the past are dropped, and the remaining list is
//! filtered against the rider's criteria and sorted.

mod criteria;
mod filter;
mod search;


pub use criteria::SearchCriteria;
pub use filter::{InvalidFilterName, SortKey, TimeBucket, apply_criteria, sort_by};
pub use search::{AvailabilityEngine, BusAvailability, SearchError};

pub(crate) use search::validate_travel_date;
