//! Route catalog entry.

use super::city::CityName;
use super::id::RouteId;

/// A city pair served by one or more buses.
///
/// The (source, destination) pair is unique among non-deleted routes. Routes
/// are reference data: created by the seed/administrative process and only
/// ever soft-deleted, since bookings keep referencing them.
#[derive(Debug, Clone)]
pub struct Route {
    pub id: RouteId,
    pub source: CityName,
    pub destination: CityName,
    pub distance_km: u32,
    /// Scheduled end-to-end travel time in minutes.
    pub duration_mins: u32,
    /// Soft-delete marker; deleted routes are invisible to queries.
    pub deleted: bool,
}
