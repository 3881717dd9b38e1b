//! In-memory store with JSON seed loading.
//!
//! Backs development and tests without a database. Catalog data is loaded
//! from a JSON seed file (routes plus buses, schedule times as "HH:MM"
//! strings); bookings live only for the life of the process. All commit
//! operations run under a single writer lock, which makes each commit
//! atomic with respect to every other store operation.

use std::collections::{HashMap, HashSet};
use std::path::Path;
use std::sync::Arc;

use chrono::{NaiveDate, Utc};
use serde::Deserialize;
use tokio::sync::RwLock;

use crate::domain::{
    Booking, BookingId, BookingStatus, Bus, BusId, BusType, CityName, Route, RouteId, SeatLabel,
    TimeOfDay, UserId,
};

use super::{NewBooking, Store, StoreError};

/// Error returned when seed data cannot be loaded.
#[derive(Debug, thiserror::Error)]
pub enum SeedError {
    /// Seed file could not be read
    #[error("failed to read seed file: {0}")]
    Io(#[from] std::io::Error),

    /// Seed file is not valid JSON
    #[error("failed to parse seed file: {0}")]
    Json(#[from] serde_json::Error),

    /// Seed data violates a catalog invariant
    #[error("invalid seed data: {message}")]
    Invalid { message: String },
}

impl SeedError {
    fn invalid(message: impl Into<String>) -> Self {
        SeedError::Invalid {
            message: message.into(),
        }
    }
}

#[derive(Default)]
struct Inner {
    routes: HashMap<RouteId, Route>,
    buses: HashMap<BusId, Bus>,
    bookings: HashMap<BookingId, Booking>,
    next_booking_seq: u64,
}

/// In-memory implementation of [`Store`].
#[derive(Clone)]
pub struct MemoryStore {
    inner: Arc<RwLock<Inner>>,
}

impl MemoryStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self {
            inner: Arc::new(RwLock::new(Inner::default())),
        }
    }

    /// Load a store from a JSON seed file.
    pub fn from_seed_file(path: impl AsRef<Path>) -> Result<Self, SeedError> {
        let raw = std::fs::read_to_string(path)?;
        Self::from_seed_json(&raw)
    }

    /// Load a store from JSON seed text.
    pub fn from_seed_json(raw: &str) -> Result<Self, SeedError> {
        let seed: SeedFile = serde_json::from_str(raw)?;

        let mut routes = HashMap::new();
        let mut endpoints = HashSet::new();
        for dto in seed.routes {
            let route = dto.into_route()?;
            if !endpoints.insert((route.source.clone(), route.destination.clone())) {
                return Err(SeedError::invalid(format!(
                    "duplicate route {} -> {}",
                    route.source, route.destination
                )));
            }
            if routes.insert(route.id.clone(), route).is_some() {
                return Err(SeedError::invalid("duplicate route id"));
            }
        }

        let mut buses = HashMap::new();
        let mut numbers = HashSet::new();
        for dto in seed.buses {
            let bus = dto.into_bus()?;
            if !routes.contains_key(&bus.route_id) {
                return Err(SeedError::invalid(format!(
                    "bus {} references unknown route {}",
                    bus.bus_number, bus.route_id
                )));
            }
            if !numbers.insert(bus.bus_number.clone()) {
                return Err(SeedError::invalid(format!(
                    "duplicate bus number {}",
                    bus.bus_number
                )));
            }
            if buses.insert(bus.id.clone(), bus).is_some() {
                return Err(SeedError::invalid("duplicate bus id"));
            }
        }

        Ok(Self {
            inner: Arc::new(RwLock::new(Inner {
                routes,
                buses,
                bookings: HashMap::new(),
                next_booking_seq: 0,
            })),
        })
    }

    /// Insert or replace a route. Test and seed helper.
    pub async fn put_route(&self, route: Route) {
        let mut inner = self.inner.write().await;
        inner.routes.insert(route.id.clone(), route);
    }

    /// Insert or replace a bus. Test and seed helper.
    pub async fn put_bus(&self, bus: Bus) {
        let mut inner = self.inner.write().await;
        inner.buses.insert(bus.id.clone(), bus);
    }

    /// Number of non-deleted routes.
    pub async fn route_count(&self) -> usize {
        let inner = self.inner.read().await;
        inner.routes.values().filter(|r| !r.deleted).count()
    }

    /// Number of non-deleted buses.
    pub async fn bus_count(&self) -> usize {
        let inner = self.inner.read().await;
        inner.buses.values().filter(|b| !b.deleted).count()
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl Store for MemoryStore {
    async fn routes_between(
        &self,
        source: &CityName,
        destination: &CityName,
    ) -> Result<Vec<Route>, StoreError> {
        let inner = self.inner.read().await;
        Ok(inner
            .routes
            .values()
            .filter(|r| !r.deleted && &r.source == source && &r.destination == destination)
            .cloned()
            .collect())
    }

    async fn route(&self, id: &RouteId) -> Result<Option<Route>, StoreError> {
        let inner = self.inner.read().await;
        Ok(inner.routes.get(id).filter(|r| !r.deleted).cloned())
    }

    async fn bus(&self, id: &BusId) -> Result<Option<Bus>, StoreError> {
        let inner = self.inner.read().await;
        Ok(inner.buses.get(id).filter(|b| !b.deleted).cloned())
    }

    async fn buses_on_routes(&self, route_ids: &[RouteId]) -> Result<Vec<Bus>, StoreError> {
        let inner = self.inner.read().await;
        Ok(inner
            .buses
            .values()
            .filter(|b| !b.deleted && route_ids.contains(&b.route_id))
            .cloned()
            .collect())
    }

    async fn booking(&self, id: &BookingId) -> Result<Option<Booking>, StoreError> {
        let inner = self.inner.read().await;
        Ok(inner.bookings.get(id).cloned())
    }

    async fn bookings_for_user(&self, user: &UserId) -> Result<Vec<Booking>, StoreError> {
        let inner = self.inner.read().await;
        Ok(inner
            .bookings
            .values()
            .filter(|b| &b.user_id == user)
            .cloned()
            .collect())
    }

    async fn booked_seats(
        &self,
        bus: &BusId,
        journey_date: NaiveDate,
    ) -> Result<HashSet<SeatLabel>, StoreError> {
        let inner = self.inner.read().await;
        Ok(inner
            .bookings
            .values()
            .filter(|b| {
                &b.bus_id == bus && b.journey_date == journey_date && b.status.holds_seats()
            })
            .flat_map(|b| b.seats.iter().cloned())
            .collect())
    }

    async fn commit_booking(&self, new: NewBooking) -> Result<Booking, StoreError> {
        let mut inner = self.inner.write().await;

        let seats_wanted = new.seats.len() as u32;
        let bus = inner
            .buses
            .get_mut(&new.bus_id)
            .filter(|b| !b.deleted)
            .ok_or_else(|| StoreError::Corrupt {
                message: format!("bus {} vanished during booking commit", new.bus_id),
            })?;
        if bus.seats_available < seats_wanted {
            return Err(StoreError::Corrupt {
                message: format!(
                    "seat counter for bus {} short at commit: {} < {}",
                    new.bus_id, bus.seats_available, seats_wanted
                ),
            });
        }
        bus.seats_available -= seats_wanted;

        inner.next_booking_seq += 1;
        let id = BookingId::new(format!("bk-{:06}", inner.next_booking_seq));
        let booking = Booking {
            id: id.clone(),
            user_id: new.user_id,
            bus_id: new.bus_id,
            route_id: new.route_id,
            seats: new.seats,
            journey_date: new.journey_date,
            booked_at: Utc::now().naive_utc(),
            status: BookingStatus::Confirmed,
            total_amount: new.total_amount,
            payment_ref: None,
        };
        inner.bookings.insert(id, booking.clone());

        Ok(booking)
    }

    async fn commit_cancellation(&self, id: &BookingId) -> Result<Booking, StoreError> {
        let mut inner = self.inner.write().await;

        let missing_booking = || StoreError::Corrupt {
            message: format!("booking {id} vanished during cancellation commit"),
        };

        let booking = inner.bookings.get(id).ok_or_else(missing_booking)?;
        if booking.status == BookingStatus::Cancelled {
            return Ok(booking.clone());
        }
        let released = booking.seat_count();
        let bus_id = booking.bus_id.clone();

        // Seats go back even to a soft-deleted bus; the counter must balance.
        let bus = inner
            .buses
            .get_mut(&bus_id)
            .ok_or_else(|| StoreError::Corrupt {
                message: format!("bus {bus_id} vanished during cancellation commit"),
            })?;
        bus.seats_available += released;
        debug_assert!(bus.seats_available <= bus.capacity);

        let stored = inner.bookings.get_mut(id).ok_or_else(missing_booking)?;
        stored.status = BookingStatus::Cancelled;

        Ok(stored.clone())
    }
}

#[derive(Deserialize)]
struct SeedFile {
    routes: Vec<SeedRoute>,
    buses: Vec<SeedBus>,
}

#[derive(Deserialize)]
struct SeedRoute {
    id: String,
    source: String,
    destination: String,
    distance: u32,
    duration: u32,
}

impl SeedRoute {
    fn into_route(self) -> Result<Route, SeedError> {
        let source = CityName::parse(&self.source)
            .map_err(|e| SeedError::invalid(format!("route {}: {e}", self.id)))?;
        let destination = CityName::parse(&self.destination)
            .map_err(|e| SeedError::invalid(format!("route {}: {e}", self.id)))?;
        Ok(Route {
            id: RouteId::new(self.id),
            source,
            destination,
            distance_km: self.distance,
            duration_mins: self.duration,
            deleted: false,
        })
    }
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct SeedBus {
    id: String,
    bus_number: String,
    operator: String,
    #[serde(rename = "type")]
    bus_type: String,
    capacity: u32,
    seats_available: u32,
    price: f64,
    #[serde(default)]
    live_tracking: bool,
    #[serde(default)]
    primo: bool,
    route_id: String,
    departure_time: String,
    arrival_time: String,
}

impl SeedBus {
    fn into_bus(self) -> Result<Bus, SeedError> {
        let context = |e: &dyn std::fmt::Display| format!("bus {}: {e}", self.bus_number);

        let bus_type = BusType::parse(&self.bus_type).map_err(|e| SeedError::invalid(context(&e)))?;
        let departure =
            TimeOfDay::parse_hhmm(&self.departure_time).map_err(|e| SeedError::invalid(context(&e)))?;
        let arrival =
            TimeOfDay::parse_hhmm(&self.arrival_time).map_err(|e| SeedError::invalid(context(&e)))?;

        if self.capacity == 0 {
            return Err(SeedError::invalid(context(&"capacity must be at least 1")));
        }
        if self.seats_available > self.capacity {
            return Err(SeedError::invalid(context(
                &"seatsAvailable exceeds capacity",
            )));
        }
        if !self.price.is_finite() || self.price < 0.0 {
            return Err(SeedError::invalid(context(&"price must be non-negative")));
        }

        Ok(Bus {
            id: BusId::new(self.id),
            bus_number: self.bus_number,
            operator: self.operator,
            bus_type,
            capacity: self.capacity,
            seats_available: self.seats_available,
            price: self.price,
            live_tracking: self.live_tracking,
            primo: self.primo,
            route_id: RouteId::new(self.route_id),
            departure,
            arrival,
            deleted: false,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write as _;

    const SEED: &str = r#"{
        "routes": [
            {"id": "r1", "source": "DELHI", "destination": "MUMBAI", "distance": 1400, "duration": 1440},
            {"id": "r2", "source": "BANGALORE", "destination": "CHENNAI", "distance": 350, "duration": 360}
        ],
        "buses": [
            {
                "id": "b1", "busNumber": "BUS001", "operator": "TravelCo", "type": "AC",
                "capacity": 40, "seatsAvailable": 35, "price": 1500.0,
                "liveTracking": true, "primo": false, "routeId": "r1",
                "departureTime": "08:00", "arrivalTime": "08:00"
            },
            {
                "id": "b2", "busNumber": "BUS003", "operator": "CityRide", "type": "NonAC",
                "capacity": 50, "seatsAvailable": 45, "price": 800.0,
                "routeId": "r2", "departureTime": "09:00", "arrivalTime": "15:00"
            }
        ]
    }"#;

    fn seat(s: &str) -> SeatLabel {
        SeatLabel::parse(s).unwrap()
    }

    fn date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 6, 1).unwrap()
    }

    fn new_booking(bus: &str, seats: &[&str]) -> NewBooking {
        NewBooking {
            user_id: UserId::new("u1"),
            bus_id: BusId::new(bus),
            route_id: RouteId::new("r1"),
            seats: seats.iter().map(|s| seat(s)).collect(),
            journey_date: date(),
            total_amount: 1500.0,
        }
    }

    #[tokio::test]
    async fn seed_json_loads() {
        let store = MemoryStore::from_seed_json(SEED).unwrap();
        assert_eq!(store.route_count().await, 2);
        assert_eq!(store.bus_count().await, 2);

        let bus = store.bus(&BusId::new("b1")).await.unwrap().unwrap();
        assert_eq!(bus.bus_number, "BUS001");
        assert_eq!(bus.bus_type, BusType::Ac);
        assert_eq!(bus.departure.to_string(), "08:00");
    }

    #[tokio::test]
    async fn seed_file_loads() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(SEED.as_bytes()).unwrap();

        let store = MemoryStore::from_seed_file(file.path()).unwrap();
        assert_eq!(store.route_count().await, 2);
    }

    #[test]
    fn seed_rejects_unknown_route_reference() {
        let raw = r#"{
            "routes": [],
            "buses": [{
                "id": "b1", "busNumber": "BUS001", "operator": "Op", "type": "AC",
                "capacity": 10, "seatsAvailable": 10, "price": 100.0,
                "routeId": "missing", "departureTime": "08:00", "arrivalTime": "12:00"
            }]
        }"#;
        assert!(matches!(
            MemoryStore::from_seed_json(raw),
            Err(SeedError::Invalid { .. })
        ));
    }

    #[test]
    fn seed_rejects_counter_over_capacity() {
        let raw = r#"{
            "routes": [{"id": "r1", "source": "A", "destination": "B", "distance": 1, "duration": 60}],
            "buses": [{
                "id": "b1", "busNumber": "BUS001", "operator": "Op", "type": "AC",
                "capacity": 10, "seatsAvailable": 11, "price": 100.0,
                "routeId": "r1", "departureTime": "08:00", "arrivalTime": "12:00"
            }]
        }"#;
        assert!(matches!(
            MemoryStore::from_seed_json(raw),
            Err(SeedError::Invalid { .. })
        ));
    }

    #[test]
    fn seed_rejects_duplicate_endpoints() {
        let raw = r#"{
            "routes": [
                {"id": "r1", "source": "A", "destination": "B", "distance": 1, "duration": 60},
                {"id": "r2", "source": "a", "destination": "b", "distance": 2, "duration": 90}
            ],
            "buses": []
        }"#;
        assert!(matches!(
            MemoryStore::from_seed_json(raw),
            Err(SeedError::Invalid { .. })
        ));
    }

    #[tokio::test]
    async fn routes_between_matches_normalized_endpoints() {
        let store = MemoryStore::from_seed_json(SEED).unwrap();
        let found = store
            .routes_between(
                &CityName::parse("delhi").unwrap(),
                &CityName::parse(" Mumbai ").unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].id, RouteId::new("r1"));

        let none = store
            .routes_between(
                &CityName::parse("MUMBAI").unwrap(),
                &CityName::parse("DELHI").unwrap(),
            )
            .await
            .unwrap();
        assert!(none.is_empty());
    }

    #[tokio::test]
    async fn soft_deleted_records_are_invisible() {
        let store = MemoryStore::from_seed_json(SEED).unwrap();

        let mut bus = store.bus(&BusId::new("b1")).await.unwrap().unwrap();
        bus.deleted = true;
        store.put_bus(bus).await;

        assert!(store.bus(&BusId::new("b1")).await.unwrap().is_none());
        let on_route = store.buses_on_routes(&[RouteId::new("r1")]).await.unwrap();
        assert!(on_route.is_empty());
        assert_eq!(store.bus_count().await, 1);
    }

    #[tokio::test]
    async fn commit_booking_assigns_id_and_decrements() {
        let store = MemoryStore::from_seed_json(SEED).unwrap();

        let booking = store
            .commit_booking(new_booking("b1", &["A1", "A2"]))
            .await
            .unwrap();
        assert_eq!(booking.status, BookingStatus::Confirmed);
        assert_eq!(booking.seat_count(), 2);
        assert!(!booking.id.as_str().is_empty());

        let bus = store.bus(&BusId::new("b1")).await.unwrap().unwrap();
        assert_eq!(bus.seats_available, 33);
    }

    #[tokio::test]
    async fn commit_booking_refuses_counter_underflow() {
        let store = MemoryStore::from_seed_json(SEED).unwrap();

        let mut bus = store.bus(&BusId::new("b1")).await.unwrap().unwrap();
        bus.seats_available = 1;
        store.put_bus(bus).await;

        let result = store.commit_booking(new_booking("b1", &["A1", "A2"])).await;
        assert!(matches!(result, Err(StoreError::Corrupt { .. })));

        // Counter untouched by the failed commit.
        let bus = store.bus(&BusId::new("b1")).await.unwrap().unwrap();
        assert_eq!(bus.seats_available, 1);
    }

    #[tokio::test]
    async fn booked_seats_ignores_cancelled() {
        let store = MemoryStore::from_seed_json(SEED).unwrap();

        store
            .commit_booking(new_booking("b1", &["A1"]))
            .await
            .unwrap();
        let dropped = store
            .commit_booking(new_booking("b1", &["A2"]))
            .await
            .unwrap();
        store.commit_cancellation(&dropped.id).await.unwrap();

        let taken = store
            .booked_seats(&BusId::new("b1"), date())
            .await
            .unwrap();
        assert!(taken.contains(&seat("A1")));
        assert!(!taken.contains(&seat("A2")));
    }

    #[tokio::test]
    async fn cancellation_restores_counter_and_is_idempotent() {
        let store = MemoryStore::from_seed_json(SEED).unwrap();

        let booking = store
            .commit_booking(new_booking("b1", &["A1", "A2"]))
            .await
            .unwrap();
        let cancelled = store.commit_cancellation(&booking.id).await.unwrap();
        assert_eq!(cancelled.status, BookingStatus::Cancelled);

        let bus = store.bus(&BusId::new("b1")).await.unwrap().unwrap();
        assert_eq!(bus.seats_available, 35);

        // Second cancellation: no-op, counter unchanged.
        let again = store.commit_cancellation(&booking.id).await.unwrap();
        assert_eq!(again.status, BookingStatus::Cancelled);
        let bus = store.bus(&BusId::new("b1")).await.unwrap().unwrap();
        assert_eq!(bus.seats_available, 35);
    }

    #[tokio::test]
    async fn bookings_for_user_filters_by_owner() {
        let store = MemoryStore::from_seed_json(SEED).unwrap();

        store
            .commit_booking(new_booking("b1", &["A1"]))
            .await
            .unwrap();
        let mut other = new_booking("b1", &["A2"]);
        other.user_id = UserId::new("u2");
        store.commit_booking(other).await.unwrap();

        let mine = store.bookings_for_user(&UserId::new("u1")).await.unwrap();
        assert_eq!(mine.len(), 1);
        assert_eq!(mine[0].seats, vec![seat("A1")]);
    }
}
