//! Data transfer objects for web requests and responses.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::availability::BusAvailability;
use crate::domain::{Booking, Bus, Route};
use crate::schedule;

/// Timestamp rendering for JSON payloads.
fn render_datetime(dt: NaiveDateTime) -> String {
    dt.format("%Y-%m-%dT%H:%M:%S").to_string()
}

/// Query parameters for the bus search endpoint.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchBusesParams {
    /// Departure city
    pub from_city: Option<String>,

    /// Destination city
    pub to_city: Option<String>,

    /// Travel date in YYYY-MM-DD format
    pub travel_date: Option<String>,

    /// Only buses with live tracking
    pub live_tracking: Option<bool>,

    /// Only primo buses
    pub primo: Option<bool>,

    /// Comma-separated bus type categories (e.g. "AC,Sleeper")
    pub bus_types: Option<String>,

    /// Minimum seats still available
    pub seats_available: Option<String>,

    /// Comma-separated departure time buckets (e.g. "morning,after6pm")
    pub departure_time: Option<String>,

    /// Comma-separated arrival time buckets
    pub arrival_time: Option<String>,

    /// Sort order: "price" or "departureTime"
    pub sort_by: Option<String>,
}

/// A route in search and booking responses.
#[derive(Debug, Serialize)]
pub struct RouteResult {
    pub id: String,
    pub source: String,
    pub destination: String,
    pub distance: u32,
    pub duration: u32,
}

impl RouteResult {
    pub fn from_route(route: &Route) -> Self {
        Self {
            id: route.id.to_string(),
            source: route.source.to_string(),
            destination: route.destination.to_string(),
            distance: route.distance_km,
            duration: route.duration_mins,
        }
    }
}

/// A bus in search results, with concrete times for the travel date.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BusResult {
    pub id: String,
    pub bus_number: String,
    pub operator: String,
    #[serde(rename = "type")]
    pub bus_type: String,
    pub capacity: u32,
    pub seats_available: u32,
    pub price: f64,
    pub live_tracking: bool,
    pub primo: bool,
    pub departure_time: String,
    pub arrival_time: String,
    pub route: RouteResult,
}

impl BusResult {
    pub fn from_availability(entry: &BusAvailability) -> Self {
        let bus = &entry.bus;
        Self {
            id: bus.id.to_string(),
            bus_number: bus.bus_number.clone(),
            operator: bus.operator.clone(),
            bus_type: bus.bus_type.as_str().to_string(),
            capacity: bus.capacity,
            seats_available: bus.seats_available,
            price: bus.price,
            live_tracking: bus.live_tracking,
            primo: bus.primo,
            departure_time: render_datetime(entry.departure),
            arrival_time: render_datetime(entry.arrival),
            route: RouteResult::from_route(&entry.route),
        }
    }
}

/// Response for the bus search endpoint.
#[derive(Debug, Serialize)]
pub struct SearchBusesResponse {
    pub buses: Vec<BusResult>,
}

/// Request body for creating a booking.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateBookingRequest {
    pub bus_id: String,

    /// Seat labels, e.g. ["A1", "A2"]
    pub seat_numbers: Vec<String>,

    /// Journey date in YYYY-MM-DD format
    pub journey_date: String,

    pub total_amount: f64,
}

/// A booking in API responses, with the journey's projected times.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BookingResult {
    pub id: String,
    pub user_id: String,
    pub bus_id: String,
    pub seat_numbers: Vec<String>,
    pub journey_date: String,
    pub booked_at: String,
    pub status: String,
    pub total_amount: f64,
    pub payment_id: Option<String>,
    /// Concrete departure for the journey date
    pub departure_time: String,
    /// Concrete arrival, on the next day for overnight trips
    pub arrival_time: String,
    pub route: RouteResult,
}

impl BookingResult {
    /// Render a booking with times projected from its bus's template.
    ///
    /// Uses the same projection as search results, so an overnight journey
    /// shows the same next-day arrival in both places.
    pub fn from_parts(booking: &Booking, bus: &Bus, route: &Route) -> Self {
        let projection = schedule::project(bus.departure, bus.arrival, booking.journey_date);
        Self {
            id: booking.id.to_string(),
            user_id: booking.user_id.to_string(),
            bus_id: booking.bus_id.to_string(),
            seat_numbers: booking.seats.iter().map(|s| s.to_string()).collect(),
            journey_date: booking.journey_date.format("%Y-%m-%d").to_string(),
            booked_at: render_datetime(booking.booked_at),
            status: booking.status.to_string(),
            total_amount: booking.total_amount,
            payment_id: booking.payment_ref.clone(),
            departure_time: render_datetime(projection.departure),
            arrival_time: render_datetime(projection.arrival),
            route: RouteResult::from_route(route),
        }
    }
}

/// Response wrapping a single booking.
#[derive(Debug, Serialize)]
pub struct BookingResponse {
    pub booking: BookingResult,
}

/// Response for the my-trips endpoint.
#[derive(Debug, Serialize)]
pub struct MyTripsResponse {
    pub bookings: Vec<BookingResult>,
}

/// Error payload.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub message: String,
}
