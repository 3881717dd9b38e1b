//! HTTP route handlers.

use axum::body::Bytes;
use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::{HeaderMap, StatusCode},
    response::IntoResponse,
    routing::{get, post},
};
use chrono::{NaiveDate, Utc};
use tracing::{error, warn};

use crate::availability::{SearchCriteria, SearchError, SortKey, TimeBucket, sort_by};
use crate::catalog::CatalogError;
use crate::domain::{Booking, BookingId, BusId, BusType, SeatLabel, UserId};
use crate::ledger::{BookingRequest, LedgerError};
use crate::store::{Store, StoreError, with_read_retries};

use super::dto::*;
use super::state::AppState;

/// Create the application router.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/buses", get(search_buses))
        .route("/bookings", post(create_booking))
        .route("/bookings/my-trips", get(my_trips))
        .route("/bookings/:id/cancel", post(cancel_booking))
        .with_state(state)
}

/// Health check endpoint.
async fn health() -> &'static str {
    "ok"
}

/// Search for bookable buses between two cities on a date.
async fn search_buses(
    State(state): State<AppState>,
    Query(params): Query<SearchBusesParams>,
) -> Result<Json<SearchBusesResponse>, AppError> {
    let (Some(from), Some(to), Some(date_str)) = (
        params.from_city.as_deref(),
        params.to_city.as_deref(),
        params.travel_date.as_deref(),
    ) else {
        return Err(AppError::BadRequest {
            message: "From city, to city, and travel date are required".to_string(),
        });
    };

    let travel_date =
        NaiveDate::parse_from_str(date_str, "%Y-%m-%d").map_err(|_| AppError::BadRequest {
            message: "Invalid travel date format".to_string(),
        })?;

    let criteria = build_criteria(&params)?;
    let sort_key = params
        .sort_by
        .as_deref()
        .map(SortKey::parse)
        .transpose()
        .map_err(|e| AppError::BadRequest {
            message: e.to_string(),
        })?;

    let route_ids = state.catalog.find_routes(from, to).await?;
    if route_ids.is_empty() {
        return Err(AppError::NotFound {
            message: format!("No routes found from {from} to {to}"),
        });
    }

    let now = Utc::now().naive_utc();
    let mut found = state
        .availability
        .search(&route_ids, travel_date, &criteria, now)
        .await?;
    if found.is_empty() {
        return Err(AppError::NotFound {
            message: "No buses available for the selected criteria".to_string(),
        });
    }

    if let Some(key) = sort_key {
        sort_by(&mut found, key);
    }

    Ok(Json(SearchBusesResponse {
        buses: found.iter().map(BusResult::from_availability).collect(),
    }))
}

/// Build search criteria from query parameters.
///
/// `liveTracking`/`primo` only constrain when true, matching how the search
/// form sends them: an unchecked box means "no preference", not "off".
fn build_criteria(params: &SearchBusesParams) -> Result<SearchCriteria, AppError> {
    let mut criteria = SearchCriteria::default();

    if params.live_tracking == Some(true) {
        criteria.live_tracking = Some(true);
    }
    if params.primo == Some(true) {
        criteria.primo = Some(true);
    }

    if let Some(types) = params.bus_types.as_deref() {
        criteria.bus_types = parse_list(types, |s| {
            BusType::parse(s).map_err(|e| AppError::BadRequest {
                message: e.to_string(),
            })
        })?;
    }

    if let Some(raw) = params.seats_available.as_deref() {
        let seats: u32 = raw.trim().parse().unwrap_or(0);
        if seats < 1 {
            return Err(AppError::BadRequest {
                message: "Seats available must be a positive number".to_string(),
            });
        }
        criteria.min_seats = seats;
    }

    if let Some(buckets) = params.departure_time.as_deref() {
        criteria.departure_buckets = parse_list(buckets, |s| {
            TimeBucket::parse(s).map_err(|e| AppError::BadRequest {
                message: e.to_string(),
            })
        })?;
    }
    if let Some(buckets) = params.arrival_time.as_deref() {
        criteria.arrival_buckets = parse_list(buckets, |s| {
            TimeBucket::parse(s).map_err(|e| AppError::BadRequest {
                message: e.to_string(),
            })
        })?;
    }

    Ok(criteria)
}

/// Parse a comma-separated list, ignoring empty segments.
fn parse_list<T>(
    raw: &str,
    parse: impl Fn(&str) -> Result<T, AppError>,
) -> Result<Vec<T>, AppError> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(parse)
        .collect()
}

/// The caller's identity, from the authentication collaborator.
fn require_user(headers: &HeaderMap) -> Result<UserId, AppError> {
    headers
        .get("x-user-id")
        .and_then(|v| v.to_str().ok())
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(UserId::new)
        .ok_or_else(|| AppError::Unauthorized {
            message: "Missing x-user-id header".to_string(),
        })
}

/// Create a booking.
async fn create_booking(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<impl IntoResponse, AppError> {
    let user = require_user(&headers)?;

    // Parse JSON manually so we can log the body on failure
    let req: CreateBookingRequest = serde_json::from_slice(&body).map_err(|e| {
        warn!(body = %String::from_utf8_lossy(&body), "booking body failed to parse: {e}");
        AppError::BadRequest {
            message: format!("Invalid JSON: {e}"),
        }
    })?;

    let journey_date =
        NaiveDate::parse_from_str(&req.journey_date, "%Y-%m-%d").map_err(|_| {
            AppError::BadRequest {
                message: "Invalid journey date".to_string(),
            }
        })?;

    let seats = req
        .seat_numbers
        .iter()
        .map(|s| SeatLabel::parse(s))
        .collect::<Result<Vec<_>, _>>()
        .map_err(|e| AppError::BadRequest {
            message: e.to_string(),
        })?;

    let booking = state
        .ledger
        .book(BookingRequest {
            bus_id: BusId::new(req.bus_id),
            journey_date,
            seats,
            user_id: user,
            total_amount: req.total_amount,
        })
        .await?;

    // Seat counts embedded in cached search results just changed.
    state.availability.invalidate_all();

    let view = booking_view(&state, &booking).await?;
    Ok((StatusCode::CREATED, Json(BookingResponse { booking: view })))
}

/// Cancel a booking, releasing its seats. Idempotent.
async fn cancel_booking(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<BookingResponse>, AppError> {
    let booking = state.ledger.cancel(&BookingId::new(id)).await?;
    state.availability.invalidate_all();

    let view = booking_view(&state, &booking).await?;
    Ok(Json(BookingResponse { booking: view }))
}

/// List the caller's bookings, most recent journey first.
async fn my_trips(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Json<MyTripsResponse>, AppError> {
    let user = require_user(&headers)?;
    let bookings = state.ledger.bookings_for(&user).await?;

    let mut views = Vec::with_capacity(bookings.len());
    for booking in &bookings {
        match booking_view(&state, booking).await {
            Ok(view) => views.push(view),
            Err(_) => {
                warn!(booking = %booking.id, "skipping booking with missing catalog data");
            }
        }
    }

    Ok(Json(MyTripsResponse { bookings: views }))
}

/// Render a booking with its bus's projected times and route.
async fn booking_view(state: &AppState, booking: &Booking) -> Result<BookingResult, AppError> {
    let bus = with_read_retries(|| state.store.bus(&booking.bus_id))
        .await?
        .ok_or_else(|| AppError::Internal {
            message: format!("bus {} missing for booking {}", booking.bus_id, booking.id),
        })?;
    let route = with_read_retries(|| state.store.route(&booking.route_id))
        .await?
        .ok_or_else(|| AppError::Internal {
            message: format!(
                "route {} missing for booking {}",
                booking.route_id, booking.id
            ),
        })?;

    Ok(BookingResult::from_parts(booking, &bus, &route))
}

/// Application error type.
#[derive(Debug)]
pub enum AppError {
    BadRequest { message: String },
    Unauthorized { message: String },
    NotFound { message: String },
    Conflict { message: String },
    Internal { message: String },
}

impl From<CatalogError> for AppError {
    fn from(e: CatalogError) -> Self {
        match e {
            CatalogError::InvalidCity(err) => AppError::BadRequest {
                message: err.to_string(),
            },
            CatalogError::Store(err) => err.into(),
        }
    }
}

impl From<SearchError> for AppError {
    fn from(e: SearchError) -> Self {
        match e {
            SearchError::InvalidQuery { .. } => AppError::BadRequest {
                message: "Travel date cannot be in the past".to_string(),
            },
            SearchError::Store(err) => err.into(),
        }
    }
}

impl From<LedgerError> for AppError {
    fn from(e: LedgerError) -> Self {
        match e {
            LedgerError::BusNotFound => AppError::NotFound {
                message: "Bus not found".to_string(),
            },
            LedgerError::BookingNotFound => AppError::NotFound {
                message: "Booking not found".to_string(),
            },
            LedgerError::SeatsUnavailable { reason } => AppError::Conflict { message: reason },
            LedgerError::InvalidRequest { reason } => AppError::BadRequest { message: reason },
            LedgerError::Store(err) => err.into(),
        }
    }
}

impl From<StoreError> for AppError {
    fn from(e: StoreError) -> Self {
        AppError::Internal {
            message: e.to_string(),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> axum::response::Response {
        let (status, message) = match self {
            AppError::BadRequest { message } => (StatusCode::BAD_REQUEST, message),
            AppError::Unauthorized { message } => (StatusCode::UNAUTHORIZED, message),
            AppError::NotFound { message } => (StatusCode::NOT_FOUND, message),
            AppError::Conflict { message } => (StatusCode::CONFLICT, message),
            AppError::Internal { message } => (StatusCode::INTERNAL_SERVER_ERROR, message),
        };

        if status.is_server_error() {
            error!(%status, %message, "request failed");
        } else {
            warn!(%status, %message, "request rejected");
        }

        let body = Json(ErrorResponse { message });
        (status, body).into_response()
    }
}
