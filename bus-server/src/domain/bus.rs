//! Bus catalog entry and bus type matching.

use std::fmt;

use super::id::{BusId, RouteId};
use super::time::TimeOfDay;

/// Error returned when parsing an unknown bus type.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown bus type: {value}")]
pub struct InvalidBusType {
    value: String,
}

/// Bus type as advertised by the operator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BusType {
    Seater,
    Sleeper,
    Ac,
    NonAc,
}

impl BusType {
    /// Canonical operator-facing name.
    pub fn as_str(&self) -> &'static str {
        match self {
            BusType::Seater => "Seater",
            BusType::Sleeper => "Sleeper",
            BusType::Ac => "AC",
            BusType::NonAc => "NonAC",
        }
    }

    /// Parse a bus type name, case-insensitively.
    pub fn parse(s: &str) -> Result<Self, InvalidBusType> {
        match s.trim().to_ascii_lowercase().as_str() {
            "seater" => Ok(BusType::Seater),
            "sleeper" => Ok(BusType::Sleeper),
            "ac" => Ok(BusType::Ac),
            "nonac" => Ok(BusType::NonAc),
            _ => Err(InvalidBusType {
                value: s.to_string(),
            }),
        }
    }

    /// Whether this type falls under a filter category.
    ///
    /// Matching is substring-based on the canonical name, case-insensitive.
    /// This is a deliberate fuzzy-match policy to accommodate operator-defined
    /// type strings, and it has two quirks that are preserved on purpose:
    /// "NonAC" contains "AC", so NonAC buses match the AC category; and any
    /// type lacking "AC" (Seater, Sleeper) matches the NonAC category.
    ///
    /// # Examples
    ///
    /// ```
    /// use bus_server::domain::BusType;
    ///
    /// assert!(BusType::Ac.matches_category(BusType::Ac));
    /// assert!(BusType::NonAc.matches_category(BusType::Ac));
    /// assert!(BusType::Sleeper.matches_category(BusType::NonAc));
    /// assert!(!BusType::Ac.matches_category(BusType::NonAc));
    /// ```
    pub fn matches_category(&self, category: BusType) -> bool {
        let name = self.as_str().to_ascii_lowercase();
        match category {
            BusType::Seater => name.contains("seater"),
            BusType::Sleeper => name.contains("sleeper"),
            BusType::Ac => name.contains("ac"),
            BusType::NonAc => name.contains("nonac") || !name.contains("ac"),
        }
    }
}

impl fmt::Display for BusType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A bus operating a route on a recurring daily schedule.
///
/// `seats_available` is a live counter, 0 ≤ `seats_available` ≤ `capacity`,
/// mutated only by the booking ledger. The departure and arrival fields are
/// schedule templates; they gain a calendar date only through projection.
#[derive(Debug, Clone)]
pub struct Bus {
    pub id: BusId,
    /// Operator fleet number, unique across the catalog.
    pub bus_number: String,
    pub operator: String,
    pub bus_type: BusType,
    pub capacity: u32,
    pub seats_available: u32,
    pub price: f64,
    pub live_tracking: bool,
    pub primo: bool,
    pub route_id: RouteId,
    pub departure: TimeOfDay,
    pub arrival: TimeOfDay,
    /// Soft-delete marker; deleted buses are invisible to queries.
    pub deleted: bool,
}
