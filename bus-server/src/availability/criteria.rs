//! Search criteria.

use crate::domain::BusType;

use super::filter::TimeBucket;

/// Rider-supplied filter criteria for an availability search.
///
/// Criteria are conjunctive: a bus must satisfy every populated field. An
/// empty set or `None` imposes no constraint for that category; within the
/// bus-type and time-bucket sets, matching any member is enough.
#[derive(Debug, Clone)]
pub struct SearchCriteria {
    /// Bus type categories, fuzzy-matched (see [`BusType::matches_category`]).
    pub bus_types: Vec<BusType>,

    /// Require live tracking to be exactly this value.
    pub live_tracking: Option<bool>,

    /// Require primo status to be exactly this value.
    pub primo: Option<bool>,

    /// Minimum seats still available.
    pub min_seats: u32,

    /// Projected departure must fall in one of these buckets.
    pub departure_buckets: Vec<TimeBucket>,

    /// Projected arrival must fall in one of these buckets.
    pub arrival_buckets: Vec<TimeBucket>,
}

impl Default for SearchCriteria {
    fn default() -> Self {
        Self {
            bus_types: Vec::new(),
            live_tracking: None,
            primo: None,
            min_seats: 1,
            departure_buckets: Vec::new(),
            arrival_buckets: Vec::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_requires_one_seat_and_nothing_else() {
        let criteria = SearchCriteria::default();
        assert_eq!(criteria.min_seats, 1);
        assert!(criteria.bus_types.is_empty());
        assert!(criteria.live_tracking.is_none());
        assert!(criteria.primo.is_none());
        assert!(criteria.departure_buckets.is_empty());
        assert!(criteria.arrival_buckets.is_empty());
    }
}
