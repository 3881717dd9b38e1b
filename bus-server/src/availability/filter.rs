//! Filter evaluation over availability results.
//!
//! Pure functions, used both by the search engine and by the web layer to
//! re-filter an already-fetched result set without another query. Matching
//! is OR within a checked set (buckets, bus types) and AND across
//! categories.

use std::fmt;

use chrono::Timelike;

use super::criteria::SearchCriteria;
use super::search::BusAvailability;

/// Error returned when parsing an unknown bucket or sort key.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown {kind}: {value}")]
pub struct InvalidFilterName {
    kind: &'static str,
    value: String,
}

/// Time-of-day bucket for departure and arrival filters.
///
/// # Examples
///
/// ```
/// use bus_server::availability::TimeBucket;
///
/// assert_eq!(TimeBucket::of_hour(5), TimeBucket::Before6am);
/// assert_eq!(TimeBucket::of_hour(6), TimeBucket::Morning);
/// assert_eq!(TimeBucket::of_hour(12), TimeBucket::Afternoon);
/// assert_eq!(TimeBucket::of_hour(18), TimeBucket::After6pm);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimeBucket {
    /// Midnight up to 06:00
    Before6am,
    /// 06:00 up to 12:00
    Morning,
    /// 12:00 up to 18:00
    Afternoon,
    /// 18:00 to midnight
    After6pm,
}

impl TimeBucket {
    /// Classify an hour (0-23) into its bucket.
    pub fn of_hour(hour: u32) -> TimeBucket {
        match hour {
            0..=5 => TimeBucket::Before6am,
            6..=11 => TimeBucket::Morning,
            12..=17 => TimeBucket::Afternoon,
            _ => TimeBucket::After6pm,
        }
    }

    /// Parse a bucket name as it appears in filter query strings.
    pub fn parse(s: &str) -> Result<Self, InvalidFilterName> {
        match s.trim().to_ascii_lowercase().as_str() {
            "before6am" => Ok(TimeBucket::Before6am),
            "morning" => Ok(TimeBucket::Morning),
            "afternoon" => Ok(TimeBucket::Afternoon),
            "after6pm" => Ok(TimeBucket::After6pm),
            _ => Err(InvalidFilterName {
                kind: "time bucket",
                value: s.to_string(),
            }),
        }
    }
}

impl fmt::Display for TimeBucket {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            TimeBucket::Before6am => "before6am",
            TimeBucket::Morning => "morning",
            TimeBucket::Afternoon => "afternoon",
            TimeBucket::After6pm => "after6pm",
        };
        f.write_str(name)
    }
}

/// Sort order for availability results.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortKey {
    Price,
    DepartureTime,
}

impl SortKey {
    /// Parse a sort key name as it appears in query strings.
    pub fn parse(s: &str) -> Result<Self, InvalidFilterName> {
        match s.trim().to_ascii_lowercase().as_str() {
            "price" => Ok(SortKey::Price),
            "departuretime" => Ok(SortKey::DepartureTime),
            _ => Err(InvalidFilterName {
                kind: "sort key",
                value: s.to_string(),
            }),
        }
    }
}

/// Whether an hour falls in any of the checked buckets.
///
/// An empty set imposes no constraint.
fn in_buckets(hour: u32, buckets: &[TimeBucket]) -> bool {
    buckets.is_empty() || buckets.contains(&TimeBucket::of_hour(hour))
}

/// Whether one availability entry satisfies all criteria.
pub fn matches(entry: &BusAvailability, criteria: &SearchCriteria) -> bool {
    let bus = &entry.bus;

    if !criteria.bus_types.is_empty()
        && !criteria
            .bus_types
            .iter()
            .any(|category| bus.bus_type.matches_category(*category))
    {
        return false;
    }
    if criteria
        .live_tracking
        .is_some_and(|wanted| bus.live_tracking != wanted)
    {
        return false;
    }
    if criteria.primo.is_some_and(|wanted| bus.primo != wanted) {
        return false;
    }
    if bus.seats_available < criteria.min_seats {
        return false;
    }
    if !in_buckets(entry.departure.hour(), &criteria.departure_buckets) {
        return false;
    }
    if !in_buckets(entry.arrival.hour(), &criteria.arrival_buckets) {
        return false;
    }

    true
}

/// Keep only the entries satisfying all criteria.
pub fn apply_criteria(
    entries: Vec<BusAvailability>,
    criteria: &SearchCriteria,
) -> Vec<BusAvailability> {
    entries
        .into_iter()
        .filter(|e| matches(e, criteria))
        .collect()
}

/// Sort results in ascending order by the given key.
///
/// The sort is stable: ties keep their original relative order.
pub fn sort_by(entries: &mut [BusAvailability], key: SortKey) {
    match key {
        SortKey::Price => entries.sort_by(|a, b| a.bus.price.total_cmp(&b.bus.price)),
        SortKey::DepartureTime => entries.sort_by(|a, b| a.departure.cmp(&b.departure)),
    }
}


#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        /// Every hour lands in exactly one bucket.
        #[test]
        fn buckets_partition_the_day(hour in 0u32..24) {
            let all = [
                TimeBucket::Before6am,
                TimeBucket::Morning,
                TimeBucket::Afternoon,
                TimeBucket::After6pm,
            ];
            let hits = all
                .iter()
                .filter(|b| TimeBucket::of_hour(hour) == **b)
                .count();
            prop_assert_eq!(hits, 1);
        }

        /// Bucket names roundtrip through parse.
        #[test]
        fn bucket_display_parse_roundtrip(hour in 0u32..24) {
            let bucket = TimeBucket::of_hour(hour);
            prop_assert_eq!(TimeBucket::parse(&bucket.to_string()).unwrap(), bucket);
        }
    }
}
