//! Schedule projection.
//!
//! A bus's stored schedule is a time-of-day template that repeats every day.
//! Projection binds that template to a concrete travel date, producing real
//! departure and arrival timestamps. Overnight trips are detected from the
//! template alone: an arrival at or before the departure means the trip
//! crosses midnight, so the arrival lands on the next calendar day.
//!
//! The travel date always anchors the *departure* day. Search results and
//! post-booking display both go through [`project`], so the rollover rule
//! cannot drift between the two paths.

use chrono::{Duration, NaiveDate, NaiveDateTime};

use crate::domain::TimeOfDay;

/// Concrete departure and arrival timestamps for one journey.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Projection {
    pub departure: NaiveDateTime,
    pub arrival: NaiveDateTime,
}

impl Projection {
    /// Whether this journey's departure is already in the past at `now`.
    ///
    /// Used to drop same-day buses that have already left. For future travel
    /// dates the departure is ahead of `now`, so nothing is dropped.
    pub fn departed_by(&self, now: NaiveDateTime) -> bool {
        self.departure <= now
    }
}

/// Project a schedule template onto a travel date.
///
/// Both template times are anchored on `travel_date`; if that puts the
/// arrival at or before the departure, the arrival is moved 24 hours later.
///
/// # Examples
///
/// ```
/// use bus_server::domain::TimeOfDay;
/// use bus_server::schedule::project;
/// use chrono::NaiveDate;
///
/// let date = NaiveDate::from_ymd_opt(2025, 6, 1).unwrap();
///
/// // Daytime trip: same-day arrival.
/// let p = project(
///     TimeOfDay::parse_hhmm("08:00").unwrap(),
///     TimeOfDay::parse_hhmm("12:00").unwrap(),
///     date,
/// );
/// assert_eq!(p.arrival.date(), date);
///
/// // Overnight trip: arrival rolls to the next day.
/// let p = project(
///     TimeOfDay::parse_hhmm("22:00").unwrap(),
///     TimeOfDay::parse_hhmm("02:00").unwrap(),
///     date,
/// );
/// assert_eq!(p.arrival.date(), date.succ_opt().unwrap());
/// ```
pub fn project(departure: TimeOfDay, arrival: TimeOfDay, travel_date: NaiveDate) -> Projection {
    let dep = departure.on_date(travel_date);
    let mut arr = arrival.on_date(travel_date);
    if arr <= dep {
        arr += Duration::days(1);
    }
    Projection {
        departure: dep,
        arrival: arr,
    }
}


#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    prop_compose! {
        fn valid_tod()(hour in 0u32..24, minute in 0u32..60) -> TimeOfDay {
            TimeOfDay::from_hm(hour, minute).unwrap()
        }
    }

    prop_compose! {
        fn valid_date()(
            year in 2000i32..2100,
            month in 1u32..=12,
            day in 1u32..=28
        ) -> NaiveDate {
            NaiveDate::from_ymd_opt(year, month, day).unwrap()
        }
    }

    proptest! {
        /// Arrival is always strictly after departure.
        #[test]
        fn arrival_after_departure(dep in valid_tod(), arr in valid_tod(), d in valid_date()) {
            let p = project(dep, arr, d);
            prop_assert!(p.arrival > p.departure);
        }

        /// Journey time never exceeds 24 hours.
        #[test]
        fn duration_at_most_one_day(dep in valid_tod(), arr in valid_tod(), d in valid_date()) {
            let p = project(dep, arr, d);
            prop_assert!(p.arrival - p.departure <= Duration::days(1));
        }

        /// The departure is always anchored on the travel date.
        #[test]
        fn departure_on_travel_date(dep in valid_tod(), arr in valid_tod(), d in valid_date()) {
            let p = project(dep, arr, d);
            prop_assert_eq!(p.departure.date(), d);
        }

        /// The arrival lands on the travel date or the day after, nothing else.
        #[test]
        fn arrival_within_one_day(dep in valid_tod(), arr in valid_tod(), d in valid_date()) {
            let p = project(dep, arr, d);
            let next = d.succ_opt().unwrap();
            prop_assert!(p.arrival.date() == d || p.arrival.date() == next);
        }

        /// Rollover happens exactly when the template arrival is not after
        /// the template departure.
        #[test]
        fn rollover_iff_template_wraps(dep in valid_tod(), arr in valid_tod(), d in valid_date()) {
            let p = project(dep, arr, d);
            let rolled = p.arrival.date() != d;
            prop_assert_eq!(rolled, arr <= dep);
        }
    }
}
