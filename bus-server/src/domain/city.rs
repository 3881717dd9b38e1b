//! City name type.

use std::fmt;

/// Error returned when parsing an invalid city name.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid city name: {reason}")]
pub struct InvalidCity {
    reason: &'static str,
}

/// A normalized city name.
///
/// Route endpoints are stored uppercase, and riders type city names with
/// arbitrary case and stray whitespace. Normalizing at construction makes
/// every downstream comparison exact: trimmed, uppercased, never empty.
///
/// # Examples
///
/// ```
/// use bus_server::domain::CityName;
///
/// let city = CityName::parse("  delhi ").unwrap();
/// assert_eq!(city.as_str(), "DELHI");
///
/// // Whitespace-only input is rejected
/// assert!(CityName::parse("   ").is_err());
/// ```
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct CityName(String);

impl CityName {
    /// Parse a city name, trimming surrounding whitespace and uppercasing.
    pub fn parse(s: &str) -> Result<Self, InvalidCity> {
        let trimmed = s.trim();
        if trimmed.is_empty() {
            return Err(InvalidCity {
                reason: "must not be empty",
            });
        }
        if trimmed.len() > 64 {
            return Err(InvalidCity {
                reason: "must be at most 64 characters",
            });
        }
        Ok(CityName(trimmed.to_uppercase()))
    }

    /// Returns the normalized name as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for CityName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "CityName({})", self.0)
    }
}

impl fmt::Display for CityName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}


#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        /// Parsing is idempotent: re-parsing the normalized form is a no-op.
        #[test]
        fn parse_idempotent(s in "[a-zA-Z ]{1,30}") {
            if let Ok(city) = CityName::parse(&s) {
                let again = CityName::parse(city.as_str()).unwrap();
                prop_assert_eq!(city, again);
            }
        }

        /// Case variants of the same name compare equal.
        #[test]
        fn case_insensitive(s in "[a-zA-Z]{1,30}") {
            let lower = CityName::parse(&s.to_lowercase()).unwrap();
            let upper = CityName::parse(&s.to_uppercase()).unwrap();
            prop_assert_eq!(lower, upper);
        }

        /// Whitespace-only strings never parse.
        #[test]
        fn whitespace_rejected(s in "[ \t]{0,10}") {
            prop_assert!(CityName::parse(&s).is_err());
        }
    }
}
