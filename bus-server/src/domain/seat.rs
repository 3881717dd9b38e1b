//! Seat label type.

use std::fmt;

/// Error returned when parsing an invalid seat label.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid seat label: {reason}")]
pub struct InvalidSeatLabel {
    reason: &'static str,
}

/// A seat label on a bus, such as "A1" or "B12".
///
/// Labels are short ASCII alphanumeric strings, normalized to uppercase so
/// that "a1" and "A1" always refer to the same physical seat.
///
/// # Examples
///
/// ```
/// use bus_server::domain::SeatLabel;
///
/// let seat = SeatLabel::parse("a1").unwrap();
/// assert_eq!(seat.as_str(), "A1");
///
/// assert!(SeatLabel::parse("").is_err());
/// assert!(SeatLabel::parse("A-1").is_err());
/// ```
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SeatLabel(String);

/// Longest accepted seat label.
const MAX_LABEL_LEN: usize = 8;

impl SeatLabel {
    /// Parse a seat label.
    ///
    /// The input must be 1 to 8 ASCII alphanumeric characters; lowercase
    /// letters are uppercased.
    pub fn parse(s: &str) -> Result<Self, InvalidSeatLabel> {
        if s.is_empty() {
            return Err(InvalidSeatLabel {
                reason: "must not be empty",
            });
        }
        if s.len() > MAX_LABEL_LEN {
            return Err(InvalidSeatLabel {
                reason: "must be at most 8 characters",
            });
        }
        if !s.bytes().all(|b| b.is_ascii_alphanumeric()) {
            return Err(InvalidSeatLabel {
                reason: "must be ASCII letters and digits only",
            });
        }
        Ok(SeatLabel(s.to_ascii_uppercase()))
    }

    /// Returns the label as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for SeatLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "SeatLabel({})", self.0)
    }
}

impl fmt::Display for SeatLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_valid_labels() {
        assert!(SeatLabel::parse("A1").is_ok());
        assert!(SeatLabel::parse("B12").is_ok());
        assert!(SeatLabel::parse("42").is_ok());
        assert!(SeatLabel::parse("UPPER1").is_ok());
    }

    #[test]
    fn parse_uppercases() {
        assert_eq!(SeatLabel::parse("a1").unwrap().as_str(), "A1");
        assert_eq!(SeatLabel::parse("b12").unwrap().as_str(), "B12");
    }

    #[test]
    fn reject_empty() {
        assert!(SeatLabel::parse("").is_err());
    }

    #[test]
    fn reject_overlong() {
        assert!(SeatLabel::parse("A12345678").is_err());
        assert!(SeatLabel::parse("A1234567").is_ok());
    }

    #[test]
    fn reject_non_alphanumeric() {
        assert!(SeatLabel::parse("A-1").is_err());
        assert!(SeatLabel::parse("A 1").is_err());
        assert!(SeatLabel::parse("A.1").is_err());
        assert!(SeatLabel::parse("Ä1").is_err());
    }

    #[test]
    fn case_variants_are_same_seat() {
        assert_eq!(
            SeatLabel::parse("a1").unwrap(),
            SeatLabel::parse("A1").unwrap()
        );
    }
}

#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        /// Any short alphanumeric string parses.
        #[test]
        fn valid_always_parses(s in "[a-zA-Z0-9]{1,8}") {
            prop_assert!(SeatLabel::parse(&s).is_ok());
        }

        /// Parse then as_str yields the uppercased input.
        #[test]
        fn parse_uppercases(s in "[a-zA-Z0-9]{1,8}") {
            let seat = SeatLabel::parse(&s).unwrap();
            prop_assert_eq!(seat.as_str(), s.to_ascii_uppercase());
        }

        /// Overlong labels are rejected.
        #[test]
        fn overlong_rejected(s in "[A-Z0-9]{9,20}") {
            prop_assert!(SeatLabel::parse(&s).is_err());
        }
    }
}
