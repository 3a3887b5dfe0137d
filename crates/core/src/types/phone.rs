//! Indian mobile number type.

use core::fmt;

use serde::{Deserialize, Serialize};

/// Errors that can occur when parsing a [`PhoneNumber`].
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum PhoneError {
    /// The input string is empty.
    #[error("phone number cannot be empty")]
    Empty,
    /// The input contains something other than ASCII digits.
    #[error("phone number must contain only digits")]
    NonDigit,
    /// The input is not exactly ten digits long.
    #[error("phone number must be exactly {expected} digits (got {actual})")]
    WrongLength {
        /// Required number of digits.
        expected: usize,
        /// Number of digits supplied.
        actual: usize,
    },
    /// The leading digit is not a mobile prefix.
    #[error("phone number must start with 6, 7, 8 or 9")]
    InvalidPrefix,
}

/// A 10-digit local mobile number (WhatsApp contact).
///
/// ## Constraints
///
/// - Exactly 10 ASCII digits, no separators or country code
/// - First digit is 6-9
///
/// ```
/// use mithai_core::PhoneNumber;
///
/// assert!(PhoneNumber::parse("9876543210").is_ok());
/// assert!(PhoneNumber::parse("1234567890").is_err());
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(transparent)]
pub struct PhoneNumber(String);

impl PhoneNumber {
    /// Number of digits in a local mobile number.
    pub const DIGITS: usize = 10;

    /// Parse a `PhoneNumber` from a string.
    ///
    /// # Errors
    ///
    /// Returns an error if the input is empty, contains non-digits, is not
    /// ten digits long, or does not start with 6-9.
    pub fn parse(s: &str) -> Result<Self, PhoneError> {
        if s.is_empty() {
            return Err(PhoneError::Empty);
        }

        if !s.bytes().all(|b| b.is_ascii_digit()) {
            return Err(PhoneError::NonDigit);
        }

        if s.len() != Self::DIGITS {
            return Err(PhoneError::WrongLength {
                expected: Self::DIGITS,
                actual: s.len(),
            });
        }

        if !matches!(s.as_bytes().first(), Some(b'6'..=b'9')) {
            return Err(PhoneError::InvalidPrefix);
        }

        Ok(Self(s.to_owned()))
    }

    /// Returns the number as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PhoneNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl std::str::FromStr for PhoneNumber {
    type Err = PhoneError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_valid_numbers() {
        for number in ["6000000000", "7123456789", "8888888888", "9876543210"] {
            assert!(PhoneNumber::parse(number).is_ok(), "{number} should parse");
        }
    }

    #[test]
    fn test_parse_empty() {
        assert_eq!(PhoneNumber::parse(""), Err(PhoneError::Empty));
    }

    #[test]
    fn test_parse_non_digit() {
        assert_eq!(PhoneNumber::parse("98765-4321"), Err(PhoneError::NonDigit));
        assert_eq!(PhoneNumber::parse("+919876543"), Err(PhoneError::NonDigit));
    }

    #[test]
    fn test_parse_wrong_length() {
        assert_eq!(
            PhoneNumber::parse("987654321"),
            Err(PhoneError::WrongLength {
                expected: 10,
                actual: 9
            })
        );
        assert!(PhoneNumber::parse("98765432100").is_err());
    }

    #[test]
    fn test_parse_invalid_prefix() {
        assert_eq!(
            PhoneNumber::parse("5876543210"),
            Err(PhoneError::InvalidPrefix)
        );
    }

    #[test]
    fn test_display() {
        let phone = PhoneNumber::parse("9876543210").unwrap();
        assert_eq!(phone.to_string(), "9876543210");
    }
}
