//! Phone number type.
//!
//! Deliveries are coordinated over WhatsApp with Azerbaijani numbers, so the
//! only structural rule is the `+994` country code prefix.

use core::fmt;

use serde::{Deserialize, Serialize};

/// Errors that can occur when parsing a [`PhoneNumber`].
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum PhoneError {
    /// The input is empty after trimming.
    #[error("phone number cannot be empty")]
    Empty,
    /// The input does not start with the country code.
    #[error("phone number must start with {prefix}")]
    MissingCountryCode {
        /// The required prefix.
        prefix: &'static str,
    },
}

/// A phone number carrying the `+994` country code.
///
/// ```
/// use perfume_shop_core::PhoneNumber;
///
/// assert!(PhoneNumber::parse("+994501234567").is_ok());
/// assert!(PhoneNumber::parse("0501234567").is_err());
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(transparent)]
pub struct PhoneNumber(String);

impl PhoneNumber {
    /// Required country code prefix.
    pub const COUNTRY_CODE: &'static str = "+994";

    /// Parse a phone number, trimming surrounding whitespace.
    ///
    /// # Errors
    ///
    /// Returns an error if the trimmed input is empty or lacks the `+994` prefix.
    pub fn parse(s: &str) -> Result<Self, PhoneError> {
        let trimmed = s.trim();
        if trimmed.is_empty() {
            return Err(PhoneError::Empty);
        }
        if !trimmed.starts_with(Self::COUNTRY_CODE) {
            return Err(PhoneError::MissingCountryCode {
                prefix: Self::COUNTRY_CODE,
            });
        }
        Ok(Self(trimmed.to_owned()))
    }

    /// Returns the phone number as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Consumes the `PhoneNumber` and returns its inner string.
    #[must_use]
    pub fn into_inner(self) -> String {
        self.0
    }
}

impl fmt::Display for PhoneNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_trims() {
        let phone = PhoneNumber::parse("  +994501234567 ").unwrap();
        assert_eq!(phone.as_str(), "+994501234567");
    }

    #[test]
    fn test_parse_empty() {
        assert_eq!(PhoneNumber::parse("   "), Err(PhoneError::Empty));
    }

    #[test]
    fn test_parse_requires_country_code() {
        assert!(matches!(
            PhoneNumber::parse("+1 555 0100"),
            Err(PhoneError::MissingCountryCode { prefix: "+994" })
        ));
    }
}
