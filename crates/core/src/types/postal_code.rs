//! Indian postal index number (PIN code).

use core::fmt;

use serde::{Deserialize, Serialize};

/// Errors that can occur when parsing a [`PostalCode`].
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum PostalCodeError {
    /// The input does not have exactly six characters.
    #[error("postal code must be exactly 6 digits")]
    WrongLength,
    /// The input contains something other than ASCII digits.
    #[error("postal code must contain only digits")]
    NotNumeric,
    /// The first digit is zero.
    #[error("postal code cannot start with 0")]
    LeadingZero,
}

/// A six-digit postal code matching `^[1-9][0-9]{5}$`.
///
/// The input is taken as-is: no trimming, no separators.
///
/// ```
/// use aurelle_core::PostalCode;
///
/// assert!(PostalCode::parse("400001").is_ok());
/// assert!(PostalCode::parse("000001").is_err());
/// assert!(PostalCode::parse("12345").is_err());
/// assert!(PostalCode::parse("1234567").is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct PostalCode(String);

impl PostalCode {
    /// Number of digits in a postal code.
    pub const LENGTH: usize = 6;

    /// Parse a postal code.
    ///
    /// # Errors
    ///
    /// Returns a [`PostalCodeError`] if the input is not six ASCII digits or
    /// starts with `0`.
    pub fn parse(s: &str) -> Result<Self, PostalCodeError> {
        if !s.bytes().all(|b| b.is_ascii_digit()) {
            return Err(PostalCodeError::NotNumeric);
        }
        if s.len() != Self::LENGTH {
            return Err(PostalCodeError::WrongLength);
        }
        if s.starts_with('0') {
            return Err(PostalCodeError::LeadingZero);
        }
        Ok(Self(s.to_owned()))
    }

    /// Returns `true` if `s` is a valid postal code.
    #[must_use]
    pub fn is_valid(s: &str) -> bool {
        Self::parse(s).is_ok()
    }

    /// Returns the postal code as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PostalCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<String> for PostalCode {
    type Error = PostalCodeError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<PostalCode> for String {
    fn from(code: PostalCode) -> Self {
        code.0
    }
}
