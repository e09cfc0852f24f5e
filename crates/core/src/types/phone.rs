//! Phone number type.

use core::fmt;

use serde::{Deserialize, Serialize};

/// Errors that can occur when parsing a [`Phone`].
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum PhoneError {
    /// The input string is empty or only whitespace.
    #[error("phone number cannot be empty")]
    Empty,
    /// The input contains a character other than digits, spaces, hyphens or parentheses.
    #[error("phone number cannot contain '{0}'")]
    InvalidCharacter(char),
    /// Fewer characters than required after the optional leading `+`.
    #[error("phone number must have at least {min} characters")]
    TooShort {
        /// Minimum number of characters after the optional `+`.
        min: usize,
    },
}

/// A loosely formatted phone number, e.g. `+1 (555) 123-4567`.
///
/// An optional leading `+` followed by at least ten characters drawn from
/// digits, whitespace, `-`, `(` and `)`. The original formatting is kept.
///
/// ```
/// use shoe_store_core::Phone;
///
/// assert!(Phone::parse("+1 (555) 123-4567").is_ok());
/// assert!(Phone::parse("5551234567").is_ok());
/// assert!(Phone::parse("555-1234").is_err());
/// assert!(Phone::parse("555.123.4567").is_err());
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(transparent)]
pub struct Phone(String);

impl Phone {
    /// Minimum number of characters after the optional `+`.
    pub const MIN_LENGTH: usize = 10;

    /// Parse a `Phone` from a string.
    ///
    /// # Errors
    ///
    /// Returns an error if the input is blank, contains a disallowed
    /// character, or is shorter than [`Phone::MIN_LENGTH`].
    pub fn parse(s: &str) -> Result<Self, PhoneError> {
        if s.trim().is_empty() {
            return Err(PhoneError::Empty);
        }

        let body = s.strip_prefix('+').unwrap_or(s);

        if let Some(bad) = body.chars().find(|c| !is_phone_char(*c)) {
            return Err(PhoneError::InvalidCharacter(bad));
        }

        if body.chars().count() < Self::MIN_LENGTH {
            return Err(PhoneError::TooShort {
                min: Self::MIN_LENGTH,
            });
        }

        Ok(Self(s.to_owned()))
    }

    /// Returns the phone number as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Returns only the digits of the phone number.
    #[must_use]
    pub fn digits(&self) -> String {
        self.0.chars().filter(char::is_ascii_digit).collect()
    }
}

fn is_phone_char(c: char) -> bool {
    c.is_ascii_digit() || c.is_whitespace() || matches!(c, '-' | '(' | ')')
}

impl fmt::Display for Phone {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl std::str::FromStr for Phone {
    type Err = PhoneError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl AsRef<str> for Phone {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
