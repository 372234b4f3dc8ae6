//! Saudi mobile phone number type.

use core::fmt;

use serde::{Deserialize, Serialize};

/// Errors that can occur when parsing a [`Phone`].
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum PhoneError {
    /// The input string is empty.
    #[error("phone number cannot be empty")]
    Empty,
    /// The input contains characters other than digits, spaces, dashes and a leading +.
    #[error("phone number contains invalid characters")]
    InvalidCharacters,
    /// The number is not a Saudi mobile number.
    #[error("phone number must be a Saudi mobile number (05XXXXXXXX or +9665XXXXXXXX)")]
    InvalidFormat,
}

/// A Saudi mobile number, stored in E.164 form (`+9665XXXXXXXX`).
///
/// Accepted input forms (spaces and dashes are ignored, Arabic-Indic digits
/// are accepted):
///
/// - `05XXXXXXXX`
/// - `5XXXXXXXX`
/// - `9665XXXXXXXX`, `+9665XXXXXXXX`, `009665XXXXXXXX`
///
/// ```
/// use tajeer_core::Phone;
///
/// let phone = Phone::parse("050 123 4567").unwrap();
/// assert_eq!(phone.as_str(), "+966501234567");
/// assert_eq!(phone.local_format(), "0501234567");
///
/// assert!(Phone::parse("0112345678").is_err()); // landline
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(try_from = "String", into = "String")]
pub struct Phone(String);

impl Phone {
    const COUNTRY_CODE: &'static str = "966";

    /// Subscriber digits after the country code (`5` + 8 digits).
    const SUBSCRIBER_LEN: usize = 9;

    /// Parse a `Phone` from user input.
    ///
    /// # Errors
    ///
    /// Returns a [`PhoneError`] if the input is empty, has stray characters or
    /// is not a Saudi mobile number.
    pub fn parse(s: &str) -> Result<Self, PhoneError> {
        let s = s.trim();
        if s.is_empty() {
            return Err(PhoneError::Empty);
        }

        let (has_plus, rest) = s
            .strip_prefix('+')
            .map_or((false, s), |rest| (true, rest));

        let mut digits = String::with_capacity(rest.len());
        for c in rest.chars() {
            match c {
                ' ' | '-' => {}
                _ => digits.push(ascii_digit(c).ok_or(PhoneError::InvalidCharacters)?),
            }
        }

        let stripped = if has_plus {
            digits.strip_prefix(Self::COUNTRY_CODE)
        } else if let Some(rest) = digits.strip_prefix("00") {
            rest.strip_prefix(Self::COUNTRY_CODE)
        } else if digits.len() == Self::SUBSCRIBER_LEN + Self::COUNTRY_CODE.len() {
            digits.strip_prefix(Self::COUNTRY_CODE)
        } else if let Some(rest) = digits.strip_prefix('0') {
            Some(rest)
        } else {
            Some(digits.as_str())
        };
        let subscriber = stripped.ok_or(PhoneError::InvalidFormat)?;

        if subscriber.len() != Self::SUBSCRIBER_LEN || !subscriber.starts_with('5') {
            return Err(PhoneError::InvalidFormat);
        }

        Ok(Self(format!("+{}{subscriber}", Self::COUNTRY_CODE)))
    }

    /// Returns the number in E.164 form.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Returns the number in the local `05XXXXXXXX` form.
    #[must_use]
    pub fn local_format(&self) -> String {
        let subscriber = self
            .0
            .strip_prefix('+')
            .and_then(|s| s.strip_prefix(Self::COUNTRY_CODE))
            .unwrap_or(&self.0);
        format!("0{subscriber}")
    }
}

/// Map ASCII and Arabic-Indic digits to their ASCII form.
fn ascii_digit(c: char) -> Option<char> {
    match c {
        '0'..='9' => Some(c),
        '\u{0660}'..='\u{0669}' => char::from_digit(u32::from(c) - 0x0660, 10),
        '\u{06F0}'..='\u{06F9}' => char::from_digit(u32::from(c) - 0x06F0, 10),
        _ => None,
    }
}

impl fmt::Display for Phone {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::str::FromStr for Phone {
    type Err = PhoneError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for Phone {
    type Error = PhoneError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<Phone> for String {
    fn from(phone: Phone) -> Self {
        phone.0
    }
}
