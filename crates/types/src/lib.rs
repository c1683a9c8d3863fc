//! Validated value types shared across Patient Vault crates.
//!
//! Each type checks its input once at construction and can be relied on afterwards, so store
//! documents and API payloads never carry an empty name or a malformed email address.

use std::fmt;

/// Errors that can occur when creating validated text types.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum TextError {
    /// The input text was empty or contained only whitespace
    #[error("Text cannot be empty")]
    Empty,
    /// The input is not a plausible email address
    #[error("invalid email address: {0}")]
    InvalidEmail(String),
    /// The input is not a plausible mobile number
    #[error("invalid mobile number: {0}")]
    InvalidMobileNumber(String),
}

/// A string type that guarantees non-empty content.
///
/// The input is trimmed of leading and trailing whitespace during construction.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct NonEmptyText(String);

impl NonEmptyText {
    /// Creates a new `NonEmptyText` from the given input.
    ///
    /// # Errors
    ///
    /// Returns `TextError::Empty` if the trimmed input is empty.
    pub fn new(input: impl AsRef<str>) -> Result<Self, TextError> {
        let trimmed = input.as_ref().trim();
        if trimmed.is_empty() {
            return Err(TextError::Empty);
        }
        Ok(Self(trimmed.to_owned()))
    }

    /// Returns the inner string as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for NonEmptyText {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl AsRef<str> for NonEmptyText {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// An email address, normalised to lowercase.
///
/// Validation is deliberately shallow: exactly one `@`, a non-empty local part, and a domain
/// containing at least one dot with no empty labels.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct EmailAddress(String);

impl EmailAddress {
    /// Parses and normalises an email address.
    ///
    /// # Errors
    ///
    /// Returns `TextError::Empty` for blank input and `TextError::InvalidEmail` otherwise.
    pub fn parse(input: impl AsRef<str>) -> Result<Self, TextError> {
        let trimmed = input.as_ref().trim();
        if trimmed.is_empty() {
            return Err(TextError::Empty);
        }

        let invalid = || TextError::InvalidEmail(trimmed.to_owned());
        let (local, domain) = trimmed.split_once('@').ok_or_else(invalid)?;
        if local.is_empty() || domain.contains('@') || trimmed.contains(char::is_whitespace) {
            return Err(invalid());
        }
        if !domain.contains('.') || domain.split('.').any(str::is_empty) {
            return Err(invalid());
        }

        Ok(Self(trimmed.to_lowercase()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for EmailAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A mobile number stored as its digits.
///
/// Spaces, dashes and a single leading `+` are accepted on input and discarded; what remains
/// must be between 6 and 15 ASCII digits (the E.164 upper bound).
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct MobileNumber(String);

impl MobileNumber {
    const MIN_DIGITS: usize = 6;
    const MAX_DIGITS: usize = 15;

    /// Parses a mobile number.
    ///
    /// # Errors
    ///
    /// Returns `TextError::InvalidMobileNumber` if the input contains anything other than
    /// digits and separators, or has the wrong number of digits.
    pub fn parse(input: impl AsRef<str>) -> Result<Self, TextError> {
        let raw = input.as_ref().trim();
        if raw.is_empty() {
            return Err(TextError::Empty);
        }

        let body = raw.strip_prefix('+').unwrap_or(raw);
        let mut digits = String::with_capacity(body.len());
        for c in body.chars() {
            match c {
                '0'..='9' => digits.push(c),
                ' ' | '-' => {}
                _ => return Err(TextError::InvalidMobileNumber(raw.to_owned())),
            }
        }

        if !(Self::MIN_DIGITS..=Self::MAX_DIGITS).contains(&digits.len()) {
            return Err(TextError::InvalidMobileNumber(raw.to_owned()));
        }

        Ok(Self(digits))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for MobileNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

macro_rules! string_serde {
    ($ty:ty, $ctor:path) => {
        impl serde::Serialize for $ty {
            fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
            where
                S: serde::Serializer,
            {
                serializer.serialize_str(&self.0)
            }
        }

        impl<'de> serde::Deserialize<'de> for $ty {
            fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
            where
                D: serde::Deserializer<'de>,
            {
                let s = String::deserialize(deserializer)?;
                $ctor(&s).map_err(serde::de::Error::custom)
            }
        }
    };
}

string_serde!(NonEmptyText, NonEmptyText::new);
string_serde!(EmailAddress, EmailAddress::parse);
string_serde!(MobileNumber, MobileNumber::parse);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn non_empty_text_trims_input() {
        let text = NonEmptyText::new("  Ada  ").unwrap();
        assert_eq!(text.as_str(), "Ada");
    }

    #[test]
    fn non_empty_text_rejects_whitespace() {
        assert_eq!(NonEmptyText::new("   "), Err(TextError::Empty));
    }

    #[test]
    fn email_is_lowercased() {
        let email = EmailAddress::parse("Ada.Lovelace@Example.COM").unwrap();
        assert_eq!(email.as_str(), "ada.lovelace@example.com");
    }

    #[test]
    fn email_rejects_malformed_input() {
        for bad in ["ada", "@example.com", "ada@", "ada@example", "a@b@c.com", "ada@ex..com", "a b@c.com"] {
            assert!(EmailAddress::parse(bad).is_err(), "accepted {bad}");
        }
    }

    #[test]
    fn mobile_number_strips_separators() {
        let number = MobileNumber::parse("+44 7700-900123").unwrap();
        assert_eq!(number.as_str(), "447700900123");
    }

    #[test]
    fn mobile_number_rejects_letters_and_short_input() {
        assert!(MobileNumber::parse("0770O900123").is_err());
        assert!(MobileNumber::parse("12345").is_err());
        assert!(MobileNumber::parse("1234567890123456").is_err());
    }

    #[test]
    fn deserialize_validates() {
        let ok: NonEmptyText = serde_json::from_str("\"x\"").unwrap();
        assert_eq!(ok.as_str(), "x");
        assert!(serde_json::from_str::<NonEmptyText>("\"  \"").is_err());
        assert!(serde_json::from_str::<EmailAddress>("\"nope\"").is_err());
    }
}
