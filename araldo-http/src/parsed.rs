// Copyright (C) 2023 Tristan Gerritsen <tristan@thewoosh.org>
// All Rights Reserved.

use crate::HttpParseError;

/// The decoded state of one request header field.
#[derive(Clone, Debug, PartialEq)]
pub enum Parsed<T> {
    /// The field wasn't sent.
    NotPresent,

    /// The field was sent but its value doesn't match the grammar.
    Invalid(HttpParseError),

    Valid(T),
}

impl<T> Default for Parsed<T> {
    fn default() -> Self {
        Parsed::NotPresent
    }
}

impl<T> Parsed<T> {
    /// Converts the result of a decoder into a [`Parsed`] value.
    pub fn from_result(result: Result<T, HttpParseError>) -> Self {
        match result {
            Ok(value) => Parsed::Valid(value),
            Err(error) => Parsed::Invalid(error),
        }
    }

    #[must_use]
    pub fn is_present(&self) -> bool {
        !matches!(self, Parsed::NotPresent)
    }

    #[must_use]
    pub fn is_valid(&self) -> bool {
        matches!(self, Parsed::Valid(_))
    }

    #[must_use]
    pub fn is_invalid(&self) -> bool {
        matches!(self, Parsed::Invalid(_))
    }

    #[must_use]
    pub fn valid(&self) -> Option<&T> {
        match self {
            Parsed::Valid(value) => Some(value),
            _ => None,
        }
    }

    #[must_use]
    pub fn into_valid(self) -> Option<T> {
        match self {
            Parsed::Valid(value) => Some(value),
            _ => None,
        }
    }

    #[must_use]
    pub fn error(&self) -> Option<HttpParseError> {
        match self {
            Parsed::Invalid(error) => Some(*error),
            _ => None,
        }
    }

    pub fn as_ref(&self) -> Parsed<&T> {
        match self {
            Parsed::NotPresent => Parsed::NotPresent,
            Parsed::Invalid(error) => Parsed::Invalid(*error),
            Parsed::Valid(value) => Parsed::Valid(value),
        }
    }

    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Parsed<U> {
        match self {
            Parsed::NotPresent => Parsed::NotPresent,
            Parsed::Invalid(error) => Parsed::Invalid(error),
            Parsed::Valid(value) => Parsed::Valid(f(value)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_states() {
        let absent: Parsed<u64> = Parsed::NotPresent;
        assert!(!absent.is_present());
        assert_eq!(absent.valid(), None);

        let invalid: Parsed<u64> = Parsed::from_result(Err(HttpParseError::InvalidNumber));
        assert!(invalid.is_present());
        assert!(invalid.is_invalid());
        assert_eq!(invalid.error(), Some(HttpParseError::InvalidNumber));

        let valid = Parsed::from_result(Ok(42_u64));
        assert!(valid.is_valid());
        assert_eq!(valid.as_ref().map(|value| value * 2), Parsed::Valid(84));
        assert_eq!(valid.into_valid(), Some(42));
    }
}
