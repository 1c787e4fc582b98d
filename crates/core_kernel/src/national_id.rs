//! Chilean RUT national identifier
//!
//! The RUT (Rol Único Tributario) is the Chilean taxpayer identifier:
//! a number of up to eight digits plus a verification digit computed
//! with a weighted modulo-11 checksum. The canonical text form is
//! `number-digit`, e.g. `12345678-5`.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Checksum weights, applied right-to-left and cycling every six digits
const VERIFICATION_WEIGHTS: [u32; 6] = [2, 3, 4, 5, 6, 7];

/// Errors produced when validating a RUT
#[derive(Debug, Error, PartialEq, Eq)]
pub enum RutError {
    #[error("Invalid RUT format: {0}")]
    InvalidFormat(String),

    #[error("Invalid verification digit: expected {expected}, got {found}")]
    CheckDigitMismatch { expected: char, found: char },
}

/// A validated Chilean RUT
///
/// Construction always verifies the check digit, so every value in
/// circulation is known to be well-formed. Equality is based on the
/// canonical `number-digit` form.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Rut {
    number: String,
    check_digit: char,
}

impl Rut {
    /// Parses a RUT from free-form text
    ///
    /// Formatting punctuation (dots, hyphens) is stripped before the
    /// last character is split off as the verification digit, so
    /// `12.345.678-5`, `12345678-5` and `123456785` all parse to the
    /// same value.
    ///
    /// # Errors
    ///
    /// Returns `RutError::InvalidFormat` if the cleaned text is not one
    /// to eight digits followed by a digit or `K`, or
    /// `RutError::CheckDigitMismatch` if the verification digit does not
    /// match the checksum.
    pub fn parse(text: &str) -> Result<Self, RutError> {
        let clean: String = text
            .chars()
            .filter(|c| *c != '.' && *c != '-')
            .collect::<String>()
            .to_uppercase();

        if clean.len() < 2 {
            return Err(RutError::InvalidFormat(text.to_string()));
        }

        let (number, digit) = clean.split_at(clean.len() - 1);
        let check_digit = digit.chars().next().expect("split_at leaves one char");

        Self::from_parts(number, check_digit)
    }

    /// Creates a RUT from its number and verification digit
    ///
    /// # Errors
    ///
    /// Same failure modes as [`Rut::parse`].
    pub fn from_parts(number: &str, check_digit: char) -> Result<Self, RutError> {
        let check_digit = check_digit.to_ascii_uppercase();

        if number.is_empty()
            || number.len() > 8
            || !number.chars().all(|c| c.is_ascii_digit())
            || !(check_digit.is_ascii_digit() || check_digit == 'K')
        {
            return Err(RutError::InvalidFormat(format!("{number}-{check_digit}")));
        }

        let expected = compute_check_digit(number);
        if expected != check_digit {
            return Err(RutError::CheckDigitMismatch {
                expected,
                found: check_digit,
            });
        }

        Ok(Self {
            number: number.to_string(),
            check_digit,
        })
    }

    /// Returns the number part
    pub fn number(&self) -> &str {
        &self.number
    }

    /// Returns the verification digit
    pub fn check_digit(&self) -> char {
        self.check_digit
    }

    /// Returns the canonical `number-digit` form
    pub fn canonical(&self) -> String {
        format!("{}-{}", self.number, self.check_digit)
    }

    /// Returns the RUT without any formatting
    pub fn clean(&self) -> String {
        format!("{}{}", self.number, self.check_digit)
    }

    /// Re-validates the value without failing
    ///
    /// A constructed `Rut` is always valid; this probe exists for
    /// callers that hold one and want a boolean answer rather than a
    /// `Result`.
    pub fn is_valid(&self) -> bool {
        Self::from_parts(&self.number, self.check_digit).is_ok()
    }
}

/// Computes the verification digit for a RUT number
///
/// Weighted modulo-11: each digit, taken right-to-left, is multiplied by
/// the cycling weights 2,3,4,5,6,7; `11 - (sum % 11)` maps 11 to `0`,
/// 10 to `K` and anything else to itself.
fn compute_check_digit(number: &str) -> char {
    let sum: u32 = number
        .chars()
        .rev()
        .enumerate()
        .map(|(i, c)| {
            let digit = c.to_digit(10).unwrap_or(0);
            digit * VERIFICATION_WEIGHTS[i % VERIFICATION_WEIGHTS.len()]
        })
        .sum();

    match 11 - (sum % 11) {
        11 => '0',
        10 => 'K',
        d => char::from_digit(d, 10).expect("remainder is a single digit"),
    }
}

impl fmt::Display for Rut {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.canonical())
    }
}

impl FromStr for Rut {
    type Err = RutError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl Serialize for Rut {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&self.canonical())
    }
}

impl<'de> Deserialize<'de> for Rut {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        Rut::parse(&s).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_valid_rut() {
        let rut = Rut::parse("12345678-5").unwrap();
        assert_eq!(rut.number(), "12345678");
        assert_eq!(rut.check_digit(), '5');
        assert_eq!(rut.canonical(), "12345678-5");
        assert!(rut.is_valid());
    }

    #[test]
    fn test_parse_strips_formatting() {
        let dotted = Rut::parse("12.345.678-5").unwrap();
        let plain = Rut::parse("123456785").unwrap();
        assert_eq!(dotted, plain);
    }

    #[test]
    fn test_check_digit_k_lowercase_accepted() {
        // 6 * 2 = 12, 12 % 11 = 1, 11 - 1 = 10 -> K
        let rut = Rut::parse("6-k").unwrap();
        assert_eq!(rut.check_digit(), 'K');
    }

    #[test]
    fn test_check_digit_zero() {
        // 4*2 + 1*3 = 11, 11 % 11 = 0, 11 - 0 = 11 -> 0
        let rut = Rut::parse("14-0").unwrap();
        assert_eq!(rut.check_digit(), '0');
    }

    #[test]
    fn test_wrong_check_digit_rejected() {
        let result = Rut::parse("12345678-9");
        assert!(matches!(
            result,
            Err(RutError::CheckDigitMismatch {
                expected: '5',
                found: '9'
            })
        ));
    }

    #[test]
    fn test_malformed_text_rejected() {
        for text in ["", "-", "12A45678-5", "123456789-1", "12345678-X"] {
            assert!(
                matches!(Rut::parse(text), Err(RutError::InvalidFormat(_))),
                "expected InvalidFormat for {text:?}"
            );
        }
    }

    #[test]
    fn test_from_parts() {
        let rut = Rut::from_parts("12345678", '5').unwrap();
        assert_eq!(rut, Rut::parse("12345678-5").unwrap());
    }

    #[test]
    fn test_serde_round_trip() {
        let rut = Rut::parse("12345678-5").unwrap();
        let json = serde_json::to_string(&rut).unwrap();
        assert_eq!(json, "\"12345678-5\"");

        let back: Rut = serde_json::from_str(&json).unwrap();
        assert_eq!(back, rut);
    }
}

#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        #[test]
        fn computed_check_digit_always_parses(number in 1u32..=99_999_999u32) {
            let number = number.to_string();
            let digit = compute_check_digit(&number);
            let rut = Rut::parse(&format!("{number}-{digit}")).unwrap();
            prop_assert!(rut.is_valid());
        }

        #[test]
        fn mutated_check_digit_never_parses(number in 1u32..=99_999_999u32) {
            let number = number.to_string();
            let digit = compute_check_digit(&number);

            for candidate in "0123456789K".chars() {
                if candidate != digit {
                    prop_assert!(Rut::from_parts(&number, candidate).is_err());
                }
            }
        }
    }
}
