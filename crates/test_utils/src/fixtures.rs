//! Pre-built test data for common value objects

use core_kernel::{Money, Rut};
use once_cell::sync::Lazy;
use rust_decimal_macros::dec;

/// RUTs with correct verification digits
pub static VALID_RUTS: Lazy<Vec<Rut>> = Lazy::new(|| {
    ["12345678-5", "11111111-1", "22222222-2", "1-9", "6-K", "14-0"]
        .iter()
        .map(|s| Rut::parse(s).expect("fixture RUT must be valid"))
        .collect()
});

/// RUT fixtures
pub struct RutFixtures;

impl RutFixtures {
    /// A well-known valid RUT
    pub fn valid() -> Rut {
        VALID_RUTS[0].clone()
    }

    /// A different valid RUT, for filter tests
    pub fn other() -> Rut {
        VALID_RUTS[1].clone()
    }

    /// Text that fails check-digit validation
    pub fn invalid_text() -> &'static str {
        "12345678-9"
    }
}

/// Money fixtures in the home currency
pub struct MoneyFixtures;

impl MoneyFixtures {
    /// A typical monthly premium
    pub fn premium() -> Money {
        Money::of(dec!(45000)).expect("fixture amount is non-negative")
    }

    /// A typical coverage amount
    pub fn coverage() -> Money {
        Money::of(dec!(25000000)).expect("fixture amount is non-negative")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_all_fixture_ruts_are_valid() {
        for rut in VALID_RUTS.iter() {
            assert!(rut.is_valid());
        }
    }

    #[test]
    fn test_invalid_text_does_not_parse() {
        assert!(Rut::parse(RutFixtures::invalid_text()).is_err());
    }
}
