//! Money types with precise decimal arithmetic
//!
//! This module provides a type-safe representation of monetary values
//! using rust_decimal for precise calculations without floating-point errors.
//! Amounts are never negative; every arithmetic operation returns a new
//! value and re-validates that invariant.

use rust_decimal::{Decimal, RoundingStrategy};
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Currency codes following ISO 4217
///
/// CLP is the home currency of the system; CLF is the Chilean
/// inflation-indexed unit (Unidad de Fomento) common in insurance
/// contracts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Currency {
    CLP,
    CLF,
    USD,
    EUR,
}

impl Currency {
    /// Returns the currency symbol
    pub fn symbol(&self) -> &'static str {
        match self {
            Currency::CLP => "$",
            Currency::CLF => "UF",
            Currency::USD => "US$",
            Currency::EUR => "€",
        }
    }

    /// Returns the ISO 4217 code
    pub fn code(&self) -> &'static str {
        match self {
            Currency::CLP => "CLP",
            Currency::CLF => "CLF",
            Currency::USD => "USD",
            Currency::EUR => "EUR",
        }
    }
}

impl fmt::Display for Currency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

impl FromStr for Currency {
    type Err = MoneyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_uppercase().as_str() {
            "CLP" => Ok(Currency::CLP),
            "CLF" => Ok(Currency::CLF),
            "USD" => Ok(Currency::USD),
            "EUR" => Ok(Currency::EUR),
            other => Err(MoneyError::UnknownCurrency(other.to_string())),
        }
    }
}

/// Errors that can occur during money operations
#[derive(Debug, Error, PartialEq, Eq)]
pub enum MoneyError {
    #[error("Currency mismatch: cannot operate on {0} and {1}")]
    CurrencyMismatch(String, String),

    #[error("Invalid amount: {0}")]
    InvalidAmount(String),

    #[error("Unknown currency code: {0}")]
    UnknownCurrency(String),
}

/// A non-negative monetary amount with associated currency
///
/// Money uses rust_decimal for exact arithmetic. Equality and hashing
/// compare numerically, so `100.00 CLP` equals `100 CLP` regardless of
/// textual scale.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Money {
    amount: Decimal,
    currency: Currency,
}

impl Money {
    /// Creates a new Money value
    ///
    /// # Errors
    ///
    /// Returns `MoneyError::InvalidAmount` if the amount is negative
    pub fn new(amount: Decimal, currency: Currency) -> Result<Self, MoneyError> {
        if amount.is_sign_negative() && !amount.is_zero() {
            return Err(MoneyError::InvalidAmount(format!(
                "amount cannot be negative: {amount}"
            )));
        }
        Ok(Self { amount, currency })
    }

    /// Creates a Money value in the home currency (CLP)
    pub fn of(amount: Decimal) -> Result<Self, MoneyError> {
        Self::new(amount, Currency::CLP)
    }

    /// Creates a zero amount in the home currency
    pub fn zero() -> Self {
        Self {
            amount: dec!(0),
            currency: Currency::CLP,
        }
    }

    /// Creates a zero amount in the specified currency
    pub fn zero_in(currency: Currency) -> Self {
        Self {
            amount: dec!(0),
            currency,
        }
    }

    /// Returns the amount
    pub fn amount(&self) -> Decimal {
        self.amount
    }

    /// Returns the currency
    pub fn currency(&self) -> Currency {
        self.currency
    }

    /// Returns true if the amount is zero
    pub fn is_zero(&self) -> bool {
        self.amount.is_zero()
    }

    /// Returns true if the amount is strictly positive
    pub fn is_positive(&self) -> bool {
        self.amount.is_sign_positive() && !self.amount.is_zero()
    }

    /// Returns true if the amount is negative
    ///
    /// Always false for a validly constructed value; kept as a probe so
    /// callers never have to reason about the invariant themselves.
    pub fn is_negative(&self) -> bool {
        self.amount.is_sign_negative() && !self.amount.is_zero()
    }

    /// Adds another amount of the same currency
    ///
    /// # Errors
    ///
    /// Returns `MoneyError::CurrencyMismatch` if the currencies differ
    pub fn add(&self, other: &Money) -> Result<Money, MoneyError> {
        self.ensure_same_currency(other)?;
        Self::new(self.amount + other.amount, self.currency)
    }

    /// Subtracts another amount of the same currency
    ///
    /// # Errors
    ///
    /// Returns `MoneyError::CurrencyMismatch` if the currencies differ,
    /// or `MoneyError::InvalidAmount` if the result would be negative
    pub fn subtract(&self, other: &Money) -> Result<Money, MoneyError> {
        self.ensure_same_currency(other)?;
        Self::new(self.amount - other.amount, self.currency)
    }

    /// Multiplies by a scalar factor
    ///
    /// # Errors
    ///
    /// Returns `MoneyError::InvalidAmount` if the result would be negative
    pub fn multiply(&self, factor: Decimal) -> Result<Money, MoneyError> {
        Self::new(self.amount * factor, self.currency)
    }

    /// Formats as currency symbol plus the amount rounded to two decimal
    /// places, rounding half away from zero
    pub fn format(&self) -> String {
        let rounded = self
            .amount
            .round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
        format!("{} {:.2}", self.currency.symbol(), rounded)
    }

    fn ensure_same_currency(&self, other: &Money) -> Result<(), MoneyError> {
        if self.currency != other.currency {
            return Err(MoneyError::CurrencyMismatch(
                self.currency.to_string(),
                other.currency.to_string(),
            ));
        }
        Ok(())
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.format())
    }
}
