//! Type-safe money representation using decimal arithmetic.
//!
//! Amounts are kept in the currency's standard unit (dinars, not millimes)
//! and rendered the way the shop prints prices: the normalized amount
//! followed by the currency symbol, e.g. `25 DT` or `12.5 DT`.

use core::fmt;
use std::str::FromStr;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Errors that can occur when parsing a [`Currency`].
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum CurrencyError {
    /// The code or symbol is not one the shop sells in.
    #[error("unknown currency: {0}")]
    Unknown(String),
}

/// Currencies the shop can price in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum Currency {
    /// Tunisian dinar.
    #[default]
    TND,
    /// Moroccan dirham.
    MAD,
    EUR,
}

impl Currency {
    /// Symbol printed after amounts.
    #[must_use]
    pub const fn symbol(&self) -> &'static str {
        match self {
            Self::TND => "DT",
            Self::MAD => "DH",
            Self::EUR => "€",
        }
    }

    /// ISO 4217 code.
    #[must_use]
    pub const fn code(&self) -> &'static str {
        match self {
            Self::TND => "TND",
            Self::MAD => "MAD",
            Self::EUR => "EUR",
        }
    }
}

impl fmt::Display for Currency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for Currency {
    type Err = CurrencyError;

    /// Accepts either the ISO code or the printed symbol, case-insensitively.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_uppercase().as_str() {
            "TND" | "DT" => Ok(Self::TND),
            "MAD" | "DH" => Ok(Self::MAD),
            "EUR" | "€" => Ok(Self::EUR),
            _ => Err(CurrencyError::Unknown(s.to_owned())),
        }
    }
}

/// An amount of money in a given currency.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Money {
    /// Amount in the currency's standard unit.
    pub amount: Decimal,
    pub currency: Currency,
}

impl Money {
    /// Create a new amount.
    #[must_use]
    pub const fn new(amount: Decimal, currency: Currency) -> Self {
        Self { amount, currency }
    }

    /// Zero in the given currency.
    #[must_use]
    pub const fn zero(currency: Currency) -> Self {
        Self::new(Decimal::ZERO, currency)
    }

    #[must_use]
    pub fn is_zero(&self) -> bool {
        self.amount.is_zero()
    }
}

/// Format an amount followed by a currency symbol.
///
/// Trailing zeros are dropped so whole prices print without decimals.
///
/// ```
/// use myhygia_core::format_amount;
/// use rust_decimal::Decimal;
///
/// assert_eq!(format_amount(Decimal::new(2500, 2), "DT"), "25 DT");
/// assert_eq!(format_amount(Decimal::new(125, 1), "DT"), "12.5 DT");
/// ```
#[must_use]
pub fn format_amount(amount: Decimal, symbol: &str) -> String {
    format!("{} {symbol}", amount.normalize())
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&format_amount(self.amount, self.currency.symbol()))
    }
}
