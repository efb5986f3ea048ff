//! Store configuration: shop identity and pricing constants.
//!
//! Defaults are the shop's published values. Any of them can be overridden
//! from the environment (a `.env` file is loaded if present).
//!
//! # Environment Variables
//!
//! ## Optional
//! - `MYHYGIA_STORE_NAME` - Shop name (default: myhygia)
//! - `MYHYGIA_CURRENCY` - Currency code or symbol (default: TND)
//! - `MYHYGIA_SHIPPING_COST` - Flat shipping cost (default: 7)
//! - `MYHYGIA_FREE_SHIPPING_THRESHOLD` - Subtotal that waives shipping (default: 100)

use std::str::FromStr;

use myhygia_core::{Currency, Money};
use rust_decimal::Decimal;
use thiserror::Error;

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

/// Shop-wide configuration consumed by the cart and the CLI.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreConfig {
    pub name: String,
    pub tagline: String,
    pub email: String,
    pub phone: String,
    pub instagram: String,
    pub facebook: String,
    pub address: String,
    pub currency: Currency,
    /// Flat shipping cost charged below the free-shipping threshold.
    pub shipping_cost: Decimal,
    /// Subtotal at or above which shipping is waived.
    pub free_shipping_threshold: Decimal,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            name: "myhygia".to_string(),
            tagline: "Calots & Bonnets Médicaux de Qualité".to_string(),
            email: "contact@myhygia.tn".to_string(),
            phone: "+216 96 025 340".to_string(),
            instagram: "https://www.instagram.com/myhygia/".to_string(),
            facebook: "https://www.facebook.com/profile.php?id=61580909522665".to_string(),
            address: "Tunisie".to_string(),
            currency: Currency::TND,
            shipping_cost: Decimal::from(7),
            free_shipping_threshold: Decimal::from(100),
        }
    }
}

impl StoreConfig {
    /// Load configuration, applying environment overrides to the defaults.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if an override is present but cannot be parsed,
    /// or if a pricing value is negative.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        let mut config = Self::default();

        if let Some(name) = get_optional_env("MYHYGIA_STORE_NAME") {
            config.name = name;
        }
        if let Some(currency) = get_parsed_env::<Currency>("MYHYGIA_CURRENCY")? {
            config.currency = currency;
        }
        if let Some(cost) = get_amount_env("MYHYGIA_SHIPPING_COST")? {
            config.shipping_cost = cost;
        }
        if let Some(threshold) = get_amount_env("MYHYGIA_FREE_SHIPPING_THRESHOLD")? {
            config.free_shipping_threshold = threshold;
        }

        Ok(config)
    }

    /// Symbol printed after prices (e.g. `DT`).
    #[must_use]
    pub const fn currency_symbol(&self) -> &'static str {
        self.currency.symbol()
    }

    /// Format an amount in the store currency, e.g. `25 DT`.
    #[must_use]
    pub fn format_price(&self, amount: Decimal) -> String {
        Money::new(amount, self.currency).to_string()
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

/// Get an optional environment variable.
fn get_optional_env(key: &str) -> Option<String> {
    std::env::var(key).ok()
}

/// Get an optional environment variable parsed into `T`.
fn get_parsed_env<T>(key: &str) -> Result<Option<T>, ConfigError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    get_optional_env(key)
        .map(|raw| {
            raw.parse::<T>()
                .map_err(|e| ConfigError::InvalidEnvVar(key.to_string(), e.to_string()))
        })
        .transpose()
}

/// Get an optional non-negative decimal amount.
fn get_amount_env(key: &str) -> Result<Option<Decimal>, ConfigError> {
    let amount = get_parsed_env::<Decimal>(key)?;
    if let Some(value) = amount
        && value.is_sign_negative()
    {
        return Err(ConfigError::InvalidEnvVar(
            key.to_string(),
            format!("must not be negative (got {value})"),
        ));
    }
    Ok(amount)
}
