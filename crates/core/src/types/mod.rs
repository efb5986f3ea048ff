//! Core types for myhygia.
//!
//! This module provides type-safe wrappers for common domain concepts.

pub mod id;
pub mod price;

pub use id::*;
pub use price::{Currency, CurrencyError, Money, format_amount};
