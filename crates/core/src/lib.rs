//! myhygia Core - Shared types library.
//!
//! This crate provides common types used across all myhygia components:
//! - `storefront` - Catalog, cart and store configuration
//! - `cli` - Command-line tools for the cart and asset pipeline
//!
//! # Architecture
//!
//! The core crate contains only types - no I/O, no storage access.
//! This keeps it lightweight and allows it to be used anywhere.
//!
//! # Modules
//!
//! - [`types`] - Newtype wrappers for type-safe IDs and money amounts

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
