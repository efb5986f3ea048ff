//! myhygia Storefront library.
//!
//! The storefront is a small static shop: a read-only catalog, a cart that
//! lives in a string-keyed key-value store, and change notifications that
//! keep badges and other UI regions in sync.
//!
//! # Modules
//!
//! - [`catalog`] - Products, categories and the [`catalog::ProductCatalog`] lookup trait
//! - [`config`] - Shop identity and pricing constants
//! - [`storage`] - The [`storage::KeyValueStore`] abstraction with memory and file backends
//! - [`cart`] - The cart state manager and its notifier

#![cfg_attr(not(test), forbid(unsafe_code))]
#![cfg_attr(test, allow(unsafe_code))]

pub mod cart;
pub mod catalog;
pub mod config;
pub mod storage;

pub use cart::{CartError, CartManager};
pub use catalog::{InMemoryCatalog, Product, ProductCatalog};
pub use config::StoreConfig;
pub use storage::{FileStore, KeyValueStore, MemoryStore, StorageError};
