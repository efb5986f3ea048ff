//! Shopping cart.
//!
//! - [`model`] - Line items, the cart, and its persisted JSON shape
//! - [`manager`] - [`CartManager`], which mutates and persists the cart
//! - [`notifier`] - Badge rendering and the change/notice channels
//! - [`error`] - [`CartError`]

pub mod error;
pub mod manager;
pub mod model;
pub mod notifier;

pub use error::CartError;
pub use manager::{CartManager, CartSummary};
pub use model::{CART_STORAGE_KEY, Cart, CartLineItem};
pub use notifier::{
    Badge, BadgeSink, CartChanged, CartNotice, CartNotifier, EventChannel, NoticeKind,
    SubscriptionId,
};
