//! Integration tests for myhygia.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p myhygia-integration-tests
//! ```
//!
//! # Test Categories
//!
//! - `cart_flow` - Cart operations end to end over memory and file stores
//! - `notifications` - Badge, change and notice delivery
//!
//! This crate only holds shared fixtures.

#![cfg_attr(not(test), forbid(unsafe_code))]

use std::cell::RefCell;
use std::rc::Rc;

use myhygia_core::ProductId;
use myhygia_storefront::cart::{Badge, CartChanged, CartNotice};
use myhygia_storefront::{
    CartManager, InMemoryCatalog, KeyValueStore, Product, ProductCatalog, StoreConfig,
};
use rust_decimal::Decimal;

/// A product with only the fields the cart cares about filled in.
#[must_use]
pub fn product(id: u32, name: &str, price: Decimal) -> Product {
    Product {
        id: ProductId::new(id),
        name: name.to_string(),
        slug: name.to_lowercase().replace(' ', "-"),
        category: "Calots Fantaisie".to_string(),
        price,
        old_price: None,
        description: String::new(),
        features: Vec::new(),
        image: format!("assets/images/calots/calot-{id}.jpeg"),
        images: Vec::new(),
        badge: None,
        in_stock: true,
        featured: false,
    }
}

/// Two products at 25 and 40.
///
/// # Panics
///
/// Never; the ids are distinct.
#[must_use]
pub fn sample_catalog() -> InMemoryCatalog {
    InMemoryCatalog::new(vec![
        product(1, "Calot Floral", Decimal::from(25)),
        product(2, "Calot Bloc", Decimal::from(40)),
    ])
    .expect("distinct ids and slugs")
}

/// Everything a manager published, in order.
#[derive(Debug, Default)]
pub struct Recorded {
    pub badges: Vec<Badge>,
    pub changes: Vec<CartChanged>,
    pub notices: Vec<CartNotice>,
}

/// Subscribe a recorder to every channel of `manager`.
pub fn record<S, C>(manager: &mut CartManager<S, C>) -> Rc<RefCell<Recorded>>
where
    S: KeyValueStore,
    C: ProductCatalog,
{
    let recorded = Rc::new(RefCell::new(Recorded::default()));
    let notifier = manager.notifier_mut();

    let sink = Rc::clone(&recorded);
    notifier.add_badge(move |badge: Badge| sink.borrow_mut().badges.push(badge));
    let sink = Rc::clone(&recorded);
    notifier.on_change(move |event: &CartChanged| sink.borrow_mut().changes.push(event.clone()));
    let sink = Rc::clone(&recorded);
    notifier.on_notice(move |notice: &CartNotice| sink.borrow_mut().notices.push(notice.clone()));

    recorded
}

/// Manager over `store` with the sample catalog and default config.
pub fn manager<S: KeyValueStore>(store: S) -> CartManager<S, InMemoryCatalog> {
    CartManager::new(store, sample_catalog(), StoreConfig::default())
}
