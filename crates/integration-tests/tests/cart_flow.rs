//! End-to-end cart operations over the memory and file stores.

#![allow(clippy::unwrap_used, clippy::indexing_slicing)]

use myhygia_core::ProductId;
use myhygia_integration_tests::{manager, product, sample_catalog};
use myhygia_storefront::cart::CART_STORAGE_KEY;
use myhygia_storefront::{
    CartError, CartManager, FileStore, InMemoryCatalog, KeyValueStore, MemoryStore, StorageError,
    StoreConfig,
};
use rust_decimal::Decimal;
use serde_json::Value;

const FLORAL: ProductId = ProductId::new(1);
const BLOC: ProductId = ProductId::new(2);

#[test]
fn test_below_threshold_pays_shipping() {
    let mut cart = manager(MemoryStore::new());
    cart.add_item(FLORAL, 2).unwrap();

    assert_eq!(cart.subtotal().unwrap(), Decimal::from(50));
    assert_eq!(cart.shipping().unwrap(), Decimal::from(7));
    assert_eq!(cart.total().unwrap(), Decimal::from(57));
    assert_eq!(cart.item_count().unwrap(), 2);
}

#[test]
fn test_threshold_reached_ships_free() {
    let mut cart = manager(MemoryStore::new());
    cart.add_item(FLORAL, 4).unwrap();

    assert_eq!(cart.subtotal().unwrap(), Decimal::from(100));
    assert_eq!(cart.shipping().unwrap(), Decimal::ZERO);
    assert_eq!(cart.total().unwrap(), Decimal::from(100));
}

#[test]
fn test_full_shopping_session() {
    let mut cart = manager(MemoryStore::new());

    cart.add_item(FLORAL, 1).unwrap();
    cart.add_item(BLOC, 1).unwrap();
    let line = cart.add_item(FLORAL, 2).unwrap();
    assert_eq!(line.quantity, 3);

    let summary = cart.summary().unwrap();
    assert_eq!(summary.cart.len(), 2);
    assert_eq!(summary.count, 4);
    assert_eq!(summary.subtotal, Decimal::from(115));
    assert_eq!(summary.shipping, Decimal::ZERO);

    cart.update_quantity(FLORAL, 1).unwrap();
    assert_eq!(cart.subtotal().unwrap(), Decimal::from(65));
    assert_eq!(cart.total().unwrap(), Decimal::from(72));

    cart.update_quantity(BLOC, 0).unwrap();
    let remaining = cart.get_cart().unwrap();
    assert_eq!(remaining.len(), 1);
    assert!(remaining.line(BLOC).is_none());

    cart.remove_item(FLORAL).unwrap();
    assert!(cart.get_cart().unwrap().is_empty());

    cart.add_item(BLOC, 1).unwrap();
    cart.clear_cart().unwrap();
    assert!(cart.get_cart().unwrap().is_empty());
    assert!(cart.store().get(CART_STORAGE_KEY).unwrap().is_none());
}

#[test]
fn test_line_snapshots_product_at_add_time() {
    let mut cart = manager(MemoryStore::new());
    cart.add_item(FLORAL, 1).unwrap();
    let store = cart.into_store();

    // Same store, repriced catalog
    let repriced =
        InMemoryCatalog::new(vec![product(1, "Calot Floral", Decimal::from(30))]).unwrap();
    let mut cart = CartManager::new(store, repriced, StoreConfig::default());
    cart.add_item(FLORAL, 1).unwrap();

    let line = cart.get_cart().unwrap().line(FLORAL).cloned().unwrap();
    assert_eq!(line.quantity, 2);
    assert_eq!(line.price, Decimal::from(25));
}

#[test]
fn test_unknown_product_leaves_cart_untouched() {
    let mut cart = manager(MemoryStore::new());
    cart.add_item(FLORAL, 1).unwrap();

    let err = cart.add_item(ProductId::new(99), 1).unwrap_err();
    assert!(matches!(err, CartError::UnknownProduct(id) if id == ProductId::new(99)));
    assert_eq!(cart.item_count().unwrap(), 1);
}

#[test]
fn test_update_absent_line_does_not_write() {
    let mut cart = manager(MemoryStore::new());
    cart.update_quantity(FLORAL, 3).unwrap();

    assert!(cart.store().is_empty());
    assert!(cart.get_cart().unwrap().is_empty());
}

#[test]
fn test_update_rejects_oversized_quantity() {
    let mut cart = manager(MemoryStore::new());
    cart.add_item(FLORAL, 1).unwrap();

    let err = cart
        .update_quantity(FLORAL, i64::from(u32::MAX) + 1)
        .unwrap_err();
    assert!(matches!(err, CartError::InvalidQuantity(_)));
    assert_eq!(cart.item_count().unwrap(), 1);
}

#[test]
fn test_persisted_record_shape() {
    let mut cart = manager(MemoryStore::new());
    cart.add_item(FLORAL, 2).unwrap();

    let raw = cart.store().get(CART_STORAGE_KEY).unwrap().unwrap();
    let value: Value = serde_json::from_str(&raw).unwrap();
    let lines = value.as_array().unwrap();
    assert_eq!(lines.len(), 1);
    assert_eq!(lines[0]["id"], 1);
    assert_eq!(lines[0]["name"], "Calot Floral");
    assert_eq!(lines[0]["price"].as_f64(), Some(25.0));
    assert_eq!(lines[0]["image"], "assets/images/calots/calot-1.jpeg");
    assert_eq!(lines[0]["quantity"], 2);
}

#[test]
fn test_reads_record_written_by_browser_shop() {
    let mut store = MemoryStore::new();
    store
        .set(
            CART_STORAGE_KEY,
            r#"[{"id":2,"name":"Calot Bloc","price":40,"image":"b.jpeg","quantity":1},
                {"id":2,"name":"Calot Bloc","price":40,"image":"b.jpeg","quantity":2},
                {"id":1,"name":"Calot Floral","price":25,"image":"a.jpeg","quantity":0}]"#,
        )
        .unwrap();

    let cart = manager(store);
    let loaded = cart.get_cart().unwrap();
    assert_eq!(loaded.len(), 1);
    assert_eq!(loaded.line(BLOC).unwrap().quantity, 3);
    assert_eq!(cart.subtotal().unwrap(), Decimal::from(120));
}

#[test]
fn test_malformed_record_reads_as_empty_and_is_replaced() {
    let mut store = MemoryStore::new();
    store.set(CART_STORAGE_KEY, "{not json").unwrap();

    let mut cart = manager(store);
    assert!(cart.get_cart().unwrap().is_empty());

    cart.add_item(BLOC, 1).unwrap();
    assert_eq!(cart.item_count().unwrap(), 1);
}

#[test]
fn test_record_with_overflowing_total_is_discarded() {
    let mut store = MemoryStore::new();
    store
        .set(
            CART_STORAGE_KEY,
            r#"[{"id":1,"name":"Calot Floral","price":1e28,"image":"a.jpeg","quantity":100}]"#,
        )
        .unwrap();

    let mut cart = manager(store);
    assert!(cart.get_cart().unwrap().is_empty());
    assert_eq!(cart.summary().unwrap().total, Decimal::from(7));

    cart.add_item(FLORAL, 1).unwrap();
    assert_eq!(cart.subtotal().unwrap(), Decimal::from(25));
}

#[test]
fn test_add_beyond_max_quantity_is_rejected() {
    let mut cart = manager(MemoryStore::new());
    cart.add_item(FLORAL, u32::MAX).unwrap();

    assert!(matches!(
        cart.add_item(FLORAL, 5),
        Err(CartError::InvalidQuantity(_))
    ));
    assert_eq!(cart.item_count().unwrap(), u64::from(u32::MAX));
}

#[test]
fn test_quota_failure_keeps_previous_cart() {
    let mut cart = CartManager::new(
        MemoryStore::with_quota(200),
        sample_catalog(),
        StoreConfig::default(),
    );
    cart.add_item(FLORAL, 1).unwrap();

    let err = cart.add_item(BLOC, 1).unwrap_err();
    assert!(matches!(
        err,
        CartError::Storage(StorageError::QuotaExceeded { .. })
    ));
    let kept = cart.get_cart().unwrap();
    assert_eq!(kept.len(), 1);
    assert!(kept.line(BLOC).is_none());
}

#[test]
fn test_borrowed_store_outlives_manager() {
    let mut store = MemoryStore::new();
    {
        let mut cart = manager(&mut store);
        cart.add_item(FLORAL, 3).unwrap();
    }
    assert!(store.get(CART_STORAGE_KEY).unwrap().is_some());

    let cart = manager(&mut store);
    assert_eq!(cart.item_count().unwrap(), 3);
}

#[test]
fn test_file_store_persists_across_managers() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("nested").join("storage.json");

    let mut first = manager(FileStore::new(&path));
    first.add_item(FLORAL, 2).unwrap();
    first.add_item(BLOC, 1).unwrap();

    let mut second = manager(FileStore::new(&path));
    assert_eq!(second.item_count().unwrap(), 3);
    assert_eq!(second.total().unwrap(), Decimal::from(90));

    second.remove_item(BLOC).unwrap();
    assert_eq!(first.item_count().unwrap(), 2);

    first.clear_cart().unwrap();
    assert!(second.get_cart().unwrap().is_empty());
}

#[test]
fn test_file_store_keeps_other_keys() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("storage.json");

    let mut store = FileStore::new(&path);
    store.set("theme", "dark").unwrap();

    let mut cart = manager(store);
    cart.add_item(FLORAL, 1).unwrap();
    cart.clear_cart().unwrap();

    let store = cart.into_store();
    assert_eq!(store.get("theme").unwrap().as_deref(), Some("dark"));
    assert!(store.get(CART_STORAGE_KEY).unwrap().is_none());
}

#[test]
fn test_corrupt_store_file_is_a_storage_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("storage.json");
    std::fs::write(&path, "[1, 2").unwrap();

    let cart = manager(FileStore::new(&path));
    assert!(matches!(
        cart.get_cart(),
        Err(CartError::Storage(StorageError::Corrupt(_)))
    ));
}
