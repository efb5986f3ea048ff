//! Cart data model and its persisted JSON shape.

use myhygia_core::ProductId;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::catalog::Product;

/// Storage key holding the serialized cart.
pub const CART_STORAGE_KEY: &str = "medicalscrubs_cart";

/// One product-quantity pair in the cart.
///
/// Name, price and image are copied from the product when the line is
/// first added and are not refreshed afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartLineItem {
    pub id: ProductId,
    pub name: String,
    /// Written as a JSON number to match the record the browser shop keeps.
    #[serde(with = "rust_decimal::serde::float")]
    pub price: Decimal,
    pub image: String,
    pub quantity: u32,
}

impl CartLineItem {
    /// Snapshot a product into a new line.
    #[must_use]
    pub fn from_product(product: &Product, quantity: u32) -> Self {
        Self {
            id: product.id,
            name: product.name.clone(),
            price: product.price,
            image: product.image.clone(),
            quantity,
        }
    }

    /// `price * quantity`, or `None` if it does not fit a `Decimal`.
    #[must_use]
    pub fn line_total(&self) -> Option<Decimal> {
        self.price.checked_mul(Decimal::from(self.quantity))
    }
}

/// Insertion-ordered line items, unique by product id, every quantity > 0.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Cart {
    items: Vec<CartLineItem>,
}

impl<'de> Deserialize<'de> for Cart {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let items = Vec::<CartLineItem>::deserialize(deserializer)?;
        Self::from_items(items)
            .ok_or_else(|| serde::de::Error::custom("merged line quantity exceeds u32::MAX"))
    }
}

impl Cart {
    #[must_use]
    pub const fn new() -> Self {
        Self { items: Vec::new() }
    }

    /// Build a cart from raw lines, restoring the invariants.
    ///
    /// Zero-quantity lines are dropped and repeated ids are merged into the
    /// first occurrence. Returns `None` if a merged quantity overflows.
    #[must_use]
    pub fn from_items(items: impl IntoIterator<Item = CartLineItem>) -> Option<Self> {
        let mut cart = Self::new();
        for item in items {
            if item.quantity == 0 {
                continue;
            }
            match cart.line_mut(item.id) {
                Some(existing) => {
                    existing.quantity = existing.quantity.checked_add(item.quantity)?;
                }
                None => cart.items.push(item),
            }
        }
        Some(cart)
    }

    #[must_use]
    pub fn items(&self) -> &[CartLineItem] {
        &self.items
    }

    #[must_use]
    pub fn into_items(self) -> Vec<CartLineItem> {
        self.items
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Number of distinct products.
    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    #[must_use]
    pub fn line(&self, id: ProductId) -> Option<&CartLineItem> {
        self.items.iter().find(|item| item.id == id)
    }

    fn line_mut(&mut self, id: ProductId) -> Option<&mut CartLineItem> {
        self.items.iter_mut().find(|item| item.id == id)
    }

    /// Add `quantity` of `product`, incrementing an existing line or
    /// appending a new one. Returns the line's resulting quantity, or
    /// `None` with the cart unchanged if it would exceed `u32::MAX`.
    ///
    /// `quantity` must be non-zero; the manager checks this before calling.
    pub fn add(&mut self, product: &Product, quantity: u32) -> Option<u32> {
        if let Some(line) = self.line_mut(product.id) {
            line.quantity = line.quantity.checked_add(quantity)?;
            return Some(line.quantity);
        }
        self.items.push(CartLineItem::from_product(product, quantity));
        Some(quantity)
    }

    /// Remove the line for `id`, returning it if it was present.
    pub fn remove(&mut self, id: ProductId) -> Option<CartLineItem> {
        let index = self.items.iter().position(|item| item.id == id)?;
        Some(self.items.remove(index))
    }

    /// Overwrite the quantity of the line for `id`.
    ///
    /// A zero quantity removes the line. Returns `false` if `id` is absent.
    pub fn set_quantity(&mut self, id: ProductId, quantity: u32) -> bool {
        if quantity == 0 {
            return self.remove(id).is_some();
        }
        match self.line_mut(id) {
            Some(line) => {
                line.quantity = quantity;
                true
            }
            None => false,
        }
    }

    /// Sum of `price * quantity` over all lines, or `None` if any product
    /// or the sum does not fit a `Decimal`.
    #[must_use]
    pub fn subtotal(&self) -> Option<Decimal> {
        self.items
            .iter()
            .try_fold(Decimal::ZERO, |acc, item| acc.checked_add(item.line_total()?))
    }

    /// Sum of quantities (not the number of distinct products).
    #[must_use]
    pub fn item_count(&self) -> u64 {
        self.items.iter().map(|item| u64::from(item.quantity)).sum()
    }
}
