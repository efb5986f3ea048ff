//! Cart state manager.
//!
//! The store is the source of truth: every operation reads the persisted
//! record, applies its change and writes the whole cart back before
//! notifying. Derived values are recomputed from the store on each call.

use myhygia_core::ProductId;
use rust_decimal::Decimal;
use tracing::{debug, instrument, warn};

use super::error::{CartError, Result};
use super::model::{CART_STORAGE_KEY, Cart, CartLineItem};
use super::notifier::{CartNotice, CartNotifier};
use crate::catalog::ProductCatalog;
use crate::config::StoreConfig;
use crate::storage::KeyValueStore;

/// Totals computed from a single read of the cart.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CartSummary {
    pub cart: Cart,
    pub subtotal: Decimal,
    pub shipping: Decimal,
    pub total: Decimal,
    /// Sum of quantities.
    pub count: u64,
}

/// Owns the cart's store, the catalog it adds from, and its notifier.
///
/// # Example
///
/// ```rust
/// use myhygia_core::ProductId;
/// use myhygia_storefront::{CartManager, InMemoryCatalog, MemoryStore, StoreConfig};
///
/// let mut cart = CartManager::new(
///     MemoryStore::new(),
///     InMemoryCatalog::builtin(),
///     StoreConfig::default(),
/// );
/// cart.add_item(ProductId::new(1), 2)?;
/// assert_eq!(cart.item_count()?, 2);
/// # Ok::<(), myhygia_storefront::CartError>(())
/// ```
#[derive(Debug)]
pub struct CartManager<S, C> {
    store: S,
    catalog: C,
    config: StoreConfig,
    notifier: CartNotifier,
}

impl<S, C> CartManager<S, C>
where
    S: KeyValueStore,
    C: ProductCatalog,
{
    pub fn new(store: S, catalog: C, config: StoreConfig) -> Self {
        Self {
            store,
            catalog,
            config,
            notifier: CartNotifier::new(),
        }
    }

    pub const fn store(&self) -> &S {
        &self.store
    }

    pub fn into_store(self) -> S {
        self.store
    }

    pub const fn catalog(&self) -> &C {
        &self.catalog
    }

    pub const fn config(&self) -> &StoreConfig {
        &self.config
    }

    /// Register badges and subscribe to change or notice events.
    pub const fn notifier_mut(&mut self) -> &mut CartNotifier {
        &mut self.notifier
    }

    /// Read the persisted cart.
    ///
    /// A missing record is an empty cart. A record that fails to parse, or
    /// whose total does not fit a `Decimal`, is logged and also treated as
    /// empty.
    ///
    /// # Errors
    ///
    /// Returns `CartError::Storage` if the store cannot be read.
    pub fn get_cart(&self) -> Result<Cart> {
        let Some(raw) = self.store.get(CART_STORAGE_KEY)? else {
            return Ok(Cart::new());
        };
        let cart = match serde_json::from_str::<Cart>(&raw) {
            Ok(cart) => cart,
            Err(e) => {
                warn!(key = CART_STORAGE_KEY, error = %e, "Discarding malformed cart record");
                return Ok(Cart::new());
            }
        };
        if self.totals(&cart).is_err() {
            warn!(key = CART_STORAGE_KEY, "Discarding cart record whose total overflows");
            return Ok(Cart::new());
        }
        Ok(cart)
    }

    /// Persist `cart` as the whole cart and notify.
    ///
    /// # Errors
    ///
    /// - `CartError::AmountOverflow` if the cart's total does not fit a
    ///   `Decimal`; nothing is written
    /// - `CartError::Storage` or `CartError::Serialize` if the write fails
    ///
    /// Nothing is notified on error.
    pub fn save_cart(&mut self, cart: &Cart) -> Result<()> {
        let (_, _, total) = self.totals(cart)?;
        let raw = serde_json::to_string(cart)?;
        self.store.set(CART_STORAGE_KEY, &raw)?;
        self.notifier.cart_changed(cart, total);
        Ok(())
    }

    /// Add `quantity` of a catalog product.
    ///
    /// Increments the existing line or appends a new one snapshotting the
    /// product's name, price and image. On success a notice is published.
    ///
    /// # Errors
    ///
    /// - `CartError::InvalidQuantity` if `quantity` is zero or the line would
    ///   exceed `u32::MAX`; the cart is left untouched
    /// - `CartError::AmountOverflow` if the new total does not fit a `Decimal`
    /// - `CartError::UnknownProduct` if the catalog has no such product;
    ///   the cart is left untouched and an error notice is published
    /// - `CartError::Storage` if the store fails
    #[instrument(level = "debug", skip(self))]
    pub fn add_item(&mut self, product_id: ProductId, quantity: u32) -> Result<CartLineItem> {
        if quantity == 0 {
            return Err(CartError::InvalidQuantity(0));
        }

        let Some(product) = self.catalog.product_by_id(product_id) else {
            warn!(%product_id, "Product not found");
            self.notifier.notify(&CartNotice::error(format!(
                "Produit introuvable : {product_id}"
            )));
            return Err(CartError::UnknownProduct(product_id));
        };

        let mut cart = self.get_cart()?;
        let Some(new_quantity) = cart.add(product, quantity) else {
            let held = cart.line(product_id).map_or(0, |line| line.quantity);
            warn!(%product_id, held, quantity, "Line quantity would overflow");
            return Err(CartError::InvalidQuantity(
                i64::from(held) + i64::from(quantity),
            ));
        };
        let line = cart
            .line(product_id)
            .cloned()
            .unwrap_or_else(|| CartLineItem::from_product(product, new_quantity));
        let notice = CartNotice::success(format!("{} ajouté au panier !", product.name));

        self.save_cart(&cart)?;
        self.notifier.notify(&notice);
        debug!(quantity = line.quantity, "Cart line updated");
        Ok(line)
    }

    /// Remove the line for `product_id`.
    ///
    /// An absent id leaves the cart as it was; the cart is still written
    /// back and listeners are still notified.
    ///
    /// # Errors
    ///
    /// Returns `CartError::Storage` if the store fails.
    #[instrument(level = "debug", skip(self))]
    pub fn remove_item(&mut self, product_id: ProductId) -> Result<()> {
        let mut cart = self.get_cart()?;
        if cart.remove(product_id).is_none() {
            debug!("Product not in cart");
        }
        self.save_cart(&cart)
    }

    /// Set the quantity of an existing line.
    ///
    /// `quantity <= 0` removes the line. An id that is not in the cart is
    /// ignored without writing or notifying.
    ///
    /// # Errors
    ///
    /// - `CartError::InvalidQuantity` if `quantity` exceeds `u32::MAX`
    /// - `CartError::AmountOverflow` if the new total does not fit a `Decimal`
    /// - `CartError::Storage` if the store fails
    #[instrument(level = "debug", skip(self))]
    pub fn update_quantity(&mut self, product_id: ProductId, quantity: i64) -> Result<()> {
        let mut cart = self.get_cart()?;
        if cart.line(product_id).is_none() {
            debug!("Product not in cart");
            return Ok(());
        }
        if quantity <= 0 {
            return self.remove_item(product_id);
        }

        let quantity =
            u32::try_from(quantity).map_err(|_| CartError::InvalidQuantity(quantity))?;
        cart.set_quantity(product_id, quantity);
        self.save_cart(&cart)
    }

    /// Delete the persisted cart and notify.
    ///
    /// # Errors
    ///
    /// Returns `CartError::Storage` if the store fails.
    #[instrument(level = "debug", skip(self))]
    pub fn clear_cart(&mut self) -> Result<()> {
        self.store.delete(CART_STORAGE_KEY)?;
        let empty = Cart::new();
        let (_, _, total) = self.totals(&empty)?;
        self.notifier.cart_changed(&empty, total);
        Ok(())
    }

    /// Sum of `price * quantity` over all lines.
    ///
    /// # Errors
    ///
    /// Returns `CartError::Storage` if the store cannot be read.
    pub fn subtotal(&self) -> Result<Decimal> {
        let (subtotal, _, _) = self.totals(&self.get_cart()?)?;
        Ok(subtotal)
    }

    /// Shipping charged for the current subtotal.
    ///
    /// # Errors
    ///
    /// Returns `CartError::Storage` if the store cannot be read.
    pub fn shipping(&self) -> Result<Decimal> {
        let (_, shipping, _) = self.totals(&self.get_cart()?)?;
        Ok(shipping)
    }

    /// Subtotal plus shipping.
    ///
    /// # Errors
    ///
    /// Returns `CartError::Storage` if the store cannot be read.
    pub fn total(&self) -> Result<Decimal> {
        let (_, _, total) = self.totals(&self.get_cart()?)?;
        Ok(total)
    }

    /// Sum of all quantities.
    ///
    /// # Errors
    ///
    /// Returns `CartError::Storage` if the store cannot be read.
    pub fn item_count(&self) -> Result<u64> {
        Ok(self.get_cart()?.item_count())
    }

    /// Cart plus every derived value, from one read.
    ///
    /// # Errors
    ///
    /// Returns `CartError::Storage` if the store cannot be read.
    pub fn summary(&self) -> Result<CartSummary> {
        let cart = self.get_cart()?;
        let (subtotal, shipping, total) = self.totals(&cart)?;
        Ok(CartSummary {
            count: cart.item_count(),
            cart,
            subtotal,
            shipping,
            total,
        })
    }

    /// Render badges from the stored cart without mutating it.
    ///
    /// # Errors
    ///
    /// Returns `CartError::Storage` if the store cannot be read.
    pub fn refresh_badges(&mut self) -> Result<()> {
        let count = self.item_count()?;
        self.notifier.render_badges(count);
        Ok(())
    }

    fn shipping_for(&self, subtotal: Decimal) -> Decimal {
        if subtotal >= self.config.free_shipping_threshold {
            Decimal::ZERO
        } else {
            self.config.shipping_cost
        }
    }

    /// Subtotal, shipping and total, checked for overflow.
    fn totals(&self, cart: &Cart) -> Result<(Decimal, Decimal, Decimal)> {
        let subtotal = cart.subtotal().ok_or(CartError::AmountOverflow)?;
        let shipping = self.shipping_for(subtotal);
        let total = subtotal
            .checked_add(shipping)
            .ok_or(CartError::AmountOverflow)?;
        Ok((subtotal, shipping, total))
    }
}
