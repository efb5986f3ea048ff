//! Cart commands.
//!
//! The cart lives in a [`FileStore`] so it survives between invocations,
//! the same way the browser shop keeps it in local storage.

use myhygia_storefront::cart::{Badge, CartError, CartManager, NoticeKind};
use myhygia_storefront::{FileStore, InMemoryCatalog, StoreConfig};
use tracing::{debug, info, warn};

/// Cart manager used by the CLI.
pub type FileCart = CartManager<FileStore, InMemoryCatalog>;

/// Open the cart and wire notices and the badge to the log.
///
/// # Errors
///
/// Returns `CartError::Storage` if the store file cannot be read.
pub fn open(
    store: FileStore,
    catalog: InMemoryCatalog,
    config: StoreConfig,
) -> Result<FileCart, CartError> {
    debug!(path = %store.path().display(), "Opening cart store");
    let mut cart = CartManager::new(store, catalog, config);

    let notifier = cart.notifier_mut();
    notifier.on_notice(|notice| match notice.kind {
        NoticeKind::Success => info!("{}", notice.message),
        NoticeKind::Error => warn!("{}", notice.message),
    });
    notifier.add_badge(|badge: Badge| match badge {
        Badge::Hidden => debug!("Cart badge hidden"),
        Badge::Visible(count) => debug!(count, "Cart badge"),
    });

    cart.refresh_badges()?;
    Ok(cart)
}

/// Log every line and the totals.
///
/// # Errors
///
/// Returns `CartError::Storage` if the store cannot be read.
pub fn show(cart: &FileCart) -> Result<(), CartError> {
    let summary = cart.summary()?;
    let config = cart.config();

    if summary.cart.is_empty() {
        info!("Cart is empty");
        return Ok(());
    }

    for line in summary.cart.items() {
        // Totals were checked when the cart was read
        let line_total = line.line_total().unwrap_or_default();
        info!(
            "#{} {} x{} @ {} = {}",
            line.id,
            line.name,
            line.quantity,
            config.format_price(line.price),
            config.format_price(line_total)
        );
    }

    info!("Articles: {}", summary.count);
    info!("Sous-total: {}", config.format_price(summary.subtotal));
    if summary.shipping.is_zero() {
        info!("Livraison: gratuite");
    } else {
        let remaining = config.free_shipping_threshold - summary.subtotal;
        info!(
            "Livraison: {} (gratuite dès {}, encore {})",
            config.format_price(summary.shipping),
            config.format_price(config.free_shipping_threshold),
            config.format_price(remaining)
        );
    }
    info!("Total: {}", config.format_price(summary.total));
    Ok(())
}
