//! Catalog commands.
//!
//! The catalog is the built-in product list unless `--catalog` points at a
//! YAML file of the form:
//!
//! ```yaml
//! products:
//!   - id: 1
//!     name: Calot Médical Floral Élégant
//!     slug: calot-floral-elegant
//!     category: Calots Fantaisie
//!     price: 25
//!     image: assets/images/calots/calot-1.jpeg
//!     featured: true
//! ```

use std::path::Path;

use myhygia_core::ProductId;
use myhygia_storefront::catalog::CatalogError;
use myhygia_storefront::{InMemoryCatalog, Product, ProductCatalog, StoreConfig};
use serde::Deserialize;
use thiserror::Error;
use tracing::info;

/// Errors that can occur while loading or querying the catalog.
#[derive(Debug, Error)]
pub enum CatalogCommandError {
    #[error("File not found: {0}")]
    FileNotFound(String),

    #[error("Failed to read catalog: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid catalog YAML: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("Invalid catalog: {0}")]
    Catalog(#[from] CatalogError),

    #[error("No product with id or slug: {0}")]
    ProductNotFound(String),
}

#[derive(Debug, Deserialize)]
struct CatalogFile {
    products: Vec<Product>,
}

/// Parse a YAML product list.
///
/// # Errors
///
/// Returns an error if the YAML is invalid or ids/slugs repeat.
pub fn parse(content: &str) -> Result<InMemoryCatalog, CatalogCommandError> {
    let file: CatalogFile = serde_yaml::from_str(content)?;
    Ok(InMemoryCatalog::new(file.products)?)
}

/// Load the catalog from `path`, or the built-in one when no path is given.
///
/// # Errors
///
/// Returns an error if the file is missing, unreadable or invalid.
pub async fn load(path: Option<&Path>) -> Result<InMemoryCatalog, CatalogCommandError> {
    let Some(path) = path else {
        return Ok(InMemoryCatalog::builtin());
    };

    if !path.exists() {
        return Err(CatalogCommandError::FileNotFound(path.display().to_string()));
    }

    info!(path = %path.display(), "Loading catalog from file");
    let content = tokio::fs::read_to_string(path).await?;
    let catalog = parse(&content)?;
    info!(products = catalog.products().len(), "Parsed catalog");
    Ok(catalog)
}

/// Resolve a product by numeric id first, then by slug.
pub fn find<'a>(catalog: &'a InMemoryCatalog, key: &str) -> Option<&'a Product> {
    key.parse::<ProductId>()
        .ok()
        .and_then(|id| catalog.product_by_id(id))
        .or_else(|| catalog.product_by_slug(key))
}

/// List products, optionally filtered.
pub fn list(
    catalog: &InMemoryCatalog,
    config: &StoreConfig,
    category: Option<&str>,
    featured_only: bool,
) {
    let products = category.map_or_else(
        || catalog.products().iter().collect::<Vec<_>>(),
        |c| catalog.products_by_category(c),
    );

    let mut shown = 0;
    for product in products.into_iter().filter(|p| !featured_only || p.featured) {
        let stock = if product.in_stock { "" } else { " (rupture)" };
        info!(
            "#{} {} - {}{stock}",
            product.id,
            product.name,
            config.format_price(product.price)
        );
        shown += 1;
    }
    info!("{shown} product(s)");
}

/// Show one product in detail.
///
/// # Errors
///
/// Returns `ProductNotFound` if neither an id nor a slug matches.
pub fn show(
    catalog: &InMemoryCatalog,
    config: &StoreConfig,
    key: &str,
) -> Result<(), CatalogCommandError> {
    let product =
        find(catalog, key).ok_or_else(|| CatalogCommandError::ProductNotFound(key.to_string()))?;

    info!("#{} {} ({})", product.id, product.name, product.slug);
    info!("  Category: {}", product.category);
    match product.old_price {
        Some(old) => info!(
            "  Price: {} (was {})",
            config.format_price(product.price),
            config.format_price(old)
        ),
        None => info!("  Price: {}", config.format_price(product.price)),
    }
    if let Some(badge) = &product.badge {
        info!("  Badge: {badge}");
    }
    info!("  Image: {}", product.image);
    if !product.description.is_empty() {
        info!("  {}", product.description);
    }
    for feature in &product.features {
        info!("  - {feature}");
    }
    Ok(())
}
