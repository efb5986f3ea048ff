//! Product catalog.
//!
//! The cart depends on the [`ProductCatalog`] trait rather than on a fixed
//! product list, so the built-in catalog can be swapped for one loaded from
//! a file (the CLI reads YAML) or fetched from elsewhere.

use std::collections::HashSet;

use myhygia_core::ProductId;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors raised while assembling a catalog.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum CatalogError {
    #[error("duplicate product id: {0}")]
    DuplicateId(ProductId),
    #[error("duplicate product slug: {0}")]
    DuplicateSlug(String),
}

/// A purchasable product.
///
/// Only `id`, `name`, `price` and `image` are snapshotted into cart lines;
/// the rest is descriptive.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Product {
    pub id: ProductId,
    pub name: String,
    pub slug: String,
    pub category: String,
    #[serde(with = "rust_decimal::serde::float")]
    pub price: Decimal,
    #[serde(default, with = "rust_decimal::serde::float_option")]
    pub old_price: Option<Decimal>,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub features: Vec<String>,
    pub image: String,
    #[serde(default)]
    pub images: Vec<String>,
    #[serde(default)]
    pub badge: Option<String>,
    #[serde(default = "default_true")]
    pub in_stock: bool,
    #[serde(default)]
    pub featured: bool,
}

const fn default_true() -> bool {
    true
}

/// A product category used for filtering.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Category {
    pub id: &'static str,
    pub name: &'static str,
    pub slug: &'static str,
}

/// Categories shown in the shop navigation.
pub const CATEGORIES: &[Category] = &[
    Category {
        id: "all",
        name: "Tous les produits",
        slug: "tous",
    },
    Category {
        id: "fantaisie",
        name: "Calots Fantaisie",
        slug: "fantaisie",
    },
    Category {
        id: "chirurgicaux",
        name: "Calots Chirurgicaux",
        slug: "chirurgicaux",
    },
];

/// Read-only product lookup.
pub trait ProductCatalog {
    /// All products, in catalog order.
    fn products(&self) -> &[Product];

    /// Look up a product by its id.
    fn product_by_id(&self, id: ProductId) -> Option<&Product> {
        self.products().iter().find(|p| p.id == id)
    }

    /// Look up a product by its URL slug.
    fn product_by_slug(&self, slug: &str) -> Option<&Product> {
        self.products().iter().find(|p| p.slug == slug)
    }

    /// Products flagged for the home page.
    fn featured_products(&self) -> Vec<&Product> {
        self.products().iter().filter(|p| p.featured).collect()
    }

    /// Products whose category contains `category`, case-insensitively.
    ///
    /// `all` and `tous` return every product.
    fn products_by_category(&self, category: &str) -> Vec<&Product> {
        if category == "all" || category == "tous" {
            return self.products().iter().collect();
        }
        let needle = category.to_lowercase();
        self.products()
            .iter()
            .filter(|p| p.category.to_lowercase().contains(&needle))
            .collect()
    }
}

/// A catalog held entirely in memory.
#[derive(Debug, Clone)]
pub struct InMemoryCatalog {
    products: Vec<Product>,
}

impl InMemoryCatalog {
    /// Build a catalog, rejecting duplicate ids or slugs.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError` if two products share an id or a slug.
    pub fn new(products: Vec<Product>) -> Result<Self, CatalogError> {
        let mut ids = HashSet::new();
        let mut slugs = HashSet::new();
        for product in &products {
            if !ids.insert(product.id) {
                return Err(CatalogError::DuplicateId(product.id));
            }
            if !slugs.insert(product.slug.as_str()) {
                return Err(CatalogError::DuplicateSlug(product.slug.clone()));
            }
        }
        Ok(Self { products })
    }

    /// The shop's built-in caps.
    #[must_use]
    pub fn builtin() -> Self {
        Self {
            products: builtin_products(),
        }
    }
}

impl ProductCatalog for InMemoryCatalog {
    fn products(&self) -> &[Product] {
        &self.products
    }
}

#[allow(clippy::too_many_lines)]
fn builtin_products() -> Vec<Product> {
    let cap = |id: u32,
               name: &str,
               slug: &str,
               category: &str,
               description: &str,
               features: &[&str],
               badge: Option<&str>| {
        let image = format!("assets/images/calots/calot-{id}.jpeg");
        Product {
            id: ProductId::new(id),
            name: name.to_string(),
            slug: slug.to_string(),
            category: category.to_string(),
            price: Decimal::from(25),
            old_price: None,
            description: description.to_string(),
            features: features.iter().map(|f| (*f).to_string()).collect(),
            images: vec![image.clone()],
            image,
            badge: badge.map(str::to_string),
            in_stock: true,
            featured: true,
        }
    };

    vec![
        cap(
            1,
            "Calot Médical Floral Élégant",
            "calot-floral-elegant",
            "Calots Fantaisie",
            "Calot médical élégant avec motif floral délicat, parfait pour apporter une touche \
             de fraîcheur et de féminité à votre tenue professionnelle. Conçu pour un confort \
             optimal durant les longues heures de travail.",
            &[
                "Tissu 100% coton respirant",
                "Élastique ajustable à l'arrière",
                "Lavable en machine à 60°C",
                "Séchage rapide",
                "Taille unique ajustable",
            ],
            Some("Populaire"),
        ),
        cap(
            2,
            "Calot Médical Motifs Tendance",
            "calot-motifs-tendance",
            "Calots Fantaisie",
            "Calot médical avec motifs modernes et tendance. Idéal pour les professionnels de \
             santé souhaitant allier style et fonctionnalité au quotidien.",
            &[
                "Tissu polyester-coton durable",
                "Coupe ajustée confortable",
                "Résistant aux lavages fréquents",
                "Couleurs stables",
                "Taille unique",
            ],
            Some("Promo"),
        ),
        cap(
            3,
            "Calot Chirurgical Classique",
            "calot-chirurgical-classique",
            "Calots Chirurgicaux",
            "Calot chirurgical au design classique et professionnel. Parfait pour les blocs \
             opératoires et tous les environnements de soins où l'hygiène est primordiale.",
            &[
                "Tissu anti-microbien",
                "Absorption optimale de la transpiration",
                "Bandeau absorbant intégré",
                "Attaches ajustables",
                "Certifié pour usage médical",
            ],
            None,
        ),
        cap(
            4,
            "Calot Médical Design Original",
            "calot-design-original",
            "Calots Fantaisie",
            "Calot médical au design original et coloré, parfait pour apporter de la bonne \
             humeur dans les services de soins, notamment en pédiatrie.",
            &[
                "Design original et amusant",
                "Tissu doux et confortable",
                "Idéal pour la pédiatrie",
                "Lavable à 40°C",
                "Taille unique ajustable",
            ],
            Some("Nouveau"),
        ),
    ]
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_lookup_by_id() {
        let catalog = InMemoryCatalog::builtin();
        let product = catalog.product_by_id(ProductId::new(3)).unwrap();
        assert_eq!(product.slug, "calot-chirurgical-classique");
        assert_eq!(product.price, Decimal::from(25));
        assert!(catalog.product_by_id(ProductId::new(99)).is_none());
    }

    #[test]
    fn test_lookup_by_slug() {
        let catalog = InMemoryCatalog::builtin();
        let product = catalog.product_by_slug("calot-design-original").unwrap();
        assert_eq!(product.id, ProductId::new(4));
        assert_eq!(product.image, "assets/images/calots/calot-4.jpeg");
    }

    #[test]
    fn test_products_by_category() {
        let catalog = InMemoryCatalog::builtin();
        assert_eq!(catalog.products_by_category("all").len(), 4);
        assert_eq!(catalog.products_by_category("tous").len(), 4);
        assert_eq!(catalog.products_by_category("FANTAISIE").len(), 3);
        assert_eq!(catalog.products_by_category("chirurgicaux").len(), 1);
        assert!(catalog.products_by_category("bonnets").is_empty());
    }

    #[test]
    fn test_featured_products() {
        let catalog = InMemoryCatalog::builtin();
        assert_eq!(catalog.featured_products().len(), 4);
    }

    #[test]
    fn test_duplicate_id_rejected() {
        let mut products = builtin_products();
        let mut copy = products.first().unwrap().clone();
        copy.slug = "another-slug".to_string();
        products.push(copy);
        assert_eq!(
            InMemoryCatalog::new(products).unwrap_err(),
            CatalogError::DuplicateId(ProductId::new(1))
        );
    }

    #[test]
    fn test_duplicate_slug_rejected() {
        let mut products = builtin_products();
        let mut copy = products.get(1).unwrap().clone();
        copy.id = ProductId::new(42);
        products.push(copy);
        assert!(matches!(
            InMemoryCatalog::new(products),
            Err(CatalogError::DuplicateSlug(slug)) if slug == "calot-motifs-tendance"
        ));
    }

    #[test]
    fn test_categories_include_all() {
        assert!(CATEGORIES.iter().any(|c| c.slug == "tous"));
    }
}
