//! Cart error types.

use myhygia_core::ProductId;
use thiserror::Error;

use crate::storage::StorageError;

/// Errors returned by cart operations.
///
/// A failed operation never leaves a partial write behind: the store holds
/// either the previous cart or the new one.
#[derive(Debug, Error)]
pub enum CartError {
    /// The product id is not in the catalog.
    #[error("product not found: {0}")]
    UnknownProduct(ProductId),

    /// Quantity is zero (on add) or does not fit a line quantity.
    #[error("invalid quantity: {0}")]
    InvalidQuantity(i64),

    /// A line total, the subtotal or the total does not fit a `Decimal`.
    #[error("cart amount overflow")]
    AmountOverflow,

    /// The backing store rejected the read or write.
    #[error("storage error: {0}")]
    Storage(#[from] StorageError),

    /// The cart could not be serialized.
    #[error("failed to serialize cart: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// Result type alias for `CartError`.
pub type Result<T> = std::result::Result<T, CartError>;
