//! Cart error types.

use cart_store::StoreError;
use thiserror::Error;

use crate::ids::ProductId;

/// Errors returned by the stock and catalog collaborators.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FetchError {
    /// The collaborator does not know this product.
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("HTTP error: {status} for {url}")]
    Http { status: u16, url: String },

    #[error("Timeout: {0}")]
    Timeout(String),

    #[error("Connection error: {0}")]
    Connection(String),

    #[error("Deserialization error: {0}")]
    Deserialization(String),

    #[error("Request error: {0}")]
    Request(String),
}

/// Outcome of a rejected cart operation.
///
/// Every variant leaves the cart exactly as it was before the call.
#[derive(Error, Debug)]
pub enum CartError {
    /// Stock or catalog lookup failed, timed out, or was unreachable.
    #[error("Fetch failed: {0}")]
    FetchFailure(#[from] FetchError),

    /// The requested amount exceeds the stock reported for the product.
    #[error("Insufficient stock for {product_id}: requested {requested}, available {available}")]
    OutOfStock {
        product_id: ProductId,
        requested: i64,
        available: i64,
    },

    /// The product is not in the cart.
    #[error("Product not in cart: {0}")]
    NotFound(ProductId),

    /// The persisted cart could not be decoded at load time.
    #[error("Stored cart is corrupt: {0}")]
    CorruptState(String),

    /// Reading or writing the durable store failed.
    #[error("Store error: {0}")]
    Store(#[from] StoreError),
}

/// The public cart operations, used to pick a user-facing notice.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CartOperation {
    Add,
    Remove,
    UpdateAmount,
}

impl CartOperation {
    pub fn as_str(&self) -> &'static str {
        match self {
            CartOperation::Add => "add_product",
            CartOperation::Remove => "remove_product",
            CartOperation::UpdateAmount => "update_product_amount",
        }
    }
}

impl std::fmt::Display for CartOperation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl CartError {
    /// Whether this rejection is the shopper's request exceeding stock.
    pub fn is_out_of_stock(&self) -> bool {
        matches!(self, CartError::OutOfStock { .. })
    }

    /// Short message suitable for showing to the shopper.
    ///
    /// Insufficient stock gets its own notice; every other failure maps to a
    /// generic notice for the operation that was attempted.
    pub fn notice(&self, operation: CartOperation) -> &'static str {
        if self.is_out_of_stock() {
            return "Requested quantity is out of stock";
        }
        match operation {
            CartOperation::Add => "Could not add the product",
            CartOperation::Remove => "Could not remove the product",
            CartOperation::UpdateAmount => "Could not change the product amount",
        }
    }
}
