//! Stock levels.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::FetchError;
use crate::ids::ProductId;

/// Quantity of a product currently available for purchase.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
pub struct Stock {
    /// Units available.
    pub amount: i64,
}

impl Stock {
    pub fn new(amount: i64) -> Self {
        Self { amount }
    }

    /// Check if a specific quantity is available.
    pub fn can_fulfill(&self, quantity: i64) -> bool {
        quantity <= self.amount
    }

    /// Check if out of stock.
    pub fn is_out_of_stock(&self) -> bool {
        self.amount <= 0
    }
}

/// Authoritative, read-only source of stock levels.
///
/// Answers may be stale; the cart treats each answer as a point-in-time bound.
#[async_trait]
pub trait StockOracle: Send + Sync {
    /// Current available quantity for `product_id`.
    async fn get_stock(&self, product_id: &ProductId) -> Result<Stock, FetchError>;
}
