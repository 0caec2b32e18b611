//! Catalog attributes for display.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::FetchError;
use crate::ids::ProductId;
use crate::money::Money;

/// Display attributes of a product. Carries no quantity.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CatalogProduct {
    pub id: ProductId,
    pub title: String,
    pub price: Money,
    /// Image URL.
    pub image: String,
}

/// Source of catalog attributes.
#[async_trait]
pub trait CatalogLookup: Send + Sync {
    async fn get_product(&self, product_id: &ProductId) -> Result<CatalogProduct, FetchError>;
}
