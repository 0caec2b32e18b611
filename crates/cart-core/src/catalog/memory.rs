//! In-memory catalog and stock source.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::RwLock;
use std::time::Duration;

use async_trait::async_trait;

use super::{CatalogLookup, CatalogProduct, Stock, StockOracle};
use crate::error::FetchError;
use crate::ids::ProductId;
use crate::money::Money;

/// Catalog and stock held in process memory.
///
/// Serves local demos and tests. Lookups can be delayed, and the whole
/// source can be switched offline to exercise fetch failures.
#[derive(Debug, Default)]
pub struct InMemoryCatalog {
    products: RwLock<HashMap<ProductId, (CatalogProduct, Stock)>>,
    latency: Option<Duration>,
    offline: AtomicBool,
    stock_calls: AtomicUsize,
    catalog_calls: AtomicUsize,
}

impl InMemoryCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Delay every lookup by `latency`.
    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = Some(latency);
        self
    }

    /// Add a product with its stock level.
    pub fn with_product(
        self,
        id: impl Into<ProductId>,
        title: impl Into<String>,
        price: Money,
        stock: i64,
    ) -> Self {
        let id = id.into();
        let product = CatalogProduct {
            id: id.clone(),
            title: title.into(),
            price,
            image: format!("https://img.example/{id}.jpg"),
        };
        if let Ok(mut products) = self.products.write() {
            products.insert(id, (product, Stock::new(stock)));
        }
        self
    }

    /// Change the stock level of a known product.
    pub fn set_stock(&self, id: &ProductId, amount: i64) {
        if let Ok(mut products) = self.products.write() {
            if let Some((_, stock)) = products.get_mut(id) {
                *stock = Stock::new(amount);
            }
        }
    }

    /// Make every lookup fail with a connection error.
    pub fn set_offline(&self, offline: bool) {
        self.offline.store(offline, Ordering::SeqCst);
    }

    /// Number of stock lookups served or refused so far.
    pub fn stock_calls(&self) -> usize {
        self.stock_calls.load(Ordering::SeqCst)
    }

    /// Number of catalog lookups served or refused so far.
    pub fn catalog_calls(&self) -> usize {
        self.catalog_calls.load(Ordering::SeqCst)
    }

    async fn lookup(&self, id: &ProductId) -> Result<(CatalogProduct, Stock), FetchError> {
        if let Some(latency) = self.latency {
            tokio::time::sleep(latency).await;
        }
        if self.offline.load(Ordering::SeqCst) {
            return Err(FetchError::Connection("catalog offline".to_string()));
        }
        let products = self
            .products
            .read()
            .map_err(|_| FetchError::Request("catalog lock poisoned".to_string()))?;
        products
            .get(id)
            .cloned()
            .ok_or_else(|| FetchError::NotFound(id.to_string()))
    }
}

#[async_trait]
impl StockOracle for InMemoryCatalog {
    async fn get_stock(&self, product_id: &ProductId) -> Result<Stock, FetchError> {
        self.stock_calls.fetch_add(1, Ordering::SeqCst);
        self.lookup(product_id).await.map(|(_, stock)| stock)
    }
}

#[async_trait]
impl CatalogLookup for InMemoryCatalog {
    async fn get_product(&self, product_id: &ProductId) -> Result<CatalogProduct, FetchError> {
        self.catalog_calls.fetch_add(1, Ordering::SeqCst);
        self.lookup(product_id).await.map(|(product, _)| product)
    }
}
