//! The cart state machine.
//!
//! [`CartMachine`] owns the canonical cart. Mutations are serialized through
//! an async mutex held across the whole read, fetch, validate, persist and
//! commit sequence, so two operations on the same cart never interleave.
//! Readers don't contend for that lock: each committed cart is published on
//! a `watch` channel.
//!
//! A new cart is written to the durable store before it becomes canonical.
//! If the write fails the operation is rejected and memory is untouched, so
//! the stored text always equals the serialization of the last committed
//! cart.

use std::future::Future;
use std::sync::Arc;

use cart_store::DurableStore;
use tokio::sync::{watch, Mutex};

use crate::cart::Cart;
use crate::catalog::{CatalogLookup, CatalogProduct, Stock, StockOracle};
use crate::config::CartConfig;
use crate::error::{CartError, CartOperation, FetchError};
use crate::ids::ProductId;
use crate::money::Money;

/// Shopping cart with stock validation and durable persistence.
///
/// # Example
///
/// ```rust,ignore
/// let machine = CartMachine::load(store, stock, catalog, CartConfig::default())?;
///
/// machine.add_product(&ProductId::from(1u64)).await?;
/// machine.update_product_amount(&ProductId::from(1u64), 3).await?;
///
/// for entry in machine.snapshot().entries() {
///     println!("{} x{}", entry.title, entry.amount);
/// }
/// ```
pub struct CartMachine {
    cart: Mutex<Cart>,
    published: watch::Sender<Cart>,
    store: Arc<dyn DurableStore>,
    stock: Arc<dyn StockOracle>,
    catalog: Arc<dyn CatalogLookup>,
    config: CartConfig,
}

impl CartMachine {
    /// Restore the cart from the store, or start empty if nothing is stored.
    ///
    /// Stored text that does not decode into a valid cart fails with
    /// [`CartError::CorruptState`]; it is never replaced by an empty cart.
    pub fn load(
        store: Arc<dyn DurableStore>,
        stock: Arc<dyn StockOracle>,
        catalog: Arc<dyn CatalogLookup>,
        config: CartConfig,
    ) -> Result<Self, CartError> {
        let cart = match store.read(&config.storage_key)? {
            Some(text) => Cart::from_json(&text).inspect_err(|e| {
                tracing::error!(key = %config.storage_key, error = %e, "stored cart is corrupt");
            })?,
            None => Cart::new(),
        };
        tracing::debug!(
            key = %config.storage_key,
            entries = cart.len(),
            "cart loaded"
        );

        let (published, _) = watch::channel(cart.clone());
        Ok(Self {
            cart: Mutex::new(cart),
            published,
            store,
            stock,
            catalog,
            config,
        })
    }

    /// Current committed cart.
    pub fn snapshot(&self) -> Cart {
        self.published.borrow().clone()
    }

    /// Receiver notified after every accepted mutation.
    pub fn subscribe(&self) -> watch::Receiver<Cart> {
        self.published.subscribe()
    }

    /// Sum of entry subtotals in the configured currency.
    pub fn total(&self) -> Option<Money> {
        self.published.borrow().total(self.config.currency)
    }

    pub fn config(&self) -> &CartConfig {
        &self.config
    }

    /// Add one unit of `product_id`, inserting it at amount 1 if absent.
    ///
    /// Catalog attributes and stock are fetched concurrently and both must
    /// succeed before the cart changes.
    #[tracing::instrument(skip_all, fields(product_id = %product_id))]
    pub async fn add_product(&self, product_id: &ProductId) -> Result<(), CartError> {
        let result = async {
            let mut cart = self.cart.lock().await;
            let (product, stock) = tokio::try_join!(
                self.fetch_product(product_id),
                self.fetch_stock(product_id)
            )?;
            let next = cart.with_added(product, stock)?;
            self.commit(&mut cart, next)
        }
        .await;
        report(CartOperation::Add, &result);
        result
    }

    /// Delete the entry for `product_id`, whatever its amount.
    ///
    /// Purely local: no stock or catalog lookup is made.
    #[tracing::instrument(skip_all, fields(product_id = %product_id))]
    pub async fn remove_product(&self, product_id: &ProductId) -> Result<(), CartError> {
        let result = async {
            let mut cart = self.cart.lock().await;
            let next = cart.without(product_id)?;
            self.commit(&mut cart, next)
        }
        .await;
        report(CartOperation::Remove, &result);
        result
    }

    /// Set the amount of an existing entry to exactly `amount`.
    ///
    /// A non-positive `amount` is a no-op: no lookup, no write, no error.
    /// Use [`remove_product`](Self::remove_product) to delete an entry.
    #[tracing::instrument(skip_all, fields(product_id = %product_id, amount = amount))]
    pub async fn update_product_amount(
        &self,
        product_id: &ProductId,
        amount: i64,
    ) -> Result<(), CartError> {
        if amount <= 0 {
            tracing::debug!(amount, "non-positive amount ignored");
            return Ok(());
        }

        let result = async {
            let mut cart = self.cart.lock().await;
            if cart.get(product_id).is_none() {
                return Err(CartError::NotFound(product_id.clone()));
            }
            let stock = self.fetch_stock(product_id).await?;
            let next = cart.with_amount(product_id, amount, stock)?;
            self.commit(&mut cart, next)
        }
        .await;
        report(CartOperation::UpdateAmount, &result);
        result
    }

    async fn fetch_stock(&self, product_id: &ProductId) -> Result<Stock, CartError> {
        let stock = self
            .bounded("stock", product_id, self.stock.get_stock(product_id))
            .await?;
        tracing::debug!(available = stock.amount, "stock fetched");
        Ok(stock)
    }

    async fn fetch_product(&self, product_id: &ProductId) -> Result<CatalogProduct, CartError> {
        let product = self
            .bounded("catalog", product_id, self.catalog.get_product(product_id))
            .await?;
        if &product.id != product_id {
            return Err(FetchError::Deserialization(format!(
                "catalog returned product {} for {}",
                product.id, product_id
            ))
            .into());
        }
        Ok(product)
    }

    async fn bounded<T>(
        &self,
        what: &str,
        product_id: &ProductId,
        fetch: impl Future<Output = Result<T, FetchError>>,
    ) -> Result<T, FetchError> {
        let timeout = self.config.fetch_timeout();
        match tokio::time::timeout(timeout, fetch).await {
            Ok(result) => result,
            Err(_) => Err(FetchError::Timeout(format!(
                "{what} lookup for {product_id} exceeded {timeout:?}"
            ))),
        }
    }

    /// Persist `next`, then make it canonical.
    fn commit(&self, current: &mut Cart, next: Cart) -> Result<(), CartError> {
        let text = next.to_json()?;
        self.store
            .write(&self.config.storage_key, &text)
            .map_err(|e| {
                tracing::error!(key = %self.config.storage_key, error = %e, "cart write failed");
                CartError::Store(e)
            })?;
        tracing::debug!(key = %self.config.storage_key, bytes = text.len(), "cart persisted");

        *current = next.clone();
        self.published.send_replace(next);
        Ok(())
    }
}

fn report(operation: CartOperation, result: &Result<(), CartError>) {
    match result {
        Ok(()) => tracing::info!(%operation, "cart updated"),
        Err(e @ (CartError::OutOfStock { .. } | CartError::NotFound(_))) => {
            tracing::warn!(%operation, error = %e, "cart operation rejected")
        }
        Err(e) => tracing::error!(%operation, error = %e, "cart operation failed"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::InMemoryCatalog;
    use crate::money::Currency;
    use cart_store::MemoryStore;

    const KEY: &str = "cart:v1";

    fn catalog() -> Arc<InMemoryCatalog> {
        Arc::new(
            InMemoryCatalog::new()
                .with_product(1u64, "Runner", Money::new(1000, Currency::USD), 5)
                .with_product(2u64, "Trail", Money::new(2500, Currency::USD), 3),
        )
    }

    fn machine(store: Arc<MemoryStore>, catalog: Arc<InMemoryCatalog>) -> CartMachine {
        CartMachine::load(store, catalog.clone(), catalog, CartConfig::default()).unwrap()
    }

    #[tokio::test]
    async fn test_load_empty_store() {
        let machine = machine(Arc::new(MemoryStore::new()), catalog());
        assert!(machine.snapshot().is_empty());
    }

    #[tokio::test]
    async fn test_load_corrupt_store() {
        let store = Arc::new(MemoryStore::with_value(KEY, "not json"));
        let catalog = catalog();
        let result = CartMachine::load(store, catalog.clone(), catalog, CartConfig::default());
        assert!(matches!(result, Err(CartError::CorruptState(_))));
    }

    #[tokio::test]
    async fn test_add_persists() {
        let store = Arc::new(MemoryStore::new());
        let machine = machine(store.clone(), catalog());

        machine.add_product(&ProductId::from(1u64)).await.unwrap();

        let stored = store.read(KEY).unwrap().unwrap();
        assert_eq!(stored, machine.snapshot().to_json().unwrap());
        assert_eq!(store.writes(), 1);
    }

    #[tokio::test]
    async fn test_subscribe_sees_commits() {
        let machine = machine(Arc::new(MemoryStore::new()), catalog());
        let mut rx = machine.subscribe();

        machine.add_product(&ProductId::from(2u64)).await.unwrap();

        assert!(rx.has_changed().unwrap());
        assert_eq!(rx.borrow_and_update().item_count(), 1);
    }

    #[tokio::test]
    async fn test_rejection_does_not_notify() {
        let machine = machine(Arc::new(MemoryStore::new()), catalog());
        let rx = machine.subscribe();

        let _ = machine.remove_product(&ProductId::from(1u64)).await;

        assert!(!rx.has_changed().unwrap());
    }

    #[tokio::test]
    async fn test_total() {
        let machine = machine(Arc::new(MemoryStore::new()), catalog());
        machine.add_product(&ProductId::from(1u64)).await.unwrap();
        machine.add_product(&ProductId::from(2u64)).await.unwrap();
        machine.add_product(&ProductId::from(2u64)).await.unwrap();

        assert_eq!(machine.total(), Some(Money::new(6000, Currency::USD)));
    }
}
