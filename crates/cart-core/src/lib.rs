//! Shopping cart state machine for a storefront.
//!
//! This crate tracks which products a shopper has selected and in what
//! amounts, validates amounts against reported stock, and keeps a durable
//! copy of the cart in sync with memory:
//!
//! - **Cart**: ordered entries with unique product ids and amounts >= 1
//! - **Machine**: `add_product`, `remove_product`, `update_product_amount`
//! - **Catalog**: the stock and catalog lookup contracts the machine consults
//!
//! # Example
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use cart_core::prelude::*;
//! use cart_store::MemoryStore;
//!
//! let catalog = Arc::new(
//!     InMemoryCatalog::new().with_product(1u64, "Runner", Money::new(1000, Currency::USD), 5),
//! );
//! let store = Arc::new(MemoryStore::new());
//! let cart = CartMachine::load(store, catalog.clone(), catalog, CartConfig::default())?;
//!
//! cart.add_product(&ProductId::from(1u64)).await?;
//! assert_eq!(cart.snapshot().item_count(), 1);
//! ```

pub mod catalog;
pub mod cart;
pub mod config;
pub mod error;
pub mod ids;
pub mod money;

pub use cart::{Cart, CartEntry, CartMachine};
pub use config::CartConfig;
pub use error::{CartError, CartOperation, FetchError};
pub use ids::ProductId;
pub use money::{Currency, Money};

/// Prelude for convenient imports.
pub mod prelude {
    pub use crate::cart::{Cart, CartEntry, CartMachine};
    pub use crate::catalog::{CatalogLookup, CatalogProduct, InMemoryCatalog, Stock, StockOracle};
    pub use crate::config::CartConfig;
    pub use crate::error::{CartError, CartOperation, FetchError};
    pub use crate::ids::ProductId;
    pub use crate::money::{Currency, Money};
}
