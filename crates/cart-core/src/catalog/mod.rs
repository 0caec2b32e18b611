//! Catalog collaborators.
//!
//! Contains the stock and product lookup contracts the cart consults, plus an
//! in-memory implementation of both.

mod inventory;
mod memory;
mod product;

pub use inventory::{Stock, StockOracle};
pub use memory::InMemoryCatalog;
pub use product::{CatalogLookup, CatalogProduct};
