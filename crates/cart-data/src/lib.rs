//! HTTP stock and catalog lookups with timeouts and retries.
//!
//! This crate provides:
//! - `HttpCatalogClient` - REST client implementing `StockOracle` and `CatalogLookup`
//! - `DependencyTag` - Per-collaborator default budgets
//! - `TimeoutConfig` - Connect and total timeouts
//! - `RetryPolicy` - Retry strategies with backoff

mod client;
mod dependency;
mod retry;
mod timeout;

pub use client::*;
pub use dependency::*;
pub use retry::*;
pub use timeout::*;
