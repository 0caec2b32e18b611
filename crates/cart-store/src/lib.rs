//! Durable key-value store for persisted cart state.
//!
//! The store holds serialized text under string keys and survives process
//! restarts. Two backends are provided:
//!
//! - [`MemoryStore`] - process-local map, for tests and ephemeral sessions
//! - [`FileStore`] - one file per key under a directory
//!
//! # Example
//!
//! ```rust
//! use cart_store::{DurableStore, MemoryStore};
//!
//! let store = MemoryStore::new();
//!
//! store.write("cart:v1", "[]").unwrap();
//! assert_eq!(store.read("cart:v1").unwrap().as_deref(), Some("[]"));
//! ```

mod error;
mod file;
mod memory;
mod store;

pub use error::StoreError;
pub use file::FileStore;
pub use memory::MemoryStore;
pub use store::DurableStore;

/// Prelude for convenient imports.
pub mod prelude {
    pub use crate::{DurableStore, FileStore, MemoryStore, StoreError};
}
