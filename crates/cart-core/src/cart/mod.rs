//! Shopping cart module.
//!
//! Contains the cart value type, its transitions, and the state machine that
//! owns the canonical cart.

#[allow(clippy::module_inception)]
mod cart;
mod machine;

pub use cart::{Cart, CartEntry};
pub use machine::CartMachine;
