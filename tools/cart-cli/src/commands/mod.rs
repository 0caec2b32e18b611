//! CLI command implementations.

pub mod add;
pub mod catalog;
pub mod remove;
pub mod show;
pub mod update;

use anyhow::anyhow;
use cart_core::{Cart, CartError, CartOperation, Money};
use clap::Args;

use crate::context::Context;

/// Arguments for the add command.
#[derive(Args)]
pub struct AddArgs {
    /// Product ID.
    pub id: String,
}

/// Arguments for the remove command.
#[derive(Args)]
pub struct RemoveArgs {
    /// Product ID.
    pub id: String,
}

/// Arguments for the update command.
#[derive(Args)]
pub struct UpdateArgs {
    /// Product ID.
    pub id: String,

    /// New amount. Zero or less leaves the cart unchanged.
    #[arg(allow_negative_numbers = true)]
    pub amount: i64,
}

/// Arguments for the catalog command.
#[derive(Args)]
pub struct CatalogArgs {
    /// Product IDs to show (default: the whole catalog).
    pub ids: Vec<String>,
}

/// Turn a rejected cart operation into the error shown to the user.
///
/// The notice leads; the underlying cause follows in alternate formatting.
pub(crate) fn rejected(operation: CartOperation, err: CartError) -> anyhow::Error {
    let notice = err.notice(operation);
    anyhow!(err).context(notice)
}

/// Print the cart as a table followed by its total.
pub(crate) fn print_cart(ctx: &Context, cart: &Cart, total: Option<Money>) {
    if ctx.output.is_json() {
        ctx.output.json(&serde_json::json!({
            "entries": cart,
            "item_count": cart.item_count(),
            "total": total,
        }));
        return;
    }

    if cart.is_empty() {
        ctx.output.info("Your cart is empty.");
        return;
    }

    ctx.output.header(&format!("Cart ({} items)", cart.item_count()));
    let widths = [8, 32, 6, 12, 12];
    ctx.output.table_row(&["ID", "PRODUCT", "QTY", "PRICE", "SUBTOTAL"], &widths);
    for entry in cart.entries() {
        let subtotal = entry
            .subtotal()
            .map(|m| m.to_string())
            .unwrap_or_else(|| "-".to_string());
        ctx.output.table_row(
            &[
                entry.id.as_str(),
                &entry.title,
                &entry.amount.to_string(),
                &entry.price.to_string(),
                &subtotal,
            ],
            &widths,
        );
    }

    match total {
        Some(total) => ctx.output.kv("Total", &total.to_string()),
        None => ctx.output.warn("Total unavailable: mixed currencies or overflow"),
    }
}
