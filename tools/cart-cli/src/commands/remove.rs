//! Remove a product from the cart.

use anyhow::Result;
use cart_core::{CartOperation, ProductId};

use super::{print_cart, rejected, RemoveArgs};
use crate::context::Context;

/// Run the remove command.
pub async fn run(args: RemoveArgs, ctx: &Context) -> Result<()> {
    let machine = ctx.machine(ctx.client()?)?;
    let id = ProductId::from(args.id);

    machine
        .remove_product(&id)
        .await
        .map_err(|e| rejected(CartOperation::Remove, e))?;

    ctx.output.success(&format!("Removed product {}", id));
    print_cart(ctx, &machine.snapshot(), machine.total());
    Ok(())
}
