//! Change the amount of a product in the cart.

use anyhow::Result;
use cart_core::{CartOperation, ProductId};

use super::{print_cart, rejected, UpdateArgs};
use crate::context::Context;

/// Run the update command.
pub async fn run(args: UpdateArgs, ctx: &Context) -> Result<()> {
    let machine = ctx.machine(ctx.client()?)?;
    let id = ProductId::from(args.id);

    if args.amount <= 0 {
        ctx.output.warn("Amount must be at least 1; use `cart remove` to delete a product");
    }

    machine
        .update_product_amount(&id, args.amount)
        .await
        .map_err(|e| rejected(CartOperation::UpdateAmount, e))?;

    print_cart(ctx, &machine.snapshot(), machine.total());
    Ok(())
}
