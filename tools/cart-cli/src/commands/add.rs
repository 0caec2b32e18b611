//! Add a product to the cart.

use anyhow::Result;
use cart_core::{CartOperation, ProductId};

use super::{print_cart, rejected, AddArgs};
use crate::context::Context;

/// Run the add command.
pub async fn run(args: AddArgs, ctx: &Context) -> Result<()> {
    let machine = ctx.machine(ctx.client()?)?;
    let id = ProductId::from(args.id);

    machine
        .add_product(&id)
        .await
        .map_err(|e| rejected(CartOperation::Add, e))?;

    let cart = machine.snapshot();
    if let Some(entry) = cart.get(&id) {
        ctx.output.success(&format!("{} (x{})", entry.title, entry.amount));
    }
    print_cart(ctx, &cart, machine.total());
    Ok(())
}
