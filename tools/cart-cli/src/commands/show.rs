//! Show the cart.

use anyhow::Result;

use super::print_cart;
use crate::context::Context;

/// Run the show command.
pub async fn run(ctx: &Context) -> Result<()> {
    let machine = ctx.machine(ctx.client()?)?;
    print_cart(ctx, &machine.snapshot(), machine.total());
    Ok(())
}
