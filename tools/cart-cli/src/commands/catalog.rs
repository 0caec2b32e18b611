//! Browse the catalog.

use anyhow::{Context as _, Result};
use cart_core::catalog::{CatalogLookup, CatalogProduct};
use cart_core::{Money, ProductId};
use serde::Serialize;

use super::CatalogArgs;
use crate::context::Context;
use crate::output::{amount_badge, format_row};

/// Catalog listing row.
#[derive(Debug, Serialize)]
struct CatalogRow {
    id: ProductId,
    title: String,
    price: Money,
    price_formatted: String,
    image: String,
    in_cart: i64,
}

/// Run the catalog command.
pub async fn run(args: CatalogArgs, ctx: &Context) -> Result<()> {
    let client = ctx.client()?;
    let machine = ctx.machine(client.clone())?;

    let products: Vec<CatalogProduct> = if args.ids.is_empty() {
        client
            .list_products()
            .await
            .context("Could not load the catalog")?
    } else {
        let mut products = Vec::with_capacity(args.ids.len());
        for id in args.ids {
            let id = ProductId::from(id);
            let product = client
                .get_product(&id)
                .await
                .with_context(|| format!("Could not load product {}", id))?;
            products.push(product);
        }
        products
    };

    let in_cart = machine.snapshot().amounts();
    let rows: Vec<CatalogRow> = products
        .into_iter()
        .map(|p| CatalogRow {
            in_cart: in_cart.get(&p.id).copied().unwrap_or(0),
            price_formatted: p.price.to_string(),
            id: p.id,
            title: p.title,
            price: p.price,
            image: p.image,
        })
        .collect();

    if ctx.output.is_json() {
        ctx.output.json(&rows);
        return Ok(());
    }

    if rows.is_empty() {
        ctx.output.info("The catalog is empty.");
        return Ok(());
    }

    ctx.output.header("Catalog");
    let widths = [8, 32, 12];
    ctx.output.table_row(&["ID", "PRODUCT", "PRICE", "IN CART"], &[8, 32, 12, 7]);
    for row in &rows {
        // The badge is styled, so it goes after the padded columns.
        println!(
            "  {}  {}",
            format_row(&[row.id.as_str(), &row.title, &row.price_formatted], &widths),
            amount_badge(row.in_cart)
        );
    }
    Ok(())
}
