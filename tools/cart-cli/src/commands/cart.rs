//! Cart editing and viewing commands.

use anyhow::{Context as _, Result};
use cart_core::prelude::*;
use rust_decimal::Decimal;
use serde::Serialize;

use super::{AddArgs, ClearArgs, RemoveArgs, UpdateArgs, ViewArgs};
use crate::context::{resolve_owner, Context};
use crate::output::format_price;

/// Run the add command.
pub fn add(args: AddArgs, ctx: &Context) -> Result<()> {
    let mut store = ctx.open_store()?;
    let owner = resolve_owner(args.owner.as_deref(), store.active_owner())?;

    let price = parse_price(&args.price)?;
    let mut product = ProductSnapshot::new(
        args.product_id.as_str(),
        args.name.unwrap_or_else(|| args.product_id.clone()),
        price,
    );
    if let Some(category) = args.category {
        product = product.with_category(category);
    }
    if let Some(image) = args.image {
        product = product.with_image(image);
    }
    if let Some(stock) = args.stock {
        product = product.with_stock(stock);
    }
    if !product.in_stock() {
        ctx.output
            .warn(&format!("{} is out of stock; nothing added", args.product_id));
        return Ok(());
    }

    let quantity = clamp_requested(args.quantity, args.stock, ctx);
    let change = store.add(&owner, product, quantity);

    let msg = match change {
        CartChange::Merged { quantity } => {
            format!("{} now has {} x {}", owner, quantity, args.product_id)
        }
        _ => format!("Added {} x {} for {}", quantity, args.product_id, owner),
    };
    ctx.output.change(&change, &msg);
    Ok(())
}

/// Run the remove command.
pub fn remove(args: RemoveArgs, ctx: &Context) -> Result<()> {
    let mut store = ctx.open_store()?;
    let owner = resolve_owner(args.owner.as_deref(), store.active_owner())?;

    let change = store.remove(&owner, &ProductId::new(args.product_id.as_str()));
    ctx.output
        .change(&change, &format!("Removed {} for {}", args.product_id, owner));
    Ok(())
}

/// Run the update command.
pub fn update(args: UpdateArgs, ctx: &Context) -> Result<()> {
    let mut store = ctx.open_store()?;
    let owner = resolve_owner(args.owner.as_deref(), store.active_owner())?;

    // Zero or less removes the line, so only positive quantities are clamped.
    let quantity = if args.quantity > 0 {
        clamp_requested(args.quantity, args.stock, ctx)
    } else {
        args.quantity
    };
    let change = store.update_quantity(&owner, &ProductId::new(args.product_id.as_str()), quantity);

    let msg = match change {
        CartChange::Removed => format!("Removed {} for {}", args.product_id, owner),
        _ => format!("Set {} to {} for {}", args.product_id, quantity, owner),
    };
    ctx.output.change(&change, &msg);
    Ok(())
}

/// Run the clear command.
pub fn clear(args: ClearArgs, ctx: &Context) -> Result<()> {
    let mut store = ctx.open_store()?;

    let scope = if args.all {
        None
    } else {
        Some(resolve_owner(args.owner.as_deref(), store.active_owner())?)
    };

    if !args.yes && !ctx.output.is_json() {
        let prompt = match &scope {
            Some(owner) => format!("Clear the cart for {}?", owner),
            None => "Clear every cart?".to_string(),
        };
        if !ctx.output.confirm(&prompt, scope.is_some())? {
            ctx.output.warn("Clear cancelled");
            return Ok(());
        }
    }

    let change = store.clear(scope.as_ref());
    let lines = match change {
        CartChange::Cleared { lines } => lines,
        _ => 0,
    };
    ctx.output
        .change(&change, &format!("Cleared {} line(s)", lines));
    Ok(())
}

/// An owner's cart as printed by `show --json`.
#[derive(Serialize)]
struct CartView<'a> {
    owner_id: &'a OwnerId,
    lines: Vec<&'a CartLine>,
    totals: CartTotals,
}

/// Run the show command.
pub fn show(args: ViewArgs, ctx: &Context) -> Result<()> {
    let store = ctx.open_store()?;
    let owner = resolve_owner(args.owner.as_deref(), store.active_owner())?;
    let lines = store.lines_for(&owner);
    let totals = store.totals(&owner);

    if ctx.output.is_json() {
        ctx.output.json(&CartView {
            owner_id: &owner,
            lines,
            totals,
        });
        return Ok(());
    }

    ctx.output.header(&format!("Cart for {}", owner));
    if lines.is_empty() {
        ctx.output.info("Your cart is empty");
        return Ok(());
    }

    let symbol = &ctx.config.display.currency_symbol;
    let widths = [16, 24, 5, 10, 10];
    ctx.output
        .table_row(&["PRODUCT", "NAME", "QTY", "PRICE", "TOTAL"], &widths);
    for line in &lines {
        let quantity = line.quantity.to_string();
        let price = format_price(symbol, line.product.price);
        let total = format_price(symbol, line.line_total());
        ctx.output.table_row(
            &[
                line.product.id.as_str(),
                &line.product.name,
                &quantity,
                &price,
                &total,
            ],
            &widths,
        );
    }

    ctx.output.info("");
    ctx.output.kv("Items", &totals.item_count.to_string());
    ctx.output
        .kv("Subtotal", &totals.display_subtotal(symbol));
    Ok(())
}

/// Run the totals command.
pub fn totals(args: ViewArgs, ctx: &Context) -> Result<()> {
    let store = ctx.open_store()?;
    let owner = resolve_owner(args.owner.as_deref(), store.active_owner())?;
    let totals = store.totals(&owner);

    if ctx.output.is_json() {
        ctx.output.json(&totals);
        return Ok(());
    }

    ctx.output.kv("Items", &totals.item_count.to_string());
    ctx.output.kv("Lines", &totals.line_count.to_string());
    ctx.output.kv(
        "Subtotal",
        &totals.display_subtotal(&ctx.config.display.currency_symbol),
    );
    Ok(())
}

fn parse_price(raw: &str) -> Result<Decimal> {
    raw.trim()
        .parse::<Decimal>()
        .with_context(|| format!("Invalid price: {}", raw))
}

fn clamp_requested(requested: i64, stock: Option<i64>, ctx: &Context) -> i64 {
    let Some(stock) = stock else {
        return requested;
    };
    let clamped = clamp_to_stock(requested, Some(stock));
    if clamped != requested {
        ctx.output.warn(&format!(
            "Quantity {} adjusted to {} ({} in stock)",
            requested, clamped, stock
        ));
    }
    clamped
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::CliConfig;
    use crate::output::Output;

    fn context(dir: &std::path::Path) -> Context {
        Context {
            config: CliConfig::default(),
            output: Output::new(false, true),
            cwd: dir.to_path_buf(),
            config_path: None,
        }
    }

    fn add_args(product_id: &str, quantity: i64, stock: Option<i64>) -> AddArgs {
        AddArgs {
            product_id: product_id.to_string(),
            price: "2.50".to_string(),
            name: None,
            quantity,
            stock,
            category: None,
            image: None,
            owner: Some("alice".to_string()),
        }
    }

    #[test]
    fn test_add_skips_out_of_stock_products() {
        let dir = tempfile::tempdir().unwrap();
        let ctx = context(dir.path());
        let alice = OwnerId::new("alice");

        add(add_args("gone", 1, Some(0)), &ctx).unwrap();
        add(add_args("few", 9, Some(3)), &ctx).unwrap();

        let store = ctx.open_store().unwrap();
        assert!(store.state().line(&alice, &ProductId::new("gone")).is_none());
        assert_eq!(store.totals(&alice).item_count, 3);
    }

    #[test]
    fn test_parse_price() {
        assert_eq!(parse_price("9.99").unwrap(), Decimal::new(999, 2));
        assert_eq!(parse_price(" 5 ").unwrap(), Decimal::new(5, 0));
        assert!(parse_price("five").is_err());
    }
}
