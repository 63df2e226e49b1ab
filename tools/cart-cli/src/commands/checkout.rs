//! Checkout and order history.

use anyhow::{Context as _, Result};
use cart_core::prelude::*;

use super::{CheckoutArgs, OrdersArgs};
use crate::context::{resolve_owner, Context};
use crate::output::{format_price, format_timestamp};

/// Gateway for payments confirmed before the CLI runs.
///
/// The storefront collects the card; the CLI only receives the processor's
/// reference and hands it on.
struct ReferenceGateway {
    reference: String,
}

impl PaymentGateway for ReferenceGateway {
    fn confirm(&self, request: &PaymentRequest) -> Result<PaymentConfirmation, PaymentError> {
        let reference = self.reference.trim();
        if reference.is_empty() {
            return Err(PaymentError::Declined("no payment reference given".into()));
        }
        tracing::debug!(owner = %request.owner_id, amount = %request.amount, reference, "payment reference accepted");
        Ok(PaymentConfirmation {
            reference: reference.to_string(),
        })
    }
}

/// Run the checkout command.
pub fn run(args: CheckoutArgs, ctx: &Context) -> Result<()> {
    let mut store = ctx.open_store()?;
    let owner = resolve_owner(args.owner.as_deref(), store.active_owner())?;
    let symbol = &ctx.config.display.currency_symbol;

    let address = ShippingAddress::new(args.address, args.city, args.postal_code, args.country);
    let totals = store.totals(&owner);

    if !args.yes && !ctx.output.is_json() && !totals.is_empty() && address.is_complete() {
        ctx.output.header(&format!("Checkout for {}", owner));
        ctx.output.kv("Items", &totals.item_count.to_string());
        ctx.output.kv("Total", &totals.display_subtotal(symbol));
        ctx.output.kv("Ship to", &address.one_line());
        if !ctx.output.confirm("Place order?", true)? {
            ctx.output.warn("Checkout cancelled");
            return Ok(());
        }
    }

    let gateway = ReferenceGateway {
        reference: args.payment_ref,
    };
    let orders = ctx.open_orders()?;
    let receipt = checkout(&mut store, &owner, address, &gateway, &orders)?;

    if ctx.output.is_json() {
        ctx.output.json(&receipt);
        return Ok(());
    }

    ctx.output.success(&format!(
        "Order {} placed: {}",
        receipt.order_id,
        format_price(symbol, receipt.submission.total)
    ));
    ctx.output.kv("Payment", &receipt.submission.payment_reference);
    Ok(())
}

/// Run the orders command.
pub fn orders(args: OrdersArgs, ctx: &Context) -> Result<()> {
    let store = ctx.open_store()?;
    let owner = resolve_owner(args.owner.as_deref(), store.active_owner())?;

    let mut receipts = ctx
        .open_orders()?
        .history(&owner)
        .context("Failed to read order history")?;
    if let Some(limit) = args.limit {
        let skip = receipts.len().saturating_sub(limit);
        receipts.drain(..skip);
    }

    if ctx.output.is_json() {
        ctx.output.json(&receipts);
        return Ok(());
    }

    ctx.output.header(&format!("Orders for {}", owner));
    if receipts.is_empty() {
        ctx.output.info("No orders yet");
        return Ok(());
    }

    let symbol = &ctx.config.display.currency_symbol;
    let widths = [12, 18, 6, 10];
    ctx.output
        .table_row(&["ORDER", "PLACED", "ITEMS", "TOTAL"], &widths);
    for receipt in &receipts {
        let placed = format_timestamp(&receipt.placed_at);
        let items = receipt.submission.item_count.to_string();
        let total = format_price(symbol, receipt.submission.total);
        ctx.output.table_row(
            &[receipt.order_id.as_str(), &placed, &items, &total],
            &widths,
        );
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal::Decimal;

    fn request() -> PaymentRequest {
        PaymentRequest {
            owner_id: OwnerId::new("u"),
            amount: Decimal::new(2498, 2),
            item_count: 3,
        }
    }

    #[test]
    fn test_reference_gateway_passes_reference() {
        let gateway = ReferenceGateway {
            reference: " pi_42 ".into(),
        };
        assert_eq!(gateway.confirm(&request()).unwrap().reference, "pi_42");
    }

    #[test]
    fn test_reference_gateway_declines_blank() {
        let gateway = ReferenceGateway {
            reference: "   ".into(),
        };
        assert!(matches!(
            gateway.confirm(&request()),
            Err(PaymentError::Declined(_))
        ));
    }
}
