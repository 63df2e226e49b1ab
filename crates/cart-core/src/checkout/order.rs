//! Order submission types.

use crate::cart::{CartLine, CartTotals};
use crate::checkout::ShippingAddress;
use crate::ids::{OrderId, OwnerId, ProductId};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// One line of an order, copied from a cart line.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct OrderLine {
    /// Product ID.
    pub product_id: ProductId,
    /// Product name at checkout time.
    pub name: String,
    /// Unit price at checkout time.
    #[serde(with = "rust_decimal::serde::str")]
    pub unit_price: Decimal,
    /// Quantity.
    pub quantity: i64,
    /// Unit price times quantity.
    #[serde(with = "rust_decimal::serde::str")]
    pub line_total: Decimal,
}

impl From<&CartLine> for OrderLine {
    fn from(line: &CartLine) -> Self {
        Self {
            product_id: line.product.id.clone(),
            name: line.product.name.clone(),
            unit_price: line.product.price,
            quantity: line.quantity,
            line_total: line.line_total(),
        }
    }
}

/// Amount the payment gateway is asked to charge.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PaymentRequest {
    /// Who is paying.
    pub owner_id: OwnerId,
    /// Amount to charge.
    #[serde(with = "rust_decimal::serde::str")]
    pub amount: Decimal,
    /// Number of items being paid for.
    pub item_count: i64,
}

/// Proof of a successful payment.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct PaymentConfirmation {
    /// Processor reference, e.g. a payment intent id.
    pub reference: String,
}

/// Everything the order service needs to record an order.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct OrderSubmission {
    /// Owner placing the order.
    pub owner_id: OwnerId,
    /// Ordered lines, in cart order.
    pub lines: Vec<OrderLine>,
    /// Sum of quantities.
    pub item_count: i64,
    /// Sum of line totals.
    #[serde(with = "rust_decimal::serde::str")]
    pub subtotal: Decimal,
    /// Shipping charge. Shipping is free.
    #[serde(with = "rust_decimal::serde::str")]
    pub shipping: Decimal,
    /// Subtotal plus shipping.
    #[serde(with = "rust_decimal::serde::str")]
    pub total: Decimal,
    /// Destination.
    pub shipping_address: ShippingAddress,
    /// Payment processor reference.
    pub payment_reference: String,
}

impl OrderSubmission {
    /// Build a submission from an owner's cart lines and totals.
    pub fn from_cart<'a>(
        owner_id: &OwnerId,
        lines: impl IntoIterator<Item = &'a CartLine>,
        totals: &CartTotals,
        shipping_address: ShippingAddress,
        payment: &PaymentConfirmation,
    ) -> Self {
        let shipping = Decimal::ZERO;
        Self {
            owner_id: owner_id.clone(),
            lines: lines.into_iter().map(OrderLine::from).collect(),
            item_count: totals.item_count,
            subtotal: totals.subtotal,
            shipping,
            total: totals.subtotal.saturating_add(shipping),
            shipping_address,
            payment_reference: payment.reference.clone(),
        }
    }
}

/// What the order service returns once an order is recorded.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct OrderReceipt {
    /// Order ID assigned by the service.
    pub order_id: OrderId,
    /// The recorded submission.
    pub submission: OrderSubmission,
    /// When the order was recorded.
    pub placed_at: DateTime<Utc>,
}
