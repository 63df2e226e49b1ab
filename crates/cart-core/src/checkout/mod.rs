//! Checkout module.
//!
//! Turns an owner's cart into a paid order. Payment and order recording are
//! external services behind [`PaymentGateway`] and [`OrderService`].

mod address;
mod flow;
mod order;

pub use address::ShippingAddress;
pub use flow::{checkout, OrderService, PaymentGateway, StoredOrderService};
pub use order::{OrderLine, OrderReceipt, OrderSubmission, PaymentConfirmation, PaymentRequest};
