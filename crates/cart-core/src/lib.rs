//! Multi-tenant shopping cart state for the storefront.
//!
//! This crate keeps every signed-in user's cart lines in one persisted state
//! while never letting an operation for one owner touch another owner's lines.
//!
//! - **Cart**: owner-scoped add/remove/update/clear, derived totals, and a
//!   store that mirrors state to key-value storage
//! - **Catalog**: product snapshots supplied by the host
//! - **Session**: login/logout hooks
//! - **Checkout**: payment and order hand-off that clears the cart on success
//!
//! # Example
//!
//! ```rust
//! use cart_core::prelude::*;
//! use rust_decimal::Decimal;
//!
//! let mut store = CartStore::in_memory();
//! let alice = OwnerId::new("alice");
//!
//! store.add(&alice, ProductSnapshot::new("a", "Mug", Decimal::new(999, 2)), 2);
//! store.add(&alice, ProductSnapshot::new("b", "Tea", Decimal::new(500, 2)), 1);
//!
//! let totals = store.totals(&alice);
//! assert_eq!(totals.item_count, 3);
//! assert_eq!(totals.subtotal, Decimal::new(2498, 2));
//! ```

pub mod error;
pub mod ids;

pub mod cart;
pub mod catalog;
pub mod checkout;
pub mod session;

pub use error::{CheckoutError, OrderError, PaymentError};
pub use ids::*;

/// Prelude for convenient imports.
pub mod prelude {
    pub use crate::error::{CheckoutError, OrderError, PaymentError};
    pub use crate::ids::*;

    // Cart
    pub use crate::cart::{
        CartChange, CartCommand, CartLine, CartState, CartStore, CartTotals, IgnoredReason,
    };

    // Catalog
    pub use crate::catalog::{clamp_to_stock, ProductSnapshot};

    // Session
    pub use crate::session::IdentityEvent;

    // Checkout
    pub use crate::checkout::{
        checkout, OrderLine, OrderReceipt, OrderService, OrderSubmission, PaymentConfirmation,
        PaymentGateway, PaymentRequest, ShippingAddress, StoredOrderService,
    };
}
