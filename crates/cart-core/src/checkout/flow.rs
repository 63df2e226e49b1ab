//! Checkout hand-off: payment, order submission, cart clearing.

use cart_storage::{cache_key, Backend, Cache};
use chrono::Utc;

use crate::cart::CartStore;
use crate::checkout::{
    OrderReceipt, OrderSubmission, PaymentConfirmation, PaymentRequest, ShippingAddress,
};
use crate::error::{CheckoutError, OrderError, PaymentError};
use crate::ids::{OrderId, OwnerId};

/// Opaque payment processor.
pub trait PaymentGateway {
    /// Charge the requested amount, or say why not.
    fn confirm(&self, request: &PaymentRequest) -> Result<PaymentConfirmation, PaymentError>;
}

/// Service that records orders.
pub trait OrderService {
    /// Record a paid order.
    fn create_order(&self, submission: &OrderSubmission) -> Result<OrderReceipt, OrderError>;
}

/// Check out an owner's cart.
///
/// Validates the cart and address, takes payment, submits the order and then
/// clears the owner's lines. Any failure leaves the cart as it was.
pub fn checkout<B, P, O>(
    store: &mut CartStore<B>,
    owner_id: &OwnerId,
    shipping_address: ShippingAddress,
    gateway: &P,
    orders: &O,
) -> Result<OrderReceipt, CheckoutError>
where
    B: Backend,
    P: PaymentGateway + ?Sized,
    O: OrderService + ?Sized,
{
    let totals = store.totals(owner_id);
    if totals.is_empty() {
        return Err(CheckoutError::EmptyCart(owner_id.to_string()));
    }
    shipping_address.validate()?;

    let request = PaymentRequest {
        owner_id: owner_id.clone(),
        amount: totals.subtotal,
        item_count: totals.item_count,
    };
    let payment = gateway.confirm(&request).map_err(|e| {
        tracing::warn!(owner = %owner_id, error = %e, "payment failed");
        e
    })?;

    let submission = OrderSubmission::from_cart(
        owner_id,
        store.lines_for(owner_id),
        &totals,
        shipping_address,
        &payment,
    );
    let receipt = orders.create_order(&submission).map_err(|e| {
        tracing::error!(owner = %owner_id, payment = %payment.reference, error = %e, "order rejected after payment");
        e
    })?;

    store.clear(Some(owner_id));
    tracing::info!(owner = %owner_id, order = %receipt.order_id, total = %receipt.submission.total, "order placed");
    Ok(receipt)
}

/// Order service that keeps receipts in a cache.
///
/// Receipts live under `order:<id>`; ids are sequential.
#[derive(Debug)]
pub struct StoredOrderService<B> {
    cache: Cache<B>,
}

impl<B: Backend> StoredOrderService<B> {
    /// Record orders into `backend`.
    pub fn new(backend: B) -> Self {
        Self {
            cache: Cache::new(backend),
        }
    }

    /// All receipts for an owner, oldest first.
    pub fn history(&self, owner_id: &OwnerId) -> Result<Vec<OrderReceipt>, OrderError> {
        let mut receipts = Vec::new();
        for key in self.order_keys()? {
            if let Some(receipt) = self.cache.get::<OrderReceipt>(&key)? {
                if &receipt.submission.owner_id == owner_id {
                    receipts.push(receipt);
                }
            }
        }
        receipts.sort_by(|a, b| {
            a.placed_at
                .cmp(&b.placed_at)
                .then_with(|| a.order_id.cmp(&b.order_id))
        });
        Ok(receipts)
    }

    fn order_keys(&self) -> Result<Vec<String>, OrderError> {
        Ok(self
            .cache
            .keys()?
            .into_iter()
            .filter(|k| k.starts_with("order:"))
            .collect())
    }
}

impl<B: Backend> OrderService for StoredOrderService<B> {
    fn create_order(&self, submission: &OrderSubmission) -> Result<OrderReceipt, OrderError> {
        if submission.lines.is_empty() {
            return Err(OrderError::Rejected("order has no lines".into()));
        }

        let next = self.order_keys()?.len() + 1;
        let order_id = OrderId::new(format!("ord-{:06}", next));
        let receipt = OrderReceipt {
            order_id: order_id.clone(),
            submission: submission.clone(),
            placed_at: Utc::now(),
        };
        self.cache.set(&cache_key!("order", order_id), &receipt)?;
        Ok(receipt)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::ProductSnapshot;
    use cart_storage::MemoryBackend;
    use rust_decimal::Decimal;
    use std::cell::Cell;

    struct ApprovingGateway {
        calls: Cell<u32>,
    }

    impl PaymentGateway for ApprovingGateway {
        fn confirm(&self, _request: &PaymentRequest) -> Result<PaymentConfirmation, PaymentError> {
            self.calls.set(self.calls.get() + 1);
            Ok(PaymentConfirmation {
                reference: "pi_test".into(),
            })
        }
    }

    struct DecliningGateway;

    impl PaymentGateway for DecliningGateway {
        fn confirm(&self, _request: &PaymentRequest) -> Result<PaymentConfirmation, PaymentError> {
            Err(PaymentError::Declined("insufficient funds".into()))
        }
    }

    struct RejectingOrders;

    impl OrderService for RejectingOrders {
        fn create_order(&self, _submission: &OrderSubmission) -> Result<OrderReceipt, OrderError> {
            Err(OrderError::Rejected("out of stock".into()))
        }
    }

    fn address() -> ShippingAddress {
        ShippingAddress::new("1 Main St", "Springfield", "12345", "US")
    }

    fn filled_store(owner: &OwnerId) -> CartStore<MemoryBackend> {
        let mut store = CartStore::in_memory();
        store.add(owner, ProductSnapshot::new("a", "Apple", Decimal::new(999, 2)), 2);
        store.add(&OwnerId::new("other"), ProductSnapshot::new("b", "Banana", Decimal::new(100, 2)), 1);
        store
    }

    #[test]
    fn test_successful_checkout_clears_only_owner() {
        let u = OwnerId::new("u");
        let mut store = filled_store(&u);
        let gateway = ApprovingGateway { calls: Cell::new(0) };
        let orders = StoredOrderService::new(MemoryBackend::new());

        let receipt = checkout(&mut store, &u, address(), &gateway, &orders).unwrap();

        assert_eq!(receipt.order_id.as_str(), "ord-000001");
        assert_eq!(receipt.submission.total, Decimal::new(1998, 2));
        assert_eq!(gateway.calls.get(), 1);
        assert!(store.lines_for(&u).is_empty());
        assert_eq!(store.lines_for(&OwnerId::new("other")).len(), 1);
        assert!(receipt.placed_at <= chrono::Utc::now());
        assert_eq!(orders.history(&u).unwrap(), vec![receipt]);
    }

    #[test]
    fn test_empty_cart_is_rejected_before_payment() {
        let mut store = CartStore::in_memory();
        let gateway = ApprovingGateway { calls: Cell::new(0) };
        let orders = StoredOrderService::new(MemoryBackend::new());

        let err = checkout(&mut store, &OwnerId::new("u"), address(), &gateway, &orders).unwrap_err();
        assert!(matches!(err, CheckoutError::EmptyCart(_)));
        assert_eq!(gateway.calls.get(), 0);
    }

    #[test]
    fn test_missing_address_field() {
        let u = OwnerId::new("u");
        let mut store = filled_store(&u);
        let gateway = ApprovingGateway { calls: Cell::new(0) };
        let orders = StoredOrderService::new(MemoryBackend::new());
        let mut addr = address();
        addr.country = String::new();

        let err = checkout(&mut store, &u, addr, &gateway, &orders).unwrap_err();
        assert_eq!(err.to_string(), "Please enter your country");
        assert_eq!(gateway.calls.get(), 0);
    }

    #[test]
    fn test_declined_payment_keeps_cart() {
        let u = OwnerId::new("u");
        let mut store = filled_store(&u);
        let orders = StoredOrderService::new(MemoryBackend::new());

        let err = checkout(&mut store, &u, address(), &DecliningGateway, &orders).unwrap_err();
        assert!(matches!(err, CheckoutError::PaymentDeclined(_)));
        assert_eq!(store.totals(&u).item_count, 2);
        assert!(orders.history(&u).unwrap().is_empty());
    }

    #[test]
    fn test_rejected_order_keeps_cart() {
        let u = OwnerId::new("u");
        let mut store = filled_store(&u);
        let gateway = ApprovingGateway { calls: Cell::new(0) };

        let err = checkout(&mut store, &u, address(), &gateway, &RejectingOrders).unwrap_err();
        assert!(matches!(err, CheckoutError::OrderRejected(_)));
        assert_eq!(store.totals(&u).item_count, 2);
    }

    #[test]
    fn test_history_is_per_owner() {
        let orders = StoredOrderService::new(MemoryBackend::new());
        let gateway = ApprovingGateway { calls: Cell::new(0) };

        for name in ["u", "v", "u"] {
            let owner = OwnerId::new(name);
            let mut store = filled_store(&owner);
            checkout(&mut store, &owner, address(), &gateway, &orders).unwrap();
        }

        let ids: Vec<String> = orders
            .history(&OwnerId::new("u"))
            .unwrap()
            .into_iter()
            .map(|r| r.order_id.into_inner())
            .collect();
        assert_eq!(ids, vec!["ord-000001", "ord-000003"]);
    }
}
