//! Checkout error types.
//!
//! The cart store itself never fails; these cover the hand-off to the
//! payment and order services.

use thiserror::Error;

/// Errors that can occur while checking out a cart.
#[derive(Error, Debug)]
pub enum CheckoutError {
    /// The owner has nothing in the cart.
    #[error("Cart is empty for {0}")]
    EmptyCart(String),

    /// A required shipping field is blank.
    #[error("Please enter your {0}")]
    MissingField(&'static str),

    /// The payment processor refused the payment.
    #[error("Payment failed: {0}")]
    PaymentDeclined(#[from] PaymentError),

    /// The order service refused the order after payment.
    #[error("Error creating order: {0}")]
    OrderRejected(#[from] OrderError),
}

/// Failure reported by a payment gateway.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PaymentError {
    /// Card or account declined.
    #[error("declined: {0}")]
    Declined(String),

    /// The gateway could not be reached or answered unexpectedly.
    #[error("gateway unavailable: {0}")]
    Unavailable(String),
}

/// Failure reported by the order service.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum OrderError {
    /// The service rejected the submission.
    #[error("rejected: {0}")]
    Rejected(String),

    /// The order could not be recorded.
    #[error("storage failed: {0}")]
    Storage(String),
}

impl From<cart_storage::CacheError> for OrderError {
    fn from(e: cart_storage::CacheError) -> Self {
        OrderError::Storage(e.to_string())
    }
}
