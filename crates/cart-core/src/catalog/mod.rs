//! Product catalog types consumed by the cart.
//!
//! The catalog itself is external; the cart only sees product snapshots.

mod product;

pub use product::{clamp_to_stock, ProductSnapshot};
