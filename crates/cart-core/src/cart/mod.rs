//! Shopping cart module.
//!
//! Contains the cart state, its commands, derived totals and the persisted
//! store wrapper.

mod state;
mod store;
mod totals;

pub use state::{CartChange, CartCommand, CartLine, CartState, IgnoredReason};
pub use store::{default_state_key, CartStore};
pub use totals::CartTotals;
