//! Identity events from the host application.
//!
//! The cart never authenticates anyone. The host tells it when a user logs
//! in or out and the store updates itself accordingly.

use crate::cart::CartCommand;
use crate::ids::OwnerId;

/// A change in who is using the storefront.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IdentityEvent {
    /// A user authenticated; they become the active owner.
    LoggedIn(OwnerId),
    /// The user logged out; every cart line is dropped.
    LoggedOut,
}

impl IdentityEvent {
    /// The cart command this event maps to.
    pub fn into_command(self) -> CartCommand {
        match self {
            IdentityEvent::LoggedIn(owner_id) => CartCommand::SetActiveOwner { owner_id },
            IdentityEvent::LoggedOut => CartCommand::Clear { owner_id: None },
        }
    }
}
