//! Login and logout.

use anyhow::Result;
use cart_core::prelude::*;

use super::{LoginArgs, LogoutArgs};
use crate::context::Context;

/// Run the login command.
pub fn login(args: LoginArgs, ctx: &Context) -> Result<()> {
    let mut store = ctx.open_store()?;
    let owner = OwnerId::new(args.owner);

    let change = store.on_identity(IdentityEvent::LoggedIn(owner.clone()));
    ctx.output.change(&change, &format!("Logged in as {}", owner));

    if change.is_applied() && !ctx.output.is_json() {
        let totals = store.totals(&owner);
        if !totals.is_empty() {
            ctx.output.info(&format!(
                "{} item(s) waiting in your cart",
                totals.item_count
            ));
        }
    }
    Ok(())
}

/// Run the logout command.
///
/// Logging out empties the stored cart for everyone on this device.
pub fn logout(args: LogoutArgs, ctx: &Context) -> Result<()> {
    let mut store = ctx.open_store()?;

    if !args.yes && !ctx.output.is_json() && !store.state().is_empty() {
        ctx.output
            .warn("Logging out drops every cart line stored on this device");
        if !ctx.output.confirm("Log out?", true)? {
            ctx.output.warn("Logout cancelled");
            return Ok(());
        }
    }

    let change = store.on_identity(IdentityEvent::LoggedOut);
    ctx.output.change(&change, "Logged out");
    Ok(())
}
