//! Cart state and its transition function.

use crate::cart::CartTotals;
use crate::catalog::ProductSnapshot;
use crate::ids::{OwnerId, ProductId};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// One product/quantity pairing owned by one user.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CartLine {
    /// Product snapshot taken when the line was created.
    pub product: ProductSnapshot,
    /// Quantity, always at least 1.
    pub quantity: i64,
    /// Owner of this line.
    pub owner_id: OwnerId,
}

impl CartLine {
    /// Unit price times quantity, at full precision.
    pub fn line_total(&self) -> Decimal {
        self.product
            .price
            .saturating_mul(Decimal::from(self.quantity))
    }

    fn matches(&self, owner_id: &OwnerId, product_id: &ProductId) -> bool {
        &self.owner_id == owner_id && &self.product.id == product_id
    }
}

/// A mutation of the cart.
#[derive(Debug, Clone, PartialEq)]
pub enum CartCommand {
    /// Add `quantity` of a product for an owner, merging into an existing line.
    Add {
        owner_id: OwnerId,
        product: ProductSnapshot,
        quantity: i64,
    },
    /// Remove an owner's line for a product.
    Remove {
        owner_id: OwnerId,
        product_id: ProductId,
    },
    /// Set the quantity of an owner's line; zero or less removes it.
    UpdateQuantity {
        owner_id: OwnerId,
        product_id: ProductId,
        quantity: i64,
    },
    /// Remove one owner's lines, or every line when `owner_id` is `None`.
    Clear { owner_id: Option<OwnerId> },
    /// Record the most recently used owner.
    SetActiveOwner { owner_id: OwnerId },
}

/// Why a command left the state untouched.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IgnoredReason {
    /// Owner id was empty.
    MissingOwner,
    /// Product id was empty.
    MissingProduct,
    /// Product price was below zero.
    NegativePrice,
    /// An add asked for zero or fewer units.
    NonPositiveQuantity,
    /// No line exists for the owner/product pair.
    NoMatchingLine,
}

impl IgnoredReason {
    /// Human-readable reason.
    pub fn as_str(&self) -> &'static str {
        match self {
            IgnoredReason::MissingOwner => "missing owner",
            IgnoredReason::MissingProduct => "missing product",
            IgnoredReason::NegativePrice => "negative price",
            IgnoredReason::NonPositiveQuantity => "non-positive quantity",
            IgnoredReason::NoMatchingLine => "no matching line",
        }
    }
}

/// What a command did to the state.
///
/// Commands never fail; a command that could not be applied reports
/// [`CartChange::Ignored`] and leaves the state as it was.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "change", rename_all = "snake_case")]
pub enum CartChange {
    /// A new line was appended.
    Inserted { quantity: i64 },
    /// An existing line's quantity was increased.
    Merged { quantity: i64 },
    /// An existing line's quantity was replaced.
    Updated { quantity: i64 },
    /// A line was removed.
    Removed,
    /// Lines were cleared.
    Cleared { lines: usize },
    /// The active owner was recorded.
    ActiveOwnerSet,
    /// Nothing changed.
    Ignored { reason: IgnoredReason },
}

impl CartChange {
    /// True unless the command was ignored.
    pub fn is_applied(&self) -> bool {
        !matches!(self, CartChange::Ignored { .. })
    }

    fn ignored(reason: IgnoredReason) -> Self {
        CartChange::Ignored { reason }
    }
}

/// All cart lines for every owner, plus the advisory active owner.
///
/// Lines are only readable per owner through [`CartState::lines_for`].
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct CartState {
    lines: Vec<CartLine>,
    #[serde(default)]
    active_owner: Option<OwnerId>,
}

impl CartState {
    /// Create an empty state.
    pub fn new() -> Self {
        Self::default()
    }

    /// Apply a command. This is the only way lines change.
    pub fn apply(&mut self, command: CartCommand) -> CartChange {
        let change = match command {
            CartCommand::Add {
                owner_id,
                product,
                quantity,
            } => self.apply_add(owner_id, product, quantity),
            CartCommand::Remove {
                owner_id,
                product_id,
            } => self.apply_remove(&owner_id, &product_id),
            CartCommand::UpdateQuantity {
                owner_id,
                product_id,
                quantity,
            } => self.apply_update(&owner_id, &product_id, quantity),
            CartCommand::Clear { owner_id } => self.apply_clear(owner_id.as_ref()),
            CartCommand::SetActiveOwner { owner_id } => {
                if owner_id.is_blank() {
                    CartChange::ignored(IgnoredReason::MissingOwner)
                } else {
                    self.active_owner = Some(owner_id);
                    CartChange::ActiveOwnerSet
                }
            }
        };

        if let CartChange::Ignored { reason } = change {
            tracing::warn!(reason = reason.as_str(), "cart command ignored");
        }
        change
    }

    fn apply_add(&mut self, owner_id: OwnerId, product: ProductSnapshot, quantity: i64) -> CartChange {
        if owner_id.is_blank() {
            return CartChange::ignored(IgnoredReason::MissingOwner);
        }
        if product.id.is_blank() {
            return CartChange::ignored(IgnoredReason::MissingProduct);
        }
        if product.price < Decimal::ZERO {
            return CartChange::ignored(IgnoredReason::NegativePrice);
        }
        if quantity <= 0 {
            return CartChange::ignored(IgnoredReason::NonPositiveQuantity);
        }

        let change = match self
            .lines
            .iter_mut()
            .find(|l| l.matches(&owner_id, &product.id))
        {
            Some(existing) => {
                // Keep the first snapshot; only the quantity accumulates.
                existing.quantity = existing.quantity.saturating_add(quantity);
                tracing::debug!(owner = %owner_id, product = %product.id, quantity = existing.quantity, "merged cart line");
                CartChange::Merged {
                    quantity: existing.quantity,
                }
            }
            None => {
                tracing::debug!(owner = %owner_id, product = %product.id, quantity, "added cart line");
                self.lines.push(CartLine {
                    product,
                    quantity,
                    owner_id: owner_id.clone(),
                });
                CartChange::Inserted { quantity }
            }
        };

        self.active_owner = Some(owner_id);
        change
    }

    fn apply_remove(&mut self, owner_id: &OwnerId, product_id: &ProductId) -> CartChange {
        match self.position(owner_id, product_id) {
            Some(index) => {
                self.lines.remove(index);
                tracing::debug!(owner = %owner_id, product = %product_id, "removed cart line");
                CartChange::Removed
            }
            None => CartChange::ignored(IgnoredReason::NoMatchingLine),
        }
    }

    fn apply_update(&mut self, owner_id: &OwnerId, product_id: &ProductId, quantity: i64) -> CartChange {
        let Some(index) = self.position(owner_id, product_id) else {
            return CartChange::ignored(IgnoredReason::NoMatchingLine);
        };

        if quantity <= 0 {
            self.lines.remove(index);
            tracing::debug!(owner = %owner_id, product = %product_id, "removed cart line on zero quantity");
            return CartChange::Removed;
        }

        if let Some(line) = self.lines.get_mut(index) {
            line.quantity = quantity;
        }
        tracing::debug!(owner = %owner_id, product = %product_id, quantity, "updated cart line");
        CartChange::Updated { quantity }
    }

    fn apply_clear(&mut self, owner_id: Option<&OwnerId>) -> CartChange {
        let before = self.lines.len();
        match owner_id {
            Some(owner) => {
                self.lines.retain(|l| &l.owner_id != owner);
                if self.active_owner.as_ref() == Some(owner) {
                    self.active_owner = None;
                }
            }
            None => {
                self.lines.clear();
                self.active_owner = None;
            }
        }

        let lines = before - self.lines.len();
        tracing::debug!(owner = ?owner_id.map(OwnerId::as_str), lines, "cleared cart");
        CartChange::Cleared { lines }
    }

    fn position(&self, owner_id: &OwnerId, product_id: &ProductId) -> Option<usize> {
        self.lines.iter().position(|l| l.matches(owner_id, product_id))
    }

    /// Add a product for an owner.
    pub fn add(&mut self, owner_id: &OwnerId, product: ProductSnapshot, quantity: i64) -> CartChange {
        self.apply(CartCommand::Add {
            owner_id: owner_id.clone(),
            product,
            quantity,
        })
    }

    /// Remove an owner's line for a product. Missing lines are a no-op.
    pub fn remove(&mut self, owner_id: &OwnerId, product_id: &ProductId) -> CartChange {
        self.apply(CartCommand::Remove {
            owner_id: owner_id.clone(),
            product_id: product_id.clone(),
        })
    }

    /// Set an owner's line quantity; zero or less removes the line.
    pub fn update_quantity(&mut self, owner_id: &OwnerId, product_id: &ProductId, quantity: i64) -> CartChange {
        self.apply(CartCommand::UpdateQuantity {
            owner_id: owner_id.clone(),
            product_id: product_id.clone(),
            quantity,
        })
    }

    /// Clear one owner's lines, or all lines.
    pub fn clear(&mut self, owner_id: Option<&OwnerId>) -> CartChange {
        self.apply(CartCommand::Clear {
            owner_id: owner_id.cloned(),
        })
    }

    /// Record the most recently used owner.
    pub fn set_active_owner(&mut self, owner_id: &OwnerId) -> CartChange {
        self.apply(CartCommand::SetActiveOwner {
            owner_id: owner_id.clone(),
        })
    }

    /// An owner's lines in insertion order.
    pub fn lines_for(&self, owner_id: &OwnerId) -> Vec<&CartLine> {
        self.lines.iter().filter(|l| &l.owner_id == owner_id).collect()
    }

    /// An owner's line for one product.
    pub fn line(&self, owner_id: &OwnerId, product_id: &ProductId) -> Option<&CartLine> {
        self.lines.iter().find(|l| l.matches(owner_id, product_id))
    }

    /// Item count and subtotal over an owner's lines.
    pub fn totals(&self, owner_id: &OwnerId) -> CartTotals {
        CartTotals::from_lines(self.lines_for(owner_id))
    }

    /// The advisory most-recently-used owner.
    pub fn active_owner(&self) -> Option<&OwnerId> {
        self.active_owner.as_ref()
    }

    /// Distinct owners with at least one line, in first-seen order.
    pub fn owners(&self) -> Vec<&OwnerId> {
        let mut owners: Vec<&OwnerId> = Vec::new();
        for line in &self.lines {
            if !owners.contains(&&line.owner_id) {
                owners.push(&line.owner_id);
            }
        }
        owners
    }

    /// Check if no owner has any line.
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Restore the invariants on state loaded from outside.
    ///
    /// Drops lines with a blank owner or product id, a negative price or a
    /// quantity below 1, and folds duplicate owner/product lines into the first occurrence.
    /// Returns the number of lines dropped or folded.
    pub fn repair(&mut self) -> usize {
        let before = self.lines.len();
        let mut kept: Vec<CartLine> = Vec::with_capacity(before);

        for line in self.lines.drain(..) {
            if line.owner_id.is_blank()
                || line.product.id.is_blank()
                || line.product.price < Decimal::ZERO
                || line.quantity < 1
            {
                continue;
            }
            match kept
                .iter_mut()
                .find(|k| k.matches(&line.owner_id, &line.product.id))
            {
                Some(existing) => {
                    existing.quantity = existing.quantity.saturating_add(line.quantity);
                }
                None => kept.push(line),
            }
        }

        self.lines = kept;
        if self.active_owner.as_ref().is_some_and(OwnerId::is_blank) {
            self.active_owner = None;
        }
        before - self.lines.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn product(id: &str, cents: i64) -> ProductSnapshot {
        ProductSnapshot::new(id, format!("Product {}", id), Decimal::new(cents, 2))
    }

    fn owner(id: &str) -> OwnerId {
        OwnerId::new(id)
    }

    #[test]
    fn test_add_inserts_then_merges() {
        let mut state = CartState::new();
        let u = owner("u1");

        assert_eq!(state.add(&u, product("a", 999), 1), CartChange::Inserted { quantity: 1 });
        assert_eq!(state.add(&u, product("a", 999), 2), CartChange::Merged { quantity: 3 });

        let lines = state.lines_for(&u);
        assert_eq!(lines.len(), 1);
        assert_eq!(lines[0].quantity, 3);
        assert_eq!(state.active_owner(), Some(&u));
    }

    #[test]
    fn test_merge_keeps_first_snapshot() {
        let mut state = CartState::new();
        let u = owner("u1");
        state.add(&u, product("a", 999), 1);

        let mut renamed = product("a", 1999);
        renamed.name = "Renamed".into();
        state.add(&u, renamed, 1);

        let line = state.line(&u, &ProductId::new("a")).unwrap();
        assert_eq!(line.product.name, "Product a");
        assert_eq!(line.product.price, Decimal::new(999, 2));
    }

    #[test]
    fn test_add_rejects_bad_input() {
        let mut state = CartState::new();
        let u = owner("u1");

        assert_eq!(
            state.add(&owner(""), product("a", 100), 1),
            CartChange::Ignored { reason: IgnoredReason::MissingOwner }
        );
        assert_eq!(
            state.add(&u, product(" ", 100), 1),
            CartChange::Ignored { reason: IgnoredReason::MissingProduct }
        );
        assert_eq!(
            state.add(&u, product("a", -1), 1),
            CartChange::Ignored { reason: IgnoredReason::NegativePrice }
        );
        assert_eq!(
            state.add(&u, product("a", 100), 0),
            CartChange::Ignored { reason: IgnoredReason::NonPositiveQuantity }
        );
        assert_eq!(
            state.add(&u, product("a", 100), -4),
            CartChange::Ignored { reason: IgnoredReason::NonPositiveQuantity }
        );

        assert!(state.is_empty());
        assert_eq!(state.active_owner(), None);
    }

    #[test]
    fn test_free_product_is_accepted() {
        let mut state = CartState::new();
        let u = owner("u1");
        assert!(state.add(&u, product("gift", 0), 1).is_applied());
    }

    #[test]
    fn test_update_quantity() {
        let mut state = CartState::new();
        let u = owner("u1");
        let a = ProductId::new("a");
        state.add(&u, product("a", 100), 1);

        assert_eq!(state.update_quantity(&u, &a, 7), CartChange::Updated { quantity: 7 });
        assert_eq!(state.line(&u, &a).unwrap().quantity, 7);

        assert_eq!(state.update_quantity(&u, &a, 0), CartChange::Removed);
        assert!(state.line(&u, &a).is_none());

        assert_eq!(
            state.update_quantity(&u, &a, 3),
            CartChange::Ignored { reason: IgnoredReason::NoMatchingLine }
        );
        assert!(state.is_empty());
    }

    #[test]
    fn test_update_negative_removes() {
        let mut state = CartState::new();
        let u = owner("u1");
        state.add(&u, product("a", 100), 5);
        assert_eq!(state.update_quantity(&u, &ProductId::new("a"), -2), CartChange::Removed);
        assert!(state.lines_for(&u).is_empty());
    }

    #[test]
    fn test_remove_scoped_to_owner() {
        let mut state = CartState::new();
        let (u, v) = (owner("u"), owner("v"));
        let a = ProductId::new("a");
        state.add(&u, product("a", 100), 1);
        state.add(&v, product("a", 100), 1);

        assert_eq!(state.remove(&u, &a), CartChange::Removed);
        assert!(state.lines_for(&u).is_empty());
        assert_eq!(state.lines_for(&v).len(), 1);
    }

    #[test]
    fn test_clear_owner_resets_matching_active_owner() {
        let mut state = CartState::new();
        let (u, v) = (owner("u"), owner("v"));
        state.add(&v, product("b", 100), 1);
        state.add(&u, product("a", 100), 2);
        assert_eq!(state.active_owner(), Some(&u));

        assert_eq!(state.clear(Some(&v)), CartChange::Cleared { lines: 1 });
        assert_eq!(state.active_owner(), Some(&u));

        assert_eq!(state.clear(Some(&u)), CartChange::Cleared { lines: 1 });
        assert_eq!(state.active_owner(), None);
    }

    #[test]
    fn test_clear_all() {
        let mut state = CartState::new();
        state.add(&owner("u"), product("a", 100), 1);
        state.add(&owner("v"), product("b", 100), 1);

        assert_eq!(state.clear(None), CartChange::Cleared { lines: 2 });
        assert!(state.is_empty());
        assert_eq!(state.active_owner(), None);
    }

    #[test]
    fn test_set_active_owner_leaves_lines() {
        let mut state = CartState::new();
        state.add(&owner("u"), product("a", 100), 1);

        assert_eq!(state.set_active_owner(&owner("v")), CartChange::ActiveOwnerSet);
        assert_eq!(state.active_owner(), Some(&owner("v")));
        assert_eq!(state.lines_for(&owner("u")).len(), 1);
        assert!(!state.set_active_owner(&owner("")).is_applied());
    }

    #[test]
    fn test_owners_in_first_seen_order() {
        let mut state = CartState::new();
        state.add(&owner("v"), product("a", 100), 1);
        state.add(&owner("u"), product("a", 100), 1);
        state.add(&owner("v"), product("b", 100), 1);

        let owners: Vec<&str> = state.owners().into_iter().map(OwnerId::as_str).collect();
        assert_eq!(owners, vec!["v", "u"]);
    }

    #[test]
    fn test_line_total_full_precision() {
        let line = CartLine {
            product: ProductSnapshot::new("a", "A", Decimal::new(33333, 4)),
            quantity: 3,
            owner_id: owner("u"),
        };
        assert_eq!(line.line_total(), Decimal::new(99999, 4));
    }

    #[test]
    fn test_repair_folds_duplicates_and_drops_degenerate_lines() {
        let json = r#"{
            "lines": [
                {"product": {"id": "a", "price": "1.00"}, "quantity": 1, "owner_id": "u"},
                {"product": {"id": "a", "price": "1.00"}, "quantity": 2, "owner_id": "u"},
                {"product": {"id": "b", "price": "1.00"}, "quantity": 0, "owner_id": "u"},
                {"product": {"id": "c", "price": "1.00"}, "quantity": 1, "owner_id": ""},
                {"product": {"id": "d", "price": "-5.00"}, "quantity": 2, "owner_id": "u"}
            ],
            "active_owner": "u"
        }"#;
        let mut state: CartState = serde_json::from_str(json).unwrap();

        assert_eq!(state.repair(), 4);
        let lines = state.lines_for(&owner("u"));
        assert_eq!(lines.len(), 1);
        assert_eq!(lines[0].quantity, 3);
        assert_eq!(state.totals(&owner("u")).subtotal, Decimal::new(300, 2));
    }

    #[test]
    fn test_update_leaves_other_owners_alone() {
        let mut state = CartState::new();
        let u = owner("u");
        let v = owner("v");
        state.add(&u, product("a", 100), 1);
        state.add(&v, product("a", 100), 5);
        let a = ProductId::new("a");

        assert_eq!(state.update_quantity(&u, &a, 9), CartChange::Updated { quantity: 9 });
        assert_eq!(state.line(&v, &a).map(|l| l.quantity), Some(5));

        assert_eq!(state.update_quantity(&u, &a, 0), CartChange::Removed);
        assert!(state.line(&u, &a).is_none());
        let v_lines: Vec<i64> = state.lines_for(&v).iter().map(|l| l.quantity).collect();
        assert_eq!(v_lines, vec![5]);
    }

    #[test]
    fn test_change_serializes_tagged() {
        let json = serde_json::to_value(CartChange::Merged { quantity: 3 }).unwrap();
        assert_eq!(json["change"], "merged");
        assert_eq!(json["quantity"], 3);

        let json = serde_json::to_value(CartChange::Ignored {
            reason: IgnoredReason::NoMatchingLine,
        })
        .unwrap();
        assert_eq!(json["reason"], "no_matching_line");
    }
}
