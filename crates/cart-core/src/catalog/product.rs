//! Product snapshots handed to the cart by the catalog.

use crate::ids::ProductId;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// A product as seen by the cart.
///
/// The cart trusts the caller-supplied snapshot. Only `id` and `price` matter
/// to the cart's invariants; the remaining fields are carried for display.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ProductSnapshot {
    /// Unique product identifier.
    pub id: ProductId,
    /// Unit price, serialized as a decimal string.
    #[serde(with = "rust_decimal::serde::str")]
    pub price: Decimal,
    /// Product name.
    #[serde(default)]
    pub name: String,
    /// Image URL.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    /// Catalog category.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    /// Description.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Units in stock when the snapshot was taken.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stock: Option<i64>,
}

impl ProductSnapshot {
    /// Create a snapshot with an id, name and unit price.
    pub fn new(id: impl Into<ProductId>, name: impl Into<String>, price: Decimal) -> Self {
        Self {
            id: id.into(),
            price,
            name: name.into(),
            image: None,
            category: None,
            description: None,
            stock: None,
        }
    }

    /// Set the stock level.
    pub fn with_stock(mut self, stock: i64) -> Self {
        self.stock = Some(stock);
        self
    }

    /// Set the category.
    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }

    /// Set the image URL.
    pub fn with_image(mut self, image: impl Into<String>) -> Self {
        self.image = Some(image.into());
        self
    }

    /// Whether the snapshot reports any stock. Unknown stock counts as available.
    pub fn in_stock(&self) -> bool {
        self.stock.map_or(true, |s| s > 0)
    }
}

/// Clamp a requested quantity the way the product and cart pages do.
///
/// The result is at least 1. When the stock level is known and positive it is
/// also the upper bound; a known stock of zero or less caps at 1. Callers
/// clamp before calling the store, which enforces no upper bound itself.
pub fn clamp_to_stock(requested: i64, stock: Option<i64>) -> i64 {
    let ceiling = match stock {
        Some(s) if s > 0 => s,
        Some(_) => 1,
        None => i64::MAX,
    };
    requested.clamp(1, ceiling)
}
