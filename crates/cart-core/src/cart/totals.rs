//! Derived cart totals.

use crate::cart::CartLine;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Totals over one owner's lines.
///
/// The subtotal is kept at full precision; rounding for display is left to
/// the presentation layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct CartTotals {
    /// Sum of quantities (the navbar badge).
    pub item_count: i64,
    /// Sum of `quantity * price`.
    #[serde(with = "rust_decimal::serde::str")]
    pub subtotal: Decimal,
    /// Number of distinct lines.
    pub line_count: usize,
}

impl CartTotals {
    /// Compute totals over a set of lines.
    pub fn from_lines<'a>(lines: impl IntoIterator<Item = &'a CartLine>) -> Self {
        lines.into_iter().fold(Self::default(), |acc, line| Self {
            item_count: acc.item_count.saturating_add(line.quantity),
            subtotal: acc.subtotal.saturating_add(line.line_total()),
            line_count: acc.line_count + 1,
        })
    }

    /// Check if there is nothing to pay for.
    pub fn is_empty(&self) -> bool {
        self.line_count == 0
    }

    /// Subtotal rounded to cents for display, e.g. `"$24.98"`.
    pub fn display_subtotal(&self, symbol: &str) -> String {
        format!("{}{:.2}", symbol, self.subtotal.round_dp(2))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::ProductSnapshot;
    use crate::ids::OwnerId;

    fn line(id: &str, cents: i64, quantity: i64) -> CartLine {
        CartLine {
            product: ProductSnapshot::new(id, id, Decimal::new(cents, 2)),
            quantity,
            owner_id: OwnerId::new("u"),
        }
    }

    #[test]
    fn test_totals() {
        let lines = vec![line("a", 999, 2), line("b", 500, 1)];
        let totals = CartTotals::from_lines(&lines);

        assert_eq!(totals.item_count, 3);
        assert_eq!(totals.subtotal, Decimal::new(2498, 2));
        assert_eq!(totals.line_count, 2);
    }

    #[test]
    fn test_empty_totals() {
        let totals = CartTotals::from_lines(std::iter::empty());
        assert!(totals.is_empty());
        assert_eq!(totals.item_count, 0);
        assert_eq!(totals.subtotal, Decimal::ZERO);
    }

    #[test]
    fn test_display_subtotal() {
        let totals = CartTotals {
            item_count: 3,
            subtotal: Decimal::new(99999, 4),
            line_count: 1,
        };
        assert_eq!(totals.display_subtotal("$"), "$10.00");
    }
}
