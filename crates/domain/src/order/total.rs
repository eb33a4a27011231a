//! Order total calculation.

use super::LineItem;

/// Sums `quantity × price` over the line items.
///
/// Items missing either factor contribute nothing. An empty list totals zero.
pub fn compute_total(items: &[LineItem]) -> f64 {
    items.iter().map(LineItem::subtotal).sum()
}
