//! Order aggregate.

use common::{OrderId, UserId, is_active};
use serde::{Deserialize, Serialize};
use store::StoredOrder;

use super::{LineItem, decode_line_items};

/// An order together with its decoded line items.
///
/// `total` is whatever was last computed by a full write. Status-only
/// updates leave it alone, so it can lag behind line items edited directly
/// in storage.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Order {
    /// Assigned by the store; ignored on create.
    #[serde(default)]
    pub id: Option<OrderId>,

    /// ISO-8601 date string.
    pub date: String,

    /// Customer who placed the order.
    pub customer_id: UserId,

    #[serde(default)]
    pub line_items: Vec<LineItem>,

    /// Free-form status. See [`common::status`] for which values are terminal.
    #[serde(default)]
    pub status: String,

    /// Computed by the service; any client-supplied value is overwritten.
    #[serde(default)]
    pub total: Option<f64>,
}

impl Order {
    /// Creates an unsaved order.
    pub fn new(
        date: impl Into<String>,
        customer_id: UserId,
        line_items: Vec<LineItem>,
        status: impl Into<String>,
    ) -> Self {
        Self {
            id: None,
            date: date.into(),
            customer_id,
            line_items,
            status: status.into(),
            total: None,
        }
    }

    /// Rebuilds an order from its stored row, decoding the line items.
    pub fn from_stored(stored: StoredOrder) -> Self {
        let line_items = decode_line_items(stored.line_items.as_deref());
        Self::with_line_items(stored, line_items)
    }

    /// Rebuilds an order from its stored row and already decoded line items.
    pub(crate) fn with_line_items(stored: StoredOrder, line_items: Vec<LineItem>) -> Self {
        Self {
            id: stored.id,
            date: stored.date,
            customer_id: stored.customer_id,
            line_items,
            status: stored.status,
            total: stored.total,
        }
    }

    /// Returns true while the order still blocks deletion of what it references.
    pub fn is_active(&self) -> bool {
        is_active(&self.status)
    }

    /// Returns the number of line items.
    pub fn item_count(&self) -> usize {
        self.line_items.len()
    }
}
