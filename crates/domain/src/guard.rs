//! Deletion guard backed by active-order lookups.
//!
//! Products and users are referenced by orders without any storage-level
//! foreign key. Before either is deleted, the guard asks the order repository
//! whether an active order still points at it. Product references are found by
//! searching the encoded line-item text, not by decoding it, so the lookup can
//! run inside the database.
//!
//! The check and the delete that follows it are separate calls. An order
//! created between the two can still end up referencing a deleted product or
//! user.

use common::{ProductCode, UserId};
use store::{OrderRepository, Result};

use crate::order::code_needles;

/// Answers whether active orders still depend on a product or a user.
#[derive(Clone)]
pub struct DependencyGuard<O: OrderRepository> {
    orders: O,
}

impl<O: OrderRepository> DependencyGuard<O> {
    /// Creates a guard reading from the given order repository.
    pub fn new(orders: O) -> Self {
        Self { orders }
    }

    /// Returns true if an active order has `customer_id` as its customer.
    #[tracing::instrument(skip(self))]
    pub async fn has_active_order_for_customer(&self, customer_id: UserId) -> Result<bool> {
        self.orders
            .exists_active_order_for_customer(customer_id)
            .await
    }

    /// Returns true if an active order has a line item coded `code`.
    #[tracing::instrument(skip(self))]
    pub async fn has_active_order_containing_product(&self, code: &ProductCode) -> Result<bool> {
        let needles = code_needles(code);
        self.orders.exists_active_order_with_line_text(&needles).await
    }
}
