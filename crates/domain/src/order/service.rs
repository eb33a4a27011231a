//! Order service orchestrating the total calculator, codec and repository.

use common::{OrderId, UserId};
use store::{OrderRepository, StoredOrder};

use crate::error::DomainError;

use super::{Order, compute_total, encode_line_items};

/// Service for managing orders.
///
/// Full writes compute the total and encode the line items before handing the
/// row to the repository. Reads decode the stored text back into line items.
/// Orders carry no deletion guard of their own.
#[derive(Clone)]
pub struct OrderService<O: OrderRepository> {
    orders: O,
}

impl<O: OrderRepository> OrderService<O> {
    /// Creates a new order service over the given repository.
    pub fn new(orders: O) -> Self {
        Self { orders }
    }

    /// Creates an order. Any client-supplied id and total are ignored.
    #[tracing::instrument(skip(self, order), fields(customer_id = %order.customer_id))]
    pub async fn create(&self, order: Order) -> Result<Order, DomainError> {
        let total = compute_total(&order.line_items);
        let encoded = encode_line_items(&order.line_items);

        let stored = self
            .orders
            .save_order(StoredOrder {
                id: None,
                date: order.date,
                customer_id: order.customer_id,
                line_items: Some(encoded),
                status: order.status,
                total: Some(total),
            })
            .await?;

        metrics::counter!("orders_created_total").increment(1);
        tracing::debug!(order_id = ?stored.id, total, "order created");

        Ok(Order::with_line_items(stored, order.line_items))
    }

    /// Lists every order with decoded line items.
    #[tracing::instrument(skip(self))]
    pub async fn list(&self) -> Result<Vec<Order>, DomainError> {
        let rows = self.orders.find_all_orders().await?;
        Ok(rows.into_iter().map(Order::from_stored).collect())
    }

    /// Lists the orders placed by one customer.
    #[tracing::instrument(skip(self))]
    pub async fn list_by_customer(&self, customer_id: UserId) -> Result<Vec<Order>, DomainError> {
        let rows = self.orders.find_orders_by_customer(customer_id).await?;
        Ok(rows.into_iter().map(Order::from_stored).collect())
    }

    /// Loads an order by id.
    ///
    /// Returns None if the order doesn't exist.
    #[tracing::instrument(skip(self))]
    pub async fn get(&self, id: OrderId) -> Result<Option<Order>, DomainError> {
        let row = self.orders.find_order(id).await?;
        Ok(row.map(Order::from_stored))
    }

    /// Replaces date, customer, line items and status, then recomputes the total.
    #[tracing::instrument(skip(self, order))]
    pub async fn update(&self, id: OrderId, order: Order) -> Result<Order, DomainError> {
        let mut existing = self
            .orders
            .find_order(id)
            .await?
            .ok_or_else(|| DomainError::not_found("Order", id))?;

        existing.date = order.date;
        existing.customer_id = order.customer_id;
        existing.line_items = Some(encode_line_items(&order.line_items));
        existing.status = order.status;
        existing.total = Some(compute_total(&order.line_items));

        let stored = self.orders.save_order(existing).await?;
        Ok(Order::with_line_items(stored, order.line_items))
    }

    /// Replaces only the status.
    ///
    /// The stored line-item text and total are written back untouched, even
    /// if they no longer agree with each other.
    #[tracing::instrument(skip(self, status))]
    pub async fn update_status(
        &self,
        id: OrderId,
        status: impl Into<String>,
    ) -> Result<Order, DomainError> {
        let mut existing = self
            .orders
            .find_order(id)
            .await?
            .ok_or_else(|| DomainError::not_found("Order", id))?;

        existing.status = status.into();

        let stored = self.orders.save_order(existing).await?;
        Ok(Order::from_stored(stored))
    }

    /// Deletes an order unconditionally. Absent ids are ignored.
    #[tracing::instrument(skip(self))]
    pub async fn delete(&self, id: OrderId) -> Result<(), DomainError> {
        self.orders.delete_order(id).await?;
        Ok(())
    }
}
