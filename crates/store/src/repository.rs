use async_trait::async_trait;
use common::{EventId, OrderId, ProductCode, UserId};

use crate::{Event, Product, ProductQuery, Result, StoredOrder, User};

/// Persistence for order rows.
///
/// Implementations store the encoded line-item text and the total exactly as
/// given. The two `exists_active_*` queries back the deletion guard: they
/// only consider rows whose status is not one of
/// [`common::TERMINAL_STATUSES`], and report `false` when nothing matches.
#[async_trait]
pub trait OrderRepository: Send + Sync {
    /// Inserts the order, or replaces the row with the same id.
    ///
    /// An order without an id gets a freshly generated one. Returns the row
    /// as stored.
    async fn save_order(&self, order: StoredOrder) -> Result<StoredOrder>;

    /// Returns every order, ordered by id.
    async fn find_all_orders(&self) -> Result<Vec<StoredOrder>>;

    /// Returns the order with the given id, if any.
    async fn find_order(&self, id: OrderId) -> Result<Option<StoredOrder>>;

    /// Returns every order placed by the given customer, ordered by id.
    async fn find_orders_by_customer(&self, customer_id: UserId) -> Result<Vec<StoredOrder>>;

    /// Deletes the order. Deleting an absent id is a no-op.
    async fn delete_order(&self, id: OrderId) -> Result<()>;

    /// Checks whether an active order references the customer.
    async fn exists_active_order_for_customer(&self, customer_id: UserId) -> Result<bool>;

    /// Checks whether an active order's encoded line items contain any of
    /// `needles` as a plain substring.
    async fn exists_active_order_with_line_text(&self, needles: &[String]) -> Result<bool>;
}

/// Persistence for catalog products, keyed by code.
#[async_trait]
pub trait ProductRepository: Send + Sync {
    /// Inserts the product, or overwrites the product with the same code.
    async fn save_product(&self, product: Product) -> Result<Product>;

    /// Returns every product, ordered by code.
    async fn find_all_products(&self) -> Result<Vec<Product>>;

    /// Returns the product with the given code, if any.
    async fn find_product(&self, code: &ProductCode) -> Result<Option<Product>>;

    /// Returns products matching every filter of the query, ordered by code.
    async fn search_products(&self, query: ProductQuery) -> Result<Vec<Product>>;

    /// Checks whether a product with the code exists.
    async fn product_exists(&self, code: &ProductCode) -> Result<bool>;

    /// Deletes the product. Deleting an absent code is a no-op.
    async fn delete_product(&self, code: &ProductCode) -> Result<()>;
}

/// Persistence for users.
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Inserts the user, or replaces the user with the same id.
    async fn save_user(&self, user: User) -> Result<User>;

    /// Returns every user, ordered by id.
    async fn find_all_users(&self) -> Result<Vec<User>>;

    /// Returns the user with the given id, if any.
    async fn find_user(&self, id: UserId) -> Result<Option<User>>;

    /// Checks whether a user with the id exists.
    async fn user_exists(&self, id: UserId) -> Result<bool>;

    /// Deletes the user. Deleting an absent id is a no-op.
    async fn delete_user(&self, id: UserId) -> Result<()>;
}

/// Persistence for catalog events.
#[async_trait]
pub trait EventRepository: Send + Sync {
    /// Inserts the event, or replaces the event with the same id.
    async fn save_event(&self, event: Event) -> Result<Event>;

    /// Returns every event, ordered by id.
    async fn find_all_events(&self) -> Result<Vec<Event>>;

    /// Returns the event with the given id, if any.
    async fn find_event(&self, id: EventId) -> Result<Option<Event>>;

    /// Deletes the event. Deleting an absent id is a no-op.
    async fn delete_event(&self, id: EventId) -> Result<()>;
}

/// A backend providing every repository.
///
/// Backends are cheap handles: cloning one shares the underlying storage.
pub trait Store:
    OrderRepository + ProductRepository + UserRepository + EventRepository + Clone + 'static
{
}

// Blanket implementation for all complete backends
impl<T> Store for T where
    T: OrderRepository + ProductRepository + UserRepository + EventRepository + Clone + 'static
{
}
