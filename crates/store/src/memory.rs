use std::collections::BTreeMap;
use std::sync::Arc;

use async_trait::async_trait;
use common::{EventId, OrderId, ProductCode, UserId, is_active};
use tokio::sync::RwLock;

use crate::{
    Event, Product, ProductQuery, Result, StoredOrder, User,
    repository::{EventRepository, OrderRepository, ProductRepository, UserRepository},
};

/// Rows of one table plus the last key handed out for it.
///
/// Keys are never reused after a delete, matching an identity column.
struct Table<K, V> {
    rows: BTreeMap<K, V>,
    last_id: i32,
}

impl<K: Ord, V> Table<K, V> {
    fn next_id(&mut self) -> i32 {
        self.last_id += 1;
        self.last_id
    }

    fn observe_id(&mut self, id: i32) {
        self.last_id = self.last_id.max(id);
    }
}

impl<K, V> Default for Table<K, V> {
    fn default() -> Self {
        Self {
            rows: BTreeMap::new(),
            last_id: 0,
        }
    }
}

/// In-memory store implementation.
///
/// Used when no database is configured and throughout the tests. It answers
/// every query the same way the PostgreSQL implementation does.
#[derive(Clone, Default)]
pub struct InMemoryStore {
    orders: Arc<RwLock<Table<OrderId, StoredOrder>>>,
    products: Arc<RwLock<BTreeMap<ProductCode, Product>>>,
    users: Arc<RwLock<Table<UserId, User>>>,
    events: Arc<RwLock<Table<EventId, Event>>>,
}

impl InMemoryStore {
    /// Creates a new empty in-memory store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the total number of orders stored.
    pub async fn order_count(&self) -> usize {
        self.orders.read().await.rows.len()
    }
}

#[async_trait]
impl OrderRepository for InMemoryStore {
    async fn save_order(&self, mut order: StoredOrder) -> Result<StoredOrder> {
        let mut table = self.orders.write().await;
        let id = match order.id {
            Some(id) => {
                table.observe_id(id.as_i32());
                id
            }
            None => OrderId::new(table.next_id()),
        };
        order.id = Some(id);
        table.rows.insert(id, order.clone());
        Ok(order)
    }

    async fn find_all_orders(&self) -> Result<Vec<StoredOrder>> {
        Ok(self.orders.read().await.rows.values().cloned().collect())
    }

    async fn find_order(&self, id: OrderId) -> Result<Option<StoredOrder>> {
        Ok(self.orders.read().await.rows.get(&id).cloned())
    }

    async fn find_orders_by_customer(&self, customer_id: UserId) -> Result<Vec<StoredOrder>> {
        let table = self.orders.read().await;
        Ok(table
            .rows
            .values()
            .filter(|o| o.customer_id == customer_id)
            .cloned()
            .collect())
    }

    async fn delete_order(&self, id: OrderId) -> Result<()> {
        self.orders.write().await.rows.remove(&id);
        Ok(())
    }

    async fn exists_active_order_for_customer(&self, customer_id: UserId) -> Result<bool> {
        let table = self.orders.read().await;
        Ok(table
            .rows
            .values()
            .any(|o| is_active(&o.status) && o.customer_id == customer_id))
    }

    async fn exists_active_order_with_line_text(&self, needles: &[String]) -> Result<bool> {
        let table = self.orders.read().await;
        Ok(table.rows.values().any(|o| {
            is_active(&o.status)
                && o
                    .line_items
                    .as_deref()
                    .is_some_and(|text| needles.iter().any(|n| text.contains(n.as_str())))
        }))
    }
}

#[async_trait]
impl ProductRepository for InMemoryStore {
    async fn save_product(&self, product: Product) -> Result<Product> {
        self.products
            .write()
            .await
            .insert(product.code.clone(), product.clone());
        Ok(product)
    }

    async fn find_all_products(&self) -> Result<Vec<Product>> {
        Ok(self.products.read().await.values().cloned().collect())
    }

    async fn find_product(&self, code: &ProductCode) -> Result<Option<Product>> {
        Ok(self.products.read().await.get(code).cloned())
    }

    async fn search_products(&self, query: ProductQuery) -> Result<Vec<Product>> {
        let products = self.products.read().await;
        Ok(products
            .values()
            .filter(|p| query.matches(p))
            .cloned()
            .collect())
    }

    async fn product_exists(&self, code: &ProductCode) -> Result<bool> {
        Ok(self.products.read().await.contains_key(code))
    }

    async fn delete_product(&self, code: &ProductCode) -> Result<()> {
        self.products.write().await.remove(code);
        Ok(())
    }
}

#[async_trait]
impl UserRepository for InMemoryStore {
    async fn save_user(&self, mut user: User) -> Result<User> {
        let mut table = self.users.write().await;
        let id = match user.id {
            Some(id) => {
                table.observe_id(id.as_i32());
                id
            }
            None => UserId::new(table.next_id()),
        };
        user.id = Some(id);
        table.rows.insert(id, user.clone());
        Ok(user)
    }

    async fn find_all_users(&self) -> Result<Vec<User>> {
        Ok(self.users.read().await.rows.values().cloned().collect())
    }

    async fn find_user(&self, id: UserId) -> Result<Option<User>> {
        Ok(self.users.read().await.rows.get(&id).cloned())
    }

    async fn user_exists(&self, id: UserId) -> Result<bool> {
        Ok(self.users.read().await.rows.contains_key(&id))
    }

    async fn delete_user(&self, id: UserId) -> Result<()> {
        self.users.write().await.rows.remove(&id);
        Ok(())
    }
}

#[async_trait]
impl EventRepository for InMemoryStore {
    async fn save_event(&self, mut event: Event) -> Result<Event> {
        let mut table = self.events.write().await;
        let id = match event.id {
            Some(id) => {
                table.observe_id(id.as_i32());
                id
            }
            None => EventId::new(table.next_id()),
        };
        event.id = Some(id);
        table.rows.insert(id, event.clone());
        Ok(event)
    }

    async fn find_all_events(&self) -> Result<Vec<Event>> {
        Ok(self.events.read().await.rows.values().cloned().collect())
    }

    async fn find_event(&self, id: EventId) -> Result<Option<Event>> {
        Ok(self.events.read().await.rows.get(&id).cloned())
    }

    async fn delete_event(&self, id: EventId) -> Result<()> {
        self.events.write().await.rows.remove(&id);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn order(customer: i32, status: &str, line_items: Option<&str>) -> StoredOrder {
        StoredOrder {
            id: None,
            date: "2025-11-20".to_string(),
            customer_id: UserId::new(customer),
            line_items: line_items.map(String::from),
            status: status.to_string(),
            total: Some(0.0),
        }
    }

    fn needles(code: &str) -> Vec<String> {
        vec![
            format!("\"code\":\"{code}\""),
            format!("\"code\": \"{code}\""),
        ]
    }

    fn user(name: &str) -> User {
        User {
            id: None,
            username: name.to_string(),
            email: format!("{name}@example.com"),
            password: "secret".to_string(),
            birth_date: "1990-01-01".to_string(),
            phone: "+56911111111".to_string(),
            address: "Main St 1".to_string(),
            region: "RM".to_string(),
            commune: "Santiago".to_string(),
            role: "client".to_string(),
            discount_eligible: false,
            profile_image: "/img/user.png".to_string(),
        }
    }

    #[tokio::test]
    async fn save_order_assigns_sequential_ids() {
        let store = InMemoryStore::new();

        let first = store.save_order(order(1, "pendiente", None)).await.unwrap();
        let second = store.save_order(order(1, "pendiente", None)).await.unwrap();

        assert_eq!(first.id, Some(OrderId::new(1)));
        assert_eq!(second.id, Some(OrderId::new(2)));
        assert_eq!(store.order_count().await, 2);
    }

    #[tokio::test]
    async fn save_order_with_id_replaces_row() {
        let store = InMemoryStore::new();
        let mut saved = store.save_order(order(1, "pendiente", None)).await.unwrap();

        saved.status = "en camino".to_string();
        store.save_order(saved.clone()).await.unwrap();

        let found = store.find_order(saved.id.unwrap()).await.unwrap().unwrap();
        assert_eq!(found.status, "en camino");
        assert_eq!(store.order_count().await, 1);
    }

    #[tokio::test]
    async fn ids_are_not_reused_after_delete() {
        let store = InMemoryStore::new();
        let first = store.save_order(order(1, "pendiente", None)).await.unwrap();
        store.delete_order(first.id.unwrap()).await.unwrap();

        let second = store.save_order(order(1, "pendiente", None)).await.unwrap();
        assert_eq!(second.id, Some(OrderId::new(2)));
    }

    #[tokio::test]
    async fn explicit_ids_advance_the_sequence() {
        let store = InMemoryStore::new();
        let mut seeded = user("seeded");
        seeded.id = Some(UserId::new(7));
        store.save_user(seeded).await.unwrap();

        let next = store.save_user(user("next")).await.unwrap();
        assert_eq!(next.id, Some(UserId::new(8)));
    }

    #[tokio::test]
    async fn delete_absent_rows_is_noop() {
        let store = InMemoryStore::new();
        store.delete_order(OrderId::new(99)).await.unwrap();
        store.delete_user(UserId::new(99)).await.unwrap();
        store.delete_event(EventId::new(99)).await.unwrap();
        store
            .delete_product(&ProductCode::new("NOPE"))
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn find_orders_by_customer_filters() {
        let store = InMemoryStore::new();
        store.save_order(order(1, "pendiente", None)).await.unwrap();
        store.save_order(order(2, "pendiente", None)).await.unwrap();
        store.save_order(order(1, "ENTREGADO", None)).await.unwrap();

        let orders = store.find_orders_by_customer(UserId::new(1)).await.unwrap();
        assert_eq!(orders.len(), 2);
        assert!(orders.iter().all(|o| o.customer_id == UserId::new(1)));
    }

    #[tokio::test]
    async fn active_customer_query_ignores_terminal_orders() {
        let store = InMemoryStore::new();
        store.save_order(order(7, "CANCELADO", None)).await.unwrap();
        store.save_order(order(7, "ENTREGADO", None)).await.unwrap();

        assert!(
            !store
                .exists_active_order_for_customer(UserId::new(7))
                .await
                .unwrap()
        );

        store.save_order(order(7, "en camino", None)).await.unwrap();
        assert!(
            store
                .exists_active_order_for_customer(UserId::new(7))
                .await
                .unwrap()
        );
        assert!(
            !store
                .exists_active_order_for_customer(UserId::new(8))
                .await
                .unwrap()
        );
    }

    #[tokio::test]
    async fn line_text_query_accepts_both_shapes() {
        let store = InMemoryStore::new();
        store
            .save_order(order(1, "pendiente", Some(r#"[{"code": "FG001","quantity":1}]"#)))
            .await
            .unwrap();
        store
            .save_order(order(1, "pendiente", Some(r#"[{"code":"JM002","quantity":1}]"#)))
            .await
            .unwrap();

        assert!(
            store
                .exists_active_order_with_line_text(&needles("FG001"))
                .await
                .unwrap()
        );
        assert!(
            store
                .exists_active_order_with_line_text(&needles("JM002"))
                .await
                .unwrap()
        );
        assert!(
            !store
                .exists_active_order_with_line_text(&needles("FG00"))
                .await
                .unwrap()
        );
    }

    #[tokio::test]
    async fn line_text_query_skips_terminal_and_empty_orders() {
        let store = InMemoryStore::new();
        store
            .save_order(order(1, "CANCELADO", Some(r#"[{"code":"FG001"}]"#)))
            .await
            .unwrap();
        store.save_order(order(1, "pendiente", None)).await.unwrap();

        assert!(
            !store
                .exists_active_order_with_line_text(&needles("FG001"))
                .await
                .unwrap()
        );
    }

    #[tokio::test]
    async fn product_save_overwrites_by_code() {
        let store = InMemoryStore::new();
        let mut product = Product {
            code: ProductCode::new("FG001"),
            name: "Frodo".to_string(),
            image: "/img/frodo.png".to_string(),
            price: 29990,
            manufacturer: "LOTR Toys".to_string(),
            distributor: "LOTR Dist".to_string(),
            brand: "LOTR".to_string(),
            material: "Plastic".to_string(),
            description: "Frodo figure".to_string(),
            link: "frodo.html".to_string(),
            category: "figures".to_string(),
        };
        store.save_product(product.clone()).await.unwrap();

        product.price = 19990;
        store.save_product(product.clone()).await.unwrap();

        let all = store.find_all_products().await.unwrap();
        assert_eq!(all.len(), 1);
        assert_eq!(all[0].price, 19990);
        assert!(store.product_exists(&product.code).await.unwrap());

        let found = store
            .search_products(ProductQuery::for_price_range(10000, 20000))
            .await
            .unwrap();
        assert_eq!(found, vec![product]);
    }
}
