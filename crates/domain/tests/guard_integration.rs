//! Integration tests for guarded deletion across the order, product and user
//! services.
//!
//! These tests drive the services the way the HTTP layer does, sharing one
//! in-memory store between them.

use common::{ProductCode, UserId};
use domain::{DomainError, LineItem, Order, OrderService, ProductService, UserService};
use store::{InMemoryStore, Product, User, UserRepository};

struct Services {
    store: InMemoryStore,
    orders: OrderService<InMemoryStore>,
    products: ProductService<InMemoryStore, InMemoryStore>,
    users: UserService<InMemoryStore, InMemoryStore>,
}

/// Helper to wire every service over a fresh store
fn create_services() -> Services {
    let store = InMemoryStore::new();
    Services {
        orders: OrderService::new(store.clone()),
        products: ProductService::new(store.clone(), store.clone()),
        users: UserService::new(store.clone(), store.clone()),
        store,
    }
}

fn product(code: &str, name: &str, price: i32) -> Product {
    Product {
        code: ProductCode::new(code),
        name: name.to_string(),
        image: format!("/img/{code}.png"),
        price,
        manufacturer: "Acme".to_string(),
        distributor: "Acme Dist".to_string(),
        brand: "Acme".to_string(),
        material: "Plastic".to_string(),
        description: format!("{name} description"),
        link: format!("{code}.html"),
        category: "figures".to_string(),
    }
}

fn user(id: Option<i32>, username: &str) -> User {
    User {
        id: id.map(UserId::new),
        username: username.to_string(),
        email: format!("{username}@example.com"),
        password: "secret".to_string(),
        birth_date: "1990-01-01".to_string(),
        phone: "+56922222222".to_string(),
        address: "Calle 1".to_string(),
        region: "RM".to_string(),
        commune: "Providencia".to_string(),
        role: "client".to_string(),
        discount_eligible: false,
        profile_image: "/img/user.png".to_string(),
    }
}

mod product_guard {
    use super::*;

    #[tokio::test]
    async fn active_order_blocks_until_cancelled() {
        let s = create_services();
        s.products
            .create(product("FG001", "Frodo", 29990))
            .await
            .unwrap();
        let order = s
            .orders
            .create(Order::new(
                "2025-11-20",
                UserId::new(1),
                vec![LineItem::new("FG001", "Frodo", 1, 29990.0)],
                "en preparacion",
            ))
            .await
            .unwrap();
        let order_id = order.id.unwrap();
        let code = ProductCode::new("FG001");

        assert!(!s.products.can_delete(&code).await.unwrap());
        let err = s.products.delete(&code).await.unwrap_err();
        assert!(matches!(err, DomainError::Conflict { .. }));
        assert!(s.products.get(&code).await.unwrap().is_some());

        s.orders.update_status(order_id, "CANCELADO").await.unwrap();

        assert!(s.products.can_delete(&code).await.unwrap());
        s.products.delete(&code).await.unwrap();
        assert!(s.products.get(&code).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn delivered_order_does_not_block() {
        let s = create_services();
        s.products
            .create(product("JM001", "Catan", 45990))
            .await
            .unwrap();
        s.orders
            .create(Order::new(
                "2025-11-20",
                UserId::new(1),
                vec![LineItem::new("JM001", "Catan", 2, 45990.0)],
                "ENTREGADO",
            ))
            .await
            .unwrap();

        s.products.delete(&ProductCode::new("JM001")).await.unwrap();
    }

    #[tokio::test]
    async fn only_referenced_product_is_blocked() {
        let s = create_services();
        s.products
            .create(product("FG001", "Frodo", 29990))
            .await
            .unwrap();
        s.products
            .create(product("FG002", "Sam", 24990))
            .await
            .unwrap();
        s.orders
            .create(Order::new(
                "2025-11-20",
                UserId::new(1),
                vec![LineItem::new("FG001", "Frodo", 1, 29990.0)],
                "pendiente",
            ))
            .await
            .unwrap();

        assert!(!s.products.can_delete(&ProductCode::new("FG001")).await.unwrap());
        assert!(s.products.can_delete(&ProductCode::new("FG002")).await.unwrap());
    }

    #[tokio::test]
    async fn can_delete_is_stable_without_writes() {
        let s = create_services();
        s.products
            .create(product("FG001", "Frodo", 29990))
            .await
            .unwrap();
        s.orders
            .create(Order::new(
                "2025-11-20",
                UserId::new(1),
                vec![LineItem::new("FG001", "Frodo", 1, 29990.0)],
                "en camino",
            ))
            .await
            .unwrap();
        let code = ProductCode::new("FG001");

        let first = s.products.can_delete(&code).await.unwrap();
        let second = s.products.can_delete(&code).await.unwrap();

        assert_eq!(first, second);
        assert!(!first);
    }
}

mod user_guard {
    use super::*;

    #[tokio::test]
    async fn order_in_transit_blocks_user() {
        let s = create_services();
        s.store.save_user(user(Some(7), "frodo")).await.unwrap();
        s.orders
            .create(Order::new("2025-11-20", UserId::new(7), vec![], "en camino"))
            .await
            .unwrap();

        let err = s.users.delete(UserId::new(7)).await.unwrap_err();

        assert!(matches!(err, DomainError::Conflict { .. }));
        assert!(s.users.get(UserId::new(7)).await.unwrap().is_some());
    }

    #[tokio::test]
    async fn user_without_active_orders_is_deleted() {
        let s = create_services();
        s.store.save_user(user(Some(7), "frodo")).await.unwrap();
        s.orders
            .create(Order::new("2025-11-20", UserId::new(7), vec![], "ENTREGADO"))
            .await
            .unwrap();
        s.orders
            .create(Order::new("2025-11-21", UserId::new(8), vec![], "pendiente"))
            .await
            .unwrap();

        s.users.delete(UserId::new(7)).await.unwrap();

        assert!(s.users.get(UserId::new(7)).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn generated_ids_skip_past_explicit_ones() {
        let s = create_services();
        s.store.save_user(user(Some(7), "frodo")).await.unwrap();

        let created = s.users.create(user(None, "sam")).await.unwrap();

        assert_eq!(created.id, Some(UserId::new(8)));
    }
}

mod order_lifecycle {
    use super::*;

    #[tokio::test]
    async fn status_change_preserves_line_items_and_total() {
        let s = create_services();
        let order = s
            .orders
            .create(Order::new(
                "2025-11-20",
                UserId::new(1),
                vec![
                    LineItem::new("FG001", "Frodo", 2, 10.0),
                    LineItem::new("JM001", "Catan", 1, 5.5),
                ],
                "pendiente",
            ))
            .await
            .unwrap();
        let id = order.id.unwrap();
        assert_eq!(order.total, Some(25.5));

        let updated = s.orders.update_status(id, "en camino").await.unwrap();

        assert_eq!(updated.status, "en camino");
        assert_eq!(updated.total, Some(25.5));
        assert_eq!(updated.line_items, order.line_items);
    }

    #[tokio::test]
    async fn listing_by_customer_decodes_items() {
        let s = create_services();
        s.orders
            .create(Order::new(
                "2025-11-20",
                UserId::new(4),
                vec![LineItem::new("FG001", "Frodo", 1, 29990.0)],
                "pendiente",
            ))
            .await
            .unwrap();
        s.orders
            .create(Order::new("2025-11-20", UserId::new(5), vec![], "pendiente"))
            .await
            .unwrap();

        let orders = s.orders.list_by_customer(UserId::new(4)).await.unwrap();

        assert_eq!(orders.len(), 1);
        assert_eq!(orders[0].line_items.len(), 1);
        assert_eq!(orders[0].line_items[0].code.as_str(), "FG001");
    }

    #[tokio::test]
    async fn deleting_order_releases_product() {
        let s = create_services();
        s.products
            .create(product("FG001", "Frodo", 29990))
            .await
            .unwrap();
        let order = s
            .orders
            .create(Order::new(
                "2025-11-20",
                UserId::new(1),
                vec![LineItem::new("FG001", "Frodo", 1, 29990.0)],
                "pendiente",
            ))
            .await
            .unwrap();

        s.orders.delete(order.id.unwrap()).await.unwrap();

        assert!(s.products.can_delete(&ProductCode::new("FG001")).await.unwrap());
        assert_eq!(s.store.order_count().await, 0);
    }
}
