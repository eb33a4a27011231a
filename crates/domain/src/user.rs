//! User service with guarded deletion.

use common::UserId;
use store::{OrderRepository, User, UserRepository};

use crate::error::DomainError;
use crate::guard::DependencyGuard;

/// Service for managing users.
#[derive(Clone)]
pub struct UserService<U: UserRepository, O: OrderRepository> {
    users: U,
    guard: DependencyGuard<O>,
}

impl<U: UserRepository, O: OrderRepository> UserService<U, O> {
    /// Creates a user service. `orders` backs the deletion guard.
    pub fn new(users: U, orders: O) -> Self {
        Self {
            users,
            guard: DependencyGuard::new(orders),
        }
    }

    /// Creates a user with a freshly generated id.
    #[tracing::instrument(skip(self, user), fields(username = %user.username))]
    pub async fn create(&self, mut user: User) -> Result<User, DomainError> {
        user.id = None;
        Ok(self.users.save_user(user).await?)
    }

    /// Lists every user.
    #[tracing::instrument(skip(self))]
    pub async fn list(&self) -> Result<Vec<User>, DomainError> {
        Ok(self.users.find_all_users().await?)
    }

    /// Loads a user by id.
    #[tracing::instrument(skip(self))]
    pub async fn get(&self, id: UserId) -> Result<Option<User>, DomainError> {
        Ok(self.users.find_user(id).await?)
    }

    /// Replaces every field except the id.
    #[tracing::instrument(skip(self, user))]
    pub async fn update(&self, id: UserId, user: User) -> Result<User, DomainError> {
        if self.users.find_user(id).await?.is_none() {
            return Err(DomainError::not_found("User", id));
        }

        let replacement = User {
            id: Some(id),
            ..user
        };
        Ok(self.users.save_user(replacement).await?)
    }

    /// Deletes a user unless an active order still names them as customer.
    #[tracing::instrument(skip(self))]
    pub async fn delete(&self, id: UserId) -> Result<(), DomainError> {
        if !self.users.user_exists(id).await? {
            return Err(DomainError::not_found("User", id));
        }

        if self.guard.has_active_order_for_customer(id).await? {
            metrics::counter!("deletions_blocked_total", "entity" => "user").increment(1);
            tracing::info!(user_id = %id, "user deletion blocked by active orders");
            return Err(DomainError::conflict(format!(
                "User {id} cannot be deleted because the user still has pending or active \
                 orders. Cancel or complete every active order of this user first."
            )));
        }

        self.users.delete_user(id).await?;
        tracing::info!(user_id = %id, "user deleted");
        Ok(())
    }

    /// Reports whether [`delete`](Self::delete) would currently succeed.
    #[tracing::instrument(skip(self))]
    pub async fn can_delete(&self, id: UserId) -> Result<bool, DomainError> {
        if !self.users.user_exists(id).await? {
            return Ok(false);
        }
        Ok(!self.guard.has_active_order_for_customer(id).await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use store::{InMemoryStore, StoredOrder};

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

    async fn seed_order(store: &InMemoryStore, customer: UserId, status: &str) {
        store
            .save_order(StoredOrder {
                id: None,
                date: "2025-11-20".to_string(),
                customer_id: customer,
                line_items: Some("[]".to_string()),
                status: status.to_string(),
                total: Some(0.0),
            })
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn create_ignores_client_id() {
        let store = InMemoryStore::new();
        let service = UserService::new(store.clone(), store);
        let mut input = user("ana");
        input.id = Some(UserId::new(50));

        let created = service.create(input).await.unwrap();

        assert_eq!(created.id, Some(UserId::new(1)));
    }

    #[tokio::test]
    async fn update_keeps_id() {
        let store = InMemoryStore::new();
        let service = UserService::new(store.clone(), store);
        let id = service.create(user("ana")).await.unwrap().id.unwrap();

        let mut changes = user("ana.maria");
        changes.id = Some(UserId::new(99));
        changes.discount_eligible = true;
        let updated = service.update(id, changes).await.unwrap();

        assert_eq!(updated.id, Some(id));
        assert_eq!(updated.username, "ana.maria");
        assert!(updated.discount_eligible);
        assert!(service.get(UserId::new(99)).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn update_missing_user_is_not_found() {
        let store = InMemoryStore::new();
        let service = UserService::new(store.clone(), store);

        let result = service.update(UserId::new(3), user("ghost")).await;

        assert!(matches!(result, Err(DomainError::NotFound { .. })));
    }

    #[tokio::test]
    async fn delete_blocked_while_order_active() {
        let store = InMemoryStore::new();
        let service = UserService::new(store.clone(), store.clone());
        let id = service.create(user("ana")).await.unwrap().id.unwrap();
        seed_order(&store, id, "pendiente").await;

        let err = service.delete(id).await.unwrap_err();

        assert!(matches!(err, DomainError::Conflict { .. }));
        assert!(err.to_string().contains("active orders"));
        assert!(!service.can_delete(id).await.unwrap());
        assert!(service.get(id).await.unwrap().is_some());
    }

    #[tokio::test]
    async fn delete_allowed_when_orders_are_terminal() {
        let store = InMemoryStore::new();
        let service = UserService::new(store.clone(), store.clone());
        let id = service.create(user("ana")).await.unwrap().id.unwrap();
        seed_order(&store, id, "CANCELADO").await;
        seed_order(&store, id, "ENTREGADO").await;

        assert!(service.can_delete(id).await.unwrap());
        service.delete(id).await.unwrap();
        assert!(service.get(id).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn delete_missing_user_is_not_found() {
        let store = InMemoryStore::new();
        let service = UserService::new(store.clone(), store);

        let result = service.delete(UserId::new(12)).await;

        assert!(matches!(result, Err(DomainError::NotFound { .. })));
        assert!(!service.can_delete(UserId::new(12)).await.unwrap());
    }
}
