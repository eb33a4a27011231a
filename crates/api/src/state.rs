//! Shared application state.

use domain::{EventService, OrderService, ProductService, UserService};
use store::Store;

/// Services shared by every handler, all backed by one store.
pub struct AppState<S: Store> {
    pub orders: OrderService<S>,
    pub products: ProductService<S, S>,
    pub users: UserService<S, S>,
    pub events: EventService<S>,
}

impl<S: Store> AppState<S> {
    /// Wires every service over `store`. The product and user services use
    /// the same store for their deletion guards.
    pub fn new(store: S) -> Self {
        Self {
            orders: OrderService::new(store.clone()),
            products: ProductService::new(store.clone(), store.clone()),
            users: UserService::new(store.clone(), store.clone()),
            events: EventService::new(store),
        }
    }
}
