pub mod error;
pub mod memory;
pub mod models;
pub mod postgres;
pub mod query;
pub mod repository;

pub use common::{EventId, OrderId, ProductCode, UserId};
pub use error::{Result, StoreError};
pub use memory::InMemoryStore;
pub use models::{Event, Product, StoredOrder, User};
pub use postgres::PostgresStore;
pub use query::ProductQuery;
pub use repository::{EventRepository, OrderRepository, ProductRepository, Store, UserRepository};
