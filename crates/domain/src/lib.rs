//! Domain layer for the catalog and orders service.
//!
//! This crate provides:
//! - Line items, their text codec and the order total calculator
//! - The order aggregate and its service
//! - The dependency guard that blocks deleting products and users still
//!   referenced by active orders
//! - Product, user and event services built on the store repositories

pub mod error;
pub mod event;
pub mod guard;
pub mod order;
pub mod product;
pub mod user;

pub use error::DomainError;
pub use event::EventService;
pub use guard::DependencyGuard;
pub use order::{
    EMPTY_LINE_ITEMS, LineItem, Order, OrderService, code_needles, compute_total,
    decode_line_items, encode_line_items,
};
pub use product::ProductService;
pub use user::UserService;
