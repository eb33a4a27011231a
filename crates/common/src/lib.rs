//! Shared types for the catalog and orders service.

pub mod status;
mod types;

pub use status::{TERMINAL_STATUSES, is_active};
pub use types::{EventId, OrderId, ProductCode, UserId};
