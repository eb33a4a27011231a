//! Row types persisted by the store.

use common::{EventId, OrderId, ProductCode, UserId};
use serde::{Deserialize, Serialize};

/// A catalog product, keyed by its code.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    pub code: ProductCode,
    pub name: String,
    pub image: String,
    /// Price in whole currency units.
    pub price: i32,
    pub manufacturer: String,
    pub distributor: String,
    pub brand: String,
    pub material: String,
    pub description: String,
    pub link: String,
    pub category: String,
}

/// A registered user.
///
/// The password is kept as an opaque string and is neither hashed nor
/// hidden from responses.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    #[serde(default)]
    pub id: Option<UserId>,
    pub username: String,
    pub email: String,
    pub password: String,
    pub birth_date: String,
    pub phone: String,
    pub address: String,
    pub region: String,
    pub commune: String,
    pub role: String,
    pub discount_eligible: bool,
    pub profile_image: String,
}

/// A promotional event shown in the catalog.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Event {
    #[serde(default)]
    pub id: Option<EventId>,
    pub image_src: String,
    pub image_alt: String,
    pub title: String,
    pub description: String,
}

/// An order row as it sits in storage.
///
/// Line items are carried only in their encoded form. The store never
/// decodes them and never recomputes `total`; both are written exactly as
/// the caller hands them over.
#[derive(Debug, Clone, PartialEq)]
pub struct StoredOrder {
    /// `None` until the store assigns a key on first save.
    pub id: Option<OrderId>,
    /// ISO-8601 date string.
    pub date: String,
    pub customer_id: UserId,
    /// Encoded line items. Rows written outside the service may leave it empty.
    pub line_items: Option<String>,
    pub status: String,
    pub total: Option<f64>,
}
