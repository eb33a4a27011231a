//! Line items embedded in an order.

use common::ProductCode;
use serde::{Deserialize, Deserializer, Serialize, de};

/// Snapshot of one product inside an order.
///
/// A line item copies the product's code, name and price at the time the
/// order is written; later catalog changes do not reach it. Quantity and price
/// may be missing in stored data. Such items are kept as-is and count as zero
/// towards the order total.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LineItem {
    /// Code of the referenced product. Not checked against the catalog.
    #[serde(default)]
    pub code: ProductCode,

    /// Product name at the time of ordering.
    #[serde(default)]
    pub name: String,

    /// Units ordered. Integral floats such as `2.0` are accepted.
    #[serde(default, deserialize_with = "integral_quantity")]
    pub quantity: Option<i32>,

    /// Unit price at the time of ordering.
    #[serde(default)]
    pub price: Option<f64>,
}

impl LineItem {
    /// Creates a fully populated line item.
    pub fn new(
        code: impl Into<ProductCode>,
        name: impl Into<String>,
        quantity: i32,
        price: f64,
    ) -> Self {
        Self {
            code: code.into(),
            name: name.into(),
            quantity: Some(quantity),
            price: Some(price),
        }
    }

    /// Returns `quantity × price`, or zero when either is missing.
    pub fn subtotal(&self) -> f64 {
        match (self.quantity, self.price) {
            (Some(quantity), Some(price)) => f64::from(quantity) * price,
            _ => 0.0,
        }
    }
}

fn integral_quantity<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<i32>, D::Error> {
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Number {
        Int(i64),
        Float(f64),
    }

    let quantity = match Option::<Number>::deserialize(deserializer)? {
        None => return Ok(None),
        Some(Number::Int(value)) => i32::try_from(value).ok(),
        Some(Number::Float(value))
            if value.fract() == 0.0
                && value >= f64::from(i32::MIN)
                && value <= f64::from(i32::MAX) =>
        {
            Some(value as i32)
        }
        Some(Number::Float(_)) => None,
    };
    quantity
        .map(Some)
        .ok_or_else(|| de::Error::custom("quantity must be a 32-bit integer"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn subtotal_multiplies_quantity_and_price() {
        let item = LineItem::new("FG001", "Frodo", 3, 1000.0);
        assert_eq!(item.subtotal(), 3000.0);
    }

    #[test]
    fn subtotal_is_zero_when_a_factor_is_missing() {
        let mut item = LineItem::new("FG001", "Frodo", 3, 1000.0);
        item.quantity = None;
        assert_eq!(item.subtotal(), 0.0);

        let mut item = LineItem::new("FG001", "Frodo", 3, 1000.0);
        item.price = None;
        assert_eq!(item.subtotal(), 0.0);
    }

    #[test]
    fn missing_fields_deserialize_as_empty() {
        let item: LineItem = serde_json::from_str("{}").unwrap();
        assert_eq!(item.code.as_str(), "");
        assert_eq!(item.name, "");
        assert_eq!(item.quantity, None);
        assert_eq!(item.price, None);
    }

    #[test]
    fn integral_float_quantity_is_accepted() {
        let item: LineItem = serde_json::from_str(r#"{"code":"FG001","quantity":2.0}"#).unwrap();
        assert_eq!(item.quantity, Some(2));
    }

    #[test]
    fn fractional_or_oversized_quantity_is_rejected() {
        assert!(serde_json::from_str::<LineItem>(r#"{"quantity":2.5}"#).is_err());
        assert!(serde_json::from_str::<LineItem>(r#"{"quantity":4294967296}"#).is_err());
        assert!(serde_json::from_str::<LineItem>(r#"{"quantity":"two"}"#).is_err());
    }

    #[test]
    fn null_quantity_deserializes_as_missing() {
        let item: LineItem = serde_json::from_str(r#"{"quantity":null}"#).unwrap();
        assert_eq!(item.quantity, None);
    }
}
