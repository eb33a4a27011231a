//! Text encoding of an order's line items.
//!
//! Line items live in a single text column as a JSON array. Neither direction
//! ever fails: anything that cannot be encoded or decoded degrades to an empty
//! list so the order itself stays readable. Callers that need strict
//! validation must validate before encoding.

use common::ProductCode;

use super::LineItem;

/// Canonical encoding of an empty line-item list.
pub const EMPTY_LINE_ITEMS: &str = "[]";

/// JSON field holding a line item's product code.
const CODE_FIELD: &str = "code";

/// Encodes line items as JSON text.
///
/// Falls back to [`EMPTY_LINE_ITEMS`] if serialization fails.
pub fn encode_line_items(items: &[LineItem]) -> String {
    match serde_json::to_string(items) {
        Ok(text) => text,
        Err(error) => {
            degraded("encode", &error);
            EMPTY_LINE_ITEMS.to_string()
        }
    }
}

/// Decodes line items from stored text.
///
/// Absent, blank, `null` and malformed text all decode to an empty list.
/// `null` elements inside the array are skipped.
pub fn decode_line_items(text: Option<&str>) -> Vec<LineItem> {
    let Some(text) = text.filter(|t| !t.trim().is_empty()) else {
        return Vec::new();
    };

    match serde_json::from_str::<Option<Vec<Option<LineItem>>>>(text) {
        Ok(items) => items.into_iter().flatten().flatten().collect(),
        Err(error) => {
            degraded("decode", &error);
            Vec::new()
        }
    }
}

/// Returns the substrings that mark `code` inside encoded line items.
///
/// Two shapes are accepted: with and without a space after the colon. The
/// code is JSON-quoted, so `FG00` never matches an item coded `FG001`.
pub fn code_needles(code: &ProductCode) -> Vec<String> {
    let quoted = serde_json::Value::String(code.to_string()).to_string();
    vec![
        format!("\"{CODE_FIELD}\":{quoted}"),
        format!("\"{CODE_FIELD}\": {quoted}"),
    ]
}

fn degraded(direction: &'static str, error: &serde_json::Error) {
    tracing::warn!(direction, %error, "line items degraded to an empty list");
    metrics::counter!("line_item_codec_degraded_total", "direction" => direction).increment(1);
}
