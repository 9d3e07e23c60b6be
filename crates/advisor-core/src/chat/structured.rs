//! JSON codec for the structured list fields of assistant messages.
//!
//! Write path: a list is stored as JSON text only when it is non-empty;
//! absent and empty lists are stored as `NULL`. Items are kept as whatever
//! JSON the model produced (usually strings, sometimes objects).
//!
//! Read path: stored text that does not parse as a JSON array reads back as
//! `None`. The history view stays available when a row holds malformed
//! JSON, at the cost of hiding that row's structured fields.

use serde_json::Value;
use tracing::debug;

/// Serialize a list for storage. `None` for absent or empty lists.
pub fn encode_list(items: Option<&[Value]>) -> Option<String> {
    match items {
        Some(items) if !items.is_empty() => serde_json::to_string(items).ok(),
        _ => None,
    }
}

/// Deserialize a stored list. Malformed text is logged and treated as absent.
pub fn decode_list(raw: Option<&str>) -> Option<Vec<Value>> {
    let raw = raw?;
    match serde_json::from_str::<Vec<Value>>(raw) {
        Ok(items) => Some(items),
        Err(e) => {
            debug!(error = %e, "Ignoring malformed structured field");
            None
        }
    }
}
