//! # Attributes
//!
//! Line items store their fields as a loose name → JSON value mapping, and
//! default resolution reads fields out of records that may not exist at all.
//! [`lookup`] is the one helper for the latter.

use serde_json::{Map, Value};

/// Named attribute values of a line item.
pub type Attributes = Map<String, Value>;

/// Reads `path` (dot separated) out of a possibly absent record.
///
/// Returns the value found, or `fallback` when the record is `None` or any
/// path segment is missing. Array elements are addressed by index
/// (`"taxes.0.id"`). A field that is present but `null` is returned as
/// `null`: only absence falls back.
///
/// ## Example
/// ```rust
/// use cartline_core::attributes::lookup;
/// use serde_json::json;
///
/// let option = json!({ "price": 12.5, "meta": { "code": "SVC" } });
/// assert_eq!(lookup(Some(&option), "price", json!(0)), json!(12.5));
/// assert_eq!(lookup(Some(&option), "meta.code", json!("")), json!("SVC"));
/// assert_eq!(lookup(Some(&option), "tax_class", json!("")), json!(""));
/// assert_eq!(lookup(None, "price", json!(0)), json!(0));
/// ```
pub fn lookup(record: Option<&Value>, path: &str, fallback: Value) -> Value {
    let mut current = match record {
        Some(value) => value,
        None => return fallback,
    };

    for segment in path.split('.') {
        let next = match current {
            Value::Object(map) => map.get(segment),
            Value::Array(items) => segment.parse::<usize>().ok().and_then(|i| items.get(i)),
            _ => None,
        };
        match next {
            Some(value) => current = value,
            None => return fallback,
        }
    }

    current.clone()
}

/// Builds an attribute map from `(name, value)` pairs.
pub fn attributes<I, K, V>(pairs: I) -> Attributes
where
    I: IntoIterator<Item = (K, V)>,
    K: Into<String>,
    V: Into<Value>,
{
    pairs
        .into_iter()
        .map(|(k, v)| (k.into(), v.into()))
        .collect()
}
