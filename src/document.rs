//! Lowering between [`Expression`] trees and plain documents.
//!
//! A [`Document`] is the nested key-value structure handed to the database
//! boundary: a `serde_json` object whose keys keep their insertion order.
//!
//! # Lowering rules
//!
//! - nested expressions become nested objects under the same key
//! - sequences become arrays with their element order preserved
//! - sets become arrays in set order (callers must not rely on it)
//! - scalars pass through; decimals and identity tokens use the extended JSON
//!   wrappers `{"$numberDecimal": "..."}` and `{"$uuid": "..."}`
//! - non-finite floats have no JSON form and lower to `null`
//!
//! # Examples
//!
//! ```
//! use mongo_expr::{near, document::to_json};
//!
//! let doc = near("loc", 10.0, 20.0, 500).to_document();
//! assert_eq!(
//!     to_json(doc),
//!     r#"{"loc":{"$near":{"$maxDistance":500,"$geometry":{"type":"Point","coordinates":[10.0,20.0]}}}}"#
//! );
//! ```

use std::str::FromStr;

use rust_decimal::Decimal;
use serde_json::{Map, Number, Value as JsonValue};
use uuid::Uuid;

use crate::{
    expression::Expression,
    value::{Scalar, Value},
};

/// Canonical document form of an expression
pub type Document = Map<String, JsonValue>;

/// Extended JSON wrapper key for decimals
pub const DECIMAL_KEY: &str = "$numberDecimal";
/// Extended JSON wrapper key for identity tokens
pub const UUID_KEY: &str = "$uuid";

/// Lowers an expression into its document form.
///
/// The empty expression lowers to an empty document.
pub fn lower(expr: &Expression) -> Document {
    expr.iter()
        .map(|(key, value)| (key.to_string(), lower_value(value)))
        .collect()
}

/// Lowers a single value.
pub fn lower_value(value: &Value) -> JsonValue {
    match value {
        Value::Expression(expr) => JsonValue::Object(lower(expr)),
        // Element order is significant for sequences (geo coordinates).
        Value::Sequence(items) => JsonValue::Array(items.iter().map(lower_value).collect()),
        Value::Set(items) => JsonValue::Array(items.iter().map(lower_value).collect()),
        Value::Scalar(scalar) => lower_scalar(scalar),
    }
}

fn lower_scalar(scalar: &Scalar) -> JsonValue {
    match scalar {
        Scalar::Null => JsonValue::Null,
        Scalar::Boolean(b) => JsonValue::Bool(*b),
        Scalar::Integer(i) => JsonValue::Number((*i).into()),
        Scalar::Float(f) => Number::from_f64(*f)
            .map(JsonValue::Number)
            .unwrap_or(JsonValue::Null),
        Scalar::Decimal(d) => wrapper(DECIMAL_KEY, d.to_string()),
        Scalar::String(s) => JsonValue::String(s.clone()),
        Scalar::Uuid(id) => wrapper(UUID_KEY, id.hyphenated().to_string()),
    }
}

fn wrapper(key: &str, text: String) -> JsonValue {
    let mut map = Map::with_capacity(1);
    map.insert(key.to_string(), JsonValue::String(text));
    JsonValue::Object(map)
}

/// Wraps a document's entries into an expression.
///
/// Nested objects become nested expressions and arrays become sequences, so
/// lowering the result again yields the same document.
pub fn decode(doc: Document) -> Expression {
    doc.into_iter()
        .map(|(key, value)| (key, decode_value(value)))
        .collect()
}

/// Decodes a single document value.
pub fn decode_value(value: JsonValue) -> Value {
    match value {
        JsonValue::Null => Value::Scalar(Scalar::Null),
        JsonValue::Bool(b) => Value::Scalar(Scalar::Boolean(b)),
        JsonValue::Number(n) => {
            if let Some(i) = n.as_i64() {
                Value::Scalar(Scalar::Integer(i))
            } else if let Some(f) = n.as_f64() {
                Value::Scalar(Scalar::Float(f))
            } else {
                Value::Scalar(Scalar::Null)
            }
        }
        JsonValue::String(s) => Value::Scalar(Scalar::String(s)),
        JsonValue::Array(items) => Value::Sequence(items.into_iter().map(decode_value).collect()),
        JsonValue::Object(map) => match unwrap_scalar(&map) {
            Some(scalar) => Value::Scalar(scalar),
            None => Value::Expression(decode(map)),
        },
    }
}

/// Recognizes the single-key extended JSON wrappers produced by lowering.
///
/// Only text in the exact form lowering writes is unwrapped; anything else
/// stays a nested expression so decoding never rewrites user data.
fn unwrap_scalar(map: &Document) -> Option<Scalar> {
    if map.len() != 1 {
        return None;
    }
    let (key, value) = map.iter().next()?;
    let text = value.as_str()?;
    match key.as_str() {
        DECIMAL_KEY => Decimal::from_str(text)
            .ok()
            .filter(|d| d.to_string() == text)
            .map(Scalar::Decimal),
        UUID_KEY => Uuid::parse_str(text)
            .ok()
            .filter(|id| id.hyphenated().to_string() == text)
            .map(Scalar::Uuid),
        _ => None,
    }
}

/// Compact JSON text of a document.
pub fn to_json(doc: Document) -> String {
    JsonValue::Object(doc).to_string()
}

/// JSON text of a document with 2-space indentation.
pub fn to_json_pretty(doc: Document) -> String {
    format!("{:#}", JsonValue::Object(doc))
}
