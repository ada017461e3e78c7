//! Wire adapter for [`Expression`] values.
//!
//! Drivers that speak `serde` can take an [`Expression`] directly: it
//! serializes as its lowered document and deserializes by wrapping the
//! incoming document. [`ExpressionCodec`] adds the identity-token handling a
//! collection needs when inserting documents.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::Value as JsonValue;
use tracing::debug;
use uuid::Uuid;

use crate::{
    document::{self, lower_value},
    error::{ExprError, Result},
    expression::Expression,
    value::{Scalar, Value},
};

/// Encodes and decodes expressions and manages their `_id` entry.
///
/// # Examples
///
/// ```
/// use mongo_expr::{codec::ExpressionCodec, Expression};
///
/// let codec = ExpressionCodec::new();
/// let mut doc = Expression::field("name", "widget");
/// assert!(!codec.has_id(&doc));
///
/// codec.generate_id_if_absent(&mut doc);
/// assert!(codec.has_id(&doc));
/// assert!(codec.document_id(&doc).is_ok());
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct ExpressionCodec;

impl ExpressionCodec {
    pub fn new() -> Self {
        ExpressionCodec
    }

    /// Whether `expr` carries an identity entry.
    pub fn has_id(&self, expr: &Expression) -> bool {
        expr.id().is_some()
    }

    /// Attaches a fresh identity token under `_id` unless one is present.
    pub fn generate_id_if_absent<'a>(&self, expr: &'a mut Expression) -> &'a mut Expression {
        if self.has_id(expr) {
            return expr;
        }
        let token = Uuid::new_v4();
        debug!(%token, "generated identity for expression");
        expr.append(Expression::field(Expression::ID_KEY, token))
    }

    /// The identity token in a wire-comparable form.
    ///
    /// Tokens and strings come back as JSON strings; any other identity value
    /// is returned in its lowered form.
    pub fn document_id(&self, expr: &Expression) -> Result<JsonValue> {
        match expr.id() {
            None => Err(ExprError::MissingIdentity),
            Some(Value::Scalar(Scalar::Uuid(token))) => {
                Ok(JsonValue::String(token.hyphenated().to_string()))
            }
            Some(other) => Ok(lower_value(other)),
        }
    }

    /// Lowers `expr` into a JSON document value.
    pub fn encode(&self, expr: &Expression) -> JsonValue {
        JsonValue::Object(expr.to_document())
    }

    pub fn encode_to_string(&self, expr: &Expression) -> String {
        expr.to_string()
    }

    /// Wraps a JSON document into an expression.
    pub fn decode(&self, value: JsonValue) -> Result<Expression> {
        match value {
            JsonValue::Object(map) => Ok(document::decode(map)),
            other => Err(ExprError::NotADocument(json_kind(&other))),
        }
    }

    pub fn decode_str(&self, text: &str) -> Result<Expression> {
        let value: JsonValue = serde_json::from_str(text)?;
        self.decode(value)
    }
}

fn json_kind(value: &JsonValue) -> &'static str {
    match value {
        JsonValue::Null => "null",
        JsonValue::Bool(_) => "boolean",
        JsonValue::Number(_) => "number",
        JsonValue::String(_) => "string",
        JsonValue::Array(_) => "array",
        JsonValue::Object(_) => "object",
    }
}

impl Serialize for Expression {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        self.to_document().serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for Expression {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let doc = document::Document::deserialize(deserializer)?;
        Ok(document::decode(doc))
    }
}
