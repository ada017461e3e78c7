//! # Expressions
//!
//! An [`Expression`] is an insertion-ordered mapping from a field path or an
//! operator token (`$gt`, `$and`, ...) to a [`Value`]. It is the building block
//! for filters, updates and aggregation stages.
//!
//! ## Composition
//!
//! Single-field expressions are wrapped in operators by chaining:
//!
//! ```
//! use mongo_expr::Expression;
//!
//! let adult = Expression::field("age", 18).gte().unwrap();
//! assert_eq!(adult.to_string(), r#"{"age":{"$gte":18}}"#);
//! ```
//!
//! Independent conditions are merged with `$and`/`$or`. Merging flattens
//! nested combinators of the same kind, drops empty operands and collapses
//! duplicates, so the resulting tree stays canonical no matter how many call
//! sites contributed to it:
//!
//! ```
//! use mongo_expr::{and, Expression};
//!
//! let a = Expression::field("a", 1);
//! let b = Expression::field("b", 2);
//! let c = Expression::field("c", 3);
//!
//! let nested = and([and([a.clone(), b.clone()]), c.clone()]);
//! assert_eq!(nested, and([a, b, c]));
//! ```
//!
//! ## Equality
//!
//! Key order never matters. Sequence and set values are compared as element
//! sets, so `and([a, b]) == and([b, a])`.

use std::fmt;

use indexmap::IndexMap;
use tracing::trace;

use crate::{
    builder::identity_str,
    document::{self, Document},
    error::{ExprError, Result},
    value::{Scalar, Value, insert_unique},
};

/// Operator token for conjunction
pub const AND: &str = "$and";
/// Operator token for disjunction
pub const OR: &str = "$or";

/// A query, update or aggregation fragment.
///
/// See the [module documentation](self) for the composition rules.
#[derive(Debug, Clone, Default)]
pub struct Expression {
    entries: IndexMap<String, Value>,
}

impl Expression {
    /// Reserved key holding a document's identity token
    pub const ID_KEY: &'static str = "_id";

    /// The empty expression ("no constraint").
    pub fn empty() -> Self {
        Self::default()
    }

    /// Singleton expression `{key: value}`.
    pub fn field(key: impl Into<String>, value: impl Into<Value>) -> Self {
        let mut entries = IndexMap::with_capacity(1);
        entries.insert(key.into(), value.into());
        Expression { entries }
    }

    /// Wraps the entries of a lowered document without reinterpreting them.
    pub fn from_document(doc: Document) -> Self {
        document::decode(doc)
    }

    /// Lowers this expression into its canonical document form.
    pub fn to_document(&self) -> Document {
        document::lower(self)
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.entries.get(key)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    /// Iterates entries in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// The value stored under `_id`, if any.
    pub fn id(&self) -> Option<&Value> {
        self.entries.get(Self::ID_KEY)
    }

    /// Sets a single entry in place, overwriting any previous value.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<Value>) -> &mut Self {
        self.entries.insert(key.into(), value.into());
        self
    }

    /// Overlays every entry of `other` onto this expression in place.
    ///
    /// Keys already present are overwritten (last write wins) and keep their
    /// position; new keys are appended. Overlay requires exclusive access, so
    /// callers sharing an expression across threads must synchronize it
    /// themselves.
    ///
    /// # Examples
    ///
    /// ```
    /// use mongo_expr::Expression;
    ///
    /// let mut e = Expression::field("a", 1);
    /// e.append(Expression::field("a", 2));
    /// assert_eq!(e, Expression::field("a", 2));
    /// ```
    pub fn append(&mut self, other: Expression) -> &mut Self {
        for (key, value) in other.entries {
            self.entries.insert(key, value);
        }
        self
    }

    /// Consuming form of [`append`](Self::append) for builder chains.
    pub fn with(mut self, other: Expression) -> Self {
        self.append(other);
        self
    }

    // Single-field operators

    pub fn gt(&self) -> Result<Expression> {
        self.nest("$gt")
    }

    pub fn gte(&self) -> Result<Expression> {
        self.nest("$gte")
    }

    pub fn lt(&self) -> Result<Expression> {
        self.nest("$lt")
    }

    pub fn lte(&self) -> Result<Expression> {
        self.nest("$lte")
    }

    pub fn ne(&self) -> Result<Expression> {
        self.nest("$ne")
    }

    pub fn not(&self) -> Result<Expression> {
        self.nest("$not")
    }

    pub fn exists(&self) -> Result<Expression> {
        self.nest("$exists")
    }

    pub fn elem_match(&self) -> Result<Expression> {
        self.nest("$elemMatch")
    }

    /// `{field: {$elemMatch: self}}`, matching array elements against this
    /// whole expression.
    pub fn elem_match_on(&self, field: impl Into<String>) -> Expression {
        Expression::field(field, Expression::field("$elemMatch", self.clone()))
    }

    /// Moves the single entry's value under `op`: `{f: v}` becomes
    /// `{f: {op: v}}`.
    ///
    /// The empty expression passes through unchanged.
    fn nest(&self, op: &str) -> Result<Expression> {
        let mut entries = self.entries.iter();
        match (entries.next(), entries.next()) {
            (None, _) => Ok(Expression::empty()),
            (Some((key, value)), None) => Ok(nest_value(op, key.clone(), value.clone())),
            _ => Err(ExprError::InvalidShape {
                op: op.to_string(),
                entries: self.entries.len(),
            }),
        }
    }

    /// `$and` of this expression and `other`.
    pub fn and(self, other: Expression) -> Expression {
        merge(AND, [self, other])
    }

    /// `$or` of this expression and `other`.
    pub fn or(self, other: Expression) -> Expression {
        merge(OR, [self, other])
    }

    /// Splits this expression into one single-key expression per entry.
    ///
    /// Identity tokens are rendered in string form so that they compare
    /// consistently with tokens built through [`identity_str`].
    pub fn nested_expressions(&self) -> Vec<Expression> {
        self.entries
            .iter()
            .map(|(key, value)| match value {
                Value::Scalar(Scalar::Uuid(token)) => identity_str(key.clone(), *token),
                other => Expression::field(key.clone(), other.clone()),
            })
            .collect()
    }

    /// Renders the lowered document as indented JSON.
    pub fn to_json_pretty(&self) -> String {
        document::to_json_pretty(self.to_document())
    }
}

/// `{field: {op: value}}`
pub(crate) fn nest_value(op: &str, field: impl Into<String>, value: impl Into<Value>) -> Expression {
    Expression::field(field, Expression::field(op, value))
}

/// Merges `exprs` under the combinator `op` (`$and` or `$or`).
///
/// Empty operands are skipped, operands that are themselves `op`
/// combinators are spliced in, and structurally equal operands collapse.
/// A single surviving operand is returned as-is; when every operand is
/// empty the result is `{op: []}`.
pub fn merge<I>(op: &str, exprs: I) -> Expression
where
    I: IntoIterator<Item = Expression>,
{
    let mut inputs: Vec<Expression> = exprs.into_iter().collect();
    match inputs.len() {
        0 => return Expression::empty(),
        1 => return inputs.remove(0),
        _ => {}
    }

    let input_count = inputs.len();
    let mut operands: Vec<Expression> = Vec::new();
    for expr in inputs {
        if expr.is_empty() {
            continue;
        }
        if let Some(spliced) = splice_same_op(op, &expr) {
            for part in spliced.into_iter().filter(|part| !part.is_empty()) {
                insert_unique(&mut operands, part);
            }
            continue;
        }
        insert_unique(&mut operands, expr);
    }

    trace!(op, inputs = input_count, operands = operands.len(), "merged expressions");

    match operands.len() {
        1 => operands.remove(0),
        _ => Expression::field(op, Value::Set(operands.into_iter().map(Value::Expression).collect())),
    }
}

/// Children of an `{op: ...}` operand that can be lifted into the parent
/// combinator, or `None` if the operand must be kept whole.
fn splice_same_op(op: &str, expr: &Expression) -> Option<Vec<Expression>> {
    if expr.len() != 1 {
        return None;
    }
    let nested = expr.get(op)?;
    match nested {
        Value::Expression(inner) => Some(inner.nested_expressions()),
        Value::Sequence(_) | Value::Set(_) => nested
            .expression_elements()
            .map(|children| children.into_iter().cloned().collect()),
        Value::Scalar(_) => None,
    }
}

impl PartialEq for Expression {
    fn eq(&self, other: &Self) -> bool {
        self.entries.len() == other.entries.len()
            && self
                .entries
                .iter()
                .all(|(key, value)| other.entries.get(key).is_some_and(|o| value == o))
    }
}

impl fmt::Display for Expression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&document::to_json(self.to_document()))
    }
}

impl<K: Into<String>, V: Into<Value>> FromIterator<(K, V)> for Expression {
    fn from_iter<T: IntoIterator<Item = (K, V)>>(iter: T) -> Self {
        let mut expr = Expression::empty();
        for (k, v) in iter {
            expr.insert(k, v);
        }
        expr
    }
}

impl IntoIterator for Expression {
    type Item = (String, Value);
    type IntoIter = indexmap::map::IntoIter<String, Value>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    #[test]
    fn test_nest_uses_the_only_entry() {
        let e = Expression::field("n", 5).lt().unwrap();
        assert_eq!(e, nest_value("$lt", "n", 5));
    }

    #[test]
    fn test_splice_ignores_multi_key_operands() {
        let mut e = Expression::field(AND, Expression::field("a", 1));
        e.insert("b", 2);
        assert!(splice_same_op(AND, &e).is_none());
    }

    #[test]
    fn test_splice_keeps_scalar_operand_whole() {
        let e = Expression::field(AND, 5);
        assert!(splice_same_op(AND, &e).is_none());
    }

    #[test]
    fn test_splice_keeps_mixed_collection_whole() {
        let e = Expression::field(
            OR,
            Value::Sequence(vec![Expression::field("a", 1).into(), Value::from("x")]),
        );
        assert!(splice_same_op(OR, &e).is_none());
    }

    #[test]
    fn test_nested_expressions_render_identity_as_string() {
        let token = Uuid::nil();
        let mut e = Expression::field("a", token);
        e.insert("b", token.to_string());
        let parts = e.nested_expressions();
        assert_eq!(parts.len(), 2);
        assert_eq!(parts[0], Expression::field("a", token.to_string()));
    }
}
