//! Factory functions for common query, update and aggregation fragments.
//!
//! Every function here is pure and returns a fresh [`Expression`].
//!
//! # Examples
//!
//! ```
//! use mongo_expr::{and, exists, regex, Expression};
//!
//! let filter = and([
//!     exists("email"),
//!     regex("name", "^a", Some("i")),
//!     Expression::field("age", 18).gte().unwrap(),
//! ]);
//! assert_eq!(filter.len(), 1);
//! ```

use ::regex::Regex;
use uuid::Uuid;

use crate::{
    expression::{AND, Expression, OR, merge, nest_value},
    value::Value,
};

/// Singleton expression `{key: value}`.
pub fn field(key: impl Into<String>, value: impl Into<Value>) -> Expression {
    Expression::field(key, value)
}

/// Conjunction of `exprs`; see [`merge`] for the normalization rules.
pub fn and<I>(exprs: I) -> Expression
where
    I: IntoIterator<Item = Expression>,
{
    merge(AND, exprs)
}

/// Disjunction of `exprs`; see [`merge`] for the normalization rules.
pub fn or<I>(exprs: I) -> Expression
where
    I: IntoIterator<Item = Expression>,
{
    merge(OR, exprs)
}

/// `{field: {$exists: true}}`
pub fn exists(field: impl Into<String>) -> Expression {
    nest_value("$exists", field, true)
}

/// `{field: {$exists: false}}`
pub fn not_exists(field: impl Into<String>) -> Expression {
    nest_value("$exists", field, false)
}

/// `{field: {$elemMatch: value}}`
pub fn elem_match(field: impl Into<String>, value: Expression) -> Expression {
    nest_value("$elemMatch", field, value)
}

/// `{field: {$regex: pattern, $options: options}}`.
///
/// No `$options` key is written when `options` is `None`.
///
/// ```
/// use mongo_expr::regex;
///
/// assert_eq!(regex("f", "^a", None).to_string(), r#"{"f":{"$regex":"^a"}}"#);
/// ```
pub fn regex(field: impl Into<String>, pattern: &str, options: Option<&str>) -> Expression {
    let mut pattern_expr = Expression::field("$regex", pattern);
    if let Some(options) = options {
        pattern_expr.insert("$options", options);
    }
    Expression::field(field, pattern_expr)
}

/// Same as [`regex`], taking the pattern text from a compiled [`Regex`].
pub fn regex_from(field: impl Into<String>, pattern: &Regex, options: Option<&str>) -> Expression {
    regex(field, pattern.as_str(), options)
}

/// GeoJSON proximity query around `[longitude, latitude]`.
///
/// Coordinates are stored as an ordered sequence; longitude always comes first.
pub fn near(field: impl Into<String>, longitude: f64, latitude: f64, max_distance: i64) -> Expression {
    let geometry = Expression::field("type", "Point")
        .with(Expression::field("coordinates", vec![longitude, latitude]));
    let near = Expression::field("$maxDistance", max_distance)
        .with(Expression::field("$geometry", geometry));
    Expression::field(field, Expression::field("$near", near))
}

/// `{field: token}`, in string form when `as_string` is set, native otherwise.
pub fn identity(field: impl Into<String>, token: Uuid, as_string: bool) -> Expression {
    if as_string {
        return Expression::field(field, token.hyphenated().to_string());
    }
    Expression::field(field, token)
}

/// `{field: "<token>"}`
pub fn identity_str(field: impl Into<String>, token: Uuid) -> Expression {
    identity(field, token, true)
}

/// Dotted path of `child` below `parent`.
///
/// ```
/// use mongo_expr::nested_field;
///
/// assert_eq!(nested_field("items", 0), "items.0");
/// ```
pub fn nested_field(parent: &str, child: impl ToString) -> String {
    format!("{}.{}", parent, child.to_string())
}

// Aggregation and update operators

/// `{$sum: value}`; `value` may be a field reference, a counter or an expression.
pub fn sum(value: impl Into<Value>) -> Expression {
    Expression::field("$sum", value)
}

/// `{$avg: value}`
pub fn avg(value: impl Into<Value>) -> Expression {
    Expression::field("$avg", value)
}

/// `{$first: field}`
pub fn first(field: &str) -> Expression {
    Expression::field("$first", field)
}

/// `{$group: expr}`
pub fn group(expr: Expression) -> Expression {
    Expression::field("$group", expr)
}

/// `{$match: expr}` pipeline stage.
pub fn match_stage(expr: Expression) -> Expression {
    Expression::field("$match", expr)
}

/// `{$project: expr}`
pub fn project(expr: Expression) -> Expression {
    Expression::field("$project", expr)
}

/// `{$push: expr}`
pub fn push(expr: Expression) -> Expression {
    Expression::field("$push", expr)
}

/// `{$pull: expr}`
pub fn pull(expr: Expression) -> Expression {
    Expression::field("$pull", expr)
}

/// `{$addToSet: expr}`
pub fn add_to_set(expr: Expression) -> Expression {
    Expression::field("$addToSet", expr)
}

/// `{$unwind: field}`
pub fn unwind(field: &str) -> Expression {
    Expression::field("$unwind", field)
}

/// `{$slice: count}`
pub fn slice(count: i64) -> Expression {
    Expression::field("$slice", count)
}

/// `{$each: [values...]}`, keeping the given order.
pub fn each<T: Into<Value>>(values: Vec<T>) -> Expression {
    Expression::field("$each", values)
}

/// `{$setOnInsert: expr}`
pub fn set_on_insert(expr: Expression) -> Expression {
    Expression::field("$setOnInsert", expr)
}

/// `{$set: expr}`
pub fn set(expr: Expression) -> Expression {
    Expression::field("$set", expr)
}
