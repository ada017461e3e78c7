use rust_decimal::Decimal;
use uuid::Uuid;

use crate::expression::Expression;

/// A leaf value stored in an [`Expression`].
///
/// Integers, floats and decimals are kept apart so the lowered document
/// carries the same numeric type the caller supplied.
#[derive(Debug, Clone, PartialEq)]
pub enum Scalar {
    /// Explicit null
    Null,

    /// Boolean (true/false)
    Boolean(bool),

    /// 64-bit integer
    Integer(i64),

    /// Double-precision float
    Float(f64),

    /// Exact decimal, lowered as `{"$numberDecimal": ...}`
    Decimal(Decimal),

    /// UTF-8 string
    String(String),

    /// Structured identity token, lowered as `{"$uuid": ...}`
    Uuid(Uuid),
}

/// A value stored under a key of an [`Expression`].
///
/// # Equality
///
/// Both [`Value::Sequence`] and [`Value::Set`] compare their elements as sets:
/// `[a, b]` equals `[b, a]`. A sequence never equals a set. Sequences still
/// keep and lower their elements in order, so geo coordinates and similar
/// order-significant arguments survive intact.
///
/// # Examples
///
/// ```
/// use mongo_expr::Value;
///
/// let coords = Value::from(vec![10.0, 20.0]);
/// assert_eq!(coords, Value::from(vec![20.0, 10.0]));
///
/// let tags = Value::set(["a", "b", "a"]);
/// assert_eq!(tags.len(), Some(2));
/// ```
#[derive(Debug, Clone)]
pub enum Value {
    /// Nested expression
    Expression(Expression),

    /// Leaf value
    Scalar(Scalar),

    /// Ordered sequence of values
    Sequence(Vec<Value>),

    /// Unordered collection without duplicates
    Set(Vec<Value>),
}

impl Value {
    /// Builds a [`Value::Set`], dropping structurally equal duplicates.
    ///
    /// The first occurrence of each element is kept, in input order.
    pub fn set<I, T>(items: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<Value>,
    {
        let mut values: Vec<Value> = Vec::new();
        for item in items {
            insert_unique(&mut values, item.into());
        }
        Value::Set(values)
    }

    pub fn null() -> Self {
        Value::Scalar(Scalar::Null)
    }

    /// Returns the nested expression, if this value is one.
    pub fn as_expression(&self) -> Option<&Expression> {
        match self {
            Value::Expression(expr) => Some(expr),
            _ => None,
        }
    }

    pub fn as_scalar(&self) -> Option<&Scalar> {
        match self {
            Value::Scalar(s) => Some(s),
            _ => None,
        }
    }

    /// Number of elements of a sequence or set.
    pub fn len(&self) -> Option<usize> {
        match self {
            Value::Sequence(items) | Value::Set(items) => Some(items.len()),
            _ => None,
        }
    }

    /// Returns the elements of a sequence or set when every one of them is an
    /// expression.
    pub(crate) fn expression_elements(&self) -> Option<Vec<&Expression>> {
        match self {
            Value::Sequence(items) | Value::Set(items) => {
                items.iter().map(Value::as_expression).collect()
            }
            _ => None,
        }
    }

    /// Short type label used in error messages
    pub fn kind(&self) -> &'static str {
        match self {
            Value::Expression(_) => "expression",
            Value::Sequence(_) => "sequence",
            Value::Set(_) => "set",
            Value::Scalar(s) => match s {
                Scalar::Null => "null",
                Scalar::Boolean(_) => "boolean",
                Scalar::Integer(_) => "integer",
                Scalar::Float(_) => "float",
                Scalar::Decimal(_) => "decimal",
                Scalar::String(_) => "string",
                Scalar::Uuid(_) => "uuid",
            },
        }
    }
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Value::Expression(a), Value::Expression(b)) => a == b,
            (Value::Scalar(a), Value::Scalar(b)) => a == b,
            (Value::Sequence(a), Value::Sequence(b)) | (Value::Set(a), Value::Set(b)) => {
                same_elements(a, b)
            }
            _ => false,
        }
    }
}

/// Set equality over slices: every element of one side occurs in the other.
pub(crate) fn same_elements(a: &[Value], b: &[Value]) -> bool {
    a.iter().all(|x| b.contains(x)) && b.iter().all(|y| a.contains(y))
}

/// Pushes `value` unless a structurally equal element is already present.
pub(crate) fn insert_unique<T: PartialEq>(values: &mut Vec<T>, value: T) -> bool {
    if values.contains(&value) {
        return false;
    }
    values.push(value);
    true
}

impl From<Scalar> for Value {
    fn from(s: Scalar) -> Self {
        Value::Scalar(s)
    }
}

impl From<Expression> for Value {
    fn from(expr: Expression) -> Self {
        Value::Expression(expr)
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Scalar(Scalar::Boolean(b))
    }
}

impl From<i32> for Value {
    fn from(n: i32) -> Self {
        Value::Scalar(Scalar::Integer(i64::from(n)))
    }
}

impl From<i64> for Value {
    fn from(n: i64) -> Self {
        Value::Scalar(Scalar::Integer(n))
    }
}

impl From<u32> for Value {
    fn from(n: u32) -> Self {
        Value::Scalar(Scalar::Integer(i64::from(n)))
    }
}

impl From<f64> for Value {
    fn from(n: f64) -> Self {
        Value::Scalar(Scalar::Float(n))
    }
}

impl From<Decimal> for Value {
    fn from(d: Decimal) -> Self {
        Value::Scalar(Scalar::Decimal(d))
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::Scalar(Scalar::String(s.to_string()))
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::Scalar(Scalar::String(s))
    }
}

impl From<Uuid> for Value {
    fn from(id: Uuid) -> Self {
        Value::Scalar(Scalar::Uuid(id))
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(opt: Option<T>) -> Self {
        opt.map_or_else(Value::null, Into::into)
    }
}

impl<T: Into<Value>> From<Vec<T>> for Value {
    fn from(items: Vec<T>) -> Self {
        Value::Sequence(items.into_iter().map(Into::into).collect())
    }
}
