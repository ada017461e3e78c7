//! Error types for building and encoding expressions.

/// Errors raised by expression operations.
#[derive(Debug, thiserror::Error)]
pub enum ExprError {
    /// A single-field operator was applied to an expression with several entries.
    #[error("cannot apply {op} to an expression with {entries} entries (expected exactly one)")]
    InvalidShape { op: String, entries: usize },

    /// An identity token was required but the expression has no `_id`.
    #[error("the expression does not contain an _id")]
    MissingIdentity,

    /// Decoding expected a document but found another kind of value.
    #[error("expected a document, found {0}")]
    NotADocument(&'static str),

    /// Text encoding or decoding failed.
    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

/// Convenience result type for expression operations.
pub type Result<T> = std::result::Result<T, ExprError>;
