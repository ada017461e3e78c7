pub mod builder;
#[cfg(feature = "cli")]
pub mod cli;
pub mod codec;
pub mod document;
pub mod error;
pub mod expression;
pub mod value;

pub use builder::{
    add_to_set, and, avg, each, elem_match, exists, field, first, group, identity, identity_str,
    match_stage, near, nested_field, not_exists, or, project, pull, push, regex, regex_from, set,
    set_on_insert, slice, sum, unwind,
};
pub use codec::ExpressionCodec;
pub use document::{Document, to_json, to_json_pretty};
pub use error::{ExprError, Result};
pub use expression::{AND, Expression, OR, merge};
pub use value::{Scalar, Value};
