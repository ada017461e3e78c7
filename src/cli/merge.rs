//! Combine several filter documents under `$and` or `$or`

use super::{CliError, format_output};
use crate::{AND, ExpressionCodec, OR, merge};

/// Options for the merge command
#[derive(Debug, Clone, Default)]
pub struct MergeOptions {
    /// JSON filter documents, one per operand
    pub filters: Vec<String>,
    /// Merge with `$or` instead of `$and`
    pub any: bool,
    /// Pretty-print the output
    pub pretty: bool,
}

/// Decode every filter, merge them and print the normalized result
pub fn execute_merge(options: &MergeOptions) -> Result<String, CliError> {
    let codec = ExpressionCodec::new();
    let operands = options
        .filters
        .iter()
        .map(|text| codec.decode_str(text))
        .collect::<Result<Vec<_>, _>>()?;

    let op = if options.any { OR } else { AND };
    let merged = merge(op, operands);
    Ok(format_output(&merged, options.pretty))
}
