//! Render a filter document in canonical form

use super::{CliError, format_output};
use crate::ExpressionCodec;

/// Options for the render command
#[derive(Debug, Clone, Default)]
pub struct RenderOptions {
    /// JSON filter document
    pub input: Option<String>,
    /// Pretty-print the output
    pub pretty: bool,
}

/// Decode the input document and print its lowered form
pub fn execute_render(options: &RenderOptions) -> Result<String, CliError> {
    let text = options.input.as_deref().ok_or(CliError::NoInput)?;
    let expr = ExpressionCodec::new().decode_str(text)?;
    Ok(format_output(&expr, options.pretty))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_requires_input() {
        let result = execute_render(&RenderOptions::default());
        assert!(matches!(result, Err(CliError::NoInput)));
    }

    #[test]
    fn test_render_rejects_arrays() {
        let options = RenderOptions {
            input: Some("[1, 2]".to_string()),
            pretty: false,
        };
        assert!(matches!(execute_render(&options), Err(CliError::Expr(_))));
    }
}
