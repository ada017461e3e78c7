//! CLI support for mongo-expr
//!
//! Provides programmatic access to the `mexpr` commands so they can be
//! embedded in other tools and tested without spawning a process.

mod merge;
mod render;

pub use merge::{MergeOptions, execute_merge};
pub use render::{RenderOptions, execute_render};

use std::io;

use crate::{ExprError, Expression};

/// Errors that can occur during CLI operations
#[derive(Debug)]
pub enum CliError {
    /// Decoding or encoding error
    Expr(ExprError),
    /// IO error
    Io(io::Error),
    /// No input provided
    NoInput,
}

impl std::fmt::Display for CliError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CliError::Expr(e) => write!(f, "Invalid filter: {}", e),
            CliError::Io(e) => write!(f, "IO error: {}", e),
            CliError::NoInput => write!(f, "No input provided. Use --input or pipe JSON to stdin."),
        }
    }
}

impl std::error::Error for CliError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            CliError::Expr(e) => Some(e),
            CliError::Io(e) => Some(e),
            CliError::NoInput => None,
        }
    }
}

impl From<ExprError> for CliError {
    fn from(e: ExprError) -> Self {
        CliError::Expr(e)
    }
}

impl From<io::Error> for CliError {
    fn from(e: io::Error) -> Self {
        CliError::Io(e)
    }
}

fn format_output(expr: &Expression, pretty: bool) -> String {
    if pretty {
        expr.to_json_pretty()
    } else {
        expr.to_string()
    }
}
