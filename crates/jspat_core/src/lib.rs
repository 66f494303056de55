//! `jspat_core` — an ES2025 JavaScript parser that accepts code templates
//! with capture placeholders.
//!
//! # Crate layout
//!
//! - [`parser`] — scanner, AST, and the recursive-descent parser with its
//!   extension hooks.
//! - [`plugins`] — grammar extensions; [`plugins::capture`] adds `{{name}}`
//!   and `{{...name}}`.
//! - [`options`] — per-parse configuration.
//! - [`error`] — the crate-wide error type.
//!
//! ```
//! use jspat_core::options::ParserOptions;
//! use jspat_core::parser::ast::Expr;
//!
//! let options = ParserOptions::default().with_plugin_names(&["capture"]).unwrap();
//! let expr = jspat_core::parse_expression("{{callee}}({{...args}})", &options).unwrap();
//! assert!(matches!(expr, Expr::Call(_)));
//! ```

/// Error and result types.
pub mod error;
/// Parser configuration.
pub mod options;
/// Scanner, AST and parser.
pub mod parser;
/// Built-in grammar extensions.
pub mod plugins;

pub use error::{Error, Result};
pub use options::ParserOptions;

use parser::Parser;
use parser::ast::{Expr, Program};

/// Parse a complete script or module.
pub fn parse(source: &str, options: &ParserOptions) -> Result<Program> {
    Parser::new(source, options)?.parse_program()
}

/// Parse `source` as a single expression.
pub fn parse_expression(source: &str, options: &ParserOptions) -> Result<Expr> {
    Parser::new(source, options)?.parse_standalone_expression()
}
