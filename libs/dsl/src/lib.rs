#![forbid(unsafe_code)]

//! Climate-statistic query DSL
//!
//! Parses query expressions such as
//! `Average("Observed Rainfall", FromDate(1960, 1, 1), ToDate(1961, 1, 1)) - 2 mm`
//! and checks them for dimensional consistency:
//!
//! ```text
//! Expression String
//!      |
//!   Parser -> expression tree
//!      |
//!   Unit Analyzer (series registry + units algebra)
//!      |
//! resolved Units, or an annotated pretty-printed diagnostic
//! ```
//!
//! Aggregations compute *units*, not values: `Average` and `Maximum` resolve
//! to the base units of the series they aggregate. Semantic errors render the
//! whole tree with a `# ^ explanation` comment under the offending node.

pub mod analyzer;
pub mod ast;
pub mod error;
pub mod lexer;
pub mod parser;
pub mod printer;
pub mod registry;
pub mod token;

// Re-export main types
pub use analyzer::Analyzer;
pub use ast::{BinaryOp, ExprNode, Span};
pub use error::{Error, Result, SemanticKind};
pub use nimbus_units::Units;
pub use registry::{InMemoryRegistry, SeriesRegistry};

/// Parse a query expression into its tree.
pub fn parse(input: &str) -> Result<ExprNode> {
    parser::Parser::new(input).parse()
}

/// Resolve the units of a parsed expression against a series registry.
pub fn units(expr: &ExprNode, registry: &dyn SeriesRegistry) -> Result<Units> {
    Analyzer::new(registry).analyze(expr)
}
