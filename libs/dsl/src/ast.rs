//! Abstract Syntax Tree (AST) representation
//!
//! The AST mirrors the query grammar directly, without semantic analysis:
//! numeric literals (with an optional unit suffix), quoted series names,
//! bare identifiers (month tokens), binary operations and function calls.
//! Nodes form a strict tree; each node exclusively owns its children and
//! carries a source span used only for diagnostics.

use nimbus_units::Units;
use rust_decimal::Decimal;

/// Source position of a node, 1-based.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Span {
    pub line: usize,
    pub column: usize,
}

/// AST node representing a query expression
#[derive(Debug, Clone, PartialEq)]
pub enum ExprNode {
    /// Numeric literal with an optional unit suffix: `2`, `2 mm`, `2 delta mm`
    Number {
        value: Decimal,
        units: Option<Units>,
        span: Span,
    },

    /// Quoted series name: `"Observed Rainfall"`
    StringLit { value: String, span: Span },

    /// Bare identifier, e.g. a month token inside `Months(...)`
    Identifier { name: String, span: Span },

    /// Binary operation: `+ - * / **`
    Binary {
        op: BinaryOp,
        left: Box<ExprNode>,
        right: Box<ExprNode>,
        span: Span,
    },

    /// Function call: `Average(...)`, `FromDate(...)`, `Months(...)`
    Call {
        name: String,
        args: Vec<ExprNode>,
        span: Span,
    },
}

impl ExprNode {
    pub fn span(&self) -> Span {
        match self {
            ExprNode::Number { span, .. }
            | ExprNode::StringLit { span, .. }
            | ExprNode::Identifier { span, .. }
            | ExprNode::Binary { span, .. }
            | ExprNode::Call { span, .. } => *span,
        }
    }
}

/// Binary operator: '+' | '-' | '*' | '/' | '**'
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinaryOp {
    Add, // +
    Sub, // -
    Mul, // *
    Div, // /
    Pow, // **
}

impl BinaryOp {
    pub fn symbol(&self) -> &'static str {
        match self {
            BinaryOp::Add => "+",
            BinaryOp::Sub => "-",
            BinaryOp::Mul => "*",
            BinaryOp::Div => "/",
            BinaryOp::Pow => "**",
        }
    }
}
