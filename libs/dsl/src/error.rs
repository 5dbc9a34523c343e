//! Error types for the query DSL

use thiserror::Error;

/// Result type alias
pub type Result<T> = std::result::Result<T, Error>;

/// Query parsing and analysis errors.
///
/// Syntax errors are terminal and carry a source location. Semantic errors
/// carry the full pretty-printed expression tree with an annotation under
/// the offending node; that block is the error's `Display` output.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum Error {
    #[error("syntax error at line {line}, column {column}: {message}")]
    Syntax {
        message: String,
        line: usize,
        column: usize,
    },

    #[error("{rendered}")]
    Semantic { kind: SemanticKind, rendered: String },
}

/// The class of a semantic failure, for callers that dispatch on it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SemanticKind {
    DimensionMismatch,
    InvalidExponent,
    DateRange,
    InvalidMonth,
    UnknownSeries,
    BadCall,
}
