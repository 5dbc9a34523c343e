//! Token types for the query-expression lexer.

/// Token types for the query-expression lexer
#[derive(Debug, PartialEq, Clone, Eq)]
pub enum TokenType {
    // Literals
    StringLiteral,
    NumberLiteral,

    // Identifiers (function names, month names, unit words)
    Identifier,

    // Operators
    Plus,     // +
    Minus,    // -
    Star,     // *
    Slash,    // /
    StarStar, // **
    Caret,    // ^ (unit-suffix exponents)

    // Delimiters
    OpenParen,  // (
    CloseParen, // )
    Comma,      // ,

    // End of input
    Eof,

    // Error
    Error, // For lexical errors
}

/// A token in the query expression
#[derive(Debug, Clone)]
pub struct Token {
    pub token_type: TokenType,
    pub value: String,
    pub position: usize,
    pub line: usize,
    pub column: usize,
}

impl Token {
    pub fn new(
        token_type: TokenType,
        value: String,
        position: usize,
        line: usize,
        column: usize,
    ) -> Self {
        Self {
            token_type,
            value,
            position,
            line,
            column,
        }
    }

    pub fn eof(position: usize, line: usize, column: usize) -> Self {
        Self {
            token_type: TokenType::Eof,
            value: String::new(),
            position,
            line,
            column,
        }
    }

    pub fn error(message: String, position: usize, line: usize, column: usize) -> Self {
        Self {
            token_type: TokenType::Error,
            value: message,
            position,
            line,
            column,
        }
    }
}
