//! Query-expression lexer - tokenizes input strings
//!
//! Converts query-expression strings into a stream of tokens. The grammar is
//! small: identifiers, double-quoted series names, numeric literals and a
//! handful of punctuation tokens. `Δ` is alphabetic and therefore lexes as an
//! identifier, which is how the delta marker of a unit suffix comes through.

use crate::token::{Token, TokenType};

/// The query-expression lexer
pub struct Lexer {
    position: usize,
    line: usize,
    column: usize,
    chars: Vec<char>,
    current_char: Option<char>,
}

impl Lexer {
    /// Create a new lexer for the given input
    pub fn new(input: &str) -> Self {
        let chars: Vec<char> = input.chars().collect();
        let current_char = chars.first().copied();

        Self {
            position: 0,
            line: 1,
            column: 1,
            chars,
            current_char,
        }
    }

    /// Advance to the next character
    fn advance(&mut self) {
        if let Some(c) = self.current_char {
            if c == '\n' {
                self.line += 1;
                self.column = 1;
            } else {
                self.column += 1;
            }
        }
        self.position += 1;
        self.current_char = self.chars.get(self.position).copied();
    }

    /// Peek at the next character without advancing
    fn peek(&self) -> Option<char> {
        self.chars.get(self.position + 1).copied()
    }

    /// Skip whitespace characters
    fn skip_whitespace(&mut self) {
        while let Some(c) = self.current_char {
            if c.is_whitespace() {
                self.advance();
            } else {
                break;
            }
        }
    }

    /// Read an identifier
    fn read_identifier(&mut self) -> String {
        let start_pos = self.position;

        while let Some(c) = self.current_char {
            if c.is_alphanumeric() || c == '_' {
                self.advance();
            } else {
                break;
            }
        }

        self.chars[start_pos..self.position].iter().collect()
    }

    /// Read a numeric literal: digits with an optional fraction
    fn read_number(&mut self) -> String {
        let start_pos = self.position;

        while let Some(c) = self.current_char {
            if c.is_ascii_digit() {
                self.advance();
            } else {
                break;
            }
        }

        if self.current_char == Some('.') && self.peek().is_some_and(|c| c.is_ascii_digit()) {
            self.advance(); // Skip '.'
            while let Some(c) = self.current_char {
                if c.is_ascii_digit() {
                    self.advance();
                } else {
                    break;
                }
            }
        }

        self.chars[start_pos..self.position].iter().collect()
    }

    /// Read a string literal: "series name"
    fn read_string(&mut self) -> Result<String, String> {
        self.advance(); // Skip opening quote

        let mut value = String::new();

        while let Some(c) = self.current_char {
            match c {
                '"' => {
                    self.advance(); // Skip closing quote
                    return Ok(value);
                }
                '\\' => {
                    self.advance(); // Skip backslash
                    match self.current_char {
                        Some('"') => value.push('"'),
                        Some('\\') => value.push('\\'),
                        Some(other) => {
                            return Err(format!("Invalid escape sequence '\\{}'", other))
                        }
                        None => return Err("Incomplete escape sequence".into()),
                    }
                    self.advance();
                }
                _ => {
                    value.push(c);
                    self.advance();
                }
            }
        }

        Err("Unterminated string literal".into())
    }

    /// Produce the next token
    pub fn next_token(&mut self) -> Token {
        self.skip_whitespace();

        let (position, line, column) = (self.position, self.line, self.column);

        let Some(c) = self.current_char else {
            return Token::eof(position, line, column);
        };

        if c.is_alphabetic() || c == '_' {
            let value = self.read_identifier();
            return Token::new(TokenType::Identifier, value, position, line, column);
        }

        if c.is_ascii_digit() {
            let value = self.read_number();
            return Token::new(TokenType::NumberLiteral, value, position, line, column);
        }

        if c == '"' {
            return match self.read_string() {
                Ok(value) => Token::new(TokenType::StringLiteral, value, position, line, column),
                Err(message) => Token::error(message, position, line, column),
            };
        }

        let token_type = match c {
            '+' => TokenType::Plus,
            '-' => TokenType::Minus,
            '*' => {
                if self.peek() == Some('*') {
                    self.advance();
                    TokenType::StarStar
                } else {
                    TokenType::Star
                }
            }
            '/' => TokenType::Slash,
            '^' => TokenType::Caret,
            '(' => TokenType::OpenParen,
            ')' => TokenType::CloseParen,
            ',' => TokenType::Comma,
            other => {
                self.advance();
                return Token::error(
                    format!("Unexpected character '{}'", other),
                    position,
                    line,
                    column,
                );
            }
        };
        self.advance();

        let value: String = match token_type {
            TokenType::StarStar => "**".into(),
            _ => c.to_string(),
        };
        Token::new(token_type, value, position, line, column)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn token_types(input: &str) -> Vec<TokenType> {
        let mut lexer = Lexer::new(input);
        let mut out = Vec::new();
        loop {
            let token = lexer.next_token();
            let done = token.token_type == TokenType::Eof;
            out.push(token.token_type);
            if done {
                break;
            }
        }
        out
    }

    #[test]
    fn lexes_star_star_as_one_token() {
        assert_eq!(
            token_types("2 ** 2 * 2"),
            vec![
                TokenType::NumberLiteral,
                TokenType::StarStar,
                TokenType::NumberLiteral,
                TokenType::Star,
                TokenType::NumberLiteral,
                TokenType::Eof,
            ]
        );
    }

    #[test]
    fn delta_glyph_is_an_identifier() {
        let mut lexer = Lexer::new("Δ mm");
        let token = lexer.next_token();
        assert_eq!(token.token_type, TokenType::Identifier);
        assert_eq!(token.value, "Δ");
    }

    #[test]
    fn tracks_lines_and_columns() {
        let mut lexer = Lexer::new("Average(\n    1)");
        assert_eq!(lexer.next_token().line, 1);
        assert_eq!(lexer.next_token().line, 1); // (
        let one = lexer.next_token();
        assert_eq!((one.line, one.column), (2, 5));
    }
}
