//! Query-expression parser - converts string expressions to AST
//!
//! Recursive descent parser with the usual precedence ladder:
//! 1. additive (+, -)
//! 2. multiplicative (*, /)
//! 3. power (**, right-associative)
//! 4. term (literal, call, identifier, parenthesized)
//!
//! A numeric literal may be immediately followed by a unit suffix: one or
//! more identifier words (including `delta`/`Δ`), each with an optional
//! `^integer` exponent. A `/` after a number always means division, so a
//! quotient unit on a literal is spelled with negative exponents
//! (`2 m s^-1`).

use crate::ast::{BinaryOp, ExprNode, Span};
use crate::error::{Error, Result};
use crate::lexer::Lexer;
use crate::token::{Token, TokenType};
use nimbus_units::Units;
use rust_decimal::Decimal;
use std::str::FromStr;

/// Parser for query expressions
pub struct Parser {
    lexer: Lexer,
    current_token: Option<Token>,
    recursion_depth: usize,
}

const MAX_RECURSION_DEPTH: usize = 64;

impl Parser {
    /// Create a new parser for the given input string
    pub fn new(input: &str) -> Self {
        let mut parser = Self {
            lexer: Lexer::new(input),
            current_token: None,
            recursion_depth: 0,
        };
        parser.advance();
        parser
    }

    /// Advance to the next token
    fn advance(&mut self) {
        self.current_token = Some(self.lexer.next_token());
    }

    /// Get the current token
    fn current(&self) -> &Token {
        self.current_token
            .as_ref()
            .expect("parser always holds a token after construction")
    }

    /// Check if current token matches the given type
    fn current_token_is(&self, token_type: TokenType) -> bool {
        self.current().token_type == token_type
    }

    /// Check if current token is one of the given types
    fn current_token_is_one_of(&self, types: &[TokenType]) -> bool {
        types.contains(&self.current().token_type)
    }

    /// Expect a specific token type and advance
    fn expect(&mut self, token_type: TokenType) -> Result<Token> {
        let token = self.current().clone();
        if token.token_type == token_type {
            self.advance();
            return Ok(token);
        }
        if token.token_type == TokenType::Error {
            return Err(Self::lex_error(&token));
        }
        Err(Error::Syntax {
            message: format!("expected {:?}, got {:?}", token_type, token.token_type),
            line: token.line,
            column: token.column,
        })
    }

    fn lex_error(token: &Token) -> Error {
        Error::Syntax {
            message: token.value.clone(),
            line: token.line,
            column: token.column,
        }
    }

    /// Parse the entire expression (top-level entry point)
    pub fn parse(&mut self) -> Result<ExprNode> {
        let expr = self.parse_expression()?;

        // Ensure we've consumed all input
        let token = self.current();
        match token.token_type {
            TokenType::Eof => Ok(expr),
            TokenType::Error => Err(Self::lex_error(token)),
            _ => Err(Error::Syntax {
                message: format!("unexpected {:?} after expression", token.token_type),
                line: token.line,
                column: token.column,
            }),
        }
    }

    /// Check recursion depth and increment
    fn check_recursion_depth(&mut self) -> Result<()> {
        self.recursion_depth += 1;
        if self.recursion_depth > MAX_RECURSION_DEPTH {
            let token = self.current();
            return Err(Error::Syntax {
                message: format!(
                    "expression too deeply nested (max depth: {})",
                    MAX_RECURSION_DEPTH
                ),
                line: token.line,
                column: token.column,
            });
        }
        Ok(())
    }

    /// Decrement recursion depth
    fn decrement_recursion_depth(&mut self) {
        self.recursion_depth -= 1;
    }

    /// Parse an expression (lowest precedence: additive)
    fn parse_expression(&mut self) -> Result<ExprNode> {
        self.check_recursion_depth()?;
        let expr = self.parse_additive();
        self.decrement_recursion_depth();
        expr
    }

    /// Parse additive expression: expression ('+' | '-') expression
    fn parse_additive(&mut self) -> Result<ExprNode> {
        let mut left = self.parse_multiplicative()?;

        while self.current_token_is_one_of(&[TokenType::Plus, TokenType::Minus]) {
            let token = self.current().clone();
            let op = match token.token_type {
                TokenType::Plus => BinaryOp::Add,
                TokenType::Minus => BinaryOp::Sub,
                _ => unreachable!(),
            };
            self.advance();
            let right = self.parse_multiplicative()?;
            left = ExprNode::Binary {
                op,
                left: Box::new(left),
                right: Box::new(right),
                span: span_of(&token),
            };
        }

        Ok(left)
    }

    /// Parse multiplicative expression: expression ('*' | '/') expression
    fn parse_multiplicative(&mut self) -> Result<ExprNode> {
        let mut left = self.parse_power()?;

        while self.current_token_is_one_of(&[TokenType::Star, TokenType::Slash]) {
            let token = self.current().clone();
            let op = match token.token_type {
                TokenType::Star => BinaryOp::Mul,
                TokenType::Slash => BinaryOp::Div,
                _ => unreachable!(),
            };
            self.advance();
            let right = self.parse_power()?;
            left = ExprNode::Binary {
                op,
                left: Box::new(left),
                right: Box::new(right),
                span: span_of(&token),
            };
        }

        Ok(left)
    }

    /// Parse power expression: expression '**' expression (right-associative)
    fn parse_power(&mut self) -> Result<ExprNode> {
        let left = self.parse_term()?;

        if self.current_token_is(TokenType::StarStar) {
            let token = self.current().clone();
            self.advance();
            self.check_recursion_depth()?;
            let right = self.parse_power()?;
            self.decrement_recursion_depth();
            return Ok(ExprNode::Binary {
                op: BinaryOp::Pow,
                left: Box::new(left),
                right: Box::new(right),
                span: span_of(&token),
            });
        }

        Ok(left)
    }

    /// Parse a term: literal, call, identifier or parenthesized expression
    fn parse_term(&mut self) -> Result<ExprNode> {
        let token = self.current().clone();
        match token.token_type {
            TokenType::NumberLiteral => {
                self.advance();
                let value = Decimal::from_str(&token.value).map_err(|_| Error::Syntax {
                    message: format!("invalid numeric literal '{}'", token.value),
                    line: token.line,
                    column: token.column,
                })?;
                let units = self.parse_unit_suffix()?;
                Ok(ExprNode::Number {
                    value,
                    units,
                    span: span_of(&token),
                })
            }
            TokenType::StringLiteral => {
                self.advance();
                let span = span_of(&token);
                Ok(ExprNode::StringLit {
                    value: token.value,
                    span,
                })
            }
            TokenType::Identifier => {
                self.advance();
                if self.current_token_is(TokenType::OpenParen) {
                    self.parse_call(token)
                } else {
                    let span = span_of(&token);
                    Ok(ExprNode::Identifier {
                        name: token.value,
                        span,
                    })
                }
            }
            TokenType::OpenParen => {
                self.advance();
                let expr = self.parse_expression()?;
                self.expect(TokenType::CloseParen)?;
                Ok(expr)
            }
            TokenType::Error => Err(Self::lex_error(&token)),
            other => Err(Error::Syntax {
                message: format!("unexpected {:?}", other),
                line: token.line,
                column: token.column,
            }),
        }
    }

    /// Parse a function call: name '(' [expression (',' expression)*] ')'
    fn parse_call(&mut self, name_token: Token) -> Result<ExprNode> {
        self.expect(TokenType::OpenParen)?;

        let mut args = Vec::new();
        if !self.current_token_is(TokenType::CloseParen) {
            loop {
                args.push(self.parse_expression()?);
                if self.current_token_is(TokenType::Comma) {
                    self.advance();
                } else {
                    break;
                }
            }
        }
        self.expect(TokenType::CloseParen)?;

        let span = span_of(&name_token);
        Ok(ExprNode::Call {
            name: name_token.value,
            args,
            span,
        })
    }

    /// Collect identifier words (and `^integer` exponents) following a
    /// numeric literal into a unit string, parsed via the unit mini-language.
    fn parse_unit_suffix(&mut self) -> Result<Option<Units>> {
        if !self.current_token_is(TokenType::Identifier) {
            return Ok(None);
        }
        let first = self.current().clone();
        let mut text = String::new();

        while self.current_token_is(TokenType::Identifier) {
            let word = self.current().clone();
            self.advance();
            if self.current_token_is(TokenType::OpenParen) {
                return Err(Error::Syntax {
                    message: format!(
                        "unexpected function call '{}' after numeric literal",
                        word.value
                    ),
                    line: word.line,
                    column: word.column,
                });
            }
            if !text.is_empty() {
                text.push(' ');
            }
            text.push_str(&word.value);

            if self.current_token_is(TokenType::Caret) {
                self.advance();
                text.push('^');
                if self.current_token_is(TokenType::Minus) {
                    self.advance();
                    text.push('-');
                }
                let exponent = self.expect(TokenType::NumberLiteral)?;
                if exponent.value.contains('.') {
                    return Err(Error::Syntax {
                        message: "unit exponent must be an integer".into(),
                        line: exponent.line,
                        column: exponent.column,
                    });
                }
                text.push_str(&exponent.value);
            }
        }

        let units = Units::parsed_from(&text).map_err(|err| Error::Syntax {
            message: format!("invalid unit suffix '{}': {}", text, err),
            line: first.line,
            column: first.column,
        })?;
        Ok(Some(units))
    }
}

fn span_of(token: &Token) -> Span {
    Span {
        line: token.line,
        column: token.column,
    }
}
