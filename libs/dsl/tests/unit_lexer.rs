//! Unit tests for the query-expression lexer

use nimbus_dsl::lexer::Lexer;
use nimbus_dsl::token::TokenType;

fn tokens(input: &str) -> Vec<(TokenType, String)> {
    let mut lexer = Lexer::new(input);
    let mut out = Vec::new();
    loop {
        let token = lexer.next_token();
        let done = token.token_type == TokenType::Eof;
        out.push((token.token_type, token.value));
        if done {
            break;
        }
    }
    out
}

#[test]
fn test_lex_call() {
    assert_eq!(
        tokens("FromDate(1960, 1, 1)"),
        vec![
            (TokenType::Identifier, "FromDate".into()),
            (TokenType::OpenParen, "(".into()),
            (TokenType::NumberLiteral, "1960".into()),
            (TokenType::Comma, ",".into()),
            (TokenType::NumberLiteral, "1".into()),
            (TokenType::Comma, ",".into()),
            (TokenType::NumberLiteral, "1".into()),
            (TokenType::CloseParen, ")".into()),
            (TokenType::Eof, "".into()),
        ]
    );
}

#[test]
fn test_lex_string_literal() {
    assert_eq!(
        tokens(r#""Observed Rainfall""#),
        vec![
            (TokenType::StringLiteral, "Observed Rainfall".into()),
            (TokenType::Eof, "".into()),
        ]
    );
}

#[test]
fn test_lex_operators() {
    let types: Vec<TokenType> = tokens("1 + 2 - 3 * 4 / 5 ** 6")
        .into_iter()
        .map(|(t, _)| t)
        .filter(|t| *t != TokenType::NumberLiteral && *t != TokenType::Eof)
        .collect();
    assert_eq!(
        types,
        vec![
            TokenType::Plus,
            TokenType::Minus,
            TokenType::Star,
            TokenType::Slash,
            TokenType::StarStar,
        ]
    );
}

#[test]
fn test_lex_decimal_number() {
    assert_eq!(
        tokens("2.5 mm"),
        vec![
            (TokenType::NumberLiteral, "2.5".into()),
            (TokenType::Identifier, "mm".into()),
            (TokenType::Eof, "".into()),
        ]
    );
}

#[test]
fn test_lex_unterminated_string() {
    let mut lexer = Lexer::new(r#""Observed"#);
    let token = lexer.next_token();
    assert_eq!(token.token_type, TokenType::Error);
    assert_eq!(token.value, "Unterminated string literal");
}

#[test]
fn test_lex_unexpected_character() {
    let mut lexer = Lexer::new("@");
    let token = lexer.next_token();
    assert_eq!(token.token_type, TokenType::Error);
}
