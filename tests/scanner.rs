use pretty_assertions::assert_eq;

use rlox::scanner::Scanner;
use rlox::token::TokenType;

fn assert_token_sequence(source: &str, expected: &[(TokenType, &str)]) {
    let scanner = Scanner::new(source.as_bytes());
    let tokens: Vec<_> = scanner.filter_map(Result::ok).collect();

    assert_eq!(tokens.len(), expected.len());

    for (actual, (expected_type, expected_lexeme)) in tokens.iter().zip(expected.iter()) {
        assert_eq!(actual.token_type, *expected_type);
        assert_eq!(actual.lexeme, *expected_lexeme);
    }
}

#[test]
fn scans_punctuators() {
    assert_token_sequence(
        "({*.,+*})",
        &[
            (TokenType::LEFT_PAREN, "("),
            (TokenType::LEFT_BRACE, "{"),
            (TokenType::STAR, "*"),
            (TokenType::DOT, "."),
            (TokenType::COMMA, ","),
            (TokenType::PLUS, "+"),
            (TokenType::STAR, "*"),
            (TokenType::RIGHT_BRACE, "}"),
            (TokenType::RIGHT_PAREN, ")"),
            (TokenType::EOF, ""),
        ],
    );
}

#[test]
fn scans_one_and_two_character_operators() {
    assert_token_sequence(
        "! != = == < <= > >= /",
        &[
            (TokenType::BANG, "!"),
            (TokenType::BANG_EQUAL, "!="),
            (TokenType::EQUAL, "="),
            (TokenType::EQUAL_EQUAL, "=="),
            (TokenType::LESS, "<"),
            (TokenType::LESS_EQUAL, "<="),
            (TokenType::GREATER, ">"),
            (TokenType::GREATER_EQUAL, ">="),
            (TokenType::SLASH, "/"),
            (TokenType::EOF, ""),
        ],
    );
}

#[test]
fn distinguishes_keywords_from_identifiers() {
    assert_token_sequence(
        "class classy var variable super superb",
        &[
            (TokenType::CLASS, "class"),
            (TokenType::IDENTIFIER, "classy"),
            (TokenType::VAR, "var"),
            (TokenType::IDENTIFIER, "variable"),
            (TokenType::SUPER, "super"),
            (TokenType::IDENTIFIER, "superb"),
            (TokenType::EOF, ""),
        ],
    );
}

#[test]
fn scans_number_literals_with_optional_fraction() {
    let (tokens, errors) = Scanner::new(b"123 3.14 0.5").scan();
    assert!(errors.is_empty());

    let values: Vec<f64> = tokens
        .iter()
        .filter_map(|t| match t.token_type {
            TokenType::NUMBER(n) => Some(n),
            _ => None,
        })
        .collect();

    assert_eq!(values, vec![123.0, 3.14, 0.5]);
}

#[test]
fn a_trailing_dot_is_not_part_of_the_number() {
    assert_token_sequence(
        "123.",
        &[
            (TokenType::NUMBER(123.0), "123"),
            (TokenType::DOT, "."),
            (TokenType::EOF, ""),
        ],
    );
}

#[test]
fn string_literals_may_span_newlines() {
    let (tokens, errors) = Scanner::new(b"\"one\ntwo\" x").scan();
    assert!(errors.is_empty());

    match &tokens[0].token_type {
        TokenType::STRING(s) => assert_eq!(s, "one\ntwo"),
        other => panic!("expected string literal, got {:?}", other),
    }

    // The newline inside the string advanced the line counter.
    assert_eq!(tokens[1].line, 2);
}

#[test]
fn unterminated_string_is_reported_and_scanning_reaches_eof() {
    let (tokens, errors) = Scanner::new(b"var x; \"oops").scan();

    assert_eq!(errors.len(), 1);
    assert!(errors[0].to_string().contains("Unterminated string."));

    // Tokens before the bad literal survive, and EOF is still emitted.
    assert_eq!(tokens.first().map(|t| t.token_type.clone()), Some(TokenType::VAR));
    assert_eq!(tokens.last().map(|t| t.token_type.clone()), Some(TokenType::EOF));
}

#[test]
fn comments_and_whitespace_produce_no_tokens() {
    assert_token_sequence(
        "// a comment\nprint 1; // trailing",
        &[
            (TokenType::PRINT, "print"),
            (TokenType::NUMBER(1.0), "1"),
            (TokenType::SEMICOLON, ";"),
            (TokenType::EOF, ""),
        ],
    );
}

#[test]
fn unexpected_characters_are_collected_not_fatal() {
    let (tokens, errors) = Scanner::new(b",.$(#").scan();

    // Scanning continued past both bad characters.
    assert_eq!(errors.len(), 2);
    for err in &errors {
        assert_eq!(err.to_string(), "[line 1] Error: Unexpected character.");
    }

    let kinds: Vec<_> = tokens.iter().map(|t| t.lexeme.as_str()).collect();
    assert_eq!(kinds, vec![",", ".", "(", ""]);
}
