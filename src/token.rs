use std::fmt;
use std::mem;

use serde::Serialize;

/// The different kinds of tokens recognized by the Lox scanner.
///
/// Variants without data represent single-character or keyword tokens.
/// `STRING(String)` and `NUMBER(f64)` carry their literal values.
/// `IDENTIFIER` is used for user-defined names.
/// `EOF` marks the end of input.
#[allow(non_camel_case_types)]
#[derive(Debug, Clone, Serialize)]
pub enum TokenType {
    /// '('
    LEFT_PAREN,
    /// ')'
    RIGHT_PAREN,
    /// '{'
    LEFT_BRACE,
    /// '}'
    RIGHT_BRACE,
    /// ','
    COMMA,
    /// '.'
    DOT,
    /// '-'
    MINUS,
    /// '+'
    PLUS,
    /// ';'
    SEMICOLON,
    /// '/'
    SLASH,
    /// '*'
    STAR,
    /// '!'
    BANG,
    /// '!='
    BANG_EQUAL,
    /// '='
    EQUAL,
    /// '=='
    EQUAL_EQUAL,
    /// '>'
    GREATER,
    /// '>='
    GREATER_EQUAL,
    /// '<'
    LESS,
    /// '<='
    LESS_EQUAL,

    /// A user-defined identifier
    IDENTIFIER,

    /// A string literal (contents without quotes)
    STRING(String),

    /// A numeric literal
    NUMBER(f64),

    /// 'and'
    AND,
    /// 'class'
    CLASS,
    /// 'else'
    ELSE,
    /// 'false'
    FALSE,
    /// 'fun'
    FUN,
    /// 'for'
    FOR,
    /// 'if'
    IF,
    /// 'nil'
    NIL,
    /// 'or'
    OR,
    /// 'print'
    PRINT,
    /// 'return'
    RETURN,
    /// 'super'
    SUPER,
    /// 'this'
    THIS,
    /// 'true'
    TRUE,
    /// 'var'
    VAR,
    /// 'while'
    WHILE,

    /// End-of-file marker
    EOF,
}

impl PartialEq for TokenType {
    /// Two TokenTypes are equal if they share the same variant
    /// (ignoring any inner data). Uses `mem::discriminant` to compare.
    fn eq(&self, other: &Self) -> bool {
        mem::discriminant(self) == mem::discriminant(other)
    }
}

/// A scanned token, including its type, the original lexeme,
/// and the line number where it was found.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct Token {
    /// The category of this token.
    pub token_type: TokenType,

    /// The exact substring from the source that produced this token.
    pub lexeme: String,

    /// 1-based line number in the source.
    pub line: usize,
}

impl Token {
    /// Create a new Token with the given type, lexeme, and line.
    pub fn new<S: Into<String>>(token_type: TokenType, lexeme: S, line: usize) -> Self {
        Self {
            token_type,
            lexeme: lexeme.into(),
            line,
        }
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?} '{}' [line {}]", self.token_type, self.lexeme, self.line)
    }
}
