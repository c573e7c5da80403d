//! Tokens and the code-state lexeme table

use logos::Logos;
use serde::Serialize;

use super::span::Span;
use crate::source::SourceId;
use crate::symbol::Symbol;

/// A token: its symbol, where its payload lives, and the line it starts on
///
/// Tokens never own text; look it up through the source map that holds
/// `source`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Token {
    /// The kind of token
    pub symbol: Symbol,
    /// Payload span; for delimited forms this is the inner region
    pub span: Span,
    /// Buffer the span points into
    pub source: SourceId,
    /// 1-based line number
    pub line: u32,
}

impl Token {
    /// Create a new token
    #[must_use]
    pub const fn new(symbol: Symbol, span: Span, source: SourceId, line: u32) -> Self {
        Self {
            symbol,
            span,
            source,
            line,
        }
    }

    /// The same token with a different symbol
    #[must_use]
    pub const fn with_symbol(self, symbol: Symbol) -> Self {
        Self { symbol, ..self }
    }
}

/// What the scanner hands to its sink for every token
#[derive(Debug, Clone, Copy)]
pub struct ScanContext {
    pub token: Token,
    /// Brace nesting after this token
    pub indent_level: i32,
}

/// Lexemes recognised in the code state
///
/// String, character, comment and macro bodies are scanned by hand once
/// their opening lexeme is seen.
#[derive(Logos, Debug, Clone, Copy, PartialEq, Eq)]
#[logos(skip r"[ \t\r\f\x0b]+")]
pub(super) enum CodeLexeme {
    #[token("\n")]
    Newline,

    #[regex(r"\\\r?\n")]
    Continuation,

    // ========== Comments ==========
    #[token("/**")]
    DocBegin,

    #[token("/**/")]
    EmptyComment,

    #[token("/*")]
    CommentBegin,

    #[token("//")]
    LineComment,

    // ========== Literals ==========
    #[token("\"")]
    StringBegin,

    #[token("'")]
    CharBegin,

    #[regex(r"[0-9]([0-9A-Za-z_.]|[eEpP][+-])*")]
    #[regex(r"\.[0-9]([0-9A-Za-z_.]|[eEpP][+-])*")]
    Number,

    #[token("#")]
    #[token("%:")]
    Hash,

    // ========== Punctuation ==========
    #[token("{")]
    #[token("<%")]
    LBrace,

    #[token("}")]
    #[token("%>")]
    RBrace,

    #[token("(")]
    LParen,

    #[token(")")]
    RParen,

    #[token("[")]
    #[token("<:")]
    LBrack,

    #[token("]")]
    #[token(":>")]
    RBrack,

    #[token(",")]
    Comma,

    #[token(";")]
    Semicolon,

    #[token("...")]
    Ellipsis,

    #[token("=")]
    Assignment,

    #[regex(r"->|\+\+|--|<<=?|>>=?|[<>=!]=|&&|\|\||[-+*/%&|^]=|[-+*/%&|^!~<>?:.]")]
    Operator,

    // ========== Keywords ==========
    #[token("struct")]
    Struct,

    #[token("union")]
    Union,

    #[token("enum")]
    Enum,

    #[token("typedef")]
    Typedef,

    #[token("static")]
    Static,

    #[token("void")]
    Void,

    #[regex(r"[A-Za-z_][A-Za-z0-9_]*")]
    Ident,
}

impl CodeLexeme {
    /// Lexemes that map straight onto a symbol
    pub(super) const fn symbol(self) -> Option<Symbol> {
        Some(match self {
            CodeLexeme::LBrace => Symbol::LBrace,
            CodeLexeme::RBrace => Symbol::RBrace,
            CodeLexeme::LParen => Symbol::LParen,
            CodeLexeme::RParen => Symbol::RParen,
            CodeLexeme::LBrack => Symbol::LBrack,
            CodeLexeme::RBrack => Symbol::RBrack,
            CodeLexeme::Comma => Symbol::Comma,
            CodeLexeme::Semicolon => Symbol::Semicolon,
            CodeLexeme::Ellipsis => Symbol::Ellipsis,
            CodeLexeme::Assignment => Symbol::Assignment,
            CodeLexeme::Operator => Symbol::Operator,
            CodeLexeme::Number => Symbol::Constant,
            CodeLexeme::Struct => Symbol::Struct,
            CodeLexeme::Union => Symbol::Union,
            CodeLexeme::Enum => Symbol::Enum,
            CodeLexeme::Typedef => Symbol::Typedef,
            CodeLexeme::Static => Symbol::Static,
            CodeLexeme::Void => Symbol::Void,
            _ => return None,
        })
    }
}
