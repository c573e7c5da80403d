//! Scanner for C source with embedded documentation
//!
//! The scanner is a flat automaton: one [`ScanState`] value says which
//! sub-language the cursor is in. The code state is tokenised with a `logos`
//! lexeme table; strings, characters, comments and preprocessor lines are
//! scanned by hand because they never produce documentation tokens. The
//! documentation states live in [`doc`](self) and are entered through `/**`.
//!
//! Every token is handed to a [`TokenSink`] as soon as it is produced. The
//! scan ends in error if it finishes anywhere but its starting state or with
//! unbalanced braces.

mod doc;
mod error;
mod span;
mod token;

pub use error::{ScanError, ScanErrorKind};
pub use span::Span;
pub use token::{ScanContext, Token};

use std::ops::Range;
use std::rc::Rc;
use std::sync::OnceLock;

use logos::Logos;
use regex::Regex;
use tracing::trace;

use crate::error::Result;
use crate::generic::prefix_arity;
use crate::source::{Source, SourceId};
use crate::symbol::Symbol;
use token::CodeLexeme;

/// Receives tokens in stream order; an error aborts the scan
pub trait TokenSink {
    fn accept(&mut self, context: ScanContext) -> Result<()>;
}

impl TokenSink for Vec<Token> {
    fn accept(&mut self, context: ScanContext) -> Result<()> {
        self.push(context.token);
        Ok(())
    }
}

/// Where a scan begins
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StartMode {
    /// Whole files
    Code,
    /// Bare documentation text with no `/**` around it
    Doc,
}

/// States of the automaton that persist between tokens
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScanState {
    Code,
    Doc,
    /// Inside a backtick code span
    Math,
    /// Inside `_emphasis_`
    Em,
    /// After `@param` or `@throws`, before an optional `[`
    ParamBegin,
    /// Expecting a name in a bracketed list
    ParamItem,
    /// Expecting `,` or `]` in a bracketed list
    ParamMore,
    /// Inside the text of `[text](url)` or `![alt](src)`
    Anchor,
}

impl std::fmt::Display for ScanState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            ScanState::Code => "code",
            ScanState::Doc => "documentation",
            ScanState::Math => "a code span",
            ScanState::Em => "emphasis",
            ScanState::ParamBegin | ScanState::ParamItem | ScanState::ParamMore => {
                "a parameter list"
            }
            ScanState::Anchor => "a link",
        };
        f.write_str(name)
    }
}

/// `#include "file"` followed by a documentation block holding only `@include`
fn local_include_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r#"^[ \t]*include[ \t]*"([^"\n]+)"[ \t]*(?:\r?\n[ \t]*)?/\*\*\s*@include\s*\*/"#)
            .unwrap_or_else(|e| unreachable!("local include pattern: {e}"))
    })
}

/// The scanner for one buffer
pub struct Scanner {
    text: Rc<str>,
    label: Rc<str>,
    source: SourceId,
    start: StartMode,
    cursor: usize,
    state: ScanState,
    indent_level: i32,
    line: u32,
    /// Nothing but blanks since the last line break in documentation
    line_start: bool,
}

impl Scanner {
    /// Create a scanner over a loaded buffer
    #[must_use]
    pub fn new(id: SourceId, source: &Source, start: StartMode) -> Self {
        Self {
            text: Rc::clone(&source.text),
            label: Rc::clone(&source.label),
            source: id,
            start,
            cursor: 0,
            state: match start {
                StartMode::Code => ScanState::Code,
                StartMode::Doc => ScanState::Doc,
            },
            indent_level: 0,
            line: 1,
            line_start: true,
        }
    }

    /// Current automaton state
    pub fn state(&self) -> ScanState {
        self.state
    }

    /// Current brace nesting
    pub fn indent_level(&self) -> i32 {
        self.indent_level
    }

    /// Scan to the end, feeding every token to `sink`
    pub fn run(mut self, sink: &mut dyn TokenSink) -> Result<()> {
        while let Some(token) = self.next_token()? {
            trace!(
                label = %self.label,
                line = token.line,
                symbol = %token.symbol,
                text = %&self.text[token.span.as_range()],
                indent = self.indent_level,
                "token"
            );
            sink.accept(ScanContext {
                token,
                indent_level: self.indent_level,
            })?;
        }
        self.finish()?;
        Ok(())
    }

    /// Produce the next token, or `None` at the end of the buffer
    pub fn next_token(&mut self) -> Result<Option<Token>, ScanError> {
        let token = match self.state {
            ScanState::Code => self.lex_code(),
            ScanState::Doc => self.lex_doc(),
            ScanState::Math => self.lex_math(),
            ScanState::Em => self.lex_em(),
            ScanState::ParamBegin | ScanState::ParamItem | ScanState::ParamMore => {
                self.lex_params()
            }
            ScanState::Anchor => self.lex_anchor(),
        }?;
        if let Some(token) = &token {
            if !matches!(token.symbol, Symbol::Space | Symbol::Newline | Symbol::DocBegin) {
                self.line_start = false;
            }
        }
        Ok(token)
    }

    fn finish(&self) -> Result<(), ScanError> {
        let expected = match self.start {
            StartMode::Code => ScanState::Code,
            StartMode::Doc => ScanState::Doc,
        };
        if self.state != expected {
            let kind = if self.state == ScanState::Doc {
                ScanErrorKind::UnterminatedDoc
            } else {
                ScanErrorKind::DocEndedIn(self.state)
            };
            return Err(self.error(kind));
        }
        if self.indent_level != 0 {
            return Err(self.error(ScanErrorKind::IndentImbalance(self.indent_level)));
        }
        Ok(())
    }

    fn error(&self, kind: ScanErrorKind) -> ScanError {
        ScanError::new(kind, &*self.label, self.line)
    }

    fn token(&self, symbol: Symbol, range: Range<usize>, line: u32) -> Result<Token, ScanError> {
        let span = Span::try_from_range(range)
            .ok_or_else(|| self.error(ScanErrorKind::SpanOverflow).near(symbol))?;
        Ok(Token::new(symbol, span, self.source, line))
    }

    // ========== Code state ==========

    fn lex_code(&mut self) -> Result<Option<Token>, ScanError> {
        let text = Rc::clone(&self.text);
        loop {
            let rest = &text[self.cursor..];
            let mut lexer = CodeLexeme::lexer(rest);
            let Some(result) = lexer.next() else {
                self.cursor = text.len();
                return Ok(None);
            };
            let range = lexer.span();
            let start = self.cursor + range.start;
            let end = self.cursor + range.end;
            let line = self.line;
            self.cursor = end;

            let Ok(lexeme) = result else {
                // Stray characters such as `@` or `$` carry no structure
                let len = rest[range.start..].chars().next().map_or(1, char::len_utf8);
                self.cursor = start + len;
                return self.token(Symbol::Operator, start..start + len, line).map(Some);
            };

            match lexeme {
                CodeLexeme::Newline | CodeLexeme::Continuation => self.line += 1,
                CodeLexeme::EmptyComment => {}
                CodeLexeme::CommentBegin => self.skip_comment(ScanErrorKind::UnterminatedComment)?,
                CodeLexeme::LineComment => self.skip_line_comment(),
                CodeLexeme::DocBegin => {
                    let token = self.token(Symbol::DocBegin, start..end, line)?;
                    self.skip_opening_stars();
                    self.state = ScanState::Doc;
                    self.line_start = true;
                    return Ok(Some(token));
                }
                CodeLexeme::StringBegin => {
                    self.skip_quoted(b'"', ScanErrorKind::UnterminatedString)?;
                    return self.token(Symbol::Constant, start..self.cursor, line).map(Some);
                }
                CodeLexeme::CharBegin => {
                    self.skip_quoted(b'\'', ScanErrorKind::UnterminatedCharacter)?;
                    return self.token(Symbol::Constant, start..self.cursor, line).map(Some);
                }
                CodeLexeme::Hash => {
                    if let Some(token) = self.lex_macro()? {
                        return Ok(Some(token));
                    }
                }
                CodeLexeme::LBrace => {
                    self.indent_level += 1;
                    return self.token(Symbol::LBrace, start..end, line).map(Some);
                }
                CodeLexeme::RBrace => {
                    if self.indent_level == 0 {
                        return Err(self
                            .error(ScanErrorKind::IndentUnderflow)
                            .near(Symbol::RBrace));
                    }
                    self.indent_level -= 1;
                    return self.token(Symbol::RBrace, start..end, line).map(Some);
                }
                CodeLexeme::Ident => {
                    let symbol = classify_identifier(&text, start, end);
                    return self.token(symbol, start..end, line).map(Some);
                }
                other => {
                    if let Some(symbol) = other.symbol() {
                        return self.token(symbol, start..end, line).map(Some);
                    }
                }
            }
        }
    }

    /// `/***` and longer openers: the extra stars are decoration, unless the
    /// last one closes the block
    fn skip_opening_stars(&mut self) {
        let bytes = self.text.as_bytes();
        let run = bytes[self.cursor..].iter().take_while(|&&b| b == b'*').count();
        let skip = if bytes.get(self.cursor + run) == Some(&b'/') {
            run.saturating_sub(1)
        } else {
            run
        };
        self.cursor += skip;
    }

    /// Skip to just past the next `*/`
    fn skip_comment(&mut self, unterminated: ScanErrorKind) -> Result<(), ScanError> {
        let rest = &self.text[self.cursor..];
        match rest.find("*/") {
            Some(offset) => {
                self.line += count_lines(&rest[..offset]);
                self.cursor += offset + 2;
                Ok(())
            }
            None => Err(self.error(unterminated)),
        }
    }

    /// Skip to the end of the line, leaving the newline itself
    fn skip_line_comment(&mut self) {
        let bytes = self.text.as_bytes();
        while let Some(&b) = bytes.get(self.cursor) {
            match b {
                b'\n' => break,
                b'\\' if continues_line(bytes, self.cursor) => {
                    self.cursor = skip_continuation(bytes, self.cursor);
                    self.line += 1;
                }
                _ => self.cursor += 1,
            }
        }
    }

    /// Skip a string or character literal body, the cursor being just past
    /// the opening quote
    fn skip_quoted(&mut self, quote: u8, unterminated: ScanErrorKind) -> Result<(), ScanError> {
        let text = Rc::clone(&self.text);
        let bytes = text.as_bytes();
        loop {
            match bytes.get(self.cursor) {
                None | Some(b'\n') => return Err(self.error(unterminated)),
                Some(b'\\') if continues_line(bytes, self.cursor) => {
                    self.cursor = skip_continuation(bytes, self.cursor);
                    self.line += 1;
                }
                Some(b'\\') => self.cursor += 2,
                Some(&b) if b == quote => {
                    self.cursor += 1;
                    return Ok(());
                }
                Some(_) => self.cursor += 1,
            }
        }
    }

    /// A preprocessor line, the cursor being just past `#`. Only a marked
    /// local include produces a token.
    fn lex_macro(&mut self) -> Result<Option<Token>, ScanError> {
        let text = Rc::clone(&self.text);
        if let Some(caps) = local_include_re().captures(&text[self.cursor..]) {
            let (Some(whole), Some(name)) = (caps.get(0), caps.get(1)) else {
                unreachable!("local include pattern has one group");
            };
            let line = self.line;
            let range = self.cursor + name.start()..self.cursor + name.end();
            self.line += count_lines(whole.as_str());
            self.cursor += whole.end();
            return self.token(Symbol::LocalInclude, range, line).map(Some);
        }

        let bytes = text.as_bytes();
        while let Some(&b) = bytes.get(self.cursor) {
            match b {
                b'\n' => break,
                b'\\' if continues_line(bytes, self.cursor) => {
                    self.cursor = skip_continuation(bytes, self.cursor);
                    self.line += 1;
                }
                b'/' if bytes.get(self.cursor + 1) == Some(&b'*') => {
                    self.cursor += 2;
                    self.skip_comment(ScanErrorKind::UnterminatedMacroComment)?;
                }
                b'/' if bytes.get(self.cursor + 1) == Some(&b'/') => self.skip_line_comment(),
                b'"' => {
                    self.cursor += 1;
                    self.skip_quoted(b'"', ScanErrorKind::UnterminatedString)?;
                }
                b'\'' => {
                    self.cursor += 1;
                    self.skip_quoted(b'\'', ScanErrorKind::UnterminatedCharacter)?;
                }
                _ => self.cursor += 1,
            }
        }
        Ok(None)
    }
}

/// Scan a whole buffer into `sink`
pub fn scan(id: SourceId, source: &Source, start: StartMode, sink: &mut dyn TokenSink) -> Result<()> {
    Scanner::new(id, source, start).run(sink)
}

/// Generic prefixes, macros and plain identifiers
fn classify_identifier(text: &str, start: usize, end: usize) -> Symbol {
    let ident = &text[start..end];
    let next = text.as_bytes().get(end).copied();

    if next == Some(b'(') {
        match prefix_arity(ident) {
            Some(1) => return Symbol::IdOneGeneric,
            Some(2) => return Symbol::IdTwoGenerics,
            Some(3) => return Symbol::IdThreeGenerics,
            _ => {}
        }
    }

    let rest = text[end..].trim_start_matches([' ', '\t']);
    if rest.starts_with('(') && is_macro_name(ident) {
        return Symbol::Macro;
    }
    Symbol::Id
}

/// All capitals, digits and underscores, with at least two characters
fn is_macro_name(ident: &str) -> bool {
    ident.len() >= 2
        && ident.bytes().any(|b| b.is_ascii_uppercase())
        && ident
            .bytes()
            .all(|b| b.is_ascii_uppercase() || b.is_ascii_digit() || b == b'_')
}

fn count_lines(text: &str) -> u32 {
    u32::try_from(text.bytes().filter(|&b| b == b'\n').count()).unwrap_or(u32::MAX)
}

/// A backslash at `at` followed by a line break
fn continues_line(bytes: &[u8], at: usize) -> bool {
    match bytes.get(at + 1) {
        Some(b'\n') => true,
        Some(b'\r') => bytes.get(at + 2) == Some(&b'\n'),
        _ => false,
    }
}

fn skip_continuation(bytes: &[u8], at: usize) -> usize {
    if bytes.get(at + 1) == Some(&b'\r') {
        at + 3
    } else {
        at + 2
    }
}
