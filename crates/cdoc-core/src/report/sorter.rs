//! Groups the token stream into segments
//!
//! The sorter sees every token once, in order. Documentation accumulates on
//! the open segment until a statement ends; then the statement is classified
//! and the segment is cut. Two documentation blocks with no code between
//! them, or documentation more than two lines above its code, are cut apart.

use thiserror::Error;
use tracing::{debug, trace};

use super::segment::{Attribute, Segment};
use crate::scanner::{ScanContext, Token};
use crate::semantic::{classify, Division};
use crate::source::SourceMap;
use crate::symbol::Symbol;

/// Which kind of token the sorter expects next
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortState {
    Code,
    Doc,
    /// Inside an attribute's bracketed name list
    Args,
}

impl std::fmt::Display for SortState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            SortState::Code => "code",
            SortState::Doc => "documentation",
            SortState::Args => "an attribute name list",
        })
    }
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum SortError {
    #[error("{label}:{line}: unexpected {symbol} in {found}, expected {expected}")]
    SneakPath {
        label: String,
        line: u32,
        symbol: Symbol,
        expected: SortState,
        found: SortState,
    },

    #[error("{label}:{line}: name list with no attribute to attach it to")]
    NoAttribute { label: String, line: u32 },
}

/// Pending whitespace between two pieces of documentation
#[derive(Debug, Default)]
struct Whitespace {
    first: Option<Token>,
    newlines: u32,
}

impl Whitespace {
    fn note(&mut self, token: Token) {
        if token.symbol == Symbol::Newline {
            self.newlines += 1;
        }
        self.first.get_or_insert(token);
    }

    fn clear(&mut self) {
        *self = Self::default();
    }

    /// Push the pending run onto `target` as at most one token, then clear
    /// it. Nothing is pushed onto an empty target.
    fn flush_into(&mut self, target: &mut Vec<Token>) {
        if let Some(first) = self.first.take() {
            if !target.is_empty() {
                let symbol = if self.newlines > 1 {
                    Symbol::Newline
                } else {
                    Symbol::Space
                };
                target.push(first.with_symbol(symbol));
            }
        }
        self.newlines = 0;
    }
}

/// Collapse whitespace in a documentation token run the way the sorter
/// does: leading and trailing whitespace is dropped, a run with more than
/// one line break becomes one `Newline`, any other run one `Space`
pub fn collapse_whitespace(tokens: &[Token]) -> Vec<Token> {
    let mut out = Vec::with_capacity(tokens.len());
    let mut pending = Whitespace::default();
    for &token in tokens {
        match token.symbol {
            Symbol::Space | Symbol::Newline => pending.note(token),
            _ => {
                pending.flush_into(&mut out);
                out.push(token);
            }
        }
    }
    out
}

/// Sorter state; one per report, shared by included files
#[derive(Debug)]
pub struct Sorter {
    segments: Vec<Segment>,
    current: Segment,
    state: SortState,
    attribute_open: bool,
    whitespace: Whitespace,
    ignore_code: bool,
    classified: bool,
    differed_cut: bool,
    last_doc_line: Option<u32>,
}

impl Default for Sorter {
    fn default() -> Self {
        Self {
            segments: Vec::new(),
            current: Segment::default(),
            state: SortState::Code,
            attribute_open: false,
            whitespace: Whitespace::default(),
            ignore_code: false,
            classified: false,
            differed_cut: false,
            last_doc_line: None,
        }
    }
}

impl Sorter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Completed segments
    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    pub(crate) fn segments_mut(&mut self) -> &mut Vec<Segment> {
        &mut self.segments
    }

    pub fn state(&self) -> SortState {
        self.state
    }

    /// Forget everything after the first `len` segments, and the open one
    pub(crate) fn rollback(&mut self, len: usize) {
        self.segments.truncate(len);
        let segments = std::mem::take(&mut self.segments);
        *self = Self {
            segments,
            ..Self::default()
        };
    }

    /// Take one token
    ///
    /// # Errors
    /// Returns a [`SortError`] if the token is not legal in the current
    /// state.
    pub fn accept(&mut self, context: ScanContext, sources: &SourceMap) -> Result<(), SortError> {
        let token = context.token;
        match token.symbol {
            Symbol::DocBegin => {
                self.expect(SortState::Code, token, sources)?;
                self.doc_begin();
            }
            Symbol::DocEnd => {
                self.expect(SortState::Doc, token, sources)?;
                self.state = SortState::Code;
                self.last_doc_line = Some(token.line);
                self.whitespace.clear();
            }
            Symbol::DocLeft => {
                self.expect(SortState::Doc, token, sources)?;
                if !self.attribute_open {
                    return Err(SortError::NoAttribute {
                        label: sources.label(token.source).to_string(),
                        line: token.line,
                    });
                }
                self.state = SortState::Args;
            }
            Symbol::DocComma => self.expect(SortState::Args, token, sources)?,
            Symbol::DocRight => {
                self.expect(SortState::Args, token, sources)?;
                self.state = SortState::Doc;
            }
            Symbol::Word if self.state == SortState::Args => {
                if let Some(attribute) = self.current.attributes.last_mut() {
                    attribute.header.push(token);
                }
            }
            Symbol::Space | Symbol::Newline => {
                self.expect(SortState::Doc, token, sources)?;
                self.whitespace.note(token);
            }
            symbol if symbol.is_attribute() => {
                self.expect(SortState::Doc, token, sources)?;
                self.current.attributes.push(Attribute::new(token));
                self.attribute_open = true;
                self.whitespace.clear();
            }
            symbol if symbol.is_code() => {
                self.expect(SortState::Code, token, sources)?;
                self.code(context);
            }
            _ => {
                self.expect(SortState::Doc, token, sources)?;
                self.doc(token);
            }
        }

        if self.differed_cut {
            self.cut();
        }
        Ok(())
    }

    /// End of the top-level scan: classify and close whatever is open
    pub fn finish(&mut self) {
        if !self.classified && !self.current.code.is_empty() {
            self.commit_classification();
        }
        self.cut();
    }

    /// Close the open segment and reset per-segment state
    pub fn cut(&mut self) {
        let segment = std::mem::take(&mut self.current);
        if !segment.is_empty() {
            trace!(
                division = %segment.division,
                doc = segment.doc.len(),
                code = segment.code.len(),
                "cut segment"
            );
            self.segments.push(segment);
        }
        self.attribute_open = false;
        self.whitespace.clear();
        self.ignore_code = false;
        self.classified = false;
        self.differed_cut = false;
        self.last_doc_line = None;
    }

    fn expect(&self, expected: SortState, token: Token, sources: &SourceMap) -> Result<(), SortError> {
        if self.state == expected {
            return Ok(());
        }
        Err(SortError::SneakPath {
            label: sources.label(token.source).to_string(),
            line: token.line,
            symbol: token.symbol,
            expected,
            found: self.state,
        })
    }

    fn doc_begin(&mut self) {
        if self.current.is_documented() {
            if self.current.code.is_empty() {
                debug!("documentation followed by documentation, binding the first to the file");
                self.cut();
            } else {
                // Documentation inside a statement continues as a new paragraph
                self.attribute_open = false;
                self.whitespace.clear();
                self.whitespace.newlines = 2;
                self.whitespace.first = self.current.doc.last().copied();
            }
        }
        self.state = SortState::Doc;
    }

    fn doc(&mut self, token: Token) {
        let target = match self.current.attributes.last_mut() {
            Some(attribute) if self.attribute_open => &mut attribute.contents,
            _ => &mut self.current.doc,
        };
        self.whitespace.flush_into(target);
        target.push(token);
    }

    fn code(&mut self, context: ScanContext) {
        let token = context.token;
        let detached = self.current.code.is_empty()
            && self.current.is_documented()
            && self.last_doc_line.is_some_and(|line| token.line > line + 2);
        if detached {
            debug!(line = token.line, "documentation too far above its code, detaching");
            self.cut();
        }

        if self.ignore_code {
            if token.symbol == Symbol::RBrace && context.indent_level == 0 {
                self.end_statement();
            }
            return;
        }

        if token.symbol == Symbol::LBrace && context.indent_level == 1 && !self.classified {
            let classification = classify(&self.current.code);
            // A block after `)` of a header that is not a type is a body too,
            // as in `main() { ... }`
            let body = match classification.division {
                Division::Function => true,
                Division::Data => self
                    .current
                    .code
                    .last()
                    .is_some_and(|t| t.symbol == Symbol::RParen),
                _ => false,
            };
            if body {
                self.current.division = classification.division;
                self.current.code_params = classification.params;
                self.classified = true;
                self.ignore_code = true;
                return;
            }
        }

        self.current.code.push(token);
        if token.symbol == Symbol::Semicolon && context.indent_level == 0 {
            self.end_statement();
        }
    }

    fn end_statement(&mut self) {
        if !self.classified {
            self.commit_classification();
        }
        self.differed_cut = true;
    }

    fn commit_classification(&mut self) {
        let classification = classify(&self.current.code);
        self.current.division = classification.division;
        self.current.code_params = classification.params;
        self.classified = true;
    }
}
