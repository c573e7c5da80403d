//! Scanner error types

use thiserror::Error;

use super::ScanState;
use crate::symbol::Symbol;

/// The kind of scan error
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ScanErrorKind {
    #[error("unterminated string literal")]
    UnterminatedString,

    #[error("unterminated character literal")]
    UnterminatedCharacter,

    #[error("unterminated comment")]
    UnterminatedComment,

    #[error("unterminated comment in preprocessor line")]
    UnterminatedMacroComment,

    #[error("unterminated documentation block")]
    UnterminatedDoc,

    #[error("documentation ended inside {0}")]
    DocEndedIn(ScanState),

    #[error("documentation ended inside a preformatted line")]
    DocEndedInPreformatted,

    #[error("expected an identifier, ',' or ']' in parameter list")]
    BadParamList,

    #[error("closing brace without a matching opening brace")]
    IndentUnderflow,

    #[error("{0} unclosed brace(s) at end of file")]
    IndentImbalance(i32),

    #[error("token span does not fit in 32 bits")]
    SpanOverflow,
}

/// A scan error with the file label, line and nearby symbol
#[derive(Debug, Clone, PartialEq)]
pub struct ScanError {
    /// The kind of error
    pub kind: ScanErrorKind,
    /// Label of the buffer being scanned
    pub label: String,
    /// 1-based line the error was detected on
    pub line: u32,
    /// The symbol being scanned when the error occurred, if known
    pub symbol: Option<Symbol>,
}

impl ScanError {
    #[must_use]
    pub fn new(kind: ScanErrorKind, label: impl Into<String>, line: u32) -> Self {
        Self {
            kind,
            label: label.into(),
            line,
            symbol: None,
        }
    }

    /// Attach the offending symbol
    #[must_use]
    pub fn near(mut self, symbol: Symbol) -> Self {
        self.symbol = Some(symbol);
        self
    }
}

impl std::fmt::Display for ScanError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{}: {}", self.label, self.line, self.kind)?;
        if let Some(symbol) = self.symbol {
            write!(f, " (near {symbol})")?;
        }
        Ok(())
    }
}

impl std::error::Error for ScanError {}
