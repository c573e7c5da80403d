//! Test utilities for cdoc
//!
//! Helpers for scanning, classifying and reporting on small snippets. All of
//! them report failure as a `String` so tests can match on messages.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use crate::error::{Error, Result};
use crate::report::Report;
use crate::scanner::{scan, StartMode, Token};
use crate::semantic::{classify, Classification};
use crate::source::{SourceMap, TextLoader};
use crate::symbol::{Mark, Symbol};

/// Result type for test helpers
pub type TestResult<T> = std::result::Result<T, String>;

fn scan_mode(source: &str, start: StartMode) -> TestResult<Vec<Token>> {
    let mut sources = SourceMap::new();
    let id = sources
        .add("test.c", None, source.to_string())
        .map_err(|e| e.to_string())?;
    let mut tokens = Vec::new();
    scan(id, sources.get(id), start, &mut tokens).map_err(|e| e.to_string())?;
    Ok(tokens)
}

/// Scan C source
///
/// # Errors
/// Returns the scan error message
pub fn scan_code(source: &str) -> TestResult<Vec<Token>> {
    scan_mode(source, StartMode::Code)
}

/// Scan C source and keep only the symbols
///
/// # Errors
/// Returns the scan error message
pub fn scan_symbols(source: &str) -> TestResult<Vec<Symbol>> {
    Ok(scan_code(source)?.iter().map(|t| t.symbol).collect())
}

/// Scan bare documentation text, returning the text alongside the tokens
///
/// # Errors
/// Returns the scan error message
pub fn scan_doc(source: &str) -> TestResult<(String, Vec<Token>)> {
    Ok((source.to_string(), scan_mode(source, StartMode::Doc)?))
}

/// Scan bare documentation text and keep only the symbols
///
/// # Errors
/// Returns the scan error message
pub fn scan_doc_symbols(source: &str) -> TestResult<Vec<Symbol>> {
    Ok(scan_mode(source, StartMode::Doc)?
        .iter()
        .map(|t| t.symbol)
        .collect())
}

/// Parse a mark string such as `"vx(v)"`
///
/// # Errors
/// Returns an error naming the first unknown character
pub fn parse_marks(marks: &str) -> TestResult<Vec<Mark>> {
    marks
        .chars()
        .map(|c| Mark::from_char(c).ok_or_else(|| format!("unknown mark '{c}'")))
        .collect()
}

/// Scan one statement and classify it
///
/// # Errors
/// Returns the scan error message
pub fn classify_code(source: &str) -> TestResult<(String, Vec<Token>, Classification)> {
    let code = scan_code(source)?;
    let classification = classify(&code);
    Ok((source.to_string(), code, classification))
}

/// Build a report from one in-memory file named `test.c`
///
/// # Errors
/// Returns the scan error message
pub fn report_from(source: &str) -> TestResult<Report> {
    let mut report = Report::new();
    report
        .scan_str("test.c", source)
        .map_err(|e| e.to_string())?;
    Ok(report)
}

/// Tokens joined back into text: whitespace tokens as single blanks or line
/// breaks, everything else spaced by the symbol spacing flags
pub fn segment_texts(report: &Report, tokens: &[Token]) -> String {
    let mut out = String::new();
    let mut right = false;
    for token in tokens {
        let (left, next_right) = token.symbol.spacing();
        match token.symbol {
            Symbol::Space => out.push(' '),
            Symbol::Newline => out.push('\n'),
            _ => {
                if right && left {
                    out.push(' ');
                }
                out.push_str(report.text(token));
            }
        }
        right = next_right;
    }
    out
}

/// Serves files from memory, for include tests
#[derive(Debug, Default, Clone)]
pub struct MemoryLoader {
    files: HashMap<PathBuf, String>,
}

impl MemoryLoader {
    pub fn new<'a>(files: impl IntoIterator<Item = (&'a str, &'a str)>) -> Self {
        Self {
            files: files
                .into_iter()
                .map(|(path, text)| (PathBuf::from(path), text.to_string()))
                .collect(),
        }
    }
}

impl TextLoader for MemoryLoader {
    fn load(&self, path: &Path) -> Result<String> {
        self.files.get(path).cloned().ok_or_else(|| Error::Io {
            path: path.to_path_buf(),
            source: std::io::Error::new(std::io::ErrorKind::NotFound, "no such file"),
        })
    }
}
