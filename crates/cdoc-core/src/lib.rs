//! cdoc Core - documentation extraction for C sources
//!
//! This crate provides the pipeline behind the `cdoc` tool:
//! - Scanner: splits C source and `/** ... */` blocks into tokens
//! - Report: sorts tokens into documented segments, following local includes
//! - Semantic: classifies each statement and finds its names
//! - Generic: demangles `A_(x)`-style generic names
//! - Doc: renders a report as HTML, Markdown or JSON

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// The symbol table shared by every stage
pub mod symbol;

/// Loaded source buffers
pub mod source;

/// Scanner module - tokenization of C source and documentation
pub mod scanner;

/// Report module - segments and the sorter that builds them
pub mod report;

/// Statement classification
pub mod semantic;

/// Generic name demangling
pub mod generic;

/// Include and link path resolution
pub mod resolve;

/// Documentation generators
pub mod doc;

/// Error types
pub mod error;

/// Test utilities - helpers for scanning and reporting on snippets
pub mod testutil;

/// Convenience re-export of the report
pub use report::{Report, Segment};

/// Convenience re-export of the generators
pub use doc::{Format, HtmlGenerator, JsonGenerator, MarkdownGenerator, RenderOptions};

/// Convenience re-export of errors
pub use error::{Error, Result};

/// Convenience re-export of scanner types
pub use scanner::{scan, ScanError, Scanner, StartMode, Token};

pub use resolve::PathResolver;
pub use semantic::Division;
pub use symbol::Symbol;
