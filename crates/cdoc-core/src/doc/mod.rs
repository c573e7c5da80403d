//! Documentation generators
//!
//! Turns a culled [`Report`] into one HTML page, one Markdown file or a JSON
//! dump. Every generator shares the [`DocWriter`] token walk and the
//! [`CrossIndex`] of documented names.

mod crosslink;
mod html;
mod json;
mod markdown;
mod writer;

pub use crosslink::{anchor, CrossIndex};
pub use html::HtmlGenerator;
pub use json::JsonGenerator;
pub use markdown::MarkdownGenerator;
pub use writer::{Block, DocWriter, Inline, Markup, PlainMarkup, CITATION_SEARCH};

use std::path::Path;

use serde::Deserialize;

use crate::error::Result;
use crate::report::{Report, Segment};
use crate::resolve::PathResolver;
use crate::scanner::Token;
use crate::semantic::Division;
use crate::symbol::Symbol;

/// Output formats
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Format {
    #[default]
    Html,
    #[serde(alias = "markdown")]
    Md,
    Json,
}

impl Format {
    /// Guess the format from an output file name
    pub fn from_path(path: &Path) -> Option<Self> {
        let ext = path.extension()?.to_str()?.to_ascii_lowercase();
        match ext.as_str() {
            "html" | "htm" => Some(Format::Html),
            "md" | "markdown" => Some(Format::Md),
            "json" => Some(Format::Json),
            _ => None,
        }
    }

    /// Render `report` in this format
    ///
    /// # Errors
    /// Returns an error if a generic name cannot be demangled or the
    /// output cannot be produced.
    pub fn generate(self, report: &Report, options: &RenderOptions) -> Result<String> {
        match self {
            Format::Html => HtmlGenerator::generate(report, options),
            Format::Md => MarkdownGenerator::generate(report, options),
            Format::Json => JsonGenerator::generate(report, options),
        }
    }
}

/// Settings shared by every generator
#[derive(Debug, Clone, Default)]
pub struct RenderOptions {
    /// Page title as documentation tokens; the input label otherwise
    pub title: Option<Vec<Token>>,
    pub resolver: PathResolver,
}

impl RenderOptions {
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_title(mut self, title: Vec<Token>) -> Self {
        self.title = Some(title);
        self
    }

    #[must_use]
    pub fn with_resolver(mut self, resolver: PathResolver) -> Self {
        self.resolver = resolver;
        self
    }
}

/// Attributes listed after the preamble text; subtitle and abstract are
/// placed separately
pub(crate) const PREAMBLE_ATTRIBUTES: [Symbol; 6] = [
    Symbol::AttAuthor,
    Symbol::AttStd,
    Symbol::AttDepend,
    Symbol::AttLicense,
    Symbol::AttCf,
    Symbol::AttFixme,
];

/// Attributes listed under a statement, in order
pub(crate) const DETAIL_ATTRIBUTES: [Symbol; 13] = [
    Symbol::AttParam,
    Symbol::AttReturn,
    Symbol::AttThrows,
    Symbol::AttImplements,
    Symbol::AttOrder,
    Symbol::AttAllow,
    Symbol::AttAbstract,
    Symbol::AttAuthor,
    Symbol::AttStd,
    Symbol::AttDepend,
    Symbol::AttLicense,
    Symbol::AttCf,
    Symbol::AttFixme,
];

/// A segment ready to be laid out: its name and anchor resolved
pub(crate) struct Entry<'r> {
    pub segment: &'r Segment,
    pub name: Option<String>,
    pub anchor: String,
}

/// Segments of one division, in source order
pub(crate) fn entries(report: &Report, division: Division) -> Result<Vec<Entry<'_>>> {
    let mut out = Vec::new();
    for (position, segment) in report
        .segments()
        .iter()
        .filter(|s| s.division == division)
        .enumerate()
    {
        let name = segment.title(report.sources())?;
        let anchor = match &name {
            Some(name) => anchor(division, name),
            None => format!("{}:{}", division.anchor_prefix(), position + 1),
        };
        out.push(Entry {
            segment,
            name,
            anchor,
        });
    }
    Ok(out)
}

/// The page title: configured tokens, or the input label
pub(crate) fn title<M: Markup>(
    report: &Report,
    options: &RenderOptions,
    writer: &DocWriter<'_, M>,
) -> Result<String> {
    if let Some(tokens) = &options.title {
        return writer.inline(tokens);
    }
    let label = report.label().unwrap_or("Documentation");
    Ok(writer.markup().escape(label, false).into_owned())
}
