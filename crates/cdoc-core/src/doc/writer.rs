//! Walking documentation and code tokens on behalf of a generator
//!
//! [`DocWriter`] knows what each symbol means; a [`Markup`] knows how one
//! output format spells it. Paragraphs, lists and preformatted blocks are
//! tracked here so every format gets the same block structure.

use std::borrow::Cow;
use std::fmt::{self, Write};

use percent_encoding::{utf8_percent_encode, NON_ALPHANUMERIC};
use tracing::warn;

use super::crosslink::CrossIndex;
use crate::error::Result;
use crate::generic::demangle;
use crate::report::Report;
use crate::resolve::PathResolver;
use crate::scanner::Token;
use crate::semantic::Division;
use crate::symbol::{Category, Symbol};

/// Where citations are looked up
pub const CITATION_SEARCH: &str = "https://scholar.google.com/scholar?q=";

/// Block-level containers
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Block {
    Paragraph,
    List,
    Preformatted,
}

/// Inline spans
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Inline {
    Emphasis,
    Code,
}

/// How one output format spells documentation
pub trait Markup {
    /// Escape text; `code` is set inside code spans and signatures
    fn escape<'a>(&self, text: &'a str, code: bool) -> Cow<'a, str>;

    fn open_block(&self, out: &mut String, block: Block) -> fmt::Result;

    fn close_block(&self, out: &mut String, block: Block) -> fmt::Result;

    fn open_item(&self, out: &mut String) -> fmt::Result;

    fn close_item(&self, out: &mut String) -> fmt::Result;

    fn open_inline(&self, out: &mut String, inline: Inline) -> fmt::Result;

    fn close_inline(&self, out: &mut String, inline: Inline) -> fmt::Result;

    /// One line of a preformatted block, not yet escaped
    fn preformatted(&self, out: &mut String, line: &str) -> fmt::Result;

    /// A link around already rendered `text`
    fn link(&self, out: &mut String, text: &str, href: &str) -> fmt::Result;

    /// An image with already rendered alternative text
    fn image(&self, out: &mut String, alt: &str, src: &str) -> fmt::Result;

    /// Non-breaking spaces and named math symbols
    fn symbol(&self, symbol: Symbol) -> &'static str;
}

/// Whether block structure is kept or flattened onto one line
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Flow {
    Blocks,
    Inline,
}

/// Rendering state for one token run
struct Pass {
    out: String,
    flow: Flow,
    block: Option<Block>,
    item_open: bool,
    /// Nothing written since the current block or item opened
    fresh: bool,
    space: bool,
    spans: Vec<Inline>,
    anchor: Option<(Symbol, usize)>,
}

impl Pass {
    fn new(flow: Flow) -> Self {
        Self {
            out: String::new(),
            flow,
            block: None,
            item_open: false,
            fresh: true,
            space: false,
            spans: Vec::new(),
            anchor: None,
        }
    }

    fn in_code(&self) -> bool {
        self.spans.contains(&Inline::Code)
    }
}

/// Renders token runs from one report through a [`Markup`]
pub struct DocWriter<'a, M> {
    report: &'a Report,
    index: &'a CrossIndex,
    resolver: &'a PathResolver,
    markup: &'a M,
}

impl<'a, M: Markup> DocWriter<'a, M> {
    pub fn new(
        report: &'a Report,
        index: &'a CrossIndex,
        resolver: &'a PathResolver,
        markup: &'a M,
    ) -> Self {
        Self {
            report,
            index,
            resolver,
            markup,
        }
    }

    pub fn markup(&self) -> &M {
        self.markup
    }

    pub fn report(&self) -> &'a Report {
        self.report
    }

    /// Documentation with its paragraphs, lists and preformatted blocks
    ///
    /// # Errors
    /// Returns an error if the output cannot be formatted.
    pub fn blocks(&self, tokens: &[Token]) -> Result<String> {
        self.render(tokens, Flow::Blocks)
    }

    /// Documentation flattened onto one line, for headings and table cells
    ///
    /// # Errors
    /// Returns an error if the output cannot be formatted.
    pub fn inline(&self, tokens: &[Token]) -> Result<String> {
        self.render(tokens, Flow::Inline)
    }

    /// The first paragraph of some documentation, flattened
    ///
    /// # Errors
    /// Returns an error if the output cannot be formatted.
    pub fn brief(&self, tokens: &[Token]) -> Result<String> {
        let end = tokens
            .iter()
            .position(|t| t.symbol == Symbol::Newline)
            .unwrap_or(tokens.len());
        self.inline(&tokens[..end])
    }

    /// Code spaced by the symbol spacing flags, with generic names
    /// demangled
    ///
    /// # Errors
    /// Returns an error if a generic name is malformed.
    pub fn code(&self, tokens: &[Token]) -> Result<String> {
        let mut out = String::new();
        let mut right = false;
        let mut at = 0;
        while let Some(token) = tokens.get(at) {
            let (left, next_right) = token.symbol.spacing();
            if right && left {
                out.push(' ');
            }
            let text = if let Category::Generic(_) = token.symbol.category() {
                let demangled = demangle(tokens, at, self.report.sources())?;
                at += demangled.consumed.max(1);
                Cow::Owned(demangled.text)
            } else {
                at += 1;
                Cow::Borrowed(self.report.text(token))
            };
            out.push_str(&self.markup.escape(&text, true));
            right = next_right;
        }
        Ok(out)
    }

    fn render(&self, tokens: &[Token], flow: Flow) -> Result<String> {
        let mut pass = Pass::new(flow);
        for token in tokens {
            self.token(&mut pass, token)?;
        }
        while let Some(inline) = pass.spans.pop() {
            self.markup.close_inline(&mut pass.out, inline)?;
        }
        pass.anchor = None;
        self.end_block(&mut pass)?;
        Ok(pass.out)
    }

    fn token(&self, pass: &mut Pass, token: &Token) -> Result<()> {
        match (token.symbol, pass.flow) {
            (Symbol::Space, _) | (Symbol::Newline, Flow::Inline) => {
                pass.space = !pass.fresh;
            }
            (Symbol::Newline, Flow::Blocks) => self.end_block(pass)?,
            (Symbol::ListItem, Flow::Blocks) => {
                if pass.block == Some(Block::List) {
                    self.markup.close_item(&mut pass.out)?;
                } else {
                    self.end_block(pass)?;
                    self.markup.open_block(&mut pass.out, Block::List)?;
                    pass.block = Some(Block::List);
                }
                self.markup.open_item(&mut pass.out)?;
                pass.item_open = true;
                pass.fresh = true;
                pass.space = false;
            }
            (Symbol::Preformatted, Flow::Blocks) => {
                if pass.block != Some(Block::Preformatted) {
                    self.end_block(pass)?;
                    self.markup
                        .open_block(&mut pass.out, Block::Preformatted)?;
                    pass.block = Some(Block::Preformatted);
                }
                self.markup
                    .preformatted(&mut pass.out, self.report.text(token))?;
                pass.space = false;
            }
            (Symbol::Preformatted, Flow::Inline) => {
                self.begin_text(pass)?;
                self.markup.open_inline(&mut pass.out, Inline::Code)?;
                let text = self.markup.escape(self.report.text(token).trim(), true);
                pass.out.push_str(&text);
                self.markup.close_inline(&mut pass.out, Inline::Code)?;
            }
            _ => {
                self.begin_text(pass)?;
                self.inline_token(pass, token)?;
            }
        }
        Ok(())
    }

    /// Open a paragraph if no block takes text, then flush a pending space
    fn begin_text(&self, pass: &mut Pass) -> fmt::Result {
        if pass.flow == Flow::Blocks
            && matches!(pass.block, None | Some(Block::Preformatted))
        {
            self.end_block(pass)?;
            self.markup.open_block(&mut pass.out, Block::Paragraph)?;
            pass.block = Some(Block::Paragraph);
        }
        if pass.space && !pass.fresh {
            pass.out.push(' ');
        }
        pass.space = false;
        pass.fresh = false;
        Ok(())
    }

    fn end_block(&self, pass: &mut Pass) -> fmt::Result {
        if pass.item_open {
            self.markup.close_item(&mut pass.out)?;
            pass.item_open = false;
        }
        if let Some(block) = pass.block.take() {
            self.markup.close_block(&mut pass.out, block)?;
        }
        pass.fresh = true;
        pass.space = false;
        Ok(())
    }

    fn inline_token(&self, pass: &mut Pass, token: &Token) -> Result<()> {
        let text = self.report.text(token);
        match token.symbol.category() {
            Category::Escape if token.symbol != Symbol::Escape => {
                pass.out.push_str(self.markup.symbol(token.symbol));
            }
            Category::Reference => self.reference(pass, token)?,
            Category::Link if token.symbol == Symbol::Url => {
                let href = self.resolver.resolve_link(text);
                match pass.anchor.take() {
                    Some((kind, at)) => {
                        let label = pass.out.split_off(at);
                        if kind == Symbol::ImageStart {
                            self.markup.image(&mut pass.out, &label, href.as_str())?;
                        } else {
                            self.markup.link(&mut pass.out, &label, href.as_str())?;
                        }
                    }
                    None => {
                        let label = self.markup.escape(text, false);
                        self.markup.link(&mut pass.out, &label, href.as_str())?;
                    }
                }
            }
            Category::Link => {
                let href = format!(
                    "{CITATION_SEARCH}{}",
                    utf8_percent_encode(text, NON_ALPHANUMERIC)
                );
                let label = self.markup.escape(text, false);
                self.markup.link(&mut pass.out, &label, &href)?;
            }
            Category::Anchor => pass.anchor = Some((token.symbol, pass.out.len())),
            Category::Structural => {
                let (inline, open) = match token.symbol {
                    Symbol::EmBegin => (Inline::Emphasis, true),
                    Symbol::EmEnd => (Inline::Emphasis, false),
                    Symbol::MathBegin => (Inline::Code, true),
                    Symbol::MathEnd => (Inline::Code, false),
                    _ => return Ok(()),
                };
                if open {
                    self.markup.open_inline(&mut pass.out, inline)?;
                    pass.spans.push(inline);
                } else if pass.spans.last() == Some(&inline) {
                    pass.spans.pop();
                    self.markup.close_inline(&mut pass.out, inline)?;
                }
            }
            Category::Attribute => {}
            _ => {
                let escaped = self.markup.escape(text, pass.in_code());
                pass.out.push_str(&escaped);
            }
        }
        Ok(())
    }

    /// `<fn:name>` and friends: a link when the name is documented, plain
    /// code otherwise
    fn reference(&self, pass: &mut Pass, token: &Token) -> fmt::Result {
        let name = self.report.text(token);
        let division = match token.symbol {
            Symbol::SeeFn => Division::Function,
            Symbol::SeeTag => Division::Tag,
            Symbol::SeeTypedef => Division::Typedef,
            _ => Division::Data,
        };

        let mut label = String::new();
        self.markup.open_inline(&mut label, Inline::Code)?;
        label.push_str(&self.markup.escape(name, true));
        self.markup.close_inline(&mut label, Inline::Code)?;

        match self.index.href(division, name) {
            Some(href) => self.markup.link(&mut pass.out, &label, &href),
            None => {
                warn!(
                    label = %self.report.sources().label(token.source),
                    line = token.line,
                    reference = %format_args!("{division}:{name}"),
                    "reference to an undocumented name"
                );
                pass.out.write_str(&label)
            }
        }
    }
}

/// Plain text, for the JSON dump
#[derive(Debug, Clone, Copy, Default)]
pub struct PlainMarkup;

impl Markup for PlainMarkup {
    fn escape<'a>(&self, text: &'a str, _code: bool) -> Cow<'a, str> {
        Cow::Borrowed(text)
    }

    fn open_block(&self, _out: &mut String, _block: Block) -> fmt::Result {
        Ok(())
    }

    fn close_block(&self, out: &mut String, block: Block) -> fmt::Result {
        if block == Block::List {
            return out.write_char('\n');
        }
        trim_newline(out);
        out.write_str("\n\n")
    }

    fn open_item(&self, out: &mut String) -> fmt::Result {
        out.write_str("- ")
    }

    fn close_item(&self, out: &mut String) -> fmt::Result {
        out.write_char('\n')
    }

    fn open_inline(&self, _out: &mut String, _inline: Inline) -> fmt::Result {
        Ok(())
    }

    fn close_inline(&self, _out: &mut String, _inline: Inline) -> fmt::Result {
        Ok(())
    }

    fn preformatted(&self, out: &mut String, line: &str) -> fmt::Result {
        writeln!(out, "{line}")
    }

    fn link(&self, out: &mut String, text: &str, _href: &str) -> fmt::Result {
        out.write_str(text)
    }

    fn image(&self, out: &mut String, alt: &str, _src: &str) -> fmt::Result {
        out.write_str(alt)
    }

    fn symbol(&self, symbol: Symbol) -> &'static str {
        unicode_symbol(symbol)
    }
}

fn trim_newline(out: &mut String) {
    while out.ends_with('\n') {
        out.pop();
    }
}

/// Unicode spelling of the non-breaking spaces and math symbols
pub(crate) fn unicode_symbol(symbol: Symbol) -> &'static str {
    match symbol {
        Symbol::Nbsp => "\u{a0}",
        Symbol::NbThinsp => "\u{202f}",
        Symbol::MathCalO => "\u{1d4aa}",
        Symbol::MathTheta => "\u{398}",
        Symbol::MathOmega => "\u{3a9}",
        Symbol::MathTimes => "\u{d7}",
        Symbol::MathCdot => "\u{b7}",
        _ => "",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testutil::report_from;

    fn plain_doc(source: &str) -> String {
        let report = report_from(source).unwrap();
        let index = CrossIndex::new(&report).unwrap();
        let resolver = PathResolver::new();
        let writer = DocWriter::new(&report, &index, &resolver, &PlainMarkup);
        writer.blocks(&report.segments()[0].doc).unwrap()
    }

    #[test]
    fn test_paragraphs_are_separated() {
        assert_eq!(
            plain_doc("/** One\n two.\n\n Three. */\n"),
            "One two.\n\nThree.\n\n"
        );
    }

    #[test]
    fn test_list_items() {
        assert_eq!(
            plain_doc("/** Items:\n\n - a\n - b c */\n"),
            "Items:\n\n- a\n- b c\n\n"
        );
    }

    #[test]
    fn test_preformatted_lines_form_one_block() {
        assert_eq!(
            plain_doc("/** Code:\n\n \\\"  x = 1;\n \\\"  y = 2;\n */\n"),
            "Code:\n\n  x = 1;\n  y = 2;\n\n"
        );
    }

    #[test]
    fn test_math_symbols() {
        assert_eq!(plain_doc("/** `\\O(n)` */\n"), "\u{1d4aa}(n)\n\n");
        assert_eq!(plain_doc("/** a~b */\n"), "a\u{a0}b\n\n");
    }

    #[test]
    fn test_code_spacing_and_generics() {
        let report = report_from("/** F. */\nstatic int *PT_(get)(const struct PT_(list) *l, int i);\n").unwrap();
        let index = CrossIndex::new(&report).unwrap();
        let resolver = PathResolver::new();
        let writer = DocWriter::new(&report, &index, &resolver, &PlainMarkup);
        assert_eq!(
            writer.code(&report.segments()[0].code).unwrap(),
            "static int * <PT>get(const struct <PT>list * l, int i);"
        );
    }

    #[test]
    fn test_brief_stops_at_paragraph() {
        let report = report_from("/** First part\n\n Second. */\nint x;\n").unwrap();
        let index = CrossIndex::new(&report).unwrap();
        let resolver = PathResolver::new();
        let writer = DocWriter::new(&report, &index, &resolver, &PlainMarkup);
        assert_eq!(writer.brief(&report.segments()[0].doc).unwrap(), "First part");
    }
}
