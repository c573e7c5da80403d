//! Markdown documentation generator

use std::borrow::Cow;
use std::fmt::{self, Write};

use super::crosslink::CrossIndex;
use super::writer::{unicode_symbol, Block, DocWriter, Inline, Markup};
use super::{entries, title, Entry, RenderOptions, DETAIL_ATTRIBUTES, PREAMBLE_ATTRIBUTES};
use crate::error::Result;
use crate::report::{Report, Segment};
use crate::semantic::Division;
use crate::symbol::Symbol;

/// Characters with a meaning in Markdown prose or tables
const SPECIAL: [char; 10] = ['\\', '`', '*', '_', '[', ']', '<', '>', '|', '#'];

/// Markdown spelling of documentation
#[derive(Debug, Clone, Copy, Default)]
pub(crate) struct MarkdownMarkup;

impl Markup for MarkdownMarkup {
    fn escape<'a>(&self, text: &'a str, code: bool) -> Cow<'a, str> {
        if code || !text.contains(SPECIAL) {
            return Cow::Borrowed(text);
        }
        let mut out = String::with_capacity(text.len() + 4);
        for c in text.chars() {
            if SPECIAL.contains(&c) {
                out.push('\\');
            }
            out.push(c);
        }
        Cow::Owned(out)
    }

    fn open_block(&self, out: &mut String, block: Block) -> fmt::Result {
        match block {
            Block::Preformatted => out.write_str("```\n"),
            Block::Paragraph | Block::List => Ok(()),
        }
    }

    fn close_block(&self, out: &mut String, block: Block) -> fmt::Result {
        match block {
            Block::Paragraph => out.write_str("\n\n"),
            Block::List => out.write_char('\n'),
            Block::Preformatted => out.write_str("```\n\n"),
        }
    }

    fn open_item(&self, out: &mut String) -> fmt::Result {
        out.write_str("- ")
    }

    fn close_item(&self, out: &mut String) -> fmt::Result {
        out.write_char('\n')
    }

    fn open_inline(&self, out: &mut String, inline: Inline) -> fmt::Result {
        match inline {
            Inline::Emphasis => out.write_char('_'),
            Inline::Code => out.write_char('`'),
        }
    }

    fn close_inline(&self, out: &mut String, inline: Inline) -> fmt::Result {
        self.open_inline(out, inline)
    }

    fn preformatted(&self, out: &mut String, line: &str) -> fmt::Result {
        writeln!(out, "{line}")
    }

    fn link(&self, out: &mut String, text: &str, href: &str) -> fmt::Result {
        write!(out, "[{text}]({href})")
    }

    fn image(&self, out: &mut String, alt: &str, src: &str) -> fmt::Result {
        write!(out, "![{alt}]({src})")
    }

    fn symbol(&self, symbol: Symbol) -> &'static str {
        match symbol {
            Symbol::Nbsp => "&nbsp;",
            Symbol::NbThinsp => "&#8239;",
            other => unicode_symbol(other),
        }
    }
}

/// Generates one Markdown file from a report
pub struct MarkdownGenerator;

impl MarkdownGenerator {
    /// Generate Markdown documentation for a report
    ///
    /// # Errors
    /// Returns an error if a generic name cannot be demangled or the text
    /// cannot be formatted.
    pub fn generate(report: &Report, options: &RenderOptions) -> Result<String> {
        let index = CrossIndex::new(report)?;
        let writer = DocWriter::new(report, &index, &options.resolver, &MarkdownMarkup);
        let mut output = String::new();

        // Title
        writeln!(output, "# {}", title(report, options, &writer)?)?;
        writeln!(output)?;

        let preamble: Vec<&Segment> = report
            .segments()
            .iter()
            .filter(|s| s.division == Division::Preamble)
            .collect();
        for attribute in preamble
            .iter()
            .flat_map(|s| s.attributes_of(Symbol::AttSubtitle))
        {
            writeln!(output, "## {}", writer.inline(&attribute.contents)?)?;
            writeln!(output)?;
        }

        let divisions = Division::ALL
            .iter()
            .filter(|&&d| d != Division::Preamble)
            .map(|&d| entries(report, d).map(|e| (d, e)))
            .collect::<Result<Vec<_>>>()?;

        // Table of contents
        if divisions.iter().any(|(_, items)| !items.is_empty()) {
            Self::write_toc(&mut output, &divisions)?;
        }

        if !preamble.is_empty() {
            Self::write_preamble(&mut output, &writer, &preamble)?;
        }

        for (division, items) in &divisions {
            if items.is_empty() {
                continue;
            }
            Self::write_summary(&mut output, &writer, *division, items)?;
        }
        for (division, items) in &divisions {
            if items.is_empty() {
                continue;
            }
            writeln!(output, "<a id=\"{}:detail\"></a>", division.anchor_prefix())?;
            writeln!(output)?;
            writeln!(output, "## {} detail", division.heading())?;
            writeln!(output)?;
            for item in items {
                Self::write_item(&mut output, &writer, item, 3)?;
            }
        }

        Ok(output)
    }

    fn write_toc(output: &mut String, divisions: &[(Division, Vec<Entry<'_>>)]) -> fmt::Result {
        writeln!(output, "## Contents")?;
        writeln!(output)?;
        if !divisions.is_empty() {
            writeln!(output, "- [Preamble](#preamble)")?;
        }
        for (division, items) in divisions {
            if items.is_empty() {
                continue;
            }
            let prefix = division.anchor_prefix();
            writeln!(output, "- [{} summary](#{prefix}:summary)", division.heading())?;
            writeln!(output, "- [{} detail](#{prefix}:detail)", division.heading())?;
        }
        writeln!(output)
    }

    fn write_preamble(
        output: &mut String,
        writer: &DocWriter<'_, MarkdownMarkup>,
        preamble: &[&Segment],
    ) -> Result<()> {
        writeln!(output, "<a id=\"preamble\"></a>")?;
        writeln!(output)?;
        writeln!(output, "## Preamble")?;
        writeln!(output)?;
        for attribute in preamble
            .iter()
            .flat_map(|s| s.attributes_of(Symbol::AttAbstract))
        {
            for line in writer.blocks(&attribute.contents)?.lines() {
                writeln!(output, "> {line}")?;
            }
            writeln!(output)?;
        }
        for segment in preamble {
            output.push_str(&writer.blocks(&segment.doc)?);
        }
        for tag in PREAMBLE_ATTRIBUTES {
            for segment in preamble {
                Self::write_attributes(output, writer, segment, tag)?;
            }
        }
        Ok(())
    }

    fn write_summary(
        output: &mut String,
        writer: &DocWriter<'_, MarkdownMarkup>,
        division: Division,
        items: &[Entry<'_>],
    ) -> Result<()> {
        writeln!(output, "<a id=\"{}:summary\"></a>", division.anchor_prefix())?;
        writeln!(output)?;
        writeln!(output, "## {} summary", division.heading())?;
        writeln!(output)?;
        writeln!(output, "| Name | Summary |")?;
        writeln!(output, "|------|---------|")?;
        for item in items {
            writeln!(
                output,
                "| [{}](#{}) | {} |",
                Self::item_name(writer, item)?,
                item.anchor,
                writer.brief(&item.segment.doc)?
            )?;
        }
        writeln!(output)?;
        Ok(())
    }

    fn write_item(
        output: &mut String,
        writer: &DocWriter<'_, MarkdownMarkup>,
        item: &Entry<'_>,
        heading_level: usize,
    ) -> Result<()> {
        let segment = item.segment;
        let heading = "#".repeat(heading_level);

        writeln!(output, "<a id=\"{}\"></a>", item.anchor)?;
        writeln!(output)?;
        writeln!(output, "{heading} {}", Self::item_name(writer, item)?)?;
        writeln!(output)?;

        // Signature
        if !segment.code.is_empty() {
            writeln!(output, "```c")?;
            writeln!(output, "{}", writer.code(&segment.code)?)?;
            writeln!(output, "```")?;
            writeln!(output)?;
        }

        // Documentation
        output.push_str(&writer.blocks(&segment.doc)?);

        for tag in DETAIL_ATTRIBUTES {
            Self::write_attributes(output, writer, segment, tag)?;
        }

        writeln!(output, "---")?;
        writeln!(output)?;
        Ok(())
    }

    fn write_attributes(
        output: &mut String,
        writer: &DocWriter<'_, MarkdownMarkup>,
        segment: &Segment,
        tag: Symbol,
    ) -> Result<()> {
        let attributes: Vec<_> = segment.attributes_of(tag).collect();
        if attributes.is_empty() {
            return Ok(());
        }
        writeln!(output, "**{}:**", tag.heading())?;
        writeln!(output)?;
        for attribute in attributes {
            let names = attribute
                .header
                .iter()
                .map(|t| format!("`{}`", writer.report().text(t)))
                .collect::<Vec<_>>()
                .join(", ");
            let text = writer.inline(&attribute.contents)?;
            match (names.is_empty(), text.is_empty()) {
                (true, _) => writeln!(output, "- {text}")?,
                (false, true) => writeln!(output, "- {names}")?,
                (false, false) => writeln!(output, "- {names}: {text}")?,
            }
        }
        writeln!(output)?;
        Ok(())
    }

    fn item_name(writer: &DocWriter<'_, MarkdownMarkup>, item: &Entry<'_>) -> Result<String> {
        Ok(match &item.name {
            Some(name) => format!("`{name}`"),
            None => writer.brief(&item.segment.doc)?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testutil::report_from;

    fn markdown(source: &str) -> String {
        let report = report_from(source).unwrap();
        MarkdownGenerator::generate(&report, &RenderOptions::new()).unwrap()
    }

    #[test]
    fn test_generate_markdown() {
        let page = markdown(
            "/** Greet a user by name.\n @param[name] The name of the user.\n @return A greeting. */\nchar *greet(const char *name);\n",
        );

        assert!(page.starts_with("# test.c\n"));
        assert!(page.contains("## Functions summary"));
        assert!(page.contains("| [`greet`](#fn:greet) | Greet a user by name. |"));
        assert!(page.contains("<a id=\"fn:greet\"></a>"));
        assert!(page.contains("```c\nchar * greet(const char * name);\n```"));
        assert!(page.contains("**Parameter:**\n\n- `name`: The name of the user.\n"));
        assert!(page.contains("**Return:**\n\n- A greeting.\n"));
    }

    #[test]
    fn test_markdown_escapes_prose_only() {
        let page = markdown("/** Uses `a_b` and c_d * e. */\nint x;\n");
        assert!(page.contains("Uses `a_b` and c\\_d \\* e."));
    }

    #[test]
    fn test_links_and_images() {
        let page = markdown("/** See [the site](https://example.org) and ![a diagram](fig.png). */\nint x;\n");
        assert!(page.contains("[the site](https://example.org)"));
        assert!(page.contains("![a diagram](fig.png)"));
    }

    #[test]
    fn test_preformatted_is_fenced() {
        let page = markdown("/** Example:\n\n \\\" x = 1;\n */\nint x;\n");
        assert!(page.contains("```\n x = 1;\n```\n"));
    }
}
