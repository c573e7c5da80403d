//! HTML documentation generator

use std::borrow::Cow;
use std::fmt::{self, Write};

use super::crosslink::CrossIndex;
use super::writer::{Block, DocWriter, Inline, Markup};
use super::{entries, title, Entry, RenderOptions, DETAIL_ATTRIBUTES, PREAMBLE_ATTRIBUTES};
use crate::error::Result;
use crate::report::{Report, Segment};
use crate::semantic::Division;
use crate::symbol::Symbol;

/// HTML spelling of documentation
#[derive(Debug, Clone, Copy, Default)]
pub(crate) struct HtmlMarkup;

impl Markup for HtmlMarkup {
    fn escape<'a>(&self, text: &'a str, _code: bool) -> Cow<'a, str> {
        escape_html(text)
    }

    fn open_block(&self, out: &mut String, block: Block) -> fmt::Result {
        match block {
            Block::Paragraph => out.write_str("<p>"),
            Block::List => out.write_str("<ul>\n"),
            Block::Preformatted => out.write_str("<pre>"),
        }
    }

    fn close_block(&self, out: &mut String, block: Block) -> fmt::Result {
        match block {
            Block::Paragraph => out.write_str("</p>\n"),
            Block::List => out.write_str("</ul>\n"),
            Block::Preformatted => out.write_str("</pre>\n"),
        }
    }

    fn open_item(&self, out: &mut String) -> fmt::Result {
        out.write_str("<li>")
    }

    fn close_item(&self, out: &mut String) -> fmt::Result {
        out.write_str("</li>\n")
    }

    fn open_inline(&self, out: &mut String, inline: Inline) -> fmt::Result {
        match inline {
            Inline::Emphasis => out.write_str("<em>"),
            Inline::Code => out.write_str("<code>"),
        }
    }

    fn close_inline(&self, out: &mut String, inline: Inline) -> fmt::Result {
        match inline {
            Inline::Emphasis => out.write_str("</em>"),
            Inline::Code => out.write_str("</code>"),
        }
    }

    fn preformatted(&self, out: &mut String, line: &str) -> fmt::Result {
        writeln!(out, "{}", escape_html(line))
    }

    fn link(&self, out: &mut String, text: &str, href: &str) -> fmt::Result {
        write!(out, "<a href=\"{}\">{text}</a>", escape_html(href))
    }

    fn image(&self, out: &mut String, alt: &str, src: &str) -> fmt::Result {
        write!(out, "<img src=\"{}\" alt=\"{alt}\">", escape_html(src))
    }

    fn symbol(&self, symbol: Symbol) -> &'static str {
        match symbol {
            Symbol::Nbsp => "&nbsp;",
            Symbol::NbThinsp => "&#8239;",
            Symbol::MathCalO => "&#119978;",
            Symbol::MathTheta => "&Theta;",
            Symbol::MathOmega => "&Omega;",
            Symbol::MathTimes => "&times;",
            Symbol::MathCdot => "&middot;",
            _ => "",
        }
    }
}

/// Generates one HTML page from a report
pub struct HtmlGenerator;

impl HtmlGenerator {
    /// Generate HTML documentation for a report
    ///
    /// # Errors
    /// Returns an error if a generic name cannot be demangled or the page
    /// cannot be formatted.
    pub fn generate(report: &Report, options: &RenderOptions) -> Result<String> {
        let index = CrossIndex::new(report)?;
        let writer = DocWriter::new(report, &index, &options.resolver, &HtmlMarkup);
        let title = title(report, options, &writer)?;
        let mut output = String::new();

        // HTML header
        writeln!(output, "<!DOCTYPE html>")?;
        writeln!(output, "<html lang=\"en\">")?;
        writeln!(output, "<head>")?;
        writeln!(output, "  <meta charset=\"UTF-8\">")?;
        writeln!(
            output,
            "  <meta name=\"viewport\" content=\"width=device-width, initial-scale=1.0\">"
        )?;
        writeln!(output, "  <title>{}</title>", strip_tags(&title))?;
        Self::write_styles(&mut output)?;
        writeln!(output, "</head>")?;
        writeln!(output, "<body>")?;

        let divisions = Division::ALL
            .iter()
            .filter(|&&d| d != Division::Preamble)
            .map(|&d| entries(report, d).map(|e| (d, e)))
            .collect::<Result<Vec<_>>>()?;

        // Navigation sidebar
        writeln!(output, "<nav class=\"sidebar\">")?;
        writeln!(output, "  <div class=\"sidebar-header\">")?;
        writeln!(output, "    <h2>{title}</h2>")?;
        writeln!(output, "  </div>")?;
        Self::write_nav(&mut output, &writer, &divisions)?;
        writeln!(output, "</nav>")?;

        writeln!(output, "<main class=\"content\">")?;
        writeln!(output, "<header>")?;
        writeln!(output, "  <h1>{title}</h1>")?;
        let preamble: Vec<&Segment> = report
            .segments()
            .iter()
            .filter(|s| s.division == Division::Preamble)
            .collect();
        for attribute in preamble
            .iter()
            .flat_map(|s| s.attributes_of(Symbol::AttSubtitle))
        {
            writeln!(
                output,
                "  <p class=\"subtitle\">{}</p>",
                writer.inline(&attribute.contents)?
            )?;
        }
        writeln!(output, "</header>")?;

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
            writeln!(
                output,
                "<section id=\"{}:detail\">",
                division.anchor_prefix()
            )?;
            writeln!(output, "  <h2>{} detail</h2>", division.heading())?;
            for item in items {
                Self::write_item(&mut output, &writer, *division, item)?;
            }
            writeln!(output, "</section>")?;
        }

        writeln!(output, "</main>")?;

        // Footer
        writeln!(output, "<footer>")?;
        writeln!(
            output,
            "  <p>Generated by cdoc {}</p>",
            crate::VERSION
        )?;
        writeln!(output, "</footer>")?;
        writeln!(output, "</body>")?;
        writeln!(output, "</html>")?;

        Ok(output)
    }

    fn write_styles(output: &mut String) -> fmt::Result {
        writeln!(output, "<style>")?;
        writeln!(
            output,
            r#"
:root {{
  --bg-color: #fdfdfd;
  --text-color: #222;
  --accent-color: #5b4bc4;
  --code-bg: #f1f1f6;
  --sidebar-bg: #f6f6fa;
  --border-color: #ddd;
}}

* {{
  box-sizing: border-box;
}}

body {{
  font-family: -apple-system, BlinkMacSystemFont, 'Segoe UI', Roboto, Oxygen, Ubuntu, sans-serif;
  background-color: var(--bg-color);
  color: var(--text-color);
  line-height: 1.6;
  margin: 0;
  display: flex;
}}

.sidebar {{
  width: 260px;
  background-color: var(--sidebar-bg);
  height: 100vh;
  position: fixed;
  overflow-y: auto;
  border-right: 1px solid var(--border-color);
  padding: 0 1rem;
}}

.sidebar h3 {{
  font-size: 0.875rem;
  text-transform: uppercase;
}}

.sidebar ul {{
  list-style: none;
  padding-left: 0.5rem;
}}

.content {{
  margin-left: 260px;
  padding: 2rem 3rem;
  max-width: 960px;
}}

a {{
  color: var(--accent-color);
}}

code, pre {{
  font-family: 'SF Mono', Consolas, 'Liberation Mono', Menlo, monospace;
  background-color: var(--code-bg);
}}

pre {{
  padding: 0.75rem;
  overflow-x: auto;
}}

table {{
  border-collapse: collapse;
  width: 100%;
}}

td, th {{
  border-bottom: 1px solid var(--border-color);
  padding: 0.25rem 0.5rem;
  text-align: left;
  vertical-align: top;
}}

.item {{
  border-top: 1px solid var(--border-color);
  padding-top: 1rem;
}}

dt {{
  font-weight: bold;
}}

.subtitle {{
  font-style: italic;
}}
"#
        )?;
        writeln!(output, "</style>")
    }

    fn write_nav(
        output: &mut String,
        writer: &DocWriter<'_, HtmlMarkup>,
        divisions: &[(Division, Vec<Entry<'_>>)],
    ) -> Result<()> {
        writeln!(output, "  <nav>")?;
        for (division, items) in divisions {
            if items.is_empty() {
                continue;
            }
            writeln!(
                output,
                "    <h3><a href=\"#{}:summary\">{}</a></h3>",
                division.anchor_prefix(),
                division.heading()
            )?;
            writeln!(output, "    <ul>")?;
            for item in items {
                writeln!(
                    output,
                    "      <li><a href=\"#{}\">{}</a></li>",
                    item.anchor,
                    Self::item_name(writer, item)?
                )?;
            }
            writeln!(output, "    </ul>")?;
        }
        writeln!(output, "  </nav>")?;
        Ok(())
    }

    fn write_preamble(
        output: &mut String,
        writer: &DocWriter<'_, HtmlMarkup>,
        preamble: &[&Segment],
    ) -> Result<()> {
        writeln!(output, "<section id=\"preamble\">")?;
        for attribute in preamble
            .iter()
            .flat_map(|s| s.attributes_of(Symbol::AttAbstract))
        {
            writeln!(
                output,
                "  <blockquote class=\"abstract\">{}</blockquote>",
                writer.blocks(&attribute.contents)?
            )?;
        }
        for segment in preamble {
            output.push_str(&writer.blocks(&segment.doc)?);
        }

        let mut list = String::new();
        for tag in PREAMBLE_ATTRIBUTES {
            for segment in preamble {
                Self::write_attributes(&mut list, writer, segment, tag)?;
            }
        }
        if !list.is_empty() {
            writeln!(output, "  <dl>")?;
            output.push_str(&list);
            writeln!(output, "  </dl>")?;
        }
        writeln!(output, "</section>")?;
        Ok(())
    }

    fn write_summary(
        output: &mut String,
        writer: &DocWriter<'_, HtmlMarkup>,
        division: Division,
        items: &[Entry<'_>],
    ) -> Result<()> {
        writeln!(
            output,
            "<section id=\"{}:summary\">",
            division.anchor_prefix()
        )?;
        writeln!(output, "  <h2>{} summary</h2>", division.heading())?;
        writeln!(output, "  <table>")?;
        writeln!(output, "    <tr><th>Name</th><th>Summary</th></tr>")?;
        for item in items {
            writeln!(
                output,
                "    <tr><td><a href=\"#{}\">{}</a></td><td>{}</td></tr>",
                item.anchor,
                Self::item_name(writer, item)?,
                writer.brief(&item.segment.doc)?
            )?;
        }
        writeln!(output, "  </table>")?;
        writeln!(output, "</section>")?;
        Ok(())
    }

    fn write_item(
        output: &mut String,
        writer: &DocWriter<'_, HtmlMarkup>,
        division: Division,
        item: &Entry<'_>,
    ) -> Result<()> {
        let segment = item.segment;
        writeln!(output, "  <div class=\"item\" id=\"{}\">", item.anchor)?;
        writeln!(
            output,
            "    <h3><code>{}</code> <small>{}</small></h3>",
            Self::item_name(writer, item)?,
            division.anchor_prefix()
        )?;

        // Signature
        if !segment.code.is_empty() {
            writeln!(
                output,
                "    <pre class=\"signature\"><code>{}</code></pre>",
                writer.code(&segment.code)?
            )?;
        }

        // Documentation
        if !segment.doc.is_empty() {
            writeln!(output, "    <div class=\"description\">")?;
            output.push_str(&writer.blocks(&segment.doc)?);
            writeln!(output, "    </div>")?;
        }

        let mut list = String::new();
        for tag in DETAIL_ATTRIBUTES {
            Self::write_attributes(&mut list, writer, segment, tag)?;
        }
        if !list.is_empty() {
            writeln!(output, "    <dl>")?;
            output.push_str(&list);
            writeln!(output, "    </dl>")?;
        }

        writeln!(output, "  </div>")?;
        Ok(())
    }

    /// Every attribute of one kind as `<dt>`/`<dd>` pairs; named lists such
    /// as `@param[a, b]` lead their entry
    fn write_attributes(
        output: &mut String,
        writer: &DocWriter<'_, HtmlMarkup>,
        segment: &Segment,
        tag: Symbol,
    ) -> Result<()> {
        for attribute in segment.attributes_of(tag) {
            writeln!(output, "      <dt>{}</dt>", tag.heading())?;
            let names = attribute
                .header
                .iter()
                .map(|t| format!("<code>{}</code>", escape_html(writer.report().text(t))))
                .collect::<Vec<_>>()
                .join(", ");
            let text = writer.inline(&attribute.contents)?;
            let body = match (names.is_empty(), text.is_empty()) {
                (true, _) => text,
                (false, true) => names,
                (false, false) => format!("{names}: {text}"),
            };
            writeln!(output, "      <dd>{body}</dd>")?;
        }
        Ok(())
    }

    fn item_name(writer: &DocWriter<'_, HtmlMarkup>, item: &Entry<'_>) -> Result<String> {
        Ok(match &item.name {
            Some(name) => escape_html(name).into_owned(),
            None => writer.brief(&item.segment.doc)?,
        })
    }
}

pub(crate) fn escape_html(s: &str) -> Cow<'_, str> {
    if !s.contains(['&', '<', '>', '"']) {
        return Cow::Borrowed(s);
    }
    Cow::Owned(
        s.replace('&', "&amp;")
            .replace('<', "&lt;")
            .replace('>', "&gt;")
            .replace('"', "&quot;"),
    )
}

/// Text content of rendered inline HTML, for the `<title>` element
fn strip_tags(html: &str) -> String {
    let mut out = String::with_capacity(html.len());
    let mut in_tag = false;
    for c in html.chars() {
        match c {
            '<' => in_tag = true,
            '>' => in_tag = false,
            c if !in_tag => out.push(c),
            _ => {}
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testutil::report_from;

    fn html(source: &str) -> String {
        let report = report_from(source).unwrap();
        HtmlGenerator::generate(&report, &RenderOptions::new()).unwrap()
    }

    #[test]
    fn test_generate_html() {
        let page = html("/** A simple greeting function. */\nvoid greet(const char *name);\n");

        assert!(page.contains("<!DOCTYPE html>"));
        assert!(page.contains("<title>test.c</title>"));
        assert!(page.contains("<section id=\"fn:summary\">"));
        assert!(page.contains("<div class=\"item\" id=\"fn:greet\">"));
        assert!(page.contains("<p>A simple greeting function.</p>"));
        assert!(page.contains("void greet(const char * name);"));
    }

    #[test]
    fn test_preamble_and_subtitle() {
        let page = html(
            "/** Lists.\n @subtitle Linked lists\n @author Ann <https://example.org> */\n\n/** Push. */\nvoid push(void);\n",
        );
        assert!(page.contains("<p class=\"subtitle\">Linked lists</p>"));
        assert!(page.contains("<section id=\"preamble\">"));
        assert!(page.contains("<p>Lists.</p>"));
        assert!(page.contains("<dt>Author</dt>"));
        assert!(page.contains("<a href=\"https://example.org\">https://example.org</a>"));
    }

    #[test]
    fn test_params_and_references() {
        let page = html(
            "/** Adds <fn:sub> and <fn:nothing>.\n @param[a, b] Operands.\n @return Sum. */\nint add(int a, int b);\n/** Subtracts. */\nint sub(int a, int b);\n",
        );
        assert!(page.contains("<dt>Parameter</dt>"));
        assert!(page.contains("<dd><code>a</code>, <code>b</code>: Operands.</dd>"));
        assert!(page.contains("<dt>Return</dt>"));
        assert!(page.contains("<a href=\"#fn:sub\"><code>sub</code></a>"));
        assert!(page.contains("and <code>nothing</code>."));
    }

    #[test]
    fn test_escapes_markup() {
        let page = html("/** Compares a < b & c. */\nint cmp(int a, int b);\n");
        assert!(page.contains("Compares a &lt; b &amp; c."));
    }

    #[test]
    fn test_citation_links_to_search() {
        let page = html("/** See <Knuth 1968>. */\nint x;\n");
        assert!(page.contains("<a href=\"https://scholar.google.com/scholar?q=Knuth%201968\">Knuth 1968</a>"));
    }

    #[test]
    fn test_strip_tags() {
        assert_eq!(strip_tags("<em>a</em> b"), "a b");
    }
}
