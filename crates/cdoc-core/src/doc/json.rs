//! JSON dump of a report, for tooling

use serde::Serialize;

use super::crosslink::CrossIndex;
use super::writer::{DocWriter, PlainMarkup};
use super::{entries, title, RenderOptions};
use crate::error::Result;
use crate::report::{Attribute, Report};
use crate::semantic::Division;
use crate::symbol::ATTRIBUTES;

#[derive(Debug, Serialize)]
struct DocumentView<'r> {
    title: String,
    generator: &'static str,
    segments: Vec<SegmentView<'r>>,
}

#[derive(Debug, Serialize)]
struct SegmentView<'r> {
    division: Division,
    name: Option<String>,
    anchor: String,
    file: &'r str,
    line: u32,
    doc: String,
    code: String,
    params: Vec<&'r str>,
    attributes: Vec<AttributeView<'r>>,
}

#[derive(Debug, Serialize)]
struct AttributeView<'r> {
    tag: &'static str,
    names: Vec<&'r str>,
    text: String,
}

/// Serialises segments with their text resolved
pub struct JsonGenerator;

impl JsonGenerator {
    /// Generate a pretty-printed JSON document for a report
    ///
    /// # Errors
    /// Returns an error if a generic name cannot be demangled or the
    /// document cannot be serialised.
    pub fn generate(report: &Report, options: &RenderOptions) -> Result<String> {
        let index = CrossIndex::new(report)?;
        let writer = DocWriter::new(report, &index, &options.resolver, &PlainMarkup);

        let mut segments = Vec::new();
        for division in Division::ALL {
            for entry in entries(report, division)? {
                let segment = entry.segment;
                let first = segment.code.first().or_else(|| segment.doc.first());
                let attributes = segment
                    .attributes
                    .iter()
                    .map(|a| Self::attribute(&writer, a))
                    .collect::<Result<Vec<_>>>()?;
                segments.push(SegmentView {
                    division,
                    name: entry.name,
                    anchor: entry.anchor,
                    file: first.map_or("", |t| report.sources().label(t.source)),
                    line: first.map_or(0, |t| t.line),
                    doc: writer.blocks(&segment.doc)?.trim_end().to_string(),
                    code: writer.code(&segment.code)?,
                    params: segment.params().map(|t| report.text(t)).collect(),
                    attributes,
                });
            }
        }

        let view = DocumentView {
            title: title(report, options, &writer)?,
            generator: concat!("cdoc ", env!("CARGO_PKG_VERSION")),
            segments,
        };
        Ok(serde_json::to_string_pretty(&view)?)
    }

    fn attribute<'r>(
        writer: &DocWriter<'r, PlainMarkup>,
        attribute: &Attribute,
    ) -> Result<AttributeView<'r>> {
        let tag = ATTRIBUTES
            .iter()
            .find(|(symbol, _)| *symbol == attribute.tag.symbol)
            .map_or("", |(_, keyword)| keyword);
        Ok(AttributeView {
            tag,
            names: attribute
                .header
                .iter()
                .map(|t| writer.report().text(t))
                .collect(),
            text: writer.inline(&attribute.contents)?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testutil::report_from;

    #[test]
    fn test_generate_json() {
        let report = report_from(
            "/** Adds.\n @param[a, b] Operands. */\nint add(int a, int b);\n",
        )
        .unwrap();
        let json = JsonGenerator::generate(&report, &RenderOptions::new()).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();

        assert_eq!(value["title"], "test.c");
        let segment = &value["segments"][0];
        assert_eq!(segment["division"], "function");
        assert_eq!(segment["name"], "add");
        assert_eq!(segment["anchor"], "fn:add");
        assert_eq!(segment["file"], "test.c");
        assert_eq!(segment["line"], 3);
        assert_eq!(segment["doc"], "Adds.");
        assert_eq!(segment["code"], "int add(int a, int b);");
        assert_eq!(segment["params"], serde_json::json!(["a", "b"]));
        assert_eq!(segment["attributes"][0]["tag"], "param");
        assert_eq!(segment["attributes"][0]["names"], serde_json::json!(["a", "b"]));
        assert_eq!(segment["attributes"][0]["text"], "Operands.");
    }
}
