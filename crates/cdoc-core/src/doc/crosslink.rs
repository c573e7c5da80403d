//! Cross-linking for documentation
//!
//! Resolves `<fn:name>`-style references against the segments that survived
//! culling, and spells the anchors the generators attach to each segment.

use std::collections::HashSet;

use percent_encoding::{utf8_percent_encode, AsciiSet, CONTROLS};

use crate::error::Result;
use crate::report::Report;
use crate::semantic::Division;

/// Characters escaped in anchor fragments
const FRAGMENT: &AsciiSet = &CONTROLS
    .add(b' ')
    .add(b'"')
    .add(b'#')
    .add(b'%')
    .add(b'<')
    .add(b'>')
    .add(b'`');

/// The anchor of a named segment, as `division:name`
pub fn anchor(division: Division, name: &str) -> String {
    format!(
        "{}:{}",
        division.anchor_prefix(),
        utf8_percent_encode(name, FRAGMENT)
    )
}

/// Every named segment in a report, by division
#[derive(Debug, Default, Clone)]
pub struct CrossIndex {
    names: HashSet<(Division, String)>,
}

impl CrossIndex {
    /// Index the titles of every segment in `report`
    ///
    /// # Errors
    /// Returns an error if a generic title cannot be demangled.
    pub fn new(report: &Report) -> Result<Self> {
        let mut names = HashSet::new();
        for segment in report.segments() {
            if let Some(title) = segment.title(report.sources())? {
                names.insert((segment.division, title));
            }
        }
        Ok(Self { names })
    }

    pub fn contains(&self, division: Division, name: &str) -> bool {
        self.names.contains(&(division, name.to_string()))
    }

    /// Link target for a reference, if the name is documented
    pub fn href(&self, division: Division, name: &str) -> Option<String> {
        self.contains(division, name)
            .then(|| format!("#{}", anchor(division, name)))
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testutil::report_from;

    #[test]
    fn test_anchor_escapes_generic_names() {
        assert_eq!(anchor(Division::Function, "push"), "fn:push");
        assert_eq!(anchor(Division::Function, "<PT>push"), "fn:%3CPT%3Epush");
        assert_eq!(anchor(Division::Tag, "a b"), "tag:a%20b");
    }

    #[test]
    fn test_index_knows_documented_names() {
        let report = report_from(
            "/** A list. */\nstruct list { int x; };\n/** Push. */\nvoid push(struct list *l);\n",
        )
        .unwrap();
        let index = CrossIndex::new(&report).unwrap();
        assert_eq!(index.len(), 2);
        assert_eq!(index.href(Division::Function, "push").as_deref(), Some("#fn:push"));
        assert_eq!(index.href(Division::Tag, "list").as_deref(), Some("#tag:list"));
        assert!(index.href(Division::Function, "list").is_none());
        assert!(index.href(Division::Data, "pop").is_none());
    }

    #[test]
    fn test_generic_titles_are_demangled() {
        let report = report_from("/** Push. */\nvoid PT_(push)(struct PT_(list) *l);\n").unwrap();
        let index = CrossIndex::new(&report).unwrap();
        assert!(index.contains(Division::Function, "<PT>push"));
    }
}
