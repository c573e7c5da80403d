//! Property-based tests for the scanner, sorter, classifier and demangler
//!
//! These generate synthetic inputs and check the invariants every stage
//! promises regardless of content:
//! 1. Well-formed generic names demangle to their bracketed form
//! 2. Whitespace collapsing is idempotent
//! 3. A successful scan ends at brace depth zero
//! 4. Classification depends only on the mark string
//! 5. Name indices always point into the segment's code

use cdoc_core::generic::{demangle, display_name};
use cdoc_core::report::collapse_whitespace;
use cdoc_core::scanner::{scan, ScanContext, Span, StartMode, Token, TokenSink};
use cdoc_core::semantic::classify_marks;
use cdoc_core::source::{SourceId, SourceMap};
use cdoc_core::symbol::Mark;
use cdoc_core::testutil::{report_from, scan_code};
use cdoc_core::{Result, Symbol};
use proptest::prelude::*;

// -- Strategies --

/// A generic prefix segment such as `List`
fn prefix_strategy() -> impl Strategy<Value = String> {
    prop::string::string_regex("[A-Z][A-Za-z]{0,5}").unwrap()
}

/// A C identifier that scans as a plain identifier
fn identifier_strategy() -> impl Strategy<Value = String> {
    prop::string::string_regex("[a-z][a-z0-9]{0,6}")
        .unwrap()
        .prop_filter("not a keyword", |s| !is_keyword(s))
}

fn is_keyword(s: &str) -> bool {
    matches!(s, "struct" | "union" | "enum" | "typedef" | "static" | "void")
}

fn mark_strategy() -> impl Strategy<Value = Mark> {
    prop::sample::select(vec![
        Mark::Operator,
        Mark::Comma,
        Mark::Semicolon,
        Mark::LBrace,
        Mark::RBrace,
        Mark::LParen,
        Mark::RParen,
        Mark::LBrack,
        Mark::RBrack,
        Mark::Constant,
        Mark::Id,
        Mark::Macro,
        Mark::Generic1,
        Mark::Generic2,
        Mark::Generic3,
        Mark::Tag,
        Mark::Typedef,
        Mark::Static,
        Mark::Void,
        Mark::Ellipsis,
        Mark::Assign,
    ])
}

fn whitespace_token(symbol: Symbol) -> Token {
    Token::new(symbol, Span::new(0, 0), SourceId(0), 1)
}

/// A run of documentation words, blanks and line breaks
fn doc_tokens_strategy() -> impl Strategy<Value = Vec<Token>> {
    prop::collection::vec(
        prop::sample::select(vec![Symbol::Word, Symbol::Space, Symbol::Newline]),
        0..40,
    )
    .prop_map(|symbols| symbols.into_iter().map(whitespace_token).collect())
}

/// Code built from braces, identifiers and statement ends
fn braces_strategy() -> impl Strategy<Value = String> {
    prop::collection::vec(
        prop::sample::select(vec!["{", "}", "x", ";", " ", "\n", "(", ")"]),
        0..40,
    )
    .prop_map(|parts| parts.concat())
}

/// Declarations assembled from plausible C fragments
fn declaration_strategy() -> impl Strategy<Value = String> {
    prop::collection::vec(
        prop::sample::select(vec![
            "int", "char", "*", "x", "y", "(", ")", ",", "struct", "s", "[", "]", "=", "1",
            "static", "void", "typedef", "A_(", "...",
        ]),
        1..14,
    )
    .prop_map(|parts| format!("/** Doc. */\n{};\n", parts.join(" ")))
}

/// Remembers the brace depth after the last token
#[derive(Default)]
struct DepthSink {
    depth: Option<i32>,
}

impl TokenSink for DepthSink {
    fn accept(&mut self, context: ScanContext) -> Result<()> {
        self.depth = Some(context.indent_level);
        Ok(())
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(256))]

    #[test]
    fn generic_names_round_trip(
        pairs in prop::collection::vec((prefix_strategy(), identifier_strategy()), 1..=3)
    ) {
        let prefix: String = pairs.iter().map(|(p, _)| format!("{p}_")).collect();
        let args: Vec<&str> = pairs.iter().map(|(_, a)| a.as_str()).collect();
        let source = format!("{prefix}({})", args.join(", "));

        let mut sources = SourceMap::new();
        let id = sources.add("gen.c", None, source.clone()).unwrap();
        let mut tokens: Vec<Token> = Vec::new();
        scan(id, sources.get(id), StartMode::Code, &mut tokens).unwrap();

        let demangled = demangle(&tokens, 0, &sources).unwrap();
        let expected: String = pairs.iter().map(|(p, a)| format!("<{p}>{a}")).collect();
        prop_assert_eq!(&demangled.text, &expected);
        prop_assert_eq!(display_name(&prefix, &args), expected);
        prop_assert_eq!(demangled.consumed, tokens.len());
    }

    #[test]
    fn collapse_is_idempotent(tokens in doc_tokens_strategy()) {
        let once = collapse_whitespace(&tokens);
        let twice = collapse_whitespace(&once);
        prop_assert_eq!(&once, &twice);
        prop_assert!(once.first().map_or(true, |t| t.symbol == Symbol::Word));
        prop_assert!(once.last().map_or(true, |t| t.symbol == Symbol::Word));
    }

    #[test]
    fn successful_scans_end_balanced(source in braces_strategy()) {
        let mut sources = SourceMap::new();
        let id = sources.add("braces.c", None, source).unwrap();
        let mut sink = DepthSink::default();
        if scan(id, sources.get(id), StartMode::Code, &mut sink).is_ok() {
            prop_assert!(sink.depth.map_or(true, |d| d == 0));
        }
    }

    #[test]
    fn classifier_is_deterministic(marks in prop::collection::vec(mark_strategy(), 0..24)) {
        prop_assert_eq!(classify_marks(&marks), classify_marks(&marks));
    }

    #[test]
    fn name_indices_are_in_range(source in declaration_strategy()) {
        if let Ok(report) = report_from(&source) {
            for segment in report.segments() {
                prop_assert!(segment.code_params.iter().all(|&i| i < segment.code.len()));
            }
            prop_assert!(report.check_params().is_ok());
        }
    }

    #[test]
    fn scanner_never_panics_on_code(source in "[ -~\n]{0,64}") {
        let _ = scan_code(&source);
    }
}
