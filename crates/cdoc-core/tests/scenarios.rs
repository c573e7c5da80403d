//! End-to-end tests: source text in, segments and rendered pages out

use std::fs;

use cdoc_core::generic::demangle;
use cdoc_core::scanner::ScanErrorKind;
use cdoc_core::testutil::{report_from, scan_code, segment_texts};
use cdoc_core::{
    Division, Error, Format, HtmlGenerator, MarkdownGenerator, PathResolver, RenderOptions, Report,
    Symbol,
};

#[test]
fn test_documented_function() {
    let report = report_from("/** Says hi. */\nvoid foo(void) {}\n").unwrap();
    let segments = report.segments();

    assert_eq!(segments.len(), 1);
    let segment = &segments[0];
    assert_eq!(segment.division, Division::Function);
    assert_eq!(segment_texts(&report, &segment.doc), "Says hi.");
    assert_eq!(report.text(&segment.code[segment.code_params[0]]), "foo");
}

#[test]
fn test_doc_followed_by_doc_binds_to_file() {
    let report = report_from("/** A. */\n/** B. */\nint x;\n").unwrap();
    let segments = report.segments();

    assert_eq!(segments.len(), 2);
    assert_eq!(segments[0].division, Division::Preamble);
    assert_eq!(segment_texts(&report, &segments[0].doc), "A.");
    assert!(segments[0].code.is_empty());

    assert_eq!(segments[1].division, Division::Data);
    assert_eq!(segment_texts(&report, &segments[1].doc), "B.");
    assert_eq!(report.text(segments[1].title_token().unwrap()), "x");
}

#[test]
fn test_undocumented_typedef() {
    let report = report_from("typedef int (*Foo_)(int);").unwrap();
    let segments = report.segments();

    assert_eq!(segments.len(), 1);
    assert!(segments[0].doc.is_empty());
    assert_eq!(segments[0].division, Division::Typedef);
    assert_eq!(report.text(segments[0].title_token().unwrap()), "Foo_");
}

#[test]
fn test_two_generic_names() {
    let source = "int A_B_(Create, Thing)(void);";
    let code = scan_code(source).unwrap();
    let at = code
        .iter()
        .position(|t| t.symbol == Symbol::IdTwoGenerics)
        .unwrap();
    assert_eq!(&source[code[at].span.as_range()], "A_B_");

    let report = report_from(&format!("/** Creates. */\n{source}\n")).unwrap();
    let segment = &report.segments()[0];
    let demangled = demangle(&segment.code, segment.code_params[0], report.sources()).unwrap();
    assert_eq!(demangled.text, "<A>Create<B>Thing");
    assert_eq!(demangled.consumed, 6);
    assert_eq!(
        segment.title(report.sources()).unwrap().as_deref(),
        Some("<A>Create<B>Thing")
    );
}

#[test]
fn test_distant_code_is_detached() {
    let report = report_from("/** Floating. */\n\n\n\nint x;\n").unwrap();
    let segments = report.segments();

    assert_eq!(segments.len(), 2);
    assert_eq!(segments[0].division, Division::Preamble);
    assert!(segments[0].code.is_empty());
    assert!(segments[1].doc.is_empty());
    assert_eq!(segments[1].division, Division::Data);
}

#[test]
fn test_unterminated_doc_is_fatal() {
    let mut report = Report::new();
    let err = report.scan_str("bad.c", "/** unterminated").unwrap_err();

    match err {
        Error::Scan(scan) => {
            assert_eq!(scan.kind, ScanErrorKind::UnterminatedDoc);
            assert_eq!(scan.label, "bad.c");
            assert_eq!(scan.line, 1);
        }
        other => panic!("expected a scan error, got {other}"),
    }
    assert!(report.segments().is_empty());
}

#[test]
fn test_every_name_index_is_in_range() {
    let report = report_from(
        "/** F. */\nint f(int a, char **b, void (*cb)(int));\n/** T. */\ntypedef struct { int x; } point;\n/** D. */\nstatic const int table[4] = { 1, 2, 3, 4 };\n",
    )
    .unwrap();
    report.check_params().unwrap();
    for segment in report.segments() {
        assert!(segment.code_params.iter().all(|&i| i < segment.code.len()));
    }
}

#[test]
fn test_include_from_disk() {
    let dir = tempfile::tempdir().unwrap();
    let header = dir.path().join("list.h");
    let main = dir.path().join("main.c");
    fs::write(&header, "/** A list node. */\nstruct node { int value; };\n").unwrap();
    fs::write(
        &main,
        "/** Main file. */\n\n#include \"list.h\" /** @include */\n\n/** Counts nodes. */\nint count(struct node *n);\n",
    )
    .unwrap();

    let mut report = Report::new();
    report.scan_file(&main).unwrap();
    let divisions: Vec<Division> = report.segments().iter().map(|s| s.division).collect();
    assert_eq!(
        divisions,
        vec![Division::Preamble, Division::Tag, Division::Function]
    );
    assert_eq!(report.label(), Some("main.c"));
}

#[test]
fn test_missing_file_is_an_io_error() {
    let dir = tempfile::tempdir().unwrap();
    let mut report = Report::new();
    let err = report.scan_file(&dir.path().join("absent.h")).unwrap_err();
    assert!(matches!(err, Error::Io { .. }));
}

#[test]
fn test_render_end_to_end() {
    let source = "/** Singly-linked list.\n @subtitle Lists\n @license MIT */\n\n\
/** A node; see <fn:push>. */\nstruct node { int value; struct node *next; };\n\n\
/** Adds `n` to the front.\n @param[head, n] The list and the node.\n @return The new head. */\n\
struct node *push(struct node *head, struct node *n) { n->next = head; return n; }\n\n\
static int helper(void) { return 0; }\n";
    let mut report = Report::new();
    report.scan_str("list.h", source).unwrap();
    report.cull();
    report.check_params().unwrap();
    assert_eq!(report.segments().len(), 3);

    let options = RenderOptions::new().with_resolver(PathResolver::new());
    let html = HtmlGenerator::generate(&report, &options).unwrap();
    assert!(html.contains("<h1>list.h</h1>"));
    assert!(html.contains("<p class=\"subtitle\">Lists</p>"));
    assert!(html.contains("<dt>License</dt>"));
    assert!(html.contains("id=\"tag:node\""));
    assert!(html.contains("<a href=\"#fn:push\"><code>push</code></a>"));
    assert!(!html.contains("helper"));

    let markdown = MarkdownGenerator::generate(&report, &options).unwrap();
    assert!(markdown.starts_with("# list.h\n"));
    assert!(markdown.contains("## Tagged types summary"));
    assert!(markdown.contains("- `head`, `n`: The list and the node."));

    let json = Format::Json.generate(&report, &options).unwrap();
    let value: serde_json::Value = serde_json::from_str(&json).unwrap();
    assert_eq!(value["segments"].as_array().unwrap().len(), 3);
}

#[test]
fn test_configured_title() {
    let mut report = Report::new();
    report.scan_str("a.h", "/** A. */\nint a;\n").unwrap();
    let title = report.parse_doc("title", "My _fine_ library").unwrap();
    let html = HtmlGenerator::generate(&report, &RenderOptions::new().with_title(title)).unwrap();
    assert!(html.contains("<title>My fine library</title>"));
    assert!(html.contains("<h1>My <em>fine</em> library</h1>"));
}
