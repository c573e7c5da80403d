//! Documentation states of the scanner

use std::rc::Rc;
use std::sync::OnceLock;

use regex::Regex;

use super::{ScanError, ScanErrorKind, ScanState, Scanner, StartMode, Token};
use crate::symbol::Symbol;

/// Named math symbols, written `\name`
const MATH_SYMBOLS: [(&str, Symbol); 5] = [
    ("O", Symbol::MathCalO),
    ("Theta", Symbol::MathTheta),
    ("Omega", Symbol::MathOmega),
    ("times", Symbol::MathTimes),
    ("cdot", Symbol::MathCdot),
];

fn reference_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"^(fn|tag|typedef|data):(\S+)$")
            .unwrap_or_else(|e| unreachable!("reference pattern: {e}"))
    })
}

/// Absolute URIs, rooted or dotted paths, and relative file names with an
/// extension
fn uri_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(
            r"^(?:[A-Za-z][A-Za-z0-9+.\-]*:[^\s<>]+|\.{0,2}/[^\s<>]*|[\w\-~%]+(?:[./][\w\-~%]+)*\.[A-Za-z][A-Za-z0-9]*(?:[?#][^\s<>]*)?)$",
        )
        .unwrap_or_else(|e| unreachable!("uri pattern: {e}"))
    })
}

/// Author text followed by a year, as in `<Knuth 1968>`
fn citation_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"^\p{L}[\p{L}\p{M}'’.&,\- ]*\s\d{4}[a-z]?$")
            .unwrap_or_else(|e| unreachable!("citation pattern: {e}"))
    })
}

fn is_blank(b: u8) -> bool {
    matches!(b, b' ' | b'\t' | b'\r' | b'\x0c' | b'\x0b')
}

impl Scanner {
    pub(super) fn lex_doc(&mut self) -> Result<Option<Token>, ScanError> {
        let text = Rc::clone(&self.text);
        let bytes = text.as_bytes();
        let start = self.cursor;
        let line = self.line;

        if start >= bytes.len() {
            return match self.start {
                StartMode::Doc => Ok(None),
                StartMode::Code => Err(self.error(ScanErrorKind::UnterminatedDoc)),
            };
        }
        if let Some(token) = self.lex_common(&text)? {
            return Ok(Some(token));
        }

        match bytes[start] {
            b'`' => {
                self.cursor += 1;
                self.state = ScanState::Math;
                return self.token(Symbol::MathBegin, start..start + 1, line).map(Some);
            }
            b'_' if opens_emphasis(bytes, start) => {
                self.cursor += 1;
                self.state = ScanState::Em;
                return self.token(Symbol::EmBegin, start..start + 1, line).map(Some);
            }
            b'<' => {
                if let Some(token) = self.lex_angle(&text)? {
                    return Ok(Some(token));
                }
            }
            b'!' if bytes.get(start + 1) == Some(&b'[') => {
                if let Some(token) = self.lex_anchor_start(&text, true)? {
                    return Ok(Some(token));
                }
            }
            b'[' => {
                if let Some(token) = self.lex_anchor_start(&text, false)? {
                    return Ok(Some(token));
                }
            }
            b'@' => {
                if let Some(token) = self.lex_attribute(&text)? {
                    return Ok(Some(token));
                }
            }
            b'-' if self.line_start
                && bytes.get(start + 1).map_or(true, |&b| is_blank(b) || b == b'\n') =>
            {
                self.cursor += 1;
                return self.token(Symbol::ListItem, start..start + 1, line).map(Some);
            }
            _ => {}
        }

        self.lex_word(&text, None).map(Some)
    }

    pub(super) fn lex_math(&mut self) -> Result<Option<Token>, ScanError> {
        let text = Rc::clone(&self.text);
        let start = self.cursor;
        if start >= text.len() {
            return Err(self.error(ScanErrorKind::DocEndedIn(self.state)));
        }
        if let Some(token) = self.lex_common(&text)? {
            return Ok(Some(token));
        }
        if text.as_bytes()[start] == b'`' {
            self.cursor += 1;
            self.state = ScanState::Doc;
            return self.token(Symbol::MathEnd, start..start + 1, self.line).map(Some);
        }
        self.lex_word(&text, None).map(Some)
    }

    pub(super) fn lex_em(&mut self) -> Result<Option<Token>, ScanError> {
        let text = Rc::clone(&self.text);
        let start = self.cursor;
        if start >= text.len() {
            return Err(self.error(ScanErrorKind::DocEndedIn(self.state)));
        }
        if let Some(token) = self.lex_common(&text)? {
            return Ok(Some(token));
        }
        if closes_emphasis(text.as_bytes(), start) {
            self.cursor += 1;
            self.state = ScanState::Doc;
            return self.token(Symbol::EmEnd, start..start + 1, self.line).map(Some);
        }
        self.lex_word(&text, Some('_')).map(Some)
    }

    pub(super) fn lex_anchor(&mut self) -> Result<Option<Token>, ScanError> {
        let text = Rc::clone(&self.text);
        let bytes = text.as_bytes();
        let start = self.cursor;
        if start >= bytes.len() {
            return Err(self.error(ScanErrorKind::DocEndedIn(self.state)));
        }
        if let Some(token) = self.lex_common(&text)? {
            return Ok(Some(token));
        }
        if bytes[start] == b']' && bytes.get(start + 1) == Some(&b'(') {
            if let Some(offset) = text[start + 2..].find(')') {
                let close = start + 2 + offset;
                self.cursor = close + 1;
                self.state = ScanState::Doc;
                return self.token(Symbol::Url, start + 2..close, self.line).map(Some);
            }
        }
        self.lex_word(&text, Some(']')).map(Some)
    }

    /// `@param [a, b]` and `@throws [ERANGE]`
    pub(super) fn lex_params(&mut self) -> Result<Option<Token>, ScanError> {
        let text = Rc::clone(&self.text);
        let bytes = text.as_bytes();
        while bytes.get(self.cursor).copied().is_some_and(is_blank) {
            self.cursor += 1;
        }
        let start = self.cursor;
        let line = self.line;
        let next = bytes.get(start).copied();

        match (self.state, next) {
            (ScanState::ParamBegin, Some(b'[')) => {
                self.cursor += 1;
                self.state = ScanState::ParamItem;
                self.token(Symbol::DocLeft, start..start + 1, line).map(Some)
            }
            (ScanState::ParamBegin, _) => {
                self.state = ScanState::Doc;
                self.lex_doc()
            }
            (ScanState::ParamItem, Some(b)) if b.is_ascii_alphabetic() || b == b'_' => {
                let len = bytes[start..]
                    .iter()
                    .take_while(|b| b.is_ascii_alphanumeric() || **b == b'_')
                    .count();
                self.cursor += len;
                self.state = ScanState::ParamMore;
                self.token(Symbol::Word, start..start + len, line).map(Some)
            }
            (ScanState::ParamMore, Some(b',')) => {
                self.cursor += 1;
                self.state = ScanState::ParamItem;
                self.token(Symbol::DocComma, start..start + 1, line).map(Some)
            }
            (ScanState::ParamMore, Some(b']')) => {
                self.cursor += 1;
                self.state = ScanState::Doc;
                self.token(Symbol::DocRight, start..start + 1, line).map(Some)
            }
            _ => Err(self.error(ScanErrorKind::BadParamList)),
        }
    }

    /// Forms that mean the same thing in every documentation state: the end
    /// of the block, line breaks, blanks, escapes and `~`
    fn lex_common(&mut self, text: &str) -> Result<Option<Token>, ScanError> {
        let bytes = text.as_bytes();
        let start = self.cursor;
        let line = self.line;

        match bytes[start] {
            b'*' if bytes.get(start + 1) == Some(&b'/') => {
                if self.state != ScanState::Doc {
                    return Err(self
                        .error(ScanErrorKind::DocEndedIn(self.state))
                        .near(Symbol::DocEnd));
                }
                self.cursor += 2;
                self.state = ScanState::Code;
                self.token(Symbol::DocEnd, start..start + 2, line).map(Some)
            }
            b'\n' => {
                self.cursor += 1;
                self.line += 1;
                self.skip_ascii_art(bytes);
                self.line_start = true;
                self.token(Symbol::Newline, start..start + 1, line).map(Some)
            }
            b if is_blank(b) => {
                let len = bytes[start..].iter().take_while(|&&b| is_blank(b)).count();
                self.cursor += len;
                self.token(Symbol::Space, start..start + len, line).map(Some)
            }
            b'~' => {
                self.cursor += 1;
                self.token(Symbol::Nbsp, start..start + 1, line).map(Some)
            }
            b'\\' => self.lex_escape(text).map(Some),
            _ => Ok(None),
        }
    }

    /// Leading `*` decoration at the start of a documentation line
    fn skip_ascii_art(&mut self, bytes: &[u8]) {
        let mut at = self.cursor;
        while bytes.get(at).copied().is_some_and(is_blank) {
            at += 1;
        }
        if bytes.get(at) != Some(&b'*') || bytes.get(at + 1) == Some(&b'/') {
            return;
        }
        while bytes.get(at) == Some(&b'*') && bytes.get(at + 1) != Some(&b'/') {
            at += 1;
        }
        self.cursor = at;
    }

    fn lex_escape(&mut self, text: &str) -> Result<Token, ScanError> {
        let start = self.cursor;
        let line = self.line;
        let rest = &text[start + 1..];

        match rest.chars().next() {
            None | Some('\n') => {
                self.cursor += 1;
                self.token(Symbol::Word, start..start + 1, line)
            }
            Some('"') if self.state == ScanState::Doc => {
                let end = rest.find('\n').map_or(text.len(), |n| start + 1 + n);
                let body = start + 2..end;
                if text[body.clone()].contains("*/") {
                    return Err(self
                        .error(ScanErrorKind::DocEndedInPreformatted)
                        .near(Symbol::Preformatted));
                }
                self.cursor = end;
                self.token(Symbol::Preformatted, body, line)
            }
            Some(',') => {
                self.cursor += 2;
                self.token(Symbol::NbThinsp, start..start + 2, line)
            }
            Some(c) => {
                for (name, symbol) in MATH_SYMBOLS {
                    if rest.starts_with(name)
                        && !rest[name.len()..]
                            .chars()
                            .next()
                            .is_some_and(|n| n.is_ascii_alphabetic())
                    {
                        self.cursor += 1 + name.len();
                        return self.token(symbol, start..self.cursor, line);
                    }
                }
                let len = c.len_utf8();
                self.cursor += 1 + len;
                self.token(Symbol::Escape, start + 1..start + 1 + len, line)
            }
        }
    }

    /// `<fn:name>`, `<uri>` and `<Author 2001>`; anything else is text
    fn lex_angle(&mut self, text: &str) -> Result<Option<Token>, ScanError> {
        let start = self.cursor;
        let Some(offset) = text[start + 1..].find(['>', '\n']) else {
            return Ok(None);
        };
        let close = start + 1 + offset;
        if text.as_bytes()[close] != b'>' {
            return Ok(None);
        }
        let inner = &text[start + 1..close];
        if inner.is_empty() || inner.contains("*/") {
            return Ok(None);
        }

        let (symbol, range) = if let Some(caps) = reference_re().captures(inner) {
            let (Some(kind), Some(name)) = (caps.get(1), caps.get(2)) else {
                return Ok(None);
            };
            let symbol = match kind.as_str() {
                "fn" => Symbol::SeeFn,
                "tag" => Symbol::SeeTag,
                "typedef" => Symbol::SeeTypedef,
                _ => Symbol::SeeData,
            };
            (symbol, start + 1 + name.start()..start + 1 + name.end())
        } else if uri_re().is_match(inner) {
            (Symbol::Url, start + 1..close)
        } else if citation_re().is_match(inner) {
            (Symbol::Cite, start + 1..close)
        } else {
            return Ok(None);
        };

        self.cursor = close + 1;
        self.token(symbol, range, self.line).map(Some)
    }

    /// `[text](url)` and `![alt](src)`: only the opener is consumed here, the
    /// text is scanned in the anchor state
    fn lex_anchor_start(&mut self, text: &str, image: bool) -> Result<Option<Token>, ScanError> {
        let start = self.cursor;
        let open = start + if image { 2 } else { 1 };
        let Some(offset) = text[open..].find(']') else {
            return Ok(None);
        };
        let close = open + offset;
        if text.as_bytes().get(close + 1) != Some(&b'(') {
            return Ok(None);
        }
        let Some(offset) = text[close + 2..].find(')') else {
            return Ok(None);
        };
        let url = &text[close + 2..close + 2 + offset];
        if url.is_empty() || url.contains(char::is_whitespace) {
            return Ok(None);
        }
        if text[start..close].contains("*/") || text[start..close].contains('\n') {
            return Ok(None);
        }

        let symbol = if image {
            Symbol::ImageStart
        } else {
            Symbol::LinkStart
        };
        self.cursor = open;
        self.state = ScanState::Anchor;
        self.token(symbol, start..open, self.line).map(Some)
    }

    /// `@keyword` at the start of a token
    fn lex_attribute(&mut self, text: &str) -> Result<Option<Token>, ScanError> {
        let start = self.cursor;
        let rest = &text[start + 1..];
        let len = rest.bytes().take_while(u8::is_ascii_alphabetic).count();
        let keyword = &rest[..len];
        let boundary = rest[len..]
            .chars()
            .next()
            .map_or(true, |c| !(c.is_alphanumeric() || c == '_'));
        let Some(symbol) = Symbol::attribute(keyword).filter(|_| boundary) else {
            return Ok(None);
        };

        self.cursor = start + 1 + len;
        if matches!(symbol, Symbol::AttParam | Symbol::AttThrows) {
            self.state = ScanState::ParamBegin;
        }
        self.token(symbol, start..self.cursor, self.line).map(Some)
    }

    /// A run of text up to the next blank or markup character; always
    /// consumes at least one character
    fn lex_word(&mut self, text: &str, stop: Option<char>) -> Result<Token, ScanError> {
        let start = self.cursor;
        let rest = &text[start..];
        let mut end = rest.len();
        for (i, c) in rest.char_indices().skip(1) {
            let ends = c.is_whitespace()
                || matches!(c, '`' | '\\' | '~')
                || (Some(c) == stop && (c != '_' || closes_emphasis(rest.as_bytes(), i)))
                || (c == '*' && rest[i + 1..].starts_with('/'));
            if ends {
                end = i;
                break;
            }
        }
        self.cursor = start + end;
        self.token(Symbol::Word, start..self.cursor, self.line)
    }
}

/// `_` opens emphasis when text follows it and a closing `_` comes before
/// the end of the block. Escapes are skipped as the emphasis state lexes them.
fn opens_emphasis(bytes: &[u8], at: usize) -> bool {
    match bytes.get(at + 1) {
        None => return false,
        Some(&b) if is_blank(b) || b == b'\n' || b == b'_' => return false,
        Some(_) => {}
    }
    let mut i = at + 1;
    while let Some(&b) = bytes.get(i) {
        match b {
            b'*' if bytes.get(i + 1) == Some(&b'/') => return false,
            b'\\' => i += 2,
            _ if closes_emphasis(bytes, i) => return true,
            _ => i += 1,
        }
    }
    false
}

/// An `_` not followed by a letter or digit
fn closes_emphasis(bytes: &[u8], at: usize) -> bool {
    bytes.get(at) == Some(&b'_') && !bytes.get(at + 1).is_some_and(u8::is_ascii_alphanumeric)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testutil::{report_from, scan_doc, scan_doc_symbols, scan_symbols};

    #[test]
    fn doc_block_in_code() {
        assert_eq!(
            scan_symbols("/** Hello world. */ int x;").unwrap(),
            vec![
                Symbol::DocBegin,
                Symbol::Space,
                Symbol::Word,
                Symbol::Space,
                Symbol::Word,
                Symbol::Space,
                Symbol::DocEnd,
                Symbol::Id,
                Symbol::Id,
                Symbol::Semicolon
            ]
        );
    }

    #[test]
    fn extra_stars_are_decoration() {
        let symbols = scan_symbols("/****** Hi */").unwrap();
        assert_eq!(symbols[1], Symbol::Space);
        assert_eq!(symbols[2], Symbol::Word);
        assert_eq!(scan_symbols("/***/").unwrap(), vec![Symbol::DocBegin, Symbol::DocEnd]);
    }

    #[test]
    fn ascii_art_is_skipped() {
        let (source, tokens) = scan_doc("a\n * b\n ** c").unwrap();
        let words: Vec<&str> = tokens
            .iter()
            .filter(|t| t.symbol == Symbol::Word)
            .map(|t| &source[t.span.as_range()])
            .collect();
        assert_eq!(words, vec!["a", "b", "c"]);
    }

    #[test]
    fn attribute_with_parameter_list() {
        let (source, tokens) = scan_doc("@param[a, b] Both.").unwrap();
        let symbols: Vec<Symbol> = tokens.iter().map(|t| t.symbol).collect();
        assert_eq!(
            symbols,
            vec![
                Symbol::AttParam,
                Symbol::DocLeft,
                Symbol::Word,
                Symbol::DocComma,
                Symbol::Word,
                Symbol::DocRight,
                Symbol::Space,
                Symbol::Word
            ]
        );
        assert_eq!(&source[tokens[2].span.as_range()], "a");
        assert_eq!(&source[tokens[4].span.as_range()], "b");
    }

    #[test]
    fn param_without_list_returns_to_text() {
        assert_eq!(
            scan_doc_symbols("@param x").unwrap(),
            vec![Symbol::AttParam, Symbol::Word]
        );
    }

    #[test]
    fn bad_parameter_list_is_fatal() {
        let err = scan_doc_symbols("@param[a b]").unwrap_err();
        assert!(err.contains("parameter list"), "{err}");
        let err = scan_doc_symbols("@throws[1]").unwrap_err();
        assert!(err.contains("parameter list"), "{err}");
    }

    #[test]
    fn attribute_needs_a_keyword_boundary() {
        assert_eq!(scan_doc_symbols("@params").unwrap(), vec![Symbol::Word]);
        assert_eq!(scan_doc_symbols("me@std").unwrap(), vec![Symbol::Word]);
        assert_eq!(scan_doc_symbols("@std").unwrap(), vec![Symbol::AttStd]);
    }

    #[test]
    fn math_and_emphasis_spans() {
        assert_eq!(
            scan_doc_symbols("`a` _b_").unwrap(),
            vec![
                Symbol::MathBegin,
                Symbol::Word,
                Symbol::MathEnd,
                Symbol::Space,
                Symbol::EmBegin,
                Symbol::Word,
                Symbol::EmEnd
            ]
        );
    }

    #[test]
    fn escaped_underscore_does_not_close_emphasis() {
        assert_eq!(
            scan_doc_symbols("Use _a \\_ b.").unwrap(),
            vec![
                Symbol::Word,
                Symbol::Space,
                Symbol::Word,
                Symbol::Space,
                Symbol::Escape,
                Symbol::Space,
                Symbol::Word
            ]
        );
        assert_eq!(
            scan_doc_symbols("_a \\_ b_").unwrap(),
            vec![
                Symbol::EmBegin,
                Symbol::Word,
                Symbol::Space,
                Symbol::Escape,
                Symbol::Space,
                Symbol::Word,
                Symbol::EmEnd
            ]
        );
        let report = report_from("/** Use _a \\_ b. */\nint x;\n").unwrap();
        assert_eq!(report.segments().len(), 1);
    }

    #[test]
    fn emphasis_keeps_inner_underscores() {
        let (source, tokens) = scan_doc("_snake_case_ _init_x").unwrap();
        let found: Vec<(Symbol, &str)> = tokens
            .iter()
            .map(|t| (t.symbol, &source[t.span.as_range()]))
            .collect();
        assert_eq!(
            found,
            vec![
                (Symbol::EmBegin, "_"),
                (Symbol::Word, "snake_case"),
                (Symbol::EmEnd, "_"),
                (Symbol::Space, " "),
                (Symbol::Word, "_init_x")
            ]
        );
    }

    #[test]
    fn underscores_inside_words_are_text() {
        assert_eq!(scan_doc_symbols("foo_bar").unwrap(), vec![Symbol::Word]);
        assert_eq!(
            scan_doc_symbols("__attribute__").unwrap(),
            vec![Symbol::Word]
        );
        assert_eq!(scan_doc_symbols("_lonely").unwrap(), vec![Symbol::Word]);
    }

    #[test]
    fn references_urls_and_citations() {
        let (source, tokens) =
            scan_doc("<fn:list_push> <https://example.org/x> <Knuth 1968>").unwrap();
        let found: Vec<(Symbol, &str)> = tokens
            .iter()
            .filter(|t| t.symbol != Symbol::Space)
            .map(|t| (t.symbol, &source[t.span.as_range()]))
            .collect();
        assert_eq!(
            found,
            vec![
                (Symbol::SeeFn, "list_push"),
                (Symbol::Url, "https://example.org/x"),
                (Symbol::Cite, "Knuth 1968")
            ]
        );
    }

    #[test]
    fn unmatched_angle_is_text() {
        assert_eq!(scan_doc_symbols("a < b").unwrap()[2], Symbol::Word);
        assert_eq!(scan_doc_symbols("<T>").unwrap(), vec![Symbol::Word]);
    }

    #[test]
    fn links_and_images() {
        let (source, tokens) = scan_doc("[the site](http://a.b) ![pic](p.png)").unwrap();
        let found: Vec<(Symbol, &str)> = tokens
            .iter()
            .filter(|t| t.symbol != Symbol::Space)
            .map(|t| (t.symbol, &source[t.span.as_range()]))
            .collect();
        assert_eq!(
            found,
            vec![
                (Symbol::LinkStart, "["),
                (Symbol::Word, "the"),
                (Symbol::Word, "site"),
                (Symbol::Url, "http://a.b"),
                (Symbol::ImageStart, "!["),
                (Symbol::Word, "pic"),
                (Symbol::Url, "p.png")
            ]
        );
    }

    #[test]
    fn escapes_and_math_symbols() {
        let (source, tokens) = scan_doc(r"\_ \O \Omega \, ~ \x").unwrap();
        let found: Vec<(Symbol, &str)> = tokens
            .iter()
            .filter(|t| t.symbol != Symbol::Space)
            .map(|t| (t.symbol, &source[t.span.as_range()]))
            .collect();
        assert_eq!(
            found,
            vec![
                (Symbol::Escape, "_"),
                (Symbol::MathCalO, r"\O"),
                (Symbol::MathOmega, r"\Omega"),
                (Symbol::NbThinsp, r"\,"),
                (Symbol::Nbsp, "~"),
                (Symbol::Escape, "x")
            ]
        );
    }

    #[test]
    fn preformatted_line() {
        let (source, tokens) = scan_doc("\\\" int x;\nafter").unwrap();
        assert_eq!(tokens[0].symbol, Symbol::Preformatted);
        assert_eq!(&source[tokens[0].span.as_range()], " int x;");
        assert_eq!(tokens[1].symbol, Symbol::Newline);
    }

    #[test]
    fn list_items_only_at_line_start() {
        assert_eq!(
            scan_doc_symbols("- a\n - b x-y - c").unwrap(),
            vec![
                Symbol::ListItem,
                Symbol::Space,
                Symbol::Word,
                Symbol::Newline,
                Symbol::Space,
                Symbol::ListItem,
                Symbol::Space,
                Symbol::Word,
                Symbol::Space,
                Symbol::Word,
                Symbol::Space,
                Symbol::Word,
                Symbol::Space,
                Symbol::Word
            ]
        );
    }

    #[test]
    fn doc_ending_inside_a_span_is_fatal() {
        let err = scan_symbols("/** `a */").unwrap_err();
        assert!(err.contains("code span"), "{err}");
        let err = scan_symbols("/** \\\" pre */").unwrap_err();
        assert!(err.contains("preformatted"), "{err}");
    }

    #[test]
    fn unterminated_doc_is_fatal() {
        let err = scan_symbols("/** never closed").unwrap_err();
        assert!(err.contains("unterminated documentation"), "{err}");
    }

    #[test]
    fn doc_start_mode_ends_cleanly() {
        assert_eq!(
            scan_doc_symbols("Title text").unwrap(),
            vec![Symbol::Word, Symbol::Space, Symbol::Word]
        );
    }

    #[test]
    fn word_stops_before_doc_end() {
        let (source, tokens) = scan_doc_in_code("/** end*/");
        assert_eq!(tokens[1].symbol, Symbol::Space);
        assert_eq!(&source[tokens[2].span.as_range()], "end");
        assert_eq!(tokens[3].symbol, Symbol::DocEnd);
    }

    fn scan_doc_in_code(source: &str) -> (String, Vec<Token>) {
        let tokens = crate::testutil::scan_code(source).unwrap();
        (source.to_string(), tokens)
    }
}
