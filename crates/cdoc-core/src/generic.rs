//! Generic names
//!
//! C code emulating generics often pastes type names onto a prefix with a
//! macro, `A_B_(create, thing)`. The scanner recognises the prefix and the
//! renderer displays the whole call as `<A>create<B>thing`.

use thiserror::Error;

use crate::scanner::Token;
use crate::source::SourceMap;
use crate::symbol::Symbol;

/// Maximum number of `_`-separated segments in a generic prefix
pub const MAX_ARITY: usize = 3;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum DemangleError {
    #[error("{label}:{line}: {symbol} is not a generic name")]
    NotGeneric {
        label: String,
        line: u32,
        symbol: Symbol,
    },

    #[error("{label}:{line}: expected {expected} in generic name, found {found}")]
    Expected {
        label: String,
        line: u32,
        expected: &'static str,
        found: String,
    },
}

/// A demangled name and the number of code tokens it covers
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Demangled {
    pub text: String,
    pub consumed: usize,
}

/// Number of `[A-Za-z]+_` segments making up the whole identifier, if it
/// is a generic prefix
pub fn prefix_arity(ident: &str) -> Option<usize> {
    let body = ident.strip_suffix('_')?;
    let mut count = 0;
    for part in body.split('_') {
        if part.is_empty() || !part.bytes().all(|b| b.is_ascii_alphabetic()) {
            return None;
        }
        count += 1;
    }
    (1..=MAX_ARITY).contains(&count).then_some(count)
}

/// Interleave prefix segments with arguments: `A_B_`, `[x, y]` → `<A>x<B>y`
pub fn display_name(prefix: &str, args: &[&str]) -> String {
    prefix
        .trim_end_matches('_')
        .split('_')
        .zip(args)
        .fold(String::new(), |mut out, (segment, arg)| {
            out.push('<');
            out.push_str(segment);
            out.push('>');
            out.push_str(arg);
            out
        })
}

/// Demangle the generic name starting at `tokens[at]`
///
/// # Errors
/// Returns an error if `tokens[at]` is not a generic prefix or is not
/// followed by `(`, the right number of comma-separated identifiers and `)`.
pub fn demangle(tokens: &[Token], at: usize, sources: &SourceMap) -> Result<Demangled, DemangleError> {
    let head = tokens[at];
    let label = || sources.label(head.source).to_string();
    let Some(arity) = head.symbol.generic_arity() else {
        return Err(DemangleError::NotGeneric {
            label: label(),
            line: head.line,
            symbol: head.symbol,
        });
    };

    let mut cursor = at + 1;
    let mut expect = |symbol: Symbol, expected: &'static str| {
        let token = tokens.get(cursor).filter(|t| t.symbol == symbol);
        match token {
            Some(token) => {
                cursor += 1;
                Ok(*token)
            }
            None => Err(DemangleError::Expected {
                label: label(),
                line: head.line,
                expected,
                found: tokens
                    .get(cursor)
                    .map_or_else(|| "end of code".to_string(), |t| t.symbol.to_string()),
            }),
        }
    };

    expect(Symbol::LParen, "'('")?;
    let mut args = Vec::with_capacity(arity);
    for i in 0..arity {
        if i > 0 {
            expect(Symbol::Comma, "','")?;
        }
        args.push(expect(Symbol::Id, "an identifier")?);
    }
    expect(Symbol::RParen, "')'")?;

    let args: Vec<&str> = args.iter().map(|t| sources.slice(t.source, t.span)).collect();
    Ok(Demangled {
        text: display_name(sources.slice(head.source, head.span), &args),
        consumed: cursor - at,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scanner::{scan, StartMode};

    fn scanned(code: &str) -> (SourceMap, Vec<Token>) {
        let mut sources = SourceMap::new();
        let id = sources.add("g.c", None, code.to_string()).unwrap();
        let mut tokens = Vec::new();
        scan(id, sources.get(id), StartMode::Code, &mut tokens).unwrap();
        (sources, tokens)
    }

    #[test]
    fn prefix_arity_counts_segments() {
        assert_eq!(prefix_arity("A_"), Some(1));
        assert_eq!(prefix_arity("Abc_Def_"), Some(2));
        assert_eq!(prefix_arity("A_B_C_"), Some(3));
        assert_eq!(prefix_arity("A_B_C_D_"), None);
        assert_eq!(prefix_arity("A__"), None);
        assert_eq!(prefix_arity("A"), None);
        assert_eq!(prefix_arity("a1_"), None);
    }

    #[test]
    fn two_generics() {
        let (sources, tokens) = scanned("A_B_(Create, Thing);");
        assert_eq!(tokens[0].symbol, Symbol::IdTwoGenerics);
        let d = demangle(&tokens, 0, &sources).unwrap();
        assert_eq!(d.text, "<A>Create<B>Thing");
        assert_eq!(d.consumed, 6);
    }

    #[test]
    fn one_generic_in_context() {
        let (sources, tokens) = scanned("struct List_(int) *l;");
        let d = demangle(&tokens, 1, &sources).unwrap();
        assert_eq!(d.text, "<List>int");
        assert_eq!(d.consumed, 4);
    }

    #[test]
    fn wrong_argument_count() {
        let (sources, tokens) = scanned("A_B_(x);");
        let err = demangle(&tokens, 0, &sources).unwrap_err();
        assert!(matches!(err, DemangleError::Expected { expected: "','", .. }));
        assert!(err.to_string().starts_with("g.c:1:"));
    }

    #[test]
    fn not_generic() {
        let (sources, tokens) = scanned("foo(x);");
        assert!(matches!(
            demangle(&tokens, 0, &sources),
            Err(DemangleError::NotGeneric { symbol: Symbol::Id, .. })
        ));
    }

    #[test]
    fn display_name_interleaves() {
        assert_eq!(display_name("A_B_C_", &["x", "y", "z"]), "<A>x<B>y<C>z");
    }
}
