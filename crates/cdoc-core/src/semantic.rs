//! Statement classification
//!
//! A statement's code tokens are reduced to their [`Mark`]s and matched
//! against a handful of shapes. This is deliberately a heuristic and not a C
//! parser: anything it does not recognise is [`Division::Data`], possibly
//! without a name.
//!
//! Steps:
//! 1. brackets must balance, otherwise the statement is unnamed data;
//! 2. `{..}` and `[..]` groups are redacted along with their delimiters;
//! 3. the argument lists of macro calls are redacted;
//! 4. the remaining marks are matched, in order, as preamble, typedef, tag,
//!    function and finally data.
//!
//! Names are reported as indices into the statement's code tokens.

use serde::Serialize;
use tracing::{debug, warn};

use crate::scanner::Token;
use crate::symbol::{mark_string, Mark};

/// What kind of statement a segment documents
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Division {
    #[default]
    Preamble,
    Function,
    Tag,
    Typedef,
    Data,
}

impl Division {
    /// Every division, in the order sections are rendered
    pub const ALL: [Division; 5] = [
        Division::Preamble,
        Division::Typedef,
        Division::Tag,
        Division::Data,
        Division::Function,
    ];

    /// Prefix of anchors and of `<kind:name>` references
    pub const fn anchor_prefix(self) -> &'static str {
        match self {
            Division::Preamble => "preamble",
            Division::Function => "fn",
            Division::Tag => "tag",
            Division::Typedef => "typedef",
            Division::Data => "data",
        }
    }

    /// Section heading
    pub const fn heading(self) -> &'static str {
        match self {
            Division::Preamble => "Preamble",
            Division::Function => "Functions",
            Division::Tag => "Tagged types",
            Division::Typedef => "Type definitions",
            Division::Data => "Data",
        }
    }
}

impl std::fmt::Display for Division {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.anchor_prefix())
    }
}

/// Result of classifying one statement
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Classification {
    pub division: Division,
    /// Code token indices: the title first, then parameter names for
    /// functions
    pub params: Vec<usize>,
}

impl Classification {
    fn new(division: Division, params: Vec<usize>) -> Self {
        Self { division, params }
    }
}

/// A mark together with the index of the code token it came from
type Slot = (usize, Mark);

/// Classify the code tokens of one statement
pub fn classify(code: &[Token]) -> Classification {
    let marks: Vec<Mark> = code.iter().map(|t| t.symbol.mark()).collect();
    classify_marks(&marks)
}

/// Classify a statement given as marks
pub fn classify_marks(marks: &[Mark]) -> Classification {
    let Some(pairs) = match_brackets(marks) else {
        warn!(
            marks = %mark_string(marks),
            "unbalanced brackets, treating statement as data"
        );
        return Classification::new(Division::Data, Vec::new());
    };

    let mut reduced = marks.to_vec();
    redact_groups(&mut reduced, &pairs);
    redact_macro_arguments(&mut reduced, &pairs);

    let mut view: Vec<Slot> = reduced
        .iter()
        .enumerate()
        .filter(|(_, m)| **m != Mark::Redacted)
        .map(|(i, m)| (i, *m))
        .collect();
    while view.last().is_some_and(|(_, m)| *m == Mark::Semicolon) {
        view.pop();
    }

    let result = if view.is_empty() {
        Classification::new(Division::Preamble, Vec::new())
    } else {
        typedef(&view)
            .or_else(|| tag(&view))
            .or_else(|| function(&view))
            .unwrap_or_else(|| data(&view))
    };

    debug!(
        marks = %mark_string(marks),
        reduced = %mark_string(&view.iter().map(|(_, m)| *m).collect::<Vec<_>>()),
        division = %result.division,
        params = ?result.params,
        "classified"
    );
    result
}

/// For every bracket, the index of its partner; `None` if the brackets do
/// not balance
fn match_brackets(marks: &[Mark]) -> Option<Vec<Option<usize>>> {
    let mut pairs = vec![None; marks.len()];
    let mut stack: Vec<(usize, Mark)> = Vec::new();
    for (i, &mark) in marks.iter().enumerate() {
        let opener = match mark {
            Mark::LParen | Mark::LBrack | Mark::LBrace => {
                stack.push((i, mark));
                continue;
            }
            Mark::RParen => Mark::LParen,
            Mark::RBrack => Mark::LBrack,
            Mark::RBrace => Mark::LBrace,
            _ => continue,
        };
        let (open, found) = stack.pop()?;
        if found != opener {
            return None;
        }
        pairs[open] = Some(i);
        pairs[i] = Some(open);
    }
    stack.is_empty().then_some(pairs)
}

/// Blank out `{..}` and `[..]` groups including their delimiters
fn redact_groups(marks: &mut [Mark], pairs: &[Option<usize>]) {
    for i in 0..marks.len() {
        if matches!(marks[i], Mark::LBrace | Mark::LBrack) {
            if let Some(close) = pairs[i] {
                marks[i..=close].fill(Mark::Redacted);
            }
        }
    }
}

/// Blank out the parenthesised arguments of macro calls
fn redact_macro_arguments(marks: &mut [Mark], pairs: &[Option<usize>]) {
    for i in 0..marks.len() {
        if marks[i] != Mark::Macro {
            continue;
        }
        let Some(open) = (i + 1..marks.len()).find(|&j| marks[j] != Mark::Redacted) else {
            continue;
        };
        if marks[open] == Mark::LParen {
            if let Some(close) = pairs[open] {
                marks[open..=close].fill(Mark::Redacted);
            }
        }
    }
}

/// Position in `view` of the `(` matching the `)` at `close`
fn matching_open(view: &[Slot], close: usize) -> Option<usize> {
    let mut depth = 0usize;
    for i in (0..=close).rev() {
        match view[i].1 {
            Mark::RParen => depth += 1,
            Mark::LParen => {
                depth -= 1;
                if depth == 0 {
                    return Some(i);
                }
            }
            _ => {}
        }
    }
    None
}

/// Position in `view` of the `)` matching the `(` at `open`
fn matching_close(view: &[Slot], open: usize) -> Option<usize> {
    let mut depth = 0usize;
    for (i, (_, mark)) in view.iter().enumerate().skip(open) {
        match mark {
            Mark::LParen => depth += 1,
            Mark::RParen => {
                depth -= 1;
                if depth == 0 {
                    return Some(i);
                }
            }
            _ => {}
        }
    }
    None
}

/// The name in a function pointer declarator, `( *.. name )`
pub(crate) fn function_pointer_name(view: &[Slot]) -> Option<usize> {
    for (i, (_, mark)) in view.iter().enumerate() {
        if *mark != Mark::LParen {
            continue;
        }
        let stars = view[i + 1..]
            .iter()
            .take_while(|(_, m)| *m == Mark::Operator)
            .count();
        if stars == 0 {
            continue;
        }
        let at = i + 1 + stars;
        if let (Some(&(name, Mark::Id)), Some((_, Mark::RParen))) = (view.get(at), view.get(at + 1)) {
            return Some(name);
        }
    }
    None
}

/// Scan right to left from `end` for something that looks like a type name:
/// an identifier, or a generic marker with its argument group. Operators
/// (pointers and the like) are skipped; anything else stops the scan.
pub(crate) fn find_type_name(view: &[Slot], end: usize) -> Option<usize> {
    let mut i = end;
    while i > 0 {
        i -= 1;
        match view[i].1 {
            Mark::Operator => continue,
            Mark::Id => return Some(view[i].0),
            Mark::RParen => {
                let open = matching_open(view, i)?;
                let generic = open.checked_sub(1)?;
                return view[generic].1.generic_arity().map(|_| view[generic].0);
            }
            _ => return None,
        }
    }
    None
}

/// Names of the parameters in an argument list (the marks between the
/// outer parentheses). Commas inside nested parentheses do not split.
pub(crate) fn argument_names(args: &[Slot]) -> Vec<usize> {
    let mut names = Vec::new();
    let mut depth = 0usize;
    let mut start = 0;
    for (i, (_, mark)) in args.iter().enumerate() {
        match mark {
            Mark::LParen => depth += 1,
            Mark::RParen => depth = depth.saturating_sub(1),
            Mark::Comma if depth == 0 => {
                names.extend(argument_name(&args[start..i]));
                start = i + 1;
            }
            _ => {}
        }
    }
    names.extend(argument_name(&args[start..]));
    names
}

fn argument_name(chunk: &[Slot]) -> Option<usize> {
    if let Some(name) = function_pointer_name(chunk) {
        return Some(name);
    }
    match chunk {
        [_, .., (name, Mark::Id)] => Some(*name),
        _ => None,
    }
}

/// `typedef <type> name` and `typedef <type> (*name)(args)`
fn typedef(view: &[Slot]) -> Option<Classification> {
    let (&(_, Mark::Typedef), body) = view.split_first()? else {
        return None;
    };
    let name = function_pointer_name(body).or_else(|| find_type_name(body, body.len()))?;
    Some(Classification::new(Division::Typedef, vec![name]))
}

/// `struct name`, `struct Generic_(args)`, or an anonymous `struct`
fn tag(view: &[Slot]) -> Option<Classification> {
    let body = match view {
        [(_, Mark::Static), rest @ ..] => rest,
        _ => view,
    };
    let (&(keyword, Mark::Tag), after) = body.split_first()? else {
        return None;
    };
    match after {
        [] => Some(Classification::new(Division::Tag, Vec::new())),
        // The name must come straight after the keyword; `struct {..} x`
        // declares data
        [(name, Mark::Id)] if *name == keyword + 1 => {
            Some(Classification::new(Division::Tag, vec![*name]))
        }
        [(name, generic), (_, Mark::LParen), ..]
            if generic.generic_arity().is_some()
                && *name == keyword + 1
                && matching_close(after, 1) == Some(after.len() - 1) =>
        {
            Some(Classification::new(Division::Tag, vec![*name]))
        }
        _ => None,
    }
}

/// `[static] <return type> name(args)`
fn function(view: &[Slot]) -> Option<Classification> {
    let close = view.len() - 1;
    if view[close].1 != Mark::RParen {
        return None;
    }
    let open = matching_open(view, close)?;
    let before = open.checked_sub(1)?;
    let name_at = match view[before].1 {
        Mark::Id => before,
        Mark::RParen => {
            let group = matching_open(view, before)?;
            let generic = group.checked_sub(1)?;
            view[generic].1.generic_arity()?;
            generic
        }
        _ => return None,
    };

    let start = usize::from(view[0].1 == Mark::Static);
    if name_at <= start || !is_return_type(&view[start..name_at]) {
        return None;
    }

    let mut params = vec![view[name_at].0];
    params.extend(argument_names(&view[open + 1..close]));
    Some(Classification::new(Division::Function, params))
}

/// Identifiers, tags, `void`, pointers, macros and generic types
fn is_return_type(marks: &[Slot]) -> bool {
    let mut i = 0;
    while i < marks.len() {
        match marks[i].1 {
            Mark::Id | Mark::Tag | Mark::Void | Mark::Operator | Mark::Macro => i += 1,
            m if m.generic_arity().is_some() => {
                if marks.get(i + 1).map(|s| s.1) != Some(Mark::LParen) {
                    return false;
                }
                match matching_close(marks, i + 1) {
                    Some(close) => i = close + 1,
                    None => return false,
                }
            }
            _ => return false,
        }
    }
    true
}

/// Anything else: the name is the last type-looking token before `=`
fn data(view: &[Slot]) -> Classification {
    let end = view
        .iter()
        .position(|(_, m)| *m == Mark::Assign)
        .unwrap_or(view.len());
    let declarator = &view[..end];
    let name = function_pointer_name(declarator).or_else(|| find_type_name(declarator, end));
    if name.is_none() {
        debug!("no name found in data statement");
    }
    Classification::new(Division::Data, name.into_iter().collect())
}
