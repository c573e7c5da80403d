//! The symbol table shared by every stage of the pipeline
//!
//! Each lexical symbol carries a one-character classifier mark, a pair of
//! spacing flags used when code is rendered, and a render category. Nothing
//! else in the crate keeps a parallel table of these properties.

use serde::Serialize;

/// The kind of token produced by the scanner
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Symbol {
    // ========== Code ==========
    Operator,
    Comma,
    Semicolon,
    LBrace,
    RBrace,
    LParen,
    RParen,
    LBrack,
    RBrack,
    Constant,
    Id,
    Macro,
    IdOneGeneric,
    IdTwoGenerics,
    IdThreeGenerics,
    Struct,
    Union,
    Enum,
    Typedef,
    Static,
    Void,
    Ellipsis,
    Assignment,
    LocalInclude,

    // ========== Documentation ==========
    DocBegin,
    DocEnd,
    Word,
    Space,
    Newline,
    Escape,
    Nbsp,
    NbThinsp,
    MathCalO,
    MathTheta,
    MathOmega,
    MathTimes,
    MathCdot,
    Url,
    Cite,
    SeeFn,
    SeeTag,
    SeeTypedef,
    SeeData,
    LinkStart,
    ImageStart,
    MathBegin,
    MathEnd,
    EmBegin,
    EmEnd,
    ListItem,
    Preformatted,
    DocLeft,
    DocComma,
    DocRight,

    // ========== Attributes ==========
    AttSubtitle,
    AttParam,
    AttAuthor,
    AttStd,
    AttDepend,
    AttFixme,
    AttReturn,
    AttThrows,
    AttImplements,
    AttOrder,
    AttAllow,
    AttLicense,
    AttCf,
    AttAbstract,
}

/// The classifier alphabet: one character per code token
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Mark {
    Operator,
    Comma,
    Semicolon,
    LBrace,
    RBrace,
    LParen,
    RParen,
    LBrack,
    RBrack,
    Constant,
    Id,
    Macro,
    Generic1,
    Generic2,
    Generic3,
    Tag,
    Typedef,
    Static,
    Void,
    Ellipsis,
    Assign,
    Include,
    /// Documentation symbols never reach the classifier
    Doc,
    /// Written over tokens the classifier has decided to ignore
    Redacted,
}

impl Mark {
    /// The character this mark stands for in a mark string
    pub const fn as_char(self) -> char {
        match self {
            Mark::Operator => '*',
            Mark::Comma => ',',
            Mark::Semicolon => ';',
            Mark::LBrace => '{',
            Mark::RBrace => '}',
            Mark::LParen => '(',
            Mark::RParen => ')',
            Mark::LBrack => '[',
            Mark::RBrack => ']',
            Mark::Constant => '#',
            Mark::Id => 'x',
            Mark::Macro => 'm',
            Mark::Generic1 => '1',
            Mark::Generic2 => '2',
            Mark::Generic3 => '3',
            Mark::Tag => 's',
            Mark::Typedef => 't',
            Mark::Static => 'z',
            Mark::Void => 'v',
            Mark::Ellipsis => '.',
            Mark::Assign => '=',
            Mark::Include => '/',
            Mark::Doc => '~',
            Mark::Redacted => '@',
        }
    }

    /// The mark a character stands for; inverse of [`Mark::as_char`]
    pub const fn from_char(c: char) -> Option<Mark> {
        Some(match c {
            '*' => Mark::Operator,
            ',' => Mark::Comma,
            ';' => Mark::Semicolon,
            '{' => Mark::LBrace,
            '}' => Mark::RBrace,
            '(' => Mark::LParen,
            ')' => Mark::RParen,
            '[' => Mark::LBrack,
            ']' => Mark::RBrack,
            '#' => Mark::Constant,
            'x' => Mark::Id,
            'm' => Mark::Macro,
            '1' => Mark::Generic1,
            '2' => Mark::Generic2,
            '3' => Mark::Generic3,
            's' => Mark::Tag,
            't' => Mark::Typedef,
            'z' => Mark::Static,
            'v' => Mark::Void,
            '.' => Mark::Ellipsis,
            '=' => Mark::Assign,
            '/' => Mark::Include,
            '~' => Mark::Doc,
            '@' => Mark::Redacted,
            _ => return None,
        })
    }

    /// Number of type arguments for a generic marker
    pub const fn generic_arity(self) -> Option<usize> {
        match self {
            Mark::Generic1 => Some(1),
            Mark::Generic2 => Some(2),
            Mark::Generic3 => Some(3),
            _ => None,
        }
    }
}

/// Render a mark sequence as its string form, for diagnostics
pub fn mark_string(marks: &[Mark]) -> String {
    marks.iter().map(|m| m.as_char()).collect()
}

/// How a symbol is rendered
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Category {
    /// Copied from the source text (escaped for the output format)
    Literal,
    /// A generic prefix with the given number of arguments
    Generic(usize),
    /// Escapes, non-breaking spaces and math symbols
    Escape,
    /// `<fn:..>` and friends
    Reference,
    /// Bare URLs and citations
    Link,
    /// `[text](url)` and `![alt](src)`
    Anchor,
    /// Paragraphs, lists, spans and block delimiters
    Structural,
    /// `@tag` each-block attributes
    Attribute,
}

/// Attribute symbols with their keyword, in scanning order
pub const ATTRIBUTES: [(Symbol, &str); 14] = [
    (Symbol::AttSubtitle, "subtitle"),
    (Symbol::AttParam, "param"),
    (Symbol::AttAuthor, "author"),
    (Symbol::AttStd, "std"),
    (Symbol::AttDepend, "depend"),
    (Symbol::AttFixme, "fixme"),
    (Symbol::AttReturn, "return"),
    (Symbol::AttThrows, "throws"),
    (Symbol::AttImplements, "implements"),
    (Symbol::AttOrder, "order"),
    (Symbol::AttAllow, "allow"),
    (Symbol::AttLicense, "license"),
    (Symbol::AttCf, "cf"),
    (Symbol::AttAbstract, "abstract"),
];

impl Symbol {
    /// Look up an attribute symbol by its keyword (without the `@`)
    pub fn attribute(keyword: &str) -> Option<Symbol> {
        ATTRIBUTES
            .iter()
            .find(|(_, kw)| *kw == keyword)
            .map(|(sym, _)| *sym)
    }

    /// The classifier mark
    pub const fn mark(self) -> Mark {
        match self {
            Symbol::Operator => Mark::Operator,
            Symbol::Comma => Mark::Comma,
            Symbol::Semicolon => Mark::Semicolon,
            Symbol::LBrace => Mark::LBrace,
            Symbol::RBrace => Mark::RBrace,
            Symbol::LParen => Mark::LParen,
            Symbol::RParen => Mark::RParen,
            Symbol::LBrack => Mark::LBrack,
            Symbol::RBrack => Mark::RBrack,
            Symbol::Constant => Mark::Constant,
            Symbol::Id => Mark::Id,
            Symbol::Macro => Mark::Macro,
            Symbol::IdOneGeneric => Mark::Generic1,
            Symbol::IdTwoGenerics => Mark::Generic2,
            Symbol::IdThreeGenerics => Mark::Generic3,
            Symbol::Struct | Symbol::Union | Symbol::Enum => Mark::Tag,
            Symbol::Typedef => Mark::Typedef,
            Symbol::Static => Mark::Static,
            Symbol::Void => Mark::Void,
            Symbol::Ellipsis => Mark::Ellipsis,
            Symbol::Assignment => Mark::Assign,
            Symbol::LocalInclude => Mark::Include,
            _ => Mark::Doc,
        }
    }

    /// Whether the renderer puts a space on the (left, right) of this symbol.
    /// A space separates two code tokens when the first wants one on its
    /// right and the second on its left.
    pub const fn spacing(self) -> (bool, bool) {
        match self {
            Symbol::Comma | Symbol::Semicolon | Symbol::RParen | Symbol::RBrack => (false, true),
            Symbol::LParen | Symbol::LBrack | Symbol::LocalInclude => (false, false),
            Symbol::Ellipsis | Symbol::MathBegin | Symbol::EmBegin => (true, false),
            Symbol::MathEnd | Symbol::EmEnd => (false, true),
            Symbol::DocBegin
            | Symbol::DocEnd
            | Symbol::Space
            | Symbol::Newline
            | Symbol::ListItem
            | Symbol::Preformatted
            | Symbol::DocLeft
            | Symbol::DocComma
            | Symbol::DocRight => (false, false),
            _ => (true, true),
        }
    }

    /// The render category
    pub const fn category(self) -> Category {
        match self {
            Symbol::IdOneGeneric => Category::Generic(1),
            Symbol::IdTwoGenerics => Category::Generic(2),
            Symbol::IdThreeGenerics => Category::Generic(3),
            Symbol::Escape
            | Symbol::Nbsp
            | Symbol::NbThinsp
            | Symbol::MathCalO
            | Symbol::MathTheta
            | Symbol::MathOmega
            | Symbol::MathTimes
            | Symbol::MathCdot => Category::Escape,
            Symbol::SeeFn | Symbol::SeeTag | Symbol::SeeTypedef | Symbol::SeeData => {
                Category::Reference
            }
            Symbol::Url | Symbol::Cite => Category::Link,
            Symbol::LinkStart | Symbol::ImageStart => Category::Anchor,
            Symbol::DocBegin
            | Symbol::DocEnd
            | Symbol::Space
            | Symbol::Newline
            | Symbol::MathBegin
            | Symbol::MathEnd
            | Symbol::EmBegin
            | Symbol::EmEnd
            | Symbol::ListItem
            | Symbol::Preformatted
            | Symbol::DocLeft
            | Symbol::DocComma
            | Symbol::DocRight => Category::Structural,
            s if s.is_attribute() => Category::Attribute,
            _ => Category::Literal,
        }
    }

    /// Symbols produced in the code state
    pub const fn is_code(self) -> bool {
        !matches!(self.mark(), Mark::Doc)
    }

    /// Each-block attribute tags
    pub const fn is_attribute(self) -> bool {
        matches!(
            self,
            Symbol::AttSubtitle
                | Symbol::AttParam
                | Symbol::AttAuthor
                | Symbol::AttStd
                | Symbol::AttDepend
                | Symbol::AttFixme
                | Symbol::AttReturn
                | Symbol::AttThrows
                | Symbol::AttImplements
                | Symbol::AttOrder
                | Symbol::AttAllow
                | Symbol::AttLicense
                | Symbol::AttCf
                | Symbol::AttAbstract
        )
    }

    /// Number of type arguments a generic identifier expects
    pub const fn generic_arity(self) -> Option<usize> {
        self.mark().generic_arity()
    }

    /// Heading used when an attribute is rendered
    pub const fn heading(self) -> &'static str {
        match self {
            Symbol::AttSubtitle => "Subtitle",
            Symbol::AttParam => "Parameter",
            Symbol::AttAuthor => "Author",
            Symbol::AttStd => "Standard",
            Symbol::AttDepend => "Dependencies",
            Symbol::AttFixme => "Caveat",
            Symbol::AttReturn => "Return",
            Symbol::AttThrows => "Exceptional return",
            Symbol::AttImplements => "Implements",
            Symbol::AttOrder => "Order",
            Symbol::AttAllow => "Allow",
            Symbol::AttLicense => "License",
            Symbol::AttCf => "See also",
            Symbol::AttAbstract => "Abstract",
            _ => "",
        }
    }
}

impl std::fmt::Display for Symbol {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{self:?}")
    }
}
