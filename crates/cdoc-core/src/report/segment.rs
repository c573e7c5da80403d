//! Segments and their attributes

use crate::generic::{demangle, DemangleError};
use crate::scanner::Token;
use crate::semantic::Division;
use crate::source::SourceMap;
use crate::symbol::Symbol;

/// An each-block attribute such as `@param[a, b] text`
#[derive(Debug, Clone, PartialEq)]
pub struct Attribute {
    /// The `@keyword` token
    pub tag: Token,
    /// Names from a bracketed list
    pub header: Vec<Token>,
    /// Free text following the tag
    pub contents: Vec<Token>,
}

impl Attribute {
    pub fn new(tag: Token) -> Self {
        Self {
            tag,
            header: Vec::new(),
            contents: Vec::new(),
        }
    }
}

/// One documented statement, or documentation bound to the file
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Segment {
    pub division: Division,
    /// Prose, with whitespace already collapsed
    pub doc: Vec<Token>,
    /// The statement; function bodies are left out
    pub code: Vec<Token>,
    /// Indices into `code`: the title, then parameter names
    pub code_params: Vec<usize>,
    pub attributes: Vec<Attribute>,
}

impl Segment {
    /// No documentation, attributes or code
    pub fn is_empty(&self) -> bool {
        self.doc.is_empty() && self.code.is_empty() && self.attributes.is_empty()
    }

    /// Any prose or attributes
    pub fn is_documented(&self) -> bool {
        !self.doc.is_empty() || !self.attributes.is_empty()
    }

    /// Declared `static`
    pub fn is_static(&self) -> bool {
        self.code.first().is_some_and(|t| t.symbol == Symbol::Static)
    }

    /// The token naming this segment
    pub fn title_token(&self) -> Option<&Token> {
        self.code_params.first().and_then(|&i| self.code.get(i))
    }

    /// Parameter name tokens of a function
    pub fn params(&self) -> impl Iterator<Item = &Token> {
        self.code_params
            .iter()
            .skip(1)
            .filter_map(|&i| self.code.get(i))
    }

    /// Attributes with the given tag
    pub fn attributes_of(&self, tag: Symbol) -> impl Iterator<Item = &Attribute> {
        self.attributes.iter().filter(move |a| a.tag.symbol == tag)
    }

    /// The display name, with generic names demangled
    ///
    /// # Errors
    /// Returns an error if the title is a malformed generic name.
    pub fn title(&self, sources: &SourceMap) -> Result<Option<String>, DemangleError> {
        let Some(&at) = self.code_params.first() else {
            return Ok(None);
        };
        let Some(token) = self.code.get(at) else {
            return Ok(None);
        };
        if token.symbol.generic_arity().is_some() {
            return demangle(&self.code, at, sources).map(|d| Some(d.text));
        }
        Ok(Some(sources.slice(token.source, token.span).to_string()))
    }
}
