//! Shared leaf nodes.

use hackbc_core::Span;
use std::fmt;

/// An identifier with its position.
///
/// Variable identifiers keep their `$` sigil (`$x`); class, function,
/// method and label identifiers do not.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct Ident<'ast> {
    /// The identifier text.
    pub name: &'ast str,
    /// Source location
    pub span: Span,
}

impl<'ast> Ident<'ast> {
    /// Create an identifier.
    pub fn new(name: &'ast str, span: Span) -> Self {
        Self { name, span }
    }

    /// Create an identifier without a source position.
    pub fn synthetic(name: &'ast str) -> Self {
        Self {
            name,
            span: Span::default(),
        }
    }
}

impl fmt::Debug for Ident<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}@{:?}", self.name, self.span)
    }
}

impl fmt::Display for Ident<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name)
    }
}
