//! Type hint AST nodes.
//!
//! Hints appear on parameters, return types and class properties:
//!
//! - `int`, `Foo`, `\Lib\Foo` (plain names)
//! - `Awaitable<int>`, `vec<T>` (generic application)
//! - `?int` (nullable), `@int` (soft)
//! - `(int, string)` (tuple)
//! - `this::T` (type constant access)

use crate::ast::Ident;
use hackbc_core::Span;

/// A type hint.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Hint<'ast> {
    /// The kind of hint.
    pub kind: HintKind<'ast>,
    /// Source location
    pub span: Span,
}

/// The shape of a type hint.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum HintKind<'ast> {
    /// A named type with optional type arguments.
    Apply {
        /// The type name as written.
        name: Ident<'ast>,
        /// Type arguments.
        targs: &'ast [Hint<'ast>],
    },
    /// `?T`
    Option(&'ast Hint<'ast>),
    /// `@T`
    Soft(&'ast Hint<'ast>),
    /// `(T1, T2, ...)`
    Tuple(&'ast [Hint<'ast>]),
    /// `Root::A::B`
    Access {
        /// The root (`this`, `self` or a class name).
        root: Ident<'ast>,
        /// The chain of type constant names.
        names: &'ast [Ident<'ast>],
    },
}

impl<'ast> Hint<'ast> {
    /// Create a hint.
    pub fn new(kind: HintKind<'ast>, span: Span) -> Self {
        Self { kind, span }
    }

    /// A plain named hint without type arguments.
    pub fn named(name: &'ast str, span: Span) -> Self {
        Self {
            kind: HintKind::Apply {
                name: Ident::new(name, span),
                targs: &[],
            },
            span,
        }
    }

    /// The applied name, if this is a named hint.
    pub fn name(&self) -> Option<&'ast str> {
        match self.kind {
            HintKind::Apply { name, .. } => Some(name.name),
            _ => None,
        }
    }
}
