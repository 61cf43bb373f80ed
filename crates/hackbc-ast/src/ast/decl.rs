//! Declaration AST nodes.
//!
//! Provides nodes for:
//! - Functions and their parameters
//! - Classes, traits and interfaces with properties and methods
//! - User attributes (`<<__Deprecated("msg")>>`)
//! - Namespaces and `use` declarations

use crate::ast::expr::Expr;
use crate::ast::hint::Hint;
use crate::ast::stmt::Stmt;
use crate::ast::Ident;
use hackbc_core::{Span, UseKind};

/// A top-level item of a program.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Def<'ast> {
    /// Function declaration
    Fun(&'ast FunDef<'ast>),
    /// Class, trait or interface declaration
    Class(&'ast ClassDef<'ast>),
    /// Top-level statement
    Stmt(Stmt<'ast>),
    /// `namespace N { ... }` or `namespace N;`
    Namespace(&'ast NamespaceDef<'ast>),
    /// `use ...;`
    NamespaceUse(&'ast NamespaceUseDecl<'ast>),
}

impl<'ast> Def<'ast> {
    /// Get the span of this item.
    pub fn span(&self) -> Span {
        match self {
            Self::Fun(d) => d.span,
            Self::Class(d) => d.span,
            Self::Stmt(s) => s.span(),
            Self::Namespace(d) => d.span,
            Self::NamespaceUse(d) => d.span,
        }
    }
}

/// A function parameter.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Param<'ast> {
    /// Parameter name (with `$`)
    pub name: Ident<'ast>,
    /// Type hint
    pub hint: Option<Hint<'ast>>,
    /// `...$xs`
    pub is_variadic: bool,
    /// `inout $x`
    pub is_inout: bool,
    /// `&$x`
    pub is_reference: bool,
    /// Default value
    pub default: Option<Expr<'ast>>,
    /// Source location
    pub span: Span,
}

impl<'ast> Param<'ast> {
    /// A required, unhinted parameter.
    pub fn simple(name: Ident<'ast>) -> Self {
        Self {
            name,
            hint: None,
            is_variadic: false,
            is_inout: false,
            is_reference: false,
            default: None,
            span: name.span,
        }
    }
}

/// A generic type parameter.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TParam<'ast> {
    /// Parameter name
    pub name: Ident<'ast>,
}

/// `<<Name(args)>>`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct UserAttribute<'ast> {
    /// Attribute name
    pub name: Ident<'ast>,
    /// Positional arguments
    pub args: &'ast [Expr<'ast>],
}

/// A function declaration (also the signature and body of a lambda).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FunDef<'ast> {
    /// Qualified function name
    pub name: Ident<'ast>,
    /// Generic parameters
    pub tparams: &'ast [TParam<'ast>],
    /// Parameters
    pub params: &'ast [Param<'ast>],
    /// Return type hint
    pub ret: Option<Hint<'ast>>,
    /// Body statements
    pub body: &'ast [Stmt<'ast>],
    /// Declared `async`
    pub is_async: bool,
    /// User attributes
    pub user_attributes: &'ast [UserAttribute<'ast>],
    /// Doc comment
    pub doc_comment: Option<&'ast str>,
    /// Source location
    pub span: Span,
}

/// A method declaration.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MethodDef<'ast> {
    /// Method name
    pub name: Ident<'ast>,
    /// Generic parameters
    pub tparams: &'ast [TParam<'ast>],
    /// Parameters
    pub params: &'ast [Param<'ast>],
    /// Return type hint
    pub ret: Option<Hint<'ast>>,
    /// Body statements
    pub body: &'ast [Stmt<'ast>],
    /// Declared `async`
    pub is_async: bool,
    /// Declared `static`
    pub is_static: bool,
    /// Declared `abstract`
    pub is_abstract: bool,
    /// User attributes
    pub user_attributes: &'ast [UserAttribute<'ast>],
    /// Doc comment
    pub doc_comment: Option<&'ast str>,
    /// Source location
    pub span: Span,
}

/// Kind of a class-like declaration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ClassKind {
    Class,
    AbstractClass,
    Interface,
    Trait,
}

/// A class, trait or interface.
///
/// Closures reach the backend as methods named `__invoke` of a generated
/// class whose properties are the captured variables.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ClassDef<'ast> {
    /// Qualified class name
    pub name: Ident<'ast>,
    /// Class kind
    pub kind: ClassKind,
    /// Generic parameters
    pub tparams: &'ast [TParam<'ast>],
    /// Properties in declaration order
    pub vars: &'ast [ClassVar<'ast>],
    /// Methods in declaration order
    pub methods: &'ast [MethodDef<'ast>],
    /// Source location
    pub span: Span,
}

impl<'ast> ClassDef<'ast> {
    /// Whether this is a trait.
    pub fn is_trait(&self) -> bool {
        self.kind == ClassKind::Trait
    }
}

/// A class property.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ClassVar<'ast> {
    /// Property name (without `$`)
    pub name: Ident<'ast>,
    /// Declared `static`
    pub is_static: bool,
    /// Type hint
    pub hint: Option<Hint<'ast>>,
    /// Source location
    pub span: Span,
}

/// A namespace block or statement.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NamespaceDef<'ast> {
    /// Namespace name; `None` for `namespace { ... }`
    pub name: Option<Ident<'ast>>,
    /// Items inside the namespace
    pub defs: &'ast [Def<'ast>],
    /// Source location
    pub span: Span,
}

/// A `use` declaration with one or more clauses.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NamespaceUseDecl<'ast> {
    /// Individual clauses
    pub uses: &'ast [NamespaceUse<'ast>],
    /// Source location
    pub span: Span,
}

/// One `use` clause: `use function A\f as g`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NamespaceUse<'ast> {
    /// Alias category
    pub kind: UseKind,
    /// Fully qualified target
    pub target: Ident<'ast>,
    /// Explicit alias; defaults to the last segment of the target
    pub alias: Option<Ident<'ast>>,
}

impl<'ast> NamespaceUse<'ast> {
    /// The name this clause binds.
    pub fn key(&self) -> &'ast str {
        match self.alias {
            Some(alias) => alias.name,
            None => {
                let target = self.target.name.trim_start_matches('\\');
                target.rsplit('\\').next().unwrap_or(target)
            }
        }
    }

    /// The target without a leading `\`.
    pub fn target(&self) -> &'ast str {
        self.target.name.trim_start_matches('\\')
    }
}

/// A whole program.
///
/// The program borrows from an arena allocator. All AST nodes are
/// allocated in the arena and remain valid for the lifetime of the arena.
#[derive(Debug, Clone, Copy)]
pub struct Program<'ast> {
    defs: &'ast [Def<'ast>],
    span: Span,
}

impl<'ast> Program<'ast> {
    /// Create a program from its items.
    pub fn new(defs: &'ast [Def<'ast>], span: Span) -> Self {
        Self { defs, span }
    }

    /// Get the top-level items in this program.
    pub fn defs(&self) -> &'ast [Def<'ast>] {
        self.defs
    }

    /// Get the source location span of this program.
    pub fn span(&self) -> Span {
        self.span
    }
}
