//! Expression AST nodes.
//!
//! Only the expression forms the body assembler and its analyses inspect
//! are modelled structurally: variables, literals, `yield`, lambdas and
//! the handful of operators a statement emitter needs.

use crate::ast::decl::FunDef;
use crate::ast::{BinaryOp, Ident};
use hackbc_core::Span;

/// An expression.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Expr<'ast> {
    /// `null`
    Null(Span),
    /// `true` / `false`
    Bool(bool, Span),
    /// Integer literal
    Int(i64, Span),
    /// Float literal
    Float(f64, Span),
    /// String literal
    String(&'ast str, Span),
    /// Local variable reference (`$x`, `$this`)
    Lvar(Ident<'ast>),
    /// Binary operation
    Binary(&'ast BinaryExpr<'ast>),
    /// Assignment
    Assign(&'ast AssignExpr<'ast>),
    /// Property access (`$obj->prop`)
    ObjGet(&'ast ObjGetExpr<'ast>),
    /// Function call
    Call(&'ast CallExpr<'ast>),
    /// Object construction (`new C(...)`)
    New(&'ast NewExpr<'ast>),
    /// `yield v` / `yield k => v`
    Yield(&'ast YieldExpr<'ast>),
    /// `await e`
    Await(&'ast AwaitExpr<'ast>),
    /// Anonymous function
    Lambda(&'ast LambdaExpr<'ast>),
    /// Vector literal (`vec[...]`)
    Vec(VecExpr<'ast>),
}

impl<'ast> Expr<'ast> {
    /// Get the span of this expression.
    pub fn span(&self) -> Span {
        match self {
            Self::Null(span)
            | Self::Bool(_, span)
            | Self::Int(_, span)
            | Self::Float(_, span)
            | Self::String(_, span) => *span,
            Self::Lvar(id) => id.span,
            Self::Binary(e) => e.span,
            Self::Assign(e) => e.span,
            Self::ObjGet(e) => e.span,
            Self::Call(e) => e.span,
            Self::New(e) => e.span,
            Self::Yield(e) => e.span,
            Self::Await(e) => e.span,
            Self::Lambda(e) => e.span,
            Self::Vec(e) => e.span,
        }
    }

    /// Whether this expression is a scalar literal.
    pub fn is_literal(&self) -> bool {
        matches!(
            self,
            Self::Null(_) | Self::Bool(..) | Self::Int(..) | Self::Float(..) | Self::String(..)
        )
    }

    /// The variable name, if this is a local variable reference.
    pub fn as_lvar(&self) -> Option<&'ast str> {
        match self {
            Self::Lvar(id) => Some(id.name),
            _ => None,
        }
    }
}

/// A binary operation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BinaryExpr<'ast> {
    /// The operator
    pub op: BinaryOp,
    /// Left operand
    pub left: Expr<'ast>,
    /// Right operand
    pub right: Expr<'ast>,
    /// Source location
    pub span: Span,
}

/// An assignment (`lhs = rhs`).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AssignExpr<'ast> {
    /// Target
    pub target: Expr<'ast>,
    /// Assigned value
    pub value: Expr<'ast>,
    /// Source location
    pub span: Span,
}

/// A property access.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ObjGetExpr<'ast> {
    /// The object expression
    pub object: Expr<'ast>,
    /// Property name (without `$`)
    pub prop: Ident<'ast>,
    /// Source location
    pub span: Span,
}

/// A call to a named function.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CallExpr<'ast> {
    /// The called function
    pub callee: Ident<'ast>,
    /// Arguments
    pub args: &'ast [Expr<'ast>],
    /// Source location
    pub span: Span,
}

/// `new C(args)`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NewExpr<'ast> {
    /// Class name
    pub class: Ident<'ast>,
    /// Constructor arguments
    pub args: &'ast [Expr<'ast>],
    /// Source location
    pub span: Span,
}

/// A `yield` expression.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct YieldExpr<'ast> {
    /// Key for `yield k => v`
    pub key: Option<Expr<'ast>>,
    /// Yielded value
    pub value: Expr<'ast>,
    /// Source location
    pub span: Span,
}

/// An `await` expression.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AwaitExpr<'ast> {
    /// The awaited expression
    pub expr: Expr<'ast>,
    /// Source location
    pub span: Span,
}

/// An anonymous function.
///
/// Long lambdas (`function() use ($x) {...}`) list captures explicitly;
/// short lambdas (`$x ==> $x + $y`) carry the capture list computed by
/// the front end. Either way `uses` is what the enclosing body must hold.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LambdaExpr<'ast> {
    /// Parameters, return hint and body
    pub fun: &'ast FunDef<'ast>,
    /// Captured variables (with `$`)
    pub uses: &'ast [Ident<'ast>],
    /// Whether this is a `==>` lambda
    pub is_short: bool,
    /// Source location
    pub span: Span,
}

/// A vector literal.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VecExpr<'ast> {
    /// Elements
    pub elems: &'ast [Expr<'ast>],
    /// Source location
    pub span: Span,
}
