//! Statement AST nodes.
//!
//! Provides nodes for:
//! - Expression and `echo` statements
//! - Control flow (if, while, foreach, break, continue, return)
//! - Exception handling (try/catch/finally, throw)
//! - `static` and `unset` declarations
//! - `goto` and user labels
//! - Blocks

use crate::ast::Ident;
use crate::ast::expr::Expr;
use hackbc_core::Span;

/// A statement.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Stmt<'ast> {
    /// Expression statement (expr;)
    Expr(ExprStmt<'ast>),
    /// `echo a, b;`
    Echo(EchoStmt<'ast>),
    /// Return statement
    Return(ReturnStmt<'ast>),
    /// Break statement
    Break(Span),
    /// Continue statement
    Continue(Span),
    /// Block statement
    Block(Block<'ast>),
    /// If statement
    If(&'ast IfStmt<'ast>),
    /// While loop
    While(&'ast WhileStmt<'ast>),
    /// Foreach loop
    Foreach(&'ast ForeachStmt<'ast>),
    /// Try/catch/finally
    Try(&'ast TryStmt<'ast>),
    /// `throw e;`
    Throw(ExprStmt<'ast>),
    /// `static $x = init, $y;`
    Static(StaticStmt<'ast>),
    /// `unset($x);`
    Unset(UnsetStmt<'ast>),
    /// `label:`
    GotoLabel(Ident<'ast>),
    /// `goto label;`
    Goto(Ident<'ast>),
    /// Empty statement
    Noop(Span),
}

impl<'ast> Stmt<'ast> {
    /// Get the span of this statement.
    pub fn span(&self) -> Span {
        match self {
            Self::Expr(s) | Self::Throw(s) => s.span,
            Self::Echo(s) => s.span,
            Self::Return(s) => s.span,
            Self::Break(span) | Self::Continue(span) | Self::Noop(span) => *span,
            Self::Block(s) => s.span,
            Self::If(s) => s.span,
            Self::While(s) => s.span,
            Self::Foreach(s) => s.span,
            Self::Try(s) => s.span,
            Self::Static(s) => s.span,
            Self::Unset(s) => s.span,
            Self::GotoLabel(id) | Self::Goto(id) => id.span,
        }
    }
}

/// An expression statement.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ExprStmt<'ast> {
    /// The expression
    pub expr: Expr<'ast>,
    /// Source location
    pub span: Span,
}

/// `echo` with one or more arguments.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EchoStmt<'ast> {
    /// Printed expressions
    pub args: &'ast [Expr<'ast>],
    /// Source location
    pub span: Span,
}

/// A return statement.
///
/// Examples:
/// - `return;`
/// - `return expr;`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ReturnStmt<'ast> {
    /// Optional return value
    pub value: Option<Expr<'ast>>,
    /// Source location
    pub span: Span,
}

/// A block of statements.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Block<'ast> {
    /// Statements in the block
    pub stmts: &'ast [Stmt<'ast>],
    /// Source location
    pub span: Span,
}

impl<'ast> Block<'ast> {
    /// A block with no statements.
    pub fn empty(span: Span) -> Self {
        Self { stmts: &[], span }
    }
}

/// An if statement.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct IfStmt<'ast> {
    /// Condition
    pub condition: Expr<'ast>,
    /// Then branch
    pub then_branch: Block<'ast>,
    /// Else branch (empty when absent)
    pub else_branch: Block<'ast>,
    /// Source location
    pub span: Span,
}

/// A while loop.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WhileStmt<'ast> {
    /// Condition
    pub condition: Expr<'ast>,
    /// Loop body
    pub body: Block<'ast>,
    /// Source location
    pub span: Span,
}

/// `foreach ($collection as $key => $value)`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ForeachStmt<'ast> {
    /// Iterated collection
    pub collection: Expr<'ast>,
    /// Key binding
    pub key: Option<Expr<'ast>>,
    /// Value binding
    pub value: Expr<'ast>,
    /// Loop body
    pub body: Block<'ast>,
    /// Source location
    pub span: Span,
}

/// A try statement with catch clauses and an optional finally block.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TryStmt<'ast> {
    /// Protected block
    pub body: Block<'ast>,
    /// Catch clauses
    pub catches: &'ast [CatchClause<'ast>],
    /// Finally block (empty when absent)
    pub finally: Block<'ast>,
    /// Source location
    pub span: Span,
}

impl<'ast> TryStmt<'ast> {
    /// Whether a non-empty `finally` is present.
    pub fn has_finally(&self) -> bool {
        !self.finally.stmts.is_empty()
    }
}

/// `catch (C $e) { ... }`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CatchClause<'ast> {
    /// Caught class
    pub class: Ident<'ast>,
    /// Bound variable (with `$`)
    pub var: Ident<'ast>,
    /// Handler body
    pub body: Block<'ast>,
    /// Source location
    pub span: Span,
}

/// `static $a = 1, $b;`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StaticStmt<'ast> {
    /// Declared variables
    pub vars: &'ast [StaticVar<'ast>],
    /// Source location
    pub span: Span,
}

/// One variable in a `static` declaration.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StaticVar<'ast> {
    /// Variable name (with `$`)
    pub name: Ident<'ast>,
    /// Initializer
    pub init: Option<Expr<'ast>>,
}

/// `unset($a, $b);`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct UnsetStmt<'ast> {
    /// Unset expressions
    pub targets: &'ast [Expr<'ast>],
    /// Source location
    pub span: Span,
}
