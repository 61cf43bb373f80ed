//! The statement emitter seam.
//!
//! Control-flow and expression emission live outside this crate. The body
//! assembler calls a [`StmtEmitter`] for the statements of a body and for
//! parameter default values and non-literal static initializers.
//!
//! # Contract
//!
//! - Use `state.labels`, `state.iterators` and `state.locals` for every
//!   allocation, so numbering is per body.
//! - Resolve `break`/`continue`/`goto` through `state.jumps`.
//! - Read `state.config` to emit `return` (verification, inout epilogue,
//!   default return value) and the dropthrough at the end of the body.
//! - Emit `try`/`finally` as [`Instruct::TryFault`](hackbc_core::Instruct::TryFault);
//!   the assembler flattens the handlers.
//! - Emit user labels and `goto` targets as
//!   [`Label::Named`](hackbc_core::Label::Named); the assembler renumbers them.
//! - Emit `static` declarations with
//!   [`emit_static_decl`](crate::static_vars::emit_static_decl).

use hackbc_ast::ast::{Expr, Stmt};
use hackbc_core::{CompileError, InstrSeq};

use crate::emit::EmitState;
use crate::env::Env;

type Result<T> = std::result::Result<T, CompileError>;

/// Turns statements and expressions into instructions.
pub trait StmtEmitter<'ast> {
    /// Emit the statements of a body, including its dropthrough.
    fn emit_stmts(
        &mut self,
        state: &mut EmitState,
        env: &Env<'_, 'ast>,
        stmts: &'ast [Stmt<'ast>],
    ) -> Result<InstrSeq>;

    /// Emit one expression, leaving its value on the stack.
    fn emit_expr(
        &mut self,
        state: &mut EmitState,
        env: &Env<'_, 'ast>,
        expr: &'ast Expr<'ast>,
    ) -> Result<InstrSeq>;
}
