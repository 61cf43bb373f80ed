//! HHVM function-body assembler.
//!
//! This crate ties together the workspace:
//!
//! - [`core`]: instructions, bodies, type information and errors
//! - [`ast`]: the arena-allocated AST the assembler reads
//! - [`compiler`]: body assembly and the definition emitters
//!
//! Statement and expression emission is supplied by the caller through
//! [`StmtEmitter`]; everything else needed to turn a definition into a
//! [`FunctionBody`] lives here.

pub use hackbc_ast as ast;
pub use hackbc_compiler as compiler;
pub use hackbc_core as core;

pub use hackbc_compiler::{
    BodyArgs, BodyFlags, CompilerOptions, EmittedBody, Env, GlobalState, Scope, ScopeItem,
    StmtEmitter, Unit, emit_body,
};
pub use hackbc_core::{CompileError, FatalKind, FunctionBody, InstrSeq, Instruct, Result};

use bumpalo::Bump;
use hackbc_ast::Program;
use tracing::info_span;

/// Commonly used items.
pub mod prelude {
    pub use crate::ast::ast::*;
    pub use crate::compiler::definitions::{Function, Main, Method};
    pub use crate::compiler::emit::EmitState;
    pub use crate::{
        BodyArgs, BodyFlags, CompileError, CompilerOptions, Env, FatalKind, FunctionBody,
        InstrSeq, Instruct, Scope, ScopeItem, StmtEmitter, Unit,
    };
}

/// Emit every definition of `program` plus its pseudo-main.
///
/// Stops at the first fatal error.
pub fn compile_program<'ast, E: StmtEmitter<'ast> + ?Sized>(
    emitter: &mut E,
    options: &CompilerOptions,
    arena: &'ast Bump,
    program: &Program<'ast>,
) -> Result<Unit> {
    #[cfg(feature = "profiling")]
    profiling::scope!("compile_program");

    let _span = info_span!(target: "hackbc", "compile_program", defs = program.defs().len())
        .entered();
    hackbc_compiler::emit_program(emitter, options, arena, program)
}
