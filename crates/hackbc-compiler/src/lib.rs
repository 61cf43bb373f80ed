//! Function-body assembler for the bytecode backend.
//!
//! Turns the AST of one definition (function, method, closure body or
//! top-level code) into a [`FunctionBody`](hackbc_core::FunctionBody):
//! parameters with default-value entry points, declared variables, the
//! instruction stream with prologue and fault handlers, and the counters
//! the VM needs.
//!
//! ## Modules
//!
//! - [`emit_body`]: the assembler driving every pass
//! - [`definitions`]: functions, methods, closures, pseudo-main and programs
//! - [`emitter`]: the [`StmtEmitter`] seam for statement emission
//! - [`emit`]: per-body counters and the statement emitter's config
//! - [`params`]: parameters, prologue and default-value setters
//! - [`decl_vars`]: declared-variable resolution
//! - [`type_hint`] / [`return_type`]: hint resolution and return checks
//! - [`static_vars`]: static locals and their deferred initializers
//! - [`labels`] / [`fault`]: label rewriting and fault-handler extraction
//! - [`namespace_uses`]: `use` merging
//! - [`global_state`]: per-program registries
//!
//! ## Example
//!
//! ```
//! use hackbc_compiler::{BodyFlags, CompilerOptions};
//!
//! let options = CompilerOptions::default();
//! assert!(options.relabel);
//! assert!(BodyFlags::ASYNC.contains(BodyFlags::ASYNC));
//! ```

pub mod decl_vars;
pub mod definitions;
pub mod deprecation;
pub mod emit;
pub mod emit_body;
pub mod emitter;
pub mod env;
pub mod fault;
pub mod generator;
pub mod global_state;
pub mod labels;
pub mod namespace_uses;
pub mod options;
pub mod params;
pub mod return_type;
pub mod scope;
pub mod static_vars;
pub mod type_hint;

#[cfg(test)]
mod test_support;

pub use definitions::{
    Attribute, Function, Main, Method, Unit, emit_function, emit_main, emit_method,
    emit_method_in_scope, emit_program,
};
pub use emit::{EmitState, StmtConfig};
pub use emit_body::{BodyArgs, BodyFlags, EmittedBody, emit_body};
pub use emitter::StmtEmitter;
pub use env::Env;
pub use global_state::GlobalState;
pub use options::CompilerOptions;
pub use scope::{Scope, ScopeItem};

// Re-export the error type from core for convenience
pub use hackbc_core::{CompileError, Result};
