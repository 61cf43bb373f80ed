//! AST crate for the bytecode backend.
//!
//! The front end (parser, naming, closure conversion) produces these nodes
//! into a [`bumpalo`] arena; the compiler crate only reads them.

pub mod ast;

// Re-export commonly used types at crate root
pub use ast::{ClassDef, Def, Expr, FunDef, Hint, Ident, MethodDef, Program, Stmt, Visitor};
