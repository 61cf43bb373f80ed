//! Abstract Syntax Tree (AST) consumed by the backend.
//!
//! This module provides:
//! - AST node definitions for declarations, statements, expressions and hints
//! - Visitor pattern for AST traversal
//!
//! All nodes are `Copy` and borrow their children from an arena:
//!
//! ```
//! use bumpalo::Bump;
//! use hackbc_ast::ast::*;
//! use hackbc_core::Span;
//!
//! let arena = Bump::new();
//! let ret = arena.alloc(ReturnStmt { value: Some(Expr::Int(1, Span::default())), span: Span::default() });
//! let body = arena.alloc_slice_copy(&[Stmt::Return(*ret)]);
//! assert_eq!(body.len(), 1);
//! ```

pub mod decl;
pub mod expr;
pub mod hint;
pub mod node;
pub mod ops;
pub mod stmt;
pub mod visitor;

pub use decl::*;
pub use expr::*;
pub use hint::*;
pub use node::*;
pub use ops::*;
pub use stmt::*;
pub use visitor::*;
