//! Core types shared by the bytecode backend.
//!
//! This crate provides:
//! - [`Span`] for source positions
//! - [`CompileError`] and the [`Result`] alias
//! - The instruction model: [`Instruct`], [`InstrSeq`], [`Label`], [`Local`]
//! - Type information: [`TypeInfo`], [`TypeConstraint`]
//! - Definition records: [`Param`], [`FunctionBody`]
//! - [`DefHash`] / [`FunctionStateKey`] identity for cross-body registries
//! - [`NamespaceEnv`], the namespace and alias context

pub mod body;
pub mod def_hash;
pub mod error;
pub mod instr_seq;
pub mod instruct;
pub mod namespace_env;
pub mod param;
pub mod span;
pub mod type_info;
pub mod typed_value;

pub use body::{BodyEnv, FunctionBody};
pub use def_hash::{DefHash, FunctionStateKey, TOPLEVEL_ID};
pub use error::{CompileError, FatalKind, Result};
pub use instr_seq::InstrSeq;
pub use instruct::{ClsRefSlot, ErrorLevel, FaultRegion, Instruct, IterId, Label, Local, ParamId};
pub use namespace_env::{NamespaceEnv, UseKind};
pub use param::{DefaultValue, Param};
pub use span::Span;
pub use type_info::{TypeConstraint, TypeConstraintFlags, TypeInfo};
pub use typed_value::TypedValue;
