//! The assembled function body.

use crate::{InstrSeq, NamespaceEnv, Param, TypeInfo};

/// Environment details kept alongside a body for later stages.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct BodyEnv {
    /// Namespace context the body was emitted in.
    pub namespace: NamespaceEnv,
    /// Whether the body keeps `$this` in a local.
    pub needs_local_this: bool,
    /// Variables captured by an explicit `use` list (closures only).
    pub explicit_uses: Vec<String>,
}

/// A fully assembled body, ready for serialization.
///
/// Constructed once per definition; never modified afterwards.
#[derive(Debug, Clone, PartialEq)]
pub struct FunctionBody {
    /// The instruction stream, fault handlers last.
    pub instrs: InstrSeq,
    /// Named locals beyond the parameters, in slot order.
    pub decl_vars: Vec<String>,
    /// Number of iterators used.
    pub num_iters: u32,
    /// Number of distinct class-reference slots used.
    pub num_cls_ref_slots: u32,
    /// Whether this is a generated memoization wrapper.
    pub is_memoize_wrapper: bool,
    pub params: Vec<Param>,
    pub return_type_info: Option<TypeInfo>,
    /// Names of static locals, in first-seen order.
    pub static_inits: Vec<String>,
    pub doc_comment: Option<String>,
    pub env: Option<BodyEnv>,
}

impl FunctionBody {
    /// Total number of named locals (parameters plus declared variables).
    pub fn num_named_locals(&self) -> usize {
        self.params.len() + self.decl_vars.len()
    }
}
