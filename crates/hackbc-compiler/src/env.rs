//! Emission environment threaded through statement emission.

use hackbc_core::{BodyEnv, NamespaceEnv};

use crate::scope::Scope;

/// Read-only context for emitting one body.
///
/// Built once per body by the assembler and never modified afterwards.
#[derive(Debug, Clone, Copy)]
pub struct Env<'a, 'ast> {
    /// Namespace and alias context.
    pub namespace: &'a NamespaceEnv,
    /// Lexical scope of the body.
    pub scope: &'a Scope<'ast>,
    /// Whether `$this` lives in a local.
    pub needs_local_this: bool,
    /// Variables named in a closure's `use` list.
    pub explicit_uses: &'a [String],
}

impl<'a, 'ast> Env<'a, 'ast> {
    /// Environment with no local `$this` and no explicit uses.
    pub fn new(namespace: &'a NamespaceEnv, scope: &'a Scope<'ast>) -> Self {
        Self {
            namespace,
            scope,
            needs_local_this: false,
            explicit_uses: &[],
        }
    }

    pub fn with_needs_local_this(self, needs_local_this: bool) -> Self {
        Self {
            needs_local_this,
            ..self
        }
    }

    pub fn with_explicit_uses(self, explicit_uses: &'a [String]) -> Self {
        Self {
            explicit_uses,
            ..self
        }
    }

    /// Lifetime-free copy kept with the finished body.
    pub fn snapshot(&self) -> BodyEnv {
        BodyEnv {
            namespace: self.namespace.clone(),
            needs_local_this: self.needs_local_this,
            explicit_uses: self.explicit_uses.to_vec(),
        }
    }
}
