//! Namespace-use merging.
//!
//! A `use` declaration extends the alias maps of the namespace context in
//! effect. Re-binding a name to the same target is accepted; binding it to
//! a different target is a fatal error. Merging always produces a new
//! context and leaves the previous one untouched.

use hackbc_ast::ast::{NamespaceDef, NamespaceUseDecl};
use hackbc_core::{CompileError, NamespaceEnv, UseKind};
use tracing::trace;

type Result<T> = std::result::Result<T, CompileError>;

/// Apply a `use` declaration to `env`.
pub fn merge_uses(env: &NamespaceEnv, decl: &NamespaceUseDecl<'_>) -> Result<NamespaceEnv> {
    let mut merged = env.clone();
    for kind in UseKind::ALL {
        for clause in decl.uses.iter().filter(|u| u.kind == kind) {
            let (key, target) = (clause.key(), clause.target());
            let uses = merged.uses_mut(kind);
            match uses.get(key) {
                None => {
                    trace!(target: "hackbc::namespace", ?kind, key, target, "use alias");
                    uses.insert(key.to_string(), target.to_string());
                }
                Some(existing) if existing.trim_start_matches('\\') == target => {}
                Some(_) => {
                    return Err(CompileError::parse(
                        clause.target.span,
                        format!(
                            "Cannot use {} as {} because the name is already in use",
                            target, key
                        ),
                    ));
                }
            }
        }
    }
    Ok(merged)
}

/// Context for the body of a `namespace` block.
///
/// Aliases of the enclosing context stay in effect. A nameless block
/// returns to the global namespace.
pub fn enter_namespace(env: &NamespaceEnv, def: &NamespaceDef<'_>) -> NamespaceEnv {
    let name = def
        .name
        .map(|id| id.name.trim_start_matches('\\'))
        .filter(|n| !n.is_empty())
        .map(str::to_string);
    NamespaceEnv {
        name,
        ..env.clone()
    }
}
