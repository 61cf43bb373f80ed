//! Type hint resolution.
//!
//! Converts an AST [`Hint`] into the [`TypeInfo`] stored on parameters and
//! return values: a user-facing type string plus the constraint the VM
//! enforces.
//!
//! | Hint | Constraint name | Flags |
//! |------|-----------------|-------|
//! | `int`, `string`, ... | `HH\int`, `HH\string`, ... | |
//! | `mixed`, `void`, `noreturn`, `dynamic`, `nothing` | none | |
//! | `T` (generic) | none | type-var |
//! | `?T` | as `T` | + nullable |
//! | `@T` | as `T` | + soft, extended-hint |
//! | `(A, B)` | none | extended-hint |
//! | `this::T` | none | type-constant, extended-hint |
//! | `Foo` | resolved class name | |
//!
//! With `skipawaitable` (async return types), `Awaitable<T>` resolves as
//! `T` and a bare `Awaitable` resolves to the "no hint" sentinel.

use hackbc_ast::ast::{Hint, HintKind};
use hackbc_core::{
    CompileError, NamespaceEnv, TypeConstraint, TypeConstraintFlags, TypeInfo,
};

type Result<T> = std::result::Result<T, CompileError>;

/// Where a hint appears.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TypeInfoKind {
    Param,
    Return,
    Property,
}

const PRIMITIVES: &[&str] = &[
    "int", "bool", "float", "string", "num", "arraykey", "resource", "vec", "dict", "keyset",
    "nonnull", "varray", "darray", "varray_or_darray", "this",
];

const UNCONSTRAINED: &[&str] = &["mixed", "void", "noreturn", "dynamic", "nothing"];

const RETURN_ONLY: &[&str] = &["void", "noreturn"];

/// Types that resolve into `HH\` from any namespace.
const AUTOIMPORTED: &[&str] = &[
    "Awaitable",
    "Traversable",
    "KeyedTraversable",
    "Iterator",
    "KeyedIterator",
    "Container",
    "KeyedContainer",
    "Vector",
    "Map",
    "Set",
    "Pair",
];

const SPECIAL_CLASSES: &[&str] = &["self", "parent", "static"];

// ============================================================================
// Name resolution
// ============================================================================

fn strip_hh(name: &str) -> &str {
    let name = name.trim_start_matches('\\');
    name.strip_prefix("HH\\").unwrap_or(name)
}

/// Whether `name` refers to `HH\Awaitable`.
pub fn is_awaitable_name(name: &str) -> bool {
    strip_hh(name) == "Awaitable"
}

/// Resolve a class name against the namespace and its `use` aliases.
pub fn resolve_class_name(name: &str, namespace: &NamespaceEnv) -> String {
    if let Some(absolute) = name.strip_prefix('\\') {
        return absolute.to_string();
    }
    if SPECIAL_CLASSES.contains(&name) {
        return name.to_string();
    }
    match name.split_once('\\') {
        None => {
            if let Some(target) = namespace.class_uses.get(name) {
                target.trim_start_matches('\\').to_string()
            } else if AUTOIMPORTED.contains(&name) {
                format!("HH\\{}", name)
            } else {
                namespace.qualify(name)
            }
        }
        Some((first, rest)) => match namespace.ns_uses.get(first) {
            Some(target) => format!("{}\\{}", target.trim_start_matches('\\'), rest),
            None => namespace.qualify(name),
        },
    }
}

/// Resolved name of an applied hint, without constraint classification.
fn resolve_applied(name: &str, tparams: &[&str], namespace: &NamespaceEnv) -> String {
    let bare = strip_hh(name);
    if tparams.contains(&name) {
        name.to_string()
    } else if PRIMITIVES.contains(&bare) || UNCONSTRAINED.contains(&bare) {
        format!("HH\\{}", bare)
    } else {
        resolve_class_name(name, namespace)
    }
}

// ============================================================================
// Formatting
// ============================================================================

/// The user-facing type string of a hint.
pub fn fmt_hint(hint: &Hint<'_>, tparams: &[&str], namespace: &NamespaceEnv) -> String {
    match hint.kind {
        HintKind::Apply { name, targs } => {
            let base = resolve_applied(name.name, tparams, namespace);
            if targs.is_empty() {
                base
            } else {
                let args: Vec<String> = targs
                    .iter()
                    .map(|h| fmt_hint(h, tparams, namespace))
                    .collect();
                format!("{}<{}>", base, args.join(", "))
            }
        }
        HintKind::Option(inner) => format!("?{}", fmt_hint(inner, tparams, namespace)),
        HintKind::Soft(inner) => format!("@{}", fmt_hint(inner, tparams, namespace)),
        HintKind::Tuple(elems) => {
            let elems: Vec<String> = elems
                .iter()
                .map(|h| fmt_hint(h, tparams, namespace))
                .collect();
            format!("({})", elems.join(", "))
        }
        HintKind::Access { root, names } => {
            let mut out = root.name.to_string();
            for n in names {
                out.push_str("::");
                out.push_str(n.name);
            }
            out
        }
    }
}

// ============================================================================
// Constraints
// ============================================================================

fn hint_to_type_constraint(
    hint: &Hint<'_>,
    kind: TypeInfoKind,
    tparams: &[&str],
    namespace: &NamespaceEnv,
) -> Result<TypeConstraint> {
    match hint.kind {
        HintKind::Apply { name, .. } => {
            let bare = strip_hh(name.name);
            if tparams.contains(&name.name) {
                Ok(TypeConstraint::unnamed(TypeConstraintFlags::TYPE_VAR))
            } else if RETURN_ONLY.contains(&bare) && kind != TypeInfoKind::Return {
                Err(CompileError::parse(
                    hint.span,
                    format!("'{}' can only be used as a return type", bare),
                ))
            } else if UNCONSTRAINED.contains(&bare) {
                Ok(TypeConstraint::default())
            } else {
                Ok(TypeConstraint::named(
                    resolve_applied(name.name, tparams, namespace),
                    TypeConstraintFlags::empty(),
                ))
            }
        }
        HintKind::Option(inner) => {
            let mut tc = hint_to_type_constraint(inner, kind, tparams, namespace)?;
            tc.flags |= TypeConstraintFlags::NULLABLE;
            Ok(tc)
        }
        HintKind::Soft(inner) => {
            let mut tc = hint_to_type_constraint(inner, kind, tparams, namespace)?;
            tc.flags |= TypeConstraintFlags::SOFT | TypeConstraintFlags::EXTENDED_HINT;
            Ok(tc)
        }
        HintKind::Tuple(_) => Ok(TypeConstraint::unnamed(TypeConstraintFlags::EXTENDED_HINT)),
        HintKind::Access { .. } => Ok(TypeConstraint::unnamed(
            TypeConstraintFlags::TYPE_CONSTANT | TypeConstraintFlags::EXTENDED_HINT,
        )),
    }
}

/// Resolve a hint into type information.
///
/// `nullable` adds the nullable flag (parameters defaulting to `null`).
/// `skipawaitable` unwraps `Awaitable<T>` for async return types.
pub fn hint_to_type_info(
    hint: &Hint<'_>,
    kind: TypeInfoKind,
    nullable: bool,
    skipawaitable: bool,
    tparams: &[&str],
    namespace: &NamespaceEnv,
) -> Result<TypeInfo> {
    if skipawaitable {
        match hint.kind {
            HintKind::Apply { name, targs } if is_awaitable_name(name.name) => match targs {
                [] => return Ok(TypeInfo::empty()),
                [inner] => {
                    return hint_to_type_info(inner, kind, nullable, false, tparams, namespace);
                }
                _ => {}
            },
            HintKind::Option(inner) if is_awaitable_hint(inner) => {
                let mut info = hint_to_type_info(inner, kind, nullable, true, tparams, namespace)?;
                if info.has_type_constraint() {
                    info = info.make_nullable();
                    info.user_type = info.user_type.map(|t| {
                        if t.starts_with('?') {
                            t
                        } else {
                            format!("?{}", t)
                        }
                    });
                }
                return Ok(info);
            }
            HintKind::Soft(inner) if is_awaitable_hint(inner) => {
                let mut info = hint_to_type_info(inner, kind, nullable, true, tparams, namespace)?;
                if info.has_type_constraint() {
                    info.type_constraint.flags |=
                        TypeConstraintFlags::SOFT | TypeConstraintFlags::EXTENDED_HINT;
                    info.user_type = info.user_type.map(|t| format!("@{}", t));
                }
                return Ok(info);
            }
            _ => {}
        }
    }

    let mut tc = hint_to_type_constraint(hint, kind, tparams, namespace)?;
    if nullable {
        tc.flags |= TypeConstraintFlags::NULLABLE;
    }
    Ok(TypeInfo::new(Some(fmt_hint(hint, tparams, namespace)), tc))
}

/// Whether a hint denotes `Awaitable` or `Awaitable<T>`, seen through
/// nullable and soft wrappers.
pub fn is_awaitable_hint(hint: &Hint<'_>) -> bool {
    match hint.kind {
        HintKind::Apply { name, targs } => is_awaitable_name(name.name) && targs.len() <= 1,
        HintKind::Option(inner) | HintKind::Soft(inner) => is_awaitable_hint(inner),
        _ => false,
    }
}
