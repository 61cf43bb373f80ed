//! Return-type information and async return checks.

use hackbc_ast::ast::Hint;
use hackbc_core::{CompileError, InstrSeq, Instruct, NamespaceEnv, TypeInfo};

use crate::scope::{Scope, ScopeItem};
use crate::type_hint::{TypeInfoKind, hint_to_type_info, is_awaitable_hint};

type Result<T> = std::result::Result<T, CompileError>;

/// Type information for a body's return value.
///
/// A missing hint yields the "no hint" sentinel.
pub fn emit_return_type_info(
    hint: Option<&Hint<'_>>,
    tparams: &[&str],
    skipawaitable: bool,
    namespace: &NamespaceEnv,
) -> Result<TypeInfo> {
    match hint {
        None => Ok(TypeInfo::empty()),
        Some(hint) => hint_to_type_info(
            hint,
            TypeInfoKind::Return,
            false,
            skipawaitable,
            tparams,
            namespace,
        ),
    }
}

/// Reject async definitions whose return hint is not an awaitable.
pub fn check_async_return_hint(
    scope: &Scope<'_>,
    hint: Option<&Hint<'_>>,
    is_async: bool,
    skipawaitable: bool,
) -> Result<()> {
    let hint = match hint {
        Some(hint) if is_async && skipawaitable && !is_awaitable_hint(hint) => hint,
        _ => return Ok(()),
    };

    let what = match scope.items() {
        [ScopeItem::Function(fd), ..] => format!("function {}()", fd.name.name),
        [ScopeItem::Lambda(_), ..] => "closure".to_string(),
        [ScopeItem::Method(..), ..] if scope.is_closure_body() => "closure".to_string(),
        [ScopeItem::Method(md, cd), ..] => format!(
            "method {}::{}()",
            cd.name.name.trim_start_matches('\\'),
            md.name.name
        ),
        _ => {
            return Err(CompileError::internal(
                "async return check in an unexpected scope",
            ));
        }
    };
    Err(CompileError::runtime(
        hint.span,
        format!("Return type hint for async {} must be awaitable", what),
    ))
}

/// Whether `return` must verify the returned value.
pub fn should_verify_return(info: &TypeInfo, is_generator: bool) -> bool {
    info.has_type_constraint() && !info.is_empty_hint() && !is_generator
}

/// Dropthrough for the end of the body.
///
/// A supplied dropthrough wins. Async bodies that verify their return get
/// an explicit verified `null` return.
pub fn default_dropthrough(
    supplied: Option<InstrSeq>,
    is_async: bool,
    verify_return: bool,
) -> Option<InstrSeq> {
    match supplied {
        Some(code) => Some(code),
        None if is_async && verify_return => Some(InstrSeq::from(vec![
            Instruct::Null,
            Instruct::VerifyRetTypeC,
            Instruct::RetC,
        ])),
        None => None,
    }
}
