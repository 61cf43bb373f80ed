//! `__Deprecated` warnings.
//!
//! A deprecated definition starts by calling the runtime's
//! `trigger_sampled_error` with its message, sampling rate and the
//! user-deprecated severity.

use hackbc_core::{
    ClsRefSlot, CompileError, ErrorLevel, InstrSeq, Instruct, Span, TypedValue,
};

use crate::scope::{Scope, ScopeItem};

type Result<T> = std::result::Result<T, CompileError>;

const TRIGGER_SAMPLED_ERROR: &str = "trigger_sampled_error";
const DEFAULT_MESSAGE: &str = "deprecated function";

fn enclosing_function_name<'ast>(scope: &Scope<'ast>) -> Option<&'ast str> {
    scope.items().iter().find_map(|item| match item {
        ScopeItem::Function(fd) => Some(fd.name.name),
        ScopeItem::Method(md, _) => Some(md.name.name),
        _ => None,
    })
}

/// Warning code for a deprecated definition.
///
/// `args` holds the attribute arguments interleaved with their indices
/// (`[0, a0, 1, a1, ...]`); `None` means the definition is not deprecated.
/// A sampling rate of zero or less disables the warning.
pub fn emit_deprecation_warning(
    scope: &Scope<'_>,
    args: Option<&[TypedValue]>,
    pos: Span,
) -> Result<InstrSeq> {
    let Some(args) = args else {
        return Ok(InstrSeq::new());
    };
    let mut values = args.iter().skip(1).step_by(2);

    let message = match values.next() {
        None => DEFAULT_MESSAGE,
        Some(TypedValue::String(s)) => s.as_str(),
        Some(other) => {
            return Err(CompileError::parse(
                pos,
                format!(
                    "deprecated attribute first argument must be a string, got {}",
                    other.type_name()
                ),
            ));
        }
    };
    let rate = match values.next() {
        None => 1,
        Some(TypedValue::Int(rate)) => *rate,
        Some(other) => {
            return Err(CompileError::parse(
                pos,
                format!(
                    "deprecated attribute second argument must be an int, got {}",
                    other.type_name()
                ),
            ));
        }
    };
    if rate <= 0 {
        return Ok(InstrSeq::new());
    }

    let name = enclosing_function_name(scope)
        .ok_or_else(|| CompileError::internal("deprecated definition has no name"))?;

    let mut out = InstrSeq::new();
    let is_trait = scope.get_class().is_some_and(|cd| cd.is_trait());
    let prefix = match scope.get_class() {
        None => String::new(),
        Some(_) if is_trait => {
            out.push(Instruct::SelfCls(ClsRefSlot(0)));
            out.push(Instruct::ClsRefName(ClsRefSlot(0)));
            "::".to_string()
        }
        Some(cd) => format!("{}::", cd.name.name.trim_start_matches('\\')),
    };

    out.push(Instruct::String(format!("{}{}: {}", prefix, name, message)));
    if is_trait {
        out.push(Instruct::Concat);
    }
    out.push(Instruct::Int(rate));
    out.push(Instruct::Int(i64::from(ErrorLevel::UserDeprecated)));
    out.push(Instruct::FCallBuiltin {
        nargs: 3,
        name: TRIGGER_SAMPLED_ERROR.to_string(),
    });
    out.push(Instruct::PopR);
    Ok(out)
}
