//! Parameter pipeline.
//!
//! Turns AST parameters into [`Param`] descriptors and produces the code
//! around them: the method prologue, the inout epilogue and the
//! default-value setters that optional arguments enter through.

use hackbc_ast::ast::{self, Expr};
use hackbc_core::{
    CompileError, DefaultValue, InstrSeq, Instruct, Local, Param, ParamId, Span,
};

use crate::emit::{EmitState, emit_pos};
use crate::emitter::StmtEmitter;
use crate::env::Env;
use crate::options::CompilerOptions;
use crate::type_hint::{TypeInfoKind, hint_to_type_info};

type Result<T> = std::result::Result<T, CompileError>;

/// Placeholder name of an unnamed trailing variadic (`...`).
const UNNAMED_VARIADIC: &str = "...";

fn check_param_list(params: &[ast::Param<'_>]) -> Result<()> {
    let last = params.len().saturating_sub(1);
    for (i, p) in params.iter().enumerate() {
        if p.is_variadic && i != last {
            return Err(CompileError::parse(
                p.span,
                "Only the last parameter can be variadic",
            ));
        }
        if p.is_variadic && p.is_inout {
            return Err(CompileError::parse(
                p.span,
                "Variadic parameters cannot be inout",
            ));
        }
    }
    Ok(())
}

/// Resolve AST parameters into descriptors.
///
/// Default-value code is generated through `emitter` unless
/// `generate_defaults` is false. In closure bodies inout parameters become
/// by-reference parameters.
pub fn from_asts<'ast, E: StmtEmitter<'ast> + ?Sized>(
    emitter: &mut E,
    state: &mut EmitState,
    env: &Env<'_, 'ast>,
    tparams: &[&str],
    ast_params: &'ast [ast::Param<'ast>],
    generate_defaults: bool,
    is_closure_body: bool,
) -> Result<Vec<Param>> {
    check_param_list(ast_params)?;

    let mut params = Vec::with_capacity(ast_params.len());
    for p in ast_params {
        if p.is_variadic && p.name.name == UNNAMED_VARIADIC {
            continue;
        }

        let nullable = matches!(p.default, Some(Expr::Null(_)));
        let type_info = match &p.hint {
            Some(hint) => Some(hint_to_type_info(
                hint,
                TypeInfoKind::Param,
                nullable,
                false,
                tparams,
                env.namespace,
            )?),
            None => None,
        };

        let default_value = match &p.default {
            Some(default) if generate_defaults => {
                let label = state.labels.next_default_arg();
                let code = emitter.emit_expr(state, env, default)?;
                Some(DefaultValue { label, code })
            }
            _ => None,
        };

        let (is_inout, is_reference) = if is_closure_body && p.is_inout {
            (false, true)
        } else {
            (p.is_inout, p.is_reference)
        };

        params.push(Param {
            name: p.name.name.to_string(),
            type_info,
            is_variadic: p.is_variadic,
            is_inout,
            is_reference,
            default_value,
        });
    }
    Ok(params)
}

/// `$this` initialization and parameter type checks run on entry.
pub fn emit_method_prolog(
    params: &[Param],
    should_emit_init_this: bool,
    pos: Span,
    options: &CompilerOptions,
) -> InstrSeq {
    let mut prolog = InstrSeq::new();
    if should_emit_init_this {
        prolog.push(Instruct::InitThisLoc(Local::named("$this")));
    }
    for p in params.iter().filter(|p| p.needs_verification()) {
        prolog.push(Instruct::VerifyParamType(ParamId::Named(p.name.clone())));
    }
    if prolog.is_empty() {
        return prolog;
    }
    InstrSeq::gather([emit_pos(pos, options), prolog])
}

/// Epilogue packing inout parameters for the return.
///
/// Returns the number of inout parameters and the code; both are empty
/// when there are none.
pub fn emit_verify_out(params: &[Param]) -> (usize, InstrSeq) {
    let mut out = InstrSeq::new();
    let mut count = 0;
    for (i, p) in params.iter().enumerate().filter(|(_, p)| p.is_inout) {
        count += 1;
        out.push(Instruct::CGetL(Local::named(p.name.as_str())));
        let hinted = p.type_info.as_ref().is_some_and(|t| t.user_type.is_some());
        if hinted {
            out.push(Instruct::VerifyOutType(ParamId::Unnamed(i as u32)));
        }
    }
    if count > 0 {
        out.push(Instruct::NewVecArray(count as u32 + 1));
    }
    (count, out)
}

/// Setters for optional parameters and the entry label that follows them.
///
/// Each setter stores its default into the parameter's local; the block
/// ends with a jump to a fresh entry label. Returns `(entry, setters)`,
/// both empty when no parameter has a default.
pub fn emit_param_default_value_setter(
    state: &mut EmitState,
    params: &[Param],
    pos: Span,
    options: &CompilerOptions,
) -> (InstrSeq, InstrSeq) {
    let mut setters = InstrSeq::new();
    for p in params {
        if let Some(default) = &p.default_value {
            setters.push(Instruct::Label(default.label.clone()));
            setters.append(default.code.clone());
            setters.append(emit_pos(pos, options));
            setters.push(Instruct::SetL(Local::named(p.name.as_str())));
            setters.push(Instruct::PopC);
        }
    }
    if setters.is_empty() {
        return (InstrSeq::new(), setters);
    }
    let entry = state.labels.next_regular();
    setters.push(Instruct::JmpNS(entry.clone()));
    (InstrSeq::one(Instruct::Label(entry)), setters)
}
