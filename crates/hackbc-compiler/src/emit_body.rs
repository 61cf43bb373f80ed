//! Body assembly.
//!
//! [`emit_body`] turns one function, method, closure or top-level body into
//! a [`FunctionBody`]. It runs every pass of this crate in a fixed order:
//!
//! 1. Return type info and the async return check.
//! 2. Generator classification and return verification settings.
//! 3. Parameters (with default-value code) and the inout epilogue.
//! 4. Jump targets, declared variables and local slot numbering.
//! 5. Statement emission through the [`StmtEmitter`].
//! 6. Default-value setters, generator prefix and static rewriting.
//! 7. Header (prologue, deprecation warning, entry label).
//! 8. Fault extraction and label rewriting.
//!
//! All counters live in an [`EmitState`] owned by the call, so bodies can
//! be assembled independently.

use bitflags::bitflags;
use hackbc_ast::ast::{self, Hint, Stmt};
use hackbc_core::{
    CompileError, FunctionBody, InstrSeq, Instruct, NamespaceEnv, Span, TypedValue,
};
use tracing::debug;

use crate::decl_vars;
use crate::deprecation::emit_deprecation_warning;
use crate::emit::{EmitState, StmtConfig};
use crate::emitter::StmtEmitter;
use crate::env::Env;
use crate::fault::extract_fault_regions;
use crate::generator::{emit_generator_prefix, is_function_generator};
use crate::global_state::GlobalState;
use crate::labels::{count_cls_ref_slots, has_duplicate_labels, relabel, rewrite_user_labels};
use crate::options::CompilerOptions;
use crate::params::{
    emit_method_prolog, emit_param_default_value_setter, emit_verify_out, from_asts,
};
use crate::return_type::{
    check_async_return_hint, default_dropthrough, emit_return_type_info, should_verify_return,
};
use crate::scope::Scope;
use crate::static_vars::StaticVarMap;

type Result<T> = std::result::Result<T, CompileError>;

bitflags! {
    /// Per-body switches.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct BodyFlags: u8 {
        /// Resolve `Awaitable<T>` return hints as `T`.
        const SKIP_AWAITABLE = 0x01;
        /// Body of a memoized definition; defaults are not generated.
        const MEMOIZE = 0x02;
        /// Body of a closure's `__invoke`.
        const CLOSURE_BODY = 0x04;
        /// `async` definition.
        const ASYNC = 0x08;
        /// Returns by reference.
        const RETURN_BY_REF = 0x10;
    }
}

/// Inputs of [`emit_body`].
#[derive(Debug, Clone)]
pub struct BodyArgs<'a, 'ast> {
    pub scope: &'a Scope<'ast>,
    pub namespace: &'a NamespaceEnv,
    pub params: &'ast [ast::Param<'ast>],
    pub ret: Option<&'a Hint<'ast>>,
    pub body: &'ast [Stmt<'ast>],
    /// Position of the definition.
    pub pos: Span,
    pub flags: BodyFlags,
    /// `__Deprecated` arguments, interleaved with their indices.
    pub deprecation_info: Option<&'a [TypedValue]>,
    pub doc_comment: Option<String>,
    /// Variables of a closure's `use` list.
    pub explicit_uses: &'a [String],
    /// Overrides the code emitted when control falls off the end.
    pub default_dropthrough: Option<InstrSeq>,
}

impl<'a, 'ast> BodyArgs<'a, 'ast> {
    pub fn new(
        scope: &'a Scope<'ast>,
        namespace: &'a NamespaceEnv,
        params: &'ast [ast::Param<'ast>],
        body: &'ast [Stmt<'ast>],
        pos: Span,
    ) -> Self {
        Self {
            scope,
            namespace,
            params,
            ret: None,
            body,
            pos,
            flags: BodyFlags::empty(),
            deprecation_info: None,
            doc_comment: None,
            explicit_uses: &[],
            default_dropthrough: None,
        }
    }

    pub fn with_ret(mut self, ret: Option<&'a Hint<'ast>>) -> Self {
        self.ret = ret;
        self
    }

    pub fn with_flags(mut self, flags: BodyFlags) -> Self {
        self.flags = flags;
        self
    }

    pub fn with_deprecation_info(mut self, info: Option<&'a [TypedValue]>) -> Self {
        self.deprecation_info = info;
        self
    }

    pub fn with_doc_comment(mut self, doc_comment: Option<String>) -> Self {
        self.doc_comment = doc_comment;
        self
    }

    pub fn with_explicit_uses(mut self, explicit_uses: &'a [String]) -> Self {
        self.explicit_uses = explicit_uses;
        self
    }

    pub fn with_default_dropthrough(mut self, code: Option<InstrSeq>) -> Self {
        self.default_dropthrough = code;
        self
    }
}

/// An assembled body with its generator classification.
#[derive(Debug, Clone, PartialEq)]
pub struct EmittedBody {
    pub body: FunctionBody,
    pub is_generator: bool,
    /// Generator that yields keys.
    pub is_pair_generator: bool,
}

/// Assemble one body.
///
/// Fails with the first fatal error; nothing is produced in that case.
#[cfg_attr(feature = "profiling", profiling::function)]
pub fn emit_body<'ast, E: StmtEmitter<'ast> + ?Sized>(
    emitter: &mut E,
    global: &GlobalState,
    options: &CompilerOptions,
    args: BodyArgs<'_, 'ast>,
) -> Result<EmittedBody> {
    let BodyArgs {
        scope,
        namespace,
        params: ast_params,
        ret,
        body,
        pos,
        flags,
        deprecation_info,
        doc_comment,
        explicit_uses,
        default_dropthrough: supplied_dropthrough,
    } = args;
    let is_async = flags.contains(BodyFlags::ASYNC);
    let skipawaitable = flags.contains(BodyFlags::SKIP_AWAITABLE);
    let is_closure_body = flags.contains(BodyFlags::CLOSURE_BODY);
    let is_memoize = flags.contains(BodyFlags::MEMOIZE);

    let mut state = EmitState::new();
    state.reset_counters();

    let tparams = scope.get_tparams();
    let return_type_info = emit_return_type_info(ret, &tparams, skipawaitable, namespace)?;
    check_async_return_hint(scope, ret, is_async, skipawaitable)?;

    let (is_generator, is_pair_generator) = is_function_generator(body);
    let verify_return = should_verify_return(&return_type_info, is_generator);
    let dropthrough = default_dropthrough(supplied_dropthrough, is_async, verify_return);

    // Defaults are emitted before `$this` handling is known.
    let prelim_env = Env::new(namespace, scope).with_explicit_uses(explicit_uses);
    let mut params = from_asts(
        emitter,
        &mut state,
        &prelim_env,
        &tparams,
        ast_params,
        !is_memoize,
        is_closure_body,
    )?;

    let (num_out, verify_out) = if is_closure_body {
        (0, InstrSeq::new())
    } else {
        emit_verify_out(&params)
    };
    state.config = StmtConfig {
        verify_return,
        verify_out,
        num_out,
        default_dropthrough: dropthrough,
        default_return_value: InstrSeq::one(Instruct::Null),
        return_by_ref: flags.contains(BodyFlags::RETURN_BY_REF),
        function_pos: pos,
    };

    let key = scope.function_state_key()?;
    state.jumps.reset(global.labels(&key));

    let decl_vars =
        decl_vars::from_ast(scope, ast_params, body, is_closure_body, explicit_uses)?;

    let should_reserve_locals = global.has_finally(&key);
    state
        .locals
        .reset((params.len() + decl_vars.names.len()) as u32);
    if should_reserve_locals {
        state.locals.reserve_retval_and_label_id_locals();
    }

    debug!(
        target: "hackbc::emit_body",
        ?key,
        params = params.len(),
        decl_vars = decl_vars.names.len(),
        is_generator,
        should_reserve_locals,
        "emitting body"
    );

    let env = Env::new(namespace, scope)
        .with_needs_local_this(decl_vars.needs_local_this)
        .with_explicit_uses(explicit_uses);
    let stmts = emitter.emit_stmts(&mut state, &env, body)?;

    let (begin_label, setters) =
        emit_param_default_value_setter(&mut state, &params, pos, options);

    let generator_prefix = emit_generator_prefix(is_generator);
    let statics = StaticVarMap::from_body(emitter, &mut state, &env, body)?;
    let stmts = statics.rewrite(&mut state, stmts);

    let should_emit_init_this = !scope.is_in_static_method()
        && (decl_vars.needs_local_this
            || (scope.is_toplevel() && decl_vars.names.iter().any(|n| n == "$this")));
    let header_content = InstrSeq::gather([
        emit_method_prolog(&params, should_emit_init_this, pos, options),
        emit_deprecation_warning(scope, deprecation_info, pos)?,
        generator_prefix,
    ]);
    let first_is_label = matches!(stmts.first(), Some(Instruct::Label(_)));
    let header = if first_is_label && header_content.is_empty() {
        InstrSeq::gather([begin_label, InstrSeq::one(Instruct::EntryNop)])
    } else {
        InstrSeq::gather([begin_label, header_content])
    };

    let mut instrs = extract_fault_regions(InstrSeq::gather([header, stmts, setters]));
    rewrite_user_labels(&mut state, &mut instrs);
    if has_duplicate_labels(&instrs) {
        return Err(CompileError::internal("label defined twice in one body"));
    }
    if options.relabel {
        relabel(&mut instrs, &mut params);
    }

    let num_cls_ref_slots = count_cls_ref_slots(&instrs);
    let num_iters = state.iterators.count();
    debug!(
        target: "hackbc::emit_body",
        instrs = instrs.len(),
        num_iters,
        num_cls_ref_slots,
        statics = statics.names().len(),
        "body assembled"
    );

    Ok(EmittedBody {
        body: FunctionBody {
            instrs,
            decl_vars: decl_vars.names,
            num_iters,
            num_cls_ref_slots,
            is_memoize_wrapper: false,
            params,
            return_type_info: Some(return_type_info),
            static_inits: statics.into_names(),
            doc_comment,
            env: Some(env.snapshot()),
        },
        is_generator,
        is_pair_generator,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scope::ScopeItem;
    use crate::test_support::*;
    use bumpalo::Bump;
    use hackbc_core::{FunctionStateKey, Label, Local, ParamId};

    fn assemble<'ast>(args: BodyArgs<'_, 'ast>) -> Result<EmittedBody> {
        emit_body(
            &mut TestEmitter,
            &GlobalState::new(),
            &CompilerOptions::default(),
            args,
        )
    }

    #[test]
    fn empty_function_returns_null() {
        let arena = Bump::new();
        let fd = fun(&arena, "f", &[], &[]);
        let scope = Scope::function(fd);
        let ns = NamespaceEnv::global();

        let out = assemble(BodyArgs::new(&scope, &ns, fd.params, fd.body, fd.span)).unwrap();
        out.body
            .instrs
            .assert_instrs(&[Instruct::Null, Instruct::RetC]);
        assert!(!out.is_generator);
        assert_eq!(out.body.return_type_info, Some(hackbc_core::TypeInfo::empty()));
        assert_eq!(out.body.env.as_ref().map(|e| e.needs_local_this), Some(false));
    }

    #[test]
    fn hinted_params_are_verified_in_prolog() {
        let arena = Bump::new();
        let mut x = param("$x");
        x.hint = Some(named_hint("int"));
        let body = [echo(&arena, &[lvar("$x"), lvar("$y")])];
        let fd = fun(&arena, "f", &[x], &body);
        let scope = Scope::function(fd);
        let ns = NamespaceEnv::global();

        let out = assemble(BodyArgs::new(&scope, &ns, fd.params, fd.body, fd.span)).unwrap();
        assert_eq!(out.body.decl_vars, vec!["$y"]);
        out.body.instrs.assert_contains(&["VerifyParamType", "CGetL", "Print", "RetC"]);
        assert_eq!(
            out.body.instrs.first(),
            Some(&Instruct::VerifyParamType(ParamId::Named("$x".into())))
        );
    }

    #[test]
    fn defaults_enter_through_setters() {
        let arena = Bump::new();
        let mut y = param("$y");
        y.default = Some(int(3));
        let fd = fun(&arena, "f", &[param("$x"), y], &[]);
        let scope = Scope::function(fd);
        let ns = NamespaceEnv::global();

        let out = assemble(BodyArgs::new(&scope, &ns, fd.params, fd.body, fd.span)).unwrap();
        // Relabeling numbers labels in definition order.
        out.body.instrs.assert_instrs(&[
            Instruct::Label(Label::Regular(0)),
            Instruct::Null,
            Instruct::RetC,
            Instruct::Label(Label::DefaultArg(1)),
            Instruct::Int(3),
            Instruct::SetL(Local::named("$y")),
            Instruct::PopC,
            Instruct::JmpNS(Label::Regular(0)),
        ]);
        assert_eq!(
            out.body.params[1].default_value.as_ref().map(|d| d.label.clone()),
            Some(Label::DefaultArg(1))
        );
    }

    #[test]
    fn memoize_skips_defaults() {
        let arena = Bump::new();
        let mut y = param("$y");
        y.default = Some(int(3));
        let fd = fun(&arena, "f", &[y], &[]);
        let scope = Scope::function(fd);
        let ns = NamespaceEnv::global();

        let out = assemble(
            BodyArgs::new(&scope, &ns, fd.params, fd.body, fd.span).with_flags(BodyFlags::MEMOIZE),
        )
        .unwrap();
        assert!(out.body.params[0].default_value.is_none());
        assert!(!out.body.is_memoize_wrapper);
    }

    #[test]
    fn generators_get_prefix_and_skip_verification() {
        let arena = Bump::new();
        let body = [expr_stmt(yield_expr(&arena, Some(int(0)), int(1)))];
        let fd = fun(&arena, "g", &[], &body);
        let scope = Scope::function(fd);
        let ns = NamespaceEnv::global();
        let ret = named_hint("int");

        let out = assemble(
            BodyArgs::new(&scope, &ns, fd.params, fd.body, fd.span).with_ret(Some(&ret)),
        )
        .unwrap();
        assert!(out.is_generator);
        assert!(out.is_pair_generator);
        assert_eq!(out.body.instrs.names()[..2], ["CreateCont", "PopC"]);
        assert!(!out.body.instrs.names().contains(&"VerifyRetTypeC"));
    }

    #[test]
    fn leading_label_gets_entry_nop() {
        let arena = Bump::new();
        let body = [Stmt::GotoLabel(ident("top")), Stmt::Goto(ident("top"))];
        let fd = fun(&arena, "f", &[], &body);
        let scope = Scope::function(fd);
        let ns = NamespaceEnv::global();
        let mut global = GlobalState::new();
        global.register_labels(&FunctionStateKey::function("f"), ["top".to_string()]);

        let out = emit_body(
            &mut TestEmitter,
            &global,
            &CompilerOptions::default(),
            BodyArgs::new(&scope, &ns, fd.params, fd.body, fd.span),
        )
        .unwrap();
        out.body.instrs.assert_instrs(&[
            Instruct::EntryNop,
            Instruct::Label(Label::Regular(0)),
            Instruct::Jmp(Label::Regular(0)),
            Instruct::Null,
            Instruct::RetC,
        ]);
    }

    #[test]
    fn label_defined_twice_is_rejected() {
        let arena = Bump::new();
        let body = [
            Stmt::GotoLabel(ident("top")),
            echo(&arena, &[int(1)]),
            Stmt::GotoLabel(ident("top")),
            return_stmt(None),
        ];
        let fd = fun(&arena, "f", &[], &body);
        let scope = Scope::function(fd);
        let ns = NamespaceEnv::global();
        let mut global = GlobalState::new();
        global.register_labels(&FunctionStateKey::function("f"), ["top".to_string()]);

        let err = emit_body(
            &mut TestEmitter,
            &global,
            &CompilerOptions::default(),
            BodyArgs::new(&scope, &ns, fd.params, fd.body, fd.span),
        )
        .unwrap_err();
        assert!(!err.is_recoverable());
        assert_eq!(err.message(), "label defined twice in one body");
    }

    #[test]
    fn finally_bodies_reserve_locals() {
        let arena = Bump::new();
        let finally = [echo(&arena, &[int(2)])];
        let body = [try_finally(&arena, &[echo(&arena, &[int(1)])], &finally)];
        let fd = fun(&arena, "f", &[], &body);
        let scope = Scope::function(fd);
        let ns = NamespaceEnv::global();
        let mut global = GlobalState::new();
        global.register_finally(&FunctionStateKey::function("f"));

        let out = emit_body(
            &mut TestEmitter,
            &global,
            &CompilerOptions::default(),
            BodyArgs::new(&scope, &ns, fd.params, fd.body, fd.span),
        )
        .unwrap();
        let names = out.body.instrs.names();
        assert_eq!(names.first(), Some(&"TryFaultBegin"));
        assert!(names.contains(&"TryFaultEnd"));
        assert_eq!(names.last(), Some(&"Unwind"));
    }

    #[test]
    fn instance_method_inits_this() {
        let arena = Bump::new();
        let body = [echo(&arena, &[lvar("$this")])];
        let cd = class(&arena, "C", &[]);
        let md = method(&arena, "m", false, &[], &body);
        let scope = Scope::method(md, cd);
        let ns = NamespaceEnv::global();

        let out = assemble(BodyArgs::new(&scope, &ns, md.params, md.body, md.span)).unwrap();
        assert_eq!(out.body.decl_vars, vec!["$this"]);
        assert_eq!(
            out.body.instrs.first(),
            Some(&Instruct::InitThisLoc(Local::named("$this")))
        );
    }

    #[test]
    fn closure_body_keeps_inout_as_reference() {
        let arena = Bump::new();
        let mut p = param("$r");
        p.is_inout = true;
        let body = [echo(&arena, &[lvar("$y")])];
        let closure_class = class(&arena, "Closure$f", &["y"]);
        let invoke = method(&arena, "__invoke", false, &[p], &body);
        let outer = fun(&arena, "f", &[], &[]);
        let lam = lambda(&arena, &["$y"], &body);
        let scope = Scope::try_new(vec![
            ScopeItem::Method(invoke, closure_class),
            ScopeItem::Lambda(lam),
            ScopeItem::Function(outer),
        ])
        .unwrap();
        let ns = NamespaceEnv::global();
        let uses = ["$y".to_string()];

        let out = assemble(
            BodyArgs::new(&scope, &ns, invoke.params, invoke.body, invoke.span)
                .with_flags(BodyFlags::CLOSURE_BODY)
                .with_explicit_uses(&uses),
        )
        .unwrap();
        assert_eq!(out.body.decl_vars, vec!["$0Closure", "$y"]);
        assert!(out.body.params[0].is_reference);
        assert!(!out.body.instrs.names().contains(&"NewVecArray"));
    }

    #[test]
    fn unknown_scope_shape_fails_fast() {
        let arena = Bump::new();
        let lam = lambda(&arena, &[], &[]);
        let scope = Scope::try_new(vec![ScopeItem::Lambda(lam)]).unwrap();
        let ns = NamespaceEnv::global();
        let err = assemble(BodyArgs::new(&scope, &ns, &[], &[], Span::default())).unwrap_err();
        assert!(!err.is_recoverable());
    }
}
