//! Definition-level emitters.
//!
//! Each emitter builds the [`Scope`] and [`BodyArgs`] for one definition,
//! reads its user attributes and hands the body to [`emit_body`].
//! [`emit_program`] drives them over a whole program, threading the
//! namespace context through `namespace` blocks and `use` declarations.

use bumpalo::Bump;
use hackbc_ast::ast::{ClassDef, Def, Expr, FunDef, MethodDef, Program, Stmt, UserAttribute};
use hackbc_core::{CompileError, FunctionBody, InstrSeq, Instruct, NamespaceEnv, Span, TypedValue};
use tracing::debug;

use crate::emit_body::{BodyArgs, BodyFlags, emit_body};
use crate::emitter::StmtEmitter;
use crate::global_state::GlobalState;
use crate::namespace_uses::{enter_namespace, merge_uses};
use crate::options::CompilerOptions;
use crate::scope::{Scope, ScopeItem};

type Result<T> = std::result::Result<T, CompileError>;

const DEPRECATED: &str = "__Deprecated";
const MEMOIZE: &str = "__Memoize";
const MEMOIZE_LSB: &str = "__MemoizeLSB";

// ============================================================================
// Records
// ============================================================================

/// A user attribute with its evaluated arguments.
#[derive(Debug, Clone, PartialEq)]
pub struct Attribute {
    pub name: String,
    pub args: Vec<TypedValue>,
}

/// An emitted free function.
#[derive(Debug, Clone, PartialEq)]
pub struct Function {
    pub name: String,
    pub span: Span,
    pub attributes: Vec<Attribute>,
    pub body: FunctionBody,
    pub is_async: bool,
    pub is_generator: bool,
    pub is_pair_generator: bool,
    pub is_memoize: bool,
}

/// An emitted method.
#[derive(Debug, Clone, PartialEq)]
pub struct Method {
    pub class_name: String,
    pub name: String,
    pub span: Span,
    pub attributes: Vec<Attribute>,
    pub body: FunctionBody,
    pub is_static: bool,
    pub is_abstract: bool,
    pub is_closure_body: bool,
    pub is_async: bool,
    pub is_generator: bool,
    pub is_pair_generator: bool,
}

/// The pseudo-main body holding the top-level statements.
#[derive(Debug, Clone, PartialEq)]
pub struct Main {
    pub body: FunctionBody,
}

/// Everything emitted for one program.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Unit {
    pub functions: Vec<Function>,
    pub methods: Vec<Method>,
    pub main: Option<Main>,
}

// ============================================================================
// Attributes
// ============================================================================

/// Evaluate a literal attribute argument.
pub fn literal_value(expr: &Expr<'_>) -> Result<TypedValue> {
    match expr {
        Expr::Null(_) => Ok(TypedValue::Null),
        Expr::Bool(b, _) => Ok(TypedValue::Bool(*b)),
        Expr::Int(i, _) => Ok(TypedValue::Int(*i)),
        Expr::Float(f, _) => Ok(TypedValue::double(*f)),
        Expr::String(s, _) => Ok(TypedValue::string(*s)),
        Expr::Vec(v) => v
            .elems
            .iter()
            .map(literal_value)
            .collect::<Result<Vec<_>>>()
            .map(TypedValue::Vec),
        other => Err(CompileError::parse(
            other.span(),
            "Attribute arguments must be literals",
        )),
    }
}

fn attributes_from_ast(attrs: &[UserAttribute<'_>]) -> Result<Vec<Attribute>> {
    attrs
        .iter()
        .map(|attr| {
            Ok(Attribute {
                name: attr.name.name.to_string(),
                args: attr.args.iter().map(literal_value).collect::<Result<_>>()?,
            })
        })
        .collect()
}

fn has_attribute(attrs: &[Attribute], names: &[&str]) -> bool {
    attrs.iter().any(|a| names.contains(&a.name.as_str()))
}

/// `__Deprecated` arguments interleaved with their indices.
fn deprecation_info(attrs: &[Attribute]) -> Option<Vec<TypedValue>> {
    let attr = attrs.iter().find(|a| a.name == DEPRECATED)?;
    Some(
        attr.args
            .iter()
            .enumerate()
            .flat_map(|(i, arg)| [TypedValue::Int(i as i64), arg.clone()])
            .collect(),
    )
}

fn body_flags(is_async: bool, is_memoize: bool) -> BodyFlags {
    let mut flags = BodyFlags::empty();
    if is_async {
        flags |= BodyFlags::ASYNC | BodyFlags::SKIP_AWAITABLE;
    }
    if is_memoize {
        flags |= BodyFlags::MEMOIZE;
    }
    flags
}

// ============================================================================
// Definitions
// ============================================================================

/// Emit a free function.
pub fn emit_function<'ast, E: StmtEmitter<'ast> + ?Sized>(
    emitter: &mut E,
    global: &GlobalState,
    options: &CompilerOptions,
    namespace: &NamespaceEnv,
    fd: &'ast FunDef<'ast>,
) -> Result<Function> {
    let attributes = attributes_from_ast(fd.user_attributes)?;
    let is_memoize = has_attribute(&attributes, &[MEMOIZE, MEMOIZE_LSB]);
    let deprecation = deprecation_info(&attributes);
    let scope = Scope::function(fd);

    let args = BodyArgs::new(&scope, namespace, fd.params, fd.body, fd.span)
        .with_ret(fd.ret.as_ref())
        .with_flags(body_flags(fd.is_async, is_memoize))
        .with_deprecation_info(deprecation.as_deref())
        .with_doc_comment(fd.doc_comment.map(str::to_string));
    let emitted = emit_body(emitter, global, options, args)?;

    Ok(Function {
        name: fd.name.name.to_string(),
        span: fd.span,
        attributes,
        body: emitted.body,
        is_async: fd.is_async,
        is_generator: emitted.is_generator,
        is_pair_generator: emitted.is_pair_generator,
        is_memoize,
    })
}

/// Emit a method of `cd`.
pub fn emit_method<'ast, E: StmtEmitter<'ast> + ?Sized>(
    emitter: &mut E,
    global: &GlobalState,
    options: &CompilerOptions,
    namespace: &NamespaceEnv,
    cd: &'ast ClassDef<'ast>,
    md: &'ast MethodDef<'ast>,
) -> Result<Method> {
    emit_method_in_scope(emitter, global, options, namespace, &Scope::method(md, cd))
}

/// Emit the method at the innermost level of `scope`.
///
/// Used directly for closure bodies, whose scope also holds the lambda they
/// were converted from. The lambda's `use` list becomes the explicit uses.
pub fn emit_method_in_scope<'ast, E: StmtEmitter<'ast> + ?Sized>(
    emitter: &mut E,
    global: &GlobalState,
    options: &CompilerOptions,
    namespace: &NamespaceEnv,
    scope: &Scope<'ast>,
) -> Result<Method> {
    let Some(ScopeItem::Method(md, cd)) = scope.innermost().copied() else {
        return Err(CompileError::internal("method emitted outside a method scope"));
    };
    let attributes = attributes_from_ast(md.user_attributes)?;
    let is_memoize = has_attribute(&attributes, &[MEMOIZE, MEMOIZE_LSB]);
    let deprecation = deprecation_info(&attributes);
    let is_closure_body = scope.is_closure_body();
    let explicit_uses: Vec<String> = scope
        .enclosing_lambda()
        .map(|lam| lam.uses.iter().map(|u| u.name.to_string()).collect())
        .unwrap_or_default();

    let mut flags = body_flags(md.is_async, is_memoize);
    flags.set(BodyFlags::CLOSURE_BODY, is_closure_body);

    let args = BodyArgs::new(scope, namespace, md.params, md.body, md.span)
        .with_ret(md.ret.as_ref())
        .with_flags(flags)
        .with_deprecation_info(deprecation.as_deref())
        .with_doc_comment(md.doc_comment.map(str::to_string))
        .with_explicit_uses(&explicit_uses);
    let emitted = emit_body(emitter, global, options, args)?;

    Ok(Method {
        class_name: cd.name.name.to_string(),
        name: md.name.name.to_string(),
        span: md.span,
        attributes,
        body: emitted.body,
        is_static: md.is_static,
        is_abstract: md.is_abstract,
        is_closure_body,
        is_async: md.is_async,
        is_generator: emitted.is_generator,
        is_pair_generator: emitted.is_pair_generator,
    })
}

/// Emit the pseudo-main body. Falling off the end returns `1`.
pub fn emit_main<'ast, E: StmtEmitter<'ast> + ?Sized>(
    emitter: &mut E,
    global: &GlobalState,
    options: &CompilerOptions,
    namespace: &NamespaceEnv,
    stmts: &'ast [Stmt<'ast>],
    pos: Span,
) -> Result<Main> {
    let scope = Scope::toplevel();
    let args = BodyArgs::new(&scope, namespace, &[], stmts, pos).with_default_dropthrough(Some(
        InstrSeq::from(vec![Instruct::Int(1), Instruct::RetC]),
    ));
    let emitted = emit_body(emitter, global, options, args)?;
    Ok(Main { body: emitted.body })
}

// ============================================================================
// Programs
// ============================================================================

struct ProgramEmitter<'e, 'ast, E: ?Sized> {
    emitter: &'e mut E,
    global: GlobalState,
    options: &'e CompilerOptions,
    unit: Unit,
    toplevel: Vec<Stmt<'ast>>,
}

impl<'ast, E: StmtEmitter<'ast> + ?Sized> ProgramEmitter<'_, 'ast, E> {
    fn emit_defs(&mut self, namespace: &NamespaceEnv, defs: &'ast [Def<'ast>]) -> Result<()> {
        let mut namespace = namespace.clone();
        for def in defs {
            match def {
                Def::Fun(fd) => {
                    let function =
                        emit_function(self.emitter, &self.global, self.options, &namespace, fd)?;
                    self.unit.functions.push(function);
                }
                Def::Class(cd) => {
                    for md in cd.methods {
                        let method = emit_method(
                            self.emitter,
                            &self.global,
                            self.options,
                            &namespace,
                            cd,
                            md,
                        )?;
                        self.unit.methods.push(method);
                    }
                }
                Def::Stmt(stmt) => self.toplevel.push(*stmt),
                Def::Namespace(nd) => {
                    let inner = enter_namespace(&namespace, nd);
                    self.emit_defs(&inner, nd.defs)?;
                }
                Def::NamespaceUse(decl) => namespace = merge_uses(&namespace, decl)?,
            }
        }
        Ok(())
    }
}

/// Emit every definition of a program and its top-level code.
///
/// Top-level statements are collected across namespace blocks into one
/// pseudo-main, allocated in `arena`.
#[cfg_attr(feature = "profiling", profiling::function)]
pub fn emit_program<'ast, E: StmtEmitter<'ast> + ?Sized>(
    emitter: &mut E,
    options: &CompilerOptions,
    arena: &'ast Bump,
    program: &Program<'ast>,
) -> Result<Unit> {
    let mut driver = ProgramEmitter {
        emitter,
        global: GlobalState::from_program(program),
        options,
        unit: Unit::default(),
        toplevel: Vec::new(),
    };
    let global_ns = NamespaceEnv::global();
    driver.emit_defs(&global_ns, program.defs())?;

    let stmts: &'ast [Stmt<'ast>] = arena.alloc_slice_copy(&driver.toplevel);
    let main = emit_main(
        driver.emitter,
        &driver.global,
        driver.options,
        &global_ns,
        stmts,
        program.span(),
    )?;
    let mut unit = driver.unit;
    unit.main = Some(main);

    debug!(
        target: "hackbc::emit_body",
        functions = unit.functions.len(),
        methods = unit.methods.len(),
        toplevel_stmts = stmts.len(),
        "program emitted"
    );
    Ok(unit)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::*;
    use hackbc_ast::ast::{NamespaceDef, NamespaceUse, NamespaceUseDecl, VecExpr};
    use hackbc_core::{FatalKind, UseKind};

    fn attr<'a>(arena: &'a Bump, name: &'a str, args: &[Expr<'a>]) -> UserAttribute<'a> {
        UserAttribute {
            name: ident(name),
            args: arena.alloc_slice_copy(args),
        }
    }

    fn emit_fun<'ast>(fd: &'ast FunDef<'ast>) -> Result<Function> {
        emit_function(
            &mut TestEmitter,
            &GlobalState::new(),
            &CompilerOptions::default(),
            &NamespaceEnv::global(),
            fd,
        )
    }

    #[test]
    fn literal_values() {
        let arena = Bump::new();
        let elems = arena.alloc_slice_copy(&[int(1), string("a")]);
        let v = Expr::Vec(VecExpr {
            elems,
            span: Span::default(),
        });
        assert_eq!(
            literal_value(&v).unwrap(),
            TypedValue::Vec(vec![TypedValue::Int(1), TypedValue::string("a")])
        );
        assert_eq!(
            literal_value(&Expr::Float(1.5, Span::default())).unwrap(),
            TypedValue::double(1.5)
        );

        let err = literal_value(&lvar("$x")).unwrap_err();
        assert_eq!(err.kind(), FatalKind::Parse);
    }

    #[test]
    fn deprecation_info_interleaves_indices() {
        let attrs = vec![Attribute {
            name: DEPRECATED.into(),
            args: vec![TypedValue::string("old"), TypedValue::Int(5)],
        }];
        assert_eq!(
            deprecation_info(&attrs),
            Some(vec![
                TypedValue::Int(0),
                TypedValue::string("old"),
                TypedValue::Int(1),
                TypedValue::Int(5),
            ])
        );
        assert_eq!(deprecation_info(&[]), None);
    }

    #[test]
    fn deprecated_function_warns_first() {
        let arena = Bump::new();
        let mut fd = *fun(&arena, "f", &[], &[]);
        fd.user_attributes = arena.alloc_slice_copy(&[attr(&arena, DEPRECATED, &[string("gone")])]);
        let fd = arena.alloc(fd);

        let function = emit_fun(fd).unwrap();
        assert_eq!(function.attributes.len(), 1);
        assert_eq!(
            function.body.instrs.first(),
            Some(&Instruct::String("f: gone".into()))
        );
        assert!(function.body.instrs.names().contains(&"FCallBuiltin"));
    }

    #[test]
    fn memoize_attribute_sets_flag_and_skips_defaults() {
        let arena = Bump::new();
        let mut y = param("$y");
        y.default = Some(int(1));
        let mut fd = *fun(&arena, "f", &[y], &[]);
        fd.user_attributes = arena.alloc_slice_copy(&[attr(&arena, MEMOIZE, &[])]);
        let fd = arena.alloc(fd);

        let function = emit_fun(fd).unwrap();
        assert!(function.is_memoize);
        assert!(function.body.params[0].default_value.is_none());
        assert!(!function.body.is_memoize_wrapper);
    }

    #[test]
    fn async_function_skips_awaitable() {
        let arena = Bump::new();
        let mut fd = *fun(&arena, "f", &[], &[]);
        fd.is_async = true;
        fd.ret = Some(app_hint(&arena, "Awaitable", &[named_hint("int")]));
        let fd = arena.alloc(fd);

        let function = emit_fun(fd).unwrap();
        assert!(function.is_async);
        let info = function.body.return_type_info.unwrap();
        assert_eq!(info.user_type.as_deref(), Some("HH\\int"));
        function.body.instrs.assert_instrs(&[
            Instruct::Null,
            Instruct::VerifyRetTypeC,
            Instruct::RetC,
        ]);
    }

    #[test]
    fn closure_class_methods_are_closure_bodies() {
        let arena = Bump::new();
        let body = [echo(&arena, &[lvar("$y")])];
        let invoke = method(&arena, "__invoke", false, &[], &body);
        let cd = class(&arena, "Closure$f", &["y"]);

        let method = emit_method(
            &mut TestEmitter,
            &GlobalState::new(),
            &CompilerOptions::default(),
            &NamespaceEnv::global(),
            cd,
            invoke,
        )
        .unwrap();
        assert!(method.is_closure_body);
        assert_eq!(method.class_name, "Closure$f");
        assert_eq!(method.body.decl_vars, vec!["$0Closure", "$y"]);
    }

    #[test]
    fn closure_scope_supplies_explicit_uses() {
        let arena = Bump::new();
        let lam = lambda(&arena, &["$a"], &[]);
        let invoke = method(&arena, "__invoke", false, &[], &[]);
        let cd = class(&arena, "Closure$g", &[]);
        let fd = fun(&arena, "g", &[], &[]);
        let scope = Scope::function(fd)
            .push(ScopeItem::Lambda(lam))
            .push(ScopeItem::Method(invoke, cd));

        let method = emit_method_in_scope(
            &mut TestEmitter,
            &GlobalState::new(),
            &CompilerOptions::default(),
            &NamespaceEnv::global(),
            &scope,
        )
        .unwrap();
        assert!(method.is_closure_body);
        let env = method.body.env.unwrap();
        assert_eq!(env.explicit_uses, vec!["$a"]);
        assert!(method.body.decl_vars.contains(&"$a".to_string()));
    }

    #[test]
    fn method_outside_method_scope_is_internal() {
        let err = emit_method_in_scope(
            &mut TestEmitter,
            &GlobalState::new(),
            &CompilerOptions::default(),
            &NamespaceEnv::global(),
            &Scope::toplevel(),
        )
        .unwrap_err();
        assert_eq!(err.kind(), FatalKind::Internal);
    }

    #[test]
    fn main_returns_one() {
        let arena = Bump::new();
        let stmts = arena.alloc_slice_copy(&[echo(&arena, &[int(1)])]);
        let main = emit_main(
            &mut TestEmitter,
            &GlobalState::new(),
            &CompilerOptions::default(),
            &NamespaceEnv::global(),
            stmts,
            Span::default(),
        )
        .unwrap();
        main.body.instrs.assert_instrs(&[
            Instruct::Int(1),
            Instruct::Print,
            Instruct::PopC,
            Instruct::Int(1),
            Instruct::RetC,
        ]);
    }

    #[test]
    fn program_threads_namespaces() {
        let arena = Bump::new();
        let f = fun(&arena, "N\\f", &[], &[]);
        let mut cd = *class(&arena, "N\\C", &[]);
        cd.methods = arena.alloc_slice_copy(&[*method(&arena, "m", true, &[], &[])]);
        let cd = arena.alloc(cd);

        let uses = arena.alloc(NamespaceUseDecl {
            uses: arena.alloc_slice_copy(&[NamespaceUse {
                kind: UseKind::Class,
                target: ident("A\\B"),
                alias: None,
            }]),
            span: Span::default(),
        });
        let inner = arena.alloc_slice_copy(&[
            Def::NamespaceUse(uses),
            Def::Fun(f),
            Def::Class(cd),
            Def::Stmt(echo(&arena, &[int(2)])),
        ]);
        let ns = arena.alloc(NamespaceDef {
            name: Some(ident("N")),
            defs: inner,
            span: Span::default(),
        });
        let defs = arena.alloc_slice_copy(&[
            Def::Namespace(ns),
            Def::Stmt(echo(&arena, &[int(3)])),
        ]);
        let program = Program::new(defs, Span::default());

        let unit = emit_program(&mut TestEmitter, &CompilerOptions::default(), &arena, &program)
            .unwrap();
        assert_eq!(unit.functions.len(), 1);
        let env = unit.functions[0].body.env.as_ref().unwrap();
        assert_eq!(env.namespace.name.as_deref(), Some("N"));
        assert_eq!(env.namespace.class_uses.get("B").map(String::as_str), Some("A\\B"));

        assert_eq!(unit.methods.len(), 1);
        assert!(unit.methods[0].is_static);

        let main = unit.main.unwrap();
        let ints: Vec<_> = main
            .body
            .instrs
            .iter()
            .filter(|i| matches!(i, Instruct::Int(_)))
            .cloned()
            .collect();
        assert_eq!(
            ints,
            vec![Instruct::Int(2), Instruct::Int(3), Instruct::Int(1)]
        );
    }

    #[test]
    fn conflicting_use_aborts_program() {
        let arena = Bump::new();
        let decl = |target: &'static str| {
            Def::NamespaceUse(arena.alloc(NamespaceUseDecl {
                uses: arena.alloc_slice_copy(&[NamespaceUse {
                    kind: UseKind::Class,
                    target: ident(target),
                    alias: Some(ident("Foo")),
                }]),
                span: Span::default(),
            }))
        };
        let defs = arena.alloc_slice_copy(&[decl("A\\Foo"), decl("B\\Foo")]);
        let program = Program::new(defs, Span::default());

        let err = emit_program(&mut TestEmitter, &CompilerOptions::default(), &arena, &program)
            .unwrap_err();
        assert_eq!(err.kind(), FatalKind::Parse);
        assert_eq!(
            err.message(),
            "Cannot use B\\Foo as Foo because the name is already in use"
        );
    }
}
