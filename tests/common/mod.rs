//! Shared fixtures for the integration tests: AST builders over a bump
//! arena and a minimal statement emitter.

#![allow(dead_code)]

use bumpalo::Bump;
use hackbc::prelude::*;
use hackbc::core::{Local, Span};
use hackbc::compiler::static_vars::emit_static_decl;

type Result<T> = std::result::Result<T, CompileError>;

// ============================================================================
// AST builders
// ============================================================================

pub fn id(name: &str) -> Ident<'_> {
    Ident::synthetic(name)
}

pub fn lvar(name: &str) -> Expr<'_> {
    Expr::Lvar(id(name))
}

pub fn int<'a>(value: i64) -> Expr<'a> {
    Expr::Int(value, Span::default())
}

pub fn call<'a>(arena: &'a Bump, name: &'a str, args: &[Expr<'a>]) -> Expr<'a> {
    Expr::Call(arena.alloc(CallExpr {
        callee: id(name),
        args: arena.alloc_slice_copy(args),
        span: Span::default(),
    }))
}

pub fn echo<'a>(arena: &'a Bump, args: &[Expr<'a>]) -> Stmt<'a> {
    Stmt::Echo(EchoStmt {
        args: arena.alloc_slice_copy(args),
        span: Span::default(),
    })
}

pub fn ret(value: Option<Expr<'_>>) -> Stmt<'_> {
    Stmt::Return(ReturnStmt {
        value,
        span: Span::default(),
    })
}

pub fn static_var<'a>(arena: &'a Bump, name: &'a str, init: Expr<'a>) -> Stmt<'a> {
    Stmt::Static(StaticStmt {
        vars: arena.alloc_slice_copy(&[StaticVar {
            name: id(name),
            init: Some(init),
        }]),
        span: Span::default(),
    })
}

pub fn hinted_param<'a>(name: &'a str, hint: &'a str) -> Param<'a> {
    let mut p = Param::simple(id(name));
    p.hint = Some(Hint::named(hint, Span::default()));
    p
}

pub fn awaitable<'a>(arena: &'a Bump, inner: &'a str) -> Hint<'a> {
    Hint::new(
        HintKind::Apply {
            name: id("Awaitable"),
            targs: arena.alloc_slice_copy(&[Hint::named(inner, Span::default())]),
        },
        Span::default(),
    )
}

pub fn function<'a>(
    arena: &'a Bump,
    name: &'a str,
    params: &[Param<'a>],
    body: &[Stmt<'a>],
) -> FunDef<'a> {
    FunDef {
        name: id(name),
        tparams: &[],
        params: arena.alloc_slice_copy(params),
        ret: None,
        body: arena.alloc_slice_copy(body),
        is_async: false,
        user_attributes: &[],
        doc_comment: None,
        span: Span::default(),
    }
}

pub fn method<'a>(arena: &'a Bump, name: &'a str, body: &[Stmt<'a>]) -> MethodDef<'a> {
    MethodDef {
        name: id(name),
        tparams: &[],
        params: &[],
        ret: None,
        body: arena.alloc_slice_copy(body),
        is_async: false,
        is_static: false,
        is_abstract: false,
        user_attributes: &[],
        doc_comment: None,
        span: Span::default(),
    }
}

pub fn class<'a>(
    arena: &'a Bump,
    name: &'a str,
    vars: &[&'a str],
    methods: &[MethodDef<'a>],
) -> &'a ClassDef<'a> {
    arena.alloc(ClassDef {
        name: id(name),
        kind: ClassKind::Class,
        tparams: &[],
        vars: arena.alloc_slice_fill_iter(vars.iter().map(|v| ClassVar {
            name: Ident::synthetic(*v),
            is_static: false,
            hint: None,
            span: Span::default(),
        })),
        methods: arena.alloc_slice_copy(methods),
        span: Span::default(),
    })
}

// ============================================================================
// Statement emitter
// ============================================================================

/// Emits expression statements, `echo`, `return` and `static`; enough to
/// drive the assembler end to end.
#[derive(Debug, Default)]
pub struct MiniEmitter {
    pub calls: usize,
}

fn emit_return(state: &EmitState, mut out: InstrSeq) -> InstrSeq {
    if state.config.verify_return {
        out.push(Instruct::VerifyRetTypeC);
    }
    if state.config.num_out > 0 {
        out.append(state.config.verify_out.clone());
    }
    out.push(Instruct::RetC);
    out
}

impl<'ast> StmtEmitter<'ast> for MiniEmitter {
    fn emit_stmts(
        &mut self,
        state: &mut EmitState,
        env: &Env<'_, 'ast>,
        stmts: &'ast [Stmt<'ast>],
    ) -> Result<InstrSeq> {
        let mut out = InstrSeq::new();
        for stmt in stmts {
            match stmt {
                Stmt::Expr(s) => {
                    out.append(self.emit_expr(state, env, &s.expr)?);
                    out.push(Instruct::PopC);
                }
                Stmt::Echo(s) => {
                    for arg in s.args {
                        out.append(self.emit_expr(state, env, arg)?);
                        out.push(Instruct::Print);
                        out.push(Instruct::PopC);
                    }
                }
                Stmt::Return(s) => {
                    let value = match &s.value {
                        Some(v) => self.emit_expr(state, env, v)?,
                        None => state.config.default_return_value.clone(),
                    };
                    out.append(emit_return(state, value));
                }
                Stmt::Static(s) => {
                    for var in s.vars {
                        out.append(emit_static_decl(self, state, env, var)?);
                    }
                }
                other => {
                    return Err(CompileError::internal(format!(
                        "unsupported statement at {}",
                        other.span()
                    )));
                }
            }
        }
        if !matches!(stmts.last(), Some(Stmt::Return(_))) {
            let dropthrough = match &state.config.default_dropthrough {
                Some(code) => code.clone(),
                None => emit_return(state, state.config.default_return_value.clone()),
            };
            out.append(dropthrough);
        }
        Ok(out)
    }

    fn emit_expr(
        &mut self,
        state: &mut EmitState,
        env: &Env<'_, 'ast>,
        expr: &'ast Expr<'ast>,
    ) -> Result<InstrSeq> {
        Ok(match expr {
            Expr::Null(_) => InstrSeq::one(Instruct::Null),
            Expr::Int(i, _) => InstrSeq::one(Instruct::Int(*i)),
            Expr::String(s, _) => InstrSeq::one(Instruct::string(*s)),
            Expr::Lvar(v) if v.name == "$this" && !env.needs_local_this => {
                InstrSeq::one(Instruct::This)
            }
            Expr::Lvar(v) => InstrSeq::one(Instruct::CGetL(Local::named(v.name))),
            Expr::ObjGet(e) => {
                let mut out = self.emit_expr(state, env, &e.object)?;
                out.push(Instruct::string(e.prop.name));
                out.push(Instruct::Concat);
                out
            }
            Expr::Call(e) => {
                self.calls += 1;
                let mut out = InstrSeq::new();
                for arg in e.args {
                    out.append(self.emit_expr(state, env, arg)?);
                }
                out.push(Instruct::FCallBuiltin {
                    nargs: e.args.len() as u32,
                    name: e.callee.name.to_string(),
                });
                out
            }
            other => {
                return Err(CompileError::internal(format!(
                    "unsupported expression at {}",
                    other.span()
                )));
            }
        })
    }
}
