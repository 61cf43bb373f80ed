//! Shared helpers for unit tests: AST builders and a small statement
//! emitter that covers the constructs the tests use.

use bumpalo::Bump;
use hackbc_ast::ast::*;
use hackbc_core::{CompileError, FaultRegion, InstrSeq, Instruct, Label, Local, Span};

use crate::emit::EmitState;
use crate::emitter::StmtEmitter;
use crate::env::Env;
use crate::static_vars::emit_static_decl;

type Result<T> = std::result::Result<T, CompileError>;

// ============================================================================
// AST builders
// ============================================================================

pub fn ident(name: &str) -> Ident<'_> {
    Ident::synthetic(name)
}

pub fn lvar(name: &str) -> Expr<'_> {
    Expr::Lvar(Ident::synthetic(name))
}

pub fn int<'a>(value: i64) -> Expr<'a> {
    Expr::Int(value, Span::default())
}

pub fn string(value: &str) -> Expr<'_> {
    Expr::String(value, Span::default())
}

pub fn param(name: &str) -> Param<'_> {
    Param::simple(Ident::synthetic(name))
}

pub fn expr_stmt(expr: Expr<'_>) -> Stmt<'_> {
    Stmt::Expr(ExprStmt {
        expr,
        span: Span::default(),
    })
}

pub fn echo<'a>(arena: &'a Bump, args: &[Expr<'a>]) -> Stmt<'a> {
    Stmt::Echo(EchoStmt {
        args: arena.alloc_slice_copy(args),
        span: Span::default(),
    })
}

pub fn assign_stmt<'a>(arena: &'a Bump, target: Expr<'a>, value: Expr<'a>) -> Stmt<'a> {
    expr_stmt(Expr::Assign(arena.alloc(AssignExpr {
        target,
        value,
        span: Span::default(),
    })))
}

pub fn return_stmt(value: Option<Expr<'_>>) -> Stmt<'_> {
    Stmt::Return(ReturnStmt {
        value,
        span: Span::default(),
    })
}

pub fn yield_expr<'a>(arena: &'a Bump, key: Option<Expr<'a>>, value: Expr<'a>) -> Expr<'a> {
    Expr::Yield(arena.alloc(YieldExpr {
        key,
        value,
        span: Span::default(),
    }))
}

pub fn obj_get<'a>(arena: &'a Bump, object: Expr<'a>, prop: &'a str) -> Expr<'a> {
    Expr::ObjGet(arena.alloc(ObjGetExpr {
        object,
        prop: Ident::synthetic(prop),
        span: Span::default(),
    }))
}

pub fn static_stmt<'a>(arena: &'a Bump, name: &'a str, init: Option<Expr<'a>>) -> Stmt<'a> {
    Stmt::Static(StaticStmt {
        vars: arena.alloc_slice_copy(&[StaticVar {
            name: Ident::synthetic(name),
            init,
        }]),
        span: Span::default(),
    })
}

pub fn try_finally<'a>(arena: &'a Bump, body: &[Stmt<'a>], finally: &[Stmt<'a>]) -> Stmt<'a> {
    let sp = Span::default();
    Stmt::Try(arena.alloc(TryStmt {
        body: Block {
            stmts: arena.alloc_slice_copy(body),
            span: sp,
        },
        catches: &[],
        finally: Block {
            stmts: arena.alloc_slice_copy(finally),
            span: sp,
        },
        span: sp,
    }))
}

pub fn tparams<'a>(arena: &'a Bump, names: &[&'a str]) -> &'a [TParam<'a>] {
    arena.alloc_slice_fill_iter(names.iter().map(|n| TParam {
        name: Ident::synthetic(*n),
    }))
}

pub fn fun<'a>(
    arena: &'a Bump,
    name: &'a str,
    params: &[Param<'a>],
    body: &[Stmt<'a>],
) -> &'a FunDef<'a> {
    arena.alloc(FunDef {
        name: Ident::synthetic(name),
        tparams: &[],
        params: arena.alloc_slice_copy(params),
        ret: None,
        body: arena.alloc_slice_copy(body),
        is_async: false,
        user_attributes: &[],
        doc_comment: None,
        span: Span::default(),
    })
}

pub fn method<'a>(
    arena: &'a Bump,
    name: &'a str,
    is_static: bool,
    params: &[Param<'a>],
    body: &[Stmt<'a>],
) -> &'a MethodDef<'a> {
    arena.alloc(MethodDef {
        name: Ident::synthetic(name),
        tparams: &[],
        params: arena.alloc_slice_copy(params),
        ret: None,
        body: arena.alloc_slice_copy(body),
        is_async: false,
        is_static,
        is_abstract: false,
        user_attributes: &[],
        doc_comment: None,
        span: Span::default(),
    })
}

pub fn class<'a>(arena: &'a Bump, name: &'a str, vars: &[&'a str]) -> &'a ClassDef<'a> {
    arena.alloc(ClassDef {
        name: Ident::synthetic(name),
        kind: ClassKind::Class,
        tparams: &[],
        vars: arena.alloc_slice_fill_iter(vars.iter().map(|v| ClassVar {
            name: Ident::synthetic(*v),
            is_static: false,
            hint: None,
            span: Span::default(),
        })),
        methods: &[],
        span: Span::default(),
    })
}

pub fn lambda<'a>(arena: &'a Bump, uses: &[&'a str], body: &[Stmt<'a>]) -> &'a LambdaExpr<'a> {
    arena.alloc(LambdaExpr {
        fun: fun(arena, "{closure}", &[], body),
        uses: arena.alloc_slice_fill_iter(uses.iter().map(|u| Ident::synthetic(*u))),
        is_short: false,
        span: Span::default(),
    })
}

pub fn named_hint(name: &str) -> Hint<'_> {
    Hint::named(name, Span::default())
}

pub fn option_hint<'a>(arena: &'a Bump, inner: Hint<'a>) -> Hint<'a> {
    Hint::new(HintKind::Option(arena.alloc(inner)), Span::default())
}

pub fn soft_hint<'a>(arena: &'a Bump, inner: Hint<'a>) -> Hint<'a> {
    Hint::new(HintKind::Soft(arena.alloc(inner)), Span::default())
}

pub fn app_hint<'a>(arena: &'a Bump, name: &'a str, targs: &[Hint<'a>]) -> Hint<'a> {
    Hint::new(
        HintKind::Apply {
            name: Ident::synthetic(name),
            targs: arena.alloc_slice_copy(targs),
        },
        Span::default(),
    )
}

// ============================================================================
// Statement emitter
// ============================================================================

/// Emitter for the statement and expression forms used in tests.
#[derive(Debug, Default)]
pub struct TestEmitter;

fn unsupported(what: &str) -> CompileError {
    CompileError::internal(format!("test emitter does not support {}", what))
}

fn emit_return(state: &EmitState, value: InstrSeq) -> InstrSeq {
    let mut out = value;
    if state.config.verify_return {
        out.push(Instruct::VerifyRetTypeC);
    }
    if state.config.num_out > 0 {
        out.append(state.config.verify_out.clone());
    }
    out.push(Instruct::RetC);
    out
}

impl TestEmitter {
    fn emit_block<'ast>(
        &mut self,
        state: &mut EmitState,
        env: &Env<'_, 'ast>,
        stmts: &'ast [Stmt<'ast>],
    ) -> Result<InstrSeq> {
        let mut out = InstrSeq::new();
        for stmt in stmts {
            out.append(self.emit_stmt(state, env, stmt)?);
        }
        Ok(out)
    }

    fn emit_stmt<'ast>(
        &mut self,
        state: &mut EmitState,
        env: &Env<'_, 'ast>,
        stmt: &'ast Stmt<'ast>,
    ) -> Result<InstrSeq> {
        match stmt {
            Stmt::Expr(s) => {
                let mut out = self.emit_expr(state, env, &s.expr)?;
                out.push(Instruct::PopC);
                Ok(out)
            }
            Stmt::Echo(s) => {
                let mut out = InstrSeq::new();
                for arg in s.args {
                    out.append(self.emit_expr(state, env, arg)?);
                    out.push(Instruct::Print);
                    out.push(Instruct::PopC);
                }
                Ok(out)
            }
            Stmt::Return(s) => {
                let value = match &s.value {
                    Some(value) => self.emit_expr(state, env, value)?,
                    None => state.config.default_return_value.clone(),
                };
                Ok(emit_return(state, value))
            }
            Stmt::Throw(s) => {
                let mut out = self.emit_expr(state, env, &s.expr)?;
                out.push(Instruct::Throw);
                Ok(out)
            }
            Stmt::Block(b) => self.emit_block(state, env, b.stmts),
            Stmt::Static(s) => {
                let mut out = InstrSeq::new();
                for var in s.vars {
                    out.append(emit_static_decl(self, state, env, var)?);
                }
                Ok(out)
            }
            Stmt::Try(s) => {
                let fault_label = state.labels.next_regular();
                let body = self.emit_block(state, env, s.body.stmts)?;
                let mut handler = self.emit_block(state, env, s.finally.stmts)?;
                handler.push(Instruct::Unwind);
                let mut out = InstrSeq::one(Instruct::TryFault(Box::new(FaultRegion {
                    fault_label,
                    body,
                    handler,
                })));
                out.append(self.emit_block(state, env, s.finally.stmts)?);
                Ok(out)
            }
            Stmt::While(s) => {
                let start = state.labels.next_regular();
                let end = state.labels.next_regular();
                let mut out = InstrSeq::one(Instruct::Label(start.clone()));
                out.append(self.emit_expr(state, env, &s.condition)?);
                out.push(Instruct::JmpZ(end.clone()));
                state.jumps.enter_loop(end.clone(), start.clone(), None);
                let body = self.emit_block(state, env, s.body.stmts);
                state.jumps.exit_loop();
                out.append(body?);
                out.push(Instruct::Jmp(start));
                out.push(Instruct::Label(end));
                Ok(out)
            }
            Stmt::Break(span) => {
                let (label, _) = state.jumps.break_target(*span)?;
                Ok(InstrSeq::one(Instruct::Jmp(label)))
            }
            Stmt::Continue(span) => {
                let label = state.jumps.continue_target(*span)?;
                Ok(InstrSeq::one(Instruct::Jmp(label)))
            }
            Stmt::GotoLabel(id) => Ok(InstrSeq::one(Instruct::Label(Label::Named(
                id.name.to_string(),
            )))),
            Stmt::Goto(id) => {
                let label = state.jumps.goto_target(id.name, id.span)?;
                Ok(InstrSeq::one(Instruct::Jmp(label)))
            }
            Stmt::Noop(_) => Ok(InstrSeq::new()),
            Stmt::If(_) | Stmt::Foreach(_) | Stmt::Unset(_) => Err(unsupported("this statement")),
        }
    }
}

impl<'ast> StmtEmitter<'ast> for TestEmitter {
    fn emit_stmts(
        &mut self,
        state: &mut EmitState,
        env: &Env<'_, 'ast>,
        stmts: &'ast [Stmt<'ast>],
    ) -> Result<InstrSeq> {
        let mut out = self.emit_block(state, env, stmts)?;
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
        let instrs = match expr {
            Expr::Null(_) => InstrSeq::one(Instruct::Null),
            Expr::Bool(true, _) => InstrSeq::one(Instruct::True),
            Expr::Bool(false, _) => InstrSeq::one(Instruct::False),
            Expr::Int(i, _) => InstrSeq::one(Instruct::Int(*i)),
            Expr::Float(f, _) => InstrSeq::one(Instruct::double(*f)),
            Expr::String(s, _) => InstrSeq::one(Instruct::string(*s)),
            Expr::Lvar(id) => {
                if id.name == "$this" && env.scope.has_this() && !env.needs_local_this {
                    InstrSeq::one(Instruct::This)
                } else {
                    InstrSeq::one(Instruct::CGetL(Local::named(id.name)))
                }
            }
            Expr::Binary(e) => {
                let op = match e.op {
                    BinaryOp::Add => Instruct::Add,
                    BinaryOp::Concat => Instruct::Concat,
                    _ => return Err(unsupported("this operator")),
                };
                let mut out = self.emit_expr(state, env, &e.left)?;
                out.append(self.emit_expr(state, env, &e.right)?);
                out.push(op);
                out
            }
            Expr::Assign(e) => {
                let name = e.target.as_lvar().ok_or_else(|| unsupported("this target"))?;
                let mut out = self.emit_expr(state, env, &e.value)?;
                out.push(Instruct::SetL(Local::named(name)));
                out
            }
            Expr::Yield(e) => {
                let mut out = InstrSeq::new();
                if let Some(key) = &e.key {
                    out.append(self.emit_expr(state, env, key)?);
                }
                out.append(self.emit_expr(state, env, &e.value)?);
                out.push(if e.key.is_some() {
                    Instruct::YieldK
                } else {
                    Instruct::Yield
                });
                out
            }
            Expr::Await(e) => {
                let mut out = self.emit_expr(state, env, &e.expr)?;
                out.push(Instruct::Await);
                out
            }
            Expr::Call(e) => {
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
            Expr::Vec(e) => {
                let mut out = InstrSeq::new();
                for elem in e.elems {
                    out.append(self.emit_expr(state, env, elem)?);
                }
                out.push(Instruct::NewVecArray(e.elems.len() as u32));
                out
            }
            Expr::ObjGet(_) | Expr::New(_) | Expr::Lambda(_) => {
                return Err(unsupported("this expression"));
            }
        };
        Ok(instrs)
    }
}
