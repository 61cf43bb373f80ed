//! Static local variables.
//!
//! A `static $x = init;` with a literal initializer compiles to the VM's
//! one-shot `StaticLocInit`. Any other initializer must run only the first
//! time the declaration executes, so the statement emitter emits a bare
//! `StaticLocInit $x` and the assembler rewrites it to:
//!
//! ```text
//! StaticLocCheck $x
//! JmpNZ L
//! <init>
//! StaticLocDef $x
//! L:
//! ```

use hackbc_ast::ast::{Stmt, StaticVar};
use hackbc_core::{CompileError, FaultRegion, InstrSeq, Instruct, Local};
use rustc_hash::FxHashMap;

use crate::emit::EmitState;
use crate::emitter::StmtEmitter;
use crate::env::Env;

type Result<T> = std::result::Result<T, CompileError>;

/// Code for one static declaration.
///
/// Missing initializers default to `null`.
pub fn emit_static_decl<'ast, E: StmtEmitter<'ast> + ?Sized>(
    emitter: &mut E,
    state: &mut EmitState,
    env: &Env<'_, 'ast>,
    var: &'ast StaticVar<'ast>,
) -> Result<InstrSeq> {
    let local = Local::named(var.name.name);
    let mut out = match &var.init {
        None => InstrSeq::one(Instruct::Null),
        Some(init) if init.is_literal() => emitter.emit_expr(state, env, init)?,
        Some(_) => InstrSeq::new(),
    };
    out.push(Instruct::StaticLocInit(local));
    Ok(out)
}

/// Static variables of a body and their deferred initializers.
#[derive(Debug, Default)]
pub struct StaticVarMap {
    order: Vec<String>,
    inits: FxHashMap<String, InstrSeq>,
}

impl StaticVarMap {
    /// Collect the static declarations of a body, first-seen order.
    ///
    /// Non-literal initializers are emitted here. Lambda bodies are not
    /// searched. Declaring the same static twice in one body is a parse
    /// fatal.
    pub fn from_body<'ast, E: StmtEmitter<'ast> + ?Sized>(
        emitter: &mut E,
        state: &mut EmitState,
        env: &Env<'_, 'ast>,
        body: &'ast [Stmt<'ast>],
    ) -> Result<Self> {
        let mut map = Self::default();
        map.collect(emitter, state, env, body)?;
        Ok(map)
    }

    fn collect<'ast, E: StmtEmitter<'ast> + ?Sized>(
        &mut self,
        emitter: &mut E,
        state: &mut EmitState,
        env: &Env<'_, 'ast>,
        stmts: &'ast [Stmt<'ast>],
    ) -> Result<()> {
        for stmt in stmts {
            match stmt {
                Stmt::Static(s) => {
                    for var in s.vars {
                        self.add(emitter, state, env, var)?;
                    }
                }
                Stmt::Block(b) => self.collect(emitter, state, env, b.stmts)?,
                Stmt::If(s) => {
                    self.collect(emitter, state, env, s.then_branch.stmts)?;
                    self.collect(emitter, state, env, s.else_branch.stmts)?;
                }
                Stmt::While(s) => self.collect(emitter, state, env, s.body.stmts)?,
                Stmt::Foreach(s) => self.collect(emitter, state, env, s.body.stmts)?,
                Stmt::Try(s) => {
                    self.collect(emitter, state, env, s.body.stmts)?;
                    for catch in s.catches {
                        self.collect(emitter, state, env, catch.body.stmts)?;
                    }
                    self.collect(emitter, state, env, s.finally.stmts)?;
                }
                _ => {}
            }
        }
        Ok(())
    }

    fn add<'ast, E: StmtEmitter<'ast> + ?Sized>(
        &mut self,
        emitter: &mut E,
        state: &mut EmitState,
        env: &Env<'_, 'ast>,
        var: &'ast StaticVar<'ast>,
    ) -> Result<()> {
        let name = var.name.name;
        if self.order.iter().any(|n| n == name) {
            return Err(CompileError::parse(
                var.name.span,
                format!("Duplicate declaration of static variable {}", name),
            ));
        }
        self.order.push(name.to_string());
        if let Some(init) = &var.init {
            if !init.is_literal() {
                let code = emitter.emit_expr(state, env, init)?;
                self.inits.insert(name.to_string(), code);
            }
        }
        Ok(())
    }

    /// Static variable names in first-seen order.
    pub fn names(&self) -> &[String] {
        &self.order
    }

    /// Consume the map, keeping the names.
    pub fn into_names(self) -> Vec<String> {
        self.order
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Deferred initializer of `name`, if it has a non-literal one.
    pub fn init(&self, name: &str) -> Option<&InstrSeq> {
        self.inits.get(name)
    }

    /// Rewrite every `StaticLocInit` of a deferred variable into its
    /// guarded form. Applying the rewrite twice changes nothing.
    pub fn rewrite(&self, state: &mut EmitState, instrs: InstrSeq) -> InstrSeq {
        if self.inits.is_empty() {
            return instrs;
        }
        instrs.flat_map(|instr| match instr {
            Instruct::StaticLocInit(Local::Named(name)) => match self.inits.get(&name) {
                Some(init) => {
                    let local = Local::Named(name);
                    let done = state.labels.next_regular();
                    let mut out = vec![
                        Instruct::StaticLocCheck(local.clone()),
                        Instruct::JmpNZ(done.clone()),
                    ];
                    out.extend(init.iter().cloned());
                    out.push(Instruct::StaticLocDef(local));
                    out.push(Instruct::Label(done));
                    out
                }
                None => vec![Instruct::StaticLocInit(Local::Named(name))],
            },
            Instruct::TryFault(region) => {
                let FaultRegion {
                    fault_label,
                    body,
                    handler,
                } = *region;
                vec![Instruct::TryFault(Box::new(FaultRegion {
                    fault_label,
                    body: self.rewrite(state, body),
                    handler: self.rewrite(state, handler),
                }))]
            }
            other => vec![other],
        })
    }
}
