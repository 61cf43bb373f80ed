//! Cross-body registries computed before assembly.
//!
//! Two facts about a definition depend on its whole body and are needed
//! before its statements are emitted: whether it contains a `finally`
//! (which needs two reserved locals) and which `goto` labels it declares.
//! Both are keyed by [`DefHash`] and read-only during assembly, so one
//! `GlobalState` can be shared by every worker.

use hackbc_ast::ast::{ClassDef, Def, FunDef, LambdaExpr, Program, Stmt, Visitor, walk_stmt};
use hackbc_core::{DefHash, FunctionStateKey};
use rustc_hash::{FxHashMap, FxHashSet};

/// Registries shared by all bodies of a unit.
#[derive(Debug, Clone, Default)]
pub struct GlobalState {
    functions_with_finally: FxHashSet<DefHash>,
    function_to_labels: FxHashMap<DefHash, FxHashSet<String>>,
}

impl GlobalState {
    /// Empty registries.
    pub fn new() -> Self {
        Self::default()
    }

    /// Record that a definition contains a `finally` region.
    pub fn register_finally(&mut self, key: &FunctionStateKey) {
        self.functions_with_finally.insert(key.hash());
    }

    /// Record the `goto` labels a definition declares.
    pub fn register_labels(
        &mut self,
        key: &FunctionStateKey,
        labels: impl IntoIterator<Item = String>,
    ) {
        self.function_to_labels
            .entry(key.hash())
            .or_default()
            .extend(labels);
    }

    /// Whether a definition contains a `finally` region.
    pub fn has_finally(&self, key: &FunctionStateKey) -> bool {
        self.functions_with_finally.contains(&key.hash())
    }

    /// The labels a definition declares, if it uses `goto`.
    pub fn labels(&self, key: &FunctionStateKey) -> Option<&FxHashSet<String>> {
        self.function_to_labels.get(&key.hash())
    }

    /// Compute the registries for every definition of a program.
    pub fn from_program(program: &Program<'_>) -> Self {
        let mut state = Self::new();
        let mut toplevel = BodyFacts::default();
        state.collect_defs(program.defs(), &mut toplevel);
        state.record(&FunctionStateKey::TopLevel, toplevel);
        state
    }

    fn collect_defs<'ast>(&mut self, defs: &[Def<'ast>], toplevel: &mut BodyFacts) {
        for def in defs {
            match def {
                Def::Fun(fd) => self.collect_fun(fd),
                Def::Class(cd) => self.collect_class(cd),
                Def::Stmt(stmt) => toplevel.visit_stmt(stmt),
                Def::Namespace(ns) => self.collect_defs(ns.defs, toplevel),
                Def::NamespaceUse(_) => {}
            }
        }
    }

    fn collect_fun(&mut self, fd: &FunDef<'_>) {
        let facts = BodyFacts::of(fd.body);
        self.record(&FunctionStateKey::function(fd.name.name), facts);
    }

    fn collect_class(&mut self, cd: &ClassDef<'_>) {
        for md in cd.methods {
            let facts = BodyFacts::of(md.body);
            self.record(&FunctionStateKey::method(cd.name.name, md.name.name), facts);
        }
    }

    fn record(&mut self, key: &FunctionStateKey, facts: BodyFacts) {
        if facts.has_finally {
            self.register_finally(key);
        }
        if facts.has_goto {
            self.register_labels(key, facts.labels);
        }
    }
}

/// Per-body scan for `finally`, `goto` and user labels.
///
/// Does not descend into lambdas; closure bodies are registered as methods
/// of their closure class.
#[derive(Default)]
struct BodyFacts {
    has_finally: bool,
    has_goto: bool,
    labels: Vec<String>,
}

impl BodyFacts {
    fn of(body: &[Stmt<'_>]) -> Self {
        let mut facts = Self::default();
        facts.visit_stmts(body);
        facts
    }
}

impl<'ast> Visitor<'ast> for BodyFacts {
    fn visit_stmt(&mut self, stmt: &Stmt<'ast>) {
        match stmt {
            Stmt::Try(t) if t.has_finally() => self.has_finally = true,
            Stmt::Goto(_) => self.has_goto = true,
            Stmt::GotoLabel(id) => self.labels.push(id.name.to_string()),
            _ => {}
        }
        walk_stmt(self, stmt);
    }

    fn visit_lambda(&mut self, _lambda: &LambdaExpr<'ast>) {}
}
