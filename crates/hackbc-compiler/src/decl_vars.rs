//! Declared-variable resolution.
//!
//! Computes the named locals a body needs beyond its parameters. Order
//! matters: it fixes local slot numbers.
//!
//! # Ordering
//!
//! - Plain bodies: first-seen order.
//! - Methods (non-static) and top-level code: `$this` moves to the end.
//! - Closure bodies: `$0Closure`, then the closure class's captured
//!   properties in declaration order, then any other explicitly used
//!   variables, then the rest (with `$this` last). Names are never
//!   repeated; the earlier position wins.

use hackbc_ast::ast::{Expr, LambdaExpr, Param, Stmt, StaticVar, Visitor, walk_expr};
use hackbc_core::CompileError;

use crate::scope::Scope;

type Result<T> = std::result::Result<T, CompileError>;

/// Name of the local holding the closure object.
pub const CLOSURE_LOCAL: &str = "$0Closure";

/// Closure-class properties with this prefix hold static locals, not captures.
pub const STATIC_PROP_PREFIX: &str = "86static_";

const THIS: &str = "$this";

const SUPERGLOBALS: &[&str] = &[
    "$GLOBALS", "$_SERVER", "$_GET", "$_POST", "$_FILES", "$_COOKIE", "$_SESSION", "$_REQUEST",
    "$_ENV",
];

/// Whether `name` is a superglobal, which never needs a local.
pub fn is_superglobal(name: &str) -> bool {
    SUPERGLOBALS.contains(&name)
}

/// Result of declared-variable resolution.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeclVars {
    /// Whether `$this` must be copied into a local.
    pub needs_local_this: bool,
    /// Ordered, distinct local names.
    pub names: Vec<String>,
}

// ============================================================================
// Collection
// ============================================================================

struct Collector {
    has_this: bool,
    needs_local_this: bool,
    names: Vec<String>,
}

impl Collector {
    fn add(&mut self, name: &str) {
        if !self.names.iter().any(|n| n == name) {
            self.names.push(name.to_string());
        }
    }

    /// Record a variable reference. `bare` is false for `$this->prop`.
    fn add_local(&mut self, name: &str, bare: bool) {
        if name == THIS {
            if !self.has_this {
                self.add(name);
            } else if bare {
                self.needs_local_this = true;
                self.add(name);
            }
        } else if !is_superglobal(name) {
            self.add(name);
        }
    }
}

impl<'ast> Visitor<'ast> for Collector {
    fn visit_expr(&mut self, expr: &Expr<'ast>) {
        match expr {
            Expr::Lvar(id) => self.add_local(id.name, true),
            Expr::ObjGet(e) => match e.object {
                Expr::Lvar(id) => self.add_local(id.name, false),
                _ => walk_expr(self, expr),
            },
            _ => walk_expr(self, expr),
        }
    }

    /// A lambda's body has its own locals; only its captures count here.
    fn visit_lambda(&mut self, lambda: &LambdaExpr<'ast>) {
        for id in lambda.uses {
            self.add_local(id.name, true);
        }
    }

    fn visit_static_var(&mut self, var: &StaticVar<'ast>) {
        self.add_local(var.name.name, true);
        if let Some(init) = &var.init {
            self.visit_expr(init);
        }
    }
}

fn move_this_last(mut names: Vec<String>) -> Vec<String> {
    if let Some(pos) = names.iter().position(|n| n == THIS) {
        let this = names.remove(pos);
        names.push(this);
    }
    names
}

// ============================================================================
// Resolution
// ============================================================================

/// Resolve the declared variables of a body.
///
/// Parameter default values are scanned along with the body; parameter
/// names themselves are excluded. Closure bodies must be scoped inside a
/// method of their closure class.
pub fn from_ast(
    scope: &Scope<'_>,
    params: &[Param<'_>],
    body: &[Stmt<'_>],
    is_closure_body: bool,
    explicit_uses: &[String],
) -> Result<DeclVars> {
    let mut collector = Collector {
        has_this: scope.has_this(),
        needs_local_this: false,
        names: Vec::new(),
    };
    for param in params {
        if let Some(default) = &param.default {
            collector.visit_expr(default);
        }
    }
    collector.visit_stmts(body);

    let mut names = collector.names;
    names.retain(|n| !params.iter().any(|p| p.name.name == n.as_str()));

    let names = if is_closure_body {
        let class = scope
            .get_class()
            .ok_or_else(|| CompileError::internal("closure body must be scoped in a method"))?;

        let mut ordered = vec![CLOSURE_LOCAL.to_string()];
        for var in class.vars {
            if var.name.name.starts_with(STATIC_PROP_PREFIX) {
                continue;
            }
            let local = format!("${}", var.name.name);
            if !ordered.contains(&local) {
                ordered.push(local);
            }
        }
        for used in explicit_uses {
            if !ordered.contains(used) {
                ordered.push(used.clone());
            }
        }
        let rest: Vec<String> = move_this_last(names)
            .into_iter()
            .filter(|n| !ordered.contains(n))
            .collect();
        ordered.extend(rest);
        ordered
    } else if (scope.get_class().is_some() && !scope.is_in_static_method()) || scope.is_toplevel() {
        move_this_last(names)
    } else {
        names
    };

    Ok(DeclVars {
        needs_local_this: collector.needs_local_this,
        names,
    })
}
