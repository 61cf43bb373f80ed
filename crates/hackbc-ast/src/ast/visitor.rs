//! Read-only AST traversal.
//!
//! Implement [`Visitor`] and override the `visit_*` hooks of interest; the
//! default implementations call the matching `walk_*` function, which
//! visits every child node. Overriding a hook without calling `walk_*`
//! prunes that subtree.
//!
//! ```
//! use hackbc_ast::ast::{Expr, Visitor, walk_expr};
//!
//! struct CountVars(usize);
//!
//! impl<'ast> Visitor<'ast> for CountVars {
//!     fn visit_expr(&mut self, expr: &Expr<'ast>) {
//!         if let Expr::Lvar(_) = expr {
//!             self.0 += 1;
//!         }
//!         walk_expr(self, expr);
//!     }
//! }
//! ```

use crate::ast::*;

/// AST visitor with default recursive traversal.
pub trait Visitor<'ast>: Sized {
    fn visit_stmts(&mut self, stmts: &[Stmt<'ast>]) {
        for stmt in stmts {
            self.visit_stmt(stmt);
        }
    }

    fn visit_stmt(&mut self, stmt: &Stmt<'ast>) {
        walk_stmt(self, stmt);
    }

    fn visit_block(&mut self, block: &Block<'ast>) {
        self.visit_stmts(block.stmts);
    }

    fn visit_expr(&mut self, expr: &Expr<'ast>) {
        walk_expr(self, expr);
    }

    fn visit_lambda(&mut self, lambda: &LambdaExpr<'ast>) {
        walk_lambda(self, lambda);
    }

    fn visit_static_var(&mut self, var: &StaticVar<'ast>) {
        if let Some(init) = &var.init {
            self.visit_expr(init);
        }
    }
}

/// Visit the children of a statement.
pub fn walk_stmt<'ast, V: Visitor<'ast>>(v: &mut V, stmt: &Stmt<'ast>) {
    match stmt {
        Stmt::Expr(s) | Stmt::Throw(s) => v.visit_expr(&s.expr),
        Stmt::Echo(s) => {
            for arg in s.args {
                v.visit_expr(arg);
            }
        }
        Stmt::Return(s) => {
            if let Some(value) = &s.value {
                v.visit_expr(value);
            }
        }
        Stmt::Block(b) => v.visit_block(b),
        Stmt::If(s) => {
            v.visit_expr(&s.condition);
            v.visit_block(&s.then_branch);
            v.visit_block(&s.else_branch);
        }
        Stmt::While(s) => {
            v.visit_expr(&s.condition);
            v.visit_block(&s.body);
        }
        Stmt::Foreach(s) => {
            v.visit_expr(&s.collection);
            if let Some(key) = &s.key {
                v.visit_expr(key);
            }
            v.visit_expr(&s.value);
            v.visit_block(&s.body);
        }
        Stmt::Try(s) => {
            v.visit_block(&s.body);
            for catch in s.catches {
                v.visit_expr(&Expr::Lvar(catch.var));
                v.visit_block(&catch.body);
            }
            v.visit_block(&s.finally);
        }
        Stmt::Static(s) => {
            for var in s.vars {
                v.visit_static_var(var);
            }
        }
        Stmt::Unset(s) => {
            for target in s.targets {
                v.visit_expr(target);
            }
        }
        Stmt::Break(_)
        | Stmt::Continue(_)
        | Stmt::Noop(_)
        | Stmt::GotoLabel(_)
        | Stmt::Goto(_) => {}
    }
}

/// Visit the children of an expression.
pub fn walk_expr<'ast, V: Visitor<'ast>>(v: &mut V, expr: &Expr<'ast>) {
    match expr {
        Expr::Null(_)
        | Expr::Bool(..)
        | Expr::Int(..)
        | Expr::Float(..)
        | Expr::String(..)
        | Expr::Lvar(_) => {}
        Expr::Binary(e) => {
            v.visit_expr(&e.left);
            v.visit_expr(&e.right);
        }
        Expr::Assign(e) => {
            v.visit_expr(&e.target);
            v.visit_expr(&e.value);
        }
        Expr::ObjGet(e) => v.visit_expr(&e.object),
        Expr::Call(e) => {
            for arg in e.args {
                v.visit_expr(arg);
            }
        }
        Expr::New(e) => {
            for arg in e.args {
                v.visit_expr(arg);
            }
        }
        Expr::Yield(e) => {
            if let Some(key) = &e.key {
                v.visit_expr(key);
            }
            v.visit_expr(&e.value);
        }
        Expr::Await(e) => v.visit_expr(&e.expr),
        Expr::Lambda(l) => v.visit_lambda(l),
        Expr::Vec(e) => {
            for elem in e.elems {
                v.visit_expr(elem);
            }
        }
    }
}

/// Visit the parameter defaults and body of a lambda.
pub fn walk_lambda<'ast, V: Visitor<'ast>>(v: &mut V, lambda: &LambdaExpr<'ast>) {
    for param in lambda.fun.params {
        if let Some(default) = &param.default {
            v.visit_expr(default);
        }
    }
    v.visit_stmts(lambda.fun.body);
}
