//! Generator classification.

use hackbc_ast::ast::{Expr, LambdaExpr, Stmt, Visitor, walk_expr};
use hackbc_core::{InstrSeq, Instruct};

#[derive(Default)]
struct YieldFinder {
    is_generator: bool,
    is_pair: bool,
}

impl<'ast> Visitor<'ast> for YieldFinder {
    fn visit_expr(&mut self, expr: &Expr<'ast>) {
        if let Expr::Yield(y) = expr {
            self.is_generator = true;
            self.is_pair |= y.key.is_some();
        }
        walk_expr(self, expr);
    }

    // Yields inside a lambda make the lambda the generator.
    fn visit_lambda(&mut self, _lambda: &LambdaExpr<'ast>) {}
}

/// Returns `(is_generator, is_pair_generator)` for a body.
///
/// A pair generator yields at least one key.
pub fn is_function_generator(body: &[Stmt<'_>]) -> (bool, bool) {
    let mut finder = YieldFinder::default();
    finder.visit_stmts(body);
    (finder.is_generator, finder.is_pair)
}

/// Prefix creating the continuation object on entry.
pub fn emit_generator_prefix(is_generator: bool) -> InstrSeq {
    if is_generator {
        InstrSeq::from(vec![Instruct::CreateCont, Instruct::PopC])
    } else {
        InstrSeq::new()
    }
}
