//! Lexical scope of a definition.
//!
//! A [`Scope`] is a stack of [`ScopeItem`]s, innermost first. It is built
//! once per definition by the definition emitters and only queried during
//! assembly.
//!
//! Shapes that occur in practice:
//!
//! ```text
//! []  or  [TopLevel]                          top-level code
//! [Function(f)]                               free function
//! [Method(m, C)]                              method of class C
//! [Method(__invoke, Closure), Lambda, ...]    closure body
//! ```

use hackbc_ast::ast::{ClassDef, FunDef, LambdaExpr, MethodDef};
use hackbc_core::{CompileError, FunctionStateKey};

type Result<T> = std::result::Result<T, CompileError>;

/// Name prefix of the classes closures are converted into.
pub const CLOSURE_CLASS_PREFIX: &str = "Closure$";

/// Whether `name` names a closure class.
pub fn is_closure_class(name: &str) -> bool {
    name.trim_start_matches('\\').starts_with(CLOSURE_CLASS_PREFIX)
}

// ============================================================================
// Types
// ============================================================================

/// One level of lexical nesting.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ScopeItem<'ast> {
    /// The pseudo-main body of the unit.
    TopLevel,
    /// A free function.
    Function(&'ast FunDef<'ast>),
    /// A method and its owning class.
    Method(&'ast MethodDef<'ast>, &'ast ClassDef<'ast>),
    /// An anonymous function.
    Lambda(&'ast LambdaExpr<'ast>),
}

/// Lexical scope stack, innermost first.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Scope<'ast> {
    items: Vec<ScopeItem<'ast>>,
}

// ============================================================================
// Construction
// ============================================================================

impl<'ast> Scope<'ast> {
    /// The top-level scope.
    pub fn toplevel() -> Self {
        Self {
            items: vec![ScopeItem::TopLevel],
        }
    }

    /// Build a scope from items, innermost first.
    ///
    /// `TopLevel` may only appear as the outermost item.
    pub fn try_new(items: Vec<ScopeItem<'ast>>) -> Result<Self> {
        let misplaced = items
            .iter()
            .rev()
            .skip(1)
            .any(|item| matches!(item, ScopeItem::TopLevel));
        if misplaced {
            return Err(CompileError::internal(
                "top-level scope item must be outermost",
            ));
        }
        Ok(Self { items })
    }

    /// Scope of a free function.
    pub fn function(fd: &'ast FunDef<'ast>) -> Self {
        Self {
            items: vec![ScopeItem::Function(fd)],
        }
    }

    /// Scope of a method.
    pub fn method(md: &'ast MethodDef<'ast>, cd: &'ast ClassDef<'ast>) -> Self {
        Self {
            items: vec![ScopeItem::Method(md, cd)],
        }
    }

    /// A new scope with `item` as the innermost level.
    pub fn push(&self, item: ScopeItem<'ast>) -> Self {
        let mut items = Vec::with_capacity(self.items.len() + 1);
        items.push(item);
        items.extend_from_slice(&self.items);
        Self { items }
    }

    /// Items, innermost first.
    pub fn items(&self) -> &[ScopeItem<'ast>] {
        &self.items
    }

    /// The innermost item.
    pub fn innermost(&self) -> Option<&ScopeItem<'ast>> {
        self.items.first()
    }
}

// ============================================================================
// Queries
// ============================================================================

impl<'ast> Scope<'ast> {
    /// Items with lambdas skipped.
    fn non_lambda(&self) -> impl Iterator<Item = &ScopeItem<'ast>> {
        self.items
            .iter()
            .filter(|item| !matches!(item, ScopeItem::Lambda(_)))
    }

    /// Whether the body runs with a `$this` instance.
    ///
    /// True when the innermost non-lambda item is a non-static method.
    pub fn has_this(&self) -> bool {
        matches!(
            self.non_lambda().next(),
            Some(ScopeItem::Method(md, _)) if !md.is_static
        )
    }

    /// Whether this is top-level code.
    pub fn is_toplevel(&self) -> bool {
        self.items
            .iter()
            .all(|item| matches!(item, ScopeItem::TopLevel))
    }

    /// Whether the innermost non-lambda item is a static method.
    pub fn is_in_static_method(&self) -> bool {
        matches!(
            self.non_lambda().next(),
            Some(ScopeItem::Method(md, _)) if md.is_static
        )
    }

    /// Whether the innermost item is a lambda.
    pub fn is_in_lambda(&self) -> bool {
        matches!(self.innermost(), Some(ScopeItem::Lambda(_)))
    }

    /// Whether this is the scope of a closure body: a method of a closure
    /// class, or a method directly inside a lambda.
    pub fn is_closure_body(&self) -> bool {
        match self.items.as_slice() {
            [ScopeItem::Method(..), ScopeItem::Lambda(_), ..] => true,
            [ScopeItem::Method(_, cd), ..] => is_closure_class(cd.name.name),
            _ => false,
        }
    }

    /// The lambda a closure body was converted from, if in scope.
    pub fn enclosing_lambda(&self) -> Option<&'ast LambdaExpr<'ast>> {
        self.items.iter().find_map(|item| match item {
            ScopeItem::Lambda(lam) => Some(*lam),
            _ => None,
        })
    }

    /// The class of the innermost non-lambda method, if any.
    pub fn get_class(&self) -> Option<&'ast ClassDef<'ast>> {
        match self.non_lambda().next() {
            Some(ScopeItem::Method(_, cd)) => Some(*cd),
            _ => None,
        }
    }

    /// Names of all generic parameters in scope, innermost first.
    pub fn get_tparams(&self) -> Vec<&'ast str> {
        let mut names = Vec::new();
        for item in &self.items {
            match item {
                ScopeItem::Function(fd) => names.extend(fd.tparams.iter().map(|t| t.name.name)),
                ScopeItem::Method(md, cd) => {
                    names.extend(md.tparams.iter().map(|t| t.name.name));
                    names.extend(cd.tparams.iter().map(|t| t.name.name));
                }
                ScopeItem::Lambda(_) | ScopeItem::TopLevel => {}
            }
        }
        names
    }

    /// Name of the innermost function or method.
    pub fn function_name(&self) -> Option<&'ast str> {
        match self.innermost() {
            Some(ScopeItem::Function(fd)) => Some(fd.name.name),
            Some(ScopeItem::Method(md, _)) => Some(md.name.name),
            _ => None,
        }
    }

    /// Key for the cross-body registries.
    ///
    /// Fails for any scope shape other than top-level, method or function.
    pub fn function_state_key(&self) -> Result<FunctionStateKey> {
        if self.is_toplevel() {
            return Ok(FunctionStateKey::TopLevel);
        }
        match self.innermost() {
            Some(ScopeItem::Method(md, cd)) => {
                Ok(FunctionStateKey::method(cd.name.name, md.name.name))
            }
            Some(ScopeItem::Function(fd)) => Ok(FunctionStateKey::function(fd.name.name)),
            _ => Err(CompileError::internal(
                "unexpected scope shape for function state key",
            )),
        }
    }
}
