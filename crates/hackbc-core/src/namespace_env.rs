//! Namespace context of a definition.
//!
//! Holds the current namespace name and the `use` aliases in effect. A
//! nested `namespace` or `use` declaration never mutates an existing
//! context; the merger in the compiler produces a new one.

use rustc_hash::FxHashMap;

/// Alias categories introduced by `use` declarations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum UseKind {
    /// `use A\B;` (namespace alias)
    Namespace,
    /// `use type A\B;`
    Class,
    /// `use function A\f;`
    Function,
    /// `use const A\C;`
    Const,
}

impl UseKind {
    /// All categories in merge order.
    pub const ALL: [UseKind; 4] = [
        UseKind::Namespace,
        UseKind::Class,
        UseKind::Function,
        UseKind::Const,
    ];
}

/// The namespace context: current name plus alias maps.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NamespaceEnv {
    /// Current namespace, `None` for the global namespace.
    pub name: Option<String>,
    pub ns_uses: FxHashMap<String, String>,
    pub class_uses: FxHashMap<String, String>,
    pub fun_uses: FxHashMap<String, String>,
    pub const_uses: FxHashMap<String, String>,
}

impl NamespaceEnv {
    /// The global namespace with no aliases.
    pub fn global() -> Self {
        Self::default()
    }

    /// An empty context for a named namespace.
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            ..Self::default()
        }
    }

    /// Alias map for one category.
    pub fn uses(&self, kind: UseKind) -> &FxHashMap<String, String> {
        match kind {
            UseKind::Namespace => &self.ns_uses,
            UseKind::Class => &self.class_uses,
            UseKind::Function => &self.fun_uses,
            UseKind::Const => &self.const_uses,
        }
    }

    /// Mutable alias map for one category.
    pub fn uses_mut(&mut self, kind: UseKind) -> &mut FxHashMap<String, String> {
        match kind {
            UseKind::Namespace => &mut self.ns_uses,
            UseKind::Class => &mut self.class_uses,
            UseKind::Function => &mut self.fun_uses,
            UseKind::Const => &mut self.const_uses,
        }
    }

    /// Prefix `name` with the current namespace.
    pub fn qualify(&self, name: &str) -> String {
        match &self.name {
            Some(ns) if !ns.is_empty() => format!("{}\\{}", ns, name),
            _ => name.to_string(),
        }
    }
}
