//! Type information attached to parameters and return values.

use bitflags::bitflags;

bitflags! {
    /// Modifiers on a type constraint.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct TypeConstraintFlags: u8 {
        /// `?T`: null is accepted.
        const NULLABLE = 0x01;
        /// `@T`: violations warn instead of failing.
        const SOFT = 0x02;
        /// The hint uses syntax beyond a plain class or primitive name.
        const EXTENDED_HINT = 0x04;
        /// The hint names a generic type parameter.
        const TYPE_VAR = 0x08;
        /// The hint names a type constant (`this::T`).
        const TYPE_CONSTANT = 0x10;
    }
}

/// What the VM checks a value against.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct TypeConstraint {
    /// The constrained type name; `None` means no check.
    pub name: Option<String>,
    /// Modifiers.
    pub flags: TypeConstraintFlags,
}

impl TypeConstraint {
    /// A constraint on a named type.
    pub fn named(name: impl Into<String>, flags: TypeConstraintFlags) -> Self {
        Self {
            name: Some(name.into()),
            flags,
        }
    }

    /// A constraint with no name (only flags).
    pub fn unnamed(flags: TypeConstraintFlags) -> Self {
        Self { name: None, flags }
    }

    pub fn is_nullable(&self) -> bool {
        self.flags.contains(TypeConstraintFlags::NULLABLE)
    }

    pub fn is_soft(&self) -> bool {
        self.flags.contains(TypeConstraintFlags::SOFT)
    }
}

/// A resolved type hint.
///
/// `user_type` is what the programmer wrote (for reflection); the
/// constraint is what the VM enforces. `Some("")` is the sentinel for "no
/// hint at all", distinct from an explicit `mixed`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct TypeInfo {
    /// The hint as written, after name resolution.
    pub user_type: Option<String>,
    /// The enforced constraint.
    pub type_constraint: TypeConstraint,
}

impl TypeInfo {
    pub fn new(user_type: Option<String>, type_constraint: TypeConstraint) -> Self {
        Self {
            user_type,
            type_constraint,
        }
    }

    /// The "no hint" type info: empty user type, no constraint.
    pub fn empty() -> Self {
        Self {
            user_type: Some(String::new()),
            type_constraint: TypeConstraint::default(),
        }
    }

    /// Whether the VM has anything to verify.
    pub fn has_type_constraint(&self) -> bool {
        self.type_constraint.name.is_some()
    }

    /// Whether this is the "no hint" sentinel.
    pub fn is_empty_hint(&self) -> bool {
        self.user_type.as_deref() == Some("")
    }

    /// Copy of this info with the nullable flag set.
    pub fn make_nullable(mut self) -> Self {
        self.type_constraint.flags |= TypeConstraintFlags::NULLABLE;
        self
    }
}
