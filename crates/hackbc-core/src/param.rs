//! Parameter descriptors.

use crate::{InstrSeq, Label, TypeInfo};

/// Code run when the caller omits an optional argument.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct DefaultValue {
    /// Entry point the VM jumps to for this argument count.
    pub label: Label,
    /// Code computing the default value.
    pub code: InstrSeq,
}

/// A resolved function parameter.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Param {
    /// Local name, including the `$` sigil.
    pub name: String,
    /// Resolved hint, if any.
    pub type_info: Option<TypeInfo>,
    /// `...$args`
    pub is_variadic: bool,
    /// `inout $x`
    pub is_inout: bool,
    /// `&$x`
    pub is_reference: bool,
    /// Default-value initializer, if the parameter is optional.
    pub default_value: Option<DefaultValue>,
}

impl Param {
    /// A plain required parameter with no hint.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            type_info: None,
            is_variadic: false,
            is_inout: false,
            is_reference: false,
            default_value: None,
        }
    }

    /// Whether the prologue must verify this parameter's type.
    pub fn needs_verification(&self) -> bool {
        !self.is_variadic
            && self
                .type_info
                .as_ref()
                .is_some_and(TypeInfo::has_type_constraint)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{TypeConstraint, TypeConstraintFlags};

    fn int_info() -> TypeInfo {
        TypeInfo::new(
            Some("int".into()),
            TypeConstraint::named("HH\\int", TypeConstraintFlags::empty()),
        )
    }

    #[test]
    fn variadic_params_are_not_verified() {
        let mut p = Param::new("$xs");
        p.type_info = Some(int_info());
        assert!(p.needs_verification());
        p.is_variadic = true;
        assert!(!p.needs_verification());
    }

    #[test]
    fn unhinted_params_are_not_verified() {
        assert!(!Param::new("$x").needs_verification());
    }
}
