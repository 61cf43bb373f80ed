//! Deterministic identity for definitions.
//!
//! Cross-body state (which functions contain a finally/fault region, which
//! goto labels a function declares) is computed before assembly and looked
//! up by [`FunctionStateKey`]. Lookups go through [`DefHash`], a 64-bit hash
//! computed from the key, so registries are plain hash sets and maps.
//!
//! # Hash Computation
//!
//! Uses XXHash64 with a domain constant per key kind, so a function `f` and
//! a method `f` on some class never collide.
//!
//! ```
//! use hackbc_core::{DefHash, FunctionStateKey};
//!
//! let f = FunctionStateKey::function("f");
//! assert_eq!(f.hash(), FunctionStateKey::function("f").hash());
//! assert_ne!(f.hash(), FunctionStateKey::method("C", "f").hash());
//! assert_eq!(DefHash::of(&f), f.hash());
//! ```

use std::fmt;
use xxhash_rust::xxh64::xxh64;

/// Domain-specific mixing constants for hash computation.
pub mod hash_constants {
    /// Separator between class and method components.
    pub const SEP: u64 = 0x4bc94d6bd06053ad;

    /// Domain marker for the top-level pseudo-main body.
    pub const TOPLEVEL: u64 = 0x2fac10b63a6cc57c;

    /// Domain marker for free function keys.
    pub const FUNCTION: u64 = 0x5ea77ffbcdf5f302;

    /// Domain marker for method keys.
    pub const METHOD: u64 = 0x7d3c8b4a92e15f6d;
}

/// The synthesized id of the top-level body of a compilation unit.
pub const TOPLEVEL_ID: &str = "|";

/// Identifies one definition for cross-body lookups.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum FunctionStateKey {
    /// The top-level body of the unit.
    TopLevel,
    /// A free function, by qualified name.
    Function(String),
    /// A method, by class name and method name.
    Method {
        /// Owning class name.
        class: String,
        /// Method name.
        method: String,
    },
}

impl FunctionStateKey {
    /// Key for a free function.
    pub fn function(name: impl Into<String>) -> Self {
        FunctionStateKey::Function(name.into())
    }

    /// Key for a method.
    pub fn method(class: impl Into<String>, method: impl Into<String>) -> Self {
        FunctionStateKey::Method {
            class: class.into(),
            method: method.into(),
        }
    }

    /// Compute the registry hash for this key.
    #[inline]
    pub fn hash(&self) -> DefHash {
        DefHash::of(self)
    }
}

impl fmt::Display for FunctionStateKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FunctionStateKey::TopLevel => write!(f, "{}", TOPLEVEL_ID),
            FunctionStateKey::Function(name) => write!(f, "{}", name),
            FunctionStateKey::Method { class, method } => write!(f, "{}::{}", class, method),
        }
    }
}

/// A deterministic 64-bit hash identifying a definition.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[repr(transparent)]
pub struct DefHash(pub u64);

impl DefHash {
    /// Hash a function-state key.
    pub fn of(key: &FunctionStateKey) -> Self {
        match key {
            FunctionStateKey::TopLevel => {
                DefHash(hash_constants::TOPLEVEL ^ xxh64(TOPLEVEL_ID.as_bytes(), 0))
            }
            FunctionStateKey::Function(name) => {
                DefHash(hash_constants::FUNCTION ^ xxh64(name.as_bytes(), 0))
            }
            FunctionStateKey::Method { class, method } => {
                // wrapping_mul keeps (class, method) order significant
                let class_hash = xxh64(class.as_bytes(), 0);
                let method_hash = xxh64(method.as_bytes(), 0);
                DefHash(
                    (hash_constants::METHOD ^ class_hash)
                        .wrapping_mul(hash_constants::SEP)
                        .wrapping_add(method_hash),
                )
            }
        }
    }

    /// Get the underlying u64 value.
    #[inline]
    pub const fn as_u64(self) -> u64 {
        self.0
    }
}

impl fmt::Debug for DefHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "DefHash({:#018x})", self.0)
    }
}

impl fmt::Display for DefHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:#018x}", self.0)
    }
}
