//! Error types for body assembly.
//!
//! Every fallible step of the backend returns [`CompileError`]. There are
//! three kinds, and they differ in how far they propagate:
//!
//! ```text
//! CompileError
//! ├── ParseFatal          - structural violations (namespace aliases, attributes)
//! ├── RuntimeFatal        - semantic violations reported as a runtime fatal
//! └── InternalInvariant   - malformed input from upstream; aborts the process
//! ```
//!
//! `ParseFatal` and `RuntimeFatal` abort the current definition and surface
//! as diagnostics. `InternalInvariant` means an upstream precondition was
//! broken and compilation of the whole unit must stop.

use thiserror::Error;

use crate::Span;

/// Result alias used throughout the backend.
pub type Result<T> = std::result::Result<T, CompileError>;

/// Coarse classification of a [`CompileError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FatalKind {
    /// Reported as a parse-time fatal.
    Parse,
    /// Reported as a runtime fatal of the compiled program.
    Runtime,
    /// Internal compiler bug or malformed AST.
    Internal,
}

impl FatalKind {
    /// Returns a human-readable name for this kind.
    pub fn as_str(&self) -> &'static str {
        match self {
            FatalKind::Parse => "parse",
            FatalKind::Runtime => "runtime",
            FatalKind::Internal => "internal",
        }
    }
}

impl std::fmt::Display for FatalKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A fatal error raised while assembling a definition.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CompileError {
    /// Structural or namespace-consistency violation.
    #[error("at {span}: {message}")]
    ParseFatal {
        /// Where the violation was detected.
        span: Span,
        /// The diagnostic message.
        message: String,
    },

    /// Semantic violation surfaced as a runtime fatal in the compiled program.
    #[error("at {span}: {message}")]
    RuntimeFatal {
        /// Where the violation was detected.
        span: Span,
        /// The diagnostic message.
        message: String,
    },

    /// Precondition violated upstream (malformed AST, impossible scope shape).
    #[error("internal error: {message}")]
    InternalInvariant {
        /// The error message.
        message: String,
    },
}

impl CompileError {
    /// Create a parse fatal.
    pub fn parse(span: Span, message: impl Into<String>) -> Self {
        CompileError::ParseFatal {
            span,
            message: message.into(),
        }
    }

    /// Create a runtime fatal.
    pub fn runtime(span: Span, message: impl Into<String>) -> Self {
        CompileError::RuntimeFatal {
            span,
            message: message.into(),
        }
    }

    /// Create an internal invariant failure.
    pub fn internal(message: impl Into<String>) -> Self {
        CompileError::InternalInvariant {
            message: message.into(),
        }
    }

    /// The kind of this error.
    pub fn kind(&self) -> FatalKind {
        match self {
            CompileError::ParseFatal { .. } => FatalKind::Parse,
            CompileError::RuntimeFatal { .. } => FatalKind::Runtime,
            CompileError::InternalInvariant { .. } => FatalKind::Internal,
        }
    }

    /// The span of the error, if it carries one.
    pub fn span(&self) -> Option<Span> {
        match self {
            CompileError::ParseFatal { span, .. } | CompileError::RuntimeFatal { span, .. } => {
                Some(*span)
            }
            CompileError::InternalInvariant { .. } => None,
        }
    }

    /// The bare diagnostic message, without position.
    pub fn message(&self) -> &str {
        match self {
            CompileError::ParseFatal { message, .. }
            | CompileError::RuntimeFatal { message, .. }
            | CompileError::InternalInvariant { message } => message,
        }
    }

    /// Whether the enclosing unit may continue with its next definition.
    ///
    /// Only internal invariant failures abort the whole compilation.
    pub fn is_recoverable(&self) -> bool {
        !matches!(self, CompileError::InternalInvariant { .. })
    }
}
