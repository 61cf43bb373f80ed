//! Per-body emission state.
//!
//! [`EmitState`] owns every counter that must start fresh for each
//! definition: labels, iterators, unnamed locals and jump targets, plus
//! the [`StmtConfig`] the statement emitter reads. The assembler creates
//! one per body and passes it explicitly, so independent bodies can be
//! assembled on separate threads.
//!
//! # Example
//!
//! ```
//! use hackbc_compiler::emit::EmitState;
//! use hackbc_core::{Label, Local};
//!
//! let mut state = EmitState::new();
//! assert_eq!(state.labels.next_regular(), Label::Regular(0));
//! assert_eq!(state.labels.next_default_arg(), Label::DefaultArg(1));
//!
//! state.locals.reset(2);
//! assert_eq!(state.locals.next_unnamed(), Local::Unnamed(2));
//! ```

mod jumps;

pub use jumps::JumpTargets;

use hackbc_core::{InstrSeq, Instruct, IterId, Label, Local, Span};

use crate::options::CompilerOptions;

/// Source-location marker for `span`, when source mapping is enabled.
pub fn emit_pos(span: Span, options: &CompilerOptions) -> InstrSeq {
    if options.source_mapping && !span.is_none() {
        InstrSeq::one(Instruct::SrcLoc(span))
    } else {
        InstrSeq::new()
    }
}

// ============================================================================
// Allocators
// ============================================================================

/// Label allocator.
///
/// Regular and default-argument labels share one counter.
#[derive(Debug, Default)]
pub struct LabelGen {
    next: u32,
}

impl LabelGen {
    pub fn reset(&mut self) {
        self.next = 0;
    }

    fn next_id(&mut self) -> u32 {
        let id = self.next;
        self.next += 1;
        id
    }

    /// Allocate a compiler label.
    pub fn next_regular(&mut self) -> Label {
        Label::Regular(self.next_id())
    }

    /// Allocate a default-argument entry label.
    pub fn next_default_arg(&mut self) -> Label {
        Label::DefaultArg(self.next_id())
    }

    /// Number of labels allocated since the last reset.
    pub fn count(&self) -> u32 {
        self.next
    }
}

/// Iterator allocator.
///
/// Iterators are freed in stack order; the high-water mark is what the
/// body records.
#[derive(Debug, Default)]
pub struct IterGen {
    next: u32,
    max: u32,
}

impl IterGen {
    pub fn reset(&mut self) {
        self.next = 0;
        self.max = 0;
    }

    /// Allocate an iterator.
    pub fn next(&mut self) -> IterId {
        let id = IterId(self.next);
        self.next += 1;
        self.max = self.max.max(self.next);
        id
    }

    /// Release the most recently allocated iterator.
    pub fn free(&mut self) {
        self.next = self.next.saturating_sub(1);
    }

    /// Maximum number of iterators live at once.
    pub fn count(&self) -> u32 {
        self.max
    }
}

/// Unnamed-local allocator.
///
/// Slots are numbered after the named locals (parameters and declared
/// variables), so the counter is seeded with their count.
#[derive(Debug, Default)]
pub struct LocalGen {
    next: u32,
    retval: Option<Local>,
    label_id: Option<Local>,
}

impl LocalGen {
    /// Start numbering at `base` and drop any reservations.
    pub fn reset(&mut self, base: u32) {
        self.next = base;
        self.retval = None;
        self.label_id = None;
    }

    /// Allocate a temporary local.
    pub fn next_unnamed(&mut self) -> Local {
        let local = Local::Unnamed(self.next);
        self.next += 1;
        local
    }

    /// Reserve the locals a `finally` needs: the pending return value and
    /// the id of the jump to resume after the handler.
    pub fn reserve_retval_and_label_id_locals(&mut self) {
        self.retval = Some(self.next_unnamed());
        self.label_id = Some(self.next_unnamed());
    }

    /// The reserved return-value local.
    pub fn retval(&self) -> Option<&Local> {
        self.retval.as_ref()
    }

    /// The reserved label-id local.
    pub fn label_id(&self) -> Option<&Local> {
        self.label_id.as_ref()
    }

    /// Next slot that would be allocated.
    pub fn peek(&self) -> u32 {
        self.next
    }
}

// ============================================================================
// Statement configuration
// ============================================================================

/// Body-wide facts the statement emitter needs for `return`.
#[derive(Debug, Clone, Default)]
pub struct StmtConfig {
    /// Whether `return` verifies the returned value.
    pub verify_return: bool,
    /// Epilogue packing inout parameters; empty when there are none.
    pub verify_out: InstrSeq,
    /// Number of inout parameters.
    pub num_out: usize,
    /// Code run when control falls off the end of the body.
    pub default_dropthrough: Option<InstrSeq>,
    /// Value pushed by a bare `return;`.
    pub default_return_value: InstrSeq,
    /// Whether the function returns by reference.
    pub return_by_ref: bool,
    /// Position of the definition.
    pub function_pos: Span,
}

// ============================================================================
// EmitState
// ============================================================================

/// All per-body mutable state.
#[derive(Debug, Default)]
pub struct EmitState {
    pub labels: LabelGen,
    pub iterators: IterGen,
    pub locals: LocalGen,
    pub jumps: JumpTargets,
    pub config: StmtConfig,
}

impl EmitState {
    /// Fresh state with every counter at zero.
    pub fn new() -> Self {
        Self::default()
    }

    /// Reset the label and iterator counters.
    pub fn reset_counters(&mut self) {
        self.labels.reset();
        self.iterators.reset();
    }
}
