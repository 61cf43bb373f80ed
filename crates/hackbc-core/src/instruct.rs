//! Instruction set consumed and produced by the body assembler.
//!
//! The VM is stack based. Instructions are kept structured (labels and
//! locals are symbolic, not offsets) until the serializer encodes them, so
//! rewriting passes can renumber labels and extract regions freely.

use num_enum::{IntoPrimitive, TryFromPrimitive};
use ordered_float::OrderedFloat;

use crate::{InstrSeq, Span};

/// A jump target.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Label {
    /// Compiler-generated label.
    Regular(u32),
    /// Entry point of a parameter's default-value initializer.
    DefaultArg(u32),
    /// User label from a `goto` target; rewritten before packaging.
    Named(String),
}

impl Label {
    /// Whether this is a user-written label.
    pub fn is_named(&self) -> bool {
        matches!(self, Label::Named(_))
    }
}

/// A local variable operand.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Local {
    /// A user variable, by name (including the `$` sigil).
    Named(String),
    /// A compiler temporary, by slot number.
    Unnamed(u32),
}

impl Local {
    /// Named local from anything string-like.
    pub fn named(name: impl Into<String>) -> Self {
        Local::Named(name.into())
    }
}

/// A parameter operand for verification instructions.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ParamId {
    /// Parameter by name.
    Named(String),
    /// Parameter by position.
    Unnamed(u32),
}

/// A class-reference slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ClsRefSlot(pub u32);

/// An iterator id.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct IterId(pub u32);

/// Diagnostic severities passed to `trigger_sampled_error`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, IntoPrimitive, TryFromPrimitive)]
#[repr(i64)]
pub enum ErrorLevel {
    Warning = 2,
    Notice = 8,
    UserWarning = 512,
    UserNotice = 1024,
    Deprecated = 8192,
    UserDeprecated = 16384,
}

/// A protected region and its fault handler.
///
/// Emitted by the statement emitter for `try`/`finally` constructs and
/// flattened by fault extraction into `TryFaultBegin`/`TryFaultEnd` plus a
/// trailing handler block.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct FaultRegion {
    /// Label the handler is placed under.
    pub fault_label: Label,
    /// The protected instructions.
    pub body: InstrSeq,
    /// The handler, run on exceptional unwinding.
    pub handler: InstrSeq,
}

/// A single instruction.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Instruct {
    // =========================================================================
    // Basic
    // =========================================================================
    /// Do nothing.
    Nop,
    /// Do nothing; guaranteed to survive optimization at the function entry.
    EntryNop,
    /// Pop a cell.
    PopC,
    /// Pop a call result.
    PopR,
    /// Duplicate top of stack.
    Dup,

    // =========================================================================
    // Literals
    // =========================================================================
    /// Push null.
    Null,
    /// Push true.
    True,
    /// Push false.
    False,
    /// Push an integer.
    Int(i64),
    /// Push a double.
    Double(OrderedFloat<f64>),
    /// Push a string.
    String(String),
    /// Pop N cells into a new vec array.
    NewVecArray(u32),

    // =========================================================================
    // Operators
    // =========================================================================
    /// String concatenation of the top two cells.
    Concat,
    /// Numeric addition of the top two cells.
    Add,
    /// Print the top cell, push 1.
    Print,

    // =========================================================================
    // Locals and $this
    // =========================================================================
    /// Push a local by value.
    CGetL(Local),
    /// Store top of stack into a local (value stays on the stack).
    SetL(Local),
    /// Unset a local.
    UnsetL(Local),
    /// Push `$this`.
    This,
    /// Initialize a local with `$this`.
    InitThisLoc(Local),

    // =========================================================================
    // Control flow
    // =========================================================================
    /// Jump target definition.
    Label(Label),
    /// Unconditional jump.
    Jmp(Label),
    /// Unconditional jump without a surprise check.
    JmpNS(Label),
    /// Jump if top of stack is falsy.
    JmpZ(Label),
    /// Jump if top of stack is truthy.
    JmpNZ(Label),
    /// Return the top cell.
    RetC,
    /// Throw the top cell.
    Throw,
    /// Resume unwinding at the end of a fault handler.
    Unwind,

    // =========================================================================
    // Exception regions
    // =========================================================================
    /// Structured try/fault region, before extraction.
    TryFault(Box<FaultRegion>),
    /// Start of a protected region whose handler lives under the label.
    TryFaultBegin(Label),
    /// End of a protected region.
    TryFaultEnd,

    // =========================================================================
    // Verification
    // =========================================================================
    /// Check a parameter against its type constraint.
    VerifyParamType(ParamId),
    /// Check an inout parameter's outgoing value.
    VerifyOutType(ParamId),
    /// Check the returned cell against the return constraint.
    VerifyRetTypeC,

    // =========================================================================
    // Generators and async
    // =========================================================================
    /// Create the generator object for the current frame.
    CreateCont,
    /// Yield a value.
    Yield,
    /// Yield a key and value.
    YieldK,
    /// Await the top cell.
    Await,

    // =========================================================================
    // Static locals
    // =========================================================================
    /// Bind a static local, pushing whether it was already initialized.
    StaticLocCheck(Local),
    /// Define a static local from the top cell.
    StaticLocDef(Local),
    /// Bind a static local, initializing it from the top cell on first use.
    StaticLocInit(Local),

    // =========================================================================
    // Class references
    // =========================================================================
    /// Load the class of the current method into a slot.
    SelfCls(ClsRefSlot),
    /// Push the name of the class in a slot.
    ClsRefName(ClsRefSlot),
    /// Load a class by name (top cell) into a slot.
    ClsRefGetC(ClsRefSlot),
    /// Load a class by name (local) into a slot.
    ClsRefGetL(Local, ClsRefSlot),
    /// Instantiate the class in a slot.
    NewObj(ClsRefSlot),

    // =========================================================================
    // Iterators
    // =========================================================================
    /// Initialize an iterator, jumping to the label if empty.
    IterInit(IterId, Label, Local),
    /// Advance an iterator, jumping to the label while not done.
    IterNext(IterId, Label, Local),
    /// Release an iterator.
    IterFree(IterId),

    // =========================================================================
    // Calls and metadata
    // =========================================================================
    /// Call a builtin with `nargs` arguments on the stack.
    FCallBuiltin {
        /// Number of arguments.
        nargs: u32,
        /// Builtin name.
        name: String,
    },
    /// Source location of the following instructions.
    SrcLoc(Span),
}

impl Instruct {
    /// Shorthand for a string literal.
    pub fn string(s: impl Into<String>) -> Self {
        Instruct::String(s.into())
    }

    /// Shorthand for a double literal.
    pub fn double(value: f64) -> Self {
        Instruct::Double(OrderedFloat(value))
    }

    /// Label this instruction defines, if any.
    pub fn defined_label(&self) -> Option<&Label> {
        match self {
            Instruct::Label(l) => Some(l),
            _ => None,
        }
    }

    /// Labels this instruction refers to (jumps, iterator exits, regions).
    ///
    /// A `Label` definition is not a reference; see [`defined_label`](Self::defined_label).
    pub fn referenced_labels(&self) -> Vec<&Label> {
        match self {
            Instruct::Jmp(l)
            | Instruct::JmpNS(l)
            | Instruct::JmpZ(l)
            | Instruct::JmpNZ(l)
            | Instruct::TryFaultBegin(l)
            | Instruct::IterInit(_, l, _)
            | Instruct::IterNext(_, l, _) => vec![l],
            Instruct::TryFault(region) => vec![&region.fault_label],
            _ => Vec::new(),
        }
    }

    /// Apply `f` to every label this instruction defines or refers to.
    ///
    /// Does not descend into the bodies of a structured [`FaultRegion`].
    pub fn map_labels(&mut self, f: &mut impl FnMut(&Label) -> Label) {
        match self {
            Instruct::Label(l)
            | Instruct::Jmp(l)
            | Instruct::JmpNS(l)
            | Instruct::JmpZ(l)
            | Instruct::JmpNZ(l)
            | Instruct::TryFaultBegin(l)
            | Instruct::IterInit(_, l, _)
            | Instruct::IterNext(_, l, _) => *l = f(l),
            Instruct::TryFault(region) => region.fault_label = f(&region.fault_label),
            _ => {}
        }
    }

    /// Class-reference slot this instruction uses, if any.
    pub fn cls_ref_slot(&self) -> Option<ClsRefSlot> {
        match self {
            Instruct::SelfCls(s)
            | Instruct::ClsRefName(s)
            | Instruct::ClsRefGetC(s)
            | Instruct::ClsRefGetL(_, s)
            | Instruct::NewObj(s) => Some(*s),
            _ => None,
        }
    }

    /// Get the mnemonic of this instruction for debugging.
    pub fn name(&self) -> &'static str {
        match self {
            Instruct::Nop => "Nop",
            Instruct::EntryNop => "EntryNop",
            Instruct::PopC => "PopC",
            Instruct::PopR => "PopR",
            Instruct::Dup => "Dup",
            Instruct::Null => "Null",
            Instruct::True => "True",
            Instruct::False => "False",
            Instruct::Int(_) => "Int",
            Instruct::Double(_) => "Double",
            Instruct::String(_) => "String",
            Instruct::NewVecArray(_) => "NewVecArray",
            Instruct::Concat => "Concat",
            Instruct::Add => "Add",
            Instruct::Print => "Print",
            Instruct::CGetL(_) => "CGetL",
            Instruct::SetL(_) => "SetL",
            Instruct::UnsetL(_) => "UnsetL",
            Instruct::This => "This",
            Instruct::InitThisLoc(_) => "InitThisLoc",
            Instruct::Label(_) => "Label",
            Instruct::Jmp(_) => "Jmp",
            Instruct::JmpNS(_) => "JmpNS",
            Instruct::JmpZ(_) => "JmpZ",
            Instruct::JmpNZ(_) => "JmpNZ",
            Instruct::RetC => "RetC",
            Instruct::Throw => "Throw",
            Instruct::Unwind => "Unwind",
            Instruct::TryFault(_) => "TryFault",
            Instruct::TryFaultBegin(_) => "TryFaultBegin",
            Instruct::TryFaultEnd => "TryFaultEnd",
            Instruct::VerifyParamType(_) => "VerifyParamType",
            Instruct::VerifyOutType(_) => "VerifyOutType",
            Instruct::VerifyRetTypeC => "VerifyRetTypeC",
            Instruct::CreateCont => "CreateCont",
            Instruct::Yield => "Yield",
            Instruct::YieldK => "YieldK",
            Instruct::Await => "Await",
            Instruct::StaticLocCheck(_) => "StaticLocCheck",
            Instruct::StaticLocDef(_) => "StaticLocDef",
            Instruct::StaticLocInit(_) => "StaticLocInit",
            Instruct::SelfCls(_) => "Self",
            Instruct::ClsRefName(_) => "ClsRefName",
            Instruct::ClsRefGetC(_) => "ClsRefGetC",
            Instruct::ClsRefGetL(_, _) => "ClsRefGetL",
            Instruct::NewObj(_) => "NewObj",
            Instruct::IterInit(_, _, _) => "IterInit",
            Instruct::IterNext(_, _, _) => "IterNext",
            Instruct::IterFree(_) => "IterFree",
            Instruct::FCallBuiltin { .. } => "FCallBuiltin",
            Instruct::SrcLoc(_) => "SrcLoc",
        }
    }
}
