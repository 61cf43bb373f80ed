//! Instruction sequences.
//!
//! An [`InstrSeq`] is the unit every emission and rewriting step works on:
//! the statement emitter produces one, the assembler concatenates them, and
//! each pass maps one sequence to another.

use crate::Instruct;

/// An ordered sequence of instructions.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct InstrSeq {
    instrs: Vec<Instruct>,
}

impl InstrSeq {
    /// Create an empty sequence.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an empty sequence with pre-allocated capacity.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            instrs: Vec::with_capacity(capacity),
        }
    }

    /// A sequence holding a single instruction.
    pub fn one(instr: Instruct) -> Self {
        Self {
            instrs: vec![instr],
        }
    }

    /// Concatenate sequences in order.
    pub fn gather(parts: impl IntoIterator<Item = InstrSeq>) -> Self {
        let mut out = InstrSeq::new();
        for part in parts {
            out.append(part);
        }
        out
    }

    /// Append an instruction.
    pub fn push(&mut self, instr: Instruct) {
        self.instrs.push(instr);
    }

    /// Append every instruction of `other`.
    pub fn append(&mut self, other: InstrSeq) {
        self.instrs.extend(other.instrs);
    }

    /// Number of top-level instructions.
    pub fn len(&self) -> usize {
        self.instrs.len()
    }

    /// Check if the sequence is empty.
    pub fn is_empty(&self) -> bool {
        self.instrs.is_empty()
    }

    /// First instruction, if any.
    pub fn first(&self) -> Option<&Instruct> {
        self.instrs.first()
    }

    /// Last instruction, if any.
    pub fn last(&self) -> Option<&Instruct> {
        self.instrs.last()
    }

    /// Iterate over the top-level instructions.
    pub fn iter(&self) -> std::slice::Iter<'_, Instruct> {
        self.instrs.iter()
    }

    /// Iterate mutably over the top-level instructions.
    pub fn iter_mut(&mut self) -> std::slice::IterMut<'_, Instruct> {
        self.instrs.iter_mut()
    }

    /// The top-level instructions as a slice.
    pub fn instrs(&self) -> &[Instruct] {
        &self.instrs
    }

    /// Consume into the underlying vector.
    pub fn into_vec(self) -> Vec<Instruct> {
        self.instrs
    }

    /// Replace every instruction with the sequence `f` returns for it.
    pub fn flat_map(self, mut f: impl FnMut(Instruct) -> Vec<Instruct>) -> InstrSeq {
        let mut out = Vec::with_capacity(self.instrs.len());
        for instr in self.instrs {
            out.extend(f(instr));
        }
        InstrSeq { instrs: out }
    }

    /// Drop the instructions for which `keep` returns false.
    pub fn retain(&mut self, keep: impl FnMut(&Instruct) -> bool) {
        self.instrs.retain(keep);
    }

    /// Visit every instruction, including those nested in fault regions.
    pub fn walk(&self, f: &mut impl FnMut(&Instruct)) {
        for instr in &self.instrs {
            f(instr);
            if let Instruct::TryFault(region) = instr {
                region.body.walk(f);
                region.handler.walk(f);
            }
        }
    }

    /// Mutably visit every instruction, including those nested in fault regions.
    pub fn walk_mut(&mut self, f: &mut impl FnMut(&mut Instruct)) {
        for instr in &mut self.instrs {
            f(instr);
            if let Instruct::TryFault(region) = instr {
                region.body.walk_mut(f);
                region.handler.walk_mut(f);
            }
        }
    }

    /// Mnemonics of the top-level instructions.
    ///
    /// This is useful for testing sequences without caring about operands.
    pub fn names(&self) -> Vec<&'static str> {
        self.instrs.iter().map(Instruct::name).collect()
    }

    /// Check that this sequence is exactly `expected`, operands included.
    #[track_caller]
    pub fn assert_instrs(&self, expected: &[Instruct]) {
        assert_eq!(
            self.instrs.as_slice(),
            expected,
            "Instruction mismatch.\nExpected: {:?}\nActual:   {:?}",
            expected.iter().map(Instruct::name).collect::<Vec<_>>(),
            self.names(),
        );
    }

    /// Check that the given mnemonics appear in order (not necessarily contiguous).
    ///
    /// Useful for verifying key instructions are present without checking every one.
    #[track_caller]
    pub fn assert_contains(&self, expected: &[&str]) {
        let actual = self.names();
        let mut expected_iter = expected.iter().peekable();

        for name in &actual {
            if expected_iter.peek() == Some(&name) {
                expected_iter.next();
            }
        }

        if expected_iter.peek().is_some() {
            let remaining: Vec<_> = expected_iter.collect();
            panic!(
                "Missing instructions in sequence.\nExpected to find: {:?}\nActual sequence:  {:?}",
                remaining, actual,
            );
        }
    }
}

impl From<Vec<Instruct>> for InstrSeq {
    fn from(instrs: Vec<Instruct>) -> Self {
        Self { instrs }
    }
}

impl From<Instruct> for InstrSeq {
    fn from(instr: Instruct) -> Self {
        Self::one(instr)
    }
}

impl FromIterator<Instruct> for InstrSeq {
    fn from_iter<I: IntoIterator<Item = Instruct>>(iter: I) -> Self {
        Self {
            instrs: iter.into_iter().collect(),
        }
    }
}

impl IntoIterator for InstrSeq {
    type Item = Instruct;
    type IntoIter = std::vec::IntoIter<Instruct>;

    fn into_iter(self) -> Self::IntoIter {
        self.instrs.into_iter()
    }
}

impl<'a> IntoIterator for &'a InstrSeq {
    type Item = &'a Instruct;
    type IntoIter = std::slice::Iter<'a, Instruct>;

    fn into_iter(self) -> Self::IntoIter {
        self.instrs.iter()
    }
}
