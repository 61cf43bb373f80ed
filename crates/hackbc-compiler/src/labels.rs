//! Label passes over an assembled body.
//!
//! User labels are renamed to compiler labels, then (optionally) every
//! label is renumbered densely in definition order and labels nothing
//! refers to are dropped.

use hackbc_core::{ClsRefSlot, InstrSeq, Instruct, Label, Param};
use rustc_hash::{FxHashMap, FxHashSet};

use crate::emit::EmitState;

/// Replace every user label with a fresh regular label.
///
/// All occurrences of one name map to the same label.
pub fn rewrite_user_labels(state: &mut EmitState, instrs: &mut InstrSeq) {
    let mut renamed: FxHashMap<String, Label> = FxHashMap::default();
    instrs.walk_mut(&mut |instr| {
        instr.map_labels(&mut |label| match label {
            Label::Named(name) => renamed
                .entry(name.clone())
                .or_insert_with(|| state.labels.next_regular())
                .clone(),
            other => other.clone(),
        })
    });
}

fn with_id(label: &Label, id: u32) -> Label {
    match label {
        Label::Regular(_) => Label::Regular(id),
        Label::DefaultArg(_) => Label::DefaultArg(id),
        Label::Named(name) => Label::Named(name.clone()),
    }
}

/// Renumber labels densely from zero and drop unreferenced definitions.
///
/// Parameter default-value labels count as references and are renumbered
/// along with the instructions. Label kinds are preserved.
pub fn relabel(instrs: &mut InstrSeq, params: &mut [Param]) {
    let mut used: FxHashSet<Label> = FxHashSet::default();
    instrs.walk(&mut |instr| {
        used.extend(instr.referenced_labels().into_iter().cloned());
    });
    used.extend(
        params
            .iter()
            .filter_map(|p| p.default_value.as_ref())
            .map(|d| d.label.clone()),
    );

    let mut mapping: FxHashMap<Label, Label> = FxHashMap::default();
    let mut next = 0;
    instrs.walk(&mut |instr| {
        if let Some(label) = instr.defined_label() {
            if used.contains(label) && !mapping.contains_key(label) {
                mapping.insert(label.clone(), with_id(label, next));
                next += 1;
            }
        }
    });

    instrs.retain(|instr| instr.defined_label().is_none_or(|l| used.contains(l)));
    instrs.walk_mut(&mut |instr| {
        instr.map_labels(&mut |label| mapping.get(label).cloned().unwrap_or_else(|| label.clone()))
    });
    for default in params.iter_mut().filter_map(|p| p.default_value.as_mut()) {
        if let Some(label) = mapping.get(&default.label) {
            default.label = label.clone();
        }
    }
}

/// Number of distinct class-reference slots the body uses.
pub fn count_cls_ref_slots(instrs: &InstrSeq) -> u32 {
    let mut slots: FxHashSet<ClsRefSlot> = FxHashSet::default();
    instrs.walk(&mut |instr| {
        if let Some(slot) = instr.cls_ref_slot() {
            slots.insert(slot);
        }
    });
    slots.len() as u32
}

/// Whether the body defines any label twice.
pub fn has_duplicate_labels(instrs: &InstrSeq) -> bool {
    let mut seen: FxHashSet<Label> = FxHashSet::default();
    let mut duplicate = false;
    instrs.walk(&mut |instr| {
        if let Instruct::Label(label) = instr {
            duplicate |= !seen.insert(label.clone());
        }
    });
    duplicate
}
