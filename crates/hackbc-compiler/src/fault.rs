//! Fault-region extraction.
//!
//! The statement emitter produces structured [`Instruct::TryFault`]
//! regions. The VM wants a flat stream: the protected body inline between
//! `TryFaultBegin`/`TryFaultEnd`, and every handler moved after the main
//! code under its fault label.

use hackbc_core::{FaultRegion, InstrSeq, Instruct};

fn flatten(instrs: InstrSeq, handlers: &mut Vec<InstrSeq>) -> InstrSeq {
    let mut out = InstrSeq::with_capacity(instrs.len());
    for instr in instrs {
        match instr {
            Instruct::TryFault(region) => {
                let FaultRegion {
                    fault_label,
                    body,
                    handler,
                } = *region;
                out.push(Instruct::TryFaultBegin(fault_label.clone()));
                out.append(flatten(body, handlers));
                out.push(Instruct::TryFaultEnd);

                // Handlers nested inside this handler follow it.
                let mut nested = Vec::new();
                let mut block = InstrSeq::one(Instruct::Label(fault_label));
                block.append(flatten(handler, &mut nested));
                handlers.push(block);
                handlers.extend(nested);
            }
            other => out.push(other),
        }
    }
    out
}

/// Flatten every fault region and append the handlers at the end.
///
/// Handlers of regions nested in a protected body come before the
/// enclosing region's handler.
pub fn extract_fault_regions(instrs: InstrSeq) -> InstrSeq {
    let mut handlers = Vec::new();
    let main = flatten(instrs, &mut handlers);
    InstrSeq::gather(std::iter::once(main).chain(handlers))
}
