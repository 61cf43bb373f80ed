//! Jump targets for control flow.
//!
//! Tracks the loop contexts that `break`/`continue` resolve against and the
//! user labels `goto` may target. Reset at the start of every body.

use hackbc_core::{CompileError, IterId, Label, Span};
use rustc_hash::FxHashSet;

type Result<T> = std::result::Result<T, CompileError>;

/// Jump targets for the body being emitted.
///
/// Tracks a stack of loop contexts to support nested loops with proper
/// break/continue handling, plus the `goto` label set.
#[derive(Debug, Default)]
pub struct JumpTargets {
    /// Stack of loop contexts (innermost last)
    loops: Vec<LoopContext>,
    /// Labels `goto` may target; `None` when the body has no `goto`.
    labels: Option<FxHashSet<String>>,
}

/// Context for a single loop.
#[derive(Debug)]
struct LoopContext {
    break_label: Label,
    continue_label: Label,
    /// Iterator to free when breaking out of a `foreach`.
    iterator: Option<IterId>,
}

impl JumpTargets {
    /// Create empty jump targets with `goto` disabled.
    pub fn new() -> Self {
        Self::default()
    }

    /// Clear all loop contexts and seed the `goto` label set.
    ///
    /// Passing `None` disables `goto` for the body.
    pub fn reset(&mut self, labels: Option<&FxHashSet<String>>) {
        self.loops.clear();
        self.labels = labels.cloned();
    }

    /// Enter a new loop context.
    pub fn enter_loop(&mut self, break_label: Label, continue_label: Label, iterator: Option<IterId>) {
        self.loops.push(LoopContext {
            break_label,
            continue_label,
            iterator,
        });
    }

    /// Exit the current loop context.
    pub fn exit_loop(&mut self) {
        self.loops.pop();
    }

    /// Check if we're currently inside a loop.
    pub fn in_loop(&self) -> bool {
        !self.loops.is_empty()
    }

    /// Get the current loop nesting depth.
    pub fn loop_depth(&self) -> usize {
        self.loops.len()
    }

    /// Target of `break` in the innermost loop, with its iterator if any.
    pub fn break_target(&self, span: Span) -> Result<(Label, Option<IterId>)> {
        self.loops
            .last()
            .map(|ctx| (ctx.break_label.clone(), ctx.iterator))
            .ok_or_else(|| CompileError::parse(span, "'break' not in the 'loop' or 'switch' context"))
    }

    /// Target of `continue` in the innermost loop.
    pub fn continue_target(&self, span: Span) -> Result<Label> {
        self.loops
            .last()
            .map(|ctx| ctx.continue_label.clone())
            .ok_or_else(|| CompileError::parse(span, "'continue' not in the 'loop' or 'switch' context"))
    }

    /// Whether the body may use `goto`.
    pub fn goto_enabled(&self) -> bool {
        self.labels.is_some()
    }

    /// Resolve a `goto` target to its user label.
    pub fn goto_target(&self, name: &str, span: Span) -> Result<Label> {
        match &self.labels {
            None => Err(CompileError::parse(span, "'goto' is not supported in this body")),
            Some(labels) if labels.contains(name) => Ok(Label::Named(name.to_string())),
            Some(_) => Err(CompileError::parse(
                span,
                format!("'goto' to undefined label '{}'", name),
            )),
        }
    }
}
