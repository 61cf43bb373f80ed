//! Source location tracking for diagnostics and source mapping.
//!
//! Provides [`Span`], the position attached to definitions, statements and
//! fatal errors. Spans are also carried by `SrcLoc` instructions when source
//! mapping is enabled.

use std::fmt;

/// A region of source code.
///
/// Lines and columns are 1-indexed. A span with `line == 0` is the
/// "no position" span used by synthesized code.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Span {
    /// First line of the region.
    pub line: u32,
    /// Column on the first line.
    pub col: u32,
    /// Last line of the region.
    pub end_line: u32,
    /// Column on the last line (exclusive).
    pub end_col: u32,
}

impl Span {
    /// Create a span covering `line:col` to `end_line:end_col`.
    #[inline]
    pub fn new(line: u32, col: u32, end_line: u32, end_col: u32) -> Self {
        Self {
            line,
            col,
            end_line,
            end_col,
        }
    }

    /// Create a zero-length span at a position.
    #[inline]
    pub fn point(line: u32, col: u32) -> Self {
        Self::new(line, col, line, col)
    }

    /// Whether this is the synthesized "no position" span.
    #[inline]
    pub fn is_none(&self) -> bool {
        self.line == 0
    }

    /// Smallest span covering both `self` and `other`.
    ///
    /// A "no position" span is absorbed by the other side.
    pub fn merge(self, other: Span) -> Span {
        if self.is_none() {
            return other;
        }
        if other.is_none() {
            return self;
        }
        let (line, col) = (self.line, self.col).min((other.line, other.col));
        let (end_line, end_col) = (self.end_line, self.end_col).max((other.end_line, other.end_col));
        Span {
            line,
            col,
            end_line,
            end_col,
        }
    }
}

impl fmt::Debug for Span {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}:{}-{}:{}",
            self.line, self.col, self.end_line, self.end_col
        )
    }
}

impl fmt::Display for Span {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.line, self.col)
    }
}
