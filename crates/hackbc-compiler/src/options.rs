//! Compiler options.

/// Options that change how bodies are assembled.
///
/// # Example
///
/// ```
/// use hackbc_compiler::CompilerOptions;
///
/// let options = CompilerOptions::new().with_source_mapping(true);
/// assert!(options.relabel);
/// assert!(options.source_mapping);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompilerOptions {
    /// Renumber labels densely after assembly and drop unreferenced ones.
    pub relabel: bool,
    /// Emit `SrcLoc` instructions in prologues and default-value setters.
    pub source_mapping: bool,
}

impl Default for CompilerOptions {
    fn default() -> Self {
        Self {
            relabel: true,
            source_mapping: false,
        }
    }
}

impl CompilerOptions {
    /// Create options with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Enable or disable relabeling.
    pub fn with_relabel(mut self, enabled: bool) -> Self {
        self.relabel = enabled;
        self
    }

    /// Enable or disable source mapping.
    pub fn with_source_mapping(mut self, enabled: bool) -> Self {
        self.source_mapping = enabled;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let options = CompilerOptions::default();
        assert!(options.relabel);
        assert!(!options.source_mapping);
    }

    #[test]
    fn builder_chain() {
        let options = CompilerOptions::new()
            .with_relabel(false)
            .with_source_mapping(true);
        assert!(!options.relabel);
        assert!(options.source_mapping);
    }
}
