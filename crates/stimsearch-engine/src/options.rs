//! Per-call evaluation options.
//!
//! Options are created per evaluation call and validated against the table's
//! schema when the call runs; rule sets themselves are configured on the
//! [`crate::SearchEngine`].

/// Options for a CDC evaluation.
#[derive(Debug, Clone)]
pub struct CdcOptions {
    /// Name of the free-text column to search.
    pub text_column: String,
    /// Materialize per-term diagnostics at a substantial runtime and memory
    /// cost. An advisory warning is logged when enabled.
    pub tracing: bool,
}

impl CdcOptions {
    pub fn new(text_column: impl Into<String>) -> Self {
        Self {
            text_column: text_column.into(),
            tracing: false,
        }
    }

    pub fn with_tracing(mut self, tracing: bool) -> Self {
        self.tracing = tracing;
        self
    }
}

/// Options for a Bettano evaluation.
#[derive(Debug, Clone)]
pub struct BettanoOptions {
    /// Name of the free-text column to search.
    pub text_column: String,
    /// Integer age column; required when `depth > 1`, ignored (with an
    /// advisory warning) at depth 1.
    pub age_column: Option<String>,
    /// Materialize per-term diagnostics at a substantial runtime and memory
    /// cost. An advisory warning is logged when enabled.
    pub tracing: bool,
    /// How many dependent levels to evaluate, starting at level 1.
    pub depth: usize,
}

impl BettanoOptions {
    pub fn new(text_column: impl Into<String>) -> Self {
        Self {
            text_column: text_column.into(),
            age_column: None,
            tracing: false,
            depth: 3,
        }
    }

    pub fn with_age_column(mut self, age_column: impl Into<String>) -> Self {
        self.age_column = Some(age_column.into());
        self
    }

    pub fn with_tracing(mut self, tracing: bool) -> Self {
        self.tracing = tracing;
        self
    }

    pub fn with_depth(mut self, depth: usize) -> Self {
        self.depth = depth;
        self
    }
}
