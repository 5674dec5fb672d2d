//! Diagnostic queue for collecting, deduplicating, and ordering diagnostics.
//!
//! Features:
//! - Error limits to prevent overwhelming output
//! - Deduplication of identical reports
//! - Deterministic ordering: files in first-reported order, then by position
//! - `ErrorGuaranteed` proof that errors were emitted

use std::collections::HashMap;

use crate::{Diagnostic, DiagnosticSink, ErrorCode, ErrorGuaranteed};

/// Configuration for diagnostic processing.
#[derive(Clone, Debug, Eq, PartialEq, Hash)]
pub struct DiagnosticConfig {
    /// Maximum number of errors before further errors are dropped (0 = unlimited).
    pub error_limit: usize,
    /// Drop a diagnostic identical to one already queued.
    pub deduplicate: bool,
}

impl Default for DiagnosticConfig {
    fn default() -> Self {
        DiagnosticConfig {
            error_limit: 20,
            deduplicate: true,
        }
    }
}

impl DiagnosticConfig {
    /// Create a config with no limits (for testing).
    pub fn unlimited() -> Self {
        DiagnosticConfig {
            error_limit: 0,
            deduplicate: false,
        }
    }
}

/// Queue for collecting diagnostics from every pass of a run.
///
/// # Example
///
/// ```text
/// let mut queue = DiagnosticQueue::new();
/// queue.report(diagnostic);
/// // ... more passes report
/// let ordered = queue.flush();
/// ```
#[derive(Clone, Debug, Default)]
pub struct DiagnosticQueue {
    diagnostics: Vec<Diagnostic>,
    /// Rank of each file by first appearance, for stable ordering.
    file_rank: HashMap<String, usize>,
    error_count: usize,
    warning_count: usize,
    /// Set once an error was dropped because of the limit.
    truncated: bool,
    config: DiagnosticConfig,
}

impl DiagnosticQueue {
    /// Create a new diagnostic queue with default configuration.
    pub fn new() -> Self {
        Self::with_config(DiagnosticConfig::default())
    }

    /// Create a diagnostic queue with custom configuration.
    pub fn with_config(config: DiagnosticConfig) -> Self {
        DiagnosticQueue {
            config,
            ..DiagnosticQueue::default()
        }
    }

    /// Add a diagnostic to the queue.
    ///
    /// Returns `true` if the diagnostic was added, `false` if it was filtered.
    pub fn add(&mut self, diag: Diagnostic) -> bool {
        let is_error = diag.is_error();

        if is_error && self.limit_reached() {
            self.truncated = true;
            return false;
        }

        if self.config.deduplicate && self.diagnostics.contains(&diag) {
            return false;
        }

        if let Some(location) = &diag.location {
            let next = self.file_rank.len();
            self.file_rank.entry(location.file.clone()).or_insert(next);
        }

        if is_error {
            self.error_count += 1;
        } else {
            self.warning_count += 1;
        }
        self.diagnostics.push(diag);
        true
    }

    /// Emit an error diagnostic and get proof it was emitted.
    pub fn emit_error(&mut self, diag: Diagnostic) -> ErrorGuaranteed {
        debug_assert!(diag.is_error(), "emit_error called with a non-error");
        self.add(diag);
        ErrorGuaranteed::new()
    }

    /// Check if the error limit has been reached.
    pub fn limit_reached(&self) -> bool {
        self.config.error_limit > 0 && self.error_count >= self.config.error_limit
    }

    /// Get the number of errors collected.
    pub fn error_count(&self) -> usize {
        self.error_count
    }

    /// Get the number of warnings and notes collected.
    pub fn warning_count(&self) -> usize {
        self.warning_count
    }

    /// Check if any errors were emitted and get proof if so.
    pub fn has_errors(&self) -> Option<ErrorGuaranteed> {
        ErrorGuaranteed::from_error_count(self.error_count)
    }

    /// Order diagnostics and return them, clearing the queue.
    ///
    /// Diagnostics without a location keep their relative order and sort
    /// after located ones.
    pub fn flush(&mut self) -> Vec<Diagnostic> {
        let rank = std::mem::take(&mut self.file_rank);
        let mut result = std::mem::take(&mut self.diagnostics);
        result.sort_by_key(|d| match &d.location {
            Some(loc) => (rank.get(&loc.file).copied().unwrap_or(usize::MAX), loc.line, loc.column),
            None => (usize::MAX, u32::MAX, u32::MAX),
        });

        if self.truncated {
            result.push(too_many_errors(self.config.error_limit));
        }

        self.error_count = 0;
        self.warning_count = 0;
        self.truncated = false;
        result
    }

    /// Get diagnostics without clearing the queue.
    pub fn peek(&self) -> impl Iterator<Item = &Diagnostic> {
        self.diagnostics.iter()
    }
}

impl DiagnosticSink for DiagnosticQueue {
    fn report(&mut self, diagnostic: Diagnostic) {
        self.add(diagnostic);
    }

    fn error_count(&self) -> usize {
        self.error_count
    }
}

/// Create a "too many errors" diagnostic.
#[cold]
pub fn too_many_errors(limit: usize) -> Diagnostic {
    Diagnostic::error(ErrorCode::E9002)
        .with_message(format!("aborting after {limit} errors"))
        .with_note("raise the error limit to see every diagnostic")
}
