//! Diagnostic system for the export and reflection passes.
//!
//! Every failure the passes detect is turned into a [`Diagnostic`]:
//! - Error codes for searchability (first digit is the phase)
//! - Clear messages (what went wrong)
//! - A source location (where it went wrong)
//! - Notes (names, origin files, offending field paths)
//!
//! Diagnostics flow into a [`DiagnosticSink`]. The passes never terminate
//! the process; they report and keep classifying the remaining declarations.
//!
//! # Error Guarantees
//!
//! [`ErrorGuaranteed`] is type-level proof that at least one error was
//! emitted. A run that fails returns it instead of a bare `bool`.
//!
//! ```text
//! let guarantee = queue.emit_error(diagnostic);
//! fn finish(self) -> Result<Vec<GeneratedFile>, ErrorGuaranteed> { ... }
//! ```

mod diagnostic;
mod error_code;
mod guarantee;
pub mod queue;

pub use diagnostic::{Diagnostic, Location, Severity};
pub use error_code::ErrorCode;
pub use guarantee::ErrorGuaranteed;
pub use queue::{DiagnosticConfig, DiagnosticQueue};

/// A reporting interface accepting located, severity-tagged messages.
///
/// Implemented by [`DiagnosticQueue`]; callers that only need to report
/// take `&mut dyn DiagnosticSink`.
pub trait DiagnosticSink {
    /// Record one diagnostic.
    fn report(&mut self, diagnostic: Diagnostic);

    /// Number of error-severity diagnostics recorded so far.
    fn error_count(&self) -> usize;
}
