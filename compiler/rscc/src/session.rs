//! Multi-file reflection sessions.
//!
//! A [`Session`] owns one [`Context`] and feeds translation units through it
//! in the order they are added. Slot numbers and ODR diagnostics depend on
//! that order. An ODR violation stops the session: later units are not
//! processed. Generation runs once every unit has been exported.

use rsc_diagnostic::{Diagnostic, DiagnosticQueue, DiagnosticSink, ErrorCode, ErrorGuaranteed};
use rsc_export::{Context, ExportMetadata, TranslationUnit, UnitId};
use rsc_reflect::{reflect, GeneratedFile};

use crate::config::ReflectConfig;

/// A failed run: every diagnostic it produced, in report order.
#[derive(Clone, Debug, thiserror::Error)]
#[error("reflection failed with {} error(s)", self.error_count())]
pub struct RunFailure {
    pub diagnostics: Vec<Diagnostic>,
    pub guarantee: ErrorGuaranteed,
}

impl RunFailure {
    pub fn error_count(&self) -> usize {
        self.diagnostics.iter().filter(|d| d.is_error()).count()
    }
}

/// Files, native metadata tables and warnings of a successful run.
#[derive(Clone, Debug, Default)]
pub struct RunOutput {
    pub files: Vec<GeneratedFile>,
    /// One entry per processed unit, in the order the units were added.
    pub metadata: Vec<ExportMetadata>,
    pub warnings: Vec<Diagnostic>,
}

/// One reflection run over a fixed sequence of files.
pub struct Session {
    config: ReflectConfig,
    ctx: Context,
    queue: DiagnosticQueue,
    units: Vec<UnitId>,
    aborted: bool,
}

impl Session {
    pub fn new(config: ReflectConfig) -> Self {
        let ctx = Context::new(config.target_api, config.abi);
        let queue = DiagnosticQueue::with_config(config.diagnostic_config());
        Session {
            config,
            ctx,
            queue,
            units: Vec::new(),
            aborted: false,
        }
    }

    /// Export `tu` into the shared context.
    ///
    /// Returns `None` if the unit was not processed because an earlier unit
    /// aborted the run, or if this one did.
    pub fn add(&mut self, tu: &TranslationUnit) -> Option<UnitId> {
        if self.aborted {
            tracing::debug!(file = %tu.file_name, "session aborted, skipping unit");
            return None;
        }
        match self.ctx.process_unit(tu, &mut self.queue) {
            Ok(id) => {
                self.units.push(id);
                Some(id)
            }
            Err(abort) => {
                tracing::warn!(
                    file = %tu.file_name,
                    name = %abort.violation.name,
                    "ODR violation, stopping session"
                );
                self.aborted = true;
                None
            }
        }
    }

    /// Add every unit of `units`, in order.
    pub fn add_all<'a>(&mut self, units: impl IntoIterator<Item = &'a TranslationUnit>) {
        for tu in units {
            self.add(tu);
        }
    }

    pub fn context(&self) -> &Context {
        &self.ctx
    }

    pub fn is_aborted(&self) -> bool {
        self.aborted
    }

    /// Diagnostics reported so far, unordered.
    pub fn diagnostics(&self) -> impl Iterator<Item = &Diagnostic> {
        self.queue.peek()
    }

    /// Generate the files of every processed unit.
    ///
    /// Fails if any error was reported, either while exporting or while
    /// generating; in that case no files are returned.
    #[tracing::instrument(level = "debug", skip_all, fields(units = self.units.len()))]
    pub fn finish(mut self) -> Result<RunOutput, RunFailure> {
        if self.aborted || self.queue.has_errors().is_some() {
            return Err(self.failure());
        }

        let options = self.config.reflect_options();
        let mut files = Vec::new();
        let mut metadata = Vec::with_capacity(self.units.len());
        for &id in &self.units {
            match reflect(&self.ctx, id, &options) {
                Ok(generated) => files.extend(generated),
                Err(err) => self.queue.report(err.to_diagnostic()),
            }
            metadata.push(ExportMetadata::collect(&self.ctx, id));
        }
        if self.queue.error_count() > 0 {
            return Err(self.failure());
        }

        tracing::debug!(files = files.len(), "session finished");
        Ok(RunOutput {
            files,
            metadata,
            warnings: self.queue.flush(),
        })
    }

    fn failure(&mut self) -> RunFailure {
        let diagnostics = self.queue.flush();
        let guarantee = ErrorGuaranteed::from_error_count(
            diagnostics.iter().filter(|d| d.is_error()).count(),
        );
        match guarantee {
            Some(guarantee) => RunFailure {
                diagnostics,
                guarantee,
            },
            None => internal_failure(diagnostics),
        }
    }
}

/// An abort without a reported error: the ODR diagnostic was dropped by the
/// error limit. Report the abort itself so the failure stays visible.
#[cold]
fn internal_failure(mut diagnostics: Vec<Diagnostic>) -> RunFailure {
    let mut queue = DiagnosticQueue::new();
    let guarantee = queue.emit_error(
        Diagnostic::error(ErrorCode::E9001)
            .with_message("run aborted without a reported error"),
    );
    diagnostics.extend(queue.flush());
    RunFailure {
        diagnostics,
        guarantee,
    }
}

#[cfg(test)]
#[expect(clippy::unwrap_used, reason = "Tests use unwrap for brevity")]
mod tests;
