//! Independent runs in parallel.
//!
//! Each run gets its own [`Session`] and therefore its own context and ODR
//! registry. Nothing is shared between runs, so they are spread over the
//! rayon pool; results keep the order of the input.

use rayon::prelude::*;
use rsc_export::TranslationUnit;

use crate::config::ReflectConfig;
use crate::session::{RunFailure, RunOutput, Session};

/// Run one session per entry of `runs`, all with `config`.
pub fn run_independent(
    config: &ReflectConfig,
    runs: &[Vec<TranslationUnit>],
) -> Vec<Result<RunOutput, RunFailure>> {
    tracing::debug!(runs = runs.len(), "starting independent runs");
    runs.par_iter()
        .map(|units| {
            let mut session = Session::new(config.clone());
            session.add_all(units);
            session.finish()
        })
        .collect()
}
