//! Driver for the export and reflection passes.
//!
//! The front end hands over one [`TranslationUnit`] per source file. A
//! [`Session`] exports them through a shared context, in order, and then
//! generates the host classes:
//!
//! ```text
//! let mut session = Session::new(ReflectConfig::default());
//! session.add_all(&units);
//! let output = session.finish()?;
//! for file in &output.files {
//!     write(file.relative_path(), file.contents());
//! }
//! ```
//!
//! Writing files is left to the caller. Unrelated file sets can be reflected
//! concurrently with [`run_independent`].

mod config;
mod parallel;
mod session;
mod tracing_setup;

pub use config::ReflectConfig;
pub use parallel::run_independent;
pub use session::{RunFailure, RunOutput, Session};
pub use tracing_setup::{init_tracing, LOG_ENV};

pub use rsc_export::{ExportMetadata, TargetApi, TranslationUnit};
pub use rsc_reflect::GeneratedFile;
