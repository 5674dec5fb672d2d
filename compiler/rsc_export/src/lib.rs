//! Exportables and the reflection context.
//!
//! The front end hands over one [`TranslationUnit`] per source file. The
//! [`Context`] classifies every declaration in it, interns the types that
//! cross the native/host boundary, and numbers the exported symbols:
//!
//! - variables, invokables and reduce kernels get slots in declaration order
//! - ForEach kernels get slots 1..N; slot 0 belongs to `root`, or to a
//!   placeholder when the file has no `root`
//!
//! [`kernel::classify`] decides the calling convention of each function and
//! [`ForEachSignature`] carries the native metadata bits of a ForEach kernel.

mod context;
mod decl;
mod error;
mod exportable;
pub mod kernel;
mod metadata;
mod signature;
mod target;

pub use context::{Context, ScriptUnit, UnitId, FOREACH_PACKET_PREFIX, INVOKE_PACKET_PREFIX};
pub use decl::{
    FuncDecl, Initializer, KernelAttr, ParamDecl, Position, Pragmas, Storage, TranslationUnit,
    VarDecl,
};
pub use error::{ExportError, KernelError, RunAborted};
pub use exportable::{ExportForEach, ExportFunc, ExportReduce, ExportVar, Exportable, ForEachKind};
pub use kernel::{KernelClass, KernelErrors};
pub use metadata::{ExportMetadata, RecordMetadata};
pub use signature::ForEachSignature;
pub use target::{TargetApi, UnsupportedTargetApi};
