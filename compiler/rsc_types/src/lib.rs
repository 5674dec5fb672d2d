//! Export types for the kernel compiler.
//!
//! This crate decides which source types can cross the native/host
//! boundary, computes their byte-exact layout on the target ABI, interns
//! them by canonical name, and enforces the One-Definition-Rule for records
//! shared between source files.
//!
//! # Overview
//!
//! - [`SourceTypes`]: the front end's view of a file's types
//! - [`normalize`]: exportability check and canonical naming
//! - [`TypePool`]: arena and intern map of [`ExportType`]s
//! - [`structurally_equal`]: shape equality between export types
//! - [`OdrRegistry`]: first definitions of named records

mod data_type;
mod equality;
mod error;
mod export_type;
mod layout;
mod normalize;
mod odr;
mod pool;
mod source;

pub use data_type::{vector_name, DataKind, DataType, ElementInfo};
pub use equality::structurally_equal;
pub use error::{MalformedReason, TypeError, Unexportable, UnsupportedReason};
pub use export_type::{
    ArrayType, ExportClass, ExportKind, ExportType, Field, MatrixType, PointerType, PrimitiveType,
    RecordType, TypeId, VectorType,
};
pub use layout::{align_to, layout_record, Abi, Layout, RecordLayout};
pub use normalize::normalize;
pub use odr::{OdrEntry, OdrMismatch, OdrRegistry, OdrViolation};
pub use pool::TypePool;
pub use source::{
    BuiltinKind, RecordDecl, SourceField, SourceTypeId, SourceTypeKind, SourceTypes,
    SpellingDisplay,
};
