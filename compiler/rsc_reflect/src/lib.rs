//! Host binding generator.
//!
//! Turns the exportables of a [`rsc_export::Context`] into Java classes:
//!
//! - `ScriptC_<stem>` per script, with slot constants, variable accessors,
//!   `invoke_`, `forEach_` and `reduce_` methods
//! - `ScriptField_<Record>` per record type a script defines
//!
//! Values cross the boundary through a `FieldPacker` at native layout. The
//! packing code comes from a [`PackPlan`], which [`packer::execute`] can
//! also run against a byte buffer.
//!
//! Writing the files is the caller's job; [`reflect`] returns
//! [`GeneratedFile`]s.

mod element;
mod error;
mod generate;
mod header;
mod names;
mod options;
mod pack;
pub mod packer;
mod script_class;
mod type_class;
mod writer;

pub use element::{ElementEntry, ElementLayout};
pub use error::ReflectError;
pub use generate::{reflect, GeneratedFile};
pub use header::DEFAULT_LICENSE;
pub use names::{
    element_check_name, element_expr, is_java_identifier, is_package_name, java_type_name,
    PackerApi, SCRIPT_CLASS_PREFIX, TYPE_CLASS_PREFIX,
};
pub use options::{ReflectOptions, DEFAULT_RS_PACKAGE};
pub use pack::{PackPlan, PackStep};
pub use packer::{FieldPacker, PackOverflow};
pub use writer::{Access, JavaWriter};
