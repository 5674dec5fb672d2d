//! Declarations that cross the native/host boundary.
//!
//! Each exportable owns a stable slot number: the index the native runtime
//! uses to address it. Slots are assigned by the [`Context`](crate::Context)
//! in discovery order.

use rsc_types::TypeId;

use crate::decl::{Initializer, Position};
use crate::signature::ForEachSignature;

/// An exported global variable.
#[derive(Clone, PartialEq, Debug)]
pub struct ExportVar {
    pub name: String,
    pub ty: TypeId,
    pub slot: u32,
    /// `const` variables are read-only on the host side.
    pub is_const: bool,
    pub init: Option<Initializer>,
    pub pos: Position,
}

/// An exported invokable function.
#[derive(Clone, Eq, PartialEq, Debug)]
pub struct ExportFunc {
    pub name: String,
    pub slot: u32,
    /// Parameter names and types, in declaration order.
    pub params: Vec<(String, TypeId)>,
    /// Artificial record the arguments are packed into; `None` without
    /// parameters.
    pub packet: Option<TypeId>,
    pub pos: Position,
}

/// What occupies a ForEach slot.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum ForEachKind {
    Kernel,
    /// `int root(void)`; holds slot 0 but has no host launcher.
    GraphicsRoot,
    /// Slot 0 filler when kernels exist but `root` does not.
    Placeholder,
}

/// An exported ForEach kernel.
#[derive(Clone, Eq, PartialEq, Debug)]
pub struct ExportForEach {
    pub name: String,
    pub slot: u32,
    pub kind: ForEachKind,
    pub signature: ForEachSignature,
    /// Element type of the input allocation, when it can be exported.
    pub input: Option<TypeId>,
    /// Element type of the output allocation, when it can be exported.
    pub output: Option<TypeId>,
    /// Artificial record wrapping the user data argument. `None` when the
    /// kernel takes no user data or takes `const void *`.
    pub packet: Option<TypeId>,
    pub pos: Position,
}

impl ExportForEach {
    /// True if the host gets a `forEach_` launcher for this slot.
    pub fn is_launchable(&self) -> bool {
        self.kind == ForEachKind::Kernel
    }
}

/// An exported reduce kernel.
#[derive(Clone, Eq, PartialEq, Debug)]
pub struct ExportReduce {
    pub name: String,
    pub slot: u32,
    /// Type of both arguments and the result.
    pub ty: TypeId,
    pub pos: Position,
}

/// Borrowed view over any exportable.
#[derive(Copy, Clone, Debug)]
pub enum Exportable<'a> {
    Var(&'a ExportVar),
    Func(&'a ExportFunc),
    ForEach(&'a ExportForEach),
    Reduce(&'a ExportReduce),
}

impl Exportable<'_> {
    pub fn name(&self) -> &str {
        match self {
            Exportable::Var(v) => &v.name,
            Exportable::Func(f) => &f.name,
            Exportable::ForEach(k) => &k.name,
            Exportable::Reduce(r) => &r.name,
        }
    }

    pub fn slot(&self) -> u32 {
        match self {
            Exportable::Var(v) => v.slot,
            Exportable::Func(f) => f.slot,
            Exportable::ForEach(k) => k.slot,
            Exportable::Reduce(r) => r.slot,
        }
    }
}
