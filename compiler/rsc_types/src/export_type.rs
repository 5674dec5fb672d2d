//! Export types: the interned, layout-annotated view of source types that
//! crosses the native/host boundary.
//!
//! # Design
//!
//! Export types live in a [`TypePool`](crate::TypePool) arena and are
//! referred to by [`TypeId`]. Children (pointee, element, fields) are ids
//! into the same arena, so recursive records are just cycles of ids.

use std::fmt;

use crate::data_type::{DataKind, DataType};
use crate::layout::Layout;

/// Index of an export type in a [`TypePool`](crate::TypePool).
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug, PartialOrd, Ord)]
#[repr(transparent)]
pub struct TypeId(u32);

impl TypeId {
    #[inline]
    pub const fn from_raw(raw: u32) -> Self {
        TypeId(raw)
    }

    #[inline]
    pub const fn raw(self) -> u32 {
        self.0
    }

    #[inline]
    pub const fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for TypeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Variant discriminant of an export type.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum ExportClass {
    Primitive,
    Pointer,
    Vector,
    Matrix,
    ConstantArray,
    Record,
}

/// Scalar, packed pixel or object handle.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub struct PrimitiveType {
    pub data_type: DataType,
    pub kind: DataKind,
    pub normalized: bool,
}

impl PrimitiveType {
    /// A user-kind, non-normalized primitive.
    pub const fn user(data_type: DataType) -> Self {
        PrimitiveType {
            data_type,
            kind: DataKind::User,
            normalized: false,
        }
    }

    pub const fn is_object(self) -> bool {
        self.data_type.is_object()
    }
}

/// Pointer to another export type.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub struct PointerType {
    pub pointee: TypeId,
}

/// Ext-vector of 2 to 4 primitive elements.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub struct VectorType {
    pub element: PrimitiveType,
    pub count: u32,
}

/// Square float matrix of dimension 2 to 4.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub struct MatrixType {
    pub dim: u32,
}

impl MatrixType {
    /// The matrix data type for this dimension.
    ///
    /// Dimensions are validated on construction, so this only falls back to
    /// 4x4 for values no pool produces.
    pub const fn data_type(self) -> DataType {
        match DataType::matrix(self.dim) {
            Some(dt) => dt,
            None => DataType::RSMatrix4x4,
        }
    }
}

/// Fixed-size array.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub struct ArrayType {
    pub element: TypeId,
    pub size: u32,
}

/// One laid-out record member.
#[derive(Clone, Eq, PartialEq, Debug)]
pub struct Field {
    pub name: String,
    pub ty: TypeId,
    /// Record that owns this field.
    pub parent: TypeId,
    /// Byte offset from the start of the record.
    pub offset: u32,
    /// Declaration index.
    pub index: u32,
}

/// Struct type with computed member offsets.
#[derive(Clone, Eq, PartialEq, Debug)]
pub struct RecordType {
    pub fields: Vec<Field>,
    pub packed: bool,
    /// Synthesized by the compiler (parameter packets); never reflected as a
    /// standalone host type.
    pub artificial: bool,
    pub alloc_size: u32,
}

impl RecordType {
    pub fn field(&self, name: &str) -> Option<&Field> {
        self.fields.iter().find(|f| f.name == name)
    }
}

/// Per-variant payload of an export type.
#[derive(Clone, Eq, PartialEq, Debug)]
pub enum ExportKind {
    Primitive(PrimitiveType),
    Pointer(PointerType),
    Vector(VectorType),
    Matrix(MatrixType),
    ConstantArray(ArrayType),
    Record(RecordType),
}

impl ExportKind {
    pub const fn class(&self) -> ExportClass {
        match self {
            ExportKind::Primitive(_) => ExportClass::Primitive,
            ExportKind::Pointer(_) => ExportClass::Pointer,
            ExportKind::Vector(_) => ExportClass::Vector,
            ExportKind::Matrix(_) => ExportClass::Matrix,
            ExportKind::ConstantArray(_) => ExportClass::ConstantArray,
            ExportKind::Record(_) => ExportClass::Record,
        }
    }
}

/// An interned export type.
#[derive(Clone, Eq, PartialEq, Debug)]
pub struct ExportType {
    name: String,
    kind: ExportKind,
    layout: Layout,
}

impl ExportType {
    pub(crate) fn new(name: String, kind: ExportKind, layout: Layout) -> Self {
        ExportType { name, kind, layout }
    }

    /// Canonical name; unique within a pool for interned types.
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn kind(&self) -> &ExportKind {
        &self.kind
    }

    pub fn class(&self) -> ExportClass {
        self.kind.class()
    }

    pub fn layout(&self) -> Layout {
        self.layout
    }

    pub fn store_size(&self) -> u32 {
        self.layout.store_size
    }

    pub fn alloc_size(&self) -> u32 {
        self.layout.alloc_size
    }

    pub fn as_primitive(&self) -> Option<PrimitiveType> {
        match &self.kind {
            ExportKind::Primitive(p) => Some(*p),
            _ => None,
        }
    }

    pub fn as_pointer(&self) -> Option<PointerType> {
        match &self.kind {
            ExportKind::Pointer(p) => Some(*p),
            _ => None,
        }
    }

    pub fn as_vector(&self) -> Option<VectorType> {
        match &self.kind {
            ExportKind::Vector(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_matrix(&self) -> Option<MatrixType> {
        match &self.kind {
            ExportKind::Matrix(m) => Some(*m),
            _ => None,
        }
    }

    pub fn as_array(&self) -> Option<ArrayType> {
        match &self.kind {
            ExportKind::ConstantArray(a) => Some(*a),
            _ => None,
        }
    }

    pub fn as_record(&self) -> Option<&RecordType> {
        match &self.kind {
            ExportKind::Record(r) => Some(r),
            _ => None,
        }
    }

    /// True for object handle primitives.
    pub fn is_object(&self) -> bool {
        self.as_primitive().is_some_and(PrimitiveType::is_object)
    }

    /// True for records synthesized by the compiler.
    pub fn is_artificial(&self) -> bool {
        self.as_record().is_some_and(|r| r.artificial)
    }

    pub(crate) fn set_record(&mut self, record: RecordType, layout: Layout) {
        self.kind = ExportKind::Record(record);
        self.layout = layout;
    }
}
