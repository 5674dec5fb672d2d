//! Export type arena and intern map.
//!
//! # Design
//!
//! One pool lives for a whole multi-file run. Types are interned by their
//! canonical name, so every lookup of `"*float"` returns the same
//! [`TypeId`].
//!
//! Named records get extra care:
//!
//! - A record's id is reserved and registered *before* its members are
//!   built, so a member pointing back at the record resolves to that id.
//! - When a later file defines a record whose name is already registered
//!   from another file, the new definition is built as an unregistered
//!   candidate and checked against the first one by the ODR registry. A
//!   match resolves to the first definition's id; a mismatch is an
//!   [`OdrViolation`](crate::OdrViolation).
//! - A cached pointer or array still walks its pointee or element, so a
//!   file that only reaches a record through `Point*` or `Point[4]` gets
//!   its own `Point` checked too.
//! - If a record fails to build, every name interned since its id was
//!   reserved is dropped, including `*Bad` entries created by its members.
//! - Artificial records (parameter packets) never enter the intern map.

use rustc_hash::{FxHashMap, FxHashSet};

use crate::data_type::{vector_name, DataType, ElementInfo};
use crate::equality::structurally_equal;
use crate::error::{MalformedReason, TypeError, Unexportable, UnsupportedReason};
use crate::export_type::{
    ArrayType, ExportKind, ExportType, Field, MatrixType, PointerType, PrimitiveType, RecordType,
    TypeId, VectorType,
};
use crate::layout::{layout_record, Abi, Layout};
use crate::normalize::normalize;
use crate::odr::OdrRegistry;
use crate::source::{BuiltinKind, RecordDecl, SourceTypeId, SourceTypeKind, SourceTypes};

/// Placeholder layout of a record whose members are still being built.
const PENDING_LAYOUT: Layout = Layout {
    store_size: 0,
    alloc_size: 0,
    align: 1,
};

/// Arena of export types for one run.
#[derive(Clone, Debug)]
pub struct TypePool {
    types: Vec<ExportType>,
    by_name: FxHashMap<String, TypeId>,
    odr: OdrRegistry,
    /// Records whose redefinition is being checked right now.
    checking: FxHashSet<String>,
    abi: Abi,
    origin: String,
}

impl Default for TypePool {
    fn default() -> Self {
        TypePool::new(Abi::default())
    }
}

impl TypePool {
    pub fn new(abi: Abi) -> Self {
        TypePool {
            types: Vec::new(),
            by_name: FxHashMap::default(),
            odr: OdrRegistry::new(),
            checking: FxHashSet::default(),
            abi,
            origin: String::new(),
        }
    }

    /// Set the source file that subsequent record definitions come from.
    pub fn begin_file(&mut self, origin: impl Into<String>) {
        self.origin = origin.into();
        tracing::debug!(origin = %self.origin, "begin file");
    }

    /// File currently being interned.
    pub fn origin(&self) -> &str {
        &self.origin
    }

    pub fn abi(&self) -> Abi {
        self.abi
    }

    pub fn len(&self) -> usize {
        self.types.len()
    }

    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }

    /// Look up a type by id.
    ///
    /// # Panics
    /// Panics if `id` was not produced by this pool.
    #[inline]
    pub fn get(&self, id: TypeId) -> &ExportType {
        &self.types[id.index()]
    }

    /// Canonical name of `id`.
    pub fn name(&self, id: TypeId) -> &str {
        self.get(id).name()
    }

    /// Interned type with canonical name `name`.
    pub fn lookup(&self, name: &str) -> Option<TypeId> {
        self.by_name.get(name).copied()
    }

    pub fn odr(&self) -> &OdrRegistry {
        &self.odr
    }

    /// Structural equality, see [`structurally_equal`].
    pub fn equals(&self, a: TypeId, b: TypeId) -> bool {
        structurally_equal(self, a, b)
    }

    /// Non-artificial records first defined by `origin`, in definition order.
    pub fn records_defined_in(&self, origin: &str) -> Vec<TypeId> {
        self.odr
            .defined_in(origin)
            .map(|entry| entry.ty)
            .filter(|&id| self.get(id).as_record().is_some_and(|r| !r.artificial))
            .collect()
    }

    // ── Interning ───────────────────────────────────────────────

    /// Normalize `ty` and return its interned export type.
    pub fn intern(&mut self, src: &SourceTypes, ty: SourceTypeId) -> Result<TypeId, TypeError> {
        let name = normalize(src, ty, &mut FxHashSet::default())?;
        self.construct(src, src.canonical(ty), name)
    }

    /// Like [`Self::intern`], but honors element typedefs (`rs_pixel_*`) on
    /// the declared type of a variable or record member.
    pub fn intern_decl(
        &mut self,
        src: &SourceTypes,
        ty: SourceTypeId,
    ) -> Result<TypeId, TypeError> {
        let element = src
            .typedef_names(ty)
            .into_iter()
            .find_map(|name| ElementInfo::for_typedef(name).map(|info| (name.to_string(), info)));
        match element {
            Some((typedef, info)) => self.intern_element(src, ty, typedef, info),
            None => self.intern(src, ty),
        }
    }

    /// Interned scalar or object handle type for `data_type`.
    pub fn primitive(&mut self, data_type: DataType) -> TypeId {
        let name = data_type
            .c_name()
            .or_else(|| data_type.struct_name())
            .unwrap_or_default();
        if let Some(id) = self.lookup(name) {
            return id;
        }
        let layout = Layout::primitive(data_type, self.abi);
        self.push_named(
            name.to_string(),
            ExportKind::Primitive(PrimitiveType::user(data_type)),
            layout,
        )
    }

    /// Build a compiler-synthesized record from already interned members.
    ///
    /// The record is never entered in the intern map or ODR registry.
    pub fn intern_artificial_record(
        &mut self,
        name: impl Into<String>,
        fields: Vec<(String, TypeId)>,
    ) -> Result<TypeId, TypeError> {
        let id = self.push(ExportType::new(
            name.into(),
            ExportKind::Record(empty_record(false, true)),
            PENDING_LAYOUT,
        ));
        self.finish_record(id, fields, false, true)?;
        tracing::trace!(name = self.name(id), "built artificial record");
        Ok(id)
    }

    // ── Construction ────────────────────────────────────────────

    fn construct(
        &mut self,
        src: &SourceTypes,
        ty: SourceTypeId,
        name: String,
    ) -> Result<TypeId, TypeError> {
        if let Some(id) = self.lookup(&name) {
            match src.kind(ty) {
                SourceTypeKind::Record(decl) if self.is_redefinable(id, &name) => {
                    return self.check_redefinition(src, decl, name, id);
                }
                // The cached entry may come from another file: this file's
                // records behind it still have to be checked.
                SourceTypeKind::Pointer(pointee) if !src.is_pointer(*pointee) => {
                    self.intern(src, *pointee)?;
                }
                SourceTypeKind::ConstantArray { element, .. } => {
                    self.intern(src, *element)?;
                }
                _ => {}
            }
            return Ok(id);
        }

        let abi = self.abi;
        match src.kind(ty) {
            SourceTypeKind::Builtin(kind) => {
                let Some(dt) = DataType::from_builtin(*kind) else {
                    return Err(unsupported(name, UnsupportedReason::Builtin(*kind)));
                };
                Ok(self.push_named(
                    name,
                    ExportKind::Primitive(PrimitiveType::user(dt)),
                    Layout::primitive(dt, abi),
                ))
            }
            SourceTypeKind::Record(decl) => {
                if let Some(dt) = DataType::from_object_name(&name) {
                    return Ok(self.push_named(
                        name,
                        ExportKind::Primitive(PrimitiveType::user(dt)),
                        Layout::primitive(dt, abi),
                    ));
                }
                if let Some(dt) = DataType::from_matrix_name(&name) {
                    return self.construct_matrix(src, decl, name, dt);
                }
                self.construct_record(src, decl, name, true)
            }
            SourceTypeKind::Pointer(pointee) => {
                let pointee = if src.is_pointer(*pointee) {
                    self.primitive(DataType::Signed32)
                } else {
                    self.intern(src, *pointee)?
                };
                // A self-referential record already interned this pointer.
                if let Some(id) = self.lookup(&name) {
                    return Ok(id);
                }
                Ok(self.push_named(
                    name,
                    ExportKind::Pointer(PointerType { pointee }),
                    Layout::pointer(abi),
                ))
            }
            SourceTypeKind::ConstantArray { element, size } => {
                let Some(count) = u32::try_from(*size).ok().filter(|&n| n > 0) else {
                    return Err(TypeError::malformed(name, MalformedReason::ArraySize(*size)));
                };
                let element = self.intern(src, *element)?;
                let Some(layout) = Layout::array(self.get(element).layout(), count) else {
                    return Err(TypeError::malformed(name, MalformedReason::LayoutOverflow));
                };
                Ok(self.push_named(
                    name,
                    ExportKind::ConstantArray(ArrayType {
                        element,
                        size: count,
                    }),
                    layout,
                ))
            }
            SourceTypeKind::ExtVector { element, count } => {
                let dt = match src.builtin_kind(*element).and_then(DataType::from_builtin) {
                    Some(DataType::Boolean) => DataType::Signed8,
                    Some(dt) => dt,
                    None => return Err(unsupported(name, UnsupportedReason::VectorElement)),
                };
                let Some(layout) = Layout::vector(dt, *count, abi) else {
                    return Err(TypeError::malformed(name, MalformedReason::LayoutOverflow));
                };
                Ok(self.push_named(
                    name,
                    ExportKind::Vector(VectorType {
                        element: PrimitiveType::user(dt),
                        count: *count,
                    }),
                    layout,
                ))
            }
            other => Err(unsupported(name, UnsupportedReason::Class(other.class_name()))),
        }
    }

    /// Matrices are structs wrapping a single `float m[Dim*Dim]`.
    fn construct_matrix(
        &mut self,
        src: &SourceTypes,
        decl: &RecordDecl,
        name: String,
        dt: DataType,
    ) -> Result<TypeId, TypeError> {
        let dim = dt.matrix_dim().unwrap_or(4);
        if decl.defined {
            let cells = u64::from(dim * dim);
            let well_formed = match decl.fields.as_slice() {
                [field] => matches!(
                    src.kind(src.canonical(field.ty)),
                    SourceTypeKind::ConstantArray { element, size }
                        if *size == cells
                            && src.builtin_kind(*element) == Some(BuiltinKind::Float)
                ),
                _ => false,
            };
            if !well_formed {
                return Err(TypeError::malformed(
                    &name,
                    MalformedReason::MatrixShape(format!(
                        "'{name}' must contain exactly one float[{cells}] member"
                    )),
                ));
            }
        }
        let layout = Layout::primitive(dt, self.abi);
        Ok(self.push_named(name, ExportKind::Matrix(MatrixType { dim }), layout))
    }

    /// Build a named record. `register` is false for ODR candidates.
    ///
    /// On failure every name interned since the record's id was reserved is
    /// dropped again, so nothing cached can refer to the unfinished record.
    fn construct_record(
        &mut self,
        src: &SourceTypes,
        decl: &RecordDecl,
        name: String,
        register: bool,
    ) -> Result<TypeId, TypeError> {
        let start = self.types.len();
        let id = self.push(ExportType::new(
            name.clone(),
            ExportKind::Record(empty_record(decl.packed, false)),
            PENDING_LAYOUT,
        ));
        if register {
            self.by_name.insert(name.clone(), id);
            let origin = self.origin.clone();
            self.odr.register(&name, id, &origin);
        }

        if let Err(err) = self.build_members(src, decl, id) {
            self.rollback(start);
            tracing::debug!(name = %name, candidate = !register, "record failed, rolled back");
            return Err(err);
        }
        tracing::debug!(
            name = %name,
            size = self.get(id).alloc_size(),
            candidate = !register,
            "laid out record"
        );
        Ok(id)
    }

    fn build_members(
        &mut self,
        src: &SourceTypes,
        decl: &RecordDecl,
        id: TypeId,
    ) -> Result<(), TypeError> {
        let mut fields = Vec::with_capacity(decl.fields.len());
        for field in &decl.fields {
            fields.push((field.name.clone(), self.intern_decl(src, field.ty)?));
        }
        self.finish_record(id, fields, decl.packed, false)
    }

    fn is_redefinable(&self, id: TypeId, name: &str) -> bool {
        self.get(id).as_record().is_some()
            && !self.odr.is_confirmed(name, &self.origin)
            && !self.checking.contains(name)
    }

    fn check_redefinition(
        &mut self,
        src: &SourceTypes,
        decl: &RecordDecl,
        name: String,
        first: TypeId,
    ) -> Result<TypeId, TypeError> {
        // Members reaching back to `name` resolve to the first definition.
        self.checking.insert(name.clone());
        let candidate = self.construct_record(src, decl, name.clone(), false);
        self.checking.remove(&name);
        self.odr.check(self, &name, candidate?, &self.origin)?;
        let origin = self.origin.clone();
        self.odr.confirm(&name, &origin);
        tracing::debug!(name = %name, origin = %origin, "redefinition matches");
        Ok(first)
    }

    #[expect(
        clippy::cast_possible_truncation,
        reason = "member counts are bounded by the front end"
    )]
    fn finish_record(
        &mut self,
        id: TypeId,
        fields: Vec<(String, TypeId)>,
        packed: bool,
        artificial: bool,
    ) -> Result<(), TypeError> {
        let layouts: Vec<Layout> = fields.iter().map(|(_, ty)| self.get(*ty).layout()).collect();
        let Some(record_layout) = layout_record(&layouts, packed) else {
            return Err(TypeError::malformed(
                self.name(id),
                MalformedReason::LayoutOverflow,
            ));
        };
        let fields = fields
            .into_iter()
            .zip(record_layout.offsets)
            .enumerate()
            .map(|(index, ((name, ty), offset))| Field {
                name,
                ty,
                parent: id,
                offset,
                index: index as u32,
            })
            .collect();
        let record = RecordType {
            fields,
            packed,
            artificial,
            alloc_size: record_layout.layout.alloc_size,
        };
        self.types[id.index()].set_record(record, record_layout.layout);
        Ok(())
    }

    fn intern_element(
        &mut self,
        src: &SourceTypes,
        ty: SourceTypeId,
        typedef: String,
        info: ElementInfo,
    ) -> Result<TypeId, TypeError> {
        if let Some(id) = self.lookup(&typedef) {
            return Ok(id);
        }
        let dt = info.data_type;
        let matches = match src.kind(src.canonical(ty)) {
            SourceTypeKind::Builtin(kind) if info.vector_size == 1 => DataType::from_builtin(*kind)
                .is_some_and(|b| b.size_in_bits() == dt.size_in_bits()),
            SourceTypeKind::ExtVector { element, count } if *count == info.vector_size => {
                src.builtin_kind(*element).and_then(DataType::from_builtin) == Some(dt)
            }
            _ => false,
        };
        if !matches {
            let expected = if info.vector_size == 1 {
                dt.c_name().map(str::to_string)
            } else {
                vector_name(dt, info.vector_size)
            };
            return Err(TypeError::malformed(
                typedef.clone(),
                MalformedReason::ElementTypedef {
                    typedef,
                    expected: expected.unwrap_or_default(),
                },
            ));
        }

        let element = PrimitiveType {
            data_type: dt,
            kind: info.kind,
            normalized: info.normalized,
        };
        let (kind, layout) = if info.vector_size == 1 {
            (ExportKind::Primitive(element), Layout::primitive(dt, self.abi))
        } else {
            let Some(layout) = Layout::vector(dt, info.vector_size, self.abi) else {
                return Err(TypeError::malformed(typedef, MalformedReason::LayoutOverflow));
            };
            let vector = VectorType {
                element,
                count: info.vector_size,
            };
            (ExportKind::Vector(vector), layout)
        };
        Ok(self.push_named(typedef, kind, layout))
    }

    #[expect(
        clippy::cast_possible_truncation,
        reason = "a run never interns more than u32::MAX types"
    )]
    fn push(&mut self, ty: ExportType) -> TypeId {
        let id = TypeId::from_raw(self.types.len() as u32);
        self.types.push(ty);
        id
    }

    /// Forget every name bound to a type at or past arena index `start`.
    fn rollback(&mut self, start: usize) {
        self.by_name.retain(|_, id| id.index() < start);
        self.odr.forget_from(start);
    }

    fn push_named(&mut self, name: String, kind: ExportKind, layout: Layout) -> TypeId {
        tracing::trace!(name = %name, class = ?kind.class(), "interned export type");
        let id = self.push(ExportType::new(name.clone(), kind, layout));
        self.by_name.insert(name, id);
        id
    }
}

fn empty_record(packed: bool, artificial: bool) -> RecordType {
    RecordType {
        fields: Vec::new(),
        packed,
        artificial,
        alloc_size: 0,
    }
}

fn unsupported(type_name: String, reason: UnsupportedReason) -> TypeError {
    TypeError::Unexportable(Unexportable {
        type_name,
        path: String::new(),
        reason,
    })
}
