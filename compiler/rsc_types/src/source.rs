//! Front-end type capability model.
//!
//! The parser and semantic analyzer are external collaborators. They hand
//! the export passes a [`SourceTypes`] table describing every type they
//! resolved, and refer to individual types by [`SourceTypeId`].
//!
//! # Design
//!
//! - Non-record types are hash-consed: building `int*` twice yields the
//!   same id, so canonical types compare by id like in a real front end.
//! - Records are nominal. Each declaration gets its own id, and a record can
//!   be declared before it is defined so fields may point back at it.
//! - Typedefs and `const` are sugar nodes. [`SourceTypes::canonical`]
//!   strips them; [`SourceTypes::typedef_names`] walks them.

use std::fmt;

use rustc_hash::FxHashMap;

/// Handle to a type in a [`SourceTypes`] table.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug, PartialOrd, Ord)]
#[repr(transparent)]
pub struct SourceTypeId(u32);

impl SourceTypeId {
    /// Get the raw index.
    #[inline]
    pub const fn raw(self) -> u32 {
        self.0
    }

    #[inline]
    fn index(self) -> usize {
        self.0 as usize
    }
}

/// Builtin scalar kinds a C-family front end can produce.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum BuiltinKind {
    Void,
    Bool,
    Char,
    UChar,
    Short,
    UShort,
    Int,
    UInt,
    Long,
    ULong,
    Float,
    Double,
    Half,
    LongDouble,
    Int128,
    WChar,
}

impl BuiltinKind {
    /// C spelling of the builtin.
    pub fn spelling(self) -> &'static str {
        match self {
            BuiltinKind::Void => "void",
            BuiltinKind::Bool => "bool",
            BuiltinKind::Char => "char",
            BuiltinKind::UChar => "unsigned char",
            BuiltinKind::Short => "short",
            BuiltinKind::UShort => "unsigned short",
            BuiltinKind::Int => "int",
            BuiltinKind::UInt => "unsigned int",
            BuiltinKind::Long => "long",
            BuiltinKind::ULong => "unsigned long",
            BuiltinKind::Float => "float",
            BuiltinKind::Double => "double",
            BuiltinKind::Half => "half",
            BuiltinKind::LongDouble => "long double",
            BuiltinKind::Int128 => "__int128",
            BuiltinKind::WChar => "wchar_t",
        }
    }
}

/// One member of a record declaration.
#[derive(Clone, Eq, PartialEq, Hash, Debug)]
pub struct SourceField {
    pub name: String,
    pub ty: SourceTypeId,
    /// Declared bit width, `Some` only for bit-fields.
    pub bit_width: Option<u32>,
}

impl SourceField {
    /// A plain (non bit-field) member.
    pub fn new(name: impl Into<String>, ty: SourceTypeId) -> Self {
        SourceField {
            name: name.into(),
            ty,
            bit_width: None,
        }
    }

    /// A bit-field member.
    pub fn bit_field(name: impl Into<String>, ty: SourceTypeId, width: u32) -> Self {
        SourceField {
            name: name.into(),
            ty,
            bit_width: Some(width),
        }
    }
}

/// A struct or union declaration.
///
/// `name` is the tag name, or the typedef name the front end attached to an
/// anonymous record. `defined` is false for forward declarations.
#[derive(Clone, Eq, PartialEq, Hash, Debug)]
pub struct RecordDecl {
    pub name: Option<String>,
    pub fields: Vec<SourceField>,
    pub packed: bool,
    pub is_union: bool,
    pub defined: bool,
}

/// Type-class tag plus the children a front end exposes for it.
#[derive(Clone, Eq, PartialEq, Hash, Debug)]
pub enum SourceTypeKind {
    Builtin(BuiltinKind),
    Pointer(SourceTypeId),
    ConstantArray { element: SourceTypeId, size: u64 },
    /// Array without a bound (flexible array member).
    IncompleteArray(SourceTypeId),
    ExtVector { element: SourceTypeId, count: u32 },
    Record(RecordDecl),
    Enum(String),
    Function,
    Typedef { name: String, underlying: SourceTypeId },
    Const(SourceTypeId),
}

impl SourceTypeKind {
    /// Short class name used in diagnostics.
    pub fn class_name(&self) -> &'static str {
        match self {
            SourceTypeKind::Builtin(_) => "builtin",
            SourceTypeKind::Pointer(_) => "pointer",
            SourceTypeKind::ConstantArray { .. } => "constant array",
            SourceTypeKind::IncompleteArray(_) => "incomplete array",
            SourceTypeKind::ExtVector { .. } => "vector",
            SourceTypeKind::Record(_) => "record",
            SourceTypeKind::Enum(_) => "enum",
            SourceTypeKind::Function => "function",
            SourceTypeKind::Typedef { .. } => "typedef",
            SourceTypeKind::Const(_) => "const",
        }
    }
}

/// Table of every type the front end resolved for one source file.
#[derive(Clone, Debug, Default)]
pub struct SourceTypes {
    kinds: Vec<SourceTypeKind>,
    dedup: FxHashMap<SourceTypeKind, SourceTypeId>,
}

impl SourceTypes {
    /// Create an empty table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of types in the table.
    pub fn len(&self) -> usize {
        self.kinds.len()
    }

    /// True if no type was added yet.
    pub fn is_empty(&self) -> bool {
        self.kinds.is_empty()
    }

    #[expect(
        clippy::cast_possible_truncation,
        reason = "a front end never produces more than u32::MAX types"
    )]
    fn push(&mut self, kind: SourceTypeKind) -> SourceTypeId {
        if let Some(&id) = self.dedup.get(&kind) {
            return id;
        }
        let id = SourceTypeId(self.kinds.len() as u32);
        self.dedup.insert(kind.clone(), id);
        self.kinds.push(kind);
        id
    }

    #[expect(
        clippy::cast_possible_truncation,
        reason = "a front end never produces more than u32::MAX types"
    )]
    fn push_nominal(&mut self, kind: SourceTypeKind) -> SourceTypeId {
        let id = SourceTypeId(self.kinds.len() as u32);
        self.kinds.push(kind);
        id
    }

    // ── Construction ────────────────────────────────────────────

    pub fn builtin(&mut self, kind: BuiltinKind) -> SourceTypeId {
        self.push(SourceTypeKind::Builtin(kind))
    }

    pub fn pointer(&mut self, pointee: SourceTypeId) -> SourceTypeId {
        self.push(SourceTypeKind::Pointer(pointee))
    }

    /// `const`-qualified view of `inner`.
    pub fn constant(&mut self, inner: SourceTypeId) -> SourceTypeId {
        self.push(SourceTypeKind::Const(inner))
    }

    pub fn constant_array(&mut self, element: SourceTypeId, size: u64) -> SourceTypeId {
        self.push(SourceTypeKind::ConstantArray { element, size })
    }

    pub fn incomplete_array(&mut self, element: SourceTypeId) -> SourceTypeId {
        self.push(SourceTypeKind::IncompleteArray(element))
    }

    pub fn ext_vector(&mut self, element: SourceTypeId, count: u32) -> SourceTypeId {
        self.push(SourceTypeKind::ExtVector { element, count })
    }

    pub fn typedef(&mut self, name: impl Into<String>, underlying: SourceTypeId) -> SourceTypeId {
        self.push(SourceTypeKind::Typedef {
            name: name.into(),
            underlying,
        })
    }

    pub fn enumeration(&mut self, name: impl Into<String>) -> SourceTypeId {
        self.push(SourceTypeKind::Enum(name.into()))
    }

    pub fn function(&mut self) -> SourceTypeId {
        self.push(SourceTypeKind::Function)
    }

    /// Forward-declare a struct. Define it later with [`Self::define_record`].
    pub fn declare_record(&mut self, name: impl Into<String>) -> SourceTypeId {
        self.push_nominal(SourceTypeKind::Record(RecordDecl {
            name: Some(name.into()),
            fields: Vec::new(),
            packed: false,
            is_union: false,
            defined: false,
        }))
    }

    /// Attach members to a forward-declared record.
    ///
    /// Does nothing if `id` is not a record.
    pub fn define_record(&mut self, id: SourceTypeId, fields: Vec<SourceField>, packed: bool) {
        if let Some(SourceTypeKind::Record(decl)) = self.kinds.get_mut(id.index()) {
            decl.fields = fields;
            decl.packed = packed;
            decl.defined = true;
        }
    }

    /// Declare and define a struct in one step.
    pub fn record(&mut self, name: impl Into<String>, fields: Vec<SourceField>) -> SourceTypeId {
        let id = self.declare_record(name);
        self.define_record(id, fields, false);
        id
    }

    /// Declare and define a `__attribute__((packed))` struct.
    pub fn packed_record(
        &mut self,
        name: impl Into<String>,
        fields: Vec<SourceField>,
    ) -> SourceTypeId {
        let id = self.declare_record(name);
        self.define_record(id, fields, true);
        id
    }

    /// Add an arbitrary record declaration (unions, unnamed records).
    pub fn record_decl(&mut self, decl: RecordDecl) -> SourceTypeId {
        self.push_nominal(SourceTypeKind::Record(decl))
    }

    // ── Queries ─────────────────────────────────────────────────

    /// The type-class tag and children of `id`.
    pub fn kind(&self, id: SourceTypeId) -> &SourceTypeKind {
        &self.kinds[id.index()]
    }

    /// Strip typedef and `const` sugar.
    pub fn canonical(&self, mut id: SourceTypeId) -> SourceTypeId {
        loop {
            match self.kind(id) {
                SourceTypeKind::Typedef { underlying, .. } => id = *underlying,
                SourceTypeKind::Const(inner) => id = *inner,
                _ => return id,
            }
        }
    }

    /// True if `id` is `const` at the top level (through typedefs).
    pub fn is_const(&self, mut id: SourceTypeId) -> bool {
        loop {
            match self.kind(id) {
                SourceTypeKind::Typedef { underlying, .. } => id = *underlying,
                SourceTypeKind::Const(_) => return true,
                _ => return false,
            }
        }
    }

    /// Pointee of a (canonical) pointer type.
    pub fn pointee(&self, id: SourceTypeId) -> Option<SourceTypeId> {
        match self.kind(self.canonical(id)) {
            SourceTypeKind::Pointer(pointee) => Some(*pointee),
            _ => None,
        }
    }

    /// True if the canonical type is a pointer.
    pub fn is_pointer(&self, id: SourceTypeId) -> bool {
        self.pointee(id).is_some()
    }

    /// Builtin kind of the canonical type.
    pub fn builtin_kind(&self, id: SourceTypeId) -> Option<BuiltinKind> {
        match self.kind(self.canonical(id)) {
            SourceTypeKind::Builtin(kind) => Some(*kind),
            _ => None,
        }
    }

    /// Record declaration of the canonical type.
    pub fn record_decl_of(&self, id: SourceTypeId) -> Option<&RecordDecl> {
        match self.kind(self.canonical(id)) {
            SourceTypeKind::Record(decl) => Some(decl),
            _ => None,
        }
    }

    /// Typedef names crossed while walking sugar from `id`, outermost first.
    pub fn typedef_names(&self, mut id: SourceTypeId) -> Vec<&str> {
        let mut names = Vec::new();
        loop {
            match self.kind(id) {
                SourceTypeKind::Typedef { name, underlying } => {
                    names.push(name.as_str());
                    id = *underlying;
                }
                SourceTypeKind::Const(inner) => id = *inner,
                _ => return names,
            }
        }
    }

    /// C-like spelling of `id` for diagnostics.
    pub fn spelling(&self, id: SourceTypeId) -> String {
        match self.kind(id) {
            SourceTypeKind::Builtin(kind) => kind.spelling().to_string(),
            SourceTypeKind::Pointer(pointee) => format!("{} *", self.spelling(*pointee)),
            SourceTypeKind::ConstantArray { element, size } => {
                format!("{}[{size}]", self.spelling(*element))
            }
            SourceTypeKind::IncompleteArray(element) => format!("{}[]", self.spelling(*element)),
            SourceTypeKind::ExtVector { element, count } => format!(
                "{} __attribute__((ext_vector_type({count})))",
                self.spelling(*element)
            ),
            SourceTypeKind::Record(decl) => {
                let tag = if decl.is_union { "union" } else { "struct" };
                match &decl.name {
                    Some(name) => format!("{tag} {name}"),
                    None => format!("{tag} <anonymous>"),
                }
            }
            SourceTypeKind::Enum(name) => format!("enum {name}"),
            SourceTypeKind::Function => "function".to_string(),
            SourceTypeKind::Typedef { name, .. } => name.clone(),
            SourceTypeKind::Const(inner) => format!("const {}", self.spelling(*inner)),
        }
    }

    /// Display adapter over [`Self::spelling`].
    pub fn display(&self, id: SourceTypeId) -> SpellingDisplay<'_> {
        SpellingDisplay { types: self, id }
    }
}

/// Lazily formats a source type's spelling.
pub struct SpellingDisplay<'a> {
    types: &'a SourceTypes,
    id: SourceTypeId,
}

impl fmt::Display for SpellingDisplay<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.types.spelling(self.id))
    }
}

#[cfg(test)]
#[expect(clippy::unwrap_used, reason = "Tests use unwrap for brevity")]
mod tests;
