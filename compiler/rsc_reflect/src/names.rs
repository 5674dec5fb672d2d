//! Host-side names of export types.
//!
//! Maps export types onto Java type names, `FieldPacker` methods and
//! `Element` constructors. The tables follow the runtime's Java API.

use rsc_types::{DataKind, DataType, ExportKind, TypeId, TypePool};

/// Prefix of the class generated for a script.
pub const SCRIPT_CLASS_PREFIX: &str = "ScriptC_";
/// Prefix of the class generated for a record type.
pub const TYPE_CLASS_PREFIX: &str = "ScriptField_";
/// Nested class holding one record value.
pub const ITEM_CLASS: &str = "Item";

/// Java type of a scalar, packed pixel, object handle or matrix.
///
/// Unsigned types widen to the next signed Java type.
pub const fn primitive_java_name(dt: DataType) -> &'static str {
    match dt {
        DataType::Float32 => "float",
        DataType::Float64 => "double",
        DataType::Signed8 => "byte",
        DataType::Signed16 | DataType::Unsigned8 => "short",
        DataType::Signed32
        | DataType::Unsigned16
        | DataType::Unsigned565
        | DataType::Unsigned5551
        | DataType::Unsigned4444 => "int",
        DataType::Signed64 | DataType::Unsigned32 | DataType::Unsigned64 => "long",
        DataType::Boolean => "boolean",
        DataType::RSElement => "Element",
        DataType::RSType => "Type",
        DataType::RSAllocation => "Allocation",
        DataType::RSSampler => "Sampler",
        DataType::RSScript => "Script",
        DataType::RSMesh => "Mesh",
        DataType::RSProgramFragment => "ProgramFragment",
        DataType::RSProgramVertex => "ProgramVertex",
        DataType::RSProgramRaster => "ProgramRaster",
        DataType::RSProgramStore => "ProgramStore",
        DataType::RSFont => "Font",
        DataType::RSMatrix2x2 => "Matrix2f",
        DataType::RSMatrix3x3 => "Matrix3f",
        DataType::RSMatrix4x4 => "Matrix4f",
    }
}

/// Java vector class, e.g. `Float4` or `Short2` for `uchar2`.
pub fn vector_java_name(element: DataType, count: u32) -> String {
    let base = match element {
        DataType::Float32 => "Float",
        DataType::Float64 => "Double",
        DataType::Signed16 | DataType::Unsigned8 => "Short",
        DataType::Signed32 | DataType::Unsigned16 => "Int",
        DataType::Signed64 | DataType::Unsigned32 | DataType::Unsigned64 => "Long",
        _ => "Byte",
    };
    format!("{base}{count}")
}

/// Java type of any export type.
pub fn java_type_name(pool: &TypePool, ty: TypeId) -> String {
    let export = pool.get(ty);
    match export.kind() {
        ExportKind::Primitive(p) => primitive_java_name(p.data_type).to_owned(),
        ExportKind::Pointer(p) => {
            let pointee = pool.get(p.pointee);
            if pointee.as_record().is_some() {
                format!("{TYPE_CLASS_PREFIX}{}", pointee.name())
            } else {
                "Allocation".to_owned()
            }
        }
        ExportKind::Vector(v) => vector_java_name(v.element.data_type, v.count),
        ExportKind::Matrix(m) => primitive_java_name(m.data_type()).to_owned(),
        ExportKind::ConstantArray(a) => format!("{}[]", java_type_name(pool, a.element)),
        ExportKind::Record(_) => format!("{TYPE_CLASS_PREFIX}{}.{ITEM_CLASS}", export.name()),
    }
}

/// Zero value returned by getters before anything was stored.
pub fn java_default_value(pool: &TypePool, ty: TypeId) -> &'static str {
    match pool.get(ty).kind() {
        ExportKind::Primitive(p) if p.data_type == DataType::Boolean => "false",
        ExportKind::Primitive(p) if !p.is_object() => "0",
        _ => "null",
    }
}

/// `FieldPacker` method used to serialize one value.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum PackerApi {
    F32,
    F64,
    I8,
    I16,
    I32,
    I64,
    U8,
    U16,
    U32,
    U64,
    Boolean,
    Obj,
    Matrix,
}

impl PackerApi {
    /// Method for a data type. Packed pixels go through `addU16`.
    pub const fn for_data_type(dt: DataType) -> Self {
        match dt {
            DataType::Float32 => PackerApi::F32,
            DataType::Float64 => PackerApi::F64,
            DataType::Signed8 => PackerApi::I8,
            DataType::Signed16 => PackerApi::I16,
            DataType::Signed32 => PackerApi::I32,
            DataType::Signed64 => PackerApi::I64,
            DataType::Unsigned8 => PackerApi::U8,
            DataType::Unsigned16
            | DataType::Unsigned565
            | DataType::Unsigned5551
            | DataType::Unsigned4444 => PackerApi::U16,
            DataType::Unsigned32 => PackerApi::U32,
            DataType::Unsigned64 => PackerApi::U64,
            DataType::Boolean => PackerApi::Boolean,
            DataType::RSMatrix2x2 | DataType::RSMatrix3x3 | DataType::RSMatrix4x4 => {
                PackerApi::Matrix
            }
            _ => PackerApi::Obj,
        }
    }

    pub const fn method(self) -> &'static str {
        match self {
            PackerApi::F32 => "addF32",
            PackerApi::F64 => "addF64",
            PackerApi::I8 => "addI8",
            PackerApi::I16 => "addI16",
            PackerApi::I32 => "addI32",
            PackerApi::I64 => "addI64",
            PackerApi::U8 => "addU8",
            PackerApi::U16 => "addU16",
            PackerApi::U32 => "addU32",
            PackerApi::U64 => "addU64",
            PackerApi::Boolean => "addBoolean",
            PackerApi::Obj => "addObj",
            PackerApi::Matrix => "addMatrix",
        }
    }

    /// Bytes written per lane. Matrix lanes are single floats.
    pub const fn lane_size(self) -> u32 {
        match self {
            PackerApi::I8 | PackerApi::U8 | PackerApi::Boolean => 1,
            PackerApi::I16 | PackerApi::U16 => 2,
            PackerApi::F32 | PackerApi::I32 | PackerApi::U32 | PackerApi::Obj | PackerApi::Matrix => 4,
            PackerApi::F64 | PackerApi::I64 | PackerApi::U64 => 8,
        }
    }
}

/// `Element` factory suffix of a user-kind data type, e.g. `F32` or `U8`.
pub const fn element_constant(dt: DataType) -> &'static str {
    match dt {
        DataType::Float32 => "F32",
        DataType::Float64 => "F64",
        DataType::Signed8 => "I8",
        DataType::Signed16 => "I16",
        DataType::Signed32 => "I32",
        DataType::Signed64 => "I64",
        DataType::Unsigned8 => "U8",
        DataType::Unsigned16
        | DataType::Unsigned565
        | DataType::Unsigned5551
        | DataType::Unsigned4444 => "U16",
        DataType::Unsigned32 => "U32",
        DataType::Unsigned64 => "U64",
        DataType::Boolean => "BOOLEAN",
        DataType::RSElement => "ELEMENT",
        DataType::RSType => "TYPE",
        DataType::RSAllocation => "ALLOCATION",
        DataType::RSSampler => "SAMPLER",
        DataType::RSScript => "SCRIPT",
        DataType::RSMesh => "MESH",
        DataType::RSProgramFragment => "PROGRAM_FRAGMENT",
        DataType::RSProgramVertex => "PROGRAM_VERTEX",
        DataType::RSProgramRaster => "PROGRAM_RASTER",
        DataType::RSProgramStore => "PROGRAM_STORE",
        DataType::RSFont => "FONT",
        DataType::RSMatrix2x2 => "MATRIX_2X2",
        DataType::RSMatrix3x3 => "MATRIX_3X3",
        DataType::RSMatrix4x4 => "MATRIX_4X4",
    }
}

/// Java expression creating the runtime element of `ty`, given the
/// `RenderScript` variable `rs`.
///
/// Arrays yield their element's element; the array size goes to the
/// builder separately.
pub fn element_expr(pool: &TypePool, ty: TypeId, rs: &str) -> String {
    let export = pool.get(ty);
    match export.kind() {
        ExportKind::Primitive(p) if p.kind != DataKind::User => pixel_expr(p.data_type, p.kind, rs),
        ExportKind::Primitive(p) => format!("Element.{}({rs})", element_constant(p.data_type)),
        ExportKind::Vector(v) if v.element.kind != DataKind::User => {
            pixel_expr(v.element.data_type, v.element.kind, rs)
        }
        ExportKind::Vector(v) => format!(
            "Element.{}_{}({rs})",
            element_constant(v.element.data_type),
            v.count
        ),
        ExportKind::Matrix(m) => format!("Element.{}({rs})", element_constant(m.data_type())),
        ExportKind::Pointer(_) => format!("Element.ALLOCATION({rs})"),
        ExportKind::ConstantArray(a) => element_expr(pool, a.element, rs),
        ExportKind::Record(_) => format!("{TYPE_CLASS_PREFIX}{}.createElement({rs})", export.name()),
    }
}

fn pixel_expr(dt: DataType, kind: DataKind, rs: &str) -> String {
    format!(
        "Element.createPixel({rs}, Element.DataType.{}, Element.DataKind.{})",
        dt.element_name(),
        kind.element_name()
    )
}

/// Short element name used for kernel type checks, e.g. `U8_4`.
pub fn element_check_name(pool: &TypePool, ty: TypeId) -> String {
    let export = pool.get(ty);
    match export.kind() {
        ExportKind::Primitive(p) if p.kind != DataKind::User => {
            format!("{}_{}", p.kind.element_name(), element_constant(p.data_type))
        }
        ExportKind::Primitive(p) => element_constant(p.data_type).to_owned(),
        ExportKind::Vector(v) if v.element.kind != DataKind::User => format!(
            "{}_{}",
            v.element.kind.element_name(),
            element_constant(v.element.data_type)
        ),
        ExportKind::Vector(v) => format!("{}_{}", element_constant(v.element.data_type), v.count),
        ExportKind::Matrix(m) => element_constant(m.data_type()).to_owned(),
        ExportKind::Pointer(_) => "ALLOCATION".to_owned(),
        ExportKind::ConstantArray(a) => element_check_name(pool, a.element),
        ExportKind::Record(_) => export.name().to_owned(),
    }
}

const JAVA_KEYWORDS: &[&str] = &[
    "abstract", "assert", "boolean", "break", "byte", "case", "catch", "char", "class", "const",
    "continue", "default", "do", "double", "else", "enum", "extends", "false", "final", "finally",
    "float", "for", "goto", "if", "implements", "import", "instanceof", "int", "interface", "long",
    "native", "new", "null", "package", "private", "protected", "public", "return", "short",
    "static", "strictfp", "super", "switch", "synchronized", "this", "throw", "throws",
    "transient", "true", "try", "void", "volatile", "while",
];

/// True if `name` can name a Java class, method or variable.
pub fn is_java_identifier(name: &str) -> bool {
    let mut chars = name.chars();
    let Some(first) = chars.next() else {
        return false;
    };
    (first.is_ascii_alphabetic() || first == '_' || first == '$')
        && chars.all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '$')
        && !JAVA_KEYWORDS.contains(&name)
}

/// True for a dot-separated sequence of identifiers.
pub fn is_package_name(name: &str) -> bool {
    !name.is_empty() && name.split('.').all(is_java_identifier)
}
