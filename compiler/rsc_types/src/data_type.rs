//! Runtime data-type codes, data kinds and the name tables that map front-end
//! spellings onto them.
//!
//! The numeric codes are shared with the runtime and appear in generated
//! metadata, so they are fixed.

use std::fmt;

use crate::source::BuiltinKind;

/// Runtime data type of a primitive export type.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum DataType {
    Float32,
    Float64,
    Signed8,
    Signed16,
    Signed32,
    Signed64,
    Unsigned8,
    Unsigned16,
    Unsigned32,
    Unsigned64,
    Boolean,
    Unsigned565,
    Unsigned5551,
    Unsigned4444,
    RSMatrix2x2,
    RSMatrix3x3,
    RSMatrix4x4,
    RSElement,
    RSType,
    RSAllocation,
    RSSampler,
    RSScript,
    RSMesh,
    RSProgramFragment,
    RSProgramVertex,
    RSProgramRaster,
    RSProgramStore,
    RSFont,
}

/// Object handle names and their data types.
const OBJECT_TYPES: [(&str, DataType); 11] = [
    ("rs_element", DataType::RSElement),
    ("rs_type", DataType::RSType),
    ("rs_allocation", DataType::RSAllocation),
    ("rs_sampler", DataType::RSSampler),
    ("rs_script", DataType::RSScript),
    ("rs_mesh", DataType::RSMesh),
    ("rs_program_fragment", DataType::RSProgramFragment),
    ("rs_program_vertex", DataType::RSProgramVertex),
    ("rs_program_raster", DataType::RSProgramRaster),
    ("rs_program_store", DataType::RSProgramStore),
    ("rs_font", DataType::RSFont),
];

/// Matrix struct names and their data types.
const MATRIX_TYPES: [(&str, DataType); 3] = [
    ("rs_matrix2x2", DataType::RSMatrix2x2),
    ("rs_matrix3x3", DataType::RSMatrix3x3),
    ("rs_matrix4x4", DataType::RSMatrix4x4),
];

impl DataType {
    /// Numeric code shared with the runtime.
    pub const fn code(self) -> u32 {
        match self {
            DataType::Float32 => 2,
            DataType::Float64 => 3,
            DataType::Signed8 => 4,
            DataType::Signed16 => 5,
            DataType::Signed32 => 6,
            DataType::Signed64 => 7,
            DataType::Unsigned8 => 8,
            DataType::Unsigned16 => 9,
            DataType::Unsigned32 => 10,
            DataType::Unsigned64 => 11,
            DataType::Unsigned565 => 12,
            DataType::Unsigned5551 => 13,
            DataType::Unsigned4444 => 14,
            DataType::Boolean => 15,
            DataType::RSElement => 16,
            DataType::RSType => 17,
            DataType::RSAllocation => 18,
            DataType::RSSampler => 19,
            DataType::RSScript => 20,
            DataType::RSMesh => 21,
            DataType::RSProgramFragment => 22,
            DataType::RSProgramVertex => 23,
            DataType::RSProgramRaster => 24,
            DataType::RSProgramStore => 25,
            DataType::RSFont => 26,
            DataType::RSMatrix2x2 => 27,
            DataType::RSMatrix3x3 => 28,
            DataType::RSMatrix4x4 => 29,
        }
    }

    /// Width in bits. Objects are 32-bit handles; matrices count all cells.
    pub const fn size_in_bits(self) -> u32 {
        match self {
            DataType::Boolean => 1,
            DataType::Signed8 | DataType::Unsigned8 => 8,
            DataType::Signed16
            | DataType::Unsigned16
            | DataType::Unsigned565
            | DataType::Unsigned5551
            | DataType::Unsigned4444 => 16,
            DataType::Float64 | DataType::Signed64 | DataType::Unsigned64 => 64,
            DataType::RSMatrix2x2 => 4 * 32,
            DataType::RSMatrix3x3 => 9 * 32,
            DataType::RSMatrix4x4 => 16 * 32,
            _ => 32,
        }
    }

    /// Data type of a supported builtin scalar.
    ///
    /// `void`, `half`, `long double`, `__int128` and `wchar_t` are not
    /// exportable and yield `None`.
    pub const fn from_builtin(kind: BuiltinKind) -> Option<DataType> {
        match kind {
            BuiltinKind::Bool => Some(DataType::Boolean),
            BuiltinKind::Char => Some(DataType::Signed8),
            BuiltinKind::UChar => Some(DataType::Unsigned8),
            BuiltinKind::Short => Some(DataType::Signed16),
            BuiltinKind::UShort => Some(DataType::Unsigned16),
            BuiltinKind::Int => Some(DataType::Signed32),
            BuiltinKind::UInt => Some(DataType::Unsigned32),
            BuiltinKind::Long => Some(DataType::Signed64),
            BuiltinKind::ULong => Some(DataType::Unsigned64),
            BuiltinKind::Float => Some(DataType::Float32),
            BuiltinKind::Double => Some(DataType::Float64),
            BuiltinKind::Void
            | BuiltinKind::Half
            | BuiltinKind::LongDouble
            | BuiltinKind::Int128
            | BuiltinKind::WChar => None,
        }
    }

    /// Object handle type for a record name like `rs_allocation`.
    pub fn from_object_name(name: &str) -> Option<DataType> {
        OBJECT_TYPES
            .iter()
            .find(|(n, _)| *n == name)
            .map(|&(_, dt)| dt)
    }

    /// Matrix type for a record name like `rs_matrix4x4`.
    pub fn from_matrix_name(name: &str) -> Option<DataType> {
        MATRIX_TYPES
            .iter()
            .find(|(n, _)| *n == name)
            .map(|&(_, dt)| dt)
    }

    /// Matrix data type with `dim` rows and columns.
    pub const fn matrix(dim: u32) -> Option<DataType> {
        match dim {
            2 => Some(DataType::RSMatrix2x2),
            3 => Some(DataType::RSMatrix3x3),
            4 => Some(DataType::RSMatrix4x4),
            _ => None,
        }
    }

    /// Row count of a matrix data type.
    pub const fn matrix_dim(self) -> Option<u32> {
        match self {
            DataType::RSMatrix2x2 => Some(2),
            DataType::RSMatrix3x3 => Some(3),
            DataType::RSMatrix4x4 => Some(4),
            _ => None,
        }
    }

    pub const fn is_object(self) -> bool {
        let code = self.code();
        code >= DataType::RSElement.code() && code <= DataType::RSFont.code()
    }

    pub const fn is_matrix(self) -> bool {
        self.matrix_dim().is_some()
    }

    /// 16-bit packed pixel formats.
    pub const fn is_packed(self) -> bool {
        matches!(
            self,
            DataType::Unsigned565 | DataType::Unsigned5551 | DataType::Unsigned4444
        )
    }

    pub const fn is_unsigned(self) -> bool {
        matches!(
            self,
            DataType::Unsigned8 | DataType::Unsigned16 | DataType::Unsigned32 | DataType::Unsigned64
        )
    }

    /// Scalar C spelling used in normalized type names.
    ///
    /// `None` for objects and matrices, which are named after their struct.
    pub const fn c_name(self) -> Option<&'static str> {
        match self {
            DataType::Float32 => Some("float"),
            DataType::Float64 => Some("double"),
            DataType::Signed8 => Some("char"),
            DataType::Signed16 => Some("short"),
            DataType::Signed32 => Some("int"),
            DataType::Signed64 => Some("long"),
            DataType::Unsigned8 => Some("uchar"),
            DataType::Unsigned16
            | DataType::Unsigned565
            | DataType::Unsigned5551
            | DataType::Unsigned4444 => Some("ushort"),
            DataType::Unsigned32 => Some("uint"),
            DataType::Unsigned64 => Some("ulong"),
            DataType::Boolean => Some("bool"),
            _ => None,
        }
    }

    /// Struct name of an object or matrix data type.
    pub fn struct_name(self) -> Option<&'static str> {
        OBJECT_TYPES
            .iter()
            .chain(MATRIX_TYPES.iter())
            .find(|&&(_, dt)| dt == self)
            .map(|&(n, _)| n)
    }

    /// Name of the runtime `Element.DataType` constant.
    pub const fn element_name(self) -> &'static str {
        match self {
            DataType::Float32 => "FLOAT_32",
            DataType::Float64 => "FLOAT_64",
            DataType::Signed8 => "SIGNED_8",
            DataType::Signed16 => "SIGNED_16",
            DataType::Signed32 => "SIGNED_32",
            DataType::Signed64 => "SIGNED_64",
            DataType::Unsigned8 => "UNSIGNED_8",
            DataType::Unsigned16 => "UNSIGNED_16",
            DataType::Unsigned32 => "UNSIGNED_32",
            DataType::Unsigned64 => "UNSIGNED_64",
            DataType::Boolean => "BOOLEAN",
            DataType::Unsigned565 => "UNSIGNED_5_6_5",
            DataType::Unsigned5551 => "UNSIGNED_5_5_5_1",
            DataType::Unsigned4444 => "UNSIGNED_4_4_4_4",
            DataType::RSMatrix2x2 => "MATRIX_2X2",
            DataType::RSMatrix3x3 => "MATRIX_3X3",
            DataType::RSMatrix4x4 => "MATRIX_4X4",
            DataType::RSElement => "RS_ELEMENT",
            DataType::RSType => "RS_TYPE",
            DataType::RSAllocation => "RS_ALLOCATION",
            DataType::RSSampler => "RS_SAMPLER",
            DataType::RSScript => "RS_SCRIPT",
            DataType::RSMesh => "RS_MESH",
            DataType::RSProgramFragment => "RS_PROGRAM_FRAGMENT",
            DataType::RSProgramVertex => "RS_PROGRAM_VERTEX",
            DataType::RSProgramRaster => "RS_PROGRAM_RASTER",
            DataType::RSProgramStore => "RS_PROGRAM_STORE",
            DataType::RSFont => "RS_FONT",
        }
    }
}

impl fmt::Display for DataType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.element_name())
    }
}

/// Semantic interpretation of element data.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug, Default)]
pub enum DataKind {
    #[default]
    User,
    PixelL,
    PixelA,
    PixelLA,
    PixelRGB,
    PixelRGBA,
}

impl DataKind {
    /// Numeric code shared with the runtime.
    pub const fn code(self) -> u32 {
        match self {
            DataKind::User => 0,
            DataKind::PixelL => 7,
            DataKind::PixelA => 8,
            DataKind::PixelLA => 9,
            DataKind::PixelRGB => 10,
            DataKind::PixelRGBA => 11,
        }
    }

    /// Name of the runtime `Element.DataKind` constant.
    pub const fn element_name(self) -> &'static str {
        match self {
            DataKind::User => "USER",
            DataKind::PixelL => "PIXEL_L",
            DataKind::PixelA => "PIXEL_A",
            DataKind::PixelLA => "PIXEL_LA",
            DataKind::PixelRGB => "PIXEL_RGB",
            DataKind::PixelRGBA => "PIXEL_RGBA",
        }
    }
}

/// Element semantics attached to a well-known typedef.
#[derive(Copy, Clone, Eq, PartialEq, Debug)]
pub struct ElementInfo {
    pub kind: DataKind,
    pub data_type: DataType,
    pub normalized: bool,
    /// Component count; 1 for scalar elements.
    pub vector_size: u32,
}

/// Element typedef table.
const ELEMENT_TYPEDEFS: [(&str, ElementInfo); 8] = [
    ("rs_pixel_l", ElementInfo::pixel(DataKind::PixelL, DataType::Unsigned8, 1)),
    ("rs_pixel_a", ElementInfo::pixel(DataKind::PixelA, DataType::Unsigned8, 1)),
    ("rs_pixel_la", ElementInfo::pixel(DataKind::PixelLA, DataType::Unsigned8, 2)),
    ("rs_pixel_rgb", ElementInfo::pixel(DataKind::PixelRGB, DataType::Unsigned8, 3)),
    ("rs_pixel_rgba", ElementInfo::pixel(DataKind::PixelRGBA, DataType::Unsigned8, 4)),
    ("rs_pixel_rgb565", ElementInfo::pixel(DataKind::PixelRGB, DataType::Unsigned565, 1)),
    ("rs_pixel_rgba5551", ElementInfo::pixel(DataKind::PixelRGBA, DataType::Unsigned5551, 1)),
    ("rs_pixel_rgba4444", ElementInfo::pixel(DataKind::PixelRGBA, DataType::Unsigned4444, 1)),
];

impl ElementInfo {
    const fn pixel(kind: DataKind, data_type: DataType, vector_size: u32) -> Self {
        ElementInfo {
            kind,
            data_type,
            normalized: true,
            vector_size,
        }
    }

    /// Element semantics of a typedef name, if it is one of the pixel typedefs.
    pub fn for_typedef(name: &str) -> Option<ElementInfo> {
        ELEMENT_TYPEDEFS
            .iter()
            .find(|(n, _)| *n == name)
            .map(|&(_, info)| info)
    }
}

/// Normalized name of a vector of `count` elements of `data_type`.
///
/// Booleans are stored as chars, so `bool` vectors use the char names.
pub fn vector_name(data_type: DataType, count: u32) -> Option<String> {
    let base = match data_type {
        DataType::Boolean => "char",
        other => other.c_name()?,
    };
    Some(format!("{base}{count}"))
}
