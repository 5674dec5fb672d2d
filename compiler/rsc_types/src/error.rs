//! Type export errors.

use std::fmt;

use rsc_diagnostic::{Diagnostic, ErrorCode};

use crate::odr::OdrViolation;
use crate::source::BuiltinKind;

/// Why a source type cannot cross the export boundary.
#[derive(Clone, Eq, PartialEq, Debug)]
pub enum UnsupportedReason {
    Builtin(BuiltinKind),
    /// Enums, functions and other classes with no export form.
    Class(&'static str),
    Bitfield,
    FlexibleArray,
    ArrayOfArrays,
    VectorSize(u32),
    VectorElement,
    Union,
    Unnamed,
    Incomplete,
    ObjectMember,
}

impl fmt::Display for UnsupportedReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            UnsupportedReason::Builtin(kind) => {
                write!(f, "builtin type '{}' is not supported", kind.spelling())
            }
            UnsupportedReason::Class(class) => write!(f, "{class} types are not supported"),
            UnsupportedReason::Bitfield => f.write_str("bit-fields are not supported"),
            UnsupportedReason::FlexibleArray => {
                f.write_str("flexible array members are not supported")
            }
            UnsupportedReason::ArrayOfArrays => {
                f.write_str("multi-dimensional arrays are not supported")
            }
            UnsupportedReason::VectorSize(n) => {
                write!(f, "vectors must have 2, 3 or 4 elements (found {n})")
            }
            UnsupportedReason::VectorElement => {
                f.write_str("vector elements must be supported scalars")
            }
            UnsupportedReason::Union => f.write_str("unions are not supported"),
            UnsupportedReason::Unnamed => f.write_str("anonymous records are not supported"),
            UnsupportedReason::Incomplete => f.write_str("the record is never defined"),
            UnsupportedReason::ObjectMember => {
                f.write_str("records may not contain object handle members")
            }
        }
    }
}

/// A source type was rejected during normalization.
///
/// `path` names the member chain leading to the offending type, empty when
/// the top-level type itself is unsupported.
#[derive(Clone, Eq, PartialEq, Debug, thiserror::Error)]
#[error("type '{type_name}' cannot be exported: {reason}")]
pub struct Unexportable {
    pub type_name: String,
    pub path: String,
    pub reason: UnsupportedReason,
}

/// A type passed normalization but its shape is invalid.
#[derive(Clone, Eq, PartialEq, Debug)]
pub enum MalformedReason {
    MatrixShape(String),
    ArraySize(u64),
    ElementTypedef { typedef: String, expected: String },
    LayoutOverflow,
}

impl fmt::Display for MalformedReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MalformedReason::MatrixShape(detail) => write!(f, "invalid matrix: {detail}"),
            MalformedReason::ArraySize(size) => {
                write!(f, "array size {size} is out of range")
            }
            MalformedReason::ElementTypedef { typedef, expected } => {
                write!(f, "'{typedef}' must be defined as {expected}")
            }
            MalformedReason::LayoutOverflow => f.write_str("type is too large"),
        }
    }
}

/// Failure to intern a type.
#[derive(Clone, Eq, PartialEq, Debug, thiserror::Error)]
pub enum TypeError {
    #[error(transparent)]
    Unexportable(#[from] Unexportable),
    #[error("malformed type '{name}': {reason}")]
    Malformed {
        name: String,
        reason: MalformedReason,
    },
    #[error(transparent)]
    Odr(#[from] OdrViolation),
}

impl TypeError {
    pub(crate) fn malformed(name: impl Into<String>, reason: MalformedReason) -> Self {
        TypeError::Malformed {
            name: name.into(),
            reason,
        }
    }

    pub fn code(&self) -> ErrorCode {
        match self {
            TypeError::Unexportable(u) => match u.reason {
                UnsupportedReason::Bitfield => ErrorCode::E1002,
                UnsupportedReason::Unnamed => ErrorCode::E1005,
                UnsupportedReason::Incomplete => ErrorCode::E1006,
                _ => ErrorCode::E1001,
            },
            TypeError::Malformed { reason, .. } => match reason {
                MalformedReason::MatrixShape(_) | MalformedReason::ElementTypedef { .. } => {
                    ErrorCode::E1003
                }
                MalformedReason::ArraySize(_) | MalformedReason::LayoutOverflow => {
                    ErrorCode::E1004
                }
            },
            TypeError::Odr(_) => ErrorCode::E2001,
        }
    }

    /// ODR violations abort the whole multi-file run.
    pub fn is_fatal(&self) -> bool {
        matches!(self, TypeError::Odr(_))
    }

    /// Convert to a diagnostic, with the offending member path or the two
    /// origin files as notes.
    pub fn to_diagnostic(&self) -> Diagnostic {
        let diag = Diagnostic::error(self.code()).with_message(self.to_string());
        match self {
            TypeError::Unexportable(u) if !u.path.is_empty() => {
                diag.with_note(format!("in member '{}'", u.path))
            }
            TypeError::Odr(v) => diag
                .with_note(v.mismatch.to_string())
                .with_note(format!("first defined in '{}'", v.first_origin)),
            _ => diag,
        }
    }
}
