//! Export and kernel classification errors.

use rsc_diagnostic::{Diagnostic, ErrorCode, Location};
use rsc_types::{OdrViolation, TypeError};

use crate::target::TargetApi;

/// A function does not fit the calling convention its shape implies.
#[derive(Clone, Eq, PartialEq, Debug, thiserror::Error)]
pub enum KernelError {
    #[error("root(void) is required to return an int for graphics usage")]
    GraphicsRootReturn,
    #[error("compute kernel {func}() is required to return a void type")]
    ReturnNotVoid { func: String },
    #[error("compute kernel {func}() pointer parameter '{param}' must come before x/y")]
    PointerAfterCoordinate { func: String, param: String },
    #[error("unexpected pointer parameter '{param}' in compute kernel {func}()")]
    UnexpectedPointer { func: String, param: String },
    #[error("compute kernel {func}() parameter '{param}' must be a uint32_t type")]
    CoordinateType { func: String, param: String },
    #[error("too many compute kernel {func}() parameters specified (found {count}, at most 5)")]
    TooManyParams { func: String, count: usize },
    #[error("duplicate or out-of-order coordinate parameter '{param}' in compute kernel {func}()")]
    CoordinateOrder { func: String, param: String },
    #[error(
        "compute kernel {func}() parameter combination {bits:#07b} is not supported by API level {api}"
    )]
    LegacySignature {
        func: String,
        bits: u32,
        api: TargetApi,
    },
    #[error("compute kernel {func}() must have at least one input or output parameter")]
    NoInOut { func: String },
    #[error("compute kernel {func}() user data parameter '{param}' uses unsupported type")]
    UsrDataType { func: String, param: String },
    #[error("{func}(void) is required to have no parameters")]
    SpecialParams { func: String },
    #[error("{func}(void) is required to have a void return type")]
    SpecialReturn { func: String },
    #[error("Reduce-style kernel {func}() unsupported in SDK level {api}")]
    ReduceApi { func: String, api: TargetApi },
    #[error("Reduce-style kernel {func}() must take 2 parameters (found {count}).")]
    ReduceArity { func: String, count: usize },
    #[error("Reduce-style kernel {func}() cannot return void")]
    ReduceVoidReturn { func: String },
    #[error("Reduce-style kernel {func}() cannot return a pointer type: {ty}")]
    ReducePointerReturn { func: String, ty: String },
    #[error("Reduce-style kernel {func}() cannot have parameter '{param}' of pointer type: '{ty}'")]
    ReducePointerParam {
        func: String,
        param: String,
        ty: String,
    },
    #[error(
        "Reduce-style kernel {func}() return type '{ret}' is not the same type as parameter '{param}' (type '{ty}')"
    )]
    ReduceReturnMismatch {
        func: String,
        ret: String,
        param: String,
        ty: String,
    },
    #[error(
        "In reduce-style kernel {func}(): parameter '{first}' (type '{first_ty}') does not have the same type as parameter '{param}' (type '{ty}')"
    )]
    ReduceParamMismatch {
        func: String,
        first: String,
        first_ty: String,
        param: String,
        ty: String,
    },
}

impl KernelError {
    pub fn code(&self) -> ErrorCode {
        match self {
            KernelError::GraphicsRootReturn => ErrorCode::E3001,
            KernelError::ReturnNotVoid { .. } => ErrorCode::E3002,
            KernelError::PointerAfterCoordinate { .. } => ErrorCode::E3003,
            KernelError::UnexpectedPointer { .. } => ErrorCode::E3004,
            KernelError::CoordinateType { .. } => ErrorCode::E3005,
            KernelError::TooManyParams { .. } => ErrorCode::E3006,
            KernelError::CoordinateOrder { .. } => ErrorCode::E3007,
            KernelError::LegacySignature { .. } => ErrorCode::E3008,
            KernelError::NoInOut { .. } => ErrorCode::E3009,
            KernelError::UsrDataType { .. } => ErrorCode::E3010,
            KernelError::SpecialParams { .. } => ErrorCode::E3011,
            KernelError::SpecialReturn { .. } => ErrorCode::E3012,
            KernelError::ReduceApi { .. } => ErrorCode::E3013,
            KernelError::ReduceArity { .. } => ErrorCode::E3014,
            KernelError::ReduceVoidReturn { .. } => ErrorCode::E3015,
            KernelError::ReducePointerReturn { .. } => ErrorCode::E3016,
            KernelError::ReducePointerParam { .. } => ErrorCode::E3017,
            KernelError::ReduceReturnMismatch { .. } => ErrorCode::E3018,
            KernelError::ReduceParamMismatch { .. } => ErrorCode::E3019,
        }
    }
}

/// A declaration could not be exported.
#[derive(Clone, Eq, PartialEq, Debug, thiserror::Error)]
pub enum ExportError {
    #[error("variable '{name}' cannot be exported: {source}")]
    VarType { name: String, source: TypeError },
    #[error("parameter '{param}' in function '{func}' uses unsupported type")]
    ParamType {
        func: String,
        param: String,
        source: TypeError,
    },
    #[error("Reduce-style kernel {func}() type cannot be exported: {source}")]
    ReduceType { func: String, source: TypeError },
    #[error("type '{name}' cannot be exported: {source}")]
    ForcedType { name: String, source: TypeError },
    #[error("arguments of function '{func}' cannot be packed: {source}")]
    PacketLayout { func: String, source: TypeError },
    #[error(transparent)]
    Kernel(#[from] KernelError),
    #[error("'{name}' named in #pragma rs {pragma} is not declared in this file")]
    MissingSymbol { pragma: &'static str, name: String },
    #[error("function '{name}' is declared but never defined and will not be exported")]
    Undefined { name: String },
}

impl ExportError {
    pub fn code(&self) -> ErrorCode {
        match self {
            ExportError::VarType { source, .. } => match source {
                TypeError::Unexportable(_) => ErrorCode::E4002,
                other => other.code(),
            },
            ExportError::ParamType { .. } => ErrorCode::E4003,
            ExportError::ReduceType { source, .. }
            | ExportError::ForcedType { source, .. }
            | ExportError::PacketLayout { source, .. } => source.code(),
            ExportError::Kernel(k) => k.code(),
            ExportError::MissingSymbol { .. } => ErrorCode::E4001,
            ExportError::Undefined { .. } => ErrorCode::E4004,
        }
    }

    /// Convert to a located diagnostic. Pragma and prototype issues are
    /// warnings; everything else is an error.
    pub fn to_diagnostic(&self, location: Location) -> Diagnostic {
        let diag = Diagnostic::for_code(self.code())
            .with_message(self.to_string())
            .with_location(location);
        match self {
            ExportError::VarType { source, .. }
            | ExportError::ParamType { source, .. }
            | ExportError::ReduceType { source, .. }
            | ExportError::ForcedType { source, .. }
            | ExportError::PacketLayout { source, .. } => source
                .to_diagnostic()
                .notes
                .into_iter()
                .fold(diag, Diagnostic::with_note),
            _ => diag,
        }
    }
}

/// An ODR violation stopped a multi-file run.
#[derive(Clone, Eq, PartialEq, Debug, thiserror::Error)]
#[error("reflection aborted: {violation}")]
pub struct RunAborted {
    pub violation: OdrViolation,
}
