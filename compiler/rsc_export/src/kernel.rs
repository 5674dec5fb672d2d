//! Kernel signature classification.
//!
//! Every exported function is exactly one of: a special function (`root`,
//! `init`, `.rs.dtor`), a ForEach kernel, a reduce kernel, or a plain
//! invokable. Checks run in that priority order.
//!
//! # ForEach convention
//!
//! Parameters are scanned left to right into up to five slots:
//!
//! | slot      | shape                   | bit |
//! |-----------|-------------------------|-----|
//! | `in`      | first `const T *`       | 0   |
//! | `out`     | `T *`                   | 1   |
//! | `usrData` | a later `const U *`     | 2   |
//! | `x`       | `uint32_t`              | 3   |
//! | `y`       | `uint32_t`              | 4   |
//!
//! Coordinates named `x`/`y` take that slot; other names take the next free
//! one. Pointers must precede coordinates.

use rsc_types::{BuiltinKind, SourceTypeId, SourceTypeKind, SourceTypes};
use smallvec::{smallvec, SmallVec};

use crate::decl::{FuncDecl, KernelAttr};
use crate::error::KernelError;
use crate::signature::ForEachSignature;
use crate::target::TargetApi;

pub const ROOT: &str = "root";
pub const INIT: &str = "init";
pub const DTOR: &str = ".rs.dtor";

/// Maximum number of ForEach parameters.
const MAX_FOREACH_PARAMS: usize = 5;

/// Errors found while classifying one function.
pub type KernelErrors = SmallVec<[KernelError; 2]>;

/// Parameter slots of a validated ForEach kernel.
#[derive(Clone, Eq, PartialEq, Debug, Default)]
pub struct ForEachShape {
    pub signature: ForEachSignature,
    /// Indices into the parameter list.
    pub input: Option<usize>,
    pub output: Option<usize>,
    pub usr_data: Option<usize>,
    pub x: Option<usize>,
    pub y: Option<usize>,
}

/// Validated reduce kernel.
#[derive(Copy, Clone, Eq, PartialEq, Debug)]
pub struct ReduceShape {
    /// Shared type of both parameters and the result.
    pub ty: SourceTypeId,
}

/// Classification of a function.
#[derive(Clone, Eq, PartialEq, Debug)]
pub enum KernelClass {
    /// `int root(void)`: a graphics script entry point.
    GraphicsRoot,
    Init,
    Dtor,
    ForEach(ForEachShape),
    Reduce(ReduceShape),
    Invokable,
}

/// True for the names that have a fixed meaning.
pub fn is_special(name: &str) -> bool {
    matches!(name, ROOT | INIT | DTOR)
}

/// Classify `func` against the calling conventions of `api`.
pub fn classify(
    func: &FuncDecl,
    src: &SourceTypes,
    api: TargetApi,
) -> Result<KernelClass, KernelErrors> {
    let class = match func.name.as_str() {
        ROOT if func.params.is_empty() => {
            if src.builtin_kind(func.ret) == Some(BuiltinKind::Int) {
                Ok(KernelClass::GraphicsRoot)
            } else {
                Err(smallvec![KernelError::GraphicsRootReturn])
            }
        }
        ROOT => validate_foreach(func, src, api).map(KernelClass::ForEach),
        INIT => validate_special(func, src).map(|()| KernelClass::Init),
        DTOR => validate_special(func, src).map(|()| KernelClass::Dtor),
        _ if is_foreach_candidate(func, src, api) => {
            validate_foreach(func, src, api).map(KernelClass::ForEach)
        }
        _ if func.kernel == Some(KernelAttr::Reduce) => {
            validate_reduce(func, src, api).map(KernelClass::Reduce)
        }
        _ => Ok(KernelClass::Invokable),
    };
    tracing::trace!(func = %func.name, ok = class.is_ok(), "classified function");
    class
}

fn is_void(src: &SourceTypes, ty: SourceTypeId) -> bool {
    src.builtin_kind(ty) == Some(BuiltinKind::Void)
}

fn is_foreach_candidate(func: &FuncDecl, src: &SourceTypes, api: TargetApi) -> bool {
    if func.kernel == Some(KernelAttr::ForEach) {
        return true;
    }
    api.infers_foreach()
        && func.kernel.is_none()
        && is_void(src, func.ret)
        && func.params.first().is_some_and(|p| src.is_pointer(p.ty))
}

fn validate_special(func: &FuncDecl, src: &SourceTypes) -> Result<(), KernelErrors> {
    let mut errors = KernelErrors::new();
    if !func.params.is_empty() {
        errors.push(KernelError::SpecialParams {
            func: func.name.clone(),
        });
    }
    if !is_void(src, func.ret) {
        errors.push(KernelError::SpecialReturn {
            func: func.name.clone(),
        });
    }
    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

fn validate_foreach(
    func: &FuncDecl,
    src: &SourceTypes,
    api: TargetApi,
) -> Result<ForEachShape, KernelErrors> {
    let fail = |err: KernelError| Err(smallvec![err]);
    let name = || func.name.clone();

    if !is_void(src, func.ret) {
        return fail(KernelError::ReturnNotVoid { func: name() });
    }
    if func.params.len() > MAX_FOREACH_PARAMS {
        return fail(KernelError::TooManyParams {
            func: name(),
            count: func.params.len(),
        });
    }

    let mut shape = ForEachShape::default();
    for (index, param) in func.params.iter().enumerate() {
        let param_name = || param.name.clone();
        if let Some(pointee) = src.pointee(param.ty) {
            if shape.x.is_some() || shape.y.is_some() {
                return fail(KernelError::PointerAfterCoordinate {
                    func: name(),
                    param: param_name(),
                });
            }
            let slot = if src.is_const(pointee) {
                if shape.input.is_none() && shape.output.is_none() && shape.usr_data.is_none() {
                    &mut shape.input
                } else if shape.usr_data.is_none() {
                    &mut shape.usr_data
                } else {
                    return fail(KernelError::UnexpectedPointer {
                        func: name(),
                        param: param_name(),
                    });
                }
            } else if shape.output.is_none() && shape.usr_data.is_none() {
                &mut shape.output
            } else {
                return fail(KernelError::UnexpectedPointer {
                    func: name(),
                    param: param_name(),
                });
            };
            *slot = Some(index);
            continue;
        }

        if src.builtin_kind(param.ty) != Some(BuiltinKind::UInt) {
            return fail(KernelError::CoordinateType {
                func: name(),
                param: param_name(),
            });
        }
        let slot = match param.name.as_str() {
            "x" if shape.x.is_none() && shape.y.is_none() => &mut shape.x,
            "y" if shape.y.is_none() => &mut shape.y,
            "x" | "y" => {
                return fail(KernelError::CoordinateOrder {
                    func: name(),
                    param: param_name(),
                })
            }
            _ if shape.x.is_none() && shape.y.is_none() => &mut shape.x,
            _ if shape.y.is_none() => &mut shape.y,
            _ => {
                return fail(KernelError::CoordinateOrder {
                    func: name(),
                    param: param_name(),
                })
            }
        };
        *slot = Some(index);
    }

    if shape.input.is_none() && shape.output.is_none() {
        return fail(KernelError::NoInOut { func: name() });
    }

    let mut signature = ForEachSignature::empty();
    signature.set(ForEachSignature::IN, shape.input.is_some());
    signature.set(ForEachSignature::OUT, shape.output.is_some());
    signature.set(ForEachSignature::USR_DATA, shape.usr_data.is_some());
    signature.set(ForEachSignature::X, shape.x.is_some());
    signature.set(ForEachSignature::Y, shape.y.is_some());
    shape.signature = signature;

    if api.is_legacy_foreach() && !signature.is_legacy_compatible() {
        return fail(KernelError::LegacySignature {
            func: name(),
            bits: signature.encoding(),
            api,
        });
    }
    tracing::debug!(func = %func.name, signature = signature.encoding(), "foreach kernel");
    Ok(shape)
}

fn validate_reduce(
    func: &FuncDecl,
    src: &SourceTypes,
    api: TargetApi,
) -> Result<ReduceShape, KernelErrors> {
    let mut errors = KernelErrors::new();
    let name = || func.name.clone();
    let spell = |ty: SourceTypeId| src.spelling(src.canonical(ty));

    if !api.supports_reduce() {
        errors.push(KernelError::ReduceApi { func: name(), api });
    }
    if func.params.len() != 2 {
        errors.push(KernelError::ReduceArity {
            func: name(),
            count: func.params.len(),
        });
    }

    let ret = src.canonical(func.ret);
    if is_void(src, ret) {
        errors.push(KernelError::ReduceVoidReturn { func: name() });
    } else if matches!(src.kind(ret), SourceTypeKind::Pointer(_)) {
        errors.push(KernelError::ReducePointerReturn {
            func: name(),
            ty: spell(ret),
        });
    }

    if let Some(first) = func.params.first() {
        let first_ty = src.canonical(first.ty);
        for param in &func.params {
            let ty = src.canonical(param.ty);
            if src.is_pointer(ty) {
                errors.push(KernelError::ReducePointerParam {
                    func: name(),
                    param: param.name.clone(),
                    ty: spell(ty),
                });
            }
            if ty != ret {
                errors.push(KernelError::ReduceReturnMismatch {
                    func: name(),
                    ret: spell(ret),
                    param: param.name.clone(),
                    ty: spell(ty),
                });
            }
            if ty != first_ty {
                errors.push(KernelError::ReduceParamMismatch {
                    func: name(),
                    first: first.name.clone(),
                    first_ty: spell(first_ty),
                    param: param.name.clone(),
                    ty: spell(ty),
                });
            }
        }
    }

    if errors.is_empty() {
        Ok(ReduceShape { ty: ret })
    } else {
        Err(errors)
    }
}

#[cfg(test)]
#[expect(clippy::unwrap_used, reason = "Tests use unwrap for brevity")]
mod tests;
