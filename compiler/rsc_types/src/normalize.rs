//! Exportability check and canonical naming.
//!
//! [`normalize`] decides whether a source type may cross the export
//! boundary and, if so, computes the canonical name the pool interns it
//! under. Two source types with the same canonical name are the same export
//! type.
//!
//! # Design
//!
//! The check is a depth-first walk. Records are added to the caller's
//! `visited` set before their members are walked, so recursive structs
//! (through pointers) terminate. The walk records the member path it is in,
//! and a rejection reports that path.

use rustc_hash::FxHashSet;
use smallvec::SmallVec;

use crate::data_type::{vector_name, DataType};
use crate::error::{Unexportable, UnsupportedReason};
use crate::source::{SourceTypeId, SourceTypeKind, SourceTypes};

type MemberPath = SmallVec<[String; 4]>;

/// Validate `ty` and compute its canonical export name.
///
/// `visited` holds records already validated; pass the same set across
/// calls to skip re-walking shared records.
pub fn normalize(
    src: &SourceTypes,
    ty: SourceTypeId,
    visited: &mut FxHashSet<SourceTypeId>,
) -> Result<String, Unexportable> {
    let canonical = src.canonical(ty);
    let mut path = MemberPath::new();
    let rejected = |reason, path: &MemberPath| Unexportable {
        type_name: src.spelling(ty),
        path: path.join("."),
        reason,
    };
    check(src, canonical, visited, &mut path).map_err(|reason| rejected(reason, &path))?;
    canonical_name(src, canonical).ok_or_else(|| rejected(UnsupportedReason::Unnamed, &path))
}

fn check(
    src: &SourceTypes,
    ty: SourceTypeId,
    visited: &mut FxHashSet<SourceTypeId>,
    path: &mut MemberPath,
) -> Result<(), UnsupportedReason> {
    if visited.contains(&ty) {
        return Ok(());
    }
    match src.kind(ty) {
        SourceTypeKind::Builtin(kind) => match DataType::from_builtin(*kind) {
            Some(_) => Ok(()),
            None => Err(UnsupportedReason::Builtin(*kind)),
        },
        SourceTypeKind::Record(decl) => {
            if decl.is_union {
                return Err(UnsupportedReason::Union);
            }
            let Some(name) = &decl.name else {
                return Err(UnsupportedReason::Unnamed);
            };
            if DataType::from_object_name(name).is_some()
                || DataType::from_matrix_name(name).is_some()
            {
                return Ok(());
            }
            if !decl.defined {
                return Err(UnsupportedReason::Incomplete);
            }
            visited.insert(ty);
            for field in &decl.fields {
                path.push(field.name.clone());
                if field.bit_width.is_some() {
                    return Err(UnsupportedReason::Bitfield);
                }
                let field_ty = src.canonical(field.ty);
                match src.kind(field_ty) {
                    SourceTypeKind::IncompleteArray(_) => {
                        return Err(UnsupportedReason::FlexibleArray);
                    }
                    SourceTypeKind::Record(inner)
                        if inner
                            .name
                            .as_deref()
                            .and_then(DataType::from_object_name)
                            .is_some() =>
                    {
                        return Err(UnsupportedReason::ObjectMember);
                    }
                    _ => {}
                }
                check(src, field_ty, visited, path)?;
                path.pop();
            }
            Ok(())
        }
        SourceTypeKind::Pointer(pointee) => {
            let pointee = src.canonical(*pointee);
            // A pointer to a pointer is exported as an opaque int pointer.
            if matches!(src.kind(pointee), SourceTypeKind::Pointer(_)) {
                return Ok(());
            }
            path.push("<pointee>".to_string());
            check(src, pointee, visited, path)?;
            path.pop();
            Ok(())
        }
        SourceTypeKind::ConstantArray { element, .. } => {
            let element = src.canonical(*element);
            path.push("<element>".to_string());
            if matches!(
                src.kind(element),
                SourceTypeKind::ConstantArray { .. } | SourceTypeKind::IncompleteArray(_)
            ) {
                return Err(UnsupportedReason::ArrayOfArrays);
            }
            check(src, element, visited, path)?;
            path.pop();
            Ok(())
        }
        SourceTypeKind::ExtVector { element, count } => {
            if !(2..=4).contains(count) {
                return Err(UnsupportedReason::VectorSize(*count));
            }
            match src.builtin_kind(*element).and_then(DataType::from_builtin) {
                Some(_) => Ok(()),
                None => Err(UnsupportedReason::VectorElement),
            }
        }
        SourceTypeKind::IncompleteArray(_) => Err(UnsupportedReason::FlexibleArray),
        SourceTypeKind::Typedef { underlying, .. } | SourceTypeKind::Const(underlying) => {
            check(src, src.canonical(*underlying), visited, path)
        }
        kind @ (SourceTypeKind::Enum(_) | SourceTypeKind::Function) => {
            Err(UnsupportedReason::Class(kind.class_name()))
        }
    }
}

/// Canonical export name of an already validated canonical type.
fn canonical_name(src: &SourceTypes, ty: SourceTypeId) -> Option<String> {
    match src.kind(ty) {
        SourceTypeKind::Builtin(kind) => {
            DataType::from_builtin(*kind)?.c_name().map(str::to_string)
        }
        SourceTypeKind::Record(decl) => decl.name.clone(),
        SourceTypeKind::Pointer(pointee) => {
            let pointee_name = canonical_name(src, src.canonical(*pointee))?;
            Some(format!("*{pointee_name}"))
        }
        SourceTypeKind::ConstantArray { element, size } => {
            let element_name = canonical_name(src, src.canonical(*element))?;
            Some(format!("{element_name}[{size}]"))
        }
        SourceTypeKind::ExtVector { element, count } => {
            let dt = src.builtin_kind(*element).and_then(DataType::from_builtin)?;
            vector_name(dt, *count)
        }
        SourceTypeKind::Typedef { underlying, .. } | SourceTypeKind::Const(underlying) => {
            canonical_name(src, src.canonical(*underlying))
        }
        SourceTypeKind::IncompleteArray(_) | SourceTypeKind::Enum(_) | SourceTypeKind::Function => {
            None
        }
    }
}

#[cfg(test)]
#[expect(clippy::unwrap_used, reason = "Tests use unwrap for brevity")]
mod tests;
