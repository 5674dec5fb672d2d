//! Structural type equality.
//!
//! Classes are compared first, then each variant compares only its shape:
//! primitives by data type, vectors by data type and count, matrices by
//! dimension, arrays by size then element, pointers by pointee, and records
//! by field count then pairwise field type. Field names never participate
//! here; the ODR check compares them separately.

use rustc_hash::FxHashSet;

use crate::export_type::{ExportKind, TypeId};
use crate::pool::TypePool;

/// True if `a` and `b` have the same structure.
///
/// Recursive records are compared coinductively: a pair already under
/// comparison is assumed equal.
pub fn structurally_equal(pool: &TypePool, a: TypeId, b: TypeId) -> bool {
    let mut assumed = FxHashSet::default();
    equal(pool, a, b, &mut assumed)
}

fn equal(pool: &TypePool, a: TypeId, b: TypeId, assumed: &mut FxHashSet<(TypeId, TypeId)>) -> bool {
    if a == b || !assumed.insert((a, b)) {
        return true;
    }
    let (ta, tb) = (pool.get(a), pool.get(b));
    if ta.class() != tb.class() {
        return false;
    }
    match (ta.kind(), tb.kind()) {
        (ExportKind::Primitive(x), ExportKind::Primitive(y)) => x.data_type == y.data_type,
        (ExportKind::Pointer(x), ExportKind::Pointer(y)) => {
            equal(pool, x.pointee, y.pointee, assumed)
        }
        (ExportKind::Vector(x), ExportKind::Vector(y)) => {
            x.element.data_type == y.element.data_type && x.count == y.count
        }
        (ExportKind::Matrix(x), ExportKind::Matrix(y)) => x.dim == y.dim,
        (ExportKind::ConstantArray(x), ExportKind::ConstantArray(y)) => {
            x.size == y.size && equal(pool, x.element, y.element, assumed)
        }
        (ExportKind::Record(x), ExportKind::Record(y)) => {
            x.fields.len() == y.fields.len()
                && x
                    .fields
                    .iter()
                    .zip(&y.fields)
                    .all(|(fx, fy)| equal(pool, fx.ty, fy.ty, assumed))
        }
        _ => false,
    }
}
